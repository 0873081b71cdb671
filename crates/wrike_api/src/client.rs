use crate::config::WrikeConfig;
use crate::error::{Result, WrikeError};
use crate::models::{
    Attachment, CustomFieldDefinition, Envelope, Folder, Space, Task, TaskCreate, TaskUpdate,
    User, Workflow,
};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client as HttpClient, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

pub const FILE_NAME_HEADER: &str = "X-File-Name";
const JSON_CONTENT_TYPE: &str = "application/json";
const BINARY_CONTENT_TYPE: &str = "application/octet-stream";
const ERROR_BODY_LOG_LIMIT: usize = 200;

/// Optional task fields requested by `get_tasks`.
pub const TASK_FIELDS: &[&str] = &[
    "description",
    "responsibleIds",
    "customFields",
    "briefDescription",
    "attachmentCount",
    "subTaskIds",
    "superTaskIds",
    "metadata",
    "hasAttachments",
];

/// Request body accepted by [`WrikeClient::request`].
#[derive(Debug, Clone)]
pub enum Payload<'a> {
    Empty,
    Json(Value),
    /// Raw bytes sent as `application/octet-stream` with an `X-File-Name`
    /// header. The name is percent-encoded so non-ASCII names survive.
    Binary { file_name: &'a str, bytes: Vec<u8> },
}

impl Payload<'_> {
    pub fn json<B>(body: &B) -> Result<Self>
    where
        B: Serialize + ?Sized,
    {
        Ok(Payload::Json(serde_json::to_value(body)?))
    }
}

/// Wrike API client bound to a single token. Every operation goes through
/// [`WrikeClient::request`], so failures are shaped in one place.
#[derive(Clone)]
pub struct WrikeClient {
    http: HttpClient,
    config: WrikeConfig,
}

impl WrikeClient {
    pub fn new(config: WrikeConfig) -> Result<Self> {
        let http = build_http_client(&config)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &WrikeConfig {
        &self.config
    }

    /// Issues one request and unwraps the `{kind, data}` envelope.
    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        payload: Payload<'_>,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let url = self.url_for(path);
        debug!(%method, path, "wrike request");
        let mut request = self.http.request(method, url);
        if !query.is_empty() {
            request = request.query(query);
        }
        request = match payload {
            Payload::Empty => request,
            Payload::Json(body) => request.json(&body),
            Payload::Binary { file_name, bytes } => {
                let file_name = HeaderValue::from_str(&urlencoding::encode(file_name))
                    .map_err(|err| WrikeError::Other(format!("invalid file name: {err}")))?;
                request
                    .header(CONTENT_TYPE, BINARY_CONTENT_TYPE)
                    .header(FILE_NAME_HEADER, file_name)
                    .body(bytes)
            }
        };
        let response = request.send().await?;
        Self::parse_envelope(response).await
    }

    pub async fn get<T>(&self, path: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        self.request(Method::GET, path, &[], Payload::Empty).await
    }

    fn url_for(&self, path: &str) -> String {
        let mut base = self.config.api_root();
        base.push_str(path.trim_start_matches('/'));
        base
    }

    async fn parse_envelope<T>(response: Response) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if status.is_success() {
            let envelope = response.json::<Envelope<T>>().await?;
            Ok(envelope.data)
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "wrike request failed");
            debug!(body = %truncate(&body, ERROR_BODY_LOG_LIMIT), "wrike error body");
            Err(WrikeError::api(status, body))
        }
    }

    pub async fn get_current_user(&self) -> Result<User> {
        let users = self
            .request(Method::GET, "contacts", &[("me", "true")], Payload::Empty)
            .await?;
        first(users, "contacts?me=true")
    }

    pub async fn get_contacts(&self) -> Result<Vec<User>> {
        self.get("contacts").await
    }

    pub async fn get_spaces(&self) -> Result<Vec<Space>> {
        self.get("spaces").await
    }

    pub async fn get_folders(&self, space_id: &str) -> Result<Vec<Folder>> {
        self.get(&format!("spaces/{}/folders", space_id)).await
    }

    pub async fn get_folder(&self, folder_id: &str) -> Result<Folder> {
        let path = format!("folders/{}", folder_id);
        first(self.get(&path).await?, &path)
    }

    /// Lists tasks of a folder including those of nested folders.
    pub async fn get_tasks(&self, folder_id: &str) -> Result<Vec<Task>> {
        let path = format!("folders/{}/tasks", folder_id);
        let fields = serde_json::to_string(TASK_FIELDS)?;
        self.request(
            Method::GET,
            &path,
            &[("fields", fields.as_str()), ("descendants", "true")],
            Payload::Empty,
        )
        .await
    }

    pub async fn get_task(&self, task_id: &str) -> Result<Task> {
        let path = format!("tasks/{}", task_id);
        first(self.get(&path).await?, &path)
    }

    pub async fn create_task(&self, folder_id: &str, task: &TaskCreate) -> Result<Task> {
        let path = format!("folders/{}/tasks", folder_id);
        let created = self
            .request(Method::POST, &path, &[], Payload::json(task)?)
            .await?;
        first(created, &path)
    }

    pub async fn update_task(&self, task_id: &str, updates: &TaskUpdate) -> Result<Task> {
        let path = format!("tasks/{}", task_id);
        let updated = self
            .request(Method::PUT, &path, &[], Payload::json(updates)?)
            .await?;
        first(updated, &path)
    }

    pub async fn get_custom_fields(&self) -> Result<Vec<CustomFieldDefinition>> {
        self.get("customfields").await
    }

    pub async fn get_workflows(&self) -> Result<Vec<Workflow>> {
        self.get("workflows").await
    }

    pub async fn get_attachments(&self, task_id: &str) -> Result<Vec<Attachment>> {
        self.get(&format!("tasks/{}/attachments", task_id)).await
    }

    pub async fn upload_attachment(
        &self,
        task_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Vec<Attachment>> {
        let path = format!("tasks/{}/attachments", task_id);
        self.request(
            Method::POST,
            &path,
            &[],
            Payload::Binary { file_name, bytes },
        )
        .await
    }
}

fn build_http_client(config: &WrikeConfig) -> Result<HttpClient> {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        header_value(format!("Bearer {}", config.token.trim()))?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    headers.insert(USER_AGENT, header_value(config.user_agent.clone())?);

    HttpClient::builder()
        .default_headers(headers)
        .build()
        .map_err(|err| WrikeError::Other(err.to_string()))
}

fn header_value(value: String) -> Result<HeaderValue> {
    HeaderValue::from_str(&value).map_err(|err| WrikeError::Other(err.to_string()))
}

fn first<T>(items: Vec<T>, path: &str) -> Result<T> {
    items
        .into_iter()
        .next()
        .ok_or_else(|| WrikeError::EmptyResponse(path.to_string()))
}

fn truncate(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        value.to_string()
    } else {
        let head: String = value.chars().take(limit).collect();
        format!("{head}...")
    }
}
