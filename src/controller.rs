//! Bridge controller: dispatches webview commands to the Wrike client and
//! reports every failure exactly once, to both the host and the webview.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use wrike_api::{WrikeClient, WrikeError};

use crate::bridge::{
    BridgeCommand, BulkUpdateRequest, CreateTaskRequest, ErrorPayload, FolderRef, InboundMessage,
    OutboundMessage, SpaceRef, TaskRef, TasksUpdated, UpdateTaskRequest, UploadAttachmentRequest,
    AUTH_ERROR_MESSAGE,
};

const AUTH_NOTIFICATION: &str = "Wrike authentication failed. Your token may have expired. Please run \"Set Token\" to re-authenticate.";

/// Receives replies destined for the webview.
pub trait MessageSink: Send + Sync {
    fn post(&self, message: OutboundMessage);
}

/// User-facing notification surface of the host.
pub trait HostNotifier: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
    /// Auth failures offer a one-click path back to token entry.
    fn auth_error(&self, message: &str);
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Remote(#[from] WrikeError),
    #[error("Invalid payload for {command}: {reason}")]
    Payload { command: String, reason: String },
    #[error("Invalid attachment data: {0}")]
    Attachment(#[from] base64::DecodeError),
}

/// Failures whose rendered text mentions a 401 or authentication are auth errors.
pub fn is_auth_error(message: &str) -> bool {
    message.contains("401") || message.contains("Authentication")
}

pub struct BridgeController {
    client: RwLock<WrikeClient>,
    sink: Arc<dyn MessageSink>,
    notifier: Arc<dyn HostNotifier>,
}

impl BridgeController {
    pub fn new(
        client: WrikeClient,
        sink: Arc<dyn MessageSink>,
        notifier: Arc<dyn HostNotifier>,
    ) -> Self {
        Self {
            client: RwLock::new(client),
            sink,
            notifier,
        }
    }

    /// Swaps the bound client, e.g. after the user stored a new token.
    pub fn rebind(&self, client: WrikeClient) {
        *self.client.write().unwrap() = client;
    }

    fn client(&self) -> WrikeClient {
        self.client.read().unwrap().clone()
    }

    /// Handles one inbound message. Replies and failures are delivered through
    /// the sink; nothing is returned to the caller.
    pub async fn handle(&self, message: InboundMessage) {
        let name = message.command.clone();
        let Some(command) = BridgeCommand::from_name(&name) else {
            warn!("Ignoring unknown bridge command '{}'", name);
            return;
        };

        match self.dispatch(command, message.payload).await {
            Ok(payload) => self
                .sink
                .post(OutboundMessage::new(command.response_name(), payload)),
            Err(err) => self.report_failure(&name, &err),
        }
    }

    async fn dispatch(&self, command: BridgeCommand, payload: Value) -> Result<Value, BridgeError> {
        let client = self.client();
        match command {
            BridgeCommand::GetTasks => {
                let request: FolderRef = decode(command, payload)?;
                encode(command, &client.get_tasks(&request.folder_id).await?)
            }
            BridgeCommand::GetFolders => {
                let request: SpaceRef = decode(command, payload)?;
                encode(command, &client.get_folders(&request.space_id).await?)
            }
            BridgeCommand::GetSpaces => encode(command, &client.get_spaces().await?),
            BridgeCommand::GetTask => {
                let request: TaskRef = decode(command, payload)?;
                encode(command, &client.get_task(&request.task_id).await?)
            }
            BridgeCommand::UpdateTask => {
                let request: UpdateTaskRequest = decode(command, payload)?;
                let task = client.update_task(&request.task_id, &request.updates).await?;
                encode(command, &task)
            }
            BridgeCommand::GetContacts => encode(command, &client.get_contacts().await?),
            BridgeCommand::GetWorkflows => encode(command, &client.get_workflows().await?),
            BridgeCommand::GetCustomFields => encode(command, &client.get_custom_fields().await?),
            BridgeCommand::GetAttachments => {
                let request: TaskRef = decode(command, payload)?;
                encode(command, &client.get_attachments(&request.task_id).await?)
            }
            BridgeCommand::UploadAttachment => {
                let request: UploadAttachmentRequest = decode(command, payload)?;
                let bytes = BASE64_STANDARD.decode(request.file_data.trim())?;
                client
                    .upload_attachment(&request.task_id, &request.file_name, bytes)
                    .await?;
                encode(
                    command,
                    &TaskRef {
                        task_id: request.task_id,
                    },
                )
            }
            BridgeCommand::BulkUpdateTasks => {
                let request: BulkUpdateRequest = decode(command, payload)?;
                // Strictly sequential; the first failure ends the batch and
                // already applied updates stay applied.
                for task_id in &request.task_ids {
                    client.update_task(task_id, &request.updates).await?;
                }
                encode(
                    command,
                    &TasksUpdated {
                        task_ids: request.task_ids,
                    },
                )
            }
            BridgeCommand::CreateTask => {
                let request: CreateTaskRequest = decode(command, payload)?;
                let task = client
                    .create_task(&request.folder_id, &request.task_data)
                    .await?;
                encode(command, &task)
            }
        }
    }

    fn report_failure(&self, command: &str, err: &BridgeError) {
        let message = err.to_string();
        warn!("Bridge command {} failed", command);
        debug!("{} failure details: {}", command, message);

        let payload = if is_auth_error(&message) {
            self.notifier.auth_error(AUTH_NOTIFICATION);
            ErrorPayload {
                message: AUTH_ERROR_MESSAGE.to_string(),
                is_auth_error: true,
            }
        } else {
            self.notifier.error(&format!("Wrike Error: {}", message));
            ErrorPayload {
                message,
                is_auth_error: false,
            }
        };
        self.sink.post(OutboundMessage::error(payload));
    }
}

fn decode<T>(command: BridgeCommand, payload: Value) -> Result<T, BridgeError>
where
    T: DeserializeOwned,
{
    serde_json::from_value(payload).map_err(|err| BridgeError::Payload {
        command: command.name().to_string(),
        reason: err.to_string(),
    })
}

fn encode<T>(command: BridgeCommand, value: &T) -> Result<Value, BridgeError>
where
    T: Serialize + ?Sized,
{
    serde_json::to_value(value).map_err(|err| BridgeError::Payload {
        command: command.name().to_string(),
        reason: err.to_string(),
    })
}
