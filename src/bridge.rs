//! Message protocol spoken between the board webview and the Rust backend.
//!
//! Inbound and outbound messages share the `{command, payload}` shape. There
//! is no correlation id: the webview matches replies by response command name
//! and, for task-scoped replies, by the id of the returned entity.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wrike_api::{TaskCreate, TaskUpdate};

/// Event name used to deliver [`OutboundMessage`]s to the panel.
pub const BRIDGE_EVENT: &str = "bridge-message";
pub const ERROR_COMMAND: &str = "error";
pub const AUTH_ERROR_MESSAGE: &str = "Authentication failed. Please re-authenticate.";

#[derive(Deserialize, Debug, Clone)]
pub struct InboundMessage {
    pub command: String,
    #[serde(default)]
    pub payload: Value,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub command: String,
    pub payload: Value,
}

impl OutboundMessage {
    pub fn new(command: impl Into<String>, payload: Value) -> Self {
        Self {
            command: command.into(),
            payload,
        }
    }

    pub fn error(payload: ErrorPayload) -> Self {
        Self {
            command: ERROR_COMMAND.to_string(),
            payload: serde_json::to_value(payload).unwrap_or(Value::Null),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub message: String,
    pub is_auth_error: bool,
}

/// Commands the board may send, each paired with the name of its reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeCommand {
    GetTasks,
    GetFolders,
    GetSpaces,
    GetTask,
    UpdateTask,
    GetContacts,
    GetWorkflows,
    GetCustomFields,
    GetAttachments,
    UploadAttachment,
    BulkUpdateTasks,
    CreateTask,
}

impl BridgeCommand {
    pub fn from_name(name: &str) -> Option<Self> {
        let command = match name {
            "getTasks" => BridgeCommand::GetTasks,
            "getFolders" => BridgeCommand::GetFolders,
            "getSpaces" => BridgeCommand::GetSpaces,
            "getTask" => BridgeCommand::GetTask,
            "updateTask" => BridgeCommand::UpdateTask,
            "getContacts" => BridgeCommand::GetContacts,
            "getWorkflows" => BridgeCommand::GetWorkflows,
            "getCustomFields" => BridgeCommand::GetCustomFields,
            "getAttachments" => BridgeCommand::GetAttachments,
            "uploadAttachment" => BridgeCommand::UploadAttachment,
            "bulkUpdateTasks" => BridgeCommand::BulkUpdateTasks,
            "createTask" => BridgeCommand::CreateTask,
            _ => return None,
        };
        Some(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            BridgeCommand::GetTasks => "getTasks",
            BridgeCommand::GetFolders => "getFolders",
            BridgeCommand::GetSpaces => "getSpaces",
            BridgeCommand::GetTask => "getTask",
            BridgeCommand::UpdateTask => "updateTask",
            BridgeCommand::GetContacts => "getContacts",
            BridgeCommand::GetWorkflows => "getWorkflows",
            BridgeCommand::GetCustomFields => "getCustomFields",
            BridgeCommand::GetAttachments => "getAttachments",
            BridgeCommand::UploadAttachment => "uploadAttachment",
            BridgeCommand::BulkUpdateTasks => "bulkUpdateTasks",
            BridgeCommand::CreateTask => "createTask",
        }
    }

    pub fn response_name(&self) -> &'static str {
        match self {
            BridgeCommand::GetTasks => "getTasksResponse",
            BridgeCommand::GetFolders => "getFoldersResponse",
            BridgeCommand::GetSpaces => "getSpacesResponse",
            BridgeCommand::GetTask => "getTaskResponse",
            BridgeCommand::UpdateTask => "taskUpdated",
            BridgeCommand::GetContacts => "getContactsResponse",
            BridgeCommand::GetWorkflows => "getWorkflowsResponse",
            BridgeCommand::GetCustomFields => "getCustomFieldsResponse",
            BridgeCommand::GetAttachments => "getAttachmentsResponse",
            BridgeCommand::UploadAttachment => "attachmentUploaded",
            BridgeCommand::BulkUpdateTasks => "tasksUpdated",
            BridgeCommand::CreateTask => "taskCreated",
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FolderRef {
    pub folder_id: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SpaceRef {
    pub space_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TaskRef {
    pub task_id: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub task_id: String,
    #[serde(default)]
    pub updates: TaskUpdate,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateRequest {
    pub task_ids: Vec<String>,
    #[serde(default)]
    pub updates: TaskUpdate,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub folder_id: String,
    pub task_data: TaskCreate,
}

/// File content travels base64-encoded because the webview can only post JSON.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UploadAttachmentRequest {
    pub task_id: String,
    pub file_name: String,
    #[serde(alias = "base64Data")]
    pub file_data: String,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TasksUpdated {
    pub task_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inbound_without_payload_defaults_to_null() {
        let message: InboundMessage = serde_json::from_value(json!({"command": "getWorkflows"})).unwrap();
        assert_eq!(message.command, "getWorkflows");
        assert!(message.payload.is_null());
    }

    #[test]
    fn every_command_name_maps_to_its_reply() {
        let pairs = [
            ("getTasks", "getTasksResponse"),
            ("getFolders", "getFoldersResponse"),
            ("getSpaces", "getSpacesResponse"),
            ("getTask", "getTaskResponse"),
            ("updateTask", "taskUpdated"),
            ("getContacts", "getContactsResponse"),
            ("getWorkflows", "getWorkflowsResponse"),
            ("getCustomFields", "getCustomFieldsResponse"),
            ("getAttachments", "getAttachmentsResponse"),
            ("uploadAttachment", "attachmentUploaded"),
            ("bulkUpdateTasks", "tasksUpdated"),
            ("createTask", "taskCreated"),
        ];
        for (name, reply) in pairs {
            let command = BridgeCommand::from_name(name).expect(name);
            assert_eq!(command.name(), name);
            assert_eq!(command.response_name(), reply);
        }
        assert_eq!(BridgeCommand::from_name("deleteTask"), None);
    }

    #[test]
    fn error_message_uses_camel_case_flag() {
        let message = OutboundMessage::error(ErrorPayload {
            message: "boom".into(),
            is_auth_error: false,
        });
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({"command": "error", "payload": {"message": "boom", "isAuthError": false}})
        );
    }

    #[test]
    fn upload_request_accepts_both_data_names() {
        let a: UploadAttachmentRequest = serde_json::from_value(
            json!({"taskId": "T1", "fileName": "a.txt", "fileData": "aGk="}),
        )
        .unwrap();
        let b: UploadAttachmentRequest = serde_json::from_value(
            json!({"taskId": "T1", "fileName": "a.txt", "base64Data": "aGk="}),
        )
        .unwrap();
        assert_eq!(a.file_data, b.file_data);
    }
}
