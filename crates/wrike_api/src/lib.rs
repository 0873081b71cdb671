//! Typed Wrike API v4 client crate used by the desktop board backend.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod validator;

pub use client::{Payload, WrikeClient};
pub use config::WrikeConfig;
pub use error::{Result, WrikeError};
pub use models::{
    resolve_custom_fields, resolve_workflow, status_change_update, Attachment,
    CustomFieldDefinition, CustomFieldValue, CustomStatus, Folder, Importance, Space, StatusGroup,
    Task, TaskCreate, TaskDates, TaskUpdate, User, Workflow,
};
pub use validator::{validate_token, ValidationOutcome};
