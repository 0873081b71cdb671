mod attachment;
mod custom_field;
mod envelope;
mod folder;
mod space;
mod task;
mod user;
mod workflow;

pub use attachment::Attachment;
pub use custom_field::{
    resolve_custom_fields, CustomFieldDefinition, CustomFieldOption, CustomFieldSettings,
    CustomFieldType,
};
pub use envelope::Envelope;
pub use folder::{Folder, ProjectInfo};
pub use space::Space;
pub use task::{
    CustomFieldValue, DateType, Importance, Task, TaskCreate, TaskDates, TaskUpdate,
};
pub use user::{User, UserProfile};
pub use workflow::{
    resolve_workflow, status_change_update, CustomStatus, StatusGroup, Workflow,
};
