//! Workflow models and resolution of a task's workflow.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::task::{Task, TaskUpdate};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusGroup {
    #[default]
    Active,
    Completed,
    Deferred,
    Cancelled,
}

impl StatusGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusGroup::Active => "Active",
            StatusGroup::Completed => "Completed",
            StatusGroup::Deferred => "Deferred",
            StatusGroup::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomStatus {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub standard_name: bool,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub group: StatusGroup,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub standard: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub custom_statuses: Vec<CustomStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Workflow {
    pub fn status(&self, status_id: &str) -> Option<&CustomStatus> {
        self.custom_statuses.iter().find(|status| status.id == status_id)
    }
}

/// Picks the workflow owning `custom_status_id`. Orphaned or missing ids fall
/// back to the standard workflow, then to the first workflow.
pub fn resolve_workflow<'a>(
    workflows: &'a [Workflow],
    custom_status_id: Option<&str>,
) -> Option<&'a Workflow> {
    custom_status_id
        .and_then(|status_id| {
            workflows
                .iter()
                .find(|workflow| workflow.status(status_id).is_some())
        })
        .or_else(|| workflows.iter().find(|workflow| workflow.standard))
        .or_else(|| workflows.first())
}

/// Builds the update that moves `task` to `custom_status_id`. The standard
/// workflow is driven by status group; custom workflows by status id.
pub fn status_change_update(
    workflows: &[Workflow],
    task: &Task,
    custom_status_id: &str,
) -> TaskUpdate {
    let workflow = resolve_workflow(workflows, task.custom_status_id.as_deref());
    match workflow {
        Some(workflow) if workflow.standard => {
            let group = workflow
                .status(custom_status_id)
                .map(|status| status.group)
                .unwrap_or_default();
            TaskUpdate {
                status: Some(group.as_str().to_string()),
                ..TaskUpdate::default()
            }
        }
        _ => TaskUpdate {
            custom_status_id: Some(custom_status_id.to_string()),
            ..TaskUpdate::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn workflows() -> Vec<Workflow> {
        serde_json::from_value(json!([
            {"id": "w1", "standard": false, "customStatuses": [{"id": "s1"}]},
            {"id": "w2", "standard": true, "customStatuses": [
                {"id": "s2", "name": "New", "group": "Active"},
                {"id": "s3", "name": "Done", "group": "Completed"}
            ]}
        ]))
        .unwrap()
    }

    fn task_with_status(status_id: Option<&str>) -> Task {
        serde_json::from_value(json!({
            "id": "T1",
            "title": "Task",
            "customStatusId": status_id
        }))
        .unwrap()
    }

    #[test]
    fn unmodelled_status_fields_are_relayed() {
        let workflow: Workflow = serde_json::from_value(json!({
            "id": "w1",
            "name": "Default",
            "standard": true,
            "customStatuses": [{"id": "s1", "name": "New", "group": "Active", "hidden": false}]
        }))
        .unwrap();
        let back = serde_json::to_value(&workflow).unwrap();
        assert_eq!(back["customStatuses"][0]["hidden"], false);
        assert_eq!(back["customStatuses"][0]["group"], "Active");
    }

    #[test]
    fn orphaned_status_falls_back_to_standard_workflow() {
        let workflows = workflows();
        let resolved = resolve_workflow(&workflows, Some("sX")).map(|w| w.id.as_str());
        assert_eq!(resolved, Some("w2"));
    }

    #[test]
    fn matching_status_selects_owning_workflow() {
        let workflows = workflows();
        let resolved = resolve_workflow(&workflows, Some("s1")).map(|w| w.id.as_str());
        assert_eq!(resolved, Some("w1"));
    }

    #[test]
    fn without_standard_workflow_first_one_wins() {
        let mut workflows = workflows();
        workflows[1].standard = false;
        let resolved = resolve_workflow(&workflows, None).map(|w| w.id.as_str());
        assert_eq!(resolved, Some("w1"));
        assert!(resolve_workflow(&[], Some("s1")).is_none());
    }

    #[test]
    fn standard_workflow_changes_status_group() {
        let workflows = workflows();
        let update = status_change_update(&workflows, &task_with_status(Some("s2")), "s3");
        assert_eq!(update.status.as_deref(), Some("Completed"));
        assert_eq!(update.custom_status_id, None);
    }

    #[test]
    fn custom_workflow_changes_status_id() {
        let workflows = workflows();
        let update = status_change_update(&workflows, &task_with_status(Some("s1")), "s1");
        assert_eq!(update.custom_status_id.as_deref(), Some("s1"));
        assert_eq!(update.status, None);
    }
}
