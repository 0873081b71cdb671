//! Task models and the create/update payloads accepted by the task endpoints.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum Importance {
    High,
    #[default]
    Normal,
    Low,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum DateType {
    Planned,
    Milestone,
    Backlog,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct TaskDates {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub date_type: Option<DateType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

/// Value slot of a custom field on a task; matched to its definition by `id`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CustomFieldValue {
    pub id: String,
    #[serde(default)]
    pub value: String,
}

/// Represents a Wrike task. Fields not modelled here are kept in `extra` so the
/// payload forwarded to the board is what the server sent.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brief_description: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_status_id: Option<String>,
    #[serde(default)]
    pub importance: Importance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<TaskDates>,
    #[serde(default)]
    pub custom_fields: Vec<CustomFieldValue>,
    #[serde(default, deserialize_with = "deserialize_id_set")]
    pub responsible_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    pub fn is_responsible(&self, user_id: &str) -> bool {
        self.responsible_ids.iter().any(|id| id == user_id)
    }

    pub fn custom_field(&self, field_id: &str) -> Option<&CustomFieldValue> {
        self.custom_fields.iter().find(|field| field.id == field_id)
    }
}

/// Body of `POST /folders/{id}/tasks`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreate {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_status_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<Importance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<TaskDates>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub responsibles: Vec<String>,
}

/// Partial update for `PUT /tasks/{id}`: only fields that are set are sent.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_status_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<Importance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<TaskDates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_responsibles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_responsibles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Vec<CustomFieldValue>>,
}

fn deserialize_id_set<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let ids = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    let mut seen = HashSet::new();
    Ok(ids.into_iter().filter(|id| seen.insert(id.clone())).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn responsible_ids_are_deduplicated_in_order() {
        let task: Task = serde_json::from_value(json!({
            "id": "T1",
            "title": "Write docs",
            "responsibleIds": ["U2", "U1", "U2", "U3", "U1"]
        }))
        .unwrap();
        assert_eq!(task.responsible_ids, vec!["U2", "U1", "U3"]);
        assert!(task.is_responsible("U3"));
        assert!(!task.is_responsible("U4"));
    }

    #[test]
    fn unknown_fields_and_custom_fields_round_trip() {
        let raw = json!({
            "id": "T1",
            "title": "Ship",
            "status": "Active",
            "importance": "High",
            "customStatusId": "S1",
            "customFields": [{"id": "CF-orphan", "value": "42"}],
            "dates": {"type": "Planned", "start": "2024-01-01", "due": "2024-01-05", "duration": 2400},
            "subTaskIds": ["T2"],
            "hasAttachments": true
        });
        let task: Task = serde_json::from_value(raw).unwrap();
        assert_eq!(task.importance, Importance::High);
        assert_eq!(task.custom_field("CF-orphan").map(|f| f.value.as_str()), Some("42"));
        assert_eq!(
            task.dates.as_ref().and_then(|d| d.date_type),
            Some(DateType::Planned)
        );

        let back = serde_json::to_value(&task).unwrap();
        assert_eq!(back["subTaskIds"][0], "T2");
        assert_eq!(back["hasAttachments"], true);
        assert_eq!(back["customFields"][0]["id"], "CF-orphan");
    }

    #[test]
    fn update_serializes_only_provided_fields() {
        let update = TaskUpdate {
            title: Some("Renamed".into()),
            add_responsibles: Some(vec!["U1".into()]),
            ..TaskUpdate::default()
        };
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body, json!({"title": "Renamed", "addResponsibles": ["U1"]}));
    }

    #[test]
    fn update_accepts_dates_without_type() {
        let update: TaskUpdate =
            serde_json::from_value(json!({"dates": {"start": "2024-02-01", "due": "2024-02-03"}}))
                .unwrap();
        let dates = update.dates.unwrap();
        assert_eq!(dates.date_type, None);
        assert_eq!(dates.due.as_deref(), Some("2024-02-03"));
    }
}
