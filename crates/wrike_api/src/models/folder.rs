use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Folder or project container holding tasks.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub child_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectInfo>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Status block present when the folder is a project.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(default)]
    pub owner_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::Folder;

    #[test]
    fn project_block_and_unknown_fields_survive() {
        let raw = r#"{
            "id": "F1",
            "title": "Launch",
            "childIds": ["F2"],
            "scope": "WsFolder",
            "project": {"authorId": "U1", "ownerIds": ["U1"], "status": "Green"},
            "color": "Blue"
        }"#;
        let folder: Folder = serde_json::from_str(raw).unwrap();
        assert_eq!(folder.child_ids, vec!["F2"]);
        assert_eq!(
            folder.project.as_ref().and_then(|p| p.status.as_deref()),
            Some("Green")
        );

        let back = serde_json::to_value(&folder).unwrap();
        assert_eq!(back["color"], "Blue");
        assert_eq!(back["project"]["ownerIds"][0], "U1");
    }
}
