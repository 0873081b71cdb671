use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level Wrike space. Read-only from this client.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
