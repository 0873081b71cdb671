use serde::Deserialize;

/// Wrapper every Wrike response uses, even for single entities.
#[derive(Debug, Deserialize, Clone)]
pub struct Envelope<T> {
    #[serde(default)]
    pub kind: String,
    pub data: Vec<T>,
}
