//! Custom field definitions and their association with task values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::task::{CustomFieldValue, Task};

/// Field kinds the board renders specially. Anything else is `Other` and is
/// shown as plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomFieldType {
    Text,
    Numeric,
    Currency,
    Date,
    DropDown,
    Multiple,
    Other,
}

impl CustomFieldType {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Text" => CustomFieldType::Text,
            "Numeric" => CustomFieldType::Numeric,
            "Currency" => CustomFieldType::Currency,
            "Date" => CustomFieldType::Date,
            "DropDown" => CustomFieldType::DropDown,
            "Multiple" => CustomFieldType::Multiple,
            _ => CustomFieldType::Other,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldDefinition {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Raw type name as sent by Wrike; see [`CustomFieldDefinition::field_type`].
    #[serde(rename = "type", default)]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<CustomFieldSettings>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CustomFieldDefinition {
    pub fn field_type(&self) -> CustomFieldType {
        CustomFieldType::from_name(&self.type_name)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_places: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CustomFieldOption>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CustomFieldOption {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Pairs each task value with its definition, in task order. Values whose
/// definition is unknown are skipped here but stay on the task.
pub fn resolve_custom_fields<'a>(
    task: &'a Task,
    definitions: &'a [CustomFieldDefinition],
) -> Vec<(&'a CustomFieldDefinition, &'a CustomFieldValue)> {
    task.custom_fields
        .iter()
        .filter_map(|value| {
            definitions
                .iter()
                .find(|definition| definition.id == value.id)
                .map(|definition| (definition, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn orphaned_values_are_skipped_but_preserved() {
        let definitions: Vec<CustomFieldDefinition> = serde_json::from_value(json!([
            {"id": "CF1", "title": "Budget", "type": "Currency",
             "settings": {"decimalPlaces": 2, "currencySymbol": "$"}},
            {"id": "CF2", "title": "Stage", "type": "DropDown",
             "settings": {"options": [{"id": "o1", "value": "Alpha", "color": "Red"}]}}
        ]))
        .unwrap();
        let task: Task = serde_json::from_value(json!({
            "id": "T1",
            "title": "Plan",
            "customFields": [
                {"id": "CF2", "value": "Alpha"},
                {"id": "CF-gone", "value": "x"},
                {"id": "CF1", "value": "10.50"}
            ]
        }))
        .unwrap();

        let resolved = resolve_custom_fields(&task, &definitions);
        let titles: Vec<&str> = resolved.iter().map(|(def, _)| def.title.as_str()).collect();
        assert_eq!(titles, vec!["Stage", "Budget"]);
        assert_eq!(resolved[1].1.value, "10.50");
        assert_eq!(task.custom_fields.len(), 3);
        assert_eq!(
            definitions[0].settings.as_ref().and_then(|s| s.currency_symbol.as_deref()),
            Some("$")
        );
        assert_eq!(definitions[1].field_type(), CustomFieldType::DropDown);
    }

    #[test]
    fn unlisted_field_types_decode_and_keep_their_name() {
        let definitions: Vec<CustomFieldDefinition> = serde_json::from_value(json!([
            {"id": "CF1", "title": "Estimate", "type": "Numeric"},
            {"id": "CF2", "title": "Approved", "type": "Checkbox", "spaceId": "SP1"},
            {"id": "CF3", "title": "Stage", "type": "DropDown",
             "settings": {"options": [{"id": "o1"}], "inheritanceType": "All"}}
        ]))
        .unwrap();

        assert_eq!(definitions[0].field_type(), CustomFieldType::Numeric);
        assert_eq!(definitions[1].field_type(), CustomFieldType::Other);
        assert_eq!(definitions[2].settings.as_ref().unwrap().options[0].value, "");

        let back = serde_json::to_value(&definitions).unwrap();
        assert_eq!(back[1]["type"], "Checkbox");
        assert_eq!(back[1]["spaceId"], "SP1");
        assert_eq!(back[2]["settings"]["inheritanceType"], "All");
    }
}
