use super::schema::OptionSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The user's chosen value for each option key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSelection(BTreeMap<String, String>);

impl OptionSelection {
    /// Starts every definition, visible or not, on its default.
    pub fn from_defaults(schema: &OptionSchema) -> Self {
        Self(
            schema
                .definitions
                .iter()
                .map(|d| (d.key.clone(), d.default.clone()))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Sets `key` to `value` if the schema declares both.
    ///
    /// Returns `true` when the selection changed. No other key is touched.
    pub fn select(&mut self, schema: &OptionSchema, key: &str, value: &str) -> bool {
        let Some(definition) = schema.definition(key) else {
            return false;
        };
        if !definition.has_value(value) || self.get(key) == Some(value) {
            return false;
        }
        self.0.insert(key.to_string(), value.to_string());
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

impl From<BTreeMap<String, String>> for OptionSelection {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}
