use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::RangeInclusive;
use thiserror::Error;
use tracing::warn;

/// The catch-all value meaning "leave this dimension to the model".
pub const NOT_SPECIFIED: &str = "not_specified";
/// The catch-all value for anything the listed choices do not cover.
pub const OTHER: &str = "other";
/// The dimension every dynamic schema must carry with a concrete default.
pub const LOGIC_STRUCTURE: &str = "logic_structure";
/// Version of the option-schema contract exchanged with the analyzer.
pub const SCHEMA_VERSION: u32 = 1;

/// Allowed number of definitions in a dynamic schema.
pub const DYNAMIC_DEFINITIONS: RangeInclusive<usize> = 3..=8;
/// Allowed number of choices per dynamic definition.
pub const DYNAMIC_CHOICES: RangeInclusive<usize> = 3..=7;

/// Reasons an option definition or schema is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    #[error("option key is empty")]
    EmptyKey,
    #[error("option '{0}' declares no values")]
    NoValues(String),
    #[error("option '{0}' declares an empty value")]
    EmptyValue(String),
    #[error("option '{key}' declares value '{value}' more than once")]
    DuplicateValue { key: String, value: String },
    #[error("default '{value}' of option '{key}' is not a declared value")]
    UndeclaredDefault { key: String, value: String },
    #[error("recommended '{value}' of option '{key}' is not a declared value")]
    UndeclaredRecommendation { key: String, value: String },
    #[error("option '{key}' has {count} choices, expected 3 to 7")]
    ChoiceCount { key: String, count: usize },
    #[error("option '{key}' is missing the '{value}' choice")]
    MissingCatchAll { key: String, value: &'static str },
    #[error("duplicate option key '{0}'")]
    DuplicateKey(String),
    #[error("schema has {0} options, expected 3 to 8")]
    DefinitionCount(usize),
    #[error("schema has no '{LOGIC_STRUCTURE}' option with a concrete default")]
    MissingLogicStructure,
}

// --- Contract-side (raw) definitions ---

/// One selectable value as the analyzer returns it.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct RawOptionChoice {
    pub value: String,
    #[serde(default)]
    pub label: String,
}

/// One option definition as the analyzer returns it, before validation.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct RawOptionDefinition {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    pub values: Vec<RawOptionChoice>,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub recommended: Option<String>,
}

// --- Validated definitions ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionChoice {
    pub value: String,
    pub label: String,
}

impl OptionChoice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A single-choice, answer-shaping dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDefinition {
    pub key: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub values: Vec<OptionChoice>,
    pub default: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended: Option<String>,
}

impl OptionDefinition {
    pub fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|choice| choice.value == value)
    }

    /// The human label of `value`, if it is declared.
    pub fn label_of(&self, value: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|choice| choice.value == value)
            .map(|choice| choice.label.as_str())
    }

    /// Checks the invariants every definition must satisfy.
    pub fn check(&self) -> Result<(), SchemaViolation> {
        if self.key.trim().is_empty() {
            return Err(SchemaViolation::EmptyKey);
        }
        if self.values.is_empty() {
            return Err(SchemaViolation::NoValues(self.key.clone()));
        }
        let mut seen = HashSet::new();
        for choice in &self.values {
            if choice.value.trim().is_empty() {
                return Err(SchemaViolation::EmptyValue(self.key.clone()));
            }
            if !seen.insert(choice.value.as_str()) {
                return Err(SchemaViolation::DuplicateValue {
                    key: self.key.clone(),
                    value: choice.value.clone(),
                });
            }
        }
        if !self.has_value(&self.default) {
            return Err(SchemaViolation::UndeclaredDefault {
                key: self.key.clone(),
                value: self.default.clone(),
            });
        }
        if let Some(recommended) = &self.recommended {
            if !self.has_value(recommended) {
                return Err(SchemaViolation::UndeclaredRecommendation {
                    key: self.key.clone(),
                    value: recommended.clone(),
                });
            }
        }
        Ok(())
    }

    /// Adds the constraints placed on analyzer-generated definitions.
    pub fn check_dynamic(&self) -> Result<(), SchemaViolation> {
        self.check()?;
        if !DYNAMIC_CHOICES.contains(&self.values.len()) {
            return Err(SchemaViolation::ChoiceCount {
                key: self.key.clone(),
                count: self.values.len(),
            });
        }
        for catch_all in [NOT_SPECIFIED, OTHER] {
            if !self.has_value(catch_all) {
                return Err(SchemaViolation::MissingCatchAll {
                    key: self.key.clone(),
                    value: catch_all,
                });
            }
        }
        Ok(())
    }

    fn from_raw(raw: RawOptionDefinition) -> Self {
        let values = raw
            .values
            .into_iter()
            .map(|choice| {
                let value = choice.value.trim().to_string();
                let label = if choice.label.trim().is_empty() {
                    value.clone()
                } else {
                    choice.label
                };
                OptionChoice { value, label }
            })
            .collect();
        Self {
            key: raw.key.trim().to_string(),
            label: raw.label,
            description: raw.description.filter(|d| !d.trim().is_empty()),
            values,
            default: raw
                .default
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            recommended: raw
                .recommended
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
        }
    }
}

/// An ordered set of option definitions, optionally restricted to a visible subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSchema {
    pub version: u32,
    pub definitions: Vec<OptionDefinition>,
    /// Keys shown to the user. `None` shows every definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<Vec<String>>,
}

impl OptionSchema {
    pub fn new(definitions: Vec<OptionDefinition>) -> Self {
        Self {
            version: SCHEMA_VERSION,
            definitions,
            visible: None,
        }
    }

    pub fn definition(&self, key: &str) -> Option<&OptionDefinition> {
        self.definitions.iter().find(|d| d.key == key)
    }

    pub fn is_visible(&self, key: &str) -> bool {
        match &self.visible {
            Some(keys) => keys.iter().any(|k| k == key),
            None => true,
        }
    }

    /// Visible definitions in schema order.
    pub fn visible_definitions(&self) -> impl Iterator<Item = &OptionDefinition> {
        self.definitions.iter().filter(|d| self.is_visible(&d.key))
    }

    /// Checks every definition and key uniqueness.
    pub fn validate(&self) -> Result<(), SchemaViolation> {
        let mut keys = HashSet::new();
        for definition in &self.definitions {
            definition.check()?;
            if !keys.insert(definition.key.as_str()) {
                return Err(SchemaViolation::DuplicateKey(definition.key.clone()));
            }
        }
        Ok(())
    }

    /// Checks the whole-schema constraints of an analyzer-generated schema.
    pub fn check_dynamic(&self) -> Result<(), SchemaViolation> {
        self.validate()?;
        for definition in &self.definitions {
            definition.check_dynamic()?;
        }
        if !DYNAMIC_DEFINITIONS.contains(&self.definitions.len()) {
            return Err(SchemaViolation::DefinitionCount(self.definitions.len()));
        }
        let has_logic_structure = self
            .definition(LOGIC_STRUCTURE)
            .is_some_and(|d| d.default != NOT_SPECIFIED);
        if !has_logic_structure {
            return Err(SchemaViolation::MissingLogicStructure);
        }
        Ok(())
    }

    /// Normalizes analyzer-generated definitions into a validated schema.
    ///
    /// Individually malformed or duplicate definitions are skipped. A
    /// recommendation that is not a declared value is dropped. The remaining
    /// schema must satisfy [`OptionSchema::check_dynamic`].
    pub fn from_dynamic(raw: Vec<RawOptionDefinition>) -> Result<Self, SchemaViolation> {
        let mut definitions: Vec<OptionDefinition> = Vec::with_capacity(raw.len());
        for raw_definition in raw {
            let mut definition = OptionDefinition::from_raw(raw_definition);
            if let Some(recommended) = &definition.recommended {
                if !definition.has_value(recommended) {
                    warn!(
                        key = %definition.key,
                        "Dropping undeclared recommended value '{recommended}'"
                    );
                    definition.recommended = None;
                }
            }
            if let Err(violation) = definition.check_dynamic() {
                warn!("Skipping malformed option definition: {violation}");
                continue;
            }
            if definitions.iter().any(|d| d.key == definition.key) {
                warn!("Skipping duplicate option definition '{}'", definition.key);
                continue;
            }
            definitions.push(definition);
        }

        let schema = Self::new(definitions);
        schema.check_dynamic()?;
        Ok(schema)
    }
}
