//! Turns an option schema and the current selection into renderable controls.

use super::{schema::OptionSchema, selection::OptionSelection};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// One selectable value inside a control group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceView {
    pub value: String,
    pub label: String,
    pub selected: bool,
    /// Marks the analyzer's recommended value. Purely visual.
    pub recommended: bool,
}

/// A single-choice group for one option definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlGroup {
    pub key: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Why the analyzer suggested this dimension, if it said so.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// True when the current value equals the recommendation.
    pub on_recommended: bool,
    pub choices: Vec<ChoiceView>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub groups: Vec<ControlGroup>,
}

impl FormView {
    pub fn group(&self, key: &str) -> Option<&ControlGroup> {
        self.groups.iter().find(|g| g.key == key)
    }
}

/// Renders one control group per visible, well-formed definition.
///
/// Malformed definitions are skipped rather than failing the whole form.
/// Hidden definitions keep their selected value but produce no control.
pub fn render_form(
    schema: &OptionSchema,
    selection: &OptionSelection,
    reasons: &BTreeMap<String, String>,
) -> FormView {
    let groups = schema
        .visible_definitions()
        .filter_map(|definition| {
            if let Err(violation) = definition.check() {
                warn!("Not rendering option '{}': {violation}", definition.key);
                return None;
            }
            let current = selection
                .get(&definition.key)
                .filter(|value| definition.has_value(value))
                .unwrap_or(definition.default.as_str());
            let recommended = definition.recommended.as_deref();
            let choices = definition
                .values
                .iter()
                .map(|choice| ChoiceView {
                    value: choice.value.clone(),
                    label: choice.label.clone(),
                    selected: choice.value == current,
                    recommended: recommended == Some(choice.value.as_str()),
                })
                .collect();
            Some(ControlGroup {
                key: definition.key.clone(),
                label: definition.label.clone(),
                description: definition.description.clone(),
                reason: reasons.get(&definition.key).cloned(),
                on_recommended: recommended == Some(current),
                choices,
            })
        })
        .collect();

    FormView { groups }
}
