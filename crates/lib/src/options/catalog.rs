//! The built-in table of answer-shaping dimensions used by the catalog strategy.

use super::schema::{OptionChoice, OptionDefinition, OptionSchema};
use std::collections::BTreeMap;
use tracing::debug;

type CatalogEntry = (&'static str, &'static str, &'static str, &'static [(&'static str, &'static str)]);

// key, label, default, values
const CATALOG: &[CatalogEntry] = &[
    (
        "tone",
        "Tone",
        "balanced",
        &[
            ("friendly", "Friendly and approachable"),
            ("balanced", "Balanced"),
            ("formal", "Formal and polite"),
            ("strict", "Strict and candid"),
        ],
    ),
    (
        "length",
        "Answer length",
        "medium",
        &[("short", "Short"), ("medium", "Medium"), ("long", "Long and detailed")],
    ),
    (
        "format",
        "Output format",
        "paragraph",
        &[("paragraph", "Prose"), ("bullet", "Bullet points"), ("step", "Step by step")],
    ),
    (
        "idea_count",
        "Number of ideas",
        "3",
        &[("1", "One"), ("3", "Three"), ("5", "Five"), ("10", "Ten")],
    ),
    (
        "depth",
        "Depth of thinking",
        "moderate",
        &[
            ("surface", "Surface level is fine"),
            ("moderate", "Moderate depth"),
            ("deep", "Dig deep"),
        ],
    ),
    (
        "examples",
        "Examples",
        "some",
        &[("none", "No examples"), ("some", "A few examples"), ("many", "Many examples")],
    ),
    (
        "risk_analysis",
        "Risk analysis",
        "balanced",
        &[
            ("none", "Not needed"),
            ("basic", "Basic risks only"),
            ("balanced", "Balanced"),
            ("comprehensive", "Comprehensive"),
        ],
    ),
    (
        "perspectives",
        "Range of perspectives",
        "multiple",
        &[
            ("single", "Single perspective"),
            ("multiple", "Multiple perspectives"),
            ("diverse", "Diverse perspectives"),
        ],
    ),
    (
        "audience_level",
        "Audience level",
        "general",
        &[("beginner", "Beginner"), ("general", "General"), ("expert", "Expert")],
    ),
    (
        "timeframe",
        "Time horizon",
        "comprehensive",
        &[
            ("immediate", "Act right now"),
            ("short_term", "Short term"),
            ("long_term", "Long term"),
            ("comprehensive", "All horizons"),
        ],
    ),
    (
        "practicality",
        "Practicality",
        "balanced",
        &[
            ("theoretical", "Theory first"),
            ("balanced", "Balanced"),
            ("highly_practical", "Practice first"),
        ],
    ),
];

/// The catalog keys in display order.
pub fn keys() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|(key, ..)| *key)
}

/// The full catalog with its baseline defaults and no recommendations.
pub fn catalog_schema() -> OptionSchema {
    let definitions = CATALOG
        .iter()
        .map(|(key, label, default, values)| OptionDefinition {
            key: key.to_string(),
            label: label.to_string(),
            description: None,
            values: values
                .iter()
                .map(|(value, label)| OptionChoice::new(*value, *label))
                .collect(),
            default: default.to_string(),
            recommended: None,
        })
        .collect();
    OptionSchema::new(definitions)
}

/// Applies analyzer recommendations and the relevant-subset list to the catalog.
///
/// A recommendation is kept only when both key and value are in the catalog;
/// it then also becomes the definition's default so the selection starts on
/// it. Unknown relevant keys are ignored, and an empty list shows everything.
pub fn with_recommendations(
    recommended: &BTreeMap<String, String>,
    relevant: &[String],
) -> OptionSchema {
    let mut schema = catalog_schema();
    for definition in &mut schema.definitions {
        match recommended.get(&definition.key) {
            Some(value) if definition.has_value(value) => {
                definition.recommended = Some(value.clone());
                definition.default = value.clone();
            }
            Some(value) => debug!(key = %definition.key, "Ignoring unknown recommendation '{value}'"),
            None => {}
        }
    }

    let mut visible: Vec<String> = Vec::new();
    for key in relevant {
        if schema.definition(key).is_some() && !visible.contains(key) {
            visible.push(key.clone());
        }
    }
    if !visible.is_empty() {
        schema.visible = Some(visible);
    }
    schema
}

/// A compact listing of the catalog for the analyzer prompt.
pub fn describe() -> String {
    CATALOG
        .iter()
        .map(|(key, label, _, values)| {
            let values = values
                .iter()
                .map(|(value, _)| *value)
                .collect::<Vec<_>>()
                .join(" / ");
            format!("- {key} ({label}): {values}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
