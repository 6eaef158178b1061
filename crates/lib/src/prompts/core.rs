//! # Prompt Section Helpers
//!
//! Small builders that turn analysis data and option selections into the text
//! spliced into the task templates.

use crate::{
    errors::PromptError,
    options::{OptionSchema, OptionSelection, NOT_SPECIFIED},
};
use regex::{Captures, Regex};

/// Replaces each `{name}` placeholder of the template with its value.
///
/// Only the template is scanned, so braces inside substituted values are kept
/// verbatim. Placeholders without a matching variable are left as they are.
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> Result<String, PromptError> {
    let re = Regex::new(r"\{(\w+)\}")?;
    let rendered = re.replace_all(template, |caps: &Captures| {
        vars.iter()
            .find(|(name, _)| *name == &caps[1])
            .map_or_else(|| caps[0].to_string(), |(_, value)| value.to_string())
    });
    Ok(rendered.into_owned())
}

/// Joins analysis key points for inline use in a template.
pub fn format_key_points(key_points: &[String]) -> String {
    key_points
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// One `- Label: Choice` line per chosen option in schema order, skipping
/// `not_specified` and keys the schema does not declare.
pub fn preference_lines(schema: &OptionSchema, selection: &OptionSelection) -> Vec<String> {
    schema
        .definitions
        .iter()
        .filter_map(|definition| {
            let value = selection.get(&definition.key)?;
            if value == NOT_SPECIFIED {
                return None;
            }
            let label = definition.label_of(value).unwrap_or(value);
            Some(format!("- {}: {}", definition.label, label))
        })
        .collect()
}

/// The optional `# User preferences` section of the synthesis prompt.
///
/// Returns an empty string when every option is left unspecified.
pub fn preferences_section(schema: &OptionSchema, selection: &OptionSelection) -> String {
    let lines = preference_lines(schema, selection);
    if lines.is_empty() {
        String::new()
    } else {
        format!("\n# User preferences\n{}\n", lines.join("\n"))
    }
}
