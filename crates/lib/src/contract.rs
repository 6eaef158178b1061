//! # Structured Output Contracts
//!
//! The analyzer asks the model for JSON. The expected shape is described by a
//! versioned JSON Schema derived from the raw response types, sent along with
//! the prompt, and enforced again on the way back by deserializing into those
//! same types.

use crate::{errors::PromptError, providers::ai::AiProvider};
use regex::Regex;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// A named, versioned description of the JSON a model call must return.
#[derive(Debug, Clone)]
pub struct OutputContract {
    pub name: &'static str,
    pub version: u32,
    pub schema: Value,
}

impl OutputContract {
    /// Derives the contract schema from `T`.
    pub fn for_type<T: JsonSchema>(name: &'static str, version: u32) -> Self {
        let schema = serde_json::to_value(schemars::schema_for!(T)).unwrap_or_default();
        Self {
            name,
            version,
            schema,
        }
    }

    /// The output-format block appended to the user prompt.
    pub fn instruction(&self) -> String {
        let schema = serde_json::to_string_pretty(&self.schema).unwrap_or_default();
        format!(
            "# Output Format\nRespond ONLY with a single JSON object that conforms to the JSON Schema below (contract `{}` v{}). Do not wrap it in Markdown and do not add any other text.\n{}",
            self.name, self.version, schema
        )
    }
}

/// Pulls the JSON document out of a model response.
///
/// Models often wrap JSON in a fenced code block or add a sentence around it,
/// so this prefers the fenced body and otherwise takes the outermost object.
pub fn extract_json(raw: &str) -> Result<String, PromptError> {
    let re = Regex::new(r"```(?:json|JSON)?\s*([\s\S]*?)```")?;
    if let Some(body) = re.captures(raw).and_then(|caps| caps.get(1)) {
        return Ok(body.as_str().trim().to_string());
    }

    let trimmed = raw.trim();
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(trimmed[start..=end].to_string()),
        _ => Ok(trimmed.to_string()),
    }
}

/// Invokes the provider in JSON mode and decodes the response into `T`.
pub async fn invoke_structured<T: DeserializeOwned>(
    provider: &dyn AiProvider,
    contract: &OutputContract,
    system_prompt: &str,
    user_prompt: &str,
) -> Result<T, PromptError> {
    let user_prompt = format!("{user_prompt}\n\n{}", contract.instruction());
    debug!(contract = contract.name, "--> Sending structured request to AI provider");

    let raw_response = provider.generate_json(system_prompt, &user_prompt).await?;
    debug!("<-- Structured response from AI: {}", raw_response);

    let json = extract_json(&raw_response)?;
    serde_json::from_str(&json).map_err(|e| {
        warn!(contract = contract.name, "Response does not match contract: {e}");
        PromptError::MalformedResponse(format!("{} v{}: {e}", contract.name, contract.version))
    })
}
