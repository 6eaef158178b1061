use serde::{Deserialize, Serialize};

/// A reusable configuration for a specific AI provider instance.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    /// The type of provider (e.g., "gemini", "local").
    pub provider: String,
    /// The API URL. Optional for providers like Gemini where it can be derived.
    #[serde(default)]
    pub api_url: Option<String>,
    /// The API key, which can be null for local providers.
    #[serde(default)]
    pub api_key: Option<String>,
    pub model_name: String,
    /// Per-request timeout in seconds. Defaults to
    /// [`crate::providers::DEFAULT_REQUEST_TIMEOUT`].
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// The prompt pair sent for one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPrompts {
    pub system_prompt: String,
    pub user_prompt: String,
}

impl TaskPrompts {
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
        }
    }
}
