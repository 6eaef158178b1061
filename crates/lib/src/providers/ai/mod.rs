pub mod gemini;
pub mod local;

use crate::errors::PromptError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with an AI provider.
///
/// This is the only way model output enters the system. Callers treat every
/// invocation as an opaque, fallible remote call.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a free-text response from a given system and user prompt.
    async fn generate(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, PromptError>;

    /// Generates a response that is expected to be a single JSON document.
    ///
    /// Providers with a native JSON response mode override this; the default
    /// relies on the prompt alone.
    async fn generate_json(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PromptError> {
        self.generate(system_prompt, user_prompt).await
    }
}

dyn_clone::clone_trait_object!(AiProvider);
