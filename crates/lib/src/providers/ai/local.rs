//! OpenAI-compatible chat completion client (LM Studio, Ollama, vLLM, ...).

use crate::{
    errors::PromptError,
    providers::{ai::AiProvider, http_client, DEFAULT_REQUEST_TIMEOUT},
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, time::Duration};
use tracing::debug;

const TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: u32 = 4096;

#[derive(Serialize)]
struct ChatRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize, Debug)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// `{"error": {"message": ...}}`, as most compatible servers report failures.
#[derive(Deserialize)]
struct ChatErrorBody {
    error: ChatErrorDetail,
}

#[derive(Deserialize)]
struct ChatErrorDetail {
    message: String,
}

impl<'a> ChatRequest<'a> {
    fn new(model: Option<&'a str>, system_prompt: &'a str, user_prompt: &'a str) -> Self {
        let mut messages = Vec::with_capacity(2);
        if !system_prompt.trim().is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: system_prompt,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: user_prompt,
        });
        Self {
            model,
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            stream: false,
        }
    }
}

/// Pulls the message out of an error body, falling back to the raw text.
fn error_message(body: String) -> String {
    serde_json::from_str::<ChatErrorBody>(&body)
        .map(|parsed| parsed.error.message)
        .unwrap_or(body)
}

/// A provider for a local or OpenAI-compatible chat completion endpoint.
#[derive(Clone, Debug)]
pub struct LocalAiProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
    model: Option<String>,
}

impl LocalAiProvider {
    pub fn new(
        api_url: String,
        api_key: Option<String>,
        model: Option<String>,
    ) -> Result<Self, PromptError> {
        Ok(Self {
            client: http_client(DEFAULT_REQUEST_TIMEOUT)?,
            api_url,
            api_key,
            model,
        })
    }

    /// Replaces the default request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, PromptError> {
        self.client = http_client(timeout)?;
        Ok(self)
    }
}

#[async_trait]
impl AiProvider for LocalAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PromptError> {
        let body = ChatRequest::new(self.model.as_deref(), system_prompt, user_prompt);

        let mut request = self.client.post(&self.api_url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        debug!(api_url = %self.api_url, model = ?self.model, "--> Sending chat completion request");
        let response = request.send().await.map_err(PromptError::AiRequest)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(PromptError::AiApi(format!("{status}: {}", error_message(text))));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(PromptError::AiDeserialization)?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| PromptError::AiApi("response contained no choices".to_string()))
    }
}
