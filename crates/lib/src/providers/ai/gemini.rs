//! Google Gemini `generateContent` client.

use crate::{
    errors::PromptError,
    providers::{ai::AiProvider, http_client, DEFAULT_REQUEST_TIMEOUT},
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, time::Duration};
use tracing::{debug, warn};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: [Content<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: [TextPart<'a>; 1],
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Debug)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl<'a> Content<'a> {
    fn text(role: Option<&'static str>, text: &'a str) -> Self {
        Self {
            role,
            parts: [TextPart { text }],
        }
    }
}

impl GenerateContentResponse {
    /// Concatenates the parts of the first candidate; Gemini may split one answer.
    fn into_text(self) -> Result<String, PromptError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            warn!("Gemini blocked the prompt: {reason}");
            return Err(PromptError::AiApi(format!("prompt blocked: {reason}")));
        }
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| PromptError::AiApi("response contained no candidates".to_string()))?;
        Ok(candidate
            .content
            .map(|content| content.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default())
    }
}

/// A provider for the Google Gemini API.
#[derive(Clone, Debug)]
pub struct GeminiProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(api_url: String, api_key: String) -> Result<Self, PromptError> {
        Ok(Self {
            client: http_client(DEFAULT_REQUEST_TIMEOUT)?,
            api_url,
            api_key,
        })
    }

    /// Replaces the default request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, PromptError> {
        self.client = http_client(timeout)?;
        Ok(self)
    }

    async fn generate_content(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        generation_config: Option<GenerationConfig>,
    ) -> Result<String, PromptError> {
        let body = GenerateContentRequest {
            system_instruction: (!system_prompt.trim().is_empty())
                .then(|| Content::text(None, system_prompt)),
            contents: [Content::text(Some("user"), user_prompt)],
            generation_config,
        };

        debug!(api_url = %self.api_url, json = body.generation_config.is_some(), "--> Sending request to Gemini");
        let response = self
            .client
            .post(&self.api_url)
            .query(&[("key", &self.api_key)])
            .json(&body)
            .send()
            .await
            .map_err(PromptError::AiRequest)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(PromptError::AiApi(format!("{status}: {text}")));
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(PromptError::AiDeserialization)?
            .into_text()
    }
}

#[async_trait]
impl AiProvider for GeminiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PromptError> {
        self.generate_content(system_prompt, user_prompt, None).await
    }

    /// Uses Gemini's JSON response mode.
    async fn generate_json(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PromptError> {
        let config = GenerationConfig {
            response_mime_type: "application/json",
        };
        self.generate_content(system_prompt, user_prompt, Some(config))
            .await
    }
}
