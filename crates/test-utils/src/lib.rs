use promptplus::errors::PromptError;
use promptplus::providers::ai::AiProvider;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Substring of both default analysis system prompts.
pub const ANALYSIS_PROMPT_KEY: &str = "question analyst";
/// Substring of the default synthesis system prompt.
pub const SYNTHESIS_PROMPT_KEY: &str = "prompt engineer";

pub const PITCH_QUESTION: &str = "How should I pitch an idea to my boss?";

// --- Mock AI Provider ---

#[derive(Clone, Debug)]
enum Programmed {
    Reply(String),
    Failure(String),
}

#[derive(Clone, Debug)]
pub struct MockAiProvider {
    responses: Arc<Mutex<HashMap<String, Programmed>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Pre-programs a response for a specific prompt.
    /// The key should be a unique substring of the system prompt.
    pub fn add_response(&self, key: &str, response: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(key.to_string(), Programmed::Reply(response.to_string()));
    }

    /// Makes every call whose system prompt contains `key` fail.
    pub fn add_failure(&self, key: &str, message: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(key.to_string(), Programmed::Failure(message.to_string()));
    }

    /// Retrieves the recorded calls for assertion.
    pub fn get_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// The recorded calls whose system prompt contains `key`.
    pub fn calls_matching(&self, key: &str) -> Vec<(String, String)> {
        self.get_calls()
            .into_iter()
            .filter(|(system, _)| system.contains(key))
            .collect()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PromptError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push((system_prompt.to_string(), user_prompt.to_string()));

        let responses = self.responses.lock().unwrap();
        for (key, programmed) in responses.iter() {
            if system_prompt.contains(key) {
                return match programmed {
                    Programmed::Reply(response) => Ok(response.clone()),
                    Programmed::Failure(message) => Err(PromptError::AiApi(message.clone())),
                };
            }
        }

        Err(PromptError::AiApi(format!(
            "MockAiProvider: No response programmed for system prompt. Got: '{system_prompt}'"
        )))
    }
}

// --- Scripted AI Provider ---

/// One reply of a [`ScriptedAiProvider`], consumed in call order.
#[derive(Clone, Debug)]
pub enum ScriptedReply {
    Text(String),
    Fail,
}

pub fn text(s: &str) -> ScriptedReply {
    ScriptedReply::Text(s.to_string())
}

/// Answers calls in order from a script, optionally after a delay.
/// Once the script runs out, every call gets a fixed default answer.
#[derive(Clone, Debug)]
pub struct ScriptedAiProvider {
    replies: Arc<Mutex<Vec<ScriptedReply>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
    delay: Option<Duration>,
}

impl ScriptedAiProvider {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().rev().collect())),
            calls: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for ScriptedAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PromptError> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.replies.lock().unwrap().pop();
        match next {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::Fail) => {
                Err(PromptError::AiApi("simulated network error".to_string()))
            }
            None => Ok("Default mock response".to_string()),
        }
    }
}

// --- Analyzer response fixtures ---

pub mod fixtures {
    use super::*;

    /// A dynamic option definition with the two catch-all choices appended.
    pub fn option_definition(key: &str, label: &str, values: &[(&str, &str)], default: &str) -> Value {
        let mut choices: Vec<Value> = values
            .iter()
            .map(|(value, label)| json!({ "value": value, "label": label }))
            .collect();
        choices.push(json!({ "value": "not_specified", "label": "Not specified" }));
        choices.push(json!({ "value": "other", "label": "Other" }));
        json!({ "key": key, "label": label, "values": choices, "default": default })
    }

    /// A conforming dynamic analysis for [`PITCH_QUESTION`].
    pub fn dynamic_analysis() -> Value {
        json!({
            "persona": "Management Consultant",
            "method": "PREP",
            "key_points": ["clarity", "timing", "audience"],
            "context": "Pitching an idea to a manager at work",
            "question_type": "business",
            "custom_options": [
                option_definition(
                    "logic_structure",
                    "Logic structure",
                    &[("prep", "PREP method"), ("swot", "SWOT analysis")],
                    "prep",
                ),
                option_definition(
                    "tone",
                    "Tone",
                    &[("formal", "Formal"), ("friendly", "Friendly")],
                    "not_specified",
                ),
                option_definition(
                    "audience",
                    "Audience",
                    &[("executive", "Executive"), ("team_lead", "Team lead")],
                    "executive",
                ),
            ],
            "option_reasons": {
                "logic_structure": "PREP keeps a pitch short and persuasive",
                "audience": "The question mentions a boss"
            }
        })
    }

    /// A conforming catalog analysis for [`PITCH_QUESTION`].
    pub fn catalog_analysis() -> Value {
        json!({
            "persona": "Management Consultant",
            "method": "PREP",
            "key_points": ["clarity", "timing", "audience"],
            "context": "Pitching an idea to a manager at work",
            "question_type": "business",
            "recommended_options": { "tone": "formal", "length": "short" },
            "relevant_options": ["tone", "length", "format"],
            "option_reasons": { "tone": "A boss expects a formal register" }
        })
    }

    /// An analysis that is valid JSON but misses `custom_options`.
    pub fn non_conforming_analysis() -> Value {
        json!({
            "persona": "Management Consultant",
            "method": "PREP",
            "key_points": [],
            "context": "",
            "question_type": "business"
        })
    }
}
