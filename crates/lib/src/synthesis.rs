//! # Prompt Synthesizer
//!
//! Turns a question, its analysis, and the user's option selection into the
//! optimized prompt. The model output is returned as is.

use crate::{
    analysis::AnalysisResult,
    errors::PromptError,
    history::{record_in_background, HistoryRecord, HistorySink},
    options::OptionSelection,
    prompts::{
        core::{format_key_points, preferences_section, render_template},
        tasks::{PROMPT_SYNTHESIS_SYSTEM_PROMPT, PROMPT_SYNTHESIS_USER_PROMPT},
    },
    providers::ai::AiProvider,
    types::TaskPrompts,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};

/// Proxy for the synthesis call to the model.
#[derive(Clone, Debug)]
pub struct PromptSynthesizer {
    provider: Box<dyn AiProvider>,
    prompts: TaskPrompts,
    history: Arc<dyn HistorySink>,
}

impl PromptSynthesizer {
    pub fn new(provider: Box<dyn AiProvider>, history: Arc<dyn HistorySink>) -> Self {
        Self {
            provider,
            prompts: TaskPrompts::new(PROMPT_SYNTHESIS_SYSTEM_PROMPT, PROMPT_SYNTHESIS_USER_PROMPT),
            history,
        }
    }

    pub fn with_prompts(mut self, prompts: TaskPrompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Renders the system and user prompt for one synthesis call.
    pub fn build_prompts(
        &self,
        question: &str,
        analysis: &AnalysisResult,
        selection: &OptionSelection,
    ) -> Result<TaskPrompts, PromptError> {
        let key_points = format_key_points(&analysis.key_points);
        let preferences = preferences_section(&analysis.schema, selection);
        let user_prompt = render_template(
            &self.prompts.user_prompt,
            &[
                ("question", question),
                ("question_type", &analysis.question_type),
                ("persona", &analysis.persona),
                ("method", &analysis.method),
                ("key_points", &key_points),
                ("context", &analysis.context),
                ("preferences", &preferences),
            ],
        )?;
        Ok(TaskPrompts::new(
            self.prompts.system_prompt.clone(),
            user_prompt,
        ))
    }

    /// Generates the optimized prompt and records it in the history store.
    ///
    /// Any provider failure, or an empty answer, becomes
    /// [`PromptError::SynthesisFailed`].
    pub async fn synthesize(
        &self,
        question: &str,
        analysis: &AnalysisResult,
        selection: &OptionSelection,
    ) -> Result<String, PromptError> {
        let prompts = self.build_prompts(question, analysis, selection).map_err(|e| {
            error!("Failed to render the synthesis prompt: {e}");
            PromptError::SynthesisFailed
        })?;
        info!(persona = %analysis.persona, method = %analysis.method, "Synthesizing prompt");

        let optimized = self
            .provider
            .generate(&prompts.system_prompt, &prompts.user_prompt)
            .await
            .map_err(|e| {
                error!("Prompt synthesis failed: {e}");
                PromptError::SynthesisFailed
            })?;
        if optimized.trim().is_empty() {
            error!("Prompt synthesis returned an empty prompt");
            return Err(PromptError::SynthesisFailed);
        }

        record_in_background(
            self.history.clone(),
            HistoryRecord {
                original_question: question.to_string(),
                optimized_prompt: optimized.clone(),
                options: selection.as_map().clone(),
                persona: analysis.persona.clone(),
                method: analysis.method.clone(),
                created_at: Utc::now(),
            },
        );
        Ok(optimized)
    }
}
