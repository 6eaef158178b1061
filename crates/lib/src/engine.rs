//! # PromptPerfector
//!
//! Runs the model-backed transitions of a [`Workflow`]. The workflow lock is
//! taken to begin and to finish a transition, never across a model call.

use crate::{
    analysis::QuestionAnalyzer,
    synthesis::PromptSynthesizer,
    workflow::Workflow,
};
use tokio::sync::Mutex;
use tracing::info;

#[derive(Clone, Debug)]
pub struct PromptPerfector {
    analyzer: QuestionAnalyzer,
    synthesizer: PromptSynthesizer,
}

impl PromptPerfector {
    pub fn new(analyzer: QuestionAnalyzer, synthesizer: PromptSynthesizer) -> Self {
        Self {
            analyzer,
            synthesizer,
        }
    }

    pub fn analyzer(&self) -> &QuestionAnalyzer {
        &self.analyzer
    }

    pub fn synthesizer(&self) -> &PromptSynthesizer {
        &self.synthesizer
    }

    /// `input → options`. Returns whether an outcome was applied.
    pub async fn analyze(&self, workflow: &Mutex<Workflow>) -> bool {
        let Some(request) = workflow.lock().await.begin_analyze() else {
            return false;
        };
        let outcome = self.analyzer.analyze(&request.question).await;
        workflow.lock().await.finish_analyze(request.ticket, outcome)
    }

    /// `input → result`, generating from the analysis defaults.
    pub async fn quick_generate(&self, workflow: &Mutex<Workflow>) -> bool {
        let Some(request) = workflow.lock().await.begin_quick_generate() else {
            return false;
        };
        let outcome = match self.analyzer.analyze(&request.question).await {
            Ok(analysis) => {
                info!("Quick generate: synthesizing from default options");
                let selection = analysis.initial_selection();
                self.synthesizer
                    .synthesize(&request.question, &analysis, &selection)
                    .await
                    .map(|prompt| (analysis, prompt))
            }
            Err(e) => Err(e),
        };
        workflow
            .lock()
            .await
            .finish_quick_generate(request.ticket, outcome)
    }

    /// `options → result`.
    pub async fn generate(&self, workflow: &Mutex<Workflow>) -> bool {
        let Some(request) = workflow.lock().await.begin_generate() else {
            return false;
        };
        let outcome = self
            .synthesizer
            .synthesize(&request.question, &request.analysis, &request.selection)
            .await;
        workflow.lock().await.finish_generate(request.ticket, outcome)
    }
}
