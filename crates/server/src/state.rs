//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. The `AppState` holds the workflow engine wired
//! to its AI providers and the live sessions.

use crate::{config::AppConfig, sessions::SessionStore};
use promptplus::{
    analysis::QuestionAnalyzer,
    history::{HistorySink, HttpHistorySink, LogHistorySink},
    prompts::tasks::PROMPT_SYNTHESIS_TASK,
    providers::{ai::AiProvider, factory::create_provider},
    PromptPerfector, PromptSynthesizer, TaskPrompts,
};
use std::{collections::HashMap, sync::Arc, time::Duration};
use tracing::info;

/// A fully resolved task configuration with non-optional fields.
#[derive(Clone, Debug)]
pub struct ResolvedTask {
    pub provider: String,
    pub system_prompt: String,
    pub user_prompt: String,
}

impl ResolvedTask {
    pub fn prompts(&self) -> TaskPrompts {
        TaskPrompts::new(self.system_prompt.clone(), self.user_prompt.clone())
    }
}

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Analyzer and synthesizer, ready to drive any session.
    pub perfector: Arc<PromptPerfector>,
    /// One workflow per browser session.
    pub sessions: SessionStore,
}

impl AppState {
    /// Assembles a state around an already wired engine.
    pub fn new(perfector: PromptPerfector, sessions: SessionStore) -> Self {
        Self {
            perfector: Arc::new(perfector),
            sessions,
        }
    }
}

/// Validates every configured task and fills in its provider and prompts.
pub fn resolve_tasks(config: &AppConfig) -> anyhow::Result<HashMap<String, ResolvedTask>> {
    let mut resolved_tasks = HashMap::new();
    for (name, task_config) in &config.tasks {
        let provider = task_config.provider.clone().ok_or_else(|| {
            anyhow::anyhow!("Resolved task '{name}' is missing required 'provider' field")
        })?;
        let system_prompt = task_config.system_prompt.clone().ok_or_else(|| {
            anyhow::anyhow!("Resolved task '{name}' is missing required 'system_prompt' field")
        })?;
        let user_prompt = task_config.user_prompt.clone().ok_or_else(|| {
            anyhow::anyhow!("Resolved task '{name}' is missing required 'user_prompt' field")
        })?;

        resolved_tasks.insert(
            name.clone(),
            ResolvedTask {
                provider,
                system_prompt,
                user_prompt,
            },
        );
    }
    Ok(resolved_tasks)
}

fn provider_for<'a>(
    providers: &'a HashMap<String, Box<dyn AiProvider>>,
    tasks: &'a HashMap<String, ResolvedTask>,
    task_name: &str,
) -> anyhow::Result<(&'a ResolvedTask, Box<dyn AiProvider>)> {
    let task = tasks
        .get(task_name)
        .ok_or_else(|| anyhow::anyhow!("Task '{task_name}' is not configured"))?;
    let provider = providers.get(&task.provider).ok_or_else(|| {
        anyhow::anyhow!(
            "Provider '{}' for task '{task_name}' not found in providers map",
            task.provider
        )
    })?;
    Ok((task, provider.clone()))
}

fn history_sink(config: &AppConfig) -> anyhow::Result<Arc<dyn HistorySink>> {
    let endpoint = config.history.endpoint.clone().filter(|e| !e.is_empty());
    let api_key = config.history.api_key.clone().filter(|k| !k.is_empty());
    let sink: Arc<dyn HistorySink> = match endpoint {
        Some(endpoint) => {
            info!("Recording prompt history to {endpoint}");
            Arc::new(HttpHistorySink::new(endpoint, api_key)?)
        }
        None => {
            info!("No history endpoint configured; prompt history is only logged.");
            Arc::new(LogHistorySink)
        }
    };
    Ok(sink)
}

/// Builds the shared application state from the configuration.
///
/// - It instantiates an AI provider client for each entry in the `providers`
///   section of the configuration.
/// - It resolves the analysis task for the configured option strategy and the
///   synthesis task, each with its own provider and prompts.
/// - It picks the history sink and the session idle limit.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let mut ai_providers: HashMap<String, Box<dyn AiProvider>> = HashMap::new();
    for (name, provider_config) in &config.providers {
        ai_providers.insert(name.clone(), create_provider(name, provider_config)?);
    }

    let tasks = resolve_tasks(&config)?;
    let strategy = config.option_strategy;

    let (analysis_task, analysis_provider) =
        provider_for(&ai_providers, &tasks, strategy.task_name())?;
    let analyzer =
        QuestionAnalyzer::new(analysis_provider, strategy).with_prompts(analysis_task.prompts());

    let (synthesis_task, synthesis_provider) =
        provider_for(&ai_providers, &tasks, PROMPT_SYNTHESIS_TASK)?;
    let synthesizer = PromptSynthesizer::new(synthesis_provider, history_sink(&config)?)
        .with_prompts(synthesis_task.prompts());

    info!(strategy = ?strategy, "Prompt workflow configured");
    let sessions = SessionStore::new(Duration::from_secs(config.session_idle_secs));
    Ok(AppState::new(
        PromptPerfector::new(analyzer, synthesizer),
        sessions,
    ))
}
