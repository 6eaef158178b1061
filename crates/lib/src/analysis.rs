//! # Question Analyzer
//!
//! Sends the raw question to the model under a strict output contract and
//! turns the answer into an [`AnalysisResult`]: persona, method, key points,
//! context, question type, and a validated option schema.

use crate::{
    contract::{invoke_structured, OutputContract},
    errors::PromptError,
    options::{catalog, OptionSchema, OptionSelection, RawOptionDefinition, SCHEMA_VERSION},
    prompts::{core::render_template, tasks::*},
    providers::ai::AiProvider,
    types::TaskPrompts,
};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{error, info, warn};

/// Where the option schema of an analysis comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionStrategy {
    /// The model generates the option definitions for each question.
    #[default]
    Dynamic,
    /// The built-in catalog, with model recommendations applied.
    Catalog,
}

impl OptionStrategy {
    /// The configuration task that holds this strategy's analysis prompts.
    pub fn task_name(self) -> &'static str {
        match self {
            OptionStrategy::Dynamic => QUESTION_ANALYSIS_TASK,
            OptionStrategy::Catalog => CATALOG_ANALYSIS_TASK,
        }
    }

    /// The built-in analysis prompts for this strategy.
    pub fn default_prompts(self) -> TaskPrompts {
        match self {
            OptionStrategy::Dynamic => {
                TaskPrompts::new(QUESTION_ANALYSIS_SYSTEM_PROMPT, QUESTION_ANALYSIS_USER_PROMPT)
            }
            OptionStrategy::Catalog => {
                TaskPrompts::new(CATALOG_ANALYSIS_SYSTEM_PROMPT, CATALOG_ANALYSIS_USER_PROMPT)
            }
        }
    }
}

/// The validated outcome of analyzing one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub persona: String,
    pub method: String,
    pub key_points: Vec<String>,
    pub context: String,
    pub question_type: String,
    pub source: OptionStrategy,
    pub schema: OptionSchema,
    /// Analyzer rationale per option key.
    pub reasons: BTreeMap<String, String>,
}

impl AnalysisResult {
    /// The selection the options step starts from.
    pub fn initial_selection(&self) -> OptionSelection {
        OptionSelection::from_defaults(&self.schema)
    }
}

// --- Response contracts ---

/// The analyzer response when the model generates the option schema.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DynamicAnalysisResponse {
    pub persona: String,
    pub method: String,
    pub key_points: Vec<String>,
    pub context: String,
    pub question_type: String,
    #[serde(deserialize_with = "lenient_definitions")]
    #[schemars(with = "Vec<RawOptionDefinition>")]
    pub custom_options: Vec<RawOptionDefinition>,
    #[serde(default, deserialize_with = "lenient_string_map")]
    #[schemars(with = "BTreeMap<String, String>")]
    pub option_reasons: BTreeMap<String, String>,
}

/// The analyzer response when options come from the catalog.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CatalogAnalysisResponse {
    pub persona: String,
    pub method: String,
    pub key_points: Vec<String>,
    pub context: String,
    pub question_type: String,
    #[serde(default, deserialize_with = "lenient_string_map")]
    #[schemars(with = "BTreeMap<String, String>")]
    pub recommended_options: BTreeMap<String, String>,
    #[serde(default)]
    pub relevant_options: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string_map")]
    #[schemars(with = "BTreeMap<String, String>")]
    pub option_reasons: BTreeMap<String, String>,
}

/// Decodes option definitions one by one, dropping the ones that do not fit.
fn lenient_definitions<'de, D>(deserializer: D) -> Result<Vec<RawOptionDefinition>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(definition) => Some(definition),
            Err(e) => {
                warn!(index, "Skipping undecodable option definition: {e}");
                None
            }
        })
        .collect())
}

/// Decodes a string map, stringifying scalars and dropping anything else.
fn lenient_string_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(map
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some((key, s)),
            Value::Number(n) => Some((key, n.to_string())),
            Value::Bool(b) => Some((key, b.to_string())),
            _ => None,
        })
        .collect())
}

fn required_text(field: &str, value: String) -> Result<String, PromptError> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(PromptError::MalformedResponse(format!("`{field}` is empty")));
    }
    Ok(value)
}

fn clean_points(points: Vec<String>) -> Vec<String> {
    points
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

fn reasons_for(schema: &OptionSchema, reasons: BTreeMap<String, String>) -> BTreeMap<String, String> {
    reasons
        .into_iter()
        .filter(|(key, _)| schema.definition(key).is_some())
        .collect()
}

impl DynamicAnalysisResponse {
    pub fn into_result(self) -> Result<AnalysisResult, PromptError> {
        let schema = OptionSchema::from_dynamic(self.custom_options)
            .map_err(|v| PromptError::SchemaConformance(v.to_string()))?;
        let reasons = reasons_for(&schema, self.option_reasons);
        Ok(AnalysisResult {
            persona: required_text("persona", self.persona)?,
            method: required_text("method", self.method)?,
            key_points: clean_points(self.key_points),
            context: self.context.trim().to_string(),
            question_type: self.question_type.trim().to_string(),
            source: OptionStrategy::Dynamic,
            schema,
            reasons,
        })
    }
}

impl CatalogAnalysisResponse {
    pub fn into_result(self) -> Result<AnalysisResult, PromptError> {
        let schema = catalog::with_recommendations(&self.recommended_options, &self.relevant_options);
        schema
            .validate()
            .map_err(|v| PromptError::SchemaConformance(v.to_string()))?;
        let reasons = reasons_for(&schema, self.option_reasons);
        Ok(AnalysisResult {
            persona: required_text("persona", self.persona)?,
            method: required_text("method", self.method)?,
            key_points: clean_points(self.key_points),
            context: self.context.trim().to_string(),
            question_type: self.question_type.trim().to_string(),
            source: OptionStrategy::Catalog,
            schema,
            reasons,
        })
    }
}

// --- Analyzer ---

/// Proxy for the analysis call to the model.
#[derive(Clone, Debug)]
pub struct QuestionAnalyzer {
    provider: Box<dyn AiProvider>,
    strategy: OptionStrategy,
    prompts: TaskPrompts,
}

impl QuestionAnalyzer {
    pub fn new(provider: Box<dyn AiProvider>, strategy: OptionStrategy) -> Self {
        Self {
            provider,
            strategy,
            prompts: strategy.default_prompts(),
        }
    }

    /// Replaces the built-in prompts, e.g. with configured overrides.
    pub fn with_prompts(mut self, prompts: TaskPrompts) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn strategy(&self) -> OptionStrategy {
        self.strategy
    }

    /// Analyzes a question.
    ///
    /// Every failure, whether transport, provider, decoding or schema, is
    /// logged and reported as the single [`PromptError::AnalysisFailed`].
    pub async fn analyze(&self, question: &str) -> Result<AnalysisResult, PromptError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(PromptError::AnalysisFailed);
        }
        info!(strategy = ?self.strategy, "Analyzing question");
        self.try_analyze(question).await.map_err(|e| {
            error!("Question analysis failed: {e}");
            PromptError::AnalysisFailed
        })
    }

    async fn try_analyze(&self, question: &str) -> Result<AnalysisResult, PromptError> {
        match self.strategy {
            OptionStrategy::Dynamic => {
                let contract = OutputContract::for_type::<DynamicAnalysisResponse>(
                    "dynamic_analysis",
                    SCHEMA_VERSION,
                );
                let user_prompt =
                    render_template(&self.prompts.user_prompt, &[("question", question)])?;
                let response: DynamicAnalysisResponse = invoke_structured(
                    self.provider.as_ref(),
                    &contract,
                    &self.prompts.system_prompt,
                    &user_prompt,
                )
                .await?;
                response.into_result()
            }
            OptionStrategy::Catalog => {
                let contract = OutputContract::for_type::<CatalogAnalysisResponse>(
                    "catalog_analysis",
                    SCHEMA_VERSION,
                );
                let catalog = catalog::describe();
                let user_prompt = render_template(
                    &self.prompts.user_prompt,
                    &[("question", question), ("catalog", &catalog)],
                )?;
                let response: CatalogAnalysisResponse = invoke_structured(
                    self.provider.as_ref(),
                    &contract,
                    &self.prompts.system_prompt,
                    &user_prompt,
                )
                .await?;
                response.into_result()
            }
        }
    }
}
