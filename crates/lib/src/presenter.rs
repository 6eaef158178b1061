//! Read-only view of the result step.

use crate::{
    analysis::AnalysisResult,
    options::{OptionSelection, NOT_SPECIFIED},
};
use serde::Serialize;

/// One option the user actually chose, with human-readable labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChosenOption {
    pub key: String,
    pub label: String,
    pub value: String,
    pub value_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultView {
    pub question: String,
    pub optimized_prompt: String,
    pub persona: String,
    pub method: String,
    pub key_points: Vec<String>,
    pub context: String,
    pub question_type: String,
    pub chosen_options: Vec<ChosenOption>,
    pub copied: bool,
}

impl ResultView {
    pub fn new(
        question: &str,
        optimized_prompt: &str,
        analysis: &AnalysisResult,
        selection: &OptionSelection,
        copied: bool,
    ) -> Self {
        let chosen_options = analysis
            .schema
            .definitions
            .iter()
            .filter_map(|definition| {
                let value = selection.get(&definition.key)?;
                if value == NOT_SPECIFIED {
                    return None;
                }
                Some(ChosenOption {
                    key: definition.key.clone(),
                    label: definition.label.clone(),
                    value: value.to_string(),
                    value_label: definition.label_of(value).unwrap_or(value).to_string(),
                })
            })
            .collect();

        Self {
            question: question.to_string(),
            optimized_prompt: optimized_prompt.to_string(),
            persona: analysis.persona.clone(),
            method: analysis.method.clone(),
            key_points: analysis.key_points.clone(),
            context: analysis.context.clone(),
            question_type: analysis.question_type.clone(),
            chosen_options,
            copied,
        }
    }
}
