use thiserror::Error;

/// Custom error types for the library.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Request to AI provider failed: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("AI provider is not configured: {0}")]
    MissingAiProvider(String),
    #[error("AI response does not match the expected contract: {0}")]
    MalformedResponse(String),
    #[error("Option schema rejected: {0}")]
    SchemaConformance(String),
    #[error("Question analysis failed")]
    AnalysisFailed,
    #[error("Prompt synthesis failed")]
    SynthesisFailed,
    #[error("History store rejected the record: {0}")]
    History(String),
    #[error("Failed to serialize value: {0}")]
    JsonSerialization(#[from] serde_json::Error),
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}
