use promptplus::{
    presenter::ResultView,
    workflow::{CallKind, Notice, Step},
    FormView,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Deserialize, Default)]
pub struct DebugParams {
    pub debug: Option<bool>,
}

#[derive(Serialize)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Value>,
    pub result: T,
}

/// Everything the page needs to render one session.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub step: Step,
    pub question: String,
    pub question_chars: usize,
    pub pending: Option<CallKind>,
    pub notice: Option<Notice>,
    pub form: Option<FormView>,
    pub result: Option<ResultView>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
}

#[derive(Debug, Deserialize)]
pub struct OptionRequest {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct CopyResponse {
    /// The optimized prompt for the browser clipboard, if there is one.
    pub text: Option<String>,
    pub session: SessionView,
}
