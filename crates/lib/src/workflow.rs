//! # Workflow Controller
//!
//! A three-step state machine: `input` → `options` → `result`.
//!
//! Each step carries exactly the data it needs, so a `result` without a
//! prompt or an `options` step without an analysis cannot be represented.
//! Transitions that depend on a model call are split in two: `begin_*`
//! checks preconditions, marks the call as pending and hands out a
//! [`Ticket`]; `finish_*` applies the outcome only if the ticket is still
//! current. Navigating away bumps the epoch, so outcomes that arrive late
//! are dropped instead of rendered.

use crate::{
    analysis::AnalysisResult,
    clipboard::{Clipboard, CopyIndicator},
    errors::PromptError,
    options::{render_form, FormView, OptionSelection},
    presenter::ResultView,
};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, warn};

pub const EMPTY_QUESTION_MESSAGE: &str = "Please enter a question.";
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "Something went wrong while analyzing your question. Please try again.";
pub const GENERATION_FAILED_MESSAGE: &str =
    "Something went wrong while generating the prompt. Please try again.";
pub const ANALYZED_MESSAGE: &str = "Question analyzed. Review the options below.";
pub const GENERATED_MESSAGE: &str = "Prompt generated.";
pub const COPIED_MESSAGE: &str = "Copied! Paste it straight into your AI.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Input,
    Options,
    Result,
}

/// The current step together with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowState {
    Input {
        question: String,
    },
    Options {
        question: String,
        analysis: AnalysisResult,
        selection: OptionSelection,
    },
    Result {
        question: String,
        analysis: AnalysisResult,
        selection: OptionSelection,
        optimized_prompt: String,
    },
}

impl Default for WorkflowState {
    fn default() -> Self {
        WorkflowState::Input {
            question: String::new(),
        }
    }
}

impl WorkflowState {
    pub fn step(&self) -> Step {
        match self {
            WorkflowState::Input { .. } => Step::Input,
            WorkflowState::Options { .. } => Step::Options,
            WorkflowState::Result { .. } => Step::Result,
        }
    }

    pub fn question(&self) -> &str {
        match self {
            WorkflowState::Input { question }
            | WorkflowState::Options { question, .. }
            | WorkflowState::Result { question, .. } => question,
        }
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        match self {
            WorkflowState::Input { .. } => None,
            WorkflowState::Options { analysis, .. } | WorkflowState::Result { analysis, .. } => {
                Some(analysis)
            }
        }
    }

    pub fn selection(&self) -> Option<&OptionSelection> {
        match self {
            WorkflowState::Input { .. } => None,
            WorkflowState::Options { selection, .. } | WorkflowState::Result { selection, .. } => {
                Some(selection)
            }
        }
    }

    pub fn optimized_prompt(&self) -> Option<&str> {
        match self {
            WorkflowState::Result {
                optimized_prompt, ..
            } => Some(optimized_prompt),
            _ => None,
        }
    }
}

/// The kind of model-backed transition in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallKind {
    Analyze,
    QuickGenerate,
    Generate,
}

/// Identifies one pending call. Only the current ticket can finish it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    epoch: u64,
    kind: CallKind,
}

impl Ticket {
    pub fn kind(&self) -> CallKind {
        self.kind
    }
}

/// What the analyzer needs for `analyze` and `quick_generate`.
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub ticket: Ticket,
    pub question: String,
}

/// What the synthesizer needs for `generate`.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub ticket: Ticket,
    pub question: String,
    pub analysis: AnalysisResult,
    pub selection: OptionSelection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient message for the user. At most one is held at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// All transient state of one session.
#[derive(Debug, Default)]
pub struct Workflow {
    state: WorkflowState,
    epoch: u64,
    pending: Option<CallKind>,
    notice: Option<Notice>,
    copy: CopyIndicator,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn step(&self) -> Step {
        self.state.step()
    }

    pub fn question(&self) -> &str {
        self.state.question()
    }

    pub fn pending(&self) -> Option<CallKind> {
        self.pending
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Removes and returns the notice, so it is shown only once.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Edits the question. Only possible on the input step with nothing pending.
    pub fn set_question(&mut self, text: &str) -> bool {
        if self.pending.is_some() {
            debug!("Ignoring question edit while a call is pending");
            return false;
        }
        match &mut self.state {
            WorkflowState::Input { question } => {
                *question = text.to_string();
                true
            }
            _ => {
                debug!("Ignoring question edit outside the input step");
                false
            }
        }
    }

    pub fn begin_analyze(&mut self) -> Option<AnalyzeRequest> {
        self.begin_from_input(CallKind::Analyze)
    }

    pub fn begin_quick_generate(&mut self) -> Option<AnalyzeRequest> {
        self.begin_from_input(CallKind::QuickGenerate)
    }

    fn begin_from_input(&mut self, kind: CallKind) -> Option<AnalyzeRequest> {
        if self.pending.is_some() {
            debug!(?kind, "Ignoring request while a call is pending");
            return None;
        }
        let WorkflowState::Input { question } = &self.state else {
            debug!(?kind, "Ignoring request outside the input step");
            return None;
        };
        let question = question.trim().to_string();
        if question.is_empty() {
            self.notice = Some(Notice::error(EMPTY_QUESTION_MESSAGE));
            return None;
        }
        self.notice = None;
        self.pending = Some(kind);
        Some(AnalyzeRequest {
            ticket: self.ticket(kind),
            question,
        })
    }

    /// Applies an analysis outcome. Returns whether it was applied.
    pub fn finish_analyze(
        &mut self,
        ticket: Ticket,
        outcome: Result<AnalysisResult, PromptError>,
    ) -> bool {
        if !self.accepts(ticket, CallKind::Analyze) {
            return false;
        }
        self.pending = None;
        match outcome {
            Ok(analysis) => {
                let question = self.state.question().trim().to_string();
                let selection = analysis.initial_selection();
                self.transition(WorkflowState::Options {
                    question,
                    analysis,
                    selection,
                });
                self.notice = Some(Notice::success(ANALYZED_MESSAGE));
            }
            Err(e) => {
                warn!("Analyze failed, staying on input: {e}");
                self.notice = Some(Notice::error(ANALYSIS_FAILED_MESSAGE));
            }
        }
        true
    }

    /// Applies the combined analysis and synthesis outcome of a quick generate.
    pub fn finish_quick_generate(
        &mut self,
        ticket: Ticket,
        outcome: Result<(AnalysisResult, String), PromptError>,
    ) -> bool {
        if !self.accepts(ticket, CallKind::QuickGenerate) {
            return false;
        }
        self.pending = None;
        match outcome {
            Ok((analysis, optimized_prompt)) => {
                let question = self.state.question().trim().to_string();
                let selection = analysis.initial_selection();
                self.transition(WorkflowState::Result {
                    question,
                    analysis,
                    selection,
                    optimized_prompt,
                });
                self.notice = Some(Notice::success(GENERATED_MESSAGE));
            }
            Err(e) => {
                warn!("Quick generate failed, staying on input: {e}");
                let message = match e {
                    PromptError::SynthesisFailed => GENERATION_FAILED_MESSAGE,
                    _ => ANALYSIS_FAILED_MESSAGE,
                };
                self.notice = Some(Notice::error(message));
            }
        }
        true
    }

    /// Changes one option on the options step.
    ///
    /// Values the schema does not declare are rejected. Other keys are never touched.
    pub fn select_option(&mut self, key: &str, value: &str) -> bool {
        if self.pending.is_some() {
            debug!("Ignoring option change while a call is pending");
            return false;
        }
        match &mut self.state {
            WorkflowState::Options {
                analysis,
                selection,
                ..
            } => selection.select(&analysis.schema, key, value),
            _ => {
                debug!("Ignoring option change outside the options step");
                false
            }
        }
    }

    pub fn begin_generate(&mut self) -> Option<GenerateRequest> {
        if self.pending.is_some() {
            debug!("Ignoring generate while a call is pending");
            return None;
        }
        let WorkflowState::Options {
            question,
            analysis,
            selection,
        } = &self.state
        else {
            debug!("Ignoring generate outside the options step");
            return None;
        };
        let request = GenerateRequest {
            ticket: self.ticket(CallKind::Generate),
            question: question.clone(),
            analysis: analysis.clone(),
            selection: selection.clone(),
        };
        self.notice = None;
        self.pending = Some(CallKind::Generate);
        Some(request)
    }

    pub fn finish_generate(&mut self, ticket: Ticket, outcome: Result<String, PromptError>) -> bool {
        if !self.accepts(ticket, CallKind::Generate) {
            return false;
        }
        self.pending = None;
        match outcome {
            Ok(optimized_prompt) => {
                let WorkflowState::Options {
                    question,
                    analysis,
                    selection,
                } = std::mem::take(&mut self.state)
                else {
                    return false;
                };
                self.transition(WorkflowState::Result {
                    question,
                    analysis,
                    selection,
                    optimized_prompt,
                });
                self.notice = Some(Notice::success(GENERATED_MESSAGE));
            }
            Err(e) => {
                warn!("Generate failed, staying on options: {e}");
                self.notice = Some(Notice::error(GENERATION_FAILED_MESSAGE));
            }
        }
        true
    }

    /// Returns to the options step, discarding the optimized prompt.
    pub fn back_to_options(&mut self) -> bool {
        let WorkflowState::Result { .. } = &self.state else {
            debug!("Ignoring back-to-options outside the result step");
            return false;
        };
        let WorkflowState::Result {
            question,
            analysis,
            selection,
            ..
        } = std::mem::take(&mut self.state)
        else {
            return false;
        };
        self.transition(WorkflowState::Options {
            question,
            analysis,
            selection,
        });
        true
    }

    /// Returns to the input step with the question kept for editing.
    ///
    /// The analysis, selection and optimized prompt are discarded.
    pub fn back_to_input(&mut self) -> bool {
        if self.state.step() == Step::Input {
            debug!("Ignoring back-to-input on the input step");
            return false;
        }
        let question = self.state.question().to_string();
        self.transition(WorkflowState::Input { question });
        true
    }

    /// Clears everything and returns to an empty input step.
    ///
    /// Allowed from any step, including while a call is pending; the late
    /// outcome is then dropped.
    pub fn reset(&mut self) {
        self.transition(WorkflowState::default());
        self.notice = None;
    }

    /// Writes the optimized prompt verbatim to the clipboard and arms the indicator.
    pub fn copy(&mut self, clipboard: &dyn Clipboard, now: Instant) -> bool {
        let Some(prompt) = self.state.optimized_prompt() else {
            debug!("Ignoring copy without an optimized prompt");
            return false;
        };
        clipboard.write_text(prompt);
        self.copy.arm(now);
        self.notice = Some(Notice::success(COPIED_MESSAGE));
        true
    }

    pub fn is_copied(&self, now: Instant) -> bool {
        self.state.step() == Step::Result && self.copy.is_copied(now)
    }

    /// The option form for the options step.
    pub fn form(&self) -> Option<FormView> {
        match &self.state {
            WorkflowState::Options {
                analysis,
                selection,
                ..
            } => Some(render_form(&analysis.schema, selection, &analysis.reasons)),
            _ => None,
        }
    }

    /// The result view for the result step.
    pub fn result_view(&self, now: Instant) -> Option<ResultView> {
        match &self.state {
            WorkflowState::Result {
                question,
                analysis,
                selection,
                optimized_prompt,
            } => Some(ResultView::new(
                question,
                optimized_prompt,
                analysis,
                selection,
                self.is_copied(now),
            )),
            _ => None,
        }
    }

    fn ticket(&self, kind: CallKind) -> Ticket {
        Ticket {
            epoch: self.epoch,
            kind,
        }
    }

    fn accepts(&self, ticket: Ticket, expected: CallKind) -> bool {
        if ticket.kind != expected || self.pending != Some(expected) || ticket.epoch != self.epoch
        {
            debug!(?ticket, "Dropping stale outcome");
            return false;
        }
        true
    }

    fn transition(&mut self, state: WorkflowState) {
        self.state = state;
        self.epoch += 1;
        self.pending = None;
        self.copy.clear();
    }
}
