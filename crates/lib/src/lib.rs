//! # Prompt Perfection
//!
//! This crate turns a casual question into a high-quality prompt for an LLM.
//! A configurable AI provider analyzes the question and proposes
//! answer-shaping options; once the user has reviewed them, the same provider
//! renders the final optimized prompt.

pub mod analysis;
pub mod clipboard;
pub mod contract;
pub mod engine;
pub mod errors;
pub mod history;
pub mod options;
pub mod presenter;
pub mod prompts;
pub mod providers;
pub mod synthesis;
pub mod types;
pub mod workflow;

pub use analysis::{AnalysisResult, OptionStrategy, QuestionAnalyzer};
pub use clipboard::{Clipboard, CopyIndicator, MemoryClipboard, COPY_FEEDBACK};
pub use engine::PromptPerfector;
pub use errors::PromptError;
pub use history::{HistoryRecord, HistorySink, HttpHistorySink, LogHistorySink, MemoryHistorySink};
pub use options::{FormView, OptionSchema, OptionSelection};
pub use presenter::{ChosenOption, ResultView};
pub use synthesis::PromptSynthesizer;
pub use types::{ProviderConfig, TaskPrompts};
pub use workflow::{CallKind, Notice, NoticeLevel, Step, Workflow, WorkflowState};
