//! # Workflow Integration Tests
//!
//! Drives `PromptPerfector` through full sessions with a scripted provider.

mod common;

use promptplus::{
    analysis::{OptionStrategy, QuestionAnalyzer},
    history::MemoryHistorySink,
    workflow::{ANALYSIS_FAILED_MESSAGE, EMPTY_QUESTION_MESSAGE},
    MemoryClipboard, NoticeLevel, PromptPerfector, PromptSynthesizer, Step, Workflow,
    COPY_FEEDBACK,
};
use std::{sync::Arc, time::{Duration, Instant}};
use tokio::sync::Mutex;

use common::{pitch_analysis_json, setup_tracing};
use promptplus_test_utils::{text, ScriptedAiProvider, ScriptedReply};

const QUESTION: &str = "How should I pitch an idea to my boss?";

fn perfector(provider: &ScriptedAiProvider, history: &MemoryHistorySink) -> PromptPerfector {
    PromptPerfector::new(
        QuestionAnalyzer::new(Box::new(provider.clone()), OptionStrategy::Dynamic),
        PromptSynthesizer::new(Box::new(provider.clone()), Arc::new(history.clone())),
    )
}

async fn wait_for_history(history: &MemoryHistorySink, count: usize) {
    for _ in 0..50 {
        if history.records().len() >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn test_pitch_question_end_to_end() {
    setup_tracing();
    let provider = ScriptedAiProvider::new(vec![
        text(&pitch_analysis_json()),
        text("You are a Management Consultant. Use PREP."),
    ]);
    let history = MemoryHistorySink::new();
    let engine = perfector(&provider, &history);
    let workflow = Mutex::new(Workflow::new());

    workflow.lock().await.set_question(QUESTION);
    assert!(engine.analyze(&workflow).await);
    assert_eq!(workflow.lock().await.step(), Step::Options);

    // All options stay at their defaults.
    assert!(engine.generate(&workflow).await);

    let calls = provider.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].1.contains(QUESTION));
    let synthesis_prompt = &calls[1].1;
    assert!(synthesis_prompt.contains("Management Consultant"));
    assert!(synthesis_prompt.contains("PREP"));
    assert!(synthesis_prompt.contains(QUESTION));
    assert!(synthesis_prompt.contains("- Logic structure: PREP"));
    assert!(!synthesis_prompt.contains("- Tone:"));

    let mut guard = workflow.lock().await;
    assert_eq!(guard.step(), Step::Result);
    let now = Instant::now();
    let view = guard.result_view(now).unwrap();
    assert_eq!(view.optimized_prompt, "You are a Management Consultant. Use PREP.");
    assert_eq!(view.key_points, vec!["clarity", "timing", "audience"]);

    let clipboard = MemoryClipboard::new();
    assert!(guard.copy(&clipboard, now));
    assert_eq!(
        clipboard.contents().as_deref(),
        Some("You are a Management Consultant. Use PREP.")
    );
    assert!(guard.is_copied(now));
    assert!(!guard.is_copied(now + COPY_FEEDBACK));
    drop(guard);

    wait_for_history(&history, 1).await;
    let records = history.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].original_question, QUESTION);
    assert_eq!(records[0].persona, "Management Consultant");
    assert_eq!(records[0].options.get("logic_structure").map(String::as_str), Some("prep"));
}

#[tokio::test]
async fn test_analyzer_failure_keeps_question_on_input() {
    setup_tracing();
    let provider = ScriptedAiProvider::new(vec![ScriptedReply::Fail]);
    let engine = perfector(&provider, &MemoryHistorySink::new());
    let workflow = Mutex::new(Workflow::new());

    workflow.lock().await.set_question(QUESTION);
    assert!(engine.analyze(&workflow).await);

    let mut guard = workflow.lock().await;
    assert_eq!(guard.step(), Step::Input);
    assert_eq!(guard.question(), QUESTION);
    let notice = guard.take_notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, ANALYSIS_FAILED_MESSAGE);
    assert!(guard.take_notice().is_none());
}

#[tokio::test]
async fn test_non_conforming_analysis_is_a_failure() {
    let provider = ScriptedAiProvider::new(vec![text(
        r#"{"persona":"Coach","method":"PREP","key_points":[],"context":"","question_type":"x"}"#,
    )]);
    let engine = perfector(&provider, &MemoryHistorySink::new());
    let workflow = Mutex::new(Workflow::new());

    workflow.lock().await.set_question(QUESTION);
    engine.analyze(&workflow).await;

    let guard = workflow.lock().await;
    assert_eq!(guard.step(), Step::Input);
    assert_eq!(guard.notice().unwrap().level, NoticeLevel::Error);
}

#[tokio::test]
async fn test_empty_question_makes_no_call() {
    let provider = ScriptedAiProvider::new(vec![]);
    let engine = perfector(&provider, &MemoryHistorySink::new());
    let workflow = Mutex::new(Workflow::new());

    workflow.lock().await.set_question("  \n ");
    assert!(!engine.analyze(&workflow).await);
    assert!(!engine.quick_generate(&workflow).await);
    assert!(provider.calls().is_empty());
    assert_eq!(
        workflow.lock().await.notice().unwrap().message,
        EMPTY_QUESTION_MESSAGE
    );
}

#[tokio::test]
async fn test_quick_generate_uses_default_options() {
    let provider = ScriptedAiProvider::new(vec![text(&pitch_analysis_json()), text("QUICK")]);
    let history = MemoryHistorySink::new();
    let engine = perfector(&provider, &history);
    let workflow = Mutex::new(Workflow::new());

    workflow.lock().await.set_question(QUESTION);
    assert!(engine.quick_generate(&workflow).await);

    let guard = workflow.lock().await;
    assert_eq!(guard.step(), Step::Result);
    assert_eq!(guard.state().optimized_prompt(), Some("QUICK"));
    assert!(provider.calls()[1].1.contains("- Logic structure: PREP"));
    drop(guard);

    wait_for_history(&history, 1).await;
    assert_eq!(history.records().len(), 1);
}

#[tokio::test]
async fn test_quick_generate_synthesis_failure_stays_on_input() {
    let provider = ScriptedAiProvider::new(vec![text(&pitch_analysis_json()), ScriptedReply::Fail]);
    let history = MemoryHistorySink::new();
    let engine = perfector(&provider, &history);
    let workflow = Mutex::new(Workflow::new());

    workflow.lock().await.set_question(QUESTION);
    engine.quick_generate(&workflow).await;

    let guard = workflow.lock().await;
    assert_eq!(guard.step(), Step::Input);
    assert_eq!(guard.question(), QUESTION);
    assert!(history.records().is_empty());
}

/// An analysis that completes after a reset is not rendered.
#[tokio::test]
async fn test_result_after_reset_is_dropped() {
    let provider = ScriptedAiProvider::new(vec![text(&pitch_analysis_json())])
        .with_delay(Duration::from_millis(100));
    let engine = perfector(&provider, &MemoryHistorySink::new());
    let workflow = Arc::new(Mutex::new(Workflow::new()));

    workflow.lock().await.set_question(QUESTION);
    let task = {
        let engine = engine.clone();
        let workflow = workflow.clone();
        tokio::spawn(async move { engine.analyze(&workflow).await })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;
    {
        let mut guard = workflow.lock().await;
        assert!(guard.is_busy());
        guard.reset();
    }

    let applied = task.await.unwrap();
    assert!(!applied);
    let guard = workflow.lock().await;
    assert_eq!(guard.step(), Step::Input);
    assert_eq!(guard.question(), "");
}

#[tokio::test]
async fn test_reset_and_back_navigation() {
    let provider = ScriptedAiProvider::new(vec![
        text(&pitch_analysis_json()),
        text("FIRST"),
        text("SECOND"),
    ]);
    let engine = perfector(&provider, &MemoryHistorySink::new());
    let workflow = Mutex::new(Workflow::new());

    workflow.lock().await.set_question(QUESTION);
    engine.analyze(&workflow).await;
    assert!(workflow.lock().await.select_option("tone", "formal"));
    engine.generate(&workflow).await;

    assert!(workflow.lock().await.back_to_options());
    {
        let guard = workflow.lock().await;
        assert_eq!(guard.step(), Step::Options);
        assert_eq!(guard.state().selection().unwrap().get("tone"), Some("formal"));
    }
    engine.generate(&workflow).await;
    assert_eq!(
        workflow.lock().await.state().optimized_prompt(),
        Some("SECOND")
    );

    workflow.lock().await.reset();
    let guard = workflow.lock().await;
    assert_eq!(guard.step(), Step::Input);
    assert_eq!(guard.question(), "");
    assert!(guard.state().analysis().is_none());
    assert!(guard.state().selection().is_none());
    assert!(guard.state().optimized_prompt().is_none());
}
