#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Tracing setup and the analyzer fixture shared by the library integration
//! tests. Mock providers live in `promptplus-test-utils`.

use dotenvy::dotenv;
use promptplus_test_utils::fixtures::option_definition;
use serde_json::json;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes the tracing subscriber and loads .env for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        dotenv().ok();
        tracing_subscriber::fmt::init();
    });
}

/// A valid dynamic analysis answer for the pitching question.
pub fn pitch_analysis_json() -> String {
    json!({
        "persona": "Management Consultant",
        "method": "PREP",
        "key_points": ["clarity", "timing", "audience"],
        "context": "Pitching an idea to a manager at work",
        "question_type": "business",
        "custom_options": [
            option_definition(
                "logic_structure",
                "Logic structure",
                &[("prep", "PREP"), ("swot", "SWOT")],
                "prep",
            ),
            option_definition(
                "tone",
                "Tone",
                &[("formal", "FORMAL"), ("friendly", "FRIENDLY")],
                "not_specified",
            ),
            option_definition(
                "length",
                "Length",
                &[("short", "SHORT"), ("long", "LONG")],
                "not_specified",
            ),
        ],
        "option_reasons": { "logic_structure": "PREP fits a short pitch" }
    })
    .to_string()
}
