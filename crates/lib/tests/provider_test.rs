//! # AI Provider Tests
//!
//! Exercises the Gemini and local providers against a `wiremock` server and
//! the analyzer end to end over HTTP.

mod common;

use promptplus::{
    analysis::{OptionStrategy, QuestionAnalyzer},
    providers::{
        ai::{gemini::GeminiProvider, local::LocalAiProvider, AiProvider},
        factory::create_provider,
    },
    types::ProviderConfig,
    PromptError,
};
use serde_json::json;
use std::time::Duration;
use wiremock::{
    matchers::{body_partial_json, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use common::{pitch_analysis_json, setup_tracing};

fn gemini_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{ "content": { "parts": [{ "text": text }], "role": "model" } }]
    })
}

#[tokio::test]
async fn test_gemini_generate_sends_system_instruction() -> anyhow::Result<()> {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gemini"))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "systemInstruction": { "parts": [{ "text": "be brief" }] },
            "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body("hi there")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = GeminiProvider::new(format!("{}/gemini", server.uri()), "test-key".into())?;
    let answer = provider.generate("be brief", "hello").await?;
    assert_eq!(answer, "hi there");
    Ok(())
}

#[tokio::test]
async fn test_gemini_json_mode_sets_mime_type() -> anyhow::Result<()> {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body("{\"ok\":true}")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = GeminiProvider::new(server.uri(), "k".into())?;
    assert_eq!(provider.generate_json("", "json please").await?, "{\"ok\":true}");
    Ok(())
}

#[tokio::test]
async fn test_gemini_error_status_is_api_error() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let provider = GeminiProvider::new(server.uri(), "k".into())?;
    let err = provider.generate("", "hello").await.unwrap_err();
    match err {
        PromptError::AiApi(body) => assert!(body.contains("quota exceeded")),
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_local_provider_uses_bearer_and_chat_format() -> anyhow::Result<()> {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer secret"))
        .and(body_partial_json(json!({
            "model": "llama",
            "messages": [
                { "role": "system", "content": "sys" },
                { "role": "user", "content": "usr" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "done" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = LocalAiProvider::new(
        format!("{}/v1/chat/completions", server.uri()),
        Some("secret".into()),
        Some("llama".into()),
    )?;
    assert_eq!(provider.generate("sys", "usr").await?, "done");
    Ok(())
}

#[tokio::test]
async fn test_factory_builds_local_provider_from_config() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "factory" } }]
        })))
        .mount(&server)
        .await;

    let config = ProviderConfig {
        provider: "local".to_string(),
        api_url: Some(server.uri()),
        api_key: None,
        model_name: "llama".to_string(),
        timeout_secs: None,
    };
    let provider = create_provider("default", &config)?;
    assert_eq!(provider.generate("", "x").await?, "factory");
    Ok(())
}

/// The analyzer decodes a fenced JSON answer coming back over HTTP.
#[tokio::test]
async fn test_analyzer_over_http_decodes_dynamic_schema() -> anyhow::Result<()> {
    setup_tracing();
    let server = MockServer::start().await;
    let fenced = format!("```json\n{}\n```", pitch_analysis_json());
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(&fenced)))
        .expect(1)
        .mount(&server)
        .await;

    let provider = GeminiProvider::new(server.uri(), "k".into())?;
    let analyzer = QuestionAnalyzer::new(Box::new(provider), OptionStrategy::Dynamic);
    let analysis = analyzer.analyze("How should I pitch an idea to my boss?").await?;

    assert_eq!(analysis.persona, "Management Consultant");
    assert_eq!(analysis.method, "PREP");
    assert_eq!(analysis.schema.definitions.len(), 3);
    assert_eq!(analysis.initial_selection().get("logic_structure"), Some("prep"));
    assert_eq!(
        analysis.reasons.get("logic_structure").map(String::as_str),
        Some("PREP fits a short pitch")
    );
    Ok(())
}

/// A transport failure surfaces as the single generic analysis failure.
#[tokio::test]
async fn test_analyzer_maps_http_error_to_analysis_failed() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let provider = LocalAiProvider::new(server.uri(), None, None)?;
    let analyzer = QuestionAnalyzer::new(Box::new(provider), OptionStrategy::Catalog);
    let err = analyzer.analyze("Anything?").await.unwrap_err();
    assert!(matches!(err, PromptError::AnalysisFailed));
    Ok(())
}

/// A provider that never answers in time fails instead of hanging.
#[tokio::test]
async fn test_local_provider_times_out() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "choices": [{ "message": { "content": "late" } }] }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let provider = LocalAiProvider::new(server.uri(), None, None)?
        .with_timeout(Duration::from_millis(200))?;
    match provider.generate("", "hello").await.unwrap_err() {
        PromptError::AiRequest(e) => assert!(e.is_timeout(), "{e}"),
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_analyzer_maps_timeout_to_analysis_failed() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(gemini_body(&pitch_analysis_json()))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let provider =
        GeminiProvider::new(server.uri(), "k".into())?.with_timeout(Duration::from_millis(200))?;
    let analyzer = QuestionAnalyzer::new(Box::new(provider), OptionStrategy::Dynamic);
    let err = analyzer.analyze("How should I pitch an idea to my boss?").await.unwrap_err();
    assert!(matches!(err, PromptError::AnalysisFailed));
    Ok(())
}

/// `timeout_secs` from the provider configuration reaches the client.
#[tokio::test]
async fn test_factory_applies_configured_timeout() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "choices": [{ "message": { "content": "late" } }] }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let config = ProviderConfig {
        provider: "local".to_string(),
        api_url: Some(server.uri()),
        api_key: None,
        model_name: "llama".to_string(),
        timeout_secs: Some(1),
    };
    let provider = create_provider("default", &config)?;
    let err = provider.generate("", "x").await.unwrap_err();
    assert!(matches!(err, PromptError::AiRequest(e) if e.is_timeout()));
    Ok(())
}
