//! # Server Endpoint Tests
//!
//! Integration tests for the static endpoints, session lifecycle, and input
//! rejection.

mod common;

use anyhow::Result;
use common::TestApp;
use serde_json::{json, Value};

#[tokio::test]
async fn test_root_and_health_check_endpoints() -> Result<()> {
    let app = TestApp::spawn("dynamic").await?;

    let root_response = app.client.get(format!("{}/", app.address)).send().await?;
    assert!(root_response.status().is_success());
    let content_type = root_response.headers()["content-type"].to_str()?.to_string();
    assert!(content_type.starts_with("text/html"));
    assert!(root_response.text().await?.contains("<title>PromptPlus</title>"));

    let health_response = app.client.get(format!("{}/health", app.address)).send().await?;
    assert!(health_response.status().is_success());
    assert_eq!("OK", health_response.text().await?);

    Ok(())
}

/// Option keys and values come from the model, so the page escapes them in
/// attributes too, and it releases its session when the tab goes away.
#[tokio::test]
async fn test_page_escapes_option_attributes_and_releases_session() -> Result<()> {
    let app = TestApp::spawn("dynamic").await?;
    let page = app.client.get(format!("{}/", app.address)).send().await?.text().await?;

    assert!(page.contains(r#"name="${escapeHtml(group.key)}""#));
    assert!(page.contains(r#"value="${escapeHtml(choice.value)}""#));
    assert!(page.contains(r#"'"': "&quot;""#));
    assert!(page.contains(r#"addEventListener("pagehide""#));
    assert!(page.contains(r#"method: "DELETE", keepalive: true"#));
    Ok(())
}

#[tokio::test]
async fn test_session_lifecycle() -> Result<()> {
    let app = TestApp::spawn("dynamic").await?;

    let response = app.client.post(format!("{}/sessions", app.address)).send().await?;
    assert_eq!(201, response.status().as_u16());
    let body: Value = response.json().await?;
    let view = &body["result"];
    let id = view["id"].as_str().unwrap().to_string();
    assert_eq!(view["step"], "input");
    assert_eq!(view["question"], "");
    assert!(view["form"].is_null());
    assert!(view["result"].is_null());

    let view = app
        .put(&id, "question", json!({ "question": "日本語でも大丈夫?" }))
        .await?;
    assert_eq!(view["question_chars"], 9);

    let fetched: Value = app
        .client
        .get(format!("{}/sessions/{id}", app.address))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(fetched["result"]["question"], "日本語でも大丈夫?");

    let deleted = app
        .client
        .delete(format!("{}/sessions/{id}", app.address))
        .send()
        .await?;
    assert_eq!(204, deleted.status().as_u16());

    let missing = app
        .client
        .get(format!("{}/sessions/{id}", app.address))
        .send()
        .await?;
    assert_eq!(404, missing.status().as_u16());
    let body: Value = missing.json().await?;
    assert!(body["error"].as_str().unwrap().contains("not found"));

    Ok(())
}

#[tokio::test]
async fn test_unknown_session_actions_are_not_found() -> Result<()> {
    let app = TestApp::spawn("dynamic").await?;
    let id = "00000000-0000-4000-8000-000000000000";

    for action in ["analyze", "generate", "reset", "copy"] {
        let response = app
            .client
            .post(format!("{}/sessions/{id}/{action}", app.address))
            .send()
            .await?;
        assert_eq!(404, response.status().as_u16(), "{action}");
    }

    let bad_id = app
        .client
        .get(format!("{}/sessions/not-a-uuid", app.address))
        .send()
        .await?;
    assert_eq!(400, bad_id.status().as_u16());

    Ok(())
}

#[tokio::test]
async fn test_question_handler_rejects_bad_json() -> Result<()> {
    let app = TestApp::spawn("dynamic").await?;
    let id = app.create_session().await?;

    // Syntactically invalid JSON.
    let malformed = app
        .client
        .put(format!("{}/sessions/{id}/question", app.address))
        .header("Content-Type", "application/json")
        .body(r#"{"question": "unterminated"#)
        .send()
        .await?;
    assert_eq!(400, malformed.status().as_u16());
    let body: Value = malformed.json().await?;
    assert!(body["error"].is_string());

    // Valid JSON without the required field.
    let missing_field = app
        .client
        .put(format!("{}/sessions/{id}/question", app.address))
        .json(&json!({ "text": "wrong field" }))
        .send()
        .await?;
    assert_eq!(422, missing_field.status().as_u16());
    let body: Value = missing_field.json().await?;
    assert!(body["error"].as_str().unwrap().contains("question"));

    Ok(())
}
