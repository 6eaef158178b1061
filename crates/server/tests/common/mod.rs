//! # Common Test Utilities
//!
//! - `TestApp`: spawns the real server on a random port. Either configured from
//!   a temporary `config.yml` whose local AI provider and history endpoint point
//!   at an `httpmock::MockServer`, or wired directly to an in-process
//!   `MockAiProvider`.
//! - Helpers to build OpenAI-compatible mock responses.

// Allow unused code because this is a test utility module, and not all
// functions might be used by every test file that includes it.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use httpmock::MockServer;
use promptplus::{
    analysis::{OptionStrategy, QuestionAnalyzer},
    history::MemoryHistorySink,
    PromptPerfector, PromptSynthesizer,
};
use promptplus_server::{
    config, router,
    sessions::SessionStore,
    state::{build_app_state, AppState},
};
use promptplus_test_utils::MockAiProvider;
use reqwest::Client;
use serde_json::{json, Value};
use std::{fs::File, io::Write, net::SocketAddr, sync::Arc};
use tempfile::{tempdir, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

pub const CHAT_PATH: &str = "/v1/chat/completions";
pub const HISTORY_PATH: &str = "/history";

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub app_state: AppState,
    _config_dir: Option<TempDir>,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the server configured from a temporary `config.yml`.
    pub async fn spawn(option_strategy: &str) -> Result<Self> {
        let mock_server = MockServer::start();

        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
option_strategy: "{}"
history:
  endpoint: "{}"
  api_key: "history-key"
providers:
  default:
    provider: "local"
    api_url: "{}"
    api_key: null
    model_name: "mock-chat-model"
"#,
            option_strategy,
            mock_server.url(HISTORY_PATH),
            mock_server.url(CHAT_PATH)
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config = config::get_config(Some(config_path.to_str().unwrap()))?;
        let app_state = build_app_state(config).await?;

        let mut app = TestApp::spawn_with_state(app_state, mock_server).await?;
        app._config_dir = Some(config_dir);
        Ok(app)
    }

    /// Spawns the server around an in-process mock provider.
    pub async fn spawn_with_provider(
        provider: MockAiProvider,
        strategy: OptionStrategy,
        history: MemoryHistorySink,
    ) -> Result<Self> {
        let perfector = PromptPerfector::new(
            QuestionAnalyzer::new(Box::new(provider.clone()), strategy),
            PromptSynthesizer::new(Box::new(provider), Arc::new(history)),
        );
        TestApp::spawn_with_state(AppState::new(perfector, SessionStore::default()), MockServer::start()).await
    }

    pub async fn spawn_with_state(app_state: AppState, mock_server: MockServer) -> Result<Self> {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let app_state_for_harness = app_state.clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            app_state: app_state_for_harness,
            _config_dir: None,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Creates a session and returns its id.
    pub async fn create_session(&self) -> Result<String> {
        let body: Value = self
            .client
            .post(format!("{}/sessions", self.address))
            .send()
            .await?
            .json()
            .await?;
        Ok(body["result"]["id"].as_str().unwrap().to_string())
    }

    /// POSTs a session action and returns the `result` object.
    pub async fn action(&self, id: &str, action: &str) -> Result<Value> {
        let response = self
            .client
            .post(format!("{}/sessions/{id}/{action}", self.address))
            .send()
            .await?;
        assert!(
            response.status().is_success(),
            "{action} failed with status {}",
            response.status()
        );
        let body: Value = response.json().await?;
        Ok(body["result"].clone())
    }

    /// PUTs a JSON body to a session resource and returns the `result` object.
    pub async fn put(&self, id: &str, resource: &str, payload: Value) -> Result<Value> {
        let body: Value = self
            .client
            .put(format!("{}/sessions/{id}/{resource}", self.address))
            .json(&payload)
            .send()
            .await?
            .json()
            .await?;
        Ok(body["result"].clone())
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// An OpenAI-compatible chat completion carrying `content`.
pub fn chat_completion(content: &str) -> Value {
    json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
}
