//! # Prompt History
//!
//! Every generated prompt is appended to a history store. The write runs in
//! the background: a failing or slow store never delays or fails generation.

use crate::{errors::PromptError, providers::http_client};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::Debug,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// One generated prompt as written to the history store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub original_question: String,
    pub optimized_prompt: String,
    pub options: BTreeMap<String, String>,
    pub persona: String,
    pub method: String,
    pub created_at: DateTime<Utc>,
}

/// An append-only store for generated prompts.
#[async_trait]
pub trait HistorySink: Send + Sync + Debug {
    async fn append(&self, record: &HistoryRecord) -> Result<(), PromptError>;
}

/// Appends `record` on a spawned task, logging failures instead of returning them.
pub fn record_in_background(sink: Arc<dyn HistorySink>, record: HistoryRecord) -> JoinHandle<()> {
    tokio::spawn(async move {
        match sink.append(&record).await {
            Ok(()) => debug!("History record stored"),
            Err(e) => warn!("Failed to store history record: {e}"),
        }
    })
}

/// Logs each record and stores nothing.
#[derive(Debug, Clone, Default)]
pub struct LogHistorySink;

#[async_trait]
impl HistorySink for LogHistorySink {
    async fn append(&self, record: &HistoryRecord) -> Result<(), PromptError> {
        info!(
            persona = %record.persona,
            method = %record.method,
            options = record.options.len(),
            "Generated prompt for question: {}",
            record.original_question
        );
        Ok(())
    }
}

/// Keeps records in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistorySink {
    records: Arc<Mutex<Vec<HistoryRecord>>>,
}

impl MemoryHistorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<HistoryRecord> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl HistorySink for MemoryHistorySink {
    async fn append(&self, record: &HistoryRecord) -> Result<(), PromptError> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(record.clone());
        Ok(())
    }
}

/// POSTs each record as JSON to a remote endpoint.
#[derive(Debug, Clone)]
pub struct HttpHistorySink {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

/// How long one history write may take before it is abandoned.
pub const HISTORY_TIMEOUT: Duration = Duration::from_secs(10);

impl HttpHistorySink {
    pub fn new(endpoint: String, api_key: Option<String>) -> Result<Self, PromptError> {
        Ok(Self {
            client: http_client(HISTORY_TIMEOUT)?,
            endpoint,
            api_key,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, PromptError> {
        self.client = http_client(timeout)?;
        Ok(self)
    }
}

#[async_trait]
impl HistorySink for HttpHistorySink {
    async fn append(&self, record: &HistoryRecord) -> Result<(), PromptError> {
        let mut request = self.client.post(&self.endpoint).json(record);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request
            .send()
            .await
            .map_err(|e| PromptError::History(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PromptError::History(format!("{status}: {body}")));
        }
        Ok(())
    }
}
