pub mod ai;
pub mod factory;

use crate::errors::PromptError;
use reqwest::Client;
use std::time::Duration;

/// Upper bound for one model call, connecting included.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// An HTTP client whose requests fail with a timeout error after `timeout`.
pub fn http_client(timeout: Duration) -> Result<Client, PromptError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(PromptError::ReqwestClientBuild)
}
