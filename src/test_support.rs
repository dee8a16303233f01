//! In-memory [`FetchJson`] for unit tests.

use crate::api::FetchJson;
use crate::error::ExtractError;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// Serves canned JSON per URL and records every requested URL.
///
/// Unknown URLs answer with HTTP 404.
#[derive(Default)]
pub struct StubFetcher {
    responses: HashMap<String, Value>,
    calls: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: impl Into<String>, body: Value) -> Self {
        self.responses.insert(url.into(), body);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl FetchJson for StubFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value, ExtractError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| ExtractError::Status {
                url: url.to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
            })
    }
}
