//! Runtime settings for the extractors.
//!
//! The binary fills this from its command-line arguments; library users
//! construct it directly or start from [`ExtractorConfig::default`].

use std::time::Duration;

/// Base URL of the article document endpoint; the article id is appended.
pub const DEFAULT_API_BASE: &str = "https://api.seznamzpravy.cz/v1/documents/";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Number of media items of one article resolved at the same time.
pub const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub api_base: String,
    pub timeout: Duration,
    pub concurrency: usize,
    /// Abort the whole article on the first failing media item instead of
    /// skipping it with a warning.
    pub strict: bool,
    pub user_agent: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            concurrency: DEFAULT_CONCURRENCY,
            strict: false,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ExtractorConfig {
    /// Document URL for `article_id`.
    pub fn document_url(&self, article_id: &str) -> String {
        format!("{}{}", self.api_base, article_id)
    }
}
