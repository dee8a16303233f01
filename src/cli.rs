//! Command-line interface definitions.
//!
//! Network settings can be provided via flags or environment variables.

use clap::Parser;
use seznam_zpravy_media::config::{DEFAULT_API_BASE, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT};
use seznam_zpravy_media::outputs::OutputFormat;
use seznam_zpravy_media::ExtractorConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Extract the video playlist of a Seznam Zprávy article.
///
/// # Examples
///
/// ```sh
/// # Print the playlist as JSON
/// seznam_zpravy_media https://www.seznamzpravy.cz/clanek/64087
///
/// # Resolve SDN manifests to MP4 URLs and write YAML to a file
/// seznam_zpravy_media 64087 --resolve-manifests -f yaml -o out/64087.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Article URL or numeric article id
    pub input: String,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Also resolve each video's SDN manifest to a concrete MP4 URL
    #[arg(long)]
    pub resolve_manifests: bool,

    /// Fail the whole article when any media item fails
    #[arg(long)]
    pub strict: bool,

    /// Media items resolved concurrently per article
    #[arg(long, env = "SEZNAM_ZPRAVY_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, env = "SEZNAM_ZPRAVY_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Base URL of the article document API
    #[arg(long, env = "SEZNAM_ZPRAVY_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,
}

impl Cli {
    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            api_base: self.api_base.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            concurrency: self.concurrency,
            strict: self.strict,
            ..ExtractorConfig::default()
        }
    }
}
