//! Command-line entry point.
//!
//! ```sh
//! seznam_zpravy_media https://www.seznamzpravy.cz/clanek/64087 --resolve-manifests
//! ```
//!
//! Logs go to stderr (filter with `RUST_LOG`); the report goes to stdout or
//! the `--output` file.

use clap::Parser;
use seznam_zpravy_media::outputs::report::{Report, write_report};
use seznam_zpravy_media::{HttpFetcher, SdnResolver, SeznamZpravy, match_article_id};
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let article_id = match match_article_id(&args.input) {
        Ok(id) => id,
        Err(e) => {
            error!(input = %args.input, error = %e, "Not a Seznam Zprávy article");
            return Err(e.into());
        }
    };

    let config = args.extractor_config();
    let fetcher = HttpFetcher::new(&config)?;
    let extractor = SeznamZpravy::new(&fetcher, config);

    let playlist = match extractor.resolve_article(&article_id).await {
        Ok(playlist) => playlist,
        Err(e) => {
            error!(%article_id, error = %e, "Article resolution failed");
            return Err(e.into());
        }
    };

    let media = if args.resolve_manifests {
        SdnResolver::new(&fetcher).resolve_playlist(&playlist).await
    } else {
        Vec::new()
    };

    let report = Report { playlist, media };
    write_report(&report, args.format, args.output.as_deref()).await?;

    let elapsed = start_time.elapsed();
    info!(
        %article_id,
        entries = report.playlist.entries.len(),
        warnings = report.playlist.warnings.len(),
        media = report.media.len(),
        millis = elapsed.as_millis() as u64,
        "Execution complete"
    );
    Ok(())
}
