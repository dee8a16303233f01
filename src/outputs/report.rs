//! Serialized run report: the playlist plus any resolved SDN media.
//!
//! The report is written to stdout, or to a file when a path is given. Its
//! shape is the same in both formats:
//!
//! ```text
//! playlist:
//!   _type: playlist
//!   id: "64087"
//!   entries: [...]
//! media: [...]        # only with --resolve-manifests
//! ```

use super::OutputFormat;
use crate::models::{Playlist, ResolvedMedia};
use crate::utils::ensure_parent_dir;
use serde::Serialize;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument};

#[derive(Debug, Serialize)]
pub struct Report {
    pub playlist: Playlist,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<ResolvedMedia>,
}

/// Render `report` in `format`.
pub fn render(report: &Report, format: OutputFormat) -> Result<String, Box<dyn Error>> {
    let mut text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
        OutputFormat::Yaml => serde_yaml::to_string(report)?,
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}

/// Write `report` to `output`, or to stdout when no path is given.
///
/// Missing parent directories of `output` are created.
#[instrument(level = "info", skip_all, fields(playlist = %report.playlist.id, ?format))]
pub async fn write_report(
    report: &Report,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let text = render(report, format)?;

    match output {
        Some(path) => {
            ensure_parent_dir(path).await?;
            fs::write(path, &text).await?;
            info!(path = %path.display(), bytes = text.len(), "Wrote report");
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(text.as_bytes()).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> Report {
        Report {
            playlist: Playlist::new("64087"),
            media: vec![ResolvedMedia {
                id: "abc".to_string(),
                title: "Unknown".to_string(),
                url: "https://cdn.example/480.mp4".to_string(),
            }],
        }
    }

    #[test]
    fn test_render_json() {
        let text = render(&report(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["playlist"]["_type"], "playlist");
        assert_eq!(value["playlist"]["id"], "64087");
        assert_eq!(value["media"][0]["url"], "https://cdn.example/480.mp4");
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_render_json_without_media() {
        let report = Report {
            playlist: Playlist::new("1"),
            media: Vec::new(),
        };
        let value: serde_json::Value =
            serde_json::from_str(&render(&report, OutputFormat::Json).unwrap()).unwrap();
        assert!(value.get("media").is_none());
    }

    #[test]
    fn test_render_yaml() {
        let text = render(&report(), OutputFormat::Yaml).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(value["playlist"]["_type"].as_str(), Some("playlist"));
        assert_eq!(value["media"][0]["id"].as_str(), Some("abc"));
    }

    #[tokio::test]
    async fn test_write_report_to_file() {
        let dir = std::env::temp_dir().join(format!("seznam_zpravy_media_{}", std::process::id()));
        let path = dir.join("nested").join("playlist.json");

        write_report(&report(), OutputFormat::Json, Some(&path))
            .await
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"64087\""));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
