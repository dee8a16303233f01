//! Output generation for resolved playlists.
//!
//! # Submodules
//!
//! - [`report`]: wraps the playlist and resolved media into a [`report::Report`]
//!   and writes it as JSON or YAML

pub mod report;

use clap::ValueEnum;

/// Serialization format of the written report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}
