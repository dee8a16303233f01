//! # Seznam Zprávy Media
//!
//! Extracts video playlists from [Seznam Zprávy](https://www.seznamzpravy.cz)
//! articles and resolves the SDN manifests their videos point at.
//!
//! ## Architecture
//!
//! The pipeline has two resolution stages:
//! 1. **Article**: fetch the article document and collect its media items
//!    (the caption plus every figure block)
//! 2. **Item**: classify each item; `live` items are resolved with one extra
//!    fetch, `video` items become SDN manifest references
//!
//! The resulting [`models::Playlist`] is what a downloader consumes. Each
//! entry is tagged with the `SDN` resolver key; [`extractors::sdn::SdnResolver`]
//! turns a manifest reference into a concrete MP4 URL.
//!
//! ## Usage
//!
//! ```ignore
//! use seznam_zpravy_media::{ExtractorConfig, HttpFetcher, SeznamZpravy};
//!
//! let config = ExtractorConfig::default();
//! let fetcher = HttpFetcher::new(&config)?;
//! let playlist = SeznamZpravy::new(&fetcher, config).resolve_article("64087").await?;
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod extractors;
pub mod models;
pub mod outputs;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use api::{FetchJson, HttpFetcher};
pub use config::ExtractorConfig;
pub use error::{ExtractError, Stage};
pub use extractors::sdn::SdnResolver;
pub use extractors::seznamzpravy::{MAGIC, SeznamZpravy, match_article_id};
pub use models::{Playlist, ResolvedMedia, ResolvedMediaReference};
