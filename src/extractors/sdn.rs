//! SDN manifest resolver.
//!
//! Video entries produced by [`super::seznamzpravy`] point at an SDN (Seznam
//! CDN) manifest rather than at a media file. Fetching the manifest yields a
//! JSON document listing encodings; the 480p MP4 rendition is picked and its
//! URL, often relative, is resolved against the manifest URL.

use crate::api::FetchJson;
use crate::error::ExtractError;
use crate::models::{Playlist, ResolvedMedia, SDN_RESOLVER_KEY};
use crate::utils::try_get;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, instrument, warn};
use url::Url;

static MANIFEST_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^https?://.*.sdn\.cz/~SEC1~expire-[0-9]+~scope-video~[a-zA-Z0-9-]+/v_[0-9]+/vmd/(?:.*?_)?(?P<id>[0-9a-f]+)\?fl=.*",
    )
    .unwrap()
});

/// Title reported for manifests; they carry no title of their own.
pub const UNKNOWN_TITLE: &str = "Unknown";

const RENDITION_PATH: [&str; 4] = ["data", "mp4", "480p", "url"];

pub struct SdnResolver<F> {
    fetcher: F,
}

impl<F: FetchJson> SdnResolver<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Whether `url` looks like an SDN video manifest.
    pub fn suitable(url: &str) -> bool {
        MANIFEST_URL.is_match(url)
    }

    /// The video id embedded in a manifest URL.
    pub fn match_id(url: &str) -> Option<String> {
        MANIFEST_URL
            .captures(url)
            .and_then(|caps| caps.name("id"))
            .map(|id| id.as_str().to_string())
    }

    /// Fetch a manifest and return the 480p MP4 rendition.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::UnrecognizedUrl`] if `manifest_url` is not an SDN manifest
    /// - fetch errors from the underlying [`FetchJson`]
    /// - [`ExtractError::MissingField`] if the manifest lists no 480p MP4
    #[instrument(level = "info", skip(self))]
    pub async fn resolve(&self, manifest_url: &str) -> Result<ResolvedMedia, ExtractError> {
        let id = Self::match_id(manifest_url)
            .ok_or_else(|| ExtractError::UnrecognizedUrl(manifest_url.to_string()))?;

        let manifest = self.fetcher.fetch_json(manifest_url).await?;
        let rendition = try_get::<String>(&manifest, &RENDITION_PATH)
            .ok_or(ExtractError::missing("data.mp4.480p.url"))?;

        let base = Url::parse(manifest_url).map_err(|source| ExtractError::InvalidUrl {
            url: manifest_url.to_string(),
            source,
        })?;
        let url = base
            .join(&rendition)
            .map_err(|source| ExtractError::InvalidUrl {
                url: rendition.clone(),
                source,
            })?;

        Ok(ResolvedMedia {
            id,
            title: UNKNOWN_TITLE.to_string(),
            url: url.to_string(),
        })
    }

    /// Resolve every SDN-delegated, non-live entry of `playlist`.
    ///
    /// Entries whose manifest cannot be resolved are logged and left out;
    /// output order follows the playlist.
    #[instrument(level = "info", skip_all, fields(playlist = %playlist.id))]
    pub async fn resolve_playlist(&self, playlist: &Playlist) -> Vec<ResolvedMedia> {
        let mut media = Vec::new();
        for entry in playlist
            .entries
            .iter()
            .filter(|e| !e.is_live && e.ie_key == SDN_RESOLVER_KEY)
        {
            if !Self::suitable(&entry.url) {
                warn!(url = %entry.url, title = %entry.title, "Not an SDN manifest; skipping");
                continue;
            }
            match self.resolve(&entry.url).await {
                Ok(resolved) => media.push(resolved),
                Err(e) => warn!(url = %entry.url, error = %e, "SDN manifest resolution failed"),
            }
        }
        info!(count = media.len(), "Resolved SDN manifests");
        media
    }
}
