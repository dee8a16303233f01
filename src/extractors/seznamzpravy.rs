//! Seznam Zprávy article extractor.
//!
//! Resolution happens in two stages:
//!
//! 1. **Article**: fetch the article document from the documents API and
//!    collect its media items: the `caption` plus every content block tagged
//!    `molecule.figure.Figure`.
//! 2. **Item**: classify each item by `itemType`. `live` items need a second
//!    fetch against the live-manifest endpoint, which answers with the final
//!    stream `Location`. `video` items are turned into an SDN manifest URL
//!    without any request; resolving that manifest is left to
//!    [`super::sdn::SdnResolver`].
//!
//! # URL Pattern
//!
//! `https://www.seznamzpravy.cz/clanek/<slug>-<id>`, the older
//! `https://www.seznam.cz/zpravy/clanek/<slug>-<id>`, or a bare numeric id.

use crate::api::FetchJson;
use crate::config::ExtractorConfig;
use crate::error::{ExtractError, Stage};
use crate::models::{
    ArticleDocument, ItemKind, ItemOrigin, ItemOutcome, Playlist, ReferenceKind,
    ResolvedMediaReference, SDN_RESOLVER_KEY,
};
use crate::utils::{parse_created_date, try_get};
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::pin::pin;
use tracing::{debug, info, instrument, warn};

/// Token appended to every live and video manifest URL.
///
/// Reverse-engineered from the site's player; the upstream service does not
/// answer manifest requests without it. Its meaning is unknown, treat it as
/// opaque.
pub const MAGIC: &str = "spl2,3,VOD";

static ARTICLE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^https?://(?:www\.)?(?:seznamzpravy\.cz|seznam\.cz/zpravy)/clanek/(?:[^/?#]*-)?(?P<id>[0-9]+)",
    )
    .unwrap()
});

/// Extract the article id from an article URL or a bare numeric id.
pub fn match_article_id(input: &str) -> Result<String, ExtractError> {
    let input = input.trim();
    if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(input.to_string());
    }
    ARTICLE_URL
        .captures(input)
        .and_then(|caps| caps.name("id"))
        .map(|id| id.as_str().to_string())
        .ok_or_else(|| ExtractError::UnrecognizedUrl(input.to_string()))
}

/// Article and media-item resolver for Seznam Zprávy.
///
/// Generic over the [`FetchJson`] it talks to; a [`crate::api::HttpFetcher`]
/// works by value or by reference.
pub struct SeznamZpravy<F> {
    fetcher: F,
    config: ExtractorConfig,
}

impl<F: FetchJson> SeznamZpravy<F> {
    /// Create a resolver.
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Used for the document request and every live-manifest request
    /// * `config` - API base, concurrency and failure policy
    pub fn new(fetcher: F, config: ExtractorConfig) -> Self {
        Self { fetcher, config }
    }

    /// Resolve an article into an ordered playlist.
    ///
    /// The caption entry comes first and takes the article's title; figure
    /// blocks follow in document order with their own titles. Unsupported
    /// item types are left out silently.
    ///
    /// Items that fail are logged, recorded in [`Playlist::warnings`], and
    /// left out. With [`ExtractorConfig::strict`] set, items resolve one at a
    /// time and the first failure in document order aborts the article before
    /// any later item is fetched.
    ///
    /// # Arguments
    ///
    /// * `article_id` - Numeric article id, as returned by [`match_article_id`]
    ///
    /// # Returns
    ///
    /// The article's playlist, possibly empty.
    ///
    /// # Errors
    ///
    /// [`ExtractError::Article`] naming the article id and the failing
    /// [`Stage`].
    #[instrument(level = "info", skip(self))]
    pub async fn resolve_article(&self, article_id: &str) -> Result<Playlist, ExtractError> {
        let url = self.config.document_url(article_id);
        let document = self
            .fetch_document(&url)
            .await
            .map_err(|e| e.in_article(article_id, Stage::DocumentFetch))?;
        let content = document
            .content
            .as_deref()
            .ok_or(ExtractError::missing("content"))
            .map_err(|e| e.in_article(article_id, Stage::DocumentFetch))?;

        let mut candidates: Vec<(ItemOrigin, Result<&Value, ExtractError>)> = Vec::new();
        if let Some(caption) = document.caption.as_ref().filter(|c| !c.is_null()) {
            candidates.push((ItemOrigin::Caption, Ok(caption)));
        }
        candidates.extend(
            content
                .iter()
                .enumerate()
                .filter(|(_, block)| block.is_figure())
                .map(|(i, block)| (ItemOrigin::Block(i), block.media())),
        );
        debug!(
            blocks = content.len(),
            media_items = candidates.len(),
            "Collected media items"
        );

        // `buffered` keeps results in candidate order while live-manifest
        // fetches run concurrently. Strict mode must not start an item past
        // the first failure, so it resolves one item at a time.
        let limit = if self.config.strict {
            1
        } else {
            self.config.concurrency.max(1)
        };
        let mut outcomes = pin!(
            stream::iter(candidates)
                .map(|(origin, media)| async move {
                    let outcome = match media {
                        Ok(item) => self.resolve_outcome(item, article_id).await,
                        Err(e) => ItemOutcome::Failed(e),
                    };
                    (origin, outcome)
                })
                .buffered(limit)
        );

        let article_title = document.title.as_deref();
        let mut playlist = Playlist::new(article_id);
        let mut skipped = 0usize;
        while let Some((origin, outcome)) = outcomes.next().await {
            match outcome {
                ItemOutcome::Resolved(mut entry) => {
                    if origin == ItemOrigin::Caption {
                        if let Some(title) = article_title {
                            entry.title = title.to_string();
                        }
                    }
                    playlist.entries.push(entry);
                }
                ItemOutcome::Skipped { item_type } => {
                    skipped += 1;
                    debug!(%origin, %item_type, "Skipping unsupported media item");
                }
                ItemOutcome::Failed(e) if self.config.strict => {
                    let stage = e.item_stage();
                    return Err(e.in_article(article_id, stage));
                }
                ItemOutcome::Failed(e) => {
                    warn!(%origin, error = %e, "Media item failed; leaving it out of the playlist");
                    playlist.warnings.push(format!("{origin}: {e}"));
                }
            }
        }

        info!(
            entries = playlist.entries.len(),
            skipped,
            failed = playlist.warnings.len(),
            "Resolved article playlist"
        );
        Ok(playlist)
    }

    /// Resolve a single raw media item.
    ///
    /// # Arguments
    ///
    /// * `item` - A raw `caption` or `properties.media` descriptor
    /// * `article_id` - Id of the article the item belongs to, for logging
    ///
    /// # Returns
    ///
    /// `Ok(None)` for item types other than `live` and `video`. Only `live`
    /// items cause a request.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::MissingField`] when `itemType`, `title`, or the
    ///   type-specific URL field is absent
    /// - [`ExtractError::LiveManifest`] when the live-manifest fetch fails or
    ///   its response has no `Location`
    pub async fn resolve_item(
        &self,
        item: &Value,
        article_id: &str,
    ) -> Result<Option<ResolvedMediaReference>, ExtractError> {
        match self.resolve_outcome(item, article_id).await {
            ItemOutcome::Resolved(entry) => Ok(Some(entry)),
            ItemOutcome::Skipped { .. } => Ok(None),
            ItemOutcome::Failed(e) => Err(e),
        }
    }

    async fn resolve_outcome(&self, item: &Value, article_id: &str) -> ItemOutcome {
        let kind = match ItemKind::classify(item) {
            Ok(ItemKind::Unsupported(item_type)) => return ItemOutcome::Skipped { item_type },
            Ok(kind) => kind,
            Err(e) => return ItemOutcome::Failed(e),
        };
        match self.resolve_supported(kind == ItemKind::Live, item, article_id).await {
            Ok(entry) => ItemOutcome::Resolved(entry),
            Err(e) => ItemOutcome::Failed(e),
        }
    }

    #[instrument(level = "debug", skip(self, item))]
    async fn resolve_supported(
        &self,
        live: bool,
        item: &Value,
        article_id: &str,
    ) -> Result<ResolvedMediaReference, ExtractError> {
        let title = try_get::<String>(item, &["title"]).ok_or(ExtractError::missing("title"))?;

        let (url, duration, thumbnail) = if live {
            (self.resolve_live(item).await?, None, None)
        } else {
            let sdn = try_get::<String>(item, &["video", "sdn"])
                .ok_or(ExtractError::missing("video.sdn"))?;
            let duration = try_get::<i64>(item, &["video", "videoInfo", "duration"])
                .map(|ms| ms as f64 / 1000.0);
            let thumbnail = try_get::<String>(item, &["video", "poster", "url"]);
            (format!("{sdn}{MAGIC}"), duration, thumbnail)
        };

        let upload_date = try_get::<String>(item, &["_created"])
            .as_deref()
            .and_then(parse_created_date);

        debug!(%url, live, "Resolved media item");
        Ok(ResolvedMediaReference {
            kind: ReferenceKind::Url,
            ie_key: SDN_RESOLVER_KEY.to_string(),
            url,
            title,
            creator: try_get(item, &["author"]),
            duration,
            tags: try_get(item, &["keywords"]),
            thumbnail,
            is_live: live,
            upload_date,
        })
    }

    /// Fetch the live manifest and return the stream `Location` it points to.
    async fn resolve_live(&self, item: &Value) -> Result<String, ExtractError> {
        let base = try_get::<String>(item, &["liveStreamUrl"])
            .ok_or(ExtractError::missing("liveStreamUrl"))?;
        let url = format!("{base}{MAGIC}");

        let location = self.fetcher.fetch_json(&url).await.and_then(|manifest| {
            try_get::<String>(&manifest, &["Location"]).ok_or(ExtractError::missing("Location"))
        });
        location.map_err(|source| {
            debug!(%url, error = %source, "Live manifest fetch failed");
            ExtractError::LiveManifest {
                url,
                source: Box::new(source),
            }
        })
    }

    async fn fetch_document(&self, url: &str) -> Result<ArticleDocument, ExtractError> {
        let value = self.fetcher.fetch_json(url).await?;
        serde_json::from_value(value).map_err(|source| ExtractError::UnexpectedShape {
            url: url.to_string(),
            source,
        })
    }
}
