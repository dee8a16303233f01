//! Error types for article and manifest resolution.
//!
//! Every failure the extractors can surface is an [`ExtractError`]. Failures
//! that the pipeline tolerates (unparsable timestamps, unsupported item types)
//! never become errors; they are absorbed where they occur.

use std::fmt;
use thiserror::Error;

/// The pipeline stage an article-level error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Fetching or decoding the article document itself.
    DocumentFetch,
    /// Classifying or reading fields of a single media item.
    ItemResolution,
    /// The secondary fetch performed for `live` items.
    LiveManifestFetch,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::DocumentFetch => "document fetch",
            Stage::ItemResolution => "item resolution",
            Stage::LiveManifestFetch => "live manifest fetch",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("missing or invalid field `{field}`")]
    MissingField { field: &'static str },

    #[error("request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("response from {url} is not valid JSON: {source}")]
    MalformedBody {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Valid JSON that does not have the layout the extractor reads.
    #[error("response from {url} has an unexpected shape: {source}")]
    UnexpectedShape {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("live manifest {url} could not be resolved: {source}")]
    LiveManifest {
        url: String,
        #[source]
        source: Box<ExtractError>,
    },

    #[error("unrecognized URL: {0}")]
    UnrecognizedUrl(String),

    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("article {article_id} failed during {stage}: {source}")]
    Article {
        article_id: String,
        stage: Stage,
        #[source]
        source: Box<ExtractError>,
    },
}

impl ExtractError {
    pub fn missing(field: &'static str) -> Self {
        ExtractError::MissingField { field }
    }

    /// Stage an item-level error belongs to when it is raised for an article.
    pub fn item_stage(&self) -> Stage {
        match self {
            ExtractError::LiveManifest { .. } => Stage::LiveManifestFetch,
            _ => Stage::ItemResolution,
        }
    }

    /// Attach the article id and failing stage to this error.
    pub fn in_article(self, article_id: &str, stage: Stage) -> Self {
        ExtractError::Article {
            article_id: article_id.to_string(),
            stage,
            source: Box::new(self),
        }
    }

    /// The stage recorded on an article-level error, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ExtractError::Article { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message() {
        let err = ExtractError::missing("itemType");
        assert_eq!(err.to_string(), "missing or invalid field `itemType`");
    }

    #[test]
    fn test_item_stage_for_live_manifest() {
        let err = ExtractError::LiveManifest {
            url: "https://live.example/spl2,3,VOD".to_string(),
            source: Box::new(ExtractError::missing("Location")),
        };
        assert_eq!(err.item_stage(), Stage::LiveManifestFetch);
        assert_eq!(ExtractError::missing("title").item_stage(), Stage::ItemResolution);
    }

    #[test]
    fn test_in_article_names_id_and_stage() {
        let err = ExtractError::missing("content").in_article("64087", Stage::DocumentFetch);
        assert_eq!(err.stage(), Some(Stage::DocumentFetch));
        assert_eq!(
            err.to_string(),
            "article 64087 failed during document fetch: missing or invalid field `content`"
        );
    }

    #[test]
    fn test_unexpected_shape_is_not_reported_as_invalid_json() {
        let source = serde_json::from_value::<String>(serde_json::json!([1])).unwrap_err();
        let err = ExtractError::UnexpectedShape {
            url: "https://api.seznamzpravy.cz/v1/documents/1".to_string(),
            source,
        };
        let message = err.to_string();
        assert!(message.contains("has an unexpected shape"));
        assert!(!message.contains("not valid JSON"));
    }
}
