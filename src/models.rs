//! Data models for article documents, media items, and produced playlists.
//!
//! This module defines the structures flowing through the pipeline:
//! - [`ArticleDocument`] / [`ContentBlock`]: the article API response
//! - [`ItemKind`]: classification of a raw media-item descriptor
//! - [`ResolvedMediaReference`] / [`Playlist`]: what downstream consumers get
//! - [`ItemOutcome`]: per-item result folded into the playlist
//! - [`ResolvedMedia`]: the output of the companion SDN manifest resolver
//!
//! Raw media items stay as [`serde_json::Value`]; their fields are read with
//! [`crate::utils::try_get`] because the upstream shape varies per item type.

use crate::error::ExtractError;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Component tag of content blocks that embed a media item.
pub const FIGURE_COMPONENT: &str = "molecule.figure.Figure";

/// Key identifying the companion manifest resolver entries are delegated to.
pub const SDN_RESOLVER_KEY: &str = "SDN";

/// An article as returned by the document endpoint.
///
/// Only the fields the pipeline reads are modeled, and each of them tolerates
/// a wrong type: a non-string `title` reads as absent, a non-array `content`
/// as missing, and a block without a string `component` as a non-figure.
/// Decoding only fails when the body is not a JSON object at all.
#[derive(Debug, Deserialize)]
pub struct ArticleDocument {
    /// Upstream article id, numeric or string depending on the endpoint.
    #[serde(default)]
    pub id: Option<Value>,
    /// Article headline; the caption entry takes it over.
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    /// Lead media item. `null` and absent are the same thing here.
    #[serde(default)]
    pub caption: Option<Value>,
    /// Body blocks in document order. `None` when absent or not an array.
    #[serde(default, deserialize_with = "lenient_blocks")]
    pub content: Option<Vec<ContentBlock>>,
}

/// One block of an article body.
///
/// Built from any JSON value; blocks that are not objects end up with
/// neither a component nor properties.
#[derive(Debug, Default, Deserialize)]
#[serde(from = "Value")]
pub struct ContentBlock {
    /// Component tag such as `molecule.figure.Figure`, when it is a string.
    pub component: Option<String>,
    /// Component-specific payload; figures keep their item under `media`.
    pub properties: Option<Value>,
}

impl From<Value> for ContentBlock {
    fn from(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return Self::default();
        };
        let component = match fields.remove("component") {
            Some(Value::String(tag)) => Some(tag),
            _ => None,
        };
        Self {
            component,
            properties: fields.remove("properties"),
        }
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_blocks<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<ContentBlock>>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(blocks)) => Some(blocks.into_iter().map(ContentBlock::from).collect()),
        _ => None,
    })
}

impl ContentBlock {
    /// Whether this block embeds a media item.
    pub fn is_figure(&self) -> bool {
        self.component.as_deref() == Some(FIGURE_COMPONENT)
    }

    /// The embedded media descriptor of a figure block.
    pub fn media(&self) -> Result<&Value, ExtractError> {
        self.properties
            .as_ref()
            .and_then(|p| p.get("media"))
            .filter(|m| !m.is_null())
            .ok_or(ExtractError::missing("properties.media"))
    }
}

/// Classification of a raw media-item descriptor by its `itemType`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    Live,
    Video,
    /// Images, polls and anything else the pipeline does not resolve.
    Unsupported(String),
}

impl ItemKind {
    /// Classify `item` by its `itemType` tag.
    ///
    /// A missing tag is an error; a tag of any other value (or type) is
    /// [`ItemKind::Unsupported`].
    pub fn classify(item: &Value) -> Result<Self, ExtractError> {
        let tag = item
            .get("itemType")
            .filter(|t| !t.is_null())
            .ok_or(ExtractError::missing("itemType"))?;
        Ok(match tag.as_str() {
            Some("live") => ItemKind::Live,
            Some("video") => ItemKind::Video,
            Some(other) => ItemKind::Unsupported(other.to_string()),
            None => ItemKind::Unsupported(tag.to_string()),
        })
    }
}

/// How the downstream consumer should treat an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// Hand `url` to the resolver named by `ie_key`.
    Url,
}

/// A single playlist entry pointing at a manifest (or, for live items, the
/// already resolved stream location).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMediaReference {
    /// Always [`ReferenceKind::Url`]; serialized as `_type`.
    #[serde(rename = "_type")]
    pub kind: ReferenceKind,
    /// Resolver that finishes the job, [`SDN_RESOLVER_KEY`].
    pub ie_key: String,
    /// SDN manifest URL (with the magic token) or final live stream location.
    pub url: String,
    pub title: String,
    /// The item's `author`.
    pub creator: Option<String>,
    /// Seconds, from the millisecond `videoInfo.duration` of video items.
    pub duration: Option<f64>,
    /// The item's `keywords`.
    pub tags: Option<Vec<String>>,
    /// Poster image URL of video items.
    pub thumbnail: Option<String>,
    pub is_live: bool,
    /// Date part of `_created`; absent when it does not parse.
    pub upload_date: Option<NaiveDate>,
}

/// Type tag of a [`Playlist`], serialized as `_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistKind {
    Playlist,
}

/// Ordered playlist produced for one article.
///
/// The caption entry, when present, comes first and carries the article
/// title. `warnings` lists items that failed and were left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    #[serde(rename = "_type")]
    pub kind: PlaylistKind,
    /// The article id.
    pub id: String,
    /// Never set by the article resolver; the title lives on the entries.
    pub title: Option<String>,
    pub entries: Vec<ResolvedMediaReference>,
    /// One `"<origin>: <error>"` line per item left out.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Playlist {
    /// Create an empty playlist for an article.
    ///
    /// # Arguments
    ///
    /// * `id` - The article id the playlist is named after
    ///
    /// # Returns
    ///
    /// A playlist with no title, entries or warnings.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            kind: PlaylistKind::Playlist,
            id: id.into(),
            title: None,
            entries: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the article yielded no playable entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where in the article a media item was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOrigin {
    Caption,
    /// Index into the article's `content` sequence.
    Block(usize),
}

impl std::fmt::Display for ItemOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemOrigin::Caption => f.write_str("caption"),
            ItemOrigin::Block(i) => write!(f, "content[{i}]"),
        }
    }
}

/// Result of resolving one media item of an article.
#[derive(Debug)]
pub enum ItemOutcome {
    Resolved(ResolvedMediaReference),
    /// An item type the pipeline does not handle; dropped silently.
    Skipped { item_type: String },
    Failed(ExtractError),
}

/// A concrete media file produced by the SDN manifest resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMedia {
    /// Manifest id taken from the SDN URL.
    pub id: String,
    /// Manifests carry no title, so this is always `Unknown`.
    pub title: String,
    /// Absolute URL of the 480p MP4 rendition.
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_reference() -> ResolvedMediaReference {
        ResolvedMediaReference {
            kind: ReferenceKind::Url,
            ie_key: SDN_RESOLVER_KEY.to_string(),
            url: "https://v.sdn.cz/manifestspl2,3,VOD".to_string(),
            title: "Rozhovor".to_string(),
            creator: None,
            duration: Some(12.345),
            tags: None,
            thumbnail: None,
            is_live: false,
            upload_date: NaiveDate::from_ymd_opt(2021, 3, 5),
        }
    }

    #[test]
    fn test_classify_item_kinds() {
        assert_eq!(ItemKind::classify(&json!({"itemType": "live"})).unwrap(), ItemKind::Live);
        assert_eq!(ItemKind::classify(&json!({"itemType": "video"})).unwrap(), ItemKind::Video);
        assert_eq!(
            ItemKind::classify(&json!({"itemType": "image"})).unwrap(),
            ItemKind::Unsupported("image".to_string())
        );
        assert_eq!(
            ItemKind::classify(&json!({"itemType": 3})).unwrap(),
            ItemKind::Unsupported("3".to_string())
        );
    }

    #[test]
    fn test_classify_missing_item_type() {
        let err = ItemKind::classify(&json!({"title": "x"})).unwrap_err();
        assert!(matches!(err, ExtractError::MissingField { field: "itemType" }));
        assert!(ItemKind::classify(&json!({"itemType": null})).is_err());
    }

    #[test]
    fn test_document_deserialization() {
        let doc: ArticleDocument = serde_json::from_value(json!({
            "id": 64087,
            "title": "Titulek",
            "caption": null,
            "content": [
                {"component": "molecule.figure.Figure", "properties": {"media": {"itemType": "video"}}},
                {"component": "atom.paragraph.Paragraph"},
                {"properties": {}}
            ]
        }))
        .unwrap();

        assert_eq!(doc.title.as_deref(), Some("Titulek"));
        assert!(doc.caption.is_none());
        let content = doc.content.unwrap();
        assert_eq!(content.len(), 3);
        assert!(content[0].is_figure());
        assert!(content[0].media().is_ok());
        assert!(!content[1].is_figure());
        assert!(!content[2].is_figure());
    }

    #[test]
    fn test_document_with_wrong_typed_fields() {
        let doc: ArticleDocument = serde_json::from_value(json!({
            "title": {"main": "Titulek"},
            "content": [
                {"component": 42, "properties": {"media": {"itemType": "video"}}},
                "stray text",
                null,
                {"component": "molecule.figure.Figure", "properties": {"media": {"itemType": "live"}}}
            ]
        }))
        .unwrap();

        assert_eq!(doc.title, None);
        let content = doc.content.unwrap();
        assert_eq!(content.len(), 4);
        assert!(!content[0].is_figure());
        assert!(content[0].properties.is_some());
        assert!(!content[1].is_figure());
        assert!(!content[2].is_figure());
        assert!(content[3].is_figure());
    }

    #[test]
    fn test_document_content_not_an_array() {
        let doc: ArticleDocument =
            serde_json::from_value(json!({"title": "Titulek", "content": "none"})).unwrap();
        assert!(doc.content.is_none());
        assert!(serde_json::from_value::<ArticleDocument>(json!(["not", "an", "object"])).is_err());
    }

    #[test]
    fn test_figure_without_media() {
        let block: ContentBlock = serde_json::from_value(json!({
            "component": "molecule.figure.Figure",
            "properties": {"media": null}
        }))
        .unwrap();
        assert!(matches!(
            block.media(),
            Err(ExtractError::MissingField { field: "properties.media" })
        ));
    }

    #[test]
    fn test_reference_serialization() {
        let value = serde_json::to_value(sample_reference()).unwrap();
        assert_eq!(value["_type"], "url");
        assert_eq!(value["ie_key"], "SDN");
        assert_eq!(value["upload_date"], "2021-03-05");
        assert_eq!(value["duration"], 12.345);
        assert!(value["thumbnail"].is_null());
    }

    #[test]
    fn test_playlist_serialization_omits_empty_warnings() {
        let mut playlist = Playlist::new("64087");
        playlist.entries.push(sample_reference());

        let value = serde_json::to_value(&playlist).unwrap();
        assert_eq!(value["_type"], "playlist");
        assert_eq!(value["id"], "64087");
        assert!(value["title"].is_null());
        assert_eq!(value["entries"].as_array().unwrap().len(), 1);
        assert!(value.get("warnings").is_none());
    }

    #[test]
    fn test_item_origin_display() {
        assert_eq!(ItemOrigin::Caption.to_string(), "caption");
        assert_eq!(ItemOrigin::Block(4).to_string(), "content[4]");
    }
}
