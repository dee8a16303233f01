//! Helpers for reading untyped upstream JSON, parsing timestamps, and logging.
//!
//! The upstream API is loosely typed: optional fields may be missing, `null`,
//! or carry an unexpected type. [`try_get`] gives every such lookup the same
//! tolerant behavior: the value when it exists and has the expected type,
//! otherwise `None`.

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument};

/// Timestamp layout of the `_created` field, e.g. `2021-03-05 10:00:00`.
pub const CREATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Walk `path` from `value` and return the node at the end, if every key exists.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |node, key| node.get(*key))
}

/// Read the value at `path` as a `T`.
///
/// Returns `None` when any key along the path is missing or when the final
/// node does not deserialize as `T`. An integer read of `12.5` or a string
/// read of `42` both yield `None`.
///
/// # Examples
///
/// ```ignore
/// let item = json!({"video": {"videoInfo": {"duration": 12345}}});
/// assert_eq!(try_get::<i64>(&item, &["video", "videoInfo", "duration"]), Some(12345));
/// assert_eq!(try_get::<String>(&item, &["video", "poster", "url"]), None);
/// ```
pub fn try_get<T: DeserializeOwned>(value: &Value, path: &[&str]) -> Option<T> {
    let node = lookup(value, path)?;
    if node.is_null() {
        return None;
    }
    T::deserialize(node).ok()
}

/// Parse a `_created` timestamp and keep its date portion.
///
/// Any parse failure yields `None`; malformed upstream timestamps are not an
/// error.
pub fn parse_created_date(raw: &str) -> Option<NaiveDate> {
    match NaiveDateTime::parse_from_str(raw, CREATED_FORMAT) {
        Ok(dt) => Some(dt.date()),
        Err(e) => {
            debug!(raw, error = %e, "Dropping unparsable _created timestamp");
            None
        }
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at `max` bytes (backing off to a char boundary) with
/// an ellipsis and the number of omitted bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Make sure the directory that will hold `path` exists.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn ensure_parent_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).await?;
            Ok(())
        }
        _ => Ok(()),
    }
}
