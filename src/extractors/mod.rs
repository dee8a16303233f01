//! Extractors for Seznam Zprávy articles and the SDN manifests they embed.
//!
//! | Extractor | Module | Input | Output |
//! |-----------|--------|-------|--------|
//! | Seznam Zprávy | [`seznamzpravy`] | article URL or id | [`crate::models::Playlist`] |
//! | SDN | [`sdn`] | manifest URL | [`crate::models::ResolvedMedia`] |
//!
//! Both are generic over [`crate::api::FetchJson`], so they can share one
//! HTTP client by reference.

pub mod sdn;
pub mod seznamzpravy;
