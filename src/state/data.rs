/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the catalog layer and the UI layer.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// A single notebook entry in the gallery catalog
///
/// The catalog service is authoritative for every field; the app only holds
/// transient, possibly stale copies per tab. Counters are patched locally
/// after favorite/download actions so the UI stays consistent without a
/// full re-fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    /// Catalog-assigned unique ID
    pub id: String,
    /// Display name of the notebook
    pub name: String,
    /// Short description shown on the card
    pub description: String,
    /// Author display name
    pub author: String,
    /// Free-form tags (clickable on the card, searchable)
    #[serde(default)]
    pub tags: Vec<String>,
    /// View counter
    pub views: u64,
    /// Download counter
    pub downloads: u64,
    /// Favorite counter
    pub favorites: u64,
    /// Creation timestamp as reported by the catalog (RFC 3339)
    pub created: String,
}

impl GalleryItem {
    /// Parse the creation timestamp for sorting.
    ///
    /// Items with an unparseable timestamp sort after everything else
    /// when ordering by most recent.
    pub fn created_timestamp(&self) -> i64 {
        DateTime::parse_from_rfc3339(&self.created)
            .map(|dt| dt.timestamp_millis())
            .unwrap_or(i64::MIN)
    }
}
