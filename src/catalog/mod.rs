/// Remote notebook catalog module
///
/// This module handles all communication with the catalog service:
/// - Listing endpoints per tab (samples, public, favorites, published)
/// - Mutations (favorite, unfavorite, download count, delete)
/// - Notebook content URLs and content fetch

pub mod client;

pub use client::{CatalogClient, CatalogError};
