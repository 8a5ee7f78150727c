/// State management module
///
/// This module handles all application state, including:
/// - Tab, search, and sort state with per-tab item caches (gallery.rs)
/// - Shared data structures (data.rs)

pub mod data;
pub mod gallery;
