/// Gallery view state: tabs, search, sort, and per-tab item caches
///
/// The catalog service owns the data; this module owns a keyed store of
/// per-tab caches plus the filter/sort pipeline that turns a raw cache
/// into the list the UI actually renders.

use std::cmp::Reverse;
use std::fmt;

use super::data::GalleryItem;

/// The four mutually exclusive content tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    OfficialSamples,
    PublicGallery,
    Favorites,
    Published,
}

impl Tab {
    pub const ALL: [Tab; 4] = [
        Tab::OfficialSamples,
        Tab::PublicGallery,
        Tab::Favorites,
        Tab::Published,
    ];

    /// Header text shown in the tab bar
    pub fn title(self) -> &'static str {
        match self {
            Tab::OfficialSamples => "Official samples",
            Tab::PublicGallery => "Public gallery",
            Tab::Favorites => "Liked",
            Tab::Published => "Your published work",
        }
    }

    fn index(self) -> usize {
        match self {
            Tab::OfficialSamples => 0,
            Tab::PublicGallery => 1,
            Tab::Favorites => 2,
            Tab::Published => 3,
        }
    }
}

/// Sort order for the currently displayed list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    MostViewed,
    MostDownloaded,
    MostFavorited,
    MostRecent,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::MostViewed,
        SortKey::MostDownloaded,
        SortKey::MostFavorited,
        SortKey::MostRecent,
    ];
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortKey::MostViewed => "Most viewed",
            SortKey::MostDownloaded => "Most downloaded",
            SortKey::MostFavorited => "Most favorited",
            SortKey::MostRecent => "Most recent",
        })
    }
}

/// One tab's cached data.
///
/// `raw` is what the catalog last returned; `view` is the filtered/sorted
/// list the UI renders. Both stay `None` until the first successful load
/// completes, which is distinct from a loaded-but-empty list: `None`
/// suppresses list rendering entirely.
#[derive(Debug, Default)]
struct TabCache {
    raw: Option<Vec<GalleryItem>>,
    view: Option<Vec<GalleryItem>>,
}

/// All gallery view state: active tab, sort key, search text, and the
/// keyed tab → items store.
#[derive(Debug)]
pub struct GalleryState {
    pub active_tab: Tab,
    pub sort_by: SortKey,
    pub search_text: String,
    caches: [TabCache; 4],
}

impl Default for GalleryState {
    fn default() -> Self {
        Self::new()
    }
}

impl GalleryState {
    pub fn new() -> Self {
        GalleryState {
            active_tab: Tab::OfficialSamples,
            sort_by: SortKey::MostViewed,
            search_text: String::new(),
            caches: Default::default(),
        }
    }

    /// Switch the active tab.
    ///
    /// Search text is reset on every switch: each tab's content differs,
    /// so a carried-over query would silently hide items.
    pub fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        self.search_text.clear();
    }

    /// Store a freshly fetched list for a tab and recompute its view.
    pub fn set_items(&mut self, tab: Tab, items: Vec<GalleryItem>) {
        self.caches[tab.index()].raw = Some(items);
        self.refresh_view(tab);
    }

    /// Recompute a tab's view list from its raw cache using the current
    /// search text and sort key. No-op while the tab has never loaded.
    pub fn refresh_view(&mut self, tab: Tab) {
        let search_text = self.search_text.clone();
        let sort_by = self.sort_by;
        let cache = &mut self.caches[tab.index()];

        cache.view = cache.raw.as_deref().map(|raw| {
            let mut items = filter(&search_text, raw);
            order(sort_by, &mut items);
            items
        });
    }

    /// The filtered/sorted list for a tab, or `None` before its first load
    pub fn view_items(&self, tab: Tab) -> Option<&[GalleryItem]> {
        self.caches[tab.index()].view.as_deref()
    }

    /// Raw (unfiltered) cache contents for a tab
    pub fn raw_items(&self, tab: Tab) -> Option<&[GalleryItem]> {
        self.caches[tab.index()].raw.as_deref()
    }

    /// Whether an item is in the favorites cache, regardless of which tab
    /// it is being rendered in
    pub fn is_favorite(&self, id: &str) -> bool {
        self.raw_items(Tab::Favorites)
            .is_some_and(|items| items.iter().any(|item| item.id == id))
    }

    /// Append a freshly favorited item to the favorites cache, creating
    /// the cache if it never loaded.
    pub fn add_favorite(&mut self, item: GalleryItem) {
        self.caches[Tab::Favorites.index()]
            .raw
            .get_or_insert_with(Vec::new)
            .push(item);
    }

    /// Drop an item from the favorites cache by ID
    pub fn remove_favorite(&mut self, id: &str) {
        if let Some(favorites) = &mut self.caches[Tab::Favorites.index()].raw {
            favorites.retain(|item| item.id != id);
        }
    }

    /// Drop an item from the published cache by ID
    pub fn remove_published(&mut self, id: &str) {
        if let Some(published) = &mut self.caches[Tab::Published.index()].raw {
            published.retain(|item| item.id != id);
        }
    }

    /// Replace the item in place in every cache partition that holds an
    /// entry with the same ID.
    ///
    /// This is how counter updates returned by the catalog after an action
    /// propagate across tabs without a full re-fetch.
    pub fn update_item(&mut self, updated: &GalleryItem) {
        for cache in &mut self.caches {
            if let Some(items) = &mut cache.raw {
                if let Some(slot) = items.iter_mut().find(|item| item.id == updated.id) {
                    *slot = updated.clone();
                }
            }
        }
    }
}

/// Keep only items matching the search text.
///
/// Empty text returns the input unchanged. Otherwise the query is trimmed,
/// and an item matches when its author, description, name, or any tag
/// contains the query as a case-insensitive substring.
pub fn filter(search_text: &str, items: &[GalleryItem]) -> Vec<GalleryItem> {
    if search_text.is_empty() {
        return items.to_vec();
    }

    let needle = search_text.trim().to_uppercase();
    items
        .iter()
        .filter(|item| matches_search(&needle, item))
        .cloned()
        .collect()
}

fn matches_search(needle: &str, item: &GalleryItem) -> bool {
    item.author.to_uppercase().contains(needle)
        || item.description.to_uppercase().contains(needle)
        || item.name.to_uppercase().contains(needle)
        || item.tags.iter().any(|tag| tag.to_uppercase().contains(needle))
}

/// Sort items in place, descending by the chosen key.
///
/// MostRecent orders by parsed creation timestamp; unparseable timestamps
/// sort last. Tie order is whatever the stable sort preserves.
pub fn order(sort_by: SortKey, items: &mut [GalleryItem]) {
    match sort_by {
        SortKey::MostViewed => items.sort_by_key(|item| Reverse(item.views)),
        SortKey::MostDownloaded => items.sort_by_key(|item| Reverse(item.downloads)),
        SortKey::MostFavorited => items.sort_by_key(|item| Reverse(item.favorites)),
        SortKey::MostRecent => items.sort_by_key(|item| Reverse(item.created_timestamp())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, name: &str, author: &str, tags: &[&str], views: u64) -> GalleryItem {
        GalleryItem {
            id: id.to_string(),
            name: name.to_string(),
            description: format!("{name} description"),
            author: author.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            views,
            downloads: 0,
            favorites: 0,
            created: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_filter_empty_text_is_identity() {
        let items = vec![item("1", "Foo", "A", &["x"], 5), item("2", "Bar", "B", &["y"], 10)];
        assert_eq!(filter("", &items), items);
    }

    #[test]
    fn test_filter_matches_name_case_insensitive() {
        let items = vec![item("1", "Foo", "A", &["x"], 5), item("2", "Bar", "B", &["y"], 10)];

        let found = filter("foo", &items);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "1");
    }

    #[test]
    fn test_filter_matches_author_description_and_tags() {
        let items = vec![
            item("1", "Intro", "Alice", &["sql"], 0),
            item("2", "Advanced", "Bob", &["spark"], 0),
        ];

        // Author
        assert_eq!(filter("alice", &items)[0].id, "1");
        // Tag
        assert_eq!(filter("SPARK", &items)[0].id, "2");
        // Description (generated as "Advanced description")
        assert_eq!(filter("advanced desc", &items)[0].id, "2");
        // Substring, not whole word
        assert_eq!(filter("lic", &items)[0].id, "1");
    }

    #[test]
    fn test_filter_trims_query() {
        let items = vec![item("1", "Foo", "A", &[], 0)];
        assert_eq!(filter("  foo  ", &items).len(), 1);
    }

    #[test]
    fn test_filter_no_match_returns_empty() {
        let items = vec![item("1", "Foo", "A", &["x"], 5)];
        assert!(filter("zzz", &items).is_empty());
    }

    #[test]
    fn test_order_most_viewed_descending() {
        let mut items = vec![item("1", "Foo", "A", &["x"], 5), item("2", "Bar", "B", &["y"], 10)];

        order(SortKey::MostViewed, &mut items);
        assert_eq!(items[0].id, "2");
        assert_eq!(items[1].id, "1");
    }

    #[test]
    fn test_order_most_recent_non_increasing() {
        let mut a = item("1", "Old", "A", &[], 0);
        a.created = "2023-01-01T00:00:00Z".to_string();
        let mut b = item("2", "New", "A", &[], 0);
        b.created = "2024-06-01T00:00:00Z".to_string();
        let mut c = item("3", "Mid", "A", &[], 0);
        c.created = "2023-09-01T00:00:00Z".to_string();

        let mut items = vec![a, b, c];
        order(SortKey::MostRecent, &mut items);

        let stamps: Vec<i64> = items.iter().map(|i| i.created_timestamp()).collect();
        assert!(stamps.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(items[0].id, "2");
    }

    #[test]
    fn test_order_most_recent_unparseable_sorts_last() {
        let mut bad = item("1", "Bad", "A", &[], 0);
        bad.created = "garbage".to_string();
        let good = item("2", "Good", "A", &[], 0);

        let mut items = vec![bad, good];
        order(SortKey::MostRecent, &mut items);
        assert_eq!(items[0].id, "2");
    }

    #[test]
    fn test_select_tab_resets_search_text() {
        let mut state = GalleryState::new();
        state.search_text = "query".to_string();

        state.select_tab(Tab::Favorites);

        assert_eq!(state.active_tab, Tab::Favorites);
        assert!(state.search_text.is_empty());
    }

    #[test]
    fn test_unloaded_tab_has_no_view() {
        let state = GalleryState::new();
        // Never loaded: suppress rendering entirely
        assert!(state.view_items(Tab::OfficialSamples).is_none());
    }

    #[test]
    fn test_loaded_empty_is_distinct_from_unloaded() {
        let mut state = GalleryState::new();
        state.set_items(Tab::OfficialSamples, vec![]);

        assert_eq!(state.view_items(Tab::OfficialSamples), Some(&[][..]));
    }

    #[test]
    fn test_view_applies_filter_then_sort() {
        let mut state = GalleryState::new();
        state.sort_by = SortKey::MostViewed;
        state.search_text = "notebook".to_string();
        state.set_items(
            Tab::OfficialSamples,
            vec![
                item("1", "Some notebook", "A", &[], 2),
                item("2", "Other notebook", "B", &[], 9),
                item("3", "Unrelated", "C", &[], 100),
            ],
        );

        let view = state.view_items(Tab::OfficialSamples).unwrap();
        let ids: Vec<&str> = view.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn test_add_favorite_creates_cache_if_absent() {
        let mut state = GalleryState::new();
        assert!(state.raw_items(Tab::Favorites).is_none());

        state.add_favorite(item("1", "Foo", "A", &[], 0));

        assert!(state.is_favorite("1"));
        assert_eq!(state.raw_items(Tab::Favorites).unwrap().len(), 1);
    }

    #[test]
    fn test_favorite_then_update_patches_counters_everywhere() {
        let mut state = GalleryState::new();
        state.set_items(Tab::OfficialSamples, vec![item("1", "Foo", "A", &[], 0)]);
        state.set_items(Tab::PublicGallery, vec![item("1", "Foo", "A", &[], 0)]);

        let mut updated = item("1", "Foo", "A", &[], 0);
        updated.favorites = 7;
        state.add_favorite(updated.clone());
        state.update_item(&updated);

        // Exactly one favorites entry with that ID
        let favorites = state.raw_items(Tab::Favorites).unwrap();
        assert_eq!(favorites.iter().filter(|i| i.id == "1").count(), 1);

        // Every cache holding the ID reflects the updated counters
        assert_eq!(state.raw_items(Tab::OfficialSamples).unwrap()[0].favorites, 7);
        assert_eq!(state.raw_items(Tab::PublicGallery).unwrap()[0].favorites, 7);
    }

    #[test]
    fn test_update_item_skips_caches_without_the_id() {
        let mut state = GalleryState::new();
        state.set_items(Tab::Published, vec![item("2", "Bar", "B", &[], 1)]);

        let updated = item("1", "Foo", "A", &[], 9);
        state.update_item(&updated);

        assert_eq!(state.raw_items(Tab::Published).unwrap()[0].id, "2");
        assert_eq!(state.raw_items(Tab::Published).unwrap()[0].views, 1);
    }

    #[test]
    fn test_remove_favorite_by_id() {
        let mut state = GalleryState::new();
        state.add_favorite(item("1", "Foo", "A", &[], 0));
        state.add_favorite(item("2", "Bar", "B", &[], 0));

        state.remove_favorite("1");

        assert!(!state.is_favorite("1"));
        assert!(state.is_favorite("2"));
    }

    #[test]
    fn test_remove_published_by_id() {
        let mut state = GalleryState::new();
        state.set_items(
            Tab::Published,
            vec![item("1", "Mine", "Me", &[], 0), item("2", "Also mine", "Me", &[], 0)],
        );

        state.remove_published("1");

        let published = state.raw_items(Tab::Published).unwrap();
        assert!(published.iter().all(|i| i.id != "1"));
        assert_eq!(published.len(), 1);
    }
}
