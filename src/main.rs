use std::path::PathBuf;
use std::sync::Arc;

use iced::widget::{button, column, container, pick_list, row, text, text_input, Space};
use iced::{Alignment, Element, Length, Size, Subscription, Task, Theme};
use log::{error, info};

mod catalog;
mod config;
mod host;
mod state;
mod ui;

use catalog::CatalogClient;
use config::Config;
use host::GalleryHost;
use state::data::GalleryItem;
use state::gallery::{GalleryState, SortKey, Tab};
use ui::grid::PageSpec;

/// Main application state
struct GalleryApp {
    config: Config,
    /// Client for the remote notebook catalog
    client: CatalogClient,
    /// Embedding host, when the gallery runs inside a larger application
    host: Option<Arc<dyn GalleryHost>>,
    /// Tab, search, sort state and the per-tab item caches
    gallery: GalleryState,
    /// User-visible notification console; the last entry doubles as the
    /// status line
    notifications: Vec<String>,
    window_size: Size,
    scroll_offset: f32,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked a tab header
    TabSelected(Tab),
    /// Search box content changed
    SearchChanged(String),
    /// Sort dropdown changed
    SortSelected(SortKey),
    /// User clicked a tag chip on a card
    TagSelected(String),
    /// A background fetch for a tab finished
    TabLoaded(Tab, Result<Vec<GalleryItem>, String>),
    /// User clicked a card body
    NotebookOpened(GalleryItem),
    FavoriteRequested(GalleryItem),
    UnfavoriteRequested(GalleryItem),
    DownloadRequested(GalleryItem),
    DeleteRequested(GalleryItem),
    /// Server confirmed the action and returned the updated item
    Favorited(GalleryItem),
    Unfavorited(GalleryItem),
    Downloaded(GalleryItem),
    Deleted(GalleryItem),
    ActionFailed(String),
    WindowResized(Size),
    GridScrolled(f32),
}

impl GalleryApp {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        Self::with_config(Config::load(), None)
    }

    fn with_config(config: Config, host: Option<Arc<dyn GalleryHost>>) -> (Self, Task<Message>) {
        let client = CatalogClient::new(config.catalog_url.clone());
        info!("Notebook gallery using catalog at {}", client.base_url());

        let app = GalleryApp {
            config,
            client,
            host,
            gallery: GalleryState::new(),
            notifications: Vec::new(),
            window_size: Size::new(1280.0, 800.0),
            scroll_offset: 0.0,
        };

        let load_active = app.fetch_tab(app.gallery.active_tab);
        // Favorites are loaded up front so the like buttons on every tab
        // start in the correct state
        let load_favorites = app.fetch_tab(Tab::Favorites);

        (app, Task::batch([load_active, load_favorites]))
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TabSelected(tab) => {
                self.gallery.select_tab(tab);
                self.scroll_offset = 0.0;
                self.load_tab(tab, false)
            }
            Message::SearchChanged(search_text) => {
                self.gallery.search_text = search_text;
                let active = self.gallery.active_tab;
                self.load_tab(active, true)
            }
            Message::SortSelected(sort_by) => {
                self.gallery.sort_by = sort_by;
                let active = self.gallery.active_tab;
                self.load_tab(active, true)
            }
            Message::TagSelected(tag) => {
                self.gallery.search_text = tag;
                let active = self.gallery.active_tab;
                self.load_tab(active, true)
            }
            Message::TabLoaded(tab, Ok(items)) => {
                self.gallery.set_items(tab, items);
                // A fresh favorites list can change like-button state on
                // whichever tab is currently showing
                let active = self.gallery.active_tab;
                if tab == Tab::Favorites && active != Tab::Favorites {
                    self.gallery.refresh_view(active);
                }
                Task::none()
            }
            Message::TabLoaded(tab, Err(err)) => {
                // Errors never clear previously loaded data: re-render
                // whatever the cache already holds
                let message = format!("Failed to load {}: {err}", tab_noun(tab));
                error!("{message}");
                self.notify(message);
                self.gallery.refresh_view(tab);
                Task::none()
            }
            Message::NotebookOpened(item) => {
                let is_favorite = self.gallery.is_favorite(&item.id);
                let content_url = self.client.notebook_content_url(&item.id);
                match &self.host {
                    Some(host) => host.open_gallery(&content_url, &item, is_favorite),
                    None => host::open_standalone(&self.config.viewer_url, &content_url, &item.id),
                }
                Task::none()
            }
            Message::FavoriteRequested(item) => {
                let client = self.client.clone();
                Task::perform(
                    async move { client.favorite(&item.id).await.map_err(|e| e.to_string()) },
                    |result| match result {
                        Ok(item) => Message::Favorited(item),
                        Err(err) => Message::ActionFailed(format!("Failed to like notebook: {err}")),
                    },
                )
            }
            Message::UnfavoriteRequested(item) => {
                let client = self.client.clone();
                Task::perform(
                    async move { client.unfavorite(&item.id).await.map_err(|e| e.to_string()) },
                    |result| match result {
                        Ok(item) => Message::Unfavorited(item),
                        Err(err) => {
                            Message::ActionFailed(format!("Failed to unlike notebook: {err}"))
                        }
                    },
                )
            }
            Message::DownloadRequested(item) => {
                // Native save dialog, same blocking pattern as the tab's
                // other dialogs
                let target = rfd::FileDialog::new()
                    .set_title("Save Notebook")
                    .set_file_name(format!("{}.ipynb", item.name))
                    .save_file();

                if let Some(path) = target {
                    self.notify(format!("Downloading \"{}\"...", item.name));
                    let client = self.client.clone();
                    return Task::perform(
                        download_notebook_async(client, item, path),
                        |result| match result {
                            Ok(item) => Message::Downloaded(item),
                            Err(err) => Message::ActionFailed(err),
                        },
                    );
                }

                Task::none()
            }
            Message::DeleteRequested(item) => {
                let choice = rfd::MessageDialog::new()
                    .set_title("Remove published notebook")
                    .set_description(format!(
                        "Permanently remove \"{}\" from the gallery?",
                        item.name
                    ))
                    .set_buttons(rfd::MessageButtons::YesNo)
                    .show();

                if matches!(choice, rfd::MessageDialogResult::Yes) {
                    let client = self.client.clone();
                    return Task::perform(
                        async move { client.delete(&item.id).await.map_err(|e| e.to_string()) },
                        |result| match result {
                            Ok(item) => Message::Deleted(item),
                            Err(err) => {
                                Message::ActionFailed(format!("Failed to delete notebook: {err}"))
                            }
                        },
                    );
                }

                Task::none()
            }
            Message::Favorited(item) => {
                self.gallery.add_favorite(item.clone());
                self.reconcile(item)
            }
            Message::Unfavorited(item) => {
                self.gallery.remove_favorite(&item.id);
                self.reconcile(item)
            }
            Message::Downloaded(item) => {
                self.notify(format!("Downloaded \"{}\"", item.name));
                self.reconcile(item)
            }
            Message::Deleted(item) => {
                self.gallery.remove_published(&item.id);
                self.notify(format!("Removed \"{}\" from the gallery", item.name));
                self.reconcile(item)
            }
            Message::ActionFailed(message) => {
                error!("{message}");
                self.notify(message);
                Task::none()
            }
            Message::WindowResized(size) => {
                self.window_size = size;
                Task::none()
            }
            Message::GridScrolled(offset) => {
                self.scroll_offset = offset;
                Task::none()
            }
        }
    }

    /// Load a tab's content.
    ///
    /// Online loads fetch from the catalog; offline loads recompute the
    /// filtered/sorted view from the existing cache without a network
    /// round-trip (search-as-you-type and sort changes must not re-fetch).
    fn load_tab(&mut self, tab: Tab, offline: bool) -> Task<Message> {
        if !offline {
            return self.fetch_tab(tab);
        }

        self.gallery.refresh_view(tab);
        // Recomputing favorites also refreshes the active tab so
        // like-button state stays in sync
        let active = self.gallery.active_tab;
        if tab == Tab::Favorites && active != Tab::Favorites {
            self.gallery.refresh_view(active);
        }
        Task::none()
    }

    /// Fire a background fetch for a tab. Completions apply last-write-wins;
    /// in-flight requests are never cancelled.
    fn fetch_tab(&self, tab: Tab) -> Task<Message> {
        let client = self.client.clone();
        Task::perform(
            async move {
                let result = match tab {
                    Tab::OfficialSamples => client.sample_notebooks().await,
                    Tab::PublicGallery => client.public_notebooks().await,
                    Tab::Favorites => client.favorite_notebooks().await,
                    Tab::Published => client.published_notebooks().await,
                };
                result.map_err(|e| e.to_string())
            },
            move |result| Message::TabLoaded(tab, result),
        )
    }

    /// After a successful action: patch the updated item into every cache
    /// holding it, then refresh the active tab's view offline.
    fn reconcile(&mut self, item: GalleryItem) -> Task<Message> {
        self.gallery.update_item(&item);
        let active = self.gallery.active_tab;
        self.load_tab(active, true)
    }

    fn notify(&mut self, message: String) {
        self.notifications.push(message);
    }

    fn publish_enabled(&self) -> bool {
        match &self.host {
            Some(host) => host.is_gallery_publish_enabled(),
            None => self.config.publish_enabled,
        }
    }

    fn visible_tabs(&self) -> Vec<Tab> {
        Tab::ALL
            .into_iter()
            .filter(|tab| match tab {
                Tab::PublicGallery | Tab::Published => self.publish_enabled(),
                Tab::OfficialSamples | Tab::Favorites => true,
            })
            .collect()
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let mut tab_bar = row![].spacing(8);
        for tab in self.visible_tabs() {
            let style = if tab == self.gallery.active_tab {
                button::primary
            } else {
                button::text
            };
            tab_bar = tab_bar.push(
                button(text(tab.title()).size(15))
                    .style(style)
                    .on_press(Message::TabSelected(tab)),
            );
        }

        let controls = row![
            text_input("Search", &self.gallery.search_text)
                .on_input(Message::SearchChanged)
                .width(Length::Fill),
            text("Sort by").size(14),
            pick_list(SortKey::ALL, Some(self.gallery.sort_by), Message::SortSelected),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let active = self.gallery.active_tab;
        let content: Element<Message> = match self.gallery.view_items(active) {
            // Nothing renders until the tab's first load completes; an
            // unloaded tab is not the same as a loaded-but-empty one
            None => Space::with_height(Length::Fill).into(),
            Some(items) => {
                let spec = PageSpec::from_viewport(self.window_size.width, self.window_size.height);
                ui::grid::gallery_grid(
                    items,
                    spec,
                    self.scroll_offset,
                    |item| {
                        ui::cards::gallery_card(
                            item,
                            self.gallery.is_favorite(&item.id),
                            active == Tab::Published,
                        )
                    },
                    |viewport| Message::GridScrolled(viewport.absolute_offset().y),
                )
            }
        };

        let status = text(
            self.notifications
                .last()
                .map(String::as_str)
                .unwrap_or("Ready"),
        )
        .size(13);

        container(
            column![tab_bar, controls, content, status]
                .spacing(16)
                .padding(20),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        iced::window::resize_events().map(|(_id, size)| Message::WindowResized(size))
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    init_logger();

    iced::application("Notebook Gallery", GalleryApp::update, GalleryApp::view)
        .subscription(GalleryApp::subscription)
        .theme(GalleryApp::theme)
        .centered()
        .run_with(GalleryApp::new)
}

fn init_logger() {
    if std::env::var("RUST_LOG").is_ok() {
        env_logger::init();
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}

/// What a tab's items are called in error messages
fn tab_noun(tab: Tab) -> &'static str {
    match tab {
        Tab::OfficialSamples => "sample notebooks",
        Tab::PublicGallery => "public notebooks",
        Tab::Favorites => "favorite notebooks",
        Tab::Published => "published notebooks",
    }
}

/// Async function to download a notebook to disk
/// Runs in the background to avoid blocking the UI
async fn download_notebook_async(
    client: CatalogClient,
    item: GalleryItem,
    path: PathBuf,
) -> Result<GalleryItem, String> {
    let content = client
        .notebook_content(&item.id)
        .await
        .map_err(|err| format!("Failed to download \"{}\": {err}", item.name))?;

    tokio::fs::write(&path, content)
        .await
        .map_err(|err| format!("Failed to write {}: {err}", path.display()))?;

    // Count the download server-side and pick up the updated counters
    client
        .download(&item.id)
        .await
        .map_err(|err| format!("Failed to record download of \"{}\": {err}", item.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> GalleryApp {
        let config = Config {
            catalog_url: "http://localhost:8085".to_string(),
            viewer_url: "http://localhost:8085".to_string(),
            publish_enabled: true,
        };
        // The startup fetch tasks are dropped unexecuted
        let (app, _task) = GalleryApp::with_config(config, None);
        app
    }

    fn item(id: &str, name: &str) -> GalleryItem {
        GalleryItem {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            author: "someone".to_string(),
            tags: vec![],
            views: 0,
            downloads: 0,
            favorites: 0,
            created: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_tab_switch_resets_search() {
        let mut app = test_app();
        app.gallery.search_text = "query".to_string();

        let _task = app.update(Message::TabSelected(Tab::PublicGallery));

        assert_eq!(app.gallery.active_tab, Tab::PublicGallery);
        assert!(app.gallery.search_text.is_empty());
    }

    #[test]
    fn test_failed_load_keeps_cache_and_notifies_once() {
        let mut app = test_app();
        let cached = vec![item("1", "Kept")];
        app.gallery.set_items(Tab::OfficialSamples, cached.clone());

        let _task = app.update(Message::TabLoaded(
            Tab::OfficialSamples,
            Err("received HTTP 500 Internal Server Error: boom".to_string()),
        ));

        assert_eq!(app.gallery.raw_items(Tab::OfficialSamples), Some(&cached[..]));
        assert_eq!(app.gallery.view_items(Tab::OfficialSamples), Some(&cached[..]));
        assert_eq!(app.notifications.len(), 1);
    }

    #[test]
    fn test_favorited_updates_caches_and_membership() {
        let mut app = test_app();
        app.gallery.set_items(Tab::OfficialSamples, vec![item("1", "Foo")]);

        let mut updated = item("1", "Foo");
        updated.favorites = 3;
        let _task = app.update(Message::Favorited(updated));

        assert!(app.gallery.is_favorite("1"));
        assert_eq!(app.gallery.raw_items(Tab::OfficialSamples).unwrap()[0].favorites, 3);
        // The active tab's view was refreshed offline
        assert_eq!(app.gallery.view_items(Tab::OfficialSamples).unwrap()[0].favorites, 3);
    }

    #[test]
    fn test_unfavorited_removes_membership() {
        let mut app = test_app();
        app.gallery.add_favorite(item("1", "Foo"));

        let _task = app.update(Message::Unfavorited(item("1", "Foo")));

        assert!(!app.gallery.is_favorite("1"));
    }

    #[test]
    fn test_deleted_removes_from_published() {
        let mut app = test_app();
        app.gallery
            .set_items(Tab::Published, vec![item("1", "Mine"), item("2", "Other")]);

        let _task = app.update(Message::Deleted(item("1", "Mine")));

        let published = app.gallery.raw_items(Tab::Published).unwrap();
        assert!(published.iter().all(|i| i.id != "1"));
    }

    #[test]
    fn test_favorites_load_refreshes_active_tab_view() {
        let mut app = test_app();
        app.gallery.set_items(Tab::OfficialSamples, vec![item("1", "Foo")]);

        // Favorites finishing a load must not leave the active tab's view
        // unset or stale
        let _task = app.update(Message::TabLoaded(Tab::Favorites, Ok(vec![item("1", "Foo")])));

        assert!(app.gallery.is_favorite("1"));
        assert!(app.gallery.view_items(Tab::OfficialSamples).is_some());
    }

    #[test]
    fn test_publish_gating_hides_tabs() {
        let mut app = test_app();
        assert_eq!(app.visible_tabs().len(), 4);

        app.config.publish_enabled = false;
        let visible = app.visible_tabs();
        assert_eq!(visible, vec![Tab::OfficialSamples, Tab::Favorites]);
    }
}
