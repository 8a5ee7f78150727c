/// Embedding host capability
///
/// When the gallery runs inside a larger application, that host takes over
/// opening notebooks and decides whether publishing tabs are shown. Without
/// a host, opening falls back to a standalone viewer page in the browser.

use log::error;
use reqwest::Url;

use crate::state::data::GalleryItem;

/// Query parameter names understood by the standalone viewer page
pub const NOTEBOOK_URL_PARAM: &str = "notebookUrl";
pub const GALLERY_ITEM_ID_PARAM: &str = "galleryItemId";

/// Capability offered by an embedding host application.
pub trait GalleryHost {
    /// Open a notebook in the host's own viewer
    fn open_gallery(&self, content_url: &str, item: &GalleryItem, is_favorite: bool);

    /// Whether the public gallery and published-work tabs should be shown
    fn is_gallery_publish_enabled(&self) -> bool;
}

/// Build the standalone viewer page URL with the notebook content URL and
/// gallery item ID as query parameters.
pub fn viewer_url(viewer_base: &str, content_url: &str, item_id: &str) -> Option<Url> {
    let page = format!("{}/notebookViewer.html", viewer_base.trim_end_matches('/'));
    Url::parse_with_params(
        &page,
        &[
            (NOTEBOOK_URL_PARAM, content_url),
            (GALLERY_ITEM_ID_PARAM, item_id),
        ],
    )
    .ok()
}

/// Open the standalone viewer page in the default browser.
pub fn open_standalone(viewer_base: &str, content_url: &str, item_id: &str) {
    match viewer_url(viewer_base, content_url, item_id) {
        Some(url) => {
            if let Err(err) = open::that(url.as_str()) {
                error!("Failed to open notebook viewer: {err}");
            }
        }
        None => error!("Invalid viewer URL base: {viewer_base}"),
    }
}
