use std::time::Duration;

use log::debug;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::state::data::GalleryItem;

/// Errors from the catalog service.
///
/// The two success classes are 200 OK and 204 No Content; everything else
/// is surfaced with the status and whatever body the server sent.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("received HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// HTTP client for the remote notebook catalog
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// If this fails, we panic because the app cannot function without
    /// an HTTP client.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!("Catalog client created for {base_url}");

        CatalogClient { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// URL of a notebook's raw content, used both for the embedded host
    /// hand-off and the standalone viewer page
    pub fn notebook_content_url(&self, id: &str) -> String {
        self.build_url(&format!("gallery/{id}/content"))
    }

    /// Official sample notebooks
    pub async fn sample_notebooks(&self) -> Result<Vec<GalleryItem>, CatalogError> {
        self.get_items("gallery/samples").await
    }

    /// Community-published public notebooks
    pub async fn public_notebooks(&self) -> Result<Vec<GalleryItem>, CatalogError> {
        self.get_items("gallery/public").await
    }

    /// The current user's liked notebooks
    pub async fn favorite_notebooks(&self) -> Result<Vec<GalleryItem>, CatalogError> {
        self.get_items("gallery/favorites").await
    }

    /// The current user's published notebooks
    pub async fn published_notebooks(&self) -> Result<Vec<GalleryItem>, CatalogError> {
        self.get_items("gallery/published").await
    }

    /// Mark a notebook as favorite; returns the server's updated item
    pub async fn favorite(&self, id: &str) -> Result<GalleryItem, CatalogError> {
        let url = self.build_url(&format!("gallery/favorites/{id}"));
        debug!("PUT {url}");
        self.read_item(self.client.put(&url).send().await?).await
    }

    /// Remove a notebook from favorites; returns the server's updated item
    pub async fn unfavorite(&self, id: &str) -> Result<GalleryItem, CatalogError> {
        let url = self.build_url(&format!("gallery/favorites/{id}"));
        debug!("DELETE {url}");
        self.read_item(self.client.delete(&url).send().await?).await
    }

    /// Bump a notebook's download counter; returns the server's updated item
    pub async fn download(&self, id: &str) -> Result<GalleryItem, CatalogError> {
        let url = self.build_url(&format!("gallery/{id}/downloads"));
        debug!("PATCH {url}");
        self.read_item(self.client.patch(&url).send().await?).await
    }

    /// Delete one of the current user's published notebooks;
    /// returns the server's final item representation
    pub async fn delete(&self, id: &str) -> Result<GalleryItem, CatalogError> {
        let url = self.build_url(&format!("gallery/{id}"));
        debug!("DELETE {url}");
        self.read_item(self.client.delete(&url).send().await?).await
    }

    /// Fetch a notebook's raw content (for saving to disk)
    pub async fn notebook_content(&self, id: &str) -> Result<String, CatalogError> {
        let url = self.notebook_content_url(id);
        debug!("GET {url}");
        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::OK => Ok(response.text().await?),
            status => Err(Self::status_error(status, response).await),
        }
    }

    async fn get_items(&self, path: &str) -> Result<Vec<GalleryItem>, CatalogError> {
        let url = self.build_url(path);
        debug!("GET {url}");
        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            // 204 means a valid, empty listing
            StatusCode::NO_CONTENT => Ok(Vec::new()),
            status => Err(Self::status_error(status, response).await),
        }
    }

    async fn read_item(&self, response: reqwest::Response) -> Result<GalleryItem, CatalogError> {
        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            status => Err(Self::status_error(status, response).await),
        }
    }

    async fn status_error(status: StatusCode, response: reqwest::Response) -> CatalogError {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        CatalogError::Status { status, body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_joins_slashes() {
        let client = CatalogClient::new("http://localhost:8085/");
        assert_eq!(
            client.build_url("/gallery/samples"),
            "http://localhost:8085/gallery/samples"
        );
        assert_eq!(
            client.build_url("gallery/public"),
            "http://localhost:8085/gallery/public"
        );
    }

    #[test]
    fn test_notebook_content_url() {
        let client = CatalogClient::new("http://localhost:8085");
        assert_eq!(
            client.notebook_content_url("abc-123"),
            "http://localhost:8085/gallery/abc-123/content"
        );
    }

    #[test]
    fn test_status_error_display() {
        let err = CatalogError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "received HTTP 500 Internal Server Error: boom");
    }
}
