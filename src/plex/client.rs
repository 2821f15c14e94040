//! Plex Media Server HTTP client

use anyhow::{Context, Result};
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use super::library::{
    LibraryItem, LibraryKind, LibraryScanResult, Show, episode_from_metadata, movie_from_metadata,
    season_from_metadata, show_from_metadata,
};
use super::models::*;

/// HTTP client for the Plex REST API
#[derive(Clone)]
pub struct PlexClient {
    base_url: Url,
    token: String,
    http_client: Client,
}

impl PlexClient {
    /// Create a new Plex client for `server_url`, authenticating with `token`
    pub fn new(server_url: &str, token: &str) -> Result<Self> {
        let base_url = Url::parse(server_url.trim_end_matches('/'))
            .with_context(|| format!("Invalid server URL: {}", server_url))?;

        let http_client = Client::builder()
            .user_agent(concat!("hactar/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url,
            token: token.to_string(),
            http_client,
        })
    }

    /// Build an endpoint URL carrying the auth token
    fn build_url(&self, endpoint: &str) -> Url {
        let mut url = self.base_url.clone();
        let base_path = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{}{}", base_path, endpoint));
        url.query_pairs_mut().append_pair("X-Plex-Token", &self.token);
        url
    }

    async fn request<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.build_url(endpoint);
        debug!("GET {}{}", self.base_url, endpoint);

        let response: PlexResponse<T> = self
            .http_client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to connect to Plex server at {}", self.base_url))?
            .error_for_status()
            .with_context(|| format!("Plex server rejected request for {}", endpoint))?
            .json()
            .await
            .with_context(|| format!("Failed to parse response for {}", endpoint))?;

        Ok(response.media_container)
    }

    /// Check that the server answers with its identity
    pub async fn test_connection(&self) -> bool {
        match self.request::<IdentityContainer>("/").await {
            Ok(identity) => identity.machine_identifier.is_some(),
            Err(e) => {
                warn!("Connection test failed: {:#}", e);
                false
            }
        }
    }

    /// List the movie and show library sections
    pub async fn get_libraries(&self) -> Result<Vec<LibrarySection>> {
        let container: DirectoryContainer = self.request("/library/sections").await?;
        let sections: Vec<LibrarySection> = container
            .directory
            .into_iter()
            .filter(LibrarySection::is_scannable)
            .collect();

        debug!("Found {} scannable libraries", sections.len());
        Ok(sections)
    }

    /// Children of a metadata item (seasons of a show, episodes of a season)
    pub async fn get_children(&self, rating_key: &str) -> Result<Vec<Metadata>> {
        let container: MetadataContainer = self
            .request(&format!("/library/metadata/{}/children", rating_key))
            .await?;
        Ok(container.metadata)
    }

    async fn get_section_items(&self, key: &str) -> Result<Vec<Metadata>> {
        let container: MetadataContainer = self
            .request(&format!("/library/sections/{}/all", key))
            .await?;
        Ok(container.metadata)
    }

    /// Scan a library section, computing sizes for every item
    pub async fn scan_library(&self, section: &LibrarySection) -> Result<LibraryScanResult> {
        let kind = LibraryKind::from_plex(&section.kind)
            .with_context(|| format!("Library type '{}' cannot be scanned", section.kind))?;

        info!("Scanning library {} ({})", section.title, section.key);
        let items = self.get_section_items(&section.key).await?;

        let data = match kind {
            LibraryKind::Movie => items
                .iter()
                .map(|item| LibraryItem::Movie(movie_from_metadata(item)))
                .collect(),
            LibraryKind::Show => {
                let mut shows = Vec::with_capacity(items.len());
                for item in &items {
                    shows.push(LibraryItem::Show(self.scan_show(item).await?));
                }
                shows
            }
        };

        let result = LibraryScanResult::new(kind, section.title.clone(), data);
        info!(
            "Scanned {} items in {} ({})",
            result.data.len(),
            result.library_name,
            result.human_bytes
        );
        Ok(result)
    }

    async fn scan_show(&self, item: &Metadata) -> Result<Show> {
        debug!("Scanning show {}", item.title);
        let mut seasons = Vec::new();
        for season in self.get_children(&item.rating_key).await? {
            let episodes = self
                .get_children(&season.rating_key)
                .await?
                .iter()
                .map(episode_from_metadata)
                .collect();
            seasons.push(season_from_metadata(&season, episodes));
        }
        Ok(show_from_metadata(item, seasons))
    }
}
