//! Scan results: the library tree cached on disk and browsed by the dashboard
//!
//! Field names serialize in camelCase so cache files stay compatible with
//! earlier hactar releases.

use serde::{Deserialize, Serialize};

use super::models::Metadata;
use crate::utils::bytes_to_human;

/// Kind of library section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryKind {
    Movie,
    Show,
}

impl LibraryKind {
    pub fn from_plex(kind: &str) -> Option<Self> {
        match kind {
            "movie" => Some(Self::Movie),
            "show" => Some(Self::Show),
            _ => None,
        }
    }
}

/// A single sized item (movie)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub rating_key: String,
    #[serde(default)]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub human_bytes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub rating_key: String,
    #[serde(default)]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub human_bytes: Option<String>,
    #[serde(default)]
    pub episode_index: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub rating_key: String,
    #[serde(default)]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub human_bytes: Option<String>,
    #[serde(default)]
    pub season_index: u32,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    pub rating_key: String,
    #[serde(default)]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub human_bytes: Option<String>,
    pub seasons: Vec<Season>,
}

impl Season {
    /// Stored size, or the sum of its episodes when the scan did not record one
    pub fn total_bytes(&self) -> u64 {
        self.bytes
            .unwrap_or_else(|| self.episodes.iter().map(|e| e.bytes.unwrap_or(0)).sum())
    }

    pub fn total_files(&self) -> u64 {
        self.files.unwrap_or(self.episodes.len() as u64)
    }
}

impl Show {
    pub fn total_bytes(&self) -> u64 {
        self.bytes
            .unwrap_or_else(|| self.seasons.iter().map(Season::total_bytes).sum())
    }

    pub fn total_files(&self) -> u64 {
        self.files
            .unwrap_or_else(|| self.seasons.iter().map(Season::total_files).sum())
    }
}

/// Top-level entry of a library: a show (has seasons) or a plain movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LibraryItem {
    Show(Show),
    Movie(Media),
}

impl LibraryItem {
    pub fn rating_key(&self) -> &str {
        match self {
            Self::Show(s) => &s.rating_key,
            Self::Movie(m) => &m.rating_key,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Show(s) => &s.title,
            Self::Movie(m) => &m.title,
        }
    }

    pub fn bytes(&self) -> u64 {
        match self {
            Self::Show(s) => s.total_bytes(),
            Self::Movie(m) => m.bytes.unwrap_or(0),
        }
    }

    pub fn files(&self) -> u64 {
        match self {
            Self::Show(s) => s.total_files(),
            Self::Movie(m) => m.files.unwrap_or(0),
        }
    }

    pub fn human_bytes(&self) -> Option<&str> {
        match self {
            Self::Show(s) => s.human_bytes.as_deref(),
            Self::Movie(m) => m.human_bytes.as_deref(),
        }
    }
}

/// Result of scanning one library section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryScanResult {
    pub library_type: LibraryKind,
    pub library_name: String,
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub files: u64,
    #[serde(default)]
    pub human_bytes: String,
    #[serde(default)]
    pub data: Vec<LibraryItem>,
}

impl LibraryScanResult {
    /// Build a result, summing item sizes into the library totals
    pub fn new(library_type: LibraryKind, library_name: impl Into<String>, data: Vec<LibraryItem>) -> Self {
        let bytes = data.iter().map(LibraryItem::bytes).sum();
        let files = data.iter().map(LibraryItem::files).sum();
        Self {
            library_type,
            library_name: library_name.into(),
            bytes,
            files,
            human_bytes: bytes_to_human(bytes),
            data,
        }
    }
}

pub fn movie_from_metadata(item: &Metadata) -> Media {
    let bytes = item.file_size();
    Media {
        rating_key: item.rating_key.clone(),
        title: item.title.clone(),
        bytes: Some(bytes),
        files: Some(1),
        human_bytes: Some(bytes_to_human(bytes)),
    }
}

pub fn episode_from_metadata(item: &Metadata) -> Episode {
    let bytes = item.file_size();
    Episode {
        rating_key: item.rating_key.clone(),
        title: item.title.clone(),
        bytes: Some(bytes),
        files: Some(1),
        human_bytes: Some(bytes_to_human(bytes)),
        episode_index: item.index.unwrap_or(0),
    }
}

/// Season whose totals are the sums of its episodes
pub fn season_from_metadata(item: &Metadata, episodes: Vec<Episode>) -> Season {
    let index = item.index.unwrap_or(0);
    let bytes: u64 = episodes.iter().map(|e| e.bytes.unwrap_or(0)).sum();
    let title = if item.title.is_empty() {
        index.to_string()
    } else {
        item.title.clone()
    };
    Season {
        rating_key: item.rating_key.clone(),
        title,
        bytes: Some(bytes),
        files: Some(episodes.len() as u64),
        human_bytes: Some(bytes_to_human(bytes)),
        season_index: index,
        episodes,
    }
}

/// Show whose totals are the sums of its seasons
pub fn show_from_metadata(item: &Metadata, seasons: Vec<Season>) -> Show {
    let bytes: u64 = seasons.iter().map(Season::total_bytes).sum();
    let files: u64 = seasons.iter().map(Season::total_files).sum();
    Show {
        rating_key: item.rating_key.clone(),
        title: item.title.clone(),
        bytes: Some(bytes),
        files: Some(files),
        human_bytes: Some(bytes_to_human(bytes)),
        seasons,
    }
}
