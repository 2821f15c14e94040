//! Flatten the cached library tree into table rows, one collector per level

use super::cached::CachedLibraryData;
use crate::plex::{LibraryItem, LibraryScanResult, Season, Show};
use crate::utils::bytes_to_human;

/// What a row points back to in the cached tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    Show,
    Season,
    Episode,
    Movie,
}

impl SourceType {
    /// Shows and seasons have children to drill into
    pub fn has_children(self) -> bool {
        matches!(self, Self::Show | Self::Season)
    }
}

/// One table row at the current level
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub title: String,
    pub size: String,
    pub bytes: u64,
    pub files: u64,
    pub index: Option<u32>,
    pub library: Option<String>,
    pub source_type: SourceType,
    pub source_key: String,
}

fn size_label(human: Option<&str>, bytes: u64) -> String {
    match human {
        Some(h) if !h.is_empty() => h.to_string(),
        _ => bytes_to_human(bytes),
    }
}

fn title_or(title: &str, fallback: impl FnOnce() -> String) -> String {
    if title.trim().is_empty() {
        fallback()
    } else {
        title.to_string()
    }
}

fn item_row(item: &LibraryItem, library: Option<&str>) -> Row {
    let bytes = item.bytes();
    Row {
        title: title_or(item.title(), || "Untitled".to_string()),
        size: size_label(item.human_bytes(), bytes),
        bytes,
        files: item.files(),
        index: None,
        library: library.map(str::to_string),
        source_type: match item {
            LibraryItem::Show(_) => SourceType::Show,
            LibraryItem::Movie(_) => SourceType::Movie,
        },
        source_key: item.rating_key().to_string(),
    }
}

/// Every top-level item of every cached library, tagged with its library title
pub fn collect_overall(libraries: &[CachedLibraryData]) -> Vec<Row> {
    libraries
        .iter()
        .filter_map(|lib| lib.data.as_ref().map(|data| (lib, data)))
        .flat_map(|(lib, data)| data.data.iter().map(|item| item_row(item, Some(&lib.title))))
        .collect()
}

pub fn collect_library(data: &LibraryScanResult) -> Vec<Row> {
    data.data.iter().map(|item| item_row(item, None)).collect()
}

pub fn collect_seasons(show: &Show) -> Vec<Row> {
    show.seasons
        .iter()
        .map(|season| {
            let bytes = season.total_bytes();
            Row {
                title: title_or(&season.title, || format!("Season {}", season.season_index)),
                size: size_label(season.human_bytes.as_deref(), bytes),
                bytes,
                files: season.total_files(),
                index: Some(season.season_index),
                library: None,
                source_type: SourceType::Season,
                source_key: season.rating_key.clone(),
            }
        })
        .collect()
}

pub fn collect_episodes(season: &Season) -> Vec<Row> {
    season
        .episodes
        .iter()
        .map(|episode| {
            let bytes = episode.bytes.unwrap_or(0);
            Row {
                title: title_or(&episode.title, || format!("Episode {}", episode.episode_index)),
                size: size_label(episode.human_bytes.as_deref(), bytes),
                bytes,
                files: episode.files.unwrap_or(0),
                index: Some(episode.episode_index),
                library: None,
                source_type: SourceType::Episode,
                source_key: episode.rating_key.clone(),
            }
        })
        .collect()
}
