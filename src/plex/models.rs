//! Plex Media Server API response models

use serde::{Deserialize, Serialize};

/// Wrapper for all Plex API responses
#[derive(Debug, Clone, Deserialize)]
pub struct PlexResponse<T> {
    #[serde(rename = "MediaContainer")]
    pub media_container: T,
}

// Server identity (GET /)
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityContainer {
    #[serde(rename = "machineIdentifier")]
    pub machine_identifier: Option<String>,
}

// Library sections (GET /library/sections)
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryContainer {
    #[serde(rename = "Directory", default)]
    pub directory: Vec<LibrarySection>,
}

/// A library section on the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibrarySection {
    pub key: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl LibrarySection {
    /// Only movie and show sections carry sized media we can scan
    pub fn is_scannable(&self) -> bool {
        self.kind == "movie" || self.kind == "show"
    }
}

// Item listings (GET /library/sections/{key}/all, /library/metadata/{key}/children)
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataContainer {
    #[serde(rename = "Metadata", default)]
    pub metadata: Vec<Metadata>,
}

/// A movie, show, season or episode entry
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    #[serde(rename = "ratingKey")]
    pub rating_key: String,
    #[serde(default)]
    pub title: String,
    pub index: Option<u32>,
    #[serde(rename = "Media", default)]
    pub media: Vec<MediaInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaInfo {
    #[serde(rename = "Part", default)]
    pub part: Vec<MediaPart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaPart {
    pub size: Option<u64>,
}

impl Metadata {
    /// Size of the first part of the first media version, 0 if unknown
    pub fn file_size(&self) -> u64 {
        self.media
            .first()
            .and_then(|m| m.part.first())
            .and_then(|p| p.size)
            .unwrap_or(0)
    }
}
