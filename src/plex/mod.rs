//! Plex Media Server client module

pub mod client;
pub mod library;
pub mod models;

pub use client::PlexClient;
pub use library::{LibraryItem, LibraryKind, LibraryScanResult, Season, Show};
pub use models::LibrarySection;
