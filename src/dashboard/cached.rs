//! The in-memory library tree loaded once per dashboard session

use anyhow::Result;
use tracing::debug;

use crate::plex::{LibraryItem, LibraryScanResult, Season, Show};
use crate::storage::LibraryStore;

/// One library from the local cache; `data` is `None` when it was never scanned
/// or its cache file is unreadable
#[derive(Debug, Clone, PartialEq)]
pub struct CachedLibraryData {
    pub key: String,
    pub title: String,
    pub data: Option<LibraryScanResult>,
}

/// Load every cached library from `store`
pub async fn load_cached_data(store: &dyn LibraryStore) -> Result<Vec<CachedLibraryData>> {
    let libraries = store.libraries().await?;

    let mut cached = Vec::with_capacity(libraries.len());
    for library in libraries {
        let data = store.library_data(&library.key).await;
        cached.push(CachedLibraryData {
            title: library
                .library_name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| "Untitled".to_string()),
            key: library.key,
            data,
        });
    }

    debug!("Loaded {} cached libraries", cached.len());
    Ok(cached)
}

/// First show with `key` across all cached libraries
pub fn find_show_by_key<'a>(key: &str, libraries: &'a [CachedLibraryData]) -> Option<&'a Show> {
    libraries
        .iter()
        .filter_map(|lib| lib.data.as_ref())
        .flat_map(|data| data.data.iter())
        .find_map(|item| match item {
            LibraryItem::Show(show) if show.rating_key == key => Some(show),
            _ => None,
        })
}

pub fn find_season_by_key<'a>(key: &str, show: &'a Show) -> Option<&'a Season> {
    show.seasons.iter().find(|season| season.rating_key == key)
}

/// Total bytes and files over every library with data
pub fn totals(libraries: &[CachedLibraryData]) -> (u64, u64) {
    libraries
        .iter()
        .filter_map(|lib| lib.data.as_ref())
        .fold((0, 0), |(bytes, files), data| (bytes + data.bytes, files + data.files))
}


#[cfg(test)]
mod tests {
    use super::memory::MemoryStore;
    use super::*;
    use crate::dashboard::collectors::fixtures;

    #[tokio::test]
    async fn test_load_cached_data_defaults_title() {
        let store = MemoryStore::with(vec![
            ("1", Some(fixtures::movies_library())),
            ("9", None),
        ]);
        let cached = load_cached_data(&store).await.unwrap();
        assert_eq!(cached.len(), 2);
        assert_eq!(cached[0].title, "Movies");
        assert!(cached[0].data.is_some());
        assert_eq!(cached[1].title, "Untitled");
        assert!(cached[1].data.is_none());
    }

    #[tokio::test]
    async fn test_empty_store_loads_nothing() {
        let store = MemoryStore::default();
        assert!(load_cached_data(&store).await.unwrap().is_empty());
    }

    #[test]
    fn test_find_show_and_season() {
        let cached = fixtures::cached();
        let show = find_show_by_key("show-1", &cached).unwrap();
        assert_eq!(show.title, "The Expanse");
        assert!(find_show_by_key("m-1", &cached).is_none());
        assert!(find_show_by_key("missing", &cached).is_none());

        assert_eq!(find_season_by_key("season-1", show).unwrap().season_index, 1);
        assert!(find_season_by_key("season-9", show).is_none());
    }

    #[test]
    fn test_totals_skip_missing_data() {
        let mut cached = fixtures::cached();
        assert_eq!(totals(&cached), (4_000_000_000, 4));
        cached[1].data = None;
        assert_eq!(totals(&cached), (3_000_000_000, 2));
    }
}
