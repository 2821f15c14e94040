//! Columns and default sort for each navigation level

use super::sorting::{SortColumn, SortDirection};
use crate::plex::LibraryKind;

/// Depth in the library hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Overall,
    Library,
    Show,
    Season,
}

impl Level {
    pub fn label(self) -> &'static str {
        match self {
            Self::Overall => "Overall",
            Self::Library => "Library",
            Self::Show => "Show",
            Self::Season => "Season",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub sort: SortColumn,
    pub label: &'static str,
}

const fn col(sort: SortColumn, label: &'static str) -> Column {
    Column { sort, label }
}

const OVERALL: &[Column] = &[
    col(SortColumn::Title, "Title"),
    col(SortColumn::Size, "Size"),
    col(SortColumn::Files, "Files"),
    col(SortColumn::Library, "Library"),
];
const MOVIE_LIBRARY: &[Column] = &[col(SortColumn::Title, "Title"), col(SortColumn::Size, "Size")];
const SHOW_LIBRARY: &[Column] = &[
    col(SortColumn::Title, "Title"),
    col(SortColumn::Size, "Size"),
    col(SortColumn::Files, "Episodes"),
];
const SHOW: &[Column] = &[
    col(SortColumn::Index, "Season"),
    col(SortColumn::Title, "Title"),
    col(SortColumn::Size, "Size"),
    col(SortColumn::Files, "Episodes"),
];
const SEASON: &[Column] = &[
    col(SortColumn::Index, "Episode"),
    col(SortColumn::Title, "Title"),
    col(SortColumn::Size, "Size"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewConfig {
    pub columns: &'static [Column],
    pub default_sort: SortColumn,
    pub default_direction: SortDirection,
}

impl ViewConfig {
    /// Column bound to sort hotkey `n` (1-based) at this level
    pub fn hotkey_column(&self, n: usize) -> Option<SortColumn> {
        n.checked_sub(1)
            .and_then(|i| self.columns.get(i))
            .map(|c| c.sort)
    }
}

/// A library of unknown kind is shown with the movie column set
pub fn resolve(level: Level, kind: Option<LibraryKind>) -> ViewConfig {
    let columns = match level {
        Level::Overall => OVERALL,
        Level::Library => match kind {
            Some(LibraryKind::Show) => SHOW_LIBRARY,
            _ => MOVIE_LIBRARY,
        },
        Level::Show => SHOW,
        Level::Season => SEASON,
    };
    let (default_sort, default_direction) = match level {
        Level::Overall | Level::Library => (SortColumn::Size, SortDirection::Desc),
        Level::Show | Level::Season => (SortColumn::Index, SortDirection::Asc),
    };
    ViewConfig {
        columns,
        default_sort,
        default_direction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(config: &ViewConfig) -> Vec<&'static str> {
        config.columns.iter().map(|c| c.label).collect()
    }

    #[test]
    fn test_column_sets() {
        assert_eq!(labels(&resolve(Level::Overall, None)), vec!["Title", "Size", "Files", "Library"]);
        assert_eq!(labels(&resolve(Level::Library, Some(LibraryKind::Movie))), vec!["Title", "Size"]);
        assert_eq!(
            labels(&resolve(Level::Library, Some(LibraryKind::Show))),
            vec!["Title", "Size", "Episodes"]
        );
        assert_eq!(labels(&resolve(Level::Show, None)), vec!["Season", "Title", "Size", "Episodes"]);
        assert_eq!(labels(&resolve(Level::Season, None)), vec!["Episode", "Title", "Size"]);
    }

    #[test]
    fn test_default_sorts() {
        let overall = resolve(Level::Overall, None);
        assert_eq!((overall.default_sort, overall.default_direction), (SortColumn::Size, SortDirection::Desc));
        let season = resolve(Level::Season, None);
        assert_eq!((season.default_sort, season.default_direction), (SortColumn::Index, SortDirection::Asc));
    }

    #[test]
    fn test_hotkeys_follow_level() {
        assert_eq!(resolve(Level::Overall, None).hotkey_column(1), Some(SortColumn::Title));
        assert_eq!(resolve(Level::Show, None).hotkey_column(1), Some(SortColumn::Index));
        assert_eq!(resolve(Level::Overall, None).hotkey_column(4), Some(SortColumn::Library));
        assert_eq!(resolve(Level::Season, None).hotkey_column(4), None);
        assert_eq!(resolve(Level::Season, None).hotkey_column(0), None);
    }
}
