//! Navigation transitions over [`DashboardState`]
//!
//! Every operation degrades to a no-op on missing data and reports through
//! the status line instead of failing.

use tracing::debug;

use super::cached::{find_season_by_key, find_show_by_key};
use super::collectors::{SourceType, collect_episodes, collect_library, collect_overall, collect_seasons};
use super::sorting::{SortColumn, sort_rows};
use super::state::DashboardState;
use super::view_config::{Level, resolve};
use crate::plex::{LibraryScanResult, Season, Show};

/// Target of [`DashboardState::display_items`] with its backing data
#[derive(Debug, Clone)]
pub enum ViewPayload {
    /// Every cached library
    Overall,
    Library(LibraryScanResult),
    Show(Show),
    Season(Season),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMove {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMove {
    Prev,
    Next,
    First,
    Last,
}

impl DashboardState {
    /// Replace the table with the rows of `payload` at its default sort
    pub fn display_items(&mut self, payload: ViewPayload) {
        let (level, rows) = match &payload {
            ViewPayload::Overall => (Level::Overall, collect_overall(&self.libraries)),
            ViewPayload::Library(data) => (Level::Library, collect_library(data)),
            ViewPayload::Show(show) => (Level::Show, collect_seasons(show)),
            ViewPayload::Season(season) => (Level::Season, collect_episodes(season)),
        };

        if let ViewPayload::Library(data) = &payload {
            self.library_kind = Some(data.library_type);
        }
        let config = resolve(level, self.library_kind);

        self.table.sort_column = config.default_sort;
        self.table.sort_direction = config.default_direction;
        self.table.reset_window();
        self.table.rows = if rows.is_empty() {
            rows
        } else {
            sort_rows(&rows, config.default_sort, config.default_direction)
        };

        self.nav.level = level;
        match payload {
            ViewPayload::Overall => {
                self.nav.library_index = 0;
                self.nav.displayed_library = 0;
                self.nav.current_show = None;
                self.nav.current_season = None;
            }
            ViewPayload::Library(_) => {
                self.nav.displayed_library = self.nav.library_index;
                self.nav.current_show = None;
                self.nav.current_season = None;
            }
            ViewPayload::Show(show) => {
                self.nav.current_show = Some(show);
                self.nav.current_season = None;
            }
            ViewPayload::Season(season) => {
                self.nav.current_season = Some(season);
            }
        }
        debug!(
            "Displaying {} rows at {:?}",
            self.table.total_items(),
            self.nav.level
        );
    }

    /// Advance to the next library, wrapping through "All Libraries"
    pub fn cycle_library(&mut self) {
        let total = self.libraries.len() + 1;
        self.nav.library_index = (self.nav.library_index + 1) % total;

        if self.nav.library_index == 0 {
            self.display_items(ViewPayload::Overall);
            return;
        }

        let library = &self.libraries[self.nav.library_index - 1];
        let Some(data) = library.data.clone() else {
            let message = format!(
                "No cached data for {}. Run 'hactar scan {}' first.",
                library.title, library.key
            );
            // Leave any drill-down but keep the new highlight
            self.nav.current_show = None;
            self.nav.current_season = None;
            if matches!(self.nav.level, Level::Show | Level::Season) {
                let highlighted = self.nav.library_index;
                self.display_library_at(self.nav.displayed_library);
                self.nav.library_index = highlighted;
            }
            self.set_status(message);
            return;
        };
        self.display_items(ViewPayload::Library(data));
    }

    /// Show library `index` (same numbering as `library_index`), or the
    /// overall view when it has no cached data
    fn display_library_at(&mut self, index: usize) {
        let data = index
            .checked_sub(1)
            .and_then(|i| self.libraries.get(i))
            .and_then(|lib| lib.data.clone());
        match data {
            Some(data) => {
                self.nav.library_index = index;
                self.display_items(ViewPayload::Library(data));
            }
            None => self.display_items(ViewPayload::Overall),
        }
    }

    /// Open the selected show or season
    pub fn drill_down(&mut self) {
        let Some(row) = self.table.selected_row() else {
            return;
        };
        if !row.source_type.has_children() {
            return;
        }
        let (source_type, key) = (row.source_type, row.source_key.clone());

        match source_type {
            SourceType::Show => match find_show_by_key(&key, &self.libraries).cloned() {
                Some(show) => self.display_items(ViewPayload::Show(show)),
                None => self.set_status(format!("Show {} not found in cache", key)),
            },
            SourceType::Season => {
                let season = self
                    .nav
                    .current_show
                    .as_ref()
                    .and_then(|show| find_season_by_key(&key, show))
                    .cloned();
                match season {
                    Some(season) => self.display_items(ViewPayload::Season(season)),
                    None => self.set_status(format!("Season {} not found in cache", key)),
                }
            }
            SourceType::Movie | SourceType::Episode => {}
        }
    }

    /// Go up one level; a no-op at the overall view
    pub fn navigate_back(&mut self) {
        match self.nav.level {
            Level::Season => {
                if let Some(show) = self.nav.current_show.clone() {
                    self.display_items(ViewPayload::Show(show));
                }
            }
            Level::Show => self.display_library_at(self.nav.displayed_library),
            Level::Library => self.display_items(ViewPayload::Overall),
            Level::Overall => {}
        }
    }

    pub fn return_to_overall(&mut self) {
        if self.nav.level != Level::Overall {
            self.display_items(ViewPayload::Overall);
        }
    }

    pub fn move_selection(&mut self, movement: SelectionMove) {
        let total = self.table.total_items();
        if total == 0 {
            return;
        }
        let last = total - 1;
        let per_page = self.table.items_per_page;
        let current = self.table.selected.min(last);

        self.table.selected = match movement {
            SelectionMove::Up => current.saturating_sub(1),
            SelectionMove::Down => (current + 1).min(last),
            SelectionMove::PageUp => current.saturating_sub(per_page),
            SelectionMove::PageDown => (current + per_page).min(last),
            SelectionMove::Home => 0,
            SelectionMove::End => last,
        };
        self.table.sync_page();
    }

    /// Change page, placing the selection on the first row of the new page
    pub fn change_page(&mut self, movement: PageMove) {
        let total = self.table.total_items();
        if total == 0 {
            return;
        }
        let pages = self.table.total_pages();
        let page = self.table.current_page;

        let target = match movement {
            PageMove::Prev if page > 1 => page - 1,
            PageMove::Next if page < pages => page + 1,
            PageMove::First => 1,
            PageMove::Last => pages,
            _ => return,
        };
        self.table.current_page = target;
        self.table.selected = self.table.page_start().min(total - 1);
    }

    /// Sort by `column`; the library column only applies to the overall view
    pub fn sort_by_column(&mut self, column: SortColumn) {
        if column == SortColumn::Library && self.nav.level != Level::Overall {
            return;
        }
        self.table.sort_column = column;
        self.table.reset_window();
        self.table.rows = sort_rows(&self.table.rows, column, self.table.sort_direction);
    }

    /// Sort by the column bound to hotkey `n` at the current level
    pub fn sort_by_hotkey(&mut self, n: usize) {
        if let Some(column) = self.view_config().hotkey_column(n) {
            self.sort_by_column(column);
        }
    }

    pub fn toggle_sort_direction(&mut self) {
        self.table.sort_direction = self.table.sort_direction.toggled();
        self.sort_by_column(self.table.sort_column);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::cached::CachedLibraryData;
    use crate::dashboard::collectors::fixtures;
    use crate::dashboard::sorting::SortDirection;
    use crate::dashboard::state::ITEMS_PER_PAGE;
    use crate::plex::{LibraryItem, LibraryKind};
    use proptest::prelude::*;

    fn big_library(count: usize) -> Vec<CachedLibraryData> {
        let items = (0..count)
            .map(|i| fixtures::movie(&format!("m{}", i), &format!("Movie {:03}", i), (i as u64 + 1) * 1_000))
            .collect::<Vec<LibraryItem>>();
        vec![CachedLibraryData {
            key: "1".into(),
            title: "Big".into(),
            data: Some(LibraryScanResult::new(LibraryKind::Movie, "Big", items)),
        }]
    }

    #[test]
    fn test_display_items_resets_window() {
        let mut state = DashboardState::new(big_library(45));
        state.move_selection(SelectionMove::End);
        assert_eq!(state.table.current_page, 3);

        state.display_items(ViewPayload::Overall);
        assert_eq!(state.table.current_page, 1);
        assert_eq!(state.table.selected, 0);
        assert_eq!(state.table.total_items(), 45);
    }

    #[test]
    fn test_cycle_library_wraps() {
        let mut state = DashboardState::new(fixtures::cached());
        let count = state.libraries.len();

        state.cycle_library();
        assert_eq!(state.nav.level, Level::Library);
        assert_eq!(state.library_kind, Some(LibraryKind::Movie));
        assert_eq!(state.table.total_items(), 2);

        state.cycle_library();
        assert_eq!(state.library_kind, Some(LibraryKind::Show));
        assert_eq!(state.view_config().columns.len(), 3);

        for _ in 0..(count + 1) {
            state.cycle_library();
        }
        assert_eq!(state.nav.library_index, 2);

        state.cycle_library();
        assert_eq!(state.nav.library_index, 0);
        assert_eq!(state.nav.level, Level::Overall);
    }

    #[test]
    fn test_cycle_into_unscanned_library_reports_status() {
        let mut libraries = fixtures::cached();
        libraries[0].data = None;
        let mut state = DashboardState::new(libraries);

        state.cycle_library();
        assert_eq!(state.nav.library_index, 1);
        assert_eq!(state.nav.level, Level::Overall);
        assert_eq!(state.current_library_title(), "All Libraries");
        assert_eq!(
            state.status.as_ref().unwrap().text,
            "No cached data for Movies. Run 'hactar scan 1' first."
        );
    }

    #[test]
    fn test_cycle_into_unscanned_library_leaves_drill_down() {
        let mut libraries = fixtures::cached();
        libraries.push(CachedLibraryData {
            key: "3".into(),
            title: "Anime".into(),
            data: None,
        });
        let mut state = DashboardState::new(libraries);

        state.cycle_library();
        state.cycle_library();
        state.drill_down();
        assert_eq!(state.nav.level, Level::Show);

        state.cycle_library();
        assert_eq!(state.nav.library_index, 3);
        assert_eq!(state.nav.level, Level::Library);
        assert!(state.nav.current_show.is_none());
        assert!(state.nav.current_season.is_none());
        assert_eq!(state.current_library_title(), "TV");
        assert_eq!(state.table.rows[0].title, "The Expanse");

        state.cycle_library();
        assert_eq!(state.nav.library_index, 0);
        assert_eq!(state.nav.level, Level::Overall);
    }

    #[test]
    fn test_drill_down_show_then_season() {
        let mut state = DashboardState::new(fixtures::cached());
        let show_row = state
            .table
            .rows
            .iter()
            .position(|r| r.source_type == SourceType::Show)
            .unwrap();
        state.table.selected = show_row;

        state.drill_down();
        assert_eq!(state.nav.level, Level::Show);
        assert_eq!(state.nav.current_show.as_ref().unwrap().title, "The Expanse");
        assert_eq!(state.table.sort_column, SortColumn::Index);
        assert_eq!(state.table.sort_direction, SortDirection::Asc);

        state.drill_down();
        assert_eq!(state.nav.level, Level::Season);
        assert!(state.nav.current_season.is_some());
        assert!(state.nav.current_show.is_some());
        assert_eq!(state.table.total_items(), 2);

        // Episodes are leaves
        state.drill_down();
        assert_eq!(state.nav.level, Level::Season);

        state.navigate_back();
        assert_eq!(state.nav.level, Level::Show);
        assert!(state.nav.current_season.is_none());

        state.navigate_back();
        assert_eq!(state.nav.level, Level::Overall);
        assert_eq!(state.table.sort_column, SortColumn::Size);
        assert_eq!(state.table.sort_direction, SortDirection::Desc);
    }

    #[test]
    fn test_drill_down_on_movie_is_noop() {
        let mut state = DashboardState::new(fixtures::cached());
        state.cycle_library();
        let before = state.table.clone();
        state.drill_down();
        assert_eq!(state.nav.level, Level::Library);
        assert_eq!(state.table, before);
    }

    #[test]
    fn test_drill_down_missing_show_sets_status() {
        let mut state = DashboardState::new(fixtures::cached());
        for row in state.table.rows.iter_mut() {
            row.source_key = "gone".into();
        }
        let show_row = state
            .table
            .rows
            .iter()
            .position(|r| r.source_type == SourceType::Show)
            .unwrap();
        state.table.selected = show_row;

        state.drill_down();
        assert_eq!(state.nav.level, Level::Overall);
        assert!(state.status.is_some());
    }

    #[test]
    fn test_back_from_show_returns_to_library() {
        let mut state = DashboardState::new(fixtures::cached());
        state.cycle_library();
        state.cycle_library();
        state.drill_down();
        assert_eq!(state.nav.level, Level::Show);

        state.navigate_back();
        assert_eq!(state.nav.level, Level::Library);
        assert_eq!(state.nav.library_index, 2);

        state.navigate_back();
        assert_eq!(state.nav.level, Level::Overall);
        assert_eq!(state.nav.library_index, 0);
    }

    #[test]
    fn test_back_from_overall_is_noop() {
        let mut state = DashboardState::new(fixtures::cached());
        state.move_selection(SelectionMove::Down);
        let (nav, table) = (state.nav.clone(), state.table.clone());
        state.navigate_back();
        assert_eq!(state.nav, nav);
        assert_eq!(state.table, table);
    }

    #[test]
    fn test_return_to_overall_from_season() {
        let mut state = DashboardState::new(fixtures::cached());
        state.cycle_library();
        state.cycle_library();
        state.drill_down();
        state.drill_down();
        assert_eq!(state.nav.level, Level::Season);

        state.return_to_overall();
        assert_eq!(state.nav.level, Level::Overall);
        assert_eq!(state.nav.library_index, 0);
        assert!(state.nav.current_show.is_none());
    }

    #[test]
    fn test_selection_moves_and_clamps() {
        let mut state = DashboardState::new(big_library(45));
        state.move_selection(SelectionMove::Up);
        assert_eq!(state.table.selected, 0);

        state.move_selection(SelectionMove::PageDown);
        assert_eq!(state.table.selected, ITEMS_PER_PAGE);
        assert_eq!(state.table.current_page, 2);

        state.move_selection(SelectionMove::End);
        state.move_selection(SelectionMove::Down);
        assert_eq!(state.table.selected, 44);
        assert_eq!(state.table.current_page, 3);

        state.move_selection(SelectionMove::Home);
        assert_eq!((state.table.selected, state.table.current_page), (0, 1));
    }

    #[test]
    fn test_page_moves_select_first_row() {
        let mut state = DashboardState::new(big_library(45));
        state.change_page(PageMove::Prev);
        assert_eq!(state.table.current_page, 1);

        state.change_page(PageMove::Next);
        assert_eq!((state.table.current_page, state.table.selected), (2, 20));

        state.change_page(PageMove::Last);
        assert_eq!((state.table.current_page, state.table.selected), (3, 40));
        state.change_page(PageMove::Next);
        assert_eq!(state.table.current_page, 3);

        state.change_page(PageMove::First);
        assert_eq!((state.table.current_page, state.table.selected), (1, 0));
    }

    #[test]
    fn test_library_column_only_sorts_overall() {
        let mut state = DashboardState::new(fixtures::cached());
        state.sort_by_column(SortColumn::Library);
        assert_eq!(state.table.sort_column, SortColumn::Library);

        state.cycle_library();
        state.sort_by_column(SortColumn::Library);
        assert_eq!(state.table.sort_column, SortColumn::Size);
    }

    #[test]
    fn test_hotkeys_map_to_level_columns() {
        let mut state = DashboardState::new(fixtures::cached());
        state.sort_by_hotkey(1);
        assert_eq!(state.table.sort_column, SortColumn::Title);
        // Direction carries over from the size default
        assert_eq!(state.table.rows[0].title, "The Expanse");

        state.cycle_library();
        state.sort_by_hotkey(4);
        assert_eq!(state.table.sort_column, SortColumn::Size);
    }

    #[test]
    fn test_toggle_sort_direction_resorts() {
        let mut state = DashboardState::new(fixtures::cached());
        state.move_selection(SelectionMove::End);
        state.toggle_sort_direction();
        assert_eq!(state.table.sort_direction, SortDirection::Asc);
        assert_eq!(state.table.selected, 0);
        assert_eq!(state.table.rows.last().unwrap().title, "Blade Runner");
    }

    fn movement() -> impl Strategy<Value = SelectionMove> {
        prop_oneof![
            Just(SelectionMove::Up),
            Just(SelectionMove::Down),
            Just(SelectionMove::PageUp),
            Just(SelectionMove::PageDown),
            Just(SelectionMove::Home),
            Just(SelectionMove::End),
        ]
    }

    proptest! {
        #[test]
        fn test_selection_stays_in_bounds(
            count in 1usize..70,
            moves in proptest::collection::vec(movement(), 0..40),
        ) {
            let mut state = DashboardState::new(big_library(count));
            for m in moves {
                state.move_selection(m);
                prop_assert!(state.table.selected < count);
                prop_assert_eq!(
                    state.table.current_page,
                    state.table.selected / state.table.items_per_page + 1
                );
                prop_assert!(state.table.current_page <= state.table.total_pages());
            }
        }
    }
}
