//! The dashboard aggregate: navigation, table window, status line and modal

use std::time::{Duration, Instant};

use super::cached::CachedLibraryData;
use super::collectors::Row;
use super::modal::ModalManager;
use super::navigation::ViewPayload;
use super::sorting::{SortColumn, SortDirection};
use super::view_config::{Level, ViewConfig, resolve};
use crate::plex::{LibraryKind, Season, Show};

pub const ITEMS_PER_PAGE: usize = 20;
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Where in the hierarchy the table currently is
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationState {
    pub level: Level,
    /// Highlighted library: 0 is "All Libraries", `n` is `libraries[n - 1]`
    pub library_index: usize,
    /// Library whose items are on screen, same numbering. Lags
    /// `library_index` after cycling onto a library with no cached data.
    pub displayed_library: usize,
    pub current_show: Option<Show>,
    pub current_season: Option<Season>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            level: Level::Overall,
            library_index: 0,
            displayed_library: 0,
            current_show: None,
            current_season: None,
        }
    }
}

/// Rows at the current level plus the paging and sort window over them
#[derive(Debug, Clone, PartialEq)]
pub struct TableState {
    pub rows: Vec<Row>,
    /// 1-based
    pub current_page: usize,
    pub items_per_page: usize,
    pub selected: usize,
    pub sort_column: SortColumn,
    pub sort_direction: SortDirection,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            current_page: 1,
            items_per_page: ITEMS_PER_PAGE,
            selected: 0,
            sort_column: SortColumn::Size,
            sort_direction: SortDirection::Desc,
        }
    }
}

impl TableState {
    pub fn total_items(&self) -> usize {
        self.rows.len()
    }

    /// At least 1, even when empty
    pub fn total_pages(&self) -> usize {
        self.total_items().div_ceil(self.items_per_page).max(1)
    }

    pub fn page_start(&self) -> usize {
        (self.current_page - 1) * self.items_per_page
    }

    /// Rows visible on the current page
    pub fn page_rows(&self) -> &[Row] {
        let start = self.page_start().min(self.rows.len());
        let end = (start + self.items_per_page).min(self.rows.len());
        &self.rows[start..end]
    }

    pub fn selected_row(&self) -> Option<&Row> {
        self.rows.get(self.selected)
    }

    /// Recompute the page from the selection
    pub(crate) fn sync_page(&mut self) {
        self.current_page = self.selected / self.items_per_page + 1;
    }

    pub(crate) fn reset_window(&mut self) {
        self.current_page = 1;
        self.selected = 0;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub at: Instant,
}

pub struct DashboardState {
    pub libraries: Vec<CachedLibraryData>,
    pub nav: NavigationState,
    pub table: TableState,
    /// Kind of the library shown at `Level::Library`
    pub library_kind: Option<LibraryKind>,
    pub status: Option<StatusMessage>,
    pub modal: ModalManager,
}

impl DashboardState {
    /// Start at the overall view of `libraries`
    pub fn new(libraries: Vec<CachedLibraryData>) -> Self {
        let mut state = Self {
            libraries,
            nav: NavigationState::default(),
            table: TableState::default(),
            library_kind: None,
            status: None,
            modal: ModalManager::default(),
        };
        state.display_items(ViewPayload::Overall);
        state
    }

    pub fn view_config(&self) -> ViewConfig {
        resolve(self.nav.level, self.library_kind)
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            at: Instant::now(),
        });
    }

    /// Clear the status line once it is older than [`STATUS_TIMEOUT`]
    pub fn check_status_timeout(&mut self, now: Instant) {
        if self
            .status
            .as_ref()
            .is_some_and(|status| now.duration_since(status.at) >= STATUS_TIMEOUT)
        {
            self.status = None;
        }
    }

    /// Swap in a freshly loaded tree and return to the overall view
    pub fn reload(&mut self, libraries: Vec<CachedLibraryData>) {
        self.libraries = libraries;
        self.nav = NavigationState::default();
        self.display_items(ViewPayload::Overall);
    }

    /// Title of the library on screen, "All Libraries" for the overall view
    pub fn current_library_title(&self) -> &str {
        match self.nav.displayed_library {
            0 => "All Libraries",
            i => self
                .libraries
                .get(i - 1)
                .map(|lib| lib.title.as_str())
                .unwrap_or("Unknown"),
        }
    }
}
