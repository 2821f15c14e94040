//! Row ordering by column and direction

use std::cmp::Ordering;

use super::collectors::Row;
use crate::utils::parse_size;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Index,
    Title,
    Size,
    Files,
    Library,
}

impl SortColumn {
    pub fn label(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Title => "title",
            Self::Size => "size",
            Self::Files => "files",
            Self::Library => "library",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Self::Asc => "↑",
            Self::Desc => "↓",
        }
    }
}

/// Bytes for ordering; falls back to parsing the size label when unset
pub fn size_key(row: &Row) -> u64 {
    if row.bytes > 0 {
        row.bytes
    } else {
        parse_size(&row.size)
    }
}

/// Ascending comparison of two rows under `column`
pub fn compare(a: &Row, b: &Row, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Index => a.index.unwrap_or(0).cmp(&b.index.unwrap_or(0)),
        SortColumn::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortColumn::Size => size_key(a).cmp(&size_key(b)),
        SortColumn::Files => a.files.cmp(&b.files),
        SortColumn::Library => {
            let a = a.library.as_deref().unwrap_or("").to_lowercase();
            let b = b.library.as_deref().unwrap_or("").to_lowercase();
            a.cmp(&b)
        }
    }
}

/// Sorted copy of `rows`; equal keys keep their input order in both directions
pub fn sort_rows(rows: &[Row], column: SortColumn, direction: SortDirection) -> Vec<Row> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        let ord = compare(a, b, column);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    sorted
}
