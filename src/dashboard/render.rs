//! Drawing the dashboard
//!
//! The `*_lines`/`*_cells` functions project state into plain strings and are
//! what the tests look at; `draw` lays them out with ratatui.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row as TableRow, Table, TableState, Wrap},
};

use super::cached::{CachedLibraryData, totals};
use super::collectors::Row;
use super::modal::{ConfigureField, ConfigureModal, Feedback, ModalState, ScanModal};
use super::sorting::SortColumn;
use super::state::DashboardState;
use super::view_config::{Column, Level};
use crate::utils::{bytes_to_human, truncate_title};

const TITLE_WIDTH: usize = 30;
const LIBRARY_WIDTH: usize = 15;
const KEY_HINTS: &str =
    "↑↓ select  Enter drill  Bksp back  ←→ page  Tab library  1-4 sort  r reverse  0 overall  c configure  s scan  q quit";

/// Column labels, with an arrow on the sorted column
pub fn header_cells(state: &DashboardState) -> Vec<String> {
    state
        .view_config()
        .columns
        .iter()
        .map(|column| {
            if column.sort == state.table.sort_column {
                format!("{} {}", column.label, state.table.sort_direction.arrow())
            } else {
                column.label.to_string()
            }
        })
        .collect()
}

pub fn row_cells(row: &Row, columns: &[Column]) -> Vec<String> {
    columns
        .iter()
        .map(|column| match column.sort {
            SortColumn::Index => row.index.map(|i| i.to_string()).unwrap_or_default(),
            SortColumn::Title => truncate_title(&row.title, TITLE_WIDTH),
            SortColumn::Size => row.size.clone(),
            SortColumn::Files => row.files.to_string(),
            SortColumn::Library => row
                .library
                .as_deref()
                .map(|l| truncate_title(l, LIBRARY_WIDTH))
                .unwrap_or_default(),
        })
        .collect()
}

/// Breadcrumb for the current view
pub fn view_name(state: &DashboardState) -> String {
    let mut name = state.current_library_title().to_string();
    if matches!(state.nav.level, Level::Show | Level::Season)
        && let Some(show) = &state.nav.current_show
    {
        name.push_str(" > ");
        name.push_str(&show.title);
    }
    if state.nav.level == Level::Season
        && let Some(season) = &state.nav.current_season
    {
        name.push_str(" > ");
        if season.title.trim().is_empty() {
            name.push_str(&format!("Season {}", season.season_index));
        } else {
            name.push_str(&season.title);
        }
    }
    name
}

pub fn status_lines(state: &DashboardState) -> Vec<String> {
    let table = &state.table;
    let total = table.total_items();
    let (first, last) = if total == 0 {
        (0, 0)
    } else {
        let start = table.page_start();
        (start + 1, (start + table.items_per_page).min(total))
    };

    let mut lines = vec![
        format!("View: {} ({})", view_name(state), state.nav.level.label()),
        format!("Items: {}-{} of {}", first, last, total),
        format!("Page: {}/{}", table.current_page, table.total_pages()),
        format!(
            "Sort: {} ({})",
            table.sort_column.label(),
            table.sort_direction.label()
        ),
    ];
    if let Some(status) = &state.status {
        lines.push(status.text.clone());
    }
    lines
}

/// Totals plus the five largest libraries
pub fn storage_summary_lines(libraries: &[CachedLibraryData]) -> Vec<String> {
    let (bytes, files) = totals(libraries);
    let mut lines = vec![
        format!("Total Storage: {}", bytes_to_human(bytes)),
        format!("Total Files: {}", files),
        String::new(),
        "Largest Libraries:".to_string(),
    ];

    let mut sized: Vec<(&str, u64)> = libraries
        .iter()
        .filter_map(|lib| lib.data.as_ref().map(|d| (lib.title.as_str(), d.bytes)))
        .collect();
    sized.sort_by(|a, b| b.1.cmp(&a.1));
    lines.extend(
        sized
            .into_iter()
            .take(5)
            .map(|(title, bytes)| format!("{}: {}", title, bytes_to_human(bytes))),
    );
    lines
}

pub fn library_list_items(libraries: &[CachedLibraryData]) -> Vec<String> {
    std::iter::once("[ All Libraries ]".to_string())
        .chain(libraries.iter().map(|lib| truncate_title(&lib.title, TITLE_WIDTH)))
        .collect()
}

fn feedback_lines(feedback: &Feedback) -> Vec<Line<'static>> {
    match feedback {
        Feedback::None => Vec::new(),
        Feedback::Errors(errors) => errors
            .iter()
            .map(|e| Line::styled(e.clone(), Style::default().fg(Color::Red)))
            .collect(),
        Feedback::Success(message) => {
            vec![Line::styled(message.clone(), Style::default().fg(Color::Green))]
        }
        Feedback::Progress(message) => {
            vec![Line::styled(message.clone(), Style::default().fg(Color::Yellow))]
        }
    }
}

pub fn draw(f: &mut Frame, state: &DashboardState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(f.area());
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(rows[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(43), Constraint::Percentage(57)])
        .split(top[1]);

    draw_library_list(f, state, top[0]);

    let summary = Paragraph::new(
        storage_summary_lines(&state.libraries)
            .into_iter()
            .map(Line::from)
            .collect::<Vec<_>>(),
    )
    .block(Block::default().borders(Borders::ALL).title("Storage Summary"));
    f.render_widget(summary, right[0]);

    draw_items_table(f, state, right[1]);

    let mut status: Vec<Line> = status_lines(state).into_iter().map(Line::from).collect();
    status.push(Line::styled(KEY_HINTS, Style::default().fg(Color::DarkGray)));
    let status = Paragraph::new(status)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Activity Log"));
    f.render_widget(status, rows[1]);

    match state.modal.state() {
        ModalState::None => {}
        ModalState::Configure(modal) => draw_configure_modal(f, modal),
        ModalState::Scan(modal) => draw_scan_modal(f, modal),
    }
}

fn draw_library_list(f: &mut Frame, state: &DashboardState, area: Rect) {
    let items: Vec<ListItem> = library_list_items(&state.libraries)
        .into_iter()
        .map(ListItem::new)
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Libraries [Tab]"))
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan));
    let mut list_state = ListState::default();
    list_state.select(Some(state.nav.library_index));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_items_table(f: &mut Frame, state: &DashboardState, area: Rect) {
    let config = state.view_config();
    let header = TableRow::new(header_cells(state)).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    let body: Vec<TableRow> = state
        .table
        .page_rows()
        .iter()
        .map(|row| TableRow::new(row_cells(row, config.columns).into_iter().map(Cell::from)))
        .collect();
    let widths: Vec<Constraint> = config
        .columns
        .iter()
        .map(|column| match column.sort {
            SortColumn::Index => Constraint::Length(8),
            SortColumn::Title => Constraint::Min(20),
            SortColumn::Size => Constraint::Length(10),
            SortColumn::Files => Constraint::Length(9),
            SortColumn::Library => Constraint::Length(LIBRARY_WIDTH as u16 + 1),
        })
        .collect();

    let table = Table::new(body, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Items [↑↓ Enter]"))
        .row_highlight_style(Style::default().fg(Color::Black).bg(Color::Green));

    let mut table_state = TableState::default();
    if state.table.total_items() > 0 {
        table_state.select(Some(state.table.selected - state.table.page_start()));
    }
    f.render_stateful_widget(table, area, &mut table_state);
}

fn field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let cursor = if focused { "_" } else { "" };
    Line::styled(format!("{:<12}{}{}", label, value, cursor), style)
}

fn draw_configure_modal(f: &mut Frame, modal: &ConfigureModal) {
    let masked = "*".repeat(modal.token.chars().count());
    let save_style = if modal.focus == ConfigureField::Save {
        Style::default().fg(Color::Black).bg(Color::Green)
    } else {
        Style::default().fg(Color::Green)
    };

    let mut lines = vec![
        Line::from(""),
        field_line("Server URL:", &modal.server_url, modal.focus == ConfigureField::ServerUrl),
        Line::from(""),
        field_line("Token:", &masked, modal.focus == ConfigureField::Token),
        Line::from(""),
        Line::styled("[ Save ]", save_style),
        Line::from(""),
    ];
    lines.extend(feedback_lines(&modal.feedback));
    lines.push(Line::from(""));
    lines.push(Line::styled(
        "Tab: Next field | Enter: Save | Esc: Cancel",
        Style::default().fg(Color::Yellow),
    ));

    let popup = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Configure ")
            .border_style(Style::default().fg(Color::Cyan))
            .style(Style::default().bg(Color::Black)),
    );
    let area = centered_rect(60, 16, f.area());
    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn draw_scan_modal(f: &mut Frame, modal: &ScanModal) {
    let area = centered_rect(60, 18, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Scan ")
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(4)])
        .split(inner);

    let items: Vec<ListItem> = if modal.loaded && modal.libraries.is_empty() {
        vec![ListItem::new("No libraries found")]
    } else if !modal.loaded {
        vec![ListItem::new("Loading libraries...")]
    } else {
        modal
            .libraries
            .iter()
            .map(|lib| ListItem::new(format!("{} ({})", lib.title, lib.kind)))
            .collect()
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Select Library "))
        .highlight_style(Style::default().bg(Color::Blue));
    let mut list_state = ListState::default();
    list_state.select(modal.selected);
    f.render_stateful_widget(list, parts[0], &mut list_state);

    let mut footer = feedback_lines(&modal.feedback);
    footer.push(Line::styled(
        "↑↓: Select | Enter: Scan | Esc: Cancel",
        Style::default().fg(Color::Yellow),
    ));
    f.render_widget(Paragraph::new(footer), parts[1]);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::cached::CachedLibraryData;
    use crate::dashboard::collectors::fixtures;
    use crate::dashboard::modal::ModalKind;
    use crate::dashboard::navigation::SelectionMove;
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn test_header_marks_sorted_column() {
        let mut state = DashboardState::new(fixtures::cached());
        assert_eq!(header_cells(&state), vec!["Title", "Size ↓", "Files", "Library"]);
        state.toggle_sort_direction();
        assert_eq!(header_cells(&state)[1], "Size ↑");
    }

    #[test]
    fn test_row_cells_truncate() {
        let state = DashboardState::new(fixtures::cached());
        let mut row = state.table.rows[0].clone();
        row.title = "A Very Long Movie Title That Keeps Going".into();
        row.library = Some("An Extremely Long Library".into());
        let cells = row_cells(&row, state.view_config().columns);
        assert_eq!(cells[0], "A Very Long Movie Title Tha...");
        assert_eq!(cells[3], "An Extremely...");
    }

    #[test]
    fn test_status_lines_describe_window() {
        let mut state = DashboardState::new(fixtures::cached());
        state.move_selection(SelectionMove::Down);
        let lines = status_lines(&state);
        assert_eq!(lines[0], "View: All Libraries (Overall)");
        assert_eq!(lines[1], "Items: 1-3 of 3");
        assert_eq!(lines[2], "Page: 1/1");
        assert_eq!(lines[3], "Sort: size (desc)");

        let empty = DashboardState::new(Vec::new());
        assert_eq!(status_lines(&empty)[1], "Items: 0-0 of 0");
    }

    #[test]
    fn test_view_name_breadcrumb() {
        let mut state = DashboardState::new(fixtures::cached());
        state.cycle_library();
        state.cycle_library();
        state.drill_down();
        state.drill_down();
        assert_eq!(view_name(&state), "TV > The Expanse > Season 1");
    }

    #[test]
    fn test_view_name_follows_displayed_library() {
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
        assert_eq!(view_name(&state), "TV > The Expanse");

        state.cycle_library();
        assert_eq!(view_name(&state), "TV");

        state.cycle_library();
        assert_eq!(view_name(&state), "All Libraries");
        state.cycle_library();
        assert_eq!(view_name(&state), "Movies");
    }

    #[test]
    fn test_storage_summary() {
        let lines = storage_summary_lines(&fixtures::cached());
        assert_eq!(lines[0], "Total Storage: 4 GB");
        assert_eq!(lines[1], "Total Files: 4");
        assert_eq!(lines[4], "Movies: 3 GB");
        assert_eq!(lines[5], "TV: 1 GB");
    }

    #[test]
    fn test_library_list_starts_with_all() {
        let items = library_list_items(&fixtures::cached());
        assert_eq!(items, vec!["[ All Libraries ]", "Movies", "TV"]);
    }

    #[test]
    fn test_draw_with_modal_does_not_panic() {
        let mut state = DashboardState::new(fixtures::cached());
        state.modal.open(ModalKind::Configure).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| draw(f, &state)).unwrap();

        state.modal.close();
        state.modal.open(ModalKind::Scan).unwrap();
        terminal.draw(|f| draw(f, &state)).unwrap();
    }
}
