//! Key bindings and action dispatch
//!
//! [`resolve_key`] maps a key event to an [`Action`]; [`dispatch`] applies it
//! to the state and returns the side effect the runtime must perform. The
//! modal gate lives in `dispatch` alone: while a modal is visible only modal
//! actions, opening, closing and quitting get through.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use super::modal::{ConfigureRequest, ModalError, ModalKind};
use super::navigation::{PageMove, SelectionMove};
use super::state::DashboardState;
use crate::plex::LibrarySection;

/// Input directed at the active modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalInput {
    Char(char),
    Backspace,
    NextField,
    PrevField,
    Up,
    Down,
    Submit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveSelection(SelectionMove),
    ChangePage(PageMove),
    DrillDown,
    NavigateBack,
    ReturnToOverall,
    CycleLibrary,
    /// Sort by the n-th column of the current level (1-based)
    SortHotkey(usize),
    ToggleSortDirection,
    OpenModal(ModalKind),
    CloseModal,
    Modal(ModalInput),
}

impl Action {
    fn passes_modal_gate(self) -> bool {
        matches!(
            self,
            Self::Quit | Self::OpenModal(_) | Self::CloseModal | Self::Modal(_)
        )
    }
}

/// Work the runtime has to do after a dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    SaveConfiguration(ConfigureRequest),
    ScanLibrary(LibrarySection),
    LoadScanLibraries,
    /// Reload cached data after a success was closed by hand
    Refresh,
}

/// Map a key press to an action; text keys feed the modal while one is open
pub fn resolve_key(key: &KeyEvent, modal_active: bool) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }
    if modal_active {
        resolve_modal_key(key)
    } else {
        resolve_global_key(key)
    }
}

fn resolve_modal_key(key: &KeyEvent) -> Option<Action> {
    let input = match key.code {
        KeyCode::Esc => return Some(Action::CloseModal),
        KeyCode::Enter => ModalInput::Submit,
        KeyCode::Tab => ModalInput::NextField,
        KeyCode::BackTab => ModalInput::PrevField,
        KeyCode::Backspace => ModalInput::Backspace,
        KeyCode::Up => ModalInput::Up,
        KeyCode::Down => ModalInput::Down,
        KeyCode::Char(c) => ModalInput::Char(c),
        _ => return None,
    };
    Some(Action::Modal(input))
}

fn resolve_global_key(key: &KeyEvent) -> Option<Action> {
    let action = match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Up | KeyCode::Char('k') => Action::MoveSelection(SelectionMove::Up),
        KeyCode::Down | KeyCode::Char('j') => Action::MoveSelection(SelectionMove::Down),
        KeyCode::PageUp => Action::MoveSelection(SelectionMove::PageUp),
        KeyCode::PageDown => Action::MoveSelection(SelectionMove::PageDown),
        KeyCode::Home | KeyCode::Char('g') => Action::MoveSelection(SelectionMove::Home),
        KeyCode::End | KeyCode::Char('G') => Action::MoveSelection(SelectionMove::End),
        KeyCode::Left => Action::ChangePage(PageMove::Prev),
        KeyCode::Right => Action::ChangePage(PageMove::Next),
        KeyCode::Char('[') => Action::ChangePage(PageMove::First),
        KeyCode::Char(']') => Action::ChangePage(PageMove::Last),
        KeyCode::Enter | KeyCode::Char('l') => Action::DrillDown,
        KeyCode::Backspace | KeyCode::Char('h') => Action::NavigateBack,
        KeyCode::Char('0') => Action::ReturnToOverall,
        KeyCode::Tab => Action::CycleLibrary,
        KeyCode::Char(c @ '1'..='4') => Action::SortHotkey(c as usize - '0' as usize),
        KeyCode::Char('r') => Action::ToggleSortDirection,
        KeyCode::Char('c') => Action::OpenModal(ModalKind::Configure),
        KeyCode::Char('s') => Action::OpenModal(ModalKind::Scan),
        KeyCode::Esc => Action::CloseModal,
        _ => return None,
    };
    Some(action)
}

/// Apply `action` to `state`
pub fn dispatch(state: &mut DashboardState, action: Action) -> Effect {
    if state.modal.is_active() && !action.passes_modal_gate() {
        debug!("Ignoring {:?} while a modal is open", action);
        return Effect::None;
    }

    match action {
        Action::Quit => return Effect::Quit,
        Action::MoveSelection(movement) => state.move_selection(movement),
        Action::ChangePage(movement) => state.change_page(movement),
        Action::DrillDown => state.drill_down(),
        Action::NavigateBack => state.navigate_back(),
        Action::ReturnToOverall => state.return_to_overall(),
        Action::CycleLibrary => state.cycle_library(),
        Action::SortHotkey(n) => state.sort_by_hotkey(n),
        Action::ToggleSortDirection => state.toggle_sort_direction(),
        Action::OpenModal(kind) => return open_modal(state, kind),
        Action::CloseModal => {
            if state.modal.close() {
                return Effect::Refresh;
            }
        }
        Action::Modal(input) => return modal_input(state, input),
    }
    Effect::None
}

fn open_modal(state: &mut DashboardState, kind: ModalKind) -> Effect {
    if let Err(e) = state.modal.open(kind) {
        debug!("Not opening {} modal: {}", kind, e);
        return Effect::None;
    }
    match kind {
        ModalKind::Configure => Effect::None,
        ModalKind::Scan => match state.modal.begin_load_libraries() {
            Ok(()) => Effect::LoadScanLibraries,
            Err(e) => rejected(e),
        },
    }
}

fn modal_input(state: &mut DashboardState, input: ModalInput) -> Effect {
    let modal = &mut state.modal;
    let result = match (modal.active_kind(), input) {
        (Some(ModalKind::Configure), ModalInput::Submit) => {
            return match modal.begin_configure_submit() {
                Ok(request) => Effect::SaveConfiguration(request),
                Err(e) => rejected(e),
            };
        }
        (Some(ModalKind::Scan), ModalInput::Submit) => {
            return match modal.begin_scan() {
                Ok(section) => Effect::ScanLibrary(section),
                Err(e) => rejected(e),
            };
        }
        (Some(ModalKind::Configure), ModalInput::Char(c)) => modal.input_char(c),
        (Some(ModalKind::Configure), ModalInput::Backspace) => modal.backspace(),
        (Some(ModalKind::Configure), ModalInput::NextField | ModalInput::Down) => modal.focus_next(),
        (Some(ModalKind::Configure), ModalInput::PrevField | ModalInput::Up) => modal.focus_prev(),
        (Some(ModalKind::Scan), ModalInput::Up | ModalInput::Char('k')) => modal.move_scan_selection(-1),
        (Some(ModalKind::Scan), ModalInput::Down | ModalInput::Char('j')) => modal.move_scan_selection(1),
        _ => Ok(()),
    };
    match result {
        Ok(()) => Effect::None,
        Err(e) => rejected(e),
    }
}

fn rejected(e: ModalError) -> Effect {
    debug!("Modal action rejected: {}", e);
    Effect::None
}
