//! Configure and scan dialogs
//!
//! At most one modal is active. A closed modal is parked rather than dropped,
//! so reopening it shows the values it had. While a submit is in flight, or a
//! success message is waiting to auto-close, further submits are refused.

use std::fmt;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

use crate::plex::LibrarySection;

/// How long a success message stays up before the modal closes itself
pub const SUCCESS_DELAY: Duration = Duration::from_millis(1500);

pub const MSG_URL_REQUIRED: &str = "Server URL is required";
pub const MSG_TOKEN_REQUIRED: &str = "Token is required";
pub const MSG_CONFIG_SAVED: &str = "Configuration saved successfully";
pub const MSG_CONFIG_FAILED: &str = "Failed to save configuration";
pub const MSG_CONFIG_SAVING: &str = "Saving configuration...";
pub const MSG_SELECT_LIBRARY: &str = "Please select a library to scan";
pub const MSG_SCANNING: &str = "Scanning library...";
pub const MSG_SCAN_DONE: &str = "Scan completed successfully";
pub const MSG_SCAN_FAILED: &str = "Scan failed";
pub const MSG_LOADING_LIBRARIES: &str = "Loading libraries...";
pub const MSG_LOAD_FAILED: &str = "Failed to load libraries";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Configure,
    Scan,
}

impl fmt::Display for ModalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configure => write!(f, "configure"),
            Self::Scan => write!(f, "scan"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModalError {
    #[error("{0} modal is not open")]
    NotReady(ModalKind),
    #[error("{0} modal is busy")]
    Busy(ModalKind),
    #[error("invalid input: {}", .0.join(", "))]
    Invalid(Vec<String>),
    #[error("no library selected")]
    NoSelection,
}

/// Single feedback slot; setting one kind replaces the previous
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Feedback {
    #[default]
    None,
    Errors(Vec<String>),
    Success(String),
    Progress(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigureField {
    #[default]
    ServerUrl,
    Token,
    Save,
}

impl ConfigureField {
    fn next(self) -> Self {
        match self {
            Self::ServerUrl => Self::Token,
            Self::Token => Self::Save,
            Self::Save => Self::ServerUrl,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::ServerUrl => Self::Save,
            Self::Token => Self::ServerUrl,
            Self::Save => Self::Token,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigureModal {
    pub server_url: String,
    pub token: String,
    pub focus: ConfigureField,
    pub feedback: Feedback,
}

impl ConfigureModal {
    /// Every problem with the current fields, in display order
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.server_url.trim().is_empty() {
            errors.push(MSG_URL_REQUIRED.to_string());
        }
        if self.token.trim().is_empty() {
            errors.push(MSG_TOKEN_REQUIRED.to_string());
        }
        errors
    }

    fn focused_field(&mut self) -> Option<&mut String> {
        match self.focus {
            ConfigureField::ServerUrl => Some(&mut self.server_url),
            ConfigureField::Token => Some(&mut self.token),
            ConfigureField::Save => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanModal {
    pub libraries: Vec<LibrarySection>,
    /// `None` until libraries are loaded, or when there are none
    pub selected: Option<usize>,
    pub loaded: bool,
    pub feedback: Feedback,
}

impl ScanModal {
    pub fn selected_library(&self) -> Option<&LibrarySection> {
        self.selected.and_then(|i| self.libraries.get(i))
    }
}

/// The active modal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    None,
    Configure(ConfigureModal),
    Scan(ScanModal),
}

impl ModalState {
    pub fn kind(&self) -> Option<ModalKind> {
        match self {
            Self::None => None,
            Self::Configure(_) => Some(ModalKind::Configure),
            Self::Scan(_) => Some(ModalKind::Scan),
        }
    }
}

/// Values submitted from the configure modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigureRequest {
    pub server_url: String,
    pub token: String,
}

/// Hooks run when a successful modal auto-closes
pub trait ModalCallbacks {
    fn on_refresh(&mut self, kind: ModalKind);
    fn on_close(&mut self, kind: ModalKind);
}

#[derive(Debug)]
pub struct ModalManager {
    state: ModalState,
    parked_configure: Option<ConfigureModal>,
    parked_scan: Option<ScanModal>,
    in_flight: bool,
    /// Success time of the active modal, awaiting auto-close
    pending_close: Option<Instant>,
    success_delay: Duration,
}

impl Default for ModalManager {
    fn default() -> Self {
        Self::with_success_delay(SUCCESS_DELAY)
    }
}

impl ModalManager {
    pub fn with_success_delay(success_delay: Duration) -> Self {
        Self {
            state: ModalState::None,
            parked_configure: None,
            parked_scan: None,
            in_flight: false,
            pending_close: None,
            success_delay,
        }
    }

    /// Initial field values for the configure modal's first open
    pub fn seed_configure(&mut self, server_url: &str, token: &str) {
        if self.parked_configure.is_none() {
            self.parked_configure = Some(ConfigureModal {
                server_url: server_url.to_string(),
                token: token.to_string(),
                ..ConfigureModal::default()
            });
        }
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, ModalState::None)
    }

    pub fn active_kind(&self) -> Option<ModalKind> {
        self.state.kind()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight || self.pending_close.is_some()
    }

    pub fn configure(&self) -> Option<&ConfigureModal> {
        match &self.state {
            ModalState::Configure(m) => Some(m),
            _ => None,
        }
    }

    pub fn scan(&self) -> Option<&ScanModal> {
        match &self.state {
            ModalState::Scan(m) => Some(m),
            _ => None,
        }
    }

    /// Show `kind`, restoring its previous values with feedback cleared
    pub fn open(&mut self, kind: ModalKind) -> Result<(), ModalError> {
        if let Some(active) = self.active_kind() {
            return Err(ModalError::Busy(active));
        }
        self.state = match kind {
            ModalKind::Configure => {
                let mut modal = self.parked_configure.take().unwrap_or_default();
                modal.feedback = Feedback::None;
                modal.focus = ConfigureField::ServerUrl;
                ModalState::Configure(modal)
            }
            ModalKind::Scan => {
                let mut modal = self.parked_scan.take().unwrap_or_default();
                modal.feedback = Feedback::None;
                ModalState::Scan(modal)
            }
        };
        debug!("Opened {} modal", kind);
        Ok(())
    }

    /// Hide the active modal; always allowed
    ///
    /// Returns true when this cut short a success that was waiting to
    /// auto-close, so the caller still owes the refresh.
    pub fn close(&mut self) -> bool {
        let owed_refresh = self.pending_close.take().is_some() && self.is_active();
        match std::mem::take(&mut self.state) {
            ModalState::None => {}
            ModalState::Configure(modal) => self.parked_configure = Some(modal),
            ModalState::Scan(modal) => self.parked_scan = Some(modal),
        }
        owed_refresh
    }

    fn configure_mut(&mut self) -> Result<&mut ConfigureModal, ModalError> {
        match &mut self.state {
            ModalState::Configure(m) => Ok(m),
            _ => Err(ModalError::NotReady(ModalKind::Configure)),
        }
    }

    fn scan_mut(&mut self) -> Result<&mut ScanModal, ModalError> {
        match &mut self.state {
            ModalState::Scan(m) => Ok(m),
            _ => Err(ModalError::NotReady(ModalKind::Scan)),
        }
    }

    fn feedback_mut(&mut self) -> Option<&mut Feedback> {
        match &mut self.state {
            ModalState::None => None,
            ModalState::Configure(m) => Some(&mut m.feedback),
            ModalState::Scan(m) => Some(&mut m.feedback),
        }
    }

    pub fn show_errors(&mut self, errors: Vec<String>) {
        if let Some(feedback) = self.feedback_mut() {
            *feedback = Feedback::Errors(errors);
        }
    }

    pub fn show_success(&mut self, message: &str) {
        if let Some(feedback) = self.feedback_mut() {
            *feedback = Feedback::Success(message.to_string());
        }
    }

    /// Type into the focused configure field
    pub fn input_char(&mut self, c: char) -> Result<(), ModalError> {
        if let Some(field) = self.configure_mut()?.focused_field() {
            field.push(c);
        }
        Ok(())
    }

    pub fn backspace(&mut self) -> Result<(), ModalError> {
        if let Some(field) = self.configure_mut()?.focused_field() {
            field.pop();
        }
        Ok(())
    }

    pub fn focus_next(&mut self) -> Result<(), ModalError> {
        let modal = self.configure_mut()?;
        modal.focus = modal.focus.next();
        Ok(())
    }

    pub fn focus_prev(&mut self) -> Result<(), ModalError> {
        let modal = self.configure_mut()?;
        modal.focus = modal.focus.prev();
        Ok(())
    }

    /// Move the library picker selection by `delta`, clamped to the list
    pub fn move_scan_selection(&mut self, delta: isize) -> Result<(), ModalError> {
        let modal = self.scan_mut()?;
        if let Some(current) = modal.selected {
            let last = modal.libraries.len().saturating_sub(1);
            modal.selected = Some(current.saturating_add_signed(delta).min(last));
        }
        Ok(())
    }

    /// Validate and hand out the configure fields for saving
    pub fn begin_configure_submit(&mut self) -> Result<ConfigureRequest, ModalError> {
        let busy = self.is_busy();
        let modal = self.configure_mut()?;
        if busy {
            return Err(ModalError::Busy(ModalKind::Configure));
        }

        let errors = modal.validate();
        if !errors.is_empty() {
            modal.feedback = Feedback::Errors(errors.clone());
            return Err(ModalError::Invalid(errors));
        }

        modal.feedback = Feedback::Progress(MSG_CONFIG_SAVING.to_string());
        let request = ConfigureRequest {
            server_url: modal.server_url.trim().to_string(),
            token: modal.token.trim().to_string(),
        };
        self.in_flight = true;
        Ok(request)
    }

    pub fn finish_configure_submit(&mut self, succeeded: bool, now: Instant) {
        self.finish(ModalKind::Configure, succeeded, now, MSG_CONFIG_SAVED, MSG_CONFIG_FAILED);
    }

    /// Mark the scan modal as loading its library list
    pub fn begin_load_libraries(&mut self) -> Result<(), ModalError> {
        let modal = self.scan_mut()?;
        modal.feedback = Feedback::Progress(MSG_LOADING_LIBRARIES.to_string());
        Ok(())
    }

    /// Populate the picker, keeping the previous selection when still in range
    pub fn set_scan_libraries(&mut self, libraries: Option<Vec<LibrarySection>>) {
        let Ok(modal) = self.scan_mut() else {
            return;
        };
        match libraries {
            Some(libraries) => {
                modal.selected = if libraries.is_empty() {
                    None
                } else {
                    Some(modal.selected.filter(|&i| i < libraries.len()).unwrap_or(0))
                };
                modal.libraries = libraries;
                modal.loaded = true;
                modal.feedback = Feedback::None;
            }
            None => {
                modal.libraries.clear();
                modal.selected = None;
                modal.loaded = false;
                modal.feedback = Feedback::Errors(vec![MSG_LOAD_FAILED.to_string()]);
            }
        }
    }

    /// Hand out the selected library for scanning
    pub fn begin_scan(&mut self) -> Result<LibrarySection, ModalError> {
        let busy = self.is_busy();
        let modal = self.scan_mut()?;
        if busy {
            return Err(ModalError::Busy(ModalKind::Scan));
        }

        let Some(section) = modal.selected_library().cloned() else {
            modal.feedback = Feedback::Errors(vec![MSG_SELECT_LIBRARY.to_string()]);
            return Err(ModalError::NoSelection);
        };

        modal.feedback = Feedback::Progress(MSG_SCANNING.to_string());
        self.in_flight = true;
        Ok(section)
    }

    pub fn finish_scan(&mut self, succeeded: bool, now: Instant) {
        self.finish(ModalKind::Scan, succeeded, now, MSG_SCAN_DONE, MSG_SCAN_FAILED);
    }

    fn finish(&mut self, kind: ModalKind, succeeded: bool, now: Instant, ok: &str, failed: &str) {
        self.in_flight = false;
        if self.active_kind() != Some(kind) {
            return;
        }
        if succeeded {
            self.show_success(ok);
            self.pending_close = Some(now);
        } else {
            self.show_errors(vec![failed.to_string()]);
        }
    }

    /// Close a successful modal once its message has been up long enough
    ///
    /// Runs `on_refresh` and then `on_close`. Returns whether it closed.
    pub fn poll_auto_close(&mut self, now: Instant, callbacks: &mut dyn ModalCallbacks) -> bool {
        let Some(since) = self.pending_close else {
            return false;
        };
        let Some(kind) = self.active_kind() else {
            self.pending_close = None;
            return false;
        };
        if now.duration_since(since) < self.success_delay {
            return false;
        }

        callbacks.on_refresh(kind);
        self.close();
        callbacks.on_close(kind);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
    }

    impl ModalCallbacks for Recorder {
        fn on_refresh(&mut self, _kind: ModalKind) {
            self.calls.push("refresh");
        }

        fn on_close(&mut self, _kind: ModalKind) {
            self.calls.push("close");
        }
    }

    fn section(key: &str, title: &str) -> LibrarySection {
        LibrarySection {
            key: key.into(),
            title: title.into(),
            kind: "movie".into(),
        }
    }

    fn type_text(modal: &mut ModalManager, text: &str) {
        for c in text.chars() {
            modal.input_char(c).unwrap();
        }
    }

    #[test]
    fn test_empty_configure_reports_both_errors() {
        let mut modal = ModalManager::default();
        modal.open(ModalKind::Configure).unwrap();

        let err = modal.begin_configure_submit().unwrap_err();
        let expected = vec![MSG_URL_REQUIRED.to_string(), MSG_TOKEN_REQUIRED.to_string()];
        assert_eq!(err, ModalError::Invalid(expected.clone()));
        assert_eq!(modal.configure().unwrap().feedback, Feedback::Errors(expected));
        assert!(!modal.is_busy());
    }

    #[test]
    fn test_whitespace_fields_are_empty() {
        let mut modal = ModalManager::default();
        modal.open(ModalKind::Configure).unwrap();
        type_text(&mut modal, "   ");
        modal.focus_next().unwrap();
        type_text(&mut modal, "abc");

        let err = modal.begin_configure_submit().unwrap_err();
        assert_eq!(err, ModalError::Invalid(vec![MSG_URL_REQUIRED.to_string()]));
    }

    #[test]
    fn test_configure_submit_lifecycle() {
        let mut modal = ModalManager::default();
        modal.open(ModalKind::Configure).unwrap();
        type_text(&mut modal, "http://plex:32400");
        modal.focus_next().unwrap();
        type_text(&mut modal, "token-1234");

        let request = modal.begin_configure_submit().unwrap();
        assert_eq!(request.server_url, "http://plex:32400");
        assert_eq!(request.token, "token-1234");
        assert_eq!(
            modal.configure().unwrap().feedback,
            Feedback::Progress(MSG_CONFIG_SAVING.to_string())
        );

        // A second submit while saving is refused
        assert_eq!(
            modal.begin_configure_submit().unwrap_err(),
            ModalError::Busy(ModalKind::Configure)
        );

        let now = Instant::now();
        modal.finish_configure_submit(false, now);
        assert_eq!(
            modal.configure().unwrap().feedback,
            Feedback::Errors(vec![MSG_CONFIG_FAILED.to_string()])
        );
        assert!(modal.is_active());

        // Retry succeeds
        modal.begin_configure_submit().unwrap();
        modal.finish_configure_submit(true, now);
        assert_eq!(
            modal.configure().unwrap().feedback,
            Feedback::Success(MSG_CONFIG_SAVED.to_string())
        );
    }

    #[test]
    fn test_reopen_keeps_values_and_clears_feedback() {
        let mut modal = ModalManager::default();
        modal.open(ModalKind::Configure).unwrap();
        type_text(&mut modal, "http://a");
        modal.focus_next().unwrap();
        let _ = modal.begin_configure_submit();
        modal.close();
        assert!(!modal.is_active());

        modal.open(ModalKind::Configure).unwrap();
        let configure = modal.configure().unwrap();
        assert_eq!(configure.server_url, "http://a");
        assert_eq!(configure.feedback, Feedback::None);
        assert_eq!(configure.focus, ConfigureField::ServerUrl);
    }

    #[test]
    fn test_seed_only_applies_before_first_open() {
        let mut modal = ModalManager::default();
        modal.seed_configure("http://seed", "seed-token");
        modal.open(ModalKind::Configure).unwrap();
        assert_eq!(modal.configure().unwrap().token, "seed-token");
        modal.backspace().unwrap();
        modal.close();

        modal.seed_configure("http://other", "other");
        modal.open(ModalKind::Configure).unwrap();
        assert_eq!(modal.configure().unwrap().server_url, "http://see");
    }

    #[test]
    fn test_open_while_open_is_busy() {
        let mut modal = ModalManager::default();
        modal.open(ModalKind::Scan).unwrap();
        assert_eq!(
            modal.open(ModalKind::Configure).unwrap_err(),
            ModalError::Busy(ModalKind::Scan)
        );
        assert_eq!(modal.active_kind(), Some(ModalKind::Scan));
    }

    #[test]
    fn test_operations_on_closed_modal_are_not_ready() {
        let mut modal = ModalManager::default();
        assert_eq!(modal.input_char('x'), Err(ModalError::NotReady(ModalKind::Configure)));
        assert_eq!(modal.move_scan_selection(1), Err(ModalError::NotReady(ModalKind::Scan)));
        assert_eq!(modal.begin_scan().unwrap_err(), ModalError::NotReady(ModalKind::Scan));
    }

    #[test]
    fn test_scan_requires_selection() {
        let mut modal = ModalManager::default();
        modal.open(ModalKind::Scan).unwrap();
        assert_eq!(modal.scan().unwrap().selected, None);
        assert_eq!(modal.begin_scan().unwrap_err(), ModalError::NoSelection);
        assert_eq!(
            modal.scan().unwrap().feedback,
            Feedback::Errors(vec![MSG_SELECT_LIBRARY.to_string()])
        );

        modal.set_scan_libraries(Some(Vec::new()));
        assert_eq!(modal.scan().unwrap().selected, None);
        assert!(modal.scan().unwrap().loaded);
    }

    #[test]
    fn test_scan_selection_defaults_and_clamps() {
        let mut modal = ModalManager::default();
        modal.open(ModalKind::Scan).unwrap();
        modal.begin_load_libraries().unwrap();
        modal.set_scan_libraries(Some(vec![section("1", "Movies"), section("2", "TV")]));
        assert_eq!(modal.scan().unwrap().selected, Some(0));

        modal.move_scan_selection(5).unwrap();
        assert_eq!(modal.scan().unwrap().selected, Some(1));
        modal.move_scan_selection(-5).unwrap();
        assert_eq!(modal.scan().unwrap().selected, Some(0));
    }

    #[test]
    fn test_failed_scan_keeps_selection() {
        let mut modal = ModalManager::default();
        modal.open(ModalKind::Scan).unwrap();
        modal.set_scan_libraries(Some(vec![section("1", "Movies"), section("2", "TV")]));
        modal.move_scan_selection(1).unwrap();

        let chosen = modal.begin_scan().unwrap();
        assert_eq!(chosen.key, "2");
        modal.finish_scan(false, Instant::now());
        assert_eq!(
            modal.scan().unwrap().feedback,
            Feedback::Errors(vec![MSG_SCAN_FAILED.to_string()])
        );
        assert_eq!(modal.scan().unwrap().selected, Some(1));
        assert_eq!(modal.begin_scan().unwrap().key, "2");
    }

    #[test]
    fn test_successful_scan_refreshes_then_closes_after_delay() {
        let mut modal = ModalManager::with_success_delay(Duration::from_millis(1500));
        modal.open(ModalKind::Scan).unwrap();
        modal.set_scan_libraries(Some(vec![section("1", "Movies")]));
        modal.begin_scan().unwrap();

        let done = Instant::now();
        modal.finish_scan(true, done);
        assert_eq!(
            modal.scan().unwrap().feedback,
            Feedback::Success(MSG_SCAN_DONE.to_string())
        );
        assert_eq!(modal.begin_scan().unwrap_err(), ModalError::Busy(ModalKind::Scan));

        let mut recorder = Recorder::default();
        assert!(!modal.poll_auto_close(done + Duration::from_millis(500), &mut recorder));
        assert!(recorder.calls.is_empty());

        assert!(modal.poll_auto_close(done + Duration::from_millis(1500), &mut recorder));
        assert_eq!(recorder.calls, vec!["refresh", "close"]);
        assert!(!modal.is_active());
        assert!(!modal.is_busy());
    }

    #[test]
    fn test_manual_close_after_success_owes_refresh() {
        let mut modal = ModalManager::default();
        modal.open(ModalKind::Scan).unwrap();
        modal.set_scan_libraries(Some(vec![section("1", "Movies")]));
        modal.begin_scan().unwrap();
        let done = Instant::now();
        modal.finish_scan(true, done);
        assert!(modal.close());

        // The auto-close timer is gone
        let mut recorder = Recorder::default();
        assert!(!modal.poll_auto_close(done + SUCCESS_DELAY, &mut recorder));
        assert!(recorder.calls.is_empty());
    }

    #[test]
    fn test_manual_close_without_success_owes_nothing() {
        let mut modal = ModalManager::default();
        assert!(!modal.close());

        modal.open(ModalKind::Scan).unwrap();
        modal.set_scan_libraries(Some(vec![section("1", "Movies")]));
        modal.begin_scan().unwrap();
        modal.finish_scan(false, Instant::now());
        assert!(!modal.close());

        modal.open(ModalKind::Configure).unwrap();
        assert!(!modal.close());
    }

    #[test]
    fn test_load_failure_shows_error() {
        let mut modal = ModalManager::default();
        modal.open(ModalKind::Scan).unwrap();
        modal.set_scan_libraries(None);
        let scan = modal.scan().unwrap();
        assert!(!scan.loaded);
        assert_eq!(scan.feedback, Feedback::Errors(vec![MSG_LOAD_FAILED.to_string()]));
    }
}
