//! Interactive storage dashboard
//!
//! The state engine (navigation, sorting, modals, key routing) is plain data
//! and functions; this module owns the terminal and the event loop.

pub mod cached;
pub mod collectors;
pub mod keyboard;
pub mod modal;
pub mod navigation;
pub mod render;
pub mod services;
pub mod sorting;
pub mod state;
pub mod view_config;

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info};

use crate::config::ConfigManager;
use crate::storage::StorageClient;
use crate::utils::TuiLogGuard;

pub use services::{DashboardServices, LiveServices};
pub use state::DashboardState;

use keyboard::{dispatch, resolve_key};
use services::{ProgressDisplay, poll_modal, run_effect};

type DashboardTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Keeps the screen alive while an effect is awaited
struct TerminalDisplay<'a> {
    terminal: &'a mut DashboardTerminal,
}

impl ProgressDisplay for TerminalDisplay<'_> {
    fn redraw(&mut self, state: &DashboardState) -> Result<()> {
        self.terminal.draw(|f| render::draw(f, state))?;
        Ok(())
    }
}

/// Run the dashboard until the user quits
pub async fn run_dashboard(config: ConfigManager, storage: StorageClient) -> Result<()> {
    let credentials = config.credentials()?;
    let services = LiveServices::new(config, storage);

    let libraries = services.load_cached().await?;
    info!("Loaded {} cached libraries", libraries.len());
    let mut state = DashboardState::new(libraries);
    if let Some(credentials) = credentials {
        state
            .modal
            .seed_configure(&credentials.server_url, &credentials.token);
    }

    // Logging to stderr would tear the alternate screen
    let _log_guard = TuiLogGuard::acquire();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_dashboard_loop(&mut terminal, &mut state, &services).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_dashboard_loop(
    terminal: &mut DashboardTerminal,
    state: &mut DashboardState,
    services: &dyn DashboardServices,
) -> Result<()> {
    loop {
        let now = Instant::now();
        state.check_status_timeout(now);
        poll_modal(state, services, now).await;

        terminal.draw(|f| render::draw(f, state))?;

        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            let Some(action) = resolve_key(&key, state.modal.is_active()) else {
                continue;
            };
            debug!("Key {:?} -> {:?}", key.code, action);

            let effect = dispatch(state, action);
            let mut display = TerminalDisplay {
                terminal: &mut *terminal,
            };
            if run_effect(state, services, effect, &mut display).await? {
                return Ok(());
            }
        }
    }
}
