//! Collaborators behind the dashboard and the runner for dispatch effects

use std::future::Future;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{info, warn};

use super::cached::{CachedLibraryData, load_cached_data};
use super::keyboard::Effect;
use super::modal::{ModalCallbacks, ModalKind};
use super::state::DashboardState;
use crate::config::ConfigManager;
use crate::plex::{LibrarySection, PlexClient};
use crate::storage::{LibraryStore, StorageClient};

const REDRAW_INTERVAL: Duration = Duration::from_millis(100);

/// Everything the dashboard needs from the outside world
#[async_trait]
pub trait DashboardServices: Send + Sync {
    /// Persist credentials; `Ok(false)` means they were rejected
    async fn save_configuration(&self, server_url: &str, token: &str) -> Result<bool>;

    async fn list_remote_libraries(&self) -> Result<Vec<LibrarySection>>;

    /// Scan `section` and store the result, returning where it was written
    async fn scan_library(&self, section: &LibrarySection) -> Result<PathBuf>;

    async fn load_cached(&self) -> Result<Vec<CachedLibraryData>>;
}

/// Services backed by the config file, local storage and the Plex server
pub struct LiveServices {
    config: ConfigManager,
    storage: StorageClient,
}

impl LiveServices {
    pub fn new(config: ConfigManager, storage: StorageClient) -> Self {
        Self { config, storage }
    }

    fn client(&self) -> Result<PlexClient> {
        let credentials = self
            .config
            .credentials()?
            .context("Plex server is not configured")?;
        PlexClient::new(&credentials.server_url, &credentials.token)
    }
}

#[async_trait]
impl DashboardServices for LiveServices {
    async fn save_configuration(&self, server_url: &str, token: &str) -> Result<bool> {
        // Reject URLs the client could never use
        PlexClient::new(server_url, token)?;
        self.config.update_credentials(server_url, token)?;
        Ok(true)
    }

    async fn list_remote_libraries(&self) -> Result<Vec<LibrarySection>> {
        self.client()?.get_libraries().await
    }

    async fn scan_library(&self, section: &LibrarySection) -> Result<PathBuf> {
        let result = self.client()?.scan_library(section).await?;
        self.storage.save_library(&section.key, &result).await
    }

    async fn load_cached(&self) -> Result<Vec<CachedLibraryData>> {
        load_cached_data(&self.storage).await
    }
}

/// Redraws the screen while an effect is awaited
pub trait ProgressDisplay {
    fn redraw(&mut self, state: &DashboardState) -> Result<()>;
}

/// Await `fut`, redrawing `state` every [`REDRAW_INTERVAL`]
async fn await_with_redraw<F: Future>(
    fut: F,
    state: &DashboardState,
    display: &mut dyn ProgressDisplay,
) -> Result<F::Output> {
    tokio::pin!(fut);
    let mut ticker = tokio::time::interval(REDRAW_INTERVAL);
    loop {
        tokio::select! {
            output = &mut fut => return Ok(output),
            _ = ticker.tick() => display.redraw(state)?,
        }
    }
}

/// Perform `effect`; returns true when the dashboard should exit
///
/// Collaborator failures become modal feedback. Only display errors propagate.
pub async fn run_effect(
    state: &mut DashboardState,
    services: &dyn DashboardServices,
    effect: Effect,
    display: &mut dyn ProgressDisplay,
) -> Result<bool> {
    match effect {
        Effect::None => {}
        Effect::Quit => return Ok(true),
        Effect::Refresh => refresh(state, services).await,
        Effect::SaveConfiguration(request) => {
            let outcome = await_with_redraw(
                services.save_configuration(&request.server_url, &request.token),
                state,
                display,
            )
            .await?;
            let saved = match outcome {
                Ok(saved) => saved,
                Err(e) => {
                    warn!("Failed to save configuration: {:#}", e);
                    false
                }
            };
            state.modal.finish_configure_submit(saved, Instant::now());
        }
        Effect::LoadScanLibraries => {
            let outcome = await_with_redraw(services.list_remote_libraries(), state, display).await?;
            let libraries = match outcome {
                Ok(libraries) => Some(libraries),
                Err(e) => {
                    warn!("Failed to load libraries: {:#}", e);
                    None
                }
            };
            state.modal.set_scan_libraries(libraries);
        }
        Effect::ScanLibrary(section) => {
            let outcome = await_with_redraw(services.scan_library(&section), state, display).await?;
            let scanned = match outcome {
                Ok(path) => {
                    info!("Saved {} to {}", section.title, path.display());
                    true
                }
                Err(e) => {
                    warn!("Scan of {} failed: {:#}", section.title, e);
                    false
                }
            };
            state.modal.finish_scan(scanned, Instant::now());
        }
    }
    Ok(false)
}

/// Records what an auto-closing modal asked for
#[derive(Debug, Default)]
pub struct AutoCloseHooks {
    pub refresh: bool,
    pub closed: Option<ModalKind>,
}

impl ModalCallbacks for AutoCloseHooks {
    fn on_refresh(&mut self, _kind: ModalKind) {
        self.refresh = true;
    }

    fn on_close(&mut self, kind: ModalKind) {
        self.closed = Some(kind);
    }
}

/// Reload the cached tree and return to the overall view
pub async fn refresh(state: &mut DashboardState, services: &dyn DashboardServices) {
    match services.load_cached().await {
        Ok(libraries) => {
            let count = libraries.len();
            state.reload(libraries);
            state.set_status(format!("Reloaded {} libraries", count));
        }
        Err(e) => {
            warn!("Failed to reload cached data: {:#}", e);
            state.set_status("Failed to reload cached data");
        }
    }
}

/// Auto-close a finished modal and refresh if it asked to
pub async fn poll_modal(state: &mut DashboardState, services: &dyn DashboardServices, now: Instant) {
    let mut hooks = AutoCloseHooks::default();
    if state.modal.poll_auto_close(now, &mut hooks) && hooks.refresh {
        refresh(state, services).await;
    }
}
