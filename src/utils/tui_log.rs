//! Logging that stays out of the way of the dashboard
//!
//! While the dashboard owns the terminal, anything written to stderr would
//! tear the alternate screen. [`QuietDuringTui`] wraps the fmt layer and drops
//! events while a [`TuiLogGuard`] is alive.

use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

static TUI_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Whether the dashboard currently owns the terminal
pub fn tui_active() -> bool {
    TUI_ACTIVE.load(Ordering::SeqCst)
}

/// Silences terminal logging until dropped
#[derive(Debug)]
pub struct TuiLogGuard {
    previous: bool,
}

impl TuiLogGuard {
    pub fn acquire() -> Self {
        let previous = TUI_ACTIVE.swap(true, Ordering::SeqCst);
        Self { previous }
    }
}

impl Drop for TuiLogGuard {
    fn drop(&mut self) {
        TUI_ACTIVE.store(self.previous, Ordering::SeqCst);
    }
}

/// Layer adapter that forwards to `inner` only while the TUI is inactive
pub struct QuietDuringTui<L> {
    inner: L,
}

impl<L> QuietDuringTui<L> {
    pub fn new(inner: L) -> Self {
        Self { inner }
    }
}

impl<S, L> Layer<S> for QuietDuringTui<L>
where
    S: tracing::Subscriber,
    L: Layer<S>,
{
    fn on_event(&self, event: &tracing::Event<'_>, ctx: Context<'_, S>) {
        if !tui_active() {
            self.inner.on_event(event, ctx);
        }
    }

    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        id: &tracing::span::Id,
        ctx: Context<'_, S>,
    ) {
        // Spans must always be registered or later enter/exit calls will not
        // find their extensions
        self.inner.on_new_span(attrs, id, ctx);
    }

    fn on_record(
        &self,
        id: &tracing::span::Id,
        values: &tracing::span::Record<'_>,
        ctx: Context<'_, S>,
    ) {
        self.inner.on_record(id, values, ctx);
    }

    fn on_enter(&self, id: &tracing::span::Id, ctx: Context<'_, S>) {
        if !tui_active() {
            self.inner.on_enter(id, ctx);
        }
    }

    fn on_exit(&self, id: &tracing::span::Id, ctx: Context<'_, S>) {
        if !tui_active() {
            self.inner.on_exit(id, ctx);
        }
    }

    fn on_close(&self, id: tracing::span::Id, ctx: Context<'_, S>) {
        self.inner.on_close(id, ctx);
    }
}
