//! Utility functions

pub mod size;
mod text;
pub mod tui_log;

pub use size::{bytes_to_human, parse_size};
pub use text::{mask_token, truncate_title};
pub use tui_log::{QuietDuringTui, TuiLogGuard};
