//! Styled console messages for command output

use colored::Colorize;

pub fn info(message: impl AsRef<str>) {
    println!("ℹ️ {}", message.as_ref());
}

pub fn results(message: impl AsRef<str>) {
    println!("{}", format!("🎯 {}", message.as_ref()).cyan().bold());
}

pub fn success(message: impl AsRef<str>) {
    println!("{}", format!("✅ {}", message.as_ref()).green());
}

pub fn warning(message: impl AsRef<str>) {
    println!("{}", format!("⚠️  {}", message.as_ref()).yellow());
}

pub fn error(message: impl AsRef<str>) {
    println!("{}", format!("❌ {}", message.as_ref()).red());
}

/// Only shown when debug logging is enabled (`--verbose` or `RUST_LOG`)
pub fn debug(message: impl AsRef<str>) {
    if tracing::enabled!(tracing::Level::DEBUG) {
        println!("{}", format!("🔍 {}", message.as_ref()).dimmed());
    }
}
