//! Logging infrastructure for Scout.
//!
//! All logs go to stderr. Stdout belongs to the REPL and to answers printed
//! by `scout ask`, so piping an answer never picks up log lines.

use std::io::IsTerminal;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AppError, AppResult};

/// Default filter when neither the config nor `RUST_LOG` sets one.
///
/// The REPL is interactive, so only warnings are shown unless asked.
const DEFAULT_FILTER: &str = "warn";

/// Initialize the tracing subscriber with stderr output.
///
/// # Arguments
/// * `log_level` - Optional filter override (e.g., "debug", "scout_search=trace")
/// * `no_color` - Disable colored output
///
/// # Example
/// ```no_run
/// use scout_core::logging::init_logging;
///
/// init_logging(None, false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(log_level: Option<&str>, no_color: bool) -> AppResult<()> {
    let env_filter = build_filter(log_level)?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(!no_color && supports_color());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| AppError::Config(format!("Failed to init logging: {}", e)))?;

    Ok(())
}

/// Resolve the filter: explicit level, then `RUST_LOG`, then the default.
fn build_filter(log_level: Option<&str>) -> AppResult<EnvFilter> {
    let from_env = std::env::var("RUST_LOG").ok();
    let filter_str = log_level
        .or(from_env.as_deref())
        .unwrap_or(DEFAULT_FILTER);

    EnvFilter::try_new(filter_str)
        .map_err(|e| AppError::Config(format!("Invalid log filter '{}': {}", filter_str, e)))
}

/// Check if stderr is a terminal that should receive ANSI colors.
fn supports_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    std::io::stderr().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_accepts_level() {
        assert!(build_filter(Some("debug")).is_ok());
        assert!(build_filter(Some("scout_search=trace,warn")).is_ok());
    }

    #[test]
    fn test_build_filter_rejects_garbage() {
        let result = build_filter(Some("scout_search=notalevel"));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_init_logging_only_once() {
        let _ = init_logging(Some("info"), true);

        // A global subscriber is now set, so a second install is refused
        let result = init_logging(Some("debug"), true);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_init_logging_rejects_bad_filter() {
        let result = init_logging(Some("scout=notalevel"), true);
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
