//! Logger bootstrap.
//!
//! The library logs through the `log` facade. Hosts that do not install
//! their own logger can call [`init_logging`] to get stderr output.
//!
//! # Invariants
//! - Initialization happens at most once per process.
//! - Repeating it with the same level is a no-op; a different level is rejected.
//! - Initialization never panics.

use flexi_logger::{Logger, LoggerHandle};
use log::info;
use once_cell::sync::OnceCell;

use crate::error::{CalboardError, CalboardResult};

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    _logger: LoggerHandle,
}

/// Start logging to stderr at `level` (`off|error|warn|info|debug|trace`).
pub fn init_logging(level: &str) -> CalboardResult<()> {
    let level = normalize_level(level)?;

    let state = LOGGING_STATE.get_or_try_init(|| -> CalboardResult<LoggingState> {
        let logger = Logger::try_with_str(level)
            .map_err(|e| CalboardError::Config(format!("Invalid log level '{level}': {e}")))?
            .log_to_stderr()
            .format(flexi_logger::default_format)
            .start()
            .map_err(|e| CalboardError::Config(format!("Failed to start logger: {e}")))?;

        info!("Logging initialized at level {}", level);

        Ok(LoggingState {
            level,
            _logger: logger,
        })
    })?;

    if state.level != level {
        return Err(CalboardError::Config(format!(
            "Logging already initialized with level '{}'; refusing to switch to '{}'",
            state.level, level
        )));
    }

    Ok(())
}

/// The active level, or `None` before [`init_logging`] succeeded.
pub fn logging_level() -> Option<&'static str> {
    LOGGING_STATE.get().map(|state| state.level)
}

/// Canonical spelling of a log level name.
pub fn normalize_level(level: &str) -> CalboardResult<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" => Ok("off"),
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(CalboardError::Config(format!(
            "Unsupported log level '{other}'; expected off|trace|debug|info|warn|error"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_level_accepts_known_values() {
        assert_eq!(normalize_level("TRACE").unwrap(), "trace");
        assert_eq!(normalize_level(" info ").unwrap(), "info");
        assert_eq!(normalize_level("warning").unwrap(), "warn");
        assert_eq!(normalize_level("Off").unwrap(), "off");
    }

    #[test]
    fn normalize_level_rejects_unknown_values() {
        assert!(matches!(normalize_level("verbose"), Err(CalboardError::Config(_))));
    }

    #[test]
    fn init_is_idempotent_for_same_level() {
        init_logging("warn").unwrap();
        init_logging("WARN").unwrap();
        assert_eq!(logging_level(), Some("warn"));
        assert!(init_logging("trace").is_err());
    }
}
