//! Logging facade for the pparchive workspace.
//!
//! A thin wrapper over `emit` so that library crates can log structured
//! diagnostics without choosing an emitter themselves. Output is
//! controlled by the `PPQ_LOG` environment variable:
//!
//! - unset or `off` (default) - silent
//! - `error`, `warn`, `info`, `debug` - emit at that level and above,
//!   to stderr

use std::sync::Once;

// Re-export emit so the macros below can refer to it.
pub use emit;

static INIT: Once = Once::new();

/// Initialize logging from the `PPQ_LOG` environment variable.
///
/// Call once at process startup. Calling again is harmless; only the
/// first call does anything.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let value = std::env::var("PPQ_LOG").unwrap_or_default();
        let Some(min) = min_level(&value) else {
            return;
        };
        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(min))
            .init();
        // The emitter must outlive every log call in the process.
        std::mem::forget(rt);
    });
}

fn min_level(value: &str) -> Option<emit::Level> {
    match value {
        "" | "off" => None,
        "error" => Some(emit::Level::Error),
        "warn" => Some(emit::Level::Warn),
        "info" => Some(emit::Level::Info),
        "debug" => Some(emit::Level::Debug),
        other => {
            eprintln!("PPQ_LOG: unknown level '{other}', using 'info'");
            Some(emit::Level::Info)
        }
    }
}

/// Log routine operations a user might want to see (requests
/// dispatched, archives opened).
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log detail useful when debugging (paths examined, lines skipped).
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log recoverable oddities (ambiguous archive layouts, empty
/// expansions, variables that match nothing).
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log failures that prevent an operation from completing.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}
