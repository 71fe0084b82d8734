//! Verbosity-gated logging for the generation pipeline.
//!
//! Messages go through the `log` facade, so the host decides where they end up.
//! The verbosity level carried on `GenerationConfig` filters them before they
//! reach the logger:
//! - 0: SILENT (warnings only)
//! - 1: CHANGES (structures created, teams assigned, phase start times)
//! - 2: CHECKS (skipped slots, bracket lookups, fallbacks)
//! - 3: DEBUG (per-game clock values)

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at CHANGES level (verbosity >= 1).
///
/// Used for: created fields/stages/games, emitted operations, phase times.
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHANGES {
            ::log::info!($($arg)*);
        }
    };
}

/// Log at CHECKS level (verbosity >= 2).
///
/// Used for: skipped assignments, lookups that found nothing.
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            ::log::debug!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            ::log::trace!($($arg)*);
        }
    };
}
