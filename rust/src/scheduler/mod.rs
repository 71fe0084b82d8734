//! Time scheduling for generated tournaments.
//!
//! Propagates start times phase by phase and stage by stage, honoring manual
//! overrides, per-game durations and breaks.

mod clock;
mod core;

pub use clock::{minutes_of, time_at, StageClock};
pub use core::TimeScheduler;
