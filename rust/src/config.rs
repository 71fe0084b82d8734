//! Configuration types for tournament generation.

use chrono::NaiveTime;
use pyo3::prelude::*;

/// Start time used when neither the request nor the template sets one.
pub fn default_start_time() -> NaiveTime {
    NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default()
}

pub const DEFAULT_GAME_DURATION: u32 = 15;
pub const DEFAULT_BREAK_DURATION: u32 = 5;

/// Timing defaults for a generated tournament. Durations are in minutes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TemplateTiming {
    pub start_time: NaiveTime,
    pub game_duration: u32,
    pub break_duration: u32,
}

impl Default for TemplateTiming {
    fn default() -> Self {
        Self {
            start_time: default_start_time(),
            game_duration: DEFAULT_GAME_DURATION,
            break_duration: DEFAULT_BREAK_DURATION,
        }
    }
}

/// A request to generate a tournament from a template.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Id of the template to instantiate (see `templates()`).
    #[pyo3(get, set)]
    pub template_id: String,
    /// Number of fields; defaults to the template's first field option.
    #[pyo3(get, set)]
    pub field_count: Option<usize>,
    /// Start of the first phase; defaults to the template's start time.
    #[pyo3(get, set)]
    pub start_time: Option<NaiveTime>,
    /// Game duration in minutes; defaults to the template's.
    #[pyo3(get, set)]
    pub game_duration: Option<u32>,
    /// Break duration in minutes; defaults to the template's.
    #[pyo3(get, set)]
    pub break_duration: Option<u32>,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            template_id: "round_robin".to_string(),
            field_count: None,
            start_time: None,
            game_duration: None,
            break_duration: None,
            verbosity: 0,
        }
    }
}

impl GenerationConfig {
    /// Config for `template_id` with every other setting left to the template.
    pub fn for_template(template_id: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
            ..Self::default()
        }
    }

    /// Overlay the explicit settings of this request on `defaults`.
    pub fn resolve_timing(&self, defaults: &TemplateTiming) -> TemplateTiming {
        TemplateTiming {
            start_time: self.start_time.unwrap_or(defaults.start_time),
            game_duration: self.game_duration.unwrap_or(defaults.game_duration),
            break_duration: self.break_duration.unwrap_or(defaults.break_duration),
        }
    }
}

#[pymethods]
impl GenerationConfig {
    #[new]
    #[pyo3(signature = (
        template_id,
        field_count=None,
        start_time=None,
        game_duration=None,
        break_duration=None,
        verbosity=0
    ))]
    pub fn new(
        template_id: String,
        field_count: Option<usize>,
        start_time: Option<NaiveTime>,
        game_duration: Option<u32>,
        break_duration: Option<u32>,
        verbosity: u8,
    ) -> Self {
        Self {
            template_id,
            field_count,
            start_time,
            game_duration,
            break_duration,
            verbosity,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "GenerationConfig(template_id={:?}, field_count={:?}, start_time={:?})",
            self.template_id, self.field_count, self.start_time
        )
    }
}
