//! Tournament structure generation and scheduling engine.
//!
//! Turns a team pool and a preset template into fields, stages, games and the
//! dependency edges between them, with every game time-stamped. The Python
//! bindings at the bottom of this file expose the engine to the host
//! application.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use chrono::NaiveTime;
use pyo3::prelude::*;

pub mod assignment;
pub mod bracket;
pub mod builder;
mod config;
pub mod logging;
mod models;
pub mod pairing;
pub mod phase;
pub mod scheduler;
pub mod validation;

pub use assignment::{apply_operations, assign_teams, AssignmentOp};
pub use bracket::{bracket_edges, try_bracket_edges, BracketError, BracketRole, BracketSources};
pub use builder::{build_tournament, find_template, templates, BuildError, TournamentTemplate};
pub use config::{GenerationConfig, TemplateTiming};
pub use models::{
    Edge, EdgeSource, Field, Game, GameOutput, MappingEntry, MappingSource, PlacementFormat,
    ProgressionConfig, ProgressionMapping, ProgressionMode, Slot, SlotAssignment, Stage, Team,
    TournamentStructure,
};
pub use scheduler::TimeScheduler;
pub use validation::{validate_structure, StructureIssue};

/// Round-robin pairings for `team_count` teams as (home, away) index pairs.
///
/// # Arguments
/// * `team_count` - Number of teams
/// * `double_round` - Play every pairing a second time with home and away swapped
#[pyfunction]
#[pyo3(name = "round_robin_pairings", signature = (team_count, double_round=false))]
fn py_round_robin_pairings(team_count: usize, double_round: bool) -> Vec<(usize, usize)> {
    pairing::round_robin_pairings(team_count, double_round)
}

/// Built-in templates as (id, name, min_teams, max_teams, field_options) tuples.
#[pyfunction]
fn template_catalogue() -> Vec<(String, String, usize, usize, Vec<usize>)> {
    templates()
        .into_iter()
        .map(|t| (t.id, t.name, t.min_teams, t.max_teams, t.field_options))
        .collect()
}

/// A generated stage (Python view).
#[pyclass(name = "Stage")]
#[derive(Clone, Debug)]
pub struct PyStage {
    #[pyo3(get)]
    pub id: String,
    #[pyo3(get)]
    pub field_id: String,
    #[pyo3(get)]
    pub name: String,
    #[pyo3(get)]
    pub order: u32,
    /// "round_robin", "placement" or "manual".
    #[pyo3(get)]
    pub mode: String,
    #[pyo3(get)]
    pub start_time: Option<NaiveTime>,
}

impl From<&Stage> for PyStage {
    fn from(stage: &Stage) -> Self {
        Self {
            id: stage.id.clone(),
            field_id: stage.field_id.clone(),
            name: stage.name.clone(),
            order: stage.order,
            mode: stage.mode().as_str().to_string(),
            start_time: stage.start_time,
        }
    }
}

/// A generated game (Python view).
///
/// Slots are tagged strings: "team:<id>", "winner:<game>", "loser:<game>" or
/// "rank:<stage>:<place>".
#[pyclass(name = "Game")]
#[derive(Clone, Debug)]
pub struct PyGame {
    #[pyo3(get)]
    pub id: String,
    #[pyo3(get)]
    pub stage_id: String,
    #[pyo3(get)]
    pub standing: String,
    #[pyo3(get)]
    pub start_time: Option<NaiveTime>,
    #[pyo3(get)]
    pub duration: Option<u32>,
    #[pyo3(get)]
    pub manual_time: bool,
    #[pyo3(get)]
    pub home: Option<String>,
    #[pyo3(get)]
    pub away: Option<String>,
}

#[pymethods]
impl PyGame {
    fn __repr__(&self) -> String {
        format!(
            "Game(id={:?}, standing={:?}, start_time={:?})",
            self.id, self.standing, self.start_time
        )
    }
}

impl From<&Game> for PyGame {
    fn from(game: &Game) -> Self {
        Self {
            id: game.id.clone(),
            stage_id: game.stage_id.clone(),
            standing: game.standing.clone(),
            start_time: game.start_time,
            duration: game.duration,
            manual_time: game.manual_time,
            home: game.home.as_ref().map(SlotAssignment::describe),
            away: game.away.as_ref().map(SlotAssignment::describe),
        }
    }
}

/// A dependency edge (Python view).
#[pyclass(name = "Edge")]
#[derive(Clone, Debug)]
pub struct PyEdge {
    /// Source game id, or source stage id for rank edges.
    #[pyo3(get)]
    pub source_id: String,
    /// "winner", "loser" or "rank:<place>".
    #[pyo3(get)]
    pub output: String,
    #[pyo3(get)]
    pub target_game_id: String,
    /// "home" or "away".
    #[pyo3(get)]
    pub target_slot: String,
}

impl From<&Edge> for PyEdge {
    fn from(edge: &Edge) -> Self {
        let (source_id, output) = match &edge.source {
            EdgeSource::Game { game_id, output } => (game_id.clone(), output.as_str().to_string()),
            EdgeSource::Rank { stage_id, place } => (stage_id.clone(), format!("rank:{}", place)),
        };
        Self {
            source_id,
            output,
            target_game_id: edge.target_game_id.clone(),
            target_slot: edge.target_slot.as_str().to_string(),
        }
    }
}

/// A generated tournament (Python view).
#[pyclass(name = "Tournament")]
#[derive(Clone, Debug)]
pub struct PyTournament {
    #[pyo3(get)]
    pub fields: Vec<Field>,
    #[pyo3(get)]
    pub stages: Vec<PyStage>,
    #[pyo3(get)]
    pub games: Vec<PyGame>,
    #[pyo3(get)]
    pub edges: Vec<PyEdge>,
}

impl From<&TournamentStructure> for PyTournament {
    fn from(structure: &TournamentStructure) -> Self {
        Self {
            fields: structure.fields.clone(),
            stages: structure.stages.iter().map(PyStage::from).collect(),
            games: structure.games.iter().map(PyGame::from).collect(),
            edges: structure.edges.iter().map(PyEdge::from).collect(),
        }
    }
}

/// Build a tournament from a template.
///
/// # Arguments
/// * `teams` - Team pool in seeding order
/// * `config` - Template id plus optional field count and timing overrides
///
/// # Raises
/// * ValueError if the template is unknown or the team or field count is out of bounds
#[pyfunction]
#[pyo3(name = "build_tournament")]
fn py_build_tournament(teams: Vec<Team>, config: GenerationConfig) -> PyResult<PyTournament> {
    match build_tournament(&teams, &config) {
        Ok(structure) => Ok(PyTournament::from(&structure)),
        Err(e) => Err(pyo3::exceptions::PyValueError::new_err(e.to_string())),
    }
}

/// The spielplan.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Input types
    m.add_class::<Team>()?;
    m.add_class::<Field>()?;
    m.add_class::<GenerationConfig>()?;

    // Result views
    m.add_class::<PyStage>()?;
    m.add_class::<PyGame>()?;
    m.add_class::<PyEdge>()?;
    m.add_class::<PyTournament>()?;

    // Algorithms
    m.add_function(wrap_pyfunction!(py_round_robin_pairings, m)?)?;
    m.add_function(wrap_pyfunction!(template_catalogue, m)?)?;
    m.add_function(wrap_pyfunction!(py_build_tournament, m)?)?;

    Ok(())
}
