//! Core data types for tournament structures.

use chrono::NaiveTime;
use pyo3::prelude::*;

use crate::bracket::BracketRole;

/// A participating team from the global team pool.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Team {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub label: String,
    #[pyo3(get, set)]
    pub group: Option<String>,
    #[pyo3(get, set)]
    pub order: usize,
}

#[pymethods]
impl Team {
    #[new]
    #[pyo3(signature = (id, label, group=None, order=0))]
    pub fn new(id: String, label: String, group: Option<String>, order: usize) -> Self {
        Self {
            id,
            label,
            group,
            order,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Team(id={:?}, label={:?}, group={:?})",
            self.id, self.label, self.group
        )
    }
}

/// A playing field. Stages are bound to exactly one field.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    pub order: usize,
    #[pyo3(get, set)]
    pub color: String,
}

#[pymethods]
impl Field {
    #[new]
    pub fn new(id: String, name: String, order: usize, color: String) -> Self {
        Self {
            id,
            name,
            order,
            color,
        }
    }

    fn __repr__(&self) -> String {
        format!("Field(id={:?}, name={:?}, order={})", self.id, self.name, self.order)
    }
}

/// Team slot of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    Home,
    Away,
}

impl Slot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Home => "home",
            Slot::Away => "away",
        }
    }
}

/// Which participant of a finished game moves on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameOutput {
    Winner,
    Loser,
}

impl GameOutput {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameOutput::Winner => "winner",
            GameOutput::Loser => "loser",
        }
    }
}

/// Elimination structure of a placement stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementFormat {
    SingleElimination,
    Crossover,
}

/// How a stage's games are populated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressionMode {
    RoundRobin,
    Placement,
    Manual,
}

impl ProgressionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressionMode::RoundRobin => "round_robin",
            ProgressionMode::Placement => "placement",
            ProgressionMode::Manual => "manual",
        }
    }
}

/// Mode-specific configuration of a stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgressionConfig {
    /// Every team of the stage's slice plays every other team.
    ///
    /// `team_count` of `None` means "the whole slice handed to the stage".
    RoundRobin {
        team_count: Option<usize>,
        double_round: bool,
    },
    /// Elimination bracket fed by the previous phase.
    Placement {
        positions: usize,
        format: PlacementFormat,
    },
    /// Games are created and filled by hand.
    Manual,
}

impl ProgressionConfig {
    pub fn mode(&self) -> ProgressionMode {
        match self {
            ProgressionConfig::RoundRobin { .. } => ProgressionMode::RoundRobin,
            ProgressionConfig::Placement { .. } => ProgressionMode::Placement,
            ProgressionConfig::Manual => ProgressionMode::Manual,
        }
    }
}

/// Where an explicitly mapped slot takes its participant from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MappingSource {
    /// Winner or loser of the n-th game of the previous phase.
    Game {
        source_index: usize,
        output: GameOutput,
    },
    /// The team finishing `place` (1-based) in the n-th stage of the previous phase.
    Rank { stage_index: usize, place: usize },
}

/// Explicit wiring for one target game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappingEntry {
    /// Standing label of the target game ("SF1", "QF3", ...).
    pub target: String,
    pub home: Option<MappingSource>,
    pub away: Option<MappingSource>,
}

impl MappingEntry {
    pub fn new(
        target: impl Into<String>,
        home: Option<MappingSource>,
        away: Option<MappingSource>,
    ) -> Self {
        Self {
            target: target.into(),
            home,
            away,
        }
    }

    pub fn source(&self, slot: Slot) -> Option<&MappingSource> {
        match slot {
            Slot::Home => self.home.as_ref(),
            Slot::Away => self.away.as_ref(),
        }
    }
}

/// Explicit progression mapping overriding the default entry wiring of a bracket.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgressionMapping {
    pub entries: Vec<MappingEntry>,
}

impl ProgressionMapping {
    pub fn new(entries: Vec<MappingEntry>) -> Self {
        Self { entries }
    }
}

/// A stage: a set of games on one field, executed in phase `order`.
///
/// Stages sharing an `order` run in parallel on different fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stage {
    pub id: String,
    pub field_id: String,
    pub name: String,
    pub order: u32,
    /// Explicit start time. Overrides the time inherited from the previous phase.
    pub start_time: Option<NaiveTime>,
    /// Default game duration for this stage in minutes.
    pub game_duration: Option<u32>,
    /// Default break between games of this stage in minutes.
    pub break_between_games: Option<u32>,
    pub progression: ProgressionConfig,
    pub mapping: Option<ProgressionMapping>,
}

impl Stage {
    pub fn new(
        id: impl Into<String>,
        field_id: impl Into<String>,
        name: impl Into<String>,
        order: u32,
        progression: ProgressionConfig,
    ) -> Self {
        Self {
            id: id.into(),
            field_id: field_id.into(),
            name: name.into(),
            order,
            start_time: None,
            game_duration: None,
            break_between_games: None,
            progression,
            mapping: None,
        }
    }

    pub fn mode(&self) -> ProgressionMode {
        self.progression.mode()
    }

    pub fn with_start_time(mut self, start_time: Option<NaiveTime>) -> Self {
        self.start_time = start_time;
        self
    }

    pub fn with_mapping(mut self, mapping: Option<ProgressionMapping>) -> Self {
        self.mapping = mapping;
        self
    }
}

/// What occupies a game's home or away slot.
///
/// A slot holds either a static team or one dynamic reference, never both.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SlotAssignment {
    /// A team from the pool, by id.
    Team(String),
    /// Winner of another game, by game id.
    Winner(String),
    /// Loser of another game, by game id.
    Loser(String),
    /// The team finishing `place` in a ranking stage.
    Rank { stage_id: String, place: usize },
}

impl SlotAssignment {
    pub fn is_static(&self) -> bool {
        matches!(self, SlotAssignment::Team(_))
    }

    /// Compact tag for hosts that want a single string per slot.
    pub fn describe(&self) -> String {
        match self {
            SlotAssignment::Team(id) => format!("team:{}", id),
            SlotAssignment::Winner(id) => format!("winner:{}", id),
            SlotAssignment::Loser(id) => format!("loser:{}", id),
            SlotAssignment::Rank { stage_id, place } => format!("rank:{}:{}", stage_id, place),
        }
    }
}

/// Origin of a dependency edge.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EdgeSource {
    Game { game_id: String, output: GameOutput },
    Rank { stage_id: String, place: usize },
}

/// A directed dependency from a game output (or stage ranking) into a game slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    pub source: EdgeSource,
    pub target_game_id: String,
    pub target_slot: Slot,
}

impl Edge {
    pub fn from_game(
        source_game_id: impl Into<String>,
        output: GameOutput,
        target_game_id: impl Into<String>,
        target_slot: Slot,
    ) -> Self {
        Self {
            source: EdgeSource::Game {
                game_id: source_game_id.into(),
                output,
            },
            target_game_id: target_game_id.into(),
            target_slot,
        }
    }

    pub fn from_rank(
        stage_id: impl Into<String>,
        place: usize,
        target_game_id: impl Into<String>,
        target_slot: Slot,
    ) -> Self {
        Self {
            source: EdgeSource::Rank {
                stage_id: stage_id.into(),
                place,
            },
            target_game_id: target_game_id.into(),
            target_slot,
        }
    }

    /// Source game id, if the edge starts at a game.
    pub fn source_game_id(&self) -> Option<&str> {
        match &self.source {
            EdgeSource::Game { game_id, .. } => Some(game_id),
            EdgeSource::Rank { .. } => None,
        }
    }

    /// The slot content this edge implies for its target.
    pub fn assignment(&self) -> SlotAssignment {
        match &self.source {
            EdgeSource::Game {
                game_id,
                output: GameOutput::Winner,
            } => SlotAssignment::Winner(game_id.clone()),
            EdgeSource::Game {
                game_id,
                output: GameOutput::Loser,
            } => SlotAssignment::Loser(game_id.clone()),
            EdgeSource::Rank { stage_id, place } => SlotAssignment::Rank {
                stage_id: stage_id.clone(),
                place: *place,
            },
        }
    }
}

/// A single game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    pub id: String,
    pub stage_id: String,
    /// Display label ("Game 3", "SF1", "3rd Place"). Freely editable.
    pub standing: String,
    /// Bracket role fixed at creation. Wiring resolves against this, not the label.
    pub role: Option<BracketRole>,
    /// Duration in minutes. Falls back to the stage default.
    pub duration: Option<u32>,
    /// Break after this game in minutes. Falls back to the stage default.
    pub break_after: Option<u32>,
    pub manual_time: bool,
    pub start_time: Option<NaiveTime>,
    pub home: Option<SlotAssignment>,
    pub away: Option<SlotAssignment>,
}

impl Game {
    /// Create an empty game. The bracket role is derived from the initial standing.
    pub fn new(
        id: impl Into<String>,
        stage_id: impl Into<String>,
        standing: impl Into<String>,
    ) -> Self {
        let standing = standing.into();
        Self {
            id: id.into(),
            stage_id: stage_id.into(),
            role: BracketRole::from_standing(&standing),
            standing,
            duration: None,
            break_after: None,
            manual_time: false,
            start_time: None,
            home: None,
            away: None,
        }
    }

    pub fn slot(&self, slot: Slot) -> Option<&SlotAssignment> {
        match slot {
            Slot::Home => self.home.as_ref(),
            Slot::Away => self.away.as_ref(),
        }
    }

    /// Return a copy with `slot` replaced by `assignment`.
    pub fn with_slot(mut self, slot: Slot, assignment: SlotAssignment) -> Self {
        match slot {
            Slot::Home => self.home = Some(assignment),
            Slot::Away => self.away = Some(assignment),
        }
        self
    }

    /// Return a copy with a new display label. The bracket role is kept.
    pub fn with_standing(mut self, standing: impl Into<String>) -> Self {
        self.standing = standing.into();
        self
    }

    /// Return a copy pinned to an explicit start time.
    pub fn with_manual_start(mut self, start_time: NaiveTime) -> Self {
        self.manual_time = true;
        self.start_time = Some(start_time);
        self
    }

    pub fn with_start_time(mut self, start_time: Option<NaiveTime>) -> Self {
        self.start_time = start_time;
        self
    }

    pub fn with_duration(mut self, duration: Option<u32>) -> Self {
        self.duration = duration;
        self
    }

    /// Position of the game when a stage is walked in play order.
    ///
    /// Bracket games use their role's play order, everything else the
    /// numeric suffix of the standing. Games with neither sort last.
    pub fn sequence_key(&self) -> u32 {
        match self.role {
            Some(role) => role.play_order(),
            None => standing_number(&self.standing).unwrap_or(u32::MAX),
        }
    }
}

/// A generated tournament: everything the host needs to render or export it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TournamentStructure {
    pub fields: Vec<Field>,
    pub stages: Vec<Stage>,
    pub games: Vec<Game>,
    pub edges: Vec<Edge>,
}

impl TournamentStructure {
    pub fn game(&self, id: &str) -> Option<&Game> {
        self.games.iter().find(|g| g.id == id)
    }

    pub fn stage(&self, id: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == id)
    }
}

/// Parse the trailing number of a standing label ("Game 12" -> 12).
pub fn standing_number(standing: &str) -> Option<u32> {
    let trimmed = standing.trim_end();
    let digits_start = trimmed
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    trimmed[digits_start..].parse().ok()
}
