//! Built-in tournament templates.

use chrono::NaiveTime;

use crate::config::TemplateTiming;
use crate::models::{
    MappingEntry, MappingSource, PlacementFormat, ProgressionConfig, ProgressionMapping,
};

/// Which fields a template stage is instantiated on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldAssignment {
    /// One parallel instance per field, same name.
    All,
    /// One parallel instance per field, suffixed A, B, C, ...
    Split,
    /// A single instance on the field with this index.
    Field(usize),
}

/// A stage declaration inside a template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateStage {
    pub name: String,
    pub order: u32,
    pub field_assignment: FieldAssignment,
    pub progression: ProgressionConfig,
    pub mapping: Option<ProgressionMapping>,
}

impl TemplateStage {
    pub fn new(
        name: impl Into<String>,
        order: u32,
        field_assignment: FieldAssignment,
        progression: ProgressionConfig,
    ) -> Self {
        Self {
            name: name.into(),
            order,
            field_assignment,
            progression,
            mapping: None,
        }
    }

    pub fn with_mapping(mut self, mapping: ProgressionMapping) -> Self {
        self.mapping = Some(mapping);
        self
    }
}

/// A preset tournament structure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TournamentTemplate {
    pub id: String,
    pub name: String,
    pub min_teams: usize,
    pub max_teams: usize,
    /// Supported field counts; the first one is the default. Empty means any.
    pub field_options: Vec<usize>,
    pub stages: Vec<TemplateStage>,
    pub timing: TemplateTiming,
}

impl TournamentTemplate {
    pub fn accepts_team_count(&self, count: usize) -> bool {
        (self.min_teams..=self.max_teams).contains(&count)
    }

    pub fn accepts_field_count(&self, count: usize) -> bool {
        count > 0 && (self.field_options.is_empty() || self.field_options.contains(&count))
    }

    pub fn default_field_count(&self) -> usize {
        self.field_options.first().copied().unwrap_or(1)
    }
}

/// Look up a built-in template by id.
pub fn find_template(id: &str) -> Option<TournamentTemplate> {
    templates().into_iter().find(|t| t.id == id)
}

/// All built-in templates.
pub fn templates() -> Vec<TournamentTemplate> {
    vec![
        round_robin(),
        double_round_robin(),
        round_robin_with_final(),
        six_teams_two_groups(),
        eight_teams_crossover(),
        eight_teams_quarterfinals(),
    ]
}

fn timing(hour: u32, game_duration: u32, break_duration: u32) -> TemplateTiming {
    TemplateTiming {
        start_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default(),
        game_duration,
        break_duration,
    }
}

fn league(team_count: Option<usize>, double_round: bool) -> ProgressionConfig {
    ProgressionConfig::RoundRobin {
        team_count,
        double_round,
    }
}

fn bracket(positions: usize, format: PlacementFormat) -> ProgressionConfig {
    ProgressionConfig::Placement { positions, format }
}

fn rank(stage_index: usize, place: usize) -> Option<MappingSource> {
    Some(MappingSource::Rank { stage_index, place })
}

fn round_robin() -> TournamentTemplate {
    TournamentTemplate {
        id: "round_robin".to_string(),
        name: "Round Robin".to_string(),
        min_teams: 3,
        max_teams: 8,
        field_options: vec![1],
        stages: vec![TemplateStage::new(
            "League",
            0,
            FieldAssignment::Field(0),
            league(None, false),
        )],
        timing: timing(10, 15, 5),
    }
}

fn double_round_robin() -> TournamentTemplate {
    TournamentTemplate {
        id: "double_round_robin".to_string(),
        name: "Double Round Robin".to_string(),
        min_teams: 3,
        max_teams: 6,
        field_options: vec![1],
        stages: vec![TemplateStage::new(
            "League",
            0,
            FieldAssignment::Field(0),
            league(None, true),
        )],
        timing: timing(10, 12, 3),
    }
}

fn round_robin_with_final() -> TournamentTemplate {
    TournamentTemplate {
        id: "round_robin_final".to_string(),
        name: "Round Robin + Final".to_string(),
        min_teams: 4,
        max_teams: 6,
        field_options: vec![1],
        stages: vec![
            TemplateStage::new("League", 0, FieldAssignment::Field(0), league(None, false)),
            TemplateStage::new(
                "Final",
                1,
                FieldAssignment::Field(0),
                bracket(2, PlacementFormat::SingleElimination),
            ),
        ],
        timing: timing(10, 15, 5),
    }
}

fn six_teams_two_groups() -> TournamentTemplate {
    TournamentTemplate {
        id: "6_teams_2_groups".to_string(),
        name: "6 Teams – 2 Groups of 3".to_string(),
        min_teams: 6,
        max_teams: 6,
        field_options: vec![2],
        stages: vec![
            TemplateStage::new("Group", 0, FieldAssignment::Split, league(Some(3), false)),
            TemplateStage::new(
                "Playoffs",
                1,
                FieldAssignment::Field(0),
                bracket(4, PlacementFormat::SingleElimination),
            ),
        ],
        timing: timing(10, 20, 5),
    }
}

fn eight_teams_crossover() -> TournamentTemplate {
    // Group winners meet the other group's runner-up.
    let crossover = ProgressionMapping::new(vec![
        MappingEntry::new("CO1", rank(0, 1), rank(1, 2)),
        MappingEntry::new("CO2", rank(1, 1), rank(0, 2)),
    ]);

    TournamentTemplate {
        id: "8_teams_2_groups".to_string(),
        name: "8 Teams – 2 Groups of 4".to_string(),
        min_teams: 8,
        max_teams: 8,
        field_options: vec![2],
        stages: vec![
            TemplateStage::new("Group", 0, FieldAssignment::Split, league(Some(4), false)),
            TemplateStage::new(
                "Crossover",
                1,
                FieldAssignment::Field(0),
                bracket(4, PlacementFormat::Crossover),
            )
            .with_mapping(crossover),
        ],
        timing: timing(9, 15, 5),
    }
}

fn eight_teams_quarterfinals() -> TournamentTemplate {
    let quarterfinals = ProgressionMapping::new(vec![
        MappingEntry::new("QF1", rank(0, 1), rank(1, 4)),
        MappingEntry::new("QF2", rank(1, 2), rank(0, 3)),
        MappingEntry::new("QF3", rank(1, 1), rank(0, 4)),
        MappingEntry::new("QF4", rank(0, 2), rank(1, 3)),
    ]);

    TournamentTemplate {
        id: "8_teams_2_groups_quarterfinals".to_string(),
        name: "8 Teams – 2 Groups of 4 + Quarterfinals".to_string(),
        min_teams: 8,
        max_teams: 8,
        field_options: vec![2],
        stages: vec![
            TemplateStage::new("Group", 0, FieldAssignment::Split, league(Some(4), false)),
            TemplateStage::new(
                "Knockout",
                1,
                FieldAssignment::Field(0),
                bracket(8, PlacementFormat::SingleElimination),
            )
            .with_mapping(quarterfinals),
        ],
        timing: timing(9, 12, 3),
    }
}
