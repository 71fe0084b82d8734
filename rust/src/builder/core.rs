//! Template instantiation: fields, stages, games, assignment and timing.

use thiserror::Error;

use crate::assignment::{apply_operations, assign_teams};
use crate::bracket::{skeleton, BracketRole};
use crate::config::GenerationConfig;
use crate::models::{Field, Game, ProgressionConfig, Stage, Team, TournamentStructure};
use crate::pairing::round_robin_pairings;
use crate::phase::stage_games;
use crate::scheduler::TimeScheduler;
use crate::{log_changes, log_checks};

use super::templates::{find_template, FieldAssignment, TournamentTemplate};

/// Field colors, assigned in field order and reused past the sixth field.
pub const FIELD_COLORS: [&str; 6] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899",
];

/// A request the builder refuses before creating anything.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Unknown tournament template: {0}")]
    UnknownTemplate(String),

    #[error("Template requires {min} to {max} teams, got {count}")]
    TeamCount {
        count: usize,
        min: usize,
        max: usize,
    },

    #[error("Template supports {allowed:?} fields, got {requested}")]
    FieldCount {
        requested: usize,
        allowed: Vec<usize>,
    },

    #[error("Stage {stage} is bound to field {index} but only {field_count} fields exist")]
    FieldIndex {
        stage: String,
        index: usize,
        field_count: usize,
    },
}

/// Build a complete tournament for `teams` from the template named in `config`.
pub fn build_tournament(
    teams: &[Team],
    config: &GenerationConfig,
) -> Result<TournamentStructure, BuildError> {
    let template = find_template(&config.template_id)
        .ok_or_else(|| BuildError::UnknownTemplate(config.template_id.clone()))?;
    TournamentStructureBuilder::new(&template, config).build(teams)
}

/// Instantiates one template for one request.
pub struct TournamentStructureBuilder<'a> {
    template: &'a TournamentTemplate,
    config: &'a GenerationConfig,
}

impl<'a> TournamentStructureBuilder<'a> {
    pub fn new(template: &'a TournamentTemplate, config: &'a GenerationConfig) -> Self {
        Self { template, config }
    }

    /// Validate the request, then generate, assign and schedule the structure.
    pub fn build(&self, teams: &[Team]) -> Result<TournamentStructure, BuildError> {
        let field_count = self.validate(teams.len())?;
        let verbosity = self.config.verbosity;

        let fields = create_fields(field_count);
        let stages = self.create_stages(&fields, teams.len());
        let games = create_games(&stages, verbosity);
        log_changes!(
            verbosity,
            "Template {}: {} fields, {} stages, {} games for {} teams",
            self.template.id,
            fields.len(),
            stages.len(),
            games.len(),
            teams.len()
        );

        let ops = assign_teams(&fields, &stages, &games, teams, verbosity);
        let (games, edges) = apply_operations(games, &ops);

        let timing = self.config.resolve_timing(&self.template.timing);
        let games = TimeScheduler::new(
            timing.game_duration,
            timing.break_duration,
            timing.start_time,
        )
        .with_verbosity(verbosity)
        .schedule(&fields, &stages, &games);
        let stages = backfill_stage_start_times(stages, &games);

        Ok(TournamentStructure {
            fields,
            stages,
            games,
            edges,
        })
    }

    /// Check team and field counts; returns the field count to build.
    fn validate(&self, team_count: usize) -> Result<usize, BuildError> {
        let template = self.template;
        if !template.accepts_team_count(team_count) {
            return Err(BuildError::TeamCount {
                count: team_count,
                min: template.min_teams,
                max: template.max_teams,
            });
        }

        let field_count = self
            .config
            .field_count
            .unwrap_or_else(|| template.default_field_count());
        if !template.accepts_field_count(field_count) {
            return Err(BuildError::FieldCount {
                requested: field_count,
                allowed: template.field_options.clone(),
            });
        }

        for stage in &template.stages {
            if let FieldAssignment::Field(index) = stage.field_assignment {
                if index >= field_count {
                    return Err(BuildError::FieldIndex {
                        stage: stage.name.clone(),
                        index,
                        field_count,
                    });
                }
            }
        }

        Ok(field_count)
    }

    /// Expand the template's stage list onto concrete fields.
    ///
    /// Round-robin stages without an explicit team count get the size of the
    /// pool share they will draw from.
    fn create_stages(&self, fields: &[Field], team_count: usize) -> Vec<Stage> {
        let mut stages = Vec::new();

        for entry in &self.template.stages {
            let placements: Vec<(&Field, String)> = match entry.field_assignment {
                FieldAssignment::All => fields.iter().map(|f| (f, entry.name.clone())).collect(),
                FieldAssignment::Split => fields
                    .iter()
                    .enumerate()
                    .map(|(i, f)| (f, format!("{} {}", entry.name, group_letter(i))))
                    .collect(),
                // Index checked by `validate`.
                FieldAssignment::Field(index) => fields
                    .get(index)
                    .map(|f| (f, entry.name.clone()))
                    .into_iter()
                    .collect(),
            };

            let share = team_count.div_ceil(placements.len().max(1));
            for (field, name) in placements {
                let id = format!("stage-{}", stages.len() + 1);
                let progression = match entry.progression {
                    ProgressionConfig::RoundRobin {
                        team_count: None,
                        double_round,
                    } => ProgressionConfig::RoundRobin {
                        team_count: Some(share),
                        double_round,
                    },
                    ref other => other.clone(),
                };
                stages.push(
                    Stage::new(id, field.id.clone(), name, entry.order, progression)
                        .with_mapping(entry.mapping.clone()),
                );
            }
        }

        stages
    }
}

/// Fields `field-1..=count`, named and colored in order.
pub fn create_fields(count: usize) -> Vec<Field> {
    (0..count)
        .map(|i| {
            Field::new(
                format!("field-{}", i + 1),
                format!("Field {}", i + 1),
                i,
                FIELD_COLORS[i % FIELD_COLORS.len()].to_string(),
            )
        })
        .collect()
}

/// Empty games for every stage.
///
/// Round-robin games are numbered across the whole tournament ("Game 1",
/// "Game 2", ...); placement stages get their bracket skeleton; manual stages
/// get nothing.
pub fn create_games(stages: &[Stage], verbosity: u8) -> Vec<Game> {
    let mut games = Vec::new();
    let mut game_number = 0usize;

    for stage in stages {
        let standings: Vec<String> = match &stage.progression {
            ProgressionConfig::RoundRobin {
                team_count,
                double_round,
            } => {
                let count = round_robin_pairings(team_count.unwrap_or(0), *double_round).len();
                (0..count)
                    .map(|_| {
                        game_number += 1;
                        format!("Game {}", game_number)
                    })
                    .collect()
            }
            ProgressionConfig::Placement { positions, format } => {
                skeleton(*positions, *format)
                    .unwrap_or_else(|| {
                        log_checks!(
                            verbosity,
                            "No bracket for {} positions in stage {}; creating a single final",
                            positions,
                            stage.name
                        );
                        vec![BracketRole::Final]
                    })
                    .into_iter()
                    .map(|role| role.standing())
                    .collect()
            }
            ProgressionConfig::Manual => Vec::new(),
        };

        for standing in standings {
            let id = format!("game-{}", games.len() + 1);
            games.push(Game::new(id, stage.id.clone(), standing));
        }
    }

    games
}

/// Copy each stage's first scheduled game time onto the stage.
pub fn backfill_stage_start_times(stages: Vec<Stage>, games: &[Game]) -> Vec<Stage> {
    stages
        .into_iter()
        .map(|stage| {
            let first = stage_games(games, &stage.id)
                .first()
                .and_then(|game| game.start_time);
            match first {
                Some(start) => stage.with_start_time(Some(start)),
                None => stage,
            }
        })
        .collect()
}

fn group_letter(index: usize) -> String {
    match u8::try_from(index) {
        Ok(i) if i < 26 => char::from(b'A' + i).to_string(),
        _ => (index + 1).to_string(),
    }
}
