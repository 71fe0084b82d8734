//! Team assignment across all phases of a tournament.
//!
//! Round-robin stages receive static teams from the pool; placement stages
//! receive dependency edges from the previous phase's games. The result is a
//! flat operation list that [`apply_operations`] folds into new games.

use rustc_hash::FxHashMap;

use crate::bracket::{bracket_edges, BracketSources};
use crate::models::{Edge, Field, Game, ProgressionConfig, Slot, SlotAssignment, Stage, Team};
use crate::pairing::round_robin_pairings;
use crate::phase::{field_name, phases, stage_games, PhaseCarry};
use crate::{log_changes, log_checks};

/// A single change produced by team assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssignmentOp {
    AssignTeam {
        game_id: String,
        team_id: String,
        slot: Slot,
    },
    AddEdges(Vec<Edge>),
}

/// Walk the tournament phase by phase and produce assignment operations.
///
/// In a phase with several parallel stages, the `i`-th stage in stage-list
/// order (whatever field it is on) draws its teams from the contiguous slice
/// `[i * size, (i + 1) * size)` of the pool, with
/// `size = ceil(teams / parallel stages)`. A stage alone in its phase uses
/// the whole pool. Placement stages are wired to the games of the previous
/// phase.
pub fn assign_teams(
    fields: &[Field],
    stages: &[Stage],
    games: &[Game],
    teams: &[Team],
    verbosity: u8,
) -> Vec<AssignmentOp> {
    let mut ops = Vec::new();
    let mut carry = PhaseCarry::new();

    for phase in phases(stages) {
        let slice_size = teams.len().div_ceil(phase.stages.len());

        for (index, stage) in phase.stages.iter().enumerate() {
            let games_in_stage = stage_games(games, &stage.id);

            match &stage.progression {
                ProgressionConfig::RoundRobin {
                    team_count,
                    double_round,
                } => {
                    let pool = if phase.is_split() {
                        team_slice(teams, index, slice_size)
                    } else {
                        teams
                    };
                    let team_count = team_count.unwrap_or(pool.len());
                    log_checks!(
                        verbosity,
                        "Stage {} ({}) on {} draws {} of {} teams",
                        stage.name,
                        stage.id,
                        field_name(fields, &stage.field_id),
                        pool.len(),
                        teams.len()
                    );
                    round_robin_ops(
                        &mut ops,
                        &games_in_stage,
                        pool,
                        team_count,
                        *double_round,
                        verbosity,
                    );
                }
                ProgressionConfig::Placement { .. } => {
                    let sources = BracketSources::new(carry.games(), carry.stages());
                    let edges = bracket_edges(
                        &games_in_stage,
                        &sources,
                        &stage.progression,
                        stage.mapping.as_ref(),
                        verbosity,
                    );
                    log_changes!(
                        verbosity,
                        "Stage {} ({}) wired with {} edges from {} source games",
                        stage.name,
                        stage.id,
                        edges.len(),
                        carry.games().len()
                    );
                    if !edges.is_empty() {
                        ops.push(AssignmentOp::AddEdges(edges));
                    }
                }
                ProgressionConfig::Manual => {}
            }
        }

        carry.advance(&phase, games);
    }

    ops
}

/// The contiguous share of the pool handed to parallel stage `index`.
///
/// Late stages may get a short or empty slice when the pool does not divide evenly.
pub fn team_slice(teams: &[Team], index: usize, size: usize) -> &[Team] {
    let start = index.saturating_mul(size).min(teams.len());
    let end = start.saturating_add(size).min(teams.len());
    &teams[start..end]
}

fn round_robin_ops(
    ops: &mut Vec<AssignmentOp>,
    games: &[&Game],
    pool: &[Team],
    team_count: usize,
    double_round: bool,
    verbosity: u8,
) {
    let pairings = round_robin_pairings(team_count, double_round);

    for (game, (home, away)) in games.iter().zip(pairings) {
        for (slot, index) in [(Slot::Home, home), (Slot::Away, away)] {
            let Some(team) = pool.get(index) else {
                continue;
            };
            ops.push(AssignmentOp::AssignTeam {
                game_id: game.id.clone(),
                team_id: team.id.clone(),
                slot,
            });
        }
        log_checks!(verbosity, "  {} <- pairing ({}, {})", game.standing, home, away);
    }
}

/// Fold assignment operations into a new game list.
///
/// Returns the updated games (input order preserved) and every edge added.
/// Edge targets get the matching dynamic reference in their slot.
pub fn apply_operations(games: Vec<Game>, ops: &[AssignmentOp]) -> (Vec<Game>, Vec<Edge>) {
    let mut updates: FxHashMap<&str, Vec<(Slot, SlotAssignment)>> = FxHashMap::default();
    let mut edges = Vec::new();

    for op in ops {
        match op {
            AssignmentOp::AssignTeam {
                game_id,
                team_id,
                slot,
            } => updates
                .entry(game_id.as_str())
                .or_default()
                .push((*slot, SlotAssignment::Team(team_id.clone()))),
            AssignmentOp::AddEdges(new_edges) => {
                for edge in new_edges {
                    updates
                        .entry(edge.target_game_id.as_str())
                        .or_default()
                        .push((edge.target_slot, edge.assignment()));
                    edges.push(edge.clone());
                }
            }
        }
    }

    let games = games
        .into_iter()
        .map(|game| {
            let pending = updates.remove(game.id.as_str());
            match pending {
                Some(changes) => changes
                    .into_iter()
                    .fold(game, |game, (slot, assignment)| game.with_slot(slot, assignment)),
                None => game,
            }
        })
        .collect();

    (games, edges)
}
