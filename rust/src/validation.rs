//! Consistency checks for generated tournament structures.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::models::{Edge, EdgeSource, Slot, TournamentStructure};

/// A problem found in a tournament structure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureIssue {
    #[error("Stage {stage_id} has more than one game labelled {standing:?}")]
    DuplicateStanding { stage_id: String, standing: String },

    #[error("Game {game_id} has no participant in its {slot:?} slot")]
    EmptySlot { game_id: String, slot: Slot },

    #[error("Edge into {target} references unknown {reference}")]
    UnknownReference { reference: String, target: String },

    #[error("Edge from stage {from_stage} into game {target} does not lead to a later phase")]
    EdgeOrder { from_stage: String, target: String },

    #[error("Games {games:?} depend on each other in a cycle")]
    Cycle { games: Vec<String> },
}

/// Check a structure for inconsistencies.
///
/// With `require_complete`, every game slot must also hold a team or a
/// dynamic reference.
pub fn validate_structure(
    structure: &TournamentStructure,
    require_complete: bool,
) -> Vec<StructureIssue> {
    let mut issues = duplicate_standings(structure);
    issues.extend(edge_issues(structure));

    if let Err(games) = game_order(structure) {
        issues.push(StructureIssue::Cycle { games });
    }

    if require_complete {
        for game in &structure.games {
            for slot in [Slot::Home, Slot::Away] {
                if game.slot(slot).is_none() {
                    issues.push(StructureIssue::EmptySlot {
                        game_id: game.id.clone(),
                        slot,
                    });
                }
            }
        }
    }

    issues
}

/// True if the game-to-game edges form no cycle.
pub fn edges_are_acyclic(edges: &[Edge]) -> bool {
    let mut nodes: Vec<&str> = Vec::new();
    let mut arcs: Vec<(&str, &str)> = Vec::new();

    for edge in edges {
        if let Some(source) = edge.source_game_id() {
            nodes.push(source);
            nodes.push(&edge.target_game_id);
            arcs.push((source, &edge.target_game_id));
        }
    }

    topological_sort(&nodes, &arcs).is_ok()
}

/// Play order of all games that respects every edge, or the games stuck in a cycle.
///
/// A rank edge makes its target depend on every game of the ranked stage.
pub fn game_order(structure: &TournamentStructure) -> Result<Vec<String>, Vec<String>> {
    let known: FxHashSet<&str> = structure.games.iter().map(|g| g.id.as_str()).collect();
    let nodes: Vec<&str> = structure.games.iter().map(|g| g.id.as_str()).collect();
    let mut arcs: Vec<(&str, &str)> = Vec::new();

    for edge in &structure.edges {
        let target = edge.target_game_id.as_str();
        if !known.contains(target) {
            continue;
        }
        match &edge.source {
            EdgeSource::Game { game_id, .. } => {
                if known.contains(game_id.as_str()) {
                    arcs.push((game_id.as_str(), target));
                }
            }
            EdgeSource::Rank { stage_id, .. } => arcs.extend(
                structure
                    .games
                    .iter()
                    .filter(|g| &g.stage_id == stage_id)
                    .map(|g| (g.id.as_str(), target)),
            ),
        }
    }

    topological_sort(&nodes, &arcs)
        .map(|order| order.into_iter().map(str::to_string).collect())
}

/// Kahn's algorithm over `nodes` (duplicates ignored) and directed `arcs`.
///
/// On success returns the nodes in dependency order; otherwise the sorted
/// ids of every node left with unresolved dependencies.
fn topological_sort<'a>(
    nodes: &[&'a str],
    arcs: &[(&'a str, &'a str)],
) -> Result<Vec<&'a str>, Vec<String>> {
    let mut unique: Vec<&str> = Vec::with_capacity(nodes.len());
    let mut in_degree: FxHashMap<&str, usize> = FxHashMap::default();
    for &node in nodes {
        if in_degree.insert(node, 0).is_none() {
            unique.push(node);
        }
    }

    let mut successors: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
    for &(from, to) in arcs {
        successors.entry(from).or_default().push(to);
        if let Some(degree) = in_degree.get_mut(to) {
            *degree += 1;
        }
    }

    let mut queue: VecDeque<&str> = unique
        .iter()
        .copied()
        .filter(|node| in_degree.get(node) == Some(&0))
        .collect();
    let mut order = Vec::with_capacity(unique.len());

    while let Some(node) = queue.pop_front() {
        order.push(node);
        for &next in successors.get(node).map(Vec::as_slice).unwrap_or_default() {
            if let Some(degree) = in_degree.get_mut(next) {
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(next);
                }
            }
        }
    }

    if order.len() == unique.len() {
        return Ok(order);
    }

    let mut stuck: Vec<String> = in_degree
        .into_iter()
        .filter(|(_, degree)| *degree > 0)
        .map(|(node, _)| node.to_string())
        .collect();
    stuck.sort();
    Err(stuck)
}

fn duplicate_standings(structure: &TournamentStructure) -> Vec<StructureIssue> {
    let mut seen: FxHashSet<(&str, &str)> = FxHashSet::default();
    structure
        .games
        .iter()
        .filter(|game| !seen.insert((game.stage_id.as_str(), game.standing.as_str())))
        .map(|game| StructureIssue::DuplicateStanding {
            stage_id: game.stage_id.clone(),
            standing: game.standing.clone(),
        })
        .collect()
}

fn edge_issues(structure: &TournamentStructure) -> Vec<StructureIssue> {
    let stage_order: FxHashMap<&str, u32> = structure
        .stages
        .iter()
        .map(|s| (s.id.as_str(), s.order))
        .collect();
    let game_stage: FxHashMap<&str, &str> = structure
        .games
        .iter()
        .map(|g| (g.id.as_str(), g.stage_id.as_str()))
        .collect();

    let mut issues = Vec::new();
    for edge in &structure.edges {
        let target = edge.target_game_id.clone();
        let Some(&target_stage) = game_stage.get(edge.target_game_id.as_str()) else {
            issues.push(StructureIssue::UnknownReference {
                reference: format!("game {}", edge.target_game_id),
                target,
            });
            continue;
        };

        let source_stage = match &edge.source {
            EdgeSource::Game { game_id, .. } => match game_stage.get(game_id.as_str()) {
                // Bracket rounds inside one stage feed each other.
                Some(&stage) if stage == target_stage => continue,
                Some(&stage) => stage,
                None => {
                    issues.push(StructureIssue::UnknownReference {
                        reference: format!("game {}", game_id),
                        target,
                    });
                    continue;
                }
            },
            EdgeSource::Rank { stage_id, .. } => {
                if !stage_order.contains_key(stage_id.as_str()) {
                    issues.push(StructureIssue::UnknownReference {
                        reference: format!("stage {}", stage_id),
                        target,
                    });
                    continue;
                }
                stage_id.as_str()
            }
        };

        let later = match (stage_order.get(source_stage), stage_order.get(target_stage)) {
            (Some(from), Some(to)) => from < to,
            _ => true,
        };
        if !later {
            issues.push(StructureIssue::EdgeOrder {
                from_stage: source_stage.to_string(),
                target,
            });
        }
    }

    issues
}
