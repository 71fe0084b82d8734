//! Dependency edges for placement brackets.
//!
//! Bracket games are located by their [`BracketRole`], which is fixed when the
//! game is created, so renaming a game's standing label never breaks wiring.
//! Lookups that find nothing (missing game, source index out of range) drop the
//! affected edge without complaint: half-edited tournaments are expected input.

use thiserror::Error;

use crate::log_checks;
use crate::models::{
    Edge, Game, GameOutput, MappingSource, PlacementFormat, ProgressionConfig, ProgressionMapping,
    Slot, Stage,
};

use super::roles::BracketRole;

/// Errors that make a bracket's wiring unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BracketError {
    #[error("Bracket role {role} appears more than once in the target games")]
    DuplicateRole { role: BracketRole },
    #[error("Game {game} would feed its own slot")]
    SelfReference { game: String },
}

/// Everything a bracket may draw its participants from: the previous phase.
#[derive(Clone, Copy, Debug)]
pub struct BracketSources<'a> {
    /// Games of the previous phase, in phase order.
    pub games: &'a [&'a Game],
    /// Stages of the previous phase, in phase order (for rank mappings).
    pub stages: &'a [&'a Stage],
}

impl<'a> BracketSources<'a> {
    pub fn new(games: &'a [&'a Game], stages: &'a [&'a Stage]) -> Self {
        Self { games, stages }
    }

    pub fn games_only(games: &'a [&'a Game]) -> Self {
        Self { games, stages: &[] }
    }
}

/// Build the dependency edges for a placement stage.
///
/// Never fails: a malformed bracket is logged and produces no edges, so the
/// rest of the tournament can still be generated.
pub fn bracket_edges(
    target_games: &[&Game],
    sources: &BracketSources<'_>,
    config: &ProgressionConfig,
    mapping: Option<&ProgressionMapping>,
    verbosity: u8,
) -> Vec<Edge> {
    match try_bracket_edges(target_games, sources, config, mapping, verbosity) {
        Ok(edges) => edges,
        Err(e) => {
            log::warn!("Skipping bracket wiring: {}", e);
            Vec::new()
        }
    }
}

/// Build the dependency edges for a placement stage, reporting malformed brackets.
///
/// Returns no edges for stages that are not in placement mode. If `mapping` is
/// given it replaces the automatic entry wiring; the bracket-internal edges
/// are added either way.
pub fn try_bracket_edges(
    target_games: &[&Game],
    sources: &BracketSources<'_>,
    config: &ProgressionConfig,
    mapping: Option<&ProgressionMapping>,
    verbosity: u8,
) -> Result<Vec<Edge>, BracketError> {
    let ProgressionConfig::Placement { positions, format } = config else {
        return Ok(Vec::new());
    };

    check_unique_roles(target_games)?;

    let mut wiring = Wiring {
        targets: target_games,
        sources: sources.games,
        edges: Vec::new(),
    };

    match (*positions, *format) {
        (4, PlacementFormat::SingleElimination) => {
            wiring.four_team_elimination(mapping, sources.stages);
        }
        (2, _) => {
            let final_game = wiring.target(BracketRole::Final);
            match mapping {
                Some(mapping) => wiring.apply_mapping(mapping, sources.stages),
                None => {
                    let count = wiring.sources.len();
                    if count >= 2 {
                        wiring.link(count - 2, GameOutput::Winner, final_game, Slot::Home);
                        wiring.link(count - 1, GameOutput::Winner, final_game, Slot::Away);
                    }
                }
            }
        }
        (8, PlacementFormat::SingleElimination) => {
            if let Some(mapping) = mapping {
                wiring.apply_mapping(mapping, sources.stages);
            }
            wiring.quarterfinals();
            wiring.semifinals_into_medal_games(
                wiring.target(BracketRole::SemiFinal(1)),
                wiring.target(BracketRole::SemiFinal(2)),
            );
        }
        (4, PlacementFormat::Crossover) => {
            if let Some(mapping) = mapping {
                wiring.apply_mapping(mapping, sources.stages);
            }
            wiring.semifinals_into_medal_games(
                wiring.target(BracketRole::Crossover(1)),
                wiring.target(BracketRole::Crossover(2)),
            );
        }
        (positions, format) => {
            log_checks!(
                verbosity,
                "No bracket wiring for {} positions in {:?} format",
                positions,
                format
            );
        }
    }

    let edges = wiring.edges;
    if let Some(edge) = edges
        .iter()
        .find(|e| e.source_game_id() == Some(e.target_game_id.as_str()))
    {
        return Err(BracketError::SelfReference {
            game: edge.target_game_id.clone(),
        });
    }

    Ok(edges)
}

/// Locate the first game carrying `role`.
pub fn find_game_by_role<'g>(games: &[&'g Game], role: BracketRole) -> Option<&'g Game> {
    games.iter().copied().find(|g| g.role == Some(role))
}

fn check_unique_roles(games: &[&Game]) -> Result<(), BracketError> {
    let mut seen: Vec<BracketRole> = Vec::with_capacity(games.len());
    for role in games.iter().filter_map(|g| g.role) {
        if seen.contains(&role) {
            return Err(BracketError::DuplicateRole { role });
        }
        seen.push(role);
    }
    Ok(())
}

/// Edge accumulator for one bracket.
struct Wiring<'a, 'g> {
    targets: &'a [&'g Game],
    sources: &'a [&'g Game],
    edges: Vec<Edge>,
}

impl<'g> Wiring<'_, 'g> {
    fn target(&self, role: BracketRole) -> Option<&'g Game> {
        find_game_by_role(self.targets, role)
    }

    /// Link the `output` of the source game at `index` into `target`.
    fn link(&mut self, index: usize, output: GameOutput, target: Option<&Game>, slot: Slot) {
        let source = self.sources.get(index).copied();
        self.link_games(source, output, target, slot);
    }

    fn link_games(
        &mut self,
        source: Option<&Game>,
        output: GameOutput,
        target: Option<&Game>,
        slot: Slot,
    ) {
        if let (Some(source), Some(target)) = (source, target) {
            self.edges
                .push(Edge::from_game(&source.id, output, &target.id, slot));
        }
    }

    fn four_team_elimination(
        &mut self,
        mapping: Option<&ProgressionMapping>,
        source_stages: &[&Stage],
    ) {
        let sf1 = self.target(BracketRole::SemiFinal(1));
        let sf2 = self.target(BracketRole::SemiFinal(2));
        let final_game = self.target(BracketRole::Final);
        let third_place = self.target(BracketRole::ThirdPlace);
        let all_in_target =
            sf1.is_some() && sf2.is_some() && final_game.is_some() && third_place.is_some();

        match mapping {
            Some(mapping) => self.apply_mapping(mapping, source_stages),
            None => self.semifinal_entries(sf1, sf2),
        }

        if all_in_target {
            self.semifinals_into_medal_games(sf1, sf2);
        } else {
            // Semifinals played in an earlier stage feed this stage's medal games.
            let source_sf1 = find_game_by_role(self.sources, BracketRole::SemiFinal(1));
            let source_sf2 = find_game_by_role(self.sources, BracketRole::SemiFinal(2));
            if source_sf1.is_some() || source_sf2.is_some() {
                self.link_games(source_sf1, GameOutput::Winner, final_game, Slot::Home);
                self.link_games(source_sf2, GameOutput::Winner, final_game, Slot::Away);
                self.link_games(source_sf1, GameOutput::Loser, third_place, Slot::Home);
                self.link_games(source_sf2, GameOutput::Loser, third_place, Slot::Away);
            }
        }
    }

    /// Default semifinal entry, chosen by how many games the previous phase had.
    fn semifinal_entries(&mut self, sf1: Option<&Game>, sf2: Option<&Game>) {
        use GameOutput::{Loser, Winner};

        match self.sources.len() {
            // Two groups: first and third game of each group.
            n if n >= 6 => {
                self.link(0, Winner, sf1, Slot::Home);
                self.link(3, Winner, sf1, Slot::Away);
                self.link(2, Winner, sf2, Slot::Home);
                self.link(5, Winner, sf2, Slot::Away);
            }
            n @ 3..=4 => {
                self.link(0, Winner, sf1, Slot::Home);
                self.link(1, Winner, sf1, Slot::Away);
                self.link(2, Winner, sf2, Slot::Home);
                if n == 4 {
                    self.link(3, Winner, sf2, Slot::Away);
                } else {
                    self.link(0, Loser, sf2, Slot::Away);
                }
            }
            2 => {
                self.link(0, Winner, sf1, Slot::Home);
                self.link(1, Winner, sf1, Slot::Away);
                self.link(0, Loser, sf2, Slot::Home);
                self.link(1, Loser, sf2, Slot::Away);
            }
            _ => {}
        }
    }

    fn quarterfinals(&mut self) {
        let sf1 = self.target(BracketRole::SemiFinal(1));
        let sf2 = self.target(BracketRole::SemiFinal(2));
        let feeds = [
            (1, sf1, Slot::Home),
            (2, sf1, Slot::Away),
            (3, sf2, Slot::Home),
            (4, sf2, Slot::Away),
        ];
        for (quarter, semifinal, slot) in feeds {
            let quarterfinal = self.target(BracketRole::QuarterFinal(quarter));
            self.link_games(quarterfinal, GameOutput::Winner, semifinal, slot);
        }
    }

    /// Winners of the two feeder games play the final, losers the 3rd place game.
    fn semifinals_into_medal_games(&mut self, first: Option<&Game>, second: Option<&Game>) {
        let final_game = self.target(BracketRole::Final);
        let third_place = self.target(BracketRole::ThirdPlace);
        self.link_games(first, GameOutput::Winner, final_game, Slot::Home);
        self.link_games(second, GameOutput::Winner, final_game, Slot::Away);
        self.link_games(first, GameOutput::Loser, third_place, Slot::Home);
        self.link_games(second, GameOutput::Loser, third_place, Slot::Away);
    }

    fn apply_mapping(&mut self, mapping: &ProgressionMapping, source_stages: &[&Stage]) {
        for entry in &mapping.entries {
            let target = match BracketRole::from_standing(&entry.target) {
                Some(role) => self.target(role),
                None => self
                    .targets
                    .iter()
                    .copied()
                    .find(|g| g.standing == entry.target),
            };
            let Some(target) = target else {
                continue;
            };

            for slot in [Slot::Home, Slot::Away] {
                match entry.source(slot) {
                    Some(MappingSource::Game {
                        source_index,
                        output,
                    }) => self.link(*source_index, *output, Some(target), slot),
                    Some(MappingSource::Rank { stage_index, place }) => {
                        if let Some(stage) = source_stages.get(*stage_index) {
                            if *place > 0 {
                                self.edges
                                    .push(Edge::from_rank(&stage.id, *place, &target.id, slot));
                            }
                        }
                    }
                    None => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MappingEntry, SlotAssignment};
    use crate::validation::edges_are_acyclic;

    fn games(stage: &str, standings: &[&str]) -> Vec<Game> {
        standings
            .iter()
            .map(|s| Game::new(format!("{}-{}", stage, s), stage, *s))
            .collect()
    }

    fn group_games(count: usize) -> Vec<Game> {
        (1..=count)
            .map(|n| Game::new(format!("g{}", n), "groups", format!("Game {}", n)))
            .collect()
    }

    fn placement(positions: usize) -> ProgressionConfig {
        ProgressionConfig::Placement {
            positions,
            format: PlacementFormat::SingleElimination,
        }
    }

    fn edge(source: &str, output: GameOutput, target: &str, slot: Slot) -> Edge {
        Edge::from_game(source, output, target, slot)
    }

    fn run(targets: &[Game], sources: &[Game], config: &ProgressionConfig) -> Vec<Edge> {
        let target_refs: Vec<&Game> = targets.iter().collect();
        let source_refs: Vec<&Game> = sources.iter().collect();
        bracket_edges(
            &target_refs,
            &BracketSources::games_only(&source_refs),
            config,
            None,
            0,
        )
    }

    #[test]
    fn test_non_placement_stage_has_no_edges() {
        let targets = games("po", &["SF1", "SF2", "Final", "3rd Place"]);
        let sources = group_games(6);
        let config = ProgressionConfig::RoundRobin {
            team_count: Some(4),
            double_round: false,
        };
        assert!(run(&targets, &sources, &config).is_empty());
        assert!(run(&targets, &sources, &ProgressionConfig::Manual).is_empty());
    }

    #[test]
    fn test_two_groups_into_semifinals() {
        let targets = games("po", &["SF1", "SF2", "Final", "3rd Place"]);
        let sources = group_games(6);

        let edges = run(&targets, &sources, &placement(4));

        use GameOutput::{Loser, Winner};
        assert_eq!(
            edges,
            vec![
                edge("g1", Winner, "po-SF1", Slot::Home),
                edge("g4", Winner, "po-SF1", Slot::Away),
                edge("g3", Winner, "po-SF2", Slot::Home),
                edge("g6", Winner, "po-SF2", Slot::Away),
                edge("po-SF1", Winner, "po-Final", Slot::Home),
                edge("po-SF2", Winner, "po-Final", Slot::Away),
                edge("po-SF1", Loser, "po-3rd Place", Slot::Home),
                edge("po-SF2", Loser, "po-3rd Place", Slot::Away),
            ]
        );
        assert!(edges_are_acyclic(&edges));
    }

    #[test]
    fn test_single_group_with_four_games() {
        let targets = games("po", &["SF1", "SF2", "Final", "3rd Place"]);
        let sources = group_games(4);

        let edges = run(&targets, &sources, &placement(4));

        assert_eq!(edges.len(), 8);
        assert!(edges.contains(&edge("g4", GameOutput::Winner, "po-SF2", Slot::Away)));
        assert!(edges.contains(&edge("g2", GameOutput::Winner, "po-SF1", Slot::Away)));
    }

    #[test]
    fn test_single_group_with_three_games_uses_first_loser() {
        let targets = games("po", &["SF1", "SF2", "Final", "3rd Place"]);
        let sources = group_games(3);

        let edges = run(&targets, &sources, &placement(4));

        assert_eq!(edges.len(), 8);
        assert!(edges.contains(&edge("g1", GameOutput::Loser, "po-SF2", Slot::Away)));
    }

    #[test]
    fn test_two_source_games_feed_both_semifinals() {
        let targets = games("po", &["SF1", "SF2", "Final", "3rd Place"]);
        let sources = group_games(2);

        let edges = run(&targets, &sources, &placement(4));

        use GameOutput::{Loser, Winner};
        assert_eq!(
            &edges[..4],
            &[
                edge("g1", Winner, "po-SF1", Slot::Home),
                edge("g2", Winner, "po-SF1", Slot::Away),
                edge("g1", Loser, "po-SF2", Slot::Home),
                edge("g2", Loser, "po-SF2", Slot::Away),
            ]
        );
    }

    #[test]
    fn test_unmatched_source_count_only_wires_bracket() {
        let targets = games("po", &["SF1", "SF2", "Final", "3rd Place"]);
        let sources = group_games(5);

        let edges = run(&targets, &sources, &placement(4));

        assert_eq!(edges.len(), 4);
        assert!(edges
            .iter()
            .all(|e| e.source_game_id().is_some_and(|id| id.starts_with("po-"))));
    }

    #[test]
    fn test_semifinals_in_earlier_stage() {
        let targets = games("medals", &["Final", "3rd Place"]);
        let sources = games("semis", &["SF1", "SF2"]);

        let edges = run(&targets, &sources, &placement(4));

        use GameOutput::{Loser, Winner};
        assert_eq!(
            edges,
            vec![
                edge("semis-SF1", Winner, "medals-Final", Slot::Home),
                edge("semis-SF2", Winner, "medals-Final", Slot::Away),
                edge("semis-SF1", Loser, "medals-3rd Place", Slot::Home),
                edge("semis-SF2", Loser, "medals-3rd Place", Slot::Away),
            ]
        );
    }

    #[test]
    fn test_final_takes_last_two_sources() {
        let targets = games("po", &["Final"]);
        let sources = group_games(6);

        let edges = run(&targets, &sources, &placement(2));

        assert_eq!(
            edges,
            vec![
                edge("g5", GameOutput::Winner, "po-Final", Slot::Home),
                edge("g6", GameOutput::Winner, "po-Final", Slot::Away),
            ]
        );
        assert!(run(&targets, &group_games(1), &placement(2)).is_empty());
    }

    #[test]
    fn test_quarterfinal_bracket() {
        let targets = games(
            "ko",
            &["QF1", "QF2", "QF3", "QF4", "SF1", "SF2", "Final", "3rd Place"],
        );

        let edges = run(&targets, &[], &placement(8));

        assert_eq!(edges.len(), 8);
        assert!(edges.contains(&edge("ko-QF3", GameOutput::Winner, "ko-SF2", Slot::Home)));
        assert!(edges.contains(&edge("ko-QF2", GameOutput::Winner, "ko-SF1", Slot::Away)));
        assert!(edges.contains(&edge("ko-SF2", GameOutput::Loser, "ko-3rd Place", Slot::Away)));
        assert!(edges_are_acyclic(&edges));
    }

    #[test]
    fn test_crossover_bracket() {
        let targets = games("co", &["CO1", "CO2", "Final", "3rd Place"]);
        let config = ProgressionConfig::Placement {
            positions: 4,
            format: PlacementFormat::Crossover,
        };

        let edges = run(&targets, &group_games(12), &config);

        assert_eq!(
            edges,
            vec![
                edge("co-CO1", GameOutput::Winner, "co-Final", Slot::Home),
                edge("co-CO2", GameOutput::Winner, "co-Final", Slot::Away),
                edge("co-CO1", GameOutput::Loser, "co-3rd Place", Slot::Home),
                edge("co-CO2", GameOutput::Loser, "co-3rd Place", Slot::Away),
            ]
        );
    }

    #[test]
    fn test_unsupported_size_has_no_edges() {
        let targets = games("po", &["Final"]);
        assert!(run(&targets, &group_games(6), &placement(16)).is_empty());
    }

    #[test]
    fn test_mapping_overrides_entry_wiring() {
        let targets = games("po", &["SF1", "SF2", "Final", "3rd Place"]);
        let sources = group_games(6);
        let group_a = Stage::new("group-a", "f1", "Group A", 0, ProgressionConfig::Manual);
        let group_b = Stage::new("group-b", "f2", "Group B", 0, ProgressionConfig::Manual);
        let mapping = ProgressionMapping::new(vec![
            MappingEntry::new(
                "SF1",
                Some(MappingSource::Rank {
                    stage_index: 0,
                    place: 1,
                }),
                Some(MappingSource::Rank {
                    stage_index: 1,
                    place: 2,
                }),
            ),
            MappingEntry::new(
                "SF2",
                Some(MappingSource::Game {
                    source_index: 5,
                    output: GameOutput::Loser,
                }),
                Some(MappingSource::Game {
                    source_index: 42,
                    output: GameOutput::Winner,
                }),
            ),
            MappingEntry::new("QF1", None, None),
        ]);

        let target_refs: Vec<&Game> = targets.iter().collect();
        let source_refs: Vec<&Game> = sources.iter().collect();
        let stage_refs = [&group_a, &group_b];
        let edges = bracket_edges(
            &target_refs,
            &BracketSources::new(&source_refs, &stage_refs),
            &placement(4),
            Some(&mapping),
            0,
        );

        assert_eq!(edges.len(), 7);
        assert_eq!(edges[0], Edge::from_rank("group-a", 1, "po-SF1", Slot::Home));
        assert_eq!(edges[1], Edge::from_rank("group-b", 2, "po-SF1", Slot::Away));
        assert_eq!(edges[2], edge("g6", GameOutput::Loser, "po-SF2", Slot::Home));
        assert_eq!(
            edges[1].assignment(),
            SlotAssignment::Rank {
                stage_id: "group-b".to_string(),
                place: 2
            }
        );
    }

    #[test]
    fn test_wiring_ignores_renamed_labels() {
        let targets: Vec<Game> = games("po", &["SF1", "SF2", "Final", "3rd Place"])
            .into_iter()
            .map(|g| {
                let label = format!("Spiel {}", g.standing);
                g.with_standing(label)
            })
            .collect();

        let edges = run(&targets, &group_games(6), &placement(4));
        assert_eq!(edges.len(), 8);
    }

    #[test]
    fn test_duplicate_roles_degrade_to_no_edges() {
        let targets = games("po", &["SF1", "SF1", "Final", "3rd Place"]);
        let target_refs: Vec<&Game> = targets.iter().collect();
        let sources = group_games(6);
        let source_refs: Vec<&Game> = sources.iter().collect();

        let result = try_bracket_edges(
            &target_refs,
            &BracketSources::games_only(&source_refs),
            &placement(4),
            None,
            0,
        );
        assert_eq!(
            result,
            Err(BracketError::DuplicateRole {
                role: BracketRole::SemiFinal(1)
            })
        );
        assert!(run(&targets, &sources, &placement(4)).is_empty());
    }

    #[test]
    fn test_zero_padded_label_is_not_a_second_semifinal() {
        let targets = games("po", &["SF1", "SF01", "SF2", "Final", "3rd Place"]);
        assert_eq!(targets[1].role, None);

        let edges = run(&targets, &group_games(6), &placement(4));
        assert_eq!(edges.len(), 8);
        assert!(edges.iter().all(|e| e.target_game_id != "po-SF01"));
    }

    #[test]
    fn test_self_reference_is_rejected() {
        let targets = games("po", &["SF1", "SF2", "Final"]);
        let target_refs: Vec<&Game> = targets.iter().collect();

        let result = try_bracket_edges(
            &target_refs,
            &BracketSources::games_only(&target_refs),
            &placement(4),
            None,
            0,
        );
        assert_eq!(
            result,
            Err(BracketError::SelfReference {
                game: "po-SF1".to_string()
            })
        );
    }
}
