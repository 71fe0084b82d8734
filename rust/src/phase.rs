//! Execution phases: stages grouped by their `order`.
//!
//! Stages sharing an order run side by side on different fields; a phase only
//! starts once the previous one is done. Both team assignment and time
//! scheduling walk the tournament phase by phase.

use std::collections::BTreeMap;

use crate::models::{Field, Game, Stage};

/// The stages executing in parallel at one `order`.
#[derive(Clone, Debug)]
pub struct Phase<'a> {
    pub order: u32,
    /// Parallel stages in stage-list order. Position `i` draws team slice `i`.
    pub stages: Vec<&'a Stage>,
}

impl Phase<'_> {
    /// Whether more than one stage shares this phase ("split field").
    pub fn is_split(&self) -> bool {
        self.stages.len() > 1
    }
}

/// Group stages into phases in ascending order.
///
/// Within a phase, stages keep their order in `stages`, whichever field they
/// are bound to.
pub fn phases(stages: &[Stage]) -> Vec<Phase<'_>> {
    let mut by_order: BTreeMap<u32, Vec<&Stage>> = BTreeMap::new();
    for stage in stages {
        by_order.entry(stage.order).or_default().push(stage);
    }

    by_order
        .into_iter()
        .map(|(order, stages)| Phase { order, stages })
        .collect()
}

/// Display name of the field a stage is bound to, or its id if unknown.
pub fn field_name<'f>(fields: &'f [Field], field_id: &'f str) -> &'f str {
    fields
        .iter()
        .find(|f| f.id == field_id)
        .map_or(field_id, |f| f.name.as_str())
}

/// Games of one stage in play order.
pub fn stage_games<'a>(games: &'a [Game], stage_id: &str) -> Vec<&'a Game> {
    let mut result: Vec<&Game> = games.iter().filter(|g| g.stage_id == stage_id).collect();
    result.sort_by_key(|g| g.sequence_key());
    result
}

/// What one phase hands to the next: its games and stages, in phase order.
#[derive(Clone, Debug, Default)]
pub struct PhaseCarry<'a> {
    games: Vec<&'a Game>,
    stages: Vec<&'a Stage>,
}

impl<'a> PhaseCarry<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Games of the previous phase, stage by stage, each stage in play order.
    pub fn games(&self) -> &[&'a Game] {
        &self.games
    }

    pub fn stages(&self) -> &[&'a Stage] {
        &self.stages
    }

    /// Replace the carried results with those of `phase`.
    pub fn advance(&mut self, phase: &Phase<'a>, games: &'a [Game]) {
        self.stages = phase.stages.clone();
        self.games = phase
            .stages
            .iter()
            .flat_map(|stage| stage_games(games, &stage.id))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProgressionConfig;

    fn field(id: &str, order: usize) -> Field {
        Field::new(id.to_string(), format!("Field {}", id), order, "#000000".to_string())
    }

    fn stage(id: &str, field_id: &str, order: u32) -> Stage {
        Stage::new(id, field_id, id, order, ProgressionConfig::Manual)
    }

    #[test]
    fn test_phases_sorted_by_order() {
        let stages = vec![
            stage("final", "f1", 2),
            stage("group-a", "f2", 0),
            stage("group-b", "f1", 0),
            stage("semis", "f1", 1),
        ];

        let phases = phases(&stages);

        let orders: Vec<u32> = phases.iter().map(|p| p.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);

        let first: Vec<&str> = phases[0].stages.iter().map(|s| s.id.as_str()).collect();
        // Stage-list order, not field order.
        assert_eq!(first, vec!["group-a", "group-b"]);
        assert!(phases[0].is_split());
        assert!(!phases[1].is_split());
    }

    #[test]
    fn test_phases_allow_gaps_in_order() {
        let stages = vec![stage("a", "f1", 0), stage("b", "f1", 5)];
        let phases = phases(&stages);
        assert_eq!(phases.len(), 2);
        assert_eq!(phases[1].order, 5);
    }

    #[test]
    fn test_field_name() {
        let fields = vec![field("f1", 0)];
        assert_eq!(field_name(&fields, "f1"), "Field f1");
        assert_eq!(field_name(&fields, "f9"), "f9");
    }

    #[test]
    fn test_stage_games_in_play_order() {
        let games = vec![
            Game::new("g10", "s1", "Game 10"),
            Game::new("g2", "s1", "Game 2"),
            Game::new("x", "s2", "Game 1"),
            Game::new("g1", "s1", "Game 1"),
        ];
        let ids: Vec<&str> = stage_games(&games, "s1")
            .iter()
            .map(|g| g.id.as_str())
            .collect();
        assert_eq!(ids, vec!["g1", "g2", "g10"]);
    }

    #[test]
    fn test_carry_advances_to_latest_phase() {
        let stages = vec![
            stage("group-a", "f1", 0),
            stage("group-b", "f2", 0),
            stage("playoffs", "f1", 1),
        ];
        let games = vec![
            Game::new("b1", "group-b", "Game 3"),
            Game::new("a1", "group-a", "Game 1"),
            Game::new("a2", "group-a", "Game 2"),
            Game::new("sf1", "playoffs", "SF1"),
        ];
        let phases = phases(&stages);

        let mut carry = PhaseCarry::new();
        assert!(carry.games().is_empty());

        carry.advance(&phases[0], &games);
        let ids: Vec<&str> = carry.games().iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "b1"]);
        assert_eq!(carry.stages().len(), 2);

        carry.advance(&phases[1], &games);
        let ids: Vec<&str> = carry.games().iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["sf1"]);
    }
}
