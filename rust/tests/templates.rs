use chrono::NaiveTime;
use spielplan_rust::phase::stage_games;
use spielplan_rust::{
    build_tournament, templates, validate_structure, EdgeSource, GenerationConfig, ProgressionMode,
    SlotAssignment, Team, TournamentStructure,
};

fn teams(count: usize) -> Vec<Team> {
    (0..count)
        .map(|i| Team::new(format!("t{}", i + 1), format!("Team {}", i + 1), None, i))
        .collect()
}

fn build(template_id: &str, team_count: usize) -> TournamentStructure {
    build_tournament(&teams(team_count), &GenerationConfig::for_template(template_id))
        .unwrap_or_else(|e| panic!("{} with {} teams: {}", template_id, team_count, e))
}

fn placement_games(structure: &TournamentStructure) -> usize {
    structure
        .games
        .iter()
        .filter(|g| {
            structure
                .stage(&g.stage_id)
                .is_some_and(|s| s.mode() == ProgressionMode::Placement)
        })
        .count()
}

#[test]
fn every_template_builds_a_complete_structure() {
    for template in templates() {
        for count in [template.min_teams, template.max_teams] {
            let structure = build(&template.id, count);
            let issues = validate_structure(&structure, true);
            assert!(
                issues.is_empty(),
                "{} with {} teams: {:?}",
                template.id,
                count,
                issues
            );
            assert!(
                structure.games.iter().all(|g| g.start_time.is_some()),
                "{} left a game unscheduled",
                template.id
            );
        }
    }
}

#[test]
fn games_within_a_stage_start_in_play_order() {
    for template in templates() {
        let structure = build(&template.id, template.max_teams);
        for stage in &structure.stages {
            let starts: Vec<NaiveTime> = stage_games(&structure.games, &stage.id)
                .iter()
                .filter_map(|g| g.start_time)
                .collect();
            assert!(
                starts.windows(2).all(|w| w[0] < w[1]),
                "{} / {}: {:?}",
                template.id,
                stage.name,
                starts
            );
            assert_eq!(stage.start_time, starts.first().copied());
        }
    }
}

#[test]
fn crossover_is_fed_by_group_rankings() {
    let structure = build("8_teams_2_groups", 8);

    assert_eq!(placement_games(&structure), 4);
    let rank_edges = structure
        .edges
        .iter()
        .filter(|e| matches!(e.source, EdgeSource::Rank { .. }))
        .count();
    assert_eq!(rank_edges, 4);
    assert_eq!(structure.edges.len(), 8);

    let co1 = structure.games.iter().find(|g| g.standing == "CO1").unwrap();
    assert_eq!(
        co1.home,
        Some(SlotAssignment::Rank {
            stage_id: "stage-1".to_string(),
            place: 1
        })
    );
    assert_eq!(
        co1.away,
        Some(SlotAssignment::Rank {
            stage_id: "stage-2".to_string(),
            place: 2
        })
    );
}

#[test]
fn quarterfinal_bracket_is_fully_wired() {
    let structure = build("8_teams_2_groups_quarterfinals", 8);

    assert_eq!(placement_games(&structure), 8);
    assert_eq!(structure.edges.len(), 16);

    let final_game = structure.games.iter().find(|g| g.standing == "Final").unwrap();
    let third = structure
        .games
        .iter()
        .find(|g| g.standing == "3rd Place")
        .unwrap();
    assert!(matches!(final_game.home, Some(SlotAssignment::Winner(_))));
    assert!(matches!(third.home, Some(SlotAssignment::Loser(_))));
    assert!(third.start_time < final_game.start_time);
}

#[test]
fn second_phase_waits_for_both_groups() {
    let structure = build("6_teams_2_groups", 6);

    let group_end = structure
        .games
        .iter()
        .filter(|g| g.standing.starts_with("Game"))
        .filter_map(|g| g.start_time)
        .max()
        .unwrap();
    let playoff_start = structure.stages[2].start_time.unwrap();

    // Last group game at 10:50, plus 20 minutes of play and a 5 minute break.
    assert_eq!(group_end, NaiveTime::from_hms_opt(10, 50, 0).unwrap());
    assert_eq!(playoff_start, NaiveTime::from_hms_opt(11, 15, 0).unwrap());
}

#[test]
fn league_slots_are_static_and_bracket_slots_follow_edges() {
    let league = build("round_robin", 5);
    assert!(league
        .games
        .iter()
        .flat_map(|g| [g.home.as_ref(), g.away.as_ref()])
        .all(|slot| slot.is_some_and(SlotAssignment::is_static)));

    let structure = build("6_teams_2_groups", 6);
    for edge in &structure.edges {
        let target = structure
            .game(&edge.target_game_id)
            .unwrap_or_else(|| panic!("edge into unknown game {}", edge.target_game_id));
        let slot = target.slot(edge.target_slot).unwrap();
        assert!(!slot.is_static());
        assert_eq!(*slot, edge.assignment());
    }
}
