//! Round-robin pairings by circular rotation.

/// Generate balanced round-robin `(home, away)` index pairs.
///
/// Index 0 stays fixed while the other slots rotate one step per round, so
/// every pair of teams meets exactly once per cycle. An odd team count gets a
/// synthetic bye slot; pairs touching it are dropped. With `double_round` the
/// whole cycle is repeated with home and away swapped.
///
/// The order of the result is significant: callers assign pairings to games
/// by position.
///
/// # Arguments
/// * `team_count` - Number of teams; fewer than 2 yields no pairings
/// * `double_round` - Whether every pair meets twice
pub fn round_robin_pairings(team_count: usize, double_round: bool) -> Vec<(usize, usize)> {
    if team_count < 2 {
        return Vec::new();
    }

    let bye = (team_count % 2 == 1).then_some(team_count);
    let slot_count = team_count + usize::from(bye.is_some());
    let mut slots: Vec<usize> = (0..slot_count).collect();

    let single_round = team_count * (team_count - 1) / 2;
    let capacity = if double_round { single_round * 2 } else { single_round };
    let mut pairings = Vec::with_capacity(capacity);

    for _round in 0..slot_count - 1 {
        for i in 0..slot_count / 2 {
            let home = slots[i];
            let away = slots[slot_count - 1 - i];
            if Some(home) == bye || Some(away) == bye {
                continue;
            }
            pairings.push((home, away));
        }
        // Last slot moves to position 1, index 0 stays put.
        slots[1..].rotate_right(1);
    }

    if double_round {
        let return_legs: Vec<(usize, usize)> =
            pairings.iter().map(|&(home, away)| (away, home)).collect();
        pairings.extend(return_legs);
    }

    pairings
}
