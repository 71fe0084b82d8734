//! Start-time propagation across phases, stages and games.

use chrono::NaiveTime;
use rustc_hash::FxHashMap;

use crate::models::{Field, Game, Stage};
use crate::phase::{field_name, phases, stage_games};
use crate::{log_changes, log_checks, log_debug};

use super::clock::{minutes_of, time_at, StageClock};

/// Assigns start times to every game of a tournament.
///
/// The first phase starts at its first stage's configured start time (or the
/// scheduler default). Every later phase starts one default break after the
/// latest game end of the previous phase. A stage with its own start time
/// overrides the inherited one. Inside a stage, games run back to back in play
/// order, separated by their break; a game pinned with a manual time resets the
/// clock for the games after it.
#[derive(Clone, Debug)]
pub struct TimeScheduler {
    /// Game duration in minutes when neither game nor stage sets one.
    game_duration: u32,
    /// Break in minutes between phases, and between games when neither game nor stage sets one.
    break_duration: u32,
    /// Start of the first phase when its stage has no start time.
    start_time: NaiveTime,
    verbosity: u8,
}

impl TimeScheduler {
    pub fn new(game_duration: u32, break_duration: u32, start_time: NaiveTime) -> Self {
        Self {
            game_duration,
            break_duration,
            start_time,
            verbosity: 0,
        }
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Return `games` with computed start times.
    ///
    /// Games are returned in input order. Games of stages not in `stages` are
    /// returned unchanged. Running the scheduler on its own output yields the
    /// same times.
    pub fn schedule(&self, fields: &[Field], stages: &[Stage], games: &[Game]) -> Vec<Game> {
        let mut start_times: FxHashMap<&str, NaiveTime> = FxHashMap::default();
        let mut previous_end: Option<i64> = None;

        for phase in phases(stages) {
            let phase_start = match previous_end {
                Some(end) => end + i64::from(self.break_duration),
                None => phase
                    .stages
                    .first()
                    .and_then(|s| s.start_time)
                    .map_or_else(|| minutes_of(self.start_time), minutes_of),
            };
            log_changes!(
                self.verbosity,
                "Phase {} starts at {}",
                phase.order,
                time_at(phase_start).format("%H:%M")
            );

            let phase_end = phase
                .stages
                .iter()
                .map(|stage| {
                    let stage_start = stage.start_time.map_or(phase_start, minutes_of);
                    log_checks!(
                        self.verbosity,
                        "Stage {} on {} starts at {}",
                        stage.name,
                        field_name(fields, &stage.field_id),
                        time_at(stage_start).format("%H:%M")
                    );
                    self.schedule_stage(stage, stage_start, games, &mut start_times)
                })
                .max()
                .unwrap_or(phase_start);
            previous_end = Some(phase_end);
        }

        games
            .iter()
            .map(|game| match start_times.get(game.id.as_str()) {
                Some(start) => game.clone().with_start_time(Some(*start)),
                None => game.clone(),
            })
            .collect()
    }

    /// Place the games of one stage; returns the stage's end in minutes.
    fn schedule_stage<'a>(
        &self,
        stage: &Stage,
        stage_start: i64,
        games: &'a [Game],
        start_times: &mut FxHashMap<&'a str, NaiveTime>,
    ) -> i64 {
        let games_in_stage = stage_games(games, &stage.id);
        let default_duration = stage.game_duration.unwrap_or(self.game_duration);
        let default_break = stage.break_between_games.unwrap_or(self.break_duration);
        let mut clock = StageClock::starting_at(stage_start);

        for (index, game) in games_in_stage.iter().enumerate() {
            let start = match (game.manual_time, game.start_time) {
                (true, Some(pinned)) => minutes_of(pinned),
                _ => clock.now(),
            };
            let is_last = index + 1 == games_in_stage.len();
            let break_after = if is_last {
                0
            } else {
                game.break_after.unwrap_or(default_break)
            };
            clock.place(start, game.duration.unwrap_or(default_duration), break_after);

            log_debug!(
                self.verbosity,
                "  {} / {} at {}",
                stage.name,
                game.standing,
                time_at(start).format("%H:%M")
            );
            start_times.insert(game.id.as_str(), time_at(start));
        }

        clock.latest_end()
    }
}
