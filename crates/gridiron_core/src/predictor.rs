//! Historical-tendency predictor.
//!
//! Simulates the defense "reading" the offense: filter the play history to
//! comparable situations, take the empirical run fraction, and flip a coin
//! weighted by it. The prediction is recorded next to the actual call; it
//! never feeds back into play resolution.

use rand::Rng;

use crate::models::play::{PlayRecord, PlayType};

/// A situation matches when the down is equal and the distance is within
/// this many yards.
pub const DISTANCE_TOLERANCE: u32 = 2;

/// Guess the offense's next play type from its history.
///
/// With no matching history the call is `Run` — a documented fallback, not a
/// data-driven guess.
pub fn predict_play_type<R: Rng>(
    down: u8,
    distance: u32,
    history: &[PlayRecord],
    rng: &mut R,
) -> PlayType {
    let matches: Vec<&PlayRecord> = history
        .iter()
        .filter(|r| r.down == down && r.distance.abs_diff(distance) <= DISTANCE_TOLERANCE)
        .collect();

    if matches.is_empty() {
        return PlayType::Run;
    }

    let run_count = matches.iter().filter(|r| r.play_type == PlayType::Run).count();
    let run_fraction = run_count as f64 / matches.len() as f64;

    if rng.gen::<f64>() < run_fraction {
        PlayType::Run
    } else {
        PlayType::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::game::Possession;
    use crate::models::play::ResultKind;
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(down: u8, distance: u32, play_type: PlayType) -> PlayRecord {
        PlayRecord {
            game_id: "g1".to_string(),
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            quarter: 1,
            clock_seconds: 800,
            possession: Possession::Home,
            down,
            distance,
            ball_on: 40,
            play_type,
            player: "Back".to_string(),
            yards: 3,
            defense_predicted: PlayType::Run,
            prediction_correct: play_type == PlayType::Run,
            tackler: None,
            result: ResultKind::Run,
            description: String::new(),
            new_down: down + 1,
            new_distance: distance.saturating_sub(3),
            new_ball_on: 43,
            drive_start: 25,
            home_score: 0,
            away_score: 0,
        }
    }

    #[test]
    fn empty_history_always_predicts_run() {
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(predict_play_type(3, 8, &[], &mut rng), PlayType::Run);
        }
    }

    #[test]
    fn unanimous_history_is_predicted_deterministically() {
        let runs: Vec<PlayRecord> = (0..6).map(|_| record(2, 5, PlayType::Run)).collect();
        let passes: Vec<PlayRecord> = (0..6).map(|_| record(2, 5, PlayType::Pass)).collect();
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(predict_play_type(2, 5, &runs, &mut rng), PlayType::Run);
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(predict_play_type(2, 5, &passes, &mut rng), PlayType::Pass);
        }
    }

    #[test]
    fn distance_tolerance_is_two_yards() {
        let passes: Vec<PlayRecord> = (0..4).map(|_| record(2, 7, PlayType::Pass)).collect();
        let mut rng = StdRng::seed_from_u64(1);
        // 7 is within +-2 of 5, so the all-pass history applies.
        assert_eq!(predict_play_type(2, 5, &passes, &mut rng), PlayType::Pass);
        // 10 is outside the window; fall back to Run.
        assert_eq!(predict_play_type(2, 10, &passes, &mut rng), PlayType::Run);
    }

    #[test]
    fn other_downs_do_not_match() {
        let passes: Vec<PlayRecord> = (0..4).map(|_| record(1, 10, PlayType::Pass)).collect();
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(predict_play_type(3, 10, &passes, &mut rng), PlayType::Run);
    }

    #[test]
    fn mixed_history_is_reproducible_under_a_seed() {
        let mut history: Vec<PlayRecord> = (0..5).map(|_| record(1, 10, PlayType::Run)).collect();
        history.extend((0..5).map(|_| record(1, 10, PlayType::Pass)));

        let take = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..16)
                .map(|_| predict_play_type(1, 10, &history, &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(take(3), take(3));
    }
}
