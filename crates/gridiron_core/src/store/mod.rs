//! Durable game records and the play-history ledger.
//!
//! One slot per game, each guarded by its own reader-writer lock. A commit
//! takes the slot's write lock for the whole read-modify-write — append the
//! history entry, fold the outcome into game state — with a bounded wait;
//! readers take brief read locks and observe the last committed snapshot,
//! never a torn one.

pub mod error;
pub mod roster;

use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::models::game::{GameState, GameSummary, Possession, QUARTERS, QUARTER_SECONDS};
use crate::models::play::{PlayOutcome, PlayRecord, PlayType};

pub use error::StoreError;

struct GameData {
    state: GameState,
    history: Vec<PlayRecord>,
}

struct GameSlot {
    data: RwLock<GameData>,
}

/// In-process store for game records and their ledgers.
pub struct GameStore {
    games: RwLock<HashMap<String, Arc<GameSlot>>>,
    lock_timeout: Duration,
}

impl GameStore {
    pub fn new(lock_timeout: Duration) -> Self {
        Self { games: RwLock::new(HashMap::new()), lock_timeout }
    }

    /// Register a game, replacing any previous record under the same id.
    pub fn insert_game(&self, state: GameState) {
        let id = state.id.clone();
        let slot = Arc::new(GameSlot {
            data: RwLock::new(GameData { state, history: Vec::new() }),
        });
        self.games.write().insert(id.clone(), slot);
        log::info!("Game {} registered", id);
    }

    /// Last committed state of a game; `None` when the id is unknown.
    pub fn game(&self, game_id: &str) -> Option<GameState> {
        let slot = self.games.read().get(game_id).cloned()?;
        let data = slot.data.read();
        Some(data.state.clone())
    }

    /// Scoreboard lines for every registered game, ordered by id.
    pub fn games(&self) -> Vec<GameSummary> {
        let slots: Vec<Arc<GameSlot>> = self.games.read().values().cloned().collect();
        let mut summaries: Vec<GameSummary> =
            slots.iter().map(|slot| GameSummary::from(&slot.data.read().state)).collect();
        summaries.sort_by(|a, b| a.game_id.cmp(&b.game_id));
        summaries
    }

    /// Full drive history of a game; `None` when the id is unknown.
    pub fn history(&self, game_id: &str) -> Option<Vec<PlayRecord>> {
        let slot = self.games.read().get(game_id).cloned()?;
        let data = slot.data.read();
        Some(data.history.clone())
    }

    /// Atomically append one play to the ledger and fold it into game state.
    ///
    /// The history entry's before-snapshot is taken from the committed state
    /// inside the critical section, so two racing submissions serialize into
    /// two entries whose snapshots chain correctly. A request that cannot
    /// acquire the slot within the bound gets a retryable
    /// [`StoreError::LockTimeout`].
    pub fn commit_play(
        &self,
        game_id: &str,
        outcome: &PlayOutcome,
        predicted: PlayType,
    ) -> Result<PlayRecord, StoreError> {
        let slot = self
            .games
            .read()
            .get(game_id)
            .cloned()
            .ok_or_else(|| StoreError::GameNotFound { game_id: game_id.to_string() })?;

        let mut data = slot.data.try_write_for(self.lock_timeout).ok_or_else(|| {
            log::warn!("Commit for game {} timed out waiting for the write lock", game_id);
            StoreError::LockTimeout { game_id: game_id.to_string() }
        })?;

        let record = build_record(&data.state, outcome, predicted);
        data.history.push(record.clone());
        fold_outcome(&mut data.state, outcome);

        log::info!(
            "Game {}: {} ({} yards), ball on {}",
            game_id,
            record.result,
            record.yards,
            data.state.ball_on
        );
        Ok(record)
    }
}

/// History entry for `outcome`, with before-fields from the committed state.
fn build_record(state: &GameState, outcome: &PlayOutcome, predicted: PlayType) -> PlayRecord {
    let scored = score_after(state, outcome);
    PlayRecord {
        game_id: state.id.clone(),
        timestamp: Utc::now(),
        quarter: state.quarter,
        clock_seconds: state.clock_seconds,
        possession: state.possession,
        down: state.down,
        distance: state.distance,
        ball_on: state.ball_on,
        play_type: outcome.play_type,
        player: outcome.player.clone(),
        yards: outcome.yards_gained,
        defense_predicted: predicted,
        prediction_correct: predicted == outcome.play_type,
        tackler: outcome.tackler.clone(),
        result: outcome.result,
        description: outcome.description.clone(),
        new_down: outcome.new_down,
        new_distance: outcome.new_distance,
        new_ball_on: outcome.new_ball_on,
        drive_start: state.drive_start,
        home_score: scored.0,
        away_score: scored.1,
    }
}

fn score_after(state: &GameState, outcome: &PlayOutcome) -> (u32, u32) {
    match state.possession {
        Possession::Home => (state.home_score + outcome.points, state.away_score),
        Possession::Away => (state.home_score, state.away_score + outcome.points),
    }
}

fn fold_outcome(state: &mut GameState, outcome: &PlayOutcome) {
    let (home_score, away_score) = score_after(state, outcome);
    state.home_score = home_score;
    state.away_score = away_score;

    state.down = outcome.new_down;
    state.distance = outcome.new_distance;
    state.ball_on = outcome.new_ball_on;
    if outcome.turnover || outcome.touchdown {
        state.possession = state.possession.flipped();
        state.drive_start = outcome.new_ball_on;
    }
    state.previous = outcome.description.clone();

    if state.clock_seconds > outcome.clock_runoff {
        state.clock_seconds -= outcome.clock_runoff;
    } else if state.quarter < QUARTERS {
        state.quarter += 1;
        state.clock_seconds = QUARTER_SECONDS;
    } else {
        state.clock_seconds = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::play::ResultKind;
    use std::thread;

    fn test_state() -> GameState {
        GameState::new_game("g1", "Ironclads", "Monarchs", 25)
    }

    fn run_outcome(yards: i32, description: &str) -> PlayOutcome {
        PlayOutcome {
            play_type: PlayType::Run,
            player: "Back".to_string(),
            yards_gained: yards,
            result: ResultKind::Run,
            tackler: Some("Backer".to_string()),
            receiver: None,
            new_down: 2,
            new_distance: (10 - yards).max(0) as u32,
            new_ball_on: (25 + yards) as u32,
            turnover: false,
            touchdown: false,
            points: 0,
            clock_runoff: 35,
            description: description.to_string(),
        }
    }

    #[test]
    fn unknown_game_lookups_are_absent_not_errors() {
        let store = GameStore::new(Duration::from_secs(1));
        assert!(store.game("missing").is_none());
        assert!(store.history("missing").is_none());
        assert!(store.games().is_empty());
    }

    #[test]
    fn commit_appends_history_and_folds_state() {
        let store = GameStore::new(Duration::from_secs(1));
        store.insert_game(test_state());

        let record = store.commit_play("g1", &run_outcome(4, "4 yard gain"), PlayType::Run).unwrap();
        assert_eq!(record.down, 1);
        assert_eq!(record.ball_on, 25);
        assert_eq!(record.new_ball_on, 29);
        assert!(record.prediction_correct);

        let state = store.game("g1").unwrap();
        assert_eq!(state.down, 2);
        assert_eq!(state.distance, 6);
        assert_eq!(state.ball_on, 29);
        assert_eq!(state.previous, "4 yard gain");
        assert_eq!(state.clock_seconds, QUARTER_SECONDS - 35);
        assert_eq!(store.history("g1").unwrap().len(), 1);
    }

    #[test]
    fn commit_to_unknown_game_is_an_error() {
        let store = GameStore::new(Duration::from_secs(1));
        let err = store.commit_play("missing", &run_outcome(4, "x"), PlayType::Run).unwrap_err();
        assert!(matches!(err, StoreError::GameNotFound { .. }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn touchdown_scores_and_flips_possession() {
        let store = GameStore::new(Duration::from_secs(1));
        store.insert_game(test_state());

        let mut outcome = run_outcome(75, "long touchdown run");
        outcome.touchdown = true;
        outcome.points = 7;
        outcome.new_down = 1;
        outcome.new_distance = 10;
        outcome.new_ball_on = 25;
        outcome.tackler = None;

        let record = store.commit_play("g1", &outcome, PlayType::Run).unwrap();
        assert_eq!(record.home_score, 7);
        assert_eq!(record.away_score, 0);

        let state = store.game("g1").unwrap();
        assert_eq!(state.home_score, 7);
        assert_eq!(state.possession, Possession::Away);
        assert_eq!(state.drive_start, 25);
    }

    #[test]
    fn clock_exhaustion_advances_the_quarter() {
        let store = GameStore::new(Duration::from_secs(1));
        let mut state = test_state();
        state.clock_seconds = 20;
        store.insert_game(state);

        store.commit_play("g1", &run_outcome(3, "x"), PlayType::Run).unwrap();
        let state = store.game("g1").unwrap();
        assert_eq!(state.quarter, 2);
        assert_eq!(state.clock_seconds, QUARTER_SECONDS);
    }

    #[test]
    fn lock_timeout_is_surfaced_as_retryable() {
        let store = GameStore::new(Duration::from_millis(20));
        store.insert_game(test_state());

        let slot = store.games.read().get("g1").cloned().unwrap();
        let guard = slot.data.write();

        let err = store.commit_play("g1", &run_outcome(4, "x"), PlayType::Run).unwrap_err();
        assert!(matches!(err, StoreError::LockTimeout { .. }));
        assert!(err.is_recoverable());
        drop(guard);

        // The same request succeeds once the writer is gone.
        store.commit_play("g1", &run_outcome(4, "x"), PlayType::Run).unwrap();
    }

    #[test]
    fn concurrent_commits_serialize_without_losing_entries() {
        let store = Arc::new(GameStore::new(Duration::from_secs(5)));
        store.insert_game(test_state());

        let handles: Vec<_> = (0..2)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let outcome = run_outcome(4 + i, &format!("play {}", i));
                    store.commit_play("g1", &outcome, PlayType::Run).unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let history = store.history("g1").unwrap();
        assert_eq!(history.len(), 2);

        // The final state matches a sequential replay of the commit order.
        let last = history.last().unwrap();
        let state = store.game("g1").unwrap();
        assert_eq!(state.ball_on, last.new_ball_on);
        assert_eq!(state.down, last.new_down);
        assert_eq!(state.previous, last.description);
        // The second entry's before-snapshot chains off the first commit.
        assert_eq!(history[1].ball_on, history[0].new_ball_on);
    }
}
