//! In-process façade wiring the catalog, resolver, predictor, and store.

use parking_lot::Mutex;
use rand::Rng;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::data::catalog::TableCatalog;
use crate::data::embedded::default_catalog;
use crate::engine::{EngineConfig, PlayContext, PlayResolver};
use crate::error::EngineError;
use crate::models::game::{GameState, GameSummary};
use crate::models::play::{PlayCall, PlayRecord, PlayType};
use crate::models::player::{Player, PlayerCondition, SessionState};
use crate::predictor::predict_play_type;
use crate::store::{roster, GameStore, StoreError};

#[derive(Debug)]
pub enum ServiceError {
    Engine(EngineError),
    Store(StoreError),
    UnknownGame(String),
    UnknownTeam(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ServiceError::Engine(err) => write!(f, "{}", err),
            ServiceError::Store(err) => write!(f, "{}", err),
            ServiceError::UnknownGame(id) => write!(f, "No such game: {}", id),
            ServiceError::UnknownTeam(team) => write!(f, "No such team: {}", team),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<EngineError> for ServiceError {
    fn from(err: EngineError) -> Self {
        ServiceError::Engine(err)
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        ServiceError::Store(err)
    }
}

/// One game session host: tables, tuning, roster, store, and per-game
/// player-condition tables.
pub struct GameService {
    catalog: TableCatalog,
    config: EngineConfig,
    store: GameStore,
    teams: HashMap<String, Vec<Player>>,
    roster: Vec<Player>,
    sessions: Mutex<HashMap<String, SessionState>>,
}

impl GameService {
    pub fn new(catalog: TableCatalog, config: EngineConfig, roster: Vec<Player>) -> Self {
        let mut teams: HashMap<String, Vec<Player>> = HashMap::new();
        for player in &roster {
            teams.entry(player.team.clone()).or_default().push(player.clone());
        }
        let store = GameStore::new(Duration::from_secs(config.lock_timeout_secs));
        Self { catalog, config, store, teams, roster, sessions: Mutex::new(HashMap::new()) }
    }

    /// Service over the embedded default ruleset and demo roster.
    pub fn with_defaults() -> Self {
        Self::new(default_catalog().clone(), EngineConfig::default(), roster::default_roster().to_vec())
    }

    /// Register a game between two rostered teams.
    pub fn create_game(
        &self,
        game_id: &str,
        home: &str,
        away: &str,
    ) -> Result<GameState, ServiceError> {
        for team in [home, away] {
            if !self.teams.contains_key(team) {
                return Err(ServiceError::UnknownTeam(team.to_string()));
            }
        }
        let state = GameState::new_game(game_id, home, away, self.config.kickoff_spot);
        self.store.insert_game(state.clone());
        self.sessions
            .lock()
            .insert(game_id.to_string(), SessionState::for_roster(&self.roster));
        Ok(state)
    }

    pub fn games(&self) -> Vec<GameSummary> {
        self.store.games()
    }

    pub fn game(&self, game_id: &str) -> Option<GameState> {
        self.store.game(game_id)
    }

    pub fn history(&self, game_id: &str) -> Option<Vec<PlayRecord>> {
        self.store.history(game_id)
    }

    pub fn players(&self) -> &[Player] {
        &self.roster
    }

    /// Session-local condition of one player in one game.
    pub fn player_condition(&self, game_id: &str, player_key: &str) -> Option<PlayerCondition> {
        self.sessions.lock().get(game_id)?.condition(player_key).copied()
    }

    /// Defense's guess at the next call, from the game's current situation.
    pub fn predict_next_play_type<R: Rng>(
        &self,
        game_id: &str,
        rng: &mut R,
    ) -> Result<PlayType, ServiceError> {
        let state = self
            .store
            .game(game_id)
            .ok_or_else(|| ServiceError::UnknownGame(game_id.to_string()))?;
        let history = self.store.history(game_id).unwrap_or_default();
        Ok(predict_play_type(state.down, state.distance, &history, rng))
    }

    /// Resolve one play call and commit it: predict, sample, transition,
    /// append to the ledger — the full request path of a UI submission.
    pub fn run_play<R: Rng>(
        &self,
        game_id: &str,
        call: &PlayCall,
        rng: &mut R,
    ) -> Result<PlayRecord, ServiceError> {
        let state = self
            .store
            .game(game_id)
            .ok_or_else(|| ServiceError::UnknownGame(game_id.to_string()))?;
        let history = self.store.history(game_id).unwrap_or_default();

        let predicted = predict_play_type(state.down, state.distance, &history, rng);

        let offense = self
            .teams
            .get(state.offense_team())
            .ok_or_else(|| ServiceError::UnknownTeam(state.offense_team().to_string()))?;
        let defense = self
            .teams
            .get(state.defense_team())
            .ok_or_else(|| ServiceError::UnknownTeam(state.defense_team().to_string()))?;

        let ctx = PlayContext {
            down: state.down,
            distance: state.distance,
            ball_on: state.ball_on,
            offense,
            defense,
        };

        let outcome = {
            let mut sessions = self.sessions.lock();
            let session = sessions
                .entry(game_id.to_string())
                .or_insert_with(|| SessionState::for_roster(&self.roster));
            let resolver = PlayResolver::new(&self.catalog, &self.config);
            resolver.resolve(call, &ctx, session, rng)?
        };

        let record = self.store.commit_play(game_id, &outcome, predicted)?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn service_with_game() -> GameService {
        let service = GameService::with_defaults();
        service.create_game("g1", "Ironclads", "Monarchs").unwrap();
        service
    }

    #[test]
    fn unknown_team_is_rejected_at_creation() {
        let service = GameService::with_defaults();
        let err = service.create_game("g1", "Ironclads", "Nobody").unwrap_err();
        assert!(matches!(err, ServiceError::UnknownTeam(_)));
    }

    #[test]
    fn run_play_appends_to_the_ledger_and_advances_state() {
        let service = service_with_game();
        let mut rng = StdRng::seed_from_u64(42);

        let record = service.run_play("g1", &PlayCall::run(), &mut rng).unwrap();
        assert_eq!(record.down, 1);
        assert_eq!(record.distance, 10);

        let history = service.history("g1").unwrap();
        assert_eq!(history.len(), 1);
        let state = service.game("g1").unwrap();
        assert_eq!(state.ball_on, record.new_ball_on);
    }

    #[test]
    fn first_play_prediction_defaults_to_run() {
        let service = service_with_game();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(service.predict_next_play_type("g1", &mut rng).unwrap(), PlayType::Run);

        let record = service.run_play("g1", &PlayCall::run(), &mut rng).unwrap();
        assert_eq!(record.defense_predicted, PlayType::Run);
        assert!(record.prediction_correct);
    }

    #[test]
    fn player_conditions_track_per_game_usage() {
        let service = service_with_game();
        let mut rng = StdRng::seed_from_u64(7);
        let record = service
            .run_play(
                "g1",
                &PlayCall { play_type: PlayType::Run, ball_carrier: Some("J. Okafor".to_string()), target_receiver: None },
                &mut rng,
            )
            .unwrap();
        assert_eq!(record.player, "J. Okafor");

        let condition = service.player_condition("g1", "Ironclads/J. Okafor").unwrap();
        assert_eq!(condition.carries, 1);
        assert!(condition.fatigue < 82.0);
    }

    #[test]
    fn unknown_game_is_surfaced_for_plays_and_predictions() {
        let service = GameService::with_defaults();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            service.run_play("missing", &PlayCall::run(), &mut rng),
            Err(ServiceError::UnknownGame(_))
        ));
        assert!(matches!(
            service.predict_next_play_type("missing", &mut rng),
            Err(ServiceError::UnknownGame(_))
        ));
    }

    #[test]
    fn a_seeded_drive_replays_identically() {
        let drive = |seed: u64| {
            let service = service_with_game();
            let mut rng = StdRng::seed_from_u64(seed);
            (0..12)
                .map(|i| {
                    let call = if i % 3 == 0 { PlayCall::pass() } else { PlayCall::run() };
                    let record = service.run_play("g1", &call, &mut rng).unwrap();
                    (record.result, record.yards, record.new_ball_on, record.defense_predicted)
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(drive(99), drive(99));
    }
}
