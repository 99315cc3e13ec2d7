//! # gridiron_core - Play-by-Play Football Simulation Engine
//!
//! Table-driven resolution of American football plays: weighted distribution
//! tables plus player ratings turn a play call into a concrete outcome, a
//! per-game store applies each outcome atomically, and a tendency predictor
//! guesses the offense's next call from its play history.
//!
//! ## Features
//! - Deterministic resolution (injected RNG: same seed = same drive)
//! - Typed ruleset schema, loaded by section identity
//! - Per-game serialized commits with a bounded lock wait
//! - JSON API for easy integration with UI hosts

pub mod api;
pub mod data;
pub mod engine;
pub mod error;
pub mod models;
pub mod predictor;
pub mod store;

pub use api::{predict_json, resolve_play_json, GameService, ServiceError};
pub use data::{default_catalog, TableCatalog, WeightedTable};
pub use engine::{advance_down, EngineConfig, PlayContext, PlayResolver};
pub use error::{ConfigError, EngineError, Result};
pub use models::{
    GameState, GameSummary, PlayCall, PlayOutcome, PlayRecord, PlayType, Player, Possession,
    ResultKind, SessionState,
};
pub use predictor::predict_play_type;
pub use store::{GameStore, StoreError};
