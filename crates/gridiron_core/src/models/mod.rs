pub mod game;
pub mod play;
pub mod player;

pub use game::{GameState, GameSummary, Possession};
pub use play::{PlayCall, PlayOutcome, PlayRecord, PlayType, ResultKind};
pub use player::{DefenseGroup, Player, PlayerAttributes, PlayerCondition, Position, SessionState};
