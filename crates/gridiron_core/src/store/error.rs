use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Lock timeout: game {game_id} is busy, retry the request")]
    LockTimeout { game_id: String },

    #[error("Game not found: {game_id}")]
    GameNotFound { game_id: String },
}

impl StoreError {
    /// Whether the caller should retry the same request.
    pub fn is_recoverable(&self) -> bool {
        match self {
            StoreError::LockTimeout { .. } => true,
            StoreError::GameNotFound { .. } => false,
        }
    }
}
