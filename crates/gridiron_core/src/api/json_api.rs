//! JSON API over the service façade.
//!
//! Requests carry a schema version and an explicit seed; the seed drives a
//! ChaCha8 stream, so replaying a request byte-for-byte replays the outcome.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::service::GameService;
use crate::models::play::{PlayCall, PlayRecord, PlayType};

pub const SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Deserialize)]
pub struct PlayRequest {
    pub schema_version: u8,
    pub seed: u64,
    pub game_id: String,
    /// "Run" or "Pass"
    pub play_type: String,
    #[serde(default)]
    pub ball_carrier: Option<String>,
    #[serde(default)]
    pub target_receiver: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlayResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<PlayRecord>,
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub schema_version: u8,
    pub seed: u64,
    pub game_id: String,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted: Option<PlayType>,
}

/// Resolve and commit one play from a JSON request.
pub fn resolve_play_json(service: &GameService, request_json: &str) -> String {
    let response = match handle_play(service, request_json) {
        Ok(record) => PlayResponse { success: true, error: None, record: Some(record) },
        Err(message) => PlayResponse { success: false, error: Some(message), record: None },
    };
    serde_json::to_string(&response)
        .unwrap_or_else(|e| format!("{{\"success\":false,\"error\":\"{}\"}}", e))
}

/// Tendency query from a JSON request.
pub fn predict_json(service: &GameService, request_json: &str) -> String {
    let response = match handle_predict(service, request_json) {
        Ok(predicted) => {
            PredictResponse { success: true, error: None, predicted: Some(predicted) }
        }
        Err(message) => PredictResponse { success: false, error: Some(message), predicted: None },
    };
    serde_json::to_string(&response)
        .unwrap_or_else(|e| format!("{{\"success\":false,\"error\":\"{}\"}}", e))
}

fn handle_play(service: &GameService, request_json: &str) -> Result<PlayRecord, String> {
    let request: PlayRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid request: {}", e))?;
    check_schema(request.schema_version)?;

    let play_type = parse_play_type(&request.play_type)?;
    let call = PlayCall {
        play_type,
        ball_carrier: request.ball_carrier,
        target_receiver: request.target_receiver,
    };

    let mut rng = ChaCha8Rng::seed_from_u64(request.seed);
    service.run_play(&request.game_id, &call, &mut rng).map_err(|e| e.to_string())
}

fn handle_predict(service: &GameService, request_json: &str) -> Result<PlayType, String> {
    let request: PredictRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid request: {}", e))?;
    check_schema(request.schema_version)?;

    let mut rng = ChaCha8Rng::seed_from_u64(request.seed);
    service.predict_next_play_type(&request.game_id, &mut rng).map_err(|e| e.to_string())
}

fn check_schema(version: u8) -> Result<(), String> {
    if version != SCHEMA_VERSION {
        return Err(format!("Unsupported schema_version {}, expected {}", version, SCHEMA_VERSION));
    }
    Ok(())
}

fn parse_play_type(raw: &str) -> Result<PlayType, String> {
    match raw {
        "Run" => Ok(PlayType::Run),
        "Pass" => Ok(PlayType::Pass),
        other => Err(format!("Unknown play_type: {}", other)),
    }
}
