pub mod json_api;
pub mod service;

pub use json_api::{predict_json, resolve_play_json, PlayRequest, PlayResponse, SCHEMA_VERSION};
pub use service::{GameService, ServiceError};
