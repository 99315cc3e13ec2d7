//! Roster loading.
//!
//! Rosters are YAML documents with one record per player; rows without a
//! team identifier are dropped, the way the source sheet skips blank lines.

use std::sync::OnceLock;

use serde::Deserialize;

use crate::data::embedded::DEFAULT_ROSTER_YAML;
use crate::error::ConfigError;
use crate::models::player::Player;

#[derive(Debug, Deserialize)]
struct RosterFile {
    players: Vec<Player>,
}

/// Parse a roster document, keeping only rows with a non-empty team.
pub fn roster_from_yaml(source: &str) -> Result<Vec<Player>, ConfigError> {
    let file: RosterFile = serde_yaml::from_str(source)?;
    Ok(file.players.into_iter().filter(|p| !p.team.trim().is_empty()).collect())
}

static DEFAULT_ROSTER: OnceLock<Vec<Player>> = OnceLock::new();

/// Roster built from the embedded demo file.
///
/// # Panics
///
/// Panics if the embedded YAML fails to parse (compile-time data; does not
/// happen in a normal build).
pub fn default_roster() -> &'static [Player] {
    DEFAULT_ROSTER
        .get_or_init(|| {
            roster_from_yaml(DEFAULT_ROSTER_YAML).expect("Failed to parse data/roster.yaml")
        })
        .as_slice()
}

/// Players on the given team, in roster order.
pub fn team_players<'a>(roster: &'a [Player], team: &str) -> Vec<&'a Player> {
    roster.iter().filter(|p| p.team == team).collect()
}
