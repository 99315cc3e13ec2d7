//! Per-game durable record.
//!
//! Yard lines are measured from the offense's own goal line: 0 is the
//! offense's goal line, 100 the opponent's. A possession flip therefore maps
//! the spot `s` to `100 - s`.

use serde::{Deserialize, Serialize};

pub const QUARTER_SECONDS: u32 = 900;
pub const QUARTERS: u8 = 4;
pub const FIELD_LENGTH: u32 = 100;
pub const FIRST_DOWN_DISTANCE: u32 = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Possession {
    Home,
    Away,
}

impl Possession {
    pub fn flipped(&self) -> Possession {
        match self {
            Possession::Home => Possession::Away,
            Possession::Away => Possession::Home,
        }
    }
}

/// One game's mutable record: the single-writer aggregate of the store.
///
/// Scores are monotonically non-decreasing; every field transition happens
/// inside the commit transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameState {
    pub id: String,
    pub home: String,
    pub away: String,
    pub home_score: u32,
    pub away_score: u32,
    pub quarter: u8,
    pub clock_seconds: u32,
    pub down: u8,
    pub distance: u32,
    pub ball_on: u32,
    pub possession: Possession,
    pub drive_start: u32,
    /// Free-text summary of the previous play, shown on the scoreboard.
    pub previous: String,
    #[serde(default)]
    pub home_logo: Option<String>,
    #[serde(default)]
    pub away_logo: Option<String>,
}

impl GameState {
    /// Opening state: 1st & 10 at the kickoff spot, full first-quarter clock.
    pub fn new_game(
        id: impl Into<String>,
        home: impl Into<String>,
        away: impl Into<String>,
        kickoff_spot: u32,
    ) -> Self {
        Self {
            id: id.into(),
            home: home.into(),
            away: away.into(),
            home_score: 0,
            away_score: 0,
            quarter: 1,
            clock_seconds: QUARTER_SECONDS,
            down: 1,
            distance: FIRST_DOWN_DISTANCE,
            ball_on: kickoff_spot,
            possession: Possession::Home,
            drive_start: kickoff_spot,
            previous: String::new(),
            home_logo: None,
            away_logo: None,
        }
    }

    /// Team currently on offense.
    pub fn offense_team(&self) -> &str {
        match self.possession {
            Possession::Home => &self.home,
            Possession::Away => &self.away,
        }
    }

    /// Team currently on defense.
    pub fn defense_team(&self) -> &str {
        match self.possession {
            Possession::Home => &self.away,
            Possession::Away => &self.home,
        }
    }
}

/// Scoreboard line for game lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameSummary {
    pub game_id: String,
    pub home: String,
    pub away: String,
    pub home_score: u32,
    pub away_score: u32,
    pub quarter: u8,
    pub clock_seconds: u32,
    pub down: u8,
    pub distance: u32,
    pub ball_on: u32,
    pub possession: Possession,
    pub home_logo: Option<String>,
    pub away_logo: Option<String>,
}

impl From<&GameState> for GameSummary {
    fn from(state: &GameState) -> Self {
        Self {
            game_id: state.id.clone(),
            home: state.home.clone(),
            away: state.away.clone(),
            home_score: state.home_score,
            away_score: state.away_score,
            quarter: state.quarter,
            clock_seconds: state.clock_seconds,
            down: state.down,
            distance: state.distance,
            ball_on: state.ball_on,
            possession: state.possession,
            home_logo: state.home_logo.clone(),
            away_logo: state.away_logo.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_opens_first_and_ten() {
        let state = GameState::new_game("g1", "Ironclads", "Monarchs", 25);
        assert_eq!(state.down, 1);
        assert_eq!(state.distance, 10);
        assert_eq!(state.ball_on, 25);
        assert_eq!(state.drive_start, 25);
        assert_eq!(state.quarter, 1);
        assert_eq!(state.clock_seconds, QUARTER_SECONDS);
        assert_eq!(state.offense_team(), "Ironclads");
    }

    #[test]
    fn possession_flip_swaps_sides() {
        let mut state = GameState::new_game("g1", "Ironclads", "Monarchs", 25);
        state.possession = state.possession.flipped();
        assert_eq!(state.offense_team(), "Monarchs");
        assert_eq!(state.defense_team(), "Ironclads");
    }
}
