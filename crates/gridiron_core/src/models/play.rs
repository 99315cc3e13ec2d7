//! Play calls, resolved outcomes, and history ledger entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::game::Possession;

/// Offensive call submitted by the UI.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PlayType {
    Run,
    Pass,
}

impl fmt::Display for PlayType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlayType::Run => write!(f, "Run"),
            PlayType::Pass => write!(f, "Pass"),
        }
    }
}

/// A play call: the type plus optional named principals. When a name is
/// omitted the resolver picks the default at that slot (featured back,
/// favorite receiver).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayCall {
    pub play_type: PlayType,
    #[serde(default)]
    pub ball_carrier: Option<String>,
    #[serde(default)]
    pub target_receiver: Option<String>,
}

impl PlayCall {
    pub fn run() -> Self {
        Self { play_type: PlayType::Run, ball_carrier: None, target_receiver: None }
    }

    pub fn pass() -> Self {
        Self { play_type: PlayType::Pass, ball_carrier: None, target_receiver: None }
    }
}

/// Terminal classification of a resolved play.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ResultKind {
    Run,
    Completion,
    Incompletion,
    Sack,
    Interception,
    Fumble,
}

impl ResultKind {
    pub fn is_turnover(&self) -> bool {
        matches!(self, ResultKind::Interception | ResultKind::Fumble)
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            ResultKind::Run => "Run",
            ResultKind::Completion => "Completion",
            ResultKind::Incompletion => "Incompletion",
            ResultKind::Sack => "Sack",
            ResultKind::Interception => "Interception",
            ResultKind::Fumble => "Fumble",
        };
        write!(f, "{}", text)
    }
}

/// Fully-specified result of one play, before it is folded into game state.
///
/// `new_down` / `new_distance` / `new_ball_on` are from the perspective of
/// whichever team has the ball after the play; `possession_flips` says
/// whether that is still the snapping team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayOutcome {
    pub play_type: PlayType,
    /// Primary offensive player: ball carrier, or targeted receiver, or the
    /// sacked/intercepted quarterback.
    pub player: String,
    pub yards_gained: i32,
    pub result: ResultKind,
    pub tackler: Option<String>,
    pub receiver: Option<String>,
    pub new_down: u8,
    pub new_distance: u32,
    pub new_ball_on: u32,
    pub turnover: bool,
    pub touchdown: bool,
    /// Points scored by the offense on this play.
    pub points: u32,
    pub clock_runoff: u32,
    pub description: String,
}

/// Append-only history ledger entry: one row per resolved play.
///
/// Created once inside the commit transaction, never mutated or deleted.
/// `down` / `distance` / `ball_on` are the *before* snapshot; the `new_*`
/// fields are the *after* snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayRecord {
    pub game_id: String,
    pub timestamp: DateTime<Utc>,
    pub quarter: u8,
    pub clock_seconds: u32,
    pub possession: Possession,
    pub down: u8,
    pub distance: u32,
    pub ball_on: u32,
    pub play_type: PlayType,
    pub player: String,
    pub yards: i32,
    pub defense_predicted: PlayType,
    pub prediction_correct: bool,
    pub tackler: Option<String>,
    pub result: ResultKind,
    pub description: String,
    pub new_down: u8,
    pub new_distance: u32,
    pub new_ball_on: u32,
    pub drive_start: u32,
    pub home_score: u32,
    pub away_score: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turnover_kinds() {
        assert!(ResultKind::Interception.is_turnover());
        assert!(ResultKind::Fumble.is_turnover());
        assert!(!ResultKind::Sack.is_turnover());
        assert!(!ResultKind::Incompletion.is_turnover());
    }

    #[test]
    fn play_call_defaults_leave_principals_open() {
        let call = PlayCall::run();
        assert_eq!(call.play_type, PlayType::Run);
        assert!(call.ball_carrier.is_none());
        assert!(call.target_receiver.is_none());
    }
}
