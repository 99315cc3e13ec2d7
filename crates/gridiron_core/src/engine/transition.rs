//! Down, distance, spot, and possession transitions.
//!
//! `advance_down` is the bare transition law; `field_result` layers the
//! situational rules on top of it (goal line, turnover spots, turnover on
//! downs) and reports everything the store needs to fold a play into game
//! state.

use super::config::EngineConfig;
use crate::models::game::{FIELD_LENGTH, FIRST_DOWN_DISTANCE};
use crate::models::play::ResultKind;

/// Down/distance transition law.
///
/// A gain covering the distance-to-go resets to 1st & 10; anything else
/// increments the down and shrinks the distance, floored at zero. The down
/// may come back as 5, which `field_result` turns into a turnover on downs.
pub fn advance_down(down: u8, distance: u32, gain: i32) -> (u8, u32) {
    if gain >= distance as i32 {
        (1, FIRST_DOWN_DISTANCE)
    } else {
        let remaining = (distance as i32 - gain).max(0) as u32;
        (down + 1, remaining)
    }
}

/// Dead-ball spot after a gain, clamped to the field.
pub fn resolve_spot(ball_on: u32, yards: i32) -> u32 {
    (ball_on as i32 + yards).clamp(0, FIELD_LENGTH as i32) as u32
}

/// Field-position consequences of one resolved play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldResult {
    pub new_down: u8,
    pub new_distance: u32,
    pub new_ball_on: u32,
    pub possession_flips: bool,
    pub touchdown: bool,
    pub points: u32,
}

/// Apply the situational rules for a play that gained `yards` from `ball_on`.
///
/// `turnover_spot` carries the interception catch spot or fumble recovery
/// spot (offense perspective); it is ignored for every other result kind.
pub fn field_result(
    kind: ResultKind,
    down: u8,
    distance: u32,
    ball_on: u32,
    yards: i32,
    turnover_spot: Option<u32>,
    config: &EngineConfig,
) -> FieldResult {
    if kind.is_turnover() {
        let spot = turnover_spot.unwrap_or_else(|| resolve_spot(ball_on, yards));
        return change_of_possession(FIELD_LENGTH - spot.min(FIELD_LENGTH), false, 0);
    }

    let spot = resolve_spot(ball_on, yards);
    if spot >= FIELD_LENGTH {
        // Touchdown; the next possession starts from the kickoff spot.
        return FieldResult {
            new_down: 1,
            new_distance: FIRST_DOWN_DISTANCE,
            new_ball_on: config.kickoff_spot,
            possession_flips: true,
            touchdown: true,
            points: config.touchdown_points,
        };
    }

    let (new_down, new_distance) = advance_down(down, distance, yards);
    if new_down > 4 {
        // Turnover on downs at the dead-ball spot.
        return change_of_possession(FIELD_LENGTH - spot, false, 0);
    }

    FieldResult {
        new_down,
        new_distance: goal_to_go_clamp(new_distance, spot),
        new_ball_on: spot,
        possession_flips: false,
        touchdown: false,
        points: 0,
    }
}

fn change_of_possession(new_ball_on: u32, touchdown: bool, points: u32) -> FieldResult {
    FieldResult {
        new_down: 1,
        new_distance: goal_to_go_clamp(FIRST_DOWN_DISTANCE, new_ball_on),
        new_ball_on,
        possession_flips: true,
        touchdown,
        points,
    }
}

fn goal_to_go_clamp(distance: u32, ball_on: u32) -> u32 {
    distance.min(FIELD_LENGTH - ball_on)
}
