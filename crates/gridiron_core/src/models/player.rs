//! Roster schema and per-session player condition.
//!
//! Ratings use the sheet's 0-100 scale. `PlayerCondition` (carries, fatigue)
//! is deliberately kept out of `Player`: it is session state, owned by a
//! [`SessionState`] table keyed by player id, so resolving a play never
//! mutates the shared roster records.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Offensive/defensive roster slot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    QB,
    RB,
    FB,
    WR,
    TE,
    OL,
    DL,
    LB,
    CB,
    S,
    K,
}

impl Position {
    pub fn is_ball_carrier(&self) -> bool {
        matches!(self, Position::RB | Position::FB)
    }

    pub fn is_receiver(&self) -> bool {
        matches!(self, Position::WR | Position::TE | Position::RB)
    }

    pub fn is_line(&self) -> bool {
        matches!(self, Position::OL)
    }
}

/// Defensive personnel group used by the tackle distribution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum DefenseGroup {
    DL,
    LB,
    DBS,
}

impl DefenseGroup {
    pub fn contains(&self, position: Position) -> bool {
        match self {
            DefenseGroup::DL => matches!(position, Position::DL),
            DefenseGroup::LB => matches!(position, Position::LB),
            DefenseGroup::DBS => matches!(position, Position::CB | Position::S),
        }
    }
}

/// Per-skill ratings, offense and defense, 0-100.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerAttributes {
    pub size: u8,
    pub strength: u8,
    pub speed: u8,
    pub stamina: u8,
    pub poise: u8,
    pub accuracy: u8,
    pub arm_strength: u8,
    pub read_defense: u8,
    pub juke: u8,
    pub vision: u8,
    pub acceleration: u8,
    pub route_running: u8,
    pub jump: u8,
    pub hands: u8,
    pub qb_favorite: u8,
    pub run_blocking: u8,
    pub pass_protect: u8,
    pub run_stop: u8,
    pub tackling: u8,
    pub run_defense: u8,
    pub tackle_chance: u8,
    pub strip: u8,
    pub pass_rush: u8,
    pub sack_chance: u8,
    pub ball_hawk: u8,
    pub read_qb: u8,
    pub coverage: u8,
}

const DEFAULT_RATING: u8 = 50;

impl Default for PlayerAttributes {
    fn default() -> Self {
        Self {
            size: DEFAULT_RATING,
            strength: DEFAULT_RATING,
            speed: DEFAULT_RATING,
            stamina: DEFAULT_RATING,
            poise: DEFAULT_RATING,
            accuracy: DEFAULT_RATING,
            arm_strength: DEFAULT_RATING,
            read_defense: DEFAULT_RATING,
            juke: DEFAULT_RATING,
            vision: DEFAULT_RATING,
            acceleration: DEFAULT_RATING,
            route_running: DEFAULT_RATING,
            jump: DEFAULT_RATING,
            hands: DEFAULT_RATING,
            qb_favorite: DEFAULT_RATING,
            run_blocking: DEFAULT_RATING,
            pass_protect: DEFAULT_RATING,
            run_stop: DEFAULT_RATING,
            tackling: DEFAULT_RATING,
            run_defense: DEFAULT_RATING,
            tackle_chance: DEFAULT_RATING,
            strip: DEFAULT_RATING,
            pass_rush: DEFAULT_RATING,
            sack_chance: DEFAULT_RATING,
            ball_hawk: DEFAULT_RATING,
            read_qb: DEFAULT_RATING,
            coverage: DEFAULT_RATING,
        }
    }
}

/// Average of two ratings, the gate used for breakaway eligibility and the
/// quarterback's pressure window.
pub fn average(a: u8, b: u8) -> f64 {
    (a as f64 + b as f64) / 2.0
}

/// One roster record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub team: String,
    pub name: String,
    pub position: Position,
    /// Defensive group slot; players without one never show up in tackle
    /// candidate lists.
    #[serde(default)]
    pub def_position: Option<Position>,
    #[serde(default)]
    pub off_stars: u8,
    #[serde(default)]
    pub def_stars: u8,
    #[serde(default)]
    pub attributes: PlayerAttributes,
}

impl Player {
    /// Stable session key. Team qualifies the name so two-team rosters can
    /// reuse common surnames.
    pub fn key(&self) -> String {
        format!("{}/{}", self.team, self.name)
    }

    pub fn in_group(&self, group: DefenseGroup) -> bool {
        self.def_position.map(|p| group.contains(p)).unwrap_or(false)
    }
}

/// Session-local mutable state of one player.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PlayerCondition {
    pub carries: u32,
    pub fatigue: f64,
}

/// Per-session player-state table keyed by [`Player::key`].
///
/// Passed mutably into play resolution; fatigue starts at the stamina rating
/// and is drained by the stamina-cost map, carries count handoffs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    conditions: HashMap<String, PlayerCondition>,
}

impl SessionState {
    /// Seed conditions for a roster: fatigue = stamina rating, zero carries.
    pub fn for_roster(players: &[Player]) -> Self {
        let conditions = players
            .iter()
            .map(|p| {
                (
                    p.key(),
                    PlayerCondition { carries: 0, fatigue: p.attributes.stamina as f64 },
                )
            })
            .collect();
        Self { conditions }
    }

    pub fn condition(&self, key: &str) -> Option<&PlayerCondition> {
        self.conditions.get(key)
    }

    /// Drain fatigue (floored at zero) and optionally count a carry.
    pub fn apply_drain(&mut self, key: &str, drain: f64, counts_as_carry: bool) {
        let entry = self
            .conditions
            .entry(key.to_string())
            .or_insert(PlayerCondition { carries: 0, fatigue: 0.0 });
        entry.fatigue = (entry.fatigue - drain).max(0.0);
        if counts_as_carry {
            entry.carries += 1;
        }
    }
}
