//! Engine tuning parameters.
//!
//! Every cutoff the resolution pipelines compare against lives here as a
//! named field, so rulesets can override them without touching pipeline code.

use serde::{Deserialize, Serialize};

/// Tunable thresholds and scales for play resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Run game ===
    /// avg(speed, acceleration) a carrier must exceed to cash a breakaway
    /// (default: 80.0)
    pub breakaway_cutoff: f64,
    /// How strongly the carrier-vs-front rating gap shifts yardage inside the
    /// sampled range, as a fraction of the range span (default: 0.4)
    pub run_attribute_bias: f64,
    /// Base strip/fumble chance in percent (default: 1.0)
    pub fumble_base_pct: f64,
    /// Percent added per rating point of best-strip minus carrier poise
    /// (default: 0.03)
    pub fumble_rating_scale: f64,
    /// Hard ceiling on the strip chance in percent (default: 5.0)
    pub fumble_max_pct: f64,

    // === Pass game ===
    /// Seconds of protection every pocket starts with (default: 2.2)
    pub base_pressure_window: f64,
    /// Extra seconds at 100 avg(read_defense, accuracy) (default: 1.0)
    pub awareness_window_bonus: f64,
    /// Extra seconds at 100 mean line pass_protect (default: 0.8)
    pub protection_window_bonus: f64,
    /// Seconds removed at 100 best pass_rush (default: 1.4)
    pub pass_rush_window_penalty: f64,
    /// route_running minus coverage at or below this is a tight window
    /// (default: -12.0)
    pub tight_separation_margin: f64,
    /// route_running minus coverage at or above this is an open receiver
    /// (default: 10.0)
    pub open_separation_margin: f64,
    /// Floor of the adjusted completion percentage (default: 5.0)
    pub completion_floor_pct: f64,
    /// Ceiling of the adjusted completion percentage (default: 97.0)
    pub completion_ceiling_pct: f64,
    /// Width in percent of the interception tail at 50 best ball_hawk
    /// (default: 3.0)
    pub interception_tail_pct: f64,
    /// Tail percent added per rating point of best ball_hawk above 50
    /// (default: 0.04)
    pub ball_hawk_tail_scale: f64,

    // === Game flow ===
    /// Points for reaching the opponent goal line (default: 7)
    pub touchdown_points: u32,
    /// Yard line a new possession starts from after a score (default: 25)
    pub kickoff_spot: u32,
    /// Clock runoff for a run play in seconds (default: 35)
    pub run_clock_seconds: u32,
    /// Clock runoff for a completed pass in seconds (default: 28)
    pub pass_clock_seconds: u32,
    /// Clock runoff when the clock stops early, e.g. incompletion
    /// (default: 8)
    pub stopped_clock_seconds: u32,

    // === Store ===
    /// Bound on waiting for a game's exclusive write section, in seconds
    /// (default: 30)
    pub lock_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            breakaway_cutoff: 80.0,
            run_attribute_bias: 0.4,
            fumble_base_pct: 1.0,
            fumble_rating_scale: 0.03,
            fumble_max_pct: 5.0,

            base_pressure_window: 2.2,
            awareness_window_bonus: 1.0,
            protection_window_bonus: 0.8,
            pass_rush_window_penalty: 1.4,
            tight_separation_margin: -12.0,
            open_separation_margin: 10.0,
            completion_floor_pct: 5.0,
            completion_ceiling_pct: 97.0,
            interception_tail_pct: 3.0,
            ball_hawk_tail_scale: 0.04,

            touchdown_points: 7,
            kickoff_spot: 25,
            run_clock_seconds: 35,
            pass_clock_seconds: 28,
            stopped_clock_seconds: 8,

            lock_timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_overrides_keep_remaining_defaults() {
        let config: EngineConfig =
            serde_yaml::from_str("breakaway_cutoff: 85.0\ntouchdown_points: 6\n").unwrap();
        assert_eq!(config.breakaway_cutoff, 85.0);
        assert_eq!(config.touchdown_points, 6);
        assert_eq!(config.kickoff_spot, EngineConfig::default().kickoff_spot);
    }
}
