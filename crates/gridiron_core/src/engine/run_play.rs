//! Run-play resolution pipeline.
//!
//! Sample a run type for the base yardage range, lean the result toward the
//! top or bottom of that range with the carrier-vs-front rating gap, then
//! settle the breakaway bonus, a possible strip, and the tackler.

use rand::Rng;

use super::best_by;
use super::config::EngineConfig;
use crate::data::catalog::TableCatalog;
use crate::error::{EngineError, Result};
use crate::models::play::PlayCall;
use crate::models::player::{average, DefenseGroup, Player};

/// Intermediate result of the run pipeline, before field-position rules.
#[derive(Debug, Clone)]
pub struct RunResolution {
    pub carrier_name: String,
    pub carrier_key: String,
    pub style_label: String,
    pub yards: i32,
    pub breakaway: bool,
    pub fumbled: bool,
    pub tackler: Option<String>,
}

pub fn resolve_run<R: Rng>(
    catalog: &TableCatalog,
    config: &EngineConfig,
    call: &PlayCall,
    offense: &[Player],
    defense: &[Player],
    rng: &mut R,
) -> Result<RunResolution> {
    let carrier = pick_carrier(call, offense)?;

    let style = catalog.run_types.sample(rng);
    let range = style.payload.range;
    let base = range.roll(rng);

    // Carrier speed/vision pulls toward the top of the range, the front's
    // run-stop pulls toward the bottom.
    let offense_factor = average(carrier.attributes.speed, carrier.attributes.vision);
    let defense_factor = front_run_stop(defense);
    let shift =
        (offense_factor - defense_factor) / 100.0 * range.span() as f64 * config.run_attribute_bias;
    let mut yards =
        (base + shift.round() as i32).clamp(range.min_yards, range.max_yards);

    let mut breakaway = false;
    if style.payload.breakaway_eligible
        && average(carrier.attributes.speed, carrier.attributes.acceleration)
            > config.breakaway_cutoff
    {
        let bonus = catalog.breakaways.sample(rng).payload.roll(rng);
        yards += bonus;
        breakaway = true;
    }

    let stripper = best_by(defense.iter(), |p| p.attributes.strip);
    let fumbled = match stripper {
        Some(stripper) => {
            let gap =
                stripper.attributes.strip as f64 - carrier.attributes.poise as f64;
            let chance = (config.fumble_base_pct + gap * config.fumble_rating_scale)
                .clamp(0.0, config.fumble_max_pct);
            rng.gen_range(0.0..100.0) < chance
        }
        None => false,
    };

    let tackler = if fumbled {
        stripper.map(|p| p.name.clone())
    } else {
        pick_tackler(catalog, defense, yards, rng)
    };

    Ok(RunResolution {
        carrier_name: carrier.name.clone(),
        carrier_key: carrier.key(),
        style_label: style.label.clone(),
        yards,
        breakaway,
        fumbled,
        tackler,
    })
}

/// Named carrier if the call supplies one, otherwise the featured back.
fn pick_carrier<'a>(call: &PlayCall, offense: &'a [Player]) -> Result<&'a Player> {
    if let Some(name) = &call.ball_carrier {
        return offense
            .iter()
            .find(|p| &p.name == name)
            .ok_or_else(|| EngineError::MissingPlayer(format!("ball carrier {}", name)));
    }
    best_by(offense.iter().filter(|p| p.position.is_ball_carrier()), |p| p.off_stars)
        .or_else(|| best_by(offense.iter(), |p| p.attributes.speed))
        .ok_or_else(|| EngineError::MissingPlayer("offense has no ball carrier".to_string()))
}

/// Mean run-stop across the defensive front (DL + LB groups).
fn front_run_stop(defense: &[Player]) -> f64 {
    let front: Vec<f64> = defense
        .iter()
        .filter(|p| p.in_group(DefenseGroup::DL) || p.in_group(DefenseGroup::LB))
        .map(|p| p.attributes.run_stop as f64)
        .collect();
    if front.is_empty() {
        // No front personnel listed; treat the whole unit as the front.
        let all: Vec<f64> = defense.iter().map(|p| p.attributes.run_stop as f64).collect();
        return all.iter().sum::<f64>() / all.len() as f64;
    }
    front.iter().sum::<f64>() / front.len() as f64
}

/// Tackle distribution keyed by gained yardage: weighted group pick, then the
/// best tackler within the group, first listed on ties.
pub(super) fn pick_tackler<R: Rng>(
    catalog: &TableCatalog,
    defense: &[Player],
    yards: i32,
    rng: &mut R,
) -> Option<String> {
    let group = catalog.tackle_bucket_for(yards).sample_group(rng);
    let in_group = best_by(defense.iter().filter(|p| p.in_group(group)), |p| {
        p.attributes.tackling
    });
    in_group
        .or_else(|| best_by(defense.iter(), |p| p.attributes.tackling))
        .map(|p| p.name.clone())
}
