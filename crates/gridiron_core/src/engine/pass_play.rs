//! Pass-play resolution pipeline.
//!
//! Route selection is constrained by the remaining field, the pocket is a
//! time budget the sampled throw has to fit inside, and the completion roll
//! is a single threshold with an interception tail reserved at the top of
//! the failure region.

use rand::Rng;

use super::best_by;
use super::config::EngineConfig;
use super::run_play::pick_tackler;
use crate::data::catalog::{Separation, TableCatalog, YardRange};
use crate::data::distribution::WeightedTable;
use crate::error::{EngineError, Result};
use crate::models::game::FIELD_LENGTH;
use crate::models::play::{PlayCall, ResultKind};
use crate::models::player::{average, DefenseGroup, Player};

/// Intermediate result of the pass pipeline, before field-position rules.
#[derive(Debug, Clone)]
pub struct PassResolution {
    pub qb_name: String,
    pub qb_key: String,
    pub receiver_name: Option<String>,
    pub route_label: String,
    pub kind: ResultKind,
    pub yards: i32,
    /// Depth of the throw; the interception spot when the ball is picked.
    pub air_yards: i32,
    pub separation: Separation,
    pub tackler: Option<String>,
}

pub fn resolve_pass<R: Rng>(
    catalog: &TableCatalog,
    config: &EngineConfig,
    call: &PlayCall,
    ball_on: u32,
    offense: &[Player],
    defense: &[Player],
    rng: &mut R,
) -> Result<PassResolution> {
    let qb = offense
        .iter()
        .find(|p| matches!(p.position, crate::models::player::Position::QB))
        .ok_or_else(|| EngineError::MissingPlayer("offense has no quarterback".to_string()))?;
    let receiver = pick_receiver(call, qb, offense)?;

    let remaining = (FIELD_LENGTH - ball_on) as i32;
    let (route_label, route_range) = pick_route(catalog, remaining, rng)?;
    let air_yards = route_range.roll(rng).min(remaining);

    // Pocket check: the sampled throw has to get off inside the window the
    // protection and the rush leave the quarterback.
    let time_needed = catalog.throw_time_for(air_yards);
    if time_needed > pressure_window(config, qb, offense, defense) {
        let loss = catalog.sack_loss.sample(rng).payload.roll(rng);
        return Ok(PassResolution {
            qb_name: qb.name.clone(),
            qb_key: qb.key(),
            receiver_name: None,
            route_label,
            kind: ResultKind::Sack,
            yards: -loss.min(ball_on as i32),
            air_yards: 0,
            separation: Separation::Tight,
            tackler: best_rusher(defense).map(|p| p.name.clone()),
        });
    }

    let separation = separation_bucket(config, receiver, defense);
    let base_pct = catalog.completion_pct_for(air_yards);
    let completion_pct = (base_pct + catalog.separation_adjust.for_bucket(separation))
        .clamp(config.completion_floor_pct, config.completion_ceiling_pct);

    let hawk = best_by(defense.iter(), |p| p.attributes.ball_hawk)
        .map(|p| p.attributes.ball_hawk as f64)
        .unwrap_or(0.0);
    let tail = (config.interception_tail_pct + (hawk - 50.0) * config.ball_hawk_tail_scale)
        .max(0.0)
        .min(100.0 - completion_pct);

    let roll = rng.gen_range(0.0..100.0);
    if roll < completion_pct {
        let yac = catalog.yac_table(separation).sample(rng).payload.roll(rng);
        let yards = (air_yards + yac).min(remaining);
        let tackler = pick_tackler(catalog, defense, yards, rng);
        Ok(PassResolution {
            qb_name: qb.name.clone(),
            qb_key: qb.key(),
            receiver_name: Some(receiver.name.clone()),
            route_label,
            kind: ResultKind::Completion,
            yards,
            air_yards,
            separation,
            tackler,
        })
    } else if roll >= 100.0 - tail {
        Ok(PassResolution {
            qb_name: qb.name.clone(),
            qb_key: qb.key(),
            receiver_name: Some(receiver.name.clone()),
            route_label,
            kind: ResultKind::Interception,
            yards: 0,
            air_yards,
            separation,
            tackler: None,
        })
    } else {
        Ok(PassResolution {
            qb_name: qb.name.clone(),
            qb_key: qb.key(),
            receiver_name: Some(receiver.name.clone()),
            route_label,
            kind: ResultKind::Incompletion,
            yards: 0,
            air_yards,
            separation,
            tackler: None,
        })
    }
}

/// Named target if the call supplies one, otherwise the quarterback's
/// favorite among eligible receivers.
fn pick_receiver<'a>(
    call: &PlayCall,
    qb: &Player,
    offense: &'a [Player],
) -> Result<&'a Player> {
    if let Some(name) = &call.target_receiver {
        return offense
            .iter()
            .find(|p| &p.name == name)
            .ok_or_else(|| EngineError::MissingPlayer(format!("receiver {}", name)));
    }
    best_by(
        offense.iter().filter(|p| p.position.is_receiver() && p.name != qb.name),
        |p| p.attributes.qb_favorite,
    )
    .ok_or_else(|| EngineError::MissingPlayer("offense has no receivers".to_string()))
}

/// Weighted route pick among routes whose required depth fits the remaining
/// field; near the goal line, when nothing fits, the shallowest route is
/// forced.
fn pick_route<R: Rng>(
    catalog: &TableCatalog,
    remaining: i32,
    rng: &mut R,
) -> Result<(String, YardRange)> {
    let eligible: Vec<(String, f64, YardRange)> = catalog
        .routes
        .entries()
        .iter()
        .filter(|e| e.payload.min_yards <= remaining)
        .map(|e| (e.label.clone(), e.roll_max - e.roll_min, e.payload))
        .collect();

    if eligible.is_empty() {
        let shallowest = catalog
            .routes
            .entries()
            .iter()
            .min_by_key(|e| e.payload.min_yards)
            .expect("routes table is never empty");
        return Ok((shallowest.label.clone(), shallowest.payload));
    }

    let table = WeightedTable::build("eligible_routes", eligible)
        .map_err(EngineError::Config)?;
    let entry = table.sample(rng);
    Ok((entry.label.clone(), entry.payload))
}

/// Seconds of pocket time for this snap.
fn pressure_window(
    config: &EngineConfig,
    qb: &Player,
    offense: &[Player],
    defense: &[Player],
) -> f64 {
    let awareness = average(qb.attributes.read_defense, qb.attributes.accuracy);
    let line: Vec<f64> = offense
        .iter()
        .filter(|p| p.position.is_line())
        .map(|p| p.attributes.pass_protect as f64)
        .collect();
    let protection = if line.is_empty() {
        0.0
    } else {
        line.iter().sum::<f64>() / line.len() as f64
    };
    let rush = best_rusher(defense).map(|p| p.attributes.pass_rush as f64).unwrap_or(0.0);

    config.base_pressure_window
        + awareness / 100.0 * config.awareness_window_bonus
        + protection / 100.0 * config.protection_window_bonus
        - rush / 100.0 * config.pass_rush_window_penalty
}

fn best_rusher(defense: &[Player]) -> Option<&Player> {
    best_by(defense.iter(), |p| p.attributes.pass_rush)
}

/// Openness of the receiver against the nearest coverage defender.
fn separation_bucket(
    config: &EngineConfig,
    receiver: &Player,
    defense: &[Player],
) -> Separation {
    let cover = best_by(defense.iter().filter(|p| p.in_group(DefenseGroup::DBS)), |p| {
        p.attributes.coverage
    })
    .or_else(|| best_by(defense.iter(), |p| p.attributes.coverage));

    let margin = match cover {
        Some(cover) => {
            receiver.attributes.route_running as f64 - cover.attributes.coverage as f64
        }
        None => 0.0,
    };

    if margin <= config.tight_separation_margin {
        Separation::Tight
    } else if margin >= config.open_separation_margin {
        Separation::Open
    } else {
        Separation::Average
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::embedded::default_catalog;
    use crate::models::play::PlayType;
    use crate::models::player::{PlayerAttributes, Position};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn player(name: &str, position: Position, def_position: Option<Position>) -> Player {
        Player {
            team: "T".to_string(),
            name: name.to_string(),
            position,
            def_position,
            off_stars: 3,
            def_stars: 3,
            attributes: PlayerAttributes::default(),
        }
    }

    fn offense() -> Vec<Player> {
        let mut qb = player("Passer", Position::QB, None);
        qb.attributes.read_defense = 80;
        qb.attributes.accuracy = 82;
        let mut wr = player("Wideout", Position::WR, None);
        wr.attributes.route_running = 78;
        wr.attributes.qb_favorite = 85;
        let mut te = player("Tight", Position::TE, None);
        te.attributes.qb_favorite = 55;
        let mut ol = player("Guard", Position::OL, None);
        ol.attributes.pass_protect = 75;
        vec![qb, wr, te, ol]
    }

    fn defense() -> Vec<Player> {
        let mut dl = player("Edge", Position::DL, Some(Position::DL));
        dl.attributes.pass_rush = 70;
        dl.attributes.tackling = 70;
        let mut cb = player("Corner", Position::CB, Some(Position::CB));
        cb.attributes.coverage = 72;
        cb.attributes.ball_hawk = 65;
        cb.attributes.tackling = 62;
        vec![dl, cb]
    }

    fn resolve_at(seed: u64, ball_on: u32) -> PassResolution {
        let mut rng = StdRng::seed_from_u64(seed);
        resolve_pass(
            default_catalog(),
            &EngineConfig::default(),
            &PlayCall::pass(),
            ball_on,
            &offense(),
            &defense(),
            &mut rng,
        )
        .unwrap()
    }

    #[test]
    fn default_target_is_the_favorite_receiver() {
        for seed in 0..16 {
            let res = resolve_at(seed, 30);
            if let Some(receiver) = &res.receiver_name {
                assert_eq!(receiver, "Wideout");
            }
        }
    }

    #[test]
    fn completions_never_outgain_the_field() {
        for seed in 0..128 {
            let res = resolve_at(seed, 92);
            assert!(res.yards <= 8, "gain {} past the goal line", res.yards);
        }
    }

    #[test]
    fn incompletions_carry_no_yards_or_tackler() {
        let mut seen = false;
        for seed in 0..128 {
            let res = resolve_at(seed, 30);
            if res.kind == ResultKind::Incompletion {
                seen = true;
                assert_eq!(res.yards, 0);
                assert!(res.tackler.is_none());
            }
        }
        assert!(seen, "no incompletion in 128 seeded snaps");
    }

    #[test]
    fn collapsed_pocket_means_sacks() {
        let mut config = EngineConfig::default();
        config.base_pressure_window = 0.0;
        config.awareness_window_bonus = 0.0;
        config.protection_window_bonus = 0.0;
        let mut rng = StdRng::seed_from_u64(5);
        let res = resolve_pass(
            default_catalog(),
            &config,
            &PlayCall::pass(),
            40,
            &offense(),
            &defense(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(res.kind, ResultKind::Sack);
        assert!(res.yards < 0);
        assert_eq!(res.tackler.as_deref(), Some("Edge"));
    }

    #[test]
    fn sack_loss_never_leaves_the_field() {
        let mut config = EngineConfig::default();
        config.base_pressure_window = 0.0;
        config.awareness_window_bonus = 0.0;
        config.protection_window_bonus = 0.0;
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let res = resolve_pass(
                default_catalog(),
                &config,
                &PlayCall::pass(),
                3,
                &offense(),
                &defense(),
                &mut rng,
            )
            .unwrap();
            assert!(res.yards >= -3);
        }
    }

    #[test]
    fn no_quarterback_is_an_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let no_qb: Vec<Player> = offense().into_iter().filter(|p| p.name != "Passer").collect();
        let err = resolve_pass(
            default_catalog(),
            &EngineConfig::default(),
            &PlayCall::pass(),
            30,
            &no_qb,
            &defense(),
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::MissingPlayer(_)));
    }

    #[test]
    fn named_receiver_is_honored() {
        let call = PlayCall {
            play_type: PlayType::Pass,
            ball_carrier: None,
            target_receiver: Some("Tight".to_string()),
        };
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let res = resolve_pass(
                default_catalog(),
                &EngineConfig::default(),
                &call,
                30,
                &offense(),
                &defense(),
                &mut rng,
            )
            .unwrap();
            if res.kind != ResultKind::Sack {
                assert_eq!(res.receiver_name.as_deref(), Some("Tight"));
            }
        }
    }

    #[test]
    fn resolution_is_reproducible_for_a_fixed_seed() {
        let a = resolve_at(91, 45);
        let b = resolve_at(91, 45);
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.yards, b.yards);
        assert_eq!(a.route_label, b.route_label);
        assert_eq!(a.tackler, b.tackler);
    }
}
