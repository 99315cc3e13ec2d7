//! Play resolution engine.
//!
//! `PlayResolver` chains the table samples of the run or pass pipeline,
//! applies the field-position rules, and emits a fully-specified
//! [`PlayOutcome`]. All randomness comes from the caller's RNG, so a seeded
//! replay reproduces every outcome; the only state the resolver mutates is
//! the per-session player-condition table it is handed.

pub mod config;
pub mod pass_play;
pub mod run_play;
pub mod transition;

use rand::Rng;

use crate::data::catalog::TableCatalog;
use crate::error::{EngineError, Result};
use crate::models::play::{PlayCall, PlayOutcome, PlayType, ResultKind};
use crate::models::player::{Player, SessionState};

pub use config::EngineConfig;
pub use transition::{advance_down, field_result, resolve_spot, FieldResult};

/// Pre-snap situation handed to the resolver.
#[derive(Debug, Clone, Copy)]
pub struct PlayContext<'a> {
    pub down: u8,
    pub distance: u32,
    pub ball_on: u32,
    pub offense: &'a [Player],
    pub defense: &'a [Player],
}

/// Chains table samples into play outcomes against one catalog + config.
#[derive(Debug, Clone, Copy)]
pub struct PlayResolver<'a> {
    catalog: &'a TableCatalog,
    config: &'a EngineConfig,
}

impl<'a> PlayResolver<'a> {
    pub fn new(catalog: &'a TableCatalog, config: &'a EngineConfig) -> Self {
        Self { catalog, config }
    }

    /// Resolve one play call into an outcome.
    ///
    /// Repeating the call with the same context, session table, and RNG state
    /// reproduces the same outcome.
    pub fn resolve<R: Rng>(
        &self,
        call: &PlayCall,
        ctx: &PlayContext,
        session: &mut SessionState,
        rng: &mut R,
    ) -> Result<PlayOutcome> {
        if ctx.offense.is_empty() {
            return Err(EngineError::InvalidContext("offense has no players".to_string()));
        }
        if ctx.defense.is_empty() {
            return Err(EngineError::InvalidContext("defense has no players".to_string()));
        }

        match call.play_type {
            PlayType::Run => self.resolve_run_call(call, ctx, session, rng),
            PlayType::Pass => self.resolve_pass_call(call, ctx, session, rng),
        }
    }

    fn resolve_run_call<R: Rng>(
        &self,
        call: &PlayCall,
        ctx: &PlayContext,
        session: &mut SessionState,
        rng: &mut R,
    ) -> Result<PlayOutcome> {
        let run =
            run_play::resolve_run(self.catalog, self.config, call, ctx.offense, ctx.defense, rng)?;

        session.apply_drain(&run.carrier_key, self.catalog.stamina_drains.cost(PlayType::Run), true);

        let kind = if run.fumbled { ResultKind::Fumble } else { ResultKind::Run };
        let field = transition::field_result(
            kind,
            ctx.down,
            ctx.distance,
            ctx.ball_on,
            run.yards,
            Some(resolve_spot(ctx.ball_on, run.yards)),
            self.config,
        );

        let description = run_description(&run, &field);
        let tackler = if field.touchdown { None } else { run.tackler };

        Ok(PlayOutcome {
            play_type: PlayType::Run,
            player: run.carrier_name,
            yards_gained: run.yards,
            result: kind,
            tackler,
            receiver: None,
            new_down: field.new_down,
            new_distance: field.new_distance,
            new_ball_on: field.new_ball_on,
            turnover: kind.is_turnover() || (field.possession_flips && !field.touchdown),
            touchdown: field.touchdown,
            points: field.points,
            clock_runoff: self.config.run_clock_seconds,
            description,
        })
    }

    fn resolve_pass_call<R: Rng>(
        &self,
        call: &PlayCall,
        ctx: &PlayContext,
        session: &mut SessionState,
        rng: &mut R,
    ) -> Result<PlayOutcome> {
        let pass = pass_play::resolve_pass(
            self.catalog,
            self.config,
            call,
            ctx.ball_on,
            ctx.offense,
            ctx.defense,
            rng,
        )?;

        session.apply_drain(&pass.qb_key, self.catalog.stamina_drains.cost(PlayType::Pass), false);

        let turnover_spot = match pass.kind {
            ResultKind::Interception => Some(resolve_spot(ctx.ball_on, pass.air_yards)),
            _ => None,
        };
        let field = transition::field_result(
            pass.kind,
            ctx.down,
            ctx.distance,
            ctx.ball_on,
            pass.yards,
            turnover_spot,
            self.config,
        );

        let description = pass_description(&pass, &field, ctx);
        let tackler = if field.touchdown { None } else { pass.tackler.clone() };
        let player = match pass.kind {
            ResultKind::Completion | ResultKind::Incompletion | ResultKind::Interception => {
                pass.receiver_name.clone().unwrap_or_else(|| pass.qb_name.clone())
            }
            _ => pass.qb_name.clone(),
        };

        Ok(PlayOutcome {
            play_type: PlayType::Pass,
            player,
            yards_gained: pass.yards,
            result: pass.kind,
            tackler,
            receiver: pass.receiver_name,
            new_down: field.new_down,
            new_distance: field.new_distance,
            new_ball_on: field.new_ball_on,
            turnover: pass.kind.is_turnover() || (field.possession_flips && !field.touchdown),
            touchdown: field.touchdown,
            points: field.points,
            clock_runoff: match pass.kind {
                ResultKind::Completion | ResultKind::Sack => self.config.pass_clock_seconds,
                _ => self.config.stopped_clock_seconds,
            },
            description,
        })
    }
}

/// Strictly-greater maximum, so the first listed player wins ties.
pub(crate) fn best_by<'a, I, F>(players: I, rating: F) -> Option<&'a Player>
where
    I: Iterator<Item = &'a Player>,
    F: Fn(&Player) -> u8,
{
    let mut best: Option<&'a Player> = None;
    for player in players {
        if best.map_or(true, |b| rating(player) > rating(b)) {
            best = Some(player);
        }
    }
    best
}

fn run_description(run: &run_play::RunResolution, field: &FieldResult) -> String {
    if run.fumbled {
        let stripper = run.tackler.as_deref().unwrap_or("the defense");
        return format!(
            "{} {} run for {} yards, FUMBLE forced by {}",
            run.carrier_name, run.style_label, run.yards, stripper
        );
    }
    if field.touchdown {
        let how = if run.breakaway { "breaks free" } else { "runs it in" };
        return format!(
            "{} {} {} yards on the {} run, TOUCHDOWN",
            run.carrier_name, how, run.yards, run.style_label
        );
    }
    match &run.tackler {
        Some(tackler) => format!(
            "{} {} run for {} yards, tackled by {}",
            run.carrier_name, run.style_label, run.yards, tackler
        ),
        None => format!("{} {} run for {} yards", run.carrier_name, run.style_label, run.yards),
    }
}

fn pass_description(
    pass: &pass_play::PassResolution,
    field: &FieldResult,
    ctx: &PlayContext,
) -> String {
    let receiver = pass.receiver_name.as_deref().unwrap_or("");
    match pass.kind {
        ResultKind::Sack => {
            let by = pass.tackler.as_deref().unwrap_or("the rush");
            format!("{} sacked by {} for {} yards", pass.qb_name, by, pass.yards)
        }
        ResultKind::Incompletion => {
            format!("{} pass on the {} intended for {}, incomplete", pass.qb_name, pass.route_label, receiver)
        }
        ResultKind::Interception => {
            let spot = resolve_spot(ctx.ball_on, pass.air_yards);
            format!(
                "{} pass on the {} INTERCEPTED at the {}",
                pass.qb_name, pass.route_label, spot
            )
        }
        ResultKind::Completion if field.touchdown => format!(
            "{} hits {} on the {} for {} yards, TOUCHDOWN",
            pass.qb_name, receiver, pass.route_label, pass.yards
        ),
        _ => match &pass.tackler {
            Some(tackler) => format!(
                "{} completes to {} on the {} for {} yards, tackled by {}",
                pass.qb_name, receiver, pass.route_label, pass.yards, tackler
            ),
            None => format!(
                "{} completes to {} on the {} for {} yards",
                pass.qb_name, receiver, pass.route_label, pass.yards
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::embedded::default_catalog;
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
        qb.attributes.read_defense = 78;
        qb.attributes.accuracy = 80;
        let mut rb = player("Back", Position::RB, None);
        rb.attributes.speed = 84;
        rb.attributes.stamina = 80;
        let mut wr = player("Wideout", Position::WR, None);
        wr.attributes.qb_favorite = 80;
        let mut ol = player("Guard", Position::OL, None);
        ol.attributes.pass_protect = 74;
        vec![qb, rb, wr, ol]
    }

    fn defense() -> Vec<Player> {
        let mut dl = player("Edge", Position::DL, Some(Position::DL));
        dl.attributes.pass_rush = 68;
        dl.attributes.run_stop = 72;
        dl.attributes.tackling = 74;
        let mut lb = player("Backer", Position::LB, Some(Position::LB));
        lb.attributes.tackling = 82;
        lb.attributes.run_stop = 75;
        let mut cb = player("Corner", Position::CB, Some(Position::CB));
        cb.attributes.coverage = 70;
        cb.attributes.tackling = 58;
        vec![dl, lb, cb]
    }

    fn resolver_fixture() -> (&'static TableCatalog, EngineConfig) {
        (default_catalog(), EngineConfig::default())
    }

    #[test]
    fn run_play_drains_the_carrier_and_counts_the_carry() {
        let (catalog, config) = resolver_fixture();
        let resolver = PlayResolver::new(catalog, &config);
        let offense = offense();
        let defense = defense();
        let mut session = SessionState::for_roster(&offense);
        let ctx =
            PlayContext { down: 1, distance: 10, ball_on: 30, offense: &offense, defense: &defense };
        let mut rng = StdRng::seed_from_u64(11);

        let outcome = resolver.resolve(&PlayCall::run(), &ctx, &mut session, &mut rng).unwrap();
        assert_eq!(outcome.play_type, PlayType::Run);

        let cond = session.condition("T/Back").unwrap();
        assert_eq!(cond.carries, 1);
        assert_eq!(cond.fatigue, 80.0 - catalog.stamina_drains.run);
    }

    #[test]
    fn pass_play_drains_the_quarterback_without_a_carry() {
        let (catalog, config) = resolver_fixture();
        let resolver = PlayResolver::new(catalog, &config);
        let offense = offense();
        let defense = defense();
        let mut session = SessionState::for_roster(&offense);
        let ctx =
            PlayContext { down: 2, distance: 7, ball_on: 45, offense: &offense, defense: &defense };
        let mut rng = StdRng::seed_from_u64(13);

        resolver.resolve(&PlayCall::pass(), &ctx, &mut session, &mut rng).unwrap();

        let cond = session.condition("T/Passer").unwrap();
        assert_eq!(cond.carries, 0);
        assert_eq!(cond.fatigue, 50.0 - catalog.stamina_drains.pass);
    }

    #[test]
    fn outcome_respects_the_transition_law() {
        let (catalog, config) = resolver_fixture();
        let resolver = PlayResolver::new(catalog, &config);
        let offense = offense();
        let defense = defense();
        let ctx =
            PlayContext { down: 2, distance: 8, ball_on: 40, offense: &offense, defense: &defense };

        for seed in 0..64 {
            let mut session = SessionState::for_roster(&offense);
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome =
                resolver.resolve(&PlayCall::run(), &ctx, &mut session, &mut rng).unwrap();
            if outcome.turnover || outcome.touchdown {
                continue;
            }
            let (down, distance) = advance_down(ctx.down, ctx.distance, outcome.yards_gained);
            assert_eq!(outcome.new_down, down);
            assert_eq!(
                outcome.new_distance,
                distance.min(100 - outcome.new_ball_on)
            );
        }
    }

    #[test]
    fn identical_seeds_reproduce_identical_outcomes() {
        let (catalog, config) = resolver_fixture();
        let resolver = PlayResolver::new(catalog, &config);
        let offense = offense();
        let defense = defense();
        let ctx =
            PlayContext { down: 3, distance: 4, ball_on: 55, offense: &offense, defense: &defense };

        let resolve = |seed: u64| {
            let mut session = SessionState::for_roster(&offense);
            let mut rng = StdRng::seed_from_u64(seed);
            resolver.resolve(&PlayCall::pass(), &ctx, &mut session, &mut rng).unwrap()
        };
        assert_eq!(resolve(21), resolve(21));
    }

    #[test]
    fn empty_units_are_rejected() {
        let (catalog, config) = resolver_fixture();
        let resolver = PlayResolver::new(catalog, &config);
        let offense = offense();
        let ctx =
            PlayContext { down: 1, distance: 10, ball_on: 25, offense: &offense, defense: &[] };
        let mut session = SessionState::for_roster(&offense);
        let mut rng = StdRng::seed_from_u64(1);
        let err = resolver.resolve(&PlayCall::run(), &ctx, &mut session, &mut rng).unwrap_err();
        assert!(matches!(err, EngineError::InvalidContext(_)));
    }

    #[test]
    fn first_listed_player_wins_rating_ties() {
        let defense = vec![
            player("First", Position::LB, Some(Position::LB)),
            player("Second", Position::LB, Some(Position::LB)),
        ];
        let best = best_by(defense.iter(), |p| p.attributes.tackling).unwrap();
        assert_eq!(best.name, "First");
    }
}
