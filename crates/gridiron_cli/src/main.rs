//! Gridiron CLI
//!
//! Drives the play-by-play engine from the command line: seeded demo drives,
//! ruleset inspection, and tendency queries.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

use gridiron_core::data::embedded::{DEFAULT_ROSTER_YAML, DEFAULT_RULESET_YAML};
use gridiron_core::store::roster::roster_from_yaml;
use gridiron_core::{
    EngineConfig, GameService, PlayCall, PlayRecord, PlayType, TableCatalog,
};

#[derive(Parser)]
#[command(name = "gridiron_cli")]
#[command(about = "Simulate football drives from weighted tables", long_about = None)]
struct Cli {
    /// Ruleset YAML; embedded default when omitted
    #[arg(long, global = true)]
    tables: Option<PathBuf>,

    /// Roster YAML; embedded demo roster when omitted
    #[arg(long, global = true)]
    roster: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a seeded run of plays and print the play-by-play
    Drive {
        /// RNG seed; the same seed replays the same drive
        #[arg(long, default_value = "1")]
        seed: u64,

        /// Number of plays to run
        #[arg(long, default_value = "20")]
        plays: u32,

        /// Home team name (must exist in the roster)
        #[arg(long, default_value = "Ironclads")]
        home: String,

        /// Away team name (must exist in the roster)
        #[arg(long, default_value = "Monarchs")]
        away: String,

        /// Print history entries as JSON lines instead of text
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Print a summary of the loaded ruleset tables
    Tables,

    /// Simulate a seeded stretch of plays, then report the defense's
    /// tendency read for the resulting situation
    Predict {
        #[arg(long, default_value = "1")]
        seed: u64,

        #[arg(long, default_value = "12")]
        plays: u32,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let catalog = load_catalog(&cli.tables)?;
    let roster_source = match &cli.roster {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading roster {}", path.display()))?,
        None => DEFAULT_ROSTER_YAML.to_string(),
    };
    let roster = roster_from_yaml(&roster_source).map_err(|e| anyhow!("{}", e))?;

    match cli.command {
        Commands::Drive { seed, plays, home, away, json } => {
            let service = GameService::new(catalog, EngineConfig::default(), roster);
            run_drive(&service, seed, plays, &home, &away, json)
        }
        Commands::Tables => {
            print_tables(&catalog_summary(&catalog));
            Ok(())
        }
        Commands::Predict { seed, plays } => {
            let service = GameService::new(catalog, EngineConfig::default(), roster);
            run_predict(&service, seed, plays)
        }
    }
}

fn load_catalog(path: &Option<PathBuf>) -> Result<TableCatalog> {
    let source = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading ruleset {}", path.display()))?,
        None => DEFAULT_RULESET_YAML.to_string(),
    };
    let catalog = TableCatalog::from_yaml(&source).map_err(|e| anyhow!("{}", e))?;
    log::debug!("Loaded ruleset: {} run types, {} routes", catalog.run_types.len(), catalog.routes.len());
    Ok(catalog)
}

fn run_drive(
    service: &GameService,
    seed: u64,
    plays: u32,
    home: &str,
    away: &str,
    json: bool,
) -> Result<()> {
    let game_id = "cli";
    service.create_game(game_id, home, away).map_err(|e| anyhow!("{}", e))?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    for _ in 0..plays {
        let call = pick_call(&mut rng);
        let record = service.run_play(game_id, &call, &mut rng).map_err(|e| anyhow!("{}", e))?;
        if json {
            println!("{}", serde_json::to_string(&record)?);
        } else {
            print_record(&record);
        }
    }

    let state = service.game(game_id).expect("game was just created");
    println!(
        "\nFinal: {} {} - {} {}  (Q{} {:02}:{:02})",
        state.home,
        state.home_score,
        state.away,
        state.away_score,
        state.quarter,
        state.clock_seconds / 60,
        state.clock_seconds % 60
    );
    Ok(())
}

fn run_predict(service: &GameService, seed: u64, plays: u32) -> Result<()> {
    let game_id = "cli";
    service.create_game(game_id, "Ironclads", "Monarchs").map_err(|e| anyhow!("{}", e))?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    for _ in 0..plays {
        let call = pick_call(&mut rng);
        service.run_play(game_id, &call, &mut rng).map_err(|e| anyhow!("{}", e))?;
    }

    let state = service.game(game_id).expect("game was just created");
    let predicted =
        service.predict_next_play_type(game_id, &mut rng).map_err(|e| anyhow!("{}", e))?;
    let history = service.history(game_id).unwrap_or_default();
    let runs = history.iter().filter(|r| r.play_type == PlayType::Run).count();

    println!(
        "After {} plays ({} runs / {} passes): {} on offense, {} & {} at the {}",
        history.len(),
        runs,
        history.len() - runs,
        state.offense_team(),
        ordinal(state.down),
        state.distance,
        state.ball_on
    );
    println!("Defense reads: {}", predicted);
    Ok(())
}

/// Simple offense: lean run, mix in passes.
fn pick_call<R: Rng>(rng: &mut R) -> PlayCall {
    if rng.gen_bool(0.55) {
        PlayCall::run()
    } else {
        PlayCall::pass()
    }
}

fn print_record(record: &PlayRecord) {
    let marker = if record.prediction_correct { "✓" } else { "✗" };
    println!(
        "Q{} {:02}:{:02}  {}&{} at {}  [defense read {} {}]  {}",
        record.quarter,
        record.clock_seconds / 60,
        record.clock_seconds % 60,
        ordinal(record.down),
        record.distance,
        record.ball_on,
        record.defense_predicted,
        marker,
        record.description
    );
}

fn ordinal(down: u8) -> String {
    match down {
        1 => "1st".to_string(),
        2 => "2nd".to_string(),
        3 => "3rd".to_string(),
        4 => "4th".to_string(),
        other => format!("{}th", other),
    }
}

struct TableSummary {
    name: &'static str,
    rows: usize,
    total: f64,
}

fn catalog_summary(catalog: &TableCatalog) -> Vec<TableSummary> {
    vec![
        TableSummary {
            name: "run_types",
            rows: catalog.run_types.len(),
            total: catalog.run_types.total(),
        },
        TableSummary {
            name: "breakaways",
            rows: catalog.breakaways.len(),
            total: catalog.breakaways.total(),
        },
        TableSummary { name: "routes", rows: catalog.routes.len(), total: catalog.routes.total() },
        TableSummary {
            name: "sack_loss",
            rows: catalog.sack_loss.len(),
            total: catalog.sack_loss.total(),
        },
    ]
}

fn print_tables(summaries: &[TableSummary]) {
    println!("{:<12} {:>5} {:>8}", "table", "rows", "total");
    for summary in summaries {
        println!("{:<12} {:>5} {:>8.1}", summary.name, summary.rows, summary.total);
    }
}
