//! Ruleset schema and the per-ruleset table catalog.
//!
//! Configuration is one YAML document with a named section per outcome
//! dimension; sections are loaded by identity, and the yards-after-catch
//! table carries its yard-bucket boundaries as a named field of its own
//! section. The catalog is derived fresh from the document on every load and
//! never mutated by the engine.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::distribution::WeightedTable;
use crate::error::ConfigError;
use crate::models::player::DefenseGroup;
use crate::models::play::PlayType;

// ============================================================================
// Shared payload types
// ============================================================================

/// Inclusive yardage interval.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct YardRange {
    pub min_yards: i32,
    pub max_yards: i32,
}

impl YardRange {
    /// Uniform whole-yard draw over the interval.
    pub fn roll<R: Rng>(&self, rng: &mut R) -> i32 {
        rng.gen_range(self.min_yards..=self.max_yards)
    }

    pub fn span(&self) -> i32 {
        self.max_yards - self.min_yards
    }
}

/// Receiver openness bucket derived from route running vs. coverage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Separation {
    Tight,
    Average,
    Open,
}

/// Run-type payload: base range plus breakaway eligibility.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RunStyle {
    pub range: YardRange,
    pub breakaway_eligible: bool,
}

// ============================================================================
// Raw document schema
// ============================================================================

#[derive(Debug, Deserialize)]
struct RulesetFile {
    run_types: Vec<RunTypeRow>,
    breakaways: Vec<WeightedRangeRow>,
    stamina_drains: StaminaDrains,
    tackle_buckets: Vec<TackleBucket>,
    air_yards_completion: Vec<CompletionBucket>,
    routes: Vec<RouteRow>,
    time_to_throw: Vec<TimeBucket>,
    completion_separation_adjust: SeparationAdjust,
    yac_by_separation: YacSection,
    sack_loss: Vec<WeightedRangeRow>,
}

#[derive(Debug, Clone, Deserialize)]
struct RunTypeRow {
    label: String,
    weight: f64,
    min_yards: i32,
    max_yards: i32,
    #[serde(default)]
    breakaway_eligible: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct WeightedRangeRow {
    label: String,
    weight: f64,
    min_yards: i32,
    max_yards: i32,
}

#[derive(Debug, Clone, Deserialize)]
struct RouteRow {
    label: String,
    weight: f64,
    min_air_yards: i32,
    max_air_yards: i32,
}

#[derive(Debug, Clone, Deserialize)]
struct YacSection {
    yard_buckets: Vec<YardRange>,
    rows: Vec<YacRow>,
}

#[derive(Debug, Clone, Deserialize)]
struct YacRow {
    separation: Separation,
    weights: Vec<f64>,
}

// ============================================================================
// Typed sections
// ============================================================================

/// Fixed stamina cost per play type. A direct mapping, not a distribution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StaminaDrains {
    pub run: f64,
    pub pass: f64,
}

impl StaminaDrains {
    pub fn cost(&self, play_type: PlayType) -> f64 {
        match play_type {
            PlayType::Run => self.run,
            PlayType::Pass => self.pass,
        }
    }
}

/// One tackle bucket: a yardage cap and the weighted defender-group mix.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TackleBucket {
    pub yardage_cap: i32,
    pub dl: f64,
    pub lb: f64,
    pub dbs: f64,
}

impl TackleBucket {
    fn total(&self) -> f64 {
        self.dl + self.lb + self.dbs
    }

    /// Weighted sample over {DL, LB, DBS}. The bucket total is validated
    /// positive at load, so the scan always lands.
    pub fn sample_group<R: Rng>(&self, rng: &mut R) -> DefenseGroup {
        let roll = rng.gen_range(0.0..self.total());
        if roll < self.dl {
            DefenseGroup::DL
        } else if roll < self.dl + self.lb {
            DefenseGroup::LB
        } else {
            DefenseGroup::DBS
        }
    }
}

/// Completion probability keyed by pass-depth cap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CompletionBucket {
    pub air_yards_cap: i32,
    pub completion_pct: f64,
}

/// Time the quarterback needs before a throw of this depth is away.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TimeBucket {
    pub air_yards_cap: i32,
    pub seconds: f64,
}

/// Additive completion-percentage adjustment per separation bucket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SeparationAdjust {
    pub tight: f64,
    pub average: f64,
    pub open: f64,
}

impl SeparationAdjust {
    pub fn for_bucket(&self, separation: Separation) -> f64 {
        match separation {
            Separation::Tight => self.tight,
            Separation::Average => self.average,
            Separation::Open => self.open,
        }
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Per-ruleset snapshot of every table the resolution engine samples.
#[derive(Debug, Clone)]
pub struct TableCatalog {
    pub run_types: WeightedTable<RunStyle>,
    pub breakaways: WeightedTable<YardRange>,
    pub stamina_drains: StaminaDrains,
    tackle_buckets: Vec<TackleBucket>,
    air_yards_completion: Vec<CompletionBucket>,
    pub routes: WeightedTable<YardRange>,
    time_to_throw: Vec<TimeBucket>,
    pub separation_adjust: SeparationAdjust,
    yac_by_separation: HashMap<Separation, WeightedTable<YardRange>>,
    pub sack_loss: WeightedTable<YardRange>,
}

impl TableCatalog {
    /// Parse and build a catalog from one YAML ruleset document.
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        let file: RulesetFile = serde_yaml::from_str(source)?;

        let run_types = WeightedTable::build(
            "run_types",
            file.run_types.into_iter().map(|row| {
                (
                    row.label,
                    row.weight,
                    RunStyle {
                        range: YardRange { min_yards: row.min_yards, max_yards: row.max_yards },
                        breakaway_eligible: row.breakaway_eligible,
                    },
                )
            }),
        )?;

        let breakaways = build_range_table("breakaways", file.breakaways)?;
        let sack_loss = build_range_table("sack_loss", file.sack_loss)?;
        let routes = build_range_table(
            "routes",
            file.routes
                .into_iter()
                .map(|row| WeightedRangeRow {
                    label: row.label,
                    weight: row.weight,
                    min_yards: row.min_air_yards,
                    max_yards: row.max_air_yards,
                })
                .collect(),
        )?;

        let mut tackle_buckets = file.tackle_buckets;
        if tackle_buckets.is_empty() {
            return Err(ConfigError::EmptyTable("tackle_buckets".to_string()));
        }
        tackle_buckets.sort_by_key(|b| b.yardage_cap);
        for bucket in &tackle_buckets {
            if !(bucket.total() > 0.0) {
                return Err(ConfigError::InvalidTable {
                    table: "tackle_buckets".to_string(),
                    reason: format!("cap {} has zero total weight", bucket.yardage_cap),
                });
            }
        }

        let mut air_yards_completion = file.air_yards_completion;
        if air_yards_completion.is_empty() {
            return Err(ConfigError::EmptyTable("air_yards_completion".to_string()));
        }
        air_yards_completion.sort_by_key(|b| b.air_yards_cap);

        let mut time_to_throw = file.time_to_throw;
        if time_to_throw.is_empty() {
            return Err(ConfigError::EmptyTable("time_to_throw".to_string()));
        }
        time_to_throw.sort_by_key(|b| b.air_yards_cap);

        let yac_by_separation = build_yac_tables(file.yac_by_separation)?;
        for separation in [Separation::Tight, Separation::Average, Separation::Open] {
            if !yac_by_separation.contains_key(&separation) {
                return Err(ConfigError::InvalidTable {
                    table: "yac_by_separation".to_string(),
                    reason: format!("no row for separation {:?}", separation),
                });
            }
        }

        Ok(Self {
            run_types,
            breakaways,
            stamina_drains: file.stamina_drains,
            tackle_buckets,
            air_yards_completion,
            routes,
            time_to_throw,
            separation_adjust: file.completion_separation_adjust,
            yac_by_separation,
            sack_loss,
        })
    }

    /// First tackle bucket whose cap covers the gained yardage; runs past the
    /// deepest cap use the last bucket.
    pub fn tackle_bucket_for(&self, yards: i32) -> &TackleBucket {
        self.tackle_buckets
            .iter()
            .find(|b| b.yardage_cap >= yards)
            .unwrap_or_else(|| self.tackle_buckets.last().expect("validated non-empty"))
    }

    /// Base completion percentage for a pass of the given depth.
    pub fn completion_pct_for(&self, air_yards: i32) -> f64 {
        self.air_yards_completion
            .iter()
            .find(|b| b.air_yards_cap >= air_yards)
            .unwrap_or_else(|| self.air_yards_completion.last().expect("validated non-empty"))
            .completion_pct
    }

    /// Seconds the quarterback needs to get off a throw of the given depth.
    pub fn throw_time_for(&self, air_yards: i32) -> f64 {
        self.time_to_throw
            .iter()
            .find(|b| b.air_yards_cap >= air_yards)
            .unwrap_or_else(|| self.time_to_throw.last().expect("validated non-empty"))
            .seconds
    }

    /// Yards-after-catch distribution for a separation bucket.
    pub fn yac_table(&self, separation: Separation) -> &WeightedTable<YardRange> {
        &self.yac_by_separation[&separation]
    }
}

fn build_range_table(
    name: &'static str,
    rows: Vec<WeightedRangeRow>,
) -> Result<WeightedTable<YardRange>, ConfigError> {
    for row in &rows {
        if row.min_yards > row.max_yards {
            return Err(ConfigError::InvalidTable {
                table: name.to_string(),
                reason: format!("{}: min {} > max {}", row.label, row.min_yards, row.max_yards),
            });
        }
    }
    WeightedTable::build(
        name,
        rows.into_iter().map(|row| {
            (
                row.label,
                row.weight,
                YardRange { min_yards: row.min_yards, max_yards: row.max_yards },
            )
        }),
    )
}

fn build_yac_tables(
    section: YacSection,
) -> Result<HashMap<Separation, WeightedTable<YardRange>>, ConfigError> {
    if section.yard_buckets.is_empty() {
        return Err(ConfigError::EmptyTable("yac_by_separation".to_string()));
    }

    let mut tables = HashMap::new();
    for row in section.rows {
        if row.weights.len() != section.yard_buckets.len() {
            return Err(ConfigError::InvalidTable {
                table: "yac_by_separation".to_string(),
                reason: format!(
                    "row {:?} has {} weights for {} yard buckets",
                    row.separation,
                    row.weights.len(),
                    section.yard_buckets.len()
                ),
            });
        }
        let rows = row
            .weights
            .iter()
            .zip(section.yard_buckets.iter())
            .map(|(weight, bucket)| {
                (format!("{}-{}", bucket.min_yards, bucket.max_yards), *weight, *bucket)
            })
            .collect::<Vec<_>>();
        let table = WeightedTable::build(format!("yac_{:?}", row.separation), rows)?;
        tables.insert(row.separation, table);
    }
    Ok(tables)
}
