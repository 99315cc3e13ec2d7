//! Cumulative weighted-interval tables.
//!
//! Every random outcome dimension in the engine is expressed as an ordered
//! set of `[roll_min, roll_max)` intervals over a running-sum scale. Sampling
//! draws a uniform value in `[0, total)` and linear-scans for the containing
//! interval, so a fixed random source always reproduces the same entry
//! sequence.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One interval of a weighted table.
///
/// `roll_min` of an entry equals `roll_max` of the previous entry; the last
/// entry's `roll_max` is the cumulative total of all weights (which is not
/// required to be 100).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableEntry<T> {
    pub label: String,
    pub roll_min: f64,
    pub roll_max: f64,
    pub payload: T,
}

/// Ordered weighted intervals with a cached cumulative total.
///
/// Built once from configuration rows and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct WeightedTable<T> {
    name: String,
    entries: Vec<TableEntry<T>>,
    total: f64,
}

impl<T> WeightedTable<T> {
    /// Build a table from `(label, weight, payload)` rows in source order.
    ///
    /// Rows with a non-positive weight are skipped, matching the way the
    /// settings sheet ignores blank or zeroed lines. A table that ends up
    /// with no rows is a configuration error, not a default.
    pub fn build(
        name: impl Into<String>,
        rows: impl IntoIterator<Item = (String, f64, T)>,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        let mut entries = Vec::new();
        let mut cumulative = 0.0;

        for (label, weight, payload) in rows {
            if !(weight > 0.0) {
                continue;
            }
            entries.push(TableEntry {
                label,
                roll_min: cumulative,
                roll_max: cumulative + weight,
                payload,
            });
            cumulative += weight;
        }

        if entries.is_empty() {
            return Err(ConfigError::EmptyTable(name));
        }

        Ok(Self { name, entries, total: cumulative })
    }

    /// Entry whose `[roll_min, roll_max)` interval contains `roll`.
    ///
    /// A roll at or past the cumulative total (possible when configured
    /// weights are inconsistent with the scale the caller assumed) clamps to
    /// the last entry instead of failing.
    pub fn entry_at(&self, roll: f64) -> &TableEntry<T> {
        self.entries
            .iter()
            .find(|e| roll >= e.roll_min && roll < e.roll_max)
            .unwrap_or_else(|| self.entries.last().expect("table is never empty"))
    }

    /// Draw uniformly over `[0, total)` and return the containing entry.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> &TableEntry<T> {
        let roll = rng.gen_range(0.0..self.total);
        self.entry_at(roll)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[TableEntry<T>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cumulative total of all weights. Positive by construction.
    pub fn total(&self) -> f64 {
        self.total
    }
}
