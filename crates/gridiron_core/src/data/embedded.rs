//! Compile-time embedded default configuration.

use std::sync::OnceLock;

use super::catalog::TableCatalog;

/// Default ruleset YAML (compile-time embedding).
pub const DEFAULT_RULESET_YAML: &str = include_str!("../../../../data/tables.yaml");

/// Demo roster YAML (compile-time embedding).
pub const DEFAULT_ROSTER_YAML: &str = include_str!("../../../../data/roster.yaml");

static DEFAULT_CATALOG: OnceLock<TableCatalog> = OnceLock::new();

/// Catalog built from the embedded default ruleset.
///
/// First call parses and builds, later calls return the cached catalog.
///
/// # Panics
///
/// Panics if the embedded YAML fails to parse (compile-time data; does not
/// happen in a normal build).
pub fn default_catalog() -> &'static TableCatalog {
    DEFAULT_CATALOG.get_or_init(|| {
        TableCatalog::from_yaml(DEFAULT_RULESET_YAML).expect("Failed to parse data/tables.yaml")
    })
}
