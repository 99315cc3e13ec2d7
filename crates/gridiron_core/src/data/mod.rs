pub mod catalog;
pub mod distribution;
pub mod embedded;

pub use catalog::{
    CompletionBucket, RunStyle, Separation, SeparationAdjust, StaminaDrains, TableCatalog,
    TackleBucket, TimeBucket, YardRange,
};
pub use distribution::{TableEntry, WeightedTable};
pub use embedded::{default_catalog, DEFAULT_ROSTER_YAML, DEFAULT_RULESET_YAML};
