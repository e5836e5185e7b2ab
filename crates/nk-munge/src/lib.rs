//! Aggregation of NK replicate outputs into a single dataset.
//!
//! Each replicate directory holds a tabular output (`oee.csv`) and a run log
//! whose header lists the settings the run was launched with. The settings
//! are attached to the table as constant columns and all runs are stacked.

pub mod aggregate;
pub mod discover;
pub mod options;
pub mod settings;
pub mod table;

pub use aggregate::{aggregate, load_run, munge, Aggregate};
pub use discover::{discover_runs, RunDir};
pub use options::MungeOptions;
pub use settings::{parse_settings, read_settings, Settings};
pub use table::{Dataset, RunTable};
