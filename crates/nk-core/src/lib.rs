//! Core data types shared by the NK experiment provisioning and aggregation crates.

pub mod errors;
pub mod params;
pub mod seed;
/// Canonical JSON encoding and stable hashing.
pub mod serde;
pub mod value;

pub use errors::{ErrorInfo, NkError};
pub use params::ParameterSet;
pub use seed::SeedCounter;
pub use crate::serde::{stable_hash_string, to_canonical_json_bytes};
pub use value::ParamValue;
