pub mod munge;
pub mod plan;
pub mod setup;

use std::path::Path;

use nk_core::NkError;
use nk_exp::ExperimentPlan;

/// Loads the plan file when given, otherwise the built-in NK experiment.
pub fn load_plan(path: Option<&Path>) -> Result<ExperimentPlan, NkError> {
    match path {
        Some(path) => ExperimentPlan::load(path),
        None => Ok(ExperimentPlan::nk_oee()),
    }
}
