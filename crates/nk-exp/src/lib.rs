//! Condition expansion and replicate provisioning for NK experiments.

mod expand;
mod plan;
mod provision;

pub use expand::{directory_name, expand_condition, expand_plan, CommandLine, ExpandedCondition};
pub use plan::{CommandTemplate, Condition, ExperimentPlan};
pub use provision::{
    provision, ConditionReport, ProvisionReport, ReplicateReport, ReplicateStatus,
};
