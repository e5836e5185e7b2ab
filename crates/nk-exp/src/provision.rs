use std::fs;
use std::path::Path;

use nk_core::{stable_hash_string, NkError, ParameterSet, SeedCounter};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::expand::{expand_plan, ExpandedCondition};
use crate::plan::ExperimentPlan;

/// Outcome for a single replicate directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplicateStatus {
    /// A fresh command file was written with a newly issued seed.
    Written,
    /// A command file was already present and left untouched.
    Existing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicateReport {
    pub index: usize,
    pub status: ReplicateStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub dir_name: String,
    pub params: ParameterSet,
    pub command_template: String,
    pub replicates: Vec<ReplicateReport>,
}

/// Summary of a provisioning pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisionReport {
    pub plan_hash: String,
    pub conditions: Vec<ConditionReport>,
    pub seeds_issued: usize,
    pub last_seed: u64,
}

impl ProvisionReport {
    /// Number of replicates that were already provisioned.
    pub fn existing(&self) -> usize {
        self.conditions
            .iter()
            .flat_map(|condition| &condition.replicates)
            .filter(|replicate| replicate.status == ReplicateStatus::Existing)
            .count()
    }
}

/// Creates `<root>/<dir_name>/<index>/<command_file>` for every condition and
/// replicate of the plan.
///
/// Replicates whose command file already exists are skipped without drawing a
/// seed, so re-running over a partially provisioned tree resumes where the
/// previous pass stopped. All conditions are expanded before the first
/// directory is created.
pub fn provision(
    root: &Path,
    plan: &ExperimentPlan,
    seeds: &mut SeedCounter,
) -> Result<ProvisionReport, NkError> {
    let expanded = expand_plan(plan)?;
    let dir_names: Vec<&str> = expanded.iter().map(|c| c.dir_name.as_str()).collect();
    let plan_hash = stable_hash_string(&(plan, &dir_names))?;
    let first_seed = seeds.last();

    let mut conditions = Vec::with_capacity(expanded.len());
    for condition in &expanded {
        conditions.push(provision_condition(root, plan, condition, seeds)?);
    }
    let seeds_issued = (seeds.last() - first_seed) as usize;
    info!(
        conditions = conditions.len(),
        seeds_issued,
        last_seed = seeds.last(),
        "provisioning complete"
    );
    Ok(ProvisionReport {
        plan_hash,
        conditions,
        seeds_issued,
        last_seed: seeds.last(),
    })
}

fn provision_condition(
    root: &Path,
    plan: &ExperimentPlan,
    condition: &ExpandedCondition,
    seeds: &mut SeedCounter,
) -> Result<ConditionReport, NkError> {
    let condition_dir = root.join(&condition.dir_name);
    fs::create_dir_all(&condition_dir)
        .map_err(|err| NkError::io("provision-mkdir", &condition_dir, err))?;
    info!(dir = %condition.dir_name, "provisioning condition");

    let mut replicates = Vec::with_capacity(plan.replicates);
    for index in 0..plan.replicates {
        let replicate_dir = condition_dir.join(index.to_string());
        let command_path = replicate_dir.join(&plan.command_file);
        if command_path.exists() {
            debug!(path = %command_path.display(), "command file present, skipping");
            replicates.push(ReplicateReport {
                index,
                status: ReplicateStatus::Existing,
                seed: None,
            });
            continue;
        }
        let seed = seeds.next_seed();
        fs::create_dir_all(&replicate_dir)
            .map_err(|err| NkError::io("provision-mkdir", &replicate_dir, err))?;
        write_command(&command_path, &condition.command.render(seed))?;
        debug!(path = %command_path.display(), seed, "wrote command file");
        replicates.push(ReplicateReport {
            index,
            status: ReplicateStatus::Written,
            seed: Some(seed),
        });
    }

    Ok(ConditionReport {
        name: condition.name.clone(),
        dir_name: condition.dir_name.clone(),
        params: condition.params.clone(),
        command_template: condition.command.template(),
        replicates,
    })
}

// The command file only appears once fully written; the skip check relies on it.
fn write_command(path: &Path, command: &str) -> Result<(), NkError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let staging = path.with_file_name(format!(".{file_name}.partial"));
    fs::write(&staging, command).map_err(|err| NkError::io("provision-write", &staging, err))?;
    fs::rename(&staging, path).map_err(|err| NkError::io("provision-rename", path, err))
}
