use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use nk_core::{to_canonical_json_bytes, NkError, SeedCounter};
use nk_exp::provision;
use tracing::info;

use super::load_plan;

#[derive(Args, Debug)]
pub struct SetupArgs {
    /// YAML experiment plan; the built-in NK plan is used when omitted.
    #[arg(long)]
    pub plan: Option<PathBuf>,
    /// Directory in which condition directories are created.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
    /// Override the plan's replicate count.
    #[arg(long)]
    pub replicates: Option<usize>,
    /// Override the plan's seed counter start.
    #[arg(long)]
    pub seed_start: Option<u64>,
    /// Write the provisioning report as JSON to this path.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

pub fn run(args: &SetupArgs) -> Result<(), Box<dyn Error>> {
    let mut plan = load_plan(args.plan.as_deref())?;
    if let Some(replicates) = args.replicates {
        plan.replicates = replicates;
    }
    if let Some(seed_start) = args.seed_start {
        plan.seed_start = seed_start;
    }
    let mut seeds = SeedCounter::starting_at(plan.seed_start);
    let report = provision(&args.root, &plan, &mut seeds)?;
    info!(
        written = report.seeds_issued,
        existing = report.existing(),
        plan_hash = %report.plan_hash,
        "setup finished"
    );
    if let Some(path) = &args.report {
        fs::write(path, to_canonical_json_bytes(&report)?)
            .map_err(|err| NkError::io("report-write", path, err))?;
    }
    Ok(())
}
