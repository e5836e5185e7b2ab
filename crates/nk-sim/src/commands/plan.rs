use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use nk_exp::expand_plan;

use super::load_plan;

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// YAML experiment plan; the built-in NK plan is used when omitted.
    #[arg(long)]
    pub plan: Option<PathBuf>,
}

pub fn run(args: &PlanArgs) -> Result<(), Box<dyn Error>> {
    let plan = load_plan(args.plan.as_deref())?;
    for condition in expand_plan(&plan)? {
        println!("{}", condition.dir_name);
        println!("    {}", condition.command.template());
    }
    println!(
        "{} conditions x {} replicates",
        plan.conditions.len(),
        plan.replicates
    );
    Ok(())
}
