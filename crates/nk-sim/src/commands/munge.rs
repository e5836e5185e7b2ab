use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use nk_munge::{munge, MungeOptions};

#[derive(Args, Debug)]
pub struct MungeArgs {
    /// Directory containing the provisioned condition directories.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
    /// YAML file with aggregation options.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Glob selecting run directories relative to the root.
    #[arg(long)]
    pub pattern: Option<String>,
    /// Output CSV path, relative to the root unless absolute.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Do not add the treatment column.
    #[arg(long)]
    pub no_treatment: bool,
}

impl MungeArgs {
    fn options(&self) -> Result<MungeOptions, Box<dyn Error>> {
        let mut opts = match &self.config {
            Some(path) => MungeOptions::load(path)?,
            None => MungeOptions::default(),
        };
        if let Some(pattern) = &self.pattern {
            opts.pattern = pattern.clone();
        }
        if let Some(out) = &self.out {
            opts.output = out.clone();
        }
        if self.no_treatment {
            opts.treatment = false;
        }
        Ok(opts)
    }
}

pub fn run(args: &MungeArgs) -> Result<(), Box<dyn Error>> {
    let opts = args.options()?;
    let result = munge(&args.root, &opts)?;
    println!(
        "{} rows from {} runs ({} skipped) written to {}",
        result.dataset.rows().len(),
        result.merged.len(),
        result.skipped.len(),
        opts.output_path(&args.root).display()
    );
    Ok(())
}
