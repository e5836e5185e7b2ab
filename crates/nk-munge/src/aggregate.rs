use std::path::{Path, PathBuf};

use nk_core::NkError;
use tracing::{info, warn};

use crate::discover::{discover_runs, RunDir};
use crate::options::MungeOptions;
use crate::settings::read_settings;
use crate::table::{Dataset, RunTable};

/// Combined dataset together with the runs that fed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    pub dataset: Dataset,
    pub merged: Vec<PathBuf>,
    /// Runs without a tabular output file.
    pub skipped: Vec<PathBuf>,
}

/// Loads one run: its table with every header setting (and optionally the
/// treatment label) added as constant columns. Returns `None` when the run
/// has not produced its table yet.
pub fn load_run(run: &RunDir, opts: &MungeOptions) -> Result<Option<RunTable>, NkError> {
    let table_path = run.path.join(&opts.table_file);
    if !table_path.is_file() {
        return Ok(None);
    }
    let mut table = RunTable::load(&table_path, &opts.index_column)?;
    let settings = read_settings(
        &run.path.join(&opts.log_file),
        &opts.settings_marker,
        &opts.header_terminator,
    )?;
    for (name, value) in &settings {
        table.set_constant(name, value);
    }
    if opts.treatment {
        if let Some(treatment) = &run.treatment {
            table.set_constant(&opts.treatment_column, treatment);
        }
    }
    Ok(Some(table))
}

/// Discovers every run under `root` and stacks their tables.
pub fn aggregate(root: &Path, opts: &MungeOptions) -> Result<Aggregate, NkError> {
    let runs = discover_runs(root, &opts.pattern)?;
    info!(root = %root.display(), pattern = %opts.pattern, candidates = runs.len(), "discovered runs");
    let mut tables = Vec::new();
    let mut merged = Vec::new();
    let mut skipped = Vec::new();
    for run in &runs {
        match load_run(run, opts)? {
            Some(table) => {
                info!(run = %run.relative, rows = table.rows().len(), "merged run");
                tables.push(table);
                merged.push(run.path.clone());
            }
            None => {
                warn!(run = %run.relative, file = %opts.table_file, "no table output, skipping run");
                skipped.push(run.path.clone());
            }
        }
    }
    let dataset = Dataset::concat(tables).map_err(|err| match err {
        NkError::Table(info) => NkError::Table(
            info.with_context("root", root.display().to_string())
                .with_context("pattern", opts.pattern.clone()),
        ),
        other => other,
    })?;
    Ok(Aggregate {
        dataset,
        merged,
        skipped,
    })
}

/// Aggregates every run under `root` and writes the combined CSV to the
/// configured output path.
pub fn munge(root: &Path, opts: &MungeOptions) -> Result<Aggregate, NkError> {
    let result = aggregate(root, opts)?;
    let output = opts.output_path(root);
    result.dataset.write_csv(&output)?;
    info!(
        output = %output.display(),
        runs = result.merged.len(),
        skipped = result.skipped.len(),
        rows = result.dataset.rows().len(),
        "wrote aggregated dataset"
    );
    Ok(result)
}
