use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use indexmap::IndexSet;
use nk_core::{ErrorInfo, NkError};
use tracing::warn;

fn table_error(code: &str, path: &Path, err: impl ToString) -> NkError {
    NkError::Table(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}

/// Per-run table with the index column first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RunTable {
    /// Loads a CSV file, moving `index_column` to the front.
    ///
    /// Rows shorter than the header (a run still writing its last line) are
    /// padded with empty fields; rows longer than the header are rejected.
    pub fn load(path: &Path, index_column: &str) -> Result<Self, NkError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|err| table_error("table-open", path, err))?;
        let headers = reader
            .headers()
            .map_err(|err| table_error("table-header", path, err))?
            .clone();
        let index = headers
            .iter()
            .position(|name| name == index_column)
            .ok_or_else(|| {
                NkError::Table(
                    ErrorInfo::new("missing-index", "index column not found in table")
                        .with_context("path", path.display().to_string())
                        .with_context("column", index_column),
                )
            })?;
        let order: Vec<usize> = std::iter::once(index)
            .chain((0..headers.len()).filter(|&idx| idx != index))
            .collect();
        let columns = order.iter().map(|&idx| headers[idx].to_string()).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|err| table_error("table-record", path, err))?;
            if record.len() > headers.len() {
                let line = record.position().map(|pos| pos.line()).unwrap_or_default();
                return Err(NkError::Table(
                    ErrorInfo::new("table-record", "row has more fields than the header")
                        .with_context("path", path.display().to_string())
                        .with_context("line", line.to_string())
                        .with_context("fields", record.len().to_string()),
                ));
            }
            rows.push(
                order
                    .iter()
                    .map(|&idx| record.get(idx).unwrap_or_default().to_string())
                    .collect(),
            );
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Sets `name` to `value` on every row, replacing an existing column.
    /// The index column is never overwritten.
    pub fn set_constant(&mut self, name: &str, value: &str) {
        match self.columns.iter().position(|column| column == name) {
            Some(0) => {
                warn!(column = name, "refusing to overwrite the index column");
            }
            Some(idx) => {
                for row in &mut self.rows {
                    row[idx] = value.to_string();
                }
            }
            None => {
                self.columns.push(name.to_string());
                for row in &mut self.rows {
                    row.push(value.to_string());
                }
            }
        }
    }
}

/// Vertically stacked run tables over the union of their columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Dataset {
    /// Stacks `tables` in order. Columns appear in order of first sighting;
    /// rows of runs lacking a column hold `None` there.
    pub fn concat(tables: Vec<RunTable>) -> Result<Self, NkError> {
        if tables.is_empty() {
            return Err(NkError::Table(
                ErrorInfo::new("no-runs", "no run tables to concatenate")
                    .with_hint("check the discovery pattern and that runs produced output"),
            ));
        }
        let columns: IndexSet<String> = tables
            .iter()
            .flat_map(|table| table.columns.iter().cloned())
            .collect();
        let mut rows = Vec::with_capacity(tables.iter().map(|t| t.rows.len()).sum());
        for table in tables {
            let slots: Vec<usize> = table
                .columns
                .iter()
                .filter_map(|name| columns.get_index_of(name))
                .collect();
            for row in table.rows {
                let mut out = vec![None; columns.len()];
                for (slot, value) in slots.iter().zip(row) {
                    out[*slot] = Some(value);
                }
                rows.push(out);
            }
        }
        Ok(Self {
            columns: columns.into_iter().collect(),
            rows,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    /// Values of one column across all rows.
    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let idx = self.columns.iter().position(|column| column == name)?;
        Some(self.rows.iter().map(|row| row[idx].as_deref()).collect())
    }

    /// Writes the dataset as CSV, creating the parent directory if needed.
    /// Missing values are written as empty fields.
    pub fn write_csv(&self, path: &Path) -> Result<(), NkError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| NkError::io("output-mkdir", parent, err))?;
        }
        let mut writer = WriterBuilder::new()
            .from_path(path)
            .map_err(|err| table_error("output-open", path, err))?;
        writer
            .write_record(&self.columns)
            .map_err(|err| table_error("output-header", path, err))?;
        for row in &self.rows {
            writer
                .write_record(row.iter().map(|value| value.as_deref().unwrap_or("")))
                .map_err(|err| table_error("output-row", path, err))?;
        }
        writer
            .flush()
            .map_err(|err| NkError::io("output-flush", path, err))
    }
}
