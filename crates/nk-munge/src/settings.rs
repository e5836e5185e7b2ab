use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use indexmap::IndexMap;
use nk_core::{ErrorInfo, NkError};

/// Key/value settings recovered from a run log header, in order of appearance.
pub type Settings = IndexMap<String, String>;

/// Reads the settings header of a run log.
///
/// Lines whose first token is `marker` contribute `fields[1] = fields[2]`.
/// Parsing stops at the first line starting with `terminator`; anything else
/// is ignored. A settings line with fewer than three fields is rejected.
pub fn parse_settings<R: BufRead>(
    reader: R,
    marker: &str,
    terminator: &str,
) -> Result<Settings, NkError> {
    let mut settings = Settings::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|err| {
            NkError::Log(
                ErrorInfo::new("log-read", err.to_string())
                    .with_context("line", line_no.to_string()),
            )
        })?;
        if line.starts_with(terminator) {
            break;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.first() != Some(&marker) {
            continue;
        }
        match fields.as_slice() {
            [_, key, value, ..] => {
                settings.insert((*key).to_string(), (*value).to_string());
            }
            _ => {
                return Err(NkError::Log(
                    ErrorInfo::new("log-malformed", "settings line needs a name and a value")
                        .with_context("line", line_no.to_string())
                        .with_context("text", line.trim()),
                ))
            }
        }
    }
    Ok(settings)
}

/// Opens `path` and parses its settings header.
pub fn read_settings(path: &Path, marker: &str, terminator: &str) -> Result<Settings, NkError> {
    let file = File::open(path).map_err(|err| {
        NkError::Log(
            ErrorInfo::new("log-open", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    parse_settings(BufReader::new(file), marker, terminator).map_err(|err| match err {
        NkError::Log(info) => {
            NkError::Log(info.with_context("path", path.display().to_string()))
        }
        other => other,
    })
}
