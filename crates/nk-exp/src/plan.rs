use std::fs;
use std::path::Path;

use nk_core::{ErrorInfo, NkError, ParameterSet};
use serde::{Deserialize, Serialize};

fn plan_error(code: &str, message: impl Into<String>) -> NkError {
    NkError::Config(ErrorInfo::new(code, message))
}

/// Invocation prefix shared by every replicate command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandTemplate {
    #[serde(default = "CommandTemplate::default_executable")]
    pub executable: String,
    /// Flags emitted before the seed, in declared order.
    #[serde(default = "CommandTemplate::default_fixed")]
    pub fixed: ParameterSet,
    #[serde(default = "CommandTemplate::default_seed_flag")]
    pub seed_flag: String,
}

impl CommandTemplate {
    fn default_executable() -> String {
        "./nk_oee".to_string()
    }

    fn default_fixed() -> ParameterSet {
        [("MODES_RESOLUTION", 10i64)].into_iter().collect()
    }

    fn default_seed_flag() -> String {
        "SEED".to_string()
    }
}

impl Default for CommandTemplate {
    fn default() -> Self {
        Self {
            executable: Self::default_executable(),
            fixed: Self::default_fixed(),
            seed_flag: Self::default_seed_flag(),
        }
    }
}

/// One experimental treatment: overrides applied to the plan defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub overrides: ParameterSet,
}

impl Condition {
    pub fn new(overrides: ParameterSet) -> Self {
        Self {
            name: None,
            overrides,
        }
    }
}

/// Full description of an experiment: defaults, conditions and layout knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentPlan {
    /// Default parameters. Their declared order fixes the directory naming order.
    pub defaults: ParameterSet,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default = "ExperimentPlan::default_replicates")]
    pub replicates: usize,
    #[serde(default)]
    pub command: CommandTemplate,
    #[serde(default = "ExperimentPlan::default_separator")]
    pub separator: String,
    #[serde(default = "ExperimentPlan::default_command_file")]
    pub command_file: String,
    /// Seed counter start; the first replicate receives `seed_start + 1`.
    #[serde(default)]
    pub seed_start: u64,
}

impl ExperimentPlan {
    const fn default_replicates() -> usize {
        30
    }

    fn default_separator() -> String {
        "_".to_string()
    }

    fn default_command_file() -> String {
        "command.sh".to_string()
    }

    /// Creates a plan with the standard layout around the given parameters.
    pub fn new(defaults: ParameterSet, conditions: Vec<Condition>) -> Self {
        Self {
            defaults,
            conditions,
            replicates: Self::default_replicates(),
            command: CommandTemplate::default(),
            separator: Self::default_separator(),
            command_file: Self::default_command_file(),
            seed_start: 0,
        }
    }

    /// The NK open-ended-evolution experiment the tooling was written for.
    pub fn nk_oee() -> Self {
        let mut defaults = ParameterSet::new();
        defaults.insert("N", 20i64);
        defaults.insert("K", 3i64);
        defaults.insert("POP_SIZE", 200i64);
        defaults.insert("MUT_RATE", 0.05);
        defaults.insert("TOURNAMENT_SIZE", 2i64);
        defaults.insert("SELECTION", 0i64);
        defaults.insert("CHANGE_RATE", 100000i64);
        defaults.insert("MAX_GENS", 5000i64);
        defaults.insert("FILTER_LENGTH", "POP_SIZE");

        let int = |pairs: &[(&str, i64)]| -> Condition {
            Condition::new(pairs.iter().map(|(k, v)| (*k, *v)).collect())
        };
        let float = |name: &str, value: f64| -> Condition {
            Condition::new([(name, value)].into_iter().collect())
        };
        let mut wide = ParameterSet::new();
        wide.insert("N", 100i64);
        wide.insert("MUT_RATE", 0.01);

        let conditions = vec![
            int(&[]),
            int(&[("K", 10)]),
            Condition::new(wide),
            float("MUT_RATE", 0.005),
            float("MUT_RATE", 0.1),
            int(&[("POP_SIZE", 20)]),
            int(&[("POP_SIZE", 2000)]),
            int(&[("SELECTION", 1)]),
            int(&[("SELECTION", 1), ("FILTER_LENGTH", 1000)]),
            int(&[("CHANGE_RATE", 500)]),
            int(&[("CHANGE_RATE", 500), ("CHANGE_TYPE", 1)]),
        ];
        Self::new(defaults, conditions)
    }

    /// Parses and validates a YAML plan.
    pub fn from_yaml_str(text: &str) -> Result<Self, NkError> {
        let plan: ExperimentPlan = serde_yaml::from_str(text)
            .map_err(|err| NkError::Serde(ErrorInfo::new("plan-yaml", err.to_string())))?;
        plan.validate()?;
        Ok(plan)
    }

    /// Reads, parses and validates a YAML plan file.
    pub fn load(path: &Path) -> Result<Self, NkError> {
        let text = fs::read_to_string(path).map_err(|err| NkError::io("plan-read", path, err))?;
        Self::from_yaml_str(&text).map_err(|err| match err {
            NkError::Serde(info) => {
                NkError::Serde(info.with_context("path", path.display().to_string()))
            }
            other => other,
        })
    }

    /// Checks layout settings that would otherwise produce unusable paths.
    pub fn validate(&self) -> Result<(), NkError> {
        if self.conditions.is_empty() {
            return Err(NkError::Config(
                ErrorInfo::new("no-conditions", "plan declares no conditions")
                    .with_hint("add `- {}` to run the defaults once"),
            ));
        }
        if self.replicates == 0 {
            return Err(plan_error("no-replicates", "replicate count must be positive"));
        }
        if self.separator.is_empty() || self.separator.contains('/') {
            return Err(plan_error(
                "bad-separator",
                format!("separator {:?} cannot join path tokens", self.separator),
            ));
        }
        if self.command_file.is_empty() || self.command_file.contains('/') {
            return Err(plan_error(
                "bad-command-file",
                format!("{:?} is not a plain file name", self.command_file),
            ));
        }
        Ok(())
    }
}
