use std::collections::BTreeSet;

use nk_core::{ErrorInfo, NkError, ParameterSet};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::plan::{CommandTemplate, Condition, ExperimentPlan};

/// Tokenised replicate command with a reserved slot for the seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandLine {
    tokens: Vec<String>,
    seed_slot: usize,
}

impl CommandLine {
    /// Lays out `executable -FIXED v ... -SEED <seed> -NAME value ...`.
    pub fn build(template: &CommandTemplate, params: &ParameterSet) -> Self {
        let mut tokens = vec![template.executable.clone()];
        for (name, value) in template.fixed.iter() {
            tokens.push(format!("-{name}"));
            tokens.push(value.to_string());
        }
        tokens.push(format!("-{}", template.seed_flag));
        let seed_slot = tokens.len();
        tokens.push(String::new());
        for (name, value) in params.iter() {
            tokens.push(format!("-{name}"));
            tokens.push(value.to_string());
        }
        Self { tokens, seed_slot }
    }

    /// Substitutes `seed` and joins the tokens with single spaces.
    pub fn render(&self, seed: u64) -> String {
        self.render_slot(&seed.to_string())
    }

    /// Renders the command with a `{seed}` placeholder.
    pub fn template(&self) -> String {
        self.render_slot("{seed}")
    }

    fn render_slot(&self, seed: &str) -> String {
        self.tokens
            .iter()
            .enumerate()
            .map(|(idx, token)| if idx == self.seed_slot { seed } else { token.as_str() })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A condition after merging, alias resolution and naming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpandedCondition {
    pub name: Option<String>,
    pub dir_name: String,
    pub params: ParameterSet,
    pub command: CommandLine,
}

/// Derives the condition directory name from its effective parameters.
///
/// Underscores are stripped from parameter names so the separator can be
/// split on later; tokens alternate name and value in declared order.
pub fn directory_name(params: &ParameterSet, separator: &str) -> String {
    params
        .iter()
        .flat_map(|(name, value)| [name.replace('_', ""), value.to_string()])
        .collect::<Vec<_>>()
        .join(separator)
}

/// Merges, resolves and names a single condition.
pub fn expand_condition(
    plan: &ExperimentPlan,
    condition: &Condition,
) -> Result<ExpandedCondition, NkError> {
    let mut params = ParameterSet::merged(&plan.defaults, &condition.overrides);
    params.resolve_aliases().map_err(|err| match err {
        NkError::Config(info) => NkError::Config(
            info.with_context("condition", condition_label(condition)),
        ),
        other => other,
    })?;
    if params.is_empty() {
        return Err(NkError::Config(ErrorInfo::new(
            "empty-condition",
            "condition has no parameters to name a directory with",
        )));
    }
    let dir_name = directory_name(&params, &plan.separator);
    if dir_name.contains('/') || dir_name == "." || dir_name == ".." {
        return Err(NkError::Config(
            ErrorInfo::new("bad-directory-name", "parameter values escape the run root")
                .with_context("dir_name", dir_name),
        ));
    }
    let command = CommandLine::build(&plan.command, &params);
    Ok(ExpandedCondition {
        name: condition.name.clone(),
        dir_name,
        params,
        command,
    })
}

/// Expands every condition of the plan, failing before any side effects.
pub fn expand_plan(plan: &ExperimentPlan) -> Result<Vec<ExpandedCondition>, NkError> {
    plan.validate()?;
    let expanded = plan
        .conditions
        .iter()
        .map(|condition| expand_condition(plan, condition))
        .collect::<Result<Vec<_>, _>>()?;
    let mut seen = BTreeSet::new();
    for condition in &expanded {
        if !seen.insert(condition.dir_name.as_str()) {
            warn!(dir = %condition.dir_name, "two conditions share a directory; the later one will reuse its replicates");
        }
    }
    Ok(expanded)
}

fn condition_label(condition: &Condition) -> String {
    match &condition.name {
        Some(name) => name.clone(),
        None if condition.overrides.is_empty() => "defaults".to_string(),
        None => condition
            .overrides
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(","),
    }
}
