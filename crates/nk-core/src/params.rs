//! Ordered parameter sets, override merging and alias resolution.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, NkError};
use crate::value::ParamValue;

/// Ordered mapping from parameter name to value.
///
/// Iteration order is the declared order: keys keep the position of their
/// first insertion, and overriding a key replaces the value in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet {
    values: IndexMap<String, ParamValue>,
}

impl ParameterSet {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a parameter, returning the previous value.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.values.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(name, value)` pairs in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> + '_ {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Iterates over parameter names in declared order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys().map(String::as_str)
    }

    /// Applies `overrides` on top of `defaults`.
    ///
    /// Defaults keep their declared order; keys that only exist in the
    /// overrides are appended afterwards in override order.
    pub fn merged(defaults: &ParameterSet, overrides: &ParameterSet) -> ParameterSet {
        let mut merged = defaults.clone();
        for (name, value) in overrides.iter() {
            merged.insert(name, value.clone());
        }
        merged
    }

    /// Replaces every value that names another parameter with that
    /// parameter's terminal value, following chains of aliases.
    ///
    /// Every parameter is resolved against the set as it was before the call,
    /// so the result does not depend on iteration order. A chain that revisits
    /// a parameter is rejected as a configuration error.
    pub fn resolve_aliases(&mut self) -> Result<(), NkError> {
        let resolved = self
            .values
            .keys()
            .map(|name| self.resolve(name))
            .collect::<Result<Vec<_>, _>>()?;
        for (slot, value) in self.values.values_mut().zip(resolved) {
            *slot = value;
        }
        Ok(())
    }

    /// Follows the alias chain starting at `name` to its terminal value.
    pub fn resolve(&self, name: &str) -> Result<ParamValue, NkError> {
        let mut current = self.values.get(name).ok_or_else(|| {
            NkError::Config(
                ErrorInfo::new("unknown-parameter", "parameter is not defined")
                    .with_context("parameter", name),
            )
        })?;
        let mut chain = vec![name.to_string()];
        while let Some(target) = current.as_text() {
            let Some(next) = self.values.get(target) else {
                break;
            };
            if chain.iter().any(|seen| seen == target) {
                chain.push(target.to_string());
                return Err(NkError::Config(
                    ErrorInfo::new("alias-cycle", "parameter aliases form a cycle")
                        .with_context("parameter", name)
                        .with_context("chain", chain.join(" -> "))
                        .with_hint("give one parameter in the chain a literal value"),
                ));
            }
            chain.push(target.to_string());
            current = next;
        }
        Ok(current.clone())
    }
}

impl<K, V> FromIterator<(K, V)> for ParameterSet
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = ParameterSet::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}
