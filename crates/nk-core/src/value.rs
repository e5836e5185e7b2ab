//! Tagged parameter values and their command-line stringification.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// A single parameter value as it appears in a plan.
///
/// Numeric and textual values are kept apart so that formatting into command
/// tokens and directory names is well defined. Textual values may name another
/// parameter, in which case they are resolved as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    /// Returns the referenced parameter name when the value is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(value) => write!(f, "{value}"),
            ParamValue::Float(value) => {
                let rendered = value.to_string();
                // Whole floats keep a trailing ".0" so `1.0` never collides with `1`.
                if value.is_finite() && !rendered.contains(|c: char| c == '.' || c == 'e') {
                    write!(f, "{rendered}.0")
                } else {
                    write!(f, "{rendered}")
                }
            }
            ParamValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::ParamValue;

    #[test]
    fn formats_like_plan_literals() {
        assert_eq!(ParamValue::Int(100000).to_string(), "100000");
        assert_eq!(ParamValue::Float(0.05).to_string(), "0.05");
        assert_eq!(ParamValue::Float(0.005).to_string(), "0.005");
        assert_eq!(ParamValue::Float(2.0).to_string(), "2.0");
        assert_eq!(ParamValue::from("POP_SIZE").to_string(), "POP_SIZE");
    }

    #[test]
    fn yaml_scalars_pick_the_right_tag() {
        let values: Vec<ParamValue> = serde_yaml::from_str("[20, 0.05, POP_SIZE]").unwrap();
        assert_eq!(
            values,
            vec![
                ParamValue::Int(20),
                ParamValue::Float(0.05),
                ParamValue::Text("POP_SIZE".into())
            ]
        );
    }
}
