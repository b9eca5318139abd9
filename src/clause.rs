//! Clause argument normalization.
//!
//! Every clause-setting operation accepts either one pre-joined string,
//! or a sequence of elemental strings. Both shapes collapse into a single
//! separator-joined clause string.

use crate::error::{DwqError, DwqResult};
use serde::{Deserialize, Serialize};

/// Arguments to a clause-setting operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Args {
    /// A single, possibly pre-joined string: `"a,b,c"`.
    One(String),
    /// A sequence of elemental strings: `["a", "b", "c"]`.
    Many(Vec<String>),
}

impl Args {
    /// Collapse into a single clause string, or `None` for an empty
    /// sequence (clause absent).
    ///
    /// A `One` value is returned unchanged; a one-element sequence joins
    /// to its element with no trailing separator.
    pub fn to_clause(&self, sep: &str) -> Option<String> {
        match self {
            Args::One(s) => Some(s.clone()),
            Args::Many(v) if v.is_empty() => None,
            Args::Many(v) => Some(v.join(sep)),
        }
    }
}

impl From<&str> for Args {
    fn from(s: &str) -> Self {
        Args::One(s.to_string())
    }
}

impl From<String> for Args {
    fn from(s: String) -> Self {
        Args::One(s)
    }
}

impl From<Vec<String>> for Args {
    fn from(v: Vec<String>) -> Self {
        Args::Many(v)
    }
}

impl From<Vec<&str>> for Args {
    fn from(v: Vec<&str>) -> Self {
        Args::Many(v.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Args {
    fn from(v: &[&str]) -> Self {
        Args::Many(v.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Args {
    fn from(v: [&str; N]) -> Self {
        Args::Many(v.iter().map(|s| s.to_string()).collect())
    }
}

impl TryFrom<&serde_json::Value> for Args {
    type Error = DwqError;

    /// Dynamic entry for JSON-driven query building: a string maps to
    /// `One`, an array of strings maps to `Many`.
    fn try_from(value: &serde_json::Value) -> DwqResult<Self> {
        match value {
            serde_json::Value::String(s) => Ok(Args::One(s.clone())),
            serde_json::Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        serde_json::Value::String(s) => out.push(s.clone()),
                        other => {
                            return Err(DwqError::InvalidArgs(format!(
                                "expected a string element, got {other}"
                            )));
                        }
                    }
                }
                Ok(Args::Many(out))
            }
            other => Err(DwqError::InvalidArgs(format!(
                "expected a string or an array of strings, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_one_passes_through() {
        let args: Args = "a,b,c".into();
        assert_eq!(args.to_clause(","), Some("a,b,c".to_string()));
    }

    #[test]
    fn test_many_joins() {
        let args: Args = vec!["a", "b", "c"].into();
        assert_eq!(args.to_clause(","), Some("a,b,c".to_string()));
    }

    #[test]
    fn test_array_form_joins() {
        let args: Args = ["a", "b", "c"].into();
        assert_eq!(args.to_clause(","), Some("a,b,c".to_string()));
    }

    #[test]
    fn test_single_element_no_trailing_separator() {
        let args: Args = vec!["a"].into();
        assert_eq!(args.to_clause(","), Some("a".to_string()));
    }

    #[test]
    fn test_empty_sequence_is_absent() {
        let args = Args::Many(vec![]);
        assert_eq!(args.to_clause(","), None);
    }

    #[test]
    fn test_equivalent_shapes_render_identically() {
        let shapes: [Args; 3] = ["a,b,c".into(), vec!["a", "b", "c"].into(), ["a", "b", "c"].into()];
        for args in &shapes {
            assert_eq!(args.to_clause(","), Some("a,b,c".to_string()));
        }
    }

    #[test]
    fn test_json_string() {
        let args = Args::try_from(&json!("x > 5")).unwrap();
        assert_eq!(args, Args::One("x > 5".to_string()));
    }

    #[test]
    fn test_json_array() {
        let args = Args::try_from(&json!(["a", "b"])).unwrap();
        assert_eq!(args, Args::Many(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_json_bad_shape() {
        assert!(matches!(
            Args::try_from(&json!(42)),
            Err(DwqError::InvalidArgs(_))
        ));
        assert!(matches!(
            Args::try_from(&json!(["a", 1])),
            Err(DwqError::InvalidArgs(_))
        ));
    }
}
