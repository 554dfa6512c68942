//! Search context: the bag of named string parameters handed to an algorithm.
//!
//! The context never interprets its values. Each algorithm reads the keys it
//! knows through the typed accessors, which report a [`ParameterError`]
//! naming the key when a value cannot be converted.

use std::collections::BTreeMap;
use std::str::FromStr;

use tracing::warn;

use crate::error::ParameterError;

/// Immutable mapping from parameter name to raw string value.
///
/// # Examples
///
/// ```
/// use u_search::SearchContext;
///
/// let ctx = SearchContext::parse("weight=1.5,max_expansions=1000").unwrap();
/// assert_eq!(ctx.get_float("weight").unwrap(), Some(1.5));
/// assert_eq!(ctx.usize_or("max_expansions", 10).unwrap(), 1000);
/// assert_eq!(ctx.usize_or("max_depth", 10).unwrap(), 10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchContext {
    params: BTreeMap<String, String>,
}

impl SearchContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a context from `(key, value)` pairs. Later duplicates win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            params: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parses `key1=value1,key2=value2`.
    ///
    /// Whitespace around keys and values is trimmed and empty entries are
    /// skipped. An entry without `=` or with an empty key is rejected.
    pub fn parse(input: &str) -> Result<Self, ParameterError> {
        let mut params = BTreeMap::new();
        for entry in input.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let (key, value) = entry
                .split_once('=')
                .ok_or_else(|| ParameterError::Malformed {
                    entry: entry.to_string(),
                })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(ParameterError::Malformed {
                    entry: entry.to_string(),
                });
            }
            params.insert(key.to_string(), value.trim().to_string());
        }
        Ok(Self { params })
    }

    /// Returns a new context with `other`'s entries layered over this one.
    pub fn merged_with(&self, other: &SearchContext) -> SearchContext {
        let mut params = self.params.clone();
        params.extend(other.params.iter().map(|(k, v)| (k.clone(), v.clone())));
        SearchContext { params }
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn get_int(&self, key: &str) -> Result<Option<i64>, ParameterError> {
        self.parse_as(key, "integer")
    }

    pub fn get_usize(&self, key: &str) -> Result<Option<usize>, ParameterError> {
        self.parse_as(key, "non-negative integer")
    }

    pub fn get_u64(&self, key: &str) -> Result<Option<u64>, ParameterError> {
        self.parse_as(key, "non-negative integer")
    }

    /// Reads a finite float. `NaN` and infinities are rejected.
    pub fn get_float(&self, key: &str) -> Result<Option<f64>, ParameterError> {
        match self.parse_as::<f64>(key, "float")? {
            Some(v) if !v.is_finite() => Err(ParameterError::out_of_range(
                key,
                format!("must be finite, got {v}"),
            )),
            other => Ok(other),
        }
    }

    /// Accepts `true/false`, `yes/no`, `on/off`, `1/0` (case-insensitive).
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, ParameterError> {
        let Some(raw) = self.get_string(key) else {
            return Ok(None);
        };
        match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(Some(true)),
            "false" | "no" | "off" | "0" => Ok(Some(false)),
            _ => Err(ParameterError::Invalid {
                key: key.to_string(),
                value: raw.to_string(),
                expected: "boolean",
            }),
        }
    }

    pub fn int_or(&self, key: &str, default: i64) -> Result<i64, ParameterError> {
        Ok(self.get_int(key)?.unwrap_or(default))
    }

    pub fn usize_or(&self, key: &str, default: usize) -> Result<usize, ParameterError> {
        Ok(self.get_usize(key)?.unwrap_or(default))
    }

    pub fn u64_or(&self, key: &str, default: u64) -> Result<u64, ParameterError> {
        Ok(self.get_u64(key)?.unwrap_or(default))
    }

    pub fn float_or(&self, key: &str, default: f64) -> Result<f64, ParameterError> {
        Ok(self.get_float(key)?.unwrap_or(default))
    }

    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool, ParameterError> {
        Ok(self.get_bool(key)?.unwrap_or(default))
    }

    /// Keys not listed in `known`, in sorted order.
    pub fn unknown_keys(&self, known: &[&str]) -> Vec<&str> {
        self.params
            .keys()
            .map(String::as_str)
            .filter(|key| !known.contains(key))
            .collect()
    }

    /// Logs every key not listed in `known`.
    ///
    /// Unknown keys are the algorithm's concern; they are reported, not rejected.
    pub fn warn_unknown(&self, algorithm: &str, known: &[&str]) {
        for key in self.unknown_keys(known) {
            warn!(algorithm, key, "ignoring unrecognised search parameter");
        }
    }

    fn parse_as<T: FromStr>(
        &self,
        key: &str,
        expected: &'static str,
    ) -> Result<Option<T>, ParameterError> {
        let Some(raw) = self.get_string(key) else {
            return Ok(None);
        };
        raw.parse::<T>()
            .map(Some)
            .map_err(|_| ParameterError::Invalid {
                key: key.to_string(),
                value: raw.to_string(),
                expected,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs() {
        let ctx = SearchContext::parse("a=1, b = two ,c=").unwrap();
        assert_eq!(ctx.len(), 3);
        assert_eq!(ctx.get_string("a"), Some("1"));
        assert_eq!(ctx.get_string("b"), Some("two"));
        assert_eq!(ctx.get_string("c"), Some(""));
    }

    #[test]
    fn test_parse_empty() {
        let ctx = SearchContext::parse("").unwrap();
        assert!(ctx.is_empty());
        let ctx = SearchContext::parse(",,").unwrap();
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_parse_rejects_missing_equals() {
        let err = SearchContext::parse("a=1,oops").unwrap_err();
        assert_eq!(
            err,
            ParameterError::Malformed {
                entry: "oops".into()
            }
        );
    }

    #[test]
    fn test_parse_rejects_empty_key() {
        assert!(SearchContext::parse("=3").is_err());
    }

    #[test]
    fn test_typed_accessors() {
        let ctx = SearchContext::from_pairs([
            ("n", "-4"),
            ("u", "12"),
            ("f", "0.25"),
            ("b", "Yes"),
        ]);
        assert_eq!(ctx.get_int("n").unwrap(), Some(-4));
        assert_eq!(ctx.get_usize("u").unwrap(), Some(12));
        assert_eq!(ctx.get_u64("u").unwrap(), Some(12));
        assert_eq!(ctx.get_float("f").unwrap(), Some(0.25));
        assert_eq!(ctx.get_bool("b").unwrap(), Some(true));
        assert_eq!(ctx.get_int("missing").unwrap(), None);
    }

    #[test]
    fn test_conversion_error_names_key() {
        let ctx = SearchContext::from_pairs([("max_depth", "deep")]);
        match ctx.get_usize("max_depth") {
            Err(ParameterError::Invalid { key, value, .. }) => {
                assert_eq!(key, "max_depth");
                assert_eq!(value, "deep");
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_rejected_for_usize() {
        let ctx = SearchContext::from_pairs([("n", "-1")]);
        assert!(ctx.get_usize("n").is_err());
    }

    #[test]
    fn test_non_finite_float_rejected() {
        let ctx = SearchContext::from_pairs([("w", "NaN")]);
        assert!(matches!(
            ctx.get_float("w"),
            Err(ParameterError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_defaults() {
        let ctx = SearchContext::new();
        assert_eq!(ctx.usize_or("x", 7).unwrap(), 7);
        assert!(ctx.bool_or("y", true).unwrap());
        assert!((ctx.float_or("z", 0.5).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_merged_with_overrides() {
        let base = SearchContext::from_pairs([("a", "1"), ("b", "2")]);
        let over = SearchContext::from_pairs([("b", "3")]);
        let merged = base.merged_with(&over);
        assert_eq!(merged.get_string("a"), Some("1"));
        assert_eq!(merged.get_string("b"), Some("3"));
    }
}
