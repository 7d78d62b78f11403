//! Condition specifications tested against flat data objects.
//!
//! A [`ConditionSpec`] is an AND of `key -> pattern` entries. Each pattern is
//! either an exact value or the [`WILDCARD`] sentinel, which matches any value
//! present under that key. The sentinel can also mark a whole spec as
//! *relaxed*, allowing the data object to carry keys the spec never mentions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Sentinel that stands for "any value" in a condition.
///
/// The sentinel is its own type, so no ordinary data value can ever be
/// mistaken for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Wildcard;

/// The module-wide wildcard sentinel.
pub const WILDCARD: Wildcard = Wildcard;

impl fmt::Display for Wildcard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("*")
    }
}

/// What a single condition key expects from the data object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Pattern {
    /// Any value, as long as the key is present.
    Any,
    /// Exactly this value, compared without coercion.
    Exact(Value),
}

impl From<Wildcard> for Pattern {
    fn from(_: Wildcard) -> Self {
        Pattern::Any
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Any => write!(f, "{WILDCARD}"),
            Pattern::Exact(value) => write!(f, "{value}"),
        }
    }
}

/// How a condition matched a data object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchKind {
    /// Every key matched by value.
    Exact,
    /// At least one key matched through a wildcard.
    Wildcard,
}

/// A flat AND-of-keys condition.
///
/// The relaxed flag and the key count are fixed when the spec is built and
/// are never recomputed while matching.
///
/// # Example
///
/// ```rust
/// use statetable::core::{ConditionSpec, MatchKind};
/// use serde_json::json;
///
/// let spec = ConditionSpec::new().eq("trig", 10).any("lek");
///
/// assert_eq!(spec.evaluate(&json!({"trig": 10, "lek": 18})), Some(MatchKind::Wildcard));
/// assert_eq!(spec.evaluate(&json!({"trig": 7, "lek": 18})), None);
/// // strict specs reject unaccounted-for keys
/// assert_eq!(spec.evaluate(&json!({"trig": 10, "lek": 1, "x": 0})), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "SpecRepr")]
pub struct ConditionSpec {
    entries: Vec<(String, Pattern)>,
    relaxed: bool,
    #[serde(skip_serializing)]
    key_count: usize,
}

/// Serialized form. The key count is always derived from the entries,
/// never trusted from input.
#[derive(Deserialize)]
struct SpecRepr {
    entries: Vec<(String, Pattern)>,
    #[serde(default)]
    relaxed: bool,
}

impl From<SpecRepr> for ConditionSpec {
    fn from(repr: SpecRepr) -> Self {
        let spec = repr
            .entries
            .into_iter()
            .fold(ConditionSpec::new(), |spec, (key, pattern)| spec.with(key, pattern));
        if repr.relaxed {
            spec.relaxed()
        } else {
            spec
        }
    }
}

impl ConditionSpec {
    /// Create an empty, strict condition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `key` to be present with exactly `value`.
    pub fn eq(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(key, Pattern::Exact(value.into()))
    }

    /// Require `key` to be present with any value.
    pub fn any(self, key: impl Into<String>) -> Self {
        self.with(key, Pattern::Any)
    }

    /// Add an entry with an explicit pattern.
    ///
    /// Repeating a key replaces its earlier pattern.
    pub fn with(mut self, key: impl Into<String>, pattern: impl Into<Pattern>) -> Self {
        let key = key.into();
        let pattern = pattern.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = pattern,
            None => self.entries.push((key, pattern)),
        }
        self.key_count = self.entries.len();
        self
    }

    /// Allow the data object to carry keys this spec does not name.
    ///
    /// This is the wildcard used as a key rather than as a value.
    pub fn relaxed(mut self) -> Self {
        self.relaxed = true;
        self
    }

    /// Whether extra keys in the data object are tolerated.
    pub fn is_relaxed(&self) -> bool {
        self.relaxed
    }

    /// Number of named keys, excluding the relaxed marker.
    pub fn key_count(&self) -> usize {
        self.key_count
    }

    /// Iterate the named entries in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Pattern)> {
        self.entries.iter().map(|(k, p)| (k.as_str(), p))
    }

    /// Test `data` against this spec.
    ///
    /// Returns `None` when `data` is not an object or does not satisfy the
    /// spec, otherwise the kind of match.
    pub fn evaluate(&self, data: &Value) -> Option<MatchKind> {
        match data {
            Value::Object(map) => self.evaluate_map(map),
            _ => None,
        }
    }

    pub(crate) fn evaluate_map(&self, data: &Map<String, Value>) -> Option<MatchKind> {
        let mut wildcard_hits = 0usize;
        for (key, pattern) in &self.entries {
            let value = data.get(key)?;
            match pattern {
                Pattern::Any => wildcard_hits += 1,
                Pattern::Exact(expected) if expected == value => {}
                Pattern::Exact(_) => return None,
            }
        }

        if !self.relaxed && data.len() != self.key_count {
            return None;
        }

        Some(if wildcard_hits == 0 {
            MatchKind::Exact
        } else {
            MatchKind::Wildcard
        })
    }
}

impl fmt::Display for ConditionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, pattern)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {pattern}")?;
        }
        if self.relaxed {
            if !self.entries.is_empty() {
                f.write_str(", ")?;
            }
            write!(f, "{WILDCARD}: ..")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn exact_spec_matches_same_keys_and_values() {
        let spec = ConditionSpec::new().eq("status", 1);

        assert_eq!(spec.evaluate(&json!({"status": 1})), Some(MatchKind::Exact));
        assert_eq!(spec.evaluate(&json!({"status": 2})), None);
    }

    #[test]
    fn missing_key_fails() {
        let spec = ConditionSpec::new().eq("trig", 7).eq("lek", 15);

        assert_eq!(spec.evaluate(&json!({"lek": 15})), None);
    }

    #[test]
    fn strict_spec_rejects_extra_keys() {
        let spec = ConditionSpec::new().eq("status", 1);

        assert_eq!(spec.evaluate(&json!({"status": 1, "other": 0})), None);
    }

    #[test]
    fn relaxed_spec_accepts_extra_keys() {
        let spec = ConditionSpec::new().eq("status", 1).relaxed();

        assert_eq!(
            spec.evaluate(&json!({"status": 1, "other": 0})),
            Some(MatchKind::Exact)
        );
        assert_eq!(spec.key_count(), 1);
        assert!(spec.is_relaxed());
    }

    #[test]
    fn wildcard_value_requires_key_presence() {
        let spec = ConditionSpec::new().any("status");

        assert_eq!(
            spec.evaluate(&json!({"status": "anything"})),
            Some(MatchKind::Wildcard)
        );
        assert_eq!(spec.evaluate(&json!({"other": 1})), None);
    }

    #[test]
    fn values_compare_without_coercion() {
        let spec = ConditionSpec::new().eq("status", 1);

        assert_eq!(spec.evaluate(&json!({"status": "1"})), None);
        assert_eq!(spec.evaluate(&json!({"status": true})), None);
    }

    #[test]
    fn non_object_data_never_matches() {
        let spec = ConditionSpec::new().relaxed();

        assert_eq!(spec.evaluate(&json!([1, 2])), None);
        assert_eq!(spec.evaluate(&json!("status")), None);
        assert_eq!(spec.evaluate(&Value::Null), None);
    }

    #[test]
    fn repeated_key_replaces_pattern() {
        let spec = ConditionSpec::new().eq("status", 1).any("status");

        assert_eq!(spec.key_count(), 1);
        assert_eq!(
            spec.evaluate(&json!({"status": 9})),
            Some(MatchKind::Wildcard)
        );
    }

    #[test]
    fn wildcard_converts_to_any_pattern() {
        let spec = ConditionSpec::new().with("lek", WILDCARD);

        assert_eq!(spec.entries().next(), Some(("lek", &Pattern::Any)));
    }

    #[test]
    fn display_lists_entries() {
        let spec = ConditionSpec::new().eq("trig", 10).any("lek").relaxed();

        assert_eq!(spec.to_string(), "{trig: 10, lek: *, *: ..}");
    }

    #[test]
    fn deserializing_recomputes_key_count() {
        let spec: ConditionSpec = serde_json::from_value(json!({
            "entries": [["status", {"Exact": 1}]],
            "relaxed": false,
            "key_count": 0
        }))
        .unwrap();

        assert_eq!(spec.key_count(), 1);
        assert_eq!(spec.evaluate(&json!({"status": 1})), Some(MatchKind::Exact));
        assert_eq!(spec.evaluate(&json!({"status": 1, "x": 0})), None);
    }

    #[test]
    fn deserializing_collapses_repeated_keys() {
        let spec: ConditionSpec = serde_json::from_value(json!({
            "entries": [["status", {"Exact": 1}], ["status", "Any"]]
        }))
        .unwrap();

        assert_eq!(spec, ConditionSpec::new().any("status"));
    }

    #[test]
    fn serde_round_trip_keeps_matching() {
        let spec = ConditionSpec::new().eq("trig", 10).any("lek").relaxed();

        let json = serde_json::to_string(&spec).unwrap();
        assert!(!json.contains("key_count"));
        let restored: ConditionSpec = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, spec);
    }
}
