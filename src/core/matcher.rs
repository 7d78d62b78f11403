//! Selection of the winning condition transition for a data object.

use super::condition::{ConditionSpec, MatchKind};
use serde_json::Value;

/// Pick the candidate whose condition best matches `data`.
///
/// Candidates are scanned in order. An exact match wins immediately, even
/// over a wildcard match declared earlier. If only wildcard matches exist,
/// the first one declared wins. Data that is not an object matches nothing.
///
/// `condition_of` extracts the condition from a candidate; candidates
/// without one are skipped.
///
/// # Example
///
/// ```rust
/// use statetable::core::{select, ConditionSpec};
/// use serde_json::json;
///
/// let candidates = vec![
///     ("glob", ConditionSpec::new().any("status")),
///     ("one", ConditionSpec::new().eq("status", 1)),
/// ];
///
/// let winner = select(&candidates, &json!({"status": 1}), |c| Some(&c.1));
/// assert_eq!(winner.map(|c| c.0), Some("one"));
///
/// let winner = select(&candidates, &json!({"status": 2}), |c| Some(&c.1));
/// assert_eq!(winner.map(|c| c.0), Some("glob"));
/// ```
pub fn select<'a, T, F>(candidates: &'a [T], data: &Value, condition_of: F) -> Option<&'a T>
where
    F: Fn(&T) -> Option<&ConditionSpec>,
{
    let Value::Object(map) = data else {
        return None;
    };

    let mut first_wildcard = None;
    for candidate in candidates {
        let Some(spec) = condition_of(candidate) else {
            continue;
        };
        match spec.evaluate_map(map) {
            Some(MatchKind::Exact) => return Some(candidate),
            Some(MatchKind::Wildcard) if first_wildcard.is_none() => {
                first_wildcard = Some(candidate)
            }
            _ => {}
        }
    }
    first_wildcard
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pick<'a>(candidates: &'a [(&'static str, ConditionSpec)], data: Value) -> Option<&'a str> {
        select(candidates, &data, |c| Some(&c.1)).map(|c| c.0)
    }

    #[test]
    fn exact_match_outranks_earlier_wildcard() {
        let candidates = vec![
            ("wild", ConditionSpec::new().any("status")),
            ("exact", ConditionSpec::new().eq("status", 1)),
        ];

        assert_eq!(pick(&candidates, json!({"status": 1})), Some("exact"));
    }

    #[test]
    fn first_wildcard_wins_among_wildcards() {
        let candidates = vec![
            ("first", ConditionSpec::new().any("status")),
            ("second", ConditionSpec::new().any("status")),
        ];

        assert_eq!(pick(&candidates, json!({"status": 3})), Some("first"));
    }

    #[test]
    fn first_exact_wins_among_exact() {
        let candidates = vec![
            ("first", ConditionSpec::new().eq("status", 1)),
            ("second", ConditionSpec::new().eq("status", 1)),
        ];

        assert_eq!(pick(&candidates, json!({"status": 1})), Some("first"));
    }

    #[test]
    fn partial_wildcard_counts_as_wildcard() {
        let candidates = vec![
            ("mixed", ConditionSpec::new().eq("trig", 10).any("lek")),
            ("exact", ConditionSpec::new().eq("trig", 10).eq("lek", 18)),
        ];

        assert_eq!(pick(&candidates, json!({"trig": 10, "lek": 18})), Some("exact"));
        assert_eq!(pick(&candidates, json!({"trig": 10, "lek": 5})), Some("mixed"));
    }

    #[test]
    fn no_match_returns_none() {
        let candidates = vec![("one", ConditionSpec::new().eq("status", 1))];

        assert_eq!(pick(&candidates, json!({"status": 8})), None);
        assert_eq!(pick(&candidates, json!(null)), None);
        assert_eq!(pick(&[], json!({"status": 1})), None);
    }

    #[test]
    fn candidates_without_condition_are_skipped() {
        let candidates: Vec<Option<ConditionSpec>> =
            vec![None, Some(ConditionSpec::new().eq("status", 1))];

        let winner = select(&candidates, &json!({"status": 1}), |c| c.as_ref());
        assert!(winner.is_some_and(|c| c.is_some()));
    }
}
