//! Macros for terse condition and host declarations.

/// Build a [`ConditionSpec`](crate::core::ConditionSpec).
///
/// `key => value` requires an exact value, `key => _` accepts any value,
/// and a trailing `..` relaxes the spec so extra data keys are allowed.
///
/// # Example
///
/// ```
/// use statetable::cond;
/// use statetable::core::ConditionSpec;
///
/// let spec = cond! { "trig" => 10, "lek" => _ };
/// assert_eq!(spec, ConditionSpec::new().eq("trig", 10).any("lek"));
///
/// let relaxed = cond! { "status" => "ok", .. };
/// assert!(relaxed.is_relaxed());
/// assert_eq!(relaxed.key_count(), 1);
/// ```
#[macro_export]
macro_rules! cond {
    (@acc $spec:expr ;) => { $spec };
    (@acc $spec:expr ; .. $(,)?) => { $spec.relaxed() };
    (@acc $spec:expr ; $key:literal => _ $(, $($rest:tt)*)?) => {
        $crate::cond!(@acc $spec.any($key) ; $($($rest)*)?)
    };
    (@acc $spec:expr ; $key:literal => $value:expr $(, $($rest:tt)*)?) => {
        $crate::cond!(@acc $spec.eq($key, $value) ; $($($rest)*)?)
    };
    ($($body:tt)*) => {
        $crate::cond!(@acc $crate::core::ConditionSpec::new() ; $($body)*)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{ConditionSpec, MatchKind};
    use serde_json::json;

    #[test]
    fn empty_macro_builds_strict_empty_spec() {
        let spec = cond! {};

        assert_eq!(spec, ConditionSpec::new());
        assert_eq!(spec.evaluate(&json!({})), Some(MatchKind::Exact));
        assert_eq!(spec.evaluate(&json!({"a": 1})), None);
    }

    #[test]
    fn macro_builds_exact_and_wildcard_entries() {
        let spec = cond! { "trig" => 10, "lek" => _ };

        assert_eq!(spec.key_count(), 2);
        assert_eq!(
            spec.evaluate(&json!({"trig": 10, "lek": "x"})),
            Some(MatchKind::Wildcard)
        );
    }

    #[test]
    fn macro_accepts_trailing_comma() {
        let spec = cond! { "status" => 1, };

        assert_eq!(spec, ConditionSpec::new().eq("status", 1));
    }

    #[test]
    fn relaxed_marker_only_allows_extra_keys() {
        let spec = cond! { "status" => 1, .. };

        assert!(spec.is_relaxed());
        assert_eq!(
            spec.evaluate(&json!({"status": 1, "extra": true})),
            Some(MatchKind::Exact)
        );
    }

    #[test]
    fn macro_accepts_expressions() {
        let limit = 3;
        let spec = cond! { "count" => limit + 1, "name" => "x" };

        assert_eq!(spec.evaluate(&json!({"count": 4, "name": "x"})), Some(MatchKind::Exact));
    }
}
