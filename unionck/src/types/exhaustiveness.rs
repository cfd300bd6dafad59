//! Exhaustiveness checking for matches over closed unions
//!
//! A union value holds exactly one of a fixed list of variant types. A
//! match over it is exhaustive when every variant is *soundly* covered:
//! - a discard arm covers everything
//! - a type-test arm covers its type completely
//! - a literal arm covers only one value of its type, so it counts as
//!   coverage only when a type-test for the same type is also present
//!
//! Types are compared through a caller-supplied [`TypeEquality`] policy, so
//! the checker never needs to know how the host spells or aliases types.
//! Patterns whose type the host could not resolve contribute no coverage.
//!
//! Everything here is pure: no allocation outlives a call and no input is
//! mutated, so independent matches can be checked from any thread.

use std::collections::HashSet;
use std::hash::Hash;

/// Equality policy for types
///
/// Two types are the same type iff their keys are equal. This lets a host
/// fold aliases, generic spellings or nullability annotations into one key.
pub trait TypeEquality<T> {
    type Key: Eq + Hash;

    fn key(&self, ty: &T) -> Self::Key;
}

/// Types are equal when `T: Eq` says so
#[derive(Debug, Clone, Copy, Default)]
pub struct NominalEquality;

impl<T: Clone + Eq + Hash> TypeEquality<T> for NominalEquality {
    type Key = T;

    fn key(&self, ty: &T) -> T {
        ty.clone()
    }
}

/// What the checker needs to know about one arm's pattern
///
/// `None` means the host could not resolve the pattern's type.
#[derive(Debug, PartialEq, Eq)]
pub enum PatternKind<'a, T> {
    Discard,
    /// A constant, with its converted type
    Literal(Option<&'a T>),
    /// A type pattern, with the tested type
    TypeTest(Option<&'a T>),
}

// Derived Clone/Copy would demand `T: Copy`.
impl<T> Clone for PatternKind<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PatternKind<'_, T> {}

/// Outcome of [`check`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResult<T> {
    Exhaustive,
    /// Variants not soundly covered, in declaration order. Never empty.
    Missing(Vec<T>),
}

impl<T> CheckResult<T> {
    pub fn is_exhaustive(&self) -> bool {
        matches!(self, CheckResult::Exhaustive)
    }

    pub fn missing(&self) -> &[T] {
        match self {
            CheckResult::Exhaustive => &[],
            CheckResult::Missing(missing) => missing,
        }
    }
}

/// Full result of analysing a match's arms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExhaustivenessReport<T> {
    pub result: CheckResult<T>,
    /// Indices of arms that can never match
    pub unreachable_arms: Vec<usize>,
    /// Variants matched only by literal arms (subset of the missing variants)
    pub literal_only: Vec<T>,
}

/// Key sets of the resolved literal and type-test patterns
struct Coverage<K> {
    has_discard: bool,
    literals: HashSet<K>,
    type_tests: HashSet<K>,
}

impl<K: Eq + Hash> Coverage<K> {
    fn collect<T, E>(patterns: &[PatternKind<'_, T>], eq: &E) -> Self
    where
        E: TypeEquality<T, Key = K>,
    {
        let mut coverage = Coverage {
            has_discard: false,
            literals: HashSet::new(),
            type_tests: HashSet::new(),
        };

        for pattern in patterns {
            match *pattern {
                PatternKind::Discard => coverage.has_discard = true,
                PatternKind::Literal(Some(ty)) => {
                    coverage.literals.insert(eq.key(ty));
                }
                PatternKind::TypeTest(Some(ty)) => {
                    coverage.type_tests.insert(eq.key(ty));
                }
                PatternKind::Literal(None) | PatternKind::TypeTest(None) => {}
            }
        }

        coverage
    }

    /// A literal only proves one value of its type; it counts when a
    /// type-test for the same type exists, which then covers the type anyway.
    /// So the soundly covered set is exactly the type-test set.
    fn covers(&self, key: &K) -> bool {
        self.type_tests.contains(key)
    }
}

/// Decide whether `patterns` cover every one of `variants`
///
/// Missing variants come back in declaration order; variants that are equal
/// under `eq` are reported once.
pub fn check<T, E>(variants: &[T], patterns: &[PatternKind<'_, T>], eq: &E) -> CheckResult<T>
where
    T: Clone,
    E: TypeEquality<T>,
{
    if patterns.iter().any(|p| matches!(p, PatternKind::Discard)) {
        return CheckResult::Exhaustive;
    }

    let coverage = Coverage::collect(patterns, eq);
    let mut reported = HashSet::new();
    let missing: Vec<T> = variants
        .iter()
        .filter(|variant| {
            let key = eq.key(variant);
            !coverage.covers(&key) && reported.insert(key)
        })
        .cloned()
        .collect();

    if missing.is_empty() {
        CheckResult::Exhaustive
    } else {
        CheckResult::Missing(missing)
    }
}

/// Arms that can never match, in arm order
///
/// An arm is unreachable when it follows a discard, or when an earlier
/// type-test already matched its type. Unresolved patterns are never
/// reported since nothing is known about them.
pub fn find_unreachable_arms<T, E>(patterns: &[PatternKind<'_, T>], eq: &E) -> Vec<usize>
where
    E: TypeEquality<T>,
{
    let mut unreachable = vec![];
    let mut seen_discard = false;
    let mut tested = HashSet::new();

    for (i, pattern) in patterns.iter().enumerate() {
        if seen_discard {
            unreachable.push(i);
            continue;
        }

        match *pattern {
            PatternKind::Discard => seen_discard = true,
            PatternKind::TypeTest(Some(ty)) => {
                if !tested.insert(eq.key(ty)) {
                    unreachable.push(i);
                }
            }
            PatternKind::Literal(Some(ty)) => {
                if tested.contains(&eq.key(ty)) {
                    unreachable.push(i);
                }
            }
            PatternKind::Literal(None) | PatternKind::TypeTest(None) => {}
        }
    }

    unreachable
}

/// Variants that some literal arm touches but no type-test covers
///
/// Empty when a discard is present, since nothing is missing then.
pub fn literal_only_variants<T, E>(
    variants: &[T],
    patterns: &[PatternKind<'_, T>],
    eq: &E,
) -> Vec<T>
where
    T: Clone,
    E: TypeEquality<T>,
{
    let coverage = Coverage::collect(patterns, eq);
    if coverage.has_discard {
        return vec![];
    }

    let mut reported = HashSet::new();
    variants
        .iter()
        .filter(|variant| {
            let key = eq.key(variant);
            coverage.literals.contains(&key) && !coverage.covers(&key) && reported.insert(key)
        })
        .cloned()
        .collect()
}

/// Run [`check`], [`find_unreachable_arms`] and [`literal_only_variants`]
pub fn analyze_arms<T, E>(
    variants: &[T],
    patterns: &[PatternKind<'_, T>],
    eq: &E,
) -> ExhaustivenessReport<T>
where
    T: Clone,
    E: TypeEquality<T>,
{
    ExhaustivenessReport {
        result: check(variants, patterns, eq),
        unreachable_arms: find_unreachable_arms(patterns, eq),
        literal_only: literal_only_variants(variants, patterns, eq),
    }
}

/// Format the list of missing variants for a message
///
/// Lists up to three names and summarises the rest as "and N more".
pub fn format_missing<T: std::fmt::Display>(missing: &[T]) -> String {
    const SHOWN: usize = 3;

    let quoted: Vec<String> = missing.iter().take(SHOWN).map(|t| format!("`{t}`")).collect();
    if missing.len() > SHOWN {
        format!("{} and {} more", quoted.join(", "), missing.len() - SHOWN)
    } else {
        quoted.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Case-insensitive names, standing in for a host's alias-aware policy
    struct CaseInsensitive;

    impl TypeEquality<&'static str> for CaseInsensitive {
        type Key = String;

        fn key(&self, ty: &&'static str) -> String {
            ty.to_ascii_lowercase()
        }
    }

    const A: &str = "A";
    const B: &str = "B";
    const C: &str = "C";

    fn run(
        variants: &[&'static str],
        patterns: &[PatternKind<'_, &'static str>],
    ) -> CheckResult<&'static str> {
        check(variants, patterns, &NominalEquality)
    }

    #[test]
    fn test_discard_alone_is_exhaustive() {
        assert_eq!(run(&[A, B, C], &[PatternKind::Discard]), CheckResult::Exhaustive);
    }

    #[test]
    fn test_discard_subsumes_any_other_arms() {
        let patterns = [
            PatternKind::Literal(Some(&A)),
            PatternKind::TypeTest(None),
            PatternKind::Discard,
        ];
        assert_eq!(run(&[A, B, C], &patterns), CheckResult::Exhaustive);
    }

    #[test]
    fn test_full_type_coverage_any_order() {
        let patterns = [
            PatternKind::TypeTest(Some(&C)),
            PatternKind::TypeTest(Some(&A)),
            PatternKind::TypeTest(Some(&B)),
        ];
        assert!(run(&[A, B, C], &patterns).is_exhaustive());
    }

    #[test]
    fn test_partial_coverage_reports_missing() {
        let patterns = [PatternKind::TypeTest(Some(&A)), PatternKind::TypeTest(Some(&B))];
        assert_eq!(run(&[A, B, C], &patterns), CheckResult::Missing(vec![C]));
    }

    #[test]
    fn test_lone_literal_is_insufficient() {
        let int = "Int32";
        let patterns = [PatternKind::Literal(Some(&int)), PatternKind::TypeTest(Some(&B))];
        assert_eq!(run(&[int, B], &patterns), CheckResult::Missing(vec![int]));
    }

    #[test]
    fn test_literal_alongside_type_test_is_covered() {
        let patterns = [
            PatternKind::TypeTest(Some(&A)),
            PatternKind::Literal(Some(&A)),
            PatternKind::TypeTest(Some(&B)),
        ];
        assert_eq!(run(&[A, B], &patterns), CheckResult::Exhaustive);
    }

    #[test]
    fn test_literal_before_type_test_is_covered() {
        let patterns = [PatternKind::Literal(Some(&A)), PatternKind::TypeTest(Some(&A))];
        assert!(run(&[A], &patterns).is_exhaustive());
    }

    #[test]
    fn test_only_literal_reports_every_variant() {
        let patterns = [PatternKind::Literal(Some(&A))];
        assert_eq!(run(&[A, B], &patterns), CheckResult::Missing(vec![A, B]));
    }

    #[test]
    fn test_missing_follows_declared_order() {
        let patterns = [PatternKind::TypeTest(Some(&B))];
        assert_eq!(run(&[C, B, A], &patterns), CheckResult::Missing(vec![C, A]));
    }

    #[test]
    fn test_unresolved_patterns_contribute_nothing() {
        let patterns = [PatternKind::TypeTest(None), PatternKind::Literal(None)];
        assert_eq!(run(&[A, B], &patterns), CheckResult::Missing(vec![A, B]));
    }

    #[test]
    fn test_type_test_outside_union_is_ignored() {
        let other = "Other";
        let patterns = [PatternKind::TypeTest(Some(&other)), PatternKind::TypeTest(Some(&A))];
        assert_eq!(run(&[A, B], &patterns), CheckResult::Missing(vec![B]));
    }

    #[test]
    fn test_idempotent() {
        let patterns = [PatternKind::Literal(Some(&A)), PatternKind::TypeTest(Some(&B))];
        let first = run(&[A, B, C], &patterns);
        let second = run(&[A, B, C], &patterns);
        assert_eq!(first, second);
    }

    #[test]
    fn test_order_independent() {
        let patterns = [
            PatternKind::Literal(Some(&A)),
            PatternKind::TypeTest(Some(&B)),
            PatternKind::TypeTest(Some(&A)),
        ];
        let expected = run(&[A, B, C], &patterns);

        let mut reversed = patterns;
        reversed.reverse();
        assert_eq!(run(&[A, B, C], &reversed), expected);

        let rotated = [patterns[1], patterns[2], patterns[0]];
        assert_eq!(run(&[A, B, C], &rotated), expected);
        assert_eq!(expected, CheckResult::Missing(vec![C]));
    }

    #[test]
    fn test_equality_policy_is_used() {
        let lower_a = "a";
        let patterns = [PatternKind::TypeTest(Some(&lower_a))];
        assert_eq!(
            check(&[A, B], &patterns, &CaseInsensitive),
            CheckResult::Missing(vec![B])
        );
        // Under nominal equality the spelling matters.
        assert_eq!(run(&[A, B], &patterns), CheckResult::Missing(vec![A, B]));
    }

    #[test]
    fn test_equal_variants_reported_once() {
        let lower_a = "a";
        let result = check(&[A, lower_a, B], &[PatternKind::TypeTest(Some(&B))], &CaseInsensitive);
        assert_eq!(result, CheckResult::Missing(vec![A]));
    }

    #[test]
    fn test_missing_accessor() {
        assert!(CheckResult::<&str>::Exhaustive.missing().is_empty());
        assert_eq!(CheckResult::Missing(vec![A]).missing(), &[A]);
    }

    #[test]
    fn test_unreachable_after_discard() {
        let patterns = [
            PatternKind::TypeTest(Some(&A)),
            PatternKind::Discard,
            PatternKind::TypeTest(Some(&B)),
            PatternKind::Discard,
        ];
        assert_eq!(find_unreachable_arms(&patterns, &NominalEquality), vec![2, 3]);
    }

    #[test]
    fn test_unreachable_duplicate_type_test() {
        let patterns = [
            PatternKind::TypeTest(Some(&A)),
            PatternKind::TypeTest(Some(&B)),
            PatternKind::TypeTest(Some(&A)),
        ];
        assert_eq!(find_unreachable_arms(&patterns, &NominalEquality), vec![2]);
    }

    #[test]
    fn test_unreachable_literal_after_type_test_only() {
        let patterns = [
            PatternKind::Literal(Some(&A)),
            PatternKind::TypeTest(Some(&A)),
            PatternKind::Literal(Some(&A)),
        ];
        assert_eq!(find_unreachable_arms(&patterns, &NominalEquality), vec![2]);
    }

    #[test]
    fn test_unresolved_never_unreachable() {
        let patterns: [PatternKind<'_, &'static str>; 3] = [
            PatternKind::TypeTest(None),
            PatternKind::TypeTest(None),
            PatternKind::Literal(None),
        ];
        assert!(find_unreachable_arms(&patterns, &NominalEquality).is_empty());
    }

    #[test]
    fn test_literal_only_variants() {
        let patterns = [
            PatternKind::Literal(Some(&A)),
            PatternKind::Literal(Some(&B)),
            PatternKind::TypeTest(Some(&B)),
        ];
        assert_eq!(literal_only_variants(&[A, B, C], &patterns, &NominalEquality), vec![A]);
    }

    #[test]
    fn test_literal_only_empty_with_discard() {
        let patterns = [PatternKind::Literal(Some(&A)), PatternKind::Discard];
        assert!(literal_only_variants(&[A, B], &patterns, &NominalEquality).is_empty());
    }

    #[test]
    fn test_analyze_arms_bundles_results() {
        let patterns = [
            PatternKind::Literal(Some(&A)),
            PatternKind::TypeTest(Some(&B)),
            PatternKind::TypeTest(Some(&B)),
        ];
        let report = analyze_arms(&[A, B, C], &patterns, &NominalEquality);
        assert_eq!(report.result, CheckResult::Missing(vec![A, C]));
        assert_eq!(report.unreachable_arms, vec![2]);
        assert_eq!(report.literal_only, vec![A]);
    }

    #[test]
    fn test_format_missing() {
        assert_eq!(format_missing(&["A"]), "`A`");
        assert_eq!(format_missing(&["A", "B", "C"]), "`A`, `B`, `C`");
        assert_eq!(
            format_missing(&["A", "B", "C", "D", "E"]),
            "`A`, `B`, `C` and 2 more"
        );
    }
}
