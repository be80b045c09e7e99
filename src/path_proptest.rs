//! Property-based tests for wildcard path matching.
//!
//! These tests use proptest to generate random patterns and verify that
//! the overlap relation behaves the same way for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{glob_overlap, has_wildcards};
    use proptest::prelude::*;

    /// Paths drawn from a small alphabet so that collisions are frequent.
    fn pattern() -> impl Strategy<Value = String> {
        "/[ab/*?]{0,8}"
    }

    fn literal() -> impl Strategy<Value = String> {
        "/[ab/]{0,8}"
    }

    proptest! {
        /// Property: every pattern overlaps itself
        #[test]
        fn glob_overlap_is_reflexive(p in pattern()) {
            prop_assert!(glob_overlap(&p, &p));
        }

        /// Property: argument order does not matter
        #[test]
        fn glob_overlap_is_symmetric(a in pattern(), b in pattern()) {
            prop_assert_eq!(glob_overlap(&a, &b), glob_overlap(&b, &a));
        }

        /// Property: without wildcards, overlap is plain equality
        #[test]
        fn glob_overlap_of_literals_is_equality(a in literal(), b in literal()) {
            prop_assert!(!has_wildcards(&a) && !has_wildcards(&b));
            prop_assert_eq!(glob_overlap(&a, &b), a == b);
        }

        /// Property: `*` covers any single path component
        #[test]
        fn star_matches_one_component(dir in "/[a-z]{1,5}", name in "[a-z.]{0,6}") {
            let pattern = format!("{}/*", dir);
            let path = format!("{}/{}", dir, name);
            prop_assert!(glob_overlap(&pattern, &path));
        }

        /// Property: `*` never crosses a separator
        #[test]
        fn star_stops_at_separator(dir in "/[a-z]{1,5}", sub in "[a-z]{1,4}", name in "[a-z]{1,4}") {
            let pattern = format!("{}/*", dir);
            let path = format!("{}/{}/{}", dir, sub, name);
            prop_assert!(!glob_overlap(&pattern, &path));
        }

        /// Property: `**` covers everything below its directory
        #[test]
        fn double_star_matches_subtree(dir in "/[a-z]{1,5}", rest in "[a-z/]{0,10}") {
            let pattern = format!("{}/**", dir);
            let path = format!("{}/{}", dir, rest);
            prop_assert!(glob_overlap(&pattern, &path));
        }

        /// Property: `?` consumes exactly one non-separator character
        #[test]
        fn question_mark_matches_single_char(prefix in "/[a-z]{0,4}", c in "[a-z.]", suffix in "[a-z]{0,4}") {
            let pattern = format!("{}?{}", prefix, suffix);
            let path = format!("{}{}{}", prefix, c, suffix);
            prop_assert!(glob_overlap(&pattern, &path));
            let longer = format!("{}{}{}{}", prefix, c, c, suffix);
            prop_assert!(!glob_overlap(&pattern, &longer));
        }
    }
}
