//! `SKIP_TEST_CLUSTER` policy for the PostgreSQL-backed cocktail store suites.
//!
//! Setup failures fail the suite unless the variable opts out, in which case
//! each test returns early after a `SKIP-TEST-CLUSTER` marker.

use std::fmt::Display;

const SKIP_VAR: &str = "SKIP_TEST_CLUSTER";

/// Response to a cluster or template database that cannot be prepared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterPolicy {
    /// Setup failures panic.
    Require,
    /// Setup failures skip the test.
    Skip,
}

impl ClusterPolicy {
    /// Interpret a raw flag value; "1", "true" and "yes" (any case) skip.
    pub fn from_flag(value: Option<&str>) -> Self {
        let skip = value
            .map(str::trim)
            .is_some_and(|flag| ["1", "true", "yes"].iter().any(|t| flag.eq_ignore_ascii_case(t)));
        if skip { Self::Skip } else { Self::Require }
    }

    /// Policy from the process environment.
    pub fn from_env() -> Self {
        Self::from_flag(std::env::var(SKIP_VAR).ok().as_deref())
    }
}

/// Turn a harness setup failure into a skipped test or a panic.
pub fn handle_cluster_setup_failure<T>(reason: impl Display) -> Option<T> {
    match ClusterPolicy::from_env() {
        ClusterPolicy::Skip => {
            eprintln!("SKIP-TEST-CLUSTER: cocktail store harness unavailable: {reason}");
            None
        }
        ClusterPolicy::Require => panic!(
            "cocktail store harness setup failed: {reason}. Set {SKIP_VAR}=1 to skip the PostgreSQL suites."
        ),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::ClusterPolicy;

    #[rstest]
    #[case(None, ClusterPolicy::Require)]
    #[case(Some(""), ClusterPolicy::Require)]
    #[case(Some("0"), ClusterPolicy::Require)]
    #[case(Some("no"), ClusterPolicy::Require)]
    #[case(Some("1"), ClusterPolicy::Skip)]
    #[case(Some("TRUE"), ClusterPolicy::Skip)]
    #[case(Some(" yes "), ClusterPolicy::Skip)]
    fn flag_values_select_the_policy(#[case] flag: Option<&str>, #[case] expected: ClusterPolicy) {
        assert_eq!(ClusterPolicy::from_flag(flag), expected);
    }
}
