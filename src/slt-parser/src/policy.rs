// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Evaluation of `skipif` and `onlyif` conditions.

use std::collections::BTreeSet;

/// The `skipif` and `onlyif` conditions attached to the next record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    pub skip: BTreeSet<String>,
    pub only: BTreeSet<String>,
}

impl Directives {
    /// Whether `policy` accepts a record carrying these conditions.
    pub fn accepted_by(&self, policy: &dyn DirectivePolicy) -> bool {
        policy.accept(&self.skip, &self.only)
    }
}

/// Decides whether a statement or query is included, given its conditions.
pub trait DirectivePolicy {
    fn accept(&self, skip: &BTreeSet<String>, only: &BTreeSet<String>) -> bool;
}

/// Accepts records written for PostgreSQL or CockroachDB.
///
/// An `onlyif` naming either engine accepts the record; any other `onlyif`
/// rejects it. Without `onlyif`, the record is accepted unless a `skipif`
/// names either engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresPolicy;

impl PostgresPolicy {
    const CONDITIONS: [&'static str; 2] = ["postgresql", "cockroachdb"];

    fn mentions_us(conditions: &BTreeSet<String>) -> bool {
        Self::CONDITIONS.iter().any(|c| conditions.contains(*c))
    }
}

impl DirectivePolicy for PostgresPolicy {
    fn accept(&self, skip: &BTreeSet<String>, only: &BTreeSet<String>) -> bool {
        if Self::mentions_us(only) {
            true
        } else if !only.is_empty() {
            false
        } else {
            !Self::mentions_us(skip)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_postgres_policy() {
        let cases: &[(&[&str], &[&str], bool)] = &[
            (&[], &[], true),
            (&["postgresql"], &[], false),
            (&["cockroachdb"], &[], false),
            (&["mysql"], &[], true),
            (&["mysql", "mssql"], &[], true),
            (&[], &["cockroachdb"], true),
            (&[], &["postgresql"], true),
            (&[], &["mysql"], false),
            (&["postgresql"], &["mysql"], false),
            (&["postgresql"], &["postgresql"], true),
            (&[], &["mysql", "cockroachdb"], true),
        ];
        for (skip, only, expected) in cases {
            assert_eq!(
                PostgresPolicy.accept(&set(skip), &set(only)),
                *expected,
                "skip={:?} only={:?}",
                skip,
                only
            );
        }
    }

    #[test]
    fn test_directives() {
        let mut d = Directives::default();
        assert!(d.accepted_by(&PostgresPolicy));
        d.skip.insert("postgresql".into());
        assert!(!d.accepted_by(&PostgresPolicy));
        d.only.insert("postgresql".into());
        assert!(d.accepted_by(&PostgresPolicy));
    }
}
