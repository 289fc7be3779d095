/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Explicit test registration.
//!
//! Tests are enumerated at compile time rather than discovered by runtime
//! scanning: each concrete test is wrapped into a type-erased handle that ties
//! its shape to the matching runner entry point. The registry is sorted
//! lexicographically by fully-qualified name so runs are reproducible across
//! invocations.

use std::sync::Arc;

use regex::Regex;

use crate::contract::OneActorOneObserver;
use crate::contract::TwoActorsOneArbiter;
use crate::error::TortureError;
use crate::judge::TestReport;
use crate::runner::test_name;
use crate::runner::Runner;
use crate::suite;

/// A registered concurrency test with its shape erased.
pub trait RegisteredTest: Send + Sync {
    /// Fully-qualified test name, unique and stable across runs.
    fn name(&self) -> &'static str;

    /// Role threads this test needs to run all roles in parallel.
    fn required_threads(&self) -> usize;

    /// Run the full experiment (warmup, measurement, judgment) under `runner`.
    fn run(&self, runner: &Runner) -> Result<TestReport, TortureError>;
}

struct SingleEntry<T>(Arc<T>);

impl<T: OneActorOneObserver> RegisteredTest for SingleEntry<T> {
    fn name(&self) -> &'static str {
        test_name::<T>()
    }

    fn required_threads(&self) -> usize {
        3
    }

    fn run(&self, runner: &Runner) -> Result<TestReport, TortureError> {
        runner.run_single(Arc::clone(&self.0))
    }
}

struct PairEntry<T>(Arc<T>);

impl<T: TwoActorsOneArbiter> RegisteredTest for PairEntry<T> {
    fn name(&self) -> &'static str {
        test_name::<T>()
    }

    fn required_threads(&self) -> usize {
        4
    }

    fn run(&self, runner: &Runner) -> Result<TestReport, TortureError> {
        runner.run_pair(Arc::clone(&self.0))
    }
}

/// Register a one-actor-one-observer test.
pub fn single<T: OneActorOneObserver>(test: T) -> Box<dyn RegisteredTest> {
    Box::new(SingleEntry(Arc::new(test)))
}

/// Register a two-actors-one-arbiter test.
pub fn pair<T: TwoActorsOneArbiter>(test: T) -> Box<dyn RegisteredTest> {
    Box::new(PairEntry(Arc::new(test)))
}

/// The built-in specimen suite, in deterministic (lexicographic) order.
pub fn builtin() -> Vec<Box<dyn RegisteredTest>> {
    let mut tests = vec![
        single(suite::LongAtomicityTest),
        single(suite::AtomicLongTest),
        single(suite::OrderedWriteTest),
        pair(suite::RacyIncrementTest),
        pair(suite::AtomicIncrementTest),
    ];
    tests.sort_by_key(|test| test.name());
    tests
}

/// Keep only the tests whose fully-qualified name matches `pattern`.
pub fn filtered(
    tests: Vec<Box<dyn RegisteredTest>>,
    pattern: &Regex,
) -> Vec<Box<dyn RegisteredTest>> {
    tests
        .into_iter()
        .filter(|test| pattern.is_match(test.name()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_is_sorted_and_nonempty() {
        let tests = builtin();
        assert!(!tests.is_empty());
        let names: Vec<&str> = tests.iter().map(|t| t.name()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn names_are_fully_qualified_and_unique() {
        let tests = builtin();
        let mut names: Vec<&str> = tests.iter().map(|t| t.name()).collect();
        assert!(names.iter().all(|n| n.contains("::")));
        names.dedup();
        assert_eq!(names.len(), tests.len());
    }

    #[test]
    fn thread_requirements_match_shapes() {
        for test in builtin() {
            let required = test.required_threads();
            assert!(required == 3 || required == 4, "{}", test.name());
        }
    }

    #[test]
    fn filtering_selects_by_name() {
        let pattern = Regex::new("Atomicity").unwrap();
        let tests = filtered(builtin(), &pattern);
        assert_eq!(tests.len(), 1);
        assert!(tests[0].name().contains("LongAtomicityTest"));

        let none = filtered(builtin(), &Regex::new("NoSuchTest").unwrap());
        assert!(none.is_empty());
    }
}
