/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Outcome aggregation and pass/fail judgment.

use colored::Colorize;
use serde::Deserialize;
use serde::Serialize;

use crate::histogram::Histogram;
use crate::outcome::Outcome;
use crate::result;

/// Verdict for one distinct observed result pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedState {
    /// The observation truncated to the test's significant bytes.
    pub bytes: Vec<u8>,
    /// How many times it showed up during the measurement run.
    pub count: u64,
    /// The test's theoretical classification of this pattern.
    pub outcome: Outcome,
    /// Whether this pattern violates its classification.
    pub failed: bool,
}

/// Full judgment of one measurement run: the lossless logical record behind
/// both the results artifact and the console table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestReport {
    /// Fully-qualified test name.
    pub name: String,
    /// One record per distinct observed key, in ascending key order.
    pub states: Vec<ObservedState>,
    /// Logical OR of all per-state failures.
    pub failed: bool,
}

/// Classify every key present in `histogram` and apply the judgment rules:
/// ACCEPTABLE and TRANSIENT never fail; EXPECTED fails only at count zero;
/// NOT_EXPECTED fails at any nonzero count.
pub fn judge<F>(name: &str, result_size: usize, classify: F, histogram: &Histogram) -> TestReport
where
    F: Fn(&[u8]) -> Outcome,
{
    let mut states = Vec::with_capacity(histogram.len());
    let mut failed = false;
    for (key, count) in histogram.iter() {
        let bytes = result::truncate(key, result_size);
        let outcome = classify(&bytes);
        let state_failed = match outcome {
            Outcome::Acceptable | Outcome::Transient => false,
            Outcome::Expected => count == 0,
            Outcome::NotExpected => count > 0,
        };
        failed |= state_failed;
        states.push(ObservedState {
            bytes,
            count,
            outcome,
            failed: state_failed,
        });
    }
    TestReport {
        name: name.to_string(),
        states,
        failed,
    }
}

/// Print the human-readable judgment table for one test.
pub fn render_table(report: &TestReport) {
    println!(
        "{:>35} {:>12} {:<20}",
        "Observed state", "Occurrences", "Interpretation"
    );
    for state in &report.states {
        let tag = if state.failed {
            "ERROR:".red().bold()
        } else {
            "OK:".green()
        };
        println!(
            "{:>35} ({:>10}) {:>6} {:<40}",
            format!("{:?}", state.bytes),
            state.count,
            tag,
            state.outcome
        );
    }
    println!();
}
