/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Frequency map of observed results.

use std::collections::BTreeMap;

/// Occurrence counts keyed by packed result encodings (see [`crate::result`]).
///
/// Built fresh for every measurement run by the observer or arbiter role,
/// which owns it exclusively until the role thread terminates; it is never
/// merged across runs. Ordered keys keep reports deterministic.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: BTreeMap<u64, u64>,
}

impl Histogram {
    /// An empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `key`.
    pub fn add(&mut self, key: u64) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    /// How many times `key` was observed.
    pub fn count(&self, key: u64) -> u64 {
        self.counts.get(&key).copied().unwrap_or(0)
    }

    /// Sum of all occurrence counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct keys observed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Distinct keys with their counts, in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.counts.iter().map(|(k, v)| (*k, *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_accumulate() {
        let mut h = Histogram::new();
        h.add(3);
        h.add(3);
        h.add(9);
        assert_eq!(h.count(3), 2);
        assert_eq!(h.count(9), 1);
        assert_eq!(h.count(4), 0);
        assert_eq!(h.total(), 3);
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn iteration_is_key_ordered() {
        let mut h = Histogram::new();
        h.add(u64::MAX);
        h.add(0);
        h.add(42);
        let keys: Vec<u64> = h.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![0, 42, u64::MAX]);
    }

    #[test]
    fn empty_histogram_reports_empty() {
        let h = Histogram::new();
        assert!(h.is_empty());
        assert_eq!(h.total(), 0);
    }
}
