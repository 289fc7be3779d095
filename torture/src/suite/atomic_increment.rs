/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Positive twin of the lost-update probe: both increments go through
//! `fetch_add`, so the arbiter must always observe exactly 2.

use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering::Relaxed;

use crate::contract::ConcurrencyTest;
use crate::contract::TwoActorsOneArbiter;
use crate::outcome::Outcome;
use crate::result::MAX_RESULT_BYTES;

/// A counter incremented with atomic read-modify-write operations.
#[derive(Default)]
pub struct AtomicCounter {
    value: AtomicU32,
}

/// Two racing `fetch_add` increments, arbitrated after both complete.
pub struct AtomicIncrementTest;

impl ConcurrencyTest for AtomicIncrementTest {
    type State = AtomicCounter;

    fn new_state(&self) -> AtomicCounter {
        AtomicCounter::default()
    }

    fn result_size(&self) -> usize {
        1
    }

    fn classify(&self, observed: &[u8]) -> Outcome {
        if observed[0] == 2 {
            Outcome::Expected
        } else {
            Outcome::NotExpected
        }
    }
}

impl TwoActorsOneArbiter for AtomicIncrementTest {
    fn actor1(&self, s: &AtomicCounter) {
        s.value.fetch_add(1, Relaxed);
    }

    fn actor2(&self, s: &AtomicCounter) {
        s.value.fetch_add(1, Relaxed);
    }

    fn arbitrate(&self, s: &AtomicCounter, result: &mut [u8; MAX_RESULT_BYTES]) {
        result[0] = s.value.load(Relaxed) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_two_is_expected() {
        let test = AtomicIncrementTest;
        assert_eq!(test.classify(&[2]), Outcome::Expected);
        assert_eq!(test.classify(&[1]), Outcome::NotExpected);
        assert_eq!(test.classify(&[0]), Outcome::NotExpected);
    }

    #[test]
    fn sequential_actors_count_to_two() {
        let test = AtomicIncrementTest;
        let s = test.new_state();
        test.actor1(&s);
        test.actor2(&s);
        let mut buffer = [0u8; MAX_RESULT_BYTES];
        test.arbitrate(&s, &mut buffer);
        assert_eq!(buffer[0], 2);
    }
}
