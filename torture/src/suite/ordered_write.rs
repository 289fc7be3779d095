/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Probes release/acquire publication ordering.
//!
//! The actor performs `x = 1; x = 2; flag = 1 (release); x = 3` and the
//! observer reads `flag` (acquire) then `x`. Whenever the observed flag is 1,
//! the release/acquire pair guarantees the observed `x` is at least 2 (the
//! third store may or may not be visible yet). Observing the default or 1
//! alongside a raised flag means the primitive failed to order the writes.

use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering::Acquire;
use std::sync::atomic::Ordering::Relaxed;
use std::sync::atomic::Ordering::Release;

use crate::contract::ConcurrencyTest;
use crate::contract::OneActorOneObserver;
use crate::outcome::Outcome;
use crate::result::MAX_RESULT_BYTES;

/// A data word plus the flag that publishes it.
#[derive(Default)]
pub struct FlaggedPair {
    x: AtomicU32,
    flag: AtomicU32,
}

/// Write-write-publish-write against a read of the flag then the data.
pub struct OrderedWriteTest;

impl ConcurrencyTest for OrderedWriteTest {
    type State = FlaggedPair;

    fn new_state(&self) -> FlaggedPair {
        FlaggedPair::default()
    }

    fn result_size(&self) -> usize {
        2
    }

    fn classify(&self, observed: &[u8]) -> Outcome {
        if observed[0] == 1 && observed[1] < 2 {
            // The flag was visible but the writes ordered before it were not.
            Outcome::NotExpected
        } else {
            Outcome::Acceptable
        }
    }
}

impl OneActorOneObserver for OrderedWriteTest {
    fn actor1(&self, s: &FlaggedPair) {
        s.x.store(1, Relaxed);
        s.x.store(2, Relaxed);
        s.flag.store(1, Release);
        s.x.store(3, Relaxed);
    }

    fn observe(&self, s: &FlaggedPair, result: &mut [u8; MAX_RESULT_BYTES]) {
        result[0] = s.flag.load(Acquire) as u8;
        result[1] = s.x.load(Relaxed) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raised_flag_with_stale_data_is_not_expected() {
        let test = OrderedWriteTest;
        assert_eq!(test.classify(&[1, 0]), Outcome::NotExpected);
        assert_eq!(test.classify(&[1, 1]), Outcome::NotExpected);
    }

    #[test]
    fn raised_flag_with_published_data_is_acceptable() {
        let test = OrderedWriteTest;
        assert_eq!(test.classify(&[1, 2]), Outcome::Acceptable);
        assert_eq!(test.classify(&[1, 3]), Outcome::Acceptable);
    }

    #[test]
    fn unraised_flag_is_acceptable_with_any_data() {
        let test = OrderedWriteTest;
        for x in 0..=3 {
            assert_eq!(test.classify(&[0, x]), Outcome::Acceptable);
        }
    }

    #[test]
    fn actor_leaves_flag_raised_and_data_final() {
        let test = OrderedWriteTest;
        let s = test.new_state();
        test.actor1(&s);
        let mut buffer = [0u8; MAX_RESULT_BYTES];
        test.observe(&s, &mut buffer);
        assert_eq!(buffer[0], 1);
        assert_eq!(buffer[1], 3);
    }
}
