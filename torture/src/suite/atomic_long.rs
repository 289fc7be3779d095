/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Positive twin of the tearing probe: the same 64-bit write through a single
//! atomic, which may be stale but must never tear.

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering::Relaxed;

use crate::contract::ConcurrencyTest;
use crate::contract::OneActorOneObserver;
use crate::outcome::Outcome;
use crate::result::MAX_RESULT_BYTES;

/// A 64-bit value behind one atomic word.
#[derive(Default)]
pub struct WholeLong {
    x: AtomicU64,
}

/// One actor stores all-ones in a single 64-bit atomic store; only the
/// default and the complete write are legal observations.
pub struct AtomicLongTest;

impl ConcurrencyTest for AtomicLongTest {
    type State = WholeLong;

    fn new_state(&self) -> WholeLong {
        WholeLong::default()
    }

    fn result_size(&self) -> usize {
        MAX_RESULT_BYTES
    }

    fn classify(&self, observed: &[u8]) -> Outcome {
        if observed.iter().all(|&b| b == 0) || observed.iter().all(|&b| b == 0xFF) {
            Outcome::Acceptable
        } else {
            Outcome::NotExpected
        }
    }
}

impl OneActorOneObserver for AtomicLongTest {
    fn actor1(&self, s: &WholeLong) {
        s.x.store(u64::MAX, Relaxed);
    }

    fn observe(&self, s: &WholeLong, result: &mut [u8; MAX_RESULT_BYTES]) {
        result.copy_from_slice(&s.x.load(Relaxed).to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_default_and_full_write_are_acceptable() {
        let test = AtomicLongTest;
        assert_eq!(test.classify(&[0; 8]), Outcome::Acceptable);
        assert_eq!(test.classify(&[0xFF; 8]), Outcome::Acceptable);
        assert_eq!(
            test.classify(&[0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0]),
            Outcome::NotExpected
        );
    }
}
