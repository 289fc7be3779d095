/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Probes whether a 64-bit write performed as two independent 32-bit halves
//! can be observed torn.
//!
//! Possible observed states:
//!   - all zeros: the never-written default,
//!   - all ones: the fully visible write,
//!   - one half set, the other still default: a torn write.
//!
//! Torn values and any out-of-thin-air bit pattern are classified
//! NOT_EXPECTED; this test demonstrates the harness catching the anomaly,
//! since nothing here makes the two stores atomic as a pair.

use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering::Relaxed;

use crate::contract::ConcurrencyTest;
use crate::contract::OneActorOneObserver;
use crate::outcome::Outcome;
use crate::result::MAX_RESULT_BYTES;

/// A 64-bit value stored as two independently written 32-bit halves, the
/// moral equivalent of a plain (non-atomic) 64-bit field.
#[derive(Default)]
pub struct PlainLong {
    lo: AtomicU32,
    hi: AtomicU32,
}

/// One actor writes all-ones into both halves; the observer reads the halves
/// back as eight bytes.
pub struct LongAtomicityTest;

impl ConcurrencyTest for LongAtomicityTest {
    type State = PlainLong;

    fn new_state(&self) -> PlainLong {
        PlainLong::default()
    }

    fn result_size(&self) -> usize {
        MAX_RESULT_BYTES
    }

    fn classify(&self, observed: &[u8]) -> Outcome {
        let lo_uniform = observed[..4].iter().all(|&b| b == observed[0]);
        let hi_uniform = observed[4..].iter().all(|&b| b == observed[4]);
        if !lo_uniform || !hi_uniform {
            // Out-of-thin-air bytes within a half.
            return Outcome::NotExpected;
        }
        if observed[0] != observed[4] {
            // Internally uniform halves that disagree: a torn write.
            return Outcome::NotExpected;
        }
        Outcome::Acceptable
    }
}

impl OneActorOneObserver for LongAtomicityTest {
    fn actor1(&self, s: &PlainLong) {
        s.lo.store(0xFFFF_FFFF, Relaxed);
        s.hi.store(0xFFFF_FFFF, Relaxed);
    }

    fn observe(&self, s: &PlainLong, result: &mut [u8; MAX_RESULT_BYTES]) {
        let lo = s.lo.load(Relaxed);
        let hi = s.hi.load(Relaxed);
        result[..4].copy_from_slice(&lo.to_le_bytes());
        result[4..].copy_from_slice(&hi.to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_and_full_write_are_acceptable() {
        let test = LongAtomicityTest;
        assert_eq!(test.classify(&[0; 8]), Outcome::Acceptable);
        assert_eq!(test.classify(&[0xFF; 8]), Outcome::Acceptable);
    }

    #[test]
    fn torn_halves_are_not_expected() {
        let test = LongAtomicityTest;
        let low_only = [0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0];
        let high_only = [0, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF];
        assert_eq!(test.classify(&low_only), Outcome::NotExpected);
        assert_eq!(test.classify(&high_only), Outcome::NotExpected);
    }

    #[test]
    fn out_of_thin_air_bytes_are_not_expected() {
        let test = LongAtomicityTest;
        assert_eq!(
            test.classify(&[0xFF, 0, 0xFF, 0, 0xFF, 0, 0xFF, 0]),
            Outcome::NotExpected
        );
    }

    #[test]
    fn observation_encodes_both_halves() {
        let test = LongAtomicityTest;
        let s = test.new_state();
        test.actor1(&s);
        let mut buffer = [0u8; MAX_RESULT_BYTES];
        test.observe(&s, &mut buffer);
        assert_eq!(buffer, [0xFF; 8]);
    }
}
