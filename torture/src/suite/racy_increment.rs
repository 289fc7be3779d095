/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Probes the classic lost update: two actors each perform a non-atomic
//! read-modify-write increment of the same counter.
//!
//! The arbiter can observe 2 (both increments took effect) or 1 (the racing
//! read-modify-write sequences overlapped and one update was lost). Both are
//! legal; 2 is the interleaving the model guarantees is possible, so its
//! total absence over a run means under-sampling. Anything else would be
//! out of thin air.

use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering::Relaxed;

use crate::contract::ConcurrencyTest;
use crate::contract::TwoActorsOneArbiter;
use crate::outcome::Outcome;
use crate::result::MAX_RESULT_BYTES;

/// A counter incremented by separate load and store operations.
#[derive(Default)]
pub struct RacyCounter {
    value: AtomicU32,
}

impl RacyCounter {
    fn bump(&self) {
        let v = self.value.load(Relaxed);
        self.value.store(v + 1, Relaxed);
    }
}

/// Two racing non-atomic increments, arbitrated after both complete.
pub struct RacyIncrementTest;

impl ConcurrencyTest for RacyIncrementTest {
    type State = RacyCounter;

    fn new_state(&self) -> RacyCounter {
        RacyCounter::default()
    }

    fn result_size(&self) -> usize {
        1
    }

    fn classify(&self, observed: &[u8]) -> Outcome {
        match observed[0] {
            1 => Outcome::Acceptable, // lost update
            2 => Outcome::Expected,
            _ => Outcome::NotExpected,
        }
    }
}

impl TwoActorsOneArbiter for RacyIncrementTest {
    fn actor1(&self, s: &RacyCounter) {
        s.bump();
    }

    fn actor2(&self, s: &RacyCounter) {
        s.bump();
    }

    fn arbitrate(&self, s: &RacyCounter, result: &mut [u8; MAX_RESULT_BYTES]) {
        result[0] = s.value.load(Relaxed) as u8;
    }
}
