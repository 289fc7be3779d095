/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! The contract every concrete specimen test implements.
//!
//! A test defines the racy experiment without defining how it is scheduled:
//! how to build a fresh specimen, what each actor does to it, how the terminal
//! role encodes its observation, and what the memory model says about each
//! possible encoding. The engine guarantees at-most-once delivery of every
//! specimen to every consuming role; a test must not assume any ordering
//! between the two actors beyond "both complete before arbitration".
//!
//! Role bodies must not panic under normal operation. A panic escaping
//! `actor1`, `observe`, or `arbitrate` is fatal to the run and discards its
//! histogram.

use crate::outcome::Outcome;
use crate::result::MAX_RESULT_BYTES;

/// Scheduling-independent parts of a specimen test.
pub trait ConcurrencyTest: Send + Sync + 'static {
    /// The shared mutable specimen under race. One instance lives for exactly
    /// one generation: created by the injector, mutated by the actor(s), read
    /// once by the observer or arbiter, then abandoned.
    type State: Send + Sync + 'static;

    /// Allocate a fresh specimen, independent of any previously returned one.
    fn new_state(&self) -> Self::State;

    /// Number of significant bytes in the observation buffer, in `1..=8`.
    /// Bytes past this prefix are defined to be zero when histogram keys are
    /// formed.
    fn result_size(&self) -> usize;

    /// Classify one distinct observed byte pattern (of `result_size()` bytes).
    /// Pure; called only during judgment, never inside the hot loop.
    fn classify(&self, observed: &[u8]) -> Outcome;
}

/// A test driven by one mutating actor and one observer.
pub trait OneActorOneObserver: ConcurrencyTest {
    /// The single mutating operation sequence, invoked exactly once per
    /// specimen per generation.
    fn actor1(&self, state: &Self::State);

    /// Write up to `result_size()` bytes describing what was observed. The
    /// buffer arrives zeroed.
    fn observe(&self, state: &Self::State, result: &mut [u8; MAX_RESULT_BYTES]);
}

/// A test driven by two racing actors and an arbiter that reads the combined
/// effect after both actors have finished.
pub trait TwoActorsOneArbiter: ConcurrencyTest {
    /// First actor's operation, invoked exactly once per generation.
    fn actor1(&self, state: &Self::State);

    /// Second actor's operation, invoked exactly once per generation. Its
    /// order relative to `actor1` is unspecified; that indeterminacy is the
    /// point.
    fn actor2(&self, state: &Self::State);

    /// Write the combined observation once both actors are done. The buffer
    /// arrives zeroed.
    fn arbitrate(&self, state: &Self::State, result: &mut [u8; MAX_RESULT_BYTES]);
}
