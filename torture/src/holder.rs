/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Lock-free publication channels between the injector, actor, and
//! observer/arbiter roles.
//!
//! These holders are the only state shared across role threads, and they carry
//! deliberately minimal synchronization: each slot is an [`ArcSwapOption`]
//! whose store publishes with release semantics and whose load acquires, which
//! is exactly the construct-then-publish / observe-after-check visibility the
//! generation handoff needs and nothing more. Everything inside a specimen
//! stays as racy as the test wrote it.
//!
//! "New generation" detection is reference identity (`Arc::ptr_eq`), never
//! value equality: two specimens carrying identical observed values are still
//! distinct generations. Reclamation is by refcount; a role's `last` handle
//! keeps a consumed generation alive until every role has moved past it.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

/// One published batch of specimens: a fixed-capacity container holding
/// exactly `loops` fresh instances, allocated once per generation.
pub struct Generation<S> {
    specimens: Box<[S]>,
}

impl<S> Generation<S> {
    /// Seal a batch of freshly constructed specimens into a generation.
    pub fn new(specimens: Vec<S>) -> Self {
        Self {
            specimens: specimens.into_boxed_slice(),
        }
    }

    /// The specimens of this generation, in injection order.
    pub fn specimens(&self) -> &[S] {
        &self.specimens
    }
}

/// Publication channel for the one-actor-one-observer shape: a single slot
/// holding the current generation, or nothing.
///
/// Protocol: the injector publishes only into an empty slot; the observer
/// resets the slot to empty after consuming, which is the signal permitting
/// the next publication. At most one generation is ever in flight.
pub struct SingleSharedStateHolder<S> {
    current: ArcSwapOption<Generation<S>>,
}

impl<S> SingleSharedStateHolder<S> {
    /// A holder with an empty slot, ready for the first publication.
    pub fn new() -> Self {
        Self {
            current: ArcSwapOption::empty(),
        }
    }

    /// True while the previous generation has not yet been consumed.
    pub fn is_occupied(&self) -> bool {
        self.current.load().is_some()
    }

    /// Release-publish a new generation. The caller must have seen the slot
    /// empty; publishing over an unconsumed generation loses it.
    pub fn publish(&self, generation: Arc<Generation<S>>) {
        self.current.store(Some(generation));
    }

    /// Acquire-load the slot, returning the generation only if it is present
    /// and differs by identity from `last` (the caller's most recently
    /// processed generation).
    pub fn poll(&self, last: Option<&Arc<Generation<S>>>) -> Option<Arc<Generation<S>>> {
        let guard = self.current.load();
        match &*guard {
            Some(cur) if !matches!(last, Some(l) if Arc::ptr_eq(l, cur)) => Some(Arc::clone(cur)),
            _ => None,
        }
    }

    /// Observer-side reset: empty the slot, permitting the next publication.
    pub fn reset(&self) {
        self.current.store(None);
    }
}

impl<S> Default for SingleSharedStateHolder<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Publication channel for the two-actor-one-arbiter shape: the injected
/// specimen plus one completion slot per actor.
///
/// Invariant: the arbiter acts only once `t1` and `t2` both reference the
/// *same* specimen as `current`; it then clears all three slots before the
/// injector may publish again. This enforces strict alternation
/// (injector -> {actor1 || actor2} -> arbiter -> injector) with no two
/// generations overlapping. The actors never read each other's slots, so they
/// race freely relative to each other, which is the scenario under test.
pub struct TwoSharedStateHolder<S> {
    current: ArcSwapOption<S>,
    t1: ArcSwapOption<S>,
    t2: ArcSwapOption<S>,
}

impl<S> TwoSharedStateHolder<S> {
    /// A holder with all three slots empty.
    pub fn new() -> Self {
        Self {
            current: ArcSwapOption::empty(),
            t1: ArcSwapOption::empty(),
            t2: ArcSwapOption::empty(),
        }
    }

    /// True once the previous generation has been fully arbitrated (all three
    /// slots empty), permitting the next publication.
    pub fn is_clear(&self) -> bool {
        self.current.load().is_none() && self.t1.load().is_none() && self.t2.load().is_none()
    }

    /// Release-publish a new specimen for both actors.
    pub fn publish(&self, specimen: Arc<S>) {
        self.current.store(Some(specimen));
    }

    /// Acquire-load `current`, returning the specimen only if it is present
    /// and differs by identity from `last`.
    pub fn poll_current(&self, last: Option<&Arc<S>>) -> Option<Arc<S>> {
        let guard = self.current.load();
        match &*guard {
            Some(cur) if !matches!(last, Some(l) if Arc::ptr_eq(l, cur)) => Some(Arc::clone(cur)),
            _ => None,
        }
    }

    /// Actor 1 publishes its completion by writing the generation it just
    /// processed into its own slot.
    pub fn complete_t1(&self, specimen: Arc<S>) {
        self.t1.store(Some(specimen));
    }

    /// Actor 2's counterpart of [`Self::complete_t1`].
    pub fn complete_t2(&self, specimen: Arc<S>) {
        self.t2.store(Some(specimen));
    }

    /// The specimen ready for arbitration, if both completion slots reference
    /// the same generation as `current`.
    pub fn arbitration_ready(&self) -> Option<Arc<S>> {
        let t1 = self.t1.load_full()?;
        let t2 = self.t2.load_full()?;
        let cur = self.current.load_full()?;
        if Arc::ptr_eq(&t1, &t2) && Arc::ptr_eq(&t1, &cur) {
            Some(cur)
        } else {
            None
        }
    }

    /// Arbiter-side reset: clear every slot, permitting the next publication.
    pub fn clear(&self) {
        self.t1.store(None);
        self.t2.store(None);
        self.current.store(None);
    }
}

impl<S> Default for TwoSharedStateHolder<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_holder_round_trip() {
        let holder: SingleSharedStateHolder<u32> = SingleSharedStateHolder::new();
        assert!(!holder.is_occupied());
        assert!(holder.poll(None).is_none());

        let generation = Arc::new(Generation::new(vec![1, 2, 3]));
        holder.publish(Arc::clone(&generation));
        assert!(holder.is_occupied());

        let seen = holder.poll(None).unwrap();
        assert!(Arc::ptr_eq(&seen, &generation));
        assert_eq!(seen.specimens(), &[1, 2, 3]);

        // The same generation is never handed out twice to the same role.
        assert!(holder.poll(Some(&seen)).is_none());

        holder.reset();
        assert!(!holder.is_occupied());
    }

    #[test]
    fn single_holder_detects_new_generation_by_identity() {
        let holder: SingleSharedStateHolder<u32> = SingleSharedStateHolder::new();
        let first = Arc::new(Generation::new(vec![7]));
        holder.publish(Arc::clone(&first));
        let seen = holder.poll(None).unwrap();

        holder.reset();
        // Identical contents, distinct generation: must still be delivered.
        let second = Arc::new(Generation::new(vec![7]));
        holder.publish(Arc::clone(&second));
        let next = holder.poll(Some(&seen)).unwrap();
        assert!(Arc::ptr_eq(&next, &second));
    }

    #[test]
    fn two_holder_requires_both_completions_on_same_generation() {
        let holder: TwoSharedStateHolder<u32> = TwoSharedStateHolder::new();
        assert!(holder.is_clear());
        assert!(holder.arbitration_ready().is_none());

        let specimen = Arc::new(5u32);
        holder.publish(Arc::clone(&specimen));
        assert!(!holder.is_clear());
        assert!(holder.arbitration_ready().is_none());

        holder.complete_t1(Arc::clone(&specimen));
        assert!(holder.arbitration_ready().is_none());

        holder.complete_t2(Arc::clone(&specimen));
        let ready = holder.arbitration_ready().unwrap();
        assert!(Arc::ptr_eq(&ready, &specimen));

        holder.clear();
        assert!(holder.is_clear());
        assert!(holder.arbitration_ready().is_none());
    }

    #[test]
    fn two_holder_rejects_stale_completion() {
        let holder: TwoSharedStateHolder<u32> = TwoSharedStateHolder::new();
        let old = Arc::new(1u32);
        let new = Arc::new(1u32);

        holder.publish(Arc::clone(&new));
        // t1 still references a previous generation: not ready.
        holder.complete_t1(old);
        holder.complete_t2(Arc::clone(&new));
        assert!(holder.arbitration_ready().is_none());

        holder.complete_t1(new);
        assert!(holder.arbitration_ready().is_some());
    }
}
