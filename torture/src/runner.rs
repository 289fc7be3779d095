/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Orchestration of role threads, warmup, measurement, and judgment.
//!
//! One run spawns a real OS thread per role against a freshly constructed
//! holder, sleeps out the wall-clock window, raises the global stop flag, and
//! joins every role. Cancellation is cooperative only: each role checks the
//! flag at the top of its loop (with at most `loops` polls in between), and
//! nothing preemptive ever touches the measured inner loops, since an
//! interruption there could itself add ordering. The stop flag is read with
//! acquire and written with release; no stronger ordering is used anywhere.
//!
//! The histogram under construction is exclusively owned by the observer or
//! arbiter thread and handed back through its join handle only after the role
//! has fully terminated, so the aggregation itself needs no locking.

use std::any::Any;
use std::io;
use std::io::Write;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::debug;
use tracing::warn;

use crate::config::Config;
use crate::contract::OneActorOneObserver;
use crate::contract::TwoActorsOneArbiter;
use crate::error::TortureError;
use crate::histogram::Histogram;
use crate::holder::Generation;
use crate::holder::SingleSharedStateHolder;
use crate::holder::TwoSharedStateHolder;
use crate::judge::judge;
use crate::judge::render_table;
use crate::judge::TestReport;
use crate::result;
use crate::result::MAX_RESULT_BYTES;

/// Drives one full experiment (warmup repetitions plus one measurement run)
/// per test. Tests never run concurrently with each other; only the roles
/// within one run do.
pub struct Runner {
    config: Config,
}

impl Runner {
    /// Validate `config` and build a runner.
    pub fn new(config: Config) -> Result<Self, TortureError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration this runner drives.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Full experiment for a one-actor-one-observer test.
    pub fn run_single<T: OneActorOneObserver>(
        &self,
        test: Arc<T>,
    ) -> Result<TestReport, TortureError> {
        let name = test_name::<T>();
        let size = checked_result_size(name, test.result_size())?;
        println!("Running {}", name);
        self.ensure_threads(3);

        self.warmup(|window| self.run_single_once(&test, window).map(|_| ()))?;

        let histogram = self.run_single_once(&test, self.config.time_ms)?;
        debug!(
            test = name,
            distinct = histogram.len(),
            total = histogram.total(),
            "measurement complete"
        );
        let report = judge(name, size, |bytes| test.classify(bytes), &histogram);
        render_table(&report);
        Ok(report)
    }

    /// Full experiment for a two-actors-one-arbiter test.
    pub fn run_pair<T: TwoActorsOneArbiter>(
        &self,
        test: Arc<T>,
    ) -> Result<TestReport, TortureError> {
        let name = test_name::<T>();
        let size = checked_result_size(name, test.result_size())?;
        println!("Running {}", name);
        self.ensure_threads(4);

        self.warmup(|window| self.run_pair_once(&test, window).map(|_| ()))?;

        let histogram = self.run_pair_once(&test, self.config.time_ms)?;
        debug!(
            test = name,
            distinct = histogram.len(),
            total = histogram.total(),
            "measurement complete"
        );
        let report = judge(name, size, |bytes| test.classify(bytes), &histogram);
        render_table(&report);
        Ok(report)
    }

    /// Run the configured warmup iterations, discarding their histograms.
    /// Warmup exists to bring the execution engine to steady state, not to
    /// recover from anything.
    fn warmup<F>(&self, mut run_once: F) -> Result<(), TortureError>
    where
        F: FnMut(u64) -> Result<(), TortureError>,
    {
        print!("Warmup ");
        for _ in 0..self.config.warmup_iterations {
            print!(".");
            io::stdout().flush().ok();
            run_once(self.config.warmup_time_ms)?;
        }
        println!();
        Ok(())
    }

    /// Non-fatal advisory when the host cannot actually run all roles in
    /// parallel. Execution proceeds; results may simply be less reliable.
    fn ensure_threads(&self, required: usize) {
        let available = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        if available < required && !self.config.should_yield {
            warn!(
                required,
                available,
                "fewer CPUs than role threads and yielding is disabled; results may be unreliable"
            );
        }
    }

    /// One bounded window of the single-holder protocol, returning the
    /// observer's histogram.
    fn run_single_once<T: OneActorOneObserver>(
        &self,
        test: &Arc<T>,
        window_ms: u64,
    ) -> Result<Histogram, TortureError> {
        let holder: Arc<SingleSharedStateHolder<T::State>> =
            Arc::new(SingleSharedStateHolder::new());
        let stop = Arc::new(AtomicBool::new(false));
        let loops = self.config.loops;
        let should_yield = self.config.should_yield;
        let size = test.result_size();

        // Injector: allocate a fresh generation, wait for the slot to drain,
        // publish.
        let injector = {
            let test = Arc::clone(test);
            let holder = Arc::clone(&holder);
            let stop = Arc::clone(&stop);
            spawn_role("injector", move || {
                while !stop.load(Ordering::Acquire) {
                    let specimens: Vec<T::State> = (0..loops).map(|_| test.new_state()).collect();
                    let generation = Arc::new(Generation::new(specimens));
                    while holder.is_occupied() {
                        if stop.load(Ordering::Acquire) {
                            return;
                        }
                        if should_yield {
                            thread::yield_now();
                        }
                    }
                    holder.publish(generation);
                }
            })?
        };

        // Actor: process each element of each new generation exactly once.
        let actor = {
            let test = Arc::clone(test);
            let holder = Arc::clone(&holder);
            let stop = Arc::clone(&stop);
            spawn_role("actor1", move || {
                let mut last: Option<Arc<Generation<T::State>>> = None;
                while !stop.load(Ordering::Acquire) {
                    match holder.poll(last.as_ref()) {
                        Some(cur) => {
                            for specimen in cur.specimens() {
                                test.actor1(specimen);
                            }
                            last = Some(cur);
                        }
                        None => {
                            if should_yield {
                                thread::yield_now();
                            }
                        }
                    }
                }
            })?
        };

        // Observer: encode each specimen once, bank the keys, then reset the
        // slot to let the injector publish the next generation.
        let observer = {
            let test = Arc::clone(test);
            let holder = Arc::clone(&holder);
            let stop = Arc::clone(&stop);
            spawn_role("observer", move || {
                let mut histogram = Histogram::new();
                let mut last: Option<Arc<Generation<T::State>>> = None;
                while !stop.load(Ordering::Acquire) {
                    match holder.poll(last.as_ref()) {
                        Some(cur) => {
                            for specimen in cur.specimens() {
                                let mut buffer = [0u8; MAX_RESULT_BYTES];
                                test.observe(specimen, &mut buffer);
                                histogram.add(result::pack(&buffer, size));
                            }
                            last = Some(cur);
                            holder.reset();
                        }
                        None => {
                            if should_yield {
                                thread::yield_now();
                            }
                        }
                    }
                }
                histogram
            })?
        };

        thread::sleep(Duration::from_millis(window_ms));
        stop.store(true, Ordering::Release);

        join_role("injector", injector)?;
        join_role("actor1", actor)?;
        join_role("observer", observer)
    }

    /// One bounded window of the two-holder protocol, returning the arbiter's
    /// histogram.
    fn run_pair_once<T: TwoActorsOneArbiter>(
        &self,
        test: &Arc<T>,
        window_ms: u64,
    ) -> Result<Histogram, TortureError> {
        let holder: Arc<TwoSharedStateHolder<T::State>> = Arc::new(TwoSharedStateHolder::new());
        let stop = Arc::new(AtomicBool::new(false));
        let loops = self.config.loops;
        let should_yield = self.config.should_yield;
        let size = test.result_size();

        // Injector: publish one fresh specimen whenever the previous one has
        // been fully arbitrated.
        let injector = {
            let test = Arc::clone(test);
            let holder = Arc::clone(&holder);
            let stop = Arc::clone(&stop);
            spawn_role("injector", move || {
                while !stop.load(Ordering::Acquire) {
                    let specimen = Arc::new(test.new_state());
                    while !holder.is_clear() {
                        if stop.load(Ordering::Acquire) {
                            return;
                        }
                        if should_yield {
                            thread::yield_now();
                        }
                    }
                    holder.publish(specimen);
                }
            })?
        };

        let actor1 = spawn_pair_actor(
            "actor1",
            T::actor1,
            TwoSharedStateHolder::complete_t1,
            Arc::clone(test),
            Arc::clone(&holder),
            Arc::clone(&stop),
            loops,
            should_yield,
        )?;
        let actor2 = spawn_pair_actor(
            "actor2",
            T::actor2,
            TwoSharedStateHolder::complete_t2,
            Arc::clone(test),
            Arc::clone(&holder),
            Arc::clone(&stop),
            loops,
            should_yield,
        )?;

        // Arbiter: wait until both actors have published completion of the
        // same generation, encode, then clear all slots.
        let arbiter = {
            let test = Arc::clone(test);
            let holder = Arc::clone(&holder);
            let stop = Arc::clone(&stop);
            spawn_role("arbiter", move || {
                let mut histogram = Histogram::new();
                while !stop.load(Ordering::Acquire) {
                    for _ in 0..loops {
                        match holder.arbitration_ready() {
                            Some(specimen) => {
                                let mut buffer = [0u8; MAX_RESULT_BYTES];
                                test.arbitrate(&specimen, &mut buffer);
                                histogram.add(result::pack(&buffer, size));
                                holder.clear();
                            }
                            None => {
                                if should_yield {
                                    thread::yield_now();
                                }
                            }
                        }
                    }
                }
                histogram
            })?
        };

        thread::sleep(Duration::from_millis(window_ms));
        stop.store(true, Ordering::Release);

        join_role("injector", injector)?;
        join_role("actor1", actor1)?;
        join_role("actor2", actor2)?;
        join_role("arbiter", arbiter)
    }
}

/// Fully-qualified (type-path) name of a test, used for registration order,
/// filtering, and reporting.
pub fn test_name<T: ?Sized + 'static>() -> &'static str {
    std::any::type_name::<T>()
}

fn checked_result_size(name: &str, size: usize) -> Result<usize, TortureError> {
    if (1..=MAX_RESULT_BYTES).contains(&size) {
        Ok(size)
    } else {
        Err(TortureError::InvalidConfig(format!(
            "{}: result size {} outside 1..={}",
            name, size, MAX_RESULT_BYTES
        )))
    }
}

/// An actor of the two-holder protocol: detect a new generation, perform this
/// actor's operation, publish completion into this actor's own slot. The
/// inner loop bounds polls between stop-flag checks.
#[allow(clippy::too_many_arguments)]
fn spawn_pair_actor<T: TwoActorsOneArbiter>(
    role: &'static str,
    act: fn(&T, &T::State),
    complete: fn(&TwoSharedStateHolder<T::State>, Arc<T::State>),
    test: Arc<T>,
    holder: Arc<TwoSharedStateHolder<T::State>>,
    stop: Arc<AtomicBool>,
    loops: usize,
    should_yield: bool,
) -> Result<thread::JoinHandle<()>, TortureError> {
    spawn_role(role, move || {
        let mut last: Option<Arc<T::State>> = None;
        while !stop.load(Ordering::Acquire) {
            for _ in 0..loops {
                match holder.poll_current(last.as_ref()) {
                    Some(cur) => {
                        act(&test, &cur);
                        complete(&holder, Arc::clone(&cur));
                        last = Some(cur);
                    }
                    None => {
                        if should_yield {
                            thread::yield_now();
                        }
                    }
                }
            }
        }
    })
}

fn spawn_role<F, R>(role: &'static str, body: F) -> Result<thread::JoinHandle<R>, TortureError>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    thread::Builder::new()
        .name(role.to_string())
        .spawn(body)
        .map_err(|source| TortureError::Spawn { role, source })
}

fn join_role<R>(role: &'static str, handle: thread::JoinHandle<R>) -> Result<R, TortureError> {
    handle.join().map_err(|payload| TortureError::RoleFailed {
        role,
        message: panic_message(payload.as_ref()),
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
