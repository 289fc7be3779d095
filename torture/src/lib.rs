/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Torture is a harness for experimentally probing a runtime's memory-consistency
//! behavior. It repeatedly runs small racy programs ("specimens") under concurrent
//! actor threads plus an observer or arbiter thread, records every distinct outcome
//! actually observed, and judges each outcome against a theoretical classification.
//!
//! The harness samples behavior over a bounded wall-clock window; it cannot prove
//! the absence of races, only surface the ones that manifest.

#![deny(clippy::all)]
#![deny(missing_docs)]

pub mod config;
pub mod contract;
pub mod error;
pub mod histogram;
pub mod holder;
pub mod judge;
pub mod outcome;
pub mod registry;
pub mod result;
pub mod runner;
pub mod suite;

pub use config::Config;
pub use error::TortureError;
pub use histogram::Histogram;
pub use judge::ObservedState;
pub use judge::TestReport;
pub use outcome::Outcome;
pub use runner::Runner;
