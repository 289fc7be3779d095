/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Built-in specimen tests.
//!
//! Negative tests probe behavior the model permits but users often assume
//! away (tearing, lost updates); positive tests probe guarantees a
//! synchronization primitive is supposed to provide. A failing verdict on a
//! negative test does not indicate a bug in the runtime.

mod atomic_increment;
mod atomic_long;
mod long_atomicity;
mod ordered_write;
mod racy_increment;

pub use atomic_increment::AtomicIncrementTest;
pub use atomic_long::AtomicLongTest;
pub use long_atomicity::LongAtomicityTest;
pub use ordered_write::OrderedWriteTest;
pub use racy_increment::RacyIncrementTest;
