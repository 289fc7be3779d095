/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Fatal error taxonomy for the engine.
//!
//! Judgment failures (an EXPECTED pattern missing, a NOT_EXPECTED pattern
//! present) are *not* errors: they are normal experimental outcomes carried in
//! the report. Insufficient parallelism is only a logged advisory. The engine
//! never retries; warmup is steady-state conditioning, not error recovery.

use std::io;

use thiserror::Error;

/// Errors that abort a torture session.
#[derive(Debug, Error)]
pub enum TortureError {
    /// Rejected during validation, before any role thread starts.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The OS refused to start a role thread.
    #[error("failed to spawn {role} thread")]
    Spawn {
        /// Role the thread was meant to play.
        role: &'static str,
        /// Underlying spawn failure.
        #[source]
        source: io::Error,
    },

    /// A panic escaped a role body. The run's histogram is discarded and the
    /// remaining tests are not attempted, since the shared holder may be in a
    /// corrupted state.
    #[error("{role} thread failed: {message}")]
    RoleFailed {
        /// Role whose thread died.
        role: &'static str,
        /// Panic payload, if it carried a message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_role() {
        let err = TortureError::RoleFailed {
            role: "actor1",
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "actor1 thread failed: boom");
    }
}
