/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Run configuration: the scheduling and measurement knobs for a session.

use clap::Parser;
use serde::Deserialize;
use serde::Serialize;

use crate::error::TortureError;

/// Configuration for a torture session. All knobs are plain scalars.
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
pub struct Config {
    /// Wall-clock duration of the measurement run, in milliseconds.
    #[clap(long = "time", value_name = "MILLIS", default_value_t = 1000)]
    pub time_ms: u64,

    /// Wall-clock duration of each warmup iteration, in milliseconds. Zero is
    /// allowed and produces a degenerate, immediately stopped warmup run.
    #[clap(long = "warmup-time", value_name = "MILLIS", default_value_t = 200)]
    pub warmup_time_ms: u64,

    /// Number of warmup iterations, whose histograms are discarded. Zero
    /// skips warmup entirely.
    #[clap(long = "warmup-iterations", value_name = "COUNT", default_value_t = 2)]
    pub warmup_iterations: u64,

    /// Specimens per generation in the one-actor-one-observer protocol, and
    /// the poll bound between stop-flag checks in both protocols.
    #[clap(long, value_name = "COUNT", default_value_t = 1000)]
    pub loops: usize,

    /// Yield the processor between polls instead of spinning. Trades CPU burn
    /// for scheduler fairness; recommended when cores are scarce.
    #[clap(long = "yield")]
    pub should_yield: bool,
}

impl Config {
    /// Reject degenerate configurations before any thread starts.
    pub fn validate(&self) -> Result<(), TortureError> {
        if self.loops == 0 {
            return Err(TortureError::InvalidConfig(
                "loops must be at least 1".to_string(),
            ));
        }
        if self.time_ms == 0 {
            return Err(TortureError::InvalidConfig(
                "measurement time must be nonzero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_ms: 1000,
            warmup_time_ms: 200,
            warmup_iterations: 2,
            loops: 1000,
            should_yield: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn zero_loops_is_rejected() {
        let config = Config {
            loops: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TortureError::InvalidConfig(_))
        ));
    }

    #[test]
    fn zero_measurement_time_is_rejected() {
        let config = Config {
            time_ms: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_warmup_is_allowed() {
        let config = Config {
            warmup_time_ms: 0,
            warmup_iterations: 0,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }
}
