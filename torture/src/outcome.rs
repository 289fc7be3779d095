/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Theoretical classification of observed results.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// What the memory model says about one possible observed result pattern.
///
/// A test supplies one of these per distinct byte pattern during judgment; the
/// classification describes a *possible* result, not a value itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// Legal under the model. May or may not show up in any given run.
    Acceptable,

    /// Guaranteed by the model. Its total absence over a measurement run means
    /// either under-sampling or a broken guarantee.
    Expected,

    /// Forbidden by the model. A single occurrence is the anomaly under test.
    NotExpected,

    /// Known, documented noise from the environment itself; never a failure.
    Transient,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Acceptable => "ACCEPTABLE",
            Outcome::Expected => "EXPECTED",
            Outcome::NotExpected => "NOT_EXPECTED",
            Outcome::Transient => "TRANSIENT",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_wire_names() {
        assert_eq!(Outcome::Acceptable.to_string(), "ACCEPTABLE");
        assert_eq!(Outcome::NotExpected.to_string(), "NOT_EXPECTED");
    }

    #[test]
    fn serializes_as_screaming_snake_case() {
        let json = serde_json::to_string(&Outcome::NotExpected).unwrap();
        assert_eq!(json, "\"NOT_EXPECTED\"");
        let back: Outcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Outcome::NotExpected);
    }
}
