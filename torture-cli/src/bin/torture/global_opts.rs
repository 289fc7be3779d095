/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::metadata::LevelFilter;

use super::tracing::init_file_tracing;
use super::tracing::init_stderr_tracing;

/// Torture probes a runtime's memory-consistency behavior by sampling: it
/// repeatedly runs small racy specimen programs under concurrent role
/// threads, collects every distinct outcome actually observed, and judges
/// each against the test's theoretical expectation.
///
/// A failed judgment is an experimental result, not a harness error; see the
/// per-test tables and the JSON artifact produced by the `run` subcommand.
///
/// Below are options common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct GlobalOpts {
    /// The verbosity level of log output.
    #[clap(short, long, value_name = "LEVEL", env = "TORTURE_LOG")]
    pub log: Option<LevelFilter>,

    /// Log to a file instead of the terminal.
    #[clap(long, value_name = "FILE", env = "TORTURE_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl GlobalOpts {
    /// Initializes tracing, returning a guard that must stay alive for the
    /// duration of the process when logging to a file.
    pub fn init_tracing(&self) -> anyhow::Result<Option<impl Drop>> {
        if let Some(path) = &self.log_file {
            let file = File::create(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            Ok(Some(init_file_tracing(self.log, file)))
        } else {
            init_stderr_tracing(self.log);
            Ok(None)
        }
    }
}
