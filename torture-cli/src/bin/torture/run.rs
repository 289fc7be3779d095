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
use colored::Colorize;
use regex::Regex;
use torture::registry;
use torture::Config;
use torture::Runner;
use torture::TestReport;

/// Run every registered test whose name matches the filter, sequentially,
/// printing a judgment table per test and optionally writing the full
/// observed-state records as JSON.
#[derive(Debug, Parser)]
pub struct RunOpts {
    #[clap(flatten)]
    config: Config,

    /// Regular expression selecting tests by fully-qualified name.
    #[clap(long, value_name = "REGEX", default_value = ".*")]
    filter: String,

    /// Write the per-test observed-state records as JSON to this file.
    #[clap(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl RunOpts {
    pub fn run(self) -> anyhow::Result<()> {
        let pattern = Regex::new(&self.filter)
            .with_context(|| format!("invalid --filter pattern {:?}", self.filter))?;
        let runner = Runner::new(self.config)?;

        let tests = registry::filtered(registry::builtin(), &pattern);
        if tests.is_empty() {
            println!("No registered tests match {:?}", self.filter);
            return Ok(());
        }

        // A role-thread failure aborts the remaining tests; a failed judgment
        // does not.
        let mut reports: Vec<TestReport> = Vec::with_capacity(tests.len());
        for test in &tests {
            let report = test
                .run(&runner)
                .with_context(|| format!("while running {}", test.name()))?;
            reports.push(report);
        }

        if let Some(path) = &self.output {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            serde_json::to_writer_pretty(file, &reports)
                .context("failed to write results artifact")?;
        }

        let failed = reports.iter().filter(|r| r.failed).count();
        if failed == 0 {
            println!(
                "{}",
                format!("All {} tests passed judgment", reports.len()).green()
            );
        } else {
            println!(
                "{}",
                format!("{} of {} tests failed judgment", failed, reports.len())
                    .red()
                    .bold()
            );
        }
        Ok(())
    }
}
