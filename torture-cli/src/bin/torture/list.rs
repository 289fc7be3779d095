/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use clap::Parser;
use torture::registry;

/// List the registered torture tests in the order they would run.
#[derive(Debug, Parser)]
pub struct ListOpts {
    /// Also show how many role threads each test needs.
    #[clap(long)]
    threads: bool,
}

impl ListOpts {
    pub fn run(self) -> anyhow::Result<()> {
        for test in registry::builtin() {
            if self.threads {
                println!("{} ({} threads)", test.name(), test.required_threads());
            } else {
                println!("{}", test.name());
            }
        }
        Ok(())
    }
}
