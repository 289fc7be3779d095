/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

// Treat all Clippy warnings as errors.
#![deny(clippy::all)]

mod global_opts;
mod list;
mod run;
mod tracing;

use clap::Parser;
use colored::Colorize;

use self::global_opts::GlobalOpts;
use self::list::ListOpts;
use self::run::RunOpts;

#[derive(Debug, Parser)]
#[clap(name = "torture", version)]
struct Args {
    #[clap(flatten)]
    global: GlobalOpts,

    #[clap(subcommand)]
    command: Subcommand,
}

#[derive(Debug, Parser)]
enum Subcommand {
    /// Run the registered torture tests and report their judgments.
    Run(RunOpts),

    /// List the registered torture tests.
    List(ListOpts),
}

fn main() {
    let args = Args::parse();
    let _guard = match args.global.init_tracing() {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("{} {:#}", "torture:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match args.command {
        Subcommand::Run(opts) => opts.run(),
        Subcommand::List(opts) => opts.run(),
    };

    if let Err(err) = result {
        eprintln!("{} {:#}", "torture:".red().bold(), err);
        std::process::exit(1);
    }
}
