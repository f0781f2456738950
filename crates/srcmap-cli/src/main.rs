// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `srcmap` binary: reads a source map and prints lookups or the decoded table.

mod commands;
mod config;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use config::{Cli, Command};

fn main() -> ExitCode {
	let cli = Cli::parse();

	// Logs go to stderr so stdout stays machine-readable.
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
		)
		.with_writer(io::stderr)
		.init();

	match run(&cli) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			eprintln!("error: {e:#}");
			ExitCode::FAILURE
		}
	}
}

fn run(cli: &Cli) -> anyhow::Result<()> {
	let options = cli.read_options();
	let stdout = io::stdout();
	let mut out = stdout.lock();

	match &cli.command {
		Command::Lookup(args) => {
			let source_map = commands::read_source_map(args.input.as_deref(), &options)?;
			commands::run_lookup(&source_map, args, &mut out)
		}
		Command::Dump(args) => {
			let source_map = commands::read_source_map(args.input.as_deref(), &options)?;
			commands::run_dump(&source_map, args, &mut out)
		}
	}
}
