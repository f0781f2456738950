// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Command-line arguments and the read options derived from them.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use srcmap_core::ReadOptions;

/// srcmap - decode Source Map v3 files and look up original positions
#[derive(Parser, Debug)]
#[command(name = "srcmap", version)]
pub struct Cli {
	/// Log filter used when RUST_LOG is unset (e.g. `debug`)
	#[arg(long, global = true, env = "SRCMAP_LOG", default_value = "warn")]
	pub log_level: String,

	/// Decode maps whose version is not 3 instead of rejecting them
	#[arg(long, global = true, env = "SRCMAP_LENIENT_VERSION")]
	pub lenient_version: bool,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Find the original position for a generated line and column
	Lookup(LookupArgs),
	/// Print the decoded source map, including the mapping table, as JSON
	Dump(DumpArgs),
}

#[derive(Args, Debug, Clone)]
pub struct LookupArgs {
	/// 1-based line in the generated file
	#[arg(long)]
	pub line: u32,

	/// 1-based column in the generated file
	#[arg(long)]
	pub column: u32,

	/// Lines of embedded source to show around the result
	#[arg(long, default_value_t = 0)]
	pub context: usize,

	/// Print the result as JSON
	#[arg(long)]
	pub json: bool,

	/// Source map file (reads stdin when omitted)
	pub input: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct DumpArgs {
	/// Pretty-print the JSON output
	#[arg(long)]
	pub pretty: bool,

	/// Source map file (reads stdin when omitted)
	pub input: Option<PathBuf>,
}

impl Cli {
	pub fn read_options(&self) -> ReadOptions {
		ReadOptions {
			strict_version: !self.lenient_version,
		}
	}
}
