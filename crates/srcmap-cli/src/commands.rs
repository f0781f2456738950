// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Implementations of the `lookup` and `dump` subcommands.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use srcmap_core::{extract_context, OriginalMapping, ReadOptions, SourceContext, SourceMap};
use tracing::{info, instrument, warn};

use crate::config::{DumpArgs, LookupArgs};

/// JSON shape printed by `lookup --json`.
#[derive(Debug, Serialize)]
struct LookupOutput<'a> {
	#[serde(flatten)]
	mapping: &'a OriginalMapping,
	#[serde(skip_serializing_if = "Option::is_none")]
	context: Option<&'a SourceContext>,
}

/// Read a source map from `input`, or from stdin when no path is given.
pub fn read_source_map(input: Option<&Path>, options: &ReadOptions) -> anyhow::Result<SourceMap> {
	let source_map = match input {
		Some(path) => {
			let file =
				File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
			SourceMap::from_reader(BufReader::new(file), options)
				.with_context(|| format!("failed to read source map {}", path.display()))?
		}
		None => SourceMap::from_reader(io::stdin().lock(), options)
			.context("failed to read source map from stdin")?,
	};

	if let Err(e) = source_map.check_version() {
		warn!(error = %e, "continuing with unsupported source map version");
	}
	info!(
		lines = source_map.line_count(),
		entries = source_map.mapping_count(),
		"loaded source map"
	);
	Ok(source_map)
}

#[instrument(skip(source_map, out), fields(line = args.line, column = args.column))]
pub fn run_lookup(source_map: &SourceMap, args: &LookupArgs, out: &mut impl Write) -> anyhow::Result<()> {
	let entry = source_map
		.lookup_entry(args.line, args.column)
		.with_context(|| format!("no mapping for {}:{}", args.line, args.column))?;
	let mapping = source_map
		.resolve(entry)
		.with_context(|| format!("cannot resolve mapping for {}:{}", args.line, args.column))?;

	let context = match (args.context, entry.original) {
		(0, _) | (_, None) => None,
		(lines, Some(original)) => source_map
			.source_content(original.source_id)
			.map(|content| extract_context(content, mapping.line as usize, lines)),
	};

	if args.json {
		let output = LookupOutput {
			mapping: &mapping,
			context: context.as_ref(),
		};
		serde_json::to_writer(&mut *out, &output)?;
		writeln!(out)?;
		return Ok(());
	}

	writeln!(out, "{}", format_mapping(&mapping))?;
	if let Some(context) = context.filter(|c| !c.is_empty()) {
		write_context(out, &context, mapping.line as usize)?;
	}
	Ok(())
}

#[instrument(skip(source_map, out))]
pub fn run_dump(source_map: &SourceMap, args: &DumpArgs, out: &mut impl Write) -> anyhow::Result<()> {
	if args.pretty {
		serde_json::to_writer_pretty(&mut *out, source_map)?;
	} else {
		serde_json::to_writer(&mut *out, source_map)?;
	}
	writeln!(out)?;
	Ok(())
}

/// `file:line:column`, followed by the name when there is one.
fn format_mapping(mapping: &OriginalMapping) -> String {
	let position = format!("{}:{}:{}", mapping.file, mapping.line, mapping.column);
	if mapping.name.is_empty() {
		position
	} else {
		format!("{position} {}", mapping.name)
	}
}

fn write_context(out: &mut impl Write, context: &SourceContext, line: usize) -> io::Result<()> {
	let first = line - context.pre_context.len();
	let last = line + context.post_context.len();
	let width = last.to_string().len();

	for (offset, text) in context.pre_context.iter().enumerate() {
		writeln!(out, "  {:>width$} | {}", first + offset, text)?;
	}
	writeln!(out, "> {:>width$} | {}", line, context.context_line)?;
	for (offset, text) in context.post_context.iter().enumerate() {
		writeln!(out, "  {:>width$} | {}", line + 1 + offset, text)?;
	}
	Ok(())
}
