// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Position lookup against a decoded [`MappingTable`].

use serde::Serialize;
use tracing::{instrument, trace};

use crate::error::{Result, SourceMapError};
use crate::table::{Entry, MappingTable};

/// Original position information from a source map lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OriginalMapping {
	/// Original source file, as listed in `sources`.
	pub file: String,
	/// 1-indexed line in the original source.
	pub line: u32,
	/// 1-indexed column in the original source.
	pub column: u32,
	/// Original identifier name, empty if the segment has none.
	pub name: String,
}

/// Find the entry covering a 1-indexed generated `line` and `column`.
///
/// Returns the entry with the greatest generated column at or before the
/// queried column. If the line has no entries, or its first entry starts after
/// the column, the last entry of the nearest preceding non-empty line is used
/// instead.
#[instrument(level = "trace", skip(table), fields(lines = table.line_count()))]
pub fn find_entry(table: &MappingTable, line: u32, column: u32) -> Result<&Entry> {
	// Lines past the end are rejected, including `line == line_count + 1`.
	let line_index = line
		.checked_sub(1)
		.map(|l| l as usize)
		.filter(|&l| l < table.line_count())
		.ok_or(SourceMapError::InvalidLineNumber(line))?;
	let column_index = column
		.checked_sub(1)
		.ok_or(SourceMapError::InvalidColumnNumber(column))?;

	match table.lines()[line_index].greatest_lower_bound(column_index) {
		Some(entry) => Ok(entry),
		None => previous_line_entry(table, line_index, line),
	}
}

fn previous_line_entry(table: &MappingTable, line_index: usize, line: u32) -> Result<&Entry> {
	let (found_index, entry) = table.lines()[..line_index]
		.iter()
		.enumerate()
		.rev()
		.find_map(|(i, l)| l.last().map(|e| (i, e)))
		.ok_or(SourceMapError::NoPrecedingMapping { line })?;

	trace!(
		line,
		fallback_line = found_index + 1,
		"no mapping at or before column, using previous line"
	);
	Ok(entry)
}

/// Resolve an entry's indices against the `sources` and `names` tables.
pub fn resolve(entry: &Entry, sources: &[String], names: &[String]) -> Result<OriginalMapping> {
	let original = entry.original.ok_or(SourceMapError::UnmappedEntry {
		generated_column: entry.generated_column,
	})?;

	let file = sources
		.get(original.source_id as usize)
		.ok_or(SourceMapError::UnresolvedSourceIndex(original.source_id))?
		.clone();

	let name = match original.name_id {
		Some(id) => names
			.get(id as usize)
			.ok_or(SourceMapError::UnresolvedNameIndex(id))?
			.clone(),
		None => String::new(),
	};

	Ok(OriginalMapping {
		file,
		line: original.line + 1,
		column: original.column + 1,
		name,
	})
}

/// Find and resolve the original position for a 1-indexed generated position.
pub fn lookup(
	table: &MappingTable,
	sources: &[String],
	names: &[String],
	line: u32,
	column: u32,
) -> Result<OriginalMapping> {
	let entry = find_entry(table, line, column)?;
	resolve(entry, sources, names)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::mappings::parse_mappings;

	fn strings(items: &[&str]) -> Vec<String> {
		items.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn test_exact_and_between_columns() {
		let table = parse_mappings("AAAA,UAAC,UAAC").unwrap();
		let sources = strings(&["a.js"]);

		assert_eq!(lookup(&table, &sources, &[], 1, 1).unwrap().column, 1);
		assert_eq!(lookup(&table, &sources, &[], 1, 11).unwrap().column, 2);
		assert_eq!(lookup(&table, &sources, &[], 1, 15).unwrap().column, 2);
		assert_eq!(lookup(&table, &sources, &[], 1, 21).unwrap().column, 3);
		assert_eq!(lookup(&table, &sources, &[], 1, 500).unwrap().column, 3);
	}

	#[test]
	fn test_fallback_over_empty_lines() {
		// Line 3 has one entry, lines 4 and 5 are empty.
		let table = parse_mappings("AAAA;;ACAA;;").unwrap();
		assert_eq!(table.line_count(), 5);

		let sources = strings(&["a.js"]);
		let mapping = lookup(&table, &sources, &[], 5, 1).unwrap();
		assert_eq!(mapping.line, 2);
		assert_eq!(mapping.column, 1);
	}

	#[test]
	fn test_fallback_when_column_precedes_first_entry() {
		// Line 2 starts mapping at column 4; earlier columns use line 1.
		let table = parse_mappings("AAAA,EAAE;IACA").unwrap();
		let sources = strings(&["a.js"]);

		let mapping = lookup(&table, &sources, &[], 2, 2).unwrap();
		assert_eq!((mapping.line, mapping.column), (1, 3));

		let mapping = lookup(&table, &sources, &[], 2, 5).unwrap();
		assert_eq!((mapping.line, mapping.column), (2, 3));
	}

	#[test]
	fn test_no_preceding_mapping() {
		let table = parse_mappings(";;EAAA").unwrap();
		assert!(matches!(
			find_entry(&table, 1, 1),
			Err(SourceMapError::NoPrecedingMapping { line: 1 })
		));
		assert!(matches!(
			find_entry(&table, 3, 1),
			Err(SourceMapError::NoPrecedingMapping { line: 3 })
		));
		assert!(find_entry(&table, 3, 3).is_ok());
	}

	#[test]
	fn test_line_bound_is_strict() {
		let table = parse_mappings("AAAA;AAAA").unwrap();
		assert!(find_entry(&table, 2, 1).is_ok());
		assert!(matches!(
			find_entry(&table, 3, 1),
			Err(SourceMapError::InvalidLineNumber(3))
		));
		assert!(matches!(
			find_entry(&table, 0, 1),
			Err(SourceMapError::InvalidLineNumber(0))
		));
	}

	#[test]
	fn test_invalid_column() {
		let table = parse_mappings("AAAA").unwrap();
		assert!(matches!(
			find_entry(&table, 1, 0),
			Err(SourceMapError::InvalidColumnNumber(0))
		));
	}

	#[test]
	fn test_empty_table_rejects_every_line() {
		let table = parse_mappings("").unwrap();
		assert!(matches!(
			find_entry(&table, 1, 1),
			Err(SourceMapError::InvalidLineNumber(1))
		));
	}

	#[test]
	fn test_unmapped_entry_is_not_resolved() {
		let table = parse_mappings("AAAA;E").unwrap();
		let sources = strings(&["a.js"]);

		let err = lookup(&table, &sources, &[], 2, 5).unwrap_err();
		assert!(matches!(err, SourceMapError::UnmappedEntry { generated_column: 2 }));
		assert!(err.is_unresolved_index());

		// Before the unmapped segment, the previous line still resolves.
		assert_eq!(lookup(&table, &sources, &[], 2, 1).unwrap().file, "a.js");
	}

	#[test]
	fn test_out_of_range_indices() {
		let table = parse_mappings("ACAAA;AAAAC").unwrap();
		let sources = strings(&["a.js"]);
		let names = strings(&["x"]);

		assert!(matches!(
			lookup(&table, &sources, &names, 1, 1),
			Err(SourceMapError::UnresolvedSourceIndex(1))
		));

		let table = parse_mappings("AAAAC").unwrap();
		assert!(matches!(
			lookup(&table, &sources, &names, 1, 1),
			Err(SourceMapError::UnresolvedNameIndex(1))
		));
	}

	#[test]
	fn test_names_resolved() {
		let table = parse_mappings("AAAAA,EAAEC").unwrap();
		let sources = strings(&["a.js"]);
		let names = strings(&["first", "second"]);

		assert_eq!(lookup(&table, &sources, &names, 1, 1).unwrap().name, "first");
		assert_eq!(lookup(&table, &sources, &names, 1, 3).unwrap().name, "second");
	}
}
