// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Decoded mapping table: generated lines, each an ordered run of entries.

use serde::Serialize;

/// Position in an original source file that a generated segment maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OriginalRef {
	/// Index into the `sources` list.
	pub source_id: u32,
	/// Line in the original source (0-indexed).
	pub line: u32,
	/// Column in the original source (0-indexed).
	pub column: u32,
	/// Optional index into the `names` list.
	pub name_id: Option<u32>,
}

/// One decoded segment of a generated line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Entry {
	/// Column in the generated file (0-indexed).
	pub generated_column: u32,
	/// `None` for unmapped (single-field) segments.
	pub original: Option<OriginalRef>,
}

impl Entry {
	pub fn unmapped(generated_column: u32) -> Self {
		Self {
			generated_column,
			original: None,
		}
	}

	pub fn mapped(generated_column: u32, original: OriginalRef) -> Self {
		Self {
			generated_column,
			original: Some(original),
		}
	}

	pub fn is_mapped(&self) -> bool {
		self.original.is_some()
	}
}

/// Entries of one generated line, in encounter order.
///
/// The format encodes segments with ascending generated columns; the order is
/// kept as decoded and never re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Line {
	entries: Vec<Entry>,
}

impl Line {
	pub fn new() -> Self {
		Self::default()
	}

	pub(crate) fn with_capacity(capacity: usize) -> Self {
		Self {
			entries: Vec::with_capacity(capacity),
		}
	}

	pub(crate) fn push(&mut self, entry: Entry) {
		self.entries.push(entry);
	}

	pub fn entries(&self) -> &[Entry] {
		&self.entries
	}

	pub fn first(&self) -> Option<&Entry> {
		self.entries.first()
	}

	pub fn last(&self) -> Option<&Entry> {
		self.entries.last()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Find the entry with the greatest generated column at or before
	/// `column`. When several entries share that column the earliest one
	/// wins.
	pub fn greatest_lower_bound(&self, column: u32) -> Option<&Entry> {
		let end = self
			.entries
			.partition_point(|e| e.generated_column <= column);
		let target = self.entries[..end].last()?.generated_column;
		let start = self.entries[..end].partition_point(|e| e.generated_column < target);
		self.entries.get(start)
	}
}

impl From<Vec<Entry>> for Line {
	fn from(entries: Vec<Entry>) -> Self {
		Self { entries }
	}
}

/// All generated lines of a source map, indexed by 0-based line number.
///
/// Built once by [`crate::parse_mappings`] and read-only afterwards, so a
/// table can be shared between threads for concurrent lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MappingTable {
	lines: Vec<Line>,
}

impl MappingTable {
	pub fn new(lines: Vec<Line>) -> Self {
		Self { lines }
	}

	pub fn lines(&self) -> &[Line] {
		&self.lines
	}

	/// Get a line by 0-based index. An existing empty line is `Some`.
	pub fn line(&self, index: usize) -> Option<&Line> {
		self.lines.get(index)
	}

	pub fn line_count(&self) -> usize {
		self.lines.len()
	}

	/// Total number of entries across all lines.
	pub fn entry_count(&self) -> usize {
		self.lines.iter().map(Line::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.lines.is_empty()
	}
}
