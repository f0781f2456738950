// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Parser for the `mappings` field of a source map.
//!
//! The mappings string format:
//! - Lines are separated by semicolons (`;`)
//! - Segments within a line are separated by commas (`,`)
//! - Each segment contains 1, 4, or 5 VLQ-encoded values, each a delta
//!   against the previous value on the same axis

use tracing::{debug, instrument};

use crate::error::{Result, SourceMapError};
use crate::table::{Entry, Line, MappingTable, OriginalRef};
use crate::vlq::{decode_vlq, ByteCursor};

/// Maximum number of values within a single segment.
const MAX_ENTRY_VALUES: usize = 5;
const LINE_SEPARATOR: u8 = b';';
const ENTRY_SEPARATOR: u8 = b',';

/// Default number of entries to allocate per line.
const DEFAULT_NUM_ENTRIES: usize = 16;

/// Running counters carried from one segment to the next.
///
/// `generated_column` restarts at every line; the other four persist for the
/// whole mappings string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ParseState {
	generated_column: i64,
	source_id: i64,
	source_line: i64,
	source_column: i64,
	name_id: i64,
}

impl ParseState {
	fn next_line(self) -> Self {
		Self {
			generated_column: 0,
			..self
		}
	}

	/// Apply one segment's deltas, producing the next state and the entry.
	fn apply(self, line: usize, values: &[i64]) -> Result<(Self, Entry)> {
		let malformed = || SourceMapError::MalformedEntry {
			line,
			fields: values.len(),
		};
		let (&column_delta, rest) = values.split_first().ok_or_else(malformed)?;

		let mut next = self;
		next.generated_column = accumulate(line, "generated column", self.generated_column, column_delta)?;
		let generated_column = to_index(next.generated_column)?;

		let (source_deltas, name_delta) = match rest {
			[] => return Ok((next, Entry::unmapped(generated_column))),
			[source, src_line, src_column] => ([*source, *src_line, *src_column], None),
			[source, src_line, src_column, name] => ([*source, *src_line, *src_column], Some(*name)),
			_ => return Err(malformed()),
		};

		next.source_id = accumulate(line, "source index", self.source_id, source_deltas[0])?;
		next.source_line = accumulate(line, "source line", self.source_line, source_deltas[1])?;
		next.source_column = accumulate(line, "source column", self.source_column, source_deltas[2])?;

		let name_id = match name_delta {
			Some(delta) => {
				next.name_id = accumulate(line, "name index", self.name_id, delta)?;
				Some(to_index(next.name_id)?)
			}
			None => None,
		};

		let original = OriginalRef {
			source_id: to_index(next.source_id)?,
			line: to_index(next.source_line)?,
			column: to_index(next.source_column)?,
			name_id,
		};

		Ok((next, Entry::mapped(generated_column, original)))
	}
}

fn accumulate(line: usize, field: &'static str, previous: i64, delta: i64) -> Result<i64> {
	let value = previous
		.checked_add(delta)
		.ok_or(SourceMapError::VlqOverflow)?;
	if value < 0 {
		return Err(SourceMapError::NegativeValue { line, field, value });
	}
	Ok(value)
}

/// Narrow an accumulated (already non-negative) counter to an index.
fn to_index(value: i64) -> Result<u32> {
	u32::try_from(value).map_err(|_| SourceMapError::VlqOverflow)
}

/// Whether the next byte ends the current segment. Does not consume.
fn entry_completed(cursor: &ByteCursor<'_>) -> bool {
	match cursor.peek() {
		Some(b) => b == LINE_SEPARATOR || b == ENTRY_SEPARATOR,
		None => true,
	}
}

/// Decode the values of one segment into `values`, returning how many the
/// segment held. Values past the buffer are decoded but dropped.
fn read_entry_values(cursor: &mut ByteCursor<'_>, values: &mut [i64; MAX_ENTRY_VALUES]) -> Result<usize> {
	let mut count = 0;
	while !entry_completed(cursor) {
		let value = decode_vlq(cursor)?;
		if let Some(slot) = values.get_mut(count) {
			*slot = value;
		}
		count += 1;
	}
	Ok(count)
}

/// Decode a `mappings` string into a [`MappingTable`].
///
/// An empty string yields a table with no lines. Otherwise the table holds
/// one line per `;`-separated group, empty groups included. Any decode error
/// aborts the parse.
#[instrument(level = "debug", skip(mappings), fields(len = mappings.len()))]
pub fn parse_mappings(mappings: &str) -> Result<MappingTable> {
	if mappings.is_empty() {
		return Ok(MappingTable::default());
	}

	let line_count = mappings.bytes().filter(|&b| b == LINE_SEPARATOR).count() + 1;
	let mut lines = Vec::with_capacity(line_count);
	let mut line = Line::with_capacity(DEFAULT_NUM_ENTRIES);
	let mut state = ParseState::default();
	let mut cursor = ByteCursor::new(mappings);

	while !cursor.is_empty() {
		if cursor.consume_if(LINE_SEPARATOR) {
			lines.push(std::mem::replace(&mut line, Line::with_capacity(DEFAULT_NUM_ENTRIES)));
			state = state.next_line();
			continue;
		}

		let mut buffer = [0i64; MAX_ENTRY_VALUES];
		let fields = read_entry_values(&mut cursor, &mut buffer)?;
		let values = buffer.get(..fields).ok_or(SourceMapError::MalformedEntry {
			line: lines.len(),
			fields,
		})?;

		let (next, entry) = state.apply(lines.len(), values)?;
		state = next;
		line.push(entry);

		cursor.consume_if(ENTRY_SEPARATOR);
	}
	lines.push(line);

	let table = MappingTable::new(lines);
	debug!(
		lines = table.line_count(),
		entries = table.entry_count(),
		"decoded mappings"
	);
	Ok(table)
}
