// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for decoding and querying source maps.

use thiserror::Error;

/// Errors that can occur while decoding a source map or resolving a position.
#[derive(Debug, Error)]
pub enum SourceMapError {
	#[error("Invalid source map JSON: {0}")]
	InvalidSourceMapJson(#[from] serde_json::Error),

	#[error("Unsupported source map version: expected 3, got {0}")]
	UnsupportedVersion(i64),

	#[error("Unexpected end of input while decoding VLQ value")]
	UnexpectedEndOfInput,

	#[error("Invalid VLQ character: {0:?}")]
	InvalidVlqChar(char),

	#[error("VLQ value does not fit in 64 bits")]
	VlqOverflow,

	/// A segment carried a field count other than 1, 4 or 5.
	#[error("Malformed entry on generated line {line}: expected 1, 4 or 5 fields, got {fields}")]
	MalformedEntry { line: usize, fields: usize },

	#[error("Negative {field} ({value}) on generated line {line}")]
	NegativeValue {
		line: usize,
		field: &'static str,
		value: i64,
	},

	#[error("Invalid line number: {0}")]
	InvalidLineNumber(u32),

	#[error("Invalid column number: {0}")]
	InvalidColumnNumber(u32),

	#[error("Cannot find a mapping on any line preceding line {line}")]
	NoPrecedingMapping { line: u32 },

	/// The selected entry is an unmapped (1-field) segment.
	#[error("Entry at generated column {generated_column} has no original position")]
	UnmappedEntry { generated_column: u32 },

	#[error("Unresolved source index: {0}")]
	UnresolvedSourceIndex(u32),

	#[error("Unresolved name index: {0}")]
	UnresolvedNameIndex(u32),
}

impl SourceMapError {
	/// Whether the error comes from resolving an entry's indices against the
	/// `sources`/`names` tables rather than from searching the table.
	pub fn is_unresolved_index(&self) -> bool {
		matches!(
			self,
			Self::UnmappedEntry { .. } | Self::UnresolvedSourceIndex(_) | Self::UnresolvedNameIndex(_)
		)
	}
}

pub type Result<T> = std::result::Result<T, SourceMapError>;
