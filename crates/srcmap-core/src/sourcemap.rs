// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source map envelope reading and position lookup.
//!
//! Implements reading of the Source Map v3 JSON object. Only the `mappings`
//! decoding and lookups are interpreted; `sourceRoot` and `sourcesContent` are
//! carried as given.

use std::io::Read;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, SourceMapError};
use crate::lookup::{self, OriginalMapping};
use crate::mappings::parse_mappings;
use crate::table::{Entry, MappingTable};

/// The only source map version this crate decodes.
pub const SUPPORTED_VERSION: i64 = 3;

/// Options controlling how a source map envelope is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
	/// Reject maps whose `version` is not 3 before decoding anything else.
	///
	/// When disabled the map is fully decoded, a warning is logged and
	/// [`SourceMap::check_version`] reports the mismatch.
	pub strict_version: bool,
}

impl Default for ReadOptions {
	fn default() -> Self {
		Self {
			strict_version: true,
		}
	}
}

impl ReadOptions {
	pub fn lenient() -> Self {
		Self {
			strict_version: false,
		}
	}
}

/// Raw source map JSON structure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSourceMap {
	#[serde(default)]
	version: i64,
	#[serde(default)]
	file: Option<String>,
	#[serde(default)]
	source_root: Option<String>,
	#[serde(default)]
	sources: Vec<Option<String>>,
	#[serde(default)]
	sources_content: Option<Vec<Option<String>>>,
	/// Some producers emit numeric names.
	#[serde(default)]
	names: Vec<Value>,
	#[serde(default)]
	mappings: String,
}

fn coerce_name(value: Value) -> String {
	match value {
		Value::String(s) => s,
		Value::Number(n) => n.to_string(),
		_ => String::new(),
	}
}

/// Decoded source map ready for lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
	/// Source map version (should be 3).
	pub version: i64,
	/// Generated file name.
	pub file: Option<String>,
	/// Root for source paths, carried verbatim.
	pub source_root: Option<String>,
	/// Original source file paths; the index is the source id.
	pub sources: Vec<String>,
	/// Optional embedded source content, parallel to `sources`.
	pub sources_content: Vec<Option<String>>,
	/// Original identifiers; the index is the name id.
	pub names: Vec<String>,
	mappings: MappingTable,
}

impl SourceMap {
	/// Assemble a map from already-decoded parts.
	pub fn new(sources: Vec<String>, names: Vec<String>, mappings: MappingTable) -> Self {
		Self {
			version: SUPPORTED_VERSION,
			file: None,
			source_root: None,
			sources,
			sources_content: Vec::new(),
			names,
			mappings,
		}
	}

	/// Parse a source map from JSON bytes, rejecting versions other than 3.
	pub fn from_slice(data: &[u8]) -> Result<Self> {
		Self::from_slice_with(data, &ReadOptions::default())
	}

	pub fn from_slice_with(data: &[u8], options: &ReadOptions) -> Result<Self> {
		let raw: RawSourceMap = serde_json::from_slice(data)?;
		Self::from_raw(raw, options)
	}

	/// Parse a source map from a reader, such as a file or stdin.
	pub fn from_reader<R: Read>(reader: R, options: &ReadOptions) -> Result<Self> {
		let raw: RawSourceMap = serde_json::from_reader(reader)?;
		Self::from_raw(raw, options)
	}

	fn from_raw(raw: RawSourceMap, options: &ReadOptions) -> Result<Self> {
		if raw.version != SUPPORTED_VERSION {
			if options.strict_version {
				return Err(SourceMapError::UnsupportedVersion(raw.version));
			}
			warn!(version = raw.version, "unsupported source map version, decoding anyway");
		}

		let mappings = parse_mappings(&raw.mappings)?;

		let source_map = Self {
			version: raw.version,
			file: raw.file,
			source_root: raw.source_root,
			sources: raw.sources.into_iter().map(Option::unwrap_or_default).collect(),
			sources_content: raw.sources_content.unwrap_or_default(),
			names: raw.names.into_iter().map(coerce_name).collect(),
			mappings,
		};

		debug!(
			sources = source_map.source_count(),
			names = source_map.name_count(),
			lines = source_map.line_count(),
			entries = source_map.mapping_count(),
			"read source map"
		);
		Ok(source_map)
	}

	/// Report a version mismatch on a map read with lenient options.
	pub fn check_version(&self) -> Result<()> {
		if self.version == SUPPORTED_VERSION {
			Ok(())
		} else {
			Err(SourceMapError::UnsupportedVersion(self.version))
		}
	}

	/// Find the original mapping for a 1-indexed generated line and column.
	///
	/// If the position precedes every entry on its line, the last mapping of
	/// the nearest preceding non-empty line is returned.
	pub fn lookup(&self, line: u32, column: u32) -> Result<OriginalMapping> {
		lookup::lookup(&self.mappings, &self.sources, &self.names, line, column)
	}

	/// Find the raw entry for a position without resolving its indices.
	pub fn lookup_entry(&self, line: u32, column: u32) -> Result<&Entry> {
		lookup::find_entry(&self.mappings, line, column)
	}

	pub fn resolve(&self, entry: &Entry) -> Result<OriginalMapping> {
		lookup::resolve(entry, &self.sources, &self.names)
	}

	pub fn mappings(&self) -> &MappingTable {
		&self.mappings
	}

	/// Embedded content of a source file, if present.
	pub fn source_content(&self, source_id: u32) -> Option<&str> {
		self.sources_content
			.get(source_id as usize)
			.and_then(|c| c.as_deref())
	}

	/// Check if this source map has embedded source content.
	pub fn has_sources_content(&self) -> bool {
		self.sources_content.iter().any(|c| c.is_some())
	}

	pub fn source_count(&self) -> usize {
		self.sources.len()
	}

	pub fn name_count(&self) -> usize {
		self.names.len()
	}

	/// Number of generated lines in the mapping table.
	pub fn line_count(&self) -> usize {
		self.mappings.line_count()
	}

	/// Number of entries across all generated lines.
	pub fn mapping_count(&self) -> usize {
		self.mappings.entry_count()
	}
}

impl FromStr for SourceMap {
	type Err = SourceMapError;

	fn from_str(s: &str) -> Result<Self> {
		Self::from_slice(s.as_bytes())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_source_map() -> &'static str {
		r#"{
			"version": 3,
			"file": "out.js",
			"sourceRoot": "src/",
			"sources": ["index.ts", "util.ts"],
			"sourcesContent": ["function hello() {\n  console.log('Hello');\n}\n", null],
			"names": ["hello", "console", "log"],
			"mappings": "AAAA,SAASA;AACA,EAAEC,QAAQC;;ACEfF"
		}"#
	}

	#[test]
	fn test_parse_source_map() {
		let sm: SourceMap = sample_source_map().parse().unwrap();

		assert_eq!(sm.version, 3);
		assert_eq!(sm.file.as_deref(), Some("out.js"));
		assert_eq!(sm.sources, vec!["index.ts", "util.ts"]);
		assert_eq!(sm.names, vec!["hello", "console", "log"]);
		assert_eq!(sm.line_count(), 4);
		assert_eq!(sm.mapping_count(), 6);
		assert!(sm.has_sources_content());
		assert!(sm.source_content(0).unwrap().starts_with("function hello"));
		assert!(sm.source_content(1).is_none());
		assert!(sm.check_version().is_ok());
	}

	#[test]
	fn test_lookup_position() {
		let sm: SourceMap = sample_source_map().parse().unwrap();

		let mapping = sm.lookup(1, 10).unwrap();
		assert_eq!(
			mapping,
			OriginalMapping {
				file: "index.ts".to_string(),
				line: 1,
				column: 10,
				name: "hello".to_string(),
			}
		);

		let mapping = sm.lookup(2, 3).unwrap();
		assert_eq!(mapping.line, 2);
		assert_eq!(mapping.column, 12);
		assert_eq!(mapping.name, "console");

		// Line 3 is empty and falls back to the last entry of line 2.
		let mapping = sm.lookup(3, 1).unwrap();
		assert_eq!(mapping.line, 2);
		assert_eq!(mapping.column, 20);
		assert_eq!(mapping.name, "log");

		let mapping = sm.lookup(4, 1).unwrap();
		assert_eq!(mapping.file, "util.ts");
		assert_eq!(mapping.line, 4);
		assert_eq!(mapping.column, 5);
		assert_eq!(mapping.name, "hello");
	}

	#[test]
	fn test_source_root_is_not_applied() {
		let sm: SourceMap = sample_source_map().parse().unwrap();
		assert_eq!(sm.source_root.as_deref(), Some("src/"));
		assert_eq!(sm.lookup(1, 1).unwrap().file, "index.ts");
	}

	#[test]
	fn test_invalid_version_strict() {
		let json = r#"{"version": 2, "sources": [], "names": [], "mappings": ""}"#;
		let result = json.parse::<SourceMap>();
		assert!(matches!(result, Err(SourceMapError::UnsupportedVersion(2))));
	}

	#[test]
	fn test_missing_version_is_unsupported() {
		let json = r#"{"sources": [], "mappings": "AAAA"}"#;
		assert!(matches!(
			json.parse::<SourceMap>(),
			Err(SourceMapError::UnsupportedVersion(0))
		));
	}

	#[test]
	fn test_invalid_version_lenient() {
		let json = r#"{"version": 4, "sources": ["a.js"], "names": ["n"], "mappings": "AAAAA"}"#;
		let sm = SourceMap::from_slice_with(json.as_bytes(), &ReadOptions::lenient()).unwrap();

		assert_eq!(sm.version, 4);
		assert_eq!(sm.lookup(1, 1).unwrap().name, "n");
		assert!(matches!(
			sm.check_version(),
			Err(SourceMapError::UnsupportedVersion(4))
		));
	}

	#[test]
	fn test_numeric_names_are_coerced() {
		let json = r#"{"version": 3, "sources": ["a.js"], "names": ["a", 42, null], "mappings": ""}"#;
		let sm: SourceMap = json.parse().unwrap();
		assert_eq!(sm.names, vec!["a", "42", ""]);
		assert_eq!(sm.line_count(), 0);
	}

	#[test]
	fn test_optional_fields_default() {
		let json = r#"{"version": 3, "mappings": "AAAA"}"#;
		let sm: SourceMap = json.parse().unwrap();
		assert!(sm.file.is_none());
		assert!(sm.sources.is_empty());
		assert!(!sm.has_sources_content());
		assert!(matches!(
			sm.lookup(1, 1),
			Err(SourceMapError::UnresolvedSourceIndex(0))
		));
	}

	#[test]
	fn test_malformed_mappings_fail_read() {
		let json = r#"{"version": 3, "sources": ["a.js"], "mappings": "AA"}"#;
		assert!(matches!(
			json.parse::<SourceMap>(),
			Err(SourceMapError::MalformedEntry { line: 0, fields: 2 })
		));
	}

	#[test]
	fn test_invalid_json() {
		assert!(matches!(
			"{not json".parse::<SourceMap>(),
			Err(SourceMapError::InvalidSourceMapJson(_))
		));
	}

	#[test]
	fn test_from_reader() {
		let sm = SourceMap::from_reader(sample_source_map().as_bytes(), &ReadOptions::default()).unwrap();
		assert_eq!(sm.source_count(), 2);
		assert_eq!(sm.name_count(), 3);
	}

	#[test]
	fn test_serialize_shape() {
		let sm = SourceMap::new(
			vec!["a.js".to_string()],
			Vec::new(),
			parse_mappings("AAAA;;C").unwrap(),
		);
		let value = serde_json::to_value(&sm).unwrap();

		assert_eq!(value["version"], 3);
		assert_eq!(value["sourcesContent"], serde_json::json!([]));
		let lines = value["mappings"].as_array().unwrap();
		assert_eq!(lines.len(), 3);
		assert_eq!(lines[0][0]["original"]["source_id"], 0);
		assert!(lines[1].as_array().unwrap().is_empty());
		assert!(lines[2][0]["original"].is_null());
	}
}
