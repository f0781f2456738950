// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source Map v3 decoding and position lookup.
//!
//! This crate provides functionality for:
//! - Decoding base64 VLQ values
//! - Parsing the `mappings` field into a per-line table of entries
//! - Looking up the original position for a generated line and column, falling
//!   back to the nearest preceding line when nothing on the line applies
//! - Reading the JSON envelope around the mappings
//! - Extracting source context from embedded `sourcesContent`
//!
//! A decoded [`SourceMap`] is immutable, so it can be shared across threads
//! for concurrent lookups.
//!
//! # Example
//!
//! ```
//! use srcmap_core::SourceMap;
//!
//! let source_map: SourceMap = r#"{
//!     "version": 3,
//!     "sources": ["src/app.ts"],
//!     "names": ["main"],
//!     "mappings": "AAAAA"
//! }"#
//! .parse()
//! .unwrap();
//!
//! let mapping = source_map.lookup(1, 1).unwrap();
//! assert_eq!(mapping.file, "src/app.ts");
//! assert_eq!((mapping.line, mapping.column), (1, 1));
//! assert_eq!(mapping.name, "main");
//! ```

pub mod context;
pub mod error;
pub mod lookup;
pub mod mappings;
pub mod sourcemap;
pub mod table;
pub mod vlq;

pub use context::{extract_context, SourceContext};
pub use error::{Result, SourceMapError};
pub use lookup::{find_entry, lookup, resolve, OriginalMapping};
pub use mappings::parse_mappings;
pub use sourcemap::{ReadOptions, SourceMap, SUPPORTED_VERSION};
pub use table::{Entry, Line, MappingTable, OriginalRef};
pub use vlq::{decode_vlq, decode_vlq_segment, ByteCursor};
