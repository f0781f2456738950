// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source context extraction around a resolved original line.

use serde::Serialize;

/// Lines surrounding a resolved position in an original source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceContext {
	pub pre_context: Vec<String>,
	pub context_line: String,
	pub post_context: Vec<String>,
}

impl SourceContext {
	pub fn is_empty(&self) -> bool {
		self.pre_context.is_empty() && self.context_line.is_empty() && self.post_context.is_empty()
	}
}

/// Extract up to `context_lines` lines on each side of a 1-indexed `line`.
///
/// A line outside the content yields an empty context.
pub fn extract_context(source_content: &str, line: usize, context_lines: usize) -> SourceContext {
	let lines: Vec<&str> = source_content.lines().collect();

	let line_idx = match line.checked_sub(1) {
		Some(idx) if idx < lines.len() => idx,
		_ => return SourceContext::default(),
	};

	let pre_start = line_idx.saturating_sub(context_lines);
	let post_end = line_idx
		.saturating_add(1)
		.saturating_add(context_lines)
		.min(lines.len());

	SourceContext {
		pre_context: lines[pre_start..line_idx].iter().map(|s| s.to_string()).collect(),
		context_line: lines[line_idx].to_string(),
		post_context: lines[(line_idx + 1)..post_end]
			.iter()
			.map(|s| s.to_string())
			.collect(),
	}
}
