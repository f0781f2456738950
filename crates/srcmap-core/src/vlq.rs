// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! VLQ (Variable-Length Quantity) decoder for source map mappings.
//!
//! Each value is a run of base64 digits. A digit carries 5 payload bits and a
//! continuation bit (`0b100000`); payload groups are least significant first.
//! Once the run ends, the low bit of the accumulated value is the sign and the
//! remaining bits are the magnitude.

use crate::error::{Result, SourceMapError};

/// Base64 character set used in VLQ encoding.
const BASE64_CHARS: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const INVALID_DIGIT: u8 = 0xff;

const VLQ_BASE_SHIFT: u32 = 5;
const VLQ_BASE_MASK: u8 = 0b011111;
const VLQ_CONTINUATION_BIT: u8 = 0b100000;

/// Largest shift that still leaves room for 5 payload bits in a `u64`.
const VLQ_MAX_SHIFT: u32 = 55;

static DECODE_TABLE: [u8; 256] = build_decode_table();

const fn build_decode_table() -> [u8; 256] {
	let mut table = [INVALID_DIGIT; 256];
	let mut i = 0;
	while i < BASE64_CHARS.len() {
		table[BASE64_CHARS[i] as usize] = i as u8;
		i += 1;
	}
	table
}

/// Forward-only reader over the bytes of a `mappings` string.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> ByteCursor<'a> {
	pub fn new(input: &'a str) -> Self {
		Self::from_bytes(input.as_bytes())
	}

	pub fn from_bytes(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	/// Look at the next byte without consuming it.
	pub fn peek(&self) -> Option<u8> {
		self.bytes.get(self.pos).copied()
	}

	pub fn next_byte(&mut self) -> Option<u8> {
		let byte = self.peek()?;
		self.pos += 1;
		Some(byte)
	}

	/// Consume the next byte only if it equals `wanted`.
	pub fn consume_if(&mut self, wanted: u8) -> bool {
		if self.peek() == Some(wanted) {
			self.pos += 1;
			true
		} else {
			false
		}
	}

	pub fn is_empty(&self) -> bool {
		self.pos >= self.bytes.len()
	}

	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	pub fn position(&self) -> usize {
		self.pos
	}
}

/// Decode a single base64 digit to its 6-bit value.
fn decode_digit(byte: u8) -> Result<u8> {
	match DECODE_TABLE[byte as usize] {
		INVALID_DIGIT => Err(SourceMapError::InvalidVlqChar(byte as char)),
		digit => Ok(digit),
	}
}

/// Convert from sign-in-low-bit to a two's complement value.
fn from_vlq_signed(value: u64) -> i64 {
	let negated = value & 1 == 1;
	// At most 60 significant bits are ever accumulated, so this cannot wrap.
	let magnitude = (value >> 1) as i64;
	if negated {
		-magnitude
	} else {
		magnitude
	}
}

/// Decode the next VLQ value from the cursor.
///
/// Consumes exactly the digits of one value, so dense runs of adjacent values
/// can be decoded by calling this repeatedly. Running out of input before a
/// digit without the continuation bit fails with
/// [`SourceMapError::UnexpectedEndOfInput`].
pub fn decode_vlq(cursor: &mut ByteCursor<'_>) -> Result<i64> {
	let mut accumulated = 0u64;
	let mut shift = 0u32;

	loop {
		let byte = cursor
			.next_byte()
			.ok_or(SourceMapError::UnexpectedEndOfInput)?;
		let digit = decode_digit(byte)?;

		if shift > VLQ_MAX_SHIFT {
			return Err(SourceMapError::VlqOverflow);
		}
		accumulated |= u64::from(digit & VLQ_BASE_MASK) << shift;

		if digit & VLQ_CONTINUATION_BIT == 0 {
			break;
		}
		shift += VLQ_BASE_SHIFT;
	}

	Ok(from_vlq_signed(accumulated))
}

/// Decode every VLQ value in a segment that contains no separators.
pub fn decode_vlq_segment(segment: &str) -> Result<Vec<i64>> {
	let mut cursor = ByteCursor::new(segment);
	let mut values = Vec::new();
	while !cursor.is_empty() {
		values.push(decode_vlq(&mut cursor)?);
	}
	Ok(values)
}
