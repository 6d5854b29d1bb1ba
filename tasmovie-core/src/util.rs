//! Byte and text primitives shared by every decoder.

use std::io::{BufRead, Read};

use chrono::{DateTime, Utc};

use crate::DecodeError;

// ---------------------------------------------------------------------------
// Integer decoding
// ---------------------------------------------------------------------------

// Callers validate header length up front (see `read_header`), so these
// index directly like any other fixed-layout field access.

pub fn read_u32_le(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

pub fn read_u64_le(buf: &[u8], offset: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[offset..offset + 8]);
    u64::from_le_bytes(bytes)
}

/// Read exactly `len` header bytes from the start of a reader.
///
/// A short read is reported as [`DecodeError::TooSmall`] carrying the number
/// of bytes that were actually available.
pub fn read_header<R: Read + ?Sized>(reader: &mut R, len: usize) -> Result<Vec<u8>, DecodeError> {
    let mut buf = Vec::with_capacity(len);
    reader.take(len as u64).read_to_end(&mut buf)?;
    if buf.len() < len {
        return Err(DecodeError::TooSmall {
            expected: len as u64,
            actual: buf.len() as u64,
        });
    }
    Ok(buf)
}

// ---------------------------------------------------------------------------
// Text decoding
// ---------------------------------------------------------------------------

/// Read a fixed-length ASCII string from a byte slice.
///
/// Non-printable bytes are replaced with spaces, then the result is trimmed,
/// so header fields padded with 0x00 or 0xFF come back clean.
pub fn read_ascii_fixed(buf: &[u8]) -> String {
    let s: String = buf
        .iter()
        .map(|&b| {
            if (0x20..0x7F).contains(&b) {
                b as char
            } else {
                ' '
            }
        })
        .collect();
    s.trim().to_string()
}

/// Decode text of unknown encoding.
///
/// Valid UTF-8 (with or without a byte-order mark) is returned as-is;
/// anything else is treated as Latin-1, which maps every byte to a char.
pub fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Count lines that begin with `prefix`, streaming through the reader.
///
/// Input logs can be large, so lines are visited one at a time without
/// holding the whole entry in memory.
pub fn count_prefixed_lines<R: BufRead>(mut reader: R, prefix: u8) -> std::io::Result<u64> {
    let mut count = 0;
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(count);
        }
        if line.first() == Some(&prefix) {
            count += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// Convert seconds since the Unix epoch into a UTC timestamp.
///
/// Movie headers use 0 for "not recorded", so 0 maps to `None`, as do
/// values outside chrono's representable range.
pub fn unix_timestamp(secs: i64) -> Option<DateTime<Utc>> {
    if secs == 0 {
        return None;
    }
    DateTime::from_timestamp(secs, 0)
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

/// Format a byte count as a human-readable size string (e.g., "4 KB", "2 MB").
///
/// Uses exact integer division. Values that aren't clean multiples of KB/MB
/// are shown in bytes.
pub fn format_bytes(bytes: u64) -> String {
    if bytes >= 1024 * 1024 && bytes.is_multiple_of(1024 * 1024) {
        format!("{} MB", bytes / (1024 * 1024))
    } else if bytes >= 1024 && bytes.is_multiple_of(1024) {
        format!("{} KB", bytes / 1024)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
#[path = "tests/util_tests.rs"]
mod tests;
