//! Helpers shared by the decoders in this crate.

use std::io::{BufReader, Read, SeekFrom};
use std::str::FromStr;

use tasmovie_core::config::KeyValue;
use tasmovie_core::util::{count_prefixed_lines, decode_text};
use tasmovie_core::{DecodeError, EntryStream, ParseOptions, ParseResult, ReadSeek};

/// Coerce a header value to an integer, recording a warning when it is not one.
///
/// The caller keeps whatever value the field held before.
pub(crate) fn int_or_warn<T: FromStr>(result: &mut ParseResult, kv: &KeyValue) -> Option<T> {
    let parsed = kv.int();
    if parsed.is_none() {
        result.warn(format!(
            "ignoring non-integer {} value '{}'",
            kv.key, kv.value
        ));
    }
    parsed
}

/// Coerce a header value to a boolean flag, recording a warning when it is
/// not one.
pub(crate) fn flag_or_warn(result: &mut ParseResult, kv: &KeyValue) -> Option<bool> {
    let parsed = kv.flag();
    if parsed.is_none() {
        result.warn(format!("ignoring non-boolean {} value '{}'", kv.key, kv.value));
    }
    parsed
}

/// Count the frame lines of an input log entry, draining the stream.
pub(crate) fn count_frames(stream: EntryStream<'_, '_>, prefix: u8) -> Result<u64, DecodeError> {
    Ok(count_prefixed_lines(BufReader::new(stream), prefix)?)
}

/// Store non-blank annotation text, appending to any already present.
pub(crate) fn push_annotation(result: &mut ParseResult, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    match &mut result.annotations {
        Some(existing) => {
            existing.push('\n');
            existing.push_str(text);
        }
        None => result.annotations = Some(text.to_string()),
    }
}

/// Read a whole plain-text movie, bounded by `max_input_bytes`.
pub(crate) fn read_text_movie(
    reader: &mut dyn ReadSeek,
    options: &ParseOptions,
) -> Result<String, DecodeError> {
    reader.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    reader
        .take(options.max_input_bytes.saturating_add(1))
        .read_to_end(&mut bytes)?;
    if bytes.len() as u64 > options.max_input_bytes {
        return Err(DecodeError::TooLarge {
            limit: options.max_input_bytes,
            actual: bytes.len() as u64,
        });
    }
    Ok(decode_text(&bytes))
}
