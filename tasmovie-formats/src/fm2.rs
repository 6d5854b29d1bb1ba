//! FCEUX movie decoder.
//!
//! Supports:
//! - FCEUX text movies (.fm2)
//!
//! The file is a block of `key value` header lines followed by one `|`
//! line per frame. Binary input logs (`binary 1`) are not decoded; the
//! frame count then comes from the `length` header, which is also the
//! fallback for a text movie with no frame lines.

use tasmovie_core::config::KeyValue;
use tasmovie_core::{
    DecodeError, MovieDecoder, ParseOptions, ParseResult, ReadSeek, Region, StartType, System,
};

use crate::common::{flag_or_warn, int_or_warn, push_annotation, read_text_movie};

/// Decoder for FCEUX movies.
#[derive(Debug, Default)]
pub struct Fm2Decoder;

impl Fm2Decoder {
    pub fn new() -> Self {
        Self
    }
}

impl MovieDecoder for Fm2Decoder {
    fn decode(
        &self,
        reader: &mut dyn ReadSeek,
        options: &ParseOptions,
    ) -> Result<ParseResult, DecodeError> {
        let text = read_text_movie(reader, options)?;
        if text.trim().is_empty() {
            return Err(DecodeError::invalid_format("fm2 movie is empty"));
        }

        let mut result = ParseResult::new("fm2")
            .with_region(Region::Ntsc)
            .with_system(System::Nes)
            .with_start_type(StartType::PowerOn);

        let mut saw_version = false;
        let mut binary = false;
        let mut length: Option<u64> = None;
        let mut frames = 0u64;

        for line in text.lines() {
            if line.starts_with('|') {
                if binary {
                    // The rest of the file is the binary input log.
                    break;
                }
                frames += 1;
                continue;
            }

            let Some(kv) = KeyValue::parse_whitespace(line) else {
                continue;
            };
            match kv.key {
                "version" => saw_version = true,
                "rerecordCount" => {
                    if let Some(rerecords) = int_or_warn(&mut result, &kv) {
                        result.rerecord_count = Some(rerecords);
                    }
                }
                "palFlag" => {
                    if let Some(pal) = flag_or_warn(&mut result, &kv) {
                        result.region = Region::from_pal_flag(pal);
                    }
                }
                "FDS" => {
                    if flag_or_warn(&mut result, &kv) == Some(true) {
                        result.system = Some(System::Fds);
                    }
                }
                "binary" => binary = flag_or_warn(&mut result, &kv) == Some(true),
                "length" => length = int_or_warn(&mut result, &kv),
                "savestate" if !kv.value.is_empty() => {
                    result.start_type = Some(StartType::Savestate);
                }
                "comment" => push_annotation(&mut result, kv.value),
                _ => {}
            }
        }

        if !saw_version {
            result.warn("missing version header");
        }

        if binary {
            result.warn("binary input log not decoded");
            match length {
                Some(length) => result.frame_count = length,
                None => result.warn("binary movie has no length header; frame count is unknown"),
            }
        } else if frames > 0 {
            result.frame_count = frames;
        } else {
            match length {
                Some(length) => {
                    result.warn("no input frames; frame count taken from length header");
                    result.frame_count = length;
                }
                None => {
                    result.warn("no input frames and no length header; frame count is unknown")
                }
            }
        }

        Ok(result)
    }

    fn format_name(&self) -> &'static str {
        "FCEUX movie"
    }

    fn emulator(&self) -> &'static str {
        "FCEUX"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["fm2"]
    }
}

#[cfg(test)]
#[path = "tests/fm2_tests.rs"]
mod tests;
