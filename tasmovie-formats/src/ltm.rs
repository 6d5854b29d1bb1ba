//! libTAS movie decoder.
//!
//! Supports:
//! - libTAS movies (.ltm), a gzip-compressed tar holding `config.ini`,
//!   the `inputs` log and optional `annotations.txt`
//!
//! Entries are dispatched purely by name since member order is not fixed.
//! Unknown entries are expected as the format evolves and are discarded
//! without a warning.

use tasmovie_core::config::KeyValue;
use tasmovie_core::{
    ArchiveReader, DecodeError, MovieDecoder, ParseOptions, ParseResult, ReadSeek, Region,
    StartType, System,
};

use crate::common::{count_frames, int_or_warn, push_annotation};

const CONFIG_ENTRY: &str = "config.ini";
const INPUTS_ENTRY: &str = "inputs";
const ANNOTATIONS_ENTRY: &str = "annotations.txt";

/// Decoder for libTAS movies.
#[derive(Debug, Default)]
pub struct LtmDecoder;

impl LtmDecoder {
    pub fn new() -> Self {
        Self
    }
}

/// Frame rate fields collected while scanning `config.ini`.
#[derive(Debug, Default)]
struct FrameRate {
    num: Option<u64>,
    den: Option<u64>,
}

impl FrameRate {
    fn value(&self) -> Option<f64> {
        match (self.num, self.den) {
            (Some(num), Some(den)) if den > 0 => Some(num as f64 / den as f64),
            _ => None,
        }
    }
}

/// Apply the recognized `config.ini` keys. A `frame_count` line that fails
/// to parse already carries its own warning, so only a config with no such
/// line at all is reported as missing the count.
fn apply_config(result: &mut ParseResult, text: &str) {
    let mut rate = FrameRate::default();
    let mut saw_frame_count = false;

    for line in text.lines() {
        let Some(kv) = KeyValue::parse(line) else {
            continue;
        };
        match kv.key {
            "frame_count" => {
                saw_frame_count = true;
                if let Some(frames) = int_or_warn(result, &kv) {
                    result.frame_count = frames;
                }
            }
            "rerecord_count" => {
                if let Some(rerecords) = int_or_warn(result, &kv) {
                    result.rerecord_count = Some(rerecords);
                }
            }
            "framerate_num" => {
                if let Some(num) = int_or_warn(result, &kv) {
                    rate.num = Some(num);
                }
            }
            "framerate_den" => {
                if let Some(den) = int_or_warn(result, &kv) {
                    rate.den = Some(den);
                }
            }
            _ => {}
        }
    }

    if let Some(fps) = rate.value() {
        result.frame_rate_override = Some(fps);
    }
    if !saw_frame_count {
        result.warn("config.ini has no frame_count; frame count is unknown");
    }
}

impl MovieDecoder for LtmDecoder {
    fn decode(
        &self,
        reader: &mut dyn ReadSeek,
        options: &ParseOptions,
    ) -> Result<ParseResult, DecodeError> {
        let mut result = ParseResult::new("ltm")
            .with_region(Region::Ntsc)
            .with_system(System::Linux)
            .with_start_type(StartType::PowerOn);

        let mut archive = ArchiveReader::open(reader, options)?;
        let mut saw_config = false;

        while let Some(entry) = archive.next_entry()? {
            if entry.is_directory() {
                continue;
            }
            let name = entry.name().to_string();
            match name.as_str() {
                CONFIG_ENTRY => {
                    saw_config = true;
                    let text = entry.read_text()?;
                    apply_config(&mut result, &text);
                }
                INPUTS_ENTRY => {
                    let frames = count_frames(entry.open_stream()?, b'|')?;
                    log::debug!("ltm input log holds {} frame lines", frames);
                }
                ANNOTATIONS_ENTRY => {
                    let text = entry.read_text()?;
                    push_annotation(&mut result, &text);
                }
                _ => {
                    log::trace!("ltm: discarding entry '{}'", name);
                    entry.discard()?;
                }
            }
        }

        if !saw_config {
            result.warn("config.ini not found; frame count is unknown");
        }
        Ok(result)
    }

    fn format_name(&self) -> &'static str {
        "libTAS movie"
    }

    fn emulator(&self) -> &'static str {
        "libTAS"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["ltm"]
    }
}

#[cfg(test)]
#[path = "tests/ltm_tests.rs"]
mod tests;
