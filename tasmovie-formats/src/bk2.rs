//! BizHawk movie decoder.
//!
//! Supports:
//! - BizHawk movies (.bk2), a zip holding `Header.txt`, `Input Log.txt`
//!   and optional `Comments.txt`
//!
//! Entry names are matched case-insensitively; older BizHawk releases were
//! not consistent about capitalization.

use tasmovie_core::config::KeyValue;
use tasmovie_core::{
    ArchiveReader, DecodeError, MovieDecoder, ParseOptions, ParseResult, ReadSeek, Region,
    StartType, System,
};

use crate::common::{count_frames, flag_or_warn, int_or_warn, push_annotation};

const HEADER_ENTRY: &str = "header.txt";
const INPUT_LOG_ENTRY: &str = "input log.txt";
const COMMENTS_ENTRY: &str = "comments.txt";

/// Decoder for BizHawk movies.
#[derive(Debug, Default)]
pub struct Bk2Decoder;

impl Bk2Decoder {
    pub fn new() -> Self {
        Self
    }
}

/// Header fields that refine each other and are resolved after the scan.
#[derive(Debug, Default)]
struct Header {
    platform: Option<String>,
    cgb_mode: bool,
    gg_mode: bool,
    segacd_mode: bool,
    savestate: bool,
    saveram: bool,
}

/// Map BizHawk's `Platform` value (plus mode flags) to a system.
fn resolve_system(header: &Header) -> Option<Result<System, String>> {
    let platform = header.platform.as_deref()?;
    let system = match platform.parse::<System>() {
        Ok(system) => system,
        Err(_) => return Some(Err(platform.to_string())),
    };
    Some(Ok(match system {
        System::GameBoy if header.cgb_mode => System::Gbc,
        System::MasterSystem if header.gg_mode => System::GameGear,
        System::Genesis if header.segacd_mode => System::SegaCd,
        other => other,
    }))
}

fn apply_header(result: &mut ParseResult, text: &str) {
    let mut header = Header::default();

    for line in text.lines() {
        let Some(kv) = KeyValue::parse_whitespace(line) else {
            continue;
        };
        if kv.key_is("Platform") {
            header.platform = Some(kv.value.to_string());
        } else if kv.key_is("rerecordCount") {
            if let Some(rerecords) = int_or_warn(result, &kv) {
                result.rerecord_count = Some(rerecords);
            }
        } else if kv.key_is("PAL") {
            if let Some(pal) = flag_or_warn(result, &kv) {
                result.region = Region::from_pal_flag(pal);
            }
        } else if kv.key_is("StartsFromSavestate") {
            header.savestate = flag_or_warn(result, &kv).unwrap_or(false);
        } else if kv.key_is("StartsFromSaveRam") {
            header.saveram = flag_or_warn(result, &kv).unwrap_or(false);
        } else if kv.key_is("IsCGBMode") {
            header.cgb_mode = kv.flag().unwrap_or(false);
        } else if kv.key_is("IsGGMode") {
            header.gg_mode = kv.flag().unwrap_or(false);
        } else if kv.key_is("IsSegaCDMode") {
            header.segacd_mode = kv.flag().unwrap_or(false);
        }
    }

    match resolve_system(&header) {
        Some(Ok(system)) => result.system = Some(system),
        Some(Err(platform)) => result.warn(format!("unknown platform '{}'", platform)),
        None => result.warn("Header.txt has no Platform"),
    }

    result.start_type = Some(if header.savestate {
        StartType::Savestate
    } else if header.saveram {
        StartType::Sram
    } else {
        StartType::PowerOn
    });
}

impl MovieDecoder for Bk2Decoder {
    fn decode(
        &self,
        reader: &mut dyn ReadSeek,
        options: &ParseOptions,
    ) -> Result<ParseResult, DecodeError> {
        let mut result = ParseResult::new("bk2");
        let mut archive = ArchiveReader::open(reader, options)?;
        let mut saw_header = false;
        let mut saw_input_log = false;

        while let Some(entry) = archive.next_entry()? {
            if entry.is_directory() {
                continue;
            }
            let name = entry.name().to_ascii_lowercase();
            match name.as_str() {
                HEADER_ENTRY => {
                    saw_header = true;
                    let text = entry.read_text()?;
                    apply_header(&mut result, &text);
                }
                INPUT_LOG_ENTRY => {
                    saw_input_log = true;
                    result.frame_count = count_frames(entry.open_stream()?, b'|')?;
                }
                COMMENTS_ENTRY => {
                    let text = entry.read_text()?;
                    push_annotation(&mut result, &text);
                }
                _ => entry.discard()?,
            }
        }

        if !saw_header {
            result.warn("Header.txt not found");
        }
        if !saw_input_log {
            result.warn("Input Log.txt not found; frame count is unknown");
        }
        Ok(result)
    }

    fn format_name(&self) -> &'static str {
        "BizHawk movie"
    }

    fn emulator(&self) -> &'static str {
        "BizHawk"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["bk2"]
    }
}

#[cfg(test)]
#[path = "tests/bk2_tests.rs"]
mod tests;
