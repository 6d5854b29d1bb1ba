//! lsnes movie decoder.
//!
//! Supports:
//! - lsnes movies (.lsmv), a zip of small single-value entries
//!   (`gametype`, `rerecords`, ...) plus the `input` log
//!
//! Frame lines in the input log start with `F`; subframe lines (`.`) do
//! not advance the frame counter.

use tasmovie_core::config::parse_int;
use tasmovie_core::{
    ArchiveReader, DecodeError, MovieDecoder, ParseOptions, ParseResult, ReadSeek, Region,
    StartType, System,
};

use crate::common::count_frames;

/// Decoder for lsnes movies.
#[derive(Debug, Default)]
pub struct LsmvDecoder;

impl LsmvDecoder {
    pub fn new() -> Self {
        Self
    }
}

/// Map an lsnes `gametype` to the system and video timing it implies.
fn game_type(value: &str) -> Option<(System, Region)> {
    let mapped = match value {
        "snes_ntsc" | "bsx" | "bsxslotted" | "sufamiturbo" => (System::Snes, Region::Ntsc),
        "snes_pal" => (System::Snes, Region::Pal),
        "sgb_ntsc" => (System::Sgb, Region::Ntsc),
        "sgb_pal" => (System::Sgb, Region::Pal),
        "gdmg" => (System::GameBoy, Region::Ntsc),
        "ggbc" | "ggbca" => (System::Gbc, Region::Ntsc),
        _ => return None,
    };
    Some(mapped)
}

impl MovieDecoder for LsmvDecoder {
    fn decode(
        &self,
        reader: &mut dyn ReadSeek,
        options: &ParseOptions,
    ) -> Result<ParseResult, DecodeError> {
        let mut result = ParseResult::new("lsmv");
        let mut archive = ArchiveReader::open(reader, options)?;
        let mut saw_input = false;
        let mut savestate = false;
        let mut sram = false;

        while let Some(entry) = archive.next_entry()? {
            if entry.is_directory() {
                continue;
            }
            let name = entry.name().to_string();
            match name.as_str() {
                "gametype" => {
                    let text = entry.read_text()?;
                    let value = text.trim();
                    match game_type(value) {
                        Some((system, region)) => {
                            result.system = Some(system);
                            result.region = region;
                        }
                        None => result.warn(format!("unknown gametype '{}'", value)),
                    }
                }
                "rerecords" => {
                    let text = entry.read_text()?;
                    match parse_int(&text) {
                        Some(rerecords) => result.rerecord_count = Some(rerecords),
                        None => result.warn(format!(
                            "ignoring non-integer rerecords value '{}'",
                            text.trim()
                        )),
                    }
                }
                "input" => {
                    saw_input = true;
                    result.frame_count = count_frames(entry.open_stream()?, b'F')?;
                }
                "savestate" => {
                    savestate = true;
                    entry.discard()?;
                }
                _ if name.starts_with("moviesram.") => {
                    sram = true;
                    entry.discard()?;
                }
                _ => entry.discard()?,
            }
        }

        result.start_type = Some(if savestate {
            StartType::Savestate
        } else if sram {
            StartType::Sram
        } else {
            StartType::PowerOn
        });

        if !saw_input {
            result.warn("input entry not found; frame count is unknown");
        }
        Ok(result)
    }

    fn format_name(&self) -> &'static str {
        "lsnes movie"
    }

    fn emulator(&self) -> &'static str {
        "lsnes"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["lsmv"]
    }
}

#[cfg(test)]
#[path = "tests/lsmv_tests.rs"]
mod tests;
