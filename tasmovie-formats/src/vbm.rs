//! VisualBoyAdvance movie decoder.
//!
//! Supports:
//! - VBA movies (.vbm) for Game Boy, Game Boy Color, Super Game Boy and
//!   Game Boy Advance

use std::io::SeekFrom;

use tasmovie_core::util::{read_header, read_u32_le, unix_timestamp};
use tasmovie_core::{
    DecodeError, MovieDecoder, ParseOptions, ParseResult, ReadSeek, Region, StartType, System,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const HEADER_SIZE: usize = 0x40;
const MAGIC: &[u8; 4] = b"VBM\x1A";

const UID_OFFSET: usize = 0x08;
const FRAME_COUNT_OFFSET: usize = 0x0C;
const RERECORD_OFFSET: usize = 0x10;
const START_FLAGS_OFFSET: usize = 0x14;
const SYSTEM_FLAGS_OFFSET: usize = 0x16;

const START_SAVESTATE: u8 = 0x01;
const START_SRAM: u8 = 0x02;

const SYSTEM_GBA: u8 = 0x01;
const SYSTEM_GBC: u8 = 0x02;
const SYSTEM_SGB: u8 = 0x04;

/// Decoder for VisualBoyAdvance movies.
#[derive(Debug, Default)]
pub struct VbmDecoder;

impl VbmDecoder {
    pub fn new() -> Self {
        Self
    }
}

/// GBA wins over GBC, which wins over SGB; no flag at all means original
/// Game Boy.
fn system_from_flags(flags: u8) -> System {
    if flags & SYSTEM_GBA != 0 {
        System::Gba
    } else if flags & SYSTEM_GBC != 0 {
        System::Gbc
    } else if flags & SYSTEM_SGB != 0 {
        System::Sgb
    } else {
        System::GameBoy
    }
}

impl MovieDecoder for VbmDecoder {
    fn decode(
        &self,
        reader: &mut dyn ReadSeek,
        _options: &ParseOptions,
    ) -> Result<ParseResult, DecodeError> {
        reader.seek(SeekFrom::Start(0))?;
        let header = read_header(reader, HEADER_SIZE)?;
        if &header[..4] != MAGIC {
            return Err(DecodeError::invalid_format(format!(
                "bad VBM magic: {:02X?}",
                &header[..4]
            )));
        }

        let system_flags = header[SYSTEM_FLAGS_OFFSET];
        let mut result = ParseResult::new("vbm")
            .with_region(Region::Ntsc)
            .with_system(system_from_flags(system_flags));

        if (system_flags & SYSTEM_GBA != 0) && (system_flags & (SYSTEM_GBC | SYSTEM_SGB) != 0) {
            result.warn(format!("conflicting system flags 0x{:02X}", system_flags));
        }

        let start_flags = header[START_FLAGS_OFFSET];
        let savestate = start_flags & START_SAVESTATE != 0;
        let sram = start_flags & START_SRAM != 0;
        if savestate && sram {
            result.warn("movie claims to start from both a savestate and SRAM");
        }
        let start_type = if savestate {
            StartType::Savestate
        } else if sram {
            StartType::Sram
        } else {
            StartType::PowerOn
        };
        result.start_type = Some(start_type);

        result.frame_count = u64::from(read_u32_le(&header, FRAME_COUNT_OFFSET));
        if result.frame_count == 0 {
            result.warn("frame count is zero");
        }
        result.rerecord_count = Some(u64::from(read_u32_le(&header, RERECORD_OFFSET)));

        // The movie uid doubles as the recording time.
        result.recorded_at = unix_timestamp(i64::from(read_u32_le(&header, UID_OFFSET)));

        Ok(result)
    }

    fn format_name(&self) -> &'static str {
        "VisualBoyAdvance movie"
    }

    fn emulator(&self) -> &'static str {
        "VisualBoyAdvance"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["vbm"]
    }
}

#[cfg(test)]
#[path = "tests/vbm_tests.rs"]
mod tests;
