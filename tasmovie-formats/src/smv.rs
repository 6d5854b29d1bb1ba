//! Snes9x movie decoder.
//!
//! Supports:
//! - Snes9x movies (.smv), header versions 1, 4 and 5
//!
//! Only the fixed 32-byte prefix shared by every version is read.

use std::io::SeekFrom;

use tasmovie_core::util::{read_header, read_u32_le, unix_timestamp};
use tasmovie_core::{
    DecodeError, MovieDecoder, ParseOptions, ParseResult, ReadSeek, Region, StartType, System,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const HEADER_SIZE: usize = 0x20;
const MAGIC: &[u8; 4] = b"SMV\x1A";

const VERSION_OFFSET: usize = 0x04;
const UID_OFFSET: usize = 0x08;
const RERECORD_OFFSET: usize = 0x0C;
const FRAME_COUNT_OFFSET: usize = 0x10;
const MOVIE_FLAGS_OFFSET: usize = 0x15;

/// Set when the movie starts from reset; clear when it embeds a snapshot.
const FLAG_FROM_RESET: u8 = 0x01;
const FLAG_PAL: u8 = 0x02;

const KNOWN_VERSIONS: [u32; 3] = [1, 4, 5];

/// Decoder for Snes9x movies.
#[derive(Debug, Default)]
pub struct SmvDecoder;

impl SmvDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl MovieDecoder for SmvDecoder {
    fn decode(
        &self,
        reader: &mut dyn ReadSeek,
        _options: &ParseOptions,
    ) -> Result<ParseResult, DecodeError> {
        reader.seek(SeekFrom::Start(0))?;
        let header = read_header(reader, HEADER_SIZE)?;
        if &header[..4] != MAGIC {
            return Err(DecodeError::invalid_format(format!(
                "bad SMV magic: {:02X?}",
                &header[..4]
            )));
        }

        let flags = header[MOVIE_FLAGS_OFFSET];
        let start_type = if flags & FLAG_FROM_RESET == 0 {
            StartType::Savestate
        } else {
            StartType::PowerOn
        };
        let mut result = ParseResult::new("smv")
            .with_region(Region::from_pal_flag(flags & FLAG_PAL != 0))
            .with_system(System::Snes)
            .with_start_type(start_type);

        let version = read_u32_le(&header, VERSION_OFFSET);
        if !KNOWN_VERSIONS.contains(&version) {
            result.warn(format!("unknown SMV version {}", version));
        }

        result.frame_count = u64::from(read_u32_le(&header, FRAME_COUNT_OFFSET));
        if result.frame_count == 0 {
            result.warn("frame count is zero");
        }
        result.rerecord_count = Some(u64::from(read_u32_le(&header, RERECORD_OFFSET)));
        result.recorded_at = unix_timestamp(i64::from(read_u32_le(&header, UID_OFFSET)));

        Ok(result)
    }

    fn format_name(&self) -> &'static str {
        "Snes9x movie"
    }

    fn emulator(&self) -> &'static str {
        "Snes9x"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["smv"]
    }
}

#[cfg(test)]
#[path = "tests/smv_tests.rs"]
mod tests;
