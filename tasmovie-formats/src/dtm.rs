//! Dolphin movie decoder.
//!
//! Supports:
//! - Dolphin input movies (.dtm) for GameCube and Wii
//!
//! The 256-byte little-endian header carries everything we need; the
//! controller data that follows is never read.

use std::io::SeekFrom;

use tasmovie_core::util::{read_ascii_fixed, read_header, read_u32_le, read_u64_le, unix_timestamp};
use tasmovie_core::{
    DecodeError, MovieDecoder, ParseOptions, ParseResult, ReadSeek, Region, StartType, System,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const HEADER_SIZE: usize = 0x100;
const MAGIC: &[u8; 4] = b"DTM\x1A";

const GAME_ID_OFFSET: usize = 0x04;
const IS_WII_OFFSET: usize = 0x0A;
const FROM_SAVESTATE_OFFSET: usize = 0x0C;
const VI_COUNT_OFFSET: usize = 0x0D;
const INPUT_COUNT_OFFSET: usize = 0x15;
const LAG_COUNT_OFFSET: usize = 0x1D;
const RERECORD_OFFSET: usize = 0x2D;
const START_TIME_OFFSET: usize = 0x81;

/// Decoder for Dolphin movies.
#[derive(Debug, Default)]
pub struct DtmDecoder;

impl DtmDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl MovieDecoder for DtmDecoder {
    fn decode(
        &self,
        reader: &mut dyn ReadSeek,
        _options: &ParseOptions,
    ) -> Result<ParseResult, DecodeError> {
        reader.seek(SeekFrom::Start(0))?;
        let header = read_header(reader, HEADER_SIZE)?;
        if &header[..4] != MAGIC {
            return Err(DecodeError::invalid_format(format!(
                "bad DTM magic: {:02X?}",
                &header[..4]
            )));
        }

        let system = if header[IS_WII_OFFSET] != 0 {
            System::Wii
        } else {
            System::GameCube
        };
        let start_type = if header[FROM_SAVESTATE_OFFSET] != 0 {
            StartType::Savestate
        } else {
            StartType::PowerOn
        };

        let mut result = ParseResult::new("dtm")
            .with_region(Region::Ntsc)
            .with_system(system)
            .with_start_type(start_type);

        let game_id = read_ascii_fixed(&header[GAME_ID_OFFSET..GAME_ID_OFFSET + 6]);
        let input_count = read_u64_le(&header, INPUT_COUNT_OFFSET);
        let lag_count = read_u64_le(&header, LAG_COUNT_OFFSET);
        log::debug!(
            "dtm game {}: {} inputs, {} lag frames",
            game_id,
            input_count,
            lag_count
        );

        result.frame_count = read_u64_le(&header, VI_COUNT_OFFSET);
        if result.frame_count == 0 {
            result.warn("VI count is zero; frame count is unknown");
        }
        result.rerecord_count = Some(u64::from(read_u32_le(&header, RERECORD_OFFSET)));

        let start_time = read_u64_le(&header, START_TIME_OFFSET);
        match i64::try_from(start_time).ok().and_then(unix_timestamp) {
            Some(at) => result.recorded_at = Some(at),
            None if start_time != 0 => {
                result.warn(format!("recording start time {} is out of range", start_time));
            }
            None => {}
        }

        Ok(result)
    }

    fn format_name(&self) -> &'static str {
        "Dolphin movie"
    }

    fn emulator(&self) -> &'static str {
        "Dolphin"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["dtm"]
    }
}

#[cfg(test)]
#[path = "tests/dtm_tests.rs"]
mod tests;
