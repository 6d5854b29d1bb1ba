use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::{Read, Seek};

pub mod archive;
pub mod config;
pub mod error;
pub mod region;
pub mod system;
pub mod util;

pub use archive::{ArchiveEntry, ArchiveReader, EntryStream};
pub use error::{DecodeError, FailureKind};
pub use region::Region;
pub use system::{System, SystemParseError};

/// Default bound on the size of a whole movie file (64 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 64 * 1024 * 1024;

/// Default bound on the decompressed size of a single archive entry (64 MiB).
pub const DEFAULT_MAX_ENTRY_BYTES: u64 = 64 * 1024 * 1024;

/// Options that control how movies are decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Inputs larger than this are rejected before decoding starts.
    pub max_input_bytes: u64,

    /// Archive entries larger than this are rejected before their buffers
    /// are allocated.
    pub max_entry_bytes: u64,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_input_bytes(mut self, bytes: u64) -> Self {
        self.max_input_bytes = bytes;
        self
    }

    pub fn max_entry_bytes(mut self, bytes: u64) -> Self {
        self.max_entry_bytes = bytes;
        self
    }
}

/// How the recording begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StartType {
    /// Clean power-on
    PowerOn,
    /// Power-on with pre-populated save RAM
    Sram,
    /// Resumes from an embedded savestate
    Savestate,
}

impl StartType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PowerOn => "Power-on",
            Self::Sram => "SRAM",
            Self::Savestate => "Savestate",
        }
    }
}

impl std::fmt::Display for StartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Normalized metadata extracted from a movie file.
///
/// Optional fields are only populated when the source format encodes them.
/// `frame_count == 0` means "unknown"; decoders that cannot substantiate a
/// frame count leave it at 0 and record a warning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Extension of the format that produced this result
    pub file_extension: String,

    /// Video timing the movie targets
    pub region: Region,

    /// Number of frames in the movie (0 = unknown)
    pub frame_count: u64,

    /// Number of rerecords made while authoring the movie
    pub rerecord_count: Option<u64>,

    /// System the movie was recorded on
    pub system: Option<System>,

    /// How the recording begins
    pub start_type: Option<StartType>,

    /// Frame rate declared by the movie itself, overriding the system default
    pub frame_rate_override: Option<f64>,

    /// When the recording was started
    pub recorded_at: Option<DateTime<Utc>>,

    /// Author annotations or comments embedded in the movie
    pub annotations: Option<String>,

    /// Non-fatal diagnostics, in the order they were encountered
    pub warnings: Vec<String>,
}

impl ParseResult {
    pub fn new(file_extension: impl Into<String>) -> Self {
        Self {
            file_extension: file_extension.into(),
            ..Self::default()
        }
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    pub fn with_system(mut self, system: System) -> Self {
        self.system = Some(system);
        self
    }

    pub fn with_start_type(mut self, start_type: StartType) -> Self {
        self.start_type = Some(start_type);
        self
    }

    /// Append a diagnostic. Warnings are never removed once recorded.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("{}: {}", self.file_extension, message);
        self.warnings.push(message);
    }

    /// True when the decode produced no warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// A reader that implements both Read and Seek.
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

/// Trait for decoding one movie file format.
///
/// Implementors populate only the [`ParseResult`] fields their format can
/// substantiate. Malformed but recognizable input degrades to warnings; only
/// input that cannot be interpreted at all returns a [`DecodeError`].
pub trait MovieDecoder: Send + Sync {
    /// Decode a movie from a reader positioned at the start of the file.
    ///
    /// # Returns
    /// * `Ok(ParseResult)` - Decoded metadata, possibly with warnings
    /// * `Err(DecodeError)` - The input is not readable as this format
    fn decode(
        &self,
        reader: &mut dyn ReadSeek,
        options: &ParseOptions,
    ) -> Result<ParseResult, DecodeError>;

    /// Human-readable name of the format (e.g., "libTAS movie").
    fn format_name(&self) -> &'static str;

    /// Emulator or tool that writes this format.
    fn emulator(&self) -> &'static str;

    /// File extensions this decoder claims, lowercase and without a dot.
    fn file_extensions(&self) -> &'static [&'static str];
}
