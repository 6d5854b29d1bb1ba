//! Movie parsing entry points.
//!
//! [`Registry`] maps file extensions to the decoders in `tasmovie-formats`.
//! Most callers only need [`parse`], which dispatches through a shared
//! registry of every built-in format.

use std::sync::LazyLock;

pub mod error;
pub mod registry;
pub mod settings;

pub use error::{ParseError, RegistryError, SettingsError};
pub use registry::{FormatInfo, RegisteredDecoder, Registry, extension_of};
pub use settings::{Limits, Settings, settings_path};

// Re-export core types for convenience
pub use tasmovie_core::{
    DecodeError, FailureKind, MovieDecoder, ParseOptions, ParseResult, ReadSeek, Region,
    StartType, System,
};

static BUILTIN: LazyLock<Registry> = LazyLock::new(|| {
    Registry::builtin().expect("built-in decoders claim overlapping extensions")
});

/// Build the shared registry now instead of on the first parse.
///
/// The registry is otherwise constructed lazily, so a built-in extension
/// conflict would only panic when the first movie is parsed. Hosts should
/// call this once at startup to surface that failure immediately.
pub fn init() -> &'static Registry {
    LazyLock::force(&BUILTIN)
}

/// The process-wide registry of built-in decoders.
pub fn builtin_registry() -> &'static Registry {
    &BUILTIN
}

/// Parse a movie with the built-in decoders and default options.
///
/// `file_name_or_extension` may be a file name (`run.ltm`), a path, or a
/// bare extension (`ltm`, `.LTM`).
pub fn parse(
    file_name_or_extension: &str,
    reader: &mut dyn ReadSeek,
) -> Result<ParseResult, ParseError> {
    BUILTIN.parse(file_name_or_extension, reader)
}

/// Parse a movie with the built-in decoders.
pub fn parse_with_options(
    file_name_or_extension: &str,
    reader: &mut dyn ReadSeek,
    options: &ParseOptions,
) -> Result<ParseResult, ParseError> {
    BUILTIN.parse_with_options(file_name_or_extension, reader, options)
}
