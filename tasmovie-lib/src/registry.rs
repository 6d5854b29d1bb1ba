//! Extension-keyed dispatch to movie decoders.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, SeekFrom};
use std::path::Path;

use tasmovie_core::{DecodeError, MovieDecoder, ParseOptions, ParseResult, ReadSeek};
use tasmovie_formats::{
    Bk2Decoder, DtmDecoder, Fm2Decoder, LsmvDecoder, LtmDecoder, SmvDecoder, VbmDecoder,
};

use crate::error::{ParseError, RegistryError};

/// Metadata about a registered format.
#[derive(Debug, Clone)]
pub struct FormatInfo {
    /// Human-readable format name (e.g., "libTAS movie")
    pub name: &'static str,
    /// Emulator or tool that writes the format
    pub emulator: &'static str,
    /// Claimed file extensions, lowercase
    pub extensions: &'static [&'static str],
}

impl FormatInfo {
    /// Create format metadata from a decoder.
    pub fn from_decoder<D: MovieDecoder>(decoder: &D) -> Self {
        Self {
            name: decoder.format_name(),
            emulator: decoder.emulator(),
            extensions: decoder.file_extensions(),
        }
    }
}

/// A registered format with its decoder.
pub struct RegisteredDecoder {
    pub info: FormatInfo,
    pub decoder: Box<dyn MovieDecoder>,
}

impl RegisteredDecoder {
    pub fn new<D: MovieDecoder + 'static>(decoder: D) -> Self {
        let info = FormatInfo::from_decoder(&decoder);
        Self {
            info,
            decoder: Box::new(decoder),
        }
    }
}

/// Mapping from file extension to decoder.
///
/// Build it once, then share it: parsing only reads the mapping, so a
/// `&Registry` can serve any number of concurrent callers.
pub struct Registry {
    decoders: Vec<RegisteredDecoder>,
    by_extension: HashMap<String, usize>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            decoders: Vec::new(),
            by_extension: HashMap::new(),
        }
    }

    /// Create a registry holding every built-in decoder.
    pub fn builtin() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry
            .register(LtmDecoder::new())?
            .register(Bk2Decoder::new())?
            .register(LsmvDecoder::new())?
            .register(Fm2Decoder::new())?
            .register(DtmDecoder::new())?
            .register(VbmDecoder::new())?
            .register(SmvDecoder::new())?;
        Ok(registry)
    }

    /// Register a decoder under every extension it claims.
    ///
    /// Nothing is registered when any of its extensions is already taken.
    pub fn register<D: MovieDecoder + 'static>(
        &mut self,
        decoder: D,
    ) -> Result<&mut Self, RegistryError> {
        let entry = RegisteredDecoder::new(decoder);
        if entry.info.extensions.is_empty() {
            return Err(RegistryError::NoExtensions {
                format: entry.info.name,
            });
        }

        let mut claimed: Vec<String> = Vec::with_capacity(entry.info.extensions.len());
        for ext in entry.info.extensions {
            let key = normalize_extension(ext);
            if let Some(&index) = self.by_extension.get(&key) {
                return Err(RegistryError::DuplicateExtension {
                    extension: key,
                    existing: self.decoders[index].info.name,
                    new: entry.info.name,
                });
            }
            if claimed.contains(&key) {
                return Err(RegistryError::DuplicateExtension {
                    extension: key,
                    existing: entry.info.name,
                    new: entry.info.name,
                });
            }
            claimed.push(key);
        }

        let index = self.decoders.len();
        log::debug!("registered {} for {:?}", entry.info.name, claimed);
        for key in claimed {
            self.by_extension.insert(key, index);
        }
        self.decoders.push(entry);
        Ok(self)
    }

    /// Find the decoder for an extension (case-insensitive, leading `.`
    /// ignored). `None` means the format is not supported.
    pub fn resolve(&self, extension: &str) -> Option<&RegisteredDecoder> {
        let index = *self.by_extension.get(&normalize_extension(extension))?;
        Some(&self.decoders[index])
    }

    /// Get all registered decoders in registration order.
    pub fn decoders(&self) -> impl Iterator<Item = &RegisteredDecoder> {
        self.decoders.iter()
    }

    /// Metadata for every registered format.
    pub fn formats(&self) -> Vec<FormatInfo> {
        self.decoders.iter().map(|d| d.info.clone()).collect()
    }

    /// Every registered extension, sorted.
    pub fn extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.by_extension.keys().map(String::as_str).collect();
        extensions.sort_unstable();
        extensions
    }

    /// Parse a movie with default options.
    pub fn parse(
        &self,
        file_name_or_extension: &str,
        reader: &mut dyn ReadSeek,
    ) -> Result<ParseResult, ParseError> {
        self.parse_with_options(file_name_or_extension, reader, &ParseOptions::default())
    }

    /// Parse a movie, selecting the decoder from a file name or bare extension.
    pub fn parse_with_options(
        &self,
        file_name_or_extension: &str,
        reader: &mut dyn ReadSeek,
        options: &ParseOptions,
    ) -> Result<ParseResult, ParseError> {
        let extension = extension_of(file_name_or_extension);
        let registered = self
            .resolve(extension)
            .ok_or_else(|| ParseError::NotSupported {
                extension: normalize_extension(extension),
            })?;

        let len = reader.seek(SeekFrom::End(0))?;
        if len > options.max_input_bytes {
            return Err(DecodeError::TooLarge {
                limit: options.max_input_bytes,
                actual: len,
            }
            .into());
        }
        reader.seek(SeekFrom::Start(0))?;

        log::debug!(
            "decoding {} ({} bytes) as {}",
            file_name_or_extension,
            len,
            registered.info.name
        );
        let result = registered.decoder.decode(reader, options)?;
        Ok(result)
    }

    /// Open and parse a movie file on disk.
    pub fn parse_file(&self, path: &Path, options: &ParseOptions) -> Result<ParseResult, ParseError> {
        let name = path.to_string_lossy();
        let extension = extension_of(&name);
        if self.resolve(extension).is_none() {
            return Err(ParseError::NotSupported {
                extension: normalize_extension(extension),
            });
        }
        let mut reader = BufReader::new(File::open(path)?);
        self.parse_with_options(&name, &mut reader, options)
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}

/// The text after the last `.` of the final path component, or the whole
/// input when it has no `.`.
pub fn extension_of(file_name_or_extension: &str) -> &str {
    let file_name = file_name_or_extension
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name_or_extension);
    match file_name.rfind('.') {
        Some(dot) => &file_name[dot + 1..],
        None => file_name,
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
