use tasmovie_core::{DecodeError, FailureKind};
use thiserror::Error;

/// Outcome of a parse call that did not produce a result.
#[derive(Debug, Error)]
pub enum ParseError {
    /// No decoder is registered for the extension. Expected and
    /// user-correctable, not an internal error.
    #[error("Unsupported movie format: '.{extension}'")]
    NotSupported { extension: String },

    /// The decoder could not interpret the input.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl ParseError {
    pub fn is_not_supported(&self) -> bool {
        matches!(self, Self::NotSupported { .. })
    }

    /// Failure classification, or `None` for an unsupported format.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::NotSupported { .. } => None,
            Self::Decode(err) => Some(err.kind()),
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        Self::Decode(DecodeError::Io(err))
    }
}

/// Misconfiguration detected while building a [`Registry`](crate::Registry).
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("extension '.{extension}' is claimed by both {existing} and {new}")]
    DuplicateExtension {
        extension: String,
        existing: &'static str,
        new: &'static str,
    },

    #[error("{format} declares no file extensions")]
    NoExtensions { format: &'static str },
}

/// Failure reading or writing the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Cannot serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}
