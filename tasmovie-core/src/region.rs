use serde::{Deserialize, Serialize};

/// Video timing standard a movie was recorded against.
///
/// Downstream consumers always need a region, so undetermined movies
/// default to [`Region::Ntsc`] rather than carrying no value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    /// NTSC (60 Hz)
    #[default]
    Ntsc,
    /// PAL (50 Hz)
    Pal,
    /// NTSC-J (Japanese 60 Hz systems)
    NtscJapan,
    /// Timing could not be classified
    Unknown,
}

impl Region {
    /// Returns the standard abbreviation for this region.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Ntsc => "NTSC",
            Self::Pal => "PAL",
            Self::NtscJapan => "NTSC-J",
            Self::Unknown => "UNK",
        }
    }

    /// Returns the full name of this region.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ntsc => "NTSC",
            Self::Pal => "PAL",
            Self::NtscJapan => "NTSC (Japan)",
            Self::Unknown => "Unknown",
        }
    }

    /// Region implied by a boolean "is PAL" header flag.
    pub fn from_pal_flag(pal: bool) -> Self {
        if pal { Self::Pal } else { Self::Ntsc }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
