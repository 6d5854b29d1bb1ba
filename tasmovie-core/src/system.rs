use serde::{Deserialize, Serialize};

/// System identifiers that movie formats can declare.
///
/// Formats spell the same console many different ways (`GEN`, `genesis`,
/// `md`, ...). This enum centralizes the canonical code, display name and
/// accepted spellings so decoders never compare raw strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum System {
    // Nintendo
    Nes,
    Fds,
    Snes,
    Sgb,
    GameBoy,
    Gbc,
    Gba,
    N64,
    Nds,
    GameCube,
    Wii,

    // Sega
    MasterSystem,
    GameGear,
    Genesis,
    SegaCd,
    Sega32x,
    Saturn,

    // Others
    Psx,
    Pce,
    Atari2600,

    // PC games recorded through a tool-assisted runtime
    Linux,
    Windows,
}

/// All system variants in listing order.
const ALL_SYSTEMS: &[System] = &[
    System::Nes,
    System::Fds,
    System::Snes,
    System::Sgb,
    System::GameBoy,
    System::Gbc,
    System::Gba,
    System::N64,
    System::Nds,
    System::GameCube,
    System::Wii,
    System::MasterSystem,
    System::GameGear,
    System::Genesis,
    System::SegaCd,
    System::Sega32x,
    System::Saturn,
    System::Psx,
    System::Pce,
    System::Atari2600,
    System::Linux,
    System::Windows,
];

impl System {
    /// Canonical system code stored against a submission.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Nes => "NES",
            Self::Fds => "FDS",
            Self::Snes => "SNES",
            Self::Sgb => "SGB",
            Self::GameBoy => "GB",
            Self::Gbc => "GBC",
            Self::Gba => "GBA",
            Self::N64 => "N64",
            Self::Nds => "DS",
            Self::GameCube => "GC",
            Self::Wii => "Wii",
            Self::MasterSystem => "SMS",
            Self::GameGear => "GG",
            Self::Genesis => "Genesis",
            Self::SegaCd => "SegaCD",
            Self::Sega32x => "32X",
            Self::Saturn => "Saturn",
            Self::Psx => "PSX",
            Self::Pce => "PCE",
            Self::Atari2600 => "A2600",
            Self::Linux => "Linux",
            Self::Windows => "Windows",
        }
    }

    /// Full display name for the system.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Nes => "Nintendo Entertainment System",
            Self::Fds => "Famicom Disk System",
            Self::Snes => "Super Nintendo Entertainment System",
            Self::Sgb => "Super Game Boy",
            Self::GameBoy => "Game Boy",
            Self::Gbc => "Game Boy Color",
            Self::Gba => "Game Boy Advance",
            Self::N64 => "Nintendo 64",
            Self::Nds => "Nintendo DS",
            Self::GameCube => "Nintendo GameCube",
            Self::Wii => "Nintendo Wii",
            Self::MasterSystem => "Sega Master System",
            Self::GameGear => "Sega Game Gear",
            Self::Genesis => "Sega Genesis / Mega Drive",
            Self::SegaCd => "Sega CD / Mega CD",
            Self::Sega32x => "Sega 32X",
            Self::Saturn => "Sega Saturn",
            Self::Psx => "Sony PlayStation",
            Self::Pce => "PC Engine / TurboGrafx-16",
            Self::Atari2600 => "Atari 2600",
            Self::Linux => "Linux",
            Self::Windows => "Windows",
        }
    }

    /// All accepted spellings for this system (case-insensitive matching).
    ///
    /// The first entry is always the lowercased canonical code.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Nes => &["nes", "famicom", "fc"],
            Self::Fds => &["fds", "famicom disk system"],
            Self::Snes => &["snes", "sfc", "super famicom"],
            Self::Sgb => &["sgb", "super game boy"],
            Self::GameBoy => &["gb", "dmg", "gameboy", "game boy"],
            Self::Gbc => &["gbc", "cgb", "game boy color"],
            Self::Gba => &["gba", "agb", "game boy advance"],
            Self::N64 => &["n64", "nintendo 64"],
            Self::Nds => &["ds", "nds", "nintendo ds"],
            Self::GameCube => &["gc", "gcn", "ngc", "gamecube"],
            Self::Wii => &["wii"],
            Self::MasterSystem => &["sms", "master system", "mark iii"],
            Self::GameGear => &["gg", "game gear"],
            Self::Genesis => &["genesis", "gen", "md", "megadrive", "mega drive"],
            Self::SegaCd => &["segacd", "sega cd", "megacd", "mega cd", "scd"],
            Self::Sega32x => &["32x", "sega 32x"],
            Self::Saturn => &["saturn", "sat"],
            Self::Psx => &["psx", "ps1", "playstation"],
            Self::Pce => &["pce", "tg16", "turbografx-16", "pc engine"],
            Self::Atari2600 => &["a2600", "a26", "atari 2600"],
            Self::Linux => &["linux"],
            Self::Windows => &["windows", "win"],
        }
    }

    /// All system variants.
    pub fn all() -> &'static [System] {
        ALL_SYSTEMS
    }
}

impl std::fmt::Display for System {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Error returned when a string cannot be parsed into a `System`.
#[derive(Debug, Clone)]
pub struct SystemParseError(pub String);

impl std::fmt::Display for SystemParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown system: '{}'", self.0)
    }
}

impl std::error::Error for SystemParseError {}

impl std::str::FromStr for System {
    type Err = SystemParseError;

    /// Parse a system from its code or any alias (case-insensitive,
    /// surrounding whitespace ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ALL_SYSTEMS
            .iter()
            .copied()
            .find(|system| system.aliases().contains(&lower.as_str()))
            .ok_or_else(|| SystemParseError(s.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/system_tests.rs"]
mod tests;
