use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use tasmovie_core::util::format_bytes;
use tasmovie_lib::{Settings, settings_path};

use crate::CliError;

/// Write the default settings unless a settings file already exists.
///
/// Returns `true` when a new file was written.
pub(crate) fn init_settings_at(path: &Path) -> Result<bool, CliError> {
    if path.exists() {
        return Ok(false);
    }
    Settings::default().save_to(path)?;
    Ok(true)
}

/// Create the settings file with default limits.
pub(crate) fn run_config_init() -> Result<(), CliError> {
    let path = settings_path();
    if init_settings_at(&path)? {
        log::info!(
            "Wrote default settings to {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
        );
    } else {
        log::info!(
            "Settings file already exists: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(left unchanged)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() {
    log::info!("{}", settings_path().display());
}

/// Show the effective settings and where they came from.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = settings_path();

    log::info!(
        "{}",
        "tasmovie Settings".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");

    let settings = match Settings::try_load_from(&path) {
        Ok(Some(settings)) => {
            log::info!(
                "  Settings file: {} {}",
                path.display().if_supports_color(Stdout, |t| t.cyan()),
                "(loaded)".if_supports_color(Stdout, |t| t.green()),
            );
            settings
        }
        Ok(None) => {
            log::info!(
                "  Settings file: {} {}",
                path.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
            );
            Settings::default()
        }
        Err(e) => {
            log::warn!(
                "  Settings file: {} {}",
                path.display().if_supports_color(Stdout, |t| t.cyan()),
                format!("(invalid: {}, using defaults)", e).if_supports_color(Stdout, |t| t.red()),
            );
            Settings::default()
        }
    };
    log::info!("");

    log::info!(
        "  {} {}",
        "max_input_bytes:".if_supports_color(Stdout, |t| t.cyan()),
        format_bytes(settings.limits.max_input_bytes),
    );
    log::info!(
        "  {} {}",
        "max_entry_bytes:".if_supports_color(Stdout, |t| t.cyan()),
        format_bytes(settings.limits.max_entry_bytes),
    );
    log::info!("");

    log::info!("{}", settings.to_toml_string()?.trim_end());
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
