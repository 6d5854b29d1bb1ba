use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use tasmovie_lib::Registry;

pub(crate) fn run_list(registry: &Registry) {
    log::info!("Supported movie formats:");
    log::info!("");

    let mut formats = registry.formats();
    formats.sort_by(|a, b| a.emulator.cmp(b.emulator).then(a.name.cmp(b.name)));

    let mut current_emulator = "";

    for format in &formats {
        if format.emulator != current_emulator {
            if !current_emulator.is_empty() {
                log::info!("");
            }
            current_emulator = format.emulator;
            log::info!(
                "{}:",
                current_emulator.if_supports_color(Stdout, |t| t.bold()),
            );
        }

        let extensions: Vec<String> = format
            .extensions
            .iter()
            .map(|ext| format!(".{}", ext))
            .collect();

        log::info!(
            "  {} [{}]",
            format.name.if_supports_color(Stdout, |t| t.bold()),
            extensions
                .join(", ")
                .if_supports_color(Stdout, |t| t.cyan()),
        );
    }
}
