use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use log::Level;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use serde_json::json;

use tasmovie_lib::{ParseError, ParseOptions, ParseResult, Registry, Settings};

use crate::CliError;

/// Run the parse command.
pub(crate) fn run_parse(
    registry: &Registry,
    paths: &[PathBuf],
    json: bool,
    recursive: bool,
    max_input_bytes: Option<u64>,
    quiet: bool,
) -> Result<(), CliError> {
    let mut options = Settings::load().parse_options();
    if let Some(limit) = max_input_bytes {
        options = options.max_input_bytes(limit);
    }

    let files = collect_movie_files(registry, paths, recursive);
    if files.is_empty() {
        log::info!(
            "{}",
            "No movie files found".if_supports_color(Stdout, |t| t.dimmed()),
        );
        return Ok(());
    }

    // Progress bar (hidden in quiet mode, for JSON output, and for single files)
    let pb = if quiet || json || files.len() < 2 {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} [{pos}/{len}] {msg}")
                .expect("static pattern")
                .tick_chars("/-\\|"),
        );
        pb
    };

    let failed = parse_files(registry, &files, &options, json, &pb)?;
    pb.finish_and_clear();

    if failed > 0 {
        return Err(CliError::ParseFailures {
            failed,
            total: files.len(),
        });
    }
    Ok(())
}

/// Parse each file and print its report. Returns the number of failures.
fn parse_files(
    registry: &Registry,
    files: &[PathBuf],
    options: &ParseOptions,
    json: bool,
    pb: &ProgressBar,
) -> Result<usize, CliError> {
    let mut failed = 0;
    for path in files {
        pb.set_message(display_name(path).to_string());
        let outcome = registry.parse_file(path, options);
        if outcome.is_err() {
            failed += 1;
        }

        if json {
            let line = serde_json::to_string(&json_report(path, &outcome))
                .map_err(|e| CliError::other(format!("Failed to serialize result: {}", e)))?;
            pb.suspend(|| println!("{}", line));
        } else {
            pb.suspend(|| print_report(path, &outcome));
        }
        pb.inc(1);
    }
    Ok(failed)
}

/// Expand the given paths into the list of movie files to parse.
///
/// Files are kept as given, whatever their extension. Directories contribute
/// the files whose extension a registered decoder claims, sorted by path, and
/// are descended into only when `recursive` is set.
pub(crate) fn collect_movie_files(
    registry: &Registry,
    paths: &[PathBuf],
    recursive: bool,
) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            scan_dir(registry, path, recursive, &mut files);
        } else {
            files.push(path.clone());
        }
    }
    files
}

fn scan_dir(registry: &Registry, dir: &Path, recursive: bool, files: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!(
                "{} Error reading folder {}: {}",
                "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                dir.display(),
                e,
            );
            return;
        }
    };

    let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
    paths.sort();

    for path in paths {
        if path.is_dir() {
            if recursive {
                scan_dir(registry, &path, recursive, files);
            }
        } else if is_movie_file(registry, &path) {
            files.push(path);
        }
    }
}

fn is_movie_file(registry: &Registry, path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| registry.resolve(ext).is_some())
}

fn display_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or("?")
}

/// Short label for a failure, as used in JSON output.
pub(crate) fn failure_label(err: &ParseError) -> String {
    match err.failure_kind() {
        Some(kind) => format!("{:?}", kind),
        None => "NotSupported".to_string(),
    }
}

/// Build the JSON object printed for one file.
pub(crate) fn json_report(
    path: &Path,
    outcome: &Result<ParseResult, ParseError>,
) -> serde_json::Value {
    match outcome {
        Ok(result) => json!({
            "path": path.display().to_string(),
            "result": result,
        }),
        Err(e) => json!({
            "path": path.display().to_string(),
            "error": e.to_string(),
            "kind": failure_label(e),
        }),
    }
}

fn print_report(path: &Path, outcome: &Result<ParseResult, ParseError>) {
    let file_name = display_name(path);
    match outcome {
        Ok(result) => {
            let lines = format_result(file_name, result);
            let has_warnings = lines.iter().any(|(level, _)| *level <= Level::Warn);
            for (i, (level, msg)) in lines.iter().enumerate() {
                // Promote header to warn if this file has warnings (visible in quiet mode)
                let effective_level = if i == 0 && has_warnings {
                    Level::Warn
                } else {
                    *level
                };
                log::log!(effective_level, "{}", msg);
            }
        }
        Err(e) if e.is_not_supported() => {
            log::warn!(
                "  {}: {} Skipped ({})",
                file_name,
                "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                e,
            );
        }
        Err(e) => {
            log::error!(
                "  {}: {} Parse failed ({})",
                file_name,
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
        }
    }
}

/// Format a parse result as leveled output lines. The first line is the
/// file header.
pub(crate) fn format_result(file_name: &str, result: &ParseResult) -> Vec<(Level, String)> {
    let mut lines: Vec<(Level, String)> = Vec::new();

    lines.push((
        Level::Info,
        format!(
            "  {}:",
            file_name.if_supports_color(Stdout, |t| t.bold()),
        ),
    ));

    let mut field = |label: &str, value: String| {
        let label = if label.is_empty() {
            String::new()
        } else {
            format!("{}:", label)
        };
        lines.push((
            Level::Info,
            format!(
                "    {} {}",
                format!("{:<10}", label).if_supports_color(Stdout, |t| t.cyan()),
                value,
            ),
        ));
    };

    field("Format", format!(".{}", result.file_extension));
    if let Some(system) = result.system {
        field("System", system.display_name().to_string());
    }
    field("Region", result.region.name().to_string());

    let mut frames = result.frame_count.to_string();
    if let Some(fps) = result.frame_rate_override {
        frames.push_str(&format!(" @ {:.3} fps", fps));
    }
    field("Frames", frames);

    if let Some(rerecords) = result.rerecord_count {
        field("Rerecords", rerecords.to_string());
    }
    if let Some(start) = result.start_type {
        field("Start", start.to_string());
    }
    if let Some(recorded) = result.recorded_at {
        field("Recorded", recorded.format("%Y-%m-%d %H:%M:%S UTC").to_string());
    }
    if let Some(ref annotations) = result.annotations {
        for (i, line) in annotations.lines().enumerate() {
            let label = if i == 0 { "Notes" } else { "" };
            field(label, line.to_string());
        }
    }

    for warning in &result.warnings {
        lines.push((
            Level::Warn,
            format!(
                "    {} {}",
                "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                warning,
            ),
        ));
    }

    lines
}

#[cfg(test)]
#[path = "tests/parse_tests.rs"]
mod tests;
