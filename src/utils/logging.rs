// file: src/utils/logging.rs
// description: Tracing subscriber initialization and colored console markers

use colored::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Crates whose warnings are noise for end users while parsing PDFs.
const PDF_NOISE_DIRECTIVES: &[&str] = &["lopdf=error"];

pub fn init_logger(colored_output: bool, verbose: bool, suppress_pdf_warnings: bool) {
    let filter = build_filter(verbose, suppress_pdf_warnings);

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact()
        .with_ansi(colored_output);

    // A second init (tests, repeated runs in one process) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn build_filter(verbose: bool, suppress_pdf_warnings: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { "warn" };
    let mut directives = vec![level.to_string()];
    if suppress_pdf_warnings {
        directives.extend(PDF_NOISE_DIRECTIVES.iter().map(|d| d.to_string()));
    }
    EnvFilter::new(directives.join(","))
}

pub fn format_success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg.green())
}

pub fn format_error(msg: &str) -> String {
    format!("{} {}", "✗".red().bold(), msg.red())
}

pub fn format_warning(msg: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), msg.yellow())
}

pub fn format_info(msg: &str) -> String {
    format!("{} {}", "ℹ".blue().bold(), msg)
}

/// Numbered phase marker, e.g. `(3) Generated 12 questions`.
pub fn format_phase(step: usize, msg: &str) -> String {
    format!("{} {}", format!("({})", step).cyan().bold(), msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_keep_message() {
        colored::control::set_override(false);
        assert_eq!(format_success("Done!"), "✓ Done!");
        assert_eq!(format_error("File not found"), "✗ File not found");
        assert_eq!(format_phase(2, "Loaded 3 chunks"), "(2) Loaded 3 chunks");
    }

    #[test]
    fn test_filter_includes_pdf_directive() {
        let filter = build_filter(false, true).to_string();
        assert!(filter.contains("lopdf=error"));
        let filter = build_filter(true, false).to_string();
        assert!(!filter.contains("lopdf"));
    }
}
