//! Cargo-style status lines on stderr.
//!
//! Plan and JSON output go to stdout, so everything here writes to stderr.

use std::io::Write;

use console::Style;

const LABEL_WIDTH: usize = 12;

fn emit(style: Style, label: &str, message: &str) {
    let _ = writeln!(
        std::io::stderr(),
        "{:>width$} {message}",
        style.apply_to(label),
        width = LABEL_WIDTH,
    );
}

/// Print a status line such as `     Planned com.example.app (9 tasks)`.
pub fn status(label: &str, message: &str) {
    emit(Style::new().green().bold(), label, message);
}

/// Informational status line, in cyan.
pub fn status_info(label: &str, message: &str) {
    emit(Style::new().cyan().bold(), label, message);
}

pub fn status_warn(label: &str, message: &str) {
    emit(Style::new().yellow().bold(), label, message);
}
