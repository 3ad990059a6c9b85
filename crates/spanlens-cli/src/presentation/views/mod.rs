mod analyze;
mod compare;
mod reconstruct;

use crate::presentation::formatters::{Palette, Tone};

/// First `n` characters of an identifier.
pub(crate) fn short_id(id: &str, n: usize) -> String {
    id.chars().take(n).collect()
}

/// Footer reporting how many input lines the loader skipped.
pub(crate) fn skipped_line(p: Palette, count: usize) -> String {
    let line = format!("Skipped {} malformed record(s)", count);
    if count > 0 { p.paint(Tone::Warn, line) } else { line }
}
