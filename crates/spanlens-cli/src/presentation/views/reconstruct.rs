use std::fmt;

use super::skipped_line;
use crate::presentation::formatters::{Palette, Tone, kilobytes, rule, seconds};
use crate::presentation::view_models::{CreateView, ReconstructViewModel};

/// Sessions listed in detail before the rest are summarized.
const LISTED_SESSIONS: usize = 10;

impl CreateView for ReconstructViewModel {
    fn create_view<'a>(&'a self, palette: Palette) -> Box<dyn fmt::Display + 'a> {
        Box::new(ReconstructView { data: self, p: palette })
    }
}

struct ReconstructView<'a> {
    data: &'a ReconstructViewModel,
    p: Palette,
}

impl<'a> fmt::Display for ReconstructView<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data;
        let p = self.p;

        writeln!(f, "Loaded {} spans from {}", data.total_spans, data.source)?;
        if let Some(tools) = &data.tools_file {
            writeln!(f, "  📎 Merged tools: {}", tools)?;
        }
        writeln!(
            f,
            "Spans with session ID: {}/{}",
            data.spans_with_session, data.total_spans
        )?;
        writeln!(f, "Detected {} sessions", data.sessions.len())?;

        for session in data.sessions.iter().take(LISTED_SESSIONS) {
            writeln!(f, "\n{}", rule('─'))?;
            writeln!(
                f,
                "{}",
                p.paint(
                    Tone::Heading,
                    format!("SESSION {}: {}", session.session_number, session.session_id)
                )
            )?;
            writeln!(f, "{}", rule('─'))?;
            writeln!(f, "Spans: {}", session.span_count)?;
            match (&session.start_time, &session.end_time) {
                (Some(start), Some(end)) => writeln!(
                    f,
                    "Duration: {} ({} to {})",
                    seconds(session.duration_seconds),
                    start,
                    end
                )?,
                _ => writeln!(f, "Duration: {}", seconds(session.duration_seconds))?,
            }
            writeln!(f, "Unique traces: {}", session.unique_traces)?;
            writeln!(f, "Span types:")?;
            for kind in &session.span_kinds {
                writeln!(f, "  {}: {}", kind.key, kind.count)?;
            }
        }
        if data.sessions.len() > LISTED_SESSIONS {
            writeln!(
                f,
                "\n... and {} more sessions",
                data.sessions.len() - LISTED_SESSIONS
            )?;
        }

        writeln!(f)?;
        match (&data.output, data.bytes_written) {
            (Some(output), Some(bytes)) => writeln!(
                f,
                "{}",
                p.paint(
                    Tone::Good,
                    format!(
                        "Saved {} sessions to {} ({})",
                        data.sessions.len(),
                        output,
                        kilobytes(bytes)
                    )
                )
            )?,
            _ => writeln!(
                f,
                "{}",
                p.paint(
                    Tone::Warn,
                    "No sessions reconstructed. Check that spans have session IDs in metadata."
                )
            )?,
        }

        writeln!(f, "{}", skipped_line(p, data.skipped_records))?;

        Ok(())
    }
}
