use std::fmt;

use spanlens_engine::{Containment, PairResult, SessionReport, SpanOverview};

use super::{short_id, skipped_line};
use crate::config::DisplayConfig;
use crate::presentation::formatters::{Palette, Tone, one_line, percent, rule, seconds, thousands};
use crate::presentation::view_models::{CompareViewModel, CreateView};

impl CreateView for CompareViewModel {
    fn create_view<'a>(&'a self, palette: Palette) -> Box<dyn fmt::Display + 'a> {
        Box::new(CompareView { data: self, p: palette })
    }
}

struct CompareView<'a> {
    data: &'a CompareViewModel,
    p: Palette,
}

fn span_label(index: usize) -> String {
    format!("Span {}", index + 1)
}

impl<'a> CompareView<'a> {
    fn status(&self, classification: Containment) -> String {
        match classification {
            Containment::FullyContained => self.p.paint(Tone::Good, "✅ FULLY CONTAINED"),
            Containment::Partial => self.p.paint(Tone::Warn, "⚠️  PARTIAL"),
            Containment::NotContained => self.p.paint(Tone::Bad, "❌ NOT CONTAINED"),
            Containment::Vacuous => self.p.paint(Tone::Dim, "∅ NO CONTENT"),
        }
    }

    fn write_session(&self, f: &mut fmt::Formatter<'_>, session: &SessionReport) -> fmt::Result {
        let p = self.p;
        let title = match session.session_number {
            Some(number) => format!(
                "SESSION {}: {}",
                number,
                session.session_id.as_deref().unwrap_or("unknown")
            ),
            None => format!("SESSION {}", session.session_key),
        };

        writeln!(f, "\n{}", rule('═'))?;
        writeln!(f, "{}", p.paint(Tone::Heading, title))?;
        writeln!(f, "{}", rule('═'))?;
        writeln!(f, "Total spans: {}", session.span_count)?;
        if let Some(duration) = session.duration_seconds {
            writeln!(f, "Duration: {}", seconds(duration))?;
        }
        if let Some(traces) = session.unique_traces {
            writeln!(f, "Unique traces: {}", traces)?;
        }

        if session.span_count < 2 {
            writeln!(f, "\nNo pairs to compare")?;
            return Ok(());
        }

        writeln!(f, "\n{}", rule('─'))?;
        writeln!(f, "{}", p.paint(Tone::Heading, "CONTAINMENT ANALYSIS"))?;
        writeln!(f, "{}", rule('─'))?;
        if session.pairs.is_empty() {
            writeln!(f, "No pairs to compare")?;
        }
        for pair in &session.pairs {
            self.write_pair(f, pair)?;
        }

        for (position, span) in session.spans.iter().enumerate() {
            self.write_span(f, session, position, span)?;
        }

        self.write_summary(f, session)
    }

    fn write_pair(&self, f: &mut fmt::Formatter<'_>, pair: &PairResult) -> fmt::Result {
        let display: &DisplayConfig = &self.data.display;
        let result = &pair.containment;
        let earlier = span_label(pair.earlier.sequence_index);
        let later = span_label(pair.later.sequence_index);

        writeln!(
            f,
            "\n{} → {}: {}",
            earlier,
            later,
            self.status(result.classification)
        )?;
        writeln!(f, "  Content chunks in {}: {}", earlier, result.total_count)?;
        writeln!(
            f,
            "  Found in {}: {} ({})",
            later,
            result.contained_count,
            percent(result.overlap_percentage)
        )?;

        if !result.contained.is_empty() {
            writeln!(f, "  Contained chunks:")?;
            for found in result.contained.iter().take(display.max_contained_shown) {
                writeln!(
                    f,
                    "    [{}] at position {} (in {})",
                    found.chunk.label(),
                    found.offset,
                    found.found_in
                )?;
                writeln!(
                    f,
                    "      Chunk: {}",
                    one_line(&found.chunk.text, display.chunk_preview_chars)
                )?;
                writeln!(
                    f,
                    "      Context: ...{}...",
                    self.p.paint(Tone::Dim, one_line(&found.context, usize::MAX))
                )?;
            }
            let hidden = result.contained.len().saturating_sub(display.max_contained_shown);
            if hidden > 0 {
                writeln!(f, "    ... and {} more", hidden)?;
            }
        }

        if !result.missing.is_empty() {
            writeln!(f, "  Missing chunks:")?;
            for chunk in result.missing.iter().take(display.max_missing_shown) {
                writeln!(
                    f,
                    "    [{}] {}",
                    chunk.label(),
                    one_line(&chunk.text, display.missing_preview_chars)
                )?;
            }
            let hidden = result.missing.len().saturating_sub(display.max_missing_shown);
            if hidden > 0 {
                writeln!(f, "    ... and {} more", hidden)?;
            }
        }

        Ok(())
    }

    fn write_span(
        &self,
        f: &mut fmt::Formatter<'_>,
        session: &SessionReport,
        position: usize,
        span: &SpanOverview,
    ) -> fmt::Result {
        let p = self.p;
        writeln!(f, "\n{}", rule('─'))?;
        writeln!(
            f,
            "{}",
            p.paint(
                Tone::Heading,
                format!(
                    "SPAN {}: {} ({})",
                    span.sequence_index + 1,
                    span.name.as_deref().unwrap_or("unknown"),
                    short_id(&span.span_id, 16)
                )
            )
        )?;
        writeln!(f, "{}", rule('─'))?;
        if let Some(duration) = span.duration_seconds {
            writeln!(f, "Duration: {}", seconds(duration))?;
        }
        writeln!(f, "Input messages: {}", span.input_message_count)?;
        if span.input_value_chars > 0 {
            writeln!(f, "Input value: {} chars", thousands(span.input_value_chars))?;
        }
        if span.output_chars > 0 {
            writeln!(f, "Output: {} chars", thousands(span.output_chars))?;
        }
        writeln!(f, "Content chunks: {}", span.chunk_count)?;

        if position == 0 {
            writeln!(f, "\n  {}", p.paint(Tone::Accent, "📌 BASELINE SPAN (first in session)"))?;
            return Ok(());
        }

        let Some(comparison) = session.comparison_with_previous(span.sequence_index) else {
            return Ok(());
        };
        let previous = position - 1;
        let previous_label = session
            .spans
            .get(previous)
            .map_or_else(|| previous.to_string(), |s| (s.sequence_index + 1).to_string());

        writeln!(f, "\n  📊 Comparison with Span {}:", previous_label)?;
        writeln!(f, "    Messages in previous: {}", comparison.previous_count)?;
        writeln!(f, "    Messages in current:  {}", comparison.current_count)?;
        writeln!(
            f,
            "    Duplicated:           {} ({})",
            comparison.duplicated_count,
            percent(comparison.overlap_percentage)
        )?;
        writeln!(f, "    New:                  {}", comparison.new_count)?;

        if comparison.has_duplication() {
            writeln!(
                f,
                "    {}",
                p.paint(
                    Tone::Warn,
                    format!(
                        "⚠️  DUPLICATION DETECTED: {} messages from previous span",
                        comparison.duplicated_count
                    )
                )
            )?;
        }

        let shown = self.data.display.max_new_messages_shown;
        if !comparison.new_messages.is_empty() && shown > 0 {
            writeln!(f, "\n  🆕 New messages:")?;
            for (i, message) in comparison.new_messages.iter().take(shown).enumerate() {
                writeln!(
                    f,
                    "      [{}] {}: {}",
                    i + 1,
                    message.role.as_deref().unwrap_or("unknown"),
                    one_line(&message.text, 150)
                )?;
            }
        }

        Ok(())
    }

    fn write_summary(&self, f: &mut fmt::Formatter<'_>, session: &SessionReport) -> fmt::Result {
        let summary = &session.summary;
        writeln!(f, "\n{}", rule('═'))?;
        writeln!(f, "{}", self.p.paint(Tone::Heading, "SESSION SUMMARY"))?;
        writeln!(f, "{}", rule('═'))?;
        writeln!(
            f,
            "Total input messages across all spans: {}",
            summary.total_input_messages
        )?;
        writeln!(
            f,
            "Total input characters: {}",
            thousands(summary.total_input_chars)
        )?;
        writeln!(
            f,
            "Average messages per span: {:.1}",
            summary.average_messages_per_span
        )?;
        if let Some(growth) = &summary.message_growth {
            writeln!(
                f,
                "Message growth factor: {:.1}x (from {} to {})",
                growth.factor, growth.first, growth.last
            )?;
        }
        Ok(())
    }
}

impl<'a> fmt::Display for CompareView<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = &self.data.report;
        writeln!(f, "Loaded {} session(s) from {}", report.sessions.len(), self.data.source)?;

        if report.sessions.is_empty() {
            writeln!(f, "\nNo sessions found")?;
        }
        for session in &report.sessions {
            self.write_session(f, session)?;
        }

        writeln!(f)?;
        writeln!(f, "{}", skipped_line(self.p, report.skipped_records))?;
        Ok(())
    }
}
