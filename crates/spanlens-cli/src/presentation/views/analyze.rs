use std::fmt;

use spanlens_engine::{Count, SessionFocus};

use super::{short_id, skipped_line};
use crate::presentation::formatters::{Palette, Tone, seconds};
use crate::presentation::view_models::{AnalyzeViewModel, CreateView};

impl CreateView for AnalyzeViewModel {
    fn create_view<'a>(&'a self, palette: Palette) -> Box<dyn fmt::Display + 'a> {
        Box::new(AnalyzeView { data: self, p: palette })
    }
}

struct AnalyzeView<'a> {
    data: &'a AnalyzeViewModel,
    p: Palette,
}

fn write_counts(f: &mut fmt::Formatter<'_>, counts: &[Count]) -> fmt::Result {
    if counts.is_empty() {
        writeln!(f, "  (none)")?;
    }
    for count in counts {
        writeln!(f, "  {}: {}", count.key, count.count)?;
    }
    Ok(())
}

impl<'a> AnalyzeView<'a> {
    fn section(&self, f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
        writeln!(f, "\n{}", self.p.paint(Tone::Heading, title))
    }

    fn write_focus(&self, f: &mut fmt::Formatter<'_>, focus: &SessionFocus) -> fmt::Result {
        self.section(f, &format!("🎯 Session {} ({} records)", focus.session_id, focus.record_count))?;
        for entry in &focus.timeline {
            let time = entry
                .start_time
                .map(|t| t.format("%H:%M:%S%.3f").to_string())
                .unwrap_or_else(|| "--:--:--.---".to_string());
            writeln!(
                f,
                "  [{}] {} ({}) - trace:{}, span:{} [{}]",
                time,
                entry.name,
                entry.kind,
                short_id(&entry.trace_id, 8),
                short_id(&entry.span_id, 8),
                seconds(entry.duration_seconds)
            )?;
        }
        if focus.record_count > focus.timeline.len() {
            writeln!(
                f,
                "  ... and {} more",
                focus.record_count - focus.timeline.len()
            )?;
        }

        self.section(f, "🌳 Span tree")?;
        for node in &focus.tree {
            let prefix = if node.depth == 0 {
                "ROOT: ".to_string()
            } else {
                format!("{}└─ ", "  ".repeat(node.depth))
            };
            writeln!(
                f,
                "{}{} ({}) - {}",
                prefix,
                node.name,
                node.kind,
                short_id(&node.span_id, 8)
            )?;
        }
        Ok(())
    }
}

impl<'a> fmt::Display for AnalyzeView<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data;
        let overview = &data.overview;

        if data.auto_detected {
            writeln!(f, "🔍 Auto-detected: {}", data.source)?;
        } else {
            writeln!(f, "Trace file: {}", data.source)?;
        }
        if let Some(tools) = &data.tools_file {
            writeln!(f, "  📎 Merged tools: {}", tools)?;
        }
        writeln!(f, "Total records: {}", overview.total_records)?;

        self.section(f, "📊 Session Analysis:")?;
        writeln!(f, "  Unique sessions: {}", overview.unique_sessions)?;
        writeln!(f, "  Records with session ID: {}", overview.records_with_session)?;
        writeln!(
            f,
            "  Records without session ID: {}",
            overview.records_without_session
        )?;

        self.section(f, "📈 Records per session:")?;
        write_counts(f, &overview.top_sessions)?;

        self.section(f, "🔍 Span kinds:")?;
        write_counts(f, &overview.span_kinds)?;

        self.section(f, "📝 Top span names:")?;
        write_counts(f, &overview.top_names)?;

        self.section(f, "🏷️  Span categories:")?;
        write_counts(f, &overview.categories)?;

        self.section(f, "👨‍👦 Parent-child relationships:")?;
        writeln!(f, "  Records with parent_id: {}", overview.child_spans)?;
        writeln!(
            f,
            "  Records without parent_id (root spans): {}",
            overview.root_spans
        )?;

        if !overview.small_sessions.is_empty() {
            self.section(f, "🔬 Small sessions:")?;
            write_counts(f, &overview.small_sessions)?;
        }

        if let Some(focus) = &overview.focus {
            self.write_focus(f, focus)?;
        }

        writeln!(f)?;
        writeln!(f, "{}", skipped_line(self.p, overview.skipped_records))?;
        Ok(())
    }
}
