use anyhow::Result;
use serde::Serialize;

use super::formatters::{Palette, Tone};
use super::view_models::{CommandResultViewModel, CreateView};
use crate::types::OutputFormat;

pub struct ConsoleRenderer {
    format: OutputFormat,
    palette: Palette,
}

impl ConsoleRenderer {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            palette: Palette::detect(),
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn render<T>(&self, result: CommandResultViewModel<T>) -> Result<()>
    where
        T: Serialize + CreateView,
    {
        print!("{}", self.render_to_string(&result)?);
        Ok(())
    }

    pub fn render_to_string<T>(&self, result: &CommandResultViewModel<T>) -> Result<String>
    where
        T: Serialize + CreateView,
    {
        if self.format == OutputFormat::Json {
            return Ok(format!("{}\n", serde_json::to_string_pretty(result)?));
        }

        let p = self.palette;
        let mut out = String::new();

        if let Some(badge) = &result.badge {
            out.push_str(&format!(
                "{} {}\n\n",
                badge.icon(),
                p.paint(Tone::Heading, &badge.label)
            ));
        }

        out.push_str(&result.content.create_view(p).to_string());

        if !result.suggestions.is_empty() {
            out.push_str(&format!("\n{}\n", p.paint(Tone::Warn, "💡 Tips:")));
            for tip in &result.suggestions {
                out.push_str(&format!("  • {}", tip.description));
                if let Some(cmd) = &tip.command {
                    out.push_str(&format!(": {}", p.paint(Tone::Accent, cmd)));
                }
                out.push('\n');
            }
        }

        Ok(out)
    }
}
