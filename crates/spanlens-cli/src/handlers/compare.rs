use anyhow::{Result, bail};
use spanlens_engine::{AnalyzerOptions, analyze_file_with};
use spanlens_providers::load_sessions;
use spanlens_types::SessionSource;
use std::path::Path;

use crate::config::Config;
use crate::presentation::view_models::CompareViewModel;
use crate::presentation::{CommandResultViewModel, ConsoleRenderer};
use crate::types::OutputFormat;

pub fn handle(
    path: &Path,
    selector: Option<&str>,
    context_chars: Option<usize>,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let mut source = load_sessions(path)?;
    tracing::info!(
        sessions = source.sessions.len(),
        skipped = source.skipped_records,
        "loaded session file"
    );

    if let Some(selector) = selector {
        let Some(session) = source.find(selector).cloned() else {
            bail!("Session {} not found in {}", selector, path.display());
        };
        source = SessionSource {
            sessions: vec![session],
            skipped_records: source.skipped_records,
        };
    }

    let options = AnalyzerOptions {
        context_chars: context_chars.unwrap_or(config.display.context_chars),
    };
    let report = analyze_file_with(&source, &options);

    let vm = CompareViewModel {
        source: path.display().to_string(),
        selected: selector.map(str::to_string),
        report,
        display: config.display,
    };

    ConsoleRenderer::new(format).render(CommandResultViewModel::new(vm))
}
