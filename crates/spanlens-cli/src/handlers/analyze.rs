use anyhow::Result;
use spanlens_engine::build_overview;
use spanlens_providers::{Backend, load_trace_file, resolve_trace_file};
use std::path::Path;

use crate::presentation::view_models::AnalyzeViewModel;
use crate::presentation::{CommandResultViewModel, ConsoleRenderer, Guidance};
use crate::types::OutputFormat;

pub fn handle(
    path: Option<&Path>,
    data_dir: &Path,
    preferred: Option<Backend>,
    format: OutputFormat,
) -> Result<()> {
    let resolved = resolve_trace_file(path, data_dir, preferred)?;
    let (source, tools_file) = load_trace_file(&resolved.path)?;

    let overview = build_overview(&source);
    let has_sessions = overview.unique_sessions > 0;

    let source_display = resolved.path.display().to_string();
    let vm = AnalyzeViewModel {
        source: source_display.clone(),
        backend: resolved.backend,
        auto_detected: resolved.auto_detected,
        tools_file: tools_file.map(|p| p.display().to_string()),
        overview,
    };

    let mut result = CommandResultViewModel::new(vm);
    if has_sessions {
        result = result.with_suggestion(
            Guidance::new("Group these spans into sessions")
                .with_command(format!("spanlens reconstruct {}", source_display)),
        );
    }

    ConsoleRenderer::new(format).render(result)
}
