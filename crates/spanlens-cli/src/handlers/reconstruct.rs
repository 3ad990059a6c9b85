use anyhow::Result;
use spanlens_engine::reconstruct_sessions;
use spanlens_providers::{Backend, load_trace_file, resolve_trace_file, write_jsonl};
use std::path::{Path, PathBuf};

use crate::presentation::view_models::ReconstructViewModel;
use crate::presentation::{CommandResultViewModel, ConsoleRenderer, Guidance, StatusBadge};
use crate::types::OutputFormat;

pub fn handle(
    path: Option<&Path>,
    output: Option<PathBuf>,
    data_dir: &Path,
    preferred: Option<Backend>,
    format: OutputFormat,
) -> Result<()> {
    let resolved = resolve_trace_file(path, data_dir, preferred)?;
    let (source, tools_file) = load_trace_file(&resolved.path)?;

    let rebuilt = reconstruct_sessions(&source.records);
    let mut vm = ReconstructViewModel::new(
        resolved.path.display().to_string(),
        tools_file.map(|p| p.display().to_string()),
        source.skipped_records,
        &rebuilt,
    );

    if rebuilt.is_empty() {
        let result = CommandResultViewModel::new(vm)
            .with_badge(StatusBadge::warning("No spans carry a session ID"));
        return ConsoleRenderer::new(format).render(result);
    }

    let output = output.unwrap_or_else(|| default_output_path(&resolved.path));
    let bytes = write_jsonl(&output, &rebuilt.sessions)?;
    tracing::info!(
        path = %output.display(),
        sessions = rebuilt.sessions.len(),
        bytes,
        "wrote session file"
    );

    let output_display = output.display().to_string();
    vm.output = Some(output_display.clone());
    vm.bytes_written = Some(bytes);

    let result = CommandResultViewModel::new(vm)
        .with_badge(StatusBadge::success("Sessions reconstructed"))
        .with_suggestion(
            Guidance::new("Check span content duplication")
                .with_command(format!("spanlens compare {}", output_display)),
        );
    ConsoleRenderer::new(format).render(result)
}

/// `phoenix/phoenix_traces.jsonl` -> `phoenix/phoenix_sessions.jsonl`.
///
/// Names without `traces` get a `_sessions` suffix so the input is never overwritten.
pub fn default_output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if name.contains("traces") {
        return input.with_file_name(name.replace("traces", "sessions"));
    }

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "trace".to_string());
    match input.extension() {
        Some(ext) => input.with_file_name(format!("{}_sessions.{}", stem, ext.to_string_lossy())),
        None => input.with_file_name(format!("{}_sessions", stem)),
    }
}
