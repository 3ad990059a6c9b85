use crate::mapper::{map_session, map_trace_row};
use crate::schema::RawSessionRecord;
use crate::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use spanlens_types::{SessionSource, TraceSource};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Parse every non-blank line of a JSONL file as `T`.
///
/// Lines that fail to parse are skipped with a warning and counted. A file with
/// content where no line parses is an error; an empty file is not.
fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<(Vec<T>, usize)> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    let mut skipped = 0;

    for (index, chunk) in reader.split(b'\n').enumerate() {
        let bytes = chunk.map_err(|e| Error::io(path, e))?;
        let line = match std::str::from_utf8(&bytes) {
            Ok(line) => line.trim(),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    line = index + 1,
                    error = %err,
                    "skipping record that is not valid UTF-8"
                );
                skipped += 1;
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(line) {
            Ok(record) => records.push(record),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    line = index + 1,
                    error = %err,
                    "skipping malformed record"
                );
                skipped += 1;
            }
        }
    }

    if records.is_empty() && skipped > 0 {
        return Err(Error::NoValidRecords {
            path: path.to_path_buf(),
            skipped,
        });
    }

    Ok((records, skipped))
}

/// Load a reconstructed session file (one session object per line).
pub fn load_sessions(path: &Path) -> Result<SessionSource> {
    let (records, skipped_records) = read_jsonl::<RawSessionRecord>(path)?;

    let sessions = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| map_session(record, index + 1))
        .collect::<Vec<_>>();

    tracing::debug!(
        path = %path.display(),
        sessions = sessions.len(),
        skipped = skipped_records,
        "loaded session file"
    );

    Ok(SessionSource {
        sessions,
        skipped_records,
    })
}

/// Load a flat trace export (one span object per line).
pub fn load_trace_records(path: &Path) -> Result<TraceSource> {
    let (rows, skipped_records) =
        read_jsonl::<serde_json::Map<String, serde_json::Value>>(path)?;

    let records = rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| map_trace_row(row, index))
        .collect();

    Ok(TraceSource {
        records,
        skipped_records,
    })
}

/// Sibling export holding tool spans: `phoenix_traces.jsonl` -> `phoenix_traces_tools.jsonl`.
pub fn tools_sibling(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    if !name.ends_with("traces.jsonl") {
        return None;
    }
    let sibling = path.with_file_name(name.replace("traces.jsonl", "traces_tools.jsonl"));
    sibling.is_file().then_some(sibling)
}

/// Load a trace export together with its tool-span sibling, if one exists.
///
/// Returns the loaded rows and the sibling path that was merged in.
pub fn load_trace_file(path: &Path) -> Result<(TraceSource, Option<PathBuf>)> {
    let mut source = load_trace_records(path)?;

    let sibling = tools_sibling(path);
    if let Some(tools_path) = &sibling {
        let tools = load_trace_records(tools_path)?;
        tracing::debug!(
            path = %tools_path.display(),
            spans = tools.records.len(),
            "merged tool spans"
        );
        source.extend(tools);
    }

    Ok((source, sibling))
}

/// Write one JSON document per line. Returns the number of bytes written.
pub fn write_jsonl<T: Serialize>(path: &Path, items: &[T]) -> Result<u64> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    for item in items {
        serde_json::to_writer(&mut writer, item)?;
        writer.write_all(b"\n").map_err(|e| Error::io(path, e))?;
    }
    writer.flush().map_err(|e| Error::io(path, e))?;

    let written = std::fs::metadata(path)
        .map_err(|e| Error::io(path, e))?
        .len();
    Ok(written)
}
