use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Observability backend a trace export came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Phoenix,
    Arize,
}

impl Backend {
    /// Detection order when no backend is preferred (local Phoenix first)
    pub const ALL: [Backend; 2] = [Backend::Phoenix, Backend::Arize];

    pub fn name(&self) -> &'static str {
        match self {
            Backend::Phoenix => "phoenix",
            Backend::Arize => "arize",
        }
    }

    /// Default export location relative to the data directory,
    /// e.g. `phoenix/phoenix_traces.jsonl`.
    pub fn default_trace_path(&self, data_dir: &Path) -> PathBuf {
        data_dir
            .join(self.name())
            .join(format!("{}_traces.jsonl", self.name()))
    }

    /// Infer the backend from an export path (file name prefix or parent directory).
    pub fn from_path(path: &Path) -> Option<Backend> {
        let file_name = path.file_name()?.to_string_lossy().to_lowercase();
        let parent = path
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_lowercase());

        Self::ALL.into_iter().find(|backend| {
            file_name.starts_with(backend.name()) || parent.as_deref() == Some(backend.name())
        })
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "phoenix" => Ok(Backend::Phoenix),
            "arize" => Ok(Backend::Arize),
            other => Err(Error::UnknownBackend(other.to_string())),
        }
    }
}

/// Outcome of trace file resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTraceFile {
    pub path: PathBuf,
    pub backend: Option<Backend>,
    /// True when the path was found by probing rather than given explicitly
    pub auto_detected: bool,
}

/// Resolve which trace export to read.
///
/// Priority:
/// 1. Explicit path (backend inferred from the path, if recognizable)
/// 2. Default export of the preferred backend under `data_dir`
/// 3. Default exports of the remaining backends, Phoenix before Arize
pub fn resolve_trace_file(
    explicit: Option<&Path>,
    data_dir: &Path,
    preferred: Option<Backend>,
) -> Result<ResolvedTraceFile> {
    if let Some(path) = explicit {
        return Ok(ResolvedTraceFile {
            path: path.to_path_buf(),
            backend: Backend::from_path(path),
            auto_detected: false,
        });
    }

    let mut order: Vec<Backend> = preferred.into_iter().collect();
    order.extend(Backend::ALL.into_iter().filter(|b| Some(*b) != preferred));

    let mut candidates = Vec::with_capacity(order.len());
    for backend in order {
        let candidate = backend.default_trace_path(data_dir);
        if candidate.is_file() {
            return Ok(ResolvedTraceFile {
                path: candidate,
                backend: Some(backend),
                auto_detected: true,
            });
        }
        candidates.push(candidate);
    }

    Err(Error::TraceFileNotFound(candidates))
}
