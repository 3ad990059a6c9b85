use std::fmt;
use std::path::PathBuf;

/// Result type for spanlens-providers operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the providers layer
#[derive(Debug)]
pub enum Error {
    /// IO operation failed on the given path
    Io { path: PathBuf, source: std::io::Error },

    /// JSON serialization failed
    Json(serde_json::Error),

    /// The source had content but not a single record could be parsed
    NoValidRecords { path: PathBuf, skipped: usize },

    /// No trace file could be located for any backend
    TraceFileNotFound(Vec<PathBuf>),

    /// Unknown backend name
    UnknownBackend(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            Error::Json(err) => write!(f, "JSON error: {}", err),
            Error::NoValidRecords { path, skipped } => write!(
                f,
                "{}: no valid records ({} malformed line(s) skipped)",
                path.display(),
                skipped
            ),
            Error::TraceFileNotFound(candidates) => {
                write!(f, "No trace data found (looked for ")?;
                for (i, candidate) in candidates.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", candidate.display())?;
                }
                write!(f, ")")
            }
            Error::UnknownBackend(name) => {
                write!(f, "Unknown backend '{}' (expected phoenix or arize)", name)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            Error::Json(err) => Some(err),
            Error::NoValidRecords { .. }
            | Error::TraceFileNotFound(_)
            | Error::UnknownBackend(_) => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}
