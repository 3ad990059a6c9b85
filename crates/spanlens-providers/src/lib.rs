// Providers layer - reads backend exports (Phoenix, Arize) and maps them
// onto the typed span/session model. No analysis happens here.

pub mod backend;
pub mod error;
pub mod io;
pub mod mapper;
pub(crate) mod schema;
pub mod session_id;

pub use backend::{Backend, ResolvedTraceFile, resolve_trace_file};
pub use error::{Error, Result};
pub use io::{load_sessions, load_trace_file, load_trace_records, write_jsonl};
pub use session_id::extract_session_id;
