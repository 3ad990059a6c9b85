//! Analysis over loaded agent traces.
//!
//! The span duplication analyzer decides, for every ordered pair of spans in a
//! session, whether the content of the earlier span reappears verbatim in the
//! later one. Alongside it live the flat-trace tools: session reconstruction
//! and the structural trace overview.

pub mod chunk;
pub mod classify;
pub mod containment;
pub mod haystack;
pub mod messages;
pub mod overview;
pub mod reconstruct;
pub mod report;
pub mod summary;

pub use chunk::{ChunkKind, ContentChunk, extract_chunks};
pub use classify::{SpanCategory, classify_span};
pub use containment::{ChunkMatch, Containment, ContainmentResult, check_containment};
pub use haystack::{Haystack, HaystackMatch};
pub use messages::{MessageComparison, MessagePreview, compare_messages};
pub use overview::{Count, SessionFocus, TimelineEntry, TraceOverview, TreeNode, build_overview};
pub use reconstruct::{ReconstructedSession, Reconstruction, reconstruct_sessions};
pub use report::{
    AnalyzerOptions, FileReport, PairResult, SessionReport, SpanRef, analyze_file,
    analyze_file_with, analyze_session, analyze_session_with,
};
pub use summary::{MessageGrowth, SessionSummary, SpanOverview, summarize};
