pub mod session;
pub mod span;
pub mod text;
pub mod trace;

pub use session::{Session, SessionSource};
pub use span::{Message, Span, SpanAttributes};
pub use text::extract_text;
pub use trace::{TraceRecord, TraceSource};
