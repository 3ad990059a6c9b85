//! Testing infrastructure for spanlens tests.
//!
//! - `fixtures`: builders for exported spans, session files and trace files
//! - `world`: temp-dir test environment that runs the CLI binary

pub mod fixtures;
pub mod world;

pub use fixtures::{SessionFixture, SpanFixture, span_from_texts, to_jsonl};
pub use world::TestWorld;
