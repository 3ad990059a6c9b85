use serde::Serialize;
use std::fmt;

use crate::chunk::ContentChunk;
use crate::haystack::Haystack;

/// How much of an earlier span's content reappears in a later span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Containment {
    FullyContained,
    Partial,
    NotContained,
    /// The earlier span had no content to look for
    Vacuous,
}

impl Containment {
    pub fn classify(contained_count: usize, total_count: usize) -> Self {
        if total_count == 0 {
            Containment::Vacuous
        } else if contained_count == total_count {
            Containment::FullyContained
        } else if contained_count == 0 {
            Containment::NotContained
        } else {
            Containment::Partial
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Containment::FullyContained => "FULLY_CONTAINED",
            Containment::Partial => "PARTIAL",
            Containment::NotContained => "NOT_CONTAINED",
            Containment::Vacuous => "VACUOUS",
        }
    }
}

impl fmt::Display for Containment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An earlier chunk located inside the later span's haystack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkMatch {
    pub chunk: ContentChunk,
    /// Character offset of the first occurrence in the haystack
    pub offset: usize,
    /// Label of the later chunk the offset falls within
    pub found_in: String,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainmentResult {
    pub classification: Containment,
    pub contained_count: usize,
    pub total_count: usize,
    pub overlap_percentage: f64,
    pub contained: Vec<ChunkMatch>,
    pub missing: Vec<ContentChunk>,
}

impl ContainmentResult {
    pub fn missing_count(&self) -> usize {
        self.missing.len()
    }
}

/// Check which of `earlier` chunks occur verbatim in `later`.
///
/// `context_chars` bounds the excerpt kept on each side of a match.
pub fn check_containment(
    earlier: &[ContentChunk],
    later: &Haystack,
    context_chars: usize,
) -> ContainmentResult {
    let mut contained = Vec::new();
    let mut missing = Vec::new();

    for chunk in earlier {
        match later.find(&chunk.text) {
            Some(found) => {
                let found_in = later
                    .label_at(found.char_offset)
                    .unwrap_or_default()
                    .to_string();
                let context = later.excerpt(found.char_offset, chunk.char_len(), context_chars);
                contained.push(ChunkMatch {
                    chunk: chunk.clone(),
                    offset: found.char_offset,
                    found_in,
                    context,
                });
            }
            None => missing.push(chunk.clone()),
        }
    }

    let total_count = earlier.len();
    let contained_count = contained.len();
    let overlap_percentage = if total_count == 0 {
        100.0
    } else {
        contained_count as f64 / total_count as f64 * 100.0
    };

    ContainmentResult {
        classification: Containment::classify(contained_count, total_count),
        contained_count,
        total_count,
        overlap_percentage,
        contained,
        missing,
    }
}
