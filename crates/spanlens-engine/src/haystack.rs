use crate::chunk::ContentChunk;

/// Separator placed between chunk texts in the concatenated haystack.
pub const SEPARATOR: &str = "\n";

#[derive(Debug, Clone)]
struct Segment {
    label: String,
    char_start: usize,
    char_len: usize,
}

/// A later span's chunks concatenated into one searchable string.
///
/// Offsets exposed by this type are character offsets; byte offsets stay internal.
#[derive(Debug, Clone)]
pub struct Haystack {
    text: String,
    segments: Vec<Segment>,
}

/// First occurrence of a needle inside a haystack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HaystackMatch {
    pub char_offset: usize,
    pub byte_offset: usize,
}

impl Haystack {
    pub fn build(chunks: &[ContentChunk]) -> Self {
        let mut text = String::new();
        let mut segments = Vec::with_capacity(chunks.len());
        let mut char_pos = 0;

        for (i, chunk) in chunks.iter().enumerate() {
            if i > 0 {
                text.push_str(SEPARATOR);
                char_pos += SEPARATOR.chars().count();
            }
            let char_len = chunk.char_len();
            segments.push(Segment {
                label: chunk.label(),
                char_start: char_pos,
                char_len,
            });
            text.push_str(&chunk.text);
            char_pos += char_len;
        }

        Self { text, segments }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Character offset at which each chunk starts, in chunk order.
    pub fn chunk_starts(&self) -> Vec<usize> {
        self.segments.iter().map(|s| s.char_start).collect()
    }

    /// Exact substring search; the first occurrence wins.
    pub fn find(&self, needle: &str) -> Option<HaystackMatch> {
        if needle.is_empty() {
            return None;
        }
        let byte_offset = self.text.find(needle)?;
        Some(HaystackMatch {
            char_offset: self.text[..byte_offset].chars().count(),
            byte_offset,
        })
    }

    /// Label of the chunk whose range contains `char_offset`.
    ///
    /// An offset on a separator resolves to the chunk before it.
    pub fn label_at(&self, char_offset: usize) -> Option<&str> {
        self.segments
            .iter()
            .rev()
            .find(|s| s.char_start <= char_offset)
            .filter(|s| char_offset <= s.char_start + s.char_len)
            .map(|s| s.label.as_str())
    }

    /// `len` characters starting at `char_offset`.
    pub fn slice_chars(&self, char_offset: usize, len: usize) -> String {
        self.text.chars().skip(char_offset).take(len).collect()
    }

    /// Text around a match: up to `radius` characters on each side.
    pub fn excerpt(&self, char_offset: usize, char_len: usize, radius: usize) -> String {
        let start = char_offset.saturating_sub(radius);
        let len = (char_offset - start)
            .saturating_add(char_len)
            .saturating_add(radius);
        self.slice_chars(start, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ChunkKind;

    fn chunk(kind: ChunkKind, position: Option<usize>, text: &str) -> ContentChunk {
        ContentChunk {
            kind,
            position,
            text: text.to_string(),
        }
    }

    fn sample() -> Haystack {
        Haystack::build(&[
            chunk(ChunkKind::InputMsg, Some(0), "héllo"),
            chunk(ChunkKind::InputValue, None, "wörld"),
            chunk(ChunkKind::OutputValue, None, "done"),
        ])
    }

    #[test]
    fn test_concatenation_and_starts() {
        let haystack = sample();
        assert_eq!(haystack.text(), "héllo\nwörld\ndone");
        assert_eq!(haystack.chunk_starts(), vec![0, 6, 12]);
    }

    #[test]
    fn test_find_reports_char_offsets() {
        let haystack = sample();
        let found = haystack.find("wörld").unwrap();
        assert_eq!(found.char_offset, 6);
        // 'é' is two bytes
        assert_eq!(found.byte_offset, 7);
        assert_eq!(haystack.slice_chars(found.char_offset, 5), "wörld");
        assert_eq!(haystack.label_at(found.char_offset), Some("input_value"));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let haystack = Haystack::build(&[
            chunk(ChunkKind::InputMsg, Some(0), "abc"),
            chunk(ChunkKind::InputMsg, Some(1), "abc"),
        ]);
        assert_eq!(haystack.find("abc").unwrap().char_offset, 0);
    }

    #[test]
    fn test_empty_needle_and_haystack() {
        let empty = Haystack::build(&[]);
        assert!(empty.is_empty());
        assert_eq!(empty.find("x"), None);
        assert_eq!(sample().find(""), None);
    }

    #[test]
    fn test_excerpt_is_clamped() {
        let haystack = sample();
        assert_eq!(haystack.excerpt(6, 5, 2), "o\nwörld\nd");
        assert_eq!(haystack.excerpt(0, 5, 50), "héllo\nwörld\ndone");
    }

    #[test]
    fn test_excerpt_with_unbounded_radius() {
        let haystack = sample();
        assert_eq!(haystack.excerpt(6, 5, usize::MAX), "héllo\nwörld\ndone");
        assert_eq!(haystack.excerpt(0, usize::MAX, usize::MAX), "héllo\nwörld\ndone");
    }
}
