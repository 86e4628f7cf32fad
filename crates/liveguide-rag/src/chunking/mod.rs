//! Boundary-aware text chunking.
//!
//! Documents are walked in windows of `max_chunk_size` characters. Each window
//! is pulled back to the nearest sentence or paragraph break when one exists in
//! its second half, and consecutive windows share `overlap_size` characters of
//! context. All offsets are in characters (Unicode scalar values), never bytes,
//! so multi-byte text is never cut inside a code point.

use crate::config::ChunkingConfig;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Boundary markers in priority order. The first marker with an acceptable
/// occurrence wins, even if a lower-priority marker sits closer to the window end.
const BOUNDARY_MARKERS: [&str; 4] = [". ", "! ", "? ", "\n\n"];

/// A contiguous, trimmed segment of a source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    /// Chunk text, never empty
    pub text: String,
    /// Character offset of the first character of `text` in the document
    pub start_offset: usize,
    /// Character offset one past the last character of `text`
    pub end_offset: usize,
}

impl TextChunk {
    /// Length of the chunk in characters.
    pub fn char_len(&self) -> usize {
        self.end_offset - self.start_offset
    }
}

/// Split `document` into overlapping chunks.
///
/// Fails with a validation error when `max_chunk_size` is zero or
/// `overlap_size >= max_chunk_size`. An empty document yields no chunks.
pub fn chunk_text(
    document: &str,
    max_chunk_size: usize,
    overlap_size: usize,
) -> Result<Vec<TextChunk>> {
    let config = ChunkingConfig::new(max_chunk_size, overlap_size);
    config.validate()?;
    Ok(split(document, &config))
}

/// A chunker bound to a validated configuration.
#[derive(Debug, Clone, Copy)]
pub struct TextChunker {
    config: ChunkingConfig,
}

impl TextChunker {
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    pub fn chunk(&self, document: &str) -> Vec<TextChunk> {
        split(document, &self.config)
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self {
            config: ChunkingConfig::default(),
        }
    }
}

// Caller guarantees `config` is valid.
fn split(document: &str, config: &ChunkingConfig) -> Vec<TextChunk> {
    let chars: Vec<char> = document.chars().collect();
    let len = chars.len();
    let mut chunks = Vec::new();
    if len == 0 {
        return chunks;
    }

    let max = config.max_chunk_size;
    let mut start: usize = 0;
    loop {
        let tentative_end = start.saturating_add(max);
        let end = if tentative_end < len {
            find_boundary(&chars, start, tentative_end, max).unwrap_or(tentative_end)
        } else {
            len
        };

        if let Some(chunk) = trimmed_chunk(&chars, start, end) {
            chunks.push(chunk);
        }

        if end >= len {
            break;
        }

        let rewound = end.saturating_sub(config.overlap_size);
        start = if rewound > start { rewound } else { end };
    }

    log::debug!(
        "Split document of {} chars into {} chunks (max {}, overlap {})",
        len,
        chunks.len(),
        max,
        config.overlap_size
    );
    chunks
}

/// Returns the end offset just past the chosen boundary marker, if any marker
/// lies fully inside `[start, end)` and starts no earlier than `start + max / 2`.
fn find_boundary(chars: &[char], start: usize, end: usize, max: usize) -> Option<usize> {
    // Compare doubled positions to apply the half-window floor without floats.
    let acceptable = |pos: usize| 2 * pos >= 2 * start + max;

    for marker in BOUNDARY_MARKERS {
        let marker_len = marker.chars().count();
        let Some(mut pos) = end.checked_sub(marker_len) else {
            continue;
        };

        while pos >= start && acceptable(pos) {
            if chars[pos..pos + marker_len].iter().copied().eq(marker.chars()) {
                return Some(pos + marker_len);
            }
            if pos == 0 {
                break;
            }
            pos -= 1;
        }
    }
    None
}

fn trimmed_chunk(chars: &[char], start: usize, end: usize) -> Option<TextChunk> {
    let window = &chars[start..end];
    let first = window.iter().position(|c| !c.is_whitespace())?;
    let last = window.iter().rposition(|c| !c.is_whitespace())?;

    Some(TextChunk {
        text: window[first..=last].iter().collect(),
        start_offset: start + first,
        end_offset: start + last + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn char_slice(document: &str, chunk: &TextChunk) -> String {
        document
            .chars()
            .skip(chunk.start_offset)
            .take(chunk.char_len())
            .collect()
    }

    #[test]
    fn test_empty_document() {
        assert!(chunk_text("", 100, 10).unwrap().is_empty());
    }

    #[test]
    fn test_whitespace_only_document() {
        assert!(chunk_text("   \n\n\t  ", 4, 1).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_overlap_not_smaller_than_max() {
        let err = chunk_text("hello", 10, 10).unwrap_err();
        assert!(err.is_validation());
        assert!(chunk_text("hello", 10, 25).is_err());
        assert!(chunk_text("hello", 0, 0).is_err());
    }

    #[test]
    fn test_short_document_single_chunk() {
        let chunks = chunk_text("  Hello there. How are you?  ", 100, 10).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Hello there. How are you?");
        assert_eq!(chunks[0].start_offset, 2);
        assert_eq!(chunks[0].end_offset, 27);
    }

    #[test]
    fn test_document_exactly_max_size() {
        let document = "x".repeat(100);
        let chunks = chunk_text(&document, 100, 10).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].start_offset, 0);
        assert_eq!(chunks[0].end_offset, 100);
        assert_eq!(chunks[0].text, document);
    }

    #[test]
    fn test_splits_at_sentence_boundaries() {
        let document = "A. B. C. ".repeat(4);
        let document = document.trim_end();
        let chunks = chunk_text(document, 10, 0).unwrap();

        assert_eq!(chunks.len(), 4);
        for chunk in &chunks {
            assert_eq!(chunk.text, "A. B. C.");
        }
        assert_eq!(chunks[1].start_offset, 9);
    }

    #[test]
    fn test_boundaries_with_overlap_stay_sentence_aligned() {
        let document = "A. B. C. ".repeat(6);
        let document = document.trim_end();
        let chunks = chunk_text(document, 10, 3).unwrap();

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.text.ends_with('.'), "chunk {:?} split mid-sentence", chunk.text);
        }
    }

    #[test]
    fn test_no_boundaries_splits_mid_word() {
        let document = "abcdefghijklmnopqrstuvwxy";
        let chunks = chunk_text(document, 10, 0).unwrap();
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["abcdefghij", "klmnopqrst", "uvwxy"]);
    }

    #[test]
    fn test_boundary_too_early_is_ignored() {
        // Only boundary sits before the half-window floor
        let document = "Hi. abcdefghijklmnopqrstuvwxyz";
        let chunks = chunk_text(document, 20, 0).unwrap();
        assert_eq!(chunks[0].end_offset, 20);
        assert_eq!(chunks[0].text, "Hi. abcdefghijklmnop");
    }

    #[test]
    fn test_boundary_priority_order() {
        // "? " is closer to the window end but ". " has priority
        let document = "aaaaaaaa. b? cccccccccccccccccccc";
        let chunks = chunk_text(document, 14, 0).unwrap();
        assert_eq!(chunks[0].text, "aaaaaaaa.");
        assert_eq!(chunks[0].end_offset, 9);
    }

    #[test]
    fn test_paragraph_boundary() {
        let document = "first paragraph\n\nsecond paragraph here";
        let chunks = chunk_text(document, 20, 0).unwrap();
        assert_eq!(chunks[0].text, "first paragraph");
        assert_eq!(chunks[1].text, "second paragraph her");
    }

    #[test]
    fn test_overlap_shares_context() {
        let document = "abcdefghijklmnopqrst";
        let chunks = chunk_text(document, 10, 4).unwrap();
        assert_eq!(chunks[0].text, "abcdefghij");
        assert_eq!(chunks[1].start_offset, 6);
        assert_eq!(chunks[1].text, "ghijklmnop");
        assert_eq!(chunks.last().unwrap().end_offset, 20);
    }

    #[test]
    fn test_overlap_larger_than_tail_terminates() {
        let document = "x".repeat(25);
        let chunks = chunk_text(&document, 10, 9).unwrap();
        assert_eq!(chunks.last().unwrap().end_offset, 25);
        // Starts advance by exactly max - overlap = 1
        assert_eq!(chunks.len(), 16);
    }

    #[test]
    fn test_rewind_guard_forces_progress() {
        // Boundary end (7) is smaller than the overlap (9), so the rewind would go backwards
        let document = "aaaaa. bbbbbbbbbbbbbbbbbbbbbbbbb";
        let chunks = chunk_text(document, 10, 9).unwrap();
        assert_eq!(chunks[0].text, "aaaaa.");
        assert_eq!(chunks[1].start_offset, 7);
        assert_eq!(chunks.last().unwrap().end_offset, document.chars().count());
    }

    #[test]
    fn test_multibyte_offsets_are_characters() {
        let document = "héllo wörld. ünïcode tëxt here";
        let chunks = chunk_text(document, 16, 2).unwrap();
        for chunk in &chunks {
            assert_eq!(char_slice(document, chunk), chunk.text);
        }
        assert_eq!(chunks[0].text, "héllo wörld.");
    }

    #[test]
    fn test_coverage_and_size_bound() {
        let document = "The session opened with a check-in. How did the week go? \
            Pretty well! We practised the breathing routine daily.\n\nNext we looked \
            at sleep. The client reported waking at 3am most nights. We agreed on a \
            wind-down plan without screens after nine";
        let max = 40;
        let chunks = chunk_text(document, max, 8).unwrap();
        let chars: Vec<char> = document.chars().collect();

        for chunk in &chunks {
            assert!(!chunk.text.is_empty());
            assert!(chunk.char_len() <= max);
            assert_eq!(char_slice(document, chunk), chunk.text);
        }
        for (i, c) in chars.iter().enumerate() {
            if c.is_whitespace() {
                continue;
            }
            assert!(
                chunks.iter().any(|ch| ch.start_offset <= i && i < ch.end_offset),
                "character {} ({:?}) not covered",
                i,
                c
            );
        }
        for pair in chunks.windows(2) {
            assert!(pair[1].start_offset > pair[0].start_offset);
        }
    }

    #[test]
    fn test_chunk_count_bound_without_boundaries() {
        let document = "y".repeat(1000);
        let chunks = chunk_text(&document, 100, 20).unwrap();
        // ceil((1000 - 100) / 80) + 1
        assert_eq!(chunks.len(), 13);
    }

    #[test]
    fn test_text_chunker_uses_config() {
        let chunker = TextChunker::new(ChunkingConfig::new(10, 0)).unwrap();
        assert_eq!(chunker.config().max_chunk_size, 10);
        assert_eq!(chunker.chunk("abcdefghijklmno").len(), 2);
        assert!(TextChunker::new(ChunkingConfig::new(10, 10)).is_err());
    }

    #[test]
    fn test_window_larger_than_usize_headroom() {
        let chunks = chunk_text("Short note. Another.", usize::MAX, 0).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Short note. Another.");
        assert_eq!(chunks[0].end_offset, 20);
    }
}
