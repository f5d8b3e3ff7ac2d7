//! Recursive character chunker
//!
//! Splits cleaned text into segments of at most [`CHUNK_SIZE`] characters with
//! [`CHUNK_OVERLAP`] characters of overlap between consecutive segments,
//! preferring natural boundaries: paragraph breaks, then line breaks, then
//! sentence-ending periods, then spaces, then raw characters.

use std::collections::VecDeque;

use crate::text::clean_text;

/// Maximum characters per chunk
pub const CHUNK_SIZE: usize = 400;
/// Characters of overlap carried between consecutive chunks
pub const CHUNK_OVERLAP: usize = 80;
/// Cleaned inputs shorter than this are kept whole - short documents are not
/// worth fragmenting
pub const MIN_SPLIT_LEN: usize = 100;

const SEPARATORS: [&str; 5] = ["\n\n", "\n", ".", " ", ""];

/// Boundary-preferring text splitter
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for TextChunker {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            chunk_overlap: CHUNK_OVERLAP,
        }
    }
}

impl TextChunker {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Clean and split raw text into ordered, non-empty chunks
    ///
    /// Inputs that clean down to fewer than [`MIN_SPLIT_LEN`] characters come
    /// back as a single chunk; whitespace-only input produces no chunks.
    pub fn chunk(&self, raw_text: &str) -> Vec<String> {
        let cleaned = clean_text(raw_text);
        if cleaned.is_empty() {
            return Vec::new();
        }
        if cleaned.len() < MIN_SPLIT_LEN {
            return vec![cleaned];
        }
        self.split_recursive(&cleaned, &SEPARATORS)
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        // First separator actually present in the text wins; "" always applies
        let mut separator = "";
        let mut remaining: &[&str] = &[];
        for (i, sep) in separators.iter().enumerate() {
            if sep.is_empty() || text.contains(sep) {
                separator = *sep;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let splits: Vec<String> = if separator.is_empty() {
            text.chars().map(String::from).collect()
        } else {
            text.split(separator).map(String::from).collect()
        };

        let mut chunks = Vec::new();
        let mut mergeable: Vec<String> = Vec::new();
        for piece in splits {
            if piece.len() < self.chunk_size {
                mergeable.push(piece);
            } else {
                // Flush what fits before descending into the oversized piece
                if !mergeable.is_empty() {
                    chunks.extend(self.merge_splits(&mergeable, separator));
                    mergeable.clear();
                }
                if remaining.is_empty() {
                    chunks.push(piece);
                } else {
                    chunks.extend(self.split_recursive(&piece, remaining));
                }
            }
        }
        if !mergeable.is_empty() {
            chunks.extend(self.merge_splits(&mergeable, separator));
        }

        chunks.retain(|c| !c.is_empty());
        chunks
    }

    /// Assemble small splits into chunks up to `chunk_size`, sliding a window
    /// so consecutive chunks share up to `chunk_overlap` characters
    fn merge_splits(&self, splits: &[String], separator: &str) -> Vec<String> {
        let sep_len = separator.len();
        let mut docs: Vec<String> = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for piece in splits {
            let piece_len = piece.len();
            let extra = if window.is_empty() { 0 } else { sep_len };

            if total + piece_len + extra > self.chunk_size && !window.is_empty() {
                if let Some(doc) = Self::join_window(&window, separator) {
                    docs.push(doc);
                }
                // Drop from the front until the carried tail fits the overlap
                // budget and leaves room for the incoming piece
                while total > self.chunk_overlap
                    || (total + piece_len + if window.is_empty() { 0 } else { sep_len }
                        > self.chunk_size
                        && total > 0)
                {
                    match window.pop_front() {
                        Some(first) => {
                            total -= first.len() + if window.is_empty() { 0 } else { sep_len };
                        }
                        None => break,
                    }
                }
            }

            total += piece_len + if window.is_empty() { 0 } else { sep_len };
            window.push_back(piece.as_str());
        }

        if let Some(doc) = Self::join_window(&window, separator) {
            docs.push(doc);
        }
        docs
    }

    fn join_window(window: &VecDeque<&str>, separator: &str) -> Option<String> {
        let joined = window
            .iter()
            .copied()
            .collect::<Vec<_>>()
            .join(separator);
        let trimmed = joined.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_sentences(n: usize) -> String {
        (0..n)
            .map(|i| format!("Sentence number {i:03} talks about requirement {i:03}."))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn short_input_is_one_chunk() {
        let chunker = TextChunker::default();
        let chunks = chunker.chunk("  A short   resume.  ");
        assert_eq!(chunks, vec!["A short resume.".to_string()]);
    }

    #[test]
    fn whitespace_only_yields_nothing() {
        let chunker = TextChunker::default();
        assert!(chunker.chunk("   \n\t ").is_empty());
    }

    #[test]
    fn long_input_respects_chunk_size() {
        let chunker = TextChunker::default();
        let text = numbered_sentences(40);
        let chunks = chunker.chunk(&text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(!chunk.is_empty());
            assert!(chunk.len() <= CHUNK_SIZE, "chunk too long: {}", chunk.len());
        }
    }

    #[test]
    fn chunks_are_substrings_of_cleaned_input() {
        let chunker = TextChunker::default();
        let text = numbered_sentences(40);
        let cleaned = clean_text(&text);
        for chunk in chunker.chunk(&text) {
            assert!(cleaned.contains(&chunk), "not a substring: {chunk}");
        }
    }

    #[test]
    fn chunks_cover_input_in_order_without_gaps() {
        let chunker = TextChunker::default();
        let text = numbered_sentences(40);
        let cleaned = clean_text(&text);
        let chunks = chunker.chunk(&text);

        assert!(cleaned.starts_with(chunks.first().unwrap().as_str()));

        // Each chunk starts at or before the end of its predecessor, so
        // content is covered without gaps (overlap is allowed)
        let mut search_from = 0;
        let mut prev_end = 0;
        for chunk in &chunks {
            let start = cleaned[search_from..]
                .find(chunk.as_str())
                .map(|p| p + search_from)
                .expect("chunk must occur after the previous one");
            assert!(start <= prev_end, "gap before chunk at {start}");
            prev_end = start + chunk.len();
            search_from = start + 1;
        }
        assert!(prev_end >= cleaned.len() - 1);
    }

    #[test]
    fn unbroken_text_falls_back_to_character_splits() {
        let chunker = TextChunker::default();
        let text = "x".repeat(1000);
        let chunks = chunker.chunk(&text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= CHUNK_SIZE);
        }
    }
}
