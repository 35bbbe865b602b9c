//! Word-aligned text chunking.
//!
//! Words accumulate into a buffer while a running length (each word's character
//! count plus one separator) grows; once it reaches `chunk_size` the buffer is
//! emitted. Words are never split, so a single oversized word becomes its own chunk.

use serde::Serialize;

pub const DEFAULT_CHUNK_SIZE: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// The chunk's words joined with single spaces.
    pub content: String,
    /// Running length at the moment the chunk was finalized.
    pub accumulated_len: usize,
}

/// Splits `text` into word-aligned chunks. A `chunk_size` of 0 emits one chunk per word.
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut length = 0usize;

    for word in text.split_whitespace() {
        current.push(word);
        length += word.chars().count() + 1;

        if length >= chunk_size {
            chunks.push(Chunk {
                content: current.join(" "),
                accumulated_len: length,
            });
            current.clear();
            length = 0;
        }
    }

    if !current.is_empty() {
        chunks.push(Chunk {
            content: current.join(" "),
            accumulated_len: length,
        });
    }

    chunks
}
