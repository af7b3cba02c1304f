//! Fixed-width text chunking for embed field values.

use thiserror::Error;

/// Longest value a single embed field can carry.
pub const MAX_FIELD_LENGTH: usize = 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkError {
    #[error("chunk length must be greater than zero")]
    ZeroLength,
}

/// Split `text` into consecutive chunks of at most `max_len` characters.
///
/// Counts Unicode scalar values, so a chunk never ends inside a character.
/// Chunks are not word-aligned. Empty input yields no chunks.
pub fn split_into_chunks(text: &str, max_len: usize) -> Result<Vec<String>, ChunkError> {
    if max_len == 0 {
        return Err(ChunkError::ZeroLength);
    }

    let mut chunks = Vec::with_capacity(text.len() / max_len + 1);
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        if count == max_len {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count += 1;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    Ok(chunks)
}

/// Truncate `text` to at most `max_len` characters.
pub fn truncate_chars(text: &str, max_len: usize) -> &str {
    match text.char_indices().nth(max_len) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
