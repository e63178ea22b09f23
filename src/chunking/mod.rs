#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Configuration for sentence-bounded chunking
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters. Soft limit: a single sentence
    /// longer than this still becomes one chunk rather than being split.
    pub max_chunk_size: usize,
    /// Character budget for sentences carried from the end of one chunk
    /// into the start of the next.
    pub overlap_size: usize,
}

impl Default for ChunkingConfig {
    #[inline]
    fn default() -> Self {
        Self {
            max_chunk_size: 1000,
            overlap_size: 200,
        }
    }
}

impl ChunkingConfig {
    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_chunk_size == 0 {
            return Err(ConfigError::InvalidMaxChunkSize(self.max_chunk_size));
        }

        if self.overlap_size >= self.max_chunk_size {
            return Err(ConfigError::InvalidOverlapSize(
                self.overlap_size,
                self.max_chunk_size,
            ));
        }

        Ok(())
    }
}

/// Split text into trimmed, non-empty sentences.
///
/// A sentence ends at `.`, `!`, or `?` followed by whitespace; the
/// punctuation stays attached. Text without any terminal punctuation is
/// returned whole as a single sentence.
#[inline]
pub fn split_into_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if matches!(ch, '.' | '!' | '?')
            && chars.peek().is_some_and(|(_, next)| next.is_whitespace())
        {
            let end = idx + ch.len_utf8();
            push_trimmed(&mut sentences, &text[start..end]);
            start = end;
        }
    }

    push_trimmed(&mut sentences, &text[start..]);
    sentences
}

fn push_trimmed<'a>(sentences: &mut Vec<&'a str>, raw: &'a str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed);
    }
}

/// Split text into chunks that respect sentence boundaries.
///
/// Chunks stay within `max_chunk_size` characters and never cut
/// mid-sentence. Overlap is applied by repeating trailing sentences from
/// the previous chunk. Callers must hold a validated [`ChunkingConfig`];
/// the function itself is total over all inputs.
#[inline]
pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Vec<String> {
    let sentences = split_into_sentences(text);
    if sentences.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0;

    for sentence in sentences {
        let sentence_len = sentence.len();

        // A sentence longer than the whole budget is emitted alone, unsplit,
        // and clears any pending overlap.
        if sentence_len > config.max_chunk_size {
            if !current.is_empty() {
                chunks.push(current.join(" "));
                current.clear();
            }
            chunks.push(sentence.to_string());
            current_len = 0;
            continue;
        }

        let prospective = if current.is_empty() {
            sentence_len
        } else {
            current_len + 1 + sentence_len
        };

        if prospective > config.max_chunk_size && !current.is_empty() {
            chunks.push(current.join(" "));
            current = overlap_seed(&current, config.overlap_size);
            current_len = joined_len(&current);
        }

        current.push(sentence);
        current_len = if current.len() == 1 {
            sentence_len
        } else {
            current_len + 1 + sentence_len
        };
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}

/// Pick the sentences carried into the next chunk: the largest trailing
/// suffix of at most two sentences whose joined length is strictly under
/// `overlap_size`, or nothing.
fn overlap_seed<'a>(flushed: &[&'a str], overlap_size: usize) -> Vec<&'a str> {
    if flushed.len() >= 2 {
        let tail = &flushed[flushed.len() - 2..];
        if joined_len(tail) < overlap_size {
            return tail.to_vec();
        }
    }

    match flushed.last() {
        Some(&last) if last.len() < overlap_size => vec![last],
        _ => Vec::new(),
    }
}

/// Length of the sentences once joined with single spaces.
fn joined_len(sentences: &[&str]) -> usize {
    if sentences.is_empty() {
        return 0;
    }
    sentences.iter().map(|s| s.len()).sum::<usize>() + sentences.len() - 1
}
