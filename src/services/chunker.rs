//! Line-respecting text chunking with approximate overlap.

use std::cmp::max;

use crate::models::ChunkingConfig;

/// Average line length, in characters, assumed when converting the requested
/// character overlap into a number of carried-over lines.
const ASSUMED_LINE_LENGTH: usize = 50;

/// Splits a document into ordered chunks of whole lines.
///
/// Lines are accumulated until adding the next one would exceed the target
/// size, at which point the accumulator is emitted as a chunk and a suffix of
/// it is carried into the next accumulation as overlap. A single line longer
/// than the target is emitted alone rather than split.
#[derive(Debug, Clone)]
pub struct LineChunker {
    /// Target chunk size in characters.
    chunk_size: usize,
    /// Requested overlap in characters, approximated in lines.
    overlap: usize,
}

impl LineChunker {
    pub fn new(config: &ChunkingConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            overlap: config.overlap,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&ChunkingConfig::default())
    }

    /// Chunk a document. Pure: same input and parameters, same output.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_len = 0usize;

        for line in text.lines() {
            let line_len = line.len() + 1; // account for the newline
            if current_len + line_len > self.chunk_size && !current.is_empty() {
                chunks.push(current.join("\n"));
                let keep = current.len().saturating_sub(self.dropped_lines());
                current = current.split_off(current.len() - keep);
                current_len = current.iter().map(|l| l.len() + 1).sum();
            }
            current.push(line);
            current_len += line_len;
        }

        if !current.is_empty() {
            chunks.push(current.join("\n"));
        }

        chunks
    }

    /// Lines dropped from the front of the accumulator at each chunk
    /// boundary; everything else carries over as overlap. The character
    /// overlap is converted to lines assuming ~50-char average lines, so the
    /// realized overlap is approximate for atypical line lengths.
    fn dropped_lines(&self) -> usize {
        max(1, self.overlap / ASSUMED_LINE_LENGTH)
    }
}
