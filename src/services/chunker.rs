//! Character-window text chunking.
//!
//! Splits text into windows of at most `chunk_size` characters where each
//! window starts `chunk_overlap` characters before the previous one ended.
//! Windows are measured in `char`s so multi-byte text never splits inside a
//! code point. With `respect_boundaries` a window that would end mid-text is
//! pulled back to the last paragraph, line, sentence or word break that still
//! leaves it longer than the overlap.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Chunk, ChunkingConfig, Metadata};

/// Cut points in priority order.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", ". ", " "];

#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    pub fn new(config: ChunkingConfig) -> DomainResult<Self> {
        if config.chunk_size == 0 {
            return Err(DomainError::Validation("chunk_size must be greater than 0".to_string()));
        }
        if config.chunk_overlap >= config.chunk_size {
            return Err(DomainError::Validation(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                config.chunk_overlap, config.chunk_size
            )));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Split `text` into chunks carrying no metadata.
    pub fn split(&self, text: &str) -> Vec<Chunk> {
        self.split_with_metadata(text, &Metadata::new())
    }

    /// Split `text`, giving every chunk a copy of `metadata`.
    pub fn split_with_metadata(&self, text: &str, metadata: &Metadata) -> Vec<Chunk> {
        self.windows(text)
            .into_iter()
            .map(|content| Chunk::new(content).with_metadata(metadata.clone()))
            .collect()
    }

    fn windows(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let n = chars.len();
        let size = self.config.chunk_size;
        let overlap = self.config.chunk_overlap;

        let mut out = Vec::new();
        let mut start = 0;

        while start < n {
            let mut end = (start + size).min(n);
            if end < n && self.config.respect_boundaries {
                if let Some(cut) = last_boundary(&chars, start + overlap, end) {
                    end = cut;
                }
            }

            out.push(chars[start..end].iter().collect());

            if end == n {
                break;
            }
            start = end - overlap;
        }

        out
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            config: ChunkingConfig::default(),
        }
    }
}

/// Latest index `e` in `(floor, end]` where a separator ends, trying
/// separators in priority order.
fn last_boundary(chars: &[char], floor: usize, end: usize) -> Option<usize> {
    SEPARATORS.iter().find_map(|sep| {
        let sep: Vec<char> = sep.chars().collect();
        (floor + 1..=end)
            .rev()
            .find(|&e| e >= sep.len() && chars[e - sep.len()..e] == sep[..])
    })
}

/// One-shot split with explicit sizes and boundary snapping disabled.
pub fn split(text: &str, chunk_size: usize, chunk_overlap: usize) -> DomainResult<Vec<Chunk>> {
    let chunker = Chunker::new(ChunkingConfig {
        chunk_size,
        chunk_overlap,
        respect_boundaries: false,
    })?;
    Ok(chunker.split(text))
}

/// Rebuild the source text from overlapping chunks.
pub fn reassemble(chunks: &[Chunk], chunk_overlap: usize) -> String {
    let mut out = String::new();
    for (i, chunk) in chunks.iter().enumerate() {
        if i == 0 {
            out.push_str(&chunk.content);
        } else {
            out.extend(chunk.content.chars().skip(chunk_overlap));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.content.as_str()).collect()
    }

    #[test]
    fn test_empty_text_gives_no_chunks() {
        assert!(split("", 10, 2).unwrap().is_empty());
    }

    #[test]
    fn test_short_text_gives_single_chunk() {
        let chunks = split("hello", 500, 200).unwrap();
        assert_eq!(contents(&chunks), vec!["hello"]);
    }

    #[test]
    fn test_fixed_windows_overlap() {
        let chunks = split("abcdefghij", 4, 1).unwrap();
        assert_eq!(contents(&chunks), vec!["abcd", "defg", "ghij"]);
        assert_eq!(reassemble(&chunks, 1), "abcdefghij");
    }

    #[test]
    fn test_no_overlap() {
        let chunks = split("abcdefg", 3, 0).unwrap();
        assert_eq!(contents(&chunks), vec!["abc", "def", "g"]);
    }

    #[test]
    fn test_multibyte_text_is_split_by_chars() {
        let chunks = split("åäöüéñ", 4, 2).unwrap();
        assert_eq!(contents(&chunks), vec!["åäöü", "öüéñ"]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(split("x", 0, 0), Err(DomainError::Validation(_))));
        assert!(matches!(split("x", 5, 5), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_boundaries_prefer_paragraphs() {
        let chunker = Chunker::new(ChunkingConfig {
            chunk_size: 20,
            chunk_overlap: 2,
            respect_boundaries: true,
        })
        .unwrap();

        let text = "First para.\n\nSecond one is longer text.";
        let chunks = chunker.split(text);
        assert_eq!(chunks[0].content, "First para.\n\n");
        assert_eq!(reassemble(&chunks, 2), text);
        for pair in chunks.windows(2) {
            let tail: String = pair[0].content.chars().rev().take(2).collect::<Vec<_>>().into_iter().rev().collect();
            let head: String = pair[1].content.chars().take(2).collect();
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn test_boundaries_fall_back_to_hard_cut() {
        let chunker = Chunker::new(ChunkingConfig {
            chunk_size: 5,
            chunk_overlap: 1,
            respect_boundaries: true,
        })
        .unwrap();

        let chunks = chunker.split("abcdefghij");
        assert_eq!(contents(&chunks), vec!["abcde", "efghi", "ij"]);
    }

    #[test]
    fn test_metadata_copied_to_every_chunk() {
        let mut metadata = Metadata::new();
        metadata.insert("source".to_string(), serde_json::json!("text-input"));
        let chunker = Chunker::new(ChunkingConfig {
            chunk_size: 3,
            chunk_overlap: 0,
            respect_boundaries: false,
        })
        .unwrap();

        let chunks = chunker.split_with_metadata("abcdef", &metadata);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.metadata == metadata));
    }
}
