use crate::domain::errors::{DomainError, Result};

pub const DEFAULT_SEPARATOR: &str = "\n";
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Character-based text splitter.
///
/// The input is split on `separator`, then the pieces are merged back into
/// chunks of at most `chunk_size` characters. When a chunk closes, trailing
/// pieces of up to `chunk_overlap` characters are carried into the next chunk
/// so context is not lost at split points. A single piece longer than
/// `chunk_size` is hard-cut into overlapping windows.
///
/// Lengths are measured in characters, not bytes.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    separator: String,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    pub fn new(
        separator: impl Into<String>,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Result<Self> {
        if chunk_size == 0 {
            return Err(DomainError::validation("chunk_size must be positive"));
        }
        if chunk_overlap >= chunk_size {
            return Err(DomainError::validation(
                "chunk_overlap must be smaller than chunk_size",
            ));
        }
        let separator = separator.into();
        if separator.is_empty() {
            return Err(DomainError::validation("separator must not be empty"));
        }

        Ok(Self {
            separator,
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        if char_len(text) <= self.chunk_size {
            return vec![text.to_string()];
        }

        let mut pieces = Vec::new();
        for part in text.split(self.separator.as_str()) {
            if char_len(part) > self.chunk_size {
                pieces.extend(self.hard_cut(part));
            } else {
                pieces.push(part.to_string());
            }
        }

        self.merge(pieces)
    }

    /// Greedily joins pieces into chunks of at most `chunk_size` characters,
    /// carrying a trailing window of up to `chunk_overlap` characters forward.
    fn merge(&self, pieces: Vec<String>) -> Vec<String> {
        let sep_len = char_len(&self.separator);
        let mut chunks = Vec::new();
        let mut current: Vec<String> = Vec::new();
        // Characters in `current`, separators included.
        let mut total = 0usize;

        for piece in pieces {
            let piece_len = char_len(&piece);
            let extra = if current.is_empty() {
                piece_len
            } else {
                piece_len + sep_len
            };

            if !current.is_empty() && total + extra > self.chunk_size {
                chunks.push(current.join(&self.separator));

                while !current.is_empty()
                    && (total > self.chunk_overlap
                        || total + piece_len + sep_len > self.chunk_size)
                {
                    let removed = current.remove(0);
                    total -= char_len(&removed);
                    if !current.is_empty() {
                        total -= sep_len;
                    }
                }
            }

            total += if current.is_empty() {
                piece_len
            } else {
                piece_len + sep_len
            };
            current.push(piece);
        }

        if !current.is_empty() {
            chunks.push(current.join(&self.separator));
        }

        chunks
    }

    /// Cuts an oversized piece into `chunk_size` windows stepping by
    /// `chunk_size - chunk_overlap`, so neighboring windows share exactly
    /// `chunk_overlap` characters.
    fn hard_cut(&self, piece: &str) -> Vec<String> {
        let chars: Vec<char> = piece.chars().collect();
        let step = self.chunk_size - self.chunk_overlap;
        let mut windows = Vec::new();
        let mut start = 0;

        loop {
            let end = usize::min(start + self.chunk_size, chars.len());
            windows.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start += step;
        }

        windows
    }
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(size: usize, overlap: usize) -> TextSplitter {
        TextSplitter::new("\n", size, overlap).unwrap()
    }

    #[test]
    fn test_short_input_is_single_chunk() {
        let s = splitter(1000, 200);
        let text = "A short paragraph.\nAnd a second line.";
        assert_eq!(s.split(text), vec![text.to_string()]);
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        let s = splitter(1000, 200);
        assert!(s.split("").is_empty());
    }

    #[test]
    fn test_rejects_overlap_larger_than_size() {
        assert!(TextSplitter::new("\n", 100, 100).is_err());
        assert!(TextSplitter::new("\n", 0, 0).is_err());
        assert!(TextSplitter::new("", 100, 10).is_err());
    }

    #[test]
    fn test_every_chunk_within_size() {
        let s = splitter(100, 20);
        let text = (0..50)
            .map(|i| format!("sentence number {i} with some padding text"))
            .collect::<Vec<_>>()
            .join("\n");

        let chunks = s.split(&text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 100);
        }
    }

    #[test]
    fn test_no_content_lost_between_chunks() {
        let s = splitter(100, 20);
        let lines: Vec<String> = (0..40).map(|i| format!("line-{i:03} content")).collect();
        let text = lines.join("\n");

        let chunks = s.split(&text);
        for line in &lines {
            assert!(
                chunks.iter().any(|c| c.contains(line.as_str())),
                "line {line} missing from all chunks"
            );
        }
    }

    #[test]
    fn test_unseparated_text_hard_cut_with_exact_overlap() {
        let s = splitter(1000, 200);
        let text = "x".repeat(2500);

        let chunks = s.split(&text);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 1000);
        assert_eq!(chunks[1].len(), 1000);
        assert_eq!(chunks[2].len(), 900);
    }

    #[test]
    fn test_2500_chars_with_newlines_yields_three_chunks() {
        // 25 lines of 99 characters, 2499 characters total with separators.
        let lines: Vec<String> = (0..25)
            .map(|i| format!("{:04} {}", i, "a".repeat(94)))
            .collect();
        let text = lines.join("\n");
        assert_eq!(text.chars().count(), 2499);

        let s = splitter(1000, 200);
        let chunks = s.split(&text);

        assert_eq!(chunks.len(), 3);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 1000);
        }
    }

    #[test]
    fn test_consecutive_chunks_share_overlap_region() {
        let lines: Vec<String> = (0..25)
            .map(|i| format!("{:04} {}", i, "a".repeat(94)))
            .collect();
        let text = lines.join("\n");

        let s = splitter(1000, 200);
        let chunks = s.split(&text);
        assert!(chunks.len() > 1);

        for pair in chunks.windows(2) {
            let overlap = shared_overlap(&pair[0], &pair[1]);
            assert!(overlap > 0, "consecutive chunks share no overlap");
            assert!(overlap <= 200, "overlap {overlap} exceeds the configured length");
        }
    }

    /// Longest suffix of `a` that is a prefix of `b`, in characters.
    fn shared_overlap(a: &str, b: &str) -> usize {
        let a_chars: Vec<char> = a.chars().collect();
        let b_chars: Vec<char> = b.chars().collect();
        let max = a_chars.len().min(b_chars.len());
        (1..=max)
            .rev()
            .find(|&k| a_chars[a_chars.len() - k..] == b_chars[..k])
            .unwrap_or(0)
    }

    #[test]
    fn test_oversized_piece_mixed_with_lines() {
        let s = splitter(100, 20);
        let text = format!("short line\n{}\ntail line", "y".repeat(250));

        let chunks = s.split(&text);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 100);
        }
        assert!(chunks.iter().any(|c| c.contains("short line")));
        assert!(chunks.iter().any(|c| c.contains("tail line")));
        let total_ys: usize = chunks
            .iter()
            .map(|c| c.chars().filter(|&ch| ch == 'y').count())
            .sum();
        // Overlap duplicates characters, so the sum must be at least the input count.
        assert!(total_ys >= 250);
    }
}
