//! Fixed-size document chunker.
//!
//! Splits a text blob into contiguous character windows so that each
//! model call stays inside the context budget. Unlike retrieval-style
//! chunkers there is no overlap: concatenating the chunks in index
//! order must reproduce the input exactly, because partial answers are
//! later merged back into one answer over the whole document.

/// One contiguous slice of a source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 1-based position of this chunk.
    pub index: usize,
    /// Total number of chunks the document was split into.
    pub total: usize,
    pub text: String,
}

/// Split `text` into ordered chunks of at most `chunk_size` characters.
///
/// Boundaries are measured in chars, never bytes, so multi-byte UTF-8
/// content is never cut mid-codepoint. Every chunk except possibly the
/// last is exactly `chunk_size` chars long. Empty input still yields a
/// single empty chunk so downstream loops always have one iteration.
pub fn split(text: &str, chunk_size: usize) -> Vec<Chunk> {
    assert!(chunk_size > 0, "chunk_size must be positive");

    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![Chunk {
            index: 1,
            total: 1,
            text: String::new(),
        }];
    }

    let total = chars.len().div_ceil(chunk_size);
    chars
        .chunks(chunk_size)
        .enumerate()
        .map(|(i, window)| Chunk {
            index: i + 1,
            total,
            text: window.iter().collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concatenation_reproduces_input() {
        let long = "x".repeat(1000);
        let inputs = [
            "",
            "a",
            "hello world",
            "相对论电子束在地球磁层中的传播",
            long.as_str(),
        ];
        for input in inputs {
            for chunk_size in [1, 3, 7, 512] {
                let chunks = split(input, chunk_size);
                let joined: String = chunks.iter().map(|c| c.text.as_str()).collect();
                assert_eq!(joined, input, "chunk_size={chunk_size}");
                assert!(chunks.iter().all(|c| c.text.chars().count() <= chunk_size));
            }
        }
    }

    #[test]
    fn test_empty_input_yields_single_empty_chunk() {
        let chunks = split("", 100);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].index, 1);
        assert_eq!(chunks[0].total, 1);
        assert!(chunks[0].text.is_empty());
    }

    #[test]
    fn test_all_but_last_chunk_are_full() {
        let chunks = split("abcdefgh", 3);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].text, "abc");
        assert_eq!(chunks[1].text, "def");
        assert_eq!(chunks[2].text, "gh");
        assert!(chunks.iter().all(|c| c.total == 3));
        assert_eq!(
            chunks.iter().map(|c| c.index).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_chunk_count_is_ceiling() {
        assert_eq!(split(&"a".repeat(9), 3).len(), 3);
        assert_eq!(split(&"a".repeat(10), 3).len(), 4);
        assert_eq!(split("ab", 100).len(), 1);
    }

    #[test]
    fn test_multibyte_boundaries_are_char_based() {
        // 4 CJK chars, 3 bytes each; a byte-based splitter would panic.
        let chunks = split("磁层传播", 3);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "磁层传");
        assert_eq!(chunks[1].text, "播");
    }
}
