//! Word/punctuation tokenizer and byte/char offset mapping

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\w+(?:['’\-]\w+)*|[^\w\s]").expect("token pattern is valid")
});

/// A token with character offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: usize,
    pub start: usize,
    pub end: usize,
}

/// Maps byte offsets to character offsets and back
#[derive(Debug, Clone)]
pub struct OffsetMap {
    /// Byte offset of every char, followed by the text length
    boundaries: Vec<usize>,
}

impl OffsetMap {
    pub fn new(text: &str) -> Self {
        let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        boundaries.push(text.len());
        Self { boundaries }
    }

    /// Character offset of a byte offset (rounded up to the next boundary)
    pub fn to_char(&self, byte: usize) -> usize {
        match self.boundaries.binary_search(&byte) {
            Ok(idx) | Err(idx) => idx,
        }
    }

    /// Byte offset of a character offset (clamped to the text length)
    pub fn to_byte(&self, char_idx: usize) -> usize {
        let last = self.boundaries.len() - 1;
        self.boundaries[char_idx.min(last)]
    }

    /// Number of characters in the text
    pub fn char_len(&self) -> usize {
        self.boundaries.len() - 1
    }
}

/// Split text into word and punctuation tokens
pub fn tokenize(text: &str) -> Vec<Token> {
    let offsets = OffsetMap::new(text);

    TOKEN_RE
        .find_iter(text)
        .enumerate()
        .map(|(id, m)| Token {
            id,
            start: offsets.to_char(m.start()),
            end: offsets.to_char(m.end()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_words_and_punctuation() {
        let text = "Dear Sir, I'm well.";
        let tokens = tokenize(text);
        let words: Vec<&str> = tokens.iter().map(|t| &text[t.start..t.end]).collect();
        assert_eq!(words, vec!["Dear", "Sir", ",", "I'm", "well", "."]);
        assert_eq!(tokens[2].id, 2);
    }

    #[test]
    fn test_char_offsets_with_multibyte_text() {
        let text = "£5 to Bérard";
        let tokens = tokenize(text);

        assert_eq!(tokens[0], Token { id: 0, start: 0, end: 1 });
        assert_eq!(tokens[1], Token { id: 1, start: 1, end: 2 });
        let last = tokens.last().unwrap();
        assert_eq!((last.start, last.end), (6, 12));
    }

    #[test]
    fn test_offset_map_round_trip() {
        let text = "é£a";
        let map = OffsetMap::new(text);
        assert_eq!(map.char_len(), 3);
        assert_eq!(map.to_char(0), 0);
        assert_eq!(map.to_char(2), 1);
        assert_eq!(map.to_char(4), 2);
        assert_eq!(map.to_byte(2), 4);
        assert_eq!(map.to_byte(10), text.len());
    }
}
