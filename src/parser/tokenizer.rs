// file: src/parser/tokenizer.rs
// description: splits recognized text into ordered lookup keywords
// reference: whitespace tokenization over unicode text

use crate::models::{Keyword, RecognizedText};

/// Splits text on unicode whitespace; tokens keep their case and punctuation.
pub struct Tokenizer;

impl Tokenizer {
    pub fn new() -> Self {
        Self
    }

    pub fn tokenize(&self, text: &RecognizedText) -> Vec<Keyword> {
        tokenize(text.as_str())
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Keywords in source order. Duplicates are kept.
pub fn tokenize(text: &str) -> Vec<Keyword> {
    text.split_whitespace()
        .filter_map(|token| Keyword::new(token))
        .collect()
}
