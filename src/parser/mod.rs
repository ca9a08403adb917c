// file: src/parser/mod.rs
// description: recognized text tokenization exports
// reference: internal module structure

pub mod tokenizer;

pub use tokenizer::{Tokenizer, tokenize};
