//! Text analysis pipeline.
//!
//! This module provides the lexical components:
//! - **Normalizer**: Lowercases, strips diacritics and unsupported symbols
//! - **Sentence splitter**: Cuts raw text into quotable sentences
//! - **Tokenizer**: Splits normalized text into stopword-filtered tokens
//! - **N-grams**: Ranks contiguous token spans by frequency

pub mod ngram;
pub mod normalizer;
pub mod sentence;
pub mod stopwords;
pub mod tokenizer;

pub use ngram::{top_ngrams, top_terms, GramCount, NgramCounter};
pub use normalizer::{normalize, TextNormalizer};
pub use sentence::split_sentences;
pub use stopwords::is_stopword;
pub use tokenizer::{tokenize, Tokenizer};
