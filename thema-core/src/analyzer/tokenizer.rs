//! Stopword-filtering tokenizer.
//!
//! Second stage of the text pipeline: takes normalized text and emits the
//! content words used for n-gram counting and TF-IDF.
//!
//! ## What It Does
//!
//! Given normalized input like `"el problema de acceso es grave."`, it emits:
//!
//! ```ignore
//! "problema"
//! "acceso"
//! "grave"
//! ```
//!
//! Each whitespace-separated piece is stripped of non-word characters
//! (anything outside `[a-z0-9_]`), then dropped if it is two characters or
//! shorter or appears in the stopword list.
//!
//! ## Usage
//!
//! ```rust
//! use thema_core::analyzer::tokenizer::tokenize;
//!
//! assert_eq!(tokenize("El problema de ACCESO es grave."), vec!["problema", "acceso", "grave"]);
//! ```
//!
//! [`Tokenizer::tokenize`] streams tokens through a callback and expects
//! pre-normalized input; [`tokenize`] normalizes first and collects.

use crate::analyzer::normalizer::TextNormalizer;
use crate::analyzer::stopwords::is_stopword;

/// Tokens of this many bytes or fewer are discarded.
pub const MAX_SHORT_TOKEN_LEN: usize = 2;

#[inline(always)]
const fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Streaming tokenizer over normalized text.
///
/// Tokens are handed to the callback as slices of an internal scratch
/// buffer; copy them out if they need to outlive the call.
///
/// ## Example
///
/// ```
/// use thema_core::analyzer::{TextNormalizer, Tokenizer};
///
/// let normalized = TextNormalizer::new().normalize("Las comunidades rurales sin agua");
/// let mut count = 0;
/// Tokenizer::new().tokenize(&normalized, |_token| count += 1);
/// assert_eq!(count, 3);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Creates a tokenizer.
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    /// Tokenizes normalized input, emitting each surviving token in order.
    pub fn tokenize<F>(&self, normalized: &str, mut emit: F)
    where
        F: FnMut(&str),
    {
        let mut word = String::with_capacity(32);
        for piece in normalized.split_whitespace() {
            word.clear();
            word.extend(piece.bytes().filter(|&b| is_word_byte(b)).map(char::from));
            if word.len() <= MAX_SHORT_TOKEN_LEN || is_stopword(&word) {
                continue;
            }
            emit(&word);
        }
    }

    /// Normalizes `text` and collects its tokens.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let normalized = TextNormalizer::new().normalize(text);
        let mut out = Vec::new();
        self.tokenize(&normalized, |t| out.push(t.to_owned()));
        out
    }
}

/// Normalizes and tokenizes `text` with the default stopword list.
#[inline]
pub fn tokenize(text: &str) -> Vec<String> {
    Tokenizer::new().tokens(text)
}
