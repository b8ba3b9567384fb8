//! N-gram frequency extraction.
//!
//! Builds ranked tables of contiguous token spans. For every start position
//! of a token stream and every order `1..=n`, the span is joined with single
//! spaces into a candidate gram; grams shorter than [`MIN_GRAM_LEN`]
//! characters are discarded.
//!
//! Ranking is by count, descending. Ties keep **first-seen order**: the order
//! in which each gram was first encountered while scanning the texts in input
//! order. Every consumer (open coding vocabulary, subthemes, emergent labels)
//! relies on this tie-break for reproducible output.
//!
//! Texts are counted in parallel and the per-text tables merged in input
//! order, which yields the same first-seen order as a single sequential scan.

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::analyzer::normalizer::TextNormalizer;
use crate::analyzer::tokenizer::Tokenizer;

/// Grams shorter than this many characters are discarded.
pub const MIN_GRAM_LEN: usize = 4;

/// A gram and its number of occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GramCount {
    /// Tokens joined by single spaces.
    pub term: String,
    /// Occurrences across all scanned texts.
    pub count: usize,
}

/// Insertion-ordered gram counter.
#[derive(Debug, Default, Clone)]
pub struct NgramCounter {
    index: FxHashMap<String, usize>,
    entries: Vec<GramCount>,
}

impl NgramCounter {
    /// Creates an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct grams seen.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no gram has been counted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds `count` occurrences of `gram`, registering it on first sight.
    pub fn add(&mut self, gram: &str, count: usize) {
        if let Some(&slot) = self.index.get(gram) {
            self.entries[slot].count += count;
            return;
        }
        self.index.insert(gram.to_owned(), self.entries.len());
        self.entries.push(GramCount {
            term: gram.to_owned(),
            count,
        });
    }

    /// Counts all grams of order `1..=n` over a token stream.
    pub fn count_tokens<S: AsRef<str>>(&mut self, tokens: &[S], n: usize) {
        let mut gram = String::with_capacity(64);
        for start in 0..tokens.len() {
            gram.clear();
            for (k, token) in tokens[start..].iter().take(n).enumerate() {
                if k > 0 {
                    gram.push(' ');
                }
                gram.push_str(token.as_ref());
                if gram.chars().count() >= MIN_GRAM_LEN {
                    self.add(&gram, 1);
                }
            }
        }
    }

    /// Tokenizes raw `text` and counts its grams of order `1..=n`.
    pub fn count_text(&mut self, text: &str, n: usize) {
        let normalized = TextNormalizer::new().normalize(text);
        let mut tokens = Vec::new();
        Tokenizer::new().tokenize(&normalized, |t| tokens.push(t.to_owned()));
        self.count_tokens(&tokens, n);
    }

    /// Folds another counter in, as if its texts were scanned after ours.
    pub fn merge(&mut self, other: NgramCounter) {
        for entry in other.entries {
            self.add(&entry.term, entry.count);
        }
    }

    /// Ranks grams by count (descending, ties in first-seen order) and keeps `top`.
    pub fn into_ranked(mut self, top: usize) -> Vec<GramCount> {
        // stable sort keeps first-seen order among equal counts
        self.entries.sort_by(|a, b| b.count.cmp(&a.count));
        self.entries.truncate(top);
        self.entries
    }
}

/// Returns the `top` most frequent grams of order `1..=n` across `texts`.
///
/// # Example
///
/// ```
/// use thema_core::analyzer::top_ngrams;
///
/// let top = top_ngrams(&["agua potable, agua limpia"], 2, 3);
/// assert_eq!(top[0].term, "agua");
/// assert_eq!(top[0].count, 2);
/// assert_eq!(top[1].term, "agua potable");
/// ```
pub fn top_ngrams<S>(texts: &[S], n: usize, top: usize) -> Vec<GramCount>
where
    S: AsRef<str> + Sync,
{
    if n == 0 || top == 0 {
        return Vec::new();
    }

    let tables: Vec<NgramCounter> = texts
        .par_iter()
        .map(|text| {
            let mut counter = NgramCounter::new();
            counter.count_text(text.as_ref(), n);
            counter
        })
        .collect();

    let mut global = NgramCounter::new();
    for table in tables {
        global.merge(table);
    }

    tracing::trace!(texts = texts.len(), order = n, distinct = global.len(), "counted n-grams");
    global.into_ranked(top)
}

/// Like [`top_ngrams`] but returns only the terms.
pub fn top_terms<S>(texts: &[S], n: usize, top: usize) -> Vec<String>
where
    S: AsRef<str> + Sync,
{
    top_ngrams(texts, n, top)
        .into_iter()
        .map(|g| g.term)
        .collect()
}
