//! TF-IDF weighting for short pseudo-documents.

use rustc_hash::FxHashMap;

use crate::analyzer::tokenizer::Tokenizer;
use crate::vector::SparseVector;

/// A pseudo-document: an identifier plus the text to vectorize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PseudoDocument<'a> {
    /// Caller-defined identifier, usually the index of the source record.
    pub id: usize,
    /// Raw text; tokenized with the default tokenizer.
    pub text: &'a str,
}

/// Vectors for a corpus plus its document frequencies.
#[derive(Debug, Clone, Default)]
pub struct TfidfModel {
    /// One vector per input document, in input order.
    pub vectors: Vec<SparseVector>,
    /// Number of documents containing each term at least once.
    pub document_frequency: FxHashMap<String, usize>,
}

impl TfidfModel {
    /// Number of documents the model was built from.
    #[inline]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Returns `true` if the corpus was empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

/// Smoothed inverse document frequency: `ln((N + 1) / (df + 1)) + 1`.
#[inline]
pub fn smoothed_idf(corpus_size: usize, document_frequency: usize) -> f64 {
    ((corpus_size as f64 + 1.0) / (document_frequency as f64 + 1.0)).ln() + 1.0
}

/// Builds TF-IDF vectors for `docs`.
///
/// The weight of term `t` in document `d` is `tf(t, d) * smoothed_idf(N, df(t))`.
/// Terms absent from a document have no entry (implicit zero).
pub fn vectorize(docs: &[PseudoDocument<'_>]) -> TfidfModel {
    let tokenizer = Tokenizer::new();
    let mut term_frequencies = Vec::with_capacity(docs.len());
    let mut document_frequency: FxHashMap<String, usize> = FxHashMap::default();

    for doc in docs {
        let mut tf: FxHashMap<String, usize> = FxHashMap::default();
        for token in tokenizer.tokens(doc.text) {
            *tf.entry(token).or_insert(0) += 1;
        }
        for term in tf.keys() {
            *document_frequency.entry(term.clone()).or_insert(0) += 1;
        }
        term_frequencies.push(tf);
    }

    let n = docs.len();
    let vectors = term_frequencies
        .into_iter()
        .map(|tf| {
            tf.into_iter()
                .map(|(term, count)| {
                    let df = document_frequency.get(&term).copied().unwrap_or(1);
                    let weight = count as f64 * smoothed_idf(n, df);
                    (term, weight)
                })
                .collect()
        })
        .collect();

    TfidfModel {
        vectors,
        document_frequency,
    }
}

/// Convenience wrapper numbering `texts` by position.
pub fn vectorize_texts<S: AsRef<str>>(texts: &[S]) -> TfidfModel {
    let docs: Vec<PseudoDocument<'_>> = texts
        .iter()
        .enumerate()
        .map(|(id, text)| PseudoDocument {
            id,
            text: text.as_ref(),
        })
        .collect();
    vectorize(&docs)
}
