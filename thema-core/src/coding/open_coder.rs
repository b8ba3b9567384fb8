//! Open coding: quote-anchored codes from salient sentences.

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use thema_types::{Document, OpenCode, PipelineConfig};

use crate::analyzer::ngram::top_terms;
use crate::analyzer::sentence::split_sentences;
use crate::analyzer::tokenizer::Tokenizer;

/// Ranked vocabulary used to code every sentence of the corpus.
pub fn coding_vocabulary(docs: &[Document], config: &PipelineConfig) -> Vec<String> {
    let texts: Vec<&str> = docs.iter().map(|d| d.text.as_str()).collect();
    top_terms(&texts, config.vocabulary_order, config.vocabulary_size)
}

/// Extracts open codes from `docs`.
///
/// A sentence is coded when it keeps at least `min_sentence_tokens` tokens.
/// Its code is the first vocabulary gram, in rank order, found as a
/// substring of the lowercased sentence. Codes repeating the same
/// `doc|code|quote-prefix` key are dropped, keeping the first.
pub fn open_coding(docs: &[Document], config: &PipelineConfig) -> Vec<OpenCode> {
    let vocabulary = coding_vocabulary(docs, config);

    let per_doc: Vec<Vec<OpenCode>> = docs
        .par_iter()
        .map(|doc| code_document(doc, &vocabulary, config.min_sentence_tokens))
        .collect();

    let codes = dedup_codes(per_doc.into_iter().flatten(), config.dedup_quote_prefix);

    tracing::debug!(
        docs = docs.len(),
        vocabulary = vocabulary.len(),
        codes = codes.len(),
        "open coding finished"
    );
    codes
}

fn code_document(doc: &Document, vocabulary: &[String], min_tokens: usize) -> Vec<OpenCode> {
    let tokenizer = Tokenizer::new();
    let mut out = Vec::new();

    for sentence in split_sentences(&doc.text) {
        if tokenizer.tokens(sentence).len() < min_tokens {
            continue;
        }
        let lowered = sentence.to_lowercase();
        if let Some(gram) = vocabulary.iter().find(|g| lowered.contains(g.as_str())) {
            out.push(OpenCode {
                doc: doc.name.clone(),
                code: gram.clone(),
                quote: sentence.to_owned(),
            });
        }
    }

    out
}

/// Dedup key: document, code and the first `prefix` characters of the quote.
fn dedup_key(code: &OpenCode, prefix: usize) -> String {
    let quote_prefix: String = code.quote.chars().take(prefix).collect();
    format!("{}|{}|{}", code.doc, code.code, quote_prefix)
}

fn dedup_codes<I>(codes: I, prefix: usize) -> Vec<OpenCode>
where
    I: IntoIterator<Item = OpenCode>,
{
    let mut seen = FxHashSet::default();
    codes
        .into_iter()
        .filter(|c| seen.insert(dedup_key(c, prefix)))
        .collect()
}
