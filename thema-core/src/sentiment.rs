//! Naive lexicon sentiment over sentences.
//!
//! Each lexicon hit scores `+1` or `-1`, flipped when one of the three
//! preceding tokens is a negation. A sentence is positive, negative or
//! neutral by the sign of its total.

use std::sync::LazyLock;

use rustc_hash::FxHashSet;
use thema_types::{Document, SentimentTally};

use crate::analyzer::sentence::split_sentences;

const POSITIVE_WORDS: &[&str] = &[
    "bueno", "buena", "bien", "positivo", "positiva", "mejor", "mejora", "excelente", "útil",
    "satisfecho", "satisfecha", "satisfactorio", "favorable", "agradable", "aceptable",
    "fortaleza", "fortalezas", "beneficio", "beneficios", "apoyo", "oportunidad",
    "oportunidades", "eficiente", "eficaz", "claro", "claridad", "acierto", "logro", "avance",
];

const NEGATIVE_WORDS: &[&str] = &[
    "malo", "mala", "mal", "negativo", "negativa", "peor", "problema", "problemas",
    "insatisfactorio", "insatisfecho", "riesgo", "riesgos", "limitado", "limitada",
    "dificultad", "dificultades", "falla", "fallas", "débil", "debilidad", "debilidades",
    "crítica", "críticas", "pobre", "insuficiente", "carencia", "deficiente", "obstáculo",
    "obstaculos", "barrera", "barreras",
];

const NEGATIONS: &[&str] = &["no", "nunca", "jamás", "ningún", "ninguna", "sin"];

/// Tokens before a hit that are checked for a negation.
pub const NEGATION_WINDOW: usize = 3;

static POSITIVE: LazyLock<FxHashSet<&'static str>> =
    LazyLock::new(|| POSITIVE_WORDS.iter().copied().collect());
static NEGATIVE: LazyLock<FxHashSet<&'static str>> =
    LazyLock::new(|| NEGATIVE_WORDS.iter().copied().collect());

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || matches!(c, 'á' | 'é' | 'í' | 'ó' | 'ú' | 'ñ' | 'ü')
}

/// Lowercased whitespace pieces with non-word characters removed.
///
/// Unlike the main tokenizer this keeps accents, short words and stopwords,
/// since negations such as `no` and `sin` matter here.
pub fn sentiment_tokens(sentence: &str) -> Vec<String> {
    sentence
        .to_lowercase()
        .split_whitespace()
        .map(|piece| piece.chars().filter(|&c| is_word_char(c)).collect::<String>())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Signed score of one tokenized sentence.
pub fn sentence_score<S: AsRef<str>>(tokens: &[S]) -> i32 {
    let mut score = 0;
    for (i, token) in tokens.iter().enumerate() {
        let token = token.as_ref();
        let value = if POSITIVE.contains(token) {
            1
        } else if NEGATIVE.contains(token) {
            -1
        } else {
            continue;
        };
        let negated = tokens[i.saturating_sub(NEGATION_WINDOW)..i]
            .iter()
            .any(|w| NEGATIONS.contains(&w.as_ref()));
        score += if negated { -value } else { value };
    }
    score
}

/// Tallies sentence polarity over every document. Sentences without
/// tokens are not counted.
pub fn sentiment_tally(docs: &[Document]) -> SentimentTally {
    let mut tally = SentimentTally::default();
    for sentence in docs.iter().flat_map(|d| split_sentences(&d.text)) {
        let tokens = sentiment_tokens(sentence);
        if tokens.is_empty() {
            continue;
        }
        tally.total += 1;
        match sentence_score(&tokens) {
            s if s > 0 => tally.positive += 1,
            s if s < 0 => tally.negative += 1,
            _ => tally.neutral += 1,
        }
    }
    tally
}
