//! Cosine similarity.

use crate::vector::SparseVector;

/// `dot(a, b) / (‖a‖ · ‖b‖)` over the union of both term sets.
///
/// A zero norm on either side makes the denominator 1, so empty or all-zero
/// vectors have similarity 0 with everything.
#[inline]
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    for (term, &wa) in a {
        norm_a += wa * wa;
        if let Some(&wb) = b.get(term) {
            dot += wa * wb;
        }
    }
    let norm_b: f64 = b.values().map(|w| w * w).sum();

    let denom = norm_a.sqrt() * norm_b.sqrt();
    let denom = if denom == 0.0 || denom.is_nan() { 1.0 } else { denom };
    dot / denom
}
