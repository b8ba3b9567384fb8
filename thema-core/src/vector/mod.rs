//! Vector-space modelling for emergent category discovery.
//!
//! - **TF-IDF**: sparse term weights for short pseudo-documents
//! - **Similarity**: cosine similarity over sparse vectors
//! - **K-Means**: cosine k-means with an injectable random source

pub mod kmeans;
pub mod similarity;
pub mod tfidf;

use rustc_hash::FxHashMap;

/// Sparse term → weight map. Missing terms weigh zero.
pub type SparseVector = FxHashMap<String, f64>;

pub use kmeans::{kmeans, Clustering, CosineKMeans};
pub use similarity::cosine_similarity;
pub use tfidf::{smoothed_idf, vectorize, vectorize_texts, PseudoDocument, TfidfModel};
