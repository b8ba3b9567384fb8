//! Analysis core of the Thema qualitative research pipeline.
//!
//! Turns interview transcripts into a structured thematic analysis:
//!
//! - **[`analyzer`]**: normalization, sentence splitting, tokenization, n-grams
//! - **[`vector`]**: TF-IDF vectors, cosine similarity, cosine k-means
//! - **[`coding`]**: familiarization, open coding, grouping, synthesis
//! - **[`pipeline`]**: sequences the stages into one [`Analysis`]
//! - **[`sentiment`]**, **[`network`]**: derived views for renderers
//!
//! The core performs no I/O and never installs a `tracing` subscriber.
//! All randomness flows through an injected [`rand::Rng`].

pub mod analyzer;
pub mod coding;
pub mod network;
pub mod pipeline;
pub mod sentiment;
pub mod vector;

pub use network::{filter_network, network_data, NetworkFilter};
pub use pipeline::{run_full_analysis, ThematicPipeline};
pub use sentiment::sentiment_tally;
pub use thema_types::{
    Analysis, AnalysisStats, BaseCategory, CategoryGroup, Document, DocumentMeta, OpenCode,
    PipelineConfig, Theme,
};
