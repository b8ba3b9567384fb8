//! Qualitative coding stages.
//!
//! Each stage is a pure function over the previous stage's output:
//! - **Familiarization**: per-document overview (frequent terms, speakers, metadata)
//! - **Open coding**: quote-anchored codes from salient sentences
//! - **Grouping**: base categories by keyword, emergent ones by clustering
//! - **Synthesis**: one theme per group with subthemes and quotes
//! - **Comparative**: code prevalence across metadata dimensions

pub mod comparative;
pub mod familiarization;
pub mod grouper;
pub mod open_coder;
pub mod synthesis;

pub use comparative::{compare_dimension, comparative_synthesis, Dimension};
pub use familiarization::{detect_interlocutors, familiarization, familiarize};
pub use grouper::{assign_base, discover_emergent, group_categories, BaseAssignment};
pub use open_coder::{coding_vocabulary, open_coding};
pub use synthesis::{synthesize_theme, thematic_synthesis};
