//! Pipeline orchestration.
//!
//! Runs the coding stages in order and assembles one [`Analysis`]:
//! familiarization, open coding, category grouping, thematic synthesis and
//! comparative synthesis. Every stage is a pure function of its inputs; the
//! only source of variation between runs is the random generator used to
//! seed emergent clustering.

use std::time::Instant;

use rand::Rng;
use thema_types::{Analysis, BaseCategory, Document, PipelineConfig};

use crate::coding::{
    comparative_synthesis, familiarization, group_categories, open_coding, thematic_synthesis,
};

/// Configured entry point for analysis runs.
///
/// # Example
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use thema_core::pipeline::ThematicPipeline;
/// use thema_types::{BaseCategory, Document};
///
/// let docs = [Document::new(1, "e1.txt", "La comunidad enfrenta un problema serio de acceso al agua potable.")];
/// let base = [BaseCategory::new("Acceso", ["problema"])];
///
/// let analysis = ThematicPipeline::new().run_with_rng(&docs, &base, &mut StdRng::seed_from_u64(7));
/// assert_eq!(analysis.open_codes.len(), 1);
/// assert_eq!(analysis.themes.len(), analysis.grouped.len());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ThematicPipeline {
    config: PipelineConfig,
}

impl ThematicPipeline {
    /// Pipeline with default tunables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline with explicit tunables.
    pub fn with_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Active tunables.
    #[inline]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the analysis with an unseeded generator. Emergent categories may
    /// differ between calls; use [`run_with_rng`](Self::run_with_rng) for
    /// reproducible output.
    pub fn run(&self, docs: &[Document], base: &[BaseCategory]) -> Analysis {
        self.run_with_rng(docs, base, &mut rand::rng())
    }

    /// Runs the analysis drawing k-means seeds from `rng`.
    pub fn run_with_rng<R>(&self, docs: &[Document], base: &[BaseCategory], rng: &mut R) -> Analysis
    where
        R: Rng + ?Sized,
    {
        let started = Instant::now();
        let config = &self.config;

        let familiarization = familiarization(docs, config);
        let open_codes = open_coding(docs, config);
        let grouped = group_categories(&open_codes, base, config, rng);
        let themes = thematic_synthesis(&grouped, config);
        let comparative = comparative_synthesis(docs, &open_codes, config);

        let analysis = Analysis {
            docs: docs.to_vec(),
            familiarization,
            open_codes,
            grouped,
            themes,
            comparative,
        };

        tracing::info!(
            stats = %analysis.stats(),
            base_categories = base.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "analysis finished"
        );
        analysis
    }
}

/// Runs the full analysis with default tunables and an unseeded generator.
pub fn run_full_analysis(docs: &[Document], base: &[BaseCategory]) -> Analysis {
    ThematicPipeline::new().run(docs, base)
}
