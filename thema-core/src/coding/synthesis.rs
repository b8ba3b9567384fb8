//! Thematic synthesis: one theme per category group.

use thema_types::{CategoryGroup, PipelineConfig, QuoteRef, Theme};

use crate::analyzer::ngram::top_terms;

/// Builds the theme for one group.
///
/// Subthemes are the top grams of order up to 2 across the group's quotes;
/// quotes are the first `quotes_per_theme` members in insertion order.
pub fn synthesize_theme(group: &CategoryGroup, config: &PipelineConfig) -> Theme {
    let quotes: Vec<&str> = group.codes.iter().map(|c| c.quote.as_str()).collect();
    Theme {
        theme: group.category.clone(),
        subthemes: top_terms(&quotes, 2, config.subthemes_per_theme),
        quotes: group
            .codes
            .iter()
            .take(config.quotes_per_theme)
            .map(|c| QuoteRef {
                text: c.quote.clone(),
                doc: c.doc.clone(),
            })
            .collect(),
    }
}

/// One theme per group, in group order.
pub fn thematic_synthesis(groups: &[CategoryGroup], config: &PipelineConfig) -> Vec<Theme> {
    groups.iter().map(|g| synthesize_theme(g, config)).collect()
}
