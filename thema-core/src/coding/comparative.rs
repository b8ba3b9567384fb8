//! Comparative synthesis across metadata dimensions.

use rustc_hash::{FxHashMap, FxHashSet};
use thema_types::{ComparativeFinding, Document, DocumentMeta, OpenCode, PipelineConfig};

use crate::analyzer::ngram::top_terms;

/// Metadata dimensions compared across documents, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// `meta.country`
    Country,
    /// `meta.gender`
    Gender,
    /// `meta.age`
    Age,
    /// `meta.locality`
    Locality,
}

impl Dimension {
    /// All dimensions in reporting order.
    pub const ALL: [Dimension; 4] = [
        Dimension::Country,
        Dimension::Gender,
        Dimension::Age,
        Dimension::Locality,
    ];

    /// Human-readable dimension label.
    pub const fn label(self) -> &'static str {
        match self {
            Dimension::Country => "Por país",
            Dimension::Gender => "Por género",
            Dimension::Age => "Por edad",
            Dimension::Locality => "Por localidad",
        }
    }

    /// Bucket value of `meta` on this dimension. Missing or empty values yield `None`.
    pub fn value(self, meta: &DocumentMeta) -> Option<String> {
        let text = match self {
            Dimension::Country => meta.country.as_deref(),
            Dimension::Gender => meta.gender.as_deref(),
            Dimension::Locality => meta.locality.as_deref(),
            Dimension::Age => return meta.age.map(|a| a.to_string()),
        };
        text.filter(|s| !s.is_empty()).map(str::to_owned)
    }
}

/// Document names grouped by value, in order of first appearance.
fn buckets<'d>(docs: &'d [Document], dim: Dimension) -> Vec<(String, FxHashSet<&'d str>)> {
    let mut index: FxHashMap<String, usize> = FxHashMap::default();
    let mut out: Vec<(String, FxHashSet<&str>)> = Vec::new();

    for doc in docs {
        let Some(value) = dim.value(&doc.meta) else {
            continue;
        };
        let slot = *index.entry(value.clone()).or_insert_with(|| {
            out.push((value, FxHashSet::default()));
            out.len() - 1
        });
        out[slot].1.insert(doc.name.as_str());
    }

    out
}

/// Compares code prevalence on one dimension, or `None` if fewer than two
/// distinct values are present.
pub fn compare_dimension(
    docs: &[Document],
    codes: &[OpenCode],
    dim: Dimension,
    config: &PipelineConfig,
) -> Option<ComparativeFinding> {
    let buckets = buckets(docs, dim);
    if buckets.len() < 2 {
        return None;
    }

    let findings: Vec<String> = buckets
        .iter()
        .map(|(value, names)| {
            let joined = codes
                .iter()
                .filter(|c| names.contains(c.doc.as_str()))
                .map(|c| c.code.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            let terms = top_terms(&[joined], 2, config.comparative_terms);
            if terms.is_empty() {
                format!("{value}: —")
            } else {
                format!("{value}: {}", terms.join(", "))
            }
        })
        .collect();

    Some(ComparativeFinding {
        dimension: dim.label().to_owned(),
        findings: findings.join(" — "),
    })
}

/// Findings for every dimension with at least two distinct values.
pub fn comparative_synthesis(
    docs: &[Document],
    codes: &[OpenCode],
    config: &PipelineConfig,
) -> Vec<ComparativeFinding> {
    Dimension::ALL
        .iter()
        .filter_map(|&dim| compare_dimension(docs, codes, dim, config))
        .collect()
}
