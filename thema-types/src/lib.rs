//! Core types for the Thema qualitative analysis pipeline.
//!
//! This crate holds the records that flow between the analysis core and its
//! consumers (loaders, renderers, exporters). Keeping them separate ensures:
//!
//! - **Stable contracts**: renderers depend on the data model, not the algorithms
//! - **Explicit shapes**: every entity is a tagged record with named fields
//! - **Clean boundaries**: no algorithmic code lives here
//!
//! All records serialize with camelCase keys, so an [`Analysis`] renders as
//! `{docs, familiarization, openCodes, grouped, themes, comparative}`.

#![warn(missing_docs)]

use core::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Document identifier assigned by the loader.
pub type DocId = u32;

/// Label prefix shared by every emergent (clustered) category.
pub const EMERGENT_PREFIX: &str = "Emergente";

/// Optional metadata extracted from a transcript by the loader.
///
/// Missing fields exclude the document from the comparative dimensions
/// that need them; they never abort a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentMeta {
    /// Country of the participant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Declared gender.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Age in years.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// City, municipality or locality.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    /// Interlocutor role (interviewer, participant, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// A decoded transcript. Immutable input to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Loader-assigned identifier.
    pub id: DocId,
    /// Display name, usually the source file name. Used as the join key in codes.
    pub name: String,
    /// Full decoded text.
    pub text: String,
    /// Extracted metadata.
    #[serde(default)]
    pub meta: DocumentMeta,
}

impl Document {
    /// Creates a document without metadata.
    pub fn new(id: DocId, name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            text: text.into(),
            meta: DocumentMeta::default(),
        }
    }

    /// Attaches metadata to the document.
    #[must_use]
    pub fn with_meta(mut self, meta: DocumentMeta) -> Self {
        self.meta = meta;
        self
    }
}

/// A quote-anchored code extracted from one sentence of a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenCode {
    /// Name of the source document.
    pub doc: String,
    /// The vocabulary n-gram that matched the sentence.
    pub code: String,
    /// The full original sentence.
    pub quote: String,
}

/// A researcher-supplied category: a label plus optional synonyms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseCategory {
    /// Category label, also matched as a keyword.
    pub label: String,
    /// Extra keywords that route codes into this category.
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl BaseCategory {
    /// Creates a base category.
    pub fn new<I, S>(label: impl Into<String>, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.into(),
            synonyms: synonyms.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses the line format `label | synonym | synonym`.
    ///
    /// One category per line. Blank lines are skipped, fields are trimmed and
    /// empty fields dropped. A non-blank line with no usable field is an error.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryParseError::EmptyLine`] with the 1-based line number.
    ///
    /// # Example
    ///
    /// ```
    /// use thema_types::BaseCategory;
    ///
    /// let cats = BaseCategory::parse_list("Acceso | problema | barrera\nSalud").unwrap();
    /// assert_eq!(cats.len(), 2);
    /// assert_eq!(cats[0].synonyms, vec!["problema", "barrera"]);
    /// assert!(cats[1].synonyms.is_empty());
    /// ```
    pub fn parse_list(text: &str) -> Result<Vec<Self>, CategoryParseError> {
        let mut out = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split('|').map(str::trim).filter(|f| !f.is_empty());
            let label = fields
                .next()
                .ok_or(CategoryParseError::EmptyLine { line: idx + 1 })?;
            out.push(Self::new(label, fields));
        }
        Ok(out)
    }
}

/// A group of codes under one category label.
///
/// Base groups carry the synonyms they were configured with; emergent groups
/// carry none and are labelled with [`EMERGENT_PREFIX`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    /// Category label. The label is the join key with [`Theme::theme`].
    pub category: String,
    /// Synonyms of the base category (empty for emergent groups).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
    /// Member codes in assignment order.
    pub codes: Vec<OpenCode>,
}

impl CategoryGroup {
    /// Returns `true` if this group was discovered by clustering.
    #[inline]
    #[must_use]
    pub fn is_emergent(&self) -> bool {
        self.category.starts_with(EMERGENT_PREFIX)
    }
}

/// A representative quote attached to a theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRef {
    /// Sentence text.
    pub text: String,
    /// Source document name.
    pub doc: String,
}

/// The synthesized unit built from one category group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    /// Equals the label of the originating [`CategoryGroup`].
    pub theme: String,
    /// Most frequent phrases across the group's quotes.
    pub subthemes: Vec<String>,
    /// First quotes of the group in insertion order.
    pub quotes: Vec<QuoteRef>,
}

/// Code prevalence across the values of one metadata dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparativeFinding {
    /// Dimension label, e.g. `Por país`.
    pub dimension: String,
    /// One `value: term, term, term` entry per bucket, joined with ` — `.
    pub findings: String,
}

/// Lightweight per-document overview produced before coding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Familiarization {
    /// Source document name.
    pub doc: String,
    /// Frequent terms, detected interlocutors and available metadata.
    pub summary: String,
    /// Leading sentences of the document.
    pub sentences: Vec<String>,
}

/// Complete output of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    /// The input documents.
    pub docs: Vec<Document>,
    /// One overview per document.
    pub familiarization: Vec<Familiarization>,
    /// Deduplicated open codes in extraction order.
    pub open_codes: Vec<OpenCode>,
    /// Base groups (supplied order) followed by emergent groups.
    pub grouped: Vec<CategoryGroup>,
    /// One theme per group, same order as `grouped`.
    pub themes: Vec<Theme>,
    /// Cross-document findings per metadata dimension.
    pub comparative: Vec<ComparativeFinding>,
}

impl Analysis {
    /// Renames an emergent category in `grouped` and `themes` together.
    ///
    /// Validation happens before any mutation, so either both collections
    /// reflect the new label or neither does. Returns the number of records
    /// updated; renaming a label to itself is a no-op returning 0.
    ///
    /// Every group and theme carrying `old` is renamed, including distinct
    /// emergent clusters that ended up with the same label.
    ///
    /// # Errors
    ///
    /// - [`RenameError::EmptyLabel`] if `new` is blank
    /// - [`RenameError::UnknownCategory`] if no group carries `old`
    /// - [`RenameError::NotEmergent`] if `old` names a base category
    /// - [`RenameError::LabelTaken`] if another group already uses `new`
    pub fn rename_category(&mut self, old: &str, new: &str) -> Result<usize, RenameError> {
        let new = new.trim();
        if new.is_empty() {
            return Err(RenameError::EmptyLabel);
        }

        let group = self
            .grouped
            .iter()
            .find(|g| g.category == old)
            .ok_or_else(|| RenameError::UnknownCategory(old.to_owned()))?;
        if !group.is_emergent() {
            return Err(RenameError::NotEmergent(old.to_owned()));
        }
        if new == old {
            return Ok(0);
        }
        if self.grouped.iter().any(|g| g.category == new) {
            return Err(RenameError::LabelTaken(new.to_owned()));
        }

        let mut changed = 0;
        for g in self.grouped.iter_mut().filter(|g| g.category == old) {
            g.category = new.to_owned();
            changed += 1;
        }
        for t in self.themes.iter_mut().filter(|t| t.theme == old) {
            t.theme = new.to_owned();
            changed += 1;
        }
        Ok(changed)
    }

    /// Returns a copy without the listed emergent categories.
    ///
    /// Base categories are never dropped. Themes are kept only while their
    /// label still appears among the remaining groups.
    #[must_use]
    pub fn without_emergent<S: AsRef<str>>(&self, removed: &[S]) -> Self {
        let is_removed = |label: &str| removed.iter().any(|r| r.as_ref() == label);

        let grouped: Vec<CategoryGroup> = self
            .grouped
            .iter()
            .filter(|g| !(g.is_emergent() && is_removed(&g.category)))
            .cloned()
            .collect();
        let themes = self
            .themes
            .iter()
            .filter(|t| grouped.iter().any(|g| g.category == t.theme))
            .cloned()
            .collect();

        Self {
            grouped,
            themes,
            ..self.clone()
        }
    }

    /// Occurrences of each open code, in first-seen order, skipping the
    /// codes listed in `removed`.
    ///
    /// # Example
    ///
    /// ```
    /// use thema_types::{Analysis, OpenCode};
    ///
    /// let code = |c: &str| OpenCode { doc: "a.txt".into(), code: c.into(), quote: String::new() };
    /// let analysis = Analysis {
    ///     open_codes: vec![code("agua"), code("pozo"), code("agua")],
    ///     ..Default::default()
    /// };
    /// assert_eq!(analysis.code_counts::<&str>(&[]), vec![("agua".to_owned(), 2), ("pozo".to_owned(), 1)]);
    /// assert_eq!(analysis.code_counts(&["agua"]), vec![("pozo".to_owned(), 1)]);
    /// ```
    #[must_use]
    pub fn code_counts<S: AsRef<str>>(&self, removed: &[S]) -> Vec<(String, usize)> {
        let mut slots: FxHashMap<&str, usize> = FxHashMap::default();
        let mut out: Vec<(String, usize)> = Vec::new();

        for c in &self.open_codes {
            let code = c.code.as_str();
            if removed.iter().any(|r| r.as_ref() == code) {
                continue;
            }
            match slots.get(code) {
                Some(&slot) => out[slot].1 += 1,
                None => {
                    slots.insert(code, out.len());
                    out.push((code.to_owned(), 1));
                }
            }
        }

        out
    }

    /// Returns summary counts for this analysis.
    #[must_use]
    pub fn stats(&self) -> AnalysisStats {
        AnalysisStats::from_analysis(self)
    }
}

/// Summary counts of an [`Analysis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStats {
    /// Number of input documents.
    pub documents: usize,
    /// Number of open codes after deduplication.
    pub open_codes: usize,
    /// Number of non-empty category groups.
    pub categories: usize,
    /// How many of those groups are emergent.
    pub emergent_categories: usize,
}

impl AnalysisStats {
    /// Computes stats from an analysis.
    pub fn from_analysis(analysis: &Analysis) -> Self {
        Self {
            documents: analysis.docs.len(),
            open_codes: analysis.open_codes.len(),
            categories: analysis.grouped.len(),
            emergent_categories: analysis.grouped.iter().filter(|g| g.is_emergent()).count(),
        }
    }
}

impl fmt::Display for AnalysisStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} docs, {} codes, {} categories ({} emergent)",
            self.documents, self.open_codes, self.categories, self.emergent_categories
        )
    }
}

/// Per-sentence sentiment counts over a corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentTally {
    /// Sentences with a positive score.
    pub positive: usize,
    /// Sentences scoring zero.
    pub neutral: usize,
    /// Sentences with a negative score.
    pub negative: usize,
    /// All scored sentences.
    pub total: usize,
}

/// Kind of node in the category network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// The single root node.
    Axis,
    /// One per category group.
    Category,
    /// One per theme subtheme.
    Subtheme,
    /// One per distinct code within a category.
    Code,
    /// One per quoted sentence.
    Quote,
}

/// A node of the category network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkNode {
    /// Unique node id, prefixed by kind (`CAT:`, `SUB:`, `COD:`, `CITA:`).
    pub id: String,
    /// Node kind.
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Full quote text for quote nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Source document for quote nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

/// A directed edge between two node ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkLink {
    /// Parent node id.
    pub source: String,
    /// Child node id.
    pub target: String,
}

/// Node/link lists describing the category hierarchy. Layout is left to renderers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkData {
    /// All nodes, root first.
    pub nodes: Vec<NetworkNode>,
    /// All links.
    pub links: Vec<NetworkLink>,
}

/// Tunables of the analysis pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Maximum n-gram order of the open-coding vocabulary.
    pub vocabulary_order: usize,
    /// Number of ranked grams kept in the open-coding vocabulary.
    pub vocabulary_size: usize,
    /// Sentences with fewer filtered tokens are not coded.
    pub min_sentence_tokens: usize,
    /// Characters of the quote that take part in the dedup key.
    pub dedup_quote_prefix: usize,
    /// Unassigned codes per emergent cluster when choosing `k`.
    pub codes_per_cluster: usize,
    /// Upper bound on emergent clusters.
    pub max_emergent_clusters: usize,
    /// Iteration cap for k-means.
    pub kmeans_iterations: usize,
    /// Subthemes kept per theme.
    pub subthemes_per_theme: usize,
    /// Representative quotes kept per theme.
    pub quotes_per_theme: usize,
    /// Terms listed per comparative bucket.
    pub comparative_terms: usize,
    /// Frequent terms listed in a familiarization summary.
    pub familiarization_terms: usize,
    /// Sentences kept in a familiarization record.
    pub familiarization_sentences: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            vocabulary_order: 3,
            vocabulary_size: 60,
            min_sentence_tokens: 6,
            dedup_quote_prefix: 40,
            codes_per_cluster: 20,
            max_emergent_clusters: 5,
            kmeans_iterations: 10,
            subthemes_per_theme: 4,
            quotes_per_theme: 8,
            comparative_terms: 3,
            familiarization_terms: 5,
            familiarization_sentences: 50,
        }
    }
}

impl PipelineConfig {
    /// Number of emergent clusters for `unassigned` leftover codes.
    ///
    /// `round(unassigned / codes_per_cluster)` clamped into `1..=max_emergent_clusters`.
    #[must_use]
    pub fn emergent_k(&self, unassigned: usize) -> usize {
        let per = self.codes_per_cluster.max(1) as f64;
        let k = (unassigned as f64 / per).round() as usize;
        k.clamp(1, self.max_emergent_clusters.max(1))
    }
}

/// Errors from parsing base-category configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryParseError {
    /// A non-blank line had no label after trimming its fields.
    #[error("line {line}: category line has no label")]
    EmptyLine {
        /// 1-based line number.
        line: usize,
    },
}

/// Errors from [`Analysis::rename_category`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenameError {
    /// The new label is empty after trimming.
    #[error("new category label is empty")]
    EmptyLabel,
    /// No group carries the old label.
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    /// The old label names a researcher-supplied category.
    #[error("category '{0}' is a base category and cannot be renamed")]
    NotEmergent(String),
    /// Another group already uses the new label.
    #[error("category label '{0}' is already in use")]
    LabelTaken(String),
}
