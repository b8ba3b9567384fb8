//! Familiarization: a quick per-document overview before coding.

use std::sync::LazyLock;

use rayon::prelude::*;
use regex::Regex;
use thema_types::{Document, DocumentMeta, Familiarization, PipelineConfig};

use crate::analyzer::ngram::top_terms;
use crate::analyzer::sentence::split_sentences;

/// Interlocutor role markers such as `Entrevistadora:` or `participante -`.
static SPEAKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(entrevistador|entrevistadora|moderador|participante|entrevistad[oa])\s*[:\-]")
        .unwrap_or_else(|e| unreachable!("speaker pattern is valid: {e}"))
});

/// Speaker roles scanned per document.
const MAX_SPEAKER_MATCHES: usize = 3;

/// Distinct lowercased roles among the first speaker markers of `text`.
pub fn detect_interlocutors(text: &str) -> Vec<String> {
    let mut roles: Vec<String> = Vec::new();
    for caps in SPEAKER_RE.captures_iter(text).take(MAX_SPEAKER_MATCHES) {
        let role = caps[1].to_lowercase();
        if !roles.contains(&role) {
            roles.push(role);
        }
    }
    roles
}

fn context_line(meta: &DocumentMeta) -> String {
    let mut parts = Vec::new();
    if let Some(v) = &meta.country {
        parts.push(format!("País: {v}"));
    }
    if let Some(v) = &meta.locality {
        parts.push(format!("Localidad: {v}"));
    }
    if let Some(v) = &meta.gender {
        parts.push(format!("Género: {v}"));
    }
    if let Some(v) = meta.age {
        parts.push(format!("Edad: {v}"));
    }
    if let Some(v) = &meta.role {
        parts.push(format!("Rol: {v}"));
    }
    parts.join(" • ")
}

/// Builds the overview of one document.
pub fn familiarize(doc: &Document, config: &PipelineConfig) -> Familiarization {
    let frequent = top_terms(&[doc.text.as_str()], 2, config.familiarization_terms).join(", ");
    let roles = detect_interlocutors(&doc.text).join(", ");

    let summary = format!(
        "Temas frecuentes: {}. Interlocutores: {}. {}",
        if frequent.is_empty() { "—" } else { &frequent },
        if roles.is_empty() { "no detectado" } else { &roles },
        context_line(&doc.meta),
    );

    Familiarization {
        doc: doc.name.clone(),
        summary: summary.trim_end().to_owned(),
        sentences: split_sentences(&doc.text)
            .into_iter()
            .take(config.familiarization_sentences)
            .map(str::to_owned)
            .collect(),
    }
}

/// Overviews for all documents, in input order.
pub fn familiarization(docs: &[Document], config: &PipelineConfig) -> Vec<Familiarization> {
    docs.par_iter().map(|d| familiarize(d, config)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn detects_roles_case_insensitively() {
        let text = "ENTREVISTADORA: hola.\nParticipante - buenos días.\nentrevistadora: gracias";
        assert_eq!(detect_interlocutors(text), vec!["entrevistadora", "participante"]);
    }

    #[test]
    fn only_first_three_markers_are_scanned() {
        let text = "moderador: a\nmoderador: b\nmoderador: c\nparticipante: d";
        assert_eq!(detect_interlocutors(text), vec!["moderador"]);
    }

    #[test]
    fn entrevistado_variants() {
        assert_eq!(detect_interlocutors("Entrevistado : sí"), vec!["entrevistado"]);
        assert_eq!(detect_interlocutors("entrevistada- no"), vec!["entrevistada"]);
        assert!(detect_interlocutors("el entrevistador dijo").is_empty());
    }

    #[test]
    fn summary_with_terms_roles_and_metadata() {
        let meta = DocumentMeta {
            country: Some("Colombia".into()),
            locality: Some("Cali".into()),
            ..Default::default()
        };
        let doc = Document::new(1, "e1.txt", "Entrevistador: agua potable.\nParticipante: agua limpia.")
            .with_meta(meta);
        let f = familiarize(&doc, &PipelineConfig::default());
        assert_eq!(f.doc, "e1.txt");
        assert_eq!(
            f.summary,
            "Temas frecuentes: agua, entrevistador, entrevistador agua, agua potable, potable. \
             Interlocutores: entrevistador, participante. País: Colombia • Localidad: Cali"
        );
        assert_eq!(f.sentences, vec!["Entrevistador: agua potable.", "Participante: agua limpia."]);
    }

    #[test]
    fn summary_placeholders_when_nothing_found() {
        let f = familiarize(&Document::new(1, "vacio.txt", ""), &PipelineConfig::default());
        assert_eq!(f.summary, "Temas frecuentes: —. Interlocutores: no detectado.");
        assert!(f.sentences.is_empty());
    }

    #[test]
    fn sentences_are_capped() {
        let text = (0..80).map(|i| format!("Frase {i}.")).collect::<Vec<_>>().join(" ");
        let f = familiarize(&Document::new(1, "x", text), &PipelineConfig::default());
        assert_eq!(f.sentences.len(), 50);
        assert_eq!(f.sentences[0], "Frase 0.");
    }

    #[test]
    fn keeps_document_order() {
        let docs = [Document::new(1, "a", "uno"), Document::new(2, "b", "dos")];
        let out = familiarization(&docs, &PipelineConfig::default());
        assert_eq!(out.iter().map(|f| f.doc.as_str()).collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
