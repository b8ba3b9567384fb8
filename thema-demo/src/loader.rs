//! Transcript loading: `.txt` files from a directory plus heuristic metadata.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Context;
use regex::Regex;
use thema_types::{DocId, Document, DocumentMeta};

fn pattern(re: &str) -> Regex {
    Regex::new(re).unwrap_or_else(|e| unreachable!("metadata pattern is valid: {e}"))
}

static COUNTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)pa[ií]s\s*[:\-]\s*([A-Za-zÁÉÍÓÚÑáéíóúñ ]{3,30})"));
static AGE_RE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)edad\s*[:\-]\s*(\d{1,2})"));
static GENDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?i)g[eé]nero\s*[:\-]\s*(masculino|femenino|hombre|mujer|no binario)")
});
static ROLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?i)(entrevistador|entrevistadora|entrevistado|entrevistada|moderador|participante)\s*[:\-]")
});
static LOCALITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?i)(ciudad|localidad|municipio)\s*[:\-]\s*([A-Za-zÁÉÍÓÚÑáéíóúñ ]{2,40})")
});

fn capture(re: &Regex, text: &str, group: usize) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(group))
        .map(|m| m.as_str().trim().to_owned())
        .filter(|s| !s.is_empty())
}

/// Extracts `País:`, `Edad:`, `Género:`, `Ciudad:` style headers and the
/// first speaker role. The first match of each field wins.
pub fn detect_metadata(text: &str) -> DocumentMeta {
    DocumentMeta {
        country: capture(&COUNTRY_RE, text, 1),
        gender: capture(&GENDER_RE, text, 1).map(|g| g.to_lowercase()),
        age: capture(&AGE_RE, text, 1).and_then(|a| a.parse().ok()),
        locality: capture(&LOCALITY_RE, text, 2),
        role: capture(&ROLE_RE, text, 1).map(|r| r.to_lowercase()),
    }
}

fn is_transcript(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("txt"))
}

/// Loads every `.txt` file directly under `dir`, sorted by file name.
pub fn load_dir(dir: &Path) -> anyhow::Result<Vec<Document>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("failed to read transcript directory {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<_, _>>()
        .with_context(|| format!("failed to list {}", dir.display()))?;
    paths.retain(|p| is_transcript(p));
    paths.sort();

    let mut docs = Vec::with_capacity(paths.len());
    for (id, path) in paths.iter().enumerate() {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let meta = detect_metadata(&text);
        tracing::debug!(doc = %name, bytes = text.len(), ?meta, "loaded transcript");
        docs.push(Document::new(id as DocId, name, text).with_meta(meta));
    }

    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn detects_header_fields() {
        let text = "País: Perú\nCiudad: Cusco\nEdad: 34\nGénero: Femenino\n\nEntrevistadora: buenos días";
        assert_eq!(
            detect_metadata(text),
            DocumentMeta {
                country: Some("Perú".into()),
                gender: Some("femenino".into()),
                age: Some(34),
                locality: Some("Cusco".into()),
                role: Some("entrevistadora".into()),
            }
        );
    }

    #[test]
    fn missing_fields_stay_empty() {
        assert_eq!(detect_metadata("solo texto libre"), DocumentMeta::default());
    }

    #[test]
    fn age_takes_at_most_two_digits() {
        assert_eq!(detect_metadata("edad - 105").age, Some(10));
    }

    #[test]
    fn loads_only_txt_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "País: Chile\nsegundo").unwrap();
        fs::write(dir.path().join("a.TXT"), "primero").unwrap();
        fs::write(dir.path().join("notas.md"), "ignorado").unwrap();
        fs::create_dir(dir.path().join("sub.txt")).unwrap();

        let docs = load_dir(dir.path()).unwrap();
        let names: Vec<_> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a.TXT", "b.txt"]);
        assert_eq!(docs[0].id, 0);
        assert_eq!(docs[1].id, 1);
        assert_eq!(docs[1].meta.country.as_deref(), Some("Chile"));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dir(&dir.path().join("nope")).unwrap_err();
        assert!(err.to_string().contains("failed to read transcript directory"));
    }
}
