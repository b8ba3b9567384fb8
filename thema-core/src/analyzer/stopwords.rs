//! Fixed Spanish stopword list.
//!
//! Entries are kept verbatim, accents included. Tokens reaching the lookup
//! are already diacritic-free, so the accented entries never match; changing
//! that would shift every downstream ranking.

use std::sync::LazyLock;

use rustc_hash::FxHashSet;

/// Spanish function words excluded from feature extraction.
pub const SPANISH_STOPWORDS: [&str; 165] = [
    "de", "la", "y", "que", "el", "en", "los", "se", "del", "las", "por", "un", "para", "con",
    "no", "una", "su", "al", "lo", "como", "más", "pero", "sus", "le", "ya", "o", "este", "sí",
    "porque", "esta", "entre", "cuando", "muy", "sin", "sobre", "también", "me", "hasta", "hay",
    "donde", "quien", "desde", "todo", "nos", "durante", "todos", "uno", "les", "ni", "contra",
    "otros", "ese", "eso", "ante", "ellos", "e", "esto", "mí", "antes", "algunos", "qué",
    "unos", "yo", "otro", "otras", "otra", "él", "tanto", "esa", "estos", "mucho", "quienes",
    "nada", "muchos", "cual", "poco", "ella", "estar", "estas", "algunas", "algo", "nosotros",
    "mi", "mis", "tú", "te", "ti", "tu", "tus", "ellas", "nosotras", "vosostros", "vosostras",
    "os", "mío", "mía", "míos", "mías", "tuyo", "tuya", "tuyos", "tuyas", "suyo", "suya",
    "suyos", "suyas", "nuestro", "nuestra", "nuestros", "nuestras", "vuestro", "vuestra",
    "vuestros", "vuestras", "esos", "esas", "estoy", "estás", "está", "estamos", "estáis",
    "están", "esté", "estés", "estemos", "estéis", "estén", "estaré", "estarás", "estará",
    "estaremos", "estaréis", "estarán", "estaría", "estarías", "estaríamos", "estaríais",
    "estarían", "estaba", "estabas", "estábamos", "estabais", "estaban", "estuve", "estuviste",
    "estuvo", "estuvimos", "estuvisteis", "estuvieron", "estuviera", "estuvieras",
    "estuviéramos", "estuvierais", "estuvieran", "estuviese", "estuvieses", "estuviésemos",
    "estuvieseis", "estuviesen", "estando", "estado", "estada", "estados", "estadas", "estad",
];

static STOPWORDS: LazyLock<FxHashSet<&'static str>> =
    LazyLock::new(|| SPANISH_STOPWORDS.iter().copied().collect());

/// Returns `true` if `token` is in the stopword set.
#[inline]
pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_words_are_stopwords() {
        for w in ["de", "que", "porque", "nosotros", "estuvieron"] {
            assert!(is_stopword(w), "{w}");
        }
    }

    #[test]
    fn content_words_are_not_stopwords() {
        for w in ["acceso", "problema", "salud", "comunidad"] {
            assert!(!is_stopword(w), "{w}");
        }
    }

    #[test]
    fn list_has_no_duplicates() {
        let set: FxHashSet<_> = SPANISH_STOPWORDS.iter().collect();
        assert_eq!(set.len(), SPANISH_STOPWORDS.len());
    }

    #[test]
    fn lookup_is_exact() {
        assert!(is_stopword("también"));
        assert!(!is_stopword("tambien"));
        assert!(!is_stopword("De"));
    }
}
