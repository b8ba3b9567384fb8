//! Sentence splitting.
//!
//! A sentence ends at `.`, `!` or `?` followed by whitespace, or at a
//! newline. Pieces are trimmed and empty pieces dropped. The splitter works
//! on raw text; quotes keep their original casing and accents.

use memchr::{memchr3_iter, memchr_iter};

/// Splits raw text into trimmed, non-empty sentences.
///
/// # Example
///
/// ```
/// use thema_core::analyzer::split_sentences;
///
/// let s = split_sentences("Hola. ¿Cómo está?\n\nBien!Gracias");
/// assert_eq!(s, vec!["Hola.", "¿Cómo está?", "Bien!Gracias"]);
/// ```
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut line_start = 0usize;

    for end in memchr_iter(b'\n', text.as_bytes()).chain(core::iter::once(text.len())) {
        split_line(&text[line_start..end], &mut out);
        line_start = end + 1;
    }

    out
}

fn split_line<'a>(line: &'a str, out: &mut Vec<&'a str>) {
    let mut start = 0usize;

    for p in memchr3_iter(b'.', b'!', b'?', line.as_bytes()) {
        // terminators are ASCII, so `p + 1` is a char boundary
        let cut = p + 1;
        if line[cut..].starts_with(char::is_whitespace) {
            push_trimmed(&line[start..cut], out);
            start = cut;
        }
    }

    push_trimmed(&line[start..], out);
}

#[inline]
fn push_trimmed<'a>(piece: &'a str, out: &mut Vec<&'a str>) {
    let piece = piece.trim();
    if !piece.is_empty() {
        out.push(piece);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_terminators_followed_by_space() {
        assert_eq!(
            split_sentences("Primera frase. Segunda frase! Tercera? Cuarta"),
            vec!["Primera frase.", "Segunda frase!", "Tercera?", "Cuarta"]
        );
    }

    #[test]
    fn terminator_without_space_does_not_split() {
        assert_eq!(split_sentences("versión 2.5 del plan"), vec!["versión 2.5 del plan"]);
        assert_eq!(split_sentences("fin."), vec!["fin."]);
    }

    #[test]
    fn splits_on_newlines_and_drops_blanks() {
        assert_eq!(
            split_sentences("uno\n\n  dos  \r\n\ntres\n"),
            vec!["uno", "dos", "tres"]
        );
    }

    #[test]
    fn repeated_terminators_split_after_last() {
        assert_eq!(split_sentences("¿En serio?! Sí."), vec!["¿En serio?!", "Sí."]);
    }

    #[test]
    fn whitespace_run_after_terminator_is_consumed() {
        assert_eq!(split_sentences("a.   \t b."), vec!["a.", "b."]);
    }

    #[test]
    fn unicode_whitespace_counts() {
        assert_eq!(split_sentences("uno.\u{00A0}dos"), vec!["uno.", "dos"]);
    }

    #[test]
    fn empty_and_blank_input() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences(" \n \n").is_empty());
    }

    #[test]
    fn sentences_are_slices_of_input() {
        let input = String::from("Hola. Adiós.");
        let base = input.as_ptr() as usize;
        for s in split_sentences(&input) {
            let ptr = s.as_ptr() as usize;
            assert!(ptr >= base && ptr < base + input.len());
        }
    }
}
