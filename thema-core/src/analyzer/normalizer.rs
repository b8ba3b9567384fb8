use unicode_normalization::char::decompose_canonical;

/// Output byte for each ASCII input byte.
///
/// Uppercase letters fold to lowercase; letters, digits, whitespace and
/// `. , : ; - _` pass through; everything else becomes a space.
static ASCII_FOLD: [u8; 128] = build_ascii_fold();

const fn build_ascii_fold() -> [u8; 128] {
    let mut table = [b' '; 128];
    let mut i = 0;
    while i < 128 {
        let b = i as u8;
        table[i] = match b {
            b'A'..=b'Z' => b + 32,
            b'a'..=b'z' | b'0'..=b'9' => b,
            b'.' | b',' | b':' | b';' | b'-' | b'_' => b,
            b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r' => b,
            _ => b' ',
        };
        i += 1;
    }
    table
}

#[inline(always)]
const fn is_combining_mark(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036F}')
}

/// Lowercasing, diacritic-stripping normalizer.
///
/// Performs the following operations:
/// - Converts all characters to lowercase (Unicode-aware)
/// - Applies canonical decomposition and drops combining marks, so "acción" becomes "accion"
/// - Replaces every character outside `[a-z0-9 . , : ; - _]` and whitespace with a space
///
/// Whitespace is kept as-is; splitting is the tokenizer's job. The output is
/// pure ASCII apart from non-ASCII whitespace, and normalizing it again is a no-op.
///
/// # Performance
///
/// ASCII runs go through a 128-entry lookup table. Only non-ASCII characters
/// pay for lowercase expansion and decomposition.
///
/// # Examples
///
/// ```
/// use thema_core::analyzer::TextNormalizer;
///
/// let normalizer = TextNormalizer::new();
/// assert_eq!(normalizer.normalize("Gestión ÚNICA!"), "gestion unica ");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    /// Creates a normalizer.
    pub const fn new() -> Self {
        Self
    }

    /// Normalizes text into an existing String buffer.
    ///
    /// Clears the buffer before writing and reuses its capacity.
    #[inline]
    pub fn normalize_into(&self, input: &str, out: &mut String) {
        out.clear();
        out.reserve(input.len());

        let mut rest = input;
        while !rest.is_empty() {
            let ascii_len = rest
                .bytes()
                .position(|b| !b.is_ascii())
                .unwrap_or(rest.len());
            let (ascii, tail) = rest.split_at(ascii_len);
            out.extend(ascii.bytes().map(|b| ASCII_FOLD[b as usize] as char));

            let mut chars = tail.chars();
            match chars.next() {
                Some(ch) => {
                    for lowered in ch.to_lowercase() {
                        decompose_canonical(lowered, |c| push_folded(c, out));
                    }
                    rest = chars.as_str();
                }
                None => break,
            }
        }
    }

    /// Normalizes text and returns a new String.
    #[inline]
    pub fn normalize(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        self.normalize_into(input, &mut out);
        out
    }
}

#[inline(always)]
fn push_folded(c: char, out: &mut String) {
    if c.is_ascii() {
        out.push(ASCII_FOLD[c as usize] as char);
    } else if is_combining_mark(c) {
        // dropped
    } else if c.is_whitespace() {
        out.push(c);
    } else {
        out.push(' ');
    }
}

/// Normalizes `input` with a default [`TextNormalizer`].
#[inline]
pub fn normalize(input: &str) -> String {
    TextNormalizer::new().normalize(input)
}
