use unicode_normalization::UnicodeNormalization;

/// Folds text to 7-bit ASCII: NFKD-decompose, then drop every non-ASCII char.
///
/// Lossy. "é" keeps its base letter, ligatures expand ("ﬁ" → "fi"), while
/// em-dashes, curly quotes, emoji and most non-Latin script vanish.
pub fn to_ascii(text: &str) -> String {
    text.nfkd().filter(char::is_ascii).collect()
}
