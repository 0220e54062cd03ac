//! Text normalization: lowercase, drop punctuation, split, remove French stopwords and short tokens.

/// French function words ignored when comparing questions.
pub const STOPWORDS_FR: &[&str] = &[
    "le", "la", "les", "un", "une", "des", "de", "du", "au", "aux",
    "et", "ou", "mais", "donc", "or", "ni", "car",
    "est", "ce", "se", "mon", "ma", "mes", "ton", "ta", "tes",
    "je", "tu", "il", "elle", "nous", "vous", "ils", "elles",
    "ai", "as", "a", "ont", "été", "être", "avoir", "suis",
    "que", "qui", "quoi", "dont", "où",
    "pour", "dans", "sur", "avec", "sans", "sous", "par",
    "plus", "moins", "très", "bien", "comme", "même",
];

/// Tokens with this many characters or fewer are dropped.
const MIN_TOKEN_CHARS: usize = 2;

/// Word characters survive (Unicode alphanumerics and `_`), as does whitespace. Everything else is punctuation.
fn is_kept(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c.is_whitespace()
}

/// Normalizes `text` into content tokens, preserving their order.
///
/// Never fails; punctuation-only or stopword-only input yields an empty list.
pub fn normalize(text: &str) -> Vec<String> {
    let cleaned: String = text.to_lowercase().chars().filter(|c| is_kept(*c)).collect();
    cleaned
        .split_whitespace()
        .filter(|word| !STOPWORDS_FR.contains(word))
        .filter(|word| word.chars().count() > MIN_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}

/// Like [`normalize`], but a missing value (e.g. an empty CSV cell read as `None`) yields no tokens.
pub fn normalize_opt(text: Option<&str>) -> Vec<String> {
    text.map(normalize).unwrap_or_default()
}
