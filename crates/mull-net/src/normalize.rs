use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Drop accents by decomposing to NFD and removing combining marks, so
/// `Malmö` becomes `Malmo` and `São Paulo` becomes `Sao Paulo`.
pub fn strip_accents(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}
