use lazy_static::lazy_static;
use regex::Regex;

/// Words shorter than this are neither indexed nor valid query terms.
pub const MIN_WORD_LEN: usize = 3;

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"[A-Za-z]+").expect("valid regex");
}

/// Extract the alphabetic runs of `text`, in order, unnormalized.
pub fn extract_words(text: &str) -> Vec<String> {
    WORD_RE.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// Lowercase a word for indexing and querying.
pub fn normalize(word: &str) -> String {
    word.to_lowercase()
}
