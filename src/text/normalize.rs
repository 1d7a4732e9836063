use once_cell::sync::Lazy;
use regex::Regex;

static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s.,!?;:\-()]").unwrap());

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static REPEATED_TERMINAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{2,}|!{2,}|\?{2,}").unwrap());

/// Canonicalizes raw document text before segmentation or model input.
///
/// Characters outside word characters, whitespace and `. , ! ? ; : - ( )`
/// are dropped, whitespace runs become a single space and repeated
/// terminal punctuation (`...`, `!!`, `??`) collapses to one mark.
pub fn normalize(text: &str) -> String {
    let stripped = UNSAFE_CHARS.replace_all(text, "");
    let collapsed = WHITESPACE_RUN.replace_all(&stripped, " ");
    let deduped = REPEATED_TERMINAL.replace_all(&collapsed, |caps: &regex::Captures| {
        caps[0][..1].to_string()
    });
    deduped.trim().to_string()
}

/// Whitespace-delimited word count, the unit used by the minimum-input check.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
