use crate::errors::SummarizeError;
use crate::text::Sentence;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

static NAIVE_SENTENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?]*[.!?]+|[^.!?]+").unwrap());

/// Sentence-boundary detector. Returns raw fragments in document order;
/// trimming and indexing happen in [`segment`].
pub trait SentenceSplitter: Send + Sync {
    fn split<'a>(&self, text: &'a str) -> Result<Vec<&'a str>, SummarizeError>;
}

/// Unicode (UAX #29) sentence boundaries.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnicodeSplitter;

impl SentenceSplitter for UnicodeSplitter {
    fn split<'a>(&self, text: &'a str) -> Result<Vec<&'a str>, SummarizeError> {
        // `USentenceBounds::size_hint` underflows on blank input.
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        for sentence in text.unicode_sentences() {
            out.push(sentence);
        }
        Ok(out)
    }
}

/// Splits after runs of `.`, `!` or `?`. No abbreviation handling.
#[derive(Debug, Default, Clone, Copy)]
pub struct PunctuationSplitter;

impl SentenceSplitter for PunctuationSplitter {
    fn split<'a>(&self, text: &'a str) -> Result<Vec<&'a str>, SummarizeError> {
        Ok(NAIVE_SENTENCE.find_iter(text).map(|m| m.as_str()).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SplitterKind {
    #[default]
    Unicode,
    Punctuation,
}

pub fn build_splitter(kind: SplitterKind) -> Arc<dyn SentenceSplitter> {
    match kind {
        SplitterKind::Unicode => Arc::new(UnicodeSplitter),
        SplitterKind::Punctuation => Arc::new(PunctuationSplitter),
    }
}

/// Splits `text` into trimmed, non-empty sentences numbered from zero.
pub fn segment(
    text: &str,
    splitter: &dyn SentenceSplitter,
) -> Result<Vec<Sentence>, SummarizeError> {
    let sentences = splitter
        .split(text)?
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(index, s)| Sentence::new(index, s))
        .collect();
    Ok(sentences)
}
