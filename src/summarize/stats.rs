use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

/// Size of a summary relative to its source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStats {
    pub original_sentences: usize,
    pub original_chars: usize,
    pub summary_sentences: usize,
    pub summary_chars: usize,
}

impl SummaryStats {
    pub fn compute(original: &str, summary: &str) -> Self {
        Self {
            original_sentences: count_sentences(original),
            original_chars: original.chars().count(),
            summary_sentences: count_sentences(summary),
            summary_chars: summary.chars().count(),
        }
    }

    /// Percentage of characters removed, 0 for empty input.
    pub fn reduction_percent(&self) -> f64 {
        if self.original_chars == 0 {
            return 0.0;
        }
        (1.0 - self.summary_chars as f64 / self.original_chars as f64) * 100.0
    }
}

// Iterated by hand: `USentenceBounds::size_hint` underflows on empty input.
fn count_sentences(text: &str) -> usize {
    if text.trim().is_empty() {
        return 0;
    }
    let mut count = 0;
    for sentence in text.unicode_sentences() {
        if !sentence.trim().is_empty() {
            count += 1;
        }
    }
    count
}
