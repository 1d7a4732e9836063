//! Lexical sentence extraction, used when no generative backend is loaded
//! and as the per-chunk substitute when a backend call fails.

use crate::text::Sentence;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use unicode_segmentation::UnicodeSegmentation;

// English stopword list (NLTK corpus).
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
        "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his",
        "himself", "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself",
        "they", "them", "their", "theirs", "themselves", "what", "which", "who", "whom", "this",
        "that", "that'll", "these", "those", "am", "is", "are", "was", "were", "be", "been",
        "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an", "the",
        "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by", "for",
        "with", "about", "against", "between", "into", "through", "during", "before", "after",
        "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
        "again", "further", "then", "once", "here", "there", "when", "where", "why", "how",
        "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
        "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can",
        "will", "just", "don", "don't", "should", "should've", "now", "d", "ll", "m", "o", "re",
        "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn", "didn't", "doesn",
        "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn", "isn't", "ma",
        "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
        "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
        "wouldn't",
    ]
    .into_iter()
    .collect()
});

/// How sentences are ranked before the top ones are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoringPolicy {
    #[default]
    /// Sum of document-wide frequencies of the sentence's content words.
    Frequency,
    /// Word count, halved outside `[10, 50]` words, optionally plus a
    /// bonus for earlier sentences.
    LengthHeuristic { position_bonus: bool },
}

/// Lowercased alphanumeric tokens that are not stopwords.
fn content_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.unicode_words()
        .map(str::to_lowercase)
        .filter(|w| w.chars().all(char::is_alphanumeric))
        .filter(|w| !STOP_WORDS.contains(w.as_str()))
}

fn frequency_scores(sentences: &[Sentence]) -> Vec<f64> {
    let mut freq: HashMap<String, usize> = HashMap::new();
    for sentence in sentences {
        for word in content_words(&sentence.text) {
            *freq.entry(word).or_insert(0) += 1;
        }
    }
    sentences
        .iter()
        .map(|s| {
            content_words(&s.text)
                .map(|w| freq.get(&w).copied().unwrap_or(0))
                .sum::<usize>() as f64
        })
        .collect()
}

fn length_scores(sentences: &[Sentence], position_bonus: bool) -> Vec<f64> {
    let total = sentences.len();
    sentences
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let words = s.word_count() as f64;
            let mut score = if (10.0..=50.0).contains(&words) {
                words
            } else {
                words * 0.5
            };
            if position_bonus {
                score += (total - i) as f64 * 0.1;
            }
            score
        })
        .collect()
}

/// One non-negative score per sentence, aligned with the input slice.
pub fn score(sentences: &[Sentence], policy: ScoringPolicy) -> Vec<f64> {
    match policy {
        ScoringPolicy::Frequency => frequency_scores(sentences),
        ScoringPolicy::LengthHeuristic { position_bonus } => length_scores(sentences, position_bonus),
    }
}

/// Keeps the `count` best-scoring sentences, emitted in document order.
/// Input that already fits in `count` sentences is returned unchanged.
pub fn extract(sentences: &[Sentence], count: usize, policy: ScoringPolicy) -> Vec<Sentence> {
    let count = count.max(1);
    if sentences.len() <= count {
        return sentences.to_vec();
    }

    let scores = score(sentences, policy);
    let mut ranked: Vec<(usize, f64)> = scores.into_iter().enumerate().collect();
    // Stable sort keeps earlier sentences ahead on ties.
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut keep: Vec<usize> = ranked.into_iter().take(count).map(|(i, _)| i).collect();
    keep.sort_unstable();
    keep.into_iter().map(|i| sentences[i].clone()).collect()
}

/// Number of sentences kept when a whole document is summarized extractively.
pub fn fallback_count(total_sentences: usize) -> usize {
    (total_sentences / 10).max(3)
}
