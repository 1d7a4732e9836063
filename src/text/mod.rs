pub mod chunk;
pub mod normalize;
pub mod segment;

pub use chunk::{chunk, Chunk, LengthUnit};
pub use normalize::{normalize, word_count};
pub use segment::{build_splitter, segment, SentenceSplitter, SplitterKind};

/// A sentence of normalized text and its position in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub index: usize,
    pub text: String,
}

impl Sentence {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

pub fn join_sentences(sentences: &[Sentence]) -> String {
    sentences
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
