use crate::text::{join_sentences, Sentence};

/// Unit in which chunk budgets are measured. Chosen by the caller, never inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LengthUnit {
    Characters,
    Words,
}

impl LengthUnit {
    pub fn measure(self, text: &str) -> usize {
        match self {
            LengthUnit::Characters => text.chars().count(),
            LengthUnit::Words => text.split_whitespace().count(),
        }
    }

    // Cost of the single space placed between two joined sentences.
    fn separator(self) -> usize {
        match self {
            LengthUnit::Characters => 1,
            LengthUnit::Words => 0,
        }
    }
}

/// Consecutive sentences processed as one unit by a length-limited model.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub sentences: Vec<Sentence>,
}

impl Chunk {
    pub fn text(&self) -> String {
        join_sentences(&self.sentences)
    }
}

/// Greedily packs sentences into chunks whose measured length stays below
/// `budget`. A sentence that alone reaches the budget becomes its own chunk.
pub fn chunk(sentences: &[Sentence], budget: usize, unit: LengthUnit) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current: Vec<Sentence> = Vec::new();
    let mut current_len = 0usize;

    for sentence in sentences {
        let len = unit.measure(&sentence.text);
        if current.is_empty() {
            current.push(sentence.clone());
            current_len = len;
            continue;
        }
        let candidate = current_len + unit.separator() + len;
        if candidate < budget {
            current.push(sentence.clone());
            current_len = candidate;
        } else {
            chunks.push(Chunk {
                sentences: std::mem::take(&mut current),
            });
            current.push(sentence.clone());
            current_len = len;
        }
    }
    if !current.is_empty() {
        chunks.push(Chunk { sentences: current });
    }
    chunks
}
