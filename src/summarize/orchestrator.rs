use crate::document::{self, Document};
use crate::errors::SummarizeError;
use crate::summarize::extractive::{self, ScoringPolicy};
use crate::summarize::{GenerativeBackend, Summary};
use crate::text::{self, LengthUnit, Sentence, SentenceSplitter, SplitterKind};
use std::path::Path;
use std::sync::Arc;

pub const NO_TEXT_MESSAGE: &str = "No text provided for summarization.";
pub const TOO_SHORT_MESSAGE: &str = "Text too short to summarize meaningfully.";
pub const NO_CHUNK_SUMMARIES_MESSAGE: &str = "Error: Could not generate summary from chunks.";

/// What to do with a chunk whose backend call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ChunkFailurePolicy {
    /// Substitute an extractive summary of the chunk.
    #[default]
    Extractive,
    /// Drop the chunk from the combined summary.
    Skip,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub chunk_size: usize,
    pub chunk_unit: LengthUnit,
    /// Normalized length in characters above which input is chunked, and
    /// above which combined chunk summaries are summarized again.
    pub chunk_threshold: usize,
    pub min_words: usize,
    /// Fixed sentence count for whole-document extraction; derived from the
    /// document length when unset.
    pub fallback_sentences: Option<usize>,
    pub chunk_fallback_sentences: usize,
    pub chunk_failure: ChunkFailurePolicy,
    pub scoring: ScoringPolicy,
    pub splitter: SplitterKind,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chunk_size: 1024,
            chunk_unit: LengthUnit::Characters,
            chunk_threshold: 1000,
            min_words: 50,
            fallback_sentences: None,
            chunk_fallback_sentences: 2,
            chunk_failure: ChunkFailurePolicy::Extractive,
            scoring: ScoringPolicy::Frequency,
            splitter: SplitterKind::Unicode,
        }
    }
}

/// Result of one summarization request. Only `Summary` carries model or
/// extracted output; every other variant has a fixed user-facing message.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryOutcome {
    Summary(Summary),
    NoText,
    TooShort { words: usize },
    NoChunkSummaries,
    Failed { reason: String },
}

impl SummaryOutcome {
    pub fn as_text(&self) -> String {
        match self {
            SummaryOutcome::Summary(s) => s.text.clone(),
            SummaryOutcome::NoText => NO_TEXT_MESSAGE.to_string(),
            SummaryOutcome::TooShort { .. } => TOO_SHORT_MESSAGE.to_string(),
            SummaryOutcome::NoChunkSummaries => NO_CHUNK_SUMMARIES_MESSAGE.to_string(),
            SummaryOutcome::Failed { reason } => format!("Error generating summary: {reason}"),
        }
    }

    pub fn summary(&self) -> Option<&Summary> {
        match self {
            SummaryOutcome::Summary(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            SummaryOutcome::NoChunkSummaries | SummaryOutcome::Failed { .. }
        )
    }
}

/// Owns the generative backend (if any) and applies the summarization
/// policy. Built once and shared read-only across requests.
pub struct Orchestrator {
    settings: Settings,
    backend: Option<Arc<dyn GenerativeBackend>>,
    splitter: Arc<dyn SentenceSplitter>,
}

impl Orchestrator {
    /// Probes the backend once; an unreachable backend is dropped and every
    /// later request is answered extractively.
    pub fn new(settings: Settings, backend: Option<Arc<dyn GenerativeBackend>>) -> Self {
        let backend = backend.and_then(|b| match b.check_available() {
            Ok(()) => {
                tracing::info!(backend = b.name(), "generative backend ready");
                Some(b)
            }
            Err(e) => {
                tracing::warn!(backend = b.name(), error=%e, "backend unavailable, falling back to extractive summaries");
                None
            }
        });
        let splitter = text::build_splitter(settings.splitter);
        Self {
            settings,
            backend,
            splitter,
        }
    }

    pub fn with_splitter(mut self, splitter: Arc<dyn SentenceSplitter>) -> Self {
        self.splitter = splitter;
        self
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    pub fn splitter(&self) -> &dyn SentenceSplitter {
        self.splitter.as_ref()
    }

    pub fn summarize_text(
        &self,
        text: &str,
        max_length: usize,
        min_length: usize,
    ) -> Result<SummaryOutcome, SummarizeError> {
        let normalized = text::normalize(text);
        if normalized.is_empty() {
            return Ok(SummaryOutcome::NoText);
        }
        let words = text::word_count(&normalized);
        if words < self.settings.min_words {
            tracing::debug!(words, min_words = self.settings.min_words, "input too short");
            return Ok(SummaryOutcome::TooShort { words });
        }

        let Some(backend) = self.backend.as_deref() else {
            let sentences = text::segment(&normalized, self.splitter.as_ref())?;
            let count = self
                .settings
                .fallback_sentences
                .unwrap_or_else(|| extractive::fallback_count(sentences.len()));
            return Ok(SummaryOutcome::Summary(
                self.extract(&sentences, count, min_length, max_length),
            ));
        };

        if normalized.chars().count() > self.settings.chunk_threshold {
            self.summarize_chunked(backend, &normalized, max_length, min_length)
        } else {
            Ok(self.summarize_direct(backend, &normalized, max_length, min_length))
        }
    }

    pub fn summarize_document(
        &self,
        doc: &Document,
        max_length: usize,
        min_length: usize,
    ) -> Result<SummaryOutcome, SummarizeError> {
        tracing::debug!(kind=?doc.kind, chars = doc.text.len(), "summarizing document");
        self.summarize_text(&doc.text, max_length, min_length)
    }

    pub fn summarize_file(
        &self,
        path: &Path,
        max_length: usize,
        min_length: usize,
    ) -> Result<SummaryOutcome, SummarizeError> {
        let doc = document::load_document(path)?;
        self.summarize_document(&doc, max_length, min_length)
    }

    fn summarize_direct(
        &self,
        backend: &dyn GenerativeBackend,
        normalized: &str,
        max_length: usize,
        min_length: usize,
    ) -> SummaryOutcome {
        match backend.summarize_chunk(normalized, min_length, max_length) {
            Ok(summary) => SummaryOutcome::Summary(summary),
            Err(e) => {
                tracing::warn!(backend = backend.name(), error=%e, "summarization failed");
                SummaryOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn summarize_chunked(
        &self,
        backend: &dyn GenerativeBackend,
        normalized: &str,
        max_length: usize,
        min_length: usize,
    ) -> Result<SummaryOutcome, SummarizeError> {
        let sentences = text::segment(normalized, self.splitter.as_ref())?;
        let chunks = text::chunk(&sentences, self.settings.chunk_size, self.settings.chunk_unit);
        tracing::debug!(sentences = sentences.len(), chunks = chunks.len(), "chunked input");

        let mut parts: Vec<String> = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            match backend.summarize_chunk(&chunk.text(), min_length, max_length) {
                Ok(summary) => parts.push(summary.text),
                Err(e) => {
                    tracing::warn!(chunk = i, error=%e, "chunk summarization failed");
                    if self.settings.chunk_failure == ChunkFailurePolicy::Extractive {
                        let picked = extractive::extract(
                            &chunk.sentences,
                            self.settings.chunk_fallback_sentences,
                            self.settings.scoring,
                        );
                        parts.push(text::join_sentences(&picked));
                    }
                }
            }
        }
        parts.retain(|p| !p.trim().is_empty());
        if parts.is_empty() {
            return Ok(SummaryOutcome::NoChunkSummaries);
        }

        let combined = parts.join(" ");
        if combined.chars().count() <= self.settings.chunk_threshold {
            return Ok(SummaryOutcome::Summary(combined_summary(
                combined,
                min_length,
                max_length,
                backend.name(),
            )));
        }

        // One more pass over the combined chunk summaries, never deeper.
        match backend.summarize_chunk(&combined, min_length, max_length) {
            Ok(summary) => Ok(SummaryOutcome::Summary(summary)),
            Err(e) => {
                tracing::warn!(error=%e, chars = combined.len(), "summary of summaries failed, returning combined chunk summaries");
                Ok(SummaryOutcome::Summary(combined_summary(
                    combined,
                    min_length,
                    max_length,
                    backend.name(),
                )))
            }
        }
    }

    fn extract(
        &self,
        sentences: &[Sentence],
        count: usize,
        min_length: usize,
        max_length: usize,
    ) -> Summary {
        let picked = extractive::extract(sentences, count, self.settings.scoring);
        tracing::debug!(total = sentences.len(), kept = picked.len(), "extractive summary");
        let summary = Summary::new(
            text::join_sentences(&picked),
            min_length,
            max_length,
            "extractive",
        );
        summary.log_deviation();
        summary
    }
}

fn combined_summary(combined: String, min_length: usize, max_length: usize, backend: &str) -> Summary {
    let summary = Summary::new(combined, min_length, max_length, backend);
    summary.log_deviation();
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BackendError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend that returns a fixed reply (or fails) and counts calls.
    struct ScriptedBackend {
        reply: Option<String>,
        available: bool,
        /// Calls beyond this many fail even when `reply` is set.
        succeed_for: Option<usize>,
        calls: AtomicUsize,
        inputs: std::sync::Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply.to_string()),
                available: true,
                succeed_for: None,
                calls: AtomicUsize::new(0),
                inputs: Default::default(),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                available: true,
                succeed_for: None,
                calls: AtomicUsize::new(0),
                inputs: Default::default(),
            })
        }

        fn unreachable() -> Arc<Self> {
            Arc::new(Self {
                reply: Some("never".into()),
                available: false,
                succeed_for: None,
                calls: AtomicUsize::new(0),
                inputs: Default::default(),
            })
        }

        fn replying_then_failing(reply: &str, successes: usize) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply.to_string()),
                available: true,
                succeed_for: Some(successes),
                calls: AtomicUsize::new(0),
                inputs: Default::default(),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl GenerativeBackend for ScriptedBackend {
        fn name(&self) -> &str {
            "scripted"
        }

        fn check_available(&self) -> Result<(), BackendError> {
            if self.available {
                Ok(())
            } else {
                Err(BackendError::Unavailable("health check failed".into()))
            }
        }

        fn summarize_chunk(
            &self,
            text: &str,
            min_length: usize,
            max_length: usize,
        ) -> Result<Summary, BackendError> {
            let previous = self.calls.fetch_add(1, Ordering::SeqCst);
            self.inputs.lock().unwrap().push(text.to_string());
            if self.succeed_for.is_some_and(|n| previous >= n) {
                return Err(BackendError::Http("status 503".into()));
            }
            match &self.reply {
                Some(r) => Ok(Summary::new(r.clone(), min_length, max_length, "scripted")),
                None => Err(BackendError::Http("status 500".into())),
            }
        }
    }

    fn orchestrator(backend: Option<Arc<ScriptedBackend>>, settings: Settings) -> Orchestrator {
        Orchestrator::new(settings, backend.map(|b| b as Arc<dyn GenerativeBackend>))
    }

    /// `n` distinct sentences of about 70 characters each.
    fn document(n: usize) -> String {
        (0..n)
            .map(|i| format!("Sentence {i} describes the system under test in some detail here."))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn empty_input_is_no_text() {
        let backend = ScriptedBackend::replying("x");
        let o = orchestrator(Some(backend.clone()), Settings::default());
        assert_eq!(o.summarize_text("", 150, 30).unwrap(), SummaryOutcome::NoText);
        assert_eq!(o.summarize_text("  \n @#$ ", 150, 30).unwrap(), SummaryOutcome::NoText);
        assert_eq!(o.summarize_text("", 150, 30).unwrap().as_text(), NO_TEXT_MESSAGE);
        assert_eq!(backend.calls(), 0);
    }

    #[test]
    fn short_input_never_reaches_backend() {
        let backend = ScriptedBackend::replying("x");
        let o = orchestrator(Some(backend.clone()), Settings::default());
        let out = o
            .summarize_text("Only a handful of words live in this input.", 150, 30)
            .unwrap();
        assert_eq!(out, SummaryOutcome::TooShort { words: 9 });
        assert_eq!(out.as_text(), TOO_SHORT_MESSAGE);
        assert_eq!(backend.calls(), 0);
    }

    #[test]
    fn without_backend_answers_extractively() {
        let o = orchestrator(None, Settings::default());
        assert!(!o.has_backend());
        let doc = document(50);
        let out = o.summarize_text(&doc, 150, 30).unwrap();
        let summary = out.summary().expect("summary");
        assert_eq!(summary.backend, "extractive");
        // max(3, 50 / 10) sentences
        let sentences = text::segment(&summary.text, o.splitter()).unwrap();
        assert_eq!(sentences.len(), 5);
        assert!(sentences.iter().all(|s| doc.contains(&s.text)));
    }

    #[test]
    fn fixed_fallback_count_overrides_derived_count() {
        let settings = Settings {
            fallback_sentences: Some(2),
            ..Settings::default()
        };
        let o = orchestrator(None, settings);
        let out = o.summarize_text(&document(50), 150, 30).unwrap();
        let sentences = text::segment(&out.as_text(), o.splitter()).unwrap();
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn unreachable_backend_is_dropped_at_construction() {
        let backend = ScriptedBackend::unreachable();
        let o = orchestrator(Some(backend.clone()), Settings::default());
        assert!(!o.has_backend());
        let out = o.summarize_text(&document(20), 150, 30).unwrap();
        assert_eq!(out.summary().unwrap().backend, "extractive");
        assert_eq!(backend.calls(), 0);
    }

    #[test]
    fn moderate_input_takes_direct_path() {
        let backend = ScriptedBackend::replying("Direct summary.");
        let o = orchestrator(Some(backend.clone()), Settings::default());
        let doc = document(10);
        assert!(doc.len() <= 1000);
        let out = o.summarize_text(&doc, 150, 30).unwrap();
        let summary = out.summary().unwrap();
        assert_eq!(summary.text, "Direct summary.");
        assert_eq!((summary.min_length, summary.max_length), (30, 150));
        assert_eq!(backend.calls(), 1);
        assert_eq!(backend.inputs.lock().unwrap()[0], text::normalize(&doc));
    }

    #[test]
    fn direct_path_failure_is_tagged_not_embedded() {
        let backend = ScriptedBackend::failing();
        let o = orchestrator(Some(backend.clone()), Settings::default());
        let out = o.summarize_text(&document(10), 150, 30).unwrap();
        assert!(matches!(out, SummaryOutcome::Failed { .. }));
        assert!(out.is_failure());
        assert!(out.summary().is_none());
        assert!(out.as_text().starts_with("Error"));
    }

    #[test]
    fn long_input_is_summarized_per_chunk() {
        let backend = ScriptedBackend::replying("Chunk gist.");
        let o = orchestrator(Some(backend.clone()), Settings::default());
        let doc = document(50);
        assert!(doc.len() >= 3000);
        let sentences = text::segment(&text::normalize(&doc), o.splitter()).unwrap();
        let chunks = text::chunk(&sentences, 1024, LengthUnit::Characters);
        assert!(chunks.len() >= 3);

        let out = o.summarize_text(&doc, 150, 30).unwrap();
        assert_eq!(backend.calls(), chunks.len());
        let expected = vec!["Chunk gist."; chunks.len()].join(" ");
        assert_eq!(out.as_text(), expected);
    }

    #[test]
    fn long_combined_summary_is_summarized_once_more() {
        let long_reply = "word ".repeat(100);
        let backend = ScriptedBackend::replying(long_reply.trim());
        let o = orchestrator(Some(backend.clone()), Settings::default());
        let doc = document(50);
        let sentences = text::segment(&text::normalize(&doc), o.splitter()).unwrap();
        let chunks = text::chunk(&sentences, 1024, LengthUnit::Characters).len();

        let out = o.summarize_text(&doc, 150, 30).unwrap();
        assert_eq!(backend.calls(), chunks + 1);
        assert_eq!(out.as_text(), long_reply.trim());
    }

    #[test]
    fn failed_chunks_get_extractive_substitutes() {
        let backend = ScriptedBackend::failing();
        let o = orchestrator(Some(backend.clone()), Settings::default());
        let doc = document(50);
        let sentences = text::segment(&text::normalize(&doc), o.splitter()).unwrap();
        let chunks = text::chunk(&sentences, 1024, LengthUnit::Characters);

        let out = o.summarize_text(&doc, 150, 30).unwrap();
        let summary = out.summary().expect("chunks substituted");
        let picked = text::segment(&summary.text, o.splitter()).unwrap();
        let expected: usize = chunks.iter().map(|c| c.sentences.len().min(2)).sum();
        assert_eq!(picked.len(), expected);
        assert!(picked.iter().all(|s| doc.contains(&s.text)));

        // Each chunk contributes its own two sentences, in chunk order.
        let mut picked = picked.iter();
        for chunk in &chunks {
            for _ in 0..chunk.sentences.len().min(2) {
                let s = picked.next().expect("sentence for chunk");
                assert!(chunk.sentences.iter().any(|c| c.text == s.text));
            }
        }
    }

    #[test]
    fn failed_second_pass_returns_combined_chunk_summaries() {
        let long_reply = "word ".repeat(100);
        let doc = document(50);
        let plain = orchestrator(None, Settings::default());
        let sentences = text::segment(&text::normalize(&doc), plain.splitter()).unwrap();
        let chunks = text::chunk(&sentences, 1024, LengthUnit::Characters).len();

        let backend = ScriptedBackend::replying_then_failing(long_reply.trim(), chunks);
        let o = orchestrator(Some(backend.clone()), Settings::default());
        let out = o.summarize_text(&doc, 150, 30).unwrap();

        assert_eq!(backend.calls(), chunks + 1);
        let expected = vec![long_reply.trim(); chunks].join(" ");
        assert!(expected.len() > 1000);
        let summary = out.summary().expect("combined summaries returned");
        assert_eq!(summary.text, expected);
        assert_eq!(summary.backend, "scripted");
        assert_eq!((summary.min_length, summary.max_length), (30, 150));
    }

    #[test]
    fn extractive_and_combined_summaries_carry_requested_bounds() {
        let o = orchestrator(None, Settings::default());
        let out = o.summarize_text(&document(50), 20, 5).unwrap();
        let summary = out.summary().unwrap();
        assert_eq!((summary.min_length, summary.max_length), (5, 20));
        // five ~11-word sentences overshoot a 20-word bound; reported, not trimmed
        assert!(!summary.within_bounds());
        assert_eq!(text::segment(&summary.text, o.splitter()).unwrap().len(), 5);

        let backend = ScriptedBackend::replying("Chunk gist.");
        let o = orchestrator(Some(backend), Settings::default());
        let out = o.summarize_text(&document(50), 150, 30).unwrap();
        let summary = out.summary().unwrap();
        assert_eq!((summary.min_length, summary.max_length), (30, 150));
        assert!(!summary.within_bounds());
    }

    #[test]
    fn all_chunks_failing_yields_sentinel_when_skipping() {
        let backend = ScriptedBackend::failing();
        let settings = Settings {
            chunk_failure: ChunkFailurePolicy::Skip,
            ..Settings::default()
        };
        let o = orchestrator(Some(backend.clone()), settings);
        let out = o.summarize_text(&document(50), 150, 30).unwrap();
        assert_eq!(out, SummaryOutcome::NoChunkSummaries);
        assert_eq!(out.as_text(), NO_CHUNK_SUMMARIES_MESSAGE);
        assert!(backend.calls() >= 3);
    }

    #[test]
    fn word_budget_chunking_is_honoured() {
        let backend = ScriptedBackend::replying("Gist.");
        let settings = Settings {
            chunk_size: 100,
            chunk_unit: LengthUnit::Words,
            ..Settings::default()
        };
        let o = orchestrator(Some(backend.clone()), settings);
        let out = o.summarize_text(&document(50), 150, 30).unwrap();
        assert!(out.summary().is_some());
        for input in backend.inputs.lock().unwrap().iter() {
            assert!(input.split_whitespace().count() < 100);
        }
    }

    struct BrokenSplitter;

    impl SentenceSplitter for BrokenSplitter {
        fn split<'a>(&self, _text: &'a str) -> Result<Vec<&'a str>, SummarizeError> {
            Err(SummarizeError::Segmentation("punkt model missing".into()))
        }
    }

    #[test]
    fn segmentation_failure_propagates() {
        let o = orchestrator(None, Settings::default()).with_splitter(Arc::new(BrokenSplitter));
        let err = o.summarize_text(&document(20), 150, 30).unwrap_err();
        assert!(matches!(err, SummarizeError::Segmentation(_)));
    }
}
