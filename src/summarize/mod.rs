use crate::errors::BackendError;
use std::sync::Arc;
use std::time::Duration;

pub mod extractive;
#[cfg(feature = "backend-huggingface")]
mod huggingface;
#[cfg(feature = "backend-ollama")]
mod ollama;
pub mod orchestrator;
pub mod stats;

#[cfg(feature = "backend-huggingface")]
pub use huggingface::HuggingFaceBackend;
#[cfg(feature = "backend-ollama")]
pub use ollama::OllamaBackend;
pub use orchestrator::{ChunkFailurePolicy, Orchestrator, Settings, SummaryOutcome};

pub const DEFAULT_MODEL: &str = "facebook/bart-large-cnn";

/// Generated or extracted summary text and the bounds it was produced under.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub text: String,
    pub min_length: usize,
    pub max_length: usize,
    pub backend: String,
}

impl Summary {
    pub fn new(
        text: impl Into<String>,
        min_length: usize,
        max_length: usize,
        backend: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            min_length,
            max_length,
            backend: backend.into(),
        }
    }

    /// Whitespace words, a rough stand-in for backend tokens.
    pub fn approx_tokens(&self) -> usize {
        self.text.split_whitespace().count()
    }

    pub fn within_bounds(&self) -> bool {
        (self.min_length..=self.max_length).contains(&self.approx_tokens())
    }

    // Bounds are advisory for generative backends; report, never clamp.
    pub(crate) fn log_deviation(&self) {
        if !self.within_bounds() {
            tracing::debug!(
                backend=%self.backend,
                approx_tokens=self.approx_tokens(),
                min_length=self.min_length,
                max_length=self.max_length,
                "summary length outside requested bounds"
            );
        }
    }
}

/// A text-to-text summarization model. Implementations decode greedily so
/// the same input always yields the same summary.
pub trait GenerativeBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Probe run once when the orchestrator is built.
    fn check_available(&self) -> Result<(), BackendError>;

    fn summarize_chunk(
        &self,
        text: &str,
        min_length: usize,
        max_length: usize,
    ) -> Result<Summary, BackendError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BackendKind {
    Huggingface,
    Ollama,
    /// No generative model; every request is answered extractively.
    Extractive,
}

#[derive(Debug, Clone)]
pub struct BackendOptions {
    pub kind: BackendKind,
    pub model: String,
    pub ollama_host: String,
    pub hf_api_url: String,
    pub hf_api_token: Option<String>,
    pub request_timeout: Duration,
}

/// Builds the configured backend. Construction failures are logged and
/// yield `None`, which puts the orchestrator in extractive mode.
pub fn build_backend(opts: &BackendOptions) -> Option<Arc<dyn GenerativeBackend>> {
    let built: Result<Arc<dyn GenerativeBackend>, BackendError> = match opts.kind {
        BackendKind::Extractive => return None,
        #[cfg(feature = "backend-huggingface")]
        BackendKind::Huggingface => HuggingFaceBackend::new(
            opts.hf_api_url.clone(),
            opts.model.clone(),
            opts.hf_api_token.clone(),
            opts.request_timeout,
        )
        .map(|b| Arc::new(b) as Arc<dyn GenerativeBackend>),
        #[cfg(feature = "backend-ollama")]
        BackendKind::Ollama => OllamaBackend::new(
            opts.ollama_host.clone(),
            opts.model.clone(),
            opts.request_timeout,
        )
        .map(|b| Arc::new(b) as Arc<dyn GenerativeBackend>),
        #[allow(unreachable_patterns)]
        other => Err(BackendError::Unavailable(format!(
            "{other:?} backend not compiled in"
        ))),
    };
    match built {
        Ok(backend) => Some(backend),
        Err(e) => {
            tracing::warn!(error=%e, model=%opts.model, "generative backend unavailable, using extractive summaries");
            None
        }
    }
}
