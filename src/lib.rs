pub mod batch;
pub mod config;
pub mod document;
pub mod errors;
pub mod health;
pub mod logging;
pub mod summarize;
pub mod text;

#[cfg(test)]
mod test_support;

pub use document::{extract_text, load_document, Document, DocumentKind};
pub use errors::{BackendError, SummarizeError};
pub use summarize::{
    build_backend, GenerativeBackend, Orchestrator, Settings, Summary, SummaryOutcome,
};
