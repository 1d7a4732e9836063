use crate::batch::DEFAULT_EXTENSIONS;
use crate::summarize::extractive::ScoringPolicy;
use crate::summarize::{BackendKind, BackendOptions, ChunkFailurePolicy, Settings, DEFAULT_MODEL};
use crate::text::{LengthUnit, SplitterKind};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "docsum")]
#[command(about = "Summarize text, Markdown and PDF documents", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub config: AppConfig,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Summarize literal text, or stdin when TEXT is `-`
    Text {
        text: String,
        #[arg(long)]
        stats: bool,
    },
    /// Summarize a .txt, .md or .pdf file
    File {
        path: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        stats: bool,
    },
    /// Summarize every matching file under a directory
    Batch {
        input_dir: PathBuf,
        output_dir: PathBuf,
        #[arg(long, num_args = 1.., default_values_t = DEFAULT_EXTENSIONS.map(String::from))]
        extensions: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScoringArg {
    Frequency,
    Length,
    LengthPosition,
}

impl From<ScoringArg> for ScoringPolicy {
    fn from(arg: ScoringArg) -> Self {
        match arg {
            ScoringArg::Frequency => ScoringPolicy::Frequency,
            ScoringArg::Length => ScoringPolicy::LengthHeuristic {
                position_bonus: false,
            },
            ScoringArg::LengthPosition => ScoringPolicy::LengthHeuristic {
                position_bonus: true,
            },
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    #[arg(long, env = "SUMMARY_BACKEND", value_enum, default_value_t = BackendKind::Huggingface)]
    pub summary_backend: BackendKind,

    #[arg(long, env = "SUMMARY_MODEL", default_value = DEFAULT_MODEL)]
    pub summary_model: String,

    #[arg(long, env = "OLLAMA_HOST", default_value = "http://127.0.0.1:11434")]
    pub ollama_host: String,

    #[arg(long, env = "HF_API_URL", default_value = "https://api-inference.huggingface.co/models")]
    pub hf_api_url: String,

    #[arg(long, env = "HF_API_TOKEN", hide_env_values = true)]
    pub hf_api_token: Option<String>,

    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 120)]
    pub request_timeout_secs: u64,

    #[arg(long, env = "SUMMARY_MAX_LENGTH", default_value_t = 150)]
    pub max_length: usize,

    #[arg(long, env = "SUMMARY_MIN_LENGTH", default_value_t = 30)]
    pub min_length: usize,

    #[arg(long, env = "CHUNK_SIZE", default_value_t = 1024)]
    pub chunk_size: usize,

    #[arg(long, env = "CHUNK_UNIT", value_enum, default_value_t = LengthUnit::Characters)]
    pub chunk_unit: LengthUnit,

    #[arg(long, env = "CHUNK_THRESHOLD", default_value_t = 1000)]
    pub chunk_threshold: usize,

    #[arg(long, env = "MIN_WORDS", default_value_t = 50)]
    pub min_words: usize,

    #[arg(long, env = "FALLBACK_SENTENCES")]
    pub fallback_sentences: Option<usize>,

    #[arg(long, env = "SCORING", value_enum, default_value_t = ScoringArg::Frequency)]
    pub scoring: ScoringArg,

    #[arg(long, env = "SPLITTER", value_enum, default_value_t = SplitterKind::Unicode)]
    pub splitter: SplitterKind,

    #[arg(long, env = "CHUNK_FAILURE", value_enum, default_value_t = ChunkFailurePolicy::Extractive)]
    pub chunk_failure: ChunkFailurePolicy,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_length == 0 {
            return Err("max_length must be > 0".into());
        }
        if self.min_length > self.max_length {
            return Err("min_length must not exceed max_length".into());
        }
        if self.chunk_size == 0 {
            return Err("chunk_size must be > 0".into());
        }
        if self.fallback_sentences == Some(0) {
            return Err("fallback_sentences must be > 0".into());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be > 0".into());
        }
        if self.summary_model.trim().is_empty() {
            return Err("summary_model must not be empty".into());
        }
        match self.summary_backend {
            BackendKind::Ollama => {
                url::Url::parse(&self.ollama_host)
                    .map_err(|_| "Invalid OLLAMA_HOST URL format".to_string())?;
            }
            BackendKind::Huggingface => {
                url::Url::parse(&self.hf_api_url)
                    .map_err(|_| "Invalid HF_API_URL URL format".to_string())?;
            }
            BackendKind::Extractive => {}
        }
        Ok(())
    }

    pub fn settings(&self) -> Settings {
        Settings {
            chunk_size: self.chunk_size,
            chunk_unit: self.chunk_unit,
            chunk_threshold: self.chunk_threshold,
            min_words: self.min_words,
            fallback_sentences: self.fallback_sentences,
            chunk_failure: self.chunk_failure,
            scoring: self.scoring.into(),
            splitter: self.splitter,
            ..Settings::default()
        }
    }

    pub fn backend_options(&self) -> BackendOptions {
        BackendOptions {
            kind: self.summary_backend,
            model: self.summary_model.clone(),
            ollama_host: self.ollama_host.clone(),
            hf_api_url: self.hf_api_url.clone(),
            hf_api_token: self.hf_api_token.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}
