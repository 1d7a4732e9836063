//! Directory-at-a-time summarization with a JSON processing report.

use crate::errors::SummarizeError;
use crate::summarize::{Orchestrator, SummaryOutcome};
use serde::Serialize;
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::OffsetDateTime;
use walkdir::WalkDir;

pub const REPORT_FILE: &str = "processing_report.json";
pub const DEFAULT_EXTENSIONS: [&str; 3] = ["pdf", "txt", "md"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Success,
    Skipped,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub file: String,
    pub output: Option<String>,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub timestamp: String,
    pub total_files: usize,
    pub successful: usize,
    pub skipped: usize,
    pub failed: usize,
    pub results: Vec<FileResult>,
}

pub struct BatchOptions {
    pub extensions: Vec<String>,
    pub max_length: usize,
    pub min_length: usize,
}

/// Files under `dir` whose extension is in `extensions`, in path order.
pub fn collect_files(dir: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let wanted: Vec<String> = extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
        .collect();
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| wanted.contains(&e.to_ascii_lowercase()))
        })
        .map(|entry| entry.into_path())
        .collect()
}

fn summary_header(source: &Path, now: OffsetDateTime) -> String {
    let generated = now
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .unwrap_or_default();
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!(
        "Summary of: {name}\nGenerated on: {generated}\nOriginal file: {}\n{}\n\n",
        source.display(),
        "-".repeat(50)
    )
}

fn process_file(
    orchestrator: &Orchestrator,
    path: &Path,
    output_dir: &Path,
    opts: &BatchOptions,
) -> Result<FileResult, SummarizeError> {
    let outcome = orchestrator.summarize_file(path, opts.max_length, opts.min_length)?;
    let file = path.display().to_string();
    let summary = match &outcome {
        SummaryOutcome::Summary(s) => s.text.clone(),
        SummaryOutcome::NoText | SummaryOutcome::TooShort { .. } => {
            return Ok(FileResult {
                file,
                output: None,
                status: FileStatus::Skipped,
                summary_length: None,
                error: Some(outcome.as_text()),
            });
        }
        SummaryOutcome::NoChunkSummaries | SummaryOutcome::Failed { .. } => {
            return Ok(FileResult {
                file,
                output: None,
                status: FileStatus::Failed,
                summary_length: None,
                error: Some(outcome.as_text()),
            });
        }
    };

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".into());
    let output_path = output_dir.join(format!("{stem}_summary.txt"));
    let mut contents = summary_header(path, OffsetDateTime::now_utc());
    contents.push_str(&summary);
    std::fs::write(&output_path, contents)?;

    Ok(FileResult {
        file,
        output: Some(output_path.display().to_string()),
        status: FileStatus::Success,
        summary_length: Some(summary.chars().count()),
        error: None,
    })
}

/// Summarizes every matching file under `input_dir` into `output_dir` and
/// writes [`REPORT_FILE`] there. A failing file is recorded, not fatal.
pub fn process_directory(
    orchestrator: &Orchestrator,
    input_dir: &Path,
    output_dir: &Path,
    opts: &BatchOptions,
) -> Result<BatchReport, SummarizeError> {
    if !input_dir.is_dir() {
        return Err(SummarizeError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("input directory {} does not exist", input_dir.display()),
        )));
    }
    std::fs::create_dir_all(output_dir)?;

    let files = collect_files(input_dir, &opts.extensions);
    if files.is_empty() {
        tracing::warn!(extensions=?opts.extensions, dir=%input_dir.display(), "no matching files");
    }

    let mut results = Vec::with_capacity(files.len());
    for (i, path) in files.iter().enumerate() {
        tracing::info!(n = i + 1, total = files.len(), file=%path.display(), "processing");
        let result = match process_file(orchestrator, path, output_dir, opts) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(file=%path.display(), error=%e, "file failed");
                FileResult {
                    file: path.display().to_string(),
                    output: None,
                    status: FileStatus::Failed,
                    summary_length: None,
                    error: Some(e.to_string()),
                }
            }
        };
        results.push(result);
    }

    let count = |status: FileStatus| results.iter().filter(|r| r.status == status).count();
    let report = BatchReport {
        timestamp: OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default(),
        total_files: files.len(),
        successful: count(FileStatus::Success),
        skipped: count(FileStatus::Skipped),
        failed: count(FileStatus::Failed),
        results,
    };

    let report_path = output_dir.join(REPORT_FILE);
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| SummarizeError::Io(std::io::Error::other(e)))?;
    std::fs::write(&report_path, json)?;
    tracing::info!(
        successful = report.successful,
        skipped = report.skipped,
        failed = report.failed,
        report=%report_path.display(),
        "batch complete"
    );
    Ok(report)
}
