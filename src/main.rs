use anyhow::Context;
use clap::Parser;
use docsum::batch::{self, BatchOptions};
use docsum::config::{Cli, Command};
use docsum::summarize::stats::SummaryStats;
use docsum::{build_backend, logging, Orchestrator, SummaryOutcome};
use std::io::Read;

fn report(input: &str, outcome: &SummaryOutcome, stats: bool) {
    let text = outcome.as_text();
    println!("{text}");
    if stats && outcome.summary().is_some() {
        let s = SummaryStats::compute(input, &text);
        eprintln!(
            "original: {} sentences, {} chars; summary: {} sentences, {} chars; {:.1}% reduction",
            s.original_sentences,
            s.original_chars,
            s.summary_sentences,
            s.summary_chars,
            s.reduction_percent()
        );
    }
}

fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let cli = Cli::parse();
    let cfg = &cli.config;
    cfg.validate()
        .map_err(|e| anyhow::anyhow!("invalid config: {e}"))?;

    let backend = build_backend(&cfg.backend_options());
    let orchestrator = Orchestrator::new(cfg.settings(), backend);
    tracing::info!(
        summary_backend=?cfg.summary_backend,
        model=%cfg.summary_model,
        generative=orchestrator.has_backend(),
        "summarizer ready"
    );

    let outcome = match &cli.command {
        Command::Text { text, stats } => {
            let input = if text == "-" {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("read stdin")?;
                buf
            } else {
                text.clone()
            };
            let outcome = orchestrator.summarize_text(&input, cfg.max_length, cfg.min_length)?;
            report(&input, &outcome, *stats);
            outcome
        }
        Command::File {
            path,
            output,
            stats,
        } => {
            let doc = docsum::load_document(path)
                .with_context(|| format!("load {}", path.display()))?;
            let outcome = orchestrator.summarize_document(&doc, cfg.max_length, cfg.min_length)?;
            report(&doc.text, &outcome, *stats);
            if let Some(out) = output {
                std::fs::write(out, outcome.as_text())
                    .with_context(|| format!("write {}", out.display()))?;
                tracing::info!(output=%out.display(), "summary saved");
            }
            outcome
        }
        Command::Batch {
            input_dir,
            output_dir,
            extensions,
        } => {
            let opts = BatchOptions {
                extensions: extensions.clone(),
                max_length: cfg.max_length,
                min_length: cfg.min_length,
            };
            let report = batch::process_directory(&orchestrator, input_dir, output_dir, &opts)?;
            println!(
                "processed {} files: {} successful, {} skipped, {} failed",
                report.total_files, report.successful, report.skipped, report.failed
            );
            return Ok(());
        }
    };

    if outcome.is_failure() {
        std::process::exit(1);
    }
    Ok(())
}
