//! spanmark CLI - Terminal-based span annotation tool

mod io;
mod term;
mod ui;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use spanmark_core::{annotate_dataset, annotate_texts, corpus, flag_texts, BatchReport, Entry, LabelSet, Window};

use term::TerminalSession;

#[derive(Parser)]
#[command(name = "spanmark", version, about = "Keyboard-driven span annotation for NER datasets")]
struct Cli {
    /// Label configuration file; defaults to ~/.spanmark/config.json when present
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Built-in label set; overrides ~/.spanmark/config.json, defaults to keyword
    #[arg(short, long, global = true, value_parser = ["keyword", "tech"])]
    labels: Option<String>,

    /// Directory for log files
    #[arg(long, global = true, default_value = "logs")]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate the records of an existing dataset
    Annotate(AnnotateArgs),
    /// Annotate corpus lines, appending them to a dataset
    Generate(GenerateArgs),
    /// Sort corpus lines into interesting and uninteresting files
    Flag(FlagArgs),
}

#[derive(Args)]
struct WindowArgs {
    /// Index of the first item to visit
    #[arg(long, default_value_t = 0)]
    from: usize,

    /// Visit at most this many items
    #[arg(long)]
    limit: Option<usize>,
}

impl WindowArgs {
    fn window(&self) -> Window {
        Window::new(self.from, self.limit)
    }
}

#[derive(Args)]
struct AnnotateArgs {
    /// Dataset file (JSON)
    dataset: PathBuf,

    #[command(flatten)]
    window: WindowArgs,

    /// Merge the labeled words into this keyword list
    #[arg(long)]
    keywords: Option<PathBuf>,
}

#[derive(Args)]
struct GenerateArgs {
    /// Corpus file, one text per line
    #[arg(long)]
    corpus: PathBuf,

    /// Dataset file to append to; created if missing
    #[arg(long)]
    dataset: PathBuf,

    #[command(flatten)]
    window: WindowArgs,

    /// Merge the labeled words into this keyword list
    #[arg(long)]
    keywords: Option<PathBuf>,
}

#[derive(Args)]
struct FlagArgs {
    /// Corpus file, one text per line
    #[arg(long)]
    corpus: PathBuf,

    /// Lines marked interesting are appended here
    #[arg(long)]
    interesting: PathBuf,

    /// Lines marked not interesting are appended here
    #[arg(long)]
    uninteresting: PathBuf,

    #[command(flatten)]
    window: WindowArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = io::init_logging(&cli.log_dir)?;
    info!(log = %log_path.display(), "spanmark started");

    let res = run(&cli);

    if let Err(e) = &res {
        error!("{:#}", e);
    }

    res
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Annotate(args) => {
            let labels = Arc::new(io::resolve_labels(cli.config.as_deref(), cli.labels.as_deref())?);
            annotate(args, &labels)
        }
        Commands::Generate(args) => {
            let labels = Arc::new(io::resolve_labels(cli.config.as_deref(), cli.labels.as_deref())?);
            generate(args, &labels)
        }
        Commands::Flag(args) => flag(args),
    }
}

fn annotate(args: &AnnotateArgs, labels: &Arc<LabelSet>) -> Result<()> {
    let mut dataset = io::load_dataset(&args.dataset)?;
    let window = args.window.window();
    info!(
        dataset = %args.dataset.display(),
        records = dataset.len(),
        malformed = dataset.malformed_count(),
        "loaded dataset"
    );

    let res = with_terminal(|terminal| Ok(annotate_dataset(&mut dataset, window, labels, terminal)?));

    // whatever happened above, keep the labels made so far
    io::save_dataset(&dataset, &args.dataset)?;
    if let Some(path) = &args.keywords {
        merge_keywords(path, &dataset.entries()[window.bounds(dataset.len())])?;
    }

    print_report(&res?, &args.dataset);
    Ok(())
}

fn generate(args: &GenerateArgs, labels: &Arc<LabelSet>) -> Result<()> {
    let texts = corpus::read_corpus(&args.corpus, args.window.window())
        .with_context(|| format!("Failed to read corpus: {}", args.corpus.display()))?;
    let mut dataset = io::load_or_create_dataset(&args.dataset)?;
    let first_new = dataset.len();
    info!(corpus = %args.corpus.display(), texts = texts.len(), "loaded corpus");

    let res = with_terminal(|terminal| Ok(annotate_texts(&mut dataset, texts, labels, terminal)?));

    io::save_dataset(&dataset, &args.dataset)?;
    if let Some(path) = &args.keywords {
        merge_keywords(path, &dataset.entries()[first_new..])?;
    }

    print_report(&res?, &args.dataset);
    Ok(())
}

fn flag(args: &FlagArgs) -> Result<()> {
    let texts = corpus::read_corpus(&args.corpus, args.window.window())
        .with_context(|| format!("Failed to read corpus: {}", args.corpus.display()))?;
    info!(corpus = %args.corpus.display(), texts = texts.len(), "loaded corpus");

    let report = with_terminal(|terminal| {
        Ok(flag_texts(&texts, terminal, |text, interesting| {
            let path = if interesting {
                &args.interesting
            } else {
                &args.uninteresting
            };
            corpus::append_line(path, text)
        })?)
    })?;

    println!(
        "Flagged {} of {} texts{}",
        report.completed,
        texts.len(),
        if report.aborted { " (stopped early)" } else { "" }
    );
    Ok(())
}

/// Run `f` with the terminal set up; it is restored before this returns.
fn with_terminal<T>(f: impl FnOnce(&mut TerminalSession) -> Result<T>) -> Result<T> {
    let mut terminal = TerminalSession::new().context("Failed to set up terminal")?;
    f(&mut terminal)
}

/// Add the labeled words of `entries` to a keyword list
fn merge_keywords(path: &Path, entries: &[Entry]) -> Result<()> {
    let words: Vec<&str> = entries
        .iter()
        .filter_map(Entry::record)
        .flat_map(|record| record.surfaces())
        .collect();

    let total = corpus::merge_keywords(path, words)
        .with_context(|| format!("Failed to update keyword list: {}", path.display()))?;
    info!(keywords = total, path = %path.display(), "keyword list updated");
    Ok(())
}

fn print_report(report: &BatchReport, dataset: &Path) {
    println!(
        "Annotated {} texts, {} finished{}{} -> {}",
        report.visited,
        report.completed,
        if report.skipped > 0 {
            format!(", {} malformed skipped", report.skipped)
        } else {
            String::new()
        },
        if report.aborted { " (stopped early)" } else { "" },
        dataset.display()
    );
}
