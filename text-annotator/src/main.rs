use anyhow::Context;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use text_annotator::utils::text::render_template;
use text_annotator::{annotated_path, Annotator, SessionConfig, TerminalPresenter};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Label rows of text from a CSV or JSON file, one record at a time.
#[derive(Debug, Parser)]
#[command(name = "text-annotator", version)]
struct Args {
    /// Source table (.csv, or .json array of objects)
    data: PathBuf,

    /// Column holding the text to annotate
    #[arg(short, long, default_value = "text")]
    text_column: String,

    /// Number of records in this session
    #[arg(short, long, default_value_t = 10)]
    num_records: usize,

    /// Column identifying each record; the row index is used when absent
    #[arg(long)]
    id_column: Option<String>,

    /// Revisit records that already have annotations instead of new ones
    #[arg(long)]
    edit: bool,

    /// Sample records randomly (ignored with --edit)
    #[arg(long)]
    random: bool,

    /// Seed for --random
    #[arg(long)]
    seed: Option<u64>,

    /// Comma separated labels
    #[arg(long, value_delimiter = ',', default_values = ["Positive", "Negative", "Neutral"])]
    labels: Vec<String>,

    /// Require confirming each selection before moving on
    #[arg(long)]
    confirm: bool,

    /// Display template with {column} placeholders, e.g. "{title}: {text}"
    #[arg(long)]
    template: Option<String>,

    /// Do not write the annotation file on exit
    #[arg(long)]
    dry_run: bool,
}

impl Args {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            num_records: self.num_records,
            id_column: self.id_column.clone(),
            edit_annotations: self.edit,
            random: self.random,
            labels: self.labels.clone(),
            confirm: self.confirm,
            seed: self.seed,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    info!("Starting annotation session for {}", args.data.display());

    let mut annotator = Annotator::open(&args.data, &args.text_column, args.session_config())
        .with_context(|| format!("Failed to open {}", args.data.display()))?;

    let mut presenter = TerminalPresenter::new(io::stdout());
    if let Some(template) = args.template.clone() {
        presenter = presenter.with_formatter(move |record| render_template(&template, record));
    }

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    // Annotations made before a failure are still written.
    let outcome = annotator.run(&mut presenter, &mut reader);
    if let Ok(summary) = &outcome {
        info!(
            "Session finished: {} labelled, {} skipped of {}",
            summary.annotated, summary.skipped, summary.total
        );
    }

    if args.dry_run {
        println!(
            "Dry run: {} annotations not written to {}",
            annotator.annotations().len(),
            annotated_path(&args.data).display()
        );
    } else {
        let path = annotator
            .save()
            .with_context(|| format!("Failed to save annotations for {}", args.data.display()))?;
        println!("Saved {} annotations to {}", annotator.annotations().len(), path.display());
    }

    outcome.context("Annotation session failed")?;
    Ok(())
}
