//! CLI binary for versepin.
//!
//! A thin shim over the library crate: maps CLI flags to `PipelineConfig`,
//! shows the extracted draft, applies the reviewer's edits given as flags,
//! and publishes only when asked to.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use versepin::config::{
    ENV_GEMINI_API_KEY, ENV_MODEL, ENV_PINTEREST_ACCESS_TOKEN, ENV_PINTEREST_BOARD_ID,
    ENV_PROMO_LINK,
};
use versepin::{
    DraftRecord, Extractor, FixedReply, FormattingWarning, GeminiExtractor, PinterestPublisher,
    PipelineConfig, ProgressCallback, PublishConfirmation, PublishRecord, RecordEdit, VerseParts,
    VersePinError, Workflow, WorkflowProgressCallback, WorkflowStep,
};

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a spinner showing the current step, with one
/// log line per finished step.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }

    /// Hide the spinner while `f` writes to the terminal.
    fn suspend<R>(&self, f: impl FnOnce() -> R) -> R {
        self.bar.suspend(f)
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl WorkflowProgressCallback for CliProgressCallback {
    fn on_step_start(&self, step: WorkflowStep) {
        self.bar.set_prefix(format!("{:>3}%", step.percent()));
        self.bar.set_message(step.label());
    }

    fn on_step_complete(&self, step: WorkflowStep) {
        self.bar.println(format!("  {} {step}", green("✓")));
        self.bar.set_prefix("");
        self.bar.set_message("");
    }

    fn on_step_error(&self, step: WorkflowStep, error: &str) {
        // Long provider errors wrap badly under the spinner.
        let msg = match error.char_indices().nth(100) {
            Some((idx, _)) => format!("{}\u{2026}", &error[..idx]),
            None => error.to_string(),
        };
        self.bar.println(format!("  {} {step}  {}", red("✗"), red(&msg)));
    }

    fn on_warning(&self, warning: &FormattingWarning) {
        self.bar.println(format!("  {} {warning}", yellow("⚠")));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract and review only (nothing is published)
  versepin verse.jpg

  # Fill in the alt text and publish
  versepin verse.jpg --alt-text "Malayalam verse card with a dove" --publish

  # Re-process a reply saved earlier, no AI call
  versepin verse.jpg --reply-file reply.json --json

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY           Google Gemini API key (extraction)
  PINTEREST_ACCESS_TOKEN   Pinterest OAuth token (publishing)
  PINTEREST_BOARD_ID       Destination board for new pins
  WHATSAPP_LINK            Link attached to every pin
  VERSEPIN_MODEL           Vision model ID (default: gemini-2.5-flash)
  RUST_LOG                 Override log filtering

A pin is published only when the title, description and alt text are all
non-blank and the model reported 'high' or 'medium' confidence.
"#;

/// Extract Malayalam Bible verses from images and publish them as Pinterest pins.
#[derive(Parser, Debug)]
#[command(
    name = "versepin",
    version,
    about = "Extract Malayalam Bible verses from images and publish them as Pinterest pins",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// JPEG or PNG image of the verse.
    image: PathBuf,

    /// Google Gemini API key.
    #[arg(long, env = ENV_GEMINI_API_KEY, hide_env_values = true)]
    gemini_api_key: Option<String>,

    /// Pinterest access token.
    #[arg(long, env = ENV_PINTEREST_ACCESS_TOKEN, hide_env_values = true)]
    pinterest_token: Option<String>,

    /// Pinterest board ID.
    #[arg(long, env = ENV_PINTEREST_BOARD_ID)]
    board_id: Option<String>,

    /// Link attached to the pin.
    #[arg(long, env = ENV_PROMO_LINK)]
    link: Option<String>,

    /// Vision model ID.
    #[arg(long, env = ENV_MODEL)]
    model: Option<String>,

    /// Use a saved AI reply instead of calling the model.
    #[arg(long)]
    reply_file: Option<PathBuf>,

    /// Replace the extracted title.
    #[arg(long)]
    title: Option<String>,

    /// Replace the composed description.
    #[arg(long)]
    description: Option<String>,

    /// Replace the extracted alt text.
    #[arg(long)]
    alt_text: Option<String>,

    /// Publish the pin if the record passes validation.
    #[arg(long)]
    publish: bool,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors and the result.
    #[arg(short, long)]
    quiet: bool,

    /// AI call timeout in seconds.
    #[arg(long, default_value_t = 60)]
    api_timeout: u64,
}

#[derive(Serialize)]
struct DraftView<'a> {
    image: &'a std::path::Path,
    format: &'a str,
    width: u32,
    height: u32,
    size: String,
    record: &'a PublishRecord,
    verse: VerseParts,
    warnings: &'a [FormattingWarning],
    can_publish: bool,
    rejection_reasons: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    confirmation: Option<&'a PublishConfirmation>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start tokio runtime")?;
    runtime.block_on(run(cli, show_progress))
}

async fn run(cli: Cli, show_progress: bool) -> Result<()> {
    let progress = show_progress.then(CliProgressCallback::new);
    let config = build_config(&cli, progress.clone().map(|cb| cb as ProgressCallback))?;

    let extractor: Arc<dyn Extractor> = match cli.reply_file {
        Some(ref path) => Arc::new(FixedReply::from_file(path)?),
        None => Arc::new(GeminiExtractor::from_config(&config)?),
    };
    let publisher = Arc::new(
        PinterestPublisher::from_config(&config).context("Failed to create Pinterest client")?,
    );
    let workflow = Workflow::new(config, extractor, publisher);

    let result = process(&cli, &workflow, progress.as_deref()).await;
    if let Some(cb) = progress {
        cb.finish();
    }
    result
}

async fn process(
    cli: &Cli,
    workflow: &Workflow,
    progress: Option<&CliProgressCallback>,
) -> Result<()> {
    let show = |draft: &DraftRecord, confirmation: Option<&PublishConfirmation>| match progress {
        Some(p) => p.suspend(|| report(cli, draft, confirmation)),
        None => report(cli, draft, confirmation),
    };

    let mut draft = workflow
        .extract(&cli.image)
        .await
        .context("Extraction failed")?;

    draft.apply(RecordEdit {
        title: cli.title.clone(),
        description: cli.description.clone(),
        alt_text: cli.alt_text.clone(),
    });

    if !cli.publish {
        return show(&draft, None);
    }

    let approved = match draft.approve() {
        Ok(approved) => approved,
        Err(refused) => {
            show(&refused.draft, None)?;
            return Err(anyhow::Error::new(VersePinError::from(refused)).context("Not published"));
        }
    };

    let confirmation = workflow
        .publish(&approved)
        .await
        .context("Publishing failed")?;

    show(&approved.reopen(), Some(&confirmation))
}

/// Print the draft, the gate verdict and, when present, the publish result.
fn report(cli: &Cli, draft: &DraftRecord, confirmation: Option<&PublishConfirmation>) -> Result<()> {
    let image = draft.image();
    if cli.json {
        let view = DraftView {
            image: &image.path,
            format: &image.info.format,
            width: image.info.width,
            height: image.info.height,
            size: image.info.formatted_size(),
            record: draft.record(),
            verse: draft.verse_parts(),
            warnings: draft.warnings(),
            can_publish: draft.can_publish(),
            rejection_reasons: draft.rejection_reasons(),
            confirmation,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&view).context("Failed to serialise result")?
        );
        return Ok(());
    }

    let record = draft.record();
    println!(
        "{}",
        dim(&format!(
            "{}  {}  {}x{}  {}",
            image.path.display(),
            image.info.format,
            image.info.width,
            image.info.height,
            image.info.formatted_size()
        ))
    );
    println!("{}  {}", bold("Title:      "), record.title());
    println!("{}  {}", bold("Alt text:   "), record.alt_text());
    println!("{}  {}", bold("Confidence: "), record.confidence());
    let verse = draft.verse_parts();
    println!("{}  {}", bold("Malayalam:  "), verse.malayalam_text);
    println!("{}  {}", bold("English:    "), verse.english_text);
    println!("{}", bold("Description:"));
    for line in record.description().lines() {
        println!("  {line}");
    }

    if !cli.quiet {
        for w in draft.warnings() {
            eprintln!("{} {w}", yellow("⚠"));
        }
    }

    match confirmation {
        Some(c) => eprintln!(
            "{} Pin created  {}",
            green("✔"),
            dim(&format!("id {}", c.pin_id().unwrap_or("unknown")))
        ),
        None => {
            let reasons = draft.rejection_reasons();
            if reasons.is_empty() {
                eprintln!("{} Ready to publish (re-run with --publish)", green("✔"));
            } else {
                for reason in reasons {
                    eprintln!("{} {reason}", red("✘"));
                }
            }
        }
    }
    Ok(())
}

/// Map CLI args to `PipelineConfig`. Flags win over the environment.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<PipelineConfig> {
    let mut builder = PipelineConfig::from_env().extraction_timeout_secs(cli.api_timeout);

    if let Some(ref key) = cli.gemini_api_key {
        builder = builder.gemini_api_key(key);
    }
    if let Some(ref token) = cli.pinterest_token {
        builder = builder.pinterest_access_token(token);
    }
    if let Some(ref board) = cli.board_id {
        builder = builder.pinterest_board_id(board);
    }
    if let Some(ref link) = cli.link {
        builder = builder.promo_link(link);
    }
    if let Some(ref model) = cli.model {
        builder = builder.model(model);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
