//! CLI tool to commit unstaged changes with a generated message
//!
//! This tool summarizes the unstaged git diff with Claude, prefixes the
//! summary with a conventional commit type, stages everything and commits.

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use std::io::{self, Write};
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::time::{Duration, sleep};

use commitgpt::{
    app::{self, Outcome, RunOptions},
    claude::{ClaudeClient, Summarizer},
    config::{ApiKey, Config, PrefixMode, SummaryErrorPolicy, load_config},
    error::SummaryError,
    output::CommitMessage,
    process::SystemRunner,
};

/// Command-line arguments
#[derive(Parser)]
#[command(name = "commitgpt", version)]
#[command(about = "Commit unstaged changes with a message summarized by Claude", long_about = None)]
struct Args {
    /// Preview: print the message as JSON without staging or committing
    #[arg(long)]
    json: bool,

    /// Path to a configuration file (TOML format)
    #[arg(long)]
    config: Option<String>,

    /// Fail instead of committing a fallback message when summarization fails
    #[arg(long)]
    strict: bool,

    /// How to apply the classified commit type to the summary
    #[arg(long, value_enum)]
    prefix: Option<PrefixMode>,

    /// Model identifier to request
    #[arg(long)]
    model: Option<String>,
}

/// Main entry point
///
/// # Process flow
///
/// 1. Parse command-line arguments (`--help` exits here)
/// 2. Load configuration
/// 3. Detect unstaged changes
/// 4. Summarize them with Claude (with spinner display)
/// 5. Compose the message, stage and commit, or print JSON
#[tokio::main]
async fn main() {
    // Write to stderr so logs don't interfere with stdout output
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => exit_on_usage(e),
    };

    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");
        for cause in e.chain().skip(1) {
            eprintln!("  Caused by: {cause}");
        }
        process::exit(1);
    }
}

/// `--help` and `--version` exit 0, every other argument error exits 1
fn exit_on_usage(error: clap::Error) -> ! {
    let code = if error.use_stderr() { 1 } else { 0 };
    let _ = error.print();
    process::exit(code);
}

async fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    if let Some(model) = args.model {
        config.model = model;
    }
    if let Some(prefix) = args.prefix {
        config.prefix = prefix;
    }
    if args.strict {
        config.on_summary_error = SummaryErrorPolicy::Abort;
    }
    config.validate()?;

    let options = RunOptions {
        prefix: config.prefix,
        on_summary_error: config.on_summary_error,
        fallback_summary: config.fallback_summary.clone(),
        preview: args.json,
    };

    let show_spinner = !args.json;
    let outcome = app::run(
        &SystemRunner,
        || {
            let api_key = ApiKey::from_env(&config.api_key_env)?;
            Ok(WithSpinner {
                inner: ClaudeClient::new(&config, api_key)?,
                enabled: show_spinner,
            })
        },
        &options,
    )
    .await?;

    if args.json {
        println!("{}", serde_json::to_string(&CommitMessage::from(&outcome))?);
        return Ok(());
    }

    match outcome {
        Outcome::NoChanges => println!("No unstaged changes found."),
        Outcome::Committed { message, .. } => println!("Created commit: {}", message),
        Outcome::Previewed { message, .. } => println!("Commit message: {}", message),
    }

    Ok(())
}

/// Shows a rotating spinner while the inner summarizer works
struct WithSpinner<S> {
    inner: S,
    enabled: bool,
}

#[async_trait]
impl<S: Summarizer> Summarizer for WithSpinner<S> {
    async fn summarize(&self, diff: &str, stat: &str) -> Result<String, SummaryError> {
        if !self.enabled {
            return self.inner.summarize(diff, stat).await;
        }

        let spinner_running = Arc::new(AtomicBool::new(true));
        let spinner_running_clone = Arc::clone(&spinner_running);

        let spinner_task = tokio::spawn(async move {
            let spinner_chars = [
                '⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏',
            ];
            let mut idx = 0;

            while spinner_running_clone.load(Ordering::Relaxed) {
                print!("\r{} Summarizing changes...", spinner_chars[idx]);
                let _ = io::stdout().flush();
                idx = (idx + 1) % spinner_chars.len();
                sleep(Duration::from_millis(80)).await;
            }

            // Clear spinner line
            print!("\r\x1b[K");
            let _ = io::stdout().flush();
        });

        let result = self.inner.summarize(diff, stat).await;

        spinner_running.store(false, Ordering::Relaxed);
        // A panicked spinner only affects the terminal line
        let _ = spinner_task.await;

        result
    }
}
