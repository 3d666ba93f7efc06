//! commitgpt - Commit unstaged changes with a generated message
//!
//! This library collects the unstaged git diff, asks the Claude Messages API
//! for a one-line summary, turns it into a conventional commit message and
//! commits everything.
//!
//! # Modules
//!
//! - [`process`] - External process execution
//! - [`git`] - Change detection, staging and committing
//! - [`prompt`] - Prompt construction and size limits
//! - [`claude`] - Messages API client
//! - [`classify`] - Commit type classification and message composition
//! - [`app`] - The end-to-end pipeline
//! - [`config`] - Configuration file and API key
//! - [`output`] - Output structures for JSON formatting
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```no_run
//! use commitgpt::app::{run, Outcome, RunOptions};
//! use commitgpt::claude::ClaudeClient;
//! use commitgpt::config::{ApiKey, Config};
//! use commitgpt::process::SystemRunner;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let options = RunOptions {
//!     prefix: config.prefix,
//!     on_summary_error: config.on_summary_error,
//!     fallback_summary: config.fallback_summary.clone(),
//!     preview: true,
//! };
//! let outcome = run(
//!     &SystemRunner,
//!     || Ok(ClaudeClient::new(&config, ApiKey::from_env(&config.api_key_env)?)?),
//!     &options,
//! )
//! .await?;
//! if let Outcome::Previewed { message, .. } = outcome {
//!     println!("Would commit: {}", message);
//! }
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod classify;
pub mod claude;
pub mod config;
pub mod error;
pub mod git;
pub mod output;
pub mod process;
pub mod prompt;
