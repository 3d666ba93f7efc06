//! Commit pipeline
//!
//! Detect changes, summarize, compose the message, then commit. Each step
//! runs once and in order.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::claude::Summarizer;
use crate::classify::{CommitType, compose_message};
use crate::config::{PrefixMode, SummaryErrorPolicy};
use crate::error::SummaryError;
use crate::git::{commit, detect_changes};
use crate::process::CommandRunner;

/// Knobs for a single run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub prefix: PrefixMode,
    pub on_summary_error: SummaryErrorPolicy,
    pub fallback_summary: String,
    /// Compose the message without staging or committing
    pub preview: bool,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The working tree has no unstaged changes
    NoChanges,
    /// A commit was created with `message`
    Committed {
        commit_type: CommitType,
        message: String,
    },
    /// Preview mode: the message that would have been committed
    Previewed {
        commit_type: CommitType,
        message: String,
    },
}

/// Run the pipeline
///
/// `make_summarizer` is only called when there are changes to summarize,
/// so a run with a clean tree needs no credentials and makes no request.
///
/// # Errors
///
/// * Any git step fails
/// * `make_summarizer` fails
/// * The prompt is too large
/// * Summarization fails and the policy is [`SummaryErrorPolicy::Abort`]
pub async fn run<S, F>(
    runner: &dyn CommandRunner,
    make_summarizer: F,
    options: &RunOptions,
) -> Result<Outcome>
where
    S: Summarizer,
    F: FnOnce() -> Result<S>,
{
    let Some(changes) = detect_changes(runner).await? else {
        return Ok(Outcome::NoChanges);
    };

    let summarizer = make_summarizer()?;
    let summary = summarize(&summarizer, &changes.diff, &changes.stat, options).await?;

    let composed = compose_message(&summary, options.prefix, &options.fallback_summary);
    info!(
        commit_type = %composed.commit_type,
        message = %composed.message,
        "composed commit message"
    );

    if options.preview {
        return Ok(Outcome::Previewed {
            commit_type: composed.commit_type,
            message: composed.message,
        });
    }

    commit(runner, &composed.message).await?;

    Ok(Outcome::Committed {
        commit_type: composed.commit_type,
        message: composed.message,
    })
}

/// Obtain a summary, applying the error policy
async fn summarize(
    summarizer: &dyn Summarizer,
    diff: &str,
    stat: &str,
    options: &RunOptions,
) -> Result<String> {
    match summarizer.summarize(diff, stat).await {
        Ok(summary) => Ok(summary),
        // An oversized prompt will not get better on its own
        Err(error @ SummaryError::Prompt(_)) => Err(error.into()),
        Err(error) => match options.on_summary_error {
            SummaryErrorPolicy::Abort => Err(error).context("Error generating summary"),
            SummaryErrorPolicy::Fallback => {
                warn!(%error, fallback = %options.fallback_summary, "using fallback summary");
                Ok(options.fallback_summary.clone())
            }
        },
    }
}
