//! Error types for commitgpt
//!
//! Each failure family gets its own enum so callers can decide which
//! failures are recoverable. The binary and the orchestration layer wrap
//! these in `anyhow` with added context.

use thiserror::Error;

/// Failure running an external program
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The program could not be started (not found, permission denied, ...)
    #[error("failed to execute '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program ran but exited unsuccessfully
    #[error("'{program} {}' exited with {}: {stderr}", .args.join(" "), describe_code(.code))]
    Failed {
        program: String,
        args: Vec<String>,
        code: Option<i32>,
        stderr: String,
    },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Failure of a git step
#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to read unstaged changes")]
    Diff(#[source] ProcessError),

    #[error("failed to read the changes overview")]
    DiffStat(#[source] ProcessError),

    #[error("failed to stage changes")]
    Stage(#[source] ProcessError),

    #[error("failed to create commit (changes remain staged)")]
    Commit(#[source] ProcessError),
}

/// Failure obtaining a summary from the Messages API
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("request to the summarization API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("summarization API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response from the summarization API: {0}")]
    MalformedResponse(String),

    #[error("{0}")]
    Prompt(String),
}

/// Configuration problems detected before any work is done
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set or empty; it must hold the API key")]
    MissingApiKey(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
