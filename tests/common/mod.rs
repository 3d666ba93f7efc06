//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use commitgpt::app::RunOptions;
use commitgpt::claude::Summarizer;
use commitgpt::config::{PrefixMode, SummaryErrorPolicy};
use commitgpt::error::{ProcessError, SummaryError};
use commitgpt::process::CommandRunner;

/// Command runner that replays canned results and records invocations.
pub struct ScriptedRunner {
    results: Mutex<VecDeque<Result<String, ProcessError>>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    pub fn new(results: Vec<Result<String, ProcessError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Runner for a tree with `diff`/`stat` whose add and commit succeed.
    pub fn with_changes(diff: &str, stat: &str) -> Self {
        Self::new(vec![
            Ok(diff.to_string()),
            Ok(stat.to_string()),
            Ok(String::new()),
            Ok(String::new()),
        ])
    }

    pub fn clean() -> Self {
        Self::new(vec![Ok(String::new())])
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    /// Message passed to `git commit -m`, if a commit was attempted.
    pub fn commit_message(&self) -> Option<String> {
        self.calls()
            .into_iter()
            .find(|call| call.get(1).map(String::as_str) == Some("commit"))
            .and_then(|call| call.get(3).cloned())
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<String, ProcessError> {
        let mut call = vec![program.to_string()];
        call.extend(args.iter().map(|arg| arg.to_string()));
        self.calls.lock().unwrap().push(call);
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected command: {program} {args:?}"))
    }
}

pub fn git_failure(args: &[&str], stderr: &str) -> ProcessError {
    ProcessError::Failed {
        program: "git".to_string(),
        args: args.iter().map(|arg| arg.to_string()).collect(),
        code: Some(1),
        stderr: stderr.to_string(),
    }
}

/// What a [`FakeSummarizer`] answers with.
pub enum Reply {
    Text(&'static str),
    Status(u16),
    Malformed,
    Prompt,
}

/// Summarizer returning a fixed reply and counting calls.
pub struct FakeSummarizer {
    reply: Reply,
    calls: AtomicUsize,
    seen: Mutex<Option<(String, String)>>,
}

impl FakeSummarizer {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Option<(String, String)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl<'a> Summarizer for &'a FakeSummarizer {
    async fn summarize(&self, diff: &str, stat: &str) -> Result<String, SummaryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.seen.lock().unwrap() = Some((diff.to_string(), stat.to_string()));
        match self.reply {
            Reply::Text(text) => Ok(text.to_string()),
            Reply::Status(status) => Err(SummaryError::Status {
                status,
                body: "overloaded".to_string(),
            }),
            Reply::Malformed => Err(SummaryError::MalformedResponse(
                "response has no content blocks".to_string(),
            )),
            Reply::Prompt => Err(SummaryError::Prompt("Prompt size too large".to_string())),
        }
    }
}

pub fn options(prefix: PrefixMode, policy: SummaryErrorPolicy) -> RunOptions {
    RunOptions {
        prefix,
        on_summary_error: policy,
        fallback_summary: "Unable to generate summary".to_string(),
        preview: false,
    }
}
