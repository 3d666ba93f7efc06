//! Git operations for commit creation
//!
//! This module provides functions to interact with git:
//! - Collect unstaged changes and their overview
//! - Stage the working tree and commit with a message

use tracing::{debug, info};

use crate::error::GitError;
use crate::process::CommandRunner;

const GIT: &str = "git";

/// Unstaged changes of the working tree
///
/// Only constructed by [`detect_changes`] when the diff is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    /// Output of `git diff`
    pub diff: String,
    /// Output of `git diff --stat`
    pub stat: String,
}

/// Collect the unstaged diff and its stat overview
///
/// # Returns
///
/// * `Ok(None)` - there are no unstaged changes
/// * `Ok(Some(ChangeSet))` - the diff and the `--stat` overview
///
/// # Errors
///
/// * `git diff` fails (git missing, not a repository)
/// * `git diff --stat` fails
///
/// # Example
///
/// ```no_run
/// use commitgpt::{git::detect_changes, process::SystemRunner};
///
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// match detect_changes(&SystemRunner).await? {
///     Some(changes) => println!("{}", changes.stat),
///     None => println!("No unstaged changes found."),
/// }
/// # Ok(())
/// # }
/// ```
pub async fn detect_changes(runner: &dyn CommandRunner) -> Result<Option<ChangeSet>, GitError> {
    let diff = runner
        .run(GIT, &["diff"])
        .await
        .map_err(GitError::Diff)?;

    if diff.is_empty() {
        debug!("git diff is empty");
        return Ok(None);
    }

    let stat = runner
        .run(GIT, &["diff", "--stat"])
        .await
        .map_err(GitError::DiffStat)?;

    debug!(diff_bytes = diff.len(), "collected unstaged changes");
    Ok(Some(ChangeSet { diff, stat }))
}

/// Stage the whole working tree and commit with `message`
///
/// The message is handed to git as a single argument, unmodified. The
/// commit step is skipped when staging fails. A failed commit leaves the
/// changes staged.
///
/// # Errors
///
/// * [`GitError::Stage`] - `git add .` failed
/// * [`GitError::Commit`] - `git commit -m` failed (hook rejection, nothing to commit, ...)
pub async fn commit(runner: &dyn CommandRunner, message: &str) -> Result<(), GitError> {
    runner
        .run(GIT, &["add", "."])
        .await
        .map_err(GitError::Stage)?;

    runner
        .run(GIT, &["commit", "-m", message])
        .await
        .map_err(GitError::Commit)?;

    info!("commit created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned results and records every invocation
    struct Replay {
        results: Mutex<VecDeque<Result<String, ProcessError>>>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl Replay {
        fn new(results: Vec<Result<String, ProcessError>>) -> Self {
            Self {
                results: Mutex::new(results.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandRunner for Replay {
        async fn run(&self, program: &str, args: &[&str]) -> Result<String, ProcessError> {
            let mut call = vec![program.to_string()];
            call.extend(args.iter().map(|arg| arg.to_string()));
            self.calls.lock().unwrap().push(call);
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected command")
        }
    }

    fn failure(args: &[&str]) -> ProcessError {
        ProcessError::Failed {
            program: "git".to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
            code: Some(1),
            stderr: "boom".to_string(),
        }
    }

    #[tokio::test]
    async fn test_detect_changes_empty_diff_returns_none() {
        // Arrange - git diff prints nothing
        let runner = Replay::new(vec![Ok(String::new())]);

        // Act
        let result = detect_changes(&runner).await.unwrap();

        // Assert - no stat call is made
        assert!(result.is_none());
        assert_eq!(runner.calls(), vec![vec!["git", "diff"]]);
    }

    #[tokio::test]
    async fn test_detect_changes_collects_diff_and_stat() {
        let runner = Replay::new(vec![
            Ok("modified file.go".to_string()),
            Ok("1 file changed".to_string()),
        ]);

        let result = detect_changes(&runner).await.unwrap();

        assert_eq!(
            result,
            Some(ChangeSet {
                diff: "modified file.go".to_string(),
                stat: "1 file changed".to_string(),
            })
        );
        assert_eq!(
            runner.calls(),
            vec![vec!["git", "diff"], vec!["git", "diff", "--stat"]]
        );
    }

    #[tokio::test]
    async fn test_detect_changes_diff_failure() {
        let runner = Replay::new(vec![Err(failure(&["diff"]))]);

        let result = detect_changes(&runner).await;

        assert!(matches!(result, Err(GitError::Diff(_))));
    }

    #[tokio::test]
    async fn test_detect_changes_stat_failure_is_hard_error() {
        let runner = Replay::new(vec![
            Ok("modified file.go".to_string()),
            Err(failure(&["diff", "--stat"])),
        ]);

        let result = detect_changes(&runner).await;

        assert!(matches!(result, Err(GitError::DiffStat(_))));
    }

    #[tokio::test]
    async fn test_commit_stages_then_commits_with_single_argument() {
        // Arrange - message with quotes and spaces
        let runner = Replay::new(vec![Ok(String::new()), Ok(String::new())]);
        let message = r#"fix: handle "quoted" paths and spaces"#;

        // Act
        commit(&runner, message).await.unwrap();

        // Assert
        assert_eq!(
            runner.calls(),
            vec![
                vec!["git", "add", "."],
                vec!["git", "commit", "-m", message],
            ]
        );
    }

    #[tokio::test]
    async fn test_commit_skips_commit_when_staging_fails() {
        let runner = Replay::new(vec![Err(failure(&["add", "."]))]);

        let result = commit(&runner, "feat: something").await;

        assert!(matches!(result, Err(GitError::Stage(_))));
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_commit_failure_is_reported() {
        let runner = Replay::new(vec![Ok(String::new()), Err(failure(&["commit"]))]);

        let result = commit(&runner, "feat: something").await;

        assert!(matches!(result, Err(GitError::Commit(_))));
    }
}
