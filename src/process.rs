//! External process execution
//!
//! All git interaction goes through [`CommandRunner`] so the pipeline can be
//! driven by a scripted runner in tests. Arguments are always passed as
//! separate argv entries, never through a shell.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::ProcessError;

/// Runs an external program and returns its trimmed standard output
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, wait for it to exit and return stdout
    ///
    /// # Errors
    ///
    /// * [`ProcessError::Spawn`] if the program cannot be started
    /// * [`ProcessError::Failed`] if it exits with a non-zero status
    async fn run(&self, program: &str, args: &[&str]) -> Result<String, ProcessError>;
}

/// Runner backed by real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<String, ProcessError> {
        debug!(program, ?args, "running command");

        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|source| ProcessError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            warn!(program, ?args, code = ?output.status.code(), %stderr, "command failed");
            return Err(ProcessError::Failed {
                program: program.to_string(),
                args: args.iter().map(|arg| arg.to_string()).collect(),
                code: output.status.code(),
                stderr,
            });
        }

        if !stderr.is_empty() {
            debug!(program, %stderr, "command wrote to stderr");
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
