//! Command-execution seam for the git binary.
//!
//! The publish workflow talks to git only through [`GitRunner`], so tests
//! can substitute a fake without a real repository or binary.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

#[async_trait]
pub trait GitRunner: Send + Sync {
    /// Run `git {args}` and capture its output. A nonzero exit is a normal
    /// `CommandOutput`; failing to spawn the binary at all is
    /// `ToolUnavailable`.
    async fn run(
        &self,
        args: &[&str],
        extra_env: &[(String, String)],
    ) -> Result<CommandOutput, ApiError>;
}

/// Runs the real git binary inside the blog repository.
pub struct SystemGit {
    repo_root: PathBuf,
}

impl SystemGit {
    pub fn new(repo_root: PathBuf) -> Self {
        Self { repo_root }
    }
}

#[async_trait]
impl GitRunner for SystemGit {
    async fn run(
        &self,
        args: &[&str],
        extra_env: &[(String, String)],
    ) -> Result<CommandOutput, ApiError> {
        let output = tokio::process::Command::new("git")
            .args(args)
            .current_dir(&self.repo_root)
            // A push that would prompt for credentials must fail, not hang
            .env("GIT_TERMINAL_PROMPT", "0")
            .envs(extra_env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .output()
            .await
            .map_err(|e| ApiError::ToolUnavailable(e.to_string()))?;

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
