use std::path::{Component, Path};

use chrono::Utc;
use thiserror::Error;
use tokio::process::Command;
use tracing::{info, instrument, warn};

pub type PublishResult<T> = core::result::Result<T, PublishErr>;

#[derive(Debug, Error)]
pub enum PublishErr {
    #[error("cannot run git: {0}")]
    Io(#[from] std::io::Error),

    #[error("git {command} failed: {stderr}")]
    Git { command: String, stderr: String },
}

/// Commit and push the rendered report if it landed inside the managed
/// output repository. Any other destination is skipped with a log line, and
/// a clean worktree is skipped silently.
#[instrument(skip(out))]
pub async fn publish(out: &Path, managed_repo: &str) -> PublishResult<()> {
    let Some(repo_dir) = out.parent().filter(|dir| is_managed(dir, managed_repo)) else {
        info!(
            path = %out.display(),
            managed_repo,
            "output is outside the managed repository, skipping publish"
        );
        return Ok(());
    };

    let status = run_git(repo_dir, &["status", "--porcelain"]).await?;
    if status.trim().is_empty() {
        info!("nothing to commit");
        return Ok(());
    }

    run_git(repo_dir, &["add", "-A"]).await?;

    let message = format!("auto-update: {}", Utc::now().timestamp());
    run_git(repo_dir, &["commit", "-m", &message]).await?;
    run_git(repo_dir, &["push"]).await?;

    info!(repo = %repo_dir.display(), "committed and pushed dashboard update");
    Ok(())
}

/// A directory is managed when any of its path components equals the
/// configured repository folder name.
fn is_managed(dir: &Path, managed_repo: &str) -> bool {
    dir.components().any(|component| match component {
        Component::Normal(name) => name == managed_repo,
        _ => false,
    })
}

async fn run_git(cwd: &Path, args: &[&str]) -> PublishResult<String> {
    let output = Command::new("git").args(args).current_dir(cwd).output().await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        warn!(command = args.join(" "), %stderr, "git command failed");
        return Err(PublishErr::Git {
            command: args.join(" "),
            stderr,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
