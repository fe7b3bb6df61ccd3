//! Git operations behind a trait, run as an external `git` process.

use std::path::Path;
use std::process::Command;

use crate::SyncError;

/// Clone and update operations used by the synchronizer.
pub trait Git {
    /// Clone `url` into `dest`.
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), SyncError>;
    /// Fast-forward the checkout at `repo`.
    fn pull(&self, repo: &Path) -> Result<(), SyncError>;
}

/// [`Git`] implementation that spawns the `git` executable.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessGit;

impl ProcessGit {
    fn run(command: &mut Command, action: &'static str) -> Result<(), SyncError> {
        let output = command
            .output()
            .map_err(|source| SyncError::Spawn { action, source })?;
        if output.status.success() {
            return Ok(());
        }
        Err(SyncError::Git {
            action,
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        })
    }
}

impl Git for ProcessGit {
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), SyncError> {
        Self::run(
            Command::new("git").arg("clone").arg(url).arg(dest),
            "clone",
        )
    }

    fn pull(&self, repo: &Path) -> Result<(), SyncError> {
        Self::run(
            Command::new("git").args(["pull", "--ff-only"]).current_dir(repo),
            "pull",
        )
    }
}
