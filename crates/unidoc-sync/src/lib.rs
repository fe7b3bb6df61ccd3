//! Repository synchronization for Unidoc.
//!
//! Each repository in the manifest is cloned (or pulled) into the sync
//! directory, then parts of its `docs/` folder are exposed inside the docs
//! tree through directory symlinks:
//!
//! | Checkout folder | Exposed as |
//! |-----------------|------------|
//! | `docs/api`      | `<docs>/api/<NNN>-<repo>` |
//! | `docs/product`  | `<docs>/products/<NNN>-<repo>` |
//! | `docs/static`   | `<docs>/static/<repo>` |
//!
//! `NNN` is the repository's zero-padded position in the manifest.

mod git;
mod links;

use std::path::{Path, PathBuf};

use unidoc_config::Config;
use unidoc_site::{Manifest, Repository, SectionKind};

pub use git::{Git, ProcessGit};

/// Synchronization error for one repository.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// `git` could not be started.
    #[error("Failed to run git {action}: {source}")]
    Spawn {
        action: &'static str,
        #[source]
        source: std::io::Error,
    },
    /// `git` exited unsuccessfully.
    #[error("git {action} failed (exit code {}): {stderr}", .status.map_or_else(|| "none".to_owned(), |c| c.to_string()))]
    Git {
        action: &'static str,
        status: Option<i32>,
        stderr: String,
    },
    /// Filesystem operation failed.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A real directory sits where a symlink should go.
    #[error("Refusing to replace directory {} with a symlink", .0.display())]
    Occupied(PathBuf),
}

/// Folder under a checkout's `docs/` exposed in the docs tree.
struct Exposure {
    source: &'static str,
    target: &'static str,
    prefixed: bool,
}

fn exposures() -> [Exposure; 3] {
    [
        Exposure {
            source: SectionKind::Api.source_dir(),
            target: SectionKind::Api.dir(),
            prefixed: true,
        },
        Exposure {
            source: SectionKind::Products.source_dir(),
            target: SectionKind::Products.dir(),
            prefixed: true,
        },
        Exposure {
            source: "static",
            target: "static",
            prefixed: false,
        },
    ]
}

/// Per-repository results of a sync pass.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Repositories synchronized, with the links created for each.
    pub synced: Vec<(String, Vec<PathBuf>)>,
    pub failed: Vec<(String, SyncError)>,
}

/// Synchronizes manifest repositories into the docs tree.
pub struct Syncer<'a, G: Git> {
    git: G,
    docs_root: &'a Path,
    sync_dir: &'a Path,
    git_host: &'a str,
}

impl<'a> Syncer<'a, ProcessGit> {
    pub fn new(config: &'a Config) -> Self {
        Self::with_git(ProcessGit, config)
    }
}

impl<'a, G: Git> Syncer<'a, G> {
    pub fn with_git(git: G, config: &'a Config) -> Self {
        Self {
            git,
            docs_root: &config.docs_resolved.root,
            sync_dir: &config.repositories_resolved.sync_dir,
            git_host: &config.repositories_resolved.git_host,
        }
    }

    /// Synchronize every repository. Failures are logged and do not stop the pass.
    pub fn sync(&self, manifest: &Manifest) -> SyncReport {
        let mut report = SyncReport::default();
        for (index, repo) in manifest.repositories().iter().enumerate() {
            match self.sync_one(index, repo) {
                Ok(links) => {
                    tracing::info!(repository = %repo.repository, links = links.len(), "Repository synchronized");
                    report.synced.push((repo.repository.clone(), links));
                }
                Err(e) => {
                    tracing::warn!(repository = %repo.repository, error = %e, "Failed to synchronize repository");
                    report.failed.push((repo.repository.clone(), e));
                }
            }
        }
        report
    }

    fn sync_one(&self, index: usize, repo: &Repository) -> Result<Vec<PathBuf>, SyncError> {
        let checkout = self.sync_dir.join(&repo.repository);
        if checkout.exists() {
            tracing::info!(repository = %repo.repository, "Updating");
            self.git.pull(&checkout)?;
        } else {
            let url = clone_url(self.git_host, repo);
            tracing::info!(repository = %repo.repository, %url, "Cloning");
            std::fs::create_dir_all(self.sync_dir).map_err(|source| SyncError::Io {
                path: self.sync_dir.to_path_buf(),
                source,
            })?;
            self.git.clone_repo(&url, &checkout)?;
        }
        self.expose(index, &repo.repository, &checkout)
    }

    /// Link a checkout's docs folders into the docs tree.
    fn expose(&self, index: usize, name: &str, checkout: &Path) -> Result<Vec<PathBuf>, SyncError> {
        let mut created = Vec::new();
        for exposure in exposures() {
            let source = checkout.join("docs").join(exposure.source);
            if !source.is_dir() {
                tracing::debug!(path = %source.display(), "Nothing to expose");
                continue;
            }
            let source = std::fs::canonicalize(&source).map_err(|e| SyncError::Io {
                path: source.clone(),
                source: e,
            })?;
            let link_name = if exposure.prefixed {
                unit_dir_name(index, name)
            } else {
                name.to_owned()
            };
            let link = self.docs_root.join(exposure.target).join(link_name);
            links::replace_dir_link(&source, &link)?;
            created.push(link);
        }
        Ok(created)
    }
}

/// Clone URL for a repository on `git_host`.
pub fn clone_url(git_host: &str, repo: &Repository) -> String {
    format!(
        "{}/{}/{}.git",
        git_host.trim_end_matches('/'),
        repo.organization,
        repo.repository
    )
}

/// Unit directory name for the repository at `index` (`000-autumn`).
pub fn unit_dir_name(index: usize, name: &str) -> String {
    format!("{index:03}-{name}")
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::fs;

    use super::*;
    use pretty_assertions::assert_eq;

    /// Records calls and lays out a fake checkout on clone.
    #[derive(Default)]
    struct FakeGit {
        calls: RefCell<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl Git for &FakeGit {
        fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), SyncError> {
            self.calls.borrow_mut().push(format!("clone {url}"));
            if self.fail_on.is_some_and(|name| url.contains(name)) {
                return Err(SyncError::Git {
                    action: "clone",
                    status: Some(128),
                    stderr: "repository not found".to_owned(),
                });
            }
            fs::create_dir_all(dest.join("docs/product/guide")).unwrap();
            fs::create_dir_all(dest.join("docs/static")).unwrap();
            Ok(())
        }

        fn pull(&self, repo: &Path) -> Result<(), SyncError> {
            let name = repo.file_name().unwrap().to_string_lossy().into_owned();
            self.calls.borrow_mut().push(format!("pull {name}"));
            Ok(())
        }
    }

    fn repo(name: &str) -> Repository {
        Repository {
            repository: name.to_owned(),
            organization: "autumn-library".to_owned(),
        }
    }

    #[test]
    fn test_naming() {
        assert_eq!(unit_dir_name(0, "autumn"), "000-autumn");
        assert_eq!(unit_dir_name(12, "winow"), "012-winow");
        assert_eq!(
            clone_url("https://github.com/", &repo("autumn")),
            "https://github.com/autumn-library/autumn.git"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_sync_clones_then_pulls_and_links() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = Config::default_with_base(temp_dir.path());
        let manifest = Manifest::new(vec![repo("autumn"), repo("winow")]).unwrap();
        let git = FakeGit::default();
        let syncer = Syncer::with_git(&git, &config);

        let report = syncer.sync(&manifest);
        assert!(report.failed.is_empty());

        let docs = temp_dir.path().join("docs");
        assert!(docs.join("products/000-autumn/guide").is_dir());
        assert!(docs.join("products/001-winow").is_dir());
        assert!(docs.join("static/winow").is_dir());
        assert!(!docs.join("api").exists());
        assert_eq!(report.synced[1].1.len(), 2);

        syncer.sync(&manifest);
        assert_eq!(
            *git.calls.borrow(),
            [
                "clone https://github.com/autumn-library/autumn.git",
                "clone https://github.com/autumn-library/winow.git",
                "pull autumn",
                "pull winow",
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_repository_does_not_stop_pass() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = Config::default_with_base(temp_dir.path());
        let manifest = Manifest::new(vec![repo("broken"), repo("winow")]).unwrap();
        let git = FakeGit {
            fail_on: Some("broken"),
            ..FakeGit::default()
        };

        let report = Syncer::with_git(&git, &config).sync(&manifest);

        let failed: Vec<_> = report.failed.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(failed, ["broken"]);
        assert!(temp_dir.path().join("docs/products/001-winow").is_dir());
    }
}
