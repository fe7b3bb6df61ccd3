//! Repository manifest (`repositories.json`).
//!
//! The manifest lists the upstream repositories whose documentation is
//! aggregated. A repository's position in the list is the numeric prefix of
//! its unit directories (`000-autumn`, `001-winow`, ...).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use unidoc_content::naming::split_order_prefix;

/// One upstream repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Repository name, also used as the local checkout directory.
    pub repository: String,
    /// Owning organization or user.
    pub organization: String,
}

/// Manifest loading error.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Repository manifest not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid repository entry #{index}: {message}")]
    Invalid { index: usize, message: String },
}

/// Ordered list of repositories, loaded once per invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    repositories: Vec<Repository>,
}

impl Manifest {
    /// Load and validate a manifest file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ManifestError::NotFound(path.to_path_buf())
            } else {
                ManifestError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;
        let repositories: Vec<Repository> =
            serde_json::from_str(&content).map_err(|source| ManifestError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::new(repositories)
    }

    /// Build a manifest from records, validating each one.
    pub fn new(repositories: Vec<Repository>) -> Result<Self, ManifestError> {
        for (index, repo) in repositories.iter().enumerate() {
            validate_name(index, "repository", &repo.repository)?;
            validate_name(index, "organization", &repo.organization)?;
        }
        Ok(Self { repositories })
    }

    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    /// Find the repository behind a unit directory such as `000-autumn`.
    ///
    /// The numeric prefix selects the entry when it names the same
    /// repository; otherwise the first entry with that name wins.
    pub fn find_unit(&self, dir_name: &str) -> Option<&Repository> {
        let (order, name) = split_order_prefix(dir_name);
        usize::try_from(order.0)
            .ok()
            .and_then(|index| self.repositories.get(index))
            .filter(|repo| repo.repository == name)
            .or_else(|| self.repositories.iter().find(|repo| repo.repository == name))
    }
}

fn validate_name(index: usize, field: &str, value: &str) -> Result<(), ManifestError> {
    let message = if value.trim().is_empty() {
        format!("{field} cannot be empty")
    } else if value.contains(['/', '\\']) || value == "." || value == ".." {
        format!("{field} \"{value}\" is not a plain name")
    } else {
        return Ok(());
    };
    Err(ManifestError::Invalid { index, message })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use pretty_assertions::assert_eq;

    fn repo(repository: &str, organization: &str) -> Repository {
        Repository {
            repository: repository.to_owned(),
            organization: organization.to_owned(),
        }
    }

    #[test]
    fn test_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("repositories.json");
        fs::write(
            &path,
            r#"[
  {"repository": "autumn", "organization": "autumn-library"},
  {"repository": "winow", "organization": "autumn-library"}
]"#,
        )
        .unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(
            manifest.repositories(),
            [repo("autumn", "autumn-library"), repo("winow", "autumn-library")]
        );
    }

    #[test]
    fn test_load_missing() {
        let result = Manifest::load(Path::new("/nonexistent/repositories.json"));
        assert!(matches!(result, Err(ManifestError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("repositories.json");
        fs::write(&path, r#"[{"repository": "autumn"}]"#).unwrap();

        let result = Manifest::load(&path);
        assert!(matches!(result, Err(ManifestError::Parse { .. })));
    }

    #[test]
    fn test_rejects_path_like_names() {
        let err = Manifest::new(vec![repo("ok", "org"), repo("../evil", "org")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid repository entry #1: repository \"../evil\" is not a plain name"
        );
        assert!(Manifest::new(vec![repo("a", " ")]).is_err());
    }

    #[test]
    fn test_find_unit() {
        let manifest = Manifest::new(vec![
            repo("autumn", "org-a"),
            repo("winow", "org-b"),
            repo("autumn", "fork"),
        ])
        .unwrap();

        assert_eq!(manifest.find_unit("000-autumn").unwrap().organization, "org-a");
        assert_eq!(manifest.find_unit("002-autumn").unwrap().organization, "fork");
        assert_eq!(manifest.find_unit("007-winow").unwrap().organization, "org-b");
        assert_eq!(manifest.find_unit("winow").unwrap().organization, "org-b");
        assert!(manifest.find_unit("000-missing").is_none());
    }
}
