//! Per-page metadata for "edit this page" links.

use std::path::{Component, Path};

use serde::Serialize;
use unidoc_config::RepositoriesConfig;

use crate::manifest::Manifest;
use crate::unit::SectionKind;

/// Metadata attached to a page that comes from a synchronized repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageParams {
    pub repository: String,
    pub organization: String,
    /// Path of the source file inside the repository's `docs/` folder.
    pub edit_path: String,
    pub edit_url: String,
}

impl PageParams {
    /// Compute params for a content path relative to the docs root
    /// (e.g. `products/000-autumn/guide/01-intro.md`).
    ///
    /// Returns `None` for pages outside a known unit.
    pub fn for_path(path: &Path, manifest: &Manifest, config: &RepositoriesConfig) -> Option<Self> {
        let mut segments = path.components().filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        });
        let section = SectionKind::from_dir(&segments.next()?)?;
        let unit = segments.next()?;
        let rest: Vec<_> = segments.collect();
        if rest.is_empty() {
            return None;
        }

        let repo = manifest.find_unit(&unit)?;
        let edit_path = format!("{}/{}", section.source_dir(), rest.join("/"));
        let edit_url = config
            .edit_link
            .replace("{organization}", &repo.organization)
            .replace("{repository}", &repo.repository)
            .replace("{path}", &edit_path);

        Some(Self {
            repository: repo.repository.clone(),
            organization: repo.organization.clone(),
            edit_path,
            edit_url,
        })
    }
}
