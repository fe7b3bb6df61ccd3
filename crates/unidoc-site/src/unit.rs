//! Documentation units: one synchronized repository's docs within a section.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use unidoc_config::SinglePageConfig;
use unidoc_content::EntryName;
use unidoc_content::naming::{strip_order_prefix, titlecase_from_slug};

/// Top-level content section holding units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Products,
    Api,
}

impl SectionKind {
    /// All sections, in generation order.
    pub const ALL: [Self; 2] = [Self::Products, Self::Api];

    /// Directory name under the docs root.
    pub fn dir(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Api => "api",
        }
    }

    /// Subdirectory of a repository's `docs/` folder exposed as this section.
    pub fn source_dir(self) -> &'static str {
        match self {
            Self::Products => "product",
            Self::Api => "api",
        }
    }

    /// Parse a section directory name.
    pub fn from_dir(dir: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.dir() == dir)
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir())
    }
}

/// Error for an unknown section name.
#[derive(Debug, thiserror::Error)]
#[error("Unknown section type \"{0}\", expected one of: products, api")]
pub struct UnknownSection(pub String);

impl FromStr for SectionKind {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_dir(s).ok_or_else(|| UnknownSection(s.to_owned()))
    }
}

/// A unit directory such as `docs/products/000-autumn`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub section: SectionKind,
    /// Directory name as found on disk (e.g. `000-autumn`).
    pub dir_name: String,
}

impl Unit {
    pub fn new(section: SectionKind, dir_name: impl Into<String>) -> Self {
        Self {
            section,
            dir_name: dir_name.into(),
        }
    }

    /// Routable name: prefix stripped, lowercased, whitespace as `-`.
    pub fn name(&self) -> String {
        strip_order_prefix(&self.dir_name)
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Human-readable name (`autumn-cli` -> `Autumn Cli`).
    pub fn display_name(&self) -> String {
        titlecase_from_slug(&self.name())
    }

    /// Identity used in logs (`products/000-autumn`).
    pub fn id(&self) -> String {
        format!("{}/{}", self.section, self.dir_name)
    }

    /// Source directory of the unit.
    pub fn source_dir(&self, docs_root: &Path) -> PathBuf {
        docs_root.join(self.section.dir()).join(&self.dir_name)
    }

    /// Site URL of the unit's source directory, used to root relative assets.
    pub fn source_url(&self) -> String {
        format!("/{}/{}", self.section, self.dir_name)
    }

    /// Route prefix of the generated page, relative to the docs root.
    fn route(&self) -> PathBuf {
        match self.section {
            SectionKind::Products => PathBuf::from(self.name()),
            SectionKind::Api => Path::new("api").join(self.name()),
        }
    }

    /// Primary output file.
    ///
    /// Products: `<docs>/<name>/<file_name>`; API: `<docs>/api/<name>/<file_name>`.
    pub fn output_path(&self, docs_root: &Path, config: &SinglePageConfig) -> PathBuf {
        docs_root.join(self.route()).join(&config.file_name)
    }

    /// Toggle variant output file: `<docs>/<toggle_dir>/[api/]<name>/index.md`.
    pub fn toggle_path(&self, docs_root: &Path, config: &SinglePageConfig) -> PathBuf {
        docs_root
            .join(config.toggle_dir.trim_matches('/'))
            .join(self.route())
            .join("index.md")
    }

    /// Public URL of the primary output page.
    pub fn page_url(&self, config: &SinglePageConfig) -> String {
        let file = Path::new(&config.file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let route = self.route().to_string_lossy().replace('\\', "/");
        format!("/{route}/{file}")
    }
}

/// List the units of a section, in sibling order.
///
/// Symlinks count as units even when dangling, so that a unit whose source
/// disappeared is reported rather than silently dropped. A missing section
/// directory yields no units.
pub fn discover(docs_root: &Path, section: SectionKind) -> Vec<Unit> {
    let section_dir = docs_root.join(section.dir());
    let entries = match fs::read_dir(&section_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::warn!(path = %section_dir.display(), error = %e, "Failed to list section");
            return Vec::new();
        }
    };

    let mut names: Vec<EntryName> = entries
        .filter_map(Result::ok)
        .filter(|entry| {
            entry
                .file_type()
                .is_ok_and(|t| t.is_dir() || t.is_symlink())
        })
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| !name.starts_with('.'))
        .map(|name| EntryName::directory(&name))
        .collect();
    names.sort_by(EntryName::cmp_siblings);

    names
        .into_iter()
        .map(|name| Unit::new(section, name.raw))
        .collect()
}
