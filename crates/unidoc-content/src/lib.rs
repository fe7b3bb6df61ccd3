//! Content model for Unidoc documentation trees.
//!
//! This crate provides:
//! - [`ContentTree`]: a directory of markdown documents scanned into memory
//! - [`naming`]: the `[NNN-]name` ordering convention shared by all passes
//! - [`front_matter`]: YAML metadata at the top of documents
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use unidoc_content::ContentTree;
//!
//! let tree = ContentTree::scan("docs/products/000-autumn")?;
//! for document in tree.node.documents() {
//!     println!("{}", document.title);
//! }
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

pub mod front_matter;
pub mod naming;
mod scanner;
mod tree;

pub use front_matter::FrontMatter;
pub use naming::{EntryName, OrderKey};
pub use tree::{ContentNode, ContentTree, NodeKind, Source};

/// Error returned when a content root cannot be scanned.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// Root directory does not exist.
    #[error("Content directory not found: {}", .0.display())]
    NotFound(PathBuf),
    /// Root path exists but is not a directory.
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    /// Root directory could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ContentError {
    pub(crate) fn io(source: std::io::Error, path: &Path) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl ContentTree {
    /// Scan a directory into a content tree.
    ///
    /// Hidden entries and non-markdown files are ignored. Unreadable entries
    /// below the root are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError`] when `root` is missing, not a directory, or
    /// cannot be listed.
    pub fn scan(root: impl Into<PathBuf>) -> Result<Self, ContentError> {
        scanner::Scanner::new(root.into()).scan()
    }
}
