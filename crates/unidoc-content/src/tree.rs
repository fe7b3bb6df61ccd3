//! In-memory content tree.
//!
//! The tree is produced once per invocation by [`ContentTree::scan`] and then
//! consumed by pure transformations. Every node is classified up front, so
//! consumers never re-check the filesystem for `index.md`.

use std::path::PathBuf;

use crate::front_matter::FrontMatter;
use crate::naming::EntryName;

/// Role of a node in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    Document,
    /// `index.md`: the landing document of its parent directory.
    IndexDocument,
}

/// Loaded markdown source.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub front_matter: FrontMatter,
    /// Content after the front matter block.
    pub body: String,
}

/// A directory or markdown document.
///
/// Children of a directory are stored as: directories, then the index
/// document (if any), then other documents. Directories and documents are
/// each ordered by [`EntryName::cmp_siblings`].
#[derive(Debug, Clone, PartialEq)]
pub struct ContentNode {
    /// Path relative to the tree root (empty for the root itself).
    pub rel_path: PathBuf,
    pub name: EntryName,
    /// Display title: front matter `title`, else derived from the name.
    /// Directories use their index document's front matter title.
    pub title: String,
    pub kind: NodeKind,
    pub children: Vec<ContentNode>,
    /// Loaded content; `None` for directories.
    pub source: Option<Source>,
}

impl ContentNode {
    pub fn is_directory(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Child directories, in sibling order.
    pub fn directories(&self) -> impl Iterator<Item = &ContentNode> {
        self.children.iter().filter(|c| c.kind == NodeKind::Directory)
    }

    /// Direct documents other than the index, in sibling order.
    pub fn documents(&self) -> impl Iterator<Item = &ContentNode> {
        self.children.iter().filter(|c| c.kind == NodeKind::Document)
    }

    /// The directory's landing document.
    pub fn index(&self) -> Option<&ContentNode> {
        self.children
            .iter()
            .find(|c| c.kind == NodeKind::IndexDocument)
    }

    /// Check whether the subtree holds any markdown document.
    pub fn has_documents(&self) -> bool {
        self.children
            .iter()
            .any(|c| !c.is_directory() || c.has_documents())
    }

    /// Find a descendant by relative path.
    #[cfg(test)]
    pub(crate) fn find(&self, rel_path: &std::path::Path) -> Option<&ContentNode> {
        let mut node = self;
        for component in rel_path.components() {
            let name = component.as_os_str().to_string_lossy();
            node = node.children.iter().find(|c| c.name.raw == name)?;
        }
        Some(node)
    }
}

/// Scanned content tree rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct ContentTree {
    /// Absolute (or caller-relative) path of the scanned directory.
    pub root: PathBuf,
    /// Root directory node.
    pub node: ContentNode,
}

impl ContentTree {
    /// Check whether the tree holds any markdown document.
    pub fn has_documents(&self) -> bool {
        self.node.has_documents()
    }
}
