//! Content tree construction by filesystem walking.
//!
//! This is the only place that touches the filesystem for reading content.
//! The walk classifies every entry once (directory, document, index document)
//! and loads document sources, producing a [`ContentTree`] that downstream
//! passes transform without further I/O.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::ContentError;
use crate::front_matter;
use crate::naming::EntryName;
use crate::tree::{ContentNode, ContentTree, NodeKind, Source};

/// Directory nesting beyond which the walk stops descending.
///
/// Guards against symlink cycles between synchronized repositories.
const MAX_DEPTH: usize = 32;

/// Directory entry with its type resolved through symlinks.
struct Entry {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

/// Builds a [`ContentTree`] from a directory on disk.
pub(crate) struct Scanner {
    root: PathBuf,
}

impl Scanner {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Walk the root directory.
    ///
    /// Fails only when the root itself is missing, not a directory, or
    /// unreadable. Problems below the root are logged and skipped.
    pub fn scan(&self) -> Result<ContentTree, ContentError> {
        let metadata = fs::metadata(&self.root).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ContentError::NotFound(self.root.clone()),
            _ => ContentError::io(e, &self.root),
        })?;
        if !metadata.is_dir() {
            return Err(ContentError::NotADirectory(self.root.clone()));
        }

        let entries = read_entries(&self.root).map_err(|e| ContentError::io(e, &self.root))?;
        let name = EntryName::directory(
            &self
                .root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
        let node = self.build_directory(PathBuf::new(), name, entries, 0);

        tracing::debug!(root = %self.root.display(), "Content tree scanned");
        Ok(ContentTree {
            root: self.root.clone(),
            node,
        })
    }

    fn build_directory(
        &self,
        rel_path: PathBuf,
        name: EntryName,
        entries: Vec<Entry>,
        depth: usize,
    ) -> ContentNode {
        let mut directories = Vec::new();
        let mut documents = Vec::new();

        for entry in entries {
            let child_rel = rel_path.join(&entry.name);
            if entry.is_dir {
                if depth >= MAX_DEPTH {
                    tracing::warn!(path = %entry.path.display(), "Directory nesting too deep, skipping");
                    continue;
                }
                let child_entries = match read_entries(&entry.path) {
                    Ok(entries) => entries,
                    Err(e) => {
                        tracing::warn!(path = %entry.path.display(), error = %e, "Failed to read directory, skipping");
                        continue;
                    }
                };
                let child_name = EntryName::directory(&entry.name);
                directories.push(self.build_directory(
                    child_rel,
                    child_name,
                    child_entries,
                    depth + 1,
                ));
            } else if let Some(document) = load_document(&entry, child_rel) {
                documents.push(document);
            }
        }

        directories.sort_by(|a, b| a.name.cmp_siblings(&b.name));
        documents.sort_by(|a, b| a.name.cmp_siblings(&b.name));

        // First index in sibling order wins; any other is a regular document.
        if let Some(index) = documents.iter_mut().find(|d| d.name.is_index()) {
            index.kind = NodeKind::IndexDocument;
        }

        let title = documents
            .iter()
            .find(|d| d.kind == NodeKind::IndexDocument)
            .and_then(|index| index.source.as_ref())
            .and_then(|source| source.front_matter.title())
            .map_or_else(|| name.title(), str::to_owned);

        let mut children = directories;
        if let Some(pos) = documents
            .iter()
            .position(|d| d.kind == NodeKind::IndexDocument)
        {
            children.push(documents.remove(pos));
        }
        children.extend(documents);

        ContentNode {
            rel_path,
            name,
            title,
            kind: NodeKind::Directory,
            children,
            source: None,
        }
    }
}

/// List visible entries of a directory.
///
/// Hidden entries (leading `.`) and broken symlinks are dropped; symlinked
/// directories count as directories. Non-markdown files are dropped.
fn read_entries(dir: &Path) -> io::Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        let Ok(metadata) = fs::metadata(&path) else {
            tracing::debug!(path = %path.display(), "Skipping dangling entry");
            continue;
        };
        let is_dir = metadata.is_dir();
        if is_dir || is_markdown(&path) {
            entries.push(Entry { name, path, is_dir });
        }
    }
    Ok(entries)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

/// Read and classify a markdown file. Unreadable files are logged and skipped.
fn load_document(entry: &Entry, rel_path: PathBuf) -> Option<ContentNode> {
    let content = fs::read_to_string(&entry.path)
        .inspect_err(|e| {
            tracing::warn!(path = %entry.path.display(), error = %e, "Failed to read document, skipping");
        })
        .ok()?;

    let split = front_matter::split(&content);
    if split.malformed {
        tracing::debug!(path = %entry.path.display(), "Malformed front matter, using filename title");
    }

    let name = EntryName::document(&entry.name);
    let title = split
        .front_matter
        .title()
        .map_or_else(|| name.title(), str::to_owned);

    Some(ContentNode {
        rel_path,
        name,
        title,
        kind: NodeKind::Document,
        children: Vec::new(),
        source: Some(Source {
            body: split.body.to_owned(),
            front_matter: split.front_matter,
        }),
    })
}
