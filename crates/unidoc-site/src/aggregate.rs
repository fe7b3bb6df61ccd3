//! Flattening a unit's content tree into reading order.
//!
//! At every level, direct documents come first (ordered by prefix), then
//! subdirectories: those named in the priority list in list order, then the
//! rest by name. The priority list is matched against directory names with
//! their numeric prefix stripped.

use std::cmp::Ordering;
use std::path::PathBuf;

use unidoc_content::{ContentNode, ContentTree, FrontMatter};

/// One document in the flattened sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedEntry {
    /// Path relative to the unit root.
    pub source_path: PathBuf,
    /// Display title.
    pub title: String,
    /// Body without front matter.
    pub content: String,
    pub front_matter: FrontMatter,
    /// Titles of the directories between the unit root and the document.
    pub sections: Vec<String>,
}

/// Flattened documents of one unit, in reading order.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedDocument {
    pub entries: Vec<AggregatedEntry>,
}

impl AggregatedDocument {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Flatten `tree` using `priority` to order subdirectories.
pub fn flatten(tree: &ContentTree, priority: &[String]) -> AggregatedDocument {
    let mut entries = Vec::new();
    let mut sections = Vec::new();
    walk(&tree.node, priority, &mut sections, &mut entries);
    AggregatedDocument { entries }
}

fn walk(
    node: &ContentNode,
    priority: &[String],
    sections: &mut Vec<String>,
    entries: &mut Vec<AggregatedEntry>,
) {
    let mut documents: Vec<_> = node.documents().collect();
    if documents.is_empty() {
        documents.extend(node.index());
    }
    for document in documents {
        let Some(source) = &document.source else {
            continue;
        };
        entries.push(AggregatedEntry {
            source_path: document.rel_path.clone(),
            title: document.title.clone(),
            content: source.body.clone(),
            front_matter: source.front_matter.clone(),
            sections: sections.clone(),
        });
    }

    let mut directories: Vec<_> = node.directories().collect();
    directories.sort_by(|a, b| cmp_by_priority(a, b, priority));
    for dir in directories {
        sections.push(dir.title.clone());
        walk(dir, priority, sections, entries);
        sections.pop();
    }
}

/// Listed names first in list order, then unlisted names by raw name.
fn cmp_by_priority(a: &ContentNode, b: &ContentNode, priority: &[String]) -> Ordering {
    let rank = |node: &ContentNode| {
        priority
            .iter()
            .position(|name| *name == node.name.slug)
            .unwrap_or(priority.len())
    };
    rank(a)
        .cmp(&rank(b))
        .then_with(|| a.name.raw.cmp(&b.name.raw))
}
