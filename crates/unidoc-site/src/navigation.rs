//! Sidebar navigation built from directory structure.
//!
//! Each configured section becomes one top-level item. Below it, directories
//! become groups (linking to their `index.md` when present) and documents
//! become leaves. Numeric prefixes order siblings and never appear in links.

use std::path::Path;

use serde::{Deserialize, Serialize};
use unidoc_config::SidebarSection;
use unidoc_content::naming::strip_order_prefix;
use unidoc_content::{ContentError, ContentNode, ContentTree};

/// Navigation entry in the host framework's sidebar shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationItem {
    /// Display text.
    pub text: String,
    /// Link target. Absent for pure groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Child items. Absent for leaves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<NavigationItem>>,
    /// Initial collapse state. Absent for leaves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
}

impl NavigationItem {
    /// Leaf item pointing at a page.
    pub fn leaf(text: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: Some(link.into()),
            items: None,
            collapsed: None,
        }
    }

    /// Group item holding children.
    pub fn group(text: impl Into<String>, items: Vec<NavigationItem>, collapsed: bool) -> Self {
        Self {
            text: text.into(),
            link: None,
            items: Some(items),
            collapsed: Some(collapsed),
        }
    }

    /// Check whether the item is a group without its own page.
    pub fn is_pure_group(&self) -> bool {
        self.items.is_some() && self.link.is_none()
    }
}

/// Build sidebar items for the given sections of a content root.
///
/// `sections` pairs a display label with a subdirectory of `root`. Sections
/// whose directory is missing are skipped with a warning. Top-level items
/// start expanded; nested groups use `collapsed`.
pub fn build_items(
    root: &Path,
    sections: &[SidebarSection],
    collapsed: bool,
) -> Vec<NavigationItem> {
    sections
        .iter()
        .filter_map(|section| {
            let dir = root.join(&section.dir);
            let tree = match ContentTree::scan(&dir) {
                Ok(tree) => tree,
                Err(ContentError::NotFound(_) | ContentError::NotADirectory(_)) => {
                    tracing::warn!(section = %section.label, path = %dir.display(), "Sidebar section directory missing, skipping");
                    return None;
                }
                Err(e) => {
                    tracing::warn!(section = %section.label, error = %e, "Failed to scan sidebar section, skipping");
                    return None;
                }
            };

            let mut item = directory_item(&tree.node, &public_path(&section.dir), collapsed);
            item.text.clone_from(&section.label);
            item.collapsed = Some(false);
            Some(item)
        })
        .collect()
}

/// Group item for a directory whose public path is `base` (no trailing slash).
fn directory_item(node: &ContentNode, base: &str, collapsed: bool) -> NavigationItem {
    let mut items = Vec::new();
    for dir in node.directories() {
        let child_base = format!("{base}/{}", dir.name.slug);
        items.push(directory_item(dir, &child_base, collapsed));
    }
    for document in node.documents() {
        items.push(NavigationItem::leaf(
            &document.title,
            format!("{base}/{}", document.name.slug),
        ));
    }

    let mut item = NavigationItem::group(&node.title, items, collapsed);
    if node.index().is_some() {
        item.link = Some(format!("{base}/"));
    }
    item
}

/// Public URL path of a content directory, without trailing slash.
///
/// Numeric prefixes are stripped from every segment:
/// `010-guide/02-advanced` becomes `/guide/advanced`. An empty path maps to
/// the empty string (the site root).
pub fn public_path(dir: &str) -> String {
    dir.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .fold(String::new(), |mut path, segment| {
            path.push('/');
            path.push_str(strip_order_prefix(segment));
            path
        })
}
