//! Synthesized single-page document for one unit.

use std::ffi::OsStr;
use std::path::Path;

use serde::Serialize;
use unidoc_config::SinglePageConfig;
use unidoc_content::ContentTree;

use crate::GenerateError;
use crate::aggregate::{self, AggregatedDocument, AggregatedEntry};
use crate::anchors::Anchors;
use crate::markdown::{self, AssetBase};
use crate::navigation::NavigationItem;
use crate::unit::{SectionKind, Unit};

const DIVIDER: &str = "\n\n---\n\n";

/// Front matter written at the top of a single page.
#[derive(Serialize)]
struct PageFrontMatter<'a> {
    title: &'a str,
    description: &'a str,
}

/// A unit's documentation concatenated into one document.
#[derive(Debug, Clone, PartialEq)]
pub struct SinglePage {
    pub title: String,
    pub description: String,
    /// Top-level heading placed before the content (product units only).
    pub heading: Option<String>,
    /// Concatenated sections, without leading front matter.
    pub body: String,
    /// Anchor-based navigation for the page, grouped by subdirectory.
    pub navigation: Vec<NavigationItem>,
}

impl SinglePage {
    /// Build the page for `unit` from its scanned content.
    ///
    /// Returns `None` when the tree holds no markdown document.
    pub fn build(unit: &Unit, tree: &ContentTree, config: &SinglePageConfig) -> Option<Self> {
        let document = aggregate::flatten(tree, &config.section_priority);
        if document.is_empty() {
            return None;
        }

        let name = unit.display_name();
        let root_meta = tree
            .node
            .index()
            .and_then(|index| index.source.as_ref())
            .map(|source| &source.front_matter);
        let description = root_meta
            .and_then(|fm| fm.description.as_deref())
            .map(str::trim)
            .filter(|d| !d.is_empty());

        let (title, description, heading) = match unit.section {
            SectionKind::Api => (
                format!("{name} API"),
                description.map_or_else(|| format!("{name} API reference"), str::to_owned),
                None,
            ),
            SectionKind::Products => (
                name.clone(),
                description.map_or_else(
                    || format!("Complete {name} documentation on a single page"),
                    str::to_owned,
                ),
                Some(name),
            ),
        };

        let (body, anchors) = render_sections(unit, &document, config.heading_offset);
        let navigation = anchor_items(&anchors, 0, &unit.page_url(config), config.collapsed);

        Some(Self {
            title,
            description,
            heading,
            body,
            navigation,
        })
    }

    /// Render the final document bytes.
    pub fn render(&self) -> Result<String, GenerateError> {
        let front_matter = serde_yaml::to_string(&PageFrontMatter {
            title: &self.title,
            description: &self.description,
        })?;

        let mut out = String::with_capacity(self.body.len() + front_matter.len() + 64);
        out.push_str("---\n");
        out.push_str(&front_matter);
        out.push_str("---\n\n");
        if let Some(heading) = &self.heading {
            out.push_str("# ");
            out.push_str(heading);
            out.push_str("\n\n");
            out.push_str(&self.description);
            out.push_str("\n\n");
        }
        out.push_str(&self.body);
        out.push('\n');
        Ok(out)
    }
}

/// Concatenate entries, returning the body and each entry with its anchor.
fn render_sections<'a>(
    unit: &Unit,
    document: &'a AggregatedDocument,
    heading_offset: u8,
) -> (String, Vec<(&'a AggregatedEntry, String)>) {
    let mut ids = Anchors::default();
    let mut anchored = Vec::with_capacity(document.entries.len());
    let mut sections = Vec::with_capacity(document.entries.len());

    for entry in &document.entries {
        let anchor = ids.allocate(&entry.title);
        let content = prepare_content(unit, entry, heading_offset);
        let section = if content.is_empty() {
            format!("<a id=\"{anchor}\"></a>")
        } else {
            format!("<a id=\"{anchor}\"></a>\n\n{content}")
        };
        sections.push(section);
        anchored.push((entry, anchor));
    }

    (sections.join(DIVIDER), anchored)
}

/// Rewrite assets, add a title heading if missing, and demote headings.
fn prepare_content(unit: &Unit, entry: &AggregatedEntry, heading_offset: u8) -> String {
    let dir = entry
        .source_path
        .parent()
        .unwrap_or(Path::new(""))
        .to_string_lossy()
        .replace('\\', "/");
    let dir_url = if dir.is_empty() {
        unit.source_url()
    } else {
        format!("{}/{dir}", unit.source_url())
    };

    let body = skip_blank_lines(&entry.content).trim_end();
    let mut content = markdown::rewrite_images(body, &AssetBase::new(dir_url));
    if !markdown::starts_with_heading(&content) {
        content = if content.is_empty() {
            format!("# {}", entry.title)
        } else {
            format!("# {}\n\n{content}", entry.title)
        };
    }
    markdown::demote_headings(&content, heading_offset)
        .trim_end()
        .to_owned()
}

/// Drop leading blank lines, keeping the indentation of the first content line.
fn skip_blank_lines(text: &str) -> &str {
    let mut rest = text;
    while let Some((line, tail)) = rest.split_once('\n') {
        if !line.trim().is_empty() {
            break;
        }
        rest = tail;
    }
    if rest.trim().is_empty() { "" } else { rest }
}

/// Group anchored entries into nested navigation by source directory.
fn anchor_items(
    entries: &[(&AggregatedEntry, String)],
    depth: usize,
    page_url: &str,
    collapsed: bool,
) -> Vec<NavigationItem> {
    let mut items = Vec::new();
    let mut i = 0;
    while i < entries.len() {
        let (entry, anchor) = &entries[i];
        let Some(dir) = dir_at(entry, depth) else {
            items.push(NavigationItem::leaf(
                &entry.title,
                format!("{page_url}#{anchor}"),
            ));
            i += 1;
            continue;
        };

        let end = entries[i..]
            .iter()
            .position(|(e, _)| dir_at(e, depth) != Some(dir))
            .map_or(entries.len(), |offset| i + offset);
        items.push(NavigationItem::group(
            &entry.sections[depth],
            anchor_items(&entries[i..end], depth + 1, page_url, collapsed),
            collapsed,
        ));
        i = end;
    }
    items
}

/// Directory component at `depth` of an entry nested at least that deep.
fn dir_at(entry: &AggregatedEntry, depth: usize) -> Option<&OsStr> {
    if entry.sections.len() > depth {
        entry.source_path.iter().nth(depth)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use pretty_assertions::assert_eq;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn build(section: SectionKind, root: &Path) -> Option<SinglePage> {
        let unit = Unit::new(section, "000-autumn");
        let tree = ContentTree::scan(root).unwrap();
        SinglePage::build(&unit, &tree, &SinglePageConfig::default())
    }

    #[test]
    fn test_empty_unit_builds_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("guides")).unwrap();
        assert!(build(SectionKind::Products, temp_dir.path()).is_none());
    }

    #[test]
    fn test_product_page_render() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        write(root, "01-overview.md", "---\ntitle: Overview\n---\n# Overview\n\nAutumn is a framework.\n");
        write(root, "getting-started/01-install.md", "Run the installer.\n\n![shot](img/shot.png)\n");

        let page = build(SectionKind::Products, root).unwrap();

        assert_eq!(
            page.render().unwrap(),
            "---\n\
             title: Autumn\n\
             description: Complete Autumn documentation on a single page\n\
             ---\n\
             \n\
             # Autumn\n\
             \n\
             Complete Autumn documentation on a single page\n\
             \n\
             <a id=\"overview\"></a>\n\
             \n\
             ## Overview\n\
             \n\
             Autumn is a framework.\n\
             \n\
             ---\n\
             \n\
             <a id=\"install\"></a>\n\
             \n\
             ## Install\n\
             \n\
             Run the installer.\n\
             \n\
             ![shot](/products/000-autumn/getting-started/img/shot.png)\n"
        );
    }

    #[test]
    fn test_api_page_has_lean_front_matter() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "01-client.md", "# Client\n");

        let page = build(SectionKind::Api, temp_dir.path()).unwrap();
        let rendered = page.render().unwrap();

        assert_eq!(page.title, "Autumn API");
        assert_eq!(page.heading, None);
        assert!(rendered.starts_with("---\ntitle: Autumn API\ndescription: Autumn API reference\n---\n\n<a id=\"client\"></a>"));
        assert!(!rendered.contains("\n# "));
    }

    #[test]
    fn test_description_from_root_index() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "index.md", "---\ndescription: \"Tools: the good kind\"\n---\n");
        write(temp_dir.path(), "01-a.md", "A");

        let page = build(SectionKind::Products, temp_dir.path()).unwrap();
        assert_eq!(page.description, "Tools: the good kind");
        let rendered = page.render().unwrap();
        let reparsed = unidoc_content::front_matter::split(&rendered);
        assert!(!reparsed.malformed);
        assert_eq!(
            reparsed.front_matter.description.as_deref(),
            Some("Tools: the good kind")
        );
    }

    #[test]
    fn test_no_trailing_divider_and_unique_anchors() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "01-notes.md", "# Notes\n\nOne\n\n---\n");
        write(temp_dir.path(), "guides/01-notes.md", "# Notes\n\nTwo");

        let page = build(SectionKind::Products, temp_dir.path()).unwrap();

        assert!(page.body.contains("<a id=\"notes\"></a>"));
        assert!(page.body.contains("<a id=\"notes-1\"></a>"));
        assert!(page.body.ends_with("Two"));
    }

    #[test]
    fn test_leading_indented_code_block_is_kept() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "01-a.md", "\n  \n    let x = 1;\n\nText\n");

        let page = build(SectionKind::Products, temp_dir.path()).unwrap();

        assert_eq!(
            page.body,
            "<a id=\"a\"></a>\n\n## A\n\n    let x = 1;\n\nText"
        );
    }

    #[test]
    fn test_repeated_titles_get_distinct_links() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        write(root, "01-first.md", "---\ntitle: Overview\n---\nOne");
        write(root, "02-second.md", "---\ntitle: Overview\n---\nTwo");
        write(root, "03-third.md", "---\ntitle: Overview 1\n---\nThree");

        let page = build(SectionKind::Products, root).unwrap();
        let links: Vec<_> = page
            .navigation
            .iter()
            .filter_map(|item| item.link.clone())
            .collect();

        assert_eq!(
            links,
            [
                "/autumn/single-page#overview",
                "/autumn/single-page#overview-1",
                "/autumn/single-page#overview-1-1",
            ]
        );
    }

    #[test]
    fn test_navigation_groups_by_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        write(root, "01-intro.md", "# Intro");
        write(root, "getting-started/01-install.md", "# Install");
        write(root, "getting-started/advanced/01-tuning.md", "# Tuning");
        write(root, "reference/01-cli.md", "# CLI");

        let page = build(SectionKind::Products, root).unwrap();
        let url = "/autumn/single-page";

        assert_eq!(
            page.navigation,
            vec![
                NavigationItem::leaf("Intro", format!("{url}#intro")),
                NavigationItem::group(
                    "Getting Started",
                    vec![
                        NavigationItem::leaf("Install", format!("{url}#install")),
                        NavigationItem::group(
                            "Advanced",
                            vec![NavigationItem::leaf("Tuning", format!("{url}#tuning"))],
                            true,
                        ),
                    ],
                    true,
                ),
                NavigationItem::group(
                    "Reference",
                    vec![NavigationItem::leaf("Cli", format!("{url}#cli"))],
                    true,
                ),
            ]
        );
    }

    #[test]
    fn test_traversal_image_in_nested_document() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(
            temp_dir.path(),
            "guides/advanced/deep/01-page.md",
            "# Page\n\n![cover](../../../static/foo/cover.png)\n",
        );

        let page = build(SectionKind::Products, temp_dir.path()).unwrap();
        assert!(page.body.contains("![cover](/static/foo/cover.png)"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "02-b.md", "---\ntitle: B\nz: 1\na: 2\n---\nB body");
        write(temp_dir.path(), "01-a.md", "A body");
        write(temp_dir.path(), "examples/x.md", "X");

        let first = build(SectionKind::Products, temp_dir.path()).unwrap().render().unwrap();
        let second = build(SectionKind::Products, temp_dir.path()).unwrap().render().unwrap();
        assert_eq!(first, second);
    }
}
