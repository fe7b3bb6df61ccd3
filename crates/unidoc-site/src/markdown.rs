//! Source-level markdown rewrites for aggregated documents.
//!
//! Rewrites operate on byte ranges reported by pulldown-cmark, so text inside
//! code blocks and inline code is never touched and everything that is not
//! rewritten is preserved byte for byte.

use std::ops::Range;
use std::sync::LazyLock;

use pulldown_cmark::{Event, LinkType, Options, Parser, Tag};
use regex::Regex;

/// `src` attribute of an HTML `<img>` tag.
static IMG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img\b[^>]*?\bsrc\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// URL scheme such as `https:` or `data:`.
static SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*:").unwrap());

const MAX_HEADING_LEVEL: usize = 6;

fn parser(markdown: &str) -> Parser<'_> {
    Parser::new_ext(
        markdown,
        Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_FOOTNOTES,
    )
}

/// Base URL that relative asset references are resolved against.
#[derive(Debug, Clone)]
pub struct AssetBase {
    /// URL of the referencing document's directory, without trailing slash
    /// (e.g. `/products/000-autumn/guide`).
    dir_url: String,
}

impl AssetBase {
    pub fn new(dir_url: impl Into<String>) -> Self {
        let mut dir_url = dir_url.into();
        while dir_url.ends_with('/') {
            dir_url.pop();
        }
        Self { dir_url }
    }

    /// Resolve an asset reference to its site-absolute form.
    ///
    /// Returns `None` when the reference is kept as written: absolute paths,
    /// URLs with a scheme, fragment-only and empty references.
    pub fn resolve(&self, reference: &str) -> Option<String> {
        if reference.is_empty()
            || reference.starts_with('/')
            || reference.starts_with('#')
            || SCHEME.is_match(reference)
        {
            return None;
        }

        let segments = reference.split('/').filter(|s| !s.is_empty() && *s != ".");
        if reference.split('/').any(|s| s == "..") {
            // Traversal points outside the unit; only the root-relative tail is meaningful.
            let tail: Vec<_> = segments.filter(|s| *s != "..").collect();
            return Some(format!("/{}", tail.join("/")));
        }

        let rest: Vec<_> = segments.collect();
        Some(format!("{}/{}", self.dir_url, rest.join("/")))
    }
}

/// Rewrite image references in Markdown and inline HTML.
///
/// Handles inline `![alt](path)`, reference-style images through their link
/// definition, and `<img src="path">`. Destinations are rewritten as written
/// in the source, backslash escapes included.
pub fn rewrite_images(markdown: &str, base: &AssetBase) -> String {
    let mut edits = Vec::new();
    let mut references = Vec::new();

    let mut events = parser(markdown).into_offset_iter();
    for (event, range) in events.by_ref() {
        match event {
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                id,
                ..
            }) => match link_type {
                LinkType::Inline => {
                    if let Some(span) = inline_destination(markdown, range, &dest_url) {
                        edits.extend(resolve_span(markdown, span, base));
                    }
                }
                LinkType::Reference | LinkType::Collapsed | LinkType::Shortcut => {
                    references.push(id.into_string());
                }
                _ => {}
            },
            Event::Html(_) | Event::InlineHtml(_) => {
                let html = &markdown[range.clone()];
                for caps in IMG_SRC.captures_iter(html) {
                    let Some(src) = caps.get(1).or_else(|| caps.get(2)) else {
                        continue;
                    };
                    if let Some(resolved) = base.resolve(src.as_str()) {
                        let start = range.start + src.start();
                        edits.push((start..start + src.len(), resolved));
                    }
                }
            }
            _ => {}
        }
    }

    let definitions = events.reference_definitions();
    for label in references {
        let Some(definition) = definitions.get(&label) else {
            continue;
        };
        match definition_destination(markdown, definition.span.clone(), &definition.dest) {
            Some(span) => edits.extend(resolve_span(markdown, span, base)),
            None => tracing::debug!(%label, "Could not locate image reference definition"),
        }
    }
    edits.sort_by_key(|(range, _)| range.start);
    edits.dedup_by_key(|(range, _)| range.start);

    apply_edits(markdown, edits)
}

fn resolve_span(markdown: &str, span: Range<usize>, base: &AssetBase) -> Option<(Range<usize>, String)> {
    base.resolve(&markdown[span.clone()]).map(|resolved| (span, resolved))
}

/// Find the byte span of an inline image's destination within its source.
///
/// The alt text may itself contain `](`, so each candidate is checked
/// against the parsed destination.
fn inline_destination(markdown: &str, range: Range<usize>, dest: &str) -> Option<Range<usize>> {
    let source = &markdown[range.clone()];
    source.match_indices("](").find_map(|(pos, _)| {
        let after = range.start + pos + 2;
        destination_span(markdown, after).filter(|span| unescape(&markdown[span.clone()]) == dest)
    })
}

/// Find the byte span of the destination in a `[label]: dest` definition.
fn definition_destination(markdown: &str, span: Range<usize>, dest: &str) -> Option<Range<usize>> {
    let colon = markdown[span.clone()].find("]:")?;
    destination_span(markdown, span.start + colon + 2)
        .filter(|found| found.end <= span.end && unescape(&markdown[found.clone()]) == dest)
}

/// Raw link destination starting at byte `from`, after optional whitespace.
///
/// `<...>` destinations exclude the brackets. Bare destinations end at
/// whitespace or at an unbalanced `)`.
fn destination_span(markdown: &str, from: usize) -> Option<Range<usize>> {
    let rest = &markdown[from..];
    let trimmed = rest.trim_start();
    let start = from + rest.len() - trimmed.len();

    if let Some(inner) = trimmed.strip_prefix('<') {
        let mut escaped = false;
        for (i, c) in inner.char_indices() {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '>' => return Some(start + 1..start + 1 + i),
                '\n' | '<' => return None,
                _ => {}
            }
        }
        return None;
    }

    let mut depth = 0usize;
    let mut escaped = false;
    let mut end = trimmed.len();
    for (i, c) in trimmed.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '(' => depth += 1,
            ')' if depth == 0 => {
                end = i;
                break;
            }
            ')' => depth -= 1,
            c if c.is_whitespace() || c.is_control() => {
                end = i;
                break;
            }
            _ => {}
        }
    }
    (end > 0).then_some(start..start + end)
}

/// Remove backslash escapes before ASCII punctuation.
fn unescape(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(&next) if c == '\\' && next.is_ascii_punctuation() => {
                result.push(next);
                chars.next();
            }
            _ => result.push(c),
        }
    }
    result
}

/// Shift every heading down by `offset` levels, capped at level 6.
///
/// ATX headings gain extra `#` characters. Setext headings are converted to
/// ATX form so they can carry the new level.
pub fn demote_headings(markdown: &str, offset: u8) -> String {
    if offset == 0 {
        return markdown.to_owned();
    }

    let mut edits = Vec::new();
    for (event, range) in parser(markdown).into_offset_iter() {
        let Event::Start(Tag::Heading { level, .. }) = event else {
            continue;
        };
        let current = level as usize;
        let target = (current + usize::from(offset)).min(MAX_HEADING_LEVEL);
        if target == current {
            continue;
        }

        let source = &markdown[range.clone()];
        let indent = source.len() - source.trim_start_matches(' ').len();
        if source[indent..].starts_with('#') {
            let at = range.start + indent;
            edits.push((at..at, "#".repeat(target - current)));
        } else if let Some(edit) = setext_to_atx(markdown, range, target) {
            edits.push(edit);
        }
    }

    apply_edits(markdown, edits)
}

/// Replacement turning a setext heading into an ATX heading of `level`.
///
/// The heading may sit inside a list item or blockquote; the container
/// markers of its underline and continuation lines are consumed with it.
fn setext_to_atx(markdown: &str, range: Range<usize>, level: usize) -> Option<(Range<usize>, String)> {
    let source = markdown[range.clone()].trim_end_matches(['\n', '\r']);
    let underline_start = source.rfind('\n')?;
    let text = source[..underline_start]
        .lines()
        .map(|line| line.trim_start_matches(|c: char| c == '>' || c.is_whitespace()).trim_end())
        .collect::<Vec<_>>()
        .join(" ");

    let end = range.start + source.len();
    Some((range.start..end, format!("{} {text}", "#".repeat(level))))
}

/// Check whether the first block of a document is a heading.
pub fn starts_with_heading(markdown: &str) -> bool {
    matches!(
        parser(markdown).next(),
        Some(Event::Start(Tag::Heading { .. }))
    )
}

/// Apply non-overlapping replacements to `source`.
fn apply_edits(source: &str, mut edits: Vec<(Range<usize>, String)>) -> String {
    if edits.is_empty() {
        return source.to_owned();
    }
    edits.sort_by_key(|(range, _)| range.start);

    let mut result = String::with_capacity(source.len() + edits.len() * 16);
    let mut cursor = 0;
    for (range, replacement) in edits {
        if range.start < cursor {
            continue;
        }
        result.push_str(&source[cursor..range.start]);
        result.push_str(&replacement);
        cursor = range.end;
    }
    result.push_str(&source[cursor..]);
    result
}
