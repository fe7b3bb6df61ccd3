//! Filename parsing for the `[NNN-]kebab-name[.md]` convention.
//!
//! Every entry in a content tree, directory or document, may carry a numeric
//! prefix that controls its position among siblings. The prefix never shows
//! up in titles or public URLs:
//!
//! - `003-configuration.md` -> order 3, slug `configuration`, title "Configuration"
//! - `010-getting-started/` -> order 10, slug `getting-started`, title "Getting Started"
//! - `changelog.md` -> order [`OrderKey::UNORDERED`], slug `changelog`

use std::cmp::Ordering;
use std::fmt;

/// Position of an entry among its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderKey(pub u32);

impl OrderKey {
    /// Order of entries without a parseable numeric prefix.
    pub const UNORDERED: Self = Self(999);
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parsed directory or file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryName {
    /// Name as found on disk (e.g. `003-configuration.md`).
    pub raw: String,
    /// Sort position from the numeric prefix.
    pub order: OrderKey,
    /// Name without numeric prefix and `.md` extension (e.g. `configuration`).
    pub slug: String,
}

impl EntryName {
    /// Parse a directory name.
    pub fn directory(raw: &str) -> Self {
        Self::parse(raw, raw)
    }

    /// Parse a markdown file name, dropping its `.md` extension.
    pub fn document(raw: &str) -> Self {
        Self::parse(raw, strip_md_extension(raw))
    }

    fn parse(raw: &str, stem: &str) -> Self {
        let (order, slug) = split_order_prefix(stem);
        Self {
            raw: raw.to_owned(),
            order,
            slug: slug.to_owned(),
        }
    }

    /// Human-readable title derived from the slug.
    pub fn title(&self) -> String {
        titlecase_from_slug(&self.slug)
    }

    /// True for `index.md` (with or without a numeric prefix).
    pub fn is_index(&self) -> bool {
        self.slug.eq_ignore_ascii_case("index")
    }

    /// Sibling ordering: order key ascending, then raw name.
    pub fn cmp_siblings(&self, other: &Self) -> Ordering {
        self.order
            .cmp(&other.order)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

/// Strip a trailing `.md` extension (case-insensitive).
fn strip_md_extension(name: &str) -> &str {
    let len = name.len();
    if len > 3 && name.is_char_boundary(len - 3) && name[len - 3..].eq_ignore_ascii_case(".md") {
        &name[..len - 3]
    } else {
        name
    }
}

/// Split `NNN-rest` into its order key and remainder.
///
/// Names without a digits-then-dash prefix, or whose prefix does not fit in
/// a `u32`, keep their full text and get [`OrderKey::UNORDERED`].
pub fn split_order_prefix(name: &str) -> (OrderKey, &str) {
    if let Some((prefix, rest)) = name.split_once('-')
        && !prefix.is_empty()
        && prefix.bytes().all(|b| b.is_ascii_digit())
    {
        return match prefix.parse::<u32>() {
            Ok(num) => (OrderKey(num), rest),
            Err(_) => (OrderKey::UNORDERED, rest),
        };
    }
    (OrderKey::UNORDERED, name)
}

/// Strip the numeric prefix from a single name, keeping everything else.
pub fn strip_order_prefix(name: &str) -> &str {
    split_order_prefix(name).1
}

/// Convert a kebab-case slug to title case.
///
/// Splits on `-` and capitalizes the first letter of each word.
///
/// ```
/// use unidoc_content::naming::titlecase_from_slug;
///
/// assert_eq!(titlecase_from_slug("getting-started"), "Getting Started");
/// assert_eq!(titlecase_from_slug("api"), "Api");
/// ```
pub fn titlecase_from_slug(slug: &str) -> String {
    let mut result = String::with_capacity(slug.len());
    for word in slug.split('-').filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        capitalize_first_into(word, &mut result);
    }
    result
}

/// Capitalize the first character of a word, appending to `buf`.
fn capitalize_first_into(word: &str, buf: &mut String) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        buf.extend(first.to_uppercase());
        buf.push_str(chars.as_str());
    }
}
