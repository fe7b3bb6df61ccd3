//! Anchor ids for sections of an aggregated page.

use std::collections::{HashMap, HashSet};

/// Fallback id for titles without any alphanumeric character.
const FALLBACK_ID: &str = "section";

/// Convert text to a URL-safe anchor slug.
///
/// Lowercases, keeps alphanumerics (including non-ASCII letters), and
/// collapses whitespace, dashes and underscores into single dashes.
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true;

    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            result.extend(c.to_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }
    result
}

/// Allocates unique anchor ids within one page.
#[derive(Debug, Default)]
pub struct Anchors {
    counts: HashMap<String, usize>,
    issued: HashSet<String>,
}

impl Anchors {
    /// Unique id for `title`: the slug, then `slug-1`, `slug-2`, ...
    pub fn allocate(&mut self, title: &str) -> String {
        let mut base = slugify(title);
        if base.is_empty() {
            FALLBACK_ID.clone_into(&mut base);
        }
        let count = self.counts.entry(base.clone()).or_default();
        loop {
            let id = match *count {
                0 => base.clone(),
                n => format!("{base}-{n}"),
            };
            *count += 1;
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Getting Started"), "getting-started");
        assert_eq!(slugify("  C++ & Rust_FFI!  "), "c-rust-ffi");
        assert_eq!(slugify("Начало работы"), "начало-работы");
        assert_eq!(slugify("--"), "");
    }

    #[test]
    fn test_allocate_deduplicates() {
        let mut anchors = Anchors::default();
        assert_eq!(anchors.allocate("Overview"), "overview");
        assert_eq!(anchors.allocate("Overview"), "overview-1");
        assert_eq!(anchors.allocate("overview"), "overview-2");
        assert_eq!(anchors.allocate("Setup"), "setup");
    }

    #[test]
    fn test_allocate_skips_ids_taken_by_literal_titles() {
        let mut anchors = Anchors::default();
        assert_eq!(anchors.allocate("Overview"), "overview");
        assert_eq!(anchors.allocate("Overview"), "overview-1");
        assert_eq!(anchors.allocate("Overview 1"), "overview-1-1");

        let mut anchors = Anchors::default();
        assert_eq!(anchors.allocate("Overview 1"), "overview-1");
        assert_eq!(anchors.allocate("Overview"), "overview");
        assert_eq!(anchors.allocate("Overview"), "overview-2");
    }

    #[test]
    fn test_allocate_fallback() {
        let mut anchors = Anchors::default();
        assert_eq!(anchors.allocate("???"), "section");
        assert_eq!(anchors.allocate(""), "section-1");
    }
}
