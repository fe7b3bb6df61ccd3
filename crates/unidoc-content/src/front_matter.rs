//! YAML front matter at the top of markdown documents.
//!
//! A block is recognized only when the very first line is `---`; it ends at
//! the next line consisting of `---` (or `...`). Everything after that line is
//! the document body.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metadata parsed from a document's front matter.
///
/// `title`, `description` and `outline` are recognized; any other keys are
/// kept in `extra`, sorted by key.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrontMatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Outline depth hint for the host framework (`deep`, `[2, 3]`, `false`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl FrontMatter {
    /// Check if no key was set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.outline.is_none()
            && self.extra.is_empty()
    }

    /// Non-blank title, trimmed.
    pub fn title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// A document split into front matter and body.
#[derive(Debug, PartialEq)]
pub struct SplitDocument<'a> {
    pub front_matter: FrontMatter,
    /// True when a delimited block was present but could not be parsed.
    pub malformed: bool,
    pub body: &'a str,
}

/// Split `content` into front matter and body.
///
/// Content without a leading `---` line has empty front matter and is
/// returned whole as body. A delimited block with invalid YAML is still
/// removed from the body, and `malformed` is set.
pub fn split(content: &str) -> SplitDocument<'_> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let Some((yaml, body)) = delimit(content) else {
        return SplitDocument {
            front_matter: FrontMatter::default(),
            malformed: false,
            body: content,
        };
    };

    match parse(yaml) {
        Ok(front_matter) => SplitDocument {
            front_matter,
            malformed: false,
            body,
        },
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring malformed front matter");
            SplitDocument {
                front_matter: FrontMatter::default(),
                malformed: true,
                body,
            }
        }
    }
}

/// Parse a YAML block. Empty blocks yield an empty [`FrontMatter`].
pub fn parse(yaml: &str) -> Result<FrontMatter, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(FrontMatter::default());
    }
    serde_yaml::from_str(yaml)
}

/// Locate the YAML block, returning `(yaml, body)`.
fn delimit(content: &str) -> Option<(&str, &str)> {
    let (first, mut rest) = split_line(content)?;
    if first.trim_end() != "---" {
        return None;
    }

    let yaml_start = content.len() - rest.len();
    loop {
        let line_start = content.len() - rest.len();
        let (line, next) = split_line(rest)?;
        let marker = line.trim_end();
        if marker == "---" || marker == "..." {
            return Some((&content[yaml_start..line_start], next));
        }
        rest = next;
    }
}

/// Split off the first line. Returns `None` at end of input.
fn split_line(s: &str) -> Option<(&str, &str)> {
    if s.is_empty() {
        return None;
    }
    Some(match s.find('\n') {
        Some(pos) => (&s[..pos], &s[pos + 1..]),
        None => (s, ""),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_without_front_matter() {
        let doc = split("# Title\n\nBody.\n");
        assert!(doc.front_matter.is_empty());
        assert!(!doc.malformed);
        assert_eq!(doc.body, "# Title\n\nBody.\n");
    }

    #[test]
    fn test_split_recognized_keys() {
        let doc = split("---\ntitle: Install\ndescription: How to install\noutline: deep\n---\n# Install\n");
        assert_eq!(doc.front_matter.title(), Some("Install"));
        assert_eq!(
            doc.front_matter.description.as_deref(),
            Some("How to install")
        );
        assert_eq!(doc.front_matter.outline, Some(serde_json::json!("deep")));
        assert!(doc.front_matter.extra.is_empty());
        assert_eq!(doc.body, "# Install\n");
    }

    #[test]
    fn test_split_keeps_extra_keys_sorted() {
        let doc = split("---\nzeta: 1\nalpha: [a, b]\n---\nbody");
        let keys: Vec<_> = doc.front_matter.extra.keys().map(String::as_str).collect();
        assert_eq!(keys, ["alpha", "zeta"]);
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn test_split_crlf_delimiters() {
        let doc = split("---\r\ntitle: Windows\r\n---\r\nBody\r\n");
        assert_eq!(doc.front_matter.title(), Some("Windows"));
        assert_eq!(doc.body, "Body\r\n");
    }

    #[test]
    fn test_split_dots_terminator() {
        let doc = split("---\ntitle: Dots\n...\nBody");
        assert_eq!(doc.front_matter.title(), Some("Dots"));
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn test_split_empty_block() {
        let doc = split("---\n---\nBody");
        assert!(doc.front_matter.is_empty());
        assert!(!doc.malformed);
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn test_split_malformed_yaml_is_stripped() {
        let doc = split("---\ntitle: [unclosed\n---\nBody");
        assert!(doc.front_matter.is_empty());
        assert!(doc.malformed);
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn test_split_unterminated_block_is_body() {
        let content = "---\ntitle: Never closed\n\nBody";
        let doc = split(content);
        assert!(doc.front_matter.is_empty());
        assert_eq!(doc.body, content);
    }

    #[test]
    fn test_split_rule_later_in_document_is_not_front_matter() {
        let content = "Intro\n\n---\n\nMore";
        let doc = split(content);
        assert!(doc.front_matter.is_empty());
        assert_eq!(doc.body, content);
    }

    #[test]
    fn test_blank_title_is_ignored() {
        let doc = split("---\ntitle: \"  \"\n---\nBody");
        assert_eq!(doc.front_matter.title(), None);
    }

    #[test]
    fn test_non_string_title_is_malformed() {
        let doc = split("---\ntitle:\n  nested: true\n---\nBody");
        assert!(doc.malformed);
        assert_eq!(doc.front_matter.title(), None);
    }
}
