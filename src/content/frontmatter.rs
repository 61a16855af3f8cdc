//! Front-matter parsing
//!
//! Content files carry their metadata as `~key: value` lines mixed into the
//! text; every other line is document body.

use std::collections::HashMap;

/// Marker character that opens a front-matter line.
pub const MARKER: char = '~';

/// A front-matter line that could not be parsed as `key: value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    /// 1-based line number in the source text
    pub line: usize,
    /// The offending line, marker included
    pub text: String,
}

/// Front-matter options from a content file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    options: HashMap<String, String>,
}

impl FrontMatter {
    /// Parse a content file into front matter, body, and any malformed
    /// metadata lines.
    ///
    /// A line whose first non-whitespace character is [`MARKER`] declares one
    /// option: the marker is stripped and the remainder is split on the first
    /// colon, both sides trimmed. Later duplicate keys overwrite earlier
    /// ones. A marker line without a colon is skipped and reported; the
    /// parser itself never fails. All other lines are body, in original
    /// order, rejoined with `\n`.
    pub fn parse(source: &str) -> (Self, String, Vec<MalformedLine>) {
        let mut options = HashMap::new();
        let mut body = Vec::new();
        let mut malformed = Vec::new();

        for (idx, line) in source.split('\n').enumerate() {
            let trimmed = line.trim_start();
            if let Some(rest) = trimmed.strip_prefix(MARKER) {
                match rest.split_once(':') {
                    Some((key, value)) => {
                        options.insert(key.trim().to_string(), value.trim().to_string());
                    }
                    None => malformed.push(MalformedLine {
                        line: idx + 1,
                        text: line.to_string(),
                    }),
                }
            } else {
                body.push(line);
            }
        }

        (Self { options }, body.join("\n"), malformed)
    }

    /// Look up a raw option value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Output path relative to the public root. Required for rendering.
    pub fn slug(&self) -> Option<&str> {
        self.get("slug")
    }

    /// Template name, extension excluded. Required for rendering.
    pub fn template(&self) -> Option<&str> {
        self.get("template")
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    pub fn description(&self) -> Option<&str> {
        self.get("description")
    }

    /// Raw publish date string; parsed only when sorting or building the feed.
    pub fn date(&self) -> Option<&str> {
        self.get("date")
    }

    /// Whether the document is excluded from the index and feed.
    /// Only a literal `true` hides; any other value publishes.
    pub fn hidden(&self) -> bool {
        self.get("hide")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    /// All options, for template binding.
    pub fn options(&self) -> &HashMap<String, String> {
        &self.options
    }
}
