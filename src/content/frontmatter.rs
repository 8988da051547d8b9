//! Front-matter parsing
//!
//! Posts carry a block of `key: value` lines at the top, optionally fenced by
//! `---` lines:
//!
//! ```text
//! ---
//! title: Hello World
//! tags: rust, infra
//! date: 2021.03.05
//! ---
//!
//! Body starts here.
//! ```
//!
//! Without the fence, the block ends at the first blank line or the first
//! line that is not a field.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // The colon must be followed by whitespace or end the line, so URLs in
    // prose (`https://...`) are never taken for a field.
    static ref FIELD_LINE: Regex =
        Regex::new(r"^([A-Za-z0-9_-]+)[ \t]*:(?:[ \t]+(.*))?$").unwrap();
}

/// Raw front-matter fields, keys lowercased, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    fields: IndexMap<String, String>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> (Self, &str) {
        let text = content.trim_start_matches('\u{feff}');

        let (fenced, mut rest) = match strip_fence(text) {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        let mut fields: IndexMap<String, String> = IndexMap::new();
        let mut last_key: Option<String> = None;
        let mut closed = false;

        while !rest.is_empty() {
            let (line, next) = split_line(rest);

            if fenced && line.trim() == "---" {
                rest = next;
                closed = true;
                break;
            }

            if let Some(caps) = FIELD_LINE.captures(line) {
                let key = caps[1].to_ascii_lowercase();
                let value = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
                fields.insert(key.clone(), value.to_string());
                last_key = Some(key);
                rest = next;
                continue;
            }

            let is_blank = line.trim().is_empty();
            let is_continuation = line.starts_with([' ', '\t']) && !is_blank;
            if let (true, Some(key)) = (is_continuation, last_key.as_ref()) {
                if let Some(value) = fields.get_mut(key) {
                    if !value.is_empty() {
                        value.push(' ');
                    }
                    value.push_str(line.trim());
                }
                rest = next;
                continue;
            }

            if !fenced {
                break;
            }
            if is_blank {
                rest = next;
                continue;
            }

            // Prose inside a `---` pair: a thematic break, not front-matter
            return (FrontMatter::default(), content);
        }

        if (fenced && !closed) || fields.is_empty() {
            return (FrontMatter::default(), content);
        }

        (Self { fields }, rest.trim_start_matches(['\n', '\r']))
    }

    /// Look up a field, case-insensitively
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(&key.to_ascii_lowercase())
            .map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Strip an opening `---` line, returning what follows it
fn strip_fence(text: &str) -> Option<&str> {
    let (line, rest) = split_line(text);
    if line.trim_end() == "---" {
        Some(rest)
    } else {
        None
    }
}

/// Split off the first line (without its terminator)
fn split_line(text: &str) -> (&str, &str) {
    match text.find('\n') {
        Some(pos) => (text[..pos].trim_end_matches('\r'), &text[pos + 1..]),
        None => (text.trim_end_matches('\r'), ""),
    }
}
