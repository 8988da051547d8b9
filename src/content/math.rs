//! Math span protection
//!
//! Math segments such as `$a_b * c_d$` would be mangled by markdown emphasis
//! rules, so they are swapped out for opaque placeholder words before the
//! markdown pass and swapped back into the generated HTML afterwards.

use std::ops::Range;

use crate::config::{MathConfig, MathDelimiter};

const PLACEHOLDER_STEM: &str = "mathspan";

/// Extracts delimited math spans from markdown
#[derive(Debug, Clone)]
pub struct MathExtractor {
    delimiters: Vec<MathDelimiter>,
}

/// Markdown with math spans replaced by placeholders, plus the side table
/// needed to put them back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedText {
    pub text: String,
    spans: Vec<(String, String)>,
}

impl MathExtractor {
    pub fn new(config: &MathConfig) -> Self {
        let delimiters = if config.enable {
            config
                .delimiters
                .iter()
                .filter(|d| !d.open.is_empty() && !d.close.is_empty())
                .cloned()
                .collect()
        } else {
            Vec::new()
        };
        Self { delimiters }
    }

    /// Replace every math span outside code with a placeholder
    pub fn protect(&self, markdown: &str) -> ProtectedText {
        if self.delimiters.is_empty() {
            return ProtectedText {
                text: markdown.to_string(),
                spans: Vec::new(),
            };
        }

        // A stem that never occurs in the input cannot collide with it
        let mut stem = PLACEHOLDER_STEM.to_string();
        while markdown.contains(&stem) {
            stem.push('x');
        }

        let code = code_ranges(markdown);
        let mut code_idx = 0;

        let mut text = String::with_capacity(markdown.len());
        let mut spans = Vec::new();
        let mut copied = 0;
        let mut i = 0;

        while i < markdown.len() {
            if let Some(range) = code.get(code_idx) {
                if i >= range.start {
                    i = i.max(range.end);
                    code_idx += 1;
                    continue;
                }
            }

            let rest = &markdown[i..];
            if rest.starts_with('\\') {
                i += 1 + rest[1..].chars().next().map_or(0, char::len_utf8);
                continue;
            }

            // A math span never reaches into code
            let limit = code
                .get(code_idx)
                .map_or(markdown.len(), |range| range.start);
            if let Some(len) = self.match_span(markdown, i, limit) {
                // Words keep markdown from treating the placeholder as syntax
                let placeholder = format!("{}{}z", stem, spans.len());
                text.push_str(&markdown[copied..i]);
                text.push_str(&placeholder);
                spans.push((placeholder, markdown[i..i + len].to_string()));
                i += len;
                copied = i;
                continue;
            }

            i += rest.chars().next().map_or(1, char::len_utf8);
        }
        text.push_str(&markdown[copied..]);

        ProtectedText { text, spans }
    }

    /// Length of the math span starting at `start`, if one does
    fn match_span(&self, text: &str, start: usize, limit: usize) -> Option<usize> {
        let rest = &text[start..limit];
        self.delimiters.iter().find_map(|delim| {
            let body = rest.strip_prefix(delim.open.as_str())?;
            let single_line = delim.open == "$";
            let close = find_close(body, &delim.close, single_line)?;
            if body[..close].trim().is_empty() {
                return None;
            }
            Some(delim.open.len() + close + delim.close.len())
        })
    }
}

impl ProtectedText {
    /// Number of math spans that were protected
    pub fn span_count(&self) -> usize {
        self.spans.len()
    }

    /// Put the original math back into rendered HTML
    pub fn restore(&self, html: &str) -> String {
        let mut output = html.to_string();
        for (placeholder, math) in &self.spans {
            output = output.replace(placeholder.as_str(), &escape_math(math));
        }
        output
    }
}

/// Offset of the closing delimiter within `body`, skipping escaped characters
fn find_close(body: &str, close: &str, single_line: bool) -> Option<usize> {
    let mut chars = body.char_indices();
    while let Some((pos, c)) = chars.next() {
        if body[pos..].starts_with(close) {
            return Some(pos);
        }
        match c {
            '\\' => {
                chars.next();
            }
            '\n' if single_line => return None,
            _ => {}
        }
    }
    None
}

/// Escape only what would break the HTML; the math notation itself is kept
fn escape_math(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Byte ranges markdown renders verbatim: fenced blocks and inline code
/// spans, in order
fn code_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for fence in fenced_code_ranges(text) {
        ranges.extend(code_span_ranges(text, start..fence.start));
        start = fence.end;
        ranges.push(fence);
    }
    ranges.extend(code_span_ranges(text, start..text.len()));
    ranges
}

/// Byte ranges of inline code spans inside `within`. A backtick run is
/// closed by the next run of exactly the same length; a run that is never
/// closed is literal text.
fn code_span_ranges(text: &str, within: Range<usize>) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let end = within.end;
    let mut ranges = Vec::new();
    let mut i = within.start;

    while i < end {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => {
                let run = backtick_run(bytes, i, end);
                match find_backtick_run(bytes, i + run, end, run) {
                    Some(close) => {
                        ranges.push(i..close + run);
                        i = close + run;
                    }
                    None => i += run,
                }
            }
            _ => i += 1,
        }
    }

    ranges
}

fn backtick_run(bytes: &[u8], start: usize, end: usize) -> usize {
    bytes[start..end].iter().take_while(|b| **b == b'`').count()
}

/// Start of the next backtick run of exactly `len` in `from..end`
fn find_backtick_run(bytes: &[u8], from: usize, end: usize, len: usize) -> Option<usize> {
    let mut j = from;
    while j < end {
        if bytes[j] == b'`' {
            let run = backtick_run(bytes, j, end);
            if run == len {
                return Some(j);
            }
            j += run;
        } else {
            j += 1;
        }
    }
    None
}

/// Byte ranges of fenced code blocks (``` or ~~~), including the fences.
/// Fences nested in list items or block quotes count too, whatever their
/// indentation.
fn fenced_code_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut open: Option<(usize, char, usize)> = None;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let trimmed = strip_container_markers(line);

        if let Some(fence_char) = trimmed.chars().next().filter(|c| *c == '`' || *c == '~') {
            let run = trimmed.chars().take_while(|c| *c == fence_char).count();
            if run >= 3 {
                match open {
                    // A backtick fence's info string cannot hold a backtick
                    None if fence_char == '`' && trimmed[run..].contains('`') => {}
                    None => open = Some((offset, fence_char, run)),
                    Some((start, c, len))
                        if c == fence_char && run >= len && trimmed[run..].trim().is_empty() =>
                    {
                        ranges.push(start..offset + line.len());
                        open = None;
                    }
                    Some(_) => {}
                }
            }
        }

        offset += line.len();
    }

    if let Some((start, _, _)) = open {
        ranges.push(start..text.len());
    }

    ranges
}

/// Drop indentation, block quote markers and a list marker from the start of a line
fn strip_container_markers(line: &str) -> &str {
    let mut rest = line.trim_start();
    while let Some(inner) = rest.strip_prefix('>') {
        rest = inner.trim_start();
    }

    let marker = match rest.as_bytes().first() {
        Some(b'-' | b'*' | b'+') => 1,
        Some(b'0'..=b'9') => {
            let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
            match rest.as_bytes().get(digits) {
                Some(b'.' | b')') => digits + 1,
                _ => 0,
            }
        }
        _ => 0,
    };
    if marker > 0 && rest[marker..].starts_with([' ', '\t']) {
        rest = rest[marker..].trim_start();
    }
    rest
}
