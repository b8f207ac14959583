//! Single-pass inline pattern scanner.
//!
//! # Invariants
//! - Patterns are tried leftmost-first in the order bold, italic, link.
//! - Matches never overlap and are never re-scanned for nested patterns.
//! - Text outside matches is passed through verbatim.
//! - A match with empty captured text still consumes its delimiters.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Raw length budget of summary renderings, in UTF-16 code units.
pub const SUMMARY_MAX_UNITS: usize = 150;
const ELLIPSIS: &str = "...";

static INLINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*(.*?)\*\*|\*(.*?)\*|\[(.*?)\]\((https?://[^\s)]+)\)")
        .expect("valid inline markup regex")
});

/// One inline run of rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Text(String),
    Bold(String),
    Italic(String),
    Link { text: String, url: String },
}

impl Span {
    /// Visible text without any styling.
    pub fn plain_text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Bold(text) | Self::Italic(text) => text,
            Self::Link { text, .. } => text,
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            Self::Text(text) => escape_html(text).into_owned(),
            Self::Bold(text) => format!("<strong>{}</strong>", escape_html(text)),
            Self::Italic(text) => format!("<em>{}</em>", escape_html(text)),
            Self::Link { text, url } => format!(
                "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                escape_html(url),
                escape_html(text)
            ),
        }
    }
}

/// One rendered line of a full description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Line(Vec<Span>),
    /// A blank source line, rendered as vertical spacing.
    Spacer,
}

/// Scans one line of text into spans.
pub fn render_inline(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut last_end = 0;

    for caps in INLINE_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last_end {
            spans.push(Span::Text(text[last_end..whole.start()].to_string()));
        }

        let span = if let Some(bold) = caps.get(1) {
            Span::Bold(bold.as_str().to_string())
        } else if let Some(italic) = caps.get(2) {
            Span::Italic(italic.as_str().to_string())
        } else {
            Span::Link {
                text: caps.get(3).map_or("", |m| m.as_str()).to_string(),
                url: caps.get(4).map_or("", |m| m.as_str()).to_string(),
            }
        };
        spans.push(span);
        last_end = whole.end();
    }

    if last_end < text.len() {
        spans.push(Span::Text(text[last_end..].to_string()));
    }
    spans
}

/// Card summary: truncates the raw text, flattens newlines, then scans.
///
/// Truncation happens before scanning, so a pattern cut in half renders as
/// plain text.
pub fn render_summary(text: &str) -> Vec<Span> {
    let flattened = truncate_text(text, SUMMARY_MAX_UNITS).replace('\n', " ");
    render_inline(&flattened)
}

/// Full view: one block per source line.
pub fn render_blocks(text: &str) -> Vec<Block> {
    text.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                Block::Spacer
            } else {
                Block::Line(render_inline(line))
            }
        })
        .collect()
}

/// Item card excerpt: truncated like a summary but keeping line structure.
pub fn render_excerpt_blocks(text: &str) -> Vec<Block> {
    render_blocks(&truncate_text(text, SUMMARY_MAX_UNITS))
}

/// Keeps the first `max_units` UTF-16 code units, appending `...` when cut.
///
/// Length is measured in UTF-16 units, as browsers measure string length. A
/// character that would straddle the limit is dropped whole.
pub fn truncate_text(text: &str, max_units: usize) -> Cow<'_, str> {
    let mut units = 0;
    for (index, ch) in text.char_indices() {
        units += ch.len_utf16();
        if units > max_units {
            return Cow::Owned(format!("{}{ELLIPSIS}", &text[..index]));
        }
    }
    Cow::Borrowed(text)
}

pub fn spans_to_plain_text(spans: &[Span]) -> String {
    spans.iter().map(Span::plain_text).collect()
}

pub fn spans_to_html(spans: &[Span]) -> String {
    spans.iter().map(Span::to_html).collect()
}

fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}
