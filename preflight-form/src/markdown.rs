//! Line-oriented formatter for the content of `markdown` blocks.
//!
//! This is deliberately not a markdown parser. Content is split on `\n` and each
//! line is classified on its own, in this order:
//!
//! 1. `### `, `## `, `# ` - heading of level 3, 2, 1 (the prefix is consumed)
//! 2. `- ` or `* ` - bulleted list item
//! 3. a blank line - line break
//! 4. anything else - paragraph
//!
//! Indentation and nested lists are not recognised; an indented `- x` is a paragraph.
//!
//! Inside a line, `**bold**` spans are resolved first and `*italic*` spans are
//! then looked for only in the text outside of them.

use std::sync::LazyLock;

use regex::Regex;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern is valid"));

static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*]+)\*").expect("italic pattern is valid"));

/// One formatted line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkdownNode {
    Heading { level: u8, inlines: Vec<Inline> },
    ListItem(Vec<Inline>),
    LineBreak,
    Paragraph(Vec<Inline>),
}

/// A run of text with uniform emphasis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Bold(String),
    Italic(String),
}

impl Inline {
    /// The text of this run without any emphasis.
    pub fn text(&self) -> &str {
        match self {
            Self::Text(s) | Self::Bold(s) | Self::Italic(s) => s,
        }
    }
}

/// Format block content into one node per line.
pub fn format(content: &str) -> Vec<MarkdownNode> {
    content.split('\n').map(format_line).collect()
}

/// Classify and format a single line.
pub fn format_line(line: &str) -> MarkdownNode {
    if let Some(rest) = line.strip_prefix("### ") {
        MarkdownNode::Heading {
            level: 3,
            inlines: format_inline(rest),
        }
    } else if let Some(rest) = line.strip_prefix("## ") {
        MarkdownNode::Heading {
            level: 2,
            inlines: format_inline(rest),
        }
    } else if let Some(rest) = line.strip_prefix("# ") {
        MarkdownNode::Heading {
            level: 1,
            inlines: format_inline(rest),
        }
    } else if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        MarkdownNode::ListItem(format_inline(rest))
    } else if line.trim().is_empty() {
        MarkdownNode::LineBreak
    } else {
        MarkdownNode::Paragraph(format_inline(line))
    }
}

/// Resolve emphasis within a line into left-to-right runs.
pub fn format_inline(text: &str) -> Vec<Inline> {
    let mut runs = Vec::new();
    let mut rest = 0;

    for bold in BOLD.captures_iter(text) {
        let (Some(whole), Some(inner)) = (bold.get(0), bold.get(1)) else {
            continue;
        };
        push_italics(&text[rest..whole.start()], &mut runs);
        runs.push(Inline::Bold(inner.as_str().to_string()));
        rest = whole.end();
    }
    push_italics(&text[rest..], &mut runs);

    runs
}

fn push_italics(text: &str, runs: &mut Vec<Inline>) {
    let mut rest = 0;

    for italic in ITALIC.captures_iter(text) {
        let (Some(whole), Some(inner)) = (italic.get(0), italic.get(1)) else {
            continue;
        };
        push_text(&text[rest..whole.start()], runs);
        runs.push(Inline::Italic(inner.as_str().to_string()));
        rest = whole.end();
    }
    push_text(&text[rest..], runs);
}

fn push_text(text: &str, runs: &mut Vec<Inline>) {
    if !text.is_empty() {
        runs.push(Inline::Text(text.to_string()));
    }
}
