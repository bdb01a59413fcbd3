use preflight_form::markdown::{Inline, MarkdownNode};

/// Flatten formatted markdown into plain terminal text.
///
/// Headings are underlined (`=` for level 1, `-` below that), list items get a
/// bullet and emphasis markers are dropped.
pub fn markdown_to_text(nodes: &[MarkdownNode]) -> String {
    let mut out = String::new();

    for node in nodes {
        match node {
            MarkdownNode::Heading { level, inlines } => {
                let text = inline_text(inlines);
                let rule = if *level == 1 { '=' } else { '-' };
                out.push_str(&text);
                out.push('\n');
                out.extend(std::iter::repeat_n(rule, text.chars().count()));
            }
            MarkdownNode::ListItem(inlines) => {
                out.push_str("  • ");
                out.push_str(&inline_text(inlines));
            }
            MarkdownNode::LineBreak => {}
            MarkdownNode::Paragraph(inlines) => out.push_str(&inline_text(inlines)),
        }
        out.push('\n');
    }

    out
}

fn inline_text(inlines: &[Inline]) -> String {
    inlines.iter().map(Inline::text).collect()
}
