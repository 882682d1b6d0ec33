//! ANSI terminal renderer.
//!
//! Draws the bookmark tree with box-drawing guides using the `colored` crate:
//! folder names bold, URLs dimmed, tags in yellow brackets.

use colored::Colorize;

use crate::types::{Document, Node, NodeKind};

/// Render a document as an ANSI-colored tree.
pub fn to_terminal(doc: &Document) -> String {
    let stats = doc.statistics();
    let mut lines = vec![format!(
        "{} {}",
        doc.root.name.bold(),
        format!(
            "({} folders, {} bookmarks)",
            stats.total_folders, stats.total_bookmarks
        )
        .dimmed()
    )];

    if let Some(children) = doc.root.children() {
        render_children(children, "", &mut lines);
    }
    lines.join("\n")
}

fn render_children(children: &[Node], prefix: &str, lines: &mut Vec<String>) {
    let count = children.len();
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == count;
        let branch = if last { "\u{2514}\u{2500}\u{2500}" } else { "\u{251C}\u{2500}\u{2500}" }; // └── ├──
        lines.push(format!("{prefix}{branch} {}", render_label(child)));

        if let NodeKind::Folder { children } = &child.kind {
            let guide = if last { "    " } else { "\u{2502}   " }; // │
            render_children(children, &format!("{prefix}{guide}"), lines);
        }
    }
}

fn render_label(node: &Node) -> String {
    let mut label = match &node.kind {
        NodeKind::Folder { .. } => format!("{}", display_name(node).blue().bold()),
        NodeKind::Bookmark { url } => {
            format!("{} {}", display_name(node), url.dimmed())
        }
    };
    if !node.tags.is_empty() {
        label.push_str(&format!(" {}", format!("[{}]", node.tags.join(", ")).yellow()));
    }
    label
}

fn display_name(node: &Node) -> &str {
    if node.name.is_empty() {
        "(untitled)"
    } else {
        &node.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_ROOT_NAME;

    #[test]
    fn renders_nested_tree() {
        colored::control::set_override(false);
        let mut root = Node::folder(DEFAULT_ROOT_NAME);
        let mut bar = Node::folder("Bar");
        bar.add_tag("toolbar");
        bar.push_child(Node::bookmark("Rust", "https://rust-lang.org")).unwrap();
        bar.push_child(Node::bookmark("", "https://blank.test")).unwrap();
        root.push_child(bar).unwrap();
        root.push_child(Node::bookmark("Last", "https://last.test")).unwrap();

        let out = to_terminal(&Document::new(root, "t"));
        let expected = [
            "All bookmarks (1 folders, 3 bookmarks)",
            "\u{251C}\u{2500}\u{2500} Bar [toolbar]",
            "\u{2502}   \u{251C}\u{2500}\u{2500} Rust https://rust-lang.org",
            "\u{2502}   \u{2514}\u{2500}\u{2500} (untitled) https://blank.test",
            "\u{2514}\u{2500}\u{2500} Last https://last.test",
        ]
        .join("\n");
        assert_eq!(out, expected);
    }
}
