//! Consistency checks for imported bookmark trees.
//!
//! Returns a list of `Diagnostic` items (non-fatal). The tree shape itself
//! (bookmarks without children, folders with a child list) is guaranteed by
//! the types, so these checks look at the data.

use std::collections::HashSet;

use crate::error::{Diagnostic, Severity};
use crate::types::{Document, Node, NodeKind};

/// Validate a document and return any diagnostics. Never modifies it.
pub fn validate(doc: &Document) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    if !doc.root.is_folder() {
        diagnostics.push(Diagnostic {
            severity: Severity::Error,
            message: "Document root is a bookmark, expected a folder".into(),
            node_id: Some(doc.root.id.clone()),
            code: Some("E002".into()),
        });
    }

    doc.root.walk(&mut |node| {
        if !seen.insert(node.id.as_str()) {
            diagnostics.push(Diagnostic {
                severity: Severity::Error,
                message: format!("Duplicate identifier '{}' on '{}'", node.id, node.name),
                node_id: Some(node.id.clone()),
                code: Some("E001".into()),
            });
        }
        if !std::ptr::eq(node, &doc.root) {
            validate_node(node, &mut diagnostics);
        }
    });

    diagnostics
}

fn validate_node(node: &Node, diagnostics: &mut Vec<Diagnostic>) {
    match &node.kind {
        NodeKind::Bookmark { url } if url.trim().is_empty() => {
            diagnostics.push(Diagnostic {
                severity: Severity::Warning,
                message: format!("Bookmark '{}' has an empty URL", node.name),
                node_id: Some(node.id.clone()),
                code: Some("W001".into()),
            });
        }
        NodeKind::Folder { children } if children.is_empty() => {
            diagnostics.push(Diagnostic {
                severity: Severity::Info,
                message: format!("Folder '{}' is empty", node.name),
                node_id: Some(node.id.clone()),
                code: Some("I001".into()),
            });
        }
        _ => {}
    }

    if node.name.trim().is_empty() {
        let what = if node.is_folder() { "Folder" } else { "Bookmark" };
        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            message: format!("{what} '{}' has no name", node.id),
            node_id: Some(node.id.clone()),
            code: Some("W002".into()),
        });
    }
}
