//! Chromium-family `Bookmarks` JSON (`{"roots": {...}}`) converter.

use serde_json::{Map, Value};

use crate::types::{ImportOptions, Node, TOOLBAR_TAG, non_empty};

/// Root keys in the order they are shown to the user.
pub const PREFERRED_ROOTS: [&str; 5] = ["bookmark_bar", "other", "synced", "mobile", "trash"];

/// Folder names (lower-cased) that identify the bookmark bar.
const TOOLBAR_NAMES: [&str; 3] = ["bookmark bar", "bookmarks bar", "书签栏"];

/// Convert a Chromium bookmark file into a root folder.
pub fn convert_json_tree(raw: &Value) -> Node {
    convert_json_tree_with(raw, &ImportOptions::default())
}

/// Like [`convert_json_tree`], with a custom root name.
pub fn convert_json_tree_with(raw: &Value, options: &ImportOptions) -> Node {
    let mut root = Node::folder(options.root_name.as_str());
    let empty = Map::new();
    let roots = raw.get("roots").and_then(Value::as_object).unwrap_or(&empty);
    let mut converted_roots: Vec<Node> = Vec::new();

    for key in PREFERRED_ROOTS {
        let Some(data) = roots.get(key).filter(|v| is_present(v)) else {
            continue;
        };
        if let Some(mut folder) = convert_node(data) {
            if is_toolbar_name(&folder.name) {
                folder.add_tag(TOOLBAR_TAG);
            }
            converted_roots.push(folder);
        }
    }

    // Anything else under `roots`, matched against what we already have by name.
    for (key, data) in roots {
        if !data.is_object() {
            continue;
        }
        let name = data.get("name").and_then(Value::as_str);
        if converted_roots
            .iter()
            .any(|existing| Some(existing.name.as_str()) == name)
        {
            continue;
        }
        if let Some(folder) = convert_node(data) {
            tracing::debug!(%key, name = %folder.name, "appending extra bookmark root");
            converted_roots.push(folder);
        }
    }

    if let Some(children) = root.children_mut() {
        *children = converted_roots;
    }
    root
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty(),
        Value::Null => false,
        _ => true,
    }
}

fn is_toolbar_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    TOOLBAR_NAMES.contains(&lower.as_str())
}

/// Convert one entry. Separators and unknown types yield `None`.
fn convert_node(node: &Value) -> Option<Node> {
    let name = node.get("name").and_then(Value::as_str).unwrap_or_default();
    let add_date = opaque(node.get("date_added"));
    let last_modified =
        opaque(node.get("date_modified")).or_else(|| opaque(node.get("date_last_used")));

    let mut converted = match node.get("type").and_then(Value::as_str) {
        Some("folder") => {
            let mut folder = Node::folder(name);
            if let (Some(children), Some(items)) = (
                folder.children_mut(),
                node.get("children").and_then(Value::as_array),
            ) {
                children.extend(items.iter().filter_map(convert_node));
            }
            if let Some(special) = opaque(node.get("special")) {
                folder.add_tag(special);
            }
            folder
        }
        Some("url") | Some("bookmark") => {
            let url = node.get("url").and_then(Value::as_str).unwrap_or_default();
            Node::bookmark(name, url)
        }
        other => {
            tracing::debug!(node_type = ?other, %name, "skipping non-bookmark entry");
            return None;
        }
    };

    converted.add_date = add_date;
    converted.last_modified = last_modified;
    Some(converted)
}

/// Copy a scalar field verbatim as a string; empty and non-scalar values are absent.
pub(crate) fn opaque(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    non_empty(Some(text))
}
