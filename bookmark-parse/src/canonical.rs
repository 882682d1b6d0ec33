//! Loader for documents previously written in the canonical format.

use serde::Deserialize;
use serde_json::Value;

use crate::chromium::opaque;
use crate::error::ImportError;
use crate::types::{Document, ImportOptions, Node, NodeKind, new_id, non_empty};

/// Rebuild a [`Document`] from its canonical JSON form.
///
/// Nodes without an `id` get a fresh one. Document metadata (`version`,
/// `generator`, `generated_at`, `source`) is taken from the input when present.
pub fn load_canonical(value: &Value) -> Result<Document, ImportError> {
    let root = value.get("root").ok_or(ImportError::UnsupportedFormat)?;
    let raw = RawNode::deserialize(serde_stacker::Deserializer::new(root))?;

    let mut document = Document::with_options(raw.into_node(), "", &ImportOptions::default());
    if let Some(version) = value
        .get("version")
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
    {
        document.version = version;
    }
    if let Some(generator) = value.get("generator").and_then(Value::as_str) {
        document.generator = generator.to_string();
    }
    if let Some(generated_at) = value.get("generated_at").and_then(Value::as_str) {
        document.generated_at = generated_at.to_string();
    }
    if let Some(source) = value.get("source").and_then(Value::as_str) {
        document.source = source.to_string();
    }
    Ok(document)
}

/// Lenient mirror of the canonical node shape.
#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(rename = "type", default)]
    node_type: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    children: Option<Vec<RawNode>>,
    #[serde(default)]
    add_date: Option<Value>,
    #[serde(default)]
    last_modified: Option<Value>,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    tags: Option<RawTags>,
}

/// `tags` may be a single string or a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTags {
    One(String),
    Many(Vec<String>),
}

impl RawNode {
    fn into_node(self) -> Node {
        let kind = match self.node_type.as_deref() {
            Some("bookmark") => NodeKind::Bookmark {
                url: self.url.unwrap_or_default(),
            },
            // Folders are the default, matching the root's implicit type.
            _ => NodeKind::Folder {
                children: self
                    .children
                    .unwrap_or_default()
                    .into_iter()
                    .map(RawNode::into_node)
                    .collect(),
            },
        };

        let mut node = Node {
            id: non_empty(self.id).unwrap_or_else(new_id),
            name: self.name.unwrap_or_default(),
            add_date: opaque(self.add_date.as_ref()),
            last_modified: opaque(self.last_modified.as_ref()),
            icon: non_empty(self.icon),
            description: non_empty(self.description),
            tags: Vec::new(),
            kind,
        };
        let tags = match self.tags {
            Some(RawTags::One(tag)) => vec![tag],
            Some(RawTags::Many(tags)) => tags,
            None => Vec::new(),
        };
        for tag in tags {
            node.add_tag(tag);
        }
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_markup;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn loads_full_document() {
        let value = json!({
            "version": 3,
            "generated_at": "2024-05-01T10:00:00+00:00",
            "source": "exported.html",
            "generator": "someone-else",
            "statistics": { "total_folders": 1, "total_bookmarks": 1 },
            "root": {
                "type": "folder", "name": "All bookmarks", "id": "root",
                "children": [
                    { "type": "folder", "name": "Work", "id": "work", "children": [
                        { "type": "bookmark", "name": "A", "id": "a", "url": "https://a.test",
                          "add_date": "1700000000", "icon": "data:x", "description": "about",
                          "tags": ["x", "y"] }
                    ] }
                ]
            }
        });
        let doc = load_canonical(&value).unwrap();
        assert_eq!(doc.version, 3);
        assert_eq!(doc.generator, "someone-else");
        assert_eq!(doc.generated_at, "2024-05-01T10:00:00+00:00");
        assert_eq!(doc.source, "exported.html");
        assert_eq!(doc.root.id, "root");

        let work = &doc.root.children().unwrap()[0];
        assert_eq!(work.id, "work");
        let a = &work.children().unwrap()[0];
        assert_eq!(a.url(), Some("https://a.test"));
        assert_eq!(a.add_date.as_deref(), Some("1700000000"));
        assert_eq!(a.icon.as_deref(), Some("data:x"));
        assert_eq!(a.description.as_deref(), Some("about"));
        assert_eq!(a.tags, vec!["x", "y"]);
    }

    #[test]
    fn missing_metadata_keeps_defaults() {
        let doc = load_canonical(&json!({ "root": { "type": "folder", "name": "R" } })).unwrap();
        assert_eq!(doc.version, crate::types::SCHEMA_VERSION);
        assert_eq!(doc.generator, crate::types::DEFAULT_GENERATOR);
        assert!(!doc.generated_at.is_empty());
        assert!(doc.root.children().unwrap().is_empty());
    }

    #[test]
    fn missing_ids_are_generated_and_unique() {
        let value = json!({
            "root": { "type": "folder", "name": "R", "children": [
                { "type": "bookmark", "name": "A", "url": "a" },
                { "type": "bookmark", "name": "B", "url": "b" }
            ] }
        });
        let doc = load_canonical(&value).unwrap();
        let children = doc.root.children().unwrap();
        assert_eq!(children[0].id.len(), 32);
        assert_ne!(children[0].id, children[1].id);
        assert_ne!(doc.root.id, children[0].id);
    }

    #[test]
    fn single_tag_string_is_promoted() {
        let value = json!({
            "root": { "type": "folder", "name": "R", "tags": "toolbar" }
        });
        let doc = load_canonical(&value).unwrap();
        assert_eq!(doc.root.tags, vec!["toolbar"]);
    }

    #[test]
    fn missing_type_defaults_to_folder_and_missing_url_to_empty() {
        let value = json!({
            "root": { "name": "R", "children": [ { "type": "bookmark", "name": "A" } ] }
        });
        let doc = load_canonical(&value).unwrap();
        assert!(doc.root.is_folder());
        assert_eq!(doc.root.children().unwrap()[0].url(), Some(""));
    }

    #[test]
    fn wrongly_typed_root_is_malformed() {
        let err = load_canonical(&json!({ "root": { "name": 5 } })).unwrap_err();
        assert!(matches!(err, ImportError::MalformedJson(_)));
    }

    #[test]
    fn round_trip_preserves_tree() {
        let root = parse_markup(concat!(
            "<H1>Menu</H1><DL><p>",
            "<DT><H3 ADD_DATE=\"1\" PERSONAL_TOOLBAR_FOLDER=\"true\">Bar</H3><DL><p>",
            "<DT><A HREF=\"https://a.test\" ADD_DATE=\"2\" TAGS=\"x,y\" ICON=\"data:i\">A</A>",
            "<DD>note",
            "</DL><p>",
            "<DT><A HREF=\"\">Empty</A>",
            "</DL>"
        ))
        .unwrap();
        let original = Document::new(root, "bookmarks.html");
        let reloaded = load_canonical(&original.to_value()).unwrap();
        assert_eq!(reloaded, original);
    }
}
