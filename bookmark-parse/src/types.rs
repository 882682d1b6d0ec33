use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Display name of the synthetic root folder every import produces.
pub const DEFAULT_ROOT_NAME: &str = "All bookmarks";

/// Generator identifier stamped on documents built by this crate.
pub const DEFAULT_GENERATOR: &str = "bookmarks-cli";

/// Schema version of the canonical document format.
pub const SCHEMA_VERSION: u32 = 1;

/// Tag applied to the folder representing the browser's bookmark bar.
pub const TOOLBAR_TAG: &str = "toolbar";

/// Knobs shared by every importer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// Name given to the synthetic root folder.
    pub root_name: String,
    /// Generator identifier written into new documents.
    pub generator: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            root_name: DEFAULT_ROOT_NAME.to_string(),
            generator: DEFAULT_GENERATOR.to_string(),
        }
    }
}

/// Generate a fresh node identifier (32 lowercase hex chars).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// One entry of the bookmark tree.
///
/// The fields every node carries live here; what distinguishes a folder from
/// a bookmark lives in [`NodeKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub add_date: Option<String>,
    pub last_modified: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
    /// Set-like, insertion ordered. Empty means "no tags".
    pub tags: Vec<String>,
    pub kind: NodeKind,
}

/// Folder or bookmark payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Ordered children, in display order.
    Folder { children: Vec<Node> },
    /// A leaf pointing at a URL. The URL may be empty but is always present.
    Bookmark { url: String },
}

impl Node {
    /// An empty folder with a freshly generated id.
    pub fn folder(name: impl Into<String>) -> Self {
        Self::with_kind(
            name,
            NodeKind::Folder {
                children: Vec::new(),
            },
        )
    }

    /// A bookmark with a freshly generated id.
    pub fn bookmark(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Bookmark { url: url.into() })
    }

    fn with_kind(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            add_date: None,
            last_modified: None,
            icon: None,
            description: None,
            tags: Vec::new(),
            kind,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder { .. })
    }

    pub fn is_bookmark(&self) -> bool {
        matches!(self.kind, NodeKind::Bookmark { .. })
    }

    /// The bookmark URL, `None` for folders.
    pub fn url(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Bookmark { url } => Some(url),
            NodeKind::Folder { .. } => None,
        }
    }

    /// Folder children, `None` for bookmarks.
    pub fn children(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::Folder { children } => Some(children),
            NodeKind::Bookmark { .. } => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match &mut self.kind {
            NodeKind::Folder { children } => Some(children),
            NodeKind::Bookmark { .. } => None,
        }
    }

    /// Append a child. Returns the child back if `self` is a bookmark.
    pub fn push_child(&mut self, child: Node) -> Result<(), Node> {
        match self.children_mut() {
            Some(children) => {
                children.push(child);
                Ok(())
            }
            None => Err(child),
        }
    }

    /// Add a tag unless it is blank or already present.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !tag.is_empty() && !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Visit this node and all descendants depth-first, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        if let Some(children) = self.children() {
            for child in children {
                child.walk(visit);
            }
        }
    }

    /// Raw `(folders, bookmarks)` counts for this subtree, this node included.
    pub fn counts(&self) -> (usize, usize) {
        match &self.kind {
            NodeKind::Bookmark { .. } => (0, 1),
            NodeKind::Folder { children } => {
                children.iter().fold((1, 0), |(folders, bookmarks), child| {
                    let (f, b) = child.counts();
                    (folders + f, bookmarks + b)
                })
            }
        }
    }
}

/// Map an empty string to `None`.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match &self.kind {
            NodeKind::Folder { .. } => map.serialize_entry("type", "folder")?,
            NodeKind::Bookmark { .. } => map.serialize_entry("type", "bookmark")?,
        }
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("id", &self.id)?;
        match &self.kind {
            NodeKind::Bookmark { url } => map.serialize_entry("url", url)?,
            NodeKind::Folder { children } => map.serialize_entry("children", children)?,
        }
        let optionals = [
            ("add_date", &self.add_date),
            ("last_modified", &self.last_modified),
            ("icon", &self.icon),
            ("description", &self.description),
        ];
        for (key, value) in optionals {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                map.serialize_entry(key, value)?;
            }
        }
        if !self.tags.is_empty() {
            map.serialize_entry("tags", &self.tags)?;
        }
        map.end()
    }
}

/// Folder and bookmark totals of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Statistics {
    /// Folders, the synthetic root excluded.
    pub total_folders: usize,
    pub total_bookmarks: usize,
}

/// One imported bookmark collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Always a folder.
    pub root: Node,
    /// Where the data came from, usually a file path.
    pub source: String,
    pub generator: String,
    pub version: u32,
    /// ISO-8601 timestamp of when the document was produced.
    pub generated_at: String,
}

impl Document {
    pub fn new(root: Node, source: impl Into<String>) -> Self {
        Self::with_options(root, source, &ImportOptions::default())
    }

    pub fn with_options(root: Node, source: impl Into<String>, options: &ImportOptions) -> Self {
        Self {
            root,
            source: source.into(),
            generator: options.generator.clone(),
            version: SCHEMA_VERSION,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Derived totals; recomputed on every call.
    pub fn statistics(&self) -> Statistics {
        let (folders, bookmarks) = self.root.counts();
        Statistics {
            total_folders: folders.saturating_sub(1),
            total_bookmarks: bookmarks,
        }
    }

    /// The canonical JSON representation.
    pub fn to_value(&self) -> serde_json::Value {
        // Serializing a tree of strings and integers cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// The canonical JSON representation, pretty printed.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Serialize)]
struct CanonicalView<'a> {
    version: u32,
    generated_at: &'a str,
    source: &'a str,
    generator: &'a str,
    statistics: Statistics,
    root: &'a Node,
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CanonicalView {
            version: self.version,
            generated_at: &self.generated_at,
            source: &self.source,
            generator: &self.generator,
            statistics: self.statistics(),
            root: &self.root,
        }
        .serialize(serializer)
    }
}
