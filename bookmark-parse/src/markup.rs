//! Netscape bookmark file (`<DL>/<DT>/<H3>/<A>/<DD>`) parser.
//!
//! The export format is loose HTML with no closing `</DT>` tags, so instead of
//! building a DOM we drive a small state machine straight off the html5ever
//! tokenizer:
//!
//! - `<H3>` creates a *pending* folder. It only joins the tree once the `<DL>`
//!   holding its contents opens, at which point it is appended to the open
//!   folder and becomes the open folder itself.
//! - `<A>` creates a bookmark and appends it to the open folder.
//! - Text goes wherever the current [`Capture`] points: a name, a description,
//!   or nowhere. Targets are index paths into the tree, so closing a `</DL>`
//!   does not cut the capture off. Consecutive character tokens (the tokenizer
//!   splits runs at character references) are coalesced first, so
//!   `Tom &amp; Jerry` arrives as one run.

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
    TokenizerResult,
};

use crate::error::ImportError;
use crate::types::{ImportOptions, Node, TOOLBAR_TAG, non_empty};

/// Parse the full text of a Netscape bookmark export into a root folder.
pub fn parse_markup(text: &str) -> Result<Node, ImportError> {
    parse_markup_with(text, &ImportOptions::default())
}

/// Like [`parse_markup`], with a custom root name.
pub fn parse_markup_with(text: &str, options: &ImportOptions) -> Result<Node, ImportError> {
    let parser = tokenize(MarkupParser::new(&options.root_name), text)?;
    Ok(parser.finish())
}

/// Run `sink` over the whole of `text` and hand it back.
fn tokenize<S: TokenSink>(sink: S, text: &str) -> Result<S, ImportError> {
    let mut input = BufferQueue::new();
    input.push_back(StrTendril::from_slice(text));

    let mut tokenizer = Tokenizer::new(sink, TokenizerOpts::default());
    match tokenizer.feed(&mut input) {
        TokenizerResult::Done => {}
        // Only a sink that asks for a script pause gets here; ours never does.
        TokenizerResult::Script(_) => {
            return Err(ImportError::Parse {
                message: "tokenizer suspended before the end of input".into(),
            });
        }
    }
    if !input.is_empty() {
        return Err(ImportError::Parse {
            message: "tokenizer stopped before the end of input".into(),
        });
    }
    tokenizer.end();

    Ok(tokenizer.sink)
}

/// Child indices leading from the root to a node; empty for the root itself.
type NodePath = Vec<usize>;

/// Where incoming text is currently accumulated.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Capture {
    None,
    /// The pending folder's name (`<H3>` before its `<DL>`).
    PendingName,
    /// Name of the node at this path (`<H1>`, `<H3>`, `<A>`).
    Name(NodePath),
    /// Description of the node at this path (`<DD>`).
    Description(NodePath),
}

/// Tokenizer sink holding the parse state.
///
/// `stack[0]` is the root's (empty) path and is never popped. Every other
/// entry is the path of a folder whose `<DL>` is still open.
struct MarkupParser {
    root: Node,
    stack: Vec<NodePath>,
    pending: Option<Node>,
    capture: Capture,
    text: String,
    default_root_name: String,
}

impl MarkupParser {
    fn new(root_name: &str) -> Self {
        Self {
            root: Node::folder(root_name),
            stack: vec![NodePath::new()],
            pending: None,
            capture: Capture::None,
            text: String::new(),
            default_root_name: root_name.to_string(),
        }
    }

    fn top_path(&self) -> NodePath {
        self.stack.last().cloned().unwrap_or_default()
    }

    /// Append `node` to the open folder and return its path.
    fn push_to_top(&mut self, node: Node) -> Option<NodePath> {
        let mut path = self.top_path();
        let Some(children) = node_at_mut(&mut self.root, &path).and_then(Node::children_mut)
        else {
            tracing::warn!(name = %node.name, "open stack entry is not a folder, dropping node");
            return None;
        };
        children.push(node);
        path.push(children.len() - 1);
        Some(path)
    }

    fn start_tag(&mut self, tag: &Tag) {
        match &*tag.name {
            "dl" => {
                if let Some(folder) = self.pending.take() {
                    if let Some(path) = self.push_to_top(folder) {
                        if self.capture == Capture::PendingName {
                            self.capture = Capture::Name(path.clone());
                        }
                        self.stack.push(path);
                    }
                }
            }
            "dt" => self.capture = Capture::None,
            "h1" => {
                self.root.name.clear();
                self.capture = Capture::Name(NodePath::new());
            }
            "h3" => {
                let mut folder = Node::folder("");
                folder.add_date = attr(tag, "add_date");
                folder.last_modified = attr(tag, "last_modified");
                if attr(tag, "personal_toolbar_folder")
                    .is_some_and(|v| v.eq_ignore_ascii_case("true"))
                {
                    folder.add_tag(TOOLBAR_TAG);
                }
                if let Some(dropped) = self.pending.replace(folder) {
                    tracing::debug!(name = %dropped.name, "folder heading without a list, dropping");
                }
                self.capture = Capture::PendingName;
            }
            "a" => {
                let mut bookmark = Node::bookmark("", attr(tag, "href").unwrap_or_default());
                bookmark.add_date = attr(tag, "add_date");
                bookmark.last_modified = attr(tag, "last_modified");
                bookmark.icon = attr(tag, "icon").or_else(|| attr(tag, "icon_uri"));
                if let Some(tags) = attr(tag, "tags") {
                    for t in split_tags(&tags) {
                        bookmark.add_tag(t);
                    }
                }
                self.capture = match self.push_to_top(bookmark) {
                    Some(path) => Capture::Name(path),
                    None => Capture::None,
                };
            }
            "dd" => {
                let mut path = self.top_path();
                let last = node_at_mut(&mut self.root, &path)
                    .and_then(|top| top.children().and_then(|c| c.len().checked_sub(1)));
                if let Some(index) = last {
                    path.push(index);
                    self.capture = Capture::Description(path);
                }
            }
            _ => self.capture = Capture::None,
        }
    }

    fn end_tag(&mut self, tag: &Tag) {
        match &*tag.name {
            "dl" => {
                if self.stack.len() > 1 {
                    self.stack.pop();
                }
            }
            "h1" | "h3" | "a" | "dd" => self.capture = Capture::None,
            _ => {}
        }
    }

    /// Apply the buffered text run to the capture target.
    fn flush_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let data = std::mem::take(&mut self.text);
        let text = data.trim();
        if text.is_empty() {
            return;
        }
        match &self.capture {
            Capture::None => {}
            Capture::PendingName => {
                if let Some(folder) = self.pending.as_mut() {
                    append_name(&mut folder.name, text);
                }
            }
            Capture::Name(path) => {
                if let Some(node) = node_at_mut(&mut self.root, path) {
                    append_name(&mut node.name, text);
                }
            }
            Capture::Description(path) => {
                if let Some(node) = node_at_mut(&mut self.root, path) {
                    let joined = match node.description.take() {
                        Some(existing) if !existing.is_empty() => format!("{existing}\n{text}"),
                        _ => text.to_string(),
                    };
                    node.description = Some(joined.trim().to_string());
                }
            }
        }
    }

    /// Flush trailing text and hand back the root. Folders still open are
    /// already in the tree.
    fn finish(mut self) -> Node {
        self.flush_text();
        if self.root.name.is_empty() {
            self.root.name = self.default_root_name;
        }
        self.root
    }
}

/// Follow `path` down from `root`.
fn node_at_mut<'a>(root: &'a mut Node, path: &[usize]) -> Option<&'a mut Node> {
    let mut node = root;
    for &index in path {
        node = node.children_mut()?.get_mut(index)?;
    }
    Some(node)
}

impl TokenSink for MarkupParser {
    type Handle = ();

    fn process_token(&mut self, token: Token, line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::CharacterTokens(text) => {
                self.text.push_str(&text);
                return TokenSinkResult::Continue;
            }
            Token::NullCharacterToken => return TokenSinkResult::Continue,
            Token::ParseError(message) => {
                tracing::trace!(line = line_number, %message, "recoverable markup error");
                return TokenSinkResult::Continue;
            }
            _ => {}
        }

        self.flush_text();
        if let Token::TagToken(tag) = token {
            match tag.kind {
                TagKind::StartTag => self.start_tag(&tag),
                TagKind::EndTag => self.end_tag(&tag),
            }
        }
        TokenSinkResult::Continue
    }
}

/// Attribute value by lower-case name; empty values count as absent.
fn attr(tag: &Tag, name: &str) -> Option<String> {
    let value = tag
        .attrs
        .iter()
        .find(|a| &*a.name.local == name)
        .map(|a| a.value.to_string());
    non_empty(value)
}

/// Split a `TAGS="a, b ,,c"` attribute into trimmed, non-blank entries.
fn split_tags(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|t| !t.is_empty())
}

fn append_name(name: &mut String, text: &str) {
    if !name.is_empty() {
        name.push(' ');
    }
    name.push_str(text);
    let trimmed = name.trim();
    if trimmed.len() != name.len() {
        *name = trimmed.to_string();
    }
}
