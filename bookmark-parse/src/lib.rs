//! `bookmark-parse`: normalizes browser bookmark exports into one tree.
//!
//! Three input shapes are understood and all produce the same [`Document`]:
//!
//! - Netscape bookmark HTML (`<DL>/<DT>/<H3>/<A>/<DD>`), see [`parse_markup`].
//! - Chromium-family `Bookmarks` JSON (`{"roots": ...}`), see [`convert_json_tree`].
//! - The canonical JSON written by [`Document::to_value`], see [`load_canonical`].
//!
//! The crate never touches the filesystem; callers hand in bytes or decoded
//! JSON and get a tree back.
//!
//! # Quick start
//!
//! ```
//! let html = r#"<DL><p><DT><H3>Work</H3><DL><p><DT><A HREF="https://a.test">A</A></DL></DL>"#;
//! let doc = bookmark_parse::import(html.as_bytes(), "bookmarks.html").unwrap();
//! let stats = doc.statistics();
//! assert_eq!((stats.total_folders, stats.total_bookmarks), (1, 1));
//! ```

pub mod canonical;
pub mod chromium;
pub mod error;
pub mod import;
pub mod markup;
#[cfg(feature = "terminal")]
pub mod render_term;
pub mod types;
pub mod validate;

pub use canonical::load_canonical;
pub use chromium::{convert_json_tree, convert_json_tree_with};
pub use error::*;
pub use import::{SourceFormat, detect_json_format, import, import_with};
pub use markup::{parse_markup, parse_markup_with};
pub use types::*;

impl Document {
    /// Render this document as an ANSI-colored tree.
    #[cfg(feature = "terminal")]
    pub fn to_terminal(&self) -> String {
        render_term::to_terminal(self)
    }

    /// Validate this document and return any diagnostics.
    pub fn validate(&self) -> Vec<Diagnostic> {
        validate::validate(self)
    }
}
