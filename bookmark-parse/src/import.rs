//! Format detection and dispatch to the individual importers.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::canonical::load_canonical;
use crate::chromium::convert_json_tree_with;
use crate::error::ImportError;
use crate::markup::parse_markup_with;
use crate::types::{Document, ImportOptions};

/// The input shapes this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Netscape bookmark HTML.
    Markup,
    /// Chromium `Bookmarks` JSON with a `roots` object.
    ChromiumJson,
    /// This crate's own canonical document with a `root` node.
    Canonical,
}

impl SourceFormat {
    pub fn label(self) -> &'static str {
        match self {
            SourceFormat::Markup => "netscape-html",
            SourceFormat::ChromiumJson => "chromium-json",
            SourceFormat::Canonical => "canonical-json",
        }
    }
}

/// Whether `source` names a markup file by extension.
pub fn has_markup_extension(source: &str) -> bool {
    Path::new(source)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
}

fn looks_like_markup(input: &[u8]) -> bool {
    input
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|&b| b == b'<')
}

/// Determine the shape of a decoded JSON value.
pub fn detect_json_format(value: &Value) -> Result<SourceFormat, ImportError> {
    let Some(object) = value.as_object() else {
        return Err(ImportError::UnsupportedFormat);
    };
    if object.contains_key("roots") {
        Ok(SourceFormat::ChromiumJson)
    } else if object.contains_key("root") {
        Ok(SourceFormat::Canonical)
    } else {
        Err(ImportError::UnsupportedFormat)
    }
}

/// Decode JSON with no nesting limit. Each folder level costs two levels
/// (object plus `children` array), so the default limit of 128 would reject
/// trees this crate itself wrote. The stack grows on demand instead.
fn parse_json(input: &[u8]) -> Result<Value, ImportError> {
    let mut json = serde_json::Deserializer::from_slice(input);
    json.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut json))?;
    json.end()?;
    Ok(value)
}

/// Import raw file contents.
///
/// `source` identifies the input (usually its path). It drives extension-based
/// format detection and is recorded as the document's `source`.
pub fn import(input: &[u8], source: &str) -> Result<Document, ImportError> {
    import_with(input, source, &ImportOptions::default())
}

/// Like [`import`], with explicit options.
pub fn import_with(
    input: &[u8],
    source: &str,
    options: &ImportOptions,
) -> Result<Document, ImportError> {
    // Strip a UTF-8 byte order mark; some browsers write one.
    let input = input.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(input);

    if has_markup_extension(source) || looks_like_markup(input) {
        tracing::debug!(%source, format = SourceFormat::Markup.label(), "importing");
        let text = String::from_utf8_lossy(input);
        let root = parse_markup_with(&text, options)?;
        return Ok(Document::with_options(root, source, options));
    }

    let value = parse_json(input)?;
    let format = detect_json_format(&value)?;
    tracing::debug!(%source, format = format.label(), "importing");
    if format == SourceFormat::ChromiumJson {
        let root = convert_json_tree_with(&value, options);
        return Ok(Document::with_options(root, source, options));
    }

    let mut document = load_canonical(&value)?;
    document.source = source.to_string();
    Ok(document)
}
