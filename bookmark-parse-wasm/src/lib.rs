//! WASM bindings for `bookmark-parse`.
//!
//! Exposes the bookmark importers to JavaScript via wasm-bindgen, so a
//! static page can convert an export the user drops onto it without a
//! round trip to a server.

use wasm_bindgen::prelude::*;

/// Import `input` and return the canonical document as JSON.
///
/// `file_name` drives format detection the same way a path does on the
/// command line (`.html`/`.htm` means Netscape markup). Returns
/// `{ "document": ... }` on success and `{ "error": "..." }` otherwise.
#[wasm_bindgen]
pub fn convert(input: &str, file_name: &str) -> String {
    match bookmark_parse::import(input.as_bytes(), file_name) {
        Ok(doc) => serde_json::json!({ "document": doc }).to_string(),
        Err(e) => serde_json::json!({ "error": e.to_string() }).to_string(),
    }
}

/// Folder and bookmark totals for `input`, or `null` when it cannot be imported.
#[wasm_bindgen]
pub fn statistics(input: &str, file_name: &str) -> JsValue {
    bookmark_parse::import(input.as_bytes(), file_name)
        .ok()
        .and_then(|doc| serde_wasm_bindgen::to_value(&doc.statistics()).ok())
        .unwrap_or(JsValue::NULL)
}

/// Validate `input` and return diagnostics as a JSON array.
///
/// An import failure is reported as a single error diagnostic.
#[wasm_bindgen]
pub fn validate(input: &str, file_name: &str) -> String {
    let diagnostics = match bookmark_parse::import(input.as_bytes(), file_name) {
        Ok(doc) => doc.validate(),
        Err(e) => vec![bookmark_parse::Diagnostic {
            severity: bookmark_parse::Severity::Error,
            message: e.to_string(),
            node_id: None,
            code: None,
        }],
    };
    serde_json::to_string(&diagnostics).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_wraps_document() {
        let out = convert(r#"<DL><p><DT><A HREF="https://a.test">A</A></DL>"#, "x.html");
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["document"]["statistics"]["total_bookmarks"], 1);
    }

    #[test]
    fn convert_reports_errors() {
        let out = convert(r#"{"nope": 1}"#, "x.json");
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(value["error"].as_str().unwrap().contains("Unsupported"));
    }

    #[test]
    fn validate_lists_empty_folder() {
        let out = validate(r#"<DL><p><DT><H3>Empty</H3><DL><p></DL></DL>"#, "x.html");
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["code"], "I001");
    }
}
