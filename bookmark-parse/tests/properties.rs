//! Property-based tests using proptest.
//!
//! These tests verify that the importers never panic on arbitrary input, that
//! the canonical format round-trips, and that derived statistics agree with a
//! direct count of the tree.

use std::collections::HashSet;

use bookmark_parse::{DEFAULT_ROOT_NAME, Document, Node};
use proptest::prelude::*;

fn arb_optional() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[a-z0-9:/. ]{1,16}")
}

fn arb_tags() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::btree_set("[a-z]{1,6}", 0..4).prop_map(|set| set.into_iter().collect())
}

fn arb_bookmark() -> impl Strategy<Value = Node> {
    (
        "[A-Za-z0-9 &<>'\"]{0,12}",
        "(https?://[a-z]{1,8}\\.test/[a-z]{0,6})?",
        arb_optional(),
        arb_optional(),
        arb_optional(),
        arb_optional(),
        arb_tags(),
    )
        .prop_map(|(name, url, add_date, last_modified, icon, description, tags)| {
            let mut node = Node::bookmark(name, url);
            node.add_date = add_date;
            node.last_modified = last_modified;
            node.icon = icon;
            node.description = description;
            node.tags = tags;
            node
        })
}

fn arb_node() -> impl Strategy<Value = Node> {
    arb_bookmark().prop_recursive(4, 64, 6, |inner| {
        (
            "[A-Za-z0-9 ]{0,12}",
            proptest::collection::vec(inner, 0..6),
            arb_optional(),
            arb_tags(),
        )
            .prop_map(|(name, children, description, tags)| {
                let mut folder = Node::folder(name);
                if let Some(slot) = folder.children_mut() {
                    *slot = children;
                }
                folder.description = description;
                folder.tags = tags;
                folder
            })
    })
}

fn arb_document() -> impl Strategy<Value = Document> {
    proptest::collection::vec(arb_node(), 0..6).prop_map(|children| {
        let mut root = Node::folder(DEFAULT_ROOT_NAME);
        if let Some(slot) = root.children_mut() {
            *slot = children;
        }
        Document::new(root, "generated")
    })
}

/// Fragments of the Netscape format, shuffled into arbitrary sequences.
fn arb_markup() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        Just("<DL><p>".to_string()),
        Just("</DL><p>".to_string()),
        Just("<DT>".to_string()),
        Just("<H1>".to_string()),
        Just("</H1>".to_string()),
        Just("<H3 ADD_DATE=\"1\">".to_string()),
        Just("<H3 PERSONAL_TOOLBAR_FOLDER=\"true\">".to_string()),
        Just("</H3>".to_string()),
        Just("<A HREF=\"https://a.test\" TAGS=\"x, y\">".to_string()),
        Just("</A>".to_string()),
        Just("<DD>".to_string()),
        Just("<p>".to_string()),
        Just("&amp;".to_string()),
        "[A-Za-z ]{0,8}",
    ];
    proptest::collection::vec(fragment, 0..60).prop_map(|parts| parts.concat())
}

fn raw_counts(node: &Node) -> (usize, usize) {
    let mut folders = 0;
    let mut bookmarks = 0;
    node.walk(&mut |n| {
        if n.is_folder() {
            folders += 1;
        } else {
            bookmarks += 1;
        }
    });
    (folders, bookmarks)
}

fn ids_unique(node: &Node) -> bool {
    let mut seen = HashSet::new();
    let mut unique = true;
    node.walk(&mut |n| unique &= seen.insert(n.id.clone()));
    unique
}

proptest! {
    /// Any random string fed to the markup parser should never cause a panic.
    #[test]
    fn any_markup_no_panic(input in "\\PC{0,500}") {
        let root = bookmark_parse::parse_markup(&input).unwrap();
        prop_assert!(root.is_folder());
    }

    /// Any random bytes fed to the dispatcher either import or fail cleanly.
    #[test]
    fn any_bytes_no_panic(input in proptest::collection::vec(any::<u8>(), 0..300)) {
        let _ = bookmark_parse::import(&input, "input.json");
    }

    /// Tag soup built from real format fragments yields a valid tree.
    #[test]
    fn tag_soup_yields_valid_tree(input in arb_markup()) {
        let root = bookmark_parse::parse_markup(&input).unwrap();
        prop_assert!(root.is_folder());
        prop_assert!(!root.name.is_empty());
        prop_assert!(ids_unique(&root));
        let mut clean = true;
        root.walk(&mut |n| {
            clean &= n.name == n.name.trim();
            clean &= n.description.as_deref().is_none_or(|d| !d.trim().is_empty());
        });
        prop_assert!(clean, "names and descriptions should be trimmed");
    }

    /// Canonical serialization followed by loading reproduces the document.
    #[test]
    fn canonical_round_trip(doc in arb_document()) {
        let reloaded = bookmark_parse::load_canonical(&doc.to_value()).unwrap();
        prop_assert_eq!(reloaded, doc);
    }

    /// Statistics exclude exactly the synthetic root.
    #[test]
    fn statistics_match_direct_count(doc in arb_document()) {
        let (folders, bookmarks) = raw_counts(&doc.root);
        let stats = doc.statistics();
        prop_assert_eq!(stats.total_folders, folders - 1);
        prop_assert_eq!(stats.total_bookmarks, bookmarks);
    }
}
