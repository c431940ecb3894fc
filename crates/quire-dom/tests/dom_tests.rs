//! Tests for assembling and reading document trees.

use quire_dom::{DomTree, NodeId, NodeType};

/// Helper: create an element under `parent`.
fn push(tree: &mut DomTree, parent: NodeId, tag: &str) -> NodeId {
    let id = tree.create_element(tag, &[]);
    tree.append_child(parent, id);
    id
}

// ========== assembly ==========

#[test]
fn test_children_keep_document_order() {
    let mut tree = DomTree::new();
    let list = push(&mut tree, NodeId::ROOT, "ul");
    let items: Vec<_> = (0..3).map(|_| push(&mut tree, list, "li")).collect();

    assert_eq!(tree.children(list), items.as_slice());
    assert!(items.iter().all(|&li| tree.parent(li) == Some(list)));
    assert_eq!(tree.parent(NodeId::ROOT), None);
}

#[test]
fn test_created_nodes_start_detached() {
    let mut tree = DomTree::new();
    let loose = tree.create_text("loose");

    assert_eq!(tree.parent(loose), None);
    assert!(tree.children(NodeId::ROOT).is_empty());
    assert_eq!(tree.len(), 2);
    assert!(!tree.is_empty());
}

#[test]
fn test_append_with_unknown_id_is_ignored() {
    let mut tree = DomTree::new();
    tree.append_child(NodeId::ROOT, NodeId(42));

    assert!(tree.children(NodeId::ROOT).is_empty());
    assert!(tree.children(NodeId(42)).is_empty());
}

// ========== accessors ==========

#[test]
fn test_tag_name_is_lowercased_and_attrs_are_exact() {
    let mut tree = DomTree::new();
    let ol = tree.create_element("OL", &[("start", "5"), ("start", "7")]);

    assert_eq!(tree.tag_name(ol).as_deref(), Some("ol"));
    assert_eq!(tree.as_element(ol).unwrap().tag_name, "OL");
    assert_eq!(tree.attr(ol, "start"), Some("7"));
    assert_eq!(tree.attr(ol, "START"), None);
}

#[test]
fn test_cdata_reads_as_text_but_comments_do_not() {
    let mut tree = DomTree::new();
    let text = tree.create_text("plain");
    let cdata = tree.alloc(NodeType::CData("raw <b>".to_string()));
    let comment = tree.alloc(NodeType::Comment("hidden".to_string()));

    assert_eq!(tree.as_text(text), Some("plain"));
    assert_eq!(tree.as_text(cdata), Some("raw <b>"));
    assert_eq!(tree.as_text(comment), None);
    assert_eq!(tree.tag_name(text), None);
}

#[test]
fn test_document_element_skips_leading_comment() {
    let mut tree = DomTree::new();
    assert_eq!(tree.document_element(), None);

    let comment = tree.alloc(NodeType::Comment("generated".to_string()));
    tree.append_child(NodeId::ROOT, comment);
    let html = push(&mut tree, NodeId::ROOT, "html");

    assert_eq!(tree.document_element(), Some(html));
}
