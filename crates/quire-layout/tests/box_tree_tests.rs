//! Integration tests for box-tree construction.

use std::rc::Rc;
use std::sync::{Mutex, MutexGuard, PoisonError};

use quire_css::{
    ComputedStyle, Direction, DisplayValue, Float, FunctionValue, MarginBoxName, PseudoElement,
    default_style,
};
use quire_dom::{DomTree, NodeId};
use quire_layout::{
    BlockBox, BoxContent, BoxKind, BuildOptions, ChildBoxInfo, ContentFunction,
    ContentFunctionRegistry, DirectionalRun, LayoutContext, MarginDirection, PageStyle,
    Paragraph, ParagraphLookup, ParagraphSplitter, StyleMap, StyleSource, Styleable,
    TableColumn, TextShaper, build_box_tree, build_margin_table, resolve_table_content,
};

/// A document plus the resolved styles of its elements.
struct Fixture {
    dom: DomTree,
    styles: StyleMap,
}

impl Fixture {
    /// `<html><body></body></html>`; returns the fixture and the body.
    fn new() -> (Self, NodeId) {
        let mut fixture = Self {
            dom: DomTree::new(),
            styles: StyleMap::new(),
        };
        let html = fixture.element(NodeId::ROOT, "html", &[]);
        let body = fixture.element(html, "body", &[]);
        (fixture, body)
    }

    fn element(&mut self, parent: NodeId, tag: &str, decls: &[(&str, &str)]) -> NodeId {
        self.element_with_attrs(parent, tag, &[], decls)
    }

    fn element_with_attrs(
        &mut self,
        parent: NodeId,
        tag: &str,
        attrs: &[(&str, &str)],
        decls: &[(&str, &str)],
    ) -> NodeId {
        let id = self.dom.create_element(tag, attrs);
        self.dom.append_child(parent, id);
        let parent_style = self.styles.style(parent);
        let mut style = default_style(tag, parent_style.as_ref());
        for (property, value) in decls {
            style.set_property(property, value).unwrap();
        }
        self.styles.insert(id, Rc::new(style));
        id
    }

    fn text(&mut self, parent: NodeId, text: &str) {
        let id = self.dom.create_text(text);
        self.dom.append_child(parent, id);
    }

    fn pseudo(&mut self, node: NodeId, pseudo: PseudoElement, decls: &[(&str, &str)]) {
        let parent = self.styles.style(node).unwrap();
        let mut style = ComputedStyle::inherit_from(&parent);
        for (property, value) in decls {
            style.set_property(property, value).unwrap();
        }
        self.styles.insert_pseudo(node, pseudo, Rc::new(style));
    }

    fn build(&mut self) -> BlockBox {
        self.build_with(BuildOptions::default())
    }

    fn build_with(&mut self, options: BuildOptions) -> BlockBox {
        let mut ctx = LayoutContext::new(&mut self.dom, &self.styles, options);
        build_box_tree(&mut ctx).unwrap()
    }
}

/// The body box of a built `<html>` tree.
fn body(root: &BlockBox) -> &BlockBox {
    &root.children()[0]
}

/// Helper: the first table box in `block`'s subtree, inline items included.
fn first_table(block: &BlockBox) -> Option<&BlockBox> {
    if block.is_table() {
        return Some(block);
    }
    block
        .children()
        .iter()
        .chain(block.content.inlines().iter().filter_map(Styleable::as_box))
        .find_map(first_table)
}

/// Helper: hold while draining the process-wide warning log.
fn warning_log() -> MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

fn texts(items: &[Styleable]) -> Vec<&str> {
    items
        .iter()
        .filter_map(Styleable::as_text_run)
        .map(|run| run.text.as_str())
        .collect()
}

// ========== Anonymous blocks ==========

#[test]
fn test_text_block_text_gets_anonymous_blocks() {
    let (mut f, body_id) = Fixture::new();
    let div = f.element(body_id, "div", &[]);
    f.text(div, "a");
    let p = f.element(div, "p", &[]);
    f.text(p, "inside");
    f.text(div, "b");

    let root = f.build();
    let div_box = &body(&root).children()[0];
    let children = div_box.children();
    assert_eq!(children.len(), 3);

    assert!(children[0].anonymous);
    assert_eq!(children[0].element, Some(div));
    assert_eq!(texts(children[0].content.inlines()), vec!["a"]);
    assert_eq!(children[1].element, Some(p));
    assert_eq!(texts(children[1].content.inlines()), vec!["inside"]);
    assert_eq!(texts(children[2].content.inlines()), vec!["b"]);
}

#[test]
fn test_split_inline_records_open_element() {
    let (mut f, body_id) = Fixture::new();
    let div = f.element(body_id, "div", &[]);
    let span = f.element(div, "span", &[]);
    f.text(span, "x");
    let _ = f.element(span, "p", &[]);
    f.text(span, "y");

    let root = f.build();
    let children = body(&root).children()[0].children();
    assert_eq!(children.len(), 3);

    let first = children[0].content.inlines()[0].as_text_run().unwrap();
    assert!(first.starts_here);
    assert!(!first.ends_here);
    assert_eq!(first.element, Some(span));

    let BoxKind::AnonymousBlock { open_inline } = &children[2].kind else {
        panic!("expected an anonymous block");
    };
    assert_eq!(open_inline.len(), 1);
    assert_eq!(open_inline[0].element, Some(span));
    let last = children[2].content.inlines()[0].as_text_run().unwrap();
    assert!(last.ends_here);
}

#[test]
fn test_whitespace_only_document_is_empty() {
    let (mut f, body_id) = Fixture::new();
    f.text(body_id, "  \n\t ");

    let root = f.build();
    assert!(matches!(body(&root).content, BoxContent::Empty));
}

#[test]
fn test_display_none_generates_nothing() {
    let (mut f, body_id) = Fixture::new();
    let hidden = f.element(body_id, "div", &[("display", "none")]);
    f.text(hidden, "hidden");
    f.text(body_id, "shown");

    let root = f.build();
    assert_eq!(texts(body(&root).content.inlines()), vec!["shown"]);
}

// ========== Tables ==========

#[test]
fn test_orphan_cells_get_anonymous_table() {
    let (mut f, body_id) = Fixture::new();
    let div = f.element(body_id, "div", &[]);
    let a = f.element(div, "div", &[("display", "table-cell")]);
    f.text(a, "A");
    let b = f.element(div, "div", &[("display", "table-cell")]);
    f.text(b, "B");

    let root = f.build();
    let div_box = &body(&root).children()[0];
    let table = &div_box.children()[0];
    assert!(table.is_table());
    assert!(table.anonymous);

    let group = &table.children()[0];
    assert!(matches!(group.kind, BoxKind::TableRowGroup { .. }));
    let row = &group.children()[0];
    assert_eq!(row.kind, BoxKind::TableRow);

    let cells = row.children();
    assert_eq!(cells.len(), 2);
    assert_eq!(cells[0].element, Some(a));
    assert_eq!(cells[1].element, Some(b));
    assert_eq!(texts(cells[1].content.inlines()), vec!["B"]);
}

#[test]
fn test_orphan_row_group_in_inline_gets_inline_table() {
    let (mut f, body_id) = Fixture::new();
    let div = f.element(body_id, "div", &[]);
    let span = f.element(div, "span", &[]);
    let group = f.element(span, "div", &[("display", "table-row-group")]);
    let tr = f.element(group, "tr", &[]);
    let td = f.element(tr, "td", &[]);
    f.text(td, "cell");

    let block = f.element(body_id, "div", &[]);
    let _ = f.element(block, "div", &[("display", "table-row-group")]);

    let root = f.build();
    let wrapper = first_table(&body(&root).children()[0]).unwrap();
    assert!(wrapper.anonymous);
    assert_eq!(wrapper.style.display, DisplayValue::InlineTable);
    assert_eq!(wrapper.children()[0].element, Some(group));

    // outside an inline the wrapper is a block-level table
    let table = first_table(&body(&root).children()[1]).unwrap();
    assert!(table.anonymous);
    assert_eq!(table.style.display, DisplayValue::Table);
}

#[test]
fn test_table_groups_ordered_header_body_footer() {
    let (mut f, body_id) = Fixture::new();
    let table = f.element(body_id, "table", &[]);
    let mut groups = Vec::new();
    for tag in ["tfoot", "tbody", "thead"] {
        let group = f.element(table, tag, &[]);
        let tr = f.element(group, "tr", &[]);
        let td = f.element(tr, "td", &[]);
        f.text(td, tag);
        groups.push(group);
    }

    let root = f.build();
    let table_box = &body(&root).children()[0];
    let order: Vec<_> = table_box.children().iter().map(|b| b.element).collect();
    assert_eq!(order, vec![Some(groups[2]), Some(groups[1]), Some(groups[0])]);
    assert_eq!(
        table_box.children()[0].kind,
        BoxKind::TableRowGroup {
            header: true,
            footer: false
        }
    );
    assert_eq!(
        table_box.children()[2].kind,
        BoxKind::TableRowGroup {
            header: false,
            footer: true
        }
    );
}

#[test]
fn test_floated_captioned_table_moves_float_to_wrapper() {
    let (mut f, body_id) = Fixture::new();
    let table = f.element(body_id, "table", &[("float", "left")]);
    let caption = f.element(table, "caption", &[]);
    f.text(caption, "C");
    let tr = f.element(table, "tr", &[]);
    let td = f.element(tr, "td", &[]);
    f.text(td, "x");

    let root = f.build();
    let items = body(&root).content.inlines();
    let wrapper = items[0].as_box().unwrap();
    assert!(wrapper.from_captioned_table);
    assert_eq!(wrapper.style.float, Float::Left);
    assert_eq!(wrapper.style.display, DisplayValue::Block);
    assert!(wrapper.floated.is_some());

    let children = wrapper.children();
    assert_eq!(children[0].element, Some(caption));
    let table_box = &children[1];
    assert!(table_box.is_table());
    assert_eq!(table_box.style.float, Float::None);
    assert!(table_box.floated.is_none());

    // the bare row got an anonymous row group
    let group = &table_box.children()[0];
    assert!(group.anonymous);
    assert_eq!(group.children()[0].element, Some(tr));
}

#[test]
fn test_text_in_row_gets_anonymous_cell() {
    let (mut f, body_id) = Fixture::new();
    let table = f.element(body_id, "table", &[]);
    let tbody = f.element(table, "tbody", &[]);
    let tr = f.element(tbody, "tr", &[]);
    f.text(tr, "loose");

    let root = f.build();
    let row = &body(&root).children()[0].children()[0].children()[0];
    let cell = &row.children()[0];
    assert_eq!(cell.kind, BoxKind::TableCell);
    assert!(cell.anonymous);
    assert_eq!(cell.element, Some(tr));
    assert_eq!(texts(cell.content.inlines()), vec!["loose"]);
}

#[test]
fn test_normalization_is_idempotent() {
    let (mut f, body_id) = Fixture::new();
    let table = f.element(body_id, "table", &[]);
    let tr = f.element(table, "tr", &[]);
    f.text(tr, "a");
    let td = f.element(tr, "td", &[]);
    f.text(td, "b");

    let root = f.build();
    let table_box = body(&root).children()[0].clone();
    let shape = |b: &BlockBox| -> Vec<(BoxKind, usize)> {
        b.children()
            .iter()
            .map(|group| (group.kind.clone(), group.children()[0].children().len()))
            .collect()
    };
    let before = shape(&table_box);

    let mut again = table_box.clone();
    let children: Vec<Styleable> = table_box
        .children()
        .iter()
        .cloned()
        .map(Styleable::Box)
        .collect();
    let mut info = ChildBoxInfo {
        contains_block_level_content: true,
        ..ChildBoxInfo::new()
    };
    resolve_table_content(&mut again, children, &mut info);
    assert_eq!(shape(&again), before);
    assert_eq!(before[0].1, 2);
}

#[test]
fn test_columns_registered_on_table() {
    let (mut f, body_id) = Fixture::new();
    let table = f.element(body_id, "table", &[]);
    let colgroup = f.element(table, "colgroup", &[]);
    let col_a = f.element(colgroup, "col", &[]);
    let col_b = f.element(colgroup, "col", &[]);
    let solo = f.element(table, "col", &[]);
    let tr = f.element(table, "tr", &[]);
    let _ = f.element(tr, "td", &[]);

    let root = f.build();
    let BoxKind::Table { columns } = &body(&root).children()[0].kind else {
        panic!("expected a table");
    };
    let ids: Vec<_> = columns.iter().map(|c| (c.element, c.group)).collect();
    assert_eq!(
        ids,
        vec![(col_a, Some(colgroup)), (col_b, Some(colgroup)), (solo, None)]
    );
}

#[test]
fn test_column_equality_compares_style_identity() {
    let (mut f, body_id) = Fixture::new();
    let table = f.element(body_id, "table", &[]);
    let _ = f.element(table, "col", &[]);
    let tr = f.element(table, "tr", &[]);
    let _ = f.element(tr, "td", &[]);

    let root = f.build();
    let kind = body(&root).children()[0].kind.clone();
    assert_eq!(kind, body(&root).children()[0].kind);

    let BoxKind::Table { columns } = kind else {
        panic!("expected a table");
    };
    let restyled = TableColumn {
        style: Rc::new((*columns[0].style).clone()),
        ..columns[0].clone()
    };
    assert_eq!(columns[0], columns[0].clone());
    assert_ne!(columns[0], restyled);
}

// ========== Generated content ==========

#[test]
fn test_list_item_counters_and_before_content() {
    let (mut f, body_id) = Fixture::new();
    let ol = f.element_with_attrs(body_id, "ol", &[("start", "5")], &[]);
    let mut items = Vec::new();
    for label in ["a", "b", "c"] {
        let li = f.element(ol, "li", &[]);
        f.pseudo(li, PseudoElement::Before, &[("content", r#"counter(list-item) ". ""#)]);
        f.text(li, label);
        items.push(li);
    }

    let root = f.build();
    let lis = body(&root).children()[0].children();
    let counters: Vec<_> = lis.iter().map(|li| li.list_counter).collect();
    assert_eq!(counters, vec![Some(5), Some(6), Some(7)]);

    let leaves = lis[1].content.inlines();
    assert_eq!(texts(leaves), vec!["6", ". ", "b"]);
    let marker = leaves[0].as_text_run().unwrap();
    assert_eq!(marker.pseudo, Some(PseudoElement::Before));
    assert_eq!(marker.element, Some(items[1]));
}

#[test]
fn test_list_start_at_i32_min_does_not_overflow() {
    let (mut f, body_id) = Fixture::new();
    let ol = f.element_with_attrs(body_id, "ol", &[("start", "-2147483648")], &[]);
    for label in ["x", "y"] {
        let li = f.element(ol, "li", &[]);
        f.text(li, label);
    }

    let root = f.build();
    let counters: Vec<_> = body(&root).children()[0]
        .children()
        .iter()
        .map(|li| li.list_counter)
        .collect();
    assert_eq!(counters, vec![Some(i32::MIN), Some(i32::MIN + 1)]);
}

#[test]
fn test_nested_counters_join_with_separator() {
    let (mut f, body_id) = Fixture::new();
    let outer = f.element(body_id, "div", &[("counter-reset", "section")]);
    let h = f.element(outer, "h2", &[("counter-increment", "section")]);
    let inner = f.element(outer, "div", &[("counter-reset", "section")]);
    let h_inner = f.element(inner, "h3", &[("counter-increment", "section 2")]);
    f.pseudo(
        h_inner,
        PseudoElement::Before,
        &[("content", r#"counters(section, ".", upper-roman)"#)],
    );
    f.pseudo(h, PseudoElement::Before, &[("content", "counter(section)")]);

    let root = f.build();
    let outer_box = &body(&root).children()[0];
    assert_eq!(texts(outer_box.children()[0].content.inlines()), vec!["1"]);
    let inner_box = &outer_box.children()[1];
    assert_eq!(texts(inner_box.children()[0].content.inlines()), vec!["I.II"]);
}

#[test]
fn test_attr_and_quotes_in_after_content() {
    let (mut f, body_id) = Fixture::new();
    let p = f.element(body_id, "p", &[]);
    let a = f.element_with_attrs(p, "a", &[("href", "x.html")], &[]);
    f.text(a, "link");
    f.pseudo(
        a,
        PseudoElement::After,
        &[("content", r#"" " open-quote attr(href) close-quote attr(missing)"#)],
    );

    let root = f.build();
    let leaves = body(&root).children()[0].content.inlines();
    assert_eq!(
        texts(leaves),
        vec!["link", " ", "\u{201c}", "x.html", "\u{201d}", ""]
    );
    assert!(leaves.iter().all(|leaf| leaf.as_text_run().unwrap().element == Some(a)));
}

#[test]
fn test_block_pseudo_element_wraps_leaves() {
    let (mut f, body_id) = Fixture::new();
    let div = f.element(body_id, "div", &[]);
    f.pseudo(
        div,
        PseudoElement::Before,
        &[("display", "block"), ("content", r#""Note:""#)],
    );
    f.text(div, "body text");

    let root = f.build();
    let children = body(&root).children()[0].children();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].pseudo, Some(PseudoElement::Before));
    assert_eq!(children[0].element, Some(div));
    let leaf = children[0].content.inlines()[0].as_text_run().unwrap();
    assert_eq!(leaf.text, "Note:");
    assert_eq!(leaf.element, None);
    assert!(children[1].anonymous);
}

#[test]
fn test_url_content_creates_replaced_image() {
    let (mut f, body_id) = Fixture::new();
    let div = f.element(body_id, "div", &[]);
    f.pseudo(div, PseudoElement::Before, &[("content", "url(logo.png)")]);
    f.text(div, "after the logo");

    let root = f.build();
    let div_box = &body(&root).children()[0];
    let wrapper = div_box.content.inlines()[0].as_box().unwrap();
    assert_eq!(wrapper.style.display, DisplayValue::InlineBlock);
    let image = wrapper.content.inlines()[0].as_box().unwrap();
    assert!(image.replaced);

    let img = image.element.unwrap();
    assert_eq!(f.dom.attr(img, "src"), Some("logo.png"));
    assert_eq!(f.dom.parent(img), Some(div));
}

#[test]
fn test_unknown_content_function_warns_and_is_skipped() {
    let _log = warning_log();
    quire_common::warning::set_quiet(true);
    let (mut f, body_id) = Fixture::new();
    let p = f.element(body_id, "p", &[]);
    f.pseudo(p, PseudoElement::Before, &[("content", r#"string(chapter) "!""#)]);

    let root = f.build();
    assert_eq!(texts(body(&root).children()[0].content.inlines()), vec!["!"]);
    let warnings = quire_common::warning::take_warnings();
    assert!(
        warnings
            .iter()
            .any(|w| w.component == "content" && w.message.contains("string()"))
    );
}

/// Resolves `string(x)` to `[x]` at build time.
#[derive(Debug)]
struct BracketString;

impl ContentFunction for BracketString {
    fn is_static(&self) -> bool {
        true
    }

    fn calculate(&self, function: &FunctionValue) -> Option<String> {
        function.ident_arg(0).map(|name| format!("[{name}]"))
    }

    fn layout_replacement_text(&self) -> String {
        String::new()
    }

    fn can_handle(&self, function: &FunctionValue) -> bool {
        function.name == "string"
    }
}

#[test]
fn test_registered_static_function_yields_text() {
    let (mut f, body_id) = Fixture::new();
    let p = f.element(body_id, "p", &[]);
    f.pseudo(p, PseudoElement::Before, &[("content", "string(chapter)")]);

    let mut functions = ContentFunctionRegistry::with_builtins();
    functions.register(Rc::new(BracketString));
    let mut ctx = LayoutContext::new(&mut f.dom, &f.styles, BuildOptions::default())
        .with_functions(functions);
    let root = build_box_tree(&mut ctx).unwrap();

    let leaf = body(&root).children()[0].content.inlines()[0]
        .as_text_run()
        .unwrap();
    assert_eq!(leaf.text, "[chapter]");
    assert!(leaf.dynamic.is_none());
}

#[test]
fn test_page_counter_is_dynamic_placeholder() {
    let (mut f, body_id) = Fixture::new();
    let p = f.element(body_id, "p", &[]);
    f.pseudo(p, PseudoElement::After, &[("content", "counter(page)")]);

    let root = f.build();
    let leaf = body(&root).children()[0].content.inlines()[0]
        .as_text_run()
        .unwrap()
        .clone();
    assert_eq!(leaf.text, "999");
    assert!(leaf.dynamic.is_some());
}

// ========== Footnotes ==========

#[test]
fn test_footnote_body_hangs_off_marker_leaf() {
    let (mut f, body_id) = Fixture::new();
    let p = f.element(body_id, "p", &[]);
    f.text(p, "text");
    let note = f.element(
        p,
        "span",
        &[("float", "footnote"), ("counter-increment", "footnote")],
    );
    f.text(note, "note");
    f.pseudo(note, PseudoElement::FootnoteCall, &[("content", "counter(footnote)")]);

    let root = f.build();
    let leaves = body(&root).children()[0].content.inlines();
    assert_eq!(texts(leaves), vec!["text", "", "1"]);

    let marker = leaves[1].as_text_run().unwrap();
    let footnote = marker.footnote.as_ref().unwrap();
    assert!(footnote.layer.is_some());
    assert_eq!(footnote.element, Some(note));
    assert_eq!(texts(footnote.content.inlines()), vec!["note"]);
    assert_eq!(
        leaves[2].as_text_run().unwrap().pseudo,
        Some(PseudoElement::FootnoteCall)
    );
}

// ========== Bidi ==========

#[derive(Debug)]
struct Reverse;

impl TextShaper for Reverse {
    fn shape(&self, text: &str) -> String {
        text.chars().rev().collect()
    }
}

#[test]
fn test_mixed_direction_text_is_split() {
    let (mut f, body_id) = Fixture::new();
    let p = f.element(body_id, "p", &[]);
    f.text(p, "abc \u{5d0}\u{5d1}\u{5d2} def");

    let paragraphs = ParagraphSplitter::new(Direction::Ltr).split(&f.dom, &f.styles);
    let mut ctx = LayoutContext::new(&mut f.dom, &f.styles, BuildOptions::default())
        .with_paragraphs(&paragraphs)
        .with_shaper(&Reverse);
    let root = build_box_tree(&mut ctx).unwrap();

    let leaves = body(&root).children()[0].content.inlines();
    assert_eq!(texts(leaves), vec!["abc ", "\u{5d2}\u{5d1}\u{5d0}", " def"]);
    let runs: Vec<_> = leaves.iter().filter_map(Styleable::as_text_run).collect();
    assert_eq!(
        runs.iter().map(|r| r.direction).collect::<Vec<_>>(),
        vec![Direction::Ltr, Direction::Rtl, Direction::Ltr]
    );
    assert!(runs[0].starts_here && !runs[0].ends_here);
    assert!(!runs[1].starts_here && !runs[1].ends_here);
    assert!(runs[2].ends_here);
}

#[test]
fn test_text_without_paragraph_is_single_ltr_run() {
    let (mut f, body_id) = Fixture::new();
    let p = f.element(body_id, "p", &[]);
    f.text(p, "\u{5d0}\u{5d1}");

    let root = f.build();
    let leaves = body(&root).children()[0].content.inlines();
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0].as_text_run().unwrap().direction, Direction::Ltr);
}

/// Every text node maps to the same hand-built paragraph.
struct OneParagraph(Paragraph);

impl ParagraphLookup for OneParagraph {
    fn lookup_paragraph(&self, _text_node: NodeId) -> Option<&Paragraph> {
        Some(&self.0)
    }
}

#[test]
fn test_missing_run_falls_back_to_default_direction() {
    let _log = warning_log();
    quire_common::warning::set_quiet(true);
    let (mut f, body_id) = Fixture::new();
    let p = f.element(body_id, "p", &[]);
    let text = f.dom.create_text("abcdef");
    f.dom.append_child(p, text);

    // runs stop after the second char
    let mut paragraph = Paragraph::new(vec![DirectionalRun {
        start: 0,
        length: 2,
        direction: Direction::Ltr,
    }]);
    paragraph.add_text_node(text, 0);
    let lookup = OneParagraph(paragraph);

    let options = BuildOptions {
        default_direction: Direction::Rtl,
        ..BuildOptions::default()
    };
    let mut ctx = LayoutContext::new(&mut f.dom, &f.styles, options).with_paragraphs(&lookup);
    let root = build_box_tree(&mut ctx).unwrap();

    let leaves = body(&root).children()[0].content.inlines();
    let runs: Vec<_> = leaves.iter().filter_map(Styleable::as_text_run).collect();
    let shape: Vec<_> = runs.iter().map(|r| (r.text.as_str(), r.direction)).collect();
    assert_eq!(shape, vec![("ab", Direction::Ltr), ("cdef", Direction::Rtl)]);
    assert!(runs[0].starts_here && !runs[0].ends_here);
    assert!(!runs[1].starts_here && runs[1].ends_here);

    let bidi: Vec<_> = quire_common::warning::take_warnings()
        .into_iter()
        .filter(|w| w.component == "bidi")
        .collect();
    assert_eq!(bidi.len(), 1);
    assert!(bidi[0].message.contains("char 2"));
}

// ========== Replaced elements and columns ==========

#[test]
fn test_inline_replaced_element_is_atomic() {
    let (mut f, body_id) = Fixture::new();
    let p = f.element(body_id, "p", &[]);
    f.text(p, "a ");
    let img = f.element_with_attrs(p, "img", &[("src", "x.png")], &[]);
    f.text(img, "never walked");
    f.text(p, " b");

    let root = f.build();
    let items = body(&root).children()[0].content.inlines();
    assert_eq!(items.len(), 3);
    let image = items[1].as_box().unwrap();
    assert!(image.replaced);
    assert_eq!(image.style.display, DisplayValue::InlineBlock);
    assert!(matches!(image.content, BoxContent::Empty));
}

#[test]
fn test_multicolumn_container_only_when_paged() {
    let (mut f, body_id) = Fixture::new();
    let div = f.element(body_id, "div", &[("column-count", "2")]);
    f.text(div, "flowing");

    let paged = f.build();
    let container = &body(&paged).children()[0];
    assert_eq!(container.kind, BoxKind::ColumnContainer);
    let column = &container.children()[0];
    assert_eq!(column.element, Some(div));
    assert_eq!(texts(column.content.inlines()), vec!["flowing"]);

    let screen = f.build_with(BuildOptions {
        paged: false,
        ..BuildOptions::default()
    });
    assert_eq!(body(&screen).children()[0].kind, BoxKind::Plain);
}

// ========== Running elements and page margins ==========

fn margin_style(content: &str) -> Rc<ComputedStyle> {
    let mut style = ComputedStyle::default();
    style.set_property("content", content).unwrap();
    Rc::new(style)
}

#[test]
fn test_running_element_placed_in_margin_table() {
    let (mut f, body_id) = Fixture::new();
    let header = f.element(body_id, "div", &[("position", "running(header)")]);
    f.text(header, "Title");

    let mut page = PageStyle::new(Rc::new(ComputedStyle::default()));
    page.set_margin_box(MarginBoxName::TopCenter, margin_style("element(header)"));

    let mut ctx = LayoutContext::new(&mut f.dom, &f.styles, BuildOptions::default());
    let _ = build_box_tree(&mut ctx).unwrap();
    let table = build_margin_table(
        &mut ctx,
        &page,
        &[MarginBoxName::TopLeft, MarginBoxName::TopCenter, MarginBoxName::TopRight],
        50,
        MarginDirection::Horizontal,
    )
    .unwrap();

    assert!(table.margin_area_root);
    let row = &table.children()[0].children()[0];
    assert_eq!(row.height_override, Some(50));
    let cells = row.children();
    assert_eq!(cells.len(), 3);
    assert!(matches!(cells[0].content, BoxContent::Empty));

    let copy = &cells[1].children()[0];
    assert_eq!(copy.element, Some(header));
    assert_eq!(texts(copy.content.inlines()), vec!["Title"]);
}

#[test]
fn test_vertical_margin_table_splits_height() {
    let (mut f, _body_id) = Fixture::new();
    let mut page = PageStyle::new(Rc::new(ComputedStyle::default()));
    page.set_margin_box(MarginBoxName::LeftTop, margin_style(r#""top""#));
    page.set_margin_box(MarginBoxName::LeftBottom, margin_style(r#""bottom""#));

    let mut ctx = LayoutContext::new(&mut f.dom, &f.styles, BuildOptions::default());
    let table = build_margin_table(
        &mut ctx,
        &page,
        &[MarginBoxName::LeftTop, MarginBoxName::LeftMiddle, MarginBoxName::LeftBottom],
        101,
        MarginDirection::Vertical,
    )
    .unwrap();

    let rows = table.children()[0].children();
    let heights: Vec<_> = rows.iter().map(|r| r.height_override).collect();
    assert_eq!(heights, vec![Some(51), Some(50)]);
    let first_cell = &rows[0].children()[0];
    assert_eq!(texts(first_cell.children()[0].content.inlines()), vec!["top"]);
}

#[test]
fn test_margin_table_absent_without_rules() {
    let (mut f, _body_id) = Fixture::new();
    let page = PageStyle::new(Rc::new(ComputedStyle::default()));
    let mut ctx = LayoutContext::new(&mut f.dom, &f.styles, BuildOptions::default());
    assert!(
        build_margin_table(
            &mut ctx,
            &page,
            &[MarginBoxName::BottomCenter],
            20,
            MarginDirection::Horizontal
        )
        .is_none()
    );
}

// ========== Serialization ==========

#[test]
fn test_box_tree_serializes_to_json() {
    let (mut f, body_id) = Fixture::new();
    let div = f.element(body_id, "div", &[("display", "table-cell")]);
    f.text(div, "cell");

    let root = f.build();
    let json = serde_json::to_value(&root).unwrap();
    let body_json = &json["content"]["children"][0];
    assert_eq!(body_json["display"], "block");
    let table = &body_json["content"]["children"][0];
    assert_eq!(table["kind"], "table");
    assert_eq!(table["anonymous"], true);
}
