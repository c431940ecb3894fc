//! Bidirectional text: paragraph splitting and text-node segmentation.
//!
//! [UAX #9 Unicode Bidirectional Algorithm](https://www.unicode.org/reports/tr9/)
//!
//! The [`ParagraphSplitter`] runs the bidi algorithm once per block
//! container over the concatenated text of its inline content and records
//! the resulting direction-uniform runs. The builder then cuts each text node
//! at run boundaries with [`segment_text`], producing one [`TextRun`] per
//! direction change.
//!
//! All offsets and lengths are in `char`s.

use std::collections::HashMap;
use std::rc::Rc;

use quire_common::warning::warn_once;
use quire_css::{ComputedStyle, Direction, default_display_for_element};
use quire_dom::{DomTree, NodeId, NodeType};
use unicode_bidi::{BidiInfo, Level};

use crate::box_tree::{Styleable, TextRun};
use crate::context::{LayoutContext, StyleSource};

/// A maximal range of a paragraph with one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionalRun {
    /// First char of the run, relative to the paragraph.
    pub start: usize,
    /// Number of chars.
    pub length: usize,
    /// Resolved direction.
    pub direction: Direction,
}

impl DirectionalRun {
    /// One past the last char of the run.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Bidi analysis of one paragraph.
#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    runs: Vec<DirectionalRun>,
    offsets: HashMap<NodeId, usize>,
}

impl Paragraph {
    /// A paragraph with the given runs and no text nodes.
    #[must_use]
    pub fn new(runs: Vec<DirectionalRun>) -> Self {
        Self {
            runs,
            offsets: HashMap::new(),
        }
    }

    /// Record where a text node's text begins within the paragraph.
    pub fn add_text_node(&mut self, node: NodeId, first_char: usize) {
        let _ = self.offsets.insert(node, first_char);
    }

    /// Index of the first char of `node`'s text within the paragraph.
    #[must_use]
    pub fn first_char_index(&self, node: NodeId) -> Option<usize> {
        self.offsets.get(&node).copied()
    }

    /// The run containing the char at `index`.
    #[must_use]
    pub fn split_at(&self, index: usize) -> Option<&DirectionalRun> {
        self.runs
            .iter()
            .find(|run| run.start <= index && index < run.end())
    }

    /// All runs in logical order.
    #[must_use]
    pub fn runs(&self) -> &[DirectionalRun] {
        &self.runs
    }
}

/// Finds the bidi paragraph covering a text node.
pub trait ParagraphLookup {
    /// The paragraph `text_node` belongs to.
    fn lookup_paragraph(&self, text_node: NodeId) -> Option<&Paragraph>;
}

/// No bidi analysis: every text node becomes one left-to-right run.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBidi;

impl ParagraphLookup for NoBidi {
    fn lookup_paragraph(&self, _text_node: NodeId) -> Option<&Paragraph> {
        None
    }
}

/// Paragraphs produced by [`ParagraphSplitter::split`].
#[derive(Debug, Default)]
pub struct Paragraphs {
    paragraphs: Vec<Paragraph>,
    by_node: HashMap<NodeId, usize>,
}

impl Paragraphs {
    fn push(&mut self, paragraph: Paragraph) {
        let index = self.paragraphs.len();
        for node in paragraph.offsets.keys() {
            let _ = self.by_node.insert(*node, index);
        }
        self.paragraphs.push(paragraph);
    }
}

impl ParagraphLookup for Paragraphs {
    fn lookup_paragraph(&self, text_node: NodeId) -> Option<&Paragraph> {
        self.by_node
            .get(&text_node)
            .and_then(|index| self.paragraphs.get(*index))
    }
}

/// Shapes right-to-left text before it is stored in a leaf.
pub trait TextShaper {
    /// Shaped form of `text`.
    fn shape(&self, text: &str) -> String;
}

/// A shaper that returns text unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoShaping;

impl TextShaper for NoShaping {
    fn shape(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Splits a document into bidi paragraphs, one per block container.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParagraphSplitter {
    default_direction: Direction,
}

#[derive(Default)]
struct PendingParagraph {
    text: String,
    chars: usize,
    nodes: Vec<(NodeId, usize)>,
    direction: Direction,
}

impl ParagraphSplitter {
    /// A splitter using `default_direction` where no style says otherwise.
    #[must_use]
    pub const fn new(default_direction: Direction) -> Self {
        Self { default_direction }
    }

    /// Analyze every block container of `dom`.
    ///
    /// Inline elements continue their parent's paragraph; any other box
    /// (blocks, table parts, inline-blocks, out-of-flow boxes) starts a new
    /// one with its own `direction` as the base level.
    #[must_use]
    pub fn split(&self, dom: &DomTree, styles: &dyn StyleSource) -> Paragraphs {
        let mut paragraphs = Paragraphs::default();
        let Some(root) = dom.document_element() else {
            return paragraphs;
        };

        let direction = styles
            .style(root)
            .map_or(self.default_direction, |s| s.direction);
        let mut pending = PendingParagraph {
            direction,
            ..PendingParagraph::default()
        };
        self.visit_children(dom, styles, root, direction, &mut pending, &mut paragraphs);
        finish_paragraph(pending, &mut paragraphs);
        paragraphs
    }

    fn visit_children(
        &self,
        dom: &DomTree,
        styles: &dyn StyleSource,
        parent: NodeId,
        parent_direction: Direction,
        pending: &mut PendingParagraph,
        paragraphs: &mut Paragraphs,
    ) {
        for &child in dom.children(parent) {
            let Some(node) = dom.get(child) else {
                continue;
            };
            match &node.node_type {
                NodeType::Text(text) | NodeType::CData(text) => {
                    pending.nodes.push((child, pending.chars));
                    pending.text.push_str(text);
                    pending.chars += text.chars().count();
                }
                NodeType::Element(data) => {
                    let style = styles.style(child).unwrap_or_else(|| {
                        Rc::new(ComputedStyle {
                            display: default_display_for_element(&data.tag_name),
                            direction: parent_direction,
                            ..ComputedStyle::default()
                        })
                    });
                    if style.is_display_none() {
                        continue;
                    }

                    if style.is_inline() {
                        self.visit_children(
                            dom,
                            styles,
                            child,
                            style.direction,
                            pending,
                            paragraphs,
                        );
                        continue;
                    }

                    let outer = std::mem::replace(
                        pending,
                        PendingParagraph {
                            direction: style.direction,
                            ..PendingParagraph::default()
                        },
                    );
                    finish_paragraph(outer, paragraphs);
                    self.visit_children(dom, styles, child, style.direction, pending, paragraphs);
                    let inner = std::mem::replace(
                        pending,
                        PendingParagraph {
                            direction: parent_direction,
                            ..PendingParagraph::default()
                        },
                    );
                    finish_paragraph(inner, paragraphs);
                }
                NodeType::Document | NodeType::Comment(_) => {}
            }
        }
    }
}

fn finish_paragraph(pending: PendingParagraph, paragraphs: &mut Paragraphs) {
    if pending.chars == 0 {
        return;
    }

    let base = match pending.direction {
        Direction::Ltr => Level::ltr(),
        Direction::Rtl => Level::rtl(),
    };
    let info = BidiInfo::new(&pending.text, Some(base));

    // levels are indexed by byte; take the level of each char's first byte
    let mut runs: Vec<DirectionalRun> = Vec::new();
    for (index, (byte, _)) in pending.text.char_indices().enumerate() {
        let direction = if info.levels[byte].is_rtl() {
            Direction::Rtl
        } else {
            Direction::Ltr
        };
        match runs.last_mut() {
            Some(run) if run.direction == direction => run.length += 1,
            _ => runs.push(DirectionalRun {
                start: index,
                length: 1,
                direction,
            }),
        }
    }

    let mut paragraph = Paragraph::new(runs);
    for (node, offset) in pending.nodes {
        paragraph.add_text_node(node, offset);
    }
    paragraphs.push(paragraph);
}

/// Cut the text of `text_node` into direction-uniform leaves and append
/// them to `children`.
///
/// `previous` is the index in `children` of the last leaf appended for the
/// same inline parent; the returned index is the new last leaf. Each leaf
/// ends its element until a later leaf takes over.
pub(crate) fn segment_text(
    ctx: &LayoutContext<'_>,
    text_node: NodeId,
    parent: NodeId,
    parent_style: &Rc<ComputedStyle>,
    mut previous: Option<usize>,
    children: &mut Vec<Styleable>,
) -> Option<usize> {
    let text: Vec<char> = ctx.dom.as_text(text_node).unwrap_or_default().chars().collect();
    let paragraphs = ctx.paragraphs;
    let paragraph = paragraphs.lookup_paragraph(text_node);
    let start = paragraph.and_then(|p| p.first_char_index(text_node));

    let (Some(paragraph), Some(mut start), false) = (paragraph, start, text.is_empty()) else {
        let leaf = create_inline_leaf(ctx, &text.iter().collect::<String>(), parent, parent_style);
        return Some(setup_inline_child(children, leaf, previous));
    };

    let mut node_index = 0;
    loop {
        let Some(run) = paragraph.split_at(start) else {
            warn_once(
                "bidi",
                &format!("no directional run covers char {start} of text node {}", text_node.0),
            );
            let rest: String = text[node_index..].iter().collect();
            let mut leaf = create_inline_leaf(ctx, &rest, parent, parent_style);
            leaf.direction = ctx.options.default_direction;
            previous = Some(setup_inline_child(children, leaf, previous));
            break;
        };

        let length = (run.end() - start).min(text.len() - node_index);
        let mut fragment: String = text[node_index..node_index + length].iter().collect();
        if run.direction == Direction::Rtl {
            fragment = ctx.shaper.shape(&fragment);
        }

        let mut leaf = create_inline_leaf(ctx, &fragment, parent, parent_style);
        leaf.direction = run.direction;
        previous = Some(setup_inline_child(children, leaf, previous));

        start += length;
        node_index += length;
        if node_index >= text.len() {
            break;
        }
    }
    previous
}

/// A leaf for text directly inside `parent`.
///
/// Text in an in-flow inline element (other than the document element)
/// shares the element's style and identity; text in any other container
/// gets an anonymous inline style and no element.
pub(crate) fn create_inline_leaf(
    ctx: &LayoutContext<'_>,
    text: &str,
    parent: NodeId,
    parent_style: &Rc<ComputedStyle>,
) -> TextRun {
    if parent_style.is_inline() && !ctx.is_document_element(parent) {
        TextRun::new(text, Rc::clone(parent_style), Some(parent))
    } else {
        let style = Rc::new(ComputedStyle::anonymous(
            parent_style,
            quire_css::DisplayValue::Inline,
        ));
        TextRun::new(text, style, None)
    }
}

/// Append `leaf` as the new last leaf of its element: it ends the element,
/// starts it if nothing came before, and takes the end over from the
/// previous leaf otherwise.
pub(crate) fn setup_inline_child(
    children: &mut Vec<Styleable>,
    mut leaf: TextRun,
    previous: Option<usize>,
) -> usize {
    leaf.ends_here = true;
    match previous.and_then(|index| children.get_mut(index)) {
        Some(Styleable::Inline(prev)) => prev.ends_here = false,
        _ => leaf.starts_here = true,
    }
    children.push(Styleable::Inline(leaf));
    children.len() - 1
}
