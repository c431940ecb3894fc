//! Box tree types.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! "The following sections describe the types of boxes that may be generated
//! in CSS 2.1. A box's type affects, in part, its behavior in the visual
//! formatting model."
//!
//! Before a parent's child list is finalized it is a flat `Vec<Styleable>`
//! mixing inline leaves ([`TextRun`]) and block-like boxes ([`BlockBox`]).
//! Finalization moves that list into exactly one [`BoxContent`] mode.

use std::rc::Rc;

use quire_css::{ComputedStyle, Direction, DisplayValue, Float, FunctionValue, PseudoElement};
use quire_dom::NodeId;
use serde::{Serialize, Serializer};

use crate::functions::ContentFunction;
use crate::layers::LayerId;

/// Anything carrying a computed style.
pub trait Styled {
    /// The style the box or leaf is laid out with.
    fn style(&self) -> &Rc<ComputedStyle>;

    /// Back-reference to the originating element, if any.
    fn element(&self) -> Option<NodeId>;

    /// Synthesized rather than generated by an element.
    fn is_anonymous(&self) -> bool;
}

/// An item of a child list before finalization.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Styleable {
    /// An inline leaf.
    Inline(TextRun),
    /// A block-like box (block, table part, inline-block, replaced, ...).
    Box(BlockBox),
}

impl Styleable {
    /// Computed `display` of the item.
    #[must_use]
    pub fn display(&self) -> DisplayValue {
        self.style().display
    }

    /// Whether the item sits inside an inline formatting context.
    #[must_use]
    pub fn is_laid_out_in_inline_context(&self) -> bool {
        match self {
            Self::Inline(_) => true,
            Self::Box(b) => b.style.is_laid_out_in_inline_context(),
        }
    }

    /// The inline leaf, if this is one.
    #[must_use]
    pub const fn as_text_run(&self) -> Option<&TextRun> {
        match self {
            Self::Inline(run) => Some(run),
            Self::Box(_) => None,
        }
    }

    /// Mutable inline leaf, if this is one.
    pub const fn as_text_run_mut(&mut self) -> Option<&mut TextRun> {
        match self {
            Self::Inline(run) => Some(run),
            Self::Box(_) => None,
        }
    }

    /// The box, if this is one.
    #[must_use]
    pub const fn as_box(&self) -> Option<&BlockBox> {
        match self {
            Self::Inline(_) => None,
            Self::Box(b) => Some(b),
        }
    }
}

impl Styled for Styleable {
    fn style(&self) -> &Rc<ComputedStyle> {
        match self {
            Self::Inline(run) => &run.style,
            Self::Box(b) => &b.style,
        }
    }

    fn element(&self) -> Option<NodeId> {
        match self {
            Self::Inline(run) => run.element,
            Self::Box(b) => b.element,
        }
    }

    fn is_anonymous(&self) -> bool {
        match self {
            Self::Inline(run) => run.is_anonymous(),
            Self::Box(b) => b.anonymous,
        }
    }
}

impl From<TextRun> for Styleable {
    fn from(run: TextRun) -> Self {
        Self::Inline(run)
    }
}

impl From<BlockBox> for Styleable {
    fn from(b: BlockBox) -> Self {
        Self::Box(b)
    }
}

/// [§ 2.5 Text Runs](https://www.w3.org/TR/css-display-3/#text-nodes)
///
/// An inline leaf: one direction-uniform fragment of a text node, a piece of
/// generated content, or an empty boundary marker for an inline element.
#[derive(Debug, Clone, Serialize)]
pub struct TextRun {
    /// Text payload (already text-transformed; shaped if right-to-left).
    pub text: String,
    /// Style of the inline box this leaf belongs to.
    #[serde(skip)]
    pub style: Rc<ComputedStyle>,
    /// Writing direction of the fragment.
    pub direction: Direction,
    /// First fragment of its inline element.
    pub starts_here: bool,
    /// Last fragment of its inline element.
    pub ends_here: bool,
    /// Originating element; `None` for purely synthetic leaves.
    #[serde(serialize_with = "serialize_node")]
    pub element: Option<NodeId>,
    /// Pseudo-element that generated this leaf.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pseudo: Option<PseudoElement>,
    /// Out-of-flow footnote body anchored at this leaf.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footnote: Option<Box<BlockBox>>,
    /// Content function to re-evaluate during layout.
    #[serde(skip)]
    pub dynamic: Option<DynamicContent>,
}

impl TextRun {
    /// Create a left-to-right leaf. `text-transform` of `style` is applied.
    #[must_use]
    pub fn new(text: &str, style: Rc<ComputedStyle>, element: Option<NodeId>) -> Self {
        let text = style.text_transform.apply(text);
        Self {
            text,
            style,
            direction: Direction::Ltr,
            starts_here: false,
            ends_here: false,
            element,
            pseudo: None,
            footnote: None,
            dynamic: None,
        }
    }

    /// Switch to a different style and re-apply its `text-transform`.
    pub fn restyle(&mut self, style: Rc<ComputedStyle>) {
        self.text = style.text_transform.apply(&self.text);
        self.style = style;
    }

    /// Empty text that whitespace processing may drop.
    #[must_use]
    pub fn is_removable_whitespace(&self) -> bool {
        self.text.is_empty() && self.footnote.is_none() && self.dynamic.is_none()
    }
}

impl Styled for TextRun {
    fn style(&self) -> &Rc<ComputedStyle> {
        &self.style
    }

    fn element(&self) -> Option<NodeId> {
        self.element
    }

    fn is_anonymous(&self) -> bool {
        self.element.is_none()
    }
}

/// A content function whose value is only known during layout (page
/// numbers, leaders, cross references).
#[derive(Debug, Clone)]
pub struct DynamicContent {
    /// The function implementation.
    pub function: Rc<dyn ContentFunction>,
    /// The parsed call it was created from.
    pub value: FunctionValue,
}

/// Content mode of a finalized box.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(tag = "mode", content = "children", rename_all = "kebab-case")]
pub enum BoxContent {
    /// No children.
    #[default]
    Empty,
    /// A flat sequence of inline-level items.
    Inline(Vec<Styleable>),
    /// Block-level child boxes.
    Block(Vec<BlockBox>),
}

impl BoxContent {
    /// Child boxes of block content (empty otherwise).
    #[must_use]
    pub fn blocks(&self) -> &[BlockBox] {
        match self {
            Self::Block(children) => children,
            _ => &[],
        }
    }

    /// Items of inline content (empty otherwise).
    #[must_use]
    pub fn inlines(&self) -> &[Styleable] {
        match self {
            Self::Inline(items) => items,
            _ => &[],
        }
    }
}

/// Kind-specific data of a [`BlockBox`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BoxKind {
    /// Ordinary block container (also list items, captions, footnote bodies).
    Plain,
    /// [§ 17.2](https://www.w3.org/TR/CSS2/tables.html#table-display) table wrapper.
    Table {
        /// Columns registered by `table-column(-group)` elements.
        columns: Vec<TableColumn>,
    },
    /// Row group; at most one per table carries each flag.
    TableRowGroup {
        /// The table's header group.
        header: bool,
        /// The table's footer group.
        footer: bool,
    },
    /// A row of cells.
    TableRow,
    /// A table cell.
    TableCell,
    /// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    AnonymousBlock {
        /// Inline elements still open where the inline run was split.
        open_inline: Vec<OpenInline>,
    },
    /// Multi-column container whose only child is the flowing column block.
    ColumnContainer,
}

impl BoxKind {
    /// Kind for an empty table.
    #[must_use]
    pub const fn table() -> Self {
        Self::Table {
            columns: Vec::new(),
        }
    }

    /// Kind for a body row group.
    #[must_use]
    pub const fn row_group() -> Self {
        Self::TableRowGroup {
            header: false,
            footer: false,
        }
    }
}

/// A column registered on a table.
#[derive(Debug, Clone, Serialize)]
pub struct TableColumn {
    /// The `table-column` (or childless `table-column-group`) element.
    #[serde(serialize_with = "serialize_node_id")]
    pub element: NodeId,
    /// The column's style.
    #[serde(skip)]
    pub style: Rc<ComputedStyle>,
    /// Enclosing `table-column-group`, if any.
    #[serde(serialize_with = "serialize_node")]
    pub group: Option<NodeId>,
}

/// One inline ancestor left open across an anonymous block boundary.
#[derive(Debug, Clone, Serialize)]
pub struct OpenInline {
    /// The inline element.
    #[serde(serialize_with = "serialize_node")]
    pub element: Option<NodeId>,
    /// Its style.
    #[serde(skip)]
    pub style: Rc<ComputedStyle>,
    /// Pseudo-element, for generated inline content.
    pub pseudo: Option<PseudoElement>,
}

// Styles compare by identity.
impl PartialEq for TableColumn {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element
            && self.group == other.group
            && Rc::ptr_eq(&self.style, &other.style)
    }
}

impl PartialEq for OpenInline {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element
            && self.pseudo == other.pseudo
            && Rc::ptr_eq(&self.style, &other.style)
    }
}

/// Float metadata carried by a floated box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FloatedBoxData {
    /// Side the box floats to.
    pub side: Float,
}

/// A block-like box.
#[derive(Debug, Clone, Serialize)]
pub struct BlockBox {
    /// Kind-specific data.
    #[serde(flatten)]
    pub kind: BoxKind,
    /// Computed style.
    #[serde(rename = "display", serialize_with = "serialize_display")]
    pub style: Rc<ComputedStyle>,
    /// Originating element, or the element an anonymous box borrows.
    #[serde(serialize_with = "serialize_node")]
    pub element: Option<NodeId>,
    /// Synthesized box.
    pub anonymous: bool,
    /// Children.
    pub content: BoxContent,
    /// Pseudo-element that generated this box.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pseudo: Option<PseudoElement>,
    /// Present on floated boxes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floated: Option<FloatedBoxData>,
    /// Value of the `list-item` counter for list items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_counter: Option<i32>,
    /// `::first-line` style, for block containers that have one.
    #[serde(skip)]
    pub first_line_style: Option<Rc<ComputedStyle>>,
    /// `::first-letter` style, for block containers that have one.
    #[serde(skip)]
    pub first_letter_style: Option<Rc<ComputedStyle>>,
    /// Own stacking layer (footnote bodies).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<LayerId>,
    /// Anonymous block wrapping a table and its captions.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub from_captioned_table: bool,
    /// Root table of a page margin area.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub margin_area_root: bool,
    /// Fixed row height for margin-area rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_override: Option<i32>,
    /// Replaced element; children are never walked.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub replaced: bool,
}

impl BlockBox {
    /// Create a non-anonymous box with empty content.
    #[must_use]
    pub const fn new(kind: BoxKind, style: Rc<ComputedStyle>, element: Option<NodeId>) -> Self {
        Self {
            kind,
            style,
            element,
            anonymous: false,
            content: BoxContent::Empty,
            pseudo: None,
            floated: None,
            list_counter: None,
            first_line_style: None,
            first_letter_style: None,
            layer: None,
            from_captioned_table: false,
            margin_area_root: false,
            height_override: None,
            replaced: false,
        }
    }

    /// Create an anonymous box borrowing `element` for inheritance.
    #[must_use]
    pub const fn anonymous(
        kind: BoxKind,
        style: Rc<ComputedStyle>,
        element: Option<NodeId>,
    ) -> Self {
        let mut b = Self::new(kind, style, element);
        b.anonymous = true;
        b
    }

    /// `table` or `inline-table` box.
    #[must_use]
    pub const fn is_table(&self) -> bool {
        matches!(self.kind, BoxKind::Table { .. })
    }

    /// Child boxes of block content (empty otherwise).
    #[must_use]
    pub fn children(&self) -> &[BlockBox] {
        self.content.blocks()
    }

    /// Register a column on a table box. Ignored for other kinds.
    pub fn add_column(&mut self, column: TableColumn) {
        if let BoxKind::Table { columns } = &mut self.kind {
            columns.push(column);
        }
    }
}

impl Styled for BlockBox {
    fn style(&self) -> &Rc<ComputedStyle> {
        &self.style
    }

    fn element(&self) -> Option<NodeId> {
        self.element
    }

    fn is_anonymous(&self) -> bool {
        self.anonymous
    }
}

#[allow(clippy::ref_option)]
fn serialize_node<S: Serializer>(node: &Option<NodeId>, serializer: S) -> Result<S::Ok, S::Error> {
    node.map(|id| id.0).serialize(serializer)
}

fn serialize_node_id<S: Serializer>(node: &NodeId, serializer: S) -> Result<S::Ok, S::Error> {
    node.0.serialize(serializer)
}

fn serialize_display<S: Serializer>(
    style: &Rc<ComputedStyle>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    style.display.serialize(serializer)
}
