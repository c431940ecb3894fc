//! Box-tree construction for the Quire paged-media renderer.
//!
//! # Scope
//!
//! This crate turns a styled document into the box tree that layout
//! consumes:
//! - **Tree walking** ([CSS 2.1 § 9.2](https://www.w3.org/TR/CSS2/visuren.html#box-gen)):
//!   inline elements flattened into leaves, everything else into boxes
//! - **Anonymous block boxes** ([§ 9.2.1.1](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level))
//! - **Table fixup** ([§ 17.2.1](https://www.w3.org/TR/CSS2/tables.html#anonymous-boxes)),
//!   including caption wrappers and header/footer ordering
//! - **Generated content** ([§ 12](https://www.w3.org/TR/CSS2/generate.html)):
//!   `::before`, `::after`, counters, quotes, `attr()`, images
//! - **Bidi segmentation** ([UAX #9](https://www.unicode.org/reports/tr9/))
//!   of text into direction-uniform leaves
//! - **Paged media extras** ([CSS GCPM](https://www.w3.org/TR/css-gcpm-3/)):
//!   footnotes, running elements, page-margin tables, multi-column containers
//!
//! # Not Implemented
//!
//! - Layout itself: sizes, line breaking, pagination
//! - Style resolution: styles come from a [`StyleSource`]

/// Anonymous block wrappers and child-list finalization.
pub mod anonymous;
/// Bidi paragraph analysis and text segmentation.
pub mod bidi;
/// Box tree types.
pub mod box_tree;
/// The document walker.
pub mod builder;
/// Build context, style sources, and options.
pub mod context;
/// Counter scopes.
pub mod counters;
/// Content function handlers.
pub mod functions;
/// Generated content resolution.
pub mod generated;
/// Stacking layers.
pub mod layers;
/// Page-margin tables.
pub mod margin;
/// Running element registry.
pub mod running;
/// Table model normalization.
pub mod table;
/// Whitespace collapsing.
pub mod whitespace;

pub use anonymous::{insert_anonymous_blocks, resolve_children};
pub use bidi::{
    DirectionalRun, NoBidi, NoShaping, Paragraph, ParagraphLookup, ParagraphSplitter, Paragraphs,
    TextShaper,
};
pub use box_tree::{
    BlockBox, BoxContent, BoxKind, DynamicContent, FloatedBoxData, OpenInline, Styleable, Styled,
    TableColumn, TextRun,
};
pub use builder::{build_box_tree, create_root_box, ensure_children};
pub use context::{BuildOptions, ChildBoxInfo, LayoutContext, StyleMap, StyleSource};
pub use counters::CounterContext;
pub use functions::{ContentFunction, ContentFunctionRegistry};
pub use generated::{ContentMode, resolve_content};
pub use layers::{LayerId, LayerStack};
pub use margin::{MarginDirection, PageStyle, build_margin_box, build_margin_table};
pub use running::{RunningPosition, RunningRegistry};
pub use table::{reorder_table_content, resolve_child_table_content, resolve_table_content};
pub use whitespace::{strip_all_whitespace, strip_inline_content};
