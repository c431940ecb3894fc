//! JSON document fixtures.
//!
//! A fixture is a nested element tree with already-resolved declarations:
//!
//! ```json
//! {
//!   "root": {
//!     "tag": "html",
//!     "children": [
//!       { "tag": "body", "children": [
//!         { "tag": "p", "style": { "direction": "rtl" },
//!           "pseudo": { "before": { "content": "\"§ \"" } },
//!           "children": [ { "text": "hello" } ] }
//!       ] }
//!     ]
//!   },
//!   "page": {
//!     "margin-boxes": { "top-center": { "content": "element(header)" } }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

/// `property -> value` declarations, applied in property-name order.
pub type Declarations = BTreeMap<String, String>;

/// A whole fixture file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DocumentFixture {
    /// The document element.
    pub root: NodeFixture,
    /// Page context for margin boxes.
    #[serde(default)]
    pub page: Option<PageFixture>,
}

/// One DOM node.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NodeFixture {
    /// An element with its style and children.
    Element(ElementFixture),
    /// A text node.
    Text {
        /// Character data.
        text: String,
    },
    /// A CDATA section.
    CData {
        /// Character data.
        cdata: String,
    },
    /// A comment, kept in the DOM but never boxed.
    Comment {
        /// Comment text.
        comment: String,
    },
}

/// An element node.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ElementFixture {
    /// Tag name.
    pub tag: String,
    /// Attributes.
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    /// Declarations on top of the user-agent defaults.
    #[serde(default)]
    pub style: Declarations,
    /// Pseudo-element declarations keyed by name (`before`,
    /// `footnote-call`, ...). Pseudo-elements inherit from the element.
    #[serde(default)]
    pub pseudo: BTreeMap<String, Declarations>,
    /// Child nodes in document order.
    #[serde(default)]
    pub children: Vec<NodeFixture>,
}

/// The `@page` context.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PageFixture {
    /// Declarations of the page box.
    #[serde(default)]
    pub style: Declarations,
    /// Margin box declarations keyed by name (`top-center`, ...).
    #[serde(default)]
    pub margin_boxes: BTreeMap<String, Declarations>,
    /// Height of the top and bottom margin rows.
    #[serde(default = "default_margin_height")]
    pub margin_height: i32,
    /// Height split across the rows of the left and right margin tables.
    #[serde(default = "default_side_height")]
    pub side_height: i32,
}

const fn default_margin_height() -> i32 {
    72
}

const fn default_side_height() -> i32 {
    648
}
