//! Document loading and the box-tree pipeline for Quire.
//!
//! # Scope
//!
//! This crate provides:
//! - **Document Loading** - read a JSON fixture holding the DOM and the
//!   resolved declarations of every element and pseudo-element
//! - **Style Resolution** - user-agent defaults, inheritance from the parent
//!   element, fixture declarations on top
//! - **Box Tree** - the document's box tree plus the page-margin tables
//!
//! # Not Implemented
//!
//! - HTML parsing and the CSS cascade: fixtures carry resolved values
//! - Layout, pagination, and painting

/// Fixture file format.
pub mod fixture;
/// Page margin areas.
pub mod page;

pub use quire_css as css;
pub use quire_dom as dom;
pub use quire_layout as layout;

use std::fs;
use std::rc::Rc;

use quire_common::warning::{clear_warnings, take_warnings};
use quire_css::{ComputedStyle, MarginBoxName, PseudoElement, StyleError, default_style};
use quire_dom::{DomTree, NodeId, NodeType};
use quire_layout::{
    BlockBox, BuildOptions, LayoutContext, MarginDirection, NoBidi, PageStyle, ParagraphLookup,
    ParagraphSplitter, StyleMap, build_box_tree, build_margin_table,
};
use serde::Serialize;
use strum::IntoEnumIterator;
use thiserror::Error;

pub use fixture::{Declarations, DocumentFixture, ElementFixture, NodeFixture, PageFixture};
pub use page::MarginArea;

/// Error type for document loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read the fixture file.
    #[error("failed to read '{path}'")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The fixture is not valid JSON or does not have the fixture shape.
    #[error("invalid fixture: {0}")]
    Json(#[from] serde_json::Error),
    /// The fixture's root node is text or a comment.
    #[error("the document root must be an element")]
    RootNotElement,
    /// A declaration does not apply to the style model.
    #[error("invalid style on {target}")]
    Style {
        /// Element, pseudo-element, or page rule carrying the declaration.
        target: String,
        /// Why the declaration was rejected.
        #[source]
        source: StyleError,
    },
    /// A pseudo-element key that names no pseudo-element.
    #[error("unknown pseudo-element '::{0}'")]
    UnknownPseudoElement(String),
    /// A margin box key that names no margin box.
    #[error("unknown margin box '@{0}'")]
    UnknownMarginBox(String),
}

/// A loaded document: DOM plus resolved styles.
pub struct LoadedDocument {
    /// Source path, empty for fixtures parsed from a string.
    pub source_path: String,
    /// Parsed DOM tree.
    pub dom: DomTree,
    /// Element and pseudo-element styles.
    pub styles: StyleMap,
    /// Page context, if the fixture has one.
    pub page: Option<PageSetup>,
}

/// The page context and the sizes its margin tables are built with.
#[derive(Debug, Clone)]
pub struct PageSetup {
    /// Page and margin box styles.
    pub style: PageStyle,
    /// Height of the top and bottom rows.
    pub margin_height: i32,
    /// Height of the left and right columns.
    pub side_height: i32,
}

/// How to build a loaded document.
#[derive(Debug, Clone)]
pub struct BuildSettings {
    /// Builder options.
    pub options: BuildOptions,
    /// Run the bidi algorithm; without it all text is left-to-right.
    pub bidi: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            options: BuildOptions::default(),
            bidi: true,
        }
    }
}

/// The result of [`LoadedDocument::build`].
#[derive(Debug, Serialize)]
pub struct BoxTree {
    /// The DOM the boxes were built against: the document's tree plus any
    /// elements generated content added during this build.
    #[serde(skip)]
    pub dom: DomTree,
    /// Box of the document element.
    pub root: Option<BlockBox>,
    /// Margin tables of the page areas that have margin boxes.
    pub margins: Vec<MarginTable>,
    /// Warnings raised during the build.
    pub warnings: Vec<String>,
}

/// The anonymous table of one page margin area.
#[derive(Debug, Serialize)]
pub struct MarginTable {
    /// Which area.
    pub area: MarginArea,
    /// The table box.
    pub table: BlockBox,
}

/// Load a fixture from a file path.
///
/// # Errors
///
/// Returns a [`LoadError`] if the file cannot be read or is not a valid
/// fixture.
pub fn load_document(path: &str) -> Result<LoadedDocument, LoadError> {
    let source = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_string(),
        source,
    })?;
    let mut doc = parse_fixture(&source)?;
    doc.source_path = path.to_string();
    Ok(doc)
}

/// Parse a fixture from its JSON text.
///
/// # Errors
///
/// Returns a [`LoadError`] if the JSON is malformed or a style does not
/// apply.
pub fn parse_fixture(json: &str) -> Result<LoadedDocument, LoadError> {
    let fixture: DocumentFixture = serde_json::from_str(json)?;
    from_fixture(&fixture)
}

/// Build the DOM and styles described by `fixture`.
///
/// Each element starts from the user-agent default style for its tag,
/// inheriting from its parent element, and then applies its declarations.
/// Pseudo-elements inherit from their element; margin boxes from the page.
///
/// # Errors
///
/// Returns a [`LoadError`] for a non-element root, unknown pseudo-element or
/// margin box names, and declarations the style model rejects.
pub fn from_fixture(fixture: &DocumentFixture) -> Result<LoadedDocument, LoadError> {
    let NodeFixture::Element(root) = &fixture.root else {
        return Err(LoadError::RootNotElement);
    };

    let mut dom = DomTree::new();
    let mut styles = StyleMap::new();
    add_element(&mut dom, &mut styles, NodeId::ROOT, None, root)?;

    let page = fixture.page.as_ref().map(page_setup).transpose()?;

    Ok(LoadedDocument {
        source_path: String::new(),
        dom,
        styles,
        page,
    })
}

impl LoadedDocument {
    /// Build the box tree and the page-margin tables.
    ///
    /// Each build works on its own copy of the DOM, so repeated builds see
    /// the same document. Warnings from earlier builds are cleared first,
    /// so [`BoxTree::warnings`] only holds this build's.
    #[must_use]
    pub fn build(&self, settings: &BuildSettings) -> BoxTree {
        clear_warnings();
        let mut dom = self.dom.clone();

        let paragraphs = settings.bidi.then(|| {
            ParagraphSplitter::new(settings.options.default_direction)
                .split(&self.dom, &self.styles)
        });
        let lookup: &dyn ParagraphLookup = match &paragraphs {
            Some(paragraphs) => paragraphs,
            None => &NoBidi,
        };

        let mut ctx = LayoutContext::new(&mut dom, &self.styles, settings.options.clone())
            .with_paragraphs(lookup);
        let root = build_box_tree(&mut ctx);

        let mut margins = Vec::new();
        if let Some(page) = &self.page {
            for area in MarginArea::iter() {
                let height = match area.direction() {
                    MarginDirection::Horizontal => page.margin_height,
                    MarginDirection::Vertical => page.side_height,
                };
                let names = area.names();
                if let Some(table) =
                    build_margin_table(&mut ctx, &page.style, names, height, area.direction())
                {
                    margins.push(MarginTable { area, table });
                }
            }
        }

        let warnings = take_warnings()
            .into_iter()
            .map(|w| format!("[{}] {}", w.component, w.message))
            .collect();

        BoxTree {
            dom,
            root,
            margins,
            warnings,
        }
    }
}

fn add_element(
    dom: &mut DomTree,
    styles: &mut StyleMap,
    parent: NodeId,
    parent_style: Option<&Rc<ComputedStyle>>,
    element: &ElementFixture,
) -> Result<(), LoadError> {
    let attrs: Vec<(&str, &str)> = element
        .attrs
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    let id = dom.create_element(&element.tag, &attrs);
    dom.append_child(parent, id);

    let mut style = default_style(&element.tag, parent_style);
    apply_declarations(&mut style, &element.style, &element.tag)?;
    let style = Rc::new(style);
    styles.insert(id, Rc::clone(&style));

    for (name, declarations) in &element.pseudo {
        let pseudo: PseudoElement = name
            .parse()
            .map_err(|_| LoadError::UnknownPseudoElement(name.clone()))?;
        let mut pseudo_style = ComputedStyle::inherit_from(&style);
        apply_declarations(
            &mut pseudo_style,
            declarations,
            &format!("{}::{name}", element.tag),
        )?;
        styles.insert_pseudo(id, pseudo, Rc::new(pseudo_style));
    }

    for child in &element.children {
        match child {
            NodeFixture::Element(child) => add_element(dom, styles, id, Some(&style), child)?,
            NodeFixture::Text { text } => {
                let node = dom.create_text(text);
                dom.append_child(id, node);
            }
            NodeFixture::CData { cdata } => {
                let node = dom.alloc(NodeType::CData(cdata.clone()));
                dom.append_child(id, node);
            }
            NodeFixture::Comment { comment } => {
                let node = dom.alloc(NodeType::Comment(comment.clone()));
                dom.append_child(id, node);
            }
        }
    }
    Ok(())
}

fn page_setup(fixture: &PageFixture) -> Result<PageSetup, LoadError> {
    let mut page_style = ComputedStyle::default();
    apply_declarations(&mut page_style, &fixture.style, "@page")?;
    let mut style = PageStyle::new(Rc::new(page_style));

    for (name, declarations) in &fixture.margin_boxes {
        let margin_box: MarginBoxName = name
            .parse()
            .map_err(|_| LoadError::UnknownMarginBox(name.clone()))?;
        let mut box_style = ComputedStyle::inherit_from(&style.style);
        apply_declarations(&mut box_style, declarations, &format!("@{name}"))?;
        style.set_margin_box(margin_box, Rc::new(box_style));
    }

    Ok(PageSetup {
        style,
        margin_height: fixture.margin_height,
        side_height: fixture.side_height,
    })
}

fn apply_declarations(
    style: &mut ComputedStyle,
    declarations: &Declarations,
    target: &str,
) -> Result<(), LoadError> {
    for (property, value) in declarations {
        style
            .set_property(property, value)
            .map_err(|source| LoadError::Style {
                target: target.to_string(),
                source,
            })?;
    }
    Ok(())
}
