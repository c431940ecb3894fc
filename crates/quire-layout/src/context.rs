//! Shared state threaded through one box-tree build.

use std::collections::HashMap;
use std::rc::Rc;

use quire_css::{ComputedStyle, Direction, PseudoElement, default_style};
use quire_dom::{DomTree, NodeId};

use crate::bidi::{NoBidi, NoShaping, ParagraphLookup, TextShaper};
use crate::counters::CounterContext;
use crate::functions::ContentFunctionRegistry;
use crate::layers::LayerStack;
use crate::running::RunningRegistry;

/// Source of resolved styles for elements and pseudo-elements.
pub trait StyleSource {
    /// Computed style of an element, if the cascade produced one.
    fn style(&self, node: NodeId) -> Option<Rc<ComputedStyle>>;

    /// Computed style of a pseudo-element of `node`. `None` means the
    /// pseudo-element has no style and is not generated.
    fn pseudo_style(&self, node: NodeId, pseudo: PseudoElement) -> Option<Rc<ComputedStyle>>;
}

/// A [`StyleSource`] backed by hash maps.
#[derive(Debug, Default)]
pub struct StyleMap {
    elements: HashMap<NodeId, Rc<ComputedStyle>>,
    pseudos: HashMap<(NodeId, PseudoElement), Rc<ComputedStyle>>,
}

impl StyleMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the style of an element.
    pub fn insert(&mut self, node: NodeId, style: Rc<ComputedStyle>) {
        let _ = self.elements.insert(node, style);
    }

    /// Set the style of a pseudo-element.
    pub fn insert_pseudo(&mut self, node: NodeId, pseudo: PseudoElement, style: Rc<ComputedStyle>) {
        let _ = self.pseudos.insert((node, pseudo), style);
    }

    /// Number of styled elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// No element has a style.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl StyleSource for StyleMap {
    fn style(&self, node: NodeId) -> Option<Rc<ComputedStyle>> {
        self.elements.get(&node).cloned()
    }

    fn pseudo_style(&self, node: NodeId, pseudo: PseudoElement) -> Option<Rc<ComputedStyle>> {
        self.pseudos.get(&(node, pseudo)).cloned()
    }
}

/// Switches for one build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Paged output; multi-column containers are only built when set.
    pub paged: bool,
    /// Direction for text no bidi paragraph covers.
    pub default_direction: Direction,
    /// Tag names of replaced elements, whose children are never walked.
    pub replaced_elements: Vec<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            paged: true,
            default_direction: Direction::Ltr,
            replaced_elements: ["img", "svg", "object", "video", "canvas", "iframe"]
                .iter()
                .map(|tag| (*tag).to_string())
                .collect(),
        }
    }
}

/// Facts gathered while collecting one child list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChildBoxInfo {
    /// At least one child is block-level, so inline runs need anonymous
    /// block wrappers.
    pub contains_block_level_content: bool,
    /// At least one child is a table part that needs table fixup.
    pub contains_table_content: bool,
    /// Running boxes count as block-level when wrapping inline runs (page
    /// margin content).
    pub layout_running_blocks: bool,
}

impl ChildBoxInfo {
    /// Info for a child list that has no block content yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            contains_block_level_content: false,
            contains_table_content: false,
            layout_running_blocks: false,
        }
    }
}

/// Everything a build reads and mutates besides the box being built.
///
/// Styles missing from the [`StyleSource`] fall back to the user-agent
/// defaults and are cached for the rest of the build.
pub struct LayoutContext<'a> {
    /// The document. Mutable so `url()` content can create image elements.
    pub dom: &'a mut DomTree,
    /// Resolved styles.
    pub styles: &'a dyn StyleSource,
    /// Bidi paragraphs covering the document's text nodes.
    pub paragraphs: &'a dyn ParagraphLookup,
    /// Shaper applied to right-to-left fragments.
    pub shaper: &'a dyn TextShaper,
    /// Handlers for content functions the builder does not evaluate itself.
    pub functions: ContentFunctionRegistry,
    /// Counter scopes.
    pub counters: CounterContext,
    /// Finalized running boxes.
    pub running: RunningRegistry,
    /// Open stacking layers.
    pub layers: LayerStack,
    /// Build switches.
    pub options: BuildOptions,
    fallback_styles: HashMap<NodeId, Rc<ComputedStyle>>,
}

impl<'a> LayoutContext<'a> {
    /// A context without bidi paragraphs, shaping a no-op, and the built-in
    /// content functions.
    #[must_use]
    pub fn new(dom: &'a mut DomTree, styles: &'a dyn StyleSource, options: BuildOptions) -> Self {
        Self {
            dom,
            styles,
            paragraphs: &NoBidi,
            shaper: &NoShaping,
            functions: ContentFunctionRegistry::with_builtins(),
            counters: CounterContext::new(),
            running: RunningRegistry::default(),
            layers: LayerStack::default(),
            options,
            fallback_styles: HashMap::new(),
        }
    }

    /// Use bidi paragraphs computed by a
    /// [`ParagraphSplitter`](crate::bidi::ParagraphSplitter).
    #[must_use]
    pub fn with_paragraphs(mut self, paragraphs: &'a dyn ParagraphLookup) -> Self {
        self.paragraphs = paragraphs;
        self
    }

    /// Use a text shaper for right-to-left fragments.
    #[must_use]
    pub fn with_shaper(mut self, shaper: &'a dyn TextShaper) -> Self {
        self.shaper = shaper;
        self
    }

    /// Replace the content function registry.
    #[must_use]
    pub fn with_functions(mut self, functions: ContentFunctionRegistry) -> Self {
        self.functions = functions;
        self
    }

    /// Computed style of an element, falling back to user-agent defaults
    /// inherited from the parent element's style.
    pub fn style_of(&mut self, node: NodeId) -> Rc<ComputedStyle> {
        if let Some(style) = self.styles.style(node) {
            return style;
        }
        if let Some(style) = self.fallback_styles.get(&node) {
            return Rc::clone(style);
        }

        let parent_style = match self.dom.parent(node) {
            Some(parent) if self.dom.as_element(parent).is_some() => Some(self.style_of(parent)),
            _ => None,
        };
        let tag = self.dom.tag_name(node).unwrap_or_default();
        let style = Rc::new(default_style(&tag, parent_style.as_ref()));
        let _ = self.fallback_styles.insert(node, Rc::clone(&style));
        style
    }

    /// Whether `node` is a replaced element.
    #[must_use]
    pub fn is_replaced(&self, node: NodeId) -> bool {
        self.dom
            .tag_name(node)
            .is_some_and(|tag| self.options.replaced_elements.iter().any(|r| *r == tag))
    }

    /// Whether `node` is the document element.
    #[must_use]
    pub fn is_document_element(&self, node: NodeId) -> bool {
        self.dom.parent(node) == Some(NodeId::ROOT)
    }
}
