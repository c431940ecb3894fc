//! Document tree walked by the Quire box-tree builder.
//!
//! Quire does not parse markup. Documents are assembled node by node, either
//! by the fixture loader or by tests, and then handed to the builder, which
//! only ever reads them, with one exception: `content: url(...)` appends a
//! synthetic `<img>` element while boxes are being generated. Callers that
//! build more than once should build against a clone.
//!
//! Nodes live in a flat arena and refer to each other through [`NodeId`]
//! indices, so a box can keep a handle to the element it came from without
//! borrowing the tree.

use std::collections::BTreeMap;

/// Index of a node in its [`DomTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The document node, created with every tree.
    pub const ROOT: Self = Self(0);
}

/// What a node holds.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
#[derive(Debug, Clone)]
pub enum NodeType {
    /// The document node at [`NodeId::ROOT`].
    Document,
    /// An element with its tag and attributes.
    Element(ElementData),
    /// Character data.
    Text(String),
    /// A CDATA section. Box construction reads it exactly like text.
    CData(String),
    /// A comment. Never generates boxes.
    Comment(String),
}

/// Tag and attributes of an element node.
///
/// Namespaces are not modelled.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Local name, as written.
    pub tag_name: String,
    /// Attributes, ordered by name.
    pub attrs: BTreeMap<String, String>,
}

/// A node and its place in the tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Payload.
    pub node_type: NodeType,
    /// Containing node; `None` until attached.
    pub parent: Option<NodeId>,
    /// Children in document order.
    pub children: Vec<NodeId>,
}

impl Node {
    const fn detached(node_type: NodeType) -> Self {
        Self {
            node_type,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Arena of document nodes.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// A tree holding only the document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::detached(NodeType::Document)],
        }
    }

    /// Number of nodes, attached or not, including the document node.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the document node cannot be removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node at `id`, if it exists.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Add a detached node to the arena.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        self.nodes.push(Node::detached(node_type));
        NodeId(self.nodes.len() - 1)
    }

    /// Add a detached element. Later duplicates of an attribute name win.
    pub fn create_element(&mut self, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let attrs = attrs
            .iter()
            .map(|&(name, value)| (name.to_string(), value.to_string()))
            .collect();
        self.alloc(NodeType::Element(ElementData {
            tag_name: tag.to_string(),
            attrs,
        }))
    }

    /// Add a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeType::Text(text.to_string()))
    }

    /// Attach `child` as the last child of `parent`.
    ///
    /// [§ 4.2.3 Mutation algorithms](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// Nodes are only ever attached once; ids outside the arena are ignored.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent.0 >= self.nodes.len() || child.0 >= self.nodes.len() {
            return;
        }
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Parent of `id`; `None` for the document node and detached nodes.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    /// Children of `id`, empty for unknown ids.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |node| &node.children)
    }

    /// Element data, if `id` is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.get(id)?.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Character data of a text or CDATA node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.node_type {
            NodeType::Text(text) | NodeType::CData(text) => Some(text),
            _ => None,
        }
    }

    /// Tag of an element, ASCII-lowercased for comparisons.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<String> {
        self.as_element(id)
            .map(|element| element.tag_name.to_ascii_lowercase())
    }

    /// Value of attribute `name` on an element. Names match exactly.
    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.as_element(id)?.attrs.get(name).map(String::as_str)
    }

    /// First element child of the document node.
    ///
    /// [§ 4.5](https://dom.spec.whatwg.org/#document-element)
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .copied()
            .find(|&id| self.as_element(id).is_some())
    }
}
