//! Content functions evaluated outside the builder.
//!
//! [§ 2 Cross-references](https://www.w3.org/TR/css-gcpm-3/#cross-references)
//!
//! `counter()`, `counters()`, `attr()` and `element()` are resolved while the
//! box tree is built. Everything else is handed to a [`ContentFunction`]:
//! static functions produce their text immediately, dynamic ones (page
//! numbers, leaders, cross references) leave a placeholder leaf that layout
//! re-evaluates.

use std::fmt;
use std::rc::Rc;

use quire_css::FunctionValue;

/// Handler for one family of content functions.
pub trait ContentFunction: fmt::Debug {
    /// Whether [`calculate`](Self::calculate) yields the final text at build
    /// time.
    fn is_static(&self) -> bool;

    /// Final text of the call. Dynamic functions return `None` until layout
    /// supplies the information they need.
    fn calculate(&self, function: &FunctionValue) -> Option<String>;

    /// Text measured in place of a dynamic function's value.
    fn layout_replacement_text(&self) -> String;

    /// Whether this handler accepts the call.
    fn can_handle(&self, function: &FunctionValue) -> bool;
}

/// [§ 1.4 Page-based counters](https://www.w3.org/TR/css-gcpm-3/#page-based-counters)
///
/// `counter(page)` and `counter(pages)`.
#[derive(Debug, Default)]
pub struct PageCounterFunction;

impl ContentFunction for PageCounterFunction {
    fn is_static(&self) -> bool {
        false
    }

    fn calculate(&self, _function: &FunctionValue) -> Option<String> {
        None
    }

    fn layout_replacement_text(&self) -> String {
        "999".to_string()
    }

    fn can_handle(&self, function: &FunctionValue) -> bool {
        function.name == "counter" && matches!(function.ident_arg(0), Some("page" | "pages"))
    }
}

/// [§ 2.1 The target-counter() function](https://www.w3.org/TR/css-gcpm-3/#target-counter)
#[derive(Debug, Default)]
pub struct TargetCounterFunction;

impl ContentFunction for TargetCounterFunction {
    fn is_static(&self) -> bool {
        false
    }

    fn calculate(&self, _function: &FunctionValue) -> Option<String> {
        None
    }

    fn layout_replacement_text(&self) -> String {
        "999".to_string()
    }

    fn can_handle(&self, function: &FunctionValue) -> bool {
        function.name == "target-counter" && function.args.len() >= 2
    }
}

/// [§ 2.3 The target-text() function](https://www.w3.org/TR/css-gcpm-3/#target-text)
#[derive(Debug, Default)]
pub struct TargetTextFunction;

impl ContentFunction for TargetTextFunction {
    fn is_static(&self) -> bool {
        false
    }

    fn calculate(&self, _function: &FunctionValue) -> Option<String> {
        None
    }

    fn layout_replacement_text(&self) -> String {
        String::new()
    }

    fn can_handle(&self, function: &FunctionValue) -> bool {
        function.name == "target-text" && !function.args.is_empty()
    }
}

/// [§ 3 Leaders](https://www.w3.org/TR/css-gcpm-3/#leaders)
#[derive(Debug, Default)]
pub struct LeaderFunction;

impl ContentFunction for LeaderFunction {
    fn is_static(&self) -> bool {
        false
    }

    fn calculate(&self, _function: &FunctionValue) -> Option<String> {
        None
    }

    fn layout_replacement_text(&self) -> String {
        ". ".to_string()
    }

    fn can_handle(&self, function: &FunctionValue) -> bool {
        function.name == "leader"
    }
}

/// Ordered set of content function handlers. The first handler that
/// accepts a call wins.
#[derive(Debug, Clone, Default)]
pub struct ContentFunctionRegistry {
    handlers: Vec<Rc<dyn ContentFunction>>,
}

impl ContentFunctionRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The page counter, target-counter, target-text, and leader handlers.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Rc::new(PageCounterFunction));
        registry.register(Rc::new(TargetCounterFunction));
        registry.register(Rc::new(TargetTextFunction));
        registry.register(Rc::new(LeaderFunction));
        registry
    }

    /// Add a handler after the existing ones.
    pub fn register(&mut self, handler: Rc<dyn ContentFunction>) {
        self.handlers.push(handler);
    }

    /// The handler for `function`, if any.
    #[must_use]
    pub fn lookup(&self, function: &FunctionValue) -> Option<Rc<dyn ContentFunction>> {
        self.handlers
            .iter()
            .find(|handler| handler.can_handle(function))
            .cloned()
    }
}
