//! Counter scopes.
//!
//! [§ 12.4.1 Nested counters and scope](https://www.w3.org/TR/CSS2/generate.html#scope)
//!
//! "Counters are 'self-nesting', in the sense that resetting a counter in a
//! descendant element or pseudo-element automatically creates a new instance
//! of the counter."
//!
//! The builder pushes a scope when it descends into an element's children
//! and pops it afterwards. An element's own `counter-reset` and
//! `counter-increment` act on the scope of its parent, so the counter is
//! visible to the element's following siblings and their descendants.

use std::collections::HashMap;

use quire_css::ComputedStyle;

/// The `list-item` counter maintained for `display: list-item`.
pub const LIST_ITEM: &str = "list-item";

/// The `footnote` counter, which lives in one document-wide scope.
pub const FOOTNOTE: &str = "footnote";

/// Stack of counter scopes plus the document-wide footnote scope.
#[derive(Debug)]
pub struct CounterContext {
    scopes: Vec<HashMap<String, i32>>,
    global: HashMap<String, i32>,
}

impl Default for CounterContext {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterContext {
    /// A context holding only the scope above the root element.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
            global: HashMap::new(),
        }
    }

    /// Enter an element's children.
    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Leave an element's children. The outermost scope is never removed.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            let _ = self.scopes.pop();
        }
    }

    /// Apply `counter-reset`, then `counter-increment`, then the implicit
    /// `list-item` increment of `style` to the innermost scope.
    ///
    /// `explicit_reset` is the value `list-item` is reset to first, taken
    /// from an `ol[start]` or `li[value]` attribute (already minus one).
    pub fn resolve_counters(&mut self, style: &ComputedStyle, explicit_reset: Option<i32>) {
        for reset in &style.counter_reset {
            self.reset(&reset.name, reset.value);
        }

        for increment in &style.counter_increment {
            if !self.increment(&increment.name, increment.value) {
                self.insert_top(&increment.name, 0);
                let _ = self.increment(&increment.name, increment.value);
            }
        }

        if let Some(value) = explicit_reset {
            self.reset(LIST_ITEM, value);
        }

        if style.is_list_item() && !self.increment(LIST_ITEM, 1) {
            self.insert_top(LIST_ITEM, 0);
            let _ = self.increment(LIST_ITEM, 1);
        }
    }

    /// Value of the innermost instance of `name`. A counter that does not
    /// exist is created with value 0 in the outermost scope.
    pub fn current_value(&mut self, name: &str) -> i32 {
        if let Some(value) = self.scopes.iter().rev().find_map(|scope| scope.get(name)) {
            return *value;
        }
        let _ = self.scopes[0].insert(name.to_string(), 0);
        0
    }

    /// Values of every instance of `name`, outermost first, for
    /// `counters()`.
    pub fn current_values(&mut self, name: &str) -> Vec<i32> {
        let values: Vec<i32> = self
            .scopes
            .iter()
            .filter_map(|scope| scope.get(name).copied())
            .collect();
        if values.is_empty() {
            vec![self.current_value(name)]
        } else {
            values
        }
    }

    /// Value of a counter in the document-wide scope (0 if never set).
    #[must_use]
    pub fn global_value(&self, name: &str) -> i32 {
        self.global.get(name).copied().unwrap_or(0)
    }

    fn reset(&mut self, name: &str, value: i32) {
        self.insert_top(name, value);
        if name == FOOTNOTE {
            let _ = self.global.insert(name.to_string(), value);
        }
    }

    fn insert_top(&mut self, name: &str, value: i32) {
        if let Some(scope) = self.scopes.last_mut() {
            let _ = scope.insert(name.to_string(), value);
        }
    }

    /// Increment the innermost instance of `name`, wrapping on overflow.
    /// Returns false if no scope has it.
    fn increment(&mut self, name: &str, by: i32) -> bool {
        let Some(value) = self
            .scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
        else {
            return false;
        };
        *value = value.wrapping_add(by);
        if name == FOOTNOTE {
            let global = self.global.entry(name.to_string()).or_insert(0);
            *global = global.wrapping_add(by);
        }
        true
    }
}
