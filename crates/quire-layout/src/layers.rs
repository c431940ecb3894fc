//! Stacking layers opened during box construction.
//!
//! Footnote bodies are laid out in their own layer; the builder pushes one
//! while walking the footnote element and pops it afterwards.

use serde::Serialize;

/// Identifier of a layer, unique within one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LayerId(pub usize);

/// The stack of currently open layers.
#[derive(Debug, Default)]
pub struct LayerStack {
    open: Vec<LayerId>,
    next: usize,
}

impl LayerStack {
    /// Open a new layer nested in the current one.
    pub fn push(&mut self) -> LayerId {
        let id = LayerId(self.next);
        self.next += 1;
        self.open.push(id);
        id
    }

    /// Close the innermost layer.
    pub fn pop(&mut self) -> Option<LayerId> {
        self.open.pop()
    }
}
