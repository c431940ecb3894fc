//! Registry of running elements.
//!
//! [§ 1.3 Running elements](https://www.w3.org/TR/css-gcpm-3/#running-elements)
//!
//! "Elements with position: running(custom-ident) are removed from the
//! normal flow and made available to place in a page margin box using
//! element()."

use std::collections::HashMap;

use strum_macros::{Display, EnumString};

use crate::box_tree::BlockBox;

/// [§ 1.3.1 The element() value](https://www.w3.org/TR/css-gcpm-3/#element-syntax)
///
/// Which of the elements assigned to a name `element()` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum RunningPosition {
    /// "The first element assigned on the page is used."
    #[default]
    First,
    /// "If the element is the first on the page, the value from the previous
    /// page is used."
    Start,
    /// "The last element assigned on the page is used."
    Last,
    /// "Same as 'first', except that the element is not displayed on the page
    /// where it is assigned."
    FirstExcept,
}

/// Finalized running boxes keyed by their `running()` identifier, in
/// document order.
#[derive(Debug, Default)]
pub struct RunningRegistry {
    boxes: HashMap<String, Vec<BlockBox>>,
}

impl RunningRegistry {
    /// Record a finalized running box.
    pub fn register(&mut self, name: &str, running: BlockBox) {
        self.boxes.entry(name.to_string()).or_default().push(running);
    }

    /// Look up the box `element(name, position)` refers to.
    ///
    /// Without page information `start` and `first-except` resolve like
    /// `first`.
    #[must_use]
    pub fn lookup(&self, name: &str, position: RunningPosition) -> Option<&BlockBox> {
        let boxes = self.boxes.get(name)?;
        match position {
            RunningPosition::First | RunningPosition::Start | RunningPosition::FirstExcept => {
                boxes.first()
            }
            RunningPosition::Last => boxes.last(),
        }
    }
}
