//! Computed style representation and value types
//!
//! This module implements the subset of CSS needed to decide box generation:
//! - [CSS Display Module Level 3](https://www.w3.org/TR/css-display-3/)
//! - [CSS 2.1 § 12 Generated content](https://www.w3.org/TR/CSS2/generate.html)
//! - [CSS 2.1 § 17 Tables](https://www.w3.org/TR/CSS2/tables.html)
//! - [CSS Generated Content for Paged Media](https://www.w3.org/TR/css-gcpm-3/)

pub mod computed;
mod counters;
mod display;
mod pseudo;
mod values;

// Re-export all public types
pub use computed::ComputedStyle;
pub use counters::{CounterData, ListStyleType, parse_counter_list};
pub use display::DisplayValue;
pub use pseudo::{MarginBoxName, PseudoElement};
pub use values::{CaptionSide, Direction, Float, Position, Quotes, TextTransform, WhiteSpace};
