//! Resolved CSS style model for the Quire box-tree builder.
//!
//! # Scope
//!
//! This crate implements:
//! - **Computed styles** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/#computed))
//!   limited to the properties that decide box generation
//! - **Display values** ([CSS Display Level 3](https://www.w3.org/TR/css-display-3/))
//!   including the CSS 2.1 table keywords and the paged-media footnote extension
//! - **Generated content values** ([CSS 2.1 § 12](https://www.w3.org/TR/CSS2/generate.html))
//!   with a small parser for `content` and `quotes`
//! - **Counter styles** for `counter()`/`counters()` and list markers
//! - **User-agent defaults** for elements without a resolved style
//!
//! # Not Implemented
//!
//! - Tokenization of full stylesheets, selector matching, and the cascade.
//!   Styles arrive already resolved.

/// Parsing and representation of `content` values.
pub mod content;
/// Computed style representation.
pub mod style;
/// User-agent default styles per [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html).
pub mod ua;

use thiserror::Error;

pub use content::{
    ContentParseError, ContentProperty, ContentValue, FunctionValue, parse_content, parse_quotes,
};
pub use style::{
    CaptionSide, ComputedStyle, CounterData, Direction, DisplayValue, Float, ListStyleType,
    MarginBoxName, Position, PseudoElement, Quotes, TextTransform, WhiteSpace,
};
pub use ua::{default_display_for_element, default_style};

/// Errors raised while applying declarations to a [`ComputedStyle`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    /// The property is not part of the style model.
    #[error("unknown property '{0}'")]
    UnknownProperty(String),
    /// The value does not parse for the property.
    #[error("invalid value '{value}' for '{property}'")]
    InvalidValue {
        /// Property name.
        property: String,
        /// Offending value text.
        value: String,
    },
    /// A `content` or `quotes` value failed to parse.
    #[error(transparent)]
    Content(#[from] ContentParseError),
}
