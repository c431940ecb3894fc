//! Keyword-valued properties consulted during box construction.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use strum_macros::{Display, EnumString};

use crate::StyleError;

/// [§ 9.5.1 Positioning the float: the 'float' property](https://www.w3.org/TR/CSS2/visuren.html#float-position)
///
/// `footnote` is the paged-media extension that moves the element into the
/// footnote area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Float {
    /// "The box is not floated."
    #[default]
    None,
    /// "The element generates a block box that is floated to the left."
    Left,
    /// "Similar to 'left', except the box is floated to the right."
    Right,
    /// [§ 2 Footnotes](https://www.w3.org/TR/css-gcpm-3/#footnotes)
    Footnote,
}

/// [§ 9.3.1 Choosing a positioning scheme: 'position' property](https://www.w3.org/TR/CSS2/visuren.html#choose-position)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    /// "The box is a normal box, laid out according to the normal flow."
    #[default]
    Static,
    /// "The box's position is calculated according to the normal flow."
    Relative,
    /// "The box's position is specified with the 'top', 'right', 'bottom',
    /// and 'left' properties."
    Absolute,
    /// "The box's position is calculated according to the 'absolute' model,
    /// but in addition, the box is fixed with respect to some reference."
    Fixed,
    /// [§ 1.3 Running elements](https://www.w3.org/TR/css-gcpm-3/#running-elements)
    ///
    /// "The running() value removes the element (and associated ::before and
    /// ::after pseudo-elements) from the normal flow, and makes it available to
    /// place in a page margin box using element()."
    Running(String),
}

impl FromStr for Position {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "static" => Ok(Self::Static),
            "relative" => Ok(Self::Relative),
            "absolute" => Ok(Self::Absolute),
            "fixed" => Ok(Self::Fixed),
            _ => lower
                .strip_prefix("running(")
                .and_then(|rest| rest.strip_suffix(')'))
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(|name| Self::Running(name.to_string()))
                .ok_or_else(|| StyleError::InvalidValue {
                    property: "position".to_string(),
                    value: s.to_string(),
                }),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => f.write_str("static"),
            Self::Relative => f.write_str("relative"),
            Self::Absolute => f.write_str("absolute"),
            Self::Fixed => f.write_str("fixed"),
            Self::Running(name) => write!(f, "running({name})"),
        }
    }
}

/// [§ 17.4.1 Caption position and alignment](https://www.w3.org/TR/CSS2/tables.html#caption-position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum CaptionSide {
    /// "Positions the caption box above the table box."
    #[default]
    Top,
    /// "Positions the caption box below the table box."
    Bottom,
}

/// [§ 3 White Space and Wrapping: the white-space property](https://www.w3.org/TR/css-text-3/#white-space-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum WhiteSpace {
    /// Collapse spaces and segment breaks; allow wrapping.
    #[default]
    Normal,
    /// Preserve everything; no wrapping.
    Pre,
    /// Collapse like `normal`; no wrapping.
    Nowrap,
    /// Preserve everything; allow wrapping.
    PreWrap,
    /// Collapse spaces but preserve segment breaks.
    PreLine,
}

impl WhiteSpace {
    /// Whether runs of spaces and tabs collapse.
    #[must_use]
    pub const fn collapses_spaces(self) -> bool {
        matches!(self, Self::Normal | Self::Nowrap | Self::PreLine)
    }

    /// Whether segment breaks (newlines) are turned into spaces.
    #[must_use]
    pub const fn collapses_newlines(self) -> bool {
        matches!(self, Self::Normal | Self::Nowrap)
    }
}

/// [§ 2.1 Case Transforms: the text-transform property](https://www.w3.org/TR/css-text-3/#text-transform-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum TextTransform {
    /// "No effects."
    #[default]
    None,
    /// "Puts all letters in uppercase."
    Uppercase,
    /// "Puts all letters in lowercase."
    Lowercase,
    /// "Puts the first typographic letter unit of each word in titlecase."
    Capitalize,
}

impl TextTransform {
    /// Apply the transform to a run of text.
    #[must_use]
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::None => text.to_string(),
            Self::Uppercase => text.to_uppercase(),
            Self::Lowercase => text.to_lowercase(),
            Self::Capitalize => {
                let mut out = String::with_capacity(text.len());
                let mut at_word_start = true;
                for c in text.chars() {
                    if at_word_start && c.is_alphabetic() {
                        out.extend(c.to_uppercase());
                        at_word_start = false;
                    } else {
                        if c.is_whitespace() {
                            at_word_start = true;
                        }
                        out.push(c);
                    }
                }
                out
            }
        }
    }
}

/// [§ 2.1 Specifying Directionality: the direction property](https://www.w3.org/TR/css-writing-modes-4/#direction)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Direction {
    /// "Left-to-right directionality."
    #[default]
    Ltr,
    /// "Right-to-left directionality."
    Rtl,
}

/// [§ 12.3.1 Specifying quotes with the 'quotes' property](https://www.w3.org/TR/CSS2/generate.html#quotes-specify)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Quotes {
    /// "The 'open-quote' and 'close-quote' values of the 'content' property
    /// produce no quotation marks."
    None,
    /// Open/close strings in declaration order.
    Strings(Vec<String>),
}

impl Default for Quotes {
    fn default() -> Self {
        Self::Strings(
            ["\u{201c}", "\u{201d}", "\u{2018}", "\u{2019}"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        )
    }
}

impl Quotes {
    /// Quote string at `index` (0 = outer open, 1 = outer close).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Strings(strings) => strings.get(index).map(String::as_str),
        }
    }
}
