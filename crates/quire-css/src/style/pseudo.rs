//! Pseudo-elements and page-margin boxes that can carry generated content.

use serde::Serialize;
use strum_macros::{Display, EnumString};

/// [§ 3 Tree-Abiding Pseudo-elements](https://www.w3.org/TR/css-pseudo-4/#treelike)
/// plus the paged-media footnote pseudo-elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum PseudoElement {
    /// `::before`
    Before,
    /// `::after`
    After,
    /// `::first-line`
    FirstLine,
    /// `::first-letter`
    FirstLetter,
    /// [§ 2.5 The footnote call](https://www.w3.org/TR/css-gcpm-3/#footnote-call)
    FootnoteCall,
    /// [§ 2.6 The footnote marker](https://www.w3.org/TR/css-gcpm-3/#footnote-marker)
    FootnoteMarker,
}

/// [§ 5.3 Page-Margin Boxes](https://www.w3.org/TR/css-page-3/#margin-boxes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum MarginBoxName {
    /// `@top-left-corner`
    TopLeftCorner,
    /// `@top-left`
    TopLeft,
    /// `@top-center`
    TopCenter,
    /// `@top-right`
    TopRight,
    /// `@top-right-corner`
    TopRightCorner,
    /// `@bottom-left-corner`
    BottomLeftCorner,
    /// `@bottom-left`
    BottomLeft,
    /// `@bottom-center`
    BottomCenter,
    /// `@bottom-right`
    BottomRight,
    /// `@bottom-right-corner`
    BottomRightCorner,
    /// `@left-top`
    LeftTop,
    /// `@left-middle`
    LeftMiddle,
    /// `@left-bottom`
    LeftBottom,
    /// `@right-top`
    RightTop,
    /// `@right-middle`
    RightMiddle,
    /// `@right-bottom`
    RightBottom,
}
