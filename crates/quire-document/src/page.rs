//! Page margin areas.
//!
//! [§ 5.3 Page-Margin Boxes](https://www.w3.org/TR/css-page-3/#margin-boxes)

use quire_css::MarginBoxName;
use quire_layout::MarginDirection;
use serde::Serialize;
use strum_macros::{Display, EnumIter};

/// One edge or corner of the page margin, laid out as one anonymous table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum MarginArea {
    /// `@top-left-corner`
    TopLeftCorner,
    /// `@top-left`, `@top-center`, `@top-right`
    Top,
    /// `@top-right-corner`
    TopRightCorner,
    /// `@left-top`, `@left-middle`, `@left-bottom`
    Left,
    /// `@right-top`, `@right-middle`, `@right-bottom`
    Right,
    /// `@bottom-left-corner`
    BottomLeftCorner,
    /// `@bottom-left`, `@bottom-center`, `@bottom-right`
    Bottom,
    /// `@bottom-right-corner`
    BottomRightCorner,
}

impl MarginArea {
    /// The margin boxes of this area in table order.
    #[must_use]
    pub const fn names(self) -> &'static [MarginBoxName] {
        match self {
            Self::TopLeftCorner => &[MarginBoxName::TopLeftCorner],
            Self::Top => &[
                MarginBoxName::TopLeft,
                MarginBoxName::TopCenter,
                MarginBoxName::TopRight,
            ],
            Self::TopRightCorner => &[MarginBoxName::TopRightCorner],
            Self::Left => &[
                MarginBoxName::LeftTop,
                MarginBoxName::LeftMiddle,
                MarginBoxName::LeftBottom,
            ],
            Self::Right => &[
                MarginBoxName::RightTop,
                MarginBoxName::RightMiddle,
                MarginBoxName::RightBottom,
            ],
            Self::BottomLeftCorner => &[MarginBoxName::BottomLeftCorner],
            Self::Bottom => &[
                MarginBoxName::BottomLeft,
                MarginBoxName::BottomCenter,
                MarginBoxName::BottomRight,
            ],
            Self::BottomRightCorner => &[MarginBoxName::BottomRightCorner],
        }
    }

    /// Side areas stack their boxes vertically; everything else is a row.
    #[must_use]
    pub const fn direction(self) -> MarginDirection {
        match self {
            Self::Left | Self::Right => MarginDirection::Vertical,
            _ => MarginDirection::Horizontal,
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_every_margin_box_in_one_area() {
        let names: Vec<MarginBoxName> = MarginArea::iter()
            .flat_map(|area| area.names().iter().copied())
            .collect();
        let unique: std::collections::HashSet<_> = names.iter().collect();
        assert_eq!(names.len(), 16);
        assert_eq!(unique.len(), 16);
        assert_eq!(MarginArea::Left.direction(), MarginDirection::Vertical);
        assert_eq!(MarginArea::TopLeftCorner.to_string(), "top-left-corner");
    }
}
