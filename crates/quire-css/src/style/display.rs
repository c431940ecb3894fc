//! CSS Display property types
//!
//! [§ 2 Box Layout Modes: the display property](https://www.w3.org/TR/css-display-3/#the-display-properties)

use serde::Serialize;
use strum_macros::{Display, EnumString};

// [§ 2 Box Layout Modes: the display property](https://www.w3.org/TR/css-display-3/#the-display-properties)
//
// "The display property defines an element's display type, which consists of
// the two basic qualities of how an element generates boxes."
//
// Box construction only needs the keyword forms from CSS 2.1 plus the
// paged-media footnote extension, so the value is a flat keyword enum rather
// than an outer/inner pair.

/// Computed value of the `display` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum DisplayValue {
    /// [§ 2.6 display: none](https://www.w3.org/TR/css-display-3/#valdef-display-none)
    /// "The element and its descendants generate no boxes or text runs."
    None,
    /// "The element generates an inline-level box when placed in flow layout."
    #[default]
    Inline,
    /// "The element generates a block-level box when placed in flow layout."
    Block,
    /// "The element generates a principal block box and a marker box."
    ListItem,
    /// "This value causes an element to generate an inline-level block container."
    InlineBlock,
    /// [§ 17.2 The CSS table model](https://www.w3.org/TR/CSS2/tables.html#table-display)
    /// "Specifies that an element defines a block-level table."
    Table,
    /// "Specifies that an element defines an inline-level table."
    InlineTable,
    /// "Specifies that an element groups one or more rows."
    TableRowGroup,
    /// "Like 'table-row-group', but for visual formatting, the row group is
    /// always displayed before all other rows and row groups."
    TableHeaderGroup,
    /// "Like 'table-row-group', but for visual formatting, the row group is
    /// always displayed after all other rows and row groups."
    TableFooterGroup,
    /// "Specifies that an element is a row of cells."
    TableRow,
    /// "Specifies that an element groups one or more columns."
    TableColumnGroup,
    /// "Specifies that an element describes a column of cells."
    TableColumn,
    /// "Specifies that an element represents a table cell."
    TableCell,
    /// "Specifies a caption for the table."
    TableCaption,
    /// Paged-media footnote body (`display: -fs-footnote`).
    #[serde(rename = "-fs-footnote")]
    #[strum(serialize = "-fs-footnote")]
    FsFootnote,
}

impl DisplayValue {
    /// [§ 17.2](https://www.w3.org/TR/CSS2/tables.html#table-display)
    ///
    /// "internal table elements" plus the table wrappers themselves.
    #[must_use]
    pub const fn is_table_related(self) -> bool {
        matches!(
            self,
            Self::Table
                | Self::InlineTable
                | Self::TableRowGroup
                | Self::TableHeaderGroup
                | Self::TableFooterGroup
                | Self::TableRow
                | Self::TableColumnGroup
                | Self::TableColumn
                | Self::TableCell
                | Self::TableCaption
        )
    }

    /// Row groups, including header and footer groups.
    #[must_use]
    pub const fn is_table_section(self) -> bool {
        matches!(
            self,
            Self::TableRowGroup | Self::TableHeaderGroup | Self::TableFooterGroup
        )
    }

    /// Values laid out as atomic or text content in an inline formatting context.
    #[must_use]
    pub const fn is_inline_level(self) -> bool {
        matches!(self, Self::Inline | Self::InlineBlock | Self::InlineTable)
    }
}
