//! CSS Computed Style
//!
//! [§ 4.4 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
//! "The computed value is the result of resolving the specified value..."

use std::rc::Rc;

use serde::Serialize;

use crate::StyleError;
use crate::content::{ContentProperty, parse_content, parse_quotes};

use super::counters::{CounterData, ListStyleType, parse_counter_list};
use super::display::DisplayValue;
use super::values::{CaptionSide, Direction, Float, Position, Quotes, TextTransform, WhiteSpace};

/// Computed styles for an element, pseudo-element, or anonymous box.
///
/// [§ 4.4 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
///
/// Only the properties that influence which boxes exist are modelled.
/// Styles are shared through `Rc` and link to the style of their parent box
/// so that box construction can ask questions about the enclosing context.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComputedStyle {
    /// [§ 2 'display'](https://www.w3.org/TR/css-display-3/#the-display-properties)
    pub display: DisplayValue,

    /// [§ 9.5.1 'float'](https://www.w3.org/TR/CSS2/visuren.html#float-position)
    pub float: Float,

    /// [§ 9.3.1 'position'](https://www.w3.org/TR/CSS2/visuren.html#choose-position)
    pub position: Position,

    /// [§ 17.4.1 'caption-side'](https://www.w3.org/TR/CSS2/tables.html#caption-position)
    ///
    /// Inherited: yes
    pub caption_side: CaptionSide,

    /// [§ 3 'white-space'](https://www.w3.org/TR/css-text-3/#white-space-property)
    ///
    /// Inherited: yes
    pub white_space: WhiteSpace,

    /// [§ 2.1 'text-transform'](https://www.w3.org/TR/css-text-3/#text-transform-property)
    ///
    /// Inherited: yes
    pub text_transform: TextTransform,

    /// [§ 2.1 'direction'](https://www.w3.org/TR/css-writing-modes-4/#direction)
    ///
    /// Inherited: yes
    pub direction: Direction,

    /// [§ 12.3.1 'quotes'](https://www.w3.org/TR/CSS2/generate.html#quotes-specify)
    ///
    /// Inherited: yes
    pub quotes: Quotes,

    /// [§ 12.6.2 'list-style-type'](https://www.w3.org/TR/CSS2/generate.html#propdef-list-style-type)
    ///
    /// Inherited: yes
    pub list_style_type: ListStyleType,

    /// [§ 12.2 'content'](https://www.w3.org/TR/CSS2/generate.html#content)
    pub content: ContentProperty,

    /// [§ 12.4 'counter-reset'](https://www.w3.org/TR/CSS2/generate.html#propdef-counter-reset)
    pub counter_reset: Vec<CounterData>,

    /// [§ 12.4 'counter-increment'](https://www.w3.org/TR/CSS2/generate.html#propdef-counter-increment)
    pub counter_increment: Vec<CounterData>,

    /// [§ 3 'column-count'](https://www.w3.org/TR/css-multicol-1/#cc)
    ///
    /// None means `auto`.
    pub column_count: Option<u32>,

    /// [§ 10.2 'width'](https://www.w3.org/TR/CSS2/visudet.html#the-width-property)
    ///
    /// Length in px; None means `auto`.
    pub width: Option<f32>,

    /// Style of the box this style's box is nested in.
    #[serde(skip)]
    pub parent: Option<Rc<ComputedStyle>>,
}

impl ComputedStyle {
    /// [§ 7.1 Inherited Properties](https://www.w3.org/TR/css-cascade-4/#inheriting)
    ///
    /// "Inherited properties ... take the computed value of the parent
    /// element." Non-inherited properties take their initial value.
    #[must_use]
    pub fn inherit_from(parent: &Rc<Self>) -> Self {
        Self {
            caption_side: parent.caption_side,
            white_space: parent.white_space,
            text_transform: parent.text_transform,
            direction: parent.direction,
            quotes: parent.quotes.clone(),
            list_style_type: parent.list_style_type,
            parent: Some(Rc::clone(parent)),
            ..Self::default()
        }
    }

    /// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    ///
    /// "The properties of anonymous boxes are inherited from the enclosing
    /// non-anonymous box. Non-inherited properties have their initial value."
    #[must_use]
    pub fn anonymous(parent: &Rc<Self>, display: DisplayValue) -> Self {
        Self {
            display,
            ..Self::inherit_from(parent)
        }
    }

    /// Copy of this style with a different display value.
    #[must_use]
    pub fn with_display(&self, display: DisplayValue) -> Self {
        Self {
            display,
            ..self.clone()
        }
    }

    /// Copy of this style with a different float value.
    #[must_use]
    pub fn with_float(&self, float: Float) -> Self {
        Self {
            float,
            ..self.clone()
        }
    }

    /// Apply a single `property: value` declaration.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::UnknownProperty`] for properties outside this
    /// model and [`StyleError::InvalidValue`] for values that do not parse.
    pub fn set_property(&mut self, property: &str, value: &str) -> Result<(), StyleError> {
        let property = property.trim().to_ascii_lowercase();
        let value = value.trim();
        let invalid = || StyleError::InvalidValue {
            property: property.clone(),
            value: value.to_string(),
        };

        match property.as_str() {
            "display" => self.display = value.parse().map_err(|_| invalid())?,
            "float" => self.float = value.parse().map_err(|_| invalid())?,
            "position" => self.position = value.parse()?,
            "caption-side" => self.caption_side = value.parse().map_err(|_| invalid())?,
            "white-space" => self.white_space = value.parse().map_err(|_| invalid())?,
            "text-transform" => self.text_transform = value.parse().map_err(|_| invalid())?,
            "direction" => self.direction = value.parse().map_err(|_| invalid())?,
            "list-style-type" => self.list_style_type = value.parse().map_err(|_| invalid())?,
            "quotes" => {
                self.quotes = parse_quotes(value)?.map_or(Quotes::None, Quotes::Strings);
            }
            "content" => self.content = parse_content(value)?,
            "counter-reset" => self.counter_reset = parse_counter_list(&property, value, 0)?,
            "counter-increment" => {
                self.counter_increment = parse_counter_list(&property, value, 1)?;
            }
            "column-count" => {
                self.column_count = if value.eq_ignore_ascii_case("auto") {
                    None
                } else {
                    Some(value.parse().map_err(|_| invalid())?)
                };
            }
            "width" => {
                self.width = if value.eq_ignore_ascii_case("auto") {
                    None
                } else {
                    let number = value.strip_suffix("px").unwrap_or(value).trim();
                    Some(number.parse().map_err(|_| invalid())?)
                };
            }
            _ => return Err(StyleError::UnknownProperty(property)),
        }
        Ok(())
    }

    /// Whether `display: none` suppresses the box entirely.
    #[must_use]
    pub fn is_display_none(&self) -> bool {
        self.display == DisplayValue::None
    }

    /// `float: left | right`.
    #[must_use]
    pub fn is_floated(&self) -> bool {
        matches!(self.float, Float::Left | Float::Right)
    }

    /// `position: absolute`.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.position == Position::Absolute
    }

    /// `position: fixed`.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        self.position == Position::Fixed
    }

    /// [§ 1.3 Running elements](https://www.w3.org/TR/css-gcpm-3/#running-elements)
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.position, Position::Running(_))
    }

    /// Identifier of a `position: running(id)` element.
    #[must_use]
    pub fn running_name(&self) -> Option<&str> {
        match &self.position {
            Position::Running(name) => Some(name),
            _ => None,
        }
    }

    /// Out of normal flow: floated, absolutely positioned, fixed, or running.
    #[must_use]
    pub fn is_out_of_flow(&self) -> bool {
        self.is_floated() || self.is_absolute() || self.is_fixed() || self.is_running()
    }

    /// An in-flow inline box: `display: inline` and not taken out of flow.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.display == DisplayValue::Inline && !self.is_out_of_flow()
    }

    /// Items that sit inside an inline formatting context rather than
    /// breaking it: inline-level displays plus out-of-flow boxes.
    #[must_use]
    pub fn is_laid_out_in_inline_context(&self) -> bool {
        self.display.is_inline_level() || self.is_out_of_flow()
    }

    /// `display: block`.
    #[must_use]
    pub fn is_specified_as_block(&self) -> bool {
        self.display == DisplayValue::Block
    }

    /// `display: inline-block`.
    #[must_use]
    pub fn is_inline_block(&self) -> bool {
        self.display == DisplayValue::InlineBlock
    }

    /// `display: table`.
    #[must_use]
    pub fn is_table(&self) -> bool {
        self.display == DisplayValue::Table
    }

    /// `display: inline-table`.
    #[must_use]
    pub fn is_inline_table(&self) -> bool {
        self.display == DisplayValue::InlineTable
    }

    /// `display: table-row`.
    #[must_use]
    pub fn is_table_row(&self) -> bool {
        self.display == DisplayValue::TableRow
    }

    /// `display: table-row-group | table-header-group | table-footer-group`.
    #[must_use]
    pub fn is_table_section(&self) -> bool {
        self.display.is_table_section()
    }

    /// `display: table-header-group`.
    #[must_use]
    pub fn is_table_header(&self) -> bool {
        self.display == DisplayValue::TableHeaderGroup
    }

    /// `display: table-footer-group`.
    #[must_use]
    pub fn is_table_footer(&self) -> bool {
        self.display == DisplayValue::TableFooterGroup
    }

    /// `display: table-cell`.
    #[must_use]
    pub fn is_table_cell(&self) -> bool {
        self.display == DisplayValue::TableCell
    }

    /// `display: table-caption`.
    #[must_use]
    pub fn is_table_caption(&self) -> bool {
        self.display == DisplayValue::TableCaption
    }

    /// `display: table-column | table-column-group`.
    #[must_use]
    pub fn is_table_column_or_group(&self) -> bool {
        matches!(
            self.display,
            DisplayValue::TableColumn | DisplayValue::TableColumnGroup
        )
    }

    /// Any table display value, including the table wrappers.
    #[must_use]
    pub fn is_table_related(&self) -> bool {
        self.display.is_table_related()
    }

    /// `display: list-item`.
    #[must_use]
    pub fn is_list_item(&self) -> bool {
        self.display == DisplayValue::ListItem
    }

    /// [§ 2 Footnotes](https://www.w3.org/TR/css-gcpm-3/#footnotes)
    ///
    /// Either the `-fs-footnote` display value or `float: footnote`.
    #[must_use]
    pub fn is_footnote(&self) -> bool {
        self.display == DisplayValue::FsFootnote || self.float == Float::Footnote
    }

    /// [§ 3 'column-count'](https://www.w3.org/TR/css-multicol-1/#cc)
    #[must_use]
    pub fn has_columns(&self) -> bool {
        self.column_count.is_some_and(|count| count > 1)
    }

    /// Width is `auto`.
    #[must_use]
    pub fn is_auto_width(&self) -> bool {
        self.width.is_none()
    }

    /// [§ 7.1 ::first-line](https://www.w3.org/TR/css-pseudo-4/#first-line-pseudo)
    ///
    /// "The ::first-line pseudo-element ... is only defined on block
    /// containers."
    #[must_use]
    pub fn may_have_first_line(&self) -> bool {
        matches!(
            self.display,
            DisplayValue::Block
                | DisplayValue::ListItem
                | DisplayValue::InlineBlock
                | DisplayValue::TableCell
                | DisplayValue::TableCaption
        )
    }

    /// [§ 7.2 ::first-letter](https://www.w3.org/TR/css-pseudo-4/#first-letter-pseudo)
    #[must_use]
    pub fn may_have_first_letter(&self) -> bool {
        self.may_have_first_line()
    }

    /// Whether the parent box's style is an in-flow inline.
    #[must_use]
    pub fn is_parent_inline(&self) -> bool {
        self.parent.as_ref().is_some_and(|p| p.is_inline())
    }
}
