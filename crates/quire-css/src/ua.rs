//! User-agent defaults for elements that arrive without a resolved style.
//!
//! [§ 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html)

use std::rc::Rc;

use crate::style::{ComputedStyle, CounterData, DisplayValue, ListStyleType};

/// UA `display` for `tag_name`, case-insensitive.
///
/// [§ 15.3 Non-replaced elements](https://html.spec.whatwg.org/multipage/rendering.html#non-replaced-elements)
#[must_use]
pub fn default_display_for_element(tag_name: &str) -> DisplayValue {
    match tag_name.to_ascii_lowercase().as_str() {
        // [§ 15.3.1](https://html.spec.whatwg.org/multipage/rendering.html#hidden-elements)
        "area" | "base" | "basefont" | "datalist" | "head" | "link" | "meta" | "noembed"
        | "noframes" | "param" | "rp" | "script" | "style" | "template" | "title" => {
            DisplayValue::None
        }

        // [§ 15.3.3](https://html.spec.whatwg.org/multipage/rendering.html#flow-content-3)
        "html" | "body" | "address" | "blockquote" | "center" | "dialog" | "div" | "figure"
        | "figcaption" | "footer" | "form" | "header" | "hr" | "legend" | "listing" | "main"
        | "p" | "plaintext" | "pre" | "search" | "xmp" | "details" | "summary" | "fieldset" => {
            DisplayValue::Block
        }
        // [§ 15.3.6](https://html.spec.whatwg.org/multipage/rendering.html#sections-and-headings)
        "article" | "aside" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "hgroup" | "nav"
        | "section" => DisplayValue::Block,
        // [§ 15.3.7](https://html.spec.whatwg.org/multipage/rendering.html#lists)
        "dir" | "dd" | "dl" | "dt" | "menu" | "ol" | "ul" => DisplayValue::Block,
        "li" => DisplayValue::ListItem,

        // [§ 15.3.8](https://html.spec.whatwg.org/multipage/rendering.html#tables-2)
        "table" => DisplayValue::Table,
        "caption" => DisplayValue::TableCaption,
        "colgroup" => DisplayValue::TableColumnGroup,
        "col" => DisplayValue::TableColumn,
        "thead" => DisplayValue::TableHeaderGroup,
        "tbody" => DisplayValue::TableRowGroup,
        "tfoot" => DisplayValue::TableFooterGroup,
        "tr" => DisplayValue::TableRow,
        "td" | "th" => DisplayValue::TableCell,

        "input" | "button" | "textarea" | "select" => DisplayValue::InlineBlock,
        _ => DisplayValue::Inline,
    }
}

/// Style for an element the style source has nothing for: inherited
/// properties from `parent`, initial values otherwise, and the UA display.
#[must_use]
pub fn default_style(tag_name: &str, parent: Option<&Rc<ComputedStyle>>) -> ComputedStyle {
    let mut style = parent.map_or_else(ComputedStyle::default, ComputedStyle::inherit_from);
    style.display = default_display_for_element(tag_name);

    // [§ 15.3.7 Lists]
    // "ol, ul, menu { counter-reset: list-item; }"
    match tag_name.to_ascii_lowercase().as_str() {
        "ol" => {
            style.counter_reset = vec![CounterData::new("list-item", 0)];
            style.list_style_type = ListStyleType::Decimal;
        }
        "ul" | "menu" => {
            style.counter_reset = vec![CounterData::new("list-item", 0)];
        }
        _ => {}
    }
    style
}
