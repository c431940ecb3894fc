//! Page-margin boxes.
//!
//! [§ 5.3 Page-Margin Boxes](https://www.w3.org/TR/css-page-3/#margin-boxes)
//!
//! The margin boxes along one edge of the page are laid out as a one-row
//! (top and bottom edges) or one-column (left and right edges) anonymous
//! table whose cells are the margin boxes.

use std::collections::HashMap;
use std::rc::Rc;

use quire_css::{ComputedStyle, ContentProperty, DisplayValue, MarginBoxName};

use crate::box_tree::{BlockBox, BoxContent, BoxKind, Styleable};
use crate::context::{ChildBoxInfo, LayoutContext};
use crate::generated::create_margin_box_content;
use crate::table::resolve_child_table_content;
use crate::whitespace::strip_all_whitespace;

/// Orientation of a page edge's margin table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginDirection {
    /// Top and bottom edges: one row, one cell per box.
    Horizontal,
    /// Left and right edges: one row per box.
    Vertical,
}

/// Computed style of a page and of its margin boxes.
#[derive(Debug, Clone)]
pub struct PageStyle {
    /// The page context's style; margin boxes inherit from it.
    pub style: Rc<ComputedStyle>,
    margin_boxes: HashMap<MarginBoxName, Rc<ComputedStyle>>,
}

impl PageStyle {
    /// A page without margin box rules.
    #[must_use]
    pub fn new(style: Rc<ComputedStyle>) -> Self {
        Self {
            style,
            margin_boxes: HashMap::new(),
        }
    }

    /// Set the style of one margin box.
    pub fn set_margin_box(&mut self, name: MarginBoxName, style: Rc<ComputedStyle>) {
        let _ = self.margin_boxes.insert(name, style);
    }

    /// Whether any of `names` has a rule.
    #[must_use]
    pub fn has_any(&self, names: &[MarginBoxName]) -> bool {
        names.iter().any(|name| self.margin_boxes.contains_key(name))
    }

    /// Style of a margin box. Boxes without a rule only get a style (an
    /// empty cell inheriting from the page) when `always_create` is set.
    #[must_use]
    pub fn margin_box_style(
        &self,
        name: MarginBoxName,
        always_create: bool,
    ) -> Option<Rc<ComputedStyle>> {
        if let Some(style) = self.margin_boxes.get(&name) {
            return Some(Rc::clone(style));
        }
        always_create.then(|| {
            Rc::new(ComputedStyle {
                content: ContentProperty::None,
                ..ComputedStyle::anonymous(&self.style, DisplayValue::TableCell)
            })
        })
    }
}

/// Build the anonymous table holding the margin boxes `names` along one
/// page edge.
///
/// `height` is the edge's height; vertical tables split it across their
/// rows with the remainder going to the first rows. Returns `None` when no
/// named box has a rule or no cell survives.
pub fn build_margin_table(
    ctx: &mut LayoutContext<'_>,
    page: &PageStyle,
    names: &[MarginBoxName],
    height: i32,
    direction: MarginDirection,
) -> Option<BlockBox> {
    if !page.has_any(names) {
        return None;
    }

    let source = ctx.dom.document_element();
    let table_style = Rc::new(ComputedStyle::anonymous(&page.style, DisplayValue::Table));
    let group_style = Rc::new(ComputedStyle::anonymous(&table_style, DisplayValue::TableRowGroup));
    let row_style = Rc::new(ComputedStyle::anonymous(&group_style, DisplayValue::TableRow));

    let new_row = || BlockBox::anonymous(BoxKind::TableRow, Rc::clone(&row_style), source);

    let always_create = names.len() > 1 && direction == MarginDirection::Horizontal;
    let mut rows: Vec<BlockBox> = Vec::new();
    let mut cells: Vec<BlockBox> = Vec::new();

    for name in names {
        let Some(style) = page.margin_box_style(*name, always_create) else {
            continue;
        };
        let Some(cell) = build_margin_box(ctx, style, always_create) else {
            continue;
        };
        if direction == MarginDirection::Vertical {
            let mut row = new_row();
            row.content = BoxContent::Block(vec![cell]);
            rows.push(row);
        } else {
            cells.push(cell);
        }
    }

    let cell_count = if direction == MarginDirection::Horizontal {
        cells.len()
    } else {
        rows.len()
    };
    if cell_count == 0 {
        return None;
    }

    if direction == MarginDirection::Horizontal {
        let mut row = new_row();
        row.height_override = Some(height);
        row.content = BoxContent::Block(cells);
        rows.push(row);
    } else {
        distribute_height(&mut rows, height);
    }

    let mut group = BlockBox::anonymous(BoxKind::row_group(), group_style, source);
    group.content = BoxContent::Block(rows);

    let mut table = BlockBox::anonymous(BoxKind::table(), table_style, source);
    table.margin_area_root = true;
    table.content = BoxContent::Block(vec![group]);
    Some(table)
}

/// One margin box as an anonymous table cell.
///
/// Returns `None` (unless `always_create`) for `display: none` and for an
/// auto-width box without content. Content is resolved in margin mode, so
/// `element()` places copies of running boxes here.
pub fn build_margin_box(
    ctx: &mut LayoutContext<'_>,
    style: Rc<ComputedStyle>,
    always_create: bool,
) -> Option<BlockBox> {
    if style.is_display_none() && !always_create {
        return None;
    }
    let has_content = matches!(style.content, ContentProperty::List(_));
    if style.is_auto_width() && !always_create && !has_content {
        return None;
    }

    let style = if style.is_table_cell() || style.is_display_none() {
        style
    } else {
        Rc::new(style.with_display(DisplayValue::TableCell))
    };

    let source = ctx.dom.document_element();
    let mut info = ChildBoxInfo {
        contains_table_content: true,
        layout_running_blocks: true,
        ..ChildBoxInfo::new()
    };
    let mut cell = BlockBox::anonymous(BoxKind::TableCell, Rc::clone(&style), source);

    let mut children: Vec<Styleable> = Vec::new();
    if !style.is_display_none() {
        if let ContentProperty::List(values) = &style.content {
            children = create_margin_box_content(ctx, source, values, &style, &mut info);
            strip_all_whitespace(&mut children);
        }
    }

    resolve_child_table_content(&mut cell, children, &mut info, DisplayValue::TableCell);
    Some(cell)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn distribute_height(rows: &mut [BlockBox], height: i32) {
    let count = rows.len() as i32;
    if count == 0 {
        return;
    }
    let base = height / count;
    let remainder = height % count;
    for (index, row) in rows.iter_mut().enumerate() {
        let extra = i32::from((index as i32) < remainder);
        row.height_override = Some(base + extra);
    }
}
