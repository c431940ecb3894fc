//! Table model normalization.
//!
//! [§ 17.2.1 Anonymous table objects](https://www.w3.org/TR/CSS2/tables.html#anonymous-boxes)
//!
//! "Document languages other than HTML may not contain all the elements in
//! the CSS 2.1 table model. In these cases, the 'missing' elements must be
//! assumed in order for the table model to work."
//!
//! Two directions of repair:
//! - top-down ([`resolve_table_content`]): children of a table, row group
//!   or row that are not of the next nesting level get wrapped in anonymous
//!   boxes of that level;
//! - bottom-up ([`resolve_child_table_content`]): orphaned cells, rows and
//!   row groups inside a non-table parent get wrapped in anonymous rows, row
//!   groups and finally a table.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use quire_css::{CaptionSide, ComputedStyle, DisplayValue, Float};
use quire_dom::NodeId;

use crate::anonymous::resolve_children;
use crate::box_tree::{BlockBox, BoxContent, BoxKind, FloatedBoxData, Styleable, Styled};
use crate::context::ChildBoxInfo;

/// Finalize the children of a table, row group or row, wrapping
/// improperly nested children in anonymous boxes of the next level.
///
/// An anonymous cell holding orphaned rows or row groups gets a nested
/// anonymous table instead.
pub fn resolve_table_content(
    parent: &mut BlockBox,
    mut children: Vec<Styleable>,
    info: &mut ChildBoxInfo,
) {
    let parent_display = parent.style.display;
    let next = next_table_nesting_level(parent_display);

    if next.is_none() && parent.anonymous && contains_orphaned_table_content(&children) {
        resolve_child_table_content(parent, children, info, DisplayValue::TableCell);
        return;
    }

    let Some(next) = next else {
        if parent.anonymous {
            rebalance_inline_elements(&mut children);
        }
        resolve_children(parent, children, info);
        return;
    };

    if children
        .iter()
        .all(|child| is_proper_table_nesting(parent_display, child.display()))
    {
        if parent.anonymous {
            rebalance_inline_elements(&mut children);
        }
        resolve_children(parent, children, info);
        return;
    }

    // STEP 1: Partition into proper children and maximal runs of others.
    let mut with_anonymous: Vec<Styleable> = Vec::with_capacity(children.len());
    let mut for_anonymous: Vec<Styleable> = Vec::new();
    for child in children {
        if is_proper_table_nesting(parent_display, child.display()) {
            if !for_anonymous.is_empty() {
                let run = std::mem::take(&mut for_anonymous);
                with_anonymous.push(create_anonymous_table_content(
                    &parent.style,
                    parent.element,
                    next,
                    run,
                ));
            }
            with_anonymous.push(child);
        } else {
            for_anonymous.push(child);
        }
    }

    // STEP 2: Wrap the trailing run.
    if !for_anonymous.is_empty() {
        with_anonymous.push(create_anonymous_table_content(
            &parent.style,
            parent.element,
            next,
            for_anonymous,
        ));
    }

    info.contains_block_level_content = true;
    resolve_children(parent, with_anonymous, info);
}

/// Finalize a child list containing table parts whose parent is not of the
/// enclosing level, starting by grouping items of the `target` level.
///
/// Runs of `target` items are wrapped in anonymous boxes of the level above
/// (cells into rows, rows into row groups, row groups into tables) and the
/// process repeats one level up until tables have been built.
pub fn resolve_child_table_content(
    parent: &mut BlockBox,
    children: Vec<Styleable>,
    info: &mut ChildBoxInfo,
    target: DisplayValue,
) {
    let next_up = previous_table_nesting_level(target);

    let mut with_anonymous: Vec<Styleable> = Vec::with_capacity(children.len());
    let mut for_anonymous: Vec<Styleable> = Vec::new();
    for child in children {
        if matches_table_level(target, child.display()) {
            for_anonymous.push(child);
        } else {
            if !for_anonymous.is_empty() {
                with_anonymous.push(wrap_run(std::mem::take(&mut for_anonymous), next_up));
            }
            with_anonymous.push(child);
        }
    }
    if !for_anonymous.is_empty() {
        with_anonymous.push(wrap_run(for_anonymous, next_up));
    }

    if next_up == DisplayValue::Table {
        rebalance_inline_elements(&mut with_anonymous);
        info.contains_block_level_content = true;
        resolve_children(parent, with_anonymous, info);
    } else {
        resolve_child_table_content(parent, with_anonymous, info, next_up);
    }
}

/// Wrap a run in an anonymous box of level `next`, borrowing the style and
/// element of the run's first item.
fn wrap_run(run: Vec<Styleable>, next: DisplayValue) -> Styleable {
    let source_style = Rc::clone(run[0].style());
    let source_element = run[0].element();
    create_anonymous_table_content(&source_style, source_element, next, run)
}

fn create_anonymous_table_content(
    source_style: &Rc<ComputedStyle>,
    source_element: Option<NodeId>,
    next: DisplayValue,
    run: Vec<Styleable>,
) -> Styleable {
    let mut nested = ChildBoxInfo::new();
    if run.iter().any(|item| !item.is_laid_out_in_inline_context()) {
        nested.contains_block_level_content = true;
    }

    let display = if source_style.is_parent_inline() && next == DisplayValue::Table {
        DisplayValue::InlineTable
    } else {
        next
    };
    let style = Rc::new(ComputedStyle::anonymous(source_style, display));
    let mut anonymous = create_block_box(style, source_element, &mut nested, false);
    anonymous.anonymous = true;

    resolve_table_content(&mut anonymous, run, &mut nested);

    if next == DisplayValue::Table {
        Styleable::Box(reorder_table_content(anonymous))
    } else {
        Styleable::Box(anonymous)
    }
}

/// Choose the kind of box `style` generates and attach float data.
///
/// Priority: footnote bodies, then floats (which keep their table kind),
/// then specified blocks, then table parts. Generated content never
/// produces tables, rows, or row groups.
pub(crate) fn create_block_box(
    style: Rc<ComputedStyle>,
    element: Option<NodeId>,
    info: &mut ChildBoxInfo,
    generated: bool,
) -> BlockBox {
    let table_wrapper = style.is_table() || style.is_inline_table();

    if style.is_footnote() {
        return BlockBox::new(BoxKind::Plain, style, element);
    }

    if style.is_floated() && !(style.is_absolute() || style.is_fixed()) {
        let kind = if table_wrapper {
            BoxKind::table()
        } else if style.is_table_cell() {
            info.contains_table_content = true;
            BoxKind::TableCell
        } else {
            BoxKind::Plain
        };
        let side = style.float;
        let mut floated = BlockBox::new(kind, style, element);
        floated.floated = Some(FloatedBoxData { side });
        return floated;
    }

    let kind = if style.is_specified_as_block() {
        BoxKind::Plain
    } else if !generated && table_wrapper {
        BoxKind::table()
    } else if style.is_table_cell() {
        info.contains_table_content = true;
        BoxKind::TableCell
    } else if !generated && style.is_table_row() {
        info.contains_table_content = true;
        BoxKind::TableRow
    } else if !generated && style.is_table_section() {
        info.contains_table_content = true;
        BoxKind::row_group()
    } else if style.is_table_caption() {
        info.contains_table_content = true;
        BoxKind::Plain
    } else {
        BoxKind::Plain
    };
    BlockBox::new(kind, style, element)
}

/// [§ 17.4 Tables in the visual formatting model](https://www.w3.org/TR/CSS2/tables.html#model)
///
/// Put the first header group first and the first footer group last, and
/// move captions out of the table into an anonymous wrapper block
/// (top captions, the table, bottom captions). A floated table hands its
/// float over to the wrapper.
#[must_use]
pub fn reorder_table_content(mut table: BlockBox) -> BlockBox {
    let BoxContent::Block(children) = std::mem::take(&mut table.content) else {
        return table;
    };

    let mut top_captions = Vec::new();
    let mut bottom_captions = Vec::new();
    let mut header: Option<BlockBox> = None;
    let mut footer: Option<BlockBox> = None;
    let mut bodies = Vec::new();

    for mut child in children {
        if child.style.is_table_caption() {
            if child.style.caption_side == CaptionSide::Bottom {
                bottom_captions.push(child);
            } else {
                top_captions.push(child);
            }
        } else if header.is_none() && child.style.is_table_header() {
            child.kind = BoxKind::TableRowGroup {
                header: true,
                footer: false,
            };
            header = Some(child);
        } else if footer.is_none() && child.style.is_table_footer() {
            child.kind = BoxKind::TableRowGroup {
                header: false,
                footer: true,
            };
            footer = Some(child);
        } else {
            bodies.push(child);
        }
    }

    let mut ordered = Vec::with_capacity(bodies.len() + 2);
    ordered.extend(header);
    ordered.append(&mut bodies);
    ordered.extend(footer);
    table.content = BoxContent::Block(ordered);

    if top_captions.is_empty() && bottom_captions.is_empty() {
        return table;
    }

    let mut wrapper = if table.style.is_floated() {
        let mut wrapper = BlockBox::new(
            BoxKind::Plain,
            Rc::new(table.style.with_display(DisplayValue::Block)),
            table.element,
        );
        wrapper.floated = table.floated.take();
        table.style = Rc::new(table.style.with_float(Float::None));
        wrapper
    } else {
        BlockBox::new(
            BoxKind::Plain,
            Rc::new(ComputedStyle::anonymous(&table.style, DisplayValue::Block)),
            table.element,
        )
    };
    wrapper.anonymous = true;
    wrapper.from_captioned_table = true;

    let mut content = top_captions;
    content.push(table);
    content.append(&mut bottom_captions);
    wrapper.content = BoxContent::Block(content);
    wrapper
}

/// Give each element's leaves in `items` exactly one start and one end:
/// its first leaf starts it and its last leaf ends it.
fn rebalance_inline_elements(items: &mut [Styleable]) {
    let mut seen: HashSet<Option<NodeId>> = HashSet::new();
    let mut last: HashMap<Option<NodeId>, usize> = HashMap::new();

    for (index, item) in items.iter_mut().enumerate() {
        if let Styleable::Inline(run) = item {
            if seen.insert(run.element) {
                run.starts_here = true;
            }
            let _ = last.insert(run.element, index);
        }
    }

    for index in last.into_values() {
        if let Some(run) = items[index].as_text_run_mut() {
            run.ends_here = true;
        }
    }
}

/// Level of the children a table wrapper, row group or row must have.
const fn next_table_nesting_level(display: DisplayValue) -> Option<DisplayValue> {
    match display {
        DisplayValue::Table | DisplayValue::InlineTable => Some(DisplayValue::TableRowGroup),
        DisplayValue::TableHeaderGroup
        | DisplayValue::TableRowGroup
        | DisplayValue::TableFooterGroup => Some(DisplayValue::TableRow),
        DisplayValue::TableRow => Some(DisplayValue::TableCell),
        _ => None,
    }
}

/// Level of the box a run of `display` items gets wrapped in.
const fn previous_table_nesting_level(display: DisplayValue) -> DisplayValue {
    match display {
        DisplayValue::TableCell => DisplayValue::TableRow,
        DisplayValue::TableRow => DisplayValue::TableRowGroup,
        _ => DisplayValue::Table,
    }
}

/// Whether `child` belongs directly inside `parent` in the table model.
/// Captions are accepted by both table wrappers.
const fn is_proper_table_nesting(parent: DisplayValue, child: DisplayValue) -> bool {
    match parent {
        DisplayValue::Table | DisplayValue::InlineTable => matches!(
            child,
            DisplayValue::TableHeaderGroup
                | DisplayValue::TableRowGroup
                | DisplayValue::TableFooterGroup
                | DisplayValue::TableCaption
        ),
        DisplayValue::TableHeaderGroup
        | DisplayValue::TableRowGroup
        | DisplayValue::TableFooterGroup => matches!(child, DisplayValue::TableRow),
        DisplayValue::TableRow => matches!(child, DisplayValue::TableCell),
        _ => false,
    }
}

/// Whether an item of `display` belongs in a run grouped at `target`.
/// Row-group runs also take header and footer groups and captions.
const fn matches_table_level(target: DisplayValue, display: DisplayValue) -> bool {
    match target {
        DisplayValue::TableRowGroup => matches!(
            display,
            DisplayValue::TableRowGroup
                | DisplayValue::TableHeaderGroup
                | DisplayValue::TableFooterGroup
                | DisplayValue::TableCaption
        ),
        DisplayValue::TableRow => matches!(display, DisplayValue::TableRow),
        DisplayValue::TableCell => matches!(display, DisplayValue::TableCell),
        _ => false,
    }
}

fn contains_orphaned_table_content(children: &[Styleable]) -> bool {
    children
        .iter()
        .any(|child| {
            matches!(child.display(), DisplayValue::TableRow)
                || child.display().is_table_section()
        })
}
