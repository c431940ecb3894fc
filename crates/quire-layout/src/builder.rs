//! Box tree construction.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! The walker visits the document in order and collects each element's
//! children into a flat [`Styleable`] list: in-flow inline elements are
//! flattened into their parent's list as leaves, everything else becomes a
//! [`BlockBox`] whose own children are collected recursively. When a box's
//! list is complete it is finalized: table parts are normalized, inline runs
//! among blocks are wrapped in anonymous blocks, and whitespace collapses.

use std::rc::Rc;

use quire_css::{ComputedStyle, DisplayValue, PseudoElement};
use quire_dom::NodeId;

use crate::anonymous::resolve_children;
use crate::bidi::{create_inline_leaf, segment_text};
use crate::box_tree::{BlockBox, BoxContent, BoxKind, Styleable, TableColumn};
use crate::context::{ChildBoxInfo, LayoutContext};
use crate::generated::insert_generated_content;
use crate::table::{
    create_block_box, reorder_table_content, resolve_child_table_content, resolve_table_content,
};
use crate::whitespace::strip_all_whitespace;

/// Build the box tree for the document element and everything below it.
///
/// Returns `None` for a document without an element.
pub fn build_box_tree(ctx: &mut LayoutContext<'_>) -> Option<BlockBox> {
    let mut root = create_root_box(ctx)?;
    ensure_children(ctx, &mut root);
    Some(if root.is_table() {
        reorder_table_content(root)
    } else {
        root
    })
}

/// The box of the document element, without children: a table box for
/// `table`/`inline-table`, a plain block otherwise. The element's counters
/// are applied.
pub fn create_root_box(ctx: &mut LayoutContext<'_>) -> Option<BlockBox> {
    let root = ctx.dom.document_element()?;
    let style = ctx.style_of(root);
    ctx.counters.resolve_counters(&style, None);

    let kind = if style.is_table() || style.is_inline_table() {
        BoxKind::table()
    } else {
        BoxKind::Plain
    };
    let mut block = BlockBox::new(kind, style, Some(root));
    block.replaced = ctx.is_replaced(root);
    Some(block)
}

/// Collect and finalize the children of `block` from its element.
///
/// Replaced boxes stay empty. Tables, row groups, rows, and lists that
/// contain table parts go through table normalization after whitespace is
/// stripped.
pub fn ensure_children(ctx: &mut LayoutContext<'_>, block: &mut BlockBox) {
    if block.replaced {
        block.content = BoxContent::Empty;
        return;
    }
    let Some(element) = block.element else {
        return;
    };

    let mut children = Vec::new();
    let mut info = ChildBoxInfo::new();
    ctx.counters.push_scope();
    create_children(ctx, Some(&mut *block), element, &mut children, &mut info, false);
    ctx.counters.pop_scope();

    let nesting = is_nesting_table_content(block.style.display);
    if nesting || info.contains_table_content {
        strip_all_whitespace(&mut children);
        if nesting {
            resolve_table_content(block, children, &mut info);
        } else {
            resolve_child_table_content(block, children, &mut info, DisplayValue::TableCell);
        }
    } else {
        resolve_children(block, children, &info);
    }
}

/// Leaf bookkeeping for one parent's child walk.
struct ChildContext {
    need_start_text: bool,
    need_end_text: bool,
    inline: bool,
    previous_leaf: Option<usize>,
}

/// Append the items generated by `parent`'s children (and its `::before`
/// and `::after`) to `children`.
///
/// `block_parent` is the box whose children are being collected; it is
/// `None` while flattening an inline element. When `inline` is set,
/// `parent` is an inline element and gets start/end leaves around
/// whatever it contributes.
fn create_children(
    ctx: &mut LayoutContext<'_>,
    mut block_parent: Option<&mut BlockBox>,
    parent: NodeId,
    children: &mut Vec<Styleable>,
    info: &mut ChildBoxInfo,
    inline: bool,
) {
    let parent_style = ctx.style_of(parent);

    // children are fixed before ::before so url() images it adds are not walked
    let nodes: Vec<NodeId> = ctx.dom.children(parent).to_vec();

    insert_generated_content(ctx, parent, PseudoElement::Before, children, info);

    let mut context = ChildContext {
        need_start_text: inline,
        need_end_text: inline,
        inline,
        previous_leaf: None,
    };

    for node in nodes {
        if ctx.dom.as_element(node).is_some() {
            create_element_child(
                ctx,
                parent,
                &parent_style,
                block_parent.as_deref_mut(),
                node,
                children,
                info,
                &mut context,
            );
        } else if ctx.dom.as_text(node).is_some() {
            context.need_start_text = false;
            context.need_end_text = false;
            if ctx.dom.tag_name(parent).as_deref() == Some("textarea") {
                continue;
            }
            context.previous_leaf =
                segment_text(ctx, node, parent, &parent_style, context.previous_leaf, children);
        }
    }

    if context.need_start_text || context.need_end_text {
        let mut leaf = create_inline_leaf(ctx, "", parent, &parent_style);
        leaf.starts_here = context.need_start_text;
        leaf.ends_here = context.need_end_text;
        children.push(Styleable::Inline(leaf));
    }

    insert_generated_content(ctx, parent, PseudoElement::After, children, info);
}

#[allow(clippy::too_many_arguments)]
fn create_element_child(
    ctx: &mut LayoutContext<'_>,
    parent: NodeId,
    parent_style: &Rc<ComputedStyle>,
    block_parent: Option<&mut BlockBox>,
    element: NodeId,
    children: &mut Vec<Styleable>,
    info: &mut ChildBoxInfo,
    context: &mut ChildContext,
) {
    let mut style = ctx.style_of(element);
    if style.is_display_none() {
        return;
    }

    resolve_element_counters(ctx, element, &style);

    // [§ 17.2 The CSS table model]
    // "table-column ... does not generate a box"; columns are recorded on
    // the enclosing table instead.
    if style.is_table_column_or_group() {
        if let Some(table) = block_parent.filter(|b| b.is_table()) {
            add_columns(ctx, table, element, &style);
        }
        return;
    }

    if style.is_footnote() {
        create_footnote(ctx, parent, parent_style, element, &style, children, info);
        return;
    }

    let replaced = ctx.is_replaced(element);
    if replaced && style.is_inline() {
        style = Rc::new(style.with_display(DisplayValue::InlineBlock));
    }

    if style.is_inline() {
        if context.need_start_text {
            context.need_start_text = false;
            let mut leaf = create_inline_leaf(ctx, "", parent, parent_style);
            leaf.starts_here = true;
            children.push(Styleable::Inline(leaf));
            context.previous_leaf = Some(children.len() - 1);
        }

        ctx.counters.push_scope();
        create_children(ctx, None, element, children, info, true);
        ctx.counters.pop_scope();

        if context.inline {
            if let Some(run) = context
                .previous_leaf
                .and_then(|index| children.get_mut(index))
                .and_then(Styleable::as_text_run_mut)
            {
                run.ends_here = false;
            }
            context.need_end_text = true;
        }
        return;
    }

    let block = create_element_box(ctx, element, style, replaced, info);
    children.push(Styleable::Box(block));
}

/// Build and finalize the box of a non-inline element.
fn create_element_box(
    ctx: &mut LayoutContext<'_>,
    element: NodeId,
    style: Rc<ComputedStyle>,
    replaced: bool,
    info: &mut ChildBoxInfo,
) -> BlockBox {
    let columns = style.has_columns() && ctx.options.paged;
    let mut block = if columns {
        BlockBox::new(BoxKind::ColumnContainer, Rc::clone(&style), Some(element))
    } else {
        create_block_box(Rc::clone(&style), Some(element), info, false)
    };
    block.replaced = replaced;

    if style.is_list_item() {
        block.list_counter = Some(ctx.counters.current_value(crate::counters::LIST_ITEM));
    }

    if !info.contains_block_level_content && !style.is_laid_out_in_inline_context() {
        info.contains_block_level_content = true;
    }

    if style.may_have_first_line() {
        block.first_line_style = ctx.styles.pseudo_style(element, PseudoElement::FirstLine);
    }
    if style.may_have_first_letter() {
        block.first_letter_style = ctx.styles.pseudo_style(element, PseudoElement::FirstLetter);
    }

    if columns {
        // [§ 2 The multi-column model](https://www.w3.org/TR/css-multicol-1/#the-multi-column-model)
        let column_style = Rc::new(ComputedStyle::anonymous(&style, DisplayValue::Block));
        let mut column = BlockBox::new(BoxKind::Plain, column_style, Some(element));
        ensure_children(ctx, &mut column);
        block.content = BoxContent::Block(vec![column]);
    } else {
        ensure_children(ctx, &mut block);
    }

    let block = if block.is_table() {
        reorder_table_content(block)
    } else {
        block
    };

    if let Some(name) = style.running_name() {
        ctx.running.register(name, block.clone());
    }
    block
}

/// [§ 2 Footnotes](https://www.w3.org/TR/css-gcpm-3/#footnotes)
///
/// "Elements with float: footnote are removed from the flow and a
/// ::footnote-call pseudo-element is inserted in their place."
///
/// The body is built in its own layer and attached to an empty marker leaf
/// that stays in the flow, followed by the `::footnote-call`.
fn create_footnote(
    ctx: &mut LayoutContext<'_>,
    parent: NodeId,
    parent_style: &Rc<ComputedStyle>,
    element: NodeId,
    style: &Rc<ComputedStyle>,
    children: &mut Vec<Styleable>,
    info: &mut ChildBoxInfo,
) {
    let body_style = Rc::new(ComputedStyle::anonymous(style, DisplayValue::Block));
    let mut body = BlockBox::new(BoxKind::Plain, body_style, Some(element));
    body.layer = Some(ctx.layers.push());

    let mut body_children = Vec::new();
    let mut body_info = ChildBoxInfo::new();
    ctx.counters.push_scope();
    insert_generated_content(
        ctx,
        element,
        PseudoElement::FootnoteMarker,
        &mut body_children,
        &mut body_info,
    );
    create_children(
        ctx,
        Some(&mut body),
        element,
        &mut body_children,
        &mut body_info,
        style.is_inline(),
    );
    resolve_children(&mut body, body_children, &body_info);
    let _ = ctx.layers.pop();

    let mut marker = create_inline_leaf(ctx, "", parent, parent_style);
    marker.starts_here = true;
    marker.ends_here = true;
    marker.footnote = Some(Box::new(body));
    children.push(Styleable::Inline(marker));

    insert_generated_content(ctx, element, PseudoElement::FootnoteCall, children, info);
    ctx.counters.pop_scope();
}

/// Apply an element's counters, honoring `ol[start]` and `li[value]`.
fn resolve_element_counters(ctx: &mut LayoutContext<'_>, element: NodeId, style: &ComputedStyle) {
    let attribute = match ctx.dom.tag_name(element).as_deref() {
        Some("ol") => ctx.dom.attr(element, "start"),
        Some("li") => ctx.dom.attr(element, "value"),
        _ => None,
    };
    let explicit_reset = attribute
        .and_then(|value| value.trim().parse::<i32>().ok())
        .map(|value| value.wrapping_sub(1));
    ctx.counters.resolve_counters(style, explicit_reset);
}

/// [§ 17.2](https://www.w3.org/TR/CSS2/tables.html#table-display)
///
/// Register a `table-column` element, or each `table-column` child of a
/// `table-column-group` (the group itself if it has none).
fn add_columns(
    ctx: &mut LayoutContext<'_>,
    table: &mut BlockBox,
    element: NodeId,
    style: &Rc<ComputedStyle>,
) {
    if style.display == DisplayValue::TableColumn {
        table.add_column(TableColumn {
            element,
            style: Rc::clone(style),
            group: None,
        });
        return;
    }

    let mut found = false;
    let nodes: Vec<NodeId> = ctx.dom.children(element).to_vec();
    for child in nodes {
        if ctx.dom.as_element(child).is_none() {
            continue;
        }
        let child_style = ctx.style_of(child);
        if child_style.display == DisplayValue::TableColumn {
            found = true;
            table.add_column(TableColumn {
                element: child,
                style: child_style,
                group: Some(element),
            });
        }
    }

    if !found {
        table.add_column(TableColumn {
            element,
            style: Rc::clone(style),
            group: None,
        });
    }
}

/// Displays whose children must be table parts of the next level.
const fn is_nesting_table_content(display: DisplayValue) -> bool {
    matches!(
        display,
        DisplayValue::Table
            | DisplayValue::InlineTable
            | DisplayValue::TableHeaderGroup
            | DisplayValue::TableRowGroup
            | DisplayValue::TableFooterGroup
            | DisplayValue::TableRow
    )
}
