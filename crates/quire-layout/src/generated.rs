//! Generated content.
//!
//! [§ 12.1 The :before and :after pseudo-elements](https://www.w3.org/TR/CSS2/generate.html#before-after-content)
//!
//! "Authors specify the style and location of generated content with the
//! :before and :after pseudo-elements."
//!
//! Each value of a `content` list becomes an inline leaf, an image box, or
//! (in page margins) a copy of a running element. The results are then
//! wrapped according to the pseudo-element's display.

use std::rc::Rc;

use quire_common::warning::warn_once;
use quire_css::{
    ComputedStyle, ContentProperty, ContentValue, DisplayValue, FunctionValue, ListStyleType,
    PseudoElement,
};
use quire_dom::NodeId;

use crate::box_tree::{BlockBox, BoxContent, BoxKind, DynamicContent, Styleable, TextRun};
use crate::context::{ChildBoxInfo, LayoutContext};
use crate::counters::FOOTNOTE;
use crate::running::RunningPosition;
use crate::table::create_block_box;

/// Where a `content` list is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentMode {
    /// Pseudo-elements in the document: `counter()`, `counters()` and
    /// `attr()` are available.
    Document,
    /// Page-margin boxes: `element()` is available.
    MarginBox,
}

/// Resolve each value of a `content` list to items.
///
/// Text leaves start and end their element and carry `pseudo`. Image boxes
/// and running-element copies set `contains_block_level_content` on `info`.
/// Unusable values are reported with a warning and skipped.
pub fn resolve_content(
    ctx: &mut LayoutContext<'_>,
    source: Option<NodeId>,
    values: &[ContentValue],
    pseudo: Option<PseudoElement>,
    style: &Rc<ComputedStyle>,
    mode: ContentMode,
    info: &mut ChildBoxInfo,
) -> Vec<Styleable> {
    let mut items = Vec::new();

    for value in values {
        let mut dynamic = None;
        let text = match value {
            ContentValue::String(s) => Some(s.clone()),
            ContentValue::Uri(uri) => {
                items.push(Styleable::Box(create_image_box(ctx, source, uri)));
                info.contains_block_level_content = true;
                continue;
            }
            ContentValue::Ident(ident) => quote_text(style, ident),
            ContentValue::Function(function) => {
                if mode == ContentMode::Document && function.name == "attr" {
                    Some(attr_text(ctx, source, function))
                } else if let Some(text) = (mode == ContentMode::Document)
                    .then(|| counter_text(ctx, function))
                    .flatten()
                {
                    Some(text)
                } else if mode == ContentMode::MarginBox && function.name == "element" {
                    if let Some(copy) = running_copy(ctx, function) {
                        items.push(Styleable::Box(copy));
                        info.contains_block_level_content = true;
                    }
                    continue;
                } else if let Some(handler) = ctx.functions.lookup(function) {
                    if handler.is_static() {
                        handler.calculate(function)
                    } else {
                        let text = handler.layout_replacement_text();
                        dynamic = Some(DynamicContent {
                            function: handler,
                            value: function.clone(),
                        });
                        Some(text)
                    }
                } else {
                    if !matches!(function.name.as_str(), "counter" | "counters") {
                        warn_once(
                            "content",
                            &format!("unsupported content function '{}()'", function.name),
                        );
                    }
                    None
                }
            }
        };

        if let Some(text) = text {
            let mut leaf = TextRun::new(&text, Rc::clone(style), source);
            leaf.starts_here = true;
            leaf.ends_here = true;
            leaf.pseudo = pseudo;
            leaf.dynamic = dynamic;
            items.push(Styleable::Inline(leaf));
        }
    }
    items
}

/// Append the boxes of `element`'s `pseudo` pseudo-element to `children`.
///
/// Nothing is generated without a pseudo style, for `display: none`, for
/// `content: none`, or for `content: normal`. Table displays on a
/// pseudo-element compute to `block`. Counters of the pseudo style are
/// applied before its content is resolved.
pub(crate) fn insert_generated_content(
    ctx: &mut LayoutContext<'_>,
    element: NodeId,
    pseudo: PseudoElement,
    children: &mut Vec<Styleable>,
    info: &mut ChildBoxInfo,
) {
    let Some(style) = ctx.styles.pseudo_style(element, pseudo) else {
        return;
    };
    if style.is_display_none() {
        return;
    }
    if !matches!(style.content, ContentProperty::List(_)) {
        return;
    }

    let style = if style.is_table()
        || style.is_inline_table()
        || style.is_table_row()
        || style.is_table_section()
    {
        Rc::new(style.with_display(DisplayValue::Block))
    } else {
        style
    };

    ctx.counters.resolve_counters(&style, None);

    if let ContentProperty::List(values) = &style.content {
        let generated = create_generated_content(ctx, element, pseudo, &style, values, info);
        children.extend(generated);
    }
}

fn create_generated_content(
    ctx: &mut LayoutContext<'_>,
    element: NodeId,
    pseudo: PseudoElement,
    style: &Rc<ComputedStyle>,
    values: &[ContentValue],
    info: &mut ChildBoxInfo,
) -> Vec<Styleable> {
    if style.is_display_none() || style.is_table_column_or_group() {
        return Vec::new();
    }

    let mut content_info = ChildBoxInfo::new();
    let items = resolve_content(
        ctx,
        Some(element),
        values,
        Some(pseudo),
        style,
        ContentMode::Document,
        &mut content_info,
    );

    // STEP 1: Inline pseudo-elements with only text contribute their leaves
    // directly.
    if !content_info.contains_block_level_content && style.is_inline() {
        return items
            .into_iter()
            .map(|item| match item {
                Styleable::Inline(mut run) => {
                    run.restyle(Rc::clone(style));
                    Styleable::Inline(run)
                }
                other => other,
            })
            .collect();
    }

    // STEP 2: Everything else gets one box around anonymous inline leaves.
    let mut result = create_block_box(Rc::clone(style), Some(element), info, true);
    if content_info.contains_block_level_content && (style.is_inline() || style.is_inline_block()) {
        result.style = Rc::new(style.with_display(DisplayValue::InlineBlock));
    }
    result.pseudo = Some(pseudo);

    let inlines = anonymize_leaves(items, style);
    result.content = if inlines.is_empty() {
        BoxContent::Empty
    } else {
        BoxContent::Inline(inlines)
    };

    if !result.style.is_laid_out_in_inline_context() {
        info.contains_block_level_content = true;
    }
    vec![Styleable::Box(result)]
}

/// Resolve the `content` of a page-margin box. Leaves lose their element
/// and take an anonymous inline style.
pub(crate) fn create_margin_box_content(
    ctx: &mut LayoutContext<'_>,
    source: Option<NodeId>,
    values: &[ContentValue],
    style: &Rc<ComputedStyle>,
    info: &mut ChildBoxInfo,
) -> Vec<Styleable> {
    let items = resolve_content(ctx, source, values, None, style, ContentMode::MarginBox, info);
    anonymize_leaves(items, style)
}

fn anonymize_leaves(items: Vec<Styleable>, style: &Rc<ComputedStyle>) -> Vec<Styleable> {
    let anonymous = Rc::new(ComputedStyle::anonymous(style, DisplayValue::Inline));
    items
        .into_iter()
        .map(|item| match item {
            Styleable::Inline(mut run) => {
                run.restyle(Rc::clone(&anonymous));
                run.element = None;
                Styleable::Inline(run)
            }
            other => other,
        })
        .collect()
}

/// [§ 12.2](https://www.w3.org/TR/CSS2/generate.html#content)
///
/// "The value is a URI that designates an external resource (such as an
/// image)." A detached-from-flow `img` element is created under `source` to
/// carry the URI; the replaced box is inline-block.
fn create_image_box(ctx: &mut LayoutContext<'_>, source: Option<NodeId>, uri: &str) -> BlockBox {
    let image = ctx.dom.create_element("img", &[("src", uri)]);
    if let Some(owner) = source.or_else(|| ctx.dom.document_element()) {
        ctx.dom.append_child(owner, image);
    }

    let style = Rc::new(ComputedStyle {
        display: DisplayValue::InlineBlock,
        ..ComputedStyle::default()
    });
    let mut image_box = BlockBox::new(BoxKind::Plain, style, Some(image));
    image_box.replaced = true;
    image_box
}

/// [§ 12.3 Quotation marks](https://www.w3.org/TR/CSS2/generate.html#quotes)
fn quote_text(style: &ComputedStyle, ident: &str) -> Option<String> {
    match ident {
        "open-quote" => style.quotes.get(0).map(str::to_string),
        "close-quote" => style.quotes.get(1).map(str::to_string),
        "no-open-quote" | "no-close-quote" => None,
        other => {
            warn_once("content", &format!("unsupported content keyword '{other}'"));
            None
        }
    }
}

/// "attr(X) ... returns as a string the value of attribute X for the
/// subject of the selector."
fn attr_text(ctx: &LayoutContext<'_>, source: Option<NodeId>, function: &FunctionValue) -> String {
    let Some(name) = function.ident_arg(0).filter(|_| function.args.len() == 1) else {
        warn_once("content", "attr() takes exactly one attribute name");
        return String::new();
    };
    source
        .and_then(|node| ctx.dom.attr(node, name))
        .unwrap_or_default()
        .to_string()
}

/// [§ 12.4 Automatic counters and numbering](https://www.w3.org/TR/CSS2/generate.html#counters)
///
/// `counter(name[, style])` and `counters(name, separator[, style])`.
/// Returns `None` for `counter(page)`/`counter(pages)`, which belong to the
/// content function registry, and for malformed calls.
fn counter_text(ctx: &mut LayoutContext<'_>, function: &FunctionValue) -> Option<String> {
    match function.name.as_str() {
        "counter" => {
            let name = function.ident_arg(0);
            if name.is_none() || function.args.len() > 2 {
                warn_once("content", "counter() takes a counter name and an optional style");
                return None;
            }
            let name = name?;
            if matches!(name, "page" | "pages") {
                return None;
            }
            let list_style = counter_style(function, 1)?;
            let value = if name == FOOTNOTE {
                ctx.counters.global_value(FOOTNOTE)
            } else {
                ctx.counters.current_value(name)
            };
            Some(list_style.format(value))
        }
        "counters" => {
            let (Some(name), Some(separator)) = (function.ident_arg(0), function.string_arg(1))
            else {
                warn_once(
                    "content",
                    "counters() takes a counter name, a separator string and an optional style",
                );
                return None;
            };
            if function.args.len() > 3 {
                warn_once(
                    "content",
                    "counters() takes a counter name, a separator string and an optional style",
                );
                return None;
            }
            let list_style = counter_style(function, 2)?;
            let values = ctx.counters.current_values(name);
            Some(
                values
                    .into_iter()
                    .map(|value| list_style.format(value))
                    .collect::<Vec<_>>()
                    .join(separator),
            )
        }
        _ => None,
    }
}

/// Optional counter style argument at `index`. Unknown keywords fall back
/// to decimal; a non-identifier argument makes the call malformed.
fn counter_style(function: &FunctionValue, index: usize) -> Option<ListStyleType> {
    match function.args.get(index) {
        None => Some(ListStyleType::Decimal),
        Some(ContentValue::Ident(ident)) => {
            Some(ident.parse().unwrap_or(ListStyleType::Decimal))
        }
        Some(_) => {
            warn_once(
                "content",
                &format!("counter style of {}() must be an identifier", function.name),
            );
            None
        }
    }
}

/// [§ 1.3.1 The element() value](https://www.w3.org/TR/css-gcpm-3/#element-syntax)
///
/// A copy of the running box `element(name[, position])` refers to.
fn running_copy(ctx: &LayoutContext<'_>, function: &FunctionValue) -> Option<BlockBox> {
    let Some(name) = function.ident_arg(0).filter(|_| function.args.len() <= 2) else {
        warn_once("content", "element() takes a running name and an optional position");
        return None;
    };
    let position = match function.args.get(1) {
        None => RunningPosition::First,
        Some(ContentValue::Ident(keyword)) => keyword.parse().unwrap_or_else(|_| {
            warn_once("content", &format!("unknown element() position '{keyword}'"));
            RunningPosition::First
        }),
        Some(_) => {
            warn_once("content", "element() position must be a keyword");
            RunningPosition::First
        }
    };
    ctx.running.lookup(name, position).cloned()
}
