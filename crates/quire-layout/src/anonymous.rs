//! Anonymous block insertion and child-list finalization.
//!
//! [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
//!
//! "if a block container box has a block-level box inside it, then we force
//! it to have only block-level boxes inside it."

use std::rc::Rc;

use quire_css::{ComputedStyle, DisplayValue};

use crate::box_tree::{BlockBox, BoxContent, BoxKind, OpenInline, Styleable};
use crate::context::ChildBoxInfo;
use crate::whitespace::strip_inline_content;

/// Move a collected child list into `parent` in its final content mode.
///
/// - no children: [`BoxContent::Empty`]
/// - any block-level child: inline runs are wrapped in anonymous blocks
/// - otherwise the inline list is whitespace-collapsed and kept if anything
///   survives
pub fn resolve_children(parent: &mut BlockBox, mut children: Vec<Styleable>, info: &ChildBoxInfo) {
    if children.is_empty() {
        parent.content = BoxContent::Empty;
    } else if info.contains_block_level_content {
        insert_anonymous_blocks(parent, children, info.layout_running_blocks);
    } else {
        strip_inline_content(&mut children);
        parent.content = if children.is_empty() {
            BoxContent::Empty
        } else {
            BoxContent::Inline(children)
        };
    }
}

/// Wrap every maximal run of inline-context children in an anonymous block
/// and give `parent` block content.
///
/// Each wrapper records the inline elements still open at the point where
/// the run was cut (the elements whose start leaf has been seen but not
/// their end leaf), so layout can reopen them in the next wrapper.
///
/// With `layout_running_blocks`, running boxes are block-level here.
pub fn insert_anonymous_blocks(
    parent: &mut BlockBox,
    children: Vec<Styleable>,
    layout_running_blocks: bool,
) {
    let mut blocks: Vec<BlockBox> = Vec::new();
    let mut inline: Vec<Styleable> = Vec::new();
    let mut open: Vec<OpenInline> = Vec::new();
    let mut saved: Vec<OpenInline> = Vec::new();

    for child in children {
        match child {
            Styleable::Box(block) if !goes_inline(&block.style, layout_running_blocks) => {
                if !inline.is_empty() {
                    let run = std::mem::take(&mut inline);
                    if let Some(anonymous) = create_anonymous_block(parent, run, saved) {
                        blocks.push(anonymous);
                    }
                    saved = open.clone();
                }
                blocks.push(block);
            }
            other => {
                if let Styleable::Inline(run) = &other {
                    if run.starts_here {
                        open.push(OpenInline {
                            element: run.element,
                            style: Rc::clone(&run.style),
                            pseudo: run.pseudo,
                        });
                    }
                    if run.ends_here {
                        let _ = open.pop();
                    }
                }
                inline.push(other);
            }
        }
    }

    if !inline.is_empty() {
        if let Some(anonymous) = create_anonymous_block(parent, inline, saved) {
            blocks.push(anonymous);
        }
    }

    parent.content = BoxContent::Block(blocks);
}

/// An item that stays in the current inline run.
fn goes_inline(style: &ComputedStyle, layout_running_blocks: bool) -> bool {
    style.is_laid_out_in_inline_context()
        && !(layout_running_blocks && style.is_running())
        && !style.is_table_cell()
}

/// An anonymous block around `run`, or `None` if the run collapses to
/// nothing.
fn create_anonymous_block(
    parent: &BlockBox,
    mut run: Vec<Styleable>,
    open_inline: Vec<OpenInline>,
) -> Option<BlockBox> {
    strip_inline_content(&mut run);
    if run.is_empty() {
        return None;
    }

    let style = Rc::new(ComputedStyle::anonymous(&parent.style, DisplayValue::Block));
    let mut anonymous = BlockBox::anonymous(
        BoxKind::AnonymousBlock { open_inline },
        style,
        parent.element,
    );
    anonymous.content = BoxContent::Inline(run);
    Some(anonymous)
}
