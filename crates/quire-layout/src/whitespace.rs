//! Whitespace collapsing for inline content.
//!
//! [§ 4.1.1 Phase I: Collapsing and Transformation](https://www.w3.org/TR/css-text-3/#white-space-phase-1)
//!
//! Collapsing happens across leaf boundaries: a space ending one leaf
//! swallows the leading space of the next. Out-of-flow boxes are transparent
//! to this, atomic inlines are not.

use quire_css::{ComputedStyle, WhiteSpace};

use crate::box_tree::{Styleable, TextRun};

/// Collapse whitespace in a sequence of inline-level items.
///
/// If nothing but removable whitespace remains, every leaf is emptied, and
/// when none of them belongs to an element (so no element needs a start or
/// end marker) the leaves are removed altogether.
pub fn strip_inline_content(items: &mut Vec<Styleable>) {
    let mut all_whitespace = true;
    let mut collapse_leading = true;

    for item in items.iter_mut() {
        match item {
            Styleable::Inline(run) => {
                collapse_leading = strip_whitespace(run, collapse_leading);
                if !run.is_removable_whitespace() {
                    all_whitespace = false;
                }
            }
            Styleable::Box(b) => {
                if !can_collapse_through(&b.style) {
                    all_whitespace = false;
                    collapse_leading = false;
                }
            }
        }
    }

    if all_whitespace {
        strip_text_content(items);
    }
}

/// Apply [`strip_inline_content`] to every maximal sub-run of items laid
/// out in inline context, leaving block-level items untouched.
pub fn strip_all_whitespace(items: &mut Vec<Styleable>) {
    let mut result = Vec::with_capacity(items.len());
    let mut run = Vec::new();

    for item in items.drain(..) {
        if item.is_laid_out_in_inline_context() {
            run.push(item);
        } else {
            strip_inline_content(&mut run);
            result.append(&mut run);
            result.push(item);
        }
    }
    strip_inline_content(&mut run);
    result.append(&mut run);

    *items = result;
}

/// Collapse one leaf. Returns whether the next leaf's leading space
/// collapses.
fn strip_whitespace(run: &mut TextRun, collapse_leading: bool) -> bool {
    let white_space = run.style.white_space;
    if !white_space.collapses_spaces() {
        return false;
    }

    let mut text = collapse_text(white_space, &run.text);
    if collapse_leading && text.starts_with(' ') {
        let _ = text.remove(0);
    }

    let collapse_next = if text.is_empty() {
        collapse_leading
    } else {
        text.ends_with(' ') || text.ends_with('\n')
    };
    run.text = text;
    collapse_next
}

fn collapse_text(white_space: WhiteSpace, text: &str) -> String {
    let keep_newlines = !white_space.collapses_newlines();
    let mut out = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\n' | '\r' if keep_newlines => {
                // spaces before a preserved break are dropped
                while out.ends_with(' ') {
                    let _ = out.pop();
                }
                if c == '\n' {
                    out.push('\n');
                }
            }
            ' ' | '\t' | '\n' | '\r' => {
                if !out.ends_with(' ') && !(keep_newlines && out.ends_with('\n')) {
                    out.push(' ');
                }
            }
            _ => out.push(c),
        }
    }
    out
}

fn can_collapse_through(style: &ComputedStyle) -> bool {
    style.is_out_of_flow()
}

fn strip_text_content(items: &mut Vec<Styleable>) {
    let mut only_anonymous = true;
    for item in items.iter_mut() {
        if let Styleable::Inline(run) = item {
            if run.element.is_some() {
                only_anonymous = false;
            }
            run.text.clear();
        }
    }

    if only_anonymous {
        items.retain(|item| !matches!(item, Styleable::Inline(_)));
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use quire_css::DisplayValue;
    use quire_dom::NodeId;

    use super::*;
    use crate::box_tree::{BlockBox, BoxKind};

    fn leaf(text: &str, white_space: WhiteSpace, element: Option<NodeId>) -> Styleable {
        let style = Rc::new(ComputedStyle {
            white_space,
            ..ComputedStyle::default()
        });
        Styleable::Inline(TextRun::new(text, style, element))
    }

    fn texts(items: &[Styleable]) -> Vec<String> {
        items
            .iter()
            .filter_map(Styleable::as_text_run)
            .map(|run| run.text.clone())
            .collect()
    }

    #[test]
    fn test_collapse_across_leaves() {
        let mut items = vec![
            leaf("  hello   ", WhiteSpace::Normal, None),
            leaf(" world\n", WhiteSpace::Normal, None),
        ];
        strip_inline_content(&mut items);
        assert_eq!(texts(&items), vec!["hello ", "world "]);
    }

    #[test]
    fn test_pre_is_preserved() {
        let mut items = vec![leaf("  a  b ", WhiteSpace::Pre, None)];
        strip_inline_content(&mut items);
        assert_eq!(texts(&items), vec!["  a  b "]);
    }

    #[test]
    fn test_pre_line_keeps_breaks() {
        let mut items = vec![leaf("a  \n  b", WhiteSpace::PreLine, None)];
        strip_inline_content(&mut items);
        assert_eq!(texts(&items), vec!["a\nb"]);
    }

    #[test]
    fn test_anonymous_whitespace_is_removed() {
        let mut items = vec![leaf(" \n\t ", WhiteSpace::Normal, None)];
        strip_inline_content(&mut items);
        assert!(items.is_empty());
    }

    #[test]
    fn test_element_whitespace_is_truncated_not_removed() {
        let mut items = vec![
            leaf(" ", WhiteSpace::Normal, Some(NodeId(4))),
            leaf("  ", WhiteSpace::Normal, None),
        ];
        strip_inline_content(&mut items);
        assert_eq!(texts(&items), vec!["", ""]);
    }

    #[test]
    fn test_strip_all_whitespace_splits_at_blocks() {
        let block = BlockBox::new(
            BoxKind::TableCell,
            Rc::new(ComputedStyle {
                display: DisplayValue::TableCell,
                ..ComputedStyle::default()
            }),
            Some(NodeId(2)),
        );
        let mut items = vec![
            leaf("  ", WhiteSpace::Normal, None),
            Styleable::Box(block),
            leaf(" x ", WhiteSpace::Normal, None),
        ];
        strip_all_whitespace(&mut items);
        assert_eq!(items.len(), 2);
        assert!(items[0].as_box().is_some());
        assert_eq!(texts(&items), vec!["x "]);
    }
}
