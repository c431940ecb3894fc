//! Integration tests for the style model and user-agent defaults.

use std::rc::Rc;

use quire_css::{
    ComputedStyle, ContentProperty, ContentValue, CounterData, DisplayValue, ListStyleType,
    Position, default_display_for_element, default_style,
};

#[test]
fn test_default_display_block() {
    assert_eq!(default_display_for_element("div"), DisplayValue::Block);
    assert_eq!(default_display_for_element("P"), DisplayValue::Block);
}

#[test]
fn test_default_display_inline() {
    assert_eq!(default_display_for_element("span"), DisplayValue::Inline);
    assert_eq!(default_display_for_element("img"), DisplayValue::Inline);
}

#[test]
fn test_default_display_none() {
    assert_eq!(default_display_for_element("script"), DisplayValue::None);
    assert_eq!(default_display_for_element("head"), DisplayValue::None);
}

#[test]
fn test_default_display_tables() {
    assert_eq!(default_display_for_element("table"), DisplayValue::Table);
    assert_eq!(default_display_for_element("thead"), DisplayValue::TableHeaderGroup);
    assert_eq!(default_display_for_element("tr"), DisplayValue::TableRow);
    assert_eq!(default_display_for_element("th"), DisplayValue::TableCell);
    assert_eq!(default_display_for_element("col"), DisplayValue::TableColumn);
    assert_eq!(default_display_for_element("li"), DisplayValue::ListItem);
}

#[test]
fn test_default_style_lists_reset_list_item() {
    let ol = default_style("ol", None);
    assert_eq!(ol.counter_reset, vec![CounterData::new("list-item", 0)]);
    assert_eq!(ol.list_style_type, ListStyleType::Decimal);
}

#[test]
fn test_default_style_inherits_from_parent() {
    let mut parent = ComputedStyle::default();
    parent.set_property("text-transform", "uppercase").unwrap();
    parent.set_property("display", "block").unwrap();
    let parent = Rc::new(parent);

    let span = default_style("span", Some(&parent));
    assert_eq!(span.display, DisplayValue::Inline);
    assert_eq!(span.text_transform.apply("abc"), "ABC");
    assert!(!span.is_parent_inline());
}

#[test]
fn test_display_round_trips_through_strum() {
    for keyword in ["table-header-group", "inline-table", "-fs-footnote", "list-item"] {
        let display: DisplayValue = keyword.parse().unwrap();
        assert_eq!(display.to_string(), keyword);
    }
}

#[test]
fn test_set_content_and_position() {
    let mut style = ComputedStyle::default();
    style.set_property("content", "\"§\" counter(chapter)").unwrap();
    style.set_property("position", "running(footer)").unwrap();
    style.set_property("column-count", "2").unwrap();

    let ContentProperty::List(values) = &style.content else {
        panic!("expected a content list");
    };
    assert_eq!(values[0], ContentValue::String("§".to_string()));
    assert_eq!(style.position, Position::Running("footer".to_string()));
    assert!(style.has_columns());
}
