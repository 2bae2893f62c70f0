use super::*;
use crate::model::binding::FieldBinding;

const PAGE: Size = Size::new(600.0, 800.0);

fn field() -> FieldConfig {
    FieldConfig::text(FieldBinding::new("f").unwrap(), 0, 0.25, 0.5)
}

#[test]
fn fraction_units_scale_by_page_axes() {
    let f = field()
        .with_units(Unit::Fraction, Unit::Fraction)
        .with_size(0.5, 0.1);
    assert_eq!(resolve_position(&f, PAGE), Point::new(150.0, 400.0));
    assert_eq!(resolve_size(&f, PAGE), Some(Size::new(300.0, 80.0)));
    assert_eq!(resolve_rect(&f, PAGE), Rect::new(150.0, 400.0, 450.0, 480.0));
}

#[test]
fn point_units_pass_through() {
    let f = FieldConfig::text(FieldBinding::new("f").unwrap(), 0, 72.0, 100.0).with_size(50.0, 20.0);
    assert_eq!(resolve_position(&f, PAGE), Point::new(72.0, 100.0));
    assert_eq!(resolve_size(&f, PAGE), Some(Size::new(50.0, 20.0)));
}

#[test]
fn mixed_units_resolve_independently() {
    let f = field()
        .with_units(Unit::Fraction, Unit::Points)
        .with_size(40.0, 12.0);
    assert_eq!(resolve_position(&f, PAGE), Point::new(150.0, 400.0));
    assert_eq!(resolve_size(&f, PAGE), Some(Size::new(40.0, 12.0)));
}

#[test]
fn undeclared_size_is_none() {
    assert_eq!(resolve_size(&field(), PAGE), None);
    assert_eq!(resolve_rect(&field(), PAGE).area(), 0.0);
}
