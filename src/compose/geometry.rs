use crate::{
    foundation::core::{Point, Rect, Size},
    model::field::{FieldConfig, Unit},
};

/// Field position in page points (top-left origin).
pub fn resolve_position(field: &FieldConfig, page: Size) -> Point {
    let p = field.position();
    match field.position_unit() {
        Unit::Fraction => Point::new(p.x * page.width, p.y * page.height),
        Unit::Points => p,
    }
}

/// Field size in page points, or `None` when the field declares no size.
pub fn resolve_size(field: &FieldConfig, page: Size) -> Option<Size> {
    let s = field.size()?;
    Some(match field.size_unit() {
        Unit::Fraction => Size::new(s.width * page.width, s.height * page.height),
        Unit::Points => s,
    })
}

/// Field box in page points; undeclared sizes yield a zero-size rect at the position.
pub fn resolve_rect(field: &FieldConfig, page: Size) -> Rect {
    Rect::from_origin_size(
        resolve_position(field, page),
        resolve_size(field, page).unwrap_or(Size::ZERO),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/compose/geometry.rs"]
mod tests;
