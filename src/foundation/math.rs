use crate::foundation::core::{Rect, Size};

/// Tolerance used when comparing resolved geometry for cache lookups.
pub(crate) const GEOMETRY_EPSILON: f64 = 1e-6;

pub(crate) fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= GEOMETRY_EPSILON
}

/// Largest rect with `content`'s aspect ratio that fits inside `frame`, centred in it.
///
/// Degenerate content collapses to a zero-size rect at the frame centre.
pub(crate) fn fit_contain(content: Size, frame: Rect) -> Rect {
    let center = frame.center();
    if content.width <= 0.0 || content.height <= 0.0 || frame.width() <= 0.0 || frame.height() <= 0.0
    {
        return Rect::from_center_size(center, Size::ZERO);
    }
    let scale = (frame.width() / content.width).min(frame.height() / content.height);
    Rect::from_center_size(center, Size::new(content.width * scale, content.height * scale))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
