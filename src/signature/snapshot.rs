use std::sync::Arc;

use crate::foundation::core::{Point, Size};

/// Immutable capture of freehand ink strokes.
///
/// Points are expressed in the coordinate space of the capture canvas, which is independent of
/// the field box the signature is later drawn into.
#[derive(Clone, Debug, PartialEq)]
pub struct SignatureSnapshot {
    strokes: Arc<[Vec<Point>]>,
    canvas: Size,
}

impl SignatureSnapshot {
    /// Deep-copy `strokes` into a new snapshot captured on a `canvas`-sized surface.
    pub fn new(strokes: &[Vec<Point>], canvas: Size) -> Self {
        Self {
            strokes: strokes.iter().cloned().collect(),
            canvas,
        }
    }

    /// Snapshot with no strokes.
    pub fn empty(canvas: Size) -> Self {
        Self::new(&[], canvas)
    }

    /// Ordered strokes, each an ordered list of points.
    pub fn strokes(&self) -> &[Vec<Point>] {
        &self.strokes
    }

    /// Size of the surface the points were captured on.
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    /// Number of strokes, including taps.
    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    /// Total number of points across all strokes.
    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(Vec::len).sum()
    }

    /// `true` when at least one stroke has two or more points. Taps do not count.
    pub fn has_signature(&self) -> bool {
        self.strokes.iter().any(|s| s.len() >= 2)
    }

    /// Inverse of [`Self::has_signature`].
    pub fn is_empty(&self) -> bool {
        !self.has_signature()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/signature/snapshot.rs"]
mod tests;
