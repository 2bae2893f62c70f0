use crate::{
    foundation::core::{Point, Size},
    signature::snapshot::SignatureSnapshot,
};

/// Input event recorded by a capture surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StrokeEvent {
    /// Pointer down: start a new stroke at the point.
    Begin(Point),
    /// Pointer move: append to the open stroke (starting one if none is open).
    Extend(Point),
    /// Pointer up: close the open stroke.
    End,
    /// Drop the most recent stroke.
    Undo,
    /// Drop every stroke.
    Clear,
}

/// Append-only log of capture events.
///
/// The log is never rewritten; [`Self::snapshot`] replays it into a fresh immutable
/// [`SignatureSnapshot`], so snapshots taken earlier are unaffected by later input.
#[derive(Clone, Debug)]
pub struct StrokeRecorder {
    canvas: Size,
    events: Vec<StrokeEvent>,
}

impl StrokeRecorder {
    /// Recorder for a surface of `canvas` size.
    pub fn new(canvas: Size) -> Self {
        Self {
            canvas,
            events: Vec::new(),
        }
    }

    /// Record a pointer-down.
    pub fn begin(&mut self, p: Point) {
        self.events.push(StrokeEvent::Begin(p));
    }

    /// Record a pointer-move.
    pub fn extend(&mut self, p: Point) {
        self.events.push(StrokeEvent::Extend(p));
    }

    /// Record a pointer-up.
    pub fn end(&mut self) {
        self.events.push(StrokeEvent::End);
    }

    /// Record an undo of the last stroke.
    pub fn undo(&mut self) {
        self.events.push(StrokeEvent::Undo);
    }

    /// Record a clear.
    pub fn clear(&mut self) {
        self.events.push(StrokeEvent::Clear);
    }

    /// Record an arbitrary event.
    pub fn push(&mut self, event: StrokeEvent) {
        self.events.push(event);
    }

    /// Update the capture surface size (for example after a resize).
    pub fn set_canvas(&mut self, canvas: Size) {
        self.canvas = canvas;
    }

    /// Recorded events in arrival order.
    pub fn events(&self) -> &[StrokeEvent] {
        &self.events
    }

    /// Replay the log into an immutable snapshot.
    pub fn snapshot(&self) -> SignatureSnapshot {
        let mut strokes: Vec<Vec<Point>> = Vec::new();
        let mut open = false;
        for event in &self.events {
            match *event {
                StrokeEvent::Begin(p) => {
                    strokes.push(vec![p]);
                    open = true;
                }
                StrokeEvent::Extend(p) => match strokes.last_mut() {
                    Some(stroke) if open => stroke.push(p),
                    _ => {
                        strokes.push(vec![p]);
                        open = true;
                    }
                },
                StrokeEvent::End => open = false,
                StrokeEvent::Undo => {
                    strokes.pop();
                    open = false;
                }
                StrokeEvent::Clear => {
                    strokes.clear();
                    open = false;
                }
            }
        }
        SignatureSnapshot::new(&strokes, self.canvas)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/signature/capture.rs"]
mod tests;
