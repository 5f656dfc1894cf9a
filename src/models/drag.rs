// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Press/move/release repositioning of placed markers.

use super::annotation::Point;
use super::session::AnnotationSession;
use crate::error::Result;

/// Capture-based drag of one marker at a time.
///
/// Only the current position matters; no history is kept.
#[derive(Debug, Default)]
pub struct MarkerDragController {
    captured: Option<usize>,
}

impl MarkerDragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marker currently held by the pointer, if any.
    pub fn captured(&self) -> Option<usize> {
        self.captured
    }

    /// Pointer went down at `point`: capture the marker under it.
    pub fn press(&mut self, session: &AnnotationSession, point: Point) -> Option<usize> {
        self.captured = session.marker_at(&point);
        if let Some(index) = self.captured {
            log::debug!("Captured marker {} at ({:.1}, {:.1})", index, point.x, point.y);
        }
        self.captured
    }

    /// Pointer moved while pressed. Returns whether a marker moved.
    pub fn drag(&mut self, session: &mut AnnotationSession, point: Point) -> Result<bool> {
        let Some(index) = self.captured else {
            return Ok(false);
        };
        if let Err(e) = session.drag_marker(index, point) {
            self.captured = None;
            return Err(e);
        }
        Ok(true)
    }

    /// Pointer released; returns the marker that was held.
    pub fn release(&mut self) -> Option<usize> {
        let released = self.captured.take();
        if let Some(index) = released {
            log::debug!("Released marker {}", index);
        }
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::{tests::sample_session, PointerButton};

    #[test]
    fn test_press_outside_markers_captures_nothing() {
        let (mut session, _dir) = sample_session(&["nose", "tail"], 1);
        session.place_marker(Point::new(10.0, 10.0), PointerButton::Secondary).unwrap();

        let mut drag = MarkerDragController::new();
        assert_eq!(drag.press(&session, Point::new(200.0, 200.0)), None);
        assert!(!drag.drag(&mut session, Point::new(50.0, 50.0)).unwrap());
        assert_eq!(session.markers()[0].position, Point::new(10.0, 10.0));
    }

    #[test]
    fn test_capture_move_release() {
        let (mut session, _dir) = sample_session(&["nose", "tail"], 1);
        session.place_marker(Point::new(10.0, 10.0), PointerButton::Secondary).unwrap();

        let mut drag = MarkerDragController::new();
        assert_eq!(drag.press(&session, Point::new(11.0, 9.0)), Some(0));
        assert!(drag.drag(&mut session, Point::new(20.0, 25.0)).unwrap());
        assert!(drag.drag(&mut session, Point::new(22.0, 27.0)).unwrap());
        assert_eq!(drag.release(), Some(0));
        assert_eq!(session.markers()[0].position, Point::new(22.0, 27.0));

        // After release further moves do nothing.
        assert!(!drag.drag(&mut session, Point::new(0.0, 0.0)).unwrap());
        assert_eq!(session.markers()[0].position, Point::new(22.0, 27.0));
    }

    #[test]
    fn test_any_marker_is_draggable() {
        let (mut session, _dir) = sample_session(&["nose", "tail"], 1);
        session.place_marker(Point::new(10.0, 10.0), PointerButton::Secondary).unwrap();
        session.select_body_part("tail").unwrap();
        session.place_marker(Point::new(100.0, 100.0), PointerButton::Secondary).unwrap();

        let mut drag = MarkerDragController::new();
        assert_eq!(drag.press(&session, Point::new(10.0, 10.0)), Some(0));
        drag.drag(&mut session, Point::new(15.0, 15.0)).unwrap();
        drag.release();

        assert_eq!(session.markers()[0].position, Point::new(15.0, 15.0));
        assert_eq!(session.markers()[1].position, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_stale_capture_is_dropped_after_frame_change() {
        let (mut session, _dir) = sample_session(&["nose"], 2);
        session.place_marker(Point::new(10.0, 10.0), PointerButton::Secondary).unwrap();

        let mut drag = MarkerDragController::new();
        drag.press(&session, Point::new(10.0, 10.0));
        session.advance().unwrap();

        assert!(drag.drag(&mut session, Point::new(1.0, 1.0)).is_err());
        assert_eq!(drag.captured(), None);
    }
}
