// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! Markers are stored in image pixel coordinates; the canvas shows the
//! frame scaled to fit, so pointer positions have to be mapped between
//! the displayed rectangle and the image grid.

use crate::models::annotation::Point;

/// Convert a position relative to the displayed image's top-left corner
/// into image pixel coordinates.
pub fn display_to_image(
    rel_x: f64,
    rel_y: f64,
    display_width: f64,
    display_height: f64,
    width: u32,
    height: u32,
) -> Point {
    Point {
        x: rel_x / display_width * width as f64,
        y: rel_y / display_height * height as f64,
    }
}

/// Convert image pixel coordinates into an offset from the displayed
/// image's top-left corner.
pub fn image_to_display(
    point: &Point,
    display_width: f64,
    display_height: f64,
    width: u32,
    height: u32,
) -> (f64, f64) {
    (
        point.x / width as f64 * display_width,
        point.y / height as f64 * display_height,
    )
}

/// Euclidean distance between two points.
pub fn distance(a: &Point, b: &Point) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_image_roundtrip() {
        let (width, height) = (640, 480);
        let (display_w, display_h) = (960.0, 720.0);

        let image_point = display_to_image(480.0, 360.0, display_w, display_h, width, height);
        assert!((image_point.x - 320.0).abs() < 0.0001);
        assert!((image_point.y - 240.0).abs() < 0.0001);

        let (dx, dy) = image_to_display(&image_point, display_w, display_h, width, height);
        assert!((dx - 480.0).abs() < 0.0001);
        assert!((dy - 360.0).abs() < 0.0001);
    }

    #[test]
    fn test_display_corners() {
        let tl = display_to_image(0.0, 0.0, 100.0, 50.0, 1920, 1080);
        assert_eq!(tl.x, 0.0);
        assert_eq!(tl.y, 0.0);

        let br = display_to_image(100.0, 50.0, 100.0, 50.0, 1920, 1080);
        assert_eq!(br.x, 1920.0);
        assert_eq!(br.y, 1080.0);
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance(&Point::new(0.0, 0.0), &Point::new(3.0, 4.0)), 5.0);
    }
}
