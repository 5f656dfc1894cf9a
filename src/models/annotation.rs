// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines image-space points and the per-frame markers the
//! user places before they are committed to the store.

use crate::util::{colormap::ColorScheme, geometry};

/// A 2D point in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A body part placed on the current frame.
///
/// The color is frozen at placement time: `color_index` is the ordinal of
/// the body part in the placeable list and `palette_size` the length of
/// that list, so redraws never depend on later session state.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: Point,
    pub body_part: String,
    pub color_index: usize,
    pub palette_size: usize,
}

impl Marker {
    /// Create a marker for `body_part` at `position`.
    pub fn new(position: Point, body_part: String, color_index: usize, palette_size: usize) -> Self {
        Self {
            position,
            body_part,
            color_index,
            palette_size,
        }
    }

    /// Fill color of this marker under the given scheme.
    pub fn color(&self, scheme: ColorScheme) -> [f32; 3] {
        scheme.color_for(self.color_index, self.palette_size)
    }

    /// Check if `point` falls inside the marker's circle of `radius`.
    pub fn hit(&self, point: &Point, radius: f64) -> bool {
        geometry::distance(&self.position, point) <= radius
    }

    /// Move the marker to a new position.
    pub fn move_to(&mut self, position: Point) {
        self.position = position;
    }
}
