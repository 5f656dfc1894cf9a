// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for frame display and landmark placement.
//!
//! This module shows the current frame scaled to fit, draws the placed
//! markers on top of it and turns pointer input into canvas actions:
//! right click places the active body part, left press-drag-release moves
//! a marker.

use crate::models::{annotation::Point, session::AnnotationSession};
use crate::util::geometry;

/// Result of canvas interaction, in image pixel coordinates.
pub enum CanvasAction {
    None,
    PlaceMarker(Point),
    PressMarker(Point),
    DragTo(Point),
    Release,
}

/// Opacity of marker fills.
const MARKER_ALPHA: f32 = 0.5;

/// Display the main canvas area and handle mouse interactions.
pub fn show(
    ui: &mut egui::Ui,
    session: Option<&AnnotationSession>,
    image_texture: &Option<egui::TextureHandle>,
    image_size: Option<(u32, u32)>,
) -> CanvasAction {
    let mut action = CanvasAction::None;
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        let (Some(session), Some(texture), Some((img_width, img_height))) =
            (session, image_texture, image_size)
        else {
            show_placeholder(ui, session.is_some());
            return;
        };

        // Fit the frame into the available space, keeping its aspect ratio
        let available = ui.available_size();
        let img_aspect = img_width as f32 / img_height as f32;
        let available_aspect = available.x / available.y;

        let (display_width, display_height) = if img_aspect > available_aspect {
            let width = available.x;
            (width, width / img_aspect)
        } else {
            let height = available.y;
            (height * img_aspect, height)
        };

        let x_offset = (available.x - display_width) / 2.0;
        let y_offset = (available.y - display_height) / 2.0;

        let image_rect = egui::Rect::from_min_size(
            ui.min_rect().min + egui::vec2(x_offset, y_offset),
            egui::vec2(display_width, display_height),
        );

        ui.painter().image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        let to_image = |pos: egui::Pos2| -> Point {
            geometry::display_to_image(
                (pos.x - image_rect.min.x) as f64,
                (pos.y - image_rect.min.y) as f64,
                display_width as f64,
                display_height as f64,
                img_width,
                img_height,
            )
        };

        let response = ui.allocate_rect(image_rect, egui::Sense::click_and_drag());

        if response.secondary_clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                if image_rect.contains(pos) {
                    action = CanvasAction::PlaceMarker(to_image(pos));
                }
            }
        } else if response.drag_started_by(egui::PointerButton::Primary) {
            // Capture where the press happened, not where the drag threshold was crossed
            let origin = ui
                .input(|i| i.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos());
            if let Some(pos) = origin {
                action = CanvasAction::PressMarker(to_image(pos));
            }
        } else if response.dragged_by(egui::PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                action = CanvasAction::DragTo(to_image(pos.clamp(image_rect.min, image_rect.max)));
            }
        } else if response.drag_stopped() {
            action = CanvasAction::Release;
        }

        // Markers, radius scaled from image pixels to screen
        let scale = display_width / img_width as f32;
        let radius = session.marker_size() * scale;
        let painter = ui.painter_at(image_rect);
        let scheme = session.settings().color_scheme;
        for marker in session.markers() {
            let (dx, dy) = geometry::image_to_display(
                &marker.position,
                display_width as f64,
                display_height as f64,
                img_width,
                img_height,
            );
            let center = image_rect.min + egui::vec2(dx as f32, dy as f32);
            let fill = to_color32(marker.color(scheme), MARKER_ALPHA);
            painter.circle_filled(center, radius, fill);
            painter.circle_stroke(center, radius, egui::Stroke::new(1.0, egui::Color32::BLACK));
        }

        // Hover a marker to see its name
        if let Some(pos) = response.hover_pos() {
            if let Some(index) = session.marker_at(&to_image(pos)) {
                let name = session.markers()[index].body_part.clone();
                let _ = response.on_hover_text_at_pointer(name);
            }
        }
    });

    action
}

/// Convert a colormap sample to an egui color with the given opacity.
pub fn to_color32(rgb: [f32; 3], alpha: f32) -> egui::Color32 {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(
        channel(rgb[0]),
        channel(rgb[1]),
        channel(rgb[2]),
        channel(alpha),
    )
}

fn show_placeholder(ui: &mut egui::Ui, has_session: bool) {
    if has_session {
        ui.centered_and_justified(|ui| {
            ui.label(egui::RichText::new("Loading frame...").color(egui::Color32::WHITE));
        });
        return;
    }

    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                egui::RichText::new("Labeling Toolbox")
                    .size(32.0)
                    .color(egui::Color32::from_gray(200)),
            );
            ui.label(
                egui::RichText::new("Body-part annotation of extracted frames")
                    .size(14.0)
                    .color(egui::Color32::from_gray(150)),
            );
            ui.add_space(20.0);
            ui.label(
                egui::RichText::new("Click 'Load Frames' and choose a directory of extracted frames")
                    .color(egui::Color32::from_gray(180)),
            );
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_color32_scales_channels() {
        let color = to_color32([1.0, 0.0, 0.5], 0.5);
        assert_eq!(color, egui::Color32::from_rgba_unmultiplied(255, 0, 128, 128));
    }
}
