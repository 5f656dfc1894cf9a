// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Body-part selector and marker-size controls.
//!
//! The selector doubles as the color bar: every entry shows the swatch
//! markers of that body part are drawn with.

use crate::models::session::AnnotationSession;
use crate::ui::canvas::to_color32;

/// Range of the marker-size slider, in image pixels.
pub const MARKER_SIZE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=20.0;

/// Result of properties panel interaction.
pub enum PropertiesAction {
    None,
    SelectBodyPart(String),
    SetMarkerSize(f32),
}

/// Display the body-part list and marker controls.
pub fn show(
    ui: &mut egui::Ui,
    session: Option<&AnnotationSession>,
    resize_enabled: &mut bool,
) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    let Some(session) = session else {
        ui.label(egui::RichText::new("No frames loaded").weak());
        return action;
    };

    ui.heading("Select a body part to annotate");
    ui.separator();

    let scheme = session.settings().color_scheme;
    let count = session.placeable().len();
    for (ordinal, part) in session.placeable().iter().enumerate() {
        ui.horizontal(|ui| {
            let (rect, _) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
            ui.painter()
                .rect_filled(rect, 2.0, to_color32(scheme.color_for(ordinal, count), 1.0));

            let selected = session.active_body_part() == part;
            let placed = session.is_placed(part);
            let label = if placed {
                format!("{} ✔", part)
            } else {
                part.clone()
            };
            let response = ui.add_enabled(!placed || selected, egui::SelectableLabel::new(selected, label));
            if response.clicked() && !selected {
                action = PropertiesAction::SelectBodyPart(part.clone());
            }
        });
    }

    ui.add_space(8.0);
    ui.label(format!("{} of {} placed on this frame", session.placed_count(), count));

    ui.separator();
    ui.checkbox(resize_enabled, "Adjust marker size.");
    let mut size = session.marker_size();
    let slider = egui::Slider::new(&mut size, MARKER_SIZE_RANGE).step_by(1.0);
    if ui.add_enabled(*resize_enabled, slider).changed() {
        action = PropertiesAction::SetMarkerSize(size);
    }

    action
}
