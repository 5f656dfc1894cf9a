// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame header above the canvas: title and progress through the frames.

use crate::models::session::AnnotationSession;

/// Display the current frame's title and a progress bar.
pub fn show(ui: &mut egui::Ui, session: &AnnotationSession) {
    let frames = session.frames();
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(session.title()).strong());
        ui.separator();
        let progress = (session.current_frame() + 1) as f32 / frames.len() as f32;
        ui.add(
            egui::ProgressBar::new(progress)
                .desired_width(200.0)
                .text(format!("{} of {}", session.current_frame() + 1, frames.len())),
        );
        ui.separator();
        ui.label(format!("{} labels committed", session.store().labeled_count()));
        if session.is_extending() {
            ui.separator();
            ui.label(egui::RichText::new("extending existing dataset").weak());
        }
    });
}
