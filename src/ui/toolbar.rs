// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Bottom button bar.
//!
//! This module provides the buttons that drive the labeling workflow:
//! loading a frame directory, moving to the next frame and saving.

use crate::models::session::SessionState;

/// Result of toolbar interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    LoadFrames,
    Help,
    NextFrame,
    Save,
    Quit,
}

/// Display the button bar.
///
/// `extend_mode` is the "add new labels" toggle; it can only change while
/// no session is running.
pub fn show(
    ui: &mut egui::Ui,
    state: SessionState,
    at_last_frame: bool,
    extend_mode: &mut bool,
) -> ToolbarAction {
    let mut action = ToolbarAction::None;
    let loaded = state != SessionState::Empty;
    let open = loaded && state != SessionState::Saved;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.add_enabled(
            !loaded,
            egui::Checkbox::new(extend_mode, "Add new labels to existing dataset?"),
        );

        ui.separator();

        if ui.add_enabled(!loaded, egui::Button::new("Load Frames")).clicked() {
            action = ToolbarAction::LoadFrames;
        }
        if ui.add_enabled(loaded, egui::Button::new("Help")).clicked() {
            action = ToolbarAction::Help;
        }
        if ui.add_enabled(open && !at_last_frame, egui::Button::new("Next Frame")).clicked() {
            action = ToolbarAction::NextFrame;
        }
        if ui.add_enabled(open && at_last_frame, egui::Button::new("Save")).clicked() {
            action = ToolbarAction::Save;
        }

        ui.separator();

        if ui.button("Quit").clicked() {
            action = ToolbarAction::Quit;
        }

        ui.separator();

        let hint = match state {
            SessionState::Empty => "Load a directory of extracted frames to begin",
            SessionState::FrameLoaded | SessionState::Annotating => {
                "Right click to place the selected body part, left drag to move a label"
            }
            SessionState::FrameComplete => "All body parts annotated on this frame",
            SessionState::Saved => "Labels saved",
        };
        ui.label(egui::RichText::new(hint).italics().weak());
    });

    action
}
