// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module owns the labeling session and translates button, canvas
//! and panel actions into session transitions. Every error is reported in
//! a modal message; the session keeps whatever was already committed.

use crate::error::LabelingError;
use crate::models::{
    drag::MarkerDragController,
    project::ProjectSettings,
    session::{Advance, AnnotationSession, LabelingMode, Placement, PointerButton, SessionState},
};
use crate::ui::{canvas, properties, timeline, toolbar};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};

const HELP_TEXT: &str = "\
1. Select one of the body parts in the list on the right to add a label \
(edit the body part names in config.yaml first if necessary).

2. Right clicking on the image adds the selected label. It is drawn as a \
circle filled with the body part's color.

3. Hover over a label to see its name.

4. Left click and drag a label to move it.

5. To change the marker size tick 'Adjust marker size.' and move the slider.

6. Once you are happy with the position, select another body part.

7. Click 'Next Frame' to move to the next image.

8. When all images are labeled, click 'Save' to write the labels next to the frames.";

/// Modal message currently shown over the canvas.
enum Dialog {
    Message {
        title: &'static str,
        text: String,
        is_error: bool,
    },
    Help,
    /// Shown after a save; offers to label another data set.
    Repeat { text: String },
}

/// Result of background frame loading.
struct LoadedFrame {
    index: usize,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

/// Main application state.
pub struct LabelingApp {
    /// Project settings file, re-read on every load
    config_path: PathBuf,

    /// "Add new labels to existing dataset?" toggle
    extend_mode: bool,

    /// Active labeling session (if frames are loaded)
    session: Option<AnnotationSession>,

    /// Marker drag in progress
    drag: MarkerDragController,

    /// "Adjust marker size." toggle
    resize_enabled: bool,

    /// Loaded frame texture for display
    image_texture: Option<egui::TextureHandle>,

    /// Frame dimensions (width, height)
    image_size: Option<(u32, u32)>,

    /// Receiver for background frame loading
    image_loader: Option<Receiver<Result<LoadedFrame, String>>>,

    dialog: Option<Dialog>,
}

impl LabelingApp {
    /// Create the application for the given project settings file.
    pub fn new(config_path: PathBuf) -> Self {
        Self {
            config_path,
            extend_mode: false,
            session: None,
            drag: MarkerDragController::new(),
            resize_enabled: false,
            image_texture: None,
            image_size: None,
            image_loader: None,
            dialog: None,
        }
    }

    /// State of the labeling workflow.
    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map_or(SessionState::Empty, AnnotationSession::state)
    }

    fn report(&mut self, error: LabelingError) {
        if error.is_configuration_error() {
            log::error!("{}", error);
        } else {
            log::warn!("{}", error);
        }
        self.dialog = Some(Dialog::Message {
            title: "Error!",
            text: error.to_string(),
            is_error: true,
        });
    }

    fn inform(&mut self, title: &'static str, text: impl Into<String>) {
        self.dialog = Some(Dialog::Message {
            title,
            text: text.into(),
            is_error: false,
        });
    }

    /// Ask for a frame directory and start a session on it.
    fn load_frames(&mut self) {
        let Some(directory) = rfd::FileDialog::new()
            .set_title("Choose the directory where your extracted frames are saved")
            .pick_folder()
        else {
            return;
        };

        let mode = if self.extend_mode {
            LabelingMode::Extend
        } else {
            LabelingMode::Fresh
        };

        let session = ProjectSettings::load(&self.config_path, directory)
            .and_then(|settings| AnnotationSession::open(settings, mode));

        match session {
            Ok(session) => {
                self.session = Some(session);
                self.drag = MarkerDragController::new();
                self.request_frame();
            }
            Err(e) => self.report(e),
        }
    }

    fn next_frame(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        self.drag.release();
        match session.advance() {
            Ok(Advance::Moved(_)) => self.request_frame(),
            Ok(Advance::AtLastFrame) => {}
            Err(e) => self.report(e),
        }
    }

    fn save(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        self.drag.release();
        match session.finalize() {
            Ok(files) => {
                self.dialog = Some(Dialog::Repeat {
                    text: format!(
                        "Labels saved to\n{}\n{}\n\nDo you want to label another data set?",
                        files.csv.display(),
                        files.table.display()
                    ),
                });
            }
            Err(e) => {
                log::error!("Failed to save labels: {}", e);
                self.report(e);
            }
        }
    }

    /// Drop the finished session so a new directory can be loaded.
    fn reset(&mut self) {
        self.session = None;
        self.drag = MarkerDragController::new();
        self.resize_enabled = false;
        self.image_texture = None;
        self.image_size = None;
        self.image_loader = None;
    }

    /// Decode the current frame on a background thread.
    fn request_frame(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let index = session.current_frame();
        let Some(path) = session.frames().path(index).map(|p| p.to_path_buf()) else {
            return;
        };

        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.image_texture = None;
        self.image_size = None;

        std::thread::spawn(move || {
            let result = crate::io::media::load_image(&path)
                .map(|img| {
                    log::info!("Loaded frame: {} ({}x{})", path.display(), img.width, img.height);
                    LoadedFrame {
                        index,
                        width: img.width,
                        height: img.height,
                        pixels: img.pixels,
                    }
                })
                .map_err(|e| format!("{:#}", e));
            let _ = sender.send(result);
        });
    }

    fn poll_frame(&mut self, ctx: &egui::Context) {
        let Some(ref receiver) = self.image_loader else {
            return;
        };
        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => {
                ctx.request_repaint();
                return;
            }
            Err(TryRecvError::Disconnected) => Err("Frame loader stopped unexpectedly".to_string()),
        };
        self.image_loader = None;

        match result {
            Ok(frame) => {
                let current = self.session.as_ref().map(AnnotationSession::current_frame);
                if current != Some(frame.index) {
                    return;
                }
                let size = [frame.width as usize, frame.height as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &frame.pixels);
                let texture = ctx.load_texture("frame", color_image, egui::TextureOptions::LINEAR);
                self.image_texture = Some(texture);
                self.image_size = Some((frame.width, frame.height));
            }
            Err(e) => {
                log::error!("Failed to load frame: {}", e);
                self.dialog = Some(Dialog::Message {
                    title: "Error!",
                    text: e,
                    is_error: true,
                });
            }
        }
    }

    fn handle_canvas(&mut self, action: canvas::CanvasAction) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match action {
            canvas::CanvasAction::PlaceMarker(point) => {
                match session.place_marker(point, PointerButton::Secondary) {
                    Ok(Placement::Completed(_)) => self.inform(
                        "Done!",
                        "All body parts are annotated! Click 'Next Frame' or 'Save' to continue.",
                    ),
                    Ok(_) => {}
                    Err(e) => self.report(e),
                }
            }
            canvas::CanvasAction::PressMarker(point) => {
                self.drag.press(session, point);
            }
            canvas::CanvasAction::DragTo(point) => {
                if let Err(e) = self.drag.drag(session, point) {
                    self.report(e);
                }
            }
            canvas::CanvasAction::Release => {
                self.drag.release();
            }
            canvas::CanvasAction::None => {}
        }
    }

    fn handle_properties(&mut self, action: properties::PropertiesAction) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let result = match action {
            properties::PropertiesAction::SelectBodyPart(name) => session.select_body_part(&name),
            properties::PropertiesAction::SetMarkerSize(size) if self.resize_enabled => {
                session.set_marker_size(size)
            }
            _ => Ok(()),
        };
        if let Err(e) = result {
            self.report(e);
        }
    }

    fn show_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.dialog.as_ref() else {
            return;
        };

        let mut close = false;
        let mut repeat = None;

        let (title, text): (&str, &str) = match dialog {
            Dialog::Message { title, text, .. } => (*title, text.as_str()),
            Dialog::Help => ("User instructions", HELP_TEXT),
            Dialog::Repeat { text } => ("Repeat?", text.as_str()),
        };
        let is_error = matches!(dialog, Dialog::Message { is_error: true, .. });
        let is_repeat = matches!(dialog, Dialog::Repeat { .. });

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                let color = if is_error {
                    egui::Color32::from_rgb(230, 90, 90)
                } else {
                    ui.visuals().text_color()
                };
                ui.label(egui::RichText::new(text).color(color));
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if is_repeat {
                        if ui.button("Yes").clicked() {
                            repeat = Some(true);
                        }
                        if ui.button("No").clicked() {
                            repeat = Some(false);
                        }
                    } else if ui.button("OK").clicked() {
                        close = true;
                    }
                });
            });

        match repeat {
            Some(true) => {
                self.dialog = None;
                self.reset();
                self.load_frames();
            }
            Some(false) => {
                self.dialog = None;
                log::info!("Labeling finished");
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
            None if close => self.dialog = None,
            None => {}
        }
    }
}

impl eframe::App for LabelingApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_frame(ctx);

        // Button bar (bottom)
        let state = self.state();
        let at_last_frame = self.session.as_ref().is_some_and(AnnotationSession::is_last_frame);
        let toolbar_action = egui::TopBottomPanel::bottom("toolbar")
            .show(ctx, |ui| {
                ui.add_space(4.0);
                let action = toolbar::show(ui, state, at_last_frame, &mut self.extend_mode);
                ui.add_space(4.0);
                action
            })
            .inner;

        match toolbar_action {
            toolbar::ToolbarAction::LoadFrames => self.load_frames(),
            toolbar::ToolbarAction::Help => self.dialog = Some(Dialog::Help),
            toolbar::ToolbarAction::NextFrame => self.next_frame(),
            toolbar::ToolbarAction::Save => self.save(),
            toolbar::ToolbarAction::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            toolbar::ToolbarAction::None => {}
        }

        // Body parts and marker size (right side)
        let properties_action = egui::SidePanel::right("properties")
            .default_width(220.0)
            .show(ctx, |ui| {
                properties::show(ui, self.session.as_ref(), &mut self.resize_enabled)
            })
            .inner;
        self.handle_properties(properties_action);

        // Frame header
        if let Some(ref session) = self.session {
            egui::TopBottomPanel::top("frame_header").show(ctx, |ui| {
                timeline::show(ui, session);
            });
        }

        // Main canvas (center); frozen while a dialog is open
        let modal = self.dialog.is_some();
        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                ui.add_enabled_ui(!modal, |ui| {
                    canvas::show(ui, self.session.as_ref(), &self.image_texture, self.image_size)
                })
                .inner
            })
            .inner;
        self.handle_canvas(canvas_action);

        if self.drag.captured().is_some() {
            ctx.set_cursor_icon(egui::CursorIcon::Grabbing);
        }

        self.show_dialog(ctx);
    }
}
