// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Labeling session state machine.
//!
//! A session owns the frame list, the label table being filled and the
//! markers placed on the current frame. Markers only reach the table when
//! the frame is committed (on advance or on finalize).

use super::annotation::{Marker, Point};
use super::frames::FrameSequence;
use super::project::ProjectSettings;
use super::store::{AnnotationStore, ColumnKey};
use crate::error::{LabelingError, Result};
use crate::io::serialization::{self, ExportedFiles};
use std::collections::HashSet;

/// Smallest radius, in image pixels, that still picks up a marker.
const MIN_HIT_RADIUS: f64 = 3.0;

/// Whether to start a new dataset or add body parts to an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelingMode {
    Fresh,
    Extend,
}

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No frames loaded yet.
    Empty,
    /// A frame is shown with no markers on it.
    FrameLoaded,
    /// At least one marker placed, some placeable parts still missing.
    Annotating,
    /// Every placeable body part has a marker on this frame.
    FrameComplete,
    /// Labels exported; no further edits.
    Saved,
}

/// Pointer button that produced a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Outcome of a placement click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The click was not a placement gesture.
    Ignored,
    /// A marker was added at this index.
    Placed(usize),
    /// A marker was added and every placeable body part is now annotated.
    Completed(usize),
}

/// Outcome of advancing to the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved(usize),
    /// Already on the last frame; only the commit happened.
    AtLastFrame,
}

/// The labeling state machine for one frame directory.
#[derive(Debug)]
pub struct AnnotationSession {
    settings: ProjectSettings,
    frames: FrameSequence,
    store: AnnotationStore,
    prior: Option<AnnotationStore>,
    placeable: Vec<String>,
    current_frame: usize,
    placed: HashSet<String>,
    markers: Vec<Marker>,
    active: usize,
    marker_size: f32,
    state: SessionState,
}

impl AnnotationSession {
    /// Discover frames in the settings' frame directory and start labeling.
    ///
    /// In [`LabelingMode::Extend`] the collected data already saved in that
    /// directory is loaded and its body parts are excluded.
    pub fn open(settings: ProjectSettings, mode: LabelingMode) -> Result<Self> {
        let frames = FrameSequence::discover(&settings.frame_directory, &settings.project_path)?;
        let prior = match mode {
            LabelingMode::Fresh => None,
            LabelingMode::Extend => {
                let files = serialization::collected_data_paths(
                    &settings.frame_directory,
                    &settings.collected_data_stem(),
                );
                Some(serialization::import_store(&files.table)?)
            }
        };
        Self::start(settings, frames, prior)
    }

    /// Start on frame 0 with an all-missing table.
    pub fn start(
        settings: ProjectSettings,
        frames: FrameSequence,
        prior: Option<AnnotationStore>,
    ) -> Result<Self> {
        if frames.is_empty() {
            return Err(LabelingError::NoFrames(settings.frame_directory.clone()));
        }

        let placeable = match &prior {
            Some(prior) => {
                let coverage = AnnotationStore::coverage(&settings.body_parts, prior)?;
                log::info!(
                    "Extending dataset: {:?} already labeled, {:?} to label",
                    coverage.covered,
                    coverage.placeable
                );
                coverage.placeable
            }
            None => {
                super::project::ensure_unique(&settings.body_parts)?;
                settings.body_parts.clone()
            }
        };
        if placeable.is_empty() {
            return Err(LabelingError::NoPlaceableBodyParts);
        }

        let store = AnnotationStore::new(&settings.scorer, frames.ids(), &placeable);
        log::info!(
            "Started labeling {} frames in {}",
            frames.len(),
            settings.frame_directory.display()
        );

        Ok(Self {
            marker_size: settings.marker_size,
            settings,
            frames,
            store,
            prior,
            placeable,
            current_frame: 0,
            placed: HashSet::new(),
            markers: Vec::new(),
            active: 0,
            state: SessionState::FrameLoaded,
        })
    }

    pub fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    pub fn frames(&self) -> &FrameSequence {
        &self.frames
    }

    /// Labels committed in this session (placeable body parts only).
    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn is_extending(&self) -> bool {
        self.prior.is_some()
    }

    /// Body parts that can be placed in this session, in configured order.
    pub fn placeable(&self) -> &[String] {
        &self.placeable
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn is_last_frame(&self) -> bool {
        self.current_frame == self.frames.last_index()
    }

    /// Id of the frame being labeled.
    pub fn frame_id(&self) -> &str {
        self.frames.id(self.current_frame).unwrap_or_default()
    }

    pub fn title(&self) -> String {
        self.frames.title(self.current_frame)
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn is_placed(&self, body_part: &str) -> bool {
        self.placed.contains(body_part)
    }

    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }

    pub fn active_body_part(&self) -> &str {
        &self.placeable[self.active]
    }

    pub fn marker_size(&self) -> f32 {
        self.marker_size
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Choose the body part the next placement will label.
    pub fn select_body_part(&mut self, name: &str) -> Result<()> {
        self.ensure_open()?;
        let index = self
            .placeable
            .iter()
            .position(|part| part == name)
            .ok_or_else(|| LabelingError::UnknownBodyPart(name.to_string()))?;
        if self.placed.contains(name) {
            return Err(LabelingError::DuplicateAnnotation(name.to_string()));
        }
        self.active = index;
        Ok(())
    }

    /// Place the active body part at `position`.
    ///
    /// Only secondary clicks place; primary clicks are left to dragging.
    /// Once every placeable part is on the frame, clicks are ignored until
    /// the next advance.
    pub fn place_marker(&mut self, position: Point, button: PointerButton) -> Result<Placement> {
        self.ensure_open()?;
        if button != PointerButton::Secondary || self.state == SessionState::FrameComplete {
            return Ok(Placement::Ignored);
        }

        let body_part = self.placeable[self.active].clone();
        if self.placed.contains(&body_part) {
            log::warn!("{} is already annotated on frame {}", body_part, self.current_frame);
            return Err(LabelingError::DuplicateAnnotation(body_part));
        }

        log::debug!(
            "Placed {} at ({:.1}, {:.1}) on frame {}",
            body_part,
            position.x,
            position.y,
            self.current_frame
        );
        self.markers.push(Marker::new(
            position,
            body_part.clone(),
            self.active,
            self.placeable.len(),
        ));
        self.placed.insert(body_part);
        let index = self.markers.len() - 1;

        if self.placed.len() == self.placeable.len() {
            self.state = SessionState::FrameComplete;
            Ok(Placement::Completed(index))
        } else {
            self.state = SessionState::Annotating;
            Ok(Placement::Placed(index))
        }
    }

    /// Topmost marker whose circle contains `point`.
    pub fn marker_at(&self, point: &Point) -> Option<usize> {
        let radius = f64::from(self.marker_size).max(MIN_HIT_RADIUS);
        self.markers.iter().rposition(|m| m.hit(point, radius))
    }

    /// Move marker `index` to `position`; nothing is committed yet.
    pub fn drag_marker(&mut self, index: usize, position: Point) -> Result<()> {
        self.ensure_open()?;
        let marker = self
            .markers
            .get_mut(index)
            .ok_or(LabelingError::UnknownMarker(index))?;
        marker.move_to(position);
        Ok(())
    }

    /// Change the drawn radius of all markers. Positions are untouched.
    pub fn set_marker_size(&mut self, size: f32) -> Result<()> {
        if !size.is_finite() || size < 0.0 {
            return Err(LabelingError::InvalidMarkerSize(size));
        }
        self.marker_size = size;
        Ok(())
    }

    /// Write every marker of the current frame into the table and clear
    /// the per-frame state.
    pub fn commit_frame(&mut self) -> Result<()> {
        let frame_id = self.frame_id().to_string();
        for marker in &self.markers {
            let key = ColumnKey::new(self.settings.scorer.as_str(), marker.body_part.as_str());
            self.store.set_coordinate(&frame_id, &key, marker.position)?;
        }
        if !self.markers.is_empty() {
            log::debug!("Committed {} labels for {}", self.markers.len(), frame_id);
        }
        self.markers.clear();
        self.placed.clear();
        Ok(())
    }

    /// Commit the current frame and move to the next one.
    pub fn advance(&mut self) -> Result<Advance> {
        self.ensure_open()?;
        self.commit_frame()?;
        if self.is_last_frame() {
            return Ok(Advance::AtLastFrame);
        }

        self.current_frame += 1;
        self.active = 0;
        self.state = SessionState::FrameLoaded;
        log::info!("Moved to frame {}", self.title());
        Ok(Advance::Moved(self.current_frame))
    }

    /// Prior labels (if extending) joined with this session's labels.
    pub fn combined_store(&self) -> AnnotationStore {
        match &self.prior {
            Some(prior) => self.store.merged_with(prior),
            None => self.store.clone(),
        }
    }

    /// Commit the last frame and export the combined table.
    pub fn finalize(&mut self) -> Result<ExportedFiles> {
        self.ensure_open()?;
        self.commit_frame()?;
        let files = serialization::export_store(
            &self.combined_store(),
            &self.settings.frame_directory,
            &self.settings.collected_data_stem(),
        )?;
        self.state = SessionState::Saved;
        Ok(files)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.state == SessionState::Saved {
            return Err(LabelingError::SessionFinished);
        }
        Ok(())
    }
}
