// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project settings.
//!
//! This module loads the project's `config.yaml` and validates it once,
//! producing the immutable settings a labeling session runs against.

use crate::error::{LabelingError, Result};
use crate::util::colormap::ColorScheme;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// The subset of the project config file the labeler reads.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    pub scorer: String,
    pub bodyparts: Vec<String>,
    #[serde(default)]
    pub video_sets: BTreeMap<String, serde_yaml::Value>,
    pub dotsize: f32,
    pub colormap: String,
    pub project_path: PathBuf,
}

impl ProjectConfig {
    /// Parse a config document.
    pub fn from_yaml(text: &str, path: &Path) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| {
            LabelingError::InvalidConfig(format!("{}: {}", path.display(), e))
        })
    }

    /// Read and parse the config file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| LabelingError::io(path, e))?;
        Self::from_yaml(&text, path)
    }

    /// Video names listed in the project.
    pub fn videos(&self) -> impl Iterator<Item = &str> {
        self.video_sets.keys().map(String::as_str)
    }

    /// Check the fields that must hold before any frame is shown.
    pub fn validate(&self) -> Result<ColorScheme> {
        if self.scorer.trim().is_empty() {
            return Err(LabelingError::InvalidConfig("scorer must not be empty".into()));
        }
        if self.bodyparts.is_empty() {
            return Err(LabelingError::InvalidConfig("bodyparts must not be empty".into()));
        }
        ensure_unique(&self.bodyparts)?;
        if !self.dotsize.is_finite() || self.dotsize < 0.0 {
            return Err(LabelingError::InvalidConfig(format!(
                "dotsize must be a non-negative number, got {}",
                self.dotsize
            )));
        }
        ColorScheme::from_name(&self.colormap)
    }
}

/// Fail with `DuplicateBodyPart` on the first repeated name.
pub fn ensure_unique(body_parts: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for part in body_parts {
        if !seen.insert(part.as_str()) {
            return Err(LabelingError::DuplicateBodyPart(part.clone()));
        }
    }
    Ok(())
}

/// Validated, immutable view of the project used by one labeling session.
#[derive(Debug, Clone)]
pub struct ProjectSettings {
    pub scorer: String,
    pub body_parts: Vec<String>,
    pub marker_size: f32,
    pub color_scheme: ColorScheme,
    pub project_path: PathBuf,
    pub frame_directory: PathBuf,
}

impl ProjectSettings {
    /// Build settings from an already-parsed config.
    pub fn from_config(config: ProjectConfig, frame_directory: PathBuf) -> Result<Self> {
        let color_scheme = config.validate()?;
        Ok(Self {
            scorer: config.scorer,
            body_parts: config.bodyparts,
            marker_size: config.dotsize,
            color_scheme,
            project_path: config.project_path,
            frame_directory,
        })
    }

    /// Load and validate `config_path` for labeling `frame_directory`.
    pub fn load(config_path: &Path, frame_directory: PathBuf) -> Result<Self> {
        let config = ProjectConfig::load(config_path)?;
        let settings = Self::from_config(config, frame_directory)?;
        log::info!(
            "Loaded project config {} (scorer {}, {} body parts)",
            config_path.display(),
            settings.scorer,
            settings.body_parts.len()
        );
        Ok(settings)
    }

    /// Base name of the collected-data files for this scorer.
    pub fn collected_data_stem(&self) -> String {
        format!("CollectedData_{}", self.scorer)
    }
}
