// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types shared by the labeling models and I/O layer.

use std::fmt;
use std::path::PathBuf;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LabelingError>;

/// Everything that can go wrong while configuring, annotating or saving.
#[derive(Debug)]
pub enum LabelingError {
    /// The configured body-part list names the same part more than once.
    DuplicateBodyPart(String),
    /// Any other problem with the project settings file.
    InvalidConfig(String),
    /// The active body part has already been placed on the current frame.
    DuplicateAnnotation(String),
    /// A body part that is not in the placeable list was referenced.
    UnknownBodyPart(String),
    /// A frame id that the store has no row for.
    UnknownFrame(String),
    /// A marker reference that does not exist on the current frame.
    UnknownMarker(usize),
    /// The chosen directory contains no frames.
    NoFrames(PathBuf),
    /// Every configured body part is already covered by the prior dataset.
    NoPlaceableBodyParts,
    /// The session was saved and accepts no further edits.
    SessionFinished,
    InvalidMarkerSize(f32),
    /// A label table whose rows and columns do not line up.
    MalformedTable(String),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl LabelingError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Configuration errors abort session startup; everything else is
    /// reported and recovered from locally.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::DuplicateBodyPart(_) | Self::InvalidConfig(_))
    }
}

impl fmt::Display for LabelingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateBodyPart(name) => write!(
                f,
                "body parts must have unique labels, '{}' appears more than once in the config file",
                name
            ),
            Self::InvalidConfig(message) => write!(f, "invalid project configuration: {}", message),
            Self::DuplicateAnnotation(name) => write!(
                f,
                "{} is already annotated. Select another body part to annotate.",
                name
            ),
            Self::UnknownBodyPart(name) => write!(f, "'{}' is not a placeable body part", name),
            Self::UnknownFrame(id) => write!(f, "no row for frame '{}'", id),
            Self::UnknownMarker(index) => write!(f, "no marker #{} on the current frame", index),
            Self::NoFrames(dir) => write!(f, "no .png frames found in {}", dir.display()),
            Self::NoPlaceableBodyParts => write!(
                f,
                "all configured body parts are already labeled in the existing dataset"
            ),
            Self::SessionFinished => write!(f, "labels were already saved, load a new data set"),
            Self::InvalidMarkerSize(size) => write!(f, "invalid marker size {}", size),
            Self::MalformedTable(message) => write!(f, "malformed label table: {}", message),
            Self::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            Self::Parse { path, source } => write!(f, "failed to parse {}: {}", path.display(), source),
        }
    }
}

impl std::error::Error for LabelingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_fatal() {
        assert!(LabelingError::DuplicateBodyPart("nose".into()).is_configuration_error());
        assert!(LabelingError::InvalidConfig("empty".into()).is_configuration_error());
        assert!(!LabelingError::DuplicateAnnotation("nose".into()).is_configuration_error());
        assert!(!LabelingError::NoFrames(PathBuf::from("/tmp")).is_configuration_error());
    }

    #[test]
    fn test_parse_error_keeps_source() {
        use std::error::Error;

        let cause = serde_json::from_str::<Vec<f64>>("[1.0,").unwrap_err();
        let err = LabelingError::parse("/data/CollectedData_Alex.json", cause);
        assert!(err.to_string().starts_with("failed to parse /data/CollectedData_Alex.json"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_duplicate_annotation_message_names_part() {
        let message = LabelingError::DuplicateAnnotation("tail".into()).to_string();
        assert!(message.starts_with("tail is already annotated"));
    }
}
