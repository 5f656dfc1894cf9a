// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Ordered frame list discovered from a directory of extracted frames.

use crate::error::{LabelingError, Result};
use std::path::{Path, PathBuf};

/// Extensions of the files treated as frames.
pub const FRAME_EXTENSIONS: &[&str] = &["png"];

/// Frames in filesystem enumeration order.
#[derive(Debug, Clone)]
pub struct FrameSequence {
    paths: Vec<PathBuf>,
    ids: Vec<String>,
}

impl FrameSequence {
    /// Enumerate the frames in `directory`.
    ///
    /// Ids are made relative to `project_path` when the frame lives under it.
    /// The order is whatever `read_dir` yields; it is not sorted.
    pub fn discover(directory: &Path, project_path: &Path) -> Result<Self> {
        let entries = std::fs::read_dir(directory).map_err(|e| LabelingError::io(directory, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| LabelingError::io(directory, e))?;
            let path = entry.path();
            if path.is_file() && has_frame_extension(&path) {
                paths.push(path);
            }
        }

        if paths.is_empty() {
            return Err(LabelingError::NoFrames(directory.to_path_buf()));
        }

        log::info!("Found {} frames in {}", paths.len(), directory.display());
        Ok(Self::from_paths(paths, project_path))
    }

    /// Build a sequence from an explicit list of paths.
    pub fn from_paths(paths: Vec<PathBuf>, project_path: &Path) -> Self {
        let ids = paths.iter().map(|p| frame_id(p, project_path)).collect();
        Self { paths, ids }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn path(&self, index: usize) -> Option<&Path> {
        self.paths.get(index).map(PathBuf::as_path)
    }

    pub fn id(&self, index: usize) -> Option<&str> {
        self.ids.get(index).map(String::as_str)
    }

    /// All frame ids, in order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Index of the last frame.
    pub fn last_index(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }

    /// Canvas title for frame `index`, e.g. `"3/9 img003.png"`.
    pub fn title(&self, index: usize) -> String {
        let name = self
            .path(index)
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{}/{} {}", index, self.last_index(), name)
    }
}

fn has_frame_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| FRAME_EXTENSIONS.iter().any(|allowed| e.eq_ignore_ascii_case(allowed)))
        .unwrap_or(false)
}

fn frame_id(path: &Path, project_path: &Path) -> String {
    let relative = if project_path.as_os_str().is_empty() {
        path
    } else {
        path.strip_prefix(project_path).unwrap_or(path)
    };
    relative.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_filters_extensions() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        for name in ["img0.png", "img1.PNG", "notes.txt", "img2.jpg"] {
            std::fs::write(dir.join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.join("nested.png")).unwrap();

        let frames = FrameSequence::discover(dir, Path::new("")).unwrap();
        let mut names: Vec<_> = (0..frames.len())
            .map(|i| frames.path(i).unwrap().file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["img0.png", "img1.PNG"]);
    }

    #[test]
    fn test_empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FrameSequence::discover(dir.path(), Path::new("")).unwrap_err();
        assert!(matches!(err, LabelingError::NoFrames(_)));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let err = FrameSequence::discover(Path::new("/definitely/not/here"), Path::new("")).unwrap_err();
        assert!(matches!(err, LabelingError::Io { .. }));
    }

    #[test]
    fn test_ids_relative_to_project() {
        let frames = FrameSequence::from_paths(
            vec![
                PathBuf::from("/proj/labeled-data/reach/img7.png"),
                PathBuf::from("/elsewhere/img8.png"),
            ],
            Path::new("/proj"),
        );
        assert_eq!(frames.id(0), Some("labeled-data/reach/img7.png"));
        assert_eq!(frames.id(1), Some("/elsewhere/img8.png"));
    }

    #[test]
    fn test_title_and_order_preserved() {
        let frames = FrameSequence::from_paths(
            vec![PathBuf::from("/f/b.png"), PathBuf::from("/f/a.png")],
            Path::new("/f"),
        );
        assert_eq!(frames.ids(), &["b.png".to_string(), "a.png".to_string()]);
        assert_eq!(frames.title(1), "1/1 a.png");
        assert_eq!(frames.last_index(), 1);
    }
}
