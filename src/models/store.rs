// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Collected label table.
//!
//! Rows are frame ids, columns are `(scorer, body part)` pairs, and each
//! cell holds an image-space point or nothing when the part was not
//! labeled on that frame. Exported files flatten each column into an `x`
//! and a `y` axis.

use super::annotation::Point;
use super::project::ensure_unique;
use crate::error::{LabelingError, Result};
use std::collections::HashMap;

/// Column key of the label table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnKey {
    pub scorer: String,
    pub body_part: String,
}

impl ColumnKey {
    pub fn new(scorer: impl Into<String>, body_part: impl Into<String>) -> Self {
        Self {
            scorer: scorer.into(),
            body_part: body_part.into(),
        }
    }
}

/// Which configured body parts a prior dataset already covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyPartCoverage {
    /// Body parts present in the prior dataset, in column order.
    pub covered: Vec<String>,
    /// Configured body parts minus `covered`, in configured order.
    pub placeable: Vec<String>,
}

/// Table of `(frame, body part) -> point` with every cell present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationStore {
    columns: Vec<ColumnKey>,
    frames: Vec<String>,
    frame_rows: HashMap<String, usize>,
    cells: Vec<Vec<Option<Point>>>,
}

impl AnnotationStore {
    /// Create an all-missing table for every `(frame, body part)` pair.
    pub fn new(scorer: &str, frames: &[String], body_parts: &[String]) -> Self {
        let columns = body_parts
            .iter()
            .map(|part| ColumnKey::new(scorer, part.as_str()))
            .collect::<Vec<_>>();
        let cells = vec![vec![None; columns.len()]; frames.len()];
        Self {
            frame_rows: index_frames(frames),
            frames: frames.to_vec(),
            columns,
            cells,
        }
    }

    /// Rebuild a table from its raw parts, as read back from disk.
    pub fn from_parts(
        columns: Vec<ColumnKey>,
        frames: Vec<String>,
        cells: Vec<Vec<Option<Point>>>,
    ) -> Result<Self> {
        if cells.len() != frames.len() || cells.iter().any(|row| row.len() != columns.len()) {
            return Err(LabelingError::MalformedTable(format!(
                "{} frames x {} columns",
                frames.len(),
                columns.len()
            )));
        }
        Ok(Self {
            frame_rows: index_frames(&frames),
            frames,
            columns,
            cells,
        })
    }

    pub fn columns(&self) -> &[ColumnKey] {
        &self.columns
    }

    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    /// Frames in table order with their cells, one per column.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[Option<Point>])> {
        self.frames
            .iter()
            .map(String::as_str)
            .zip(self.cells.iter().map(Vec::as_slice))
    }

    /// Body parts with a column, first appearance order, no repeats.
    pub fn body_parts(&self) -> Vec<String> {
        let mut parts: Vec<String> = Vec::new();
        for column in &self.columns {
            if !parts.contains(&column.body_part) {
                parts.push(column.body_part.clone());
            }
        }
        parts
    }

    /// Overwrite the cell for `(frame_id, key)`.
    pub fn set_coordinate(&mut self, frame_id: &str, key: &ColumnKey, point: Point) -> Result<()> {
        let (row, column) = self.locate(frame_id, key)?;
        self.cells[row][column] = Some(point);
        Ok(())
    }

    /// Read the cell for `(frame_id, key)`; `Ok(None)` when missing.
    pub fn coordinate(&self, frame_id: &str, key: &ColumnKey) -> Result<Option<Point>> {
        let (row, column) = self.locate(frame_id, key)?;
        Ok(self.cells[row][column])
    }

    /// Number of labeled (non-missing) cells.
    pub fn labeled_count(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| cell.is_some()).count()
    }

    /// Split the configured body parts into those `prior` already covers and
    /// those still placeable in this session.
    pub fn coverage(configured: &[String], prior: &AnnotationStore) -> Result<BodyPartCoverage> {
        ensure_unique(configured)?;
        let covered = prior.body_parts();
        let placeable = configured
            .iter()
            .filter(|part| !covered.contains(part))
            .cloned()
            .collect();
        Ok(BodyPartCoverage { covered, placeable })
    }

    /// Column-wise merge with a prior table.
    ///
    /// Frames are the outer join (prior order, then frames only in `self`);
    /// columns are the prior's followed by `self`'s. Where both tables
    /// share a cell, a labeled value in `self` wins.
    pub fn merged_with(&self, prior: &AnnotationStore) -> AnnotationStore {
        let mut frames = prior.frames.clone();
        for frame in &self.frames {
            if !prior.frame_rows.contains_key(frame) {
                frames.push(frame.clone());
            }
        }

        let mut columns = prior.columns.clone();
        for column in &self.columns {
            if !columns.contains(column) {
                columns.push(column.clone());
            }
        }

        let cells = frames
            .iter()
            .map(|frame| {
                columns
                    .iter()
                    .map(|column| {
                        self.cell(frame, column).or_else(|| prior.cell(frame, column))
                    })
                    .collect()
            })
            .collect();

        AnnotationStore {
            frame_rows: index_frames(&frames),
            frames,
            columns,
            cells,
        }
    }

    fn cell(&self, frame_id: &str, key: &ColumnKey) -> Option<Point> {
        let row = *self.frame_rows.get(frame_id)?;
        let column = self.columns.iter().position(|c| c == key)?;
        self.cells[row][column]
    }

    fn locate(&self, frame_id: &str, key: &ColumnKey) -> Result<(usize, usize)> {
        let row = *self
            .frame_rows
            .get(frame_id)
            .ok_or_else(|| LabelingError::UnknownFrame(frame_id.to_string()))?;
        let column = self
            .columns
            .iter()
            .position(|c| c == key)
            .ok_or_else(|| LabelingError::UnknownBodyPart(key.body_part.clone()))?;
        Ok((row, column))
    }
}

fn index_frames(frames: &[String]) -> HashMap<String, usize> {
    frames
        .iter()
        .enumerate()
        .map(|(i, frame)| (frame.clone(), i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn key(body_part: &str) -> ColumnKey {
        ColumnKey::new("Alex", body_part)
    }

    #[test]
    fn test_new_store_is_all_missing() {
        let store = AnnotationStore::new("Alex", &names(&["f0", "f1"]), &names(&["nose", "tail"]));
        assert_eq!(store.frames().len(), 2);
        assert_eq!(store.columns().len(), 2);
        assert_eq!(store.labeled_count(), 0);
        assert_eq!(store.coordinate("f1", &key("tail")).unwrap(), None);
    }

    #[test]
    fn test_set_coordinate_overwrites() {
        let mut store = AnnotationStore::new("Alex", &names(&["f0"]), &names(&["nose"]));
        store.set_coordinate("f0", &key("nose"), Point::new(1.0, 2.0)).unwrap();
        store.set_coordinate("f0", &key("nose"), Point::new(3.0, 4.0)).unwrap();
        store.set_coordinate("f0", &key("nose"), Point::new(3.0, 4.0)).unwrap();
        assert_eq!(store.coordinate("f0", &key("nose")).unwrap(), Some(Point::new(3.0, 4.0)));
        assert_eq!(store.labeled_count(), 1);
    }

    #[test]
    fn test_unknown_cells_are_errors() {
        let mut store = AnnotationStore::new("Alex", &names(&["f0"]), &names(&["nose"]));
        assert!(matches!(
            store.set_coordinate("f9", &key("nose"), Point::new(0.0, 0.0)),
            Err(LabelingError::UnknownFrame(_))
        ));
        assert!(matches!(
            store.coordinate("f0", &key("ear")),
            Err(LabelingError::UnknownBodyPart(_))
        ));
    }

    #[test]
    fn test_coverage_subtracts_prior_parts() {
        let prior = AnnotationStore::new("Alex", &names(&["f0"]), &names(&["tail", "nose"]));
        let coverage =
            AnnotationStore::coverage(&names(&["nose", "ear", "tail", "paw"]), &prior).unwrap();
        assert_eq!(coverage.covered, names(&["tail", "nose"]));
        assert_eq!(coverage.placeable, names(&["ear", "paw"]));
    }

    #[test]
    fn test_coverage_rejects_duplicate_configuration() {
        let prior = AnnotationStore::default();
        let err = AnnotationStore::coverage(&names(&["nose", "nose"]), &prior).unwrap_err();
        assert!(matches!(err, LabelingError::DuplicateBodyPart(_)));
    }

    #[test]
    fn test_merge_is_column_wise_outer_join() {
        let mut prior = AnnotationStore::new("Alex", &names(&["f0", "f1"]), &names(&["nose"]));
        prior.set_coordinate("f0", &key("nose"), Point::new(1.0, 1.0)).unwrap();

        let mut current = AnnotationStore::new("Alex", &names(&["f1", "f2"]), &names(&["tail"]));
        current.set_coordinate("f2", &key("tail"), Point::new(5.0, 6.0)).unwrap();

        let merged = current.merged_with(&prior);
        assert_eq!(merged.frames(), &names(&["f0", "f1", "f2"])[..]);
        assert_eq!(merged.body_parts(), names(&["nose", "tail"]));
        assert_eq!(merged.coordinate("f0", &key("nose")).unwrap(), Some(Point::new(1.0, 1.0)));
        assert_eq!(merged.coordinate("f0", &key("tail")).unwrap(), None);
        assert_eq!(merged.coordinate("f2", &key("nose")).unwrap(), None);
        assert_eq!(merged.coordinate("f2", &key("tail")).unwrap(), Some(Point::new(5.0, 6.0)));
    }

    #[test]
    fn test_columns_are_keyed_by_scorer_too() {
        let mut prior = AnnotationStore::new("Bea", &names(&["f0"]), &names(&["nose"]));
        prior.set_coordinate("f0", &ColumnKey::new("Bea", "nose"), Point::new(1.0, 1.0)).unwrap();
        let mut current = AnnotationStore::new("Alex", &names(&["f0"]), &names(&["nose"]));
        current.set_coordinate("f0", &key("nose"), Point::new(9.0, 9.0)).unwrap();

        assert!(matches!(
            current.coordinate("f0", &ColumnKey::new("Bea", "nose")),
            Err(LabelingError::UnknownBodyPart(_))
        ));

        let merged = current.merged_with(&prior);
        assert_eq!(merged.columns().len(), 2);
        assert_eq!(merged.body_parts(), names(&["nose"]));
        assert_eq!(
            merged.coordinate("f0", &ColumnKey::new("Bea", "nose")).unwrap(),
            Some(Point::new(1.0, 1.0))
        );
        assert_eq!(merged.coordinate("f0", &key("nose")).unwrap(), Some(Point::new(9.0, 9.0)));
    }

    #[test]
    fn test_rows_follow_frame_order() {
        let mut store = AnnotationStore::new("Alex", &names(&["f1", "f0"]), &names(&["nose"]));
        store.set_coordinate("f0", &key("nose"), Point::new(2.0, 3.0)).unwrap();
        let rows: Vec<_> = store.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ("f1", &[None][..]));
        assert_eq!(rows[1], ("f0", &[Some(Point::new(2.0, 3.0))][..]));
    }

    #[test]
    fn test_from_parts_checks_shape() {
        let result = AnnotationStore::from_parts(
            vec![ColumnKey::new("Alex", "nose")],
            names(&["f0"]),
            vec![vec![None, None]],
        );
        assert!(result.is_err());
    }
}
