// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Label table serialization and deserialization.
//!
//! Every save writes the same table twice next to the frames: a CSV file
//! with three header rows (`scorer`, `bodyparts`, `coords`) and a JSON
//! table file. The JSON file is also what extend mode reads back.

use crate::error::{LabelingError, Result};
use crate::models::{
    annotation::Point,
    store::{AnnotationStore, ColumnKey},
};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Key recorded in the table file.
pub const TABLE_KEY: &str = "df_with_missing";

/// Structured form of the label table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableFile {
    pub key: String,
    /// `[scorer, bodypart, axis]` per data column.
    pub columns: Vec<[String; 3]>,
    /// Frame ids, one per data row.
    pub index: Vec<String>,
    pub data: Vec<Vec<Option<f64>>>,
}

impl TableFile {
    /// Flatten a store into the table layout.
    pub fn from_store(store: &AnnotationStore) -> Self {
        let columns = store
            .columns()
            .iter()
            .flat_map(|c| {
                ["x", "y"].map(|axis| [c.scorer.clone(), c.body_part.clone(), axis.to_string()])
            })
            .collect();
        let data = store
            .rows()
            .map(|(_, cells)| {
                cells
                    .iter()
                    .flat_map(|cell| match cell {
                        Some(p) => [Some(p.x), Some(p.y)],
                        None => [None, None],
                    })
                    .collect()
            })
            .collect();
        Self {
            key: TABLE_KEY.to_string(),
            columns,
            index: store.frames().to_vec(),
            data,
        }
    }

    /// Rebuild a store; columns must come in `x`, `y` pairs per body part.
    pub fn into_store(self) -> Result<AnnotationStore> {
        if self.columns.len() % 2 != 0 {
            return Err(LabelingError::MalformedTable(
                "odd number of coordinate columns".into(),
            ));
        }

        let mut keys = Vec::with_capacity(self.columns.len() / 2);
        for pair in self.columns.chunks(2) {
            let (x, y) = (&pair[0], &pair[1]);
            if x[0] != y[0] || x[1] != y[1] || x[2] != "x" || y[2] != "y" {
                return Err(LabelingError::MalformedTable(format!(
                    "expected x/y pair, got {:?} and {:?}",
                    x, y
                )));
            }
            keys.push(ColumnKey::new(x[0].as_str(), x[1].as_str()));
        }

        let mut cells = Vec::with_capacity(self.data.len());
        for row in &self.data {
            if row.len() != self.columns.len() {
                return Err(LabelingError::MalformedTable(format!(
                    "row has {} values, expected {}",
                    row.len(),
                    self.columns.len()
                )));
            }
            let points = row
                .chunks(2)
                .map(|xy| match (xy[0], xy[1]) {
                    (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some(Point::new(x, y)),
                    _ => None,
                })
                .collect();
            cells.push(points);
        }

        AnnotationStore::from_parts(keys, self.index, cells)
    }
}

/// Paths written by one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub csv: PathBuf,
    pub table: PathBuf,
}

/// `<directory>/<stem>.csv` and `<directory>/<stem>.json`.
pub fn collected_data_paths(directory: &Path, stem: &str) -> ExportedFiles {
    ExportedFiles {
        csv: directory.join(format!("{}.csv", stem)),
        table: directory.join(format!("{}.json", stem)),
    }
}

/// Write the store in both formats.
pub fn export_store(store: &AnnotationStore, directory: &Path, stem: &str) -> Result<ExportedFiles> {
    let files = collected_data_paths(directory, stem);

    let mut csv = Vec::new();
    write_csv(store, &mut csv).map_err(|e| LabelingError::io(&files.csv, e))?;
    std::fs::write(&files.csv, csv).map_err(|e| LabelingError::io(&files.csv, e))?;

    let json = serde_json::to_string_pretty(&TableFile::from_store(store))
        .map_err(|e| LabelingError::io(&files.table, e.into()))?;
    std::fs::write(&files.table, json).map_err(|e| LabelingError::io(&files.table, e))?;

    log::info!(
        "Exported {} frames x {} body parts to {} and {}",
        store.frames().len(),
        store.columns().len(),
        files.csv.display(),
        files.table.display()
    );
    Ok(files)
}

/// Read a store previously written by [`export_store`].
pub fn import_store(path: &Path) -> Result<AnnotationStore> {
    let json = std::fs::read_to_string(path).map_err(|e| LabelingError::io(path, e))?;
    let table: TableFile = serde_json::from_str(&json).map_err(|e| LabelingError::parse(path, e))?;
    if table.key != TABLE_KEY {
        log::warn!("Unexpected table key '{}' in {}", table.key, path.display());
    }
    let store = table.into_store()?;
    log::info!(
        "Imported {} frames, body parts {:?} from {}",
        store.frames().len(),
        store.body_parts(),
        path.display()
    );
    Ok(store)
}

/// Write the CSV form: three header rows then one row per frame.
pub fn write_csv<W: Write>(store: &AnnotationStore, mut out: W) -> std::io::Result<()> {
    let columns = store.columns();

    writeln!(out, "{}", header_line("scorer", columns, |c, _| c.scorer.clone()))?;
    writeln!(out, "{}", header_line("bodyparts", columns, |c, _| c.body_part.clone()))?;
    writeln!(out, "{}", header_line("coords", columns, |_, axis| axis.to_string()))?;

    for (frame, cells) in store.rows() {
        let mut line = escape(frame);
        for cell in cells {
            match cell {
                Some(p) => line.push_str(&format!(",{:?},{:?}", p.x, p.y)),
                None => line.push_str(",,"),
            }
        }
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

fn header_line(label: &str, columns: &[ColumnKey], cell: impl Fn(&ColumnKey, &str) -> String) -> String {
    let mut line = String::from(label);
    for column in columns {
        for axis in ["x", "y"] {
            line.push(',');
            line.push_str(&escape(&cell(column, axis)));
        }
    }
    line
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
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

    fn sample_store() -> AnnotationStore {
        let mut store =
            AnnotationStore::new("Alex", &names(&["img0.png", "img1.png"]), &names(&["nose", "tail"]));
        store.set_coordinate("img0.png", &key("nose"), Point::new(10.0, 20.0)).unwrap();
        store.set_coordinate("img1.png", &key("tail"), Point::new(30.5, 40.0)).unwrap();
        store
    }

    #[test]
    fn test_csv_layout() {
        let mut out = Vec::new();
        write_csv(&sample_store(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "scorer,Alex,Alex,Alex,Alex");
        assert_eq!(lines[1], "bodyparts,nose,nose,tail,tail");
        assert_eq!(lines[2], "coords,x,y,x,y");
        assert_eq!(lines[3], "img0.png,10.0,20.0,,");
        assert_eq!(lines[4], "img1.png,,,30.5,40.0");
    }

    #[test]
    fn test_csv_escapes_frame_ids() {
        let store = AnnotationStore::new("Alex", &names(&["a,b.png"]), &names(&["nose"]));
        let mut out = Vec::new();
        write_csv(&store, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("\"a,b.png\",,"));
    }

    #[test]
    fn test_table_file_keeps_missing_as_null() {
        let table = TableFile::from_store(&sample_store());
        assert_eq!(table.columns.len(), 4);
        assert_eq!(
            table.columns[2],
            ["Alex".to_string(), "tail".to_string(), "x".to_string()]
        );
        assert_eq!(table.data[0], vec![Some(10.0), Some(20.0), None, None]);

        let json = serde_json::to_string(&table).unwrap();
        assert!(json.contains("null"));
    }

    #[test]
    fn test_export_then_import() {
        let dir = tempfile::tempdir().unwrap();
        let store = sample_store();
        let files = export_store(&store, dir.path(), "CollectedData_Alex").unwrap();
        assert!(files.csv.ends_with("CollectedData_Alex.csv"));
        assert!(files.csv.exists());

        let restored = import_store(&files.table).unwrap();
        assert_eq!(restored, store);
    }

    #[test]
    fn test_import_rejects_unpaired_columns() {
        let table = TableFile {
            key: TABLE_KEY.into(),
            columns: vec![
                ["Alex".into(), "nose".into(), "x".into()],
                ["Alex".into(), "tail".into(), "y".into()],
            ],
            index: names(&["f0"]),
            data: vec![vec![None, None]],
        };
        assert!(matches!(table.into_store(), Err(LabelingError::MalformedTable(_))));
    }

    #[test]
    fn test_import_garbled_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CollectedData_Alex.json");
        std::fs::write(&path, "{\"key\": ").unwrap();
        let err = import_store(&path).unwrap_err();
        assert!(matches!(err, LabelingError::Parse { .. }));
    }

    #[test]
    fn test_import_missing_file_is_io_error() {
        let err = import_store(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, LabelingError::Io { .. }));
    }
}
