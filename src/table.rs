//! Flat-file persistence of the pose table.
//!
//! The on-disk format is four positional columns with no header row, so
//! column identity is established purely by position and count.

use std::path::{Path, PathBuf};

use crate::error::{PoseError, Result};
use crate::model::ImageRecord;

/// Canonical column names, assigned positionally on load.
pub const COLUMNS: [&str; 4] = ["image_name", "longitude", "latitude", "altitude"];

/// Output file for a scanned folder: `<parent>/<folder_name>_exif_data.csv`.
pub fn output_csv_path(folder: &Path) -> PathBuf {
    let name = folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "images".to_string());
    let parent = folder.parent().unwrap_or_else(|| Path::new("."));
    parent.join(format!("{name}_exif_data.csv"))
}

/// Writes the records as headerless rows; absent values become empty cells.
pub fn write_table(records: &[ImageRecord], path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|source| PoseError::csv(path, source))?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|source| PoseError::csv(path, source))?;
    }
    writer
        .flush()
        .map_err(|source| PoseError::io(path, source))?;
    Ok(())
}

/// A loaded pose table: the column names in effect plus the rows they
/// describe.
#[derive(Debug)]
pub struct PoseTable {
    pub columns: Vec<String>,
    pub records: Vec<ImageRecord>,
}

impl PoseTable {
    /// Whether the file had exactly four columns and therefore carries the
    /// canonical names.
    pub fn is_canonical(&self) -> bool {
        self.columns == COLUMNS
    }
}

/// Loads a pose CSV. A file with exactly four columns gets the canonical
/// names and one parsed row per line; any other width is tolerated and
/// passed through with positional names and no interpreted rows.
pub fn load_table(path: &Path) -> Result<PoseTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| PoseError::csv(path, source))?;

    let mut raw = Vec::new();
    for row in reader.records() {
        raw.push(row.map_err(|source| PoseError::csv(path, source))?);
    }

    let width = raw.first().map_or(0, |row| row.len());
    if width != COLUMNS.len() {
        return Ok(PoseTable {
            columns: (0..width).map(|i| format!("column_{i}")).collect(),
            records: Vec::new(),
        });
    }

    Ok(PoseTable {
        columns: COLUMNS.iter().map(|c| c.to_string()).collect(),
        records: raw.iter().map(parse_row).collect(),
    })
}

fn parse_row(row: &csv::StringRecord) -> ImageRecord {
    ImageRecord {
        image_name: row.get(0).unwrap_or_default().to_string(),
        longitude: numeric(row.get(1)),
        latitude: numeric(row.get(2)),
        altitude: numeric(row.get(3)),
    }
}

fn numeric(cell: Option<&str>) -> Option<f64> {
    cell.and_then(|s| s.trim().parse::<f64>().ok())
}

/// Arithmetic mean of all present coordinate pairs, as (latitude,
/// longitude). Rows without a complete pair are left out of the mean.
pub fn centroid(records: &[ImageRecord]) -> Option<(f64, f64)> {
    let mut count = 0usize;
    let (mut lat_sum, mut lon_sum) = (0.0, 0.0);
    for record in records {
        if let Some((lat, lon)) = record.located() {
            lat_sum += lat;
            lon_sum += lon;
            count += 1;
        }
    }
    (count > 0).then(|| (lat_sum / count as f64, lon_sum / count as f64))
}
