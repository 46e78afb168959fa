//! Folder scanning and record aggregation.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{PoseError, Result};
use crate::exif_reader;
use crate::model::{self, ImageRecord, ScanFailure, ScanReport};

/// Extensions recognized as images, matched case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "tif", "tiff"];

/// Lists the image files of `folder` (non-recursive), de-duplicated by
/// absolute path and sorted lexicographically.
pub fn collect_image_files(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(PoseError::NotADirectory(folder.to_path_buf()));
    }

    // BTreeSet gives both the dedup and the deterministic order.
    let mut files = BTreeSet::new();
    let entries = fs::read_dir(folder).map_err(|source| PoseError::io(folder, source))?;
    for entry in entries {
        let entry = entry.map_err(|source| PoseError::io(folder, source))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()));
        if matches {
            files.insert(match path.canonicalize() {
                Ok(absolute) => absolute,
                Err(_) => path,
            });
        }
    }
    Ok(files.into_iter().collect())
}

/// Scans `folder` and extracts one record per image, in order. A decode
/// failure still yields a record (with absent fields) plus an entry in the
/// report's failure list; it never aborts the batch.
pub fn scan_folder(folder: &Path) -> Result<ScanReport> {
    let files = collect_image_files(folder)?;
    info!("Found {} image files", files.len());

    let mut report = ScanReport::default();
    for (index, path) in files.iter().enumerate() {
        debug!("Processing {}/{}: {:?}", index + 1, files.len(), path);
        match exif_reader::read_record(path) {
            Ok(record) => report.records.push(record),
            Err(err) => {
                report.failures.push(ScanFailure {
                    path: path.clone(),
                    reason: err.to_string(),
                });
                report
                    .records
                    .push(ImageRecord::unlocated(model::file_name(path)));
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str, contents: &[u8]) {
        let mut file = File::create(dir.join(name)).unwrap();
        file.write_all(contents).unwrap();
    }

    #[test]
    fn collects_only_allow_listed_extensions() {
        let dir = TempDir::new().unwrap();
        for name in ["a.jpg", "b.JPEG", "c.PNG", "d.tif", "e.TIFF", "notes.txt", "f.gif"] {
            touch(dir.path(), name, b"x");
        }
        fs::create_dir(dir.path().join("sub.jpg")).unwrap();

        let files = collect_image_files(dir.path()).unwrap();
        let names: Vec<String> = files.iter().map(|p| model::file_name(p)).collect();
        assert_eq!(names.len(), 5);
        assert!(!names.contains(&"notes.txt".to_string()));
        assert!(!names.contains(&"f.gif".to_string()));
        assert!(!names.contains(&"sub.jpg".to_string()));

        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn rejects_non_directories() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.jpg", b"x");
        let err = collect_image_files(&dir.path().join("a.jpg")).unwrap_err();
        assert!(matches!(err, PoseError::NotADirectory(_)));
    }

    #[test]
    fn undecodable_images_fail_soft() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.jpg", b"not an image");
        touch(dir.path(), "b.jpg", b"also not an image");

        let report = scan_folder(dir.path()).unwrap();
        // One row per scanned file, every field absent, every failure noted.
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.located_count(), 0);
        assert!(report.records.iter().all(|r| r.located().is_none()));
        assert_eq!(report.records[0].image_name, "a.jpg");
        assert_eq!(report.records[1].image_name, "b.jpg");
    }
}
