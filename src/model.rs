use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One output row per scanned image. Field order is the on-disk column
/// order: (image_name, longitude, latitude, altitude), no header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub image_name: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub altitude: Option<f64>,
}

impl ImageRecord {
    /// A record for an image whose metadata could not be used. Fields stay
    /// absent, they are never fabricated.
    pub fn unlocated(image_name: String) -> Self {
        Self {
            image_name,
            longitude: None,
            latitude: None,
            altitude: None,
        }
    }

    /// (latitude, longitude) when both are present. The pair is derived
    /// jointly during extraction, so a lone coordinate never occurs in
    /// records we produced ourselves, but loaded files get no such promise.
    pub fn located(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// One image the scanner could not decode.
#[derive(Debug, Clone)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of one folder scan. Every scanned file contributes a record, in
/// filename order; decode failures additionally land in `failures` so the
/// caller decides how to surface them.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub records: Vec<ImageRecord>,
    pub failures: Vec<ScanFailure>,
}

impl ScanReport {
    pub fn located_count(&self) -> usize {
        self.records.iter().filter(|r| r.located().is_some()).count()
    }
}

/// DJI filenames embed the capture time: `DJI_YYYYMMDDHHMMSS_XXXX.JPG`.
/// Returns the capture date rendered for display, or `None` for names that
/// do not follow the pattern.
pub fn capture_date(image_name: &str) -> Option<String> {
    let stamp = image_name.split('_').nth(1)?;
    let parsed = NaiveDateTime::parse_from_str(stamp, "%Y%m%d%H%M%S").ok()?;
    Some(parsed.format("%Y年%m月%d日").to_string())
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn located_requires_both_coordinates() {
        let mut record = ImageRecord::unlocated("a.jpg".to_string());
        assert_eq!(record.located(), None);

        record.latitude = Some(30.0);
        assert_eq!(record.located(), None);

        record.longitude = Some(120.0);
        assert_eq!(record.located(), Some((30.0, 120.0)));
    }

    #[test]
    fn capture_date_from_dji_name() {
        assert_eq!(
            capture_date("DJI_20240115103045_0001.JPG"),
            Some("2024年01月15日".to_string())
        );
    }

    #[test]
    fn capture_date_rejects_other_names() {
        assert_eq!(capture_date("IMG_1234.jpg"), None);
        assert_eq!(capture_date("snapshot.png"), None);
        assert_eq!(capture_date("DJI_notadate_0001.JPG"), None);
    }
}
