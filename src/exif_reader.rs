//! Per-image GPS metadata extraction.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use exif::{Exif, In, Reader, Tag, Value};

use crate::coords;
use crate::error::{PoseError, Result};
use crate::model::{self, ImageRecord};

/// The GPS sub-tags lifted out of one image's EXIF block, before unit
/// conversion. Everything else in the block is ignored.
#[derive(Debug, Default)]
pub struct RawGpsTags {
    pub latitude: Option<(f64, f64, f64)>,
    pub latitude_ref: Option<char>,
    pub longitude: Option<(f64, f64, f64)>,
    pub longitude_ref: Option<char>,
    pub altitude: Option<f64>,
}

impl RawGpsTags {
    pub fn from_exif(exif: &Exif) -> Self {
        Self {
            latitude: triplet(exif, Tag::GPSLatitude),
            latitude_ref: reference(exif, Tag::GPSLatitudeRef),
            longitude: triplet(exif, Tag::GPSLongitude),
            longitude_ref: reference(exif, Tag::GPSLongitudeRef),
            altitude: exif
                .get_field(Tag::GPSAltitude, In::PRIMARY)
                .and_then(|field| altitude_value(&field.value)),
        }
    }

    /// Resolves the raw tags into the record fields, in on-disk column
    /// order (longitude, latitude, altitude). Altitude sign is taken as
    /// given; the sea-level reference tag is not consulted.
    pub fn resolve(&self) -> (Option<f64>, Option<f64>, Option<f64>) {
        match coords::resolve_coordinates(
            self.latitude,
            self.latitude_ref,
            self.longitude,
            self.longitude_ref,
        ) {
            Some((lat, lon)) => (Some(lon), Some(lat), self.altitude),
            None => (None, None, self.altitude),
        }
    }
}

/// Reads the GPS block of one image. Decode failures come back as errors
/// so the scanner can record them and keep going; an image that decodes
/// but carries no GPS block yields a record with absent fields.
pub fn read_record(path: &Path) -> Result<ImageRecord> {
    let file = File::open(path).map_err(|source| PoseError::io(path, source))?;
    let mut reader = BufReader::new(file);
    let exif = Reader::new()
        .read_from_container(&mut reader)
        .map_err(|source| PoseError::ExifDecode {
            path: path.to_path_buf(),
            source,
        })?;

    let raw = RawGpsTags::from_exif(&exif);
    let (longitude, latitude, altitude) = raw.resolve();
    Ok(ImageRecord {
        image_name: model::file_name(path),
        longitude,
        latitude,
        altitude,
    })
}

fn triplet(exif: &Exif, tag: Tag) -> Option<(f64, f64, f64)> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match field.value {
        Value::Rational(ref v) if v.len() == 3 => {
            Some((v[0].to_f64(), v[1].to_f64(), v[2].to_f64()))
        }
        _ => None,
    }
}

fn reference(exif: &Exif, tag: Tag) -> Option<char> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    field.display_value().to_string().chars().next()
}

/// GPSAltitude is usually a single rational; some writers store a plain
/// scalar instead. Rationals resolve to numerator/denominator.
fn altitude_value(value: &Value) -> Option<f64> {
    match *value {
        Value::Rational(ref v) if !v.is_empty() => Some(v[0].to_f64()),
        Value::SRational(ref v) if !v.is_empty() => Some(v[0].to_f64()),
        Value::Float(ref v) if !v.is_empty() => Some(f64::from(v[0])),
        Value::Double(ref v) if !v.is_empty() => Some(v[0]),
        _ => value.get_uint(0).map(f64::from),
    }
}
