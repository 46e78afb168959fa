//! Sexagesimal/decimal coordinate conversions.

use std::fmt;

/// Reference letters marking the positive hemisphere of each axis.
pub const LATITUDE_POSITIVE: char = 'N';
pub const LONGITUDE_POSITIVE: char = 'E';

/// degrees + minutes/60 + seconds/3600, unsigned.
pub fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64) -> f64 {
    degrees + minutes / 60.0 + seconds / 3600.0
}

/// Applies the hemisphere reference to a converted value. Any reference
/// other than the axis's positive letter negates; "S"/"W" are not
/// validated, matching the permissive convention of the capture pipeline.
pub fn signed(decimal: f64, reference: char, positive: char) -> f64 {
    if reference == positive {
        decimal
    } else {
        -decimal
    }
}

/// Resolves the four coordinate sub-tags into a (latitude, longitude)
/// pair. The pair is derived jointly: if any of the four inputs is
/// missing, the whole pair is absent, never half of it.
pub fn resolve_coordinates(
    latitude: Option<(f64, f64, f64)>,
    latitude_ref: Option<char>,
    longitude: Option<(f64, f64, f64)>,
    longitude_ref: Option<char>,
) -> Option<(f64, f64)> {
    let (lat, lat_ref) = (latitude?, latitude_ref?);
    let (lon, lon_ref) = (longitude?, longitude_ref?);

    let lat = signed(dms_to_decimal(lat.0, lat.1, lat.2), lat_ref, LATITUDE_POSITIVE);
    let lon = signed(dms_to_decimal(lon.0, lon.1, lon.2), lon_ref, LONGITUDE_POSITIVE);
    Some((lat, lon))
}

/// Degree-minute-second rendering of a decimal coordinate, as shown in the
/// map's overlay panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dms {
    pub degrees: i32,
    pub minutes: u32,
    pub seconds: f64,
}

impl Dms {
    /// Degrees truncate toward zero, minutes floor, seconds round to two
    /// decimals.
    pub fn from_decimal(decimal: f64) -> Self {
        let degrees = decimal.trunc() as i32;
        let minutes_decimal = (decimal - f64::from(degrees)).abs() * 60.0;
        let minutes = minutes_decimal.floor() as u32;
        let seconds = ((minutes_decimal - f64::from(minutes)) * 60.0 * 100.0).round() / 100.0;
        Self {
            degrees,
            minutes,
            seconds,
        }
    }
}

impl fmt::Display for Dms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\u{00b0}{}\u{2032}{}\u{2033}", self.degrees, self.minutes, self.seconds)
    }
}
