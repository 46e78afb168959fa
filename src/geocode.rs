//! Reverse geocoding and place-label translation.
//!
//! The nearest-place lookup runs against `reverse_geocoder`'s embedded
//! offline index; no network call is involved. Looked-up names arrive
//! romanized and go through two static translation tables before display.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use reverse_geocoder::ReverseGeocoder;
use tracing::warn;

/// Fixed text shown when the lookup cannot produce a label.
pub const LOOKUP_FAILED: &str = "位置信息获取失败";

/// The two static name-translation tables: romanized admin-region and
/// place names to the localized forms shown on the map. Loaded once,
/// read-only afterwards.
#[derive(Debug, Default, Clone)]
pub struct LocationNameMap {
    provinces: HashMap<String, String>,
    cities: HashMap<String, String>,
}

impl LocationNameMap {
    /// Loads `province_map.json` and `city_map.json` from `data_dir`.
    /// A missing or malformed file degrades to an empty table with a
    /// warning; lookups then fall back to the untranslated names.
    pub fn load(data_dir: &Path) -> Self {
        Self {
            provinces: load_map(&data_dir.join("province_map.json")),
            cities: load_map(&data_dir.join("city_map.json")),
        }
    }

    #[cfg(test)]
    fn from_tables(provinces: HashMap<String, String>, cities: HashMap<String, String>) -> Self {
        Self { provinces, cities }
    }

    /// Translates an admin-region name. Returns the display name and
    /// whether the table knew it; unknown names fall back untranslated.
    pub fn province(&self, name: &str) -> (String, bool) {
        match self.provinces.get(name) {
            Some(translated) => (translated.clone(), true),
            None => {
                warn!("No translation for admin region {:?}", name);
                (name.to_string(), false)
            }
        }
    }

    /// Translates a place name, falling back to the untranslated form.
    pub fn city(&self, name: &str) -> String {
        match self.cities.get(name) {
            Some(translated) => translated.clone(),
            None => {
                warn!("No translation for place name {:?}", name);
                name.to_string()
            }
        }
    }
}

fn load_map(path: &Path) -> HashMap<String, String> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            warn!("Failed to read translation table {:?}: {}", path, err);
            return HashMap::new();
        }
    };
    match serde_json::from_str(&text) {
        Ok(map) => map,
        Err(err) => {
            warn!("Failed to parse translation table {:?}: {}", path, err);
            HashMap::new()
        }
    }
}

/// Label formatting strategies, keyed by country code. Mainland China gets
/// the fully localized template; the special administrative regions and
/// Taiwan have their own fixed forms; everything else uses the generic
/// "code region place" template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    Mainland,
    HongKong,
    Macau,
    Taiwan,
    Generic,
}

impl LabelStyle {
    pub fn for_country(cc: &str) -> Self {
        match cc {
            "CN" => LabelStyle::Mainland,
            "HK" => LabelStyle::HongKong,
            "MO" => LabelStyle::Macau,
            "TW" => LabelStyle::Taiwan,
            _ => LabelStyle::Generic,
        }
    }

    pub fn format(self, cc: &str, province: &str, province_known: bool, city: &str) -> String {
        match self {
            LabelStyle::Mainland if province_known => format!("中国 {province}省 {city}市"),
            LabelStyle::Mainland => format!("中国 {province} {city}市"),
            LabelStyle::HongKong => format!("中国 香港特别行政区 {city}"),
            LabelStyle::Macau => format!("中国 澳门特别行政区 {city}"),
            LabelStyle::Taiwan => format!("中国 台湾省 {city}市"),
            LabelStyle::Generic => format!("{cc} {province} {city}"),
        }
    }
}

/// Resolves a coordinate to a human-readable place label. Never fails:
/// coordinates the index cannot work with produce the fixed failure
/// string instead.
pub fn place_label(
    geocoder: &ReverseGeocoder,
    names: &LocationNameMap,
    latitude: f64,
    longitude: f64,
) -> String {
    if !latitude.is_finite() || !longitude.is_finite() {
        warn!(
            "Cannot reverse-geocode ({}, {}); falling back",
            latitude, longitude
        );
        return LOOKUP_FAILED.to_string();
    }

    let result = geocoder.search((latitude, longitude));
    let record = result.record;
    let (province, province_known) = names.province(&record.admin1);
    let city = names.city(&record.name);
    LabelStyle::for_country(&record.cc).format(&record.cc, &province, province_known, &city)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sample_names() -> LocationNameMap {
        let provinces = HashMap::from([("Zhejiang".to_string(), "浙江".to_string())]);
        let cities = HashMap::from([("Hangzhou".to_string(), "杭州".to_string())]);
        LocationNameMap::from_tables(provinces, cities)
    }

    #[test]
    fn mainland_label_with_known_province() {
        let names = sample_names();
        let (province, known) = names.province("Zhejiang");
        let city = names.city("Hangzhou");
        let label = LabelStyle::for_country("CN").format("CN", &province, known, &city);
        assert_eq!(label, "中国 浙江省 杭州市");
    }

    // Unknown region names stay untranslated instead of raising.
    #[test]
    fn unknown_region_falls_back_untranslated() {
        let names = sample_names();
        let (province, known) = names.province("Atlantis");
        assert_eq!((province.as_str(), known), ("Atlantis", false));

        let label = LabelStyle::for_country("CN").format("CN", &province, known, "Hangzhou");
        assert_eq!(label, "中国 Atlantis Hangzhou市");
    }

    #[test]
    fn special_region_labels() {
        assert_eq!(
            LabelStyle::for_country("HK").format("HK", "Hong Kong", false, "中西区"),
            "中国 香港特别行政区 中西区"
        );
        assert_eq!(
            LabelStyle::for_country("MO").format("MO", "Macau", false, "澳门"),
            "中国 澳门特别行政区 澳门"
        );
        assert_eq!(
            LabelStyle::for_country("TW").format("TW", "Taiwan", false, "台北"),
            "中国 台湾省 台北市"
        );
    }

    #[test]
    fn generic_label_for_other_countries() {
        let label = LabelStyle::for_country("JP").format("JP", "Tokyo", false, "Shinjuku");
        assert_eq!(label, "JP Tokyo Shinjuku");
    }

    #[test]
    fn missing_tables_degrade_to_empty_maps() {
        let dir = TempDir::new().unwrap();
        let names = LocationNameMap::load(dir.path());
        let (province, known) = names.province("Zhejiang");
        assert_eq!((province.as_str(), known), ("Zhejiang", false));
        assert_eq!(names.city("Hangzhou"), "Hangzhou");
    }

    #[test]
    fn malformed_table_degrades_to_empty_map() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("province_map.json"), "{not json").unwrap();
        fs::write(
            dir.path().join("city_map.json"),
            r#"{"Hangzhou": "杭州"}"#,
        )
        .unwrap();

        let names = LocationNameMap::load(dir.path());
        assert_eq!(names.province("Zhejiang").1, false);
        assert_eq!(names.city("Hangzhou"), "杭州");
    }

    #[test]
    fn non_finite_centroid_uses_the_failure_string() {
        let geocoder = ReverseGeocoder::new();
        let names = LocationNameMap::default();
        assert_eq!(
            place_label(&geocoder, &names, f64::NAN, 121.5),
            LOOKUP_FAILED
        );
    }

    #[test]
    fn offline_lookup_resolves_a_mainland_point() {
        let geocoder = ReverseGeocoder::new();
        let names = sample_names();
        // Central Hangzhou; the nearest index record is inside China.
        let label = place_label(&geocoder, &names, 30.2741, 120.1551);
        assert!(label.starts_with("中国"), "unexpected label: {label}");
    }
}
