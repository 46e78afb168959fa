//! Standalone Leaflet map generation.
//!
//! The output is a single self-contained HTML document; Leaflet itself is
//! referenced from CDN and tile layers by URL template, both resolved
//! lazily by the viewing browser. This program performs no tile fetches.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::coords::Dms;
use crate::error::{PoseError, Result};
use crate::model::{self, ImageRecord};
use crate::table;

/// Initial zoom of the generated map.
const INITIAL_ZOOM: u32 = 18;

/// One selectable base tile layer. Exactly one is active at a time; none
/// doubles as an overlay.
#[derive(Debug, Clone)]
pub struct TileLayer {
    pub name: &'static str,
    pub url_template: &'static str,
    pub attribution: &'static str,
}

impl TileLayer {
    /// The base layers offered by the layer control, first one active by
    /// default. The 天地图 WMTS template keeps its key placeholder; supply
    /// a real key to use that layer.
    pub fn defaults() -> Vec<TileLayer> {
        vec![
            TileLayer {
                name: "高德地图",
                url_template: "http://webrd02.is.autonavi.com/appmaptile?lang=zh_cn&size=1&scale=1&style=8&x={x}&y={y}&z={z}",
                attribution: "高德地图",
            },
            TileLayer {
                name: "高德卫星图",
                url_template: "http://webst02.is.autonavi.com/appmaptile?style=6&x={x}&y={y}&z={z}",
                attribution: "高德卫星",
            },
            TileLayer {
                name: "天地图",
                url_template: "http://t3.tianditu.gov.cn/vec_w/wmts?SERVICE=WMTS&REQUEST=GetTile&VERSION=1.0.0&LAYER=vec&STYLE=default&TILEMATRIXSET=w&FORMAT=tiles&TILEMATRIX={z}&TILEROW={y}&TILECOL={x}&tk=你的天地图密钥",
                attribution: "天地图",
            },
            TileLayer {
                name: "OpenStreetMap",
                url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
                attribution: "&copy; OpenStreetMap contributors",
            },
            TileLayer {
                name: "Google 矢量地图",
                url_template: "https://mt1.google.com/vt/lyrs=m&x={x}&y={y}&z={z}",
                attribution: "Google Maps",
            },
            TileLayer {
                name: "Google 卫星影像",
                url_template: "https://mt1.google.com/vt/lyrs=s&x={x}&y={y}&z={z}",
                attribution: "Google Satellite",
            },
        ]
    }
}

/// Marker data embedded into the document; the popup text is assembled
/// browser-side from these fields.
#[derive(Debug, Serialize)]
struct MarkerData {
    name: String,
    lat: f64,
    lon: f64,
    alt: Option<f64>,
    date: Option<String>,
}

/// Output file for a pose CSV: `<input_basename>_map.html` beside it.
pub fn output_html_path(csv_path: &Path) -> PathBuf {
    let stem = csv_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "poses".to_string());
    let parent = csv_path.parent().unwrap_or_else(|| Path::new("."));
    parent.join(format!("{stem}_map.html"))
}

/// Assembles and persists the trajectory map document.
pub struct MapWriter {
    layers: Vec<TileLayer>,
}

impl MapWriter {
    pub fn new(layers: Vec<TileLayer>) -> Self {
        Self { layers }
    }

    /// Renders the document. Rows without coordinates are excluded from
    /// the centroid, the markers and the trajectory line; the line follows
    /// file order, which approximates capture order.
    pub fn render(&self, records: &[ImageRecord], place_label: &str) -> Result<String> {
        let (center_lat, center_lon) =
            table::centroid(records).ok_or(PoseError::NoLocatedRows)?;

        let markers: Vec<MarkerData> = records
            .iter()
            .filter_map(|record| {
                record.located().map(|(lat, lon)| MarkerData {
                    name: record.image_name.clone(),
                    lat,
                    lon,
                    alt: record.altitude,
                    date: model::capture_date(&record.image_name),
                })
            })
            .collect();

        let coords_text = format!(
            "东经 {}, 北纬 {}",
            Dms::from_decimal(center_lon),
            Dms::from_decimal(center_lat)
        );

        let mut layer_lines = String::new();
        for layer in &self.layers {
            layer_lines.push_str(&format!(
                "        baseLayers[{}] = L.tileLayer({}, {{ maxZoom: 19, attribution: {} }});\n",
                js_string(layer.name)?,
                js_string(layer.url_template)?,
                js_string(layer.attribution)?,
            ));
        }
        let default_layer = self
            .layers
            .first()
            .map(|layer| js_string(layer.name))
            .transpose()?
            .unwrap_or_else(|| "null".to_string());

        let html = TEMPLATE
            .replace("__POSE_DATA__", &serde_json::to_string(&markers)?)
            .replace(
                "__CENTER__",
                &format!("[{center_lat}, {center_lon}]"),
            )
            .replace("__ZOOM__", &INITIAL_ZOOM.to_string())
            .replace("__BASE_LAYERS__\n", &layer_lines)
            .replace("__DEFAULT_LAYER__", &default_layer)
            .replace("__LOCATION_LABEL__", place_label)
            .replace("__COORDS_TEXT__", &coords_text);
        Ok(html)
    }

    pub fn write(
        &self,
        records: &[ImageRecord],
        place_label: &str,
        output_path: &Path,
    ) -> Result<()> {
        let html = self.render(records, place_label)?;
        fs::write(output_path, html).map_err(|source| PoseError::io(output_path, source))?;
        info!("Written map: {:?}", output_path);
        Ok(())
    }
}

fn js_string(text: &str) -> Result<String> {
    Ok(serde_json::to_string(text)?)
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>相机轨迹</title>
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
    <style>
        body { margin: 0; padding: 0; }
        #map { height: 100vh; width: 100vw; }
        .location-panel {
            position: fixed;
            bottom: 10px;
            left: 10px;
            z-index: 1000;
            background-color: white;
            padding: 5px;
            border-radius: 5px;
            font-size: 12px;
            font-family: Arial;
            box-shadow: 0 0 5px rgba(0,0,0,0.2);
        }
    </style>
</head>
<body>
    <div id="map"></div>
    <div class="location-panel">当前位置：__LOCATION_LABEL__<br>坐标：__COORDS_TEXT__</div>

    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
    <script>
        var poseData = __POSE_DATA__;

        var map = L.map('map', { center: __CENTER__, zoom: __ZOOM__ });

        var baseLayers = {};
__BASE_LAYERS__
        baseLayers[__DEFAULT_LAYER__].addTo(map);

        var track = L.featureGroup();
        poseData.forEach(function (p) {
            var popup = '图片: ' + p.name
                + '<br>经度: ' + p.lon.toFixed(6)
                + '<br>纬度: ' + p.lat.toFixed(6)
                + '<br>高度: ' + (p.alt == null ? '未知' : p.alt.toFixed(2) + 'm')
                + '<br>拍摄日期: ' + (p.date == null ? '未知时间' : p.date);
            L.circleMarker([p.lat, p.lon], {
                radius: 3,
                color: 'red',
                fill: true,
                fillColor: 'red'
            }).bindPopup(popup).addTo(track);
        });

        L.polyline(poseData.map(function (p) { return [p.lat, p.lon]; }), {
            weight: 2,
            color: 'blue',
            opacity: 0.8
        }).addTo(track);

        track.addTo(map);

        L.control.layers(baseLayers, { '相机位置': track }).addTo(map);
        L.control.scale().addTo(map);
    </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_records() -> Vec<ImageRecord> {
        vec![
            ImageRecord {
                image_name: "DJI_20240115103045_0001.JPG".to_string(),
                longitude: Some(121.554154),
                latitude: Some(31.224361),
                altitude: Some(88.2),
            },
            ImageRecord::unlocated("DJI_20240115103047_0002.JPG".to_string()),
            ImageRecord {
                image_name: "DJI_20240115103049_0003.JPG".to_string(),
                longitude: Some(121.554354),
                latitude: Some(31.224561),
                altitude: None,
            },
        ]
    }

    #[test]
    fn render_includes_layers_markers_and_overlay() {
        let writer = MapWriter::new(TileLayer::defaults());
        let html = writer.render(&sample_records(), "中国 上海 上海市").unwrap();

        for layer in TileLayer::defaults() {
            assert!(html.contains(layer.name), "missing layer {}", layer.name);
        }
        // Only the two located rows become markers.
        assert_eq!(html.matches("\"name\":").count(), 2);
        assert!(html.contains("DJI_20240115103045_0001.JPG"));
        assert!(!html.contains("DJI_20240115103047_0002.JPG"));
        assert!(html.contains("L.polyline"));
        assert!(html.contains("当前位置：中国 上海 上海市"));
        assert!(html.contains("东经 121\u{00b0}33\u{2032}"));
        assert!(html.contains("zoom: 18"));
        assert!(!html.contains("__POSE_DATA__"));
        assert!(!html.contains("__BASE_LAYERS__"));
    }

    #[test]
    fn render_requires_located_rows() {
        let writer = MapWriter::new(TileLayer::defaults());
        let records = [ImageRecord::unlocated("a.jpg".to_string())];
        assert!(matches!(
            writer.render(&records, "x"),
            Err(PoseError::NoLocatedRows)
        ));
    }

    #[test]
    fn write_produces_a_non_empty_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("poses_map.html");
        let writer = MapWriter::new(TileLayer::defaults());
        writer.write(&sample_records(), "somewhere", &path).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }

    #[test]
    fn html_output_path_sits_beside_the_input() {
        let path = output_html_path(Path::new("/data/flight_0115_exif_data.csv"));
        assert_eq!(path, PathBuf::from("/data/flight_0115_exif_data_map.html"));
    }
}
