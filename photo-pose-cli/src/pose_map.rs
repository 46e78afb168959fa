use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use reverse_geocoder::ReverseGeocoder;
use tracing::info;

use photo_pose::geocode::{self, LocationNameMap};
use photo_pose::map::{self, MapWriter, TileLayer};
use photo_pose::table;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 姿态CSV文件路径 (image_name, longitude, latitude, altitude)
    #[arg(value_name = "CSV_PATH")]
    csv_path: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let pose_table = table::load_table(&args.csv_path)
        .with_context(|| format!("failed to read {:?}", args.csv_path))?;
    if !pose_table.is_canonical() {
        anyhow::bail!(
            "expected 4 columns (image_name, longitude, latitude, altitude), found {}",
            pose_table.columns.len()
        );
    }

    info!(
        "Loaded {} rows from {:?}",
        pose_table.records.len(),
        args.csv_path
    );
    log_coordinate_ranges(&pose_table.records);

    let (center_lat, center_lon) =
        table::centroid(&pose_table.records).context("no rows with usable coordinates")?;

    let names = LocationNameMap::load(&data_dir());
    let geocoder = ReverseGeocoder::new();
    let label = geocode::place_label(&geocoder, &names, center_lat, center_lon);
    info!(
        "Centroid ({:.6}, {:.6}) resolved to: {}",
        center_lat, center_lon, label
    );

    let output_path = map::output_html_path(&args.csv_path);
    let writer = MapWriter::new(TileLayer::defaults());
    writer.write(&pose_table.records, &label, &output_path)?;
    info!("Map saved to: {:?}", output_path);

    Ok(())
}

fn log_coordinate_ranges(records: &[photo_pose::ImageRecord]) {
    let located: Vec<(f64, f64)> = records.iter().filter_map(|r| r.located()).collect();
    if located.is_empty() {
        return;
    }
    let (mut lat_min, mut lat_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut lon_min, mut lon_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for (lat, lon) in located {
        lat_min = lat_min.min(lat);
        lat_max = lat_max.max(lat);
        lon_min = lon_min.min(lon);
        lon_max = lon_max.max(lon);
    }
    info!("Latitude range: [{:.6}, {:.6}]", lat_min, lat_max);
    info!("Longitude range: [{:.6}, {:.6}]", lon_min, lon_max);
}

/// The translation tables live in a data/ directory next to the
/// executable, with the working directory as fallback.
fn data_dir() -> PathBuf {
    let exe_data = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("data")));
    match exe_data {
        Some(dir) if dir.is_dir() => dir,
        _ => PathBuf::from("data"),
    }
}
