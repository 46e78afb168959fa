use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use photo_pose::{scan, table};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    print!("请输入包含图像的文件夹路径: ");
    io::stdout().flush().context("failed to flush prompt")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read folder path")?;
    let folder = PathBuf::from(line.trim().trim_matches('"'));

    if !folder.is_dir() {
        anyhow::bail!("Invalid folder path. Please provide a valid directory path.");
    }

    let report = scan::scan_folder(&folder)?;

    // Per-image decode failures were collected, not printed; surface them
    // here so the batch summary stays inspectable.
    for failure in &report.failures {
        warn!("Error processing {:?}: {}", failure.path, failure.reason);
    }
    info!(
        "Extracted {} records ({} located, {} failed)",
        report.records.len(),
        report.located_count(),
        report.failures.len()
    );

    let csv_path = table::output_csv_path(&folder);
    table::write_table(&report.records, &csv_path)
        .with_context(|| format!("failed to write {csv_path:?}"))?;
    info!("CSV file saved to: {:?}", csv_path);

    Ok(())
}
