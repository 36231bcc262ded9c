//! Offline featurize tool - runs the batch pipeline over a CSV of raw
//! listing rows and writes the fixed-column feature table

use anyhow::{Context, Result};
use house_price_service::features::{self, FeatureRow, RawListing};
use serde_json::{Map, Value};
use std::env;
use tracing::{info, warn};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        anyhow::bail!("usage: featurize <input.csv> [output.csv]");
    }
    let input_path = &args[1];
    let output_path = args.get(2).map(String::as_str).unwrap_or("features.csv");

    info!("Step 1/3: Reading raw listings from {}", input_path);
    let listings = read_raw_csv(input_path)?;

    info!("Step 2/3: Building features for {} listings", listings.len());
    let rows = features::build_features(&listings)
        .context("feature pipeline rejected the batch")?;

    info!("Step 3/3: Writing feature table to {}", output_path);
    write_features(output_path, &rows)?;
    info!("✓ Wrote {} feature rows", rows.len());

    Ok(())
}

/// Read raw listings from a headered CSV; every non-empty cell becomes a
/// string field keyed by its header name
fn read_raw_csv(path: &str) -> Result<Vec<RawListing>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path))?;

    let headers = reader.headers()?.clone();

    let mut listings = Vec::new();
    let mut parse_errors = 0;

    for (idx, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                parse_errors += 1;
                if parse_errors <= 10 {
                    // Only log first 10 errors
                    warn!("Failed to read row {}: {}", idx, e);
                }
                continue;
            }
        };

        let mut object = Map::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            if !cell.is_empty() {
                object.insert(header.to_string(), Value::String(cell.to_string()));
            }
        }

        match serde_json::from_value::<RawListing>(Value::Object(object)) {
            Ok(listing) => listings.push(listing),
            Err(e) => {
                parse_errors += 1;
                if parse_errors <= 10 {
                    warn!("Failed to parse row {}: {}", idx, e);
                }
            }
        }
    }

    info!(
        "Parsed {} listings from CSV ({} errors)",
        listings.len(),
        parse_errors
    );

    Ok(listings)
}

fn write_features(path: &str, rows: &[FeatureRow]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("failed to create {}", path))?;

    writer.write_record(FeatureRow::COLUMNS)?;
    for row in rows {
        writer.write_record(row.csv_record())?;
    }
    writer.flush()?;

    Ok(())
}
