use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use tokio::fs::{self, File, OpenOptions};
use tracing::{info, warn};

use crate::carrier::CarrierCache;
use crate::contacts::known_numbers_from_json;
use crate::device::PhoneSnapshot;
use crate::enrich::EnrichedRecord;
use crate::error::{PhoneError, Result};
use crate::utils::PhoneNumber;

/// Parse newline-delimited JSON records; any bad line fails the whole file
pub fn parse_records(content: &str, path: &Path) -> Result<Vec<EnrichedRecord>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line.trim()).map_err(|e| PhoneError::CorruptRecord {
                path: path.to_path_buf(),
                line: idx + 1,
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Render records as newline-delimited JSON
pub fn render_records(records: &[EnrichedRecord]) -> Result<String> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}

pub async fn read_records(path: &Path) -> Result<Vec<EnrichedRecord>> {
    let content = fs::read_to_string(path).await?;
    parse_records(&content, path)
}

pub async fn write_records(path: &Path, records: &[EnrichedRecord]) -> Result<()> {
    fs::write(path, render_records(records)?).await?;
    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Load the carrier cache, empty if the file does not exist yet
pub async fn load_carrier_cache(path: &Path) -> Result<CarrierCache> {
    if !fs::try_exists(path).await? {
        info!("No carrier cache at {}, starting empty", path.display());
        return Ok(CarrierCache::new());
    }

    let content = fs::read_to_string(path).await?;
    let cache = CarrierCache::from_ndjson(&content, path)?;
    info!("Loaded {} carriers from {}", cache.len(), path.display());
    Ok(cache)
}

/// Open the carrier cache for appending new entries
pub async fn open_cache_appender(path: &Path) -> Result<File> {
    Ok(OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?)
}

/// Write the lookup worklist: sorted, one bare number per line
pub async fn write_worklist(path: &Path, numbers: &BTreeSet<PhoneNumber>) -> Result<()> {
    let mut out = String::new();
    for number in numbers {
        out.push_str(number.as_str());
        out.push('\n');
    }
    fs::write(path, out).await?;
    Ok(())
}

/// Parse a worklist, skipping lines that are not valid numbers
pub fn parse_worklist(content: &str) -> Vec<PhoneNumber> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let number = PhoneNumber::parse(line);
            if number.is_none() {
                warn!("Ignoring worklist line {:?}", line);
            }
            number
        })
        .collect()
}

pub async fn read_worklist(path: &Path) -> Result<Vec<PhoneNumber>> {
    let content = fs::read_to_string(path).await?;
    Ok(parse_worklist(&content))
}

pub async fn read_snapshot(path: &Path) -> Result<PhoneSnapshot> {
    let content = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

pub async fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(value)?).await?;
    Ok(())
}

/// Known contact numbers, empty if the snapshot does not exist
pub async fn load_known_numbers(path: &Path) -> Result<HashSet<PhoneNumber>> {
    if !fs::try_exists(path).await? {
        warn!(
            "No contacts snapshot at {}, every unmatched number will be spam",
            path.display()
        );
        return Ok(HashSet::new());
    }

    let content = fs::read_to_string(path).await?;
    known_numbers_from_json(&content)
}
