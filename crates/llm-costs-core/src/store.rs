//! Persistence of the harvested record set.
//!
//! The snapshot lives as one JSON object keyed by model id
//! (`latest_prices.json`): every record carries all nine keys, with
//! unparsed prices as `null`. A seed snapshot is bundled into the crate
//! so lookups work before the first refresh.

#[cfg(feature = "network")]
use crate::error::CostsError;
use crate::error::Result;
use crate::record::RecordSet;

/// File name of the persisted snapshot inside the cache directory.
pub const SNAPSHOT_FILE: &str = "latest_prices.json";

/// Parse a record set from its persisted JSON form.
pub fn parse_records(json: &str) -> Result<RecordSet> {
    Ok(serde_json::from_str(json)?)
}

/// Serialize with the same pretty formatting [`save`] writes.
pub fn to_json(records: &RecordSet) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Load the bundled seed snapshot compiled into the crate.
pub fn load_bundled() -> Result<RecordSet> {
    parse_records(include_str!("../../../data/latest_prices.json"))
}

/// Load a record set from a snapshot file.
#[cfg(feature = "network")]
pub fn load(path: &std::path::Path) -> Result<RecordSet> {
    let content = std::fs::read_to_string(path).map_err(|e| CostsError::Io(e.to_string()))?;
    parse_records(&content)
}

/// Write a record set to a snapshot file, creating parent directories.
#[cfg(feature = "network")]
pub fn save(path: &std::path::Path, records: &RecordSet) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CostsError::Io(e.to_string()))?;
    }
    std::fs::write(path, to_json(records)?).map_err(|e| CostsError::Io(e.to_string()))
}

/// Cache directory for llm-costs data files, created on first use.
#[cfg(feature = "network")]
pub fn cache_dir() -> Option<std::path::PathBuf> {
    let dir = dirs::cache_dir()?.join("llm-costs");
    if !dir.exists() {
        std::fs::create_dir_all(&dir).ok()?;
    }
    Some(dir)
}

/// Path of the cached snapshot, if the cache directory is available.
#[cfg(feature = "network")]
pub fn snapshot_path() -> Option<std::path::PathBuf> {
    Some(cache_dir()?.join(SNAPSHOT_FILE))
}

/// Load the snapshot: the cached file when present and readable, the
/// bundled seed otherwise.
#[cfg(feature = "network")]
pub fn load_cached() -> Result<RecordSet> {
    if let Some(path) = snapshot_path() {
        if let Ok(content) = std::fs::read_to_string(&path) {
            if let Ok(records) = parse_records(&content) {
                return Ok(records);
            }
        }
    }
    load_bundled()
}
