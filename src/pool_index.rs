// src/pool_index.rs
//
// Loads the pools file and selects the records touching a queried token.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// One liquidity-pool record from the pools file. Addresses are opaque,
/// case-insensitive strings; any extra fields in the file are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PoolRecord {
    pub pool_address: String,
    pub token0: String,
    pub token1: String,
}

/// Reads and parses the pools file. A missing or unparsable file is fatal:
/// there is nothing to probe without it.
pub fn load_pool_records(path: &Path) -> Result<Vec<PoolRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("pools file not found or unreadable: {}", path.display()))?;
    let records: Vec<PoolRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("pools file is not a JSON array of pool records: {}", path.display()))?;
    Ok(records)
}

/// Every record whose token0 or token1 equals `token_address`, compared
/// case-insensitively. Input order is preserved; an empty result is a
/// valid outcome, not an error.
pub fn find_pools_by_token<'a>(pools: &'a [PoolRecord], token_address: &str) -> Vec<&'a PoolRecord> {
    let needle = token_address.to_lowercase();
    pools
        .iter()
        .filter(|pool| {
            pool.token0.to_lowercase() == needle || pool.token1.to_lowercase() == needle
        })
        .collect()
}
