// src/decimals.rs
//
// Batched decimals() resolution across every token referenced by the
// matched pools, one transport round trip for the whole set.

use std::collections::HashMap;

use ethers::types::U256;
use indexmap::IndexSet;
use log::{debug, warn};

use crate::rpc::{RequestBatch, RpcReply, RpcRequest, DECIMALS_SELECTOR};
use crate::transport::Transport;

/// Exponent assumed for any token whose decimals could not be resolved.
pub const DEFAULT_DECIMALS: u32 = 18;

/// Lowercase token address → decimals exponent.
///
/// Lookups are total: tokens with no entry resolve to [`DEFAULT_DECIMALS`].
/// That single default also covers responses that failed to parse, which
/// simply never populate the table.
#[derive(Debug, Clone, Default)]
pub struct DecimalsTable {
    entries: HashMap<String, u32>,
}

impl DecimalsTable {
    pub fn decimals(&self, address: &str) -> u32 {
        self.entries
            .get(&address.to_lowercase())
            .copied()
            .unwrap_or(DEFAULT_DECIMALS)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, address: String, decimals: u32) {
        self.entries.insert(address, decimals);
    }
}

/// Resolves decimals() for every address in one batched `eth_call` round
/// trip. Addresses are expected lowercase; ids follow the set's iteration
/// order. A failed batch yields an empty table, which downstream lookups
/// absorb through the default.
pub async fn resolve_decimals(
    transport: &dyn Transport,
    addresses: &IndexSet<String>,
) -> DecimalsTable {
    let mut table = DecimalsTable::default();
    if addresses.is_empty() {
        return table;
    }

    let mut batch = RequestBatch::new();
    for address in addresses {
        batch.push(address.clone(), |id| {
            RpcRequest::eth_call(id, address, DECIMALS_SELECTOR)
        });
    }

    let payload = batch.to_payload();
    let Some(reply) = transport.send(&payload).await else {
        warn!(
            "decimals batch for {} tokens got no response; all will default to {}",
            addresses.len(),
            DEFAULT_DECIMALS
        );
        return table;
    };
    let Some(reply) = RpcReply::from_value(reply) else {
        warn!("decimals batch reply had an unexpected shape");
        return table;
    };

    for (address, response) in batch.correlate(reply) {
        let Some(raw) = response.result_str() else {
            continue;
        };
        match parse_hex_exponent(raw) {
            Some(decimals) => table.insert(address, decimals),
            None => debug!("unparsable decimals for {address}: {raw:?}"),
        }
    }

    debug!("resolved decimals for {}/{} tokens", table.len(), addresses.len());
    table
}

fn parse_hex_exponent(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let body = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if body.is_empty() {
        return None;
    }
    let value = U256::from_str_radix(body, 16).ok()?;
    if value > U256::from(u32::MAX) {
        return None;
    }
    Some(value.low_u32())
}
