// src/probe.rs
//
// Top-level orchestration: one decimals round trip for the whole token
// set, then a reserves round trip per pool, normalized as it goes.

use ethers::types::U256;
use indexmap::IndexSet;
use log::{info, warn};

use crate::decimals::{resolve_decimals, DecimalsTable};
use crate::errors::ProbeError;
use crate::normalize::{normalize_reserve, NormalizedReserve};
use crate::pool_index::PoolRecord;
use crate::reserves::{decode_reserves, ReservePair};
use crate::rpc::{RpcReply, RpcRequest, GET_RESERVES_SELECTOR};
use crate::transport::Transport;

/// One side of a pool, normalized.
#[derive(Debug, Clone)]
pub struct TokenReserve {
    pub token: String,
    pub decimals: u32,
    pub raw: U256,
    pub normalized: NormalizedReserve,
}

/// Both sides of a pool, ready to print.
#[derive(Debug, Clone)]
pub struct PoolReserves {
    pub pool_address: String,
    pub token0: TokenReserve,
    pub token1: TokenReserve,
}

/// Terminal state for one pool within a run.
#[derive(Debug)]
pub enum PoolOutcome {
    Fetched(PoolReserves),
    Failed {
        pool_address: String,
        error: ProbeError,
    },
}

/// Drives the decimals/reserves pipeline over a transport.
pub struct ReserveProbe<'a> {
    transport: &'a dyn Transport,
}

impl<'a> ReserveProbe<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    /// Runs the full pipeline for a set of matched pools.
    ///
    /// Decimals for the union of referenced tokens are resolved in a
    /// single batched round trip, then each pool's reserves are fetched
    /// and normalized one at a time. A failing pool is recorded in its
    /// outcome and never stops the remaining pools.
    pub async fn run(&self, pools: &[&PoolRecord]) -> Vec<PoolOutcome> {
        if pools.is_empty() {
            return Vec::new();
        }

        let table = self.resolve_decimals_for(pools).await;

        let mut outcomes = Vec::with_capacity(pools.len());
        for pool in pools {
            info!("processing pool {}", pool.pool_address);
            match self.probe_pool(pool, &table).await {
                Ok(reserves) => outcomes.push(PoolOutcome::Fetched(reserves)),
                Err(error) => {
                    warn!("{error}; continuing with remaining pools");
                    outcomes.push(PoolOutcome::Failed {
                        pool_address: pool.pool_address.clone(),
                        error,
                    });
                }
            }
        }
        outcomes
    }

    /// One batched decimals round trip over the union of tokens the given
    /// pools reference.
    pub async fn resolve_decimals_for(&self, pools: &[&PoolRecord]) -> DecimalsTable {
        let mut tokens: IndexSet<String> = IndexSet::new();
        for pool in pools {
            tokens.insert(pool.token0.to_lowercase());
            tokens.insert(pool.token1.to_lowercase());
        }
        let table = resolve_decimals(self.transport, &tokens).await;
        info!(
            "resolved decimals for {}/{} tokens across {} pools",
            table.len(),
            tokens.len(),
            pools.len()
        );
        table
    }

    /// Fetches, decodes and normalizes one pool's reserves.
    pub async fn probe_pool(
        &self,
        pool: &PoolRecord,
        table: &DecimalsTable,
    ) -> Result<PoolReserves, ProbeError> {
        let ReservePair { reserve0, reserve1 } = self.fetch_reserves(&pool.pool_address).await?;
        Ok(PoolReserves {
            pool_address: pool.pool_address.clone(),
            token0: normalized_side(&pool.token0, reserve0, table),
            token1: normalized_side(&pool.token1, reserve1, table),
        })
    }

    /// One getReserves() round trip for a single pool.
    async fn fetch_reserves(&self, pool_address: &str) -> Result<ReservePair, ProbeError> {
        let request = RpcRequest::eth_call(1, pool_address, GET_RESERVES_SELECTOR);
        let missing = || ProbeError::MissingReserves(pool_address.to_string());

        let reply = self
            .transport
            .send(&request.to_payload())
            .await
            .ok_or_else(missing)?;
        // Single call, but some nodes still answer with a one-element batch.
        let response = RpcReply::from_value(reply)
            .map(RpcReply::into_responses)
            .and_then(|responses| responses.into_iter().next())
            .ok_or_else(missing)?;
        let hexdata = response.result_str().ok_or_else(missing)?;

        decode_reserves(hexdata)
            .ok_or_else(|| ProbeError::UndecodableReserves(pool_address.to_string()))
    }
}

fn normalized_side(token: &str, raw: U256, table: &DecimalsTable) -> TokenReserve {
    let decimals = table.decimals(token);
    TokenReserve {
        token: token.to_string(),
        decimals,
        raw,
        normalized: normalize_reserve(raw, decimals),
    }
}
