//! # LP Reserve Probe
//!
//! Queries a local blockchain execution node over its IPC endpoint for
//! liquidity-pool reserves and token decimals, then normalizes the raw
//! on-chain integers into human-comparable ratios.
//!
//! ## Pipeline
//!
//! 1. **Match** — select the pool records referencing the queried token
//!    (case-insensitive, order preserved).
//! 2. **Resolve decimals** — one batched `eth_call` round trip over the
//!    union of token addresses, correlated back by request id; unresolved
//!    tokens default to 18 decimals.
//! 3. **Fetch reserves** — one `getReserves()` round trip per pool,
//!    decoded from the packed three-word return value.
//! 4. **Normalize** — decimal-adjust each reserve and express it as a
//!    percentage of the uint112 capacity ceiling.
//!
//! The transport is deliberately simple: a fresh unix-socket connection
//! per call, a half-close to mark end-of-request, a read-until-close
//! loop, and exactly one retry after a fixed backoff. A failing pool is
//! reported and skipped; the run continues with the remaining pools.

/// Batched decimals() resolution and the defaulting lookup table.
pub mod decimals;
/// Per-pool error taxonomy.
pub mod errors;
/// Reserve normalization against the capacity ceiling.
pub mod normalize;
/// Pools-file loading and token matching.
pub mod pool_index;
/// Pipeline orchestration.
pub mod probe;
/// getReserves() return-value decoding.
pub mod reserves;
/// JSON-RPC request construction and id correlation.
pub mod rpc;
/// Configuration management.
pub mod settings;
/// Connect-per-call IPC transport.
pub mod transport;

// Re-exports for convenience
pub use decimals::{resolve_decimals, DecimalsTable, DEFAULT_DECIMALS};
pub use errors::ProbeError;
pub use normalize::{normalize_reserve, NormalizedReserve, CAPACITY_CEILING};
pub use pool_index::{find_pools_by_token, load_pool_records, PoolRecord};
pub use probe::{PoolOutcome, PoolReserves, ReserveProbe, TokenReserve};
pub use reserves::{decode_reserves, ReservePair};
pub use settings::Settings;
pub use transport::{IpcTransport, RetryPolicy, Transport};
