// src/errors.rs

use thiserror::Error;

/// Failures scoped to a single pool. These are caught at the per-pool
/// boundary and reported; they never abort the run. Transport failures
/// surface earlier as an absent reply, and unresolvable decimals fall
/// back to the default exponent without ever raising.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The reserves call produced no usable response from the node.
    #[error("failed to fetch reserves for pool {0}")]
    MissingReserves(String),
    /// The reserves payload could not be decoded into a reserve pair.
    #[error("undecodable reserves payload for pool {0}")]
    UndecodableReserves(String),
}
