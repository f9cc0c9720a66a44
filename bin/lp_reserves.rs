//! # LP Reserves CLI
//!
//! Looks up every pool referencing a token address in the configured
//! pools file, fetches reserves and decimals from the local execution
//! node over IPC, and prints normalized balances.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin lp-reserves -- <TOKEN_ADDRESS>
//! ```
//!
//! Exit code 0 on success or when no pools match; 1 on a usage error,
//! a missing pools file, or any other fatal failure.

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use lp_reserve_probe::{
    find_pools_by_token, load_pool_records, IpcTransport, ReserveProbe, Settings, TokenReserve,
};

#[derive(Debug, Parser)]
#[command(name = "lp-reserves", about = "Prints normalized reserves for every pool holding a token")]
struct Cli {
    /// Token address to look up pools for (case-insensitive).
    token_address: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Usage problems exit 1, matching the tool's historical convention.
            let _ = err.print();
            std::process::exit(1);
        }
    };

    let settings = Settings::new()?;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.log.level.clone()),
    )
    .init();

    let pools = load_pool_records(Path::new(&settings.data.pools_file))?;
    let matched = find_pools_by_token(&pools, &cli.token_address);
    if matched.is_empty() {
        println!("No pools found for token address {}", cli.token_address);
        return Ok(());
    }
    println!(
        "Found {} pools for token address {}",
        matched.len(),
        cli.token_address
    );

    let transport = IpcTransport::new(
        &settings.endpoint.ipc_path,
        settings.endpoint.read_timeout(),
        settings.endpoint.retry_policy(),
    );
    let probe = ReserveProbe::new(&transport);
    let table = probe.resolve_decimals_for(&matched).await;

    for pool in &matched {
        println!("Processing pool: {}", pool.pool_address);
        match probe.probe_pool(pool, &table).await {
            Ok(reserves) => {
                println!("  Reserves for pool {}:", reserves.pool_address);
                print_side("Token 0", &reserves.token0);
                print_side("Token 1", &reserves.token1);
            }
            Err(error) => {
                println!("  Error processing pool {}: {}", pool.pool_address, error);
            }
        }
    }

    Ok(())
}

fn print_side(label: &str, side: &TokenReserve) {
    println!(
        "    {}: {} ({:.2}% of capacity ceiling)",
        label, side.normalized.adjusted, side.normalized.percent_of_ceiling
    );
}
