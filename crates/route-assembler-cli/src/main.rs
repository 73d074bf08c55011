mod cli;

use anyhow::{anyhow, Result};
use route_assembler::config::AppConfig;
use route_assembler::utils::pair_list::load_pair_list;
use route_assembler::RoutePlanner;
use tracing::{info, warn};

use crate::cli::{parse_token, CliHandler};

/// Logs go to stderr so stdout carries only the hop JSON.
fn init_tracing(level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    // CLI args, then --config file, then env vars
    let config = AppConfig::load_with_cli()?;
    init_tracing(&config.log_level);
    info!(
        pairs_file = ?config.pairs_file,
        max_hops = ?config.max_hops,
        cache_capacity = config.cache_capacity,
        "Configuration loaded"
    );
    let missing = config.missing_route_settings();
    if !missing.is_empty() {
        warn!(missing = ?missing, "Incomplete route request configuration");
    }

    let pairs_file = config.pairs_file.clone().ok_or_else(|| anyhow!("--pairs-file is required"))?;
    let from_str = config.source_token.clone().ok_or_else(|| anyhow!("--from is required"))?;
    let to_str = config.destination_token.clone().ok_or_else(|| anyhow!("--to is required"))?;

    let from = parse_token(&from_str)?;
    let to = parse_token(&to_str)?;

    let pairs = load_pair_list(&pairs_file)?;
    info!(pairs = pairs.len(), file = %pairs_file, "Loaded pair snapshot");

    let planner = RoutePlanner::from_config(pairs, &config);
    let output = CliHandler::handle_route(&planner, &from, &to)?;
    println!("{}", output);
    Ok(())
}
