//! Route lookup and output formatting for the command line.

use anyhow::{anyhow, Result};
use route_assembler::{RoutePlanner, TokenIdentity};
use serde_json::json;
use tracing::{info, warn};

pub fn parse_token(raw: &str) -> Result<TokenIdentity> {
    raw.parse::<TokenIdentity>()
        .map_err(|e| anyhow!("invalid token '{}': {}", raw, e))
}

/// Handles CLI commands and output.
pub struct CliHandler;

impl CliHandler {
    /// Assembles the route and renders it as pretty JSON: the hop list the
    /// router consumes plus a readable `A -> B` line per hop.
    pub fn handle_route(planner: &RoutePlanner, from: &TokenIdentity, to: &TokenIdentity) -> Result<String> {
        let entry = match planner.route_entry(from, to) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(from = %from, to = %to, error = %e, "Route assembly failed");
                return Err(e.into());
            }
        };
        for line in &entry.printout {
            info!(hop = %line, "Route hop");
        }

        let output = json!({
            "from": from.identity_key(),
            "to": to.identity_key(),
            "hop_count": entry.hops.len(),
            "route": entry.printout,
            "hops": serde_json::to_value(&entry.hops)?,
        });
        Ok(serde_json::to_string_pretty(&output)?)
    }
}
