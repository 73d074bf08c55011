//! Hop export and diagnostics for solved paths.

use serde::{Deserialize, Serialize};

use crate::engine::path::{PathNode, PathStatus};
use crate::pair::Pair;
use crate::token::TokenIdentity;
use crate::types::{Result, RouteError};

/// One pool traversal as the router's multi-hop execute message expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hop {
    pub from_token: TokenIdentity,
    #[serde(rename = "pair_address")]
    pub pool_address: String,
    #[serde(rename = "pair_code_hash")]
    pub pool_code_hash: String,
}

impl From<&Pair> for Hop {
    fn from(pair: &Pair) -> Self {
        Hop {
            from_token: pair.token_a.clone(),
            pool_address: pair.pool_address.clone(),
            pool_code_hash: pair.pool_code_hash.clone(),
        }
    }
}

/// Ordered hop list from source to destination. Fails for unsolved paths.
pub fn into_hops(path: &PathNode) -> Result<Vec<Hop>> {
    match &path.status {
        PathStatus::Solved(hops) => Ok(hops.clone()),
        PathStatus::Unsolved => Err(RouteError::UnsolvedPath),
    }
}

/// One `"<A> -> <B>"` line per link of the chain.
pub fn printout(path: &PathNode) -> Vec<String> {
    path.iter()
        .map(|node| format!("{} -> {}", node.pair.token_a, node.pair.token_b))
        .collect()
}

/// JSON array embedded in the router's execute message.
pub fn hops_to_json(hops: &[Hop]) -> serde_json::Result<String> {
    serde_json::to_string(hops)
}
