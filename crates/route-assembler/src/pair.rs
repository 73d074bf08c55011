//! Liquidity pool edges and the directional pair universe.

use serde::{Deserialize, Serialize};

use crate::token::TokenIdentity;

/// One liquidity pool between two tokens. The pool can be traversed either
/// way; a `Pair` value reads as "swap `token_a` into `token_b`".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub token_a: TokenIdentity,
    pub token_b: TokenIdentity,
    #[serde(rename = "pair_address")]
    pub pool_address: String,
    #[serde(rename = "pair_code_hash")]
    pub pool_code_hash: String,
}

impl Pair {
    pub fn new(
        token_a: TokenIdentity,
        token_b: TokenIdentity,
        pool_address: impl Into<String>,
        pool_code_hash: impl Into<String>,
    ) -> Self {
        Self {
            token_a,
            token_b,
            pool_address: pool_address.into(),
            pool_code_hash: pool_code_hash.into(),
        }
    }

    /// Same pool, opposite direction.
    pub fn reversed(&self) -> Self {
        Self {
            token_a: self.token_b.clone(),
            token_b: self.token_a.clone(),
            pool_address: self.pool_address.clone(),
            pool_code_hash: self.pool_code_hash.clone(),
        }
    }

    pub fn touches(&self, key: &str) -> bool {
        self.token_a.identity_key() == key || self.token_b.identity_key() == key
    }
}

/// Expands raw pairs into directional entries: every pair is followed
/// immediately by its mirror, so the result is twice the input length and
/// keeps the input's discovery order.
pub fn build_universe(pairs: &[Pair]) -> Vec<Pair> {
    pairs
        .iter()
        .flat_map(|pair| [pair.clone(), pair.reversed()])
        .collect()
}
