//! Token identity: native chain currency or a contract-backed token.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identity key shared by every native token value.
pub const NATIVE_KEY: &str = "native";

/// A token as the router contract sees it.
///
/// Identity is decided by [`TokenIdentity::identity_key`] alone, so two custom
/// tokens with the same contract address but different code hashes are the
/// same token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TokenIdentity {
    #[serde(rename = "native_token")]
    Native,
    #[serde(rename = "custom_token")]
    Custom {
        contract_addr: String,
        token_code_hash: String,
    },
}

impl TokenIdentity {
    pub fn custom(contract_addr: impl Into<String>, token_code_hash: impl Into<String>) -> Self {
        TokenIdentity::Custom {
            contract_addr: contract_addr.into(),
            token_code_hash: token_code_hash.into(),
        }
    }

    /// Canonical comparison key: `"native"` or the contract address.
    pub fn identity_key(&self) -> &str {
        match self {
            TokenIdentity::Native => NATIVE_KEY,
            TokenIdentity::Custom { contract_addr, .. } => contract_addr,
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, TokenIdentity::Native)
    }
}

impl PartialEq for TokenIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.identity_key() == other.identity_key()
    }
}

impl Eq for TokenIdentity {}

impl Hash for TokenIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity_key().hash(state);
    }
}

impl fmt::Display for TokenIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identity_key())
    }
}

/// Parses `native`, `<contract_addr>` or `<contract_addr>:<code_hash>`.
impl FromStr for TokenIdentity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty token identifier".to_string());
        }
        if s.eq_ignore_ascii_case(NATIVE_KEY) {
            return Ok(TokenIdentity::Native);
        }
        match s.split_once(':') {
            Some((addr, _)) if addr.is_empty() => Err(format!("missing contract address in '{}'", s)),
            Some((addr, hash)) => Ok(TokenIdentity::custom(addr, hash)),
            None => Ok(TokenIdentity::custom(s, "")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn native_key_is_constant() {
        assert_eq!(TokenIdentity::Native.identity_key(), "native");
        assert!(TokenIdentity::Native.is_native());
    }

    #[test]
    fn equality_ignores_code_hash() {
        let a = TokenIdentity::custom("secret1abc", "hash_one");
        let b = TokenIdentity::custom("secret1abc", "hash_two");
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
        assert_ne!(b, TokenIdentity::custom("secret1def", "hash_two"));
    }

    #[test]
    fn parse_identifiers() {
        assert_eq!("native".parse::<TokenIdentity>().unwrap(), TokenIdentity::Native);
        match "secret1xyz:deadbeef".parse::<TokenIdentity>().unwrap() {
            TokenIdentity::Custom { contract_addr, token_code_hash } => {
                assert_eq!(contract_addr, "secret1xyz");
                assert_eq!(token_code_hash, "deadbeef");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!("".parse::<TokenIdentity>().is_err());
        assert!(":deadbeef".parse::<TokenIdentity>().is_err());
    }

    #[test]
    fn serde_shape_matches_router_schema() {
        let json = serde_json::to_value(TokenIdentity::custom("secret1xyz", "abc")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"custom_token": {"contract_addr": "secret1xyz", "token_code_hash": "abc"}})
        );
        assert_eq!(serde_json::to_value(TokenIdentity::Native).unwrap(), serde_json::json!("native_token"));
    }
}
