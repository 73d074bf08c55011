use anyhow::anyhow;
use serde::Deserialize;

use crate::pair::Pair;

/// Load a pair snapshot from a JSON `[{...}]` array or a TOML `pairs = [...]` file.
/// Accepts absolute or relative path.
pub fn load_pair_list<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Vec<Pair>> {
    let text = std::fs::read_to_string(&path)
        .map_err(|e| anyhow!("unable to read pair list {}: {}", path.as_ref().display(), e))?;
    parse_pair_list(&text)
        .map_err(|e| anyhow!("pair list {}: {}", path.as_ref().display(), e))
}

pub fn parse_pair_list(text: &str) -> anyhow::Result<Vec<Pair>> {
    // 1. Try JSON array
    if let Ok(pairs) = serde_json::from_str::<Vec<Pair>>(text) {
        return Ok(pairs);
    }

    // 2. Try TOML with wrapper
    #[derive(Deserialize)]
    struct Wrapper { pairs: Vec<Pair> }
    let wrapper: Wrapper = toml::from_str(text)
        .map_err(|e| anyhow!("not valid JSON nor TOML: {}", e))?;
    Ok(wrapper.pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenIdentity;

    #[test]
    fn parses_json_array() {
        let pairs = parse_pair_list(
            r#"[{
                "token_a": "native_token",
                "token_b": {"custom_token": {"contract_addr": "secret1t2", "token_code_hash": "h2"}},
                "pair_address": "secret1pool",
                "pair_code_hash": "pool_hash"
            }]"#,
        )
        .unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].token_a, TokenIdentity::Native);
        assert_eq!(pairs[0].token_b.identity_key(), "secret1t2");
        assert_eq!(pairs[0].pool_address, "secret1pool");
    }

    #[test]
    fn parses_toml_wrapper() {
        let pairs = parse_pair_list(
            r#"
            [[pairs]]
            token_a = "native_token"
            token_b = { custom_token = { contract_addr = "secret1t2", token_code_hash = "h2" } }
            pair_address = "secret1pool"
            pair_code_hash = "pool_hash"
            "#,
        )
        .unwrap();
        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].token_a.is_native());
        assert_eq!(pairs[0].pool_code_hash, "pool_hash");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_pair_list("pairs = 3").is_err());
    }
}
