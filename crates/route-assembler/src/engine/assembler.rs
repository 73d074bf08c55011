//! Multi-hop route search over a snapshot of known pairs.
//!
//! The search enumerates every pair leaving the source as a candidate first
//! hop, returns straight away if one of them reaches the destination, and
//! otherwise completes each candidate recursively over a pruned universe.
//! Once a token has been used as a path endpoint it is removed from every
//! remaining edge, not just from re-entry at the same point. That keeps the
//! search finite and cycle-free at the cost of some reachable routes.

use indexmap::IndexSet;
use tracing::{debug, trace};

use crate::engine::hops::{into_hops, Hop};
use crate::engine::path::PathNode;
use crate::pair::{build_universe, Pair};
use crate::token::TokenIdentity;
use crate::types::{Result, RouteError};

/// Tuning knobs for a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblerConfig {
    /// Longest route, in hops, the search will explore. `None` is unbounded.
    pub max_hops: Option<usize>,
}

/// Route search engine. Call [`Assembler::from`], then [`Assembler::to`],
/// then [`Assembler::get`] or [`Assembler::get_tree`].
#[derive(Debug, Clone)]
pub struct Assembler {
    universe: Vec<Pair>,
    max_hops: Option<usize>,
    visited: IndexSet<String>,
    source: Option<TokenIdentity>,
    destination: Option<TokenIdentity>,
    candidates: Vec<Pair>,
    remaining: Vec<Pair>,
}

impl Assembler {
    /// Builds an assembler over raw pairs; each pair is usable in both directions.
    pub fn new(pairs: &[Pair]) -> Self {
        Self::with_config(pairs, &AssemblerConfig::default())
    }

    pub fn with_config(pairs: &[Pair], config: &AssemblerConfig) -> Self {
        Self::scoped(build_universe(pairs), IndexSet::new(), config.max_hops)
    }

    /// Sub-search over an already directional universe.
    fn scoped(universe: Vec<Pair>, visited: IndexSet<String>, max_hops: Option<usize>) -> Self {
        Self {
            universe,
            max_hops,
            visited,
            source: None,
            destination: None,
            candidates: Vec::new(),
            remaining: Vec::new(),
        }
    }

    /// Records the source token. Resets any destination set earlier.
    pub fn from(&mut self, token: TokenIdentity) -> &mut Self {
        self.source = Some(token);
        self.destination = None;
        self.candidates.clear();
        self.remaining.clear();
        self
    }

    /// Records the destination and prepares the candidate first hops.
    pub fn to(&mut self, token: TokenIdentity) -> Result<&mut Self> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| RouteError::invalid("source token not set"))?;
        if source.identity_key() == token.identity_key() {
            return Err(RouteError::invalid("source and destination are the same token"));
        }
        if self.max_hops == Some(0) {
            return Err(RouteError::invalid("max_hops must be at least 1"));
        }

        let source_key = source.identity_key().to_string();
        self.candidates = self
            .universe
            .iter()
            .filter(|pair| pair.token_a.identity_key() == source_key)
            .cloned()
            .collect();
        self.visited.insert(source_key);
        self.remaining = self
            .universe
            .iter()
            .filter(|pair| {
                !self.visited.contains(pair.token_a.identity_key())
                    && !self.visited.contains(pair.token_b.identity_key())
            })
            .cloned()
            .collect();
        self.destination = Some(token);

        debug!(
            source = %source,
            candidates = self.candidates.len(),
            remaining = self.remaining.len(),
            visited = self.visited.len(),
            "Prepared route search"
        );
        Ok(self)
    }

    pub fn source(&self) -> Option<&TokenIdentity> {
        self.source.as_ref()
    }

    pub fn destination(&self) -> Option<&TokenIdentity> {
        self.destination.as_ref()
    }

    /// Directional pairs leaving the source, in discovery order.
    pub fn candidates(&self) -> &[Pair] {
        &self.candidates
    }

    /// Directional pairs left for sub-searches after pruning visited tokens.
    pub fn remaining_universe(&self) -> &[Pair] {
        &self.remaining
    }

    pub fn visited(&self) -> &IndexSet<String> {
        &self.visited
    }

    /// Best solved path: fewest hops, ties broken by discovery order.
    pub fn get_tree(&self) -> Result<PathNode> {
        let (outcome, _) = self.search(self.visited.clone());
        outcome
    }

    /// Best route as the hop list consumed by the router.
    pub fn get(&self) -> Result<Vec<Hop>> {
        let tree = self.get_tree()?;
        into_hops(&tree)
    }

    /// Runs the search with `visited` as the accumulated endpoint set and
    /// hands back the set as it stands when the search ends.
    fn search(&self, mut visited: IndexSet<String>) -> (Result<PathNode>, IndexSet<String>) {
        let (source, destination) = match (&self.source, &self.destination) {
            (Some(source), Some(destination)) => (source, destination),
            (None, _) => return (Err(RouteError::invalid("source token not set")), visited),
            (_, None) => return (Err(RouteError::invalid("destination token not set")), visited),
        };
        let destination_key = destination.identity_key();

        if let Some(exact) = self
            .candidates
            .iter()
            .find(|pair| pair.token_b.identity_key() == destination_key)
        {
            debug!(source = %source, destination = %destination, pool = %exact.pool_address, "Direct pair found");
            return (Ok(PathNode::terminal(exact.clone())), visited);
        }

        let mut solved: Vec<PathNode> = Vec::new();
        if self.max_hops.map_or(true, |hops| hops > 1) {
            for candidate in &self.candidates {
                let (completion, returned) = self.complete(candidate, destination, visited);
                visited = returned;
                if let Some(node) = completion {
                    if node.is_solved() {
                        solved.push(node);
                    } else {
                        trace!(pool = %candidate.pool_address, "Dropping candidate that crosses native mid-route");
                    }
                }
            }
        }

        // min_by_key keeps the first of equally short paths
        let best = solved
            .into_iter()
            .min_by_key(|node| node.hop_count().unwrap_or(usize::MAX));
        match best {
            Some(node) => {
                debug!(
                    source = %source,
                    destination = %destination,
                    hops = node.hop_count().unwrap_or_default(),
                    "Route selected"
                );
                (Ok(node), visited)
            }
            None => (
                Err(RouteError::NoRouteFound {
                    from: source.identity_key().to_string(),
                    to: destination_key.to_string(),
                }),
                visited,
            ),
        }
    }

    /// Tries to finish `candidate` with a sub-search over the remaining
    /// universe. A candidate that cannot be finished is dropped, not failed.
    fn complete(
        &self,
        candidate: &Pair,
        destination: &TokenIdentity,
        visited: IndexSet<String>,
    ) -> (Option<PathNode>, IndexSet<String>) {
        let mut sub = Assembler::scoped(
            self.remaining.clone(),
            visited,
            self.max_hops.map(|hops| hops - 1),
        );
        sub.from(candidate.token_b.clone());
        let prepared = sub.to(destination.clone()).map(|_| ());
        if let Err(err) = prepared {
            trace!(pool = %candidate.pool_address, error = %err, "Candidate rejected");
            return (None, sub.visited);
        }

        let visited = std::mem::take(&mut sub.visited);
        let (outcome, visited) = sub.search(visited);
        match outcome {
            Ok(next) => (Some(PathNode::link(candidate.clone(), next)), visited),
            Err(err) => {
                trace!(pool = %candidate.pool_address, error = %err, "Candidate has no completion");
                (None, visited)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(addr: &str) -> TokenIdentity {
        TokenIdentity::custom(addr, format!("{}_hash", addr))
    }

    fn pool(a: TokenIdentity, b: TokenIdentity) -> Pair {
        let address = format!("pair_{}_{}", a, b);
        Pair::new(a, b, address, "pair_hash")
    }

    #[test]
    fn preparation_collects_candidates_and_prunes() {
        let pairs = vec![
            pool(tok("t1"), tok("t2")),
            pool(tok("t3"), tok("t1")),
            pool(tok("t2"), tok("t3")),
        ];
        let mut assembler = Assembler::new(&pairs);
        assembler.from(tok("t1")).to(tok("t3")).unwrap();

        let targets: Vec<&str> = assembler
            .candidates()
            .iter()
            .map(|pair| pair.token_b.identity_key())
            .collect();
        assert_eq!(targets, vec!["t2", "t3"]);
        assert!(assembler.visited().contains("t1"));
        // only the t2/t3 pool survives, in both directions
        assert_eq!(assembler.remaining_universe().len(), 2);
        assert!(assembler.remaining_universe().iter().all(|pair| !pair.touches("t1")));
    }

    #[test]
    fn to_requires_from() {
        let mut assembler = Assembler::new(&[pool(tok("t1"), tok("t2"))]);
        assert!(matches!(
            assembler.to(tok("t2")),
            Err(RouteError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn get_tree_requires_to() {
        let mut assembler = Assembler::new(&[pool(tok("t1"), tok("t2"))]);
        assembler.from(tok("t1"));
        assert!(matches!(
            assembler.get_tree(),
            Err(RouteError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn same_token_with_different_hash_is_rejected() {
        let mut assembler = Assembler::new(&[pool(tok("t1"), tok("t2"))]);
        let err = assembler
            .from(TokenIdentity::custom("t1", "a"))
            .to(TokenIdentity::custom("t1", "b"))
            .unwrap_err();
        assert_eq!(err, RouteError::invalid("source and destination are the same token"));
    }

    #[test]
    fn visited_accumulates_across_sibling_branches() {
        // The native branch is explored first, fails the native-boundary
        // rule, and leaves t5 marked as visited. That prunes t5 -> t4 from
        // the t3 branch, so t1 -> t3 -> t5 -> t4 is never found.
        let pairs = vec![
            pool(tok("t1"), TokenIdentity::Native),
            pool(tok("t1"), tok("t3")),
            pool(TokenIdentity::Native, tok("t5")),
            pool(tok("t3"), tok("t5")),
            pool(tok("t5"), tok("t4")),
        ];
        let mut assembler = Assembler::new(&pairs);
        assembler.from(tok("t1")).to(tok("t4")).unwrap();
        assert_eq!(
            assembler.get().unwrap_err(),
            RouteError::NoRouteFound { from: "t1".to_string(), to: "t4".to_string() }
        );

        // Without the native detour the same route is found.
        let mut assembler = Assembler::new(&pairs[1..]);
        assembler.from(tok("t1")).to(tok("t4")).unwrap();
        let hops = assembler.get().unwrap();
        let pools: Vec<&str> = hops.iter().map(|hop| hop.pool_address.as_str()).collect();
        assert_eq!(pools, vec!["pair_t1_t3", "pair_t3_t5", "pair_t5_t4"]);
    }

    #[test]
    fn zero_hop_budget_is_invalid() {
        let config = AssemblerConfig { max_hops: Some(0) };
        let mut assembler = Assembler::with_config(&[pool(tok("t1"), tok("t2"))], &config);
        assert!(matches!(
            assembler.from(tok("t1")).to(tok("t2")),
            Err(RouteError::InvalidRequest { .. })
        ));
    }
}
