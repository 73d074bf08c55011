//! Candidate paths built by the assembler.

use crate::engine::hops::Hop;
use crate::pair::Pair;

/// Outcome of a path, fixed when the node is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStatus {
    Unsolved,
    /// Hops from this node to the destination, in execution order.
    Solved(Vec<Hop>),
}

/// A directional pair plus an optional continuation, forming a singly-linked
/// path that starts at `pair.token_a`.
#[derive(Debug, Clone)]
pub struct PathNode {
    pub pair: Pair,
    pub next: Option<Box<PathNode>>,
    pub status: PathStatus,
}

impl PathNode {
    /// A pair that reaches the destination on its own.
    pub fn terminal(pair: Pair) -> Self {
        let hop = Hop::from(&pair);
        Self {
            pair,
            next: None,
            status: PathStatus::Solved(vec![hop]),
        }
    }

    /// Prepends `pair` to an already built continuation.
    ///
    /// The native token may only be the source of the first hop of a route,
    /// so a continuation that starts from native never yields a solved path.
    pub fn link(pair: Pair, next: PathNode) -> Self {
        let status = match &next.status {
            PathStatus::Solved(tail) if !next.pair.token_a.is_native() => {
                let mut hops = Vec::with_capacity(tail.len() + 1);
                hops.push(Hop::from(&pair));
                hops.extend(tail.iter().cloned());
                PathStatus::Solved(hops)
            }
            _ => PathStatus::Unsolved,
        };
        Self {
            pair,
            next: Some(Box::new(next)),
            status,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self.status, PathStatus::Solved(_))
    }

    /// Number of hops of a solved path, `None` otherwise.
    pub fn hop_count(&self) -> Option<usize> {
        match &self.status {
            PathStatus::Solved(hops) => Some(hops.len()),
            PathStatus::Unsolved => None,
        }
    }

    /// Walks the chain starting at this node.
    pub fn iter(&self) -> PathIter<'_> {
        PathIter { current: Some(self) }
    }
}

pub struct PathIter<'a> {
    current: Option<&'a PathNode>,
}

impl<'a> Iterator for PathIter<'a> {
    type Item = &'a PathNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current?;
        self.current = node.next.as_deref();
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenIdentity;

    fn leg(a: TokenIdentity, b: TokenIdentity) -> Pair {
        let pool = format!("{}_{}", a, b);
        Pair::new(a, b, pool, "hash")
    }

    fn tok(addr: &str) -> TokenIdentity {
        TokenIdentity::custom(addr, "")
    }

    #[test]
    fn terminal_is_single_hop() {
        let node = PathNode::terminal(leg(tok("t1"), tok("t2")));
        assert!(node.is_solved());
        assert_eq!(node.hop_count(), Some(1));
        assert_eq!(node.iter().count(), 1);
    }

    #[test]
    fn link_extends_solved_tail() {
        let tail = PathNode::link(leg(tok("t2"), tok("t3")), PathNode::terminal(leg(tok("t3"), tok("t4"))));
        let root = PathNode::link(leg(tok("t1"), tok("t2")), tail);
        assert_eq!(root.hop_count(), Some(3));
        assert_eq!(root.iter().count(), 3);
    }

    #[test]
    fn native_may_start_a_route() {
        let root = PathNode::link(leg(TokenIdentity::Native, tok("t2")), PathNode::terminal(leg(tok("t2"), tok("t3"))));
        assert_eq!(root.hop_count(), Some(2));
    }

    #[test]
    fn native_may_end_a_route() {
        let root = PathNode::link(leg(tok("t1"), tok("t2")), PathNode::terminal(leg(tok("t2"), TokenIdentity::Native)));
        assert!(root.is_solved());
    }

    #[test]
    fn native_in_the_middle_invalidates_the_route() {
        let tail = PathNode::terminal(leg(TokenIdentity::Native, tok("t3")));
        assert!(tail.is_solved());
        let root = PathNode::link(leg(tok("t1"), TokenIdentity::Native), tail);
        assert!(!root.is_solved());

        // an invalid tail stays invalid further up the chain
        let outer = PathNode::link(leg(tok("t0"), tok("t1")), root);
        assert_eq!(outer.status, PathStatus::Unsolved);
    }
}
