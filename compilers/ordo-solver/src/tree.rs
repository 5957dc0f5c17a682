use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use ordo_protocol::{StructuralIntegrityError, Token, TokenId};

/// Head -> dependents index over a token slice.
///
/// Node `i` of the graph is slot `i` of the slice the tree was built from,
/// edges point from head to dependent. Built once per ordering pass.
#[derive(Debug)]
pub struct DependencyTree {
    graph: DiGraph<TokenId, ()>,
    root: usize,
}

impl DependencyTree {
    /// Indexes `tokens`, failing unless they form exactly one rooted,
    /// acyclic tree.
    pub fn build(tokens: &[Token]) -> Result<Self, StructuralIntegrityError> {
        let mut graph = DiGraph::with_capacity(tokens.len(), tokens.len().saturating_sub(1));
        let mut slots = HashMap::with_capacity(tokens.len());
        for (slot, token) in tokens.iter().enumerate() {
            if slots.insert(token.index, slot).is_some() {
                return Err(StructuralIntegrityError::DuplicateIndex { token: token.index });
            }
            graph.add_node(token.index);
        }

        let roots: Vec<TokenId> = tokens.iter().filter(|t| t.is_root()).map(|t| t.index).collect();
        let root = match roots.as_slice() {
            [] => return Err(StructuralIntegrityError::NoRoot),
            [root] => slots[root],
            _ => return Err(StructuralIntegrityError::MultipleRoots { roots }),
        };

        for (slot, token) in tokens.iter().enumerate() {
            let Some(head) = token.head else { continue };
            if head == token.index {
                return Err(StructuralIntegrityError::SelfHead { token: token.index });
            }
            let head_slot = slots
                .get(&head)
                .copied()
                .ok_or(StructuralIntegrityError::MissingHead { token: token.index, head })?;
            graph.add_edge(NodeIndex::new(head_slot), NodeIndex::new(slot), ());
        }

        // One root and one head per other token: acyclic means every token
        // reaches the root.
        if let Err(cycle) = toposort(&graph, None) {
            return Err(StructuralIntegrityError::Cycle {
                token: graph[cycle.node_id()],
            });
        }

        Ok(Self { graph, root })
    }

    pub(crate) fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Slot of the root token.
    pub fn root(&self) -> usize {
        self.root
    }

    /// Slots of the direct dependents of `slot`, in no particular order.
    pub fn children(&self, slot: usize) -> impl Iterator<Item = usize> + '_ {
        self.graph
            .neighbors_directed(NodeIndex::new(slot), Direction::Outgoing)
            .map(|n| n.index())
    }

    /// Slot of the head of `slot`, `None` for the root.
    pub fn parent(&self, slot: usize) -> Option<usize> {
        self.graph
            .neighbors_directed(NodeIndex::new(slot), Direction::Incoming)
            .next()
            .map(|n| n.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(heads: &[Option<u32>]) -> Vec<Token> {
        heads
            .iter()
            .enumerate()
            .map(|(i, head)| Token::new(i as u32 + 1, format!("w{}", i + 1), *head, "dep"))
            .collect()
    }

    #[test]
    fn test_children_index() {
        let tree = DependencyTree::build(&tokens(&[Some(2), None, Some(2), Some(3)])).unwrap();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.root(), 1);

        let mut children: Vec<usize> = tree.children(1).collect();
        children.sort_unstable();
        assert_eq!(children, [0, 2]);
        assert_eq!(tree.children(3).count(), 0);

        assert_eq!(tree.parent(3), Some(2));
        assert_eq!(tree.parent(1), None);
    }

    #[test]
    fn test_root_count() {
        assert_eq!(
            DependencyTree::build(&tokens(&[Some(2), Some(1)])).unwrap_err(),
            StructuralIntegrityError::NoRoot
        );
        assert_eq!(
            DependencyTree::build(&tokens(&[None, Some(1), None])).unwrap_err(),
            StructuralIntegrityError::MultipleRoots { roots: vec![TokenId(1), TokenId(3)] }
        );
        assert_eq!(DependencyTree::build(&[]).unwrap_err(), StructuralIntegrityError::NoRoot);
    }

    #[test]
    fn test_dangling_and_self_heads() {
        assert_eq!(
            DependencyTree::build(&tokens(&[None, Some(7)])).unwrap_err(),
            StructuralIntegrityError::MissingHead { token: TokenId(2), head: TokenId(7) }
        );
        assert_eq!(
            DependencyTree::build(&tokens(&[None, Some(2)])).unwrap_err(),
            StructuralIntegrityError::SelfHead { token: TokenId(2) }
        );
    }

    #[test]
    fn test_detached_cycle() {
        // 1 is the root; 2 -> 3 -> 4 -> 2 never reaches it.
        let err = DependencyTree::build(&tokens(&[None, Some(4), Some(2), Some(3)])).unwrap_err();
        assert!(matches!(err, StructuralIntegrityError::Cycle { .. }));
    }

    #[test]
    fn test_duplicate_index() {
        let mut input = tokens(&[None, Some(1)]);
        input[1].index = TokenId(1);
        assert_eq!(
            DependencyTree::build(&input).unwrap_err(),
            StructuralIntegrityError::DuplicateIndex { token: TokenId(1) }
        );
    }
}
