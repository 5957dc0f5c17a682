use std::collections::BTreeSet;

use rand::Rng;

use ordo_protocol::relation::coarse;
use ordo_protocol::{Grammar, StructuralIntegrityError, Token, TokenId};

use crate::side::{resolve_side, OrderingMode, Side};
use crate::tree::DependencyTree;

/// Outcome of ordering one sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Linearization {
    /// Slots of the input tokens in output order.
    pub order: Vec<usize>,
    /// Coarse relations missing from either weight map, which were ordered
    /// with the neutral fallback weight.
    pub fallbacks: BTreeSet<String>,
    parents: Vec<Option<usize>>,
}

impl Linearization {
    /// The input tokens in output order.
    pub fn tokens<'t>(&self, tokens: &'t [Token]) -> Vec<&'t Token> {
        self.order.iter().map(|&slot| &tokens[slot]).collect()
    }

    /// New 1-based position of every slot.
    pub fn positions(&self) -> Vec<TokenId> {
        let mut positions = vec![TokenId(0); self.order.len()];
        for (position, &slot) in self.order.iter().enumerate() {
            positions[slot] = TokenId::from_slot(position);
        }
        positions
    }

    /// Writes `reordered_index` and `reordered_head` onto `tokens`, which
    /// must be the slice this linearization was computed from.
    pub fn apply(&self, tokens: &mut [Token]) {
        let positions = self.positions();
        for (slot, token) in tokens.iter_mut().enumerate() {
            token.reordered_index = Some(positions[slot]);
            token.reordered_head = self.parents[slot].map(|parent| positions[parent]);
        }
    }
}

enum Visit {
    Expand(usize),
    Emit(usize),
}

/// Orders the tokens of a sentence under a [`Grammar`].
///
/// The output is a projective traversal of the dependency tree: each head
/// is emitted between its left and right dependents, and every subtree is
/// contiguous.
#[derive(Debug, Clone, Copy)]
pub struct Linearizer<'g> {
    grammar: &'g Grammar,
    mode: OrderingMode,
}

impl<'g> Linearizer<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            mode: OrderingMode::Deterministic,
        }
    }

    pub fn with_mode(mut self, mode: OrderingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Computes the order without touching `tokens`.
    pub fn order<R: Rng + ?Sized>(
        &self,
        tokens: &[Token],
        rng: &mut R,
    ) -> Result<Linearization, StructuralIntegrityError> {
        let tree = DependencyTree::build(tokens)?;
        let mut fallbacks = BTreeSet::new();
        let mut order = Vec::with_capacity(tree.len());
        let mut visited = vec![false; tree.len()];

        let mut stack = vec![Visit::Expand(tree.root())];
        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Emit(slot) => order.push(slot),
                Visit::Expand(slot) => {
                    if std::mem::replace(&mut visited[slot], true) {
                        return Err(StructuralIntegrityError::Cycle {
                            token: tokens[slot].index,
                        });
                    }
                    let (left, right) = self.arrange(&tree, tokens, slot, rng, &mut fallbacks);
                    stack.extend(right.into_iter().rev().map(Visit::Expand));
                    stack.push(Visit::Emit(slot));
                    stack.extend(left.into_iter().rev().map(Visit::Expand));
                }
            }
        }

        let parents = (0..tokens.len()).map(|slot| tree.parent(slot)).collect();
        Ok(Linearization {
            order,
            fallbacks,
            parents,
        })
    }

    /// Orders `tokens` and records the new positions on them. On failure any
    /// positions left from an earlier pass are cleared.
    pub fn linearize_with_rng<R: Rng + ?Sized>(
        &self,
        tokens: &mut [Token],
        rng: &mut R,
    ) -> Result<Linearization, StructuralIntegrityError> {
        match self.order(tokens, rng) {
            Ok(linearization) => {
                linearization.apply(tokens);
                Ok(linearization)
            }
            Err(err) => {
                tokens.iter_mut().for_each(Token::clear_reordering);
                Err(err)
            }
        }
    }

    /// Like [`Linearizer::linearize_with_rng`], drawing from the thread RNG
    /// in randomized mode.
    #[cfg(feature = "thread-rng")]
    pub fn linearize(&self, tokens: &mut [Token]) -> Result<Linearization, StructuralIntegrityError> {
        self.linearize_with_rng(tokens, &mut rand::thread_rng())
    }

    /// Splits the dependents of `head` by side and sorts each side by
    /// distance, farthest first on the left and farthest last on the right.
    fn arrange<R: Rng + ?Sized>(
        &self,
        tree: &DependencyTree,
        tokens: &[Token],
        head: usize,
        rng: &mut R,
        fallbacks: &mut BTreeSet<String>,
    ) -> (Vec<usize>, Vec<usize>) {
        let mut children: Vec<usize> = tree.children(head).collect();
        // Draw order must not depend on the graph's edge layout.
        children.sort_by_key(|&child| tokens[child].index);

        let mut left = Vec::new();
        let mut right = Vec::new();
        for child in children {
            let token = &tokens[child];
            self.note_fallback(token, fallbacks);
            match resolve_side(token, &self.grammar.head_placement, self.mode, rng) {
                Side::Left => left.push(child),
                Side::Right => right.push(child),
            }
        }

        let distance = |slot: usize| self.grammar.distance_weight(&tokens[slot].relation);
        let by_index = |a: usize, b: usize| tokens[a].index.cmp(&tokens[b].index);
        left.sort_by(|&a, &b| distance(b).total_cmp(&distance(a)).then_with(|| by_index(a, b)));
        right.sort_by(|&a, &b| distance(a).total_cmp(&distance(b)).then_with(|| by_index(a, b)));
        (left, right)
    }

    fn note_fallback(&self, token: &Token, fallbacks: &mut BTreeSet<String>) {
        let relation = coarse(&token.relation);
        let known = self.grammar.head_weight(relation).is_some()
            && self.grammar.distance.contains(relation);
        if !known && !fallbacks.contains(relation) {
            tracing::debug!(relation, token = %token.index, "no weight for relation, using fallback");
            fallbacks.insert(relation.to_string());
        }
    }
}

/// Orders `tokens` under `grammar` and writes the new positions onto them.
pub fn linearize<R: Rng + ?Sized>(
    tokens: &mut [Token],
    grammar: &Grammar,
    mode: OrderingMode,
    rng: &mut R,
) -> Result<Linearization, StructuralIntegrityError> {
    Linearizer::new(grammar)
        .with_mode(mode)
        .linearize_with_rng(tokens, rng)
}
