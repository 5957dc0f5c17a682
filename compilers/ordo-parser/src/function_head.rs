use std::collections::HashMap;

use ordo_protocol::relation::coarse;
use ordo_protocol::{StructuralIntegrityError, Token, TokenId};

/// Function relations promoted to heads, in conversion order.
pub const FUNCTION_RELATIONS: [&str; 4] = ["cc", "case", "cop", "mark"];

/// Prefix given to a content word demoted below its function word.
pub const LIFTED_PREFIX: &str = "lifted_";

/// Rewrites a content-head (Universal Dependencies) tree into a
/// function-head tree.
///
/// For a function word `f` attached to content word `c`, which hangs off
/// `g`: `f` takes over `c`'s attachment (head `g` and `c`'s relation) and
/// `c` becomes a dependent of `f` labelled `lifted_<relation>`. Returns the
/// number of function words promoted.
pub fn to_function_head(tokens: &mut [Token]) -> Result<usize, StructuralIntegrityError> {
    let mut slots = HashMap::with_capacity(tokens.len());
    for (slot, token) in tokens.iter().enumerate() {
        if slots.insert(token.index, slot).is_some() {
            return Err(StructuralIntegrityError::DuplicateIndex { token: token.index });
        }
    }

    let mut promoted = 0;
    for function in FUNCTION_RELATIONS {
        for f in 0..tokens.len() {
            if coarse(&tokens[f].relation) != function {
                continue;
            }
            let f_index = tokens[f].index;
            let c_index = tokens[f].head.ok_or_else(|| StructuralIntegrityError::RootFunctionWord {
                token: f_index,
                relation: tokens[f].relation.clone(),
            })?;
            let c = lookup(&slots, f_index, c_index)?;
            if c == f {
                return Err(StructuralIntegrityError::SelfHead { token: f_index });
            }
            let grandparent = tokens[c].head;
            if grandparent == Some(f_index) {
                return Err(StructuralIntegrityError::Cycle { token: f_index });
            }

            // g -> c -> f  becomes  g -> f -> c
            let content_relation = std::mem::replace(
                &mut tokens[c].relation,
                format!("{LIFTED_PREFIX}{function}"),
            );
            tokens[c].head = Some(f_index);
            tokens[f].head = grandparent;
            tokens[f].relation = content_relation;
            promoted += 1;
        }
    }

    if let Some(token) = tokens
        .iter()
        .find(|t| FUNCTION_RELATIONS.contains(&coarse(&t.relation)))
    {
        return Err(StructuralIntegrityError::UnconvertedFunctionWord {
            token: token.index,
            relation: token.relation.clone(),
        });
    }

    tracing::debug!(promoted, "converted to function-head tree");
    Ok(promoted)
}

fn lookup(
    slots: &HashMap<TokenId, usize>,
    token: TokenId,
    head: TokenId,
) -> Result<usize, StructuralIntegrityError> {
    slots
        .get(&head)
        .copied()
        .ok_or(StructuralIntegrityError::MissingHead { token, head })
}
