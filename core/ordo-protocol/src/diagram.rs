use crate::error::LayoutError;
use crate::token::Token;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ArcDirection {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct DiagramWord {
    pub text: String,
    pub tag: String,
}

/// One labelled arc. `start < end`, both zero-based word positions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct DiagramArc {
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub dir: ArcDirection,
}

/// Word list plus arc list for a dependency-arc renderer, in the shape
/// displaCy's manual mode expects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct ArcDiagram {
    pub words: Vec<DiagramWord>,
    pub arcs: Vec<DiagramArc>,
}

impl ArcDiagram {
    /// Lays out a linearized sentence. Every token must carry a
    /// `reordered_index`; the root contributes a word but no arc.
    pub fn from_tokens(tokens: &[Token]) -> Result<Self, LayoutError> {
        let mut placed = Vec::with_capacity(tokens.len());
        for token in tokens {
            let position = token
                .reordered_index
                .ok_or(LayoutError::NotLinearized { token: token.index })?;
            placed.push((position, token));
        }
        placed.sort_by_key(|(position, _)| *position);

        let mut diagram = ArcDiagram::default();
        for (position, token) in placed {
            diagram.words.push(DiagramWord {
                text: token.form.clone(),
                tag: token.upos.clone().unwrap_or_default(),
            });

            if token.head.is_none() {
                continue;
            }
            let head = token
                .reordered_head
                .ok_or(LayoutError::NotLinearized { token: token.index })?;

            let (dependent, head) = (position.slot(), head.slot());
            let (start, end, dir) = if dependent > head {
                (head, dependent, ArcDirection::Left)
            } else {
                (dependent, head, ArcDirection::Right)
            };
            diagram.arcs.push(DiagramArc {
                start,
                end,
                label: token.relation.clone(),
                dir,
            });
        }
        Ok(diagram)
    }
}
