use thiserror::Error;

use crate::ids::TokenId;

/// Rejected weight or grammar input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("weight {weight} for relation '{relation}' is outside [{min}, {max}]")]
    OutOfRange {
        relation: String,
        weight: f64,
        min: f64,
        max: f64,
    },

    #[error("weight for relation '{relation}' is not a finite number")]
    NotFinite { relation: String },

    #[error("relation '{relation}' carries a subtype; weights are keyed by coarse relation")]
    SubtypedRelation { relation: String },

    #[error("grammar archive is corrupt or not a grammar archive")]
    CorruptArchive,

    #[error("grammar archive version {found} is not supported (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("grammar could not be serialized")]
    Serialization,
}

/// The token collection does not form a single-rooted tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralIntegrityError {
    #[error("sentence has no root token")]
    NoRoot,

    #[error("sentence has more than one root token: {roots:?}")]
    MultipleRoots { roots: Vec<TokenId> },

    #[error("token {token} points at head {head}, which is not in the sentence")]
    MissingHead { token: TokenId, head: TokenId },

    #[error("token {token} is its own head")]
    SelfHead { token: TokenId },

    #[error("token index {token} occurs more than once")]
    DuplicateIndex { token: TokenId },

    #[error("head chain of token {token} forms a cycle")]
    Cycle { token: TokenId },

    #[error("function word {token} ('{relation}') is attached to the root sentinel")]
    RootFunctionWord { token: TokenId, relation: String },

    #[error("token {token} still carries function relation '{relation}' after conversion")]
    UnconvertedFunctionWord { token: TokenId, relation: String },
}

/// A reordered view was requested for tokens that were never linearized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("token {token} has not been linearized")]
    NotLinearized { token: TokenId },
}
