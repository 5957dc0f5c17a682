use crate::ids::{SentenceId, TokenId};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// One word of a dependency-annotated sentence.
///
/// `index`, `head` and `relation` are what the ordering engine reads;
/// `reordered_index` and `reordered_head` are what it writes. Everything
/// else is payload carried through for the output side.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct Token {
    pub index: TokenId,
    pub form: String,
    pub lemma: Option<String>,
    /// Universal (coarse) part-of-speech tag.
    pub upos: Option<String>,
    /// Language-specific (fine) part-of-speech tag.
    pub xpos: Option<String>,
    pub feats: Option<String>,
    /// Governing token, `None` for the root.
    pub head: Option<TokenId>,
    pub relation: String,
    pub deps: Option<String>,
    pub misc: Option<String>,
    /// Position in the computed order, set by a linearization pass.
    pub reordered_index: Option<TokenId>,
    /// Position of the head in the computed order, `None` for the root.
    pub reordered_head: Option<TokenId>,
}

impl Token {
    pub fn new(
        index: u32,
        form: impl Into<String>,
        head: Option<u32>,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            index: TokenId(index),
            form: form.into(),
            lemma: None,
            upos: None,
            xpos: None,
            feats: None,
            head: head.map(TokenId),
            relation: relation.into(),
            deps: None,
            misc: None,
            reordered_index: None,
            reordered_head: None,
        }
    }

    pub fn with_upos(mut self, upos: impl Into<String>) -> Self {
        self.upos = Some(upos.into());
        self
    }

    pub fn is_root(&self) -> bool {
        self.head.is_none()
    }

    /// Drops the results of a previous linearization pass.
    pub fn clear_reordering(&mut self) {
        self.reordered_index = None;
        self.reordered_head = None;
    }
}

/// A sentence as delivered by the input side: tokens in original order plus
/// the comment lines that preceded them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct Sentence {
    pub id: SentenceId,
    pub comments: Vec<String>,
    pub tokens: Vec<Token>,
}

impl Sentence {
    pub fn new(id: u32, tokens: Vec<Token>) -> Self {
        Self {
            id: SentenceId(id),
            comments: Vec::new(),
            tokens,
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// True when a `# newdoc` comment opens this sentence.
    pub fn starts_document(&self) -> bool {
        self.comments
            .iter()
            .any(|c| c.trim_start_matches('#').trim_start().starts_with("newdoc"))
    }

    /// Tokens in computed order. Tokens that were never linearized sort last,
    /// in original order.
    pub fn reordered(&self) -> Vec<&Token> {
        let mut tokens: Vec<&Token> = self.tokens.iter().collect();
        tokens.sort_by_key(|t| (t.reordered_index.is_none(), t.reordered_index, t.index));
        tokens
    }
}
