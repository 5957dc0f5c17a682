/// Identifier column of a CoNLL-U line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawId {
    /// A syntactic word, `7`.
    Word(u32),
    /// A multiword token spanning several words, `3-4`.
    Range(u32, u32),
    /// An empty node of the enhanced graph, `5.1`.
    Empty(u32, u32),
}

/// The ten columns of a word line, borrowed from the input.
/// `_` has already been turned into `None` for optional columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken<'a> {
    pub id: u32,
    pub form: &'a str,
    pub lemma: Option<&'a str>,
    pub upos: Option<&'a str>,
    pub xpos: Option<&'a str>,
    pub feats: Option<&'a str>,
    /// `0` marks the root.
    pub head: u32,
    pub deprel: &'a str,
    pub deps: Option<&'a str>,
    pub misc: Option<&'a str>,
}
