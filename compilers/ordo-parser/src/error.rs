use thiserror::Error;

/// Why a single CoNLL-U line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("expected 10 tab-separated columns, found {found}")]
    ColumnCount { found: usize },

    #[error("invalid ID column '{value}'")]
    InvalidId { value: String },

    #[error("invalid HEAD column '{value}'")]
    InvalidHead { value: String },

    #[error("DEPREL column is empty")]
    MissingRelation,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read treebank input: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: LineError,
    },
}

impl ParseError {
    /// One-based line number of the offending line, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Line { line, .. } => Some(*line),
            ParseError::Io(_) => None,
        }
    }
}
