pub mod diagram;
pub mod error;
pub mod grammar;
pub mod ids;
pub mod relation;
pub mod token;
pub mod weights;

// Re-export core types for convenience
pub use diagram::{ArcDiagram, ArcDirection, DiagramArc, DiagramWord};
pub use error::{ConfigurationError, LayoutError, StructuralIntegrityError};
pub use grammar::{Grammar, GrammarArchive, GRAMMAR_ARCHIVE_VERSION};
pub use ids::{SentenceId, TokenId};
pub use token::{Sentence, Token};
pub use weights::{WeightMap, FALLBACK_WEIGHT, MAX_WEIGHT, MIN_WEIGHT};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_slots() {
        assert_eq!(TokenId(1).slot(), 0);
        assert_eq!(TokenId::from_slot(0), TokenId(1));
        assert_eq!(TokenId::from_slot(15), TokenId(16));
        assert_eq!(TokenId(16).to_string(), "16");
    }

    #[test]
    fn test_id_layout() {
        // TokenId(u32) should be exactly 4 bytes
        assert_eq!(core::mem::size_of::<TokenId>(), 4);
        assert_eq!(core::mem::size_of::<Option<TokenId>>(), 8);
    }

    #[test]
    fn test_reordered_view() {
        let mut sentence = Sentence::new(
            1,
            vec![
                Token::new(1, "a", Some(2), "det"),
                Token::new(2, "b", None, "root"),
                Token::new(3, "c", Some(2), "punct"),
            ],
        );
        sentence.tokens[0].reordered_index = Some(TokenId(2));
        sentence.tokens[1].reordered_index = Some(TokenId(1));

        let forms: Vec<&str> = sentence.reordered().iter().map(|t| t.form.as_str()).collect();
        assert_eq!(forms, ["b", "a", "c"]);
    }

    #[test]
    fn test_newdoc_marker() {
        let mut sentence = Sentence::new(1, vec![]);
        assert!(!sentence.starts_document());
        sentence.comments.push("# newdoc id = weblog-1".to_string());
        assert!(sentence.starts_document());
        assert!(sentence.is_empty());
    }
}
