use std::fmt::Write;

use ordo_protocol::{LayoutError, Sentence, Token, TokenId};

/// Numbering used when writing a sentence back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Numbering {
    /// Input order with the original ID and HEAD columns.
    #[default]
    Original,
    /// Linearized order; ID and HEAD are renumbered and DEPS is blanked.
    Reordered,
}

/// Formats one sentence as a CoNLL-U block, comments included, ending in
/// a blank line.
pub fn to_conllu(sentence: &Sentence, numbering: Numbering) -> Result<String, LayoutError> {
    let mut rows: Vec<(TokenId, Option<TokenId>, &Token)> = Vec::with_capacity(sentence.len());
    for token in &sentence.tokens {
        let row = match numbering {
            Numbering::Original => (token.index, token.head, token),
            Numbering::Reordered => {
                let not_placed = LayoutError::NotLinearized { token: token.index };
                let index = token.reordered_index.ok_or(not_placed.clone())?;
                if token.head.is_some() && token.reordered_head.is_none() {
                    return Err(not_placed);
                }
                (index, token.reordered_head, token)
            }
        };
        rows.push(row);
    }
    rows.sort_by_key(|(index, _, _)| *index);

    let mut out = String::new();
    for comment in &sentence.comments {
        out.push_str(comment);
        out.push('\n');
    }
    for (index, head, token) in rows {
        let deps = match numbering {
            Numbering::Original => column(&token.deps),
            Numbering::Reordered => "_",
        };
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "{index}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{deps}\t{}",
            token.form,
            column(&token.lemma),
            column(&token.upos),
            column(&token.xpos),
            column(&token.feats),
            head.map_or(0, |h| h.0),
            token.relation,
            column(&token.misc),
        );
    }
    out.push('\n');
    Ok(out)
}

fn column(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::ConllReader;

    const INPUT: &str = "# sent_id = 1\n\
1\tDogs\tdog\tNOUN\t_\tNumber=Plur\t2\tnsubj\t2:nsubj\t_\n\
2\tbark\tbark\tVERB\t_\t_\t0\troot\t0:root\tSpaceAfter=No\n";

    #[test]
    fn test_original_layout() {
        let sentence = ConllReader::new()
            .lowercase_forms(false)
            .parse_str(INPUT)
            .unwrap()
            .remove(0);
        assert_eq!(to_conllu(&sentence, Numbering::Original).unwrap(), format!("{INPUT}\n"));
    }

    #[test]
    fn test_reordered_layout() {
        let mut sentence = ConllReader::new().parse_str(INPUT).unwrap().remove(0);
        sentence.tokens[0].reordered_index = Some(TokenId(2));
        sentence.tokens[0].reordered_head = Some(TokenId(1));
        sentence.tokens[1].reordered_index = Some(TokenId(1));

        let text = to_conllu(&sentence, Numbering::Reordered).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# sent_id = 1");
        assert_eq!(lines[1], "1\tbark\tbark\tVERB\t_\t_\t0\troot\t_\tSpaceAfter=No");
        assert_eq!(lines[2], "2\tdogs\tdog\tNOUN\t_\tNumber=Plur\t1\tnsubj\t_\t_");
    }

    #[test]
    fn test_reordered_needs_positions() {
        let sentence = ConllReader::new().parse_str(INPUT).unwrap().remove(0);
        assert_eq!(
            to_conllu(&sentence, Numbering::Reordered),
            Err(LayoutError::NotLinearized { token: TokenId(1) })
        );
    }
}
