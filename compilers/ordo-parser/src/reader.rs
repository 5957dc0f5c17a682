use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ordo_protocol::{Sentence, Token, TokenId};

use crate::error::ParseError;
use crate::parser::parse_line;
use crate::token::RawToken;

/// Reads CoNLL-U text into sentences ready for ordering.
#[derive(Debug, Clone)]
pub struct ConllReader {
    lowercase_forms: bool,
}

impl Default for ConllReader {
    fn default() -> Self {
        Self {
            lowercase_forms: true,
        }
    }
}

impl ConllReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower-cases word forms (on by default). Relation labels are always
    /// lower-cased.
    pub fn lowercase_forms(mut self, enabled: bool) -> Self {
        self.lowercase_forms = enabled;
        self
    }

    pub fn parse_str(&self, input: &str) -> Result<Vec<Sentence>, ParseError> {
        let mut builder = SentenceBuilder::default();
        for (i, line) in input.lines().enumerate() {
            self.feed(&mut builder, i + 1, line)?;
        }
        Ok(builder.finish())
    }

    pub fn read<R: BufRead>(&self, reader: R) -> Result<Vec<Sentence>, ParseError> {
        let mut builder = SentenceBuilder::default();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            self.feed(&mut builder, i + 1, &line)?;
        }
        Ok(builder.finish())
    }

    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Sentence>, ParseError> {
        let file = File::open(path)?;
        self.read(BufReader::new(file))
    }

    fn feed(
        &self,
        builder: &mut SentenceBuilder,
        line_no: usize,
        line: &str,
    ) -> Result<(), ParseError> {
        let line = line.trim();
        if line.is_empty() {
            builder.close();
            return Ok(());
        }
        if line.starts_with('#') {
            builder.comment(line);
            return Ok(());
        }
        match parse_line(line) {
            Ok(Some(raw)) => {
                builder.push(self.token(raw));
                Ok(())
            }
            Ok(None) => {
                tracing::debug!(line = line_no, "skipping multiword or empty-node line");
                Ok(())
            }
            Err(source) => Err(ParseError::Line {
                line: line_no,
                source,
            }),
        }
    }

    fn token(&self, raw: RawToken<'_>) -> Token {
        let form = if self.lowercase_forms {
            raw.form.to_lowercase()
        } else {
            raw.form.to_string()
        };
        Token {
            index: TokenId(raw.id),
            form,
            lemma: raw.lemma.map(str::to_string),
            upos: raw.upos.map(str::to_string),
            xpos: raw.xpos.map(str::to_string),
            feats: raw.feats.map(str::to_string),
            head: (raw.head != 0).then_some(TokenId(raw.head)),
            relation: raw.deprel.to_lowercase(),
            deps: raw.deps.map(str::to_string),
            misc: raw.misc.map(str::to_string),
            reordered_index: None,
            reordered_head: None,
        }
    }
}

#[derive(Default)]
struct SentenceBuilder {
    sentences: Vec<Sentence>,
    comments: Vec<String>,
    tokens: Vec<Token>,
}

impl SentenceBuilder {
    fn comment(&mut self, line: &str) {
        self.comments.push(line.to_string());
    }

    fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Ends the current sentence. Comment blocks without tokens are dropped.
    fn close(&mut self) {
        if self.tokens.is_empty() {
            if !self.comments.is_empty() {
                tracing::debug!(count = self.comments.len(), "dropping comments without tokens");
                self.comments.clear();
            }
            return;
        }
        let id = self.sentences.len() as u32 + 1;
        let mut sentence = Sentence::new(id, std::mem::take(&mut self.tokens));
        sentence.comments = std::mem::take(&mut self.comments);
        self.sentences.push(sentence);
    }

    fn finish(mut self) -> Vec<Sentence> {
        self.close();
        self.sentences
    }
}
