pub mod error;
pub mod function_head;
pub mod parser;
pub mod reader;
pub mod token;
pub mod writer;

use ordo_protocol::Sentence;

pub use crate::error::{LineError, ParseError};
pub use crate::function_head::{to_function_head, FUNCTION_RELATIONS};
pub use crate::reader::ConllReader;
pub use crate::writer::{to_conllu, Numbering};

/// Demo sentence shown before any input is given.
pub const EXAMPLE: &str = "1\tThe\tthe\tDET\tDEF\tDefinite=Def|PronType=Art\t2\tdet\t_\t_
2\tdanger\tdanger\tNOUN\tSG-NOM\tNumber=Sing\t8\tnsubj\t_\t_
3\tto\tto\tADP\t_\t_\t4\tcase\t_\t_
4\tGermany\tGermany\tPROPN\tSG-NOM\tNumber=Sing\t2\tnmod\t_\t_
5\tfrom\tfrom\tADP\t_\t_\t7\tcase\t_\t_
6\tthe\tthe\tDET\tDEF\tDefinite=Def|PronType=Art\t7\tdet\t_\t_
7\tHussites\tHussites\tNOUN\tPL-NOM\tNumber=Plur\t2\tnmod\t_\t_
8\tinduced\tinduce\tVERB\tPAST\tMood=Ind|Tense=Past|VerbForm=Fin\t0\troot\t_\t_
9\tFrederick\tFrederick\tPROPN\tSG-NOM\tNumber=Sing\t8\tobj\t_\t_
10\tto\tto\tPART\t_\t_\t11\tmark\t_\t_
11\tally\tally\tVERB\tINF\tVerbForm=Inf\t8\tadvcl\t_\t_
12\thimself\the\tPRON\tRFL-P3SG\tCase=Acc|Gender=Masc|Number=Sing|Person=3|PronType=Prs|Reflex=Yes\t11\tobj\t_\t_
13\twith\twith\tADP\t_\t_\t15\tcase\t_\t_
14\tEmperor\tEmperor\tADJ\tPOS\tDegree=Pos\t15\tamod\t_\t_
15\tSigismund\tSigismund\tNOUN\tSG-NOM\tNumber=Sing\t11\tobl\t_\t_
16\t;\t;\tPUNCT\tSemiColon\t_\t8\tpunct\t_\t_";

/// Parses CoNLL-U text with the default reader settings.
pub fn parse_conllu(input: &str) -> Result<Vec<Sentence>, ParseError> {
    ConllReader::new().parse_str(input)
}
