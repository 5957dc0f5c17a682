/// Relation labels a grammar assigns weights to.
///
/// Universal Dependencies relations after function-head conversion: the
/// `lifted_*` labels mark content words demoted below their function word.
pub const RELATIONS: [&str; 28] = [
    "acl",
    "advcl",
    "advmod",
    "amod",
    "appos",
    "aux",
    "case",
    "ccomp",
    "compound",
    "conj",
    "csubj",
    "det",
    "expl",
    "fixed",
    "flat",
    "iobj",
    "lifted_case",
    "lifted_cc",
    "lifted_cop",
    "lifted_mark",
    "nmod",
    "nsubj",
    "nummod",
    "obj",
    "obl",
    "parataxis",
    "punct",
    "xcomp",
];

/// Relation carried by the root token.
pub const ROOT_RELATION: &str = "root";

/// Strips a language-specific subtype: `nmod:poss` becomes `nmod`.
pub fn coarse(label: &str) -> &str {
    match label.split_once(':') {
        Some((base, _)) => base,
        None => label,
    }
}

pub fn is_known(label: &str) -> bool {
    RELATIONS.contains(&coarse(label))
}
