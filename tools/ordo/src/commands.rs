use std::collections::BTreeSet;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use ordo_parser::{to_conllu, to_function_head, ConllReader, Numbering};
use ordo_protocol::{ArcDiagram, Grammar, Sentence};
use ordo_solver::{sample_grammar, Linearizer, OrderingMode, SAMPLE_SPREAD};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Deterministic,
    Randomized,
}

impl From<Mode> for OrderingMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Deterministic => OrderingMode::Deterministic,
            Mode::Randomized => OrderingMode::Randomized,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Renumbered CoNLL-U in the new order
    Conllu,
    /// JSON word and arc lists for a dependency-arc renderer
    Diagram,
}

#[derive(Debug, Args)]
pub struct ReorderArgs {
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// JSON grammar, or a binary archive when the extension is `.rkyv`
    #[arg(short, long, value_name = "FILE")]
    pub grammar: PathBuf,

    /// Defaults to stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Mode::Deterministic)]
    pub mode: Mode,

    /// Seed for randomized mode; drawn from the OS when absent
    #[arg(long)]
    pub seed: Option<u64>,

    /// Promote cc, case, cop and mark dependents to heads before ordering
    #[arg(long)]
    pub function_head: bool,

    /// Keep word forms as written instead of lower-casing them
    #[arg(long)]
    pub keep_case: bool,

    #[arg(long, value_enum, default_value_t = Format::Conllu)]
    pub format: Format,
}

#[derive(Debug, Args)]
pub struct SampleArgs {
    #[arg(long)]
    pub seed: Option<u64>,

    /// Weights are drawn from [-spread, spread)
    #[arg(long, default_value_t = SAMPLE_SPREAD)]
    pub spread: f64,

    /// JSON, or a binary archive when the extension is `.rkyv`
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct CompileArgs {
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,
}

/// What a reorder run did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReorderSummary {
    pub written: usize,
    pub skipped: usize,
    pub fallbacks: BTreeSet<String>,
}

#[derive(Serialize)]
struct SentenceDiagram {
    sentence: u32,
    #[serde(flatten)]
    diagram: ArcDiagram,
}

pub fn reorder(args: &ReorderArgs) -> anyhow::Result<ReorderSummary> {
    let grammar = load_grammar(&args.grammar)?;
    let sentences = ConllReader::new()
        .lowercase_forms(!args.keep_case)
        .read_path(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    tracing::info!(sentences = sentences.len(), input = %args.input.display(), "loaded corpus");

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let linearizer = Linearizer::new(&grammar).with_mode(args.mode.into());

    let mut summary = ReorderSummary::default();
    let mut ordered = Vec::with_capacity(sentences.len());
    for mut sentence in sentences {
        if args.function_head {
            if let Err(err) = to_function_head(&mut sentence.tokens) {
                tracing::warn!(sentence = %sentence.id, %err, "skipping sentence");
                summary.skipped += 1;
                continue;
            }
        }
        match linearizer.linearize_with_rng(&mut sentence.tokens, &mut rng) {
            Ok(linearization) => {
                summary.fallbacks.extend(linearization.fallbacks);
                ordered.push(sentence);
            }
            Err(err) => {
                tracing::warn!(sentence = %sentence.id, %err, "skipping sentence");
                summary.skipped += 1;
            }
        }
    }
    summary.written = ordered.len();

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            fs::File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    match args.format {
        Format::Conllu => write_conllu(&mut out, &ordered)?,
        Format::Diagram => write_diagrams(&mut out, &ordered)?,
    }
    out.flush()?;

    if !summary.fallbacks.is_empty() {
        tracing::info!(relations = ?summary.fallbacks, "ordered with fallback weights");
    }
    tracing::info!(written = summary.written, skipped = summary.skipped, "reorder finished");
    Ok(summary)
}

fn write_conllu(out: &mut dyn Write, sentences: &[Sentence]) -> anyhow::Result<()> {
    for sentence in sentences {
        out.write_all(to_conllu(sentence, Numbering::Reordered)?.as_bytes())?;
    }
    Ok(())
}

fn write_diagrams(out: &mut dyn Write, sentences: &[Sentence]) -> anyhow::Result<()> {
    let diagrams = sentences
        .iter()
        .map(|sentence| {
            Ok(SentenceDiagram {
                sentence: sentence.id.0,
                diagram: ArcDiagram::from_tokens(&sentence.tokens)?,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    serde_json::to_writer_pretty(&mut *out, &diagrams)?;
    writeln!(out)?;
    Ok(())
}

pub fn sample(args: &SampleArgs) -> anyhow::Result<()> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let grammar = sample_grammar(&mut rng, args.spread)?;
    save_grammar(&grammar, &args.output)?;
    tracing::info!(output = %args.output.display(), seed = ?args.seed, "sampled grammar written");
    Ok(())
}

pub fn compile(args: &CompileArgs) -> anyhow::Result<()> {
    let grammar = load_grammar(&args.input)?;
    tracing::info!(
        head_placement = grammar.head_placement.len(),
        distance = grammar.distance.len(),
        "compiling grammar"
    );
    let bytes = grammar.to_bytes()?;
    fs::write(&args.output, bytes.as_slice()).with_context(|| format!("writing {}", args.output.display()))?;
    tracing::info!(bytes = bytes.len(), output = %args.output.display(), "archive written");
    Ok(())
}

fn is_archive(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "rkyv")
}

pub fn load_grammar(path: &Path) -> anyhow::Result<Grammar> {
    let grammar = if is_archive(path) {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        Grammar::from_bytes(&bytes).with_context(|| format!("loading {}", path.display()))?
    } else {
        let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
    };
    let unknown = grammar.unknown_relations();
    if !unknown.is_empty() {
        tracing::warn!(
            relations = ?unknown,
            path = %path.display(),
            "grammar has weights for relations outside the vocabulary"
        );
    }
    tracing::debug!(path = %path.display(), "grammar loaded");
    Ok(grammar)
}

pub fn save_grammar(grammar: &Grammar, path: &Path) -> anyhow::Result<()> {
    let written = if is_archive(path) {
        fs::write(path, grammar.to_bytes()?.as_slice())
    } else {
        fs::write(path, serde_json::to_string_pretty(grammar)?)
    };
    written.with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordo_parser::EXAMPLE;
    use ordo_protocol::TokenId;

    const GRAMMAR: &str = r#"{
        "head_placement": {"nsubj": 0.6, "obj": -0.4, "det": 0.2, "nmod": -0.1},
        "distance": {"det": 0.9, "nmod": 0.1}
    }"#;

    fn setup(dir: &Path, corpus: &str) -> (PathBuf, PathBuf) {
        let input = dir.join("corpus.conllu");
        let grammar = dir.join("grammar.json");
        fs::write(&input, corpus).unwrap();
        fs::write(&grammar, GRAMMAR).unwrap();
        (input, grammar)
    }

    fn args(input: PathBuf, grammar: PathBuf, output: PathBuf) -> ReorderArgs {
        ReorderArgs {
            input,
            grammar,
            output: Some(output),
            mode: Mode::Deterministic,
            seed: Some(1),
            function_head: false,
            keep_case: false,
            format: Format::Conllu,
        }
    }

    #[test]
    fn test_reorder_writes_renumbered_conllu() {
        let dir = tempfile::tempdir().unwrap();
        let (input, grammar) = setup(dir.path(), EXAMPLE);
        let output = dir.path().join("out.conllu");

        let summary = reorder(&args(input, grammar, output.clone())).unwrap();
        assert_eq!(summary.written, 1);
        assert_eq!(summary.skipped, 0);
        assert!(summary.fallbacks.contains("punct"));

        let sentences = ConllReader::new().read_path(&output).unwrap();
        let tokens = &sentences[0].tokens;
        assert_eq!(tokens.len(), 16);
        let ids: Vec<u32> = tokens.iter().map(|t| t.index.0).collect();
        assert_eq!(ids, (1..=16).collect::<Vec<_>>());
        assert_eq!(tokens.iter().filter(|t| t.is_root()).count(), 1);

        // obj is negative, so "frederick" now precedes "induced".
        let position = |form: &str| tokens.iter().position(|t| t.form == form).unwrap();
        assert!(position("frederick") < position("induced"));
        // nsubj is positive, so "danger" follows it.
        assert!(position("danger") > position("induced"));
        let danger = &tokens[position("danger")];
        assert_eq!(danger.head, Some(TokenId(position("induced") as u32 + 1)));
    }

    #[test]
    fn test_reorder_diagram_output() {
        let dir = tempfile::tempdir().unwrap();
        let (input, grammar) = setup(dir.path(), EXAMPLE);
        let output = dir.path().join("out.json");

        let mut args = args(input, grammar, output.clone());
        args.format = Format::Diagram;
        reorder(&args).unwrap();

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        let first = &json[0];
        assert_eq!(first["sentence"], 1);
        assert_eq!(first["words"].as_array().unwrap().len(), 16);
        assert_eq!(first["arcs"].as_array().unwrap().len(), 15);
    }

    #[test]
    fn test_bad_sentences_are_skipped() {
        let corpus = format!(
            "{EXAMPLE}\n\n1\tand\tand\tCCONJ\t_\t_\t0\tcc\t_\t_\n\n1\ta\ta\tX\t_\t_\t0\troot\t_\t_\n2\tb\tb\tX\t_\t_\t0\troot\t_\t_\n"
        );
        let dir = tempfile::tempdir().unwrap();
        let (input, grammar) = setup(dir.path(), &corpus);
        let output = dir.path().join("out.conllu");

        let mut args = args(input, grammar, output.clone());
        args.function_head = true;
        let summary = reorder(&args).unwrap();
        // Root function word fails conversion, two roots fail ordering.
        assert_eq!(summary.written, 1);
        assert_eq!(summary.skipped, 2);

        let sentences = ConllReader::new().read_path(&output).unwrap();
        assert_eq!(sentences.len(), 1);
        assert!(sentences[0].tokens.iter().all(|t| !t.relation.starts_with("case")));
        assert!(sentences[0].tokens.iter().any(|t| t.relation == "lifted_case"));
    }

    #[test]
    fn test_keep_case() {
        let dir = tempfile::tempdir().unwrap();
        let (input, grammar) = setup(dir.path(), EXAMPLE);
        let output = dir.path().join("out.conllu");

        let mut args = args(input, grammar, output.clone());
        args.keep_case = true;
        reorder(&args).unwrap();
        let text = fs::read_to_string(&output).unwrap();
        assert!(text.contains("\tGermany\t"));
    }

    #[test]
    fn test_sample_then_compile() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("sampled.json");
        let archive = dir.path().join("sampled.rkyv");

        sample(&SampleArgs { seed: Some(3), spread: SAMPLE_SPREAD, output: json.clone() }).unwrap();
        compile(&CompileArgs { input: json.clone(), output: archive.clone() }).unwrap();

        let from_json = load_grammar(&json).unwrap();
        let from_archive = load_grammar(&archive).unwrap();
        assert_eq!(from_json, from_archive);
        assert_eq!(from_json.head_placement.len(), ordo_protocol::relation::RELATIONS.len());
    }

    #[test]
    fn test_invalid_grammar_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"head_placement": {"obj": 2.5}}"#).unwrap();
        let err = load_grammar(&path).unwrap_err();
        assert!(format!("{err:#}").contains("obj"));

        let corrupt = dir.path().join("bad.rkyv");
        fs::write(&corrupt, [1u8, 2, 3]).unwrap();
        assert!(load_grammar(&corrupt).is_err());
    }
}
