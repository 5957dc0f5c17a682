use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::prelude::*;

use ordo_parser::{to_conllu, to_function_head, Numbering, ParseError};
use ordo_protocol::{ArcDiagram, ConfigurationError, Grammar, LayoutError};
use ordo_solver::{Linearizer, OrderingMode};

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("invalid grammar JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn to_js(err: EngineError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// One reordered sentence as sent back to the page.
#[derive(Debug, Serialize)]
pub struct SentenceReport {
    pub sentence: u32,
    /// Word forms in the new order.
    pub text: String,
    pub diagram: ArcDiagram,
    pub conllu: String,
    pub fallbacks: Vec<String>,
}

/// A sentence that could not be ordered.
#[derive(Debug, Serialize)]
pub struct SentenceIssue {
    pub sentence: u32,
    pub message: String,
}

#[derive(Debug, Default, Serialize)]
pub struct Report {
    pub sentences: Vec<SentenceReport>,
    pub issues: Vec<SentenceIssue>,
}

/// Ordering engine living in the browser. Owns its grammar; the page edits
/// weights in place and re-runs [`OrderingEngine::reorder`].
#[wasm_bindgen]
pub struct OrderingEngine {
    grammar: Grammar,
    mode: OrderingMode,
    function_head: bool,
    next_seed: u64,
}

#[wasm_bindgen]
impl OrderingEngine {
    /// Loads a binary grammar archive (fetched by the page).
    #[wasm_bindgen(constructor)]
    pub fn new(data: Vec<u8>) -> Result<OrderingEngine, JsValue> {
        Self::from_archive(&data).map_err(to_js)
    }

    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<OrderingEngine, JsValue> {
        Self::parse_json(json).map_err(to_js)
    }

    /// Engine with no weights: every relation uses the neutral fallback.
    pub fn neutral() -> OrderingEngine {
        Self::from_grammar(Grammar::default())
    }

    #[wasm_bindgen(js_name = setHeadWeight)]
    pub fn set_head_weight(&mut self, relation: &str, weight: f64) -> Result<(), JsValue> {
        self.update_head_weight(relation, weight)
            .map(drop)
            .map_err(|e| to_js(e.into()))
    }

    #[wasm_bindgen(js_name = setDistanceWeight)]
    pub fn set_distance_weight(&mut self, relation: &str, weight: f64) -> Result<(), JsValue> {
        self.update_distance_weight(relation, weight)
            .map(drop)
            .map_err(|e| to_js(e.into()))
    }

    #[wasm_bindgen(js_name = setRandomized)]
    pub fn set_randomized(&mut self, randomized: bool) {
        self.mode = if randomized {
            OrderingMode::Randomized
        } else {
            OrderingMode::Deterministic
        };
    }

    #[wasm_bindgen(js_name = setFunctionHead)]
    pub fn set_function_head(&mut self, enabled: bool) {
        self.function_head = enabled;
    }

    #[wasm_bindgen(js_name = grammarJson)]
    pub fn grammar_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.grammar).map_err(|e| to_js(e.into()))
    }

    /// CoNLL-U text in, [`Report`] out. Without a seed, randomized mode
    /// draws from an internal counter.
    pub fn reorder(&mut self, conllu: &str, seed: Option<u64>) -> Result<JsValue, JsValue> {
        let report = self.analyze(conllu, seed).map_err(to_js)?;
        Ok(serde_wasm_bindgen::to_value(&report)?)
    }
}

impl OrderingEngine {
    pub fn from_grammar(grammar: Grammar) -> Self {
        Self {
            grammar,
            mode: OrderingMode::Deterministic,
            function_head: false,
            next_seed: 0,
        }
    }

    pub fn from_archive(bytes: &[u8]) -> Result<Self, EngineError> {
        Ok(Self::from_grammar(Grammar::from_bytes(bytes)?))
    }

    pub fn parse_json(json: &str) -> Result<Self, EngineError> {
        Ok(Self::from_grammar(serde_json::from_str(json)?))
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn update_head_weight(
        &mut self,
        relation: &str,
        weight: f64,
    ) -> Result<Option<f64>, ConfigurationError> {
        self.grammar.head_placement.insert(relation, weight)
    }

    pub fn update_distance_weight(
        &mut self,
        relation: &str,
        weight: f64,
    ) -> Result<Option<f64>, ConfigurationError> {
        self.grammar.distance.insert(relation, weight)
    }

    /// Parses and orders every sentence. Sentences that are not well-formed
    /// trees are listed as issues rather than failing the whole input.
    pub fn analyze(&mut self, conllu: &str, seed: Option<u64>) -> Result<Report, EngineError> {
        let sentences = ordo_parser::parse_conllu(conllu)?;
        let seed = seed.unwrap_or_else(|| {
            self.next_seed = self.next_seed.wrapping_add(1);
            self.next_seed
        });
        let mut rng = StdRng::seed_from_u64(seed);
        let linearizer = Linearizer::new(&self.grammar).with_mode(self.mode);

        let mut report = Report::default();
        for mut sentence in sentences {
            let id = sentence.id.0;
            let converted = if self.function_head {
                to_function_head(&mut sentence.tokens).map(drop)
            } else {
                Ok(())
            };
            let ordered = converted.and_then(|()| linearizer.linearize_with_rng(&mut sentence.tokens, &mut rng));
            let linearization = match ordered {
                Ok(linearization) => linearization,
                Err(err) => {
                    report.issues.push(SentenceIssue {
                        sentence: id,
                        message: err.to_string(),
                    });
                    continue;
                }
            };

            let text = linearization
                .tokens(&sentence.tokens)
                .iter()
                .map(|t| t.form.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            report.sentences.push(SentenceReport {
                sentence: id,
                text,
                diagram: ArcDiagram::from_tokens(&sentence.tokens)?,
                conllu: to_conllu(&sentence, Numbering::Reordered)?,
                fallbacks: linearization.fallbacks.into_iter().collect(),
            });
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordo_parser::EXAMPLE;
    use ordo_protocol::WeightMap;

    #[test]
    fn test_neutral_grammar_keeps_heads_first() {
        let mut engine = OrderingEngine::from_grammar(Grammar::default());
        let report = engine.analyze("1\tdogs\t_\t_\t_\t_\t2\tnsubj\t_\t_\n2\tbark\t_\t_\t_\t_\t0\troot\t_\t_\n", None).unwrap();
        assert_eq!(report.sentences.len(), 1);
        assert_eq!(report.sentences[0].text, "bark dogs");
        assert_eq!(report.sentences[0].fallbacks, ["nsubj"]);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_weight_edits_take_effect() {
        let mut engine = OrderingEngine::from_grammar(Grammar::default());
        engine.update_head_weight("nsubj", -0.8).unwrap();
        engine.update_head_weight("det", -0.5).unwrap();
        engine.update_head_weight("obj", 0.3).unwrap();
        engine.update_head_weight("advcl", 0.5).unwrap();
        let report = engine.analyze(EXAMPLE, Some(1)).unwrap();
        let text = &report.sentences[0].text;
        assert!(text.starts_with("the danger"), "got {text}");
        assert_eq!(report.sentences[0].diagram.arcs.len(), 15);

        assert!(matches!(
            engine.update_distance_weight("det", 1.5),
            Err(ConfigurationError::OutOfRange { .. })
        ));
        assert!(engine.grammar().distance.is_empty());
    }

    #[test]
    fn test_bad_sentences_become_issues() {
        let input = format!("{EXAMPLE}\n\n1\ta\t_\t_\t_\t_\t0\troot\t_\t_\n2\tb\t_\t_\t_\t_\t0\troot\t_\t_\n");
        let mut engine = OrderingEngine::from_grammar(Grammar::default());
        let report = engine.analyze(&input, None).unwrap();
        assert_eq!(report.sentences.len(), 1);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].sentence, 2);
        assert!(report.issues[0].message.contains("more than one root"));
    }

    #[test]
    fn test_function_head_toggle() {
        let mut engine = OrderingEngine::from_grammar(Grammar::default());
        engine.set_function_head(true);
        let report = engine.analyze(EXAMPLE, None).unwrap();
        assert!(report.sentences[0].conllu.contains("lifted_case"));
    }

    #[test]
    fn test_randomized_seeds() {
        let grammar = Grammar::new(
            WeightMap::uniform(ordo_protocol::relation::RELATIONS, 0.0).unwrap(),
            WeightMap::new(),
        );
        let mut engine = OrderingEngine::from_grammar(grammar);
        engine.set_randomized(true);
        let a = engine.analyze(EXAMPLE, Some(42)).unwrap();
        let b = engine.analyze(EXAMPLE, Some(42)).unwrap();
        assert_eq!(a.sentences[0].text, b.sentences[0].text);
        assert!((0..20).any(|_| engine.analyze(EXAMPLE, None).unwrap().sentences[0].text != a.sentences[0].text));
    }

    #[test]
    fn test_loads_archive_and_json() {
        let grammar = Grammar::new(WeightMap::from_entries([("obj", -0.2)]).unwrap(), WeightMap::new());
        let bytes = grammar.to_bytes().unwrap();
        assert_eq!(OrderingEngine::from_archive(&bytes).unwrap().grammar(), &grammar);

        let engine = OrderingEngine::parse_json(r#"{"head_placement": {"obj": -0.2}}"#).unwrap();
        assert_eq!(engine.grammar(), &grammar);
        assert!(matches!(OrderingEngine::parse_json("{"), Err(EngineError::Json(_))));
        assert!(matches!(OrderingEngine::from_archive(&[0]), Err(EngineError::Configuration(_))));
    }
}
