use rand::Rng;

use ordo_protocol::relation::RELATIONS;
use ordo_protocol::{ConfigurationError, Grammar, WeightMap, MAX_WEIGHT};

/// Default half-width of the sampling interval.
pub const SAMPLE_SPREAD: f64 = 0.5;

/// Stands in for a relation name when the spread itself is rejected.
const SPREAD_LABEL: &str = "*";

/// Draws a grammar with a weight in `[-spread, spread)` for every known
/// relation, in both maps.
///
/// `spread` must lie in `(0, MAX_WEIGHT]`.
pub fn sample_grammar<R: Rng + ?Sized>(
    rng: &mut R,
    spread: f64,
) -> Result<Grammar, ConfigurationError> {
    if !spread.is_finite() {
        return Err(ConfigurationError::NotFinite {
            relation: SPREAD_LABEL.to_string(),
        });
    }
    if spread <= 0.0 || spread > MAX_WEIGHT {
        return Err(ConfigurationError::OutOfRange {
            relation: SPREAD_LABEL.to_string(),
            weight: spread,
            min: 0.0,
            max: MAX_WEIGHT,
        });
    }
    let mut draw = || -> Result<WeightMap, ConfigurationError> {
        WeightMap::from_entries(
            RELATIONS
                .iter()
                .map(|relation| (*relation, rng.gen_range(-spread..spread)))
                .collect::<Vec<_>>(),
        )
    };
    let head_placement = draw()?;
    let distance = draw()?;
    tracing::debug!(relations = RELATIONS.len(), spread, "sampled grammar");
    Ok(Grammar::new(head_placement, distance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_covers_every_relation() {
        let grammar = sample_grammar(&mut StdRng::seed_from_u64(3), SAMPLE_SPREAD).unwrap();
        assert_eq!(grammar.head_placement.len(), RELATIONS.len());
        assert_eq!(grammar.distance.len(), RELATIONS.len());
        for (_, weight) in grammar.head_placement.iter().chain(grammar.distance.iter()) {
            assert!((-SAMPLE_SPREAD..SAMPLE_SPREAD).contains(&weight));
        }
    }

    #[test]
    fn test_seeded_sampling_repeats() {
        let a = sample_grammar(&mut StdRng::seed_from_u64(11), SAMPLE_SPREAD).unwrap();
        let b = sample_grammar(&mut StdRng::seed_from_u64(11), SAMPLE_SPREAD).unwrap();
        let c = sample_grammar(&mut StdRng::seed_from_u64(12), SAMPLE_SPREAD).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_rejects_bad_spread() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            sample_grammar(&mut rng, 3.0),
            Err(ConfigurationError::OutOfRange { .. })
        ));
        assert!(sample_grammar(&mut rng, f64::NAN).is_err());
        assert!(sample_grammar(&mut rng, 0.0).is_err());
    }
}
