use std::collections::BTreeMap;

use crate::error::ConfigurationError;
use crate::relation;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

pub const MIN_WEIGHT: f64 = -1.0;
pub const MAX_WEIGHT: f64 = 1.0;

/// Weight used for a relation the mapping does not mention.
pub const FALLBACK_WEIGHT: f64 = 0.0;

/// Relation label -> weight, every weight finite and inside
/// [`MIN_WEIGHT`, `MAX_WEIGHT`].
///
/// Validation happens on insert and on deserialization, so code holding a
/// `WeightMap` never sees NaN or out-of-range weights.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")
)]
pub struct WeightMap {
    weights: BTreeMap<String, f64>,
}

impl WeightMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, S>(entries: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut map = Self::new();
        for (relation, weight) in entries {
            map.insert(relation, weight)?;
        }
        Ok(map)
    }

    /// Every label of `labels` mapped to the same weight.
    pub fn uniform<'a, I>(labels: I, weight: f64) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self::from_entries(labels.into_iter().map(|label| (label, weight)))
    }

    /// Sets a weight, returning the one it replaced.
    pub fn insert(
        &mut self,
        relation: impl Into<String>,
        weight: f64,
    ) -> Result<Option<f64>, ConfigurationError> {
        let relation = relation.into();
        validate(&relation, weight)?;
        Ok(self.weights.insert(relation, weight))
    }

    pub fn remove(&mut self, relation: &str) -> Option<f64> {
        self.weights.remove(relation)
    }

    pub fn get(&self, relation: &str) -> Option<f64> {
        self.weights.get(relation).copied()
    }

    pub fn get_or_default(&self, relation: &str, default: f64) -> f64 {
        self.get(relation).unwrap_or(default)
    }

    pub fn contains(&self, relation: &str) -> bool {
        self.weights.contains_key(relation)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.weights.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

fn validate(relation: &str, weight: f64) -> Result<(), ConfigurationError> {
    if relation::coarse(relation) != relation {
        return Err(ConfigurationError::SubtypedRelation {
            relation: relation.to_string(),
        });
    }
    if !weight.is_finite() {
        return Err(ConfigurationError::NotFinite {
            relation: relation.to_string(),
        });
    }
    if !(MIN_WEIGHT..=MAX_WEIGHT).contains(&weight) {
        return Err(ConfigurationError::OutOfRange {
            relation: relation.to_string(),
            weight,
            min: MIN_WEIGHT,
            max: MAX_WEIGHT,
        });
    }
    Ok(())
}

impl TryFrom<BTreeMap<String, f64>> for WeightMap {
    type Error = ConfigurationError;

    fn try_from(weights: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        for (relation, weight) in &weights {
            validate(relation, *weight)?;
        }
        Ok(Self { weights })
    }
}

impl From<WeightMap> for BTreeMap<String, f64> {
    fn from(map: WeightMap) -> Self {
        map.weights
    }
}
