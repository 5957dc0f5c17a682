use std::collections::BTreeSet;

use rkyv::{Archive, Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::relation;
use crate::weights::{WeightMap, FALLBACK_WEIGHT};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

pub const GRAMMAR_ARCHIVE_VERSION: u32 = 1;

/// A counterfactual word-order grammar: where dependents go relative to
/// their head, and how far out they go among their siblings.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct Grammar {
    /// Sign picks the side: negative before the head, otherwise after.
    #[cfg_attr(feature = "serde", serde(default))]
    pub head_placement: WeightMap,
    /// Among same-side siblings, a higher weight is placed farther out.
    #[cfg_attr(feature = "serde", serde(default))]
    pub distance: WeightMap,
}

impl Grammar {
    pub fn new(head_placement: WeightMap, distance: WeightMap) -> Self {
        Self {
            head_placement,
            distance,
        }
    }

    /// Head-placement weight for a relation, looked up by its coarse label.
    pub fn head_weight(&self, relation: &str) -> Option<f64> {
        self.head_placement.get(relation::coarse(relation))
    }

    /// Distance weight for a relation, falling back to the neutral weight.
    pub fn distance_weight(&self, relation: &str) -> f64 {
        self.distance
            .get_or_default(relation::coarse(relation), FALLBACK_WEIGHT)
    }

    /// Keys of either map outside the relation vocabulary. They are legal
    /// but usually a typo.
    pub fn unknown_relations(&self) -> BTreeSet<&str> {
        self.head_placement
            .iter()
            .chain(self.distance.iter())
            .map(|(label, _)| label)
            .filter(|label| !relation::is_known(label))
            .collect()
    }

    pub fn to_archive(&self) -> GrammarArchive {
        GrammarArchive {
            version: GRAMMAR_ARCHIVE_VERSION,
            head_placement: entries(&self.head_placement),
            distance: entries(&self.distance),
        }
    }

    /// Serializes the grammar into an aligned binary archive.
    pub fn to_bytes(&self) -> Result<rkyv::AlignedVec, ConfigurationError> {
        rkyv::to_bytes::<_, 256>(&self.to_archive()).map_err(|_| ConfigurationError::Serialization)
    }

    /// Validates and loads a binary archive produced by [`Grammar::to_bytes`].
    /// `bytes` need not be aligned.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigurationError> {
        let mut aligned = rkyv::AlignedVec::with_capacity(bytes.len());
        aligned.extend_from_slice(bytes);
        let archive: GrammarArchive =
            rkyv::from_bytes(&aligned).map_err(|_| ConfigurationError::CorruptArchive)?;
        Self::try_from(archive)
    }
}

fn entries(map: &WeightMap) -> Vec<(String, f64)> {
    map.iter().map(|(relation, weight)| (relation.to_string(), weight)).collect()
}

/// On-disk form of a [`Grammar`]. Weights are re-validated when loaded.
#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
#[archive(check_bytes)]
pub struct GrammarArchive {
    pub version: u32,
    pub head_placement: Vec<(String, f64)>,
    pub distance: Vec<(String, f64)>,
}

impl TryFrom<GrammarArchive> for Grammar {
    type Error = ConfigurationError;

    fn try_from(archive: GrammarArchive) -> Result<Self, Self::Error> {
        if archive.version != GRAMMAR_ARCHIVE_VERSION {
            return Err(ConfigurationError::UnsupportedVersion {
                found: archive.version,
                expected: GRAMMAR_ARCHIVE_VERSION,
            });
        }
        Ok(Self {
            head_placement: WeightMap::from_entries(archive.head_placement)?,
            distance: WeightMap::from_entries(archive.distance)?,
        })
    }
}
