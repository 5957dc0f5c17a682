use rand::Rng;

use ordo_protocol::relation::coarse;
use ordo_protocol::{Token, WeightMap, FALLBACK_WEIGHT};

/// Where a dependent lands relative to its head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

/// How head-placement weights become sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OrderingMode {
    /// Non-negative weight goes right, negative goes left.
    #[default]
    Deterministic,
    /// Right with probability `logistic(weight)`.
    Randomized,
}

pub fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Side of `token` relative to its head, from the head-placement weight of
/// its coarse relation. Unknown relations use the neutral fallback weight.
///
/// Draws from `rng` only in [`OrderingMode::Randomized`].
pub fn resolve_side<R: Rng + ?Sized>(
    token: &Token,
    head_placement: &WeightMap,
    mode: OrderingMode,
    rng: &mut R,
) -> Side {
    let weight = head_placement.get_or_default(coarse(&token.relation), FALLBACK_WEIGHT);
    side_for_weight(weight, mode, rng)
}

pub fn side_for_weight<R: Rng + ?Sized>(weight: f64, mode: OrderingMode, rng: &mut R) -> Side {
    let right = match mode {
        OrderingMode::Deterministic => weight >= 0.0,
        OrderingMode::Randomized => rng.gen::<f64>() < logistic(weight),
    };
    if right {
        Side::Right
    } else {
        Side::Left
    }
}
