use nalgebra::DVector;
use plumbline_core::BoundObjective;

use crate::optimization::{Config, Error, LineSearch};

use super::interval::reduce;

/// The golden ratio: φ = (1 + √5) / 2
const PHI: f64 = 1.618_033_988_749_895;

/// The inverse golden ratio: 1/φ = (√5 − 1) / 2
///
/// This equals φ - 1 due to the golden ratio's unique property.
pub(super) const INV_PHI: f64 = PHI - 1.0;

/// Golden section search on the advance-and-retreat bracket.
pub(super) fn search(
    objective: &BoundObjective,
    config: &Config,
    x: &DVector<f64>,
    p: &DVector<f64>,
) -> Result<DVector<f64>, Error> {
    reduce(objective, config, x, p, LineSearch::GoldenSection, INV_PHI, |rate| rate)
}
