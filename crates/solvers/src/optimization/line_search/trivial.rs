use nalgebra::DVector;

use crate::optimization::Config;

/// Steps `trivial_step` along the raw, unnormalized direction.
pub(super) fn search(config: &Config, x: &DVector<f64>, p: &DVector<f64>) -> DVector<f64> {
    super::along(x, p, config.trivial_step())
}
