use std::fmt;

use nalgebra::{DMatrix, DVector};
use plumbline_core::Objective;

use crate::optimization::{self, Optimizer};

use super::{RhsFn, Sample, SchemeError};

/// Named Runge–Kutta presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub enum RungeKuttaMethod {
    HeunThirdOrder,
    ClassicalFourthOrder,
}

impl fmt::Display for RungeKuttaMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::HeunThirdOrder => "Heun's third-order method",
            Self::ClassicalFourthOrder => "classical fourth-order Runge–Kutta",
        })
    }
}

/// Butcher tableau of an `s`-stage Runge–Kutta method.
///
/// Stage derivatives satisfy `K_i = f(v + k·Σ_j a(i, j)·K_j, t + c_i·k)` and
/// the step is `y = v + k·Σ_i b_i·K_i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    a: DMatrix<f64>,
    b: DVector<f64>,
    c: DVector<f64>,
}

impl Tableau {
    /// Creates a tableau from its coefficients.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no stages, the shapes disagree, or a
    /// coefficient is not finite.
    pub fn new(a: DMatrix<f64>, b: DVector<f64>, c: DVector<f64>) -> Result<Self, SchemeError> {
        let stages = b.len();
        if stages == 0 {
            return Err(SchemeError::NoStages);
        }
        if a.shape() != (stages, stages) {
            return Err(SchemeError::MatrixShape {
                stages,
                rows: a.nrows(),
                cols: a.ncols(),
            });
        }
        if c.len() != stages {
            return Err(SchemeError::NodeCount {
                stages,
                found: c.len(),
            });
        }
        if a.iter().chain(b.iter()).chain(c.iter()).any(|x| !x.is_finite()) {
            return Err(SchemeError::NonFinite);
        }
        Ok(Self { a, b, c })
    }

    /// Returns the stage coupling matrix.
    #[must_use]
    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    /// Returns the stage weights.
    #[must_use]
    pub fn b(&self) -> &DVector<f64> {
        &self.b
    }

    /// Returns the stage nodes as fractions of the step.
    #[must_use]
    pub fn c(&self) -> &DVector<f64> {
        &self.c
    }

    #[must_use]
    pub fn stages(&self) -> usize {
        self.b.len()
    }

    /// Returns `true` if every stage depends only on earlier stages.
    #[must_use]
    pub fn is_explicit(&self) -> bool {
        let s = self.stages();
        let strictly_lower = (0..s).all(|i| (i..s).all(|j| self.a[(i, j)] == 0.0));
        strictly_lower && self.c[0] == 0.0
    }

    /// Computes the state following `last`.
    pub(super) fn step(
        &self,
        rhs: &RhsFn,
        last: &Sample,
        k: f64,
        optimizer: &Optimizer,
    ) -> Result<DVector<f64>, optimization::Error> {
        if self.is_explicit() {
            return Ok(self.explicit_step(rhs, last, k));
        }

        // Unknown is [K_1, …, K_s, y], seeded with zero stages and y = v.
        let m = last.state.len();
        let s = self.stages();
        let mut seed = DVector::zeros((s + 1) * m);
        seed.rows_mut(s * m, m).copy_from(&last.state);

        let tableau = self.clone();
        let rhs = RhsFn::clone(rhs);
        let v = last.state.clone();
        let t = last.time;
        let residual = Objective::new(move |u: &DVector<f64>| tableau.residual(&rhs, &v, t, k, u));

        let mut optimizer = optimizer.clone();
        optimizer.set_function(residual);
        let solution = optimizer.solve(&seed)?;
        Ok(solution.x.rows(s * m, m).into_owned())
    }

    /// Forward substitution through the stages.
    fn explicit_step(&self, rhs: &RhsFn, last: &Sample, k: f64) -> DVector<f64> {
        let s = self.stages();
        let mut stages: Vec<DVector<f64>> = Vec::with_capacity(s);

        for i in 0..s {
            let mut y = last.state.clone();
            for (j, stage) in stages.iter().enumerate() {
                y += stage * (k * self.a[(i, j)]);
            }
            stages.push(rhs(&y, last.time + self.c[i] * k));
        }

        let mut next = last.state.clone();
        for (stage, b) in stages.iter().zip(self.b.iter()) {
            next += stage * (k * b);
        }
        next
    }

    /// Squared residual of the stacked unknown `u = [K_1, …, K_s, y]`:
    ///
    /// ```text
    /// ‖y − v − k·Σ b_i·K_i‖² + Σ_i ‖f(v + k·Σ_j a(i, j)·K_j, t + c_i·k) − K_i‖²
    /// ```
    fn residual(&self, rhs: &RhsFn, v: &DVector<f64>, t: f64, k: f64, u: &DVector<f64>) -> f64 {
        let m = v.len();
        let s = self.stages();
        let stage = |i: usize| u.rows(i * m, m);

        let mut y = u.rows(s * m, m) - v;
        for i in 0..s {
            y -= stage(i) * (k * self.b[i]);
        }
        let mut error = y.norm_squared();

        for i in 0..s {
            let mut point = v.clone();
            for j in 0..s {
                point += stage(j) * (k * self.a[(i, j)]);
            }
            let mismatch = rhs(&point, t + self.c[i] * k) - stage(i);
            error += mismatch.norm_squared();
        }
        error
    }
}

impl From<RungeKuttaMethod> for Tableau {
    fn from(method: RungeKuttaMethod) -> Self {
        match method {
            RungeKuttaMethod::HeunThirdOrder => Self {
                a: DMatrix::from_row_slice(
                    3,
                    3,
                    &[
                        0.0, 0.0, 0.0, //
                        1.0 / 3.0, 0.0, 0.0, //
                        0.0, 2.0 / 3.0, 0.0,
                    ],
                ),
                b: DVector::from_vec(vec![0.25, 0.0, 0.75]),
                c: DVector::from_vec(vec![0.0, 1.0 / 3.0, 2.0 / 3.0]),
            },
            RungeKuttaMethod::ClassicalFourthOrder => Self {
                a: DMatrix::from_row_slice(
                    4,
                    4,
                    &[
                        0.0, 0.0, 0.0, 0.0, //
                        0.5, 0.0, 0.0, 0.0, //
                        0.0, 0.5, 0.0, 0.0, //
                        0.0, 0.0, 1.0, 0.0,
                    ],
                ),
                b: DVector::from_vec(vec![1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0]),
                c: DVector::from_vec(vec![0.0, 0.5, 0.5, 1.0]),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::rc::Rc;

    use approx::assert_relative_eq;

    fn implicit_midpoint() -> Tableau {
        Tableau::new(
            DMatrix::from_element(1, 1, 0.5),
            DVector::from_element(1, 1.0),
            DVector::from_element(1, 0.5),
        )
        .unwrap()
    }

    #[test]
    fn presets_are_explicit() {
        for preset in [RungeKuttaMethod::HeunThirdOrder, RungeKuttaMethod::ClassicalFourthOrder] {
            let tableau = Tableau::from(preset);
            assert!(tableau.is_explicit(), "{preset}");
            assert_relative_eq!(tableau.b().sum(), 1.0, epsilon = 1e-15);
        }
        assert!(!implicit_midpoint().is_explicit());
    }

    #[test]
    fn mismatched_shapes_are_rejected() {
        let b = DVector::from_element(2, 0.5);
        let c = DVector::from_vec(vec![0.0, 1.0]);

        assert_eq!(
            Tableau::new(DMatrix::zeros(2, 3), b.clone(), c.clone()),
            Err(SchemeError::MatrixShape {
                stages: 2,
                rows: 2,
                cols: 3
            })
        );
        assert_eq!(
            Tableau::new(DMatrix::zeros(2, 2), b, DVector::zeros(1)),
            Err(SchemeError::NodeCount { stages: 2, found: 1 })
        );
        assert_eq!(
            Tableau::new(DMatrix::zeros(0, 0), DVector::zeros(0), DVector::zeros(0)),
            Err(SchemeError::NoStages)
        );
        assert!(Tableau::new(DMatrix::zeros(2, 2), DVector::from_element(2, 0.5), c).is_ok());
    }

    #[test]
    fn classical_step_matches_the_taylor_series_for_exponential_growth() {
        // u' = u from u = 1: one RK4 step is 1 + k + k²/2 + k³/6 + k⁴/24.
        let rhs: RhsFn = Rc::new(|u: &DVector<f64>, _t: f64| u.clone());
        let last = Sample::new(DVector::from_element(1, 1.0), 0.0);
        let k = 0.1;

        let next = Tableau::from(RungeKuttaMethod::ClassicalFourthOrder)
            .step(&rhs, &last, k, &Optimizer::new())
            .unwrap();

        let taylor = 1.0 + k + k.powi(2) / 2.0 + k.powi(3) / 6.0 + k.powi(4) / 24.0;
        assert_relative_eq!(next[0], taylor, epsilon = 1e-14);
    }

    #[test]
    fn residual_vanishes_at_the_exact_stages() {
        // u' = −u with the implicit midpoint rule: K = −v / (1 + k/2).
        let rhs: RhsFn = Rc::new(|u: &DVector<f64>, _t: f64| -u);
        let v = DVector::from_element(1, 2.0);
        let k = 0.2;
        let stage = -2.0 / 1.1;
        let u = DVector::from_vec(vec![stage, 2.0 + k * stage]);

        let residual = implicit_midpoint().residual(&rhs, &v, 0.0, k, &u);

        assert_relative_eq!(residual, 0.0, epsilon = 1e-28);
    }

    #[test]
    fn implicit_step_solves_the_stage_equations() {
        let rhs: RhsFn = Rc::new(|u: &DVector<f64>, _t: f64| -u);
        let last = Sample::new(DVector::from_element(1, 2.0), 0.0);

        let next = implicit_midpoint()
            .step(&rhs, &last, 0.2, &Optimizer::new())
            .unwrap();

        assert_relative_eq!(next[0], 2.0 * 0.9 / 1.1, epsilon = 1e-6);
    }
}
