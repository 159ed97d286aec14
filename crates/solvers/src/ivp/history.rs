use nalgebra::DVector;
use thiserror::Error;

/// Largest allowed deviation between an existing sample gap and the step.
fn spacing_tolerance() -> f64 {
    f64::from(f32::EPSILON).sqrt()
}

/// A recorded state and the time it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// State vector `u`.
    pub state: DVector<f64>,

    /// Time `t` of the state.
    pub time: f64,
}

impl Sample {
    /// Pairs a state with its time.
    #[must_use]
    pub fn new(state: DVector<f64>, time: f64) -> Self {
        Self { state, time }
    }
}

/// Problems with a history or with a query against it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HistoryError {
    #[error("the history is empty")]
    Empty,

    #[error("step must be positive and finite, got {0}")]
    NonPositiveStep(f64),

    #[error("gap of {gap} before sample {index} does not match step {step}")]
    Spacing { index: usize, gap: f64, step: f64 },

    #[error("time {time} is outside the recorded span [{start}, {end}]")]
    OutOfSpan { time: f64, start: f64, end: f64 },

    #[error("the scheme needs {needed} samples but the history holds {available}")]
    TooShort { needed: usize, available: usize },

    #[error("sample {index} has dimension {found}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
}

/// Ordered `(state, time)` samples of an integrated trajectory.
///
/// Samples only grow at the end. Times are expected to increase by a
/// constant step, which [`check_spacing`](History::check_spacing) verifies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    samples: Vec<Sample>,
}

impl History {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the samples, oldest first.
    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Returns the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if no sample is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the oldest sample.
    #[must_use]
    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    /// Returns the newest sample.
    #[must_use]
    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Returns the sample `back` positions before the end, where `back = 1`
    /// is the most recent one.
    pub(super) fn from_end(&self, back: usize) -> Option<&Sample> {
        self.samples.len().checked_sub(back).and_then(|i| self.samples.get(i))
    }

    pub(super) fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    /// Checks that the history can be stepped with `step`.
    ///
    /// The history must be non-empty with states of one dimension, and every
    /// gap between consecutive samples must equal `step` to within
    /// `sqrt(f32::EPSILON)`.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn check_spacing(&self, step: f64) -> Result<(), HistoryError> {
        if !(step > 0.0 && step.is_finite()) {
            return Err(HistoryError::NonPositiveStep(step));
        }

        let first = self.samples.first().ok_or(HistoryError::Empty)?;
        let expected = first.state.len();

        for (index, pair) in self.samples.windows(2).enumerate() {
            let found = pair[1].state.len();
            if found != expected {
                return Err(HistoryError::DimensionMismatch {
                    index: index + 1,
                    expected,
                    found,
                });
            }

            let gap = pair[1].time - pair[0].time;
            if (gap - step).abs() > spacing_tolerance() {
                return Err(HistoryError::Spacing {
                    index: index + 1,
                    gap,
                    step,
                });
            }
        }

        Ok(())
    }

    /// Checks that at least `needed` samples are recorded.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::TooShort`] otherwise.
    pub fn check_depth(&self, needed: usize) -> Result<(), HistoryError> {
        if self.samples.len() < needed {
            return Err(HistoryError::TooShort {
                needed,
                available: self.samples.len(),
            });
        }
        Ok(())
    }

    /// Interpolates the state at `time`.
    ///
    /// Between two samples `l` and `r` the result is `w·l + (1 − w)·r` with
    /// `w = (r.time − time) / (r.time − l.time)`. A recorded time returns
    /// its recorded state.
    ///
    /// # Errors
    ///
    /// Returns an error if the history is empty or `time` lies outside the
    /// recorded span.
    pub fn value_at(&self, time: f64) -> Result<DVector<f64>, HistoryError> {
        let (first, last) = match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(HistoryError::Empty),
        };

        if !(first.time <= time && time <= last.time) {
            return Err(HistoryError::OutOfSpan {
                time,
                start: first.time,
                end: last.time,
            });
        }

        // First sample at or after `time`; the span check guarantees one.
        let right = self.samples.partition_point(|sample| sample.time < time);
        let r = &self.samples[right];
        if r.time == time || right == 0 {
            return Ok(r.state.clone());
        }

        let l = &self.samples[right - 1];
        let w = (r.time - time) / (r.time - l.time);
        Ok(&l.state * w + &r.state * (1.0 - w))
    }
}

impl FromIterator<Sample> for History {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<(DVector<f64>, f64)> for History {
    fn from_iter<I: IntoIterator<Item = (DVector<f64>, f64)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(state, time)| Sample::new(state, time))
            .collect()
    }
}

impl From<Vec<(DVector<f64>, f64)>> for History {
    fn from(samples: Vec<(DVector<f64>, f64)>) -> Self {
        samples.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn scalar(value: f64) -> DVector<f64> {
        DVector::from_element(1, value)
    }

    fn evenly_spaced() -> History {
        History::from(vec![(scalar(1.0), 0.0), (scalar(3.0), 0.5), (scalar(2.0), 1.0)])
    }

    #[test]
    fn recorded_times_return_recorded_states() {
        let history = evenly_spaced();

        for sample in history.samples() {
            assert_eq!(history.value_at(sample.time).unwrap(), sample.state);
        }
    }

    #[test]
    fn interpolates_linearly_between_neighbours() {
        let history = evenly_spaced();

        assert_relative_eq!(history.value_at(0.25).unwrap()[0], 2.0);
        assert_relative_eq!(history.value_at(0.9).unwrap()[0], 2.2, epsilon = 1e-12);
    }

    #[test]
    fn queries_outside_the_span_are_rejected() {
        let history = evenly_spaced();

        assert_eq!(
            history.value_at(1.5),
            Err(HistoryError::OutOfSpan {
                time: 1.5,
                start: 0.0,
                end: 1.0
            })
        );
        assert!(matches!(
            history.value_at(-0.1),
            Err(HistoryError::OutOfSpan { .. })
        ));
        assert!(matches!(
            history.value_at(f64::NAN),
            Err(HistoryError::OutOfSpan { .. })
        ));
        assert_eq!(History::new().value_at(0.0), Err(HistoryError::Empty));
    }

    #[test]
    fn spacing_must_match_the_step() {
        let history = evenly_spaced();

        assert_eq!(history.check_spacing(0.5), Ok(()));
        assert_eq!(history.check_spacing(0.5 + 1e-5), Ok(()));
        assert_eq!(
            history.check_spacing(0.25),
            Err(HistoryError::Spacing {
                index: 1,
                gap: 0.5,
                step: 0.25
            })
        );
        assert_eq!(
            history.check_spacing(0.0),
            Err(HistoryError::NonPositiveStep(0.0))
        );
        assert_eq!(History::new().check_spacing(0.5), Err(HistoryError::Empty));
    }

    #[test]
    fn single_sample_has_no_gaps_to_check() {
        let history = History::from(vec![(scalar(1.0), 2.0)]);

        assert_eq!(history.check_spacing(0.1), Ok(()));
        assert_eq!(history.value_at(2.0).unwrap(), scalar(1.0));
    }

    #[test]
    fn mixed_dimensions_are_rejected() {
        let history = History::from(vec![(scalar(1.0), 0.0), (DVector::zeros(2), 0.5)]);

        assert_eq!(
            history.check_spacing(0.5),
            Err(HistoryError::DimensionMismatch {
                index: 1,
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn depth_counts_samples() {
        let history = evenly_spaced();

        assert_eq!(history.check_depth(3), Ok(()));
        assert_eq!(
            history.check_depth(4),
            Err(HistoryError::TooShort {
                needed: 4,
                available: 3
            })
        );
        assert_eq!(history.from_end(1).unwrap().time, 1.0);
        assert_eq!(history.from_end(3).unwrap().time, 0.0);
        assert!(history.from_end(4).is_none());
    }
}
