/// Indicates how the integrator terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Reached the requested end time.
    Complete,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// Summary of one call to [`Ivp::solve`](super::Ivp::solve).
///
/// The samples themselves live in the integrator's [`History`](super::History).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// How the integrator terminated.
    pub status: Status,

    /// Number of samples appended by this call.
    pub steps: usize,

    /// Time of the last recorded sample.
    pub time: f64,
}
