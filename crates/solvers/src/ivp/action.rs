/// Control actions supported by the integrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop after the current step and keep the samples recorded so far.
    StopEarly,
}
