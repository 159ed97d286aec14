use super::Sample;

/// Event emitted by the integrator after each accepted step.
#[derive(Debug, Clone)]
pub struct Event<'a> {
    /// Steps taken during this solve, starting at 1.
    pub step: usize,

    /// The sample just appended to the history.
    pub sample: &'a Sample,
}
