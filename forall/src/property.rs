//! Property outcomes and the per-evaluation context.

use std::fmt;

use crate::error::FalsificationCause;

/// Return types accepted from a property body.
///
/// Implemented for `bool`, `()` (the body asserts and panics on failure) and
/// `Result<(), E>` for any displayable error.
pub trait PropertyOutcome {
    /// Convert the outcome into pass or a falsification cause
    fn into_result(self) -> Result<(), FalsificationCause>;
}

impl PropertyOutcome for bool {
    fn into_result(self) -> Result<(), FalsificationCause> {
        if self {
            Ok(())
        } else {
            Err(FalsificationCause::ReturnedFalse)
        }
    }
}

impl PropertyOutcome for () {
    fn into_result(self) -> Result<(), FalsificationCause> {
        Ok(())
    }
}

impl<E: fmt::Display> PropertyOutcome for Result<(), E> {
    fn into_result(self) -> Result<(), FalsificationCause> {
        self.map_err(|error| FalsificationCause::Failed(error.to_string()))
    }
}

/// Read-only view of the evaluation in progress, handed to context-aware
/// property bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyEvaluationContext {
    iteration: usize,
    total_iterations: usize,
    seed: u64,
    is_sample: bool,
}

impl PropertyEvaluationContext {
    pub(crate) fn new(iteration: usize, total_iterations: usize, seed: u64, is_sample: bool) -> Self {
        Self {
            iteration,
            total_iterations,
            seed,
            is_sample,
        }
    }

    /// 1-based index of the current evaluation
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Number of evaluations the run has planned
    pub fn total_iterations(&self) -> usize {
        self.total_iterations
    }

    /// Seed driving the random part of the run
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Whether the current arguments come from the sample set
    pub fn is_sample(&self) -> bool {
        self.is_sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_outcome() {
        assert_eq!(true.into_result(), Ok(()));
        assert_eq!(false.into_result(), Err(FalsificationCause::ReturnedFalse));
    }

    #[test]
    fn test_unit_outcome() {
        assert_eq!(().into_result(), Ok(()));
    }

    #[test]
    fn test_result_outcome() {
        let passed: Result<(), String> = Ok(());
        assert_eq!(passed.into_result(), Ok(()));

        let failed: Result<(), String> = Err("expected 3, got 4".to_string());
        assert_eq!(
            failed.into_result(),
            Err(FalsificationCause::Failed("expected 3, got 4".to_string()))
        );
    }

    #[test]
    fn test_context_accessors() {
        let context = PropertyEvaluationContext::new(3, 200, 99, true);
        assert_eq!(context.iteration(), 3);
        assert_eq!(context.total_iterations(), 200);
        assert_eq!(context.seed(), 99);
        assert!(context.is_sample());
    }
}
