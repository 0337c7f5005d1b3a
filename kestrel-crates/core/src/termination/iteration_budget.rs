use super::TerminationCondition;
use crate::basic_types::ConfigurationError;

/// A [`TerminationCondition`] which triggers once a number of iterations have been made.
///
/// Higher-order formulas without a finite refinement fixpoint never terminate on their own; an
/// iteration budget bounds the number of candidates which are tried.
#[derive(Debug, Copy, Clone)]
pub struct IterationBudget {
    budget: u64,
    num_iterations: u64,
}

impl IterationBudget {
    pub fn new(budget: u64) -> Result<Self, ConfigurationError> {
        if budget == 0 {
            return Err(ConfigurationError::ZeroIterationBudget);
        }

        Ok(Self {
            budget,
            num_iterations: 0,
        })
    }
}

impl TerminationCondition for IterationBudget {
    fn should_stop(&mut self) -> bool {
        self.num_iterations >= self.budget
    }

    fn iteration_has_been_made(&mut self) {
        self.num_iterations += 1;
    }
}
