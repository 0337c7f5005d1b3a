//! A [`TerminationCondition`] is a condition which is polled at every phase boundary of a solving
//! session: before each SAT call, before each core reduction iteration, before each transition of
//! the higher-order loop, and at every branching node of the
//! [`ResolutionProver`](crate::sat::ResolutionProver). It indicates when the session should stop,
//! even if no definitive conclusion has been reached. The most common example would be
//! [`TimeBudget`], which gives the session a certain time budget to complete.

mod combinator;
mod iteration_budget;
mod time_budget;

pub use combinator::Combinator;
pub use iteration_budget::IterationBudget;
pub use time_budget::TimeBudget;

/// The central trait that defines a termination condition. A termination condition determines
/// when a session should give up.
pub trait TerminationCondition {
    /// Returns `true` when the session should stop, `false` otherwise.
    fn should_stop(&mut self) -> bool;

    /// Called whenever a core reduction or higher-order refinement iteration completes.
    fn iteration_has_been_made(&mut self) {}
}

impl<T: TerminationCondition> TerminationCondition for Option<T> {
    fn should_stop(&mut self) -> bool {
        match self {
            Some(t) => t.should_stop(),
            None => false,
        }
    }

    fn iteration_has_been_made(&mut self) {
        if let Some(t) = self {
            t.iteration_has_been_made()
        }
    }
}

/// A [`TerminationCondition`] which never triggers.
#[derive(Clone, Copy, Debug)]
pub struct Indefinite;

impl TerminationCondition for Indefinite {
    fn should_stop(&mut self) -> bool {
        false
    }
}
