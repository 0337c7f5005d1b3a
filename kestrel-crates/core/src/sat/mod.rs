//! The contract with SAT back ends.
//!
//! A [`SatBackend`] decides a [`Cnf`]. When the CNF is unsatisfiable it has to return a
//! [`ResolutionTrace`] whose axioms are the clauses of the CNF, in the order in which they were
//! given; this is what allows the core reduction to relate the trace to the translation.
mod resolution_prover;

pub use resolution_prover::ResolutionProver;

use crate::basic_types::Assignment;
use crate::basic_types::KestrelError;
use crate::termination::TerminationCondition;
use crate::trace::ResolutionTrace;
use crate::translation::Cnf;

/// The outcome of a SAT call.
#[derive(Clone, Debug)]
pub enum SatOutcome {
    Satisfiable(Assignment),
    Unsatisfiable(ResolutionTrace),
}

/// A SAT solver which produces resolution traces for unsatisfiable problems.
pub trait SatBackend {
    /// Decide `cnf`. The back end polls `termination` and returns
    /// [`KestrelError::ResourceExhausted`] when it triggers.
    fn solve(
        &mut self,
        cnf: &Cnf,
        termination: &mut impl TerminationCondition,
    ) -> Result<SatOutcome, KestrelError>;
}
