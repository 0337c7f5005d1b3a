//! Unsatisfiable core extraction.
//!
//! A [`ReductionStrategy`] proposes ever smaller subsets of the clauses of a resolution trace to
//! re-solve. [`minimise_core`] drives a strategy: whenever a proposed subset is still
//! unsatisfiable, the trace of the reduced problem replaces the current trace, and the strategy
//! continues from there. The strategies in this module work on the top-level conjuncts (roots) of
//! the translated formula, so the resulting core is minimal in terms of roots.
mod minimise;
mod nce;
mod rce;
pub mod strategy_utils;

pub use minimise::minimise_core;
pub use nce::NceStrategy;
pub use rce::RceStrategy;

use crate::basic_types::ContractViolation;
use crate::trace::ClauseSet;
use crate::trace::ResolutionTrace;

/// A strategy for reducing the unsatisfiable core of a [`ResolutionTrace`].
pub trait ReductionStrategy {
    /// Propose the next candidate: a non-empty subset of the clauses of `trace` which should be
    /// re-solved. The subset never contains the terminal clause of `trace`.
    ///
    /// An empty set signals that the strategy is exhausted; every later call then also returns
    /// the empty set, without side effects.
    fn next(&mut self, trace: &ResolutionTrace) -> Result<ClauseSet, ContractViolation>;
}
