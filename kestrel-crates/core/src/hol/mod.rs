//! Solving formulas with higher-order quantification.
//!
//! A single SAT call cannot decide a formula which quantifies over relations. Such formulas are
//! solved by a counterexample guided refinement loop: a first-order candidate problem is solved,
//! every candidate is checked against the full semantics of the formula, and refuted candidates
//! are excluded by strengthening the candidate problem (or by splitting the formula into cases).
//! The [`HolOracle`] supplies these semantics; the loop itself is driven by the
//! [`HolController`].
mod controller;

use std::fmt::Debug;
use std::fmt::Formatter;

pub(crate) use controller::HolController;
pub use controller::HolStatistics;

use crate::api::UnsatCore;
use crate::basic_types::KestrelError;
use crate::basic_types::TranslationFailure;
use crate::reporting::Reporter;
use crate::termination::TerminationCondition;
use crate::translation::Logic;

/// The higher-order semantics of a [`Logic`].
pub trait HolOracle<L: Logic> {
    /// Whether `formula` contains higher-order quantification. First-order formulas are solved
    /// with a single SAT call.
    fn is_higher_order(&self, formula: &L::Formula) -> bool;

    /// The first-order problem whose solutions are the candidate instances of `formula`, given
    /// the increments returned by [`HolOracle::refine`] so far.
    fn candidate_problem(
        &self,
        formula: &L::Formula,
        bounds: &L::Bounds,
        increments: &[L::Formula],
    ) -> Result<(L::Formula, L::Bounds), TranslationFailure>;

    /// The first-order problem which is unsatisfiable exactly when `candidate` is an instance of
    /// `formula`. A solution to it is a counterexample to the candidate.
    fn verification_problem(
        &self,
        formula: &L::Formula,
        bounds: &L::Bounds,
        candidate: &L::Instance,
    ) -> Result<(L::Formula, L::Bounds), TranslationFailure>;

    /// Decide how to exclude `candidate`, which was refuted by `counterexample`.
    fn refine(
        &self,
        formula: &L::Formula,
        bounds: &L::Bounds,
        candidate: &L::Instance,
        counterexample: &L::Instance,
    ) -> Result<Refinement<L>, TranslationFailure>;
}

/// How a refuted candidate is excluded.
pub enum Refinement<L: Logic> {
    /// Strengthen the candidate problem with the formula, and search for the next candidate.
    Increment(L::Formula),
    /// Solve each of the choices as a session of its own; the formula is satisfiable when one of
    /// them is.
    Split(Vec<SplitChoice<L>>),
}

impl<L: Logic> Debug for Refinement<L> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Refinement::Increment(increment) => {
                f.debug_tuple("Increment").field(increment).finish()
            }
            Refinement::Split(choices) => f.debug_tuple("Split").field(choices).finish(),
        }
    }
}

/// One case of a [`Refinement::Split`].
pub struct SplitChoice<L: Logic> {
    pub formula: L::Formula,
    pub bounds: L::Bounds,
}

impl<L: Logic> Debug for SplitChoice<L> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SplitChoice")
            .field("formula", &self.formula)
            .field("bounds", &self.bounds)
            .finish()
    }
}

/// The oracle of a [`Logic`] without higher-order quantification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHigherOrder;

impl<L: Logic> HolOracle<L> for NoHigherOrder {
    fn is_higher_order(&self, _formula: &L::Formula) -> bool {
        false
    }

    fn candidate_problem(
        &self,
        _formula: &L::Formula,
        _bounds: &L::Bounds,
        _increments: &[L::Formula],
    ) -> Result<(L::Formula, L::Bounds), TranslationFailure> {
        Err(TranslationFailure::new(
            "the formula has no higher-order quantification",
        ))
    }

    fn verification_problem(
        &self,
        _formula: &L::Formula,
        _bounds: &L::Bounds,
        _candidate: &L::Instance,
    ) -> Result<(L::Formula, L::Bounds), TranslationFailure> {
        Err(TranslationFailure::new(
            "the formula has no higher-order quantification",
        ))
    }

    fn refine(
        &self,
        _formula: &L::Formula,
        _bounds: &L::Bounds,
        _candidate: &L::Instance,
        _counterexample: &L::Instance,
    ) -> Result<Refinement<L>, TranslationFailure> {
        Err(TranslationFailure::new(
            "the formula has no higher-order quantification",
        ))
    }
}

/// The outcome of solving a first-order problem.
pub(crate) enum FirstOrderOutcome<L: Logic> {
    Satisfiable(L::Instance),
    Unsatisfiable(UnsatCore<L>),
}

impl<L: Logic> Debug for FirstOrderOutcome<L> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FirstOrderOutcome::Satisfiable(instance) => {
                f.debug_tuple("Satisfiable").field(instance).finish()
            }
            FirstOrderOutcome::Unsatisfiable(core) => {
                f.debug_tuple("Unsatisfiable").field(core).finish()
            }
        }
    }
}

/// Translates and solves first-order problems; the building block of the refinement loop.
pub(crate) trait FirstOrderPipeline<L: Logic> {
    /// Solve `formula`. The core of a refutation is only minimised when `minimise` is set; the
    /// core is returned as found otherwise.
    fn solve_first_order(
        &mut self,
        formula: &L::Formula,
        bounds: &L::Bounds,
        minimise: bool,
        reporter: &mut dyn Reporter<L>,
        termination: &mut impl TerminationCondition,
    ) -> Result<FirstOrderOutcome<L>, KestrelError>;
}
