//! The entry point of the reasoning core.
//!
//! A [`Solver`] combines a [`Translator`], a [`SatBackend`], and a [`HolOracle`] into a solving
//! pipeline: a formula is translated to CNF and solved; when it is unsatisfiable, the core of the
//! refutation is minimised according to the [`SolverOptions`]. Formulas with higher-order
//! quantification are solved by the refinement loop on top of this pipeline.
mod solution;

use std::marker::PhantomData;

use log::debug;
use log::info;
pub use solution::Solution;
pub use solution::UnsatCore;

use crate::basic_types::KestrelError;
use crate::basic_types::Phase;
use crate::hol::FirstOrderOutcome;
use crate::hol::FirstOrderPipeline;
use crate::hol::HolController;
use crate::hol::HolOracle;
use crate::hol::NoHigherOrder;
use crate::options::CoreMinimisation;
use crate::options::SolverOptions;
use crate::reporting::Reporter;
use crate::sat::SatBackend;
use crate::sat::SatOutcome;
use crate::statistics::should_log_statistics;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;
use crate::termination::TerminationCondition;
use crate::trace::ResolutionTrace;
use crate::translation::Logic;
use crate::translation::TranslationLog;
use crate::translation::Translator;
use crate::ucore::minimise_core;
use crate::ucore::NceStrategy;
use crate::ucore::RceStrategy;

/// Solves formulas of a [`Logic`].
///
/// Every call to [`Solver::solve`] is an independent session; the solver keeps no state between
/// sessions other than the state of its translator and back end.
#[derive(Debug)]
pub struct Solver<L, Tr, B, O> {
    translator: Tr,
    backend: B,
    oracle: O,
    options: SolverOptions,
    logic: PhantomData<fn() -> L>,
}

impl<L: Logic, Tr: Translator<L>, B: SatBackend> Solver<L, Tr, B, NoHigherOrder> {
    /// Create a solver for a logic without higher-order quantification.
    pub fn first_order(translator: Tr, backend: B, options: SolverOptions) -> Self {
        Solver::new(translator, backend, NoHigherOrder, options)
    }
}

impl<L: Logic, Tr: Translator<L>, B: SatBackend, O: HolOracle<L>> Solver<L, Tr, B, O> {
    pub fn new(translator: Tr, backend: B, oracle: O, options: SolverOptions) -> Self {
        Solver {
            translator,
            backend,
            oracle,
            options,
            logic: PhantomData,
        }
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Solve `formula` under `bounds`.
    ///
    /// When `termination` triggers before a conclusion is reached, [`Solution::Unknown`] is
    /// returned. Errors are reserved for failures: invalid configuration, translation failures,
    /// and traces which do not match their translation.
    pub fn solve(
        &mut self,
        formula: &L::Formula,
        bounds: &L::Bounds,
        reporter: &mut dyn Reporter<L>,
        termination: &mut impl TerminationCondition,
    ) -> Result<Solution<L>, KestrelError> {
        let is_higher_order = self.oracle.is_higher_order(formula);

        let mut pipeline = TranslateAndSolve {
            translator: &mut self.translator,
            backend: &mut self.backend,
            options: self.options,
        };
        let mut controller = HolController::<L, O, _>::new(&self.oracle, &mut pipeline);
        let result = controller.solve(formula, bounds, reporter, termination);

        if is_higher_order && should_log_statistics() {
            controller
                .statistics()
                .log(StatisticLogger::new(["higher", "order"]));
        }

        match result {
            Ok(FirstOrderOutcome::Satisfiable(instance)) => Ok(Solution::Satisfiable(instance)),
            Ok(FirstOrderOutcome::Unsatisfiable(core)) => Ok(Solution::Unsatisfiable(core)),
            Err(KestrelError::ResourceExhausted { phase }) => {
                info!("resources were exhausted during {phase}");
                Ok(Solution::Unknown)
            }
            Err(error) => Err(error),
        }
    }
}

/// Translates a first-order problem, solves it, and minimises the core when it is
/// unsatisfiable.
#[derive(Debug)]
struct TranslateAndSolve<'a, Tr, B> {
    translator: &'a mut Tr,
    backend: &'a mut B,
    options: SolverOptions,
}

impl<Tr, B: SatBackend> TranslateAndSolve<'_, Tr, B> {
    fn minimise<L: Logic>(
        &mut self,
        trace: ResolutionTrace,
        log: &TranslationLog<L>,
        termination: &mut impl TerminationCondition,
    ) -> Result<ResolutionTrace, KestrelError> {
        match self.options.core_minimisation {
            CoreMinimisation::Rce => {
                let mut strategy = RceStrategy::new(log, self.options.resolution_distance);
                minimise_core(trace, &mut strategy, &mut *self.backend, termination)
            }
            CoreMinimisation::Nce => {
                let mut strategy = NceStrategy::new(log);
                minimise_core(trace, &mut strategy, &mut *self.backend, termination)
            }
            CoreMinimisation::None => Ok(trace),
        }
    }
}

impl<L: Logic, Tr: Translator<L>, B: SatBackend> FirstOrderPipeline<L>
    for TranslateAndSolve<'_, Tr, B>
{
    fn solve_first_order(
        &mut self,
        formula: &L::Formula,
        bounds: &L::Bounds,
        minimise: bool,
        reporter: &mut dyn Reporter<L>,
        termination: &mut impl TerminationCondition,
    ) -> Result<FirstOrderOutcome<L>, KestrelError> {
        if termination.should_stop() {
            return Err(KestrelError::ResourceExhausted {
                phase: Phase::Solving,
            });
        }

        let translation = self.translator.translate(formula, bounds, reporter)?;
        let cnf = translation.cnf();

        reporter.solving_cnf(
            translation.log().num_primary_variables(),
            cnf.num_variables(),
            cnf.num_clauses(),
        );

        match self.backend.solve(cnf, termination)? {
            SatOutcome::Satisfiable(assignment) => Ok(FirstOrderOutcome::Satisfiable(
                self.translator.interpret(&translation, &assignment),
            )),
            SatOutcome::Unsatisfiable(trace) => {
                debug!(
                    "refuted {} clauses with a core of {} axioms",
                    cnf.num_clauses(),
                    trace.core().len()
                );

                let trace = if minimise {
                    self.minimise(trace, translation.log(), termination)?
                } else {
                    trace
                };
                Ok(FirstOrderOutcome::Unsatisfiable(UnsatCore::new(
                    trace,
                    translation.log(),
                )?))
            }
        }
    }
}
