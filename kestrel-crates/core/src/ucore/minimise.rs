use log::debug;
use log::info;

use super::ReductionStrategy;
use crate::basic_types::KestrelError;
use crate::basic_types::Phase;
use crate::create_statistics_struct;
use crate::sat::SatBackend;
use crate::sat::SatOutcome;
use crate::statistics::should_log_statistics;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;
use crate::termination::TerminationCondition;
use crate::trace::ResolutionTrace;

create_statistics_struct!(
    /// The statistics of a single core reduction.
    ReductionStatistics {
        /// The number of candidates which were re-solved.
        num_candidates: u64,
        /// The number of candidates which were still unsatisfiable.
        num_unsatisfiable_candidates: u64,
        /// The number of axioms in the core before the reduction.
        initial_core_size: usize,
        /// The number of axioms in the core after the reduction.
        final_core_size: usize,
});

/// Reduce the core of `trace` with `strategy`.
///
/// Every candidate proposed by the strategy is re-solved with `backend`. A satisfiable candidate
/// is discarded; for an unsatisfiable candidate, the trace of the reduced problem is spliced into
/// the current trace and the reduction continues from the result. The reduction stops once the
/// strategy is exhausted, and the final trace is returned.
///
/// `termination` is polled before every candidate is solved and passed on to the back end. When
/// it triggers, [`KestrelError::ResourceExhausted`] is returned.
pub fn minimise_core(
    mut trace: ResolutionTrace,
    strategy: &mut impl ReductionStrategy,
    backend: &mut impl SatBackend,
    termination: &mut impl TerminationCondition,
) -> Result<ResolutionTrace, KestrelError> {
    let mut statistics = ReductionStatistics {
        initial_core_size: trace.core().len(),
        ..Default::default()
    };

    loop {
        let candidate = strategy.next(&trace)?;
        if candidate.is_empty() {
            break;
        }

        if termination.should_stop() {
            return Err(KestrelError::ResourceExhausted {
                phase: Phase::Reduction,
            });
        }

        statistics.num_candidates += 1;
        let cnf = trace.to_cnf(&candidate);

        match backend.solve(&cnf, termination)? {
            SatOutcome::Satisfiable(_) => {
                debug!("candidate of {} clauses is satisfiable", candidate.len());
            }
            SatOutcome::Unsatisfiable(reduced) => {
                statistics.num_unsatisfiable_candidates += 1;
                trace = trace.splice(&candidate, reduced)?;
                debug!("reduced the core to {} axioms", trace.core().len());
            }
        }

        termination.iteration_has_been_made();
    }

    statistics.final_core_size = trace.core().len();
    info!(
        "core reduced from {} to {} axioms in {} iterations",
        statistics.initial_core_size, statistics.final_core_size, statistics.num_candidates
    );

    if should_log_statistics() {
        statistics.log(StatisticLogger::new(["core", "reduction"]));
    }

    Ok(trace)
}
