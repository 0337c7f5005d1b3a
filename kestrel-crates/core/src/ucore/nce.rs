use super::strategy_utils::check_candidate;
use super::strategy_utils::core_tail_units;
use super::strategy_utils::root_vars;
use super::strategy_utils::RootPool;
use super::ReductionStrategy;
use crate::basic_types::ContractViolation;
use crate::basic_types::Variable;
use crate::trace::ClauseSet;
use crate::trace::ResolutionTrace;
use crate::translation::Logic;
use crate::translation::TranslationLog;

/// Naive Core Extraction.
///
/// Like [`RceStrategy`](super::RceStrategy), the roots are tried one at a time, but only the
/// axioms of the remaining relevant roots are proposed. No resolvents are recycled, so the SAT
/// back end has to refute every candidate from scratch.
#[derive(Clone, Debug)]
pub struct NceStrategy {
    pool: RootPool,
}

impl NceStrategy {
    pub fn new<L: Logic>(log: &TranslationLog<L>) -> NceStrategy {
        NceStrategy {
            pool: RootPool::new(root_vars(log)),
        }
    }

    /// The root variables which have not been tried yet, in the order they will be tried.
    pub fn remaining_roots(&self) -> &[Variable] {
        self.pool.remaining()
    }
}

impl ReductionStrategy for NceStrategy {
    fn next(&mut self, trace: &ResolutionTrace) -> Result<ClauseSet, ContractViolation> {
        if self.pool.is_exhausted() {
            return Ok(ClauseSet::new());
        }

        let mut relevant_vars = core_tail_units(trace);

        if self.pool.consume_relevant(&mut relevant_vars) {
            let candidate = trace.axioms_for(&relevant_vars);
            check_candidate(trace, &candidate)?;

            return Ok(candidate);
        }

        Ok(ClauseSet::new())
    }
}
