use log::debug;

use super::strategy_utils::check_candidate;
use super::strategy_utils::core_tail_units;
use super::strategy_utils::root_vars;
use super::strategy_utils::RootPool;
use super::ReductionStrategy;
use crate::basic_types::ConfigurationError;
use crate::basic_types::ContractViolation;
use crate::basic_types::Variable;
use crate::options::ResolutionDistance;
use crate::trace::ClauseSet;
use crate::trace::ResolutionTrace;
use crate::trace::VariableSet;
use crate::translation::Logic;
use crate::translation::TranslationLog;

/// Recycling Core Extraction.
///
/// The strategy tries to drop the roots of the formula one at a time, in declaration order. For
/// every root which the current refutation still depends on, it proposes the clauses of all
/// other relevant roots, together with the resolvents of the current trace which can be learned
/// from those clauses. Recycling these resolvents spares the SAT back end from deriving them
/// again. The resolution distance bounds how many resolution steps away from the axioms a
/// resolvent may be to get recycled.
///
/// Every root is tried exactly once, so the reduction converges after at most as many iterations
/// as there are roots. In the resulting core, every root is necessary for unsatisfiability.
#[derive(Clone, Debug)]
pub struct RceStrategy {
    pool: RootPool,
    distance: ResolutionDistance,
}

impl RceStrategy {
    pub fn new<L: Logic>(log: &TranslationLog<L>, distance: ResolutionDistance) -> RceStrategy {
        RceStrategy {
            pool: RootPool::new(root_vars(log)),
            distance,
        }
    }

    /// Create the strategy from a raw resolution distance, which has to be non-negative.
    pub fn with_distance<L: Logic>(
        log: &TranslationLog<L>,
        distance: i64,
    ) -> Result<RceStrategy, ConfigurationError> {
        Ok(RceStrategy::new(log, ResolutionDistance::try_from(distance)?))
    }

    /// The root variables which have not been tried yet, in the order they will be tried.
    pub fn remaining_roots(&self) -> &[Variable] {
        self.pool.remaining()
    }

    /// The axioms of the roots identified by `relevant_vars`, together with the resolvents within
    /// the resolution distance of them.
    pub fn clauses_for(
        &self,
        trace: &ResolutionTrace,
        relevant_vars: &VariableSet,
    ) -> Result<ClauseSet, ContractViolation> {
        let relevant_axioms = trace.axioms_for(relevant_vars);

        let clauses = match self.distance {
            ResolutionDistance::Bounded(distance) if distance < trace.num_resolvents() => {
                let mut relevant = relevant_axioms;
                for _ in 0..distance {
                    let learned = trace.directly_learnable(&relevant);
                    if learned.len() == relevant.len() {
                        break;
                    }
                    relevant = learned;
                }
                relevant
            }
            _ => trace.learnable(&relevant_axioms),
        };

        check_candidate(trace, &clauses)?;
        Ok(clauses)
    }
}

impl ReductionStrategy for RceStrategy {
    fn next(&mut self, trace: &ResolutionTrace) -> Result<ClauseSet, ContractViolation> {
        if self.pool.is_exhausted() {
            return Ok(ClauseSet::new());
        }

        let mut relevant_vars = core_tail_units(trace);

        if self.pool.consume_relevant(&mut relevant_vars) {
            let candidate = self.clauses_for(trace, &relevant_vars)?;
            debug!(
                "proposing {} clauses for {} relevant roots",
                candidate.len(),
                relevant_vars.len()
            );

            return Ok(candidate);
        }

        Ok(ClauseSet::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::c;
    use crate::test_helpers::clauses;
    use crate::test_helpers::lit;
    use crate::test_helpers::root_log;
    use crate::test_helpers::var;
    use crate::trace::ResolutionTraceBuilder;

    /// Axioms c0 = {1}, c1 = {2}, c2 = {3}; c3 from c1 and c2, the empty clause c4 from c0 and
    /// c3.
    fn three_roots() -> ResolutionTrace {
        let mut builder = ResolutionTraceBuilder::new();
        let c0 = builder.add_axiom([lit(1)]).unwrap();
        let c1 = builder.add_axiom([lit(2)]).unwrap();
        let c2 = builder.add_axiom([lit(3)]).unwrap();
        let c3 = builder.add_resolvent([lit(-1)], [c1, c2]).unwrap();
        let _ = builder.add_resolvent([], [c0, c3]).unwrap();
        builder.build().unwrap()
    }

    /// A chain c0 = {1}, c1 = {-1, 2}, c2 = {-2, 3}, c3 = {-3, -4}, c4 = {4} which is refuted by
    /// resolving along the chain: c5 = {2}, c6 = {3}, c7 = {-4}, c8 = {}.
    fn chain() -> ResolutionTrace {
        let mut builder = ResolutionTraceBuilder::new();
        let _ = builder.add_axiom([lit(1)]).unwrap();
        let _ = builder.add_axiom([lit(-1), lit(2)]).unwrap();
        let _ = builder.add_axiom([lit(-2), lit(3)]).unwrap();
        let _ = builder.add_axiom([lit(-3), lit(-4)]).unwrap();
        let _ = builder.add_axiom([lit(4)]).unwrap();
        let _ = builder.add_resolvent([lit(2)], [c(0), c(1)]).unwrap();
        let _ = builder.add_resolvent([lit(3)], [c(5), c(2)]).unwrap();
        let _ = builder.add_resolvent([lit(-4)], [c(6), c(3)]).unwrap();
        let _ = builder.add_resolvent([], [c(7), c(4)]).unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn first_candidate_drops_the_first_root() {
        let trace = three_roots();
        let mut strategy = RceStrategy::new(&root_log(&[1, 2, 3]), ResolutionDistance::Unbounded);

        let candidate = strategy.next(&trace).unwrap();

        assert_eq!(clauses([1, 2, 3]), candidate);
        assert!(!candidate.contains(trace.terminal()));
    }

    #[test]
    fn pool_drains_monotonically_and_exhaustion_is_idempotent() {
        let trace = three_roots();
        let mut strategy = RceStrategy::new(&root_log(&[1, 2, 3]), ResolutionDistance::Unbounded);

        let mut remaining = vec![strategy.remaining_roots().len()];
        let mut candidates = Vec::new();
        loop {
            let candidate = strategy.next(&trace).unwrap();
            remaining.push(strategy.remaining_roots().len());
            if candidate.is_empty() {
                break;
            }
            candidates.push(candidate);
        }

        assert_eq!(vec![3, 2, 1, 0, 0], remaining);
        assert_eq!(
            vec![clauses([1, 2, 3]), clauses([0, 2]), clauses([0, 1])],
            candidates
        );

        for _ in 0..3 {
            assert!(strategy.next(&trace).unwrap().is_empty());
            assert!(strategy.remaining_roots().is_empty());
        }
    }

    #[test]
    fn roots_outside_the_core_are_skipped() {
        let trace = three_roots();
        let mut strategy =
            RceStrategy::new(&root_log(&[7, 2, 1, 3]), ResolutionDistance::Unbounded);

        let candidate = strategy.next(&trace).unwrap();

        assert_eq!(clauses([0, 2]), candidate);
        assert_eq!(&[var(1), var(3)], strategy.remaining_roots());
    }

    #[test]
    fn last_relevant_root_exhausts_the_strategy() {
        let mut builder = ResolutionTraceBuilder::new();
        let _ = builder.add_axiom([lit(1)]).unwrap();
        let _ = builder.add_axiom([lit(-1)]).unwrap();
        let _ = builder.add_resolvent([], [c(0), c(1)]).unwrap();
        let trace = builder.build().unwrap();
        let mut strategy = RceStrategy::new(&root_log(&[1]), ResolutionDistance::Unbounded);

        assert!(strategy.next(&trace).unwrap().is_empty());
        assert!(strategy.remaining_roots().is_empty());
    }

    #[test]
    fn larger_distances_recycle_more_resolvents() {
        let trace = chain();
        let relevant = [var(3)].into_iter().collect();
        let log = root_log(&[]);

        let results = [0, 1, 2, 3]
            .into_iter()
            .map(ResolutionDistance::Bounded)
            .chain([ResolutionDistance::Unbounded])
            .map(|distance| {
                RceStrategy::new(&log, distance)
                    .clauses_for(&trace, &relevant)
                    .unwrap()
            })
            .collect::<Vec<_>>();

        assert_eq!(clauses([0, 1, 2]), results[0]);
        assert_eq!(clauses([0, 1, 2, 5]), results[1]);
        assert_eq!(clauses([0, 1, 2, 5, 6]), results[2]);
        for pair in results.windows(2) {
            assert!(pair[0].is_subset(&pair[1]));
        }
    }

    #[test]
    fn terminal_is_never_proposed() {
        let trace = chain();
        let strategy = RceStrategy::new(&root_log(&[]), ResolutionDistance::Unbounded);

        for mask in 1..16_u32 {
            let relevant = (1..=4)
                .filter(|bit| mask & (1 << (bit - 1)) != 0)
                .map(var)
                .collect();

            match strategy.clauses_for(&trace, &relevant) {
                Ok(candidate) => assert!(!candidate.contains(trace.terminal())),
                Err(violation) => assert_eq!(
                    ContractViolation::TerminalInCandidate {
                        terminal: trace.terminal()
                    },
                    violation
                ),
            }
        }
    }

    #[test]
    fn negative_distance_is_a_configuration_error() {
        let result = RceStrategy::with_distance(&root_log(&[1, 2, 3]), -1);

        assert!(matches!(
            result,
            Err(ConfigurationError::NegativeResolutionDistance(-1))
        ));
    }
}
