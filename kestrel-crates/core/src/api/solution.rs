use std::fmt::Debug;
use std::fmt::Formatter;

use crate::basic_types::ContractViolation;
use crate::basic_types::Variable;
use crate::trace::ResolutionTrace;
use crate::translation::Logic;
use crate::translation::TranslationLog;
use crate::ucore::strategy_utils::core_tail_units;

/// The outcome of [`Solver::solve`](crate::Solver::solve).
pub enum Solution<L: Logic> {
    Satisfiable(L::Instance),
    Unsatisfiable(UnsatCore<L>),
    /// The termination condition triggered before a conclusion was reached.
    Unknown,
}

impl<L: Logic> Solution<L> {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, Solution::Satisfiable(_))
    }

    pub fn is_unsatisfiable(&self) -> bool {
        matches!(self, Solution::Unsatisfiable(_))
    }
}

impl<L: Logic> Debug for Solution<L> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Solution::Satisfiable(instance) => f.debug_tuple("Satisfiable").field(instance).finish(),
            Solution::Unsatisfiable(core) => f.debug_tuple("Unsatisfiable").field(core).finish(),
            Solution::Unknown => write!(f, "Unknown"),
        }
    }
}

/// An unsatisfiable core: the top-level conjuncts which the refutation in `trace` depends on.
///
/// The roots are listed in the order in which they were recorded in the translation log.
pub struct UnsatCore<L: Logic> {
    trace: ResolutionTrace,
    root_variables: Vec<Variable>,
    roots: Vec<L::Formula>,
}

impl<L: Logic> UnsatCore<L> {
    /// Map the core of `trace` back to the roots recorded in `log`.
    ///
    /// Fails when a root variable of the core was first recorded with another origin, since its
    /// root formula is then unknown.
    pub fn new(
        trace: ResolutionTrace,
        log: &TranslationLog<L>,
    ) -> Result<UnsatCore<L>, ContractViolation> {
        let units = core_tail_units(&trace);

        let root_variables = log
            .root_vars()
            .into_iter()
            .filter(|&variable| units.contains(variable))
            .collect::<Vec<_>>();
        let roots = root_variables
            .iter()
            .map(|&variable| {
                log.root_formula(variable)
                    .cloned()
                    .ok_or(ContractViolation::ConflictingOrigin(variable.get()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(UnsatCore {
            trace,
            root_variables,
            roots,
        })
    }

    /// The refutation the core was taken from.
    pub fn trace(&self) -> &ResolutionTrace {
        &self.trace
    }

    pub fn root_variables(&self) -> &[Variable] {
        &self.root_variables
    }

    pub fn roots(&self) -> &[L::Formula] {
        &self.roots
    }

    pub fn into_trace(self) -> ResolutionTrace {
        self.trace
    }
}

impl<L: Logic> Debug for UnsatCore<L> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnsatCore")
            .field("root_variables", &self.root_variables)
            .field("roots", &self.roots)
            .field("trace_size", &self.trace.size())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::lit;
    use crate::test_helpers::root_log;
    use crate::test_helpers::var;
    use crate::test_helpers::Names;
    use crate::translation::Origin;
    use crate::trace::ResolutionTraceBuilder;

    fn contradiction() -> ResolutionTrace {
        let mut builder = ResolutionTraceBuilder::new();
        let positive = builder.add_axiom([lit(1)]).unwrap();
        let negative = builder.add_axiom([lit(-1)]).unwrap();
        let _ = builder.add_resolvent([], [positive, negative]).unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn core_roots_are_taken_from_the_log() {
        let core = UnsatCore::new(contradiction(), &root_log(&[1, 2])).unwrap();

        assert_eq!(&[var(1)], core.root_variables());
        assert_eq!(&["conjunct"], core.roots());
    }

    #[test]
    fn root_recorded_after_a_declaration_is_a_contract_violation() {
        let mut log = TranslationLog::<Names>::new(1);
        log.record(var(1), Origin::Declaration("r"));
        log.record(var(1), Origin::Root("some r"));

        assert_eq!(
            Some(ContractViolation::ConflictingOrigin(1)),
            UnsatCore::new(contradiction(), &log).err()
        );
    }
}
