//! Building blocks shared by the reduction strategies.
use crate::basic_types::ContractViolation;
use crate::basic_types::Variable;
use crate::containers::StorageKey;
use crate::trace::ClauseSet;
use crate::trace::ResolutionTrace;
use crate::trace::VariableSet;
use crate::translation::Logic;
use crate::translation::TranslationLog;

/// The root variables of `log`, in the order in which the roots were declared.
pub fn root_vars<L: Logic>(log: &TranslationLog<L>) -> Vec<Variable> {
    log.root_vars()
}

/// The variables of the unit axioms in the core of `trace`.
///
/// The translator asserts every root with a unit clause, so these are the roots which the
/// refutation still depends on.
pub fn core_tail_units(trace: &ResolutionTrace) -> VariableSet {
    trace
        .core()
        .iter()
        .map(|index| &trace[index])
        .filter(|clause| clause.len() == 1)
        .filter_map(|clause| clause.max_variable())
        .collect()
}

/// Check that `candidate` may be proposed for `trace`.
pub fn check_candidate(
    trace: &ResolutionTrace,
    candidate: &ClauseSet,
) -> Result<(), ContractViolation> {
    let terminal = trace.terminal();

    if candidate.is_empty() {
        return Err(ContractViolation::EmptyCandidate);
    }

    if candidate
        .last()
        .is_some_and(|index| index.index() >= terminal.index())
    {
        return Err(ContractViolation::TerminalInCandidate { terminal });
    }

    Ok(())
}

/// The pool of root variables which a strategy still has to try. Every variable is consumed at
/// most once, in order.
#[derive(Clone, Debug)]
pub(crate) struct RootPool {
    variables: Vec<Variable>,
    cursor: usize,
}

impl RootPool {
    pub(crate) fn new(variables: Vec<Variable>) -> RootPool {
        RootPool {
            variables,
            cursor: 0,
        }
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.cursor >= self.variables.len()
    }

    /// The variables which have not been consumed yet.
    pub(crate) fn remaining(&self) -> &[Variable] {
        &self.variables[self.cursor..]
    }

    /// Consume variables until one of them is in `relevant`, and remove it from `relevant`.
    ///
    /// Returns `true` if such a variable was found and `relevant` is not empty afterwards; the
    /// remaining relevant variables then identify the roots to retry. Otherwise the pool is
    /// drained completely and `false` is returned.
    pub(crate) fn consume_relevant(&mut self, relevant: &mut VariableSet) -> bool {
        while let Some(&variable) = self.variables.get(self.cursor) {
            self.cursor += 1;

            if relevant.remove(variable) {
                if relevant.is_empty() {
                    // Only the removed root was left.
                    break;
                }

                return true;
            }
        }

        self.cursor = self.variables.len();
        false
    }
}
