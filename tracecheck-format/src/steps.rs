use std::num::NonZeroI32;
use std::num::NonZeroU64;

/// The identifier of a step in a trace. Identifiers are positive.
pub type StepId = NonZeroU64;

/// One line of a TraceCheck trace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    /// The ID of this step.
    pub id: StepId,
    /// The literals of the clause, in DIMACS convention.
    pub literals: Vec<NonZeroI32>,
    /// The steps this clause was resolved from. Empty for axioms.
    pub antecedents: Vec<StepId>,
}

impl Step {
    /// Returns `true` if the step is an input clause.
    pub fn is_axiom(&self) -> bool {
        self.antecedents.is_empty()
    }

    /// Returns `true` if the step derives the empty clause.
    pub fn is_empty_clause(&self) -> bool {
        self.literals.is_empty()
    }
}
