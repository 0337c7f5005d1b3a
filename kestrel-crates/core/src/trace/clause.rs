use std::fmt::Display;
use std::fmt::Formatter;

use crate::basic_types::Literal;
use crate::basic_types::Variable;
use crate::containers::StorageKey;

/// The position of a clause in a [`ResolutionTrace`](super::ResolutionTrace).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClauseIndex(u32);

impl ClauseIndex {
    pub fn new(index: u32) -> ClauseIndex {
        ClauseIndex(index)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl StorageKey for ClauseIndex {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        ClauseIndex(u32::try_from(index).expect("clause indices fit in u32"))
    }
}

impl Display for ClauseIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// A clause of a resolution trace. Axioms have no antecedents; resolvents list the clauses they
/// were resolved from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceClause {
    index: ClauseIndex,
    /// Sorted by variable and free of duplicates.
    literals: Vec<Literal>,
    antecedents: Vec<ClauseIndex>,
    max_variable: Option<Variable>,
}

impl TraceClause {
    pub(crate) fn new(
        index: ClauseIndex,
        literals: impl IntoIterator<Item = Literal>,
        antecedents: Vec<ClauseIndex>,
    ) -> TraceClause {
        let mut literals = literals.into_iter().collect::<Vec<_>>();
        literals.sort_unstable_by_key(|literal| (literal.variable(), literal.is_positive()));
        literals.dedup();

        let max_variable = literals.last().map(|literal| literal.variable());

        TraceClause {
            index,
            literals,
            antecedents,
            max_variable,
        }
    }

    pub fn index(&self) -> ClauseIndex {
        self.index
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    pub fn antecedents(&self) -> &[ClauseIndex] {
        &self.antecedents
    }

    /// The largest variable in the clause, or `None` for the empty clause.
    pub fn max_variable(&self) -> Option<Variable> {
        self.max_variable
    }

    pub fn is_axiom(&self) -> bool {
        self.antecedents.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn contains(&self, literal: Literal) -> bool {
        self.literals
            .binary_search_by_key(&(literal.variable(), literal.is_positive()), |literal| {
                (literal.variable(), literal.is_positive())
            })
            .is_ok()
    }

    /// Two clauses are equivalent when they consist of the same literals.
    pub(crate) fn has_same_literals(&self, literals: &[Literal]) -> bool {
        let mut other = literals.to_vec();
        other.sort_unstable_by_key(|literal| (literal.variable(), literal.is_positive()));
        other.dedup();

        self.literals == other
    }
}
