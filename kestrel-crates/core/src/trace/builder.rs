use super::ClauseIndex;
use super::ResolutionTrace;
use super::TraceClause;
use crate::basic_types::ContractViolation;
use crate::basic_types::Literal;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;

/// Incrementally constructs a [`ResolutionTrace`], validating its shape along the way.
///
/// Axioms have to be added before any resolvent, and every antecedent has to precede the
/// resolvent which refers to it. Whether a resolvent actually follows from its antecedents by
/// resolution is not checked.
///
/// # Example
/// ```
/// # use kestrel_core::basic_types::Literal;
/// # use kestrel_core::trace::ResolutionTraceBuilder;
/// let lit = |code| Literal::from_dimacs(code).unwrap();
///
/// let mut builder = ResolutionTraceBuilder::new();
/// let positive = builder.add_axiom([lit(1)]).unwrap();
/// let negative = builder.add_axiom([lit(-1)]).unwrap();
/// let _ = builder.add_resolvent([], [positive, negative]).unwrap();
///
/// let trace = builder.build().unwrap();
/// assert_eq!(3, trace.size());
/// assert_eq!(2, trace.core().len());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ResolutionTraceBuilder {
    clauses: KeyedVec<ClauseIndex, TraceClause>,
    num_axioms: usize,
}

impl ResolutionTraceBuilder {
    pub fn new() -> ResolutionTraceBuilder {
        ResolutionTraceBuilder::default()
    }

    /// The number of clauses added so far.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub(crate) fn clause(&self, index: ClauseIndex) -> &TraceClause {
        &self.clauses[index]
    }

    /// Add an input clause to the trace.
    pub fn add_axiom(
        &mut self,
        literals: impl IntoIterator<Item = Literal>,
    ) -> Result<ClauseIndex, ContractViolation> {
        let index = self.next_index();

        if self.num_axioms < self.clauses.len() {
            return Err(ContractViolation::AxiomAfterResolvent { index });
        }

        self.num_axioms += 1;
        Ok(self
            .clauses
            .push(TraceClause::new(index, literals, Vec::new())))
    }

    /// Add a clause which was derived from `antecedents` to the trace.
    pub fn add_resolvent(
        &mut self,
        literals: impl IntoIterator<Item = Literal>,
        antecedents: impl IntoIterator<Item = ClauseIndex>,
    ) -> Result<ClauseIndex, ContractViolation> {
        let index = self.next_index();
        let antecedents = antecedents.into_iter().collect::<Vec<_>>();

        if antecedents.is_empty() {
            return Err(ContractViolation::ResolventWithoutAntecedents { index });
        }

        if let Some(&antecedent) = antecedents.iter().find(|&&antecedent| antecedent >= index) {
            return Err(ContractViolation::AntecedentNotBefore { index, antecedent });
        }

        Ok(self
            .clauses
            .push(TraceClause::new(index, literals, antecedents)))
    }

    /// Finish the trace. The last clause which was added has to be the empty clause.
    pub fn build(self) -> Result<ResolutionTrace, ContractViolation> {
        let Some(terminal) = self.clauses.last() else {
            return Err(ContractViolation::EmptyTrace);
        };

        if !terminal.is_empty() {
            return Err(ContractViolation::MissingTerminal {
                index: terminal.index(),
            });
        }

        let max_variable = self
            .clauses
            .iter()
            .filter_map(|clause| clause.max_variable())
            .max();

        Ok(ResolutionTrace {
            clauses: self.clauses,
            num_axioms: self.num_axioms,
            max_variable,
        })
    }

    fn next_index(&self) -> ClauseIndex {
        ClauseIndex::create_from_index(self.clauses.len())
    }
}
