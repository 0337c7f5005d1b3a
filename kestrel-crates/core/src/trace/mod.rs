//! The resolution trace of an unsatisfiable CNF.
//!
//! A [`ResolutionTrace`] is the record of how a SAT back end derived the empty clause. Its clauses
//! are partitioned into axioms (the input clauses, which come first) and resolvents (the derived
//! clauses). The final clause is always the empty clause, which is called the terminal clause.
//!
//! All queries on a trace are expressed in terms of [`ClauseSet`]s, and never mutate the trace; a
//! trace is immutable once built. New traces are derived through [`ResolutionTrace::splice`].
mod builder;
mod clause;
mod tracecheck;

use std::ops::Index;

pub use builder::ResolutionTraceBuilder;
pub use clause::ClauseIndex;
pub use clause::TraceClause;

use crate::basic_types::ContractViolation;
use crate::basic_types::Variable;
use crate::containers::IndexSet;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::kestrel_assert_moderate;
use crate::translation::Cnf;

/// A set of clauses of a [`ResolutionTrace`].
pub type ClauseSet = IndexSet<ClauseIndex>;
/// A set of boolean variables.
pub type VariableSet = IndexSet<Variable>;

/// A validated resolution refutation; see the module documentation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolutionTrace {
    clauses: KeyedVec<ClauseIndex, TraceClause>,
    num_axioms: usize,
    max_variable: Option<Variable>,
}

impl ResolutionTrace {
    /// The number of clauses in the trace.
    pub fn size(&self) -> usize {
        self.clauses.len()
    }

    pub fn num_axioms(&self) -> usize {
        self.num_axioms
    }

    pub fn num_resolvents(&self) -> usize {
        self.clauses.len() - self.num_axioms
    }

    pub fn get(&self, index: ClauseIndex) -> Option<&TraceClause> {
        self.clauses.get(index)
    }

    pub fn clauses(&self) -> impl Iterator<Item = &TraceClause> {
        self.clauses.iter()
    }

    /// The index of the empty clause which concludes the trace.
    pub fn terminal(&self) -> ClauseIndex {
        ClauseIndex::create_from_index(self.clauses.len() - 1)
    }

    /// The largest variable occurring in any clause of the trace.
    pub fn max_variable(&self) -> Option<Variable> {
        self.max_variable
    }

    pub fn is_axiom(&self, index: ClauseIndex) -> bool {
        index.index() < self.num_axioms
    }

    pub fn axioms(&self) -> ClauseSet {
        self.clauses.keys().take(self.num_axioms).collect()
    }

    pub fn resolvents(&self) -> ClauseSet {
        self.clauses.keys().skip(self.num_axioms).collect()
    }

    /// The axioms from which the terminal clause is derived.
    pub fn core(&self) -> ClauseSet {
        let mut core = self.backward_reachable(&[self.terminal()].into_iter().collect());
        core.retain(|index| self.is_axiom(index));
        core
    }

    /// The clauses of `seed` together with all of their (transitive) antecedents.
    pub fn backward_reachable(&self, seed: &ClauseSet) -> ClauseSet {
        let mut reachable = seed.clone();

        // Antecedents always precede their resolvent, so a single descending pass suffices.
        for index in self.clauses.keys().rev() {
            if reachable.contains(index) {
                reachable.extend(self.clauses[index].antecedents().iter().copied());
            }
        }

        reachable
    }

    /// The clauses of `seed` together with every clause which is (transitively) derived from one
    /// of them.
    pub fn reachable(&self, seed: &ClauseSet) -> ClauseSet {
        let mut reachable = seed.clone();

        for index in self.clauses.keys().skip(self.num_axioms) {
            if self.clauses[index]
                .antecedents()
                .iter()
                .any(|&antecedent| reachable.contains(antecedent))
            {
                let _ = reachable.insert(index);
            }
        }

        reachable
    }

    /// The clauses of `set` together with every resolvent whose antecedents all lie in `set`; that
    /// is, everything which can be learned from `set` in a single resolution step.
    pub fn directly_learnable(&self, set: &ClauseSet) -> ClauseSet {
        let mut learnable = set.clone();

        for index in self.clauses.keys().skip(self.num_axioms) {
            if self.all_antecedents_in(index, set) {
                let _ = learnable.insert(index);
            }
        }

        learnable
    }

    /// The fixpoint of [`ResolutionTrace::directly_learnable`] starting from `set`.
    pub fn learnable(&self, set: &ClauseSet) -> ClauseSet {
        let mut learnable = set.clone();

        // Checking against the growing set in ascending order reaches the fixpoint in one pass.
        for index in self.clauses.keys().skip(self.num_axioms) {
            if self.all_antecedents_in(index, &learnable) {
                let _ = learnable.insert(index);
            }
        }

        learnable
    }

    /// The axioms which make up the translation of the formulas identified by `variables`.
    ///
    /// An axiom is selected when its maximal variable is relevant. The variables occurring in a
    /// selected axiom become relevant in turn, so the axioms encoding the sub-formulas of a
    /// relevant formula are selected as well.
    pub fn axioms_for(&self, variables: &VariableSet) -> ClauseSet {
        let mut by_max_variable = self
            .clauses
            .keys()
            .take(self.num_axioms)
            .filter_map(|index| {
                self.clauses[index]
                    .max_variable()
                    .map(|variable| (variable, index))
            })
            .collect::<Vec<_>>();
        by_max_variable.sort_by(|(left, _), (right, _)| right.cmp(left));

        let mut relevant = variables.clone();
        let mut axioms = ClauseSet::new();

        // The variables of an axiom never exceed its maximal variable, so visiting axioms by
        // decreasing maximal variable reaches the closure in one pass.
        for (max_variable, index) in by_max_variable {
            if relevant.contains(max_variable) {
                let _ = axioms.insert(index);
                relevant.extend(
                    self.clauses[index]
                        .literals()
                        .iter()
                        .map(|literal| literal.variable()),
                );
            }
        }

        axioms
    }

    /// The clauses in `subset` as a CNF, in increasing index order.
    pub fn to_cnf(&self, subset: &ClauseSet) -> Cnf {
        let mut cnf = Cnf::new();
        for index in subset {
            cnf.add_clause(self.clauses[index].literals().iter().copied());
        }
        cnf
    }

    /// Re-express `reduced` in terms of the clauses of this trace.
    ///
    /// `reduced` must be the trace obtained by solving [`ResolutionTrace::to_cnf`] of `subset`; its
    /// axioms therefore correspond one-to-one to the clauses in `subset`. The result contains the
    /// axioms of `subset`, followed by the resolvents of `subset` and then the resolvents of
    /// `reduced`. Its axioms are therefore always input clauses of the original problem.
    pub fn splice(
        &self,
        subset: &ClauseSet,
        reduced: ResolutionTrace,
    ) -> Result<ResolutionTrace, ContractViolation> {
        if reduced.num_axioms != subset.len() {
            return Err(ContractViolation::MalformedBackendTrace(format!(
                "expected {} axioms but the trace has {}",
                subset.len(),
                reduced.num_axioms
            )));
        }

        let mut builder = ResolutionTraceBuilder::new();
        let mut renamed: KeyedVec<ClauseIndex, Option<ClauseIndex>> = KeyedVec::default();
        renamed.grow_to_include(self.terminal(), None);

        for (old_index, reduced_axiom) in subset.iter().zip(reduced.clauses.iter()) {
            let clause = &self.clauses[old_index];

            if !reduced_axiom.has_same_literals(clause.literals()) {
                return Err(ContractViolation::MalformedBackendTrace(format!(
                    "axiom {} does not match clause {old_index}",
                    reduced_axiom.index()
                )));
            }

            let new_index = if clause.is_axiom() {
                builder.add_axiom(clause.literals().iter().copied())?
            } else {
                let antecedents = clause
                    .antecedents()
                    .iter()
                    .map(|&antecedent| {
                        renamed[antecedent].ok_or(ContractViolation::AntecedentOutsideSubset {
                            index: old_index,
                            antecedent,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                builder.add_resolvent(clause.literals().iter().copied(), antecedents)?
            };

            renamed[old_index] = Some(new_index);
        }

        // Every clause of `reduced` keeps its position: its axioms line up with `subset`, so its
        // resolvents directly follow them.
        for clause in reduced.clauses.iter().skip(reduced.num_axioms) {
            let _ = builder.add_resolvent(
                clause.literals().iter().copied(),
                clause.antecedents().iter().copied(),
            )?;
        }

        let spliced = builder.build()?;
        kestrel_assert_moderate!(spliced.num_axioms <= self.num_axioms);

        Ok(spliced)
    }

    fn all_antecedents_in(&self, index: ClauseIndex, set: &ClauseSet) -> bool {
        self.clauses[index]
            .antecedents()
            .iter()
            .all(|&antecedent| set.contains(antecedent))
    }
}

impl Index<ClauseIndex> for ResolutionTrace {
    type Output = TraceClause;

    fn index(&self, index: ClauseIndex) -> &Self::Output {
        &self.clauses[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::Literal;

    fn lit(code: i32) -> Literal {
        Literal::from_dimacs(code).unwrap()
    }

    fn var(index: u32) -> Variable {
        Variable::new(index).unwrap()
    }

    fn set(indices: impl IntoIterator<Item = u32>) -> ClauseSet {
        indices.into_iter().map(ClauseIndex::new).collect()
    }

    fn c(index: u32) -> ClauseIndex {
        ClauseIndex::new(index)
    }

    /// c0 = {1}, c1 = {-1, 2}, c2 = {-2}, c3 = {-1} from c1 and c2, c4 = {} from c0 and c3.
    fn chain_trace() -> ResolutionTrace {
        let mut builder = ResolutionTraceBuilder::new();
        let c0 = builder.add_axiom([lit(1)]).unwrap();
        let c1 = builder.add_axiom([lit(-1), lit(2)]).unwrap();
        let c2 = builder.add_axiom([lit(-2)]).unwrap();
        let c3 = builder.add_resolvent([lit(-1)], [c1, c2]).unwrap();
        let _ = builder.add_resolvent([], [c0, c3]).unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn axioms_and_resolvents_partition_the_trace() {
        let trace = chain_trace();

        assert_eq!(5, trace.size());
        assert_eq!(set([0, 1, 2]), trace.axioms());
        assert_eq!(set([3, 4]), trace.resolvents());
        assert_eq!(c(4), trace.terminal());
        assert_eq!(Some(var(2)), trace.max_variable());
    }

    #[test]
    fn reachability_follows_antecedents() {
        let trace = chain_trace();

        assert_eq!(set([0, 1, 2]), trace.core());
        assert_eq!(set([1, 2, 3]), trace.backward_reachable(&set([3])));
        assert_eq!(set([1, 3, 4]), trace.reachable(&set([1])));
    }

    #[test]
    fn direct_learning_takes_one_step() {
        let trace = chain_trace();

        assert_eq!(set([0, 1, 2, 3]), trace.directly_learnable(&set([0, 1, 2])));
        assert_eq!(set([0, 1, 2, 3, 4]), trace.learnable(&set([0, 1, 2])));
        assert_eq!(set([0, 1]), trace.learnable(&set([0, 1])));
    }

    #[test]
    fn axioms_for_includes_the_encoding_of_sub_formulas() {
        let mut builder = ResolutionTraceBuilder::new();
        let _ = builder.add_axiom([lit(3)]).unwrap();
        let _ = builder.add_axiom([lit(-3), lit(1)]).unwrap();
        let _ = builder.add_axiom([lit(-3), lit(2)]).unwrap();
        let _ = builder.add_axiom([lit(-1), lit(-2)]).unwrap();
        let _ = builder.add_axiom([lit(4)]).unwrap();
        let _ = builder.add_resolvent([], [c(0), c(1), c(2), c(3)]).unwrap();
        let trace = builder.build().unwrap();

        let relevant = [var(3)].into_iter().collect();

        assert_eq!(set([0, 1, 2, 3]), trace.axioms_for(&relevant));
    }

    #[test]
    fn splice_keeps_original_axioms() {
        let trace = chain_trace();
        let subset = set([0, 1, 2, 3]);

        let mut builder = ResolutionTraceBuilder::new();
        for clause in trace.to_cnf(&subset).clauses() {
            let _ = builder.add_axiom(clause.iter().copied()).unwrap();
        }
        let _ = builder.add_resolvent([], [c(0), c(3)]).unwrap();
        let reduced = builder.build().unwrap();

        let spliced = trace.splice(&subset, reduced).unwrap();

        assert_eq!(3, spliced.num_axioms());
        assert_eq!(&[c(1), c(2)], spliced[c(3)].antecedents());
        assert_eq!(&[c(0), c(3)], spliced[c(4)].antecedents());
        assert_eq!(set([0, 1, 2]), spliced.core());
    }

    #[test]
    fn splice_rejects_resolvents_without_their_antecedents() {
        let trace = chain_trace();
        let subset = set([0, 3]);

        let mut builder = ResolutionTraceBuilder::new();
        let _ = builder.add_axiom([lit(1)]).unwrap();
        let _ = builder.add_axiom([lit(-1)]).unwrap();
        let _ = builder.add_resolvent([], [c(0), c(1)]).unwrap();
        let reduced = builder.build().unwrap();

        assert_eq!(
            Err(ContractViolation::AntecedentOutsideSubset {
                index: c(3),
                antecedent: c(1)
            }),
            trace.splice(&subset, reduced)
        );
    }

    #[test]
    fn splice_rejects_traces_over_other_clauses() {
        let trace = chain_trace();

        let mut builder = ResolutionTraceBuilder::new();
        let _ = builder.add_axiom([lit(5)]).unwrap();
        let _ = builder.add_axiom([lit(-5)]).unwrap();
        let _ = builder.add_resolvent([], [c(0), c(1)]).unwrap();
        let reduced = builder.build().unwrap();

        assert!(matches!(
            trace.splice(&set([0, 2]), reduced),
            Err(ContractViolation::MalformedBackendTrace(_))
        ));
    }
}
