use log::trace;

use super::SatBackend;
use super::SatOutcome;
use crate::basic_types::Assignment;
use crate::basic_types::KestrelError;
use crate::basic_types::Literal;
use crate::basic_types::Phase;
use crate::basic_types::Variable;
use crate::create_statistics_struct;
use crate::kestrel_assert_advanced;
use crate::kestrel_assert_simple;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;
use crate::termination::TerminationCondition;
use crate::trace::ClauseIndex;
use crate::trace::ResolutionTraceBuilder;
use crate::translation::Cnf;

create_statistics_struct!(
    /// The statistics of a [`ResolutionProver`], accumulated over all of its SAT calls.
    ProverStatistics {
        /// The number of branching decisions.
        num_decisions: u64,
        /// The number of clauses falsified during unit propagation.
        num_conflicts: u64,
        /// The number of resolvents added to traces.
        num_resolvents: u64,
});

/// A complete SAT back end which produces tree-resolution refutations.
///
/// The prover is a DPLL search with unit propagation. It branches on the smallest unassigned
/// variable and tries the negative polarity first. Every conflict is explained by a chain
/// resolvent over the reasons of the propagated literals, and the refutations of both branches
/// of a decision are resolved on the decision variable. Because nothing is learned, the prover is
/// only suitable for small problems, such as unit tests and the reduced problems of core
/// extraction.
#[derive(Debug, Default)]
pub struct ResolutionProver {
    statistics: ProverStatistics,
}

impl ResolutionProver {
    pub fn new() -> ResolutionProver {
        ResolutionProver::default()
    }

    pub fn log_statistics(&self) {
        self.statistics
            .log(StatisticLogger::new(["resolution", "prover"]));
    }
}

impl SatBackend for ResolutionProver {
    fn solve(
        &mut self,
        cnf: &Cnf,
        termination: &mut impl TerminationCondition,
    ) -> Result<SatOutcome, KestrelError> {
        let mut search = Search {
            builder: ResolutionTraceBuilder::new(),
            clauses: Vec::new(),
            values: vec![None; cnf.num_variables() as usize],
            trail: Vec::new(),
            statistics: &mut self.statistics,
        };

        for literals in cnf.clauses() {
            let index = search.builder.add_axiom(literals.iter().copied())?;

            if literals.is_empty() {
                let _ = search.builder.add_resolvent([], [index])?;
                return Ok(SatOutcome::Unsatisfiable(search.builder.build()?));
            }

            if !is_tautology(literals) {
                search.clauses.push(index);
            }
        }

        match search.search(termination)? {
            Node::Model => {
                let values = search.values.iter().map(|value| value.unwrap_or(false));
                let assignment = Assignment::new(values);

                kestrel_assert_advanced!(cnf.clauses().all(|clause| clause
                    .iter()
                    .any(|&literal| assignment.is_satisfied(literal))));

                Ok(SatOutcome::Satisfiable(assignment))
            }
            Node::Refuted(refutation) => {
                kestrel_assert_simple!(search.builder.clause(refutation).is_empty());

                // Every trace ends with its terminal clause.
                if refutation.get() as usize + 1 != search.builder.len() {
                    let _ = search.builder.add_resolvent([], [refutation])?;
                }

                Ok(SatOutcome::Unsatisfiable(search.builder.build()?))
            }
        }
    }
}

/// The result of searching below a node of the search tree.
enum Node {
    Model,
    /// A clause which is falsified by the decisions leading to the node.
    Refuted(ClauseIndex),
}

enum ClauseState {
    Satisfied,
    Falsified,
    Unit(Literal),
    Open,
}

struct TrailEntry {
    literal: Literal,
    /// The clause which propagated the literal, or `None` for decisions.
    reason: Option<ClauseIndex>,
}

struct Search<'a> {
    builder: ResolutionTraceBuilder,
    /// The non-tautological input clauses.
    clauses: Vec<ClauseIndex>,
    values: Vec<Option<bool>>,
    trail: Vec<TrailEntry>,
    statistics: &'a mut ProverStatistics,
}

impl Search<'_> {
    fn search(&mut self, termination: &mut impl TerminationCondition) -> Result<Node, KestrelError> {
        if termination.should_stop() {
            return Err(KestrelError::ResourceExhausted {
                phase: Phase::Solving,
            });
        }

        if let Some(conflict) = self.propagate() {
            self.statistics.num_conflicts += 1;
            return Ok(Node::Refuted(self.explain(conflict)?));
        }

        let Some(variable) = self.first_unassigned() else {
            return Ok(Node::Model);
        };

        self.statistics.num_decisions += 1;
        let mut refutations = Vec::with_capacity(2);

        for is_positive in [false, true] {
            let decision = Literal::new(variable, is_positive);
            let trail_length = self.trail.len();
            self.assign(decision, None);

            let refutation = match self.search(termination)? {
                Node::Model => return Ok(Node::Model),
                Node::Refuted(refutation) => refutation,
            };

            self.backtrack(trail_length);

            // The refutation does not depend on the decision, so it holds for the other branch.
            if !self.builder.clause(refutation).contains(!decision) {
                return Ok(Node::Refuted(refutation));
            }

            refutations.push(refutation);
        }

        let pivot = variable;
        let mut literals = Vec::new();
        for &refutation in &refutations {
            literals.extend(
                self.builder
                    .clause(refutation)
                    .literals()
                    .iter()
                    .filter(|literal| literal.variable() != pivot),
            );
        }

        self.statistics.num_resolvents += 1;
        let resolvent = self.builder.add_resolvent(literals, refutations)?;
        trace!("resolved on {pivot} into {resolvent}");

        Ok(Node::Refuted(resolvent))
    }

    /// Propagate the clauses until a fixpoint. Returns a falsified clause, if there is one.
    fn propagate(&mut self) -> Option<ClauseIndex> {
        let mut changed = true;

        while changed {
            changed = false;

            for position in 0..self.clauses.len() {
                let clause = self.clauses[position];

                match self.state(clause) {
                    ClauseState::Satisfied | ClauseState::Open => {}
                    ClauseState::Falsified => return Some(clause),
                    ClauseState::Unit(literal) => {
                        self.assign(literal, Some(clause));
                        changed = true;
                    }
                }
            }
        }

        None
    }

    /// Derive a clause which is falsified by the decisions alone, by resolving the propagated
    /// literals out of `conflict` in reverse trail order.
    fn explain(&mut self, conflict: ClauseIndex) -> Result<ClauseIndex, KestrelError> {
        let mut literals = self.builder.clause(conflict).literals().to_vec();
        let mut antecedents = vec![conflict];

        for entry in self.trail.iter().rev() {
            let Some(reason) = entry.reason else {
                continue;
            };

            let Some(position) = literals.iter().position(|&literal| literal == !entry.literal)
            else {
                continue;
            };

            let _ = literals.swap_remove(position);
            for &literal in self.builder.clause(reason).literals() {
                if literal != entry.literal && !literals.contains(&literal) {
                    literals.push(literal);
                }
            }
            antecedents.push(reason);
        }

        if antecedents.len() == 1 {
            return Ok(conflict);
        }

        self.statistics.num_resolvents += 1;
        Ok(self.builder.add_resolvent(literals, antecedents)?)
    }

    fn state(&self, clause: ClauseIndex) -> ClauseState {
        let mut unassigned = None;
        let mut num_unassigned = 0;

        for &literal in self.builder.clause(clause).literals() {
            match self.value(literal) {
                Some(true) => return ClauseState::Satisfied,
                Some(false) => {}
                None => {
                    num_unassigned += 1;
                    unassigned = Some(literal);
                }
            }
        }

        match (num_unassigned, unassigned) {
            (0, _) => ClauseState::Falsified,
            (1, Some(literal)) => ClauseState::Unit(literal),
            _ => ClauseState::Open,
        }
    }

    fn value(&self, literal: Literal) -> Option<bool> {
        self.values[literal.variable().get() as usize - 1]
            .map(|value| value == literal.is_positive())
    }

    fn assign(&mut self, literal: Literal, reason: Option<ClauseIndex>) {
        self.values[literal.variable().get() as usize - 1] = Some(literal.is_positive());
        self.trail.push(TrailEntry { literal, reason });
    }

    fn backtrack(&mut self, trail_length: usize) {
        for entry in self.trail.drain(trail_length..) {
            self.values[entry.literal.variable().get() as usize - 1] = None;
        }
    }

    fn first_unassigned(&self) -> Option<Variable> {
        self.values
            .iter()
            .position(Option::is_none)
            .and_then(|index| Variable::new(index as u32 + 1))
    }
}

fn is_tautology(literals: &[Literal]) -> bool {
    literals
        .iter()
        .any(|&literal| literals.contains(&!literal))
}
