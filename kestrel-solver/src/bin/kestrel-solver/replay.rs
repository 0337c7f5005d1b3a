use kestrel_solver::core::basic_types::ContractViolation;
use kestrel_solver::core::basic_types::KestrelError;
use kestrel_solver::core::basic_types::Literal;
use kestrel_solver::core::sat::ResolutionProver;
use kestrel_solver::core::sat::SatBackend;
use kestrel_solver::core::sat::SatOutcome;
use kestrel_solver::core::termination::TerminationCondition;
use kestrel_solver::core::trace::ResolutionTrace;
use kestrel_solver::core::translation::Cnf;
use log::info;

/// A [`SatBackend`] which answers the first SAT call with a refutation that was computed ahead
/// of time, for example by an external solver. Every later call, such as the calls made while the
/// core is minimised, is answered by a [`ResolutionProver`].
#[derive(Debug)]
pub(crate) struct ReplayBackend {
    refutation: Option<ResolutionTrace>,
    prover: ResolutionProver,
}

impl ReplayBackend {
    pub(crate) fn new(refutation: Option<ResolutionTrace>) -> ReplayBackend {
        ReplayBackend {
            refutation,
            prover: ResolutionProver::new(),
        }
    }

    pub(crate) fn prover(&self) -> &ResolutionProver {
        &self.prover
    }
}

impl SatBackend for ReplayBackend {
    fn solve(
        &mut self,
        cnf: &Cnf,
        termination: &mut impl TerminationCondition,
    ) -> Result<SatOutcome, KestrelError> {
        match self.refutation.take() {
            Some(refutation) => {
                check_axioms(&refutation, cnf)?;
                info!(
                    "replaying a refutation of {} clauses",
                    refutation.size()
                );
                Ok(SatOutcome::Unsatisfiable(refutation))
            }
            None => self.prover.solve(cnf, termination),
        }
    }
}

/// The axioms of a refutation of `cnf` have to be the clauses of `cnf`, in order.
fn check_axioms(refutation: &ResolutionTrace, cnf: &Cnf) -> Result<(), ContractViolation> {
    if refutation.num_axioms() != cnf.num_clauses() {
        return Err(ContractViolation::MalformedBackendTrace(format!(
            "the trace has {} axioms, but the instance has {} clauses",
            refutation.num_axioms(),
            cnf.num_clauses()
        )));
    }

    for (axiom, clause) in refutation.clauses().zip(cnf.clauses()) {
        let mut literals = clause.to_vec();
        literals.sort_by_key(|literal| (literal.variable(), literal.is_positive()));
        literals.dedup();

        if axiom.literals() != literals.as_slice() {
            return Err(ContractViolation::MalformedBackendTrace(format!(
                "axiom {} is {}, but clause {} of the instance is {}",
                axiom.index(),
                render(axiom.literals()),
                axiom.index().get() + 1,
                render(clause)
            )));
        }
    }

    Ok(())
}

fn render(literals: &[Literal]) -> String {
    literals
        .iter()
        .map(|literal| literal.to_dimacs().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use kestrel_solver::core::termination::Indefinite;
    use kestrel_solver::core::trace::ResolutionTraceBuilder;

    use super::*;

    fn lit(code: i32) -> Literal {
        Literal::from_dimacs(code).unwrap()
    }

    fn contradiction() -> Cnf {
        let mut cnf = Cnf::new();
        cnf.add_clause([lit(1)]);
        cnf.add_clause([lit(-1)]);
        cnf
    }

    fn refutation(first: i32, second: i32) -> ResolutionTrace {
        let mut builder = ResolutionTraceBuilder::new();
        let a = builder.add_axiom([lit(first)]).unwrap();
        let b = builder.add_axiom([lit(second)]).unwrap();
        let _ = builder.add_resolvent([], [a, b]).unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn first_call_is_replayed() {
        let mut backend = ReplayBackend::new(Some(refutation(1, -1)));

        let first = backend.solve(&contradiction(), &mut Indefinite).unwrap();
        assert!(matches!(first, SatOutcome::Unsatisfiable(trace) if trace == refutation(1, -1)));

        let mut satisfiable = Cnf::new();
        satisfiable.add_clause([lit(1)]);
        let second = backend.solve(&satisfiable, &mut Indefinite).unwrap();
        assert!(matches!(second, SatOutcome::Satisfiable(_)));
    }

    #[test]
    fn refutation_of_another_problem_is_rejected() {
        let mut backend = ReplayBackend::new(Some(refutation(-1, 1)));

        let result = backend.solve(&contradiction(), &mut Indefinite);
        assert!(matches!(
            result,
            Err(KestrelError::ContractViolation(
                ContractViolation::MalformedBackendTrace(_)
            ))
        ));
    }
}
