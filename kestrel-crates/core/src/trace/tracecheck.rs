use std::io::Write;

use tracecheck_format::writer::TraceWriter;
use tracecheck_format::Step;
use tracecheck_format::StepId;

use super::ClauseIndex;
use super::ResolutionTrace;
use super::ResolutionTraceBuilder;
use crate::basic_types::ContractViolation;
use crate::basic_types::Literal;
use crate::containers::HashMap;

impl ResolutionTrace {
    /// Convert the steps of a TraceCheck trace, for example as produced by an external SAT solver,
    /// into a [`ResolutionTrace`].
    ///
    /// The axioms are taken in the order in which they appear, and are followed by the resolvents
    /// up to and including the first empty clause. Any steps after that are dropped.
    pub fn from_tracecheck(
        steps: impl IntoIterator<Item = Step>,
    ) -> Result<ResolutionTrace, ContractViolation> {
        let (axioms, resolvents): (Vec<_>, Vec<_>) =
            steps.into_iter().partition(|step| step.is_axiom());

        let mut builder = ResolutionTraceBuilder::new();
        let mut indices: HashMap<StepId, ClauseIndex> = HashMap::default();

        for step in axioms {
            let index = builder.add_axiom(convert_literals(&step)?)?;
            if indices.insert(step.id, index).is_some() {
                return Err(malformed(format!("step {} is defined twice", step.id)));
            }

            if step.is_empty_clause() {
                // An empty input clause; it refutes the problem on its own.
                let _ = builder.add_resolvent([], [index])?;
                return builder.build();
            }
        }

        for step in resolvents {
            let antecedents = step
                .antecedents
                .iter()
                .map(|antecedent| {
                    indices.get(antecedent).copied().ok_or_else(|| {
                        malformed(format!(
                            "step {} refers to step {antecedent} which is not defined before it",
                            step.id
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let index = builder.add_resolvent(convert_literals(&step)?, antecedents)?;
            if indices.insert(step.id, index).is_some() {
                return Err(malformed(format!("step {} is defined twice", step.id)));
            }

            if step.is_empty_clause() {
                break;
            }
        }

        builder.build()
    }

    /// Write the trace in the TraceCheck format. Clause `c<i>` is given step id `i + 1`.
    pub fn write_tracecheck<W: Write>(&self, writer: &mut TraceWriter<W>) -> std::io::Result<()> {
        let mut ids: Vec<StepId> = Vec::with_capacity(self.size());

        for clause in self.clauses() {
            let literals = clause.literals().iter().map(|literal| literal.to_dimacs());

            let id = if clause.is_axiom() {
                writer.log_axiom(literals)?
            } else {
                let antecedents = clause
                    .antecedents()
                    .iter()
                    .map(|antecedent| ids[antecedent.get() as usize]);
                writer.log_resolvent(literals, antecedents)?
            };

            ids.push(id);
        }

        writer.flush()
    }
}

fn convert_literals(step: &Step) -> Result<Vec<Literal>, ContractViolation> {
    step.literals
        .iter()
        .map(|code| {
            Literal::from_dimacs(code.get())
                .ok_or_else(|| malformed(format!("literal {code} is out of range")))
        })
        .collect()
}

fn malformed(reason: String) -> ContractViolation {
    ContractViolation::MalformedBackendTrace(reason)
}
