//! Solving annotated DIMACS instances with the [`Solver`](kestrel_solver::Solver).
//!
//! A DIMACS instance is already in CNF, so translating it amounts to recording which variables
//! are the roots of its top-level constraints. When the file has no root annotations, every
//! clause `C` becomes a constraint of its own: it is guarded by a fresh selector variable `s` as
//! `C \/ !s`, and `s` is asserted by a unit clause.
use std::fmt::Display;
use std::fmt::Formatter;
use std::rc::Rc;

use kestrel_solver::core::basic_types::Assignment;
use kestrel_solver::core::basic_types::Literal;
use kestrel_solver::core::basic_types::TranslationFailure;
use kestrel_solver::core::basic_types::Variable;
use kestrel_solver::core::containers::HashSet;
use kestrel_solver::core::reporting::Reporter;
use kestrel_solver::core::translation::Cnf;
use kestrel_solver::core::translation::Logic;
use kestrel_solver::core::translation::Origin;
use kestrel_solver::core::translation::Translation;
use kestrel_solver::core::translation::TranslationLog;
use kestrel_solver::core::translation::Translator;
use log::warn;

use crate::dimacs::AnnotatedCnf;

/// DIMACS instances, viewed as a modelling language.
#[derive(Debug)]
pub(crate) struct Dimacs;

impl Logic for Dimacs {
    type Formula = Constraint;
    type Bounds = ();
    type Instance = Vec<Literal>;
    type Decl = ();
    type Relation = ();
}

#[derive(Clone, Debug)]
pub(crate) enum Constraint {
    /// A complete instance.
    Instance(Rc<AnnotatedCnf>),
    /// A top-level constraint of an instance, identified by its root variable.
    Root { variable: Variable, name: String },
}

impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Constraint::Instance(instance) => write!(
                f,
                "instance with {} variables and {} clauses",
                instance.num_variables,
                instance.clauses.len()
            ),
            Constraint::Root { variable, name } => write!(f, "{} {name}", variable.get()),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct DimacsTranslator;

impl Translator<Dimacs> for DimacsTranslator {
    fn translate(
        &mut self,
        formula: &Constraint,
        _bounds: &(),
        reporter: &mut dyn Reporter<Dimacs>,
    ) -> Result<Translation<Dimacs>, TranslationFailure> {
        let Constraint::Instance(instance) = formula else {
            return Err(TranslationFailure::new(
                "only complete instances can be translated",
            ));
        };

        reporter.translating_to_cnf();

        let mut cnf = Cnf::with_variables(instance.num_variables);
        let mut log = TranslationLog::new(instance.num_variables);

        if instance.roots.is_empty() {
            for (index, clause) in instance.clauses.iter().enumerate() {
                let selector = u32::try_from(index)
                    .ok()
                    .and_then(|index| instance.num_variables.checked_add(index + 1))
                    .and_then(Variable::new)
                    .ok_or_else(|| TranslationFailure::new("too many clauses to guard"))?;

                cnf.add_clause([selector.positive()]);
                cnf.add_clause(
                    convert_clause(clause)?
                        .into_iter()
                        .chain([selector.negative()]),
                );

                log.record(
                    selector,
                    Origin::Root(Constraint::Root {
                        variable: selector,
                        name: format!("clause {}", index + 1),
                    }),
                );
            }
        } else {
            let root_variables = instance
                .roots
                .iter()
                .map(|root| root.variable)
                .collect::<HashSet<u32>>();

            for clause in instance.clauses.iter() {
                check_root_occurrences(clause, &root_variables)?;
                cnf.add_clause(convert_clause(clause)?);
            }

            for root in instance.roots.iter() {
                let variable = Variable::new(root.variable)
                    .ok_or_else(|| TranslationFailure::new("a root variable cannot be 0"))?;

                let is_asserted = instance.clauses.iter().any(|clause| {
                    matches!(
                        clause.as_slice(),
                        [unit] if unit.get() > 0 && unit.unsigned_abs().get() == root.variable
                    )
                });
                if !is_asserted {
                    warn!(
                        "root {variable} is not asserted by a unit clause and will never be part of a core"
                    );
                }

                let name = root
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("root {}", root.variable));
                log.record(variable, Origin::Root(Constraint::Root { variable, name }));
            }
        }

        Ok(Translation::new(cnf, log))
    }

    fn interpret(&self, translation: &Translation<Dimacs>, assignment: &Assignment) -> Vec<Literal> {
        (1..=translation.log().num_primary_variables())
            .filter_map(Variable::new)
            .map(|variable| Literal::new(variable, assignment.value(variable) == Some(true)))
            .collect()
    }
}

/// A root variable may only occur in clauses of which it is the largest variable; otherwise the
/// clauses of one root would depend on another root.
fn check_root_occurrences(
    clause: &[std::num::NonZeroI32],
    root_variables: &HashSet<u32>,
) -> Result<(), TranslationFailure> {
    let Some(largest) = clause.iter().map(|code| code.unsigned_abs().get()).max() else {
        return Ok(());
    };

    match clause
        .iter()
        .map(|code| code.unsigned_abs().get())
        .find(|variable| *variable != largest && root_variables.contains(variable))
    {
        Some(root) => Err(TranslationFailure::new(format!(
            "root variable {root} occurs in a clause whose largest variable is {largest}"
        ))),
        None => Ok(()),
    }
}

fn convert_clause(clause: &[std::num::NonZeroI32]) -> Result<Vec<Literal>, TranslationFailure> {
    clause
        .iter()
        .map(|code| {
            Literal::from_dimacs(code.get())
                .ok_or_else(|| TranslationFailure::new(format!("{code} is not a valid literal")))
        })
        .collect()
}
