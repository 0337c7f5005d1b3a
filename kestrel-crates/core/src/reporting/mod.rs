//! Observation of the milestones of a solving session.
//!
//! A [`Reporter`] is notified synchronously, on the solving thread, whenever a session reaches a
//! milestone. Every callback has an empty default body, so implementations only override the
//! milestones they are interested in. Callbacks receive their arguments by shared reference and
//! must not block or re-enter the session.
mod log_reporter;

pub use log_reporter::LogReporter;

use crate::translation::Logic;

/// Identifies the higher-order session a milestone belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HolStep {
    /// The nesting depth of the session; case splits are solved one level deeper.
    pub depth: usize,
    /// The number of refinements made by the session so far.
    pub iteration: usize,
}

/// An observer of the milestones of a solving session.
#[allow(unused_variables, reason = "default implementations ignore their arguments")]
pub trait Reporter<L: Logic> {
    /// Symmetry detection on the bounds has started.
    fn detecting_symmetries(&mut self, bounds: &L::Bounds) {}

    /// Symmetry detection has finished, and found the given symmetry classes.
    fn detected_symmetries(&mut self, classes: &[Vec<usize>]) {}

    /// Generation of the symmetry breaking predicate has started.
    fn generating_sbp(&mut self) {}

    /// The existentially quantified `decl` is replaced by the relation `skolem`. `context` holds
    /// the universally quantified declarations in whose scope `decl` occurs.
    fn skolemizing(&mut self, decl: &L::Decl, skolem: &L::Relation, context: &[L::Decl]) {}

    /// Optimisation of the bounds and formula (for example, breaking predicates) has started.
    fn optimizing_bounds_and_formula(&mut self) {}

    /// Translation of the formula to a boolean circuit has started.
    fn translating_to_boolean(&mut self, formula: &L::Formula, bounds: &L::Bounds) {}

    /// Translation of the boolean circuit to CNF has started.
    fn translating_to_cnf(&mut self) {}

    /// Conversion of the formula to negation normal form has started.
    fn converting_to_nnf(&mut self) {}

    /// The SAT back end was handed a CNF with the given dimensions.
    fn solving_cnf(&mut self, primary_variables: u32, variables: u32, clauses: usize) {}

    /// A higher-order session for `formula` has started.
    fn hol_loop_start(&mut self, step: HolStep, formula: &L::Formula, bounds: &L::Bounds) {}

    fn hol_candidate_found(&mut self, step: HolStep, candidate: &L::Instance) {}

    /// Verification of `candidate` has started; it is verified when `check` is unsatisfiable.
    fn hol_verifying_candidate(
        &mut self,
        step: HolStep,
        candidate: &L::Instance,
        check: &L::Formula,
        bounds: &L::Bounds,
    ) {
    }

    fn hol_candidate_verified(&mut self, step: HolStep, candidate: &L::Instance) {}

    fn hol_candidate_not_verified(
        &mut self,
        step: HolStep,
        candidate: &L::Instance,
        counterexample: &L::Instance,
    ) {
    }

    /// The search for the next candidate has started, under the additional `increment`.
    fn hol_finding_next_candidate(&mut self, step: HolStep, increment: &L::Formula) {}

    fn hol_split_start(&mut self, step: HolStep, formula: &L::Formula) {}

    fn hol_split_choice(&mut self, step: HolStep, choice: &L::Formula, bounds: &L::Bounds) {}

    fn hol_split_choice_sat(&mut self, step: HolStep, instance: &L::Instance) {}

    fn hol_split_choice_unsat(&mut self, step: HolStep) {}

    fn hol_fixpoint_start(&mut self, step: HolStep) {}

    /// The very first candidate search was unsatisfiable.
    fn hol_fixpoint_no_solution(&mut self, step: HolStep) {}

    fn hol_fixpoint_first_solution(&mut self, step: HolStep, instance: &L::Instance) {}

    fn hol_fixpoint_incrementing(&mut self, step: HolStep, increment: &L::Formula) {}

    /// The outcome of a candidate search after an increment; `None` when it was unsatisfiable.
    fn hol_fixpoint_incrementing_outcome(&mut self, step: HolStep, outcome: Option<&L::Instance>) {
    }
}

/// A [`Reporter`] which ignores every milestone.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopReporter;

impl<L: Logic> Reporter<L> for NoopReporter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Strings;

    impl Logic for Strings {
        type Formula = String;
        type Bounds = String;
        type Instance = String;
        type Decl = String;
        type Relation = String;
    }

    #[test]
    fn noop_reporter_has_no_observable_effect() {
        let mut reporter = NoopReporter;
        let reporter: &mut dyn Reporter<Strings> = &mut reporter;
        let formula = "some r".to_owned();
        let bounds = "r: [{}, {(a)}]".to_owned();
        let instance = "r = {(a)}".to_owned();
        let step = HolStep::default();

        reporter.detecting_symmetries(&bounds);
        reporter.detected_symmetries(&[vec![0, 1]]);
        reporter.generating_sbp();
        reporter.skolemizing(&formula, &formula, &[]);
        reporter.optimizing_bounds_and_formula();
        reporter.translating_to_boolean(&formula, &bounds);
        reporter.translating_to_cnf();
        reporter.converting_to_nnf();
        reporter.solving_cnf(1, 2, 3);
        reporter.hol_loop_start(step, &formula, &bounds);
        reporter.hol_candidate_found(step, &instance);
        reporter.hol_verifying_candidate(step, &instance, &formula, &bounds);
        reporter.hol_candidate_verified(step, &instance);
        reporter.hol_candidate_not_verified(step, &instance, &instance);
        reporter.hol_finding_next_candidate(step, &formula);
        reporter.hol_split_start(step, &formula);
        reporter.hol_split_choice(step, &formula, &bounds);
        reporter.hol_split_choice_sat(step, &instance);
        reporter.hol_split_choice_unsat(step);
        reporter.hol_fixpoint_start(step);
        reporter.hol_fixpoint_no_solution(step);
        reporter.hol_fixpoint_first_solution(step, &instance);
        reporter.hol_fixpoint_incrementing(step, &formula);
        reporter.hol_fixpoint_incrementing_outcome(step, Some(&instance));
        reporter.hol_fixpoint_incrementing_outcome(step, None);

        assert_eq!("some r", formula);
        assert_eq!("r = {(a)}", instance);
    }
}
