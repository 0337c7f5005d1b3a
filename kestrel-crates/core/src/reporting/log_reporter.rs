use log::debug;
use log::info;

use super::HolStep;
use super::Reporter;
use crate::translation::Logic;

/// A [`Reporter`] which forwards every milestone to the [`log`] facade. Translation milestones
/// are logged at the debug level, solving and higher-order milestones at the info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogReporter;

impl<L: Logic> Reporter<L> for LogReporter {
    fn detecting_symmetries(&mut self, _bounds: &L::Bounds) {
        debug!("detecting symmetries");
    }

    fn detected_symmetries(&mut self, classes: &[Vec<usize>]) {
        debug!("detected {} symmetry classes", classes.len());
    }

    fn generating_sbp(&mut self) {
        debug!("generating the symmetry breaking predicate");
    }

    fn skolemizing(&mut self, decl: &L::Decl, skolem: &L::Relation, context: &[L::Decl]) {
        debug!("skolemizing {decl:?} as {skolem:?} in context {context:?}");
    }

    fn optimizing_bounds_and_formula(&mut self) {
        debug!("optimizing bounds and formula");
    }

    fn translating_to_boolean(&mut self, formula: &L::Formula, _bounds: &L::Bounds) {
        debug!("translating {formula:?} to a boolean circuit");
    }

    fn translating_to_cnf(&mut self) {
        debug!("translating to CNF");
    }

    fn converting_to_nnf(&mut self) {
        debug!("converting to negation normal form");
    }

    fn solving_cnf(&mut self, primary_variables: u32, variables: u32, clauses: usize) {
        info!(
            "solving CNF with {primary_variables} primary variables, {variables} variables and {clauses} clauses"
        );
    }

    fn hol_loop_start(&mut self, step: HolStep, formula: &L::Formula, _bounds: &L::Bounds) {
        info!("[{}] starting higher-order loop for {formula:?}", step.depth);
    }

    fn hol_candidate_found(&mut self, step: HolStep, candidate: &L::Instance) {
        info!(
            "[{}:{}] found candidate {candidate:?}",
            step.depth, step.iteration
        );
    }

    fn hol_verifying_candidate(
        &mut self,
        step: HolStep,
        _candidate: &L::Instance,
        check: &L::Formula,
        _bounds: &L::Bounds,
    ) {
        info!(
            "[{}:{}] verifying candidate against {check:?}",
            step.depth, step.iteration
        );
    }

    fn hol_candidate_verified(&mut self, step: HolStep, _candidate: &L::Instance) {
        info!("[{}:{}] candidate verified", step.depth, step.iteration);
    }

    fn hol_candidate_not_verified(
        &mut self,
        step: HolStep,
        _candidate: &L::Instance,
        counterexample: &L::Instance,
    ) {
        info!(
            "[{}:{}] candidate refuted by {counterexample:?}",
            step.depth, step.iteration
        );
    }

    fn hol_finding_next_candidate(&mut self, step: HolStep, increment: &L::Formula) {
        info!(
            "[{}:{}] searching the next candidate under {increment:?}",
            step.depth, step.iteration
        );
    }

    fn hol_split_start(&mut self, step: HolStep, formula: &L::Formula) {
        info!("[{}] splitting {formula:?}", step.depth);
    }

    fn hol_split_choice(&mut self, step: HolStep, choice: &L::Formula, _bounds: &L::Bounds) {
        info!("[{}] trying choice {choice:?}", step.depth);
    }

    fn hol_split_choice_sat(&mut self, step: HolStep, _instance: &L::Instance) {
        info!("[{}] choice is satisfiable", step.depth);
    }

    fn hol_split_choice_unsat(&mut self, step: HolStep) {
        info!("[{}] choice is unsatisfiable", step.depth);
    }

    fn hol_fixpoint_start(&mut self, step: HolStep) {
        debug!("[{}] starting fixpoint loop", step.depth);
    }

    fn hol_fixpoint_no_solution(&mut self, step: HolStep) {
        info!("[{}] no candidate exists", step.depth);
    }

    fn hol_fixpoint_first_solution(&mut self, step: HolStep, _instance: &L::Instance) {
        debug!("[{}] found the first candidate", step.depth);
    }

    fn hol_fixpoint_incrementing(&mut self, step: HolStep, _increment: &L::Formula) {
        debug!("[{}:{}] incrementing", step.depth, step.iteration);
    }

    fn hol_fixpoint_incrementing_outcome(&mut self, step: HolStep, outcome: Option<&L::Instance>) {
        match outcome {
            Some(_) => debug!("[{}:{}] increment is satisfiable", step.depth, step.iteration),
            None => debug!("[{}:{}] increment is unsatisfiable", step.depth, step.iteration),
        }
    }
}
