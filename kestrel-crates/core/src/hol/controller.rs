use std::marker::PhantomData;
use std::ops::ControlFlow;

use log::debug;
use log::info;

use super::FirstOrderOutcome;
use super::FirstOrderPipeline;
use super::HolOracle;
use super::Refinement;
use super::SplitChoice;
use crate::basic_types::ContractViolation;
use crate::basic_types::KestrelError;
use crate::basic_types::Phase;
use crate::create_statistics_struct;
use crate::reporting::HolStep;
use crate::reporting::Reporter;
use crate::termination::TerminationCondition;
use crate::translation::Logic;

create_statistics_struct!(
    /// The statistics of the higher-order refinement loop.
    HolStatistics {
        /// The number of candidate problems which were solved.
        num_candidate_searches: u64,
        /// The number of candidates which were checked against the full semantics.
        num_verifications: u64,
        /// The number of increments which were added to candidate problems.
        num_increments: u64,
        /// The number of case splits.
        num_splits: u64,
        /// The deepest nesting of case splits.
        max_depth: usize,
});

/// The states of a single session of the refinement loop. A session is done when a transition
/// breaks with its outcome.
enum State<L: Logic> {
    CandidateSearch,
    Verifying(L::Instance),
    Fixpoint(L::Formula),
    Splitting(Vec<SplitChoice<L>>),
}

/// Drives the counterexample guided refinement loop for formulas with higher-order
/// quantification.
///
/// Every first-order problem along the way is solved by the pipeline. The controller never
/// bounds the number of refinements itself: the termination condition is polled before every
/// transition, and [`TerminationCondition::iteration_has_been_made`] is called for every increment
/// so that an iteration budget can be imposed.
///
/// Only the core which ends up in the outcome is minimised: verification problems and all but
/// the last choice of a split are decided without minimisation.
#[derive(Debug)]
pub(crate) struct HolController<'a, L, O, P> {
    oracle: &'a O,
    pipeline: &'a mut P,
    statistics: HolStatistics,
    logic: PhantomData<fn() -> L>,
}

impl<'a, L: Logic, O: HolOracle<L>, P: FirstOrderPipeline<L>> HolController<'a, L, O, P> {
    pub(crate) fn new(oracle: &'a O, pipeline: &'a mut P) -> Self {
        HolController {
            oracle,
            pipeline,
            statistics: HolStatistics::default(),
            logic: PhantomData,
        }
    }

    pub(crate) fn statistics(&self) -> HolStatistics {
        self.statistics
    }

    /// Solve `formula`. A formula without higher-order quantification is handed to the pipeline
    /// directly, without reporting any higher-order milestone.
    pub(crate) fn solve(
        &mut self,
        formula: &L::Formula,
        bounds: &L::Bounds,
        reporter: &mut dyn Reporter<L>,
        termination: &mut impl TerminationCondition,
    ) -> Result<FirstOrderOutcome<L>, KestrelError> {
        self.solve_at_depth(formula, bounds, 0, true, reporter, termination)
    }

    fn solve_at_depth(
        &mut self,
        formula: &L::Formula,
        bounds: &L::Bounds,
        depth: usize,
        minimise: bool,
        reporter: &mut dyn Reporter<L>,
        termination: &mut impl TerminationCondition,
    ) -> Result<FirstOrderOutcome<L>, KestrelError> {
        if !self.oracle.is_higher_order(formula) {
            return self
                .pipeline
                .solve_first_order(formula, bounds, minimise, reporter, termination);
        }

        self.statistics.max_depth = self.statistics.max_depth.max(depth);

        let mut step = HolStep {
            depth,
            iteration: 0,
        };
        let mut increments = Vec::new();

        reporter.hol_loop_start(step, formula, bounds);
        reporter.hol_fixpoint_start(step);

        let mut state = State::CandidateSearch;
        loop {
            if termination.should_stop() {
                return Err(KestrelError::ResourceExhausted {
                    phase: Phase::Refinement,
                });
            }

            match self.transition(
                state,
                formula,
                bounds,
                &mut step,
                &mut increments,
                minimise,
                reporter,
                termination,
            )? {
                ControlFlow::Continue(next) => state = next,
                ControlFlow::Break(outcome) => return Ok(outcome),
            }
        }
    }

    #[allow(
        clippy::too_many_arguments,
        reason = "the session state is threaded through explicitly"
    )]
    fn transition(
        &mut self,
        state: State<L>,
        formula: &L::Formula,
        bounds: &L::Bounds,
        step: &mut HolStep,
        increments: &mut Vec<L::Formula>,
        minimise: bool,
        reporter: &mut dyn Reporter<L>,
        termination: &mut impl TerminationCondition,
    ) -> Result<ControlFlow<FirstOrderOutcome<L>, State<L>>, KestrelError> {
        let next = match state {
            State::CandidateSearch => {
                self.statistics.num_candidate_searches += 1;

                let (problem, problem_bounds) =
                    self.oracle
                        .candidate_problem(formula, bounds, increments.as_slice())?;
                let outcome = self.pipeline.solve_first_order(
                    &problem,
                    &problem_bounds,
                    minimise,
                    reporter,
                    termination,
                )?;

                match outcome {
                    FirstOrderOutcome::Unsatisfiable(core) => {
                        if increments.is_empty() {
                            reporter.hol_fixpoint_no_solution(*step);
                        } else {
                            reporter.hol_fixpoint_incrementing_outcome(*step, None);
                        }
                        ControlFlow::Break(FirstOrderOutcome::Unsatisfiable(core))
                    }
                    FirstOrderOutcome::Satisfiable(candidate) => {
                        if increments.is_empty() {
                            reporter.hol_fixpoint_first_solution(*step, &candidate);
                        } else {
                            reporter.hol_fixpoint_incrementing_outcome(*step, Some(&candidate));
                        }
                        reporter.hol_candidate_found(*step, &candidate);
                        ControlFlow::Continue(State::Verifying(candidate))
                    }
                }
            }

            State::Verifying(candidate) => {
                self.statistics.num_verifications += 1;

                let (check, check_bounds) =
                    self.oracle
                        .verification_problem(formula, bounds, &candidate)?;
                reporter.hol_verifying_candidate(*step, &candidate, &check, &check_bounds);

                match self.pipeline.solve_first_order(
                    &check,
                    &check_bounds,
                    false,
                    reporter,
                    termination,
                )? {
                    FirstOrderOutcome::Unsatisfiable(_) => {
                        reporter.hol_candidate_verified(*step, &candidate);
                        ControlFlow::Break(FirstOrderOutcome::Satisfiable(candidate))
                    }
                    FirstOrderOutcome::Satisfiable(counterexample) => {
                        reporter.hol_candidate_not_verified(*step, &candidate, &counterexample);

                        let refined = match self
                            .oracle
                            .refine(formula, bounds, &candidate, &counterexample)?
                        {
                            Refinement::Increment(increment) => State::Fixpoint(increment),
                            Refinement::Split(choices) => State::Splitting(choices),
                        };
                        ControlFlow::Continue(refined)
                    }
                }
            }

            State::Fixpoint(increment) => {
                self.statistics.num_increments += 1;

                reporter.hol_finding_next_candidate(*step, &increment);
                reporter.hol_fixpoint_incrementing(*step, &increment);

                increments.push(increment);
                step.iteration += 1;
                termination.iteration_has_been_made();

                debug!(
                    "strengthened the candidate problem at depth {} with increment {}",
                    step.depth, step.iteration
                );

                ControlFlow::Continue(State::CandidateSearch)
            }

            State::Splitting(choices) => {
                if choices.is_empty() {
                    return Err(ContractViolation::EmptySplit.into());
                }

                self.statistics.num_splits += 1;
                reporter.hol_split_start(*step, formula);
                info!("splitting into {} cases at depth {}", choices.len(), step.depth);

                let num_choices = choices.len();
                let mut last_core = None;
                for (position, choice) in choices.into_iter().enumerate() {
                    reporter.hol_split_choice(*step, &choice.formula, &choice.bounds);

                    match self.solve_at_depth(
                        &choice.formula,
                        &choice.bounds,
                        step.depth + 1,
                        minimise && position + 1 == num_choices,
                        reporter,
                        termination,
                    )? {
                        FirstOrderOutcome::Satisfiable(instance) => {
                            reporter.hol_split_choice_sat(*step, &instance);
                            return Ok(ControlFlow::Break(FirstOrderOutcome::Satisfiable(
                                instance,
                            )));
                        }
                        FirstOrderOutcome::Unsatisfiable(core) => {
                            reporter.hol_split_choice_unsat(*step);
                            last_core = Some(core);
                        }
                    }
                }

                ControlFlow::Break(FirstOrderOutcome::Unsatisfiable(
                    last_core.ok_or(ContractViolation::EmptySplit)?,
                ))
            }
        };

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use crate::api::UnsatCore;
    use crate::basic_types::Literal;
    use crate::basic_types::TranslationFailure;
    use crate::termination::Indefinite;
    use crate::termination::IterationBudget;
    use crate::test_helpers::lit;
    use crate::test_helpers::root_log;
    use crate::test_helpers::Names;
    use crate::trace::ResolutionTraceBuilder;

    #[derive(Clone, Debug)]
    enum Response {
        Sat(Vec<i32>),
        Unsat,
    }

    /// Answers first-order problems from a script, and records which problems were solved.
    #[derive(Debug, Default)]
    struct ScriptedPipeline {
        script: VecDeque<Response>,
        fallback: Option<Response>,
        solved: Vec<&'static str>,
        minimised: Vec<&'static str>,
    }

    impl ScriptedPipeline {
        fn new(script: impl IntoIterator<Item = Response>) -> ScriptedPipeline {
            ScriptedPipeline {
                script: script.into_iter().collect(),
                ..Default::default()
            }
        }
    }

    fn refutation() -> UnsatCore<Names> {
        let mut builder = ResolutionTraceBuilder::new();
        let positive = builder.add_axiom([lit(1)]).unwrap();
        let negative = builder.add_axiom([lit(-1)]).unwrap();
        let _ = builder.add_resolvent([], [positive, negative]).unwrap();

        UnsatCore::new(builder.build().unwrap(), &root_log(&[1])).unwrap()
    }

    impl FirstOrderPipeline<Names> for ScriptedPipeline {
        fn solve_first_order(
            &mut self,
            formula: &&'static str,
            _bounds: &(),
            minimise: bool,
            _reporter: &mut dyn Reporter<Names>,
            termination: &mut impl TerminationCondition,
        ) -> Result<FirstOrderOutcome<Names>, KestrelError> {
            if termination.should_stop() {
                return Err(KestrelError::ResourceExhausted {
                    phase: Phase::Solving,
                });
            }

            self.solved.push(*formula);
            if minimise {
                self.minimised.push(*formula);
            }
            let response = self
                .script
                .pop_front()
                .or_else(|| self.fallback.clone())
                .expect("the script ran out of responses");

            Ok(match response {
                Response::Sat(codes) => {
                    FirstOrderOutcome::Satisfiable(codes.into_iter().map(lit).collect())
                }
                Response::Unsat => FirstOrderOutcome::Unsatisfiable(refutation()),
            })
        }
    }

    /// Treats every formula starting with "hol" as higher order, and refines from a script.
    #[derive(Debug, Default)]
    struct ScriptedOracle {
        refinements: RefCell<VecDeque<Refinement<Names>>>,
        increments_seen: RefCell<Vec<Vec<&'static str>>>,
    }

    impl ScriptedOracle {
        fn new(refinements: impl IntoIterator<Item = Refinement<Names>>) -> ScriptedOracle {
            ScriptedOracle {
                refinements: RefCell::new(refinements.into_iter().collect()),
                ..Default::default()
            }
        }
    }

    impl HolOracle<Names> for ScriptedOracle {
        fn is_higher_order(&self, formula: &&'static str) -> bool {
            formula.starts_with("hol")
        }

        fn candidate_problem(
            &self,
            _formula: &&'static str,
            _bounds: &(),
            increments: &[&'static str],
        ) -> Result<(&'static str, ()), TranslationFailure> {
            self.increments_seen.borrow_mut().push(increments.to_vec());
            Ok(("candidate", ()))
        }

        fn verification_problem(
            &self,
            _formula: &&'static str,
            _bounds: &(),
            _candidate: &Vec<Literal>,
        ) -> Result<(&'static str, ()), TranslationFailure> {
            Ok(("check", ()))
        }

        fn refine(
            &self,
            _formula: &&'static str,
            _bounds: &(),
            _candidate: &Vec<Literal>,
            _counterexample: &Vec<Literal>,
        ) -> Result<Refinement<Names>, TranslationFailure> {
            Ok(self
                .refinements
                .borrow_mut()
                .pop_front()
                .unwrap_or(Refinement::Increment("exclude")))
        }
    }

    /// Records the names of the higher-order milestones.
    #[derive(Debug, Default)]
    struct Milestones(Vec<&'static str>);

    impl Reporter<Names> for Milestones {
        fn hol_loop_start(&mut self, _: HolStep, _: &&'static str, _: &()) {
            self.0.push("loop start");
        }

        fn hol_candidate_found(&mut self, _: HolStep, _: &Vec<Literal>) {
            self.0.push("candidate found");
        }

        fn hol_verifying_candidate(
            &mut self,
            _: HolStep,
            _: &Vec<Literal>,
            _: &&'static str,
            _: &(),
        ) {
            self.0.push("verifying");
        }

        fn hol_candidate_verified(&mut self, _: HolStep, _: &Vec<Literal>) {
            self.0.push("verified");
        }

        fn hol_candidate_not_verified(&mut self, _: HolStep, _: &Vec<Literal>, _: &Vec<Literal>) {
            self.0.push("refuted");
        }

        fn hol_finding_next_candidate(&mut self, _: HolStep, _: &&'static str) {
            self.0.push("finding next candidate");
        }

        fn hol_split_start(&mut self, _: HolStep, _: &&'static str) {
            self.0.push("split start");
        }

        fn hol_split_choice(&mut self, _: HolStep, _: &&'static str, _: &()) {
            self.0.push("split choice");
        }

        fn hol_split_choice_sat(&mut self, _: HolStep, _: &Vec<Literal>) {
            self.0.push("choice sat");
        }

        fn hol_split_choice_unsat(&mut self, _: HolStep) {
            self.0.push("choice unsat");
        }

        fn hol_fixpoint_start(&mut self, _: HolStep) {
            self.0.push("fixpoint start");
        }

        fn hol_fixpoint_no_solution(&mut self, _: HolStep) {
            self.0.push("no solution");
        }

        fn hol_fixpoint_first_solution(&mut self, _: HolStep, _: &Vec<Literal>) {
            self.0.push("first solution");
        }

        fn hol_fixpoint_incrementing(&mut self, _: HolStep, _: &&'static str) {
            self.0.push("incrementing");
        }

        fn hol_fixpoint_incrementing_outcome(&mut self, _: HolStep, outcome: Option<&Vec<Literal>>) {
            self.0.push(if outcome.is_some() {
                "incrementing outcome sat"
            } else {
                "incrementing outcome unsat"
            });
        }
    }

    fn run(
        formula: &'static str,
        oracle: &ScriptedOracle,
        pipeline: &mut ScriptedPipeline,
        termination: &mut impl TerminationCondition,
    ) -> (Result<FirstOrderOutcome<Names>, KestrelError>, Vec<&'static str>) {
        let mut milestones = Milestones::default();
        let mut controller = HolController::<Names, _, _>::new(oracle, pipeline);
        let result = controller.solve(&formula, &(), &mut milestones, termination);
        (result, milestones.0)
    }

    #[test]
    fn first_order_formulas_bypass_the_loop() {
        let oracle = ScriptedOracle::default();
        let mut pipeline = ScriptedPipeline::new([Response::Sat(vec![1])]);

        let (result, milestones) = run("plain", &oracle, &mut pipeline, &mut Indefinite);

        assert!(matches!(result, Ok(FirstOrderOutcome::Satisfiable(_))));
        assert!(milestones.is_empty());
        assert_eq!(vec!["plain"], pipeline.solved);
        assert_eq!(vec!["plain"], pipeline.minimised);
        assert!(oracle.increments_seen.borrow().is_empty());
    }

    #[test]
    fn verified_first_candidate_is_the_solution() {
        let oracle = ScriptedOracle::default();
        let mut pipeline = ScriptedPipeline::new([Response::Sat(vec![1, -2]), Response::Unsat]);

        let (result, milestones) = run("hol", &oracle, &mut pipeline, &mut Indefinite);

        match result {
            Ok(FirstOrderOutcome::Satisfiable(instance)) => {
                assert_eq!(vec![lit(1), lit(-2)], instance)
            }
            other => panic!("expected a solution, got {other:?}"),
        }
        assert_eq!(
            vec![
                "loop start",
                "fixpoint start",
                "first solution",
                "candidate found",
                "verifying",
                "verified",
            ],
            milestones
        );
        assert_eq!(vec!["candidate", "check"], pipeline.solved);
        assert_eq!(vec!["candidate"], pipeline.minimised);
    }

    #[test]
    fn unsatisfiable_candidate_problem_ends_the_loop() {
        let oracle = ScriptedOracle::default();
        let mut pipeline = ScriptedPipeline::new([Response::Unsat]);

        let (result, milestones) = run("hol", &oracle, &mut pipeline, &mut Indefinite);

        assert!(matches!(result, Ok(FirstOrderOutcome::Unsatisfiable(_))));
        assert_eq!(vec!["loop start", "fixpoint start", "no solution"], milestones);
    }

    #[test]
    fn refuted_candidates_strengthen_the_candidate_problem() {
        let oracle = ScriptedOracle::new([
            Refinement::Increment("first"),
            Refinement::Increment("second"),
        ]);
        let mut pipeline = ScriptedPipeline::new([
            Response::Sat(vec![1]),
            Response::Sat(vec![2]),
            Response::Sat(vec![-1]),
            Response::Sat(vec![2]),
            Response::Unsat,
        ]);

        let (result, milestones) = run("hol", &oracle, &mut pipeline, &mut Indefinite);

        assert!(matches!(result, Ok(FirstOrderOutcome::Unsatisfiable(_))));
        assert_eq!(
            vec![
                vec![],
                vec!["first"],
                vec!["first", "second"],
            ],
            *oracle.increments_seen.borrow()
        );
        assert_eq!(
            vec![
                "loop start",
                "fixpoint start",
                "first solution",
                "candidate found",
                "verifying",
                "refuted",
                "finding next candidate",
                "incrementing",
                "incrementing outcome sat",
                "candidate found",
                "verifying",
                "refuted",
                "finding next candidate",
                "incrementing",
                "incrementing outcome unsat",
            ],
            milestones
        );
    }

    #[test]
    fn first_satisfiable_split_choice_is_the_solution() {
        let oracle = ScriptedOracle::new([Refinement::Split(vec![
            SplitChoice {
                formula: "left",
                bounds: (),
            },
            SplitChoice {
                formula: "right",
                bounds: (),
            },
            SplitChoice {
                formula: "never",
                bounds: (),
            },
        ])]);
        let mut pipeline = ScriptedPipeline::new([
            Response::Sat(vec![1]),
            Response::Sat(vec![2]),
            Response::Unsat,
            Response::Sat(vec![3]),
        ]);

        let (result, milestones) = run("hol", &oracle, &mut pipeline, &mut Indefinite);

        match result {
            Ok(FirstOrderOutcome::Satisfiable(instance)) => assert_eq!(vec![lit(3)], instance),
            other => panic!("expected a solution, got {other:?}"),
        }
        assert_eq!(vec!["candidate", "check", "left", "right"], pipeline.solved);
        assert_eq!(
            vec![
                "split start",
                "split choice",
                "choice unsat",
                "split choice",
                "choice sat",
            ],
            milestones[6..]
        );
    }

    #[test]
    fn nested_sessions_are_one_level_deeper() {
        let oracle = ScriptedOracle::new([Refinement::Split(vec![SplitChoice {
            formula: "hol inner",
            bounds: (),
        }])]);
        let mut pipeline = ScriptedPipeline::new([
            Response::Sat(vec![1]),
            Response::Sat(vec![2]),
            Response::Sat(vec![3]),
            Response::Unsat,
        ]);

        let mut controller = HolController::<Names, _, _>::new(&oracle, &mut pipeline);
        let result = controller.solve(&"hol outer", &(), &mut Milestones::default(), &mut Indefinite);

        assert!(matches!(result, Ok(FirstOrderOutcome::Satisfiable(_))));
        assert_eq!(1, controller.statistics().max_depth);
        assert_eq!(1, controller.statistics().num_splits);
        assert_eq!(2, controller.statistics().num_verifications);
    }

    #[test]
    fn unsatisfiable_split_choices_make_the_formula_unsatisfiable() {
        let oracle = ScriptedOracle::new([Refinement::Split(vec![
            SplitChoice {
                formula: "left",
                bounds: (),
            },
            SplitChoice {
                formula: "right",
                bounds: (),
            },
        ])]);
        let mut pipeline = ScriptedPipeline::new([
            Response::Sat(vec![1]),
            Response::Sat(vec![2]),
            Response::Unsat,
            Response::Unsat,
        ]);

        let (result, _) = run("hol", &oracle, &mut pipeline, &mut Indefinite);

        assert!(matches!(result, Ok(FirstOrderOutcome::Unsatisfiable(_))));
        assert_eq!(vec!["candidate", "right"], pipeline.minimised);
    }

    #[test]
    fn cores_of_earlier_split_choices_are_not_minimised() {
        let oracle = ScriptedOracle::new([Refinement::Split(vec![
            SplitChoice {
                formula: "hol inner",
                bounds: (),
            },
            SplitChoice {
                formula: "last",
                bounds: (),
            },
        ])]);
        let mut pipeline = ScriptedPipeline::new([
            Response::Sat(vec![1]),
            Response::Sat(vec![2]),
            Response::Unsat,
            Response::Unsat,
        ]);

        let (result, _) = run("hol", &oracle, &mut pipeline, &mut Indefinite);

        assert!(matches!(result, Ok(FirstOrderOutcome::Unsatisfiable(_))));
        assert_eq!(vec!["candidate", "check", "candidate", "last"], pipeline.solved);
        assert_eq!(vec!["candidate", "last"], pipeline.minimised);
    }

    #[test]
    fn empty_split_is_a_contract_violation() {
        let oracle = ScriptedOracle::new([Refinement::Split(vec![])]);
        let mut pipeline = ScriptedPipeline::new([Response::Sat(vec![1]), Response::Sat(vec![2])]);

        let (result, _) = run("hol", &oracle, &mut pipeline, &mut Indefinite);

        assert!(matches!(
            result,
            Err(KestrelError::ContractViolation(ContractViolation::EmptySplit))
        ));
    }

    #[test]
    fn refinement_without_fixpoint_is_stopped_by_an_iteration_budget() {
        let oracle = ScriptedOracle::default();
        let mut pipeline = ScriptedPipeline {
            fallback: Some(Response::Sat(vec![1])),
            ..Default::default()
        };
        let mut budget = IterationBudget::new(3).unwrap();

        let (result, _) = run("hol", &oracle, &mut pipeline, &mut budget);

        assert!(matches!(
            result,
            Err(KestrelError::ResourceExhausted {
                phase: Phase::Refinement
            })
        ));
        assert_eq!(3, oracle.increments_seen.borrow().len());
    }
}
