use super::TerminationCondition;

/// A [`TerminationCondition`] which triggers as soon as either of its parts triggers. Iterations
/// are counted by both parts.
#[derive(Clone, Copy, Debug)]
pub struct Combinator<First, Second> {
    first: First,
    second: Second,
}

impl<First, Second> Combinator<First, Second> {
    pub fn new(first: First, second: Second) -> Self {
        Combinator { first, second }
    }
}

impl<First: TerminationCondition, Second: TerminationCondition> TerminationCondition
    for Combinator<First, Second>
{
    fn should_stop(&mut self) -> bool {
        // Both parts are polled, so stateful conditions observe every poll.
        let first = self.first.should_stop();
        let second = self.second.should_stop();
        first || second
    }

    fn iteration_has_been_made(&mut self) {
        self.first.iteration_has_been_made();
        self.second.iteration_has_been_made();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::termination::Indefinite;
    use crate::termination::IterationBudget;

    #[test]
    fn iterations_reach_both_conditions() {
        let mut combined = Combinator::new(Indefinite, IterationBudget::new(1).unwrap());

        assert!(!combined.should_stop());
        combined.iteration_has_been_made();
        assert!(combined.should_stop());
    }

    #[test]
    fn absent_condition_never_triggers() {
        let mut combined = Combinator::new(Indefinite, None::<IterationBudget>);

        combined.iteration_has_been_made();
        assert!(!combined.should_stop());
    }
}
