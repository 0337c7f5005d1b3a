use crate::basic_types::Literal;
use crate::basic_types::Variable;
use crate::containers::KeyedVec;

/// A total assignment to the variables `1..=num_variables` produced by a SAT back end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assignment {
    values: KeyedVec<Variable, bool>,
}

impl Assignment {
    /// Create an assignment from the values of the variables `1..=values.len()`, in order.
    pub fn new(values: impl IntoIterator<Item = bool>) -> Assignment {
        Assignment {
            values: values.into_iter().collect(),
        }
    }

    pub fn num_variables(&self) -> usize {
        self.values.len()
    }

    /// The value of `variable`, or `None` if the variable is not part of the assignment.
    pub fn value(&self, variable: Variable) -> Option<bool> {
        self.values.get(variable).copied()
    }

    /// Whether `literal` is satisfied by this assignment. Literals over unknown variables are not
    /// satisfied.
    pub fn is_satisfied(&self, literal: Literal) -> bool {
        self.value(literal.variable()) == Some(literal.is_positive())
    }

    /// The literals which are true under this assignment, ordered by variable.
    pub fn true_literals(&self) -> impl Iterator<Item = Literal> + '_ {
        self.values
            .keys()
            .map(|variable| Literal::new(variable, self.values[variable]))
    }
}
