use crate::basic_types::Literal;

/// A formula in conjunctive normal form over the variables `1..=num_variables`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cnf {
    num_variables: u32,
    clauses: Vec<Vec<Literal>>,
}

impl Cnf {
    pub fn new() -> Cnf {
        Cnf::default()
    }

    /// Create a CNF which declares at least `num_variables` variables, even if some of them do
    /// not occur in any clause.
    pub fn with_variables(num_variables: u32) -> Cnf {
        Cnf {
            num_variables,
            clauses: Vec::new(),
        }
    }

    pub fn add_clause(&mut self, literals: impl IntoIterator<Item = Literal>) {
        let clause = literals.into_iter().collect::<Vec<_>>();

        if let Some(max) = clause.iter().map(|literal| literal.variable().get()).max() {
            self.num_variables = self.num_variables.max(max);
        }

        self.clauses.push(clause);
    }

    pub fn num_variables(&self) -> u32 {
        self.num_variables
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    pub fn clauses(&self) -> impl Iterator<Item = &[Literal]> {
        self.clauses.iter().map(Vec::as_slice)
    }
}
