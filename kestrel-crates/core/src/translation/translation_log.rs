use std::fmt::Debug;
use std::fmt::Formatter;

use super::Logic;
use crate::basic_types::ContractViolation;
use crate::basic_types::Variable;
use crate::containers::HashMap;
use crate::containers::HashSet;

/// The syntactic origin of a boolean variable.
pub enum Origin<L: Logic> {
    /// The variable encodes (part of) the value of a declared relation.
    Declaration(L::Decl),
    /// The variable encodes a top-level conjunct of the translated formula.
    Root(L::Formula),
}

impl<L: Logic> Debug for Origin<L> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Declaration(decl) => f.debug_tuple("Declaration").field(decl).finish(),
            Origin::Root(formula) => f.debug_tuple("Root").field(formula).finish(),
        }
    }
}

/// Records that `variable` originates from `origin`.
#[derive(Debug)]
pub struct TranslationRecord<L: Logic> {
    pub variable: Variable,
    pub origin: Origin<L>,
}

/// Maps the boolean variables of a translation back to the parts of the formula they originate
/// from.
///
/// Every variable has at most one origin. Variables of [`Origin::Root`] records are the root
/// variables; the translator asserts each of them with a unit clause, which is what allows a
/// resolution trace to be mapped back to the top-level conjuncts that are needed for a refutation.
pub struct TranslationLog<L: Logic> {
    records: Vec<TranslationRecord<L>>,
    by_variable: HashMap<Variable, usize>,
    num_primary_variables: u32,
}

impl<L: Logic> Debug for TranslationLog<L> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationLog")
            .field("records", &self.records)
            .field("num_primary_variables", &self.num_primary_variables)
            .finish()
    }
}

impl<L: Logic> TranslationLog<L> {
    /// Create an empty log. The first `num_primary_variables` variables encode the relations.
    pub fn new(num_primary_variables: u32) -> TranslationLog<L> {
        TranslationLog {
            records: Vec::new(),
            by_variable: HashMap::default(),
            num_primary_variables,
        }
    }

    /// Record the origin of `variable`. A variable which was recorded before keeps its first
    /// origin, but the record is still kept.
    pub fn record(&mut self, variable: Variable, origin: Origin<L>) {
        let _ = self
            .by_variable
            .entry(variable)
            .or_insert(self.records.len());
        self.records.push(TranslationRecord { variable, origin });
    }

    /// All records, in the order in which they were recorded.
    pub fn records(&self) -> &[TranslationRecord<L>] {
        &self.records
    }

    pub fn num_primary_variables(&self) -> u32 {
        self.num_primary_variables
    }

    /// The variables of the top-level conjuncts, in declaration order and without duplicates.
    pub fn root_vars(&self) -> Vec<Variable> {
        let mut seen: HashSet<Variable> = HashSet::default();

        self.records
            .iter()
            .filter(|record| matches!(record.origin, Origin::Root(_)))
            .map(|record| record.variable)
            .filter(|&variable| seen.insert(variable))
            .collect()
    }

    /// The top-level conjuncts, in declaration order.
    pub fn roots(&self) -> impl Iterator<Item = &L::Formula> {
        self.records.iter().filter_map(|record| match &record.origin {
            Origin::Root(formula) => Some(formula),
            Origin::Declaration(_) => None,
        })
    }

    /// The origin of `variable`.
    pub fn origin(&self, variable: Variable) -> Result<&Origin<L>, ContractViolation> {
        self.by_variable
            .get(&variable)
            .map(|&position| &self.records[position].origin)
            .ok_or(ContractViolation::UnknownVariable(variable.get()))
    }

    /// The top-level conjunct encoded by `variable`, if the variable is a root variable.
    pub fn root_formula(&self, variable: Variable) -> Option<&L::Formula> {
        match self.origin(variable) {
            Ok(Origin::Root(formula)) => Some(formula),
            _ => None,
        }
    }
}
