//! The contract between the reasoning core and a formula translator.
//!
//! The core never inspects formulas itself. A [`Logic`] names the value types of the modelling
//! language, and a [`Translator`] turns a formula and its bounds into a [`Cnf`] together with a
//! [`TranslationLog`] which maps the boolean variables back to the formula.
mod cnf;
mod translation_log;

use std::fmt::Debug;

pub use cnf::Cnf;
pub use translation_log::Origin;
pub use translation_log::TranslationLog;
pub use translation_log::TranslationRecord;

use crate::basic_types::Assignment;
use crate::basic_types::TranslationFailure;
use crate::reporting::Reporter;

/// The value types of a modelling language. They are threaded through the core opaquely and are
/// never mutated by it.
pub trait Logic: Debug {
    type Formula: Clone + Debug;
    type Bounds: Debug;
    type Instance: Debug;
    /// A declaration of a (quantified) variable or relation.
    type Decl: Debug;
    type Relation: Debug;
}

/// The result of translating a formula: the CNF which is passed to the SAT back end, and the log
/// which relates its variables to the formula.
#[derive(Debug)]
pub struct Translation<L: Logic> {
    cnf: Cnf,
    log: TranslationLog<L>,
}

impl<L: Logic> Translation<L> {
    pub fn new(cnf: Cnf, log: TranslationLog<L>) -> Translation<L> {
        Translation { cnf, log }
    }

    pub fn cnf(&self) -> &Cnf {
        &self.cnf
    }

    pub fn log(&self) -> &TranslationLog<L> {
        &self.log
    }
}

/// Translates formulas of a [`Logic`] into CNF.
///
/// Every top-level conjunct of the formula is encoded by a root variable, which is recorded in the
/// [`TranslationLog`] with [`Origin::Root`] and asserted by a unit clause. The gate clauses which
/// define a root variable have it as their maximal variable, so that the clauses of a conjunct can
/// be recovered from its root variable.
pub trait Translator<L: Logic> {
    /// Translate `formula` under `bounds`. The translator reports the translation milestones to
    /// `reporter`.
    fn translate(
        &mut self,
        formula: &L::Formula,
        bounds: &L::Bounds,
        reporter: &mut dyn Reporter<L>,
    ) -> Result<Translation<L>, TranslationFailure>;

    /// Interpret a satisfying assignment of the translated CNF as an instance.
    fn interpret(&self, translation: &Translation<L>, assignment: &Assignment) -> L::Instance;
}
