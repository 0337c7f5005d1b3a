//! Shared fixtures for the unit tests of the crate.
use crate::basic_types::Literal;
use crate::basic_types::Variable;
use crate::trace::ClauseIndex;
use crate::trace::ClauseSet;
use crate::translation::Logic;
use crate::translation::Origin;
use crate::translation::TranslationLog;

/// A logic in which every value is a name.
#[derive(Debug)]
pub(crate) struct Names;

impl Logic for Names {
    type Formula = &'static str;
    type Bounds = ();
    type Instance = Vec<Literal>;
    type Decl = &'static str;
    type Relation = &'static str;
}

pub(crate) fn lit(code: i32) -> Literal {
    Literal::from_dimacs(code).unwrap()
}

pub(crate) fn var(index: u32) -> Variable {
    Variable::new(index).unwrap()
}

pub(crate) fn c(index: u32) -> ClauseIndex {
    ClauseIndex::new(index)
}

pub(crate) fn clauses(indices: impl IntoIterator<Item = u32>) -> ClauseSet {
    indices.into_iter().map(ClauseIndex::new).collect()
}

/// A log in which each of `roots` is the root variable of a conjunct.
pub(crate) fn root_log(roots: &[u32]) -> TranslationLog<Names> {
    let mut log = TranslationLog::new(0);
    for &root in roots {
        log.record(var(root), Origin::Root("conjunct"));
    }
    log
}
