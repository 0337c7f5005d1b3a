use std::fmt::Display;
use std::fmt::Formatter;

use thiserror::Error;

#[cfg(doc)]
use crate::termination::TerminationCondition;
use crate::trace::ClauseIndex;

/// Errors caused by invalid construction parameters. These are reported immediately and never
/// silently clamped.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("the resolution distance must be non-negative, got {0}")]
    NegativeResolutionDistance(i64),
    #[error("an iteration budget must allow at least one iteration")]
    ZeroIterationBudget,
}

/// A trace, log, or candidate which is inconsistent with what the reasoning core assumes.
///
/// These indicate a disagreement between the translator and the SAT back end about the provenance
/// of clauses, and are never recovered from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("the trace contains no clauses")]
    EmptyTrace,
    #[error("axiom {index} is added after the first resolvent")]
    AxiomAfterResolvent { index: ClauseIndex },
    #[error("resolvent {index} has no antecedents")]
    ResolventWithoutAntecedents { index: ClauseIndex },
    #[error("resolvent {index} refers to antecedent {antecedent} which does not precede it")]
    AntecedentNotBefore {
        index: ClauseIndex,
        antecedent: ClauseIndex,
    },
    #[error("the final clause {index} of the trace is not the empty clause")]
    MissingTerminal { index: ClauseIndex },
    #[error("the candidate contains the terminal clause {terminal}")]
    TerminalInCandidate { terminal: ClauseIndex },
    #[error("a reduction strategy proposed an empty candidate")]
    EmptyCandidate,
    #[error("resolvent {index} of the candidate depends on {antecedent} outside the candidate")]
    AntecedentOutsideSubset {
        index: ClauseIndex,
        antecedent: ClauseIndex,
    },
    #[error("the SAT back end returned a malformed trace: {0}")]
    MalformedBackendTrace(String),
    #[error("variable {0} has no record in the translation log")]
    UnknownVariable(u32),
    #[error("root variable {0} was first recorded as a declaration")]
    ConflictingOrigin(u32),
    #[error("a case split without choices was requested")]
    EmptySplit,
}

/// A failure reported by a translator, passed through unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("translation failed: {reason}")]
pub struct TranslationFailure {
    reason: String,
}

impl TranslationFailure {
    pub fn new(reason: impl Into<String>) -> TranslationFailure {
        TranslationFailure {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// The phase of a solving session in which a [`TerminationCondition`] triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Solving,
    Reduction,
    Refinement,
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Solving => write!(f, "solving"),
            Phase::Reduction => write!(f, "core reduction"),
            Phase::Refinement => write!(f, "higher-order refinement"),
        }
    }
}

/// All the errors which can be produced by a solving session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KestrelError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("internal contract violation: {0}")]
    ContractViolation(#[from] ContractViolation),
    #[error(transparent)]
    Translation(#[from] TranslationFailure),
    #[error("resources were exhausted during {phase}")]
    ResourceExhausted { phase: Phase },
}

impl KestrelError {
    /// Whether the error denotes an inconclusive result rather than a failure.
    pub fn is_resource_exhaustion(&self) -> bool {
        matches!(self, KestrelError::ResourceExhausted { .. })
    }
}
