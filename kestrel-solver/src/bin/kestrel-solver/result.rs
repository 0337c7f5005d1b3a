use kestrel_solver::core::basic_types::ContractViolation;
use kestrel_solver::core::basic_types::KestrelError;
use thiserror::Error;

use crate::dimacs::DimacsParseError;

pub(crate) type KestrelSolverResult<T> = Result<T, KestrelSolverError>;

#[derive(Error, Debug)]
pub(crate) enum KestrelSolverError {
    #[error("IO error, more details: {0}")]
    IOError(#[from] std::io::Error),
    #[error("The dimacs file was invalid, more details: {0}")]
    InvalidDimacs(#[from] DimacsParseError),
    #[error("The trace file was invalid, more details: {0}")]
    InvalidTrace(#[from] tracecheck_format::reader::Error),
    #[error("The trace does not refute the instance, more details: {0}")]
    TraceMismatch(#[from] ContractViolation),
    #[error("Solving failed, more details: {0}")]
    Solver(#[from] KestrelError),
    #[error("Writing gzipped traces requires the 'gzipped-traces' feature.")]
    GzipNotSupported,
}
