//! The reasoning core of the Kestrel model finder.
//!
//! Formulas of a modelling language are translated to CNF by a
//! [`Translator`](translation::Translator) and decided by a [`SatBackend`](sat::SatBackend).
//! When a formula is unsatisfiable, the resolution trace of the refutation is used to extract an
//! unsatisfiable core, which is minimised by a [`ReductionStrategy`](ucore::ReductionStrategy).
//! Formulas with higher-order quantification are solved by a refinement loop, see [`hol`].
#[doc(hidden)]
pub mod asserts;
pub mod basic_types;
pub mod containers;
pub mod hol;
pub mod options;
pub mod reporting;
pub mod sat;
pub mod statistics;
pub mod termination;
pub mod trace;
pub mod translation;
pub mod ucore;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use convert_case;

// The API is declared as a private module with public use, so that `kestrel_core::Solver` is the
// path of the entry point.
mod api;

pub use api::*;
