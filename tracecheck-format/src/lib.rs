//! This crate contains abstractions for dealing with the TraceCheck resolution trace format. SAT
//! solvers such as PicoSAT and Booleforce emit this format to certify unsatisfiability, and it is
//! the format in which Kestrel exports (minimised) refutations.
//!
//! Every line of a trace is a single step:
//! ```text
//! <id> <literal>* 0 <antecedent id>* 0
//! ```
//! A step without antecedents is an axiom (an input clause); any other step is a resolvent which
//! was derived from its antecedents by resolution.
//!
//! To read traces see [`reader::TraceReader`], and to write traces see [`writer::TraceWriter`].

pub mod reader;
mod steps;
pub mod writer;

pub use steps::*;
