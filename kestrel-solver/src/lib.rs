//! # Kestrel
//! Kestrel is the reasoning core of a SAT-based relational model finder. A formula is translated
//! to CNF, solved, and when it is unsatisfiable, the resolution proof of the SAT back end is used
//! to compute a minimal unsatisfiable core: a set of top-level constraints of the formula which
//! is unsatisfiable, and in which every constraint is necessary. Formulas with higher-order
//! quantification are solved by a counterexample guided refinement loop.
//!
//! The modelling language is not part of Kestrel. A language plugs in by implementing
//! [`Logic`](core::translation::Logic), a [`Translator`](core::translation::Translator), and
//! optionally a [`HolOracle`](core::hol::HolOracle) for its higher-order constructs.
//!
//! ```rust
//! # use kestrel_solver::core::sat::ResolutionProver;
//! # use kestrel_solver::core::sat::SatBackend;
//! # use kestrel_solver::core::sat::SatOutcome;
//! # use kestrel_solver::core::termination::Indefinite;
//! # use kestrel_solver::core::translation::Cnf;
//! # use kestrel_solver::core::basic_types::Literal;
//! let lit = |code| Literal::from_dimacs(code).unwrap();
//!
//! let mut cnf = Cnf::new();
//! cnf.add_clause([lit(1), lit(2)]);
//! cnf.add_clause([lit(-1)]);
//! cnf.add_clause([lit(-2)]);
//!
//! let outcome = ResolutionProver::new().solve(&cnf, &mut Indefinite).unwrap();
//! match outcome {
//!     SatOutcome::Unsatisfiable(trace) => assert_eq!(3, trace.core().len()),
//!     SatOutcome::Satisfiable(_) => panic!("the CNF is unsatisfiable"),
//! }
//! ```

pub use kestrel_core as core;
pub use kestrel_core::Solution;
pub use kestrel_core::Solver;
pub use kestrel_core::UnsatCore;
