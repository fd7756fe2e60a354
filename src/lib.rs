//! A compact CDCL (conflict-driven clause-learning) SAT solver core, plus
//! the DIMACS parser and statistics-reporting collaborators the CLI front
//! end needs to drive it. See `core` for the solver engine proper.

#[macro_use]
extern crate log;

pub mod core;
pub mod dimacs;
pub mod error;
pub mod stats;
pub mod util;

pub use crate::core::{AddClauseOutcome, SolveResult, Solver};
pub use crate::error::SolveError;
