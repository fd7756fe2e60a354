//! The CDCL solver core: arena, clause database, trail, VMTF list,
//! propagation, conflict analysis, and search control. See spec §2-§5.

mod analyze;
mod arena;
mod clause_db;
mod literal;
mod propagate;
mod search;
mod solver;
mod trail;
mod vmtf;

pub use clause_db::{ClauseRef, END};
pub use literal::Dual;
pub use solver::{AddClauseOutcome, SolveResult, Solver};
