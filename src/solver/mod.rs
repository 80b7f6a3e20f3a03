//! The reasoning core: grounding, setups, PEL, and the splitting kernel.

mod entail;
mod grounder;
mod hplus;
mod pel;
mod setup;
#[allow(clippy::module_inception)]
mod solver;

pub use entail::{consistent_at, entails_clause};
pub use grounder::ground_clauses;
pub use hplus::bat_hplus;
pub use pel::{full_pel, pel, relevant_split_term, split_terms, SplitTerm};
pub use setup::Setup;
pub use solver::{Context, Solver, SolverConfig};
