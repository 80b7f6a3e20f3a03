//! Basic action theories: ewff-guarded universal clauses.

#[allow(clippy::module_inception)]
mod theory;

pub use theory::{Bat, BoxUnivClause, Ewff, EwffAtom, UnivClause};
