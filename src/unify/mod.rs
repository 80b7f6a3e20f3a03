//! Substitutions, unification, and isomorphism over interned terms.

mod substitution;
#[allow(clippy::module_inception)]
mod unify;

pub use substitution::Substitution;
pub use unify::{isomorphic, isomorphic_terms, unify, unify_terms, UnifyConfig};
