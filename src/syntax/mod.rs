//! Core syntax: sorts, symbols, interned terms, literals, clauses, formulas.

mod clause;
mod formula;
mod literal;
mod term;

pub use clause::{Bloom, Clause};
pub use formula::Formula;
pub use literal::Literal;
pub use term::{Sort, SortedNames, Symbol, SymbolFactory, Term, TermFactory};
