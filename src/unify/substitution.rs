//! Substitutions: finite mappings from terms to terms.

use crate::syntax::{Term, TermFactory};

/// A substitution built up incrementally, e.g. during unification or while
/// grounding a universal clause.
///
/// The mapping is keyed by whole terms, not just variables, so it can also
/// express "replace this subterm" rewrites.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    pairs: Vec<(Term, Term)>,
}

impl Substitution {
    pub fn new() -> Self {
        Substitution::default()
    }

    pub fn singleton(old: Term, new: Term) -> Self {
        Substitution {
            pairs: vec![(old, new)],
        }
    }

    /// Add a binding. Returns false if `old` is already bound to a different
    /// term; the substitution is unchanged in that case.
    pub fn add(&mut self, old: Term, new: Term) -> bool {
        match self.get(old) {
            None => {
                self.pairs.push((old, new));
                true
            }
            Some(existing) => existing == new,
        }
    }

    pub fn get(&self, t: Term) -> Option<Term> {
        self.pairs
            .iter()
            .find(|(old, _)| *old == t)
            .map(|&(_, new)| new)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Term, Term)> + '_ {
        self.pairs.iter().copied()
    }

    /// Apply this substitution to a term, top-down, rebuilding only changed
    /// subterms.
    pub fn apply(&self, t: Term, tf: &mut TermFactory) -> Term {
        tf.substitute(t, &|u| self.get(u))
    }
}
