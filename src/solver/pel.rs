//! Positive extended literals: the splitting domain of the kernel.

use indexmap::IndexSet;

use crate::solver::Setup;
use crate::syntax::{Clause, Literal, Symbol, Term, TermFactory};

/// A primitive term at an action prefix; the unit of case analysis.
pub type SplitTerm = (Vec<Term>, Term);

fn atom_of(l: &Literal, sf: Symbol, tf: &TermFactory) -> Option<Literal> {
    if l.is_null() || !l.is_primitive(tf) || l.lhs().symbol(tf) == sf {
        return None;
    }
    Some(l.positive())
}

/// The least set of atoms that contains every atom of the query clause and,
/// for any of its atoms mentioned by a setup clause, all atoms of that
/// clause. Sensing-fluent literals are excluded; they are split separately.
pub fn pel(setup: &Setup, c: &Clause, sf: Symbol, tf: &TermFactory) -> IndexSet<Literal> {
    let mut set: IndexSet<Literal> = IndexSet::new();
    let mut frontier: Vec<Literal> = Vec::new();
    for l in c.literals() {
        if let Some(a) = atom_of(l, sf, tf) {
            if set.insert(a.clone()) {
                frontier.push(a);
            }
        }
    }
    while let Some(a) = frontier.pop() {
        for d in setup.clauses() {
            if !d.mentions_atom(&a) {
                continue;
            }
            for l in d.literals() {
                if let Some(b) = atom_of(l, sf, tf) {
                    if set.insert(b.clone()) {
                        frontier.push(b);
                    }
                }
            }
        }
    }
    set
}

/// All atoms of the setup; required for conclusive inconsistency checks.
pub fn full_pel(setup: &Setup, sf: Symbol, tf: &TermFactory) -> IndexSet<Literal> {
    let mut set = IndexSet::new();
    for d in setup.clauses() {
        for l in d.literals() {
            if let Some(a) = atom_of(l, sf, tf) {
                set.insert(a);
            }
        }
    }
    set
}

/// The distinct primitive terms (with their prefixes) named by a PEL set.
pub fn split_terms(pel: &IndexSet<Literal>) -> IndexSet<SplitTerm> {
    pel.iter().map(|l| (l.z().to_vec(), l.lhs())).collect()
}

/// The split-relevance filter. A term is worth splitting at remaining budget
/// k only if its value is not already fixed by a unit and some setup clause
/// mentioning it is small enough to trigger unit propagation (|d| ≤ k+1) or
/// close enough to the query clause to lead to subsumption (|d \ c| ≤ k).
pub fn relevant_split_term(
    setup: &Setup,
    c: &Clause,
    z: &[Term],
    t: Term,
    k: usize,
    _tf: &TermFactory,
) -> bool {
    if setup
        .unit_literals()
        .any(|u| u.pos() && u.z() == z && u.lhs() == t)
    {
        return false;
    }
    setup.clauses().any(|d| {
        d.literals().iter().any(|l| l.z() == z && l.lhs() == t)
            && (d.len() <= k + 1 || d.count_not_in(c) <= k)
    })
}
