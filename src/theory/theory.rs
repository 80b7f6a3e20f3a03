//! Universal clauses and the basic action theory container.
//!
//! A BAT consists of *static* universal clauses, which hold in the initial
//! situation, and *boxed* universal clauses, which hold after every finite
//! action sequence. Each universal clause pairs an ewff — a guard mentioning
//! nothing but equality over variables and names — with a disjunction of
//! literals. All variables are implicitly universally quantified with
//! maximum scope; the grounder instantiates them over the bounded name
//! universe, keeping only instances whose ewff comes out true.

use indexmap::IndexSet;

use crate::syntax::{Literal, SortedNames, Term, TermFactory};
use crate::unify::Substitution;

/// One conjunct of an ewff: an (in)equality of two variables or names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EwffAtom {
    pub pos: bool,
    pub lhs: Term,
    pub rhs: Term,
}

impl EwffAtom {
    pub fn eq(lhs: Term, rhs: Term) -> EwffAtom {
        EwffAtom {
            pos: true,
            lhs,
            rhs,
        }
    }

    pub fn neq(lhs: Term, rhs: Term) -> EwffAtom {
        EwffAtom {
            pos: false,
            lhs,
            rhs,
        }
    }
}

/// An equality-only formula used as the guard of a universal clause.
/// Satisfiability under an assignment is decided syntactically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ewff {
    atoms: Vec<EwffAtom>,
}

impl Ewff {
    /// The trivially true guard.
    pub fn top() -> Ewff {
        Ewff::default()
    }

    pub fn new(atoms: Vec<EwffAtom>) -> Ewff {
        Ewff { atoms }
    }

    pub fn atoms(&self) -> &[EwffAtom] {
        &self.atoms
    }

    /// Evaluate the guard under a variable-to-name assignment. Every
    /// variable mentioned by the guard must be bound by `theta`.
    pub fn satisfied(&self, theta: &Substitution) -> bool {
        self.atoms.iter().all(|atom| {
            let lhs = theta.get(atom.lhs).unwrap_or(atom.lhs);
            let rhs = theta.get(atom.rhs).unwrap_or(atom.rhs);
            debug_assert!(lhs.is_name() && rhs.is_name());
            (lhs == rhs) == atom.pos
        })
    }

    pub fn collect_variables(&self, tf: &TermFactory, out: &mut IndexSet<Term>) {
        for atom in &self.atoms {
            atom.lhs.collect_variables(tf, out);
            atom.rhs.collect_variables(tf, out);
        }
    }

    pub fn collect_names(&self, tf: &TermFactory, out: &mut SortedNames) {
        for atom in &self.atoms {
            atom.lhs.collect_names(tf, out);
            atom.rhs.collect_names(tf, out);
        }
    }
}

/// A universally quantified guarded clause `ewff → l1 ∨ ... ∨ lk`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnivClause {
    pub ewff: Ewff,
    pub lits: Vec<Literal>,
    vars: IndexSet<Term>,
}

impl UnivClause {
    pub fn new(ewff: Ewff, lits: Vec<Literal>, tf: &TermFactory) -> UnivClause {
        let mut vars = IndexSet::new();
        ewff.collect_variables(tf, &mut vars);
        for l in &lits {
            l.collect_variables(tf, &mut vars);
        }
        UnivClause { ewff, lits, vars }
    }

    /// A ground fact or disjunction without guard.
    pub fn fact(lits: Vec<Literal>, tf: &TermFactory) -> UnivClause {
        UnivClause::new(Ewff::top(), lits, tf)
    }

    pub fn variables(&self) -> &IndexSet<Term> {
        &self.vars
    }

    pub fn collect_names(&self, tf: &TermFactory, out: &mut SortedNames) {
        self.ewff.collect_names(tf, out);
        for l in &self.lits {
            l.collect_names(tf, out);
        }
    }

    /// The largest number of variables of one sort in this clause; used to
    /// budget fresh names for the Herbrand universe.
    pub fn max_vars_of_sort(&self, sort: crate::syntax::Sort, tf: &TermFactory) -> usize {
        self.vars.iter().filter(|v| v.sort(tf) == sort).count()
    }
}

/// A universal clause under the box operator: it holds after every finite
/// action sequence, and the grounder instantiates it once per action-sequence
/// prefix drawn from the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxUnivClause(pub UnivClause);

/// A basic action theory.
#[derive(Debug, Clone, Default)]
pub struct Bat {
    statics: Vec<UnivClause>,
    boxeds: Vec<BoxUnivClause>,
}

impl Bat {
    pub fn new() -> Bat {
        Bat::default()
    }

    pub fn add_static(&mut self, clause: UnivClause) {
        self.statics.push(clause);
    }

    pub fn add_boxed(&mut self, clause: BoxUnivClause) {
        self.boxeds.push(clause);
    }

    pub fn statics(&self) -> &[UnivClause] {
        &self.statics
    }

    pub fn boxeds(&self) -> &[BoxUnivClause] {
        &self.boxeds
    }

    pub fn is_empty(&self) -> bool {
        self.statics.is_empty() && self.boxeds.is_empty()
    }

    /// All names mentioned anywhere in the theory.
    pub fn collect_names(&self, tf: &TermFactory, out: &mut SortedNames) {
        for c in &self.statics {
            c.collect_names(tf, out);
        }
        for BoxUnivClause(c) in &self.boxeds {
            c.collect_names(tf, out);
        }
    }

    /// Per sort, the largest number of same-sort variables in any single
    /// clause of the theory.
    pub fn max_vars_of_sort(&self, sort: crate::syntax::Sort, tf: &TermFactory) -> usize {
        self.statics
            .iter()
            .map(|c| c.max_vars_of_sort(sort, tf))
            .chain(
                self.boxeds
                    .iter()
                    .map(|BoxUnivClause(c)| c.max_vars_of_sort(sort, tf)),
            )
            .max()
            .unwrap_or(0)
    }

    /// All sorts over which some clause quantifies.
    pub fn quantified_sorts(&self, tf: &TermFactory) -> IndexSet<crate::syntax::Sort> {
        let mut sorts = IndexSet::new();
        for c in self
            .statics
            .iter()
            .chain(self.boxeds.iter().map(|BoxUnivClause(c)| c))
        {
            for v in c.variables() {
                sorts.insert(v.sort(tf));
            }
        }
        sorts
    }
}
