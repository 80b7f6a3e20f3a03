//! Literals: (in)equalities of two terms under an action prefix.
//!
//! The `(pos, lhs, rhs)` triple is packed into 64 bits: lhs id in bits 0..31,
//! the polarity in bit 31, rhs id in bits 32..63, top bit reserved. If one of
//! the two terms is a function, normalisation at construction puts it on the
//! left, and within that rule the smaller term id comes first; so equal
//! literals are bit-equal.
//!
//! An extended literal additionally carries the action prefix z after which
//! it is evaluated. Two literals with different prefixes talk about different
//! situations and never interact.
//!
//! The subsumption and complementarity predicates below are what the clause
//! and setup layers build on; changing them means re-checking those layers.

use crate::syntax::{Term, TermFactory};

const ID_MASK: u64 = 0x7fff_ffff;
const POS_BIT: u64 = 1 << 31;

/// An extended literal: `lhs = rhs` or `lhs ≠ rhs` after the actions in `z`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Literal {
    z: Vec<Term>,
    data: u64,
}

impl Literal {
    /// The null literal; only used as the payload of the valid clause marker.
    pub fn null() -> Literal {
        Literal::default()
    }

    pub fn eq(lhs: Term, rhs: Term, tf: &TermFactory) -> Literal {
        Literal::with_z(Vec::new(), true, lhs, rhs, tf)
    }

    pub fn neq(lhs: Term, rhs: Term, tf: &TermFactory) -> Literal {
        Literal::with_z(Vec::new(), false, lhs, rhs, tf)
    }

    /// Build a literal under an action prefix, normalising the term order.
    pub fn with_z(z: Vec<Term>, pos: bool, mut lhs: Term, mut rhs: Term, tf: &TermFactory) -> Literal {
        debug_assert!(!lhs.is_null() && !rhs.is_null());
        if lhs > rhs {
            std::mem::swap(&mut lhs, &mut rhs);
        }
        if (!lhs.is_function(tf) && rhs.is_function(tf)) || rhs.is_quasi_primitive(tf) {
            std::mem::swap(&mut lhs, &mut rhs);
        }
        debug_assert!(lhs.is_function(tf) || !rhs.is_function(tf));
        let data = (lhs.id() as u64) | (if pos { POS_BIT } else { 0 }) | ((rhs.id() as u64) << 32);
        Literal { z, data }
    }

    pub fn is_null(&self) -> bool {
        self.data == 0
    }

    pub fn lhs(&self) -> Term {
        Term::from_id((self.data & ID_MASK) as u32)
    }

    pub fn rhs(&self) -> Term {
        Term::from_id(((self.data >> 32) & ID_MASK) as u32)
    }

    pub fn pos(&self) -> bool {
        self.data & POS_BIT != 0
    }

    pub fn z(&self) -> &[Term] {
        &self.z
    }

    /// The same literal with the opposite polarity.
    pub fn flip(&self) -> Literal {
        Literal {
            z: self.z.clone(),
            data: self.data ^ POS_BIT,
        }
    }

    /// The same literal with both sides exchanged (and re-normalised).
    pub fn dual(&self, tf: &TermFactory) -> Literal {
        Literal::with_z(self.z.clone(), self.pos(), self.rhs(), self.lhs(), tf)
    }

    /// The positive form used as a splitting atom.
    pub fn positive(&self) -> Literal {
        Literal {
            z: self.z.clone(),
            data: self.data | POS_BIT,
        }
    }

    /// This literal re-evaluated after `prefix` followed by its own actions.
    pub fn prepend_z(&self, prefix: &[Term]) -> Literal {
        if prefix.is_empty() {
            return self.clone();
        }
        let mut z = Vec::with_capacity(prefix.len() + self.z.len());
        z.extend_from_slice(prefix);
        z.extend_from_slice(&self.z);
        Literal { z, data: self.data }
    }

    pub fn is_ground(&self, tf: &TermFactory) -> bool {
        self.lhs().is_ground(tf) && self.rhs().is_ground(tf)
    }

    /// Both sides are names.
    pub fn is_trivial(&self) -> bool {
        self.lhs().is_name() && self.rhs().is_name()
    }

    pub fn is_primitive(&self, tf: &TermFactory) -> bool {
        self.lhs().is_primitive(tf) && self.rhs().is_name()
    }

    pub fn is_quasi_primitive(&self, tf: &TermFactory) -> bool {
        self.lhs().is_quasi_primitive(tf) && self.rhs().is_quasi_name(tf)
    }

    /// Well-formed literals are quasi-trivial or quasi-primitive; everything
    /// else needs flattening before the solver can use it.
    pub fn is_well_formed(&self, tf: &TermFactory) -> bool {
        (self.lhs().is_quasi_name(tf) && self.rhs().is_quasi_name(tf)) || self.is_quasi_primitive(tf)
    }

    /// Holds for `t = t`, for `n1 ≠ n2` with distinct names, and for
    /// inequalities across sorts.
    pub fn valid(&self, tf: &TermFactory) -> bool {
        (self.pos() && self.lhs() == self.rhs())
            || (!self.pos() && self.is_trivial() && self.lhs() != self.rhs())
            || (!self.pos() && self.lhs().sort(tf) != self.rhs().sort(tf))
    }

    /// The dual of [`Literal::valid`].
    pub fn unsatisfiable(&self, tf: &TermFactory) -> bool {
        (!self.pos() && self.lhs() == self.rhs())
            || (self.pos() && self.is_trivial() && self.lhs() != self.rhs())
            || (self.pos() && self.lhs().sort(tf) != self.rhs().sort(tf))
    }

    /// `a ∨ b` is a tautology: complementary polarities on the same atom, or
    /// two inequalities of the same term with distinct names.
    pub fn valid_pair(a: &Literal, b: &Literal) -> bool {
        a.z == b.z
            && a.lhs() == b.lhs()
            && ((a.pos() != b.pos() && a.rhs() == b.rhs())
                || (!a.pos()
                    && !b.pos()
                    && a.rhs().is_name()
                    && b.rhs().is_name()
                    && a.rhs() != b.rhs()))
    }

    /// `a ∧ b` is unsatisfiable: complementary polarities on the same atom,
    /// or two equalities of the same term with distinct names.
    pub fn complementary(a: &Literal, b: &Literal) -> bool {
        a.z == b.z
            && a.lhs() == b.lhs()
            && ((a.pos() != b.pos() && a.rhs() == b.rhs())
                || (a.pos()
                    && b.pos()
                    && a.rhs().is_name()
                    && b.rhs().is_name()
                    && a.rhs() != b.rhs()))
    }

    /// `t = n1` implies `t ≠ n2` for distinct names n1, n2.
    pub fn properly_subsumes(&self, b: &Literal) -> bool {
        self.z == b.z
            && self.lhs() == b.lhs()
            && self.pos()
            && !b.pos()
            && self.rhs().is_name()
            && b.rhs().is_name()
            && self.rhs() != b.rhs()
    }

    /// Every model of this literal is a model of `b`.
    pub fn subsumes(&self, b: &Literal) -> bool {
        self == b || self.properly_subsumes(b)
    }

    /// Apply a term mapping to both sides and to the action prefix.
    pub fn substitute<F>(&self, theta: &F, tf: &mut TermFactory) -> Literal
    where
        F: Fn(Term) -> Option<Term>,
    {
        let z = self.z.iter().map(|&a| tf.substitute(a, theta)).collect();
        let lhs = tf.substitute(self.lhs(), theta);
        let rhs = tf.substitute(self.rhs(), theta);
        Literal::with_z(z, self.pos(), lhs, rhs, tf)
    }

    /// Collect the variables of both sides and the prefix.
    pub fn collect_variables(&self, tf: &TermFactory, out: &mut indexmap::IndexSet<Term>) {
        for &a in &self.z {
            a.collect_variables(tf, out);
        }
        self.lhs().collect_variables(tf, out);
        self.rhs().collect_variables(tf, out);
    }

    /// Collect the names of both sides and the prefix.
    pub fn collect_names(&self, tf: &TermFactory, out: &mut crate::syntax::SortedNames) {
        for &a in &self.z {
            a.collect_names(tf, out);
        }
        self.lhs().collect_names(tf, out);
        self.rhs().collect_names(tf, out);
    }

    /// Deterministic hash of the prefix and left-hand side, for the clause
    /// Bloom summary. Complementary literals hash alike.
    pub fn lhs_hash64(&self) -> u64 {
        let mut h = self.lhs().hash64();
        for a in &self.z {
            h = h.rotate_left(17) ^ a.hash64();
        }
        h
    }
}

impl PartialOrd for Literal {
    fn partial_cmp(&self, other: &Literal) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Literal {
    fn cmp(&self, other: &Literal) -> std::cmp::Ordering {
        self.z
            .cmp(&other.z)
            .then(self.lhs().cmp(&other.lhs()))
            .then(self.data.cmp(&other.data))
    }
}
