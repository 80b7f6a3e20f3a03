//! Clauses: normalised disjunctions of literals.
//!
//! A normalised clause contains no literal that subsumes another one.
//! Unsatisfiable literals are dropped at construction; a clause containing a
//! valid literal or a tautologous pair is reduced to the *valid marker*, a
//! unit clause holding the null literal. The empty clause is the
//! unsatisfiable marker.
//!
//! Every clause carries a Bloom summary of its literals' left-hand sides, so
//! most negative subsumption answers are decided without touching literals.

use crate::syntax::{Literal, TermFactory};

/// A 64-bit Bloom filter keyed by four byte-sliced indices of a hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bloom(u64);

impl Bloom {
    pub fn new() -> Bloom {
        Bloom(0)
    }

    fn bits(hash: u64) -> u64 {
        let mut mask = 0u64;
        for k in 0..4 {
            mask |= 1 << ((hash >> (8 * k)) & 0x3f);
        }
        mask
    }

    pub fn add(&mut self, hash: u64) {
        self.0 |= Bloom::bits(hash);
    }

    pub fn contains(&self, hash: u64) -> bool {
        let bits = Bloom::bits(hash);
        self.0 & bits == bits
    }

    pub fn subset_of(&self, other: Bloom) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn union(&self, other: Bloom) -> Bloom {
        Bloom(self.0 | other.0)
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }
}

/// An ordered, de-duplicated disjunction of literals.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    lits: Vec<Literal>,
    bloom: Bloom,
}

impl Clause {
    /// Normalising constructor.
    pub fn new(lits: Vec<Literal>, tf: &TermFactory) -> Clause {
        Clause::normalize(lits, tf)
    }

    /// Construct from literals already known to be normalised and sorted.
    pub fn new_normalized(lits: Vec<Literal>) -> Clause {
        let bloom = Clause::bloom_of(&lits);
        Clause { lits, bloom }
    }

    pub fn unit(lit: Literal, tf: &TermFactory) -> Clause {
        Clause::new(vec![lit], tf)
    }

    /// The valid marker: a unit clause holding the null literal.
    pub fn valid_marker() -> Clause {
        Clause::new_normalized(vec![Literal::null()])
    }

    /// The unsatisfiable marker: the empty clause.
    pub fn empty() -> Clause {
        Clause::new_normalized(Vec::new())
    }

    fn normalize(mut lits: Vec<Literal>, tf: &TermFactory) -> Clause {
        lits.retain(|l| !l.unsatisfiable(tf));
        if lits.iter().any(|l| l.valid(tf)) {
            return Clause::valid_marker();
        }
        lits.sort();
        lits.dedup();
        for i in 0..lits.len() {
            for j in (i + 1)..lits.len() {
                if Literal::valid_pair(&lits[i], &lits[j]) {
                    return Clause::valid_marker();
                }
            }
        }
        let keep: Vec<Literal> = lits
            .iter()
            .filter(|a| !lits.iter().any(|b| a.properly_subsumes(b)))
            .cloned()
            .collect();
        Clause::new_normalized(keep)
    }

    fn bloom_of(lits: &[Literal]) -> Bloom {
        let mut bloom = Bloom::new();
        for l in lits {
            if !l.is_null() {
                bloom.add(l.lhs_hash64());
            }
        }
        bloom
    }

    pub fn is_valid(&self) -> bool {
        self.lits.len() == 1 && self.lits[0].is_null()
    }

    pub fn is_unsat(&self) -> bool {
        self.lits.is_empty()
    }

    pub fn is_unit(&self) -> bool {
        self.lits.len() == 1 && !self.lits[0].is_null()
    }

    pub fn unit_literal(&self) -> Option<&Literal> {
        if self.is_unit() {
            Some(&self.lits[0])
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.lits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    pub fn literals(&self) -> &[Literal] {
        &self.lits
    }

    pub fn bloom(&self) -> Bloom {
        self.bloom
    }

    pub fn contains(&self, lit: &Literal) -> bool {
        self.lits.iter().any(|l| l == lit)
    }

    /// Does some literal of this clause have the given positive form?
    pub fn mentions_atom(&self, atom: &Literal) -> bool {
        self.lits.iter().any(|l| &l.positive() == atom)
    }

    /// Every literal of this clause subsumes some literal of `other`.
    pub fn subsumes(&self, other: &Clause) -> bool {
        if !self.bloom.subset_of(other.bloom) {
            return false;
        }
        self.lits
            .iter()
            .all(|a| other.lits.iter().any(|b| a.subsumes(b)))
    }

    /// Disjunction of two clauses.
    pub fn union(&self, other: &Clause, tf: &TermFactory) -> Clause {
        if self.is_valid() || other.is_valid() {
            return Clause::valid_marker();
        }
        let mut lits = Vec::with_capacity(self.lits.len() + other.lits.len());
        lits.extend_from_slice(&self.lits);
        lits.extend_from_slice(&other.lits);
        Clause::new(lits, tf)
    }

    /// The number of literals of this clause not occurring in `other`.
    pub fn count_not_in(&self, other: &Clause) -> usize {
        self.lits.iter().filter(|a| !other.contains(a)).count()
    }

    /// Apply a term mapping to every literal and re-normalise.
    pub fn substitute<F>(&self, theta: &F, tf: &mut TermFactory) -> Clause
    where
        F: Fn(crate::syntax::Term) -> Option<crate::syntax::Term>,
    {
        let lits = self
            .lits
            .iter()
            .map(|l| l.substitute(theta, tf))
            .collect::<Vec<_>>();
        Clause::new(lits, tf)
    }
}
