//! Setups: ground clause sets with propagation, subsumption, and sensing.
//!
//! A setup entails a clause if, under unit propagation, some clause of the
//! setup subsumes it. The reasoning kernel grows a *split set* of assumed
//! literals during case analysis; [`Setup::subsumes`] saturates the unit
//! closure of the setup together with those assumptions without mutating the
//! base clause set, so backtracking is free.
//!
//! The setup also memoises inconsistency results per split depth k in a
//! bitmap. The only way consistency can break from the outside is through a
//! new sensing result, and [`Setup::add_sensing_result`] refreshes the
//! memo by testing whether the negation of the added literal was already
//! entailed.

use indexmap::IndexSet;
use log::{debug, trace};

use crate::solver::solver::SolverConfig;
use crate::solver::{entails_clause, full_pel};
use crate::syntax::{Clause, Literal, SortedNames, Symbol, TermFactory};

#[derive(Debug, Clone, Copy, Default)]
struct ConsistencyCache {
    checked: u64,
    incons: u64,
}

/// A set of ground clauses plus the consistency memo.
#[derive(Debug, Clone, Default)]
pub struct Setup {
    clauses: IndexSet<Clause>,
    cache: ConsistencyCache,
}

impl Setup {
    pub fn new() -> Setup {
        Setup::default()
    }

    /// Insert a clause. Valid clauses carry no information and are dropped.
    pub fn add(&mut self, c: Clause) -> bool {
        if c.is_valid() {
            return false;
        }
        self.clauses.insert(c)
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    pub fn contains(&self, c: &Clause) -> bool {
        self.clauses.contains(c)
    }

    pub fn has_empty_clause(&self) -> bool {
        self.clauses.iter().any(|c| c.is_unsat())
    }

    pub fn unit_literals(&self) -> impl Iterator<Item = &Literal> {
        self.clauses.iter().filter_map(|c| c.unit_literal())
    }

    /// Remove every clause subsumed by another clause of the setup.
    pub fn minimize(&mut self) {
        let clauses: Vec<Clause> = self.clauses.iter().cloned().collect();
        let mut keep = vec![true; clauses.len()];
        for i in 0..clauses.len() {
            if !keep[i] {
                continue;
            }
            for j in 0..clauses.len() {
                if i == j || !keep[j] {
                    continue;
                }
                if clauses[i].subsumes(&clauses[j]) {
                    keep[j] = false;
                }
            }
        }
        let before = clauses.len();
        self.clauses = clauses
            .into_iter()
            .zip(keep)
            .filter_map(|(c, k)| if k { Some(c) } else { None })
            .collect();
        trace!("minimize dropped {} clauses", before - self.clauses.len());
    }

    /// Close the setup under resolution of its unit clauses with all other
    /// clauses. Resolvents subsumed by an existing clause are discarded;
    /// clauses only shrink or are new, so this terminates.
    pub fn propagate_units(&mut self, tf: &TermFactory) {
        loop {
            let units: Vec<Literal> = self.unit_literals().cloned().collect();
            let snapshot: Vec<Clause> = self.clauses.iter().cloned().collect();
            let mut added = false;
            for u in &units {
                for d in &snapshot {
                    if !d.literals().iter().any(|a| Literal::complementary(a, u)) {
                        continue;
                    }
                    let rest: Vec<Literal> = d
                        .literals()
                        .iter()
                        .filter(|a| !Literal::complementary(a, u))
                        .cloned()
                        .collect();
                    let resolvent = Clause::new(rest, tf);
                    if resolvent.is_valid() {
                        continue;
                    }
                    if self.clauses.iter().any(|e| e.subsumes(&resolvent)) {
                        continue;
                    }
                    self.clauses.insert(resolvent);
                    added = true;
                }
            }
            if !added {
                break;
            }
        }
    }

    /// Does the setup together with the split assumptions entail `c`?
    ///
    /// Saturates the unit closure of setup ∪ split: units resolve against
    /// the clauses, shrinking them; an empty residue proves everything, a
    /// unit residue joins the closure, and any residue that subsumes `c`
    /// proves `c`. The base setup is not touched.
    pub fn subsumes(&self, split: &[Literal], c: &Clause) -> bool {
        if c.is_valid() {
            return true;
        }
        let mut units: Vec<Literal> = split.to_vec();
        units.extend(self.unit_literals().cloned());
        for i in 0..units.len() {
            for j in (i + 1)..units.len() {
                if Literal::complementary(&units[i], &units[j]) {
                    return true;
                }
            }
        }
        if units
            .iter()
            .any(|u| c.literals().iter().any(|b| u.subsumes(b)))
        {
            return true;
        }
        let mut residues: Vec<Vec<Literal>> = Vec::new();
        for d in &self.clauses {
            if d.is_unsat() {
                return true;
            }
            if !d.is_unit() {
                residues.push(d.literals().to_vec());
            }
        }
        loop {
            let mut changed = false;
            let mut i = 0;
            while i < residues.len() {
                let r = &mut residues[i];
                let before = r.len();
                r.retain(|a| !units.iter().any(|u| Literal::complementary(a, u)));
                if r.is_empty() {
                    return true;
                }
                if r.len() == 1 {
                    let u = r[0].clone();
                    residues.swap_remove(i);
                    if units.iter().any(|v| Literal::complementary(&u, v)) {
                        return true;
                    }
                    if c.literals().iter().any(|b| u.subsumes(b)) {
                        return true;
                    }
                    if !units.contains(&u) {
                        units.push(u);
                    }
                    changed = true;
                    continue;
                }
                if r.len() < before {
                    changed = true;
                }
                if r.iter()
                    .all(|a| c.literals().iter().any(|b| a.subsumes(b)))
                {
                    return true;
                }
                i += 1;
            }
            if !changed {
                return false;
            }
        }
    }

    /// The leaf test of the complete reasoning procedure: the unit closure
    /// must be free of contradictions and every clause must be satisfied by
    /// some unit of the setup.
    pub fn locally_consistent(&self) -> bool {
        if self.has_empty_clause() {
            return false;
        }
        let units: Vec<&Literal> = self.unit_literals().collect();
        for i in 0..units.len() {
            for j in (i + 1)..units.len() {
                if Literal::complementary(units[i], units[j]) {
                    return false;
                }
            }
        }
        self.clauses.iter().all(|c| {
            c.literals()
                .iter()
                .any(|a| units.iter().any(|u| u.subsumes(a)))
        })
    }

    /// Promise that the setup is consistent up to split depth `k`, skipping
    /// the expensive full-PEL inconsistency check there.
    pub fn guarantee_consistency(&mut self, k: usize) {
        for j in 0..=k.min(63) {
            self.cache.checked |= 1 << j;
            self.cache.incons &= !(1 << j);
        }
    }

    /// Is the setup inconsistent at split depth `k`? Equivalent to entailing
    /// the empty clause under the full PEL; memoised per k.
    pub fn inconsistent(
        &mut self,
        k: usize,
        sf: Symbol,
        split_names: &SortedNames,
        tf: &TermFactory,
        config: &SolverConfig,
    ) -> bool {
        let bit = 1u64 << k.min(63);
        if self.cache.checked & bit != 0 {
            return self.cache.incons & bit != 0;
        }
        let pel = full_pel(self, sf, tf);
        let r = entails_clause(self, &pel, split_names, &[], &Clause::empty(), k, tf, config);
        self.cache.checked |= bit;
        if r {
            self.cache.incons |= bit;
        }
        debug!("inconsistency at depth {}: {}", k, r);
        r
    }

    /// Append a sensing outcome as a unit clause and refresh the memoised
    /// consistency results: consistency can only have broken if the negation
    /// of the added literal was already entailed, which is cheap to test
    /// against the minimised PEL.
    pub fn add_sensing_result(
        &mut self,
        lit: Literal,
        sense: &[(Literal, Literal)],
        sf: Symbol,
        split_names: &SortedNames,
        tf: &TermFactory,
        config: &SolverConfig,
    ) {
        let negated = Clause::unit(lit.flip(), tf);
        for k in 0..64usize {
            let bit = 1u64 << k;
            if self.cache.checked & bit == 0 || self.cache.incons & bit != 0 {
                continue;
            }
            let pel = crate::solver::pel(self, &negated, sf, tf);
            if entails_clause(self, &pel, split_names, sense, &negated, k, tf, config) {
                self.cache.incons |= bit;
            }
        }
        self.add(Clause::unit(lit, tf));
    }
}
