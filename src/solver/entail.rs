//! The splitting kernel: entailment of one ground clause at depth k.
//!
//! The decision procedure is layered:
//!
//! 1. If the setup together with the current split assumptions subsumes the
//!    clause, it is entailed.
//! 2. While budget remains, pick a relevant primitive term and do a case
//!    analysis over all candidate names for its value; every case must
//!    succeed. These splits consume k.
//! 3. Otherwise split the sensing-fluent literals of the clause's action
//!    prefixes, both polarities each. Sense splits never consume k.
//!
//! The procedure is sound and deliberately incomplete: `false` only denies
//! derivability at the given k.

use indexmap::IndexSet;
use log::trace;

use crate::solver::solver::SolverConfig;
use crate::solver::{relevant_split_term, Setup, SplitTerm};
use crate::syntax::{Clause, Literal, SortedNames, TermFactory};

/// Decide entailment of `c` at split depth `k`.
///
/// `pel` is the (minimised) splitting domain for this clause; `split_names`
/// the per-sort name candidates for case analysis, which must contain one
/// name of each sort beyond those mentioned anywhere; `sense` the
/// sensing-fluent split pairs of `c`'s action prefixes, shortest prefix
/// first.
#[allow(clippy::too_many_arguments)]
pub fn entails_clause(
    setup: &Setup,
    pel: &IndexSet<Literal>,
    split_names: &SortedNames,
    sense: &[(Literal, Literal)],
    c: &Clause,
    k: usize,
    tf: &TermFactory,
    config: &SolverConfig,
) -> bool {
    if c.is_valid() {
        return true;
    }
    let terms = crate::solver::split_terms(pel);
    let mut split = Vec::new();
    test_split(setup, &mut split, &terms, split_names, sense, c, k, tf, config)
}

#[allow(clippy::too_many_arguments)]
fn test_split(
    setup: &Setup,
    split: &mut Vec<Literal>,
    terms: &IndexSet<SplitTerm>,
    split_names: &SortedNames,
    sense: &[(Literal, Literal)],
    c: &Clause,
    k: usize,
    tf: &TermFactory,
    config: &SolverConfig,
) -> bool {
    if setup.subsumes(split, c) {
        return true;
    }
    if k > 0 {
        'terms: for (z, t) in terms {
            if split
                .iter()
                .any(|l| l.pos() && l.z() == z.as_slice() && l.lhs() == *t)
            {
                continue;
            }
            if config.pel_filter && !relevant_split_term(setup, c, z, *t, k, tf) {
                continue;
            }
            trace!("split depth {} on term {:?}", k, t);
            // Case analysis: assign every candidate name of the term's sort.
            for n in split_names.of_sort(t.sort(tf)) {
                split.push(Literal::with_z(z.clone(), true, *t, n, tf));
                let holds = test_split(
                    setup,
                    split,
                    terms,
                    split_names,
                    sense,
                    c,
                    k - 1,
                    tf,
                    config,
                );
                split.pop();
                if !holds {
                    continue 'terms;
                }
            }
            return true;
        }
    }
    test_sense(setup, split, sense, sense.len(), c)
}

/// Split the sensing-fluent literals, longest prefix first; both polarities
/// must succeed. These splits are free: sensing outcomes of the actions a
/// clause talks about are always examined.
fn test_sense(
    setup: &Setup,
    split: &mut Vec<Literal>,
    sense: &[(Literal, Literal)],
    i: usize,
    c: &Clause,
) -> bool {
    if setup.subsumes(split, c) {
        return true;
    }
    if i == 0 {
        return false;
    }
    let (pos, neg) = &sense[i - 1];
    split.push(pos.clone());
    let mut holds = test_sense(setup, split, sense, i - 1, c);
    split.pop();
    if holds {
        split.push(neg.clone());
        holds = test_sense(setup, split, sense, i - 1, c);
        split.pop();
    }
    holds
}

/// The complete dual: can `k` name assignments witness consistency of the
/// setup? At the leaves every clause must be satisfied by the unit closure.
pub fn consistent_at(
    setup: &Setup,
    terms: &IndexSet<SplitTerm>,
    split_names: &SortedNames,
    k: usize,
    tf: &TermFactory,
) -> bool {
    if setup.has_empty_clause() {
        return false;
    }
    if setup.locally_consistent() {
        return true;
    }
    if k == 0 {
        return false;
    }
    for (z, t) in terms {
        if setup
            .unit_literals()
            .any(|u| u.pos() && u.z() == z.as_slice() && u.lhs() == *t)
        {
            continue;
        }
        for n in split_names.of_sort(t.sort(tf)) {
            let mut branch = setup.clone();
            branch.add(Clause::unit(
                Literal::with_z(z.clone(), true, *t, n, tf),
                tf,
            ));
            branch.propagate_units(tf);
            if consistent_at(&branch, terms, split_names, k - 1, tf) {
                return true;
            }
        }
    }
    false
}
