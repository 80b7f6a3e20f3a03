//! Grounding of universal clauses over the bounded name universe.

use indexmap::IndexSet;
use itertools::Itertools;
use log::debug;

use crate::solver::Setup;
use crate::syntax::{Clause, SortedNames, Term, TermFactory};
use crate::theory::{Bat, BoxUnivClause, UnivClause};
use crate::unify::Substitution;

/// Materialise the ground clause set for one query.
///
/// Static clauses are instantiated over every variable-to-name assignment
/// whose ewff holds. Boxed clauses are additionally instantiated once per
/// prefix of the query's action sequences (the empty prefix included), with
/// the prefix prepended to every literal.
pub fn ground_clauses(
    bat: &Bat,
    hplus: &SortedNames,
    query_zs: &IndexSet<Vec<Term>>,
    tf: &mut TermFactory,
) -> Setup {
    let mut prefixes: IndexSet<Vec<Term>> = IndexSet::new();
    prefixes.insert(Vec::new());
    for z in query_zs {
        for i in 1..=z.len() {
            prefixes.insert(z[..i].to_vec());
        }
    }

    let mut setup = Setup::new();
    for uc in bat.statics() {
        ground_univ_clause(uc, &[], hplus, tf, &mut setup);
    }
    for BoxUnivClause(uc) in bat.boxeds() {
        for z in &prefixes {
            ground_univ_clause(uc, z, hplus, tf, &mut setup);
        }
    }
    debug!(
        "grounded {} clauses over {} names and {} prefixes",
        setup.len(),
        hplus.len(),
        prefixes.len()
    );
    setup
}

fn ground_univ_clause(
    uc: &UnivClause,
    prefix: &[Term],
    hplus: &SortedNames,
    tf: &mut TermFactory,
    setup: &mut Setup,
) {
    let vars: Vec<Term> = uc.variables().iter().copied().collect();
    if vars.is_empty() {
        emit_instance(uc, prefix, &Substitution::new(), hplus, tf, setup);
        return;
    }
    let choices: Vec<Vec<Term>> = vars
        .iter()
        .map(|v| hplus.of_sort(v.sort(tf)).collect())
        .collect();
    if choices.iter().any(|c| c.is_empty()) {
        return;
    }
    for combo in choices.into_iter().multi_cartesian_product() {
        let mut theta = Substitution::new();
        for (&v, n) in vars.iter().zip(combo) {
            theta.add(v, n);
        }
        emit_instance(uc, prefix, &theta, hplus, tf, setup);
    }
}

fn emit_instance(
    uc: &UnivClause,
    prefix: &[Term],
    theta: &Substitution,
    hplus: &SortedNames,
    tf: &mut TermFactory,
    setup: &mut Setup,
) {
    if !uc.ewff.satisfied(theta) {
        return;
    }
    let lits: Vec<_> = uc
        .lits
        .iter()
        .map(|l| l.prepend_z(prefix).substitute(&|t| theta.get(t), tf))
        .collect();
    // An instance whose action sequence leaves the universe contributes
    // nothing to any query.
    if lits
        .iter()
        .any(|l| l.z().last().is_some_and(|&a| !hplus.contains(a, tf)))
    {
        return;
    }
    let c = Clause::new(lits, tf);
    if c.is_valid() {
        return;
    }
    setup.add(c);
}
