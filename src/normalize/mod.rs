//! Normalisation of query formulas.
//!
//! The pipeline runs in four stages:
//!
//! 1. [`flatten`] rewrites literals with nested function terms into
//!    universally guarded well-formed literals.
//! 2. [`ennf`] pushes negations and action modalities down to the literals
//!    and grounds quantifiers over the bounded name universe. The output
//!    mentions only name (in)equalities, literals, ∧ and ∨.
//! 3. [`simplify`] evaluates the name (in)equalities and short-circuits
//!    through the connectives; the result is either a truth value or a
//!    formula over literals, ∧ and ∨ only.
//! 4. [`cnf`] distributes ∨ over ∧, yielding a de-duplicated clause set.

use indexmap::IndexSet;

use crate::syntax::{Clause, Formula, Literal, SortedNames, SymbolFactory, Term, TermFactory};

/// Result of [`simplify`]: either the formula was decided outright, or a
/// residue over literals, ∧ and ∨ remains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Simplified {
    Truth(bool),
    Residue(Formula),
}

/// Rewrite every literal into well-formed shape by pulling nested function
/// terms out through universally quantified guard variables:
/// `f(g(n)) = m` becomes `∀x (g(n) ≠ x ∨ f(x) = m)`.
pub fn flatten(phi: Formula, sym: &mut SymbolFactory, tf: &mut TermFactory) -> Formula {
    match phi {
        Formula::Eq(..) | Formula::Neq(..) => phi,
        Formula::Lit(l) => flatten_literal(l, sym, tf),
        Formula::Or(a, b) => Formula::or(flatten(*a, sym, tf), flatten(*b, sym, tf)),
        Formula::And(a, b) => Formula::and(flatten(*a, sym, tf), flatten(*b, sym, tf)),
        Formula::Neg(a) => Formula::neg(flatten(*a, sym, tf)),
        Formula::Exists(v, a) => Formula::exists(v, flatten(*a, sym, tf)),
        Formula::Act(n, a) => Formula::act(n, flatten(*a, sym, tf)),
    }
}

fn flatten_literal(lit: Literal, sym: &mut SymbolFactory, tf: &mut TermFactory) -> Formula {
    if lit.is_well_formed(tf) {
        return Formula::Lit(lit);
    }
    let target = find_offender(lit.lhs(), tf)
        .or_else(|| find_offender(lit.rhs(), tf))
        .unwrap_or(lit.rhs());
    let x = tf.create_atom(sym.create_variable(target.sort(tf)));
    let guard = Literal::with_z(lit.z().to_vec(), false, target, x, tf);
    let rewritten = lit.substitute(&|t| if t == target { Some(x) } else { None }, tf);
    Formula::forall(
        x,
        Formula::or(
            flatten_literal(guard, sym, tf),
            flatten_literal(rewritten, sym, tf),
        ),
    )
}

/// The innermost argument below `t` that is not a quasi-name, if any.
fn find_offender(t: Term, tf: &TermFactory) -> Option<Term> {
    for i in 0..t.args(tf).len() {
        let a = t.arg(i, tf);
        if let Some(inner) = find_offender(a, tf) {
            return Some(inner);
        }
        if !a.is_quasi_name(tf) {
            return Some(a);
        }
    }
    None
}

/// Transform a formula into extended negation normal form: no negation, no
/// quantifier, no action modality; prefixes accumulate onto the literals.
pub fn ennf(phi: Formula, hplus: &SortedNames, tf: &mut TermFactory) -> Formula {
    ennf_h(phi, hplus, tf, false, &[])
}

fn ennf_h(
    phi: Formula,
    hplus: &SortedNames,
    tf: &mut TermFactory,
    flip: bool,
    z: &[Term],
) -> Formula {
    match phi {
        Formula::Eq(a, b) => {
            if flip {
                Formula::Neq(a, b)
            } else {
                Formula::Eq(a, b)
            }
        }
        Formula::Neq(a, b) => {
            if flip {
                Formula::Eq(a, b)
            } else {
                Formula::Neq(a, b)
            }
        }
        Formula::Lit(l) => {
            let l = if flip { l.flip() } else { l };
            Formula::Lit(l.prepend_z(z))
        }
        Formula::Or(a, b) => {
            let a = ennf_h(*a, hplus, tf, flip, z);
            let b = ennf_h(*b, hplus, tf, flip, z);
            if flip {
                Formula::and(a, b)
            } else {
                Formula::or(a, b)
            }
        }
        Formula::And(a, b) => {
            let a = ennf_h(*a, hplus, tf, flip, z);
            let b = ennf_h(*b, hplus, tf, flip, z);
            if flip {
                Formula::or(a, b)
            } else {
                Formula::and(a, b)
            }
        }
        Formula::Neg(a) => ennf_h(*a, hplus, tf, !flip, z),
        Formula::Exists(v, body) => {
            let names: Vec<Term> = hplus.of_sort(v.sort(tf)).collect();
            assert!(
                !names.is_empty(),
                "herbrand universe must cover every quantified sort"
            );
            let parts = names
                .into_iter()
                .map(|n| {
                    let instance = substitute_formula((*body).clone(), v, n, tf);
                    ennf_h(instance, hplus, tf, flip, z)
                })
                .collect::<Vec<_>>();
            let join = if flip { Formula::and } else { Formula::or };
            parts.into_iter().reduce(join).unwrap()
        }
        Formula::Act(a, body) => {
            let mut zz = Vec::with_capacity(z.len() + 1);
            zz.extend_from_slice(z);
            zz.push(a);
            ennf_h(*body, hplus, tf, flip, &zz)
        }
    }
}

/// Substitute a name for a bound variable throughout a formula, stopping at
/// shadowing quantifiers.
fn substitute_formula(phi: Formula, var: Term, name: Term, tf: &mut TermFactory) -> Formula {
    let theta = |t: Term| if t == var { Some(name) } else { None };
    match phi {
        Formula::Eq(..) | Formula::Neq(..) => phi,
        Formula::Lit(l) => Formula::Lit(l.substitute(&theta, tf)),
        Formula::Or(a, b) => Formula::or(
            substitute_formula(*a, var, name, tf),
            substitute_formula(*b, var, name, tf),
        ),
        Formula::And(a, b) => Formula::and(
            substitute_formula(*a, var, name, tf),
            substitute_formula(*b, var, name, tf),
        ),
        Formula::Neg(a) => Formula::neg(substitute_formula(*a, var, name, tf)),
        Formula::Exists(v, a) => {
            if v == var {
                Formula::Exists(v, a)
            } else {
                Formula::exists(v, substitute_formula(*a, var, name, tf))
            }
        }
        Formula::Act(n, a) => {
            let n = if n == var { name } else { n };
            Formula::act(n, substitute_formula(*a, var, name, tf))
        }
    }
}

/// Evaluate name (in)equalities and propagate the truth values through the
/// connectives.
pub fn simplify(phi: Formula) -> Simplified {
    match phi {
        Formula::Eq(a, b) => Simplified::Truth(a == b),
        Formula::Neq(a, b) => Simplified::Truth(a != b),
        Formula::Lit(_) => Simplified::Residue(phi),
        Formula::Or(a, b) => match simplify(*a) {
            Simplified::Truth(true) => Simplified::Truth(true),
            Simplified::Truth(false) => simplify(*b),
            Simplified::Residue(a) => match simplify(*b) {
                Simplified::Truth(true) => Simplified::Truth(true),
                Simplified::Truth(false) => Simplified::Residue(a),
                Simplified::Residue(b) => Simplified::Residue(Formula::or(a, b)),
            },
        },
        Formula::And(a, b) => match simplify(*a) {
            Simplified::Truth(false) => Simplified::Truth(false),
            Simplified::Truth(true) => simplify(*b),
            Simplified::Residue(a) => match simplify(*b) {
                Simplified::Truth(false) => Simplified::Truth(false),
                Simplified::Truth(true) => Simplified::Residue(a),
                Simplified::Residue(b) => Simplified::Residue(Formula::and(a, b)),
            },
        },
        Formula::Neg(..) | Formula::Exists(..) | Formula::Act(..) => {
            panic!("simplify expects a formula in extended negation normal form")
        }
    }
}

/// Distribute ∨ over ∧. Valid clauses collapse to the valid marker; the
/// clause set de-duplicates. Bounded because the input was normalised.
pub fn cnf(phi: &Formula, tf: &TermFactory) -> IndexSet<Clause> {
    match phi {
        Formula::Lit(l) => {
            let mut set = IndexSet::new();
            set.insert(Clause::new(vec![l.clone()], tf));
            set
        }
        Formula::Or(a, b) => {
            let left = cnf(a, tf);
            let right = cnf(b, tf);
            let mut set = IndexSet::with_capacity(left.len() * right.len());
            for c1 in &left {
                for c2 in &right {
                    set.insert(c1.union(c2, tf));
                }
            }
            set
        }
        Formula::And(a, b) => {
            let mut set = cnf(a, tf);
            set.extend(cnf(b, tf));
            set
        }
        _ => panic!("cnf expects a simplified formula over literals, ∧ and ∨"),
    }
}

/// The distinct action sequences attached to any literal of the formula.
pub fn action_prefixes(phi: &Formula) -> IndexSet<Vec<Term>> {
    let mut zs = IndexSet::new();
    collect_prefixes(phi, &mut zs);
    zs
}

fn collect_prefixes(phi: &Formula, zs: &mut IndexSet<Vec<Term>>) {
    match phi {
        Formula::Eq(..) | Formula::Neq(..) => {}
        Formula::Lit(l) => {
            zs.insert(l.z().to_vec());
        }
        Formula::Or(a, b) | Formula::And(a, b) => {
            collect_prefixes(a, zs);
            collect_prefixes(b, zs);
        }
        _ => panic!("action prefixes are collected after the ennf transform"),
    }
}
