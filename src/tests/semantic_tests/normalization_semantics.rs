use indexmap::IndexSet;

use crate::normalize::{cnf, ennf, flatten, simplify, Simplified};
use crate::syntax::{Clause, Formula, Literal, SortedNames, SymbolFactory, Term, TermFactory};

// =============================================================================
// NORMAL FORM EQUIVALENCE
// =============================================================================
//
// The ennf and cnf transforms must preserve the models of the formula. For
// the propositional fragment the models are truth assignments to the atoms,
// which we can enumerate exhaustively.

struct PropWorld {
    sym: SymbolFactory,
    tf: TermFactory,
    t: Term,
    atoms: Vec<Term>,
}

fn world(n_atoms: usize) -> PropWorld {
    let mut sym = SymbolFactory::new();
    let mut tf = TermFactory::new();
    let sort = sym.create_sort();
    let t = tf.create_atom(sym.create_name(sort));
    let atoms = (0..n_atoms)
        .map(|_| {
            let f = sym.create_function(sort, 0);
            tf.create_atom(f)
        })
        .collect();
    PropWorld { sym, tf, t, atoms }
}

impl PropWorld {
    fn lit(&self, i: usize, positive: bool) -> Literal {
        let l = Literal::eq(self.atoms[i], self.t, &self.tf);
        if positive {
            l
        } else {
            l.flip()
        }
    }

    fn holds(&self, i: usize) -> Formula {
        Formula::lit(self.lit(i, true))
    }

    /// Truth of a literal under an assignment of the atoms.
    fn eval_literal(&self, l: &Literal, model: &[bool]) -> bool {
        let i = self
            .atoms
            .iter()
            .position(|&a| a == l.lhs())
            .expect("literal over known atoms");
        model[i] == l.pos()
    }

    fn eval_formula(&self, phi: &Formula, model: &[bool]) -> bool {
        match phi {
            Formula::Eq(a, b) => a == b,
            Formula::Neq(a, b) => a != b,
            Formula::Lit(l) => self.eval_literal(l, model),
            Formula::Or(a, b) => self.eval_formula(a, model) || self.eval_formula(b, model),
            Formula::And(a, b) => self.eval_formula(a, model) && self.eval_formula(b, model),
            Formula::Neg(a) => !self.eval_formula(a, model),
            _ => panic!("propositional formulas only"),
        }
    }

    fn eval_clauses(&self, clauses: &IndexSet<Clause>, model: &[bool]) -> bool {
        clauses.iter().all(|c| {
            c.is_valid()
                || c.literals()
                    .iter()
                    .any(|l| self.eval_literal(l, model))
        })
    }

    fn models(&self) -> impl Iterator<Item = Vec<bool>> {
        let n = self.atoms.len();
        (0..1usize << n).map(move |bits| (0..n).map(|i| bits & (1 << i) != 0).collect())
    }
}

fn assert_equivalent_after_normalization(w: &mut PropWorld, phi: Formula) {
    let empty = SortedNames::new();
    let normal = ennf(phi.clone(), &empty, &mut w.tf);
    for model in w.models() {
        assert_eq!(
            w.eval_formula(&phi, &model),
            w.eval_formula(&normal, &model),
            "ennf changed the meaning of {:?} under {:?}",
            phi,
            model
        );
    }
    match simplify(normal.clone()) {
        Simplified::Truth(v) => {
            for model in w.models() {
                assert_eq!(w.eval_formula(&phi, &model), v);
            }
        }
        Simplified::Residue(residue) => {
            let clauses = cnf(&residue, &w.tf);
            for model in w.models() {
                assert_eq!(
                    w.eval_formula(&phi, &model),
                    w.eval_clauses(&clauses, &model),
                    "cnf changed the meaning of {:?} under {:?}",
                    phi,
                    model
                );
            }
        }
    }
}

#[test]
fn normalization_preserves_simple_combinations() {
    let mut w = world(3);
    let cases = vec![
        w.holds(0),
        Formula::neg(w.holds(0)),
        Formula::or(w.holds(0), Formula::neg(w.holds(1))),
        Formula::and(w.holds(0), Formula::or(w.holds(1), w.holds(2))),
        Formula::neg(Formula::and(w.holds(0), w.holds(1))),
        Formula::neg(Formula::or(
            Formula::and(w.holds(0), w.holds(1)),
            Formula::neg(w.holds(2)),
        )),
        Formula::implies(w.holds(0), Formula::and(w.holds(1), w.holds(2))),
        Formula::iff(w.holds(0), Formula::neg(w.holds(1))),
    ];
    for phi in cases {
        assert_equivalent_after_normalization(&mut w, phi);
    }
}

#[test]
fn double_negation_normalizes_away() {
    let mut w = world(1);
    let empty = SortedNames::new();
    let phi = Formula::neg(Formula::neg(w.holds(0)));
    let normal = ennf(phi, &empty, &mut w.tf);
    assert_eq!(normal, w.holds(0));
}

#[test]
fn ennf_output_is_action_and_quantifier_free() {
    let mut w = world(2);
    let mut names = SortedNames::new();
    names.insert(w.t, &w.tf);
    let sort = w.t.sort(&w.tf);
    let x = w.tf.create_atom(w.sym.create_variable(sort));
    let phi = Formula::neg(Formula::exists(
        x,
        Formula::act(w.t, Formula::and(w.holds(0), Formula::neg(w.holds(1)))),
    ));
    let normal = ennf(phi, &names, &mut w.tf);
    fn check(phi: &Formula) {
        match phi {
            Formula::Eq(..) | Formula::Neq(..) | Formula::Lit(_) => {}
            Formula::Or(a, b) | Formula::And(a, b) => {
                check(a);
                check(b);
            }
            other => panic!("forbidden ennf node {:?}", other),
        }
    }
    check(&normal);
}

#[test]
fn quantifier_grounding_respects_sorts() {
    let mut w = world(0);
    let sort_a = w.sym.create_sort();
    let sort_b = w.sym.create_sort();
    let a1 = w.tf.create_atom(w.sym.create_name(sort_a));
    let a2 = w.tf.create_atom(w.sym.create_name(sort_a));
    let b1 = w.tf.create_atom(w.sym.create_name(sort_b));
    let mut names = SortedNames::new();
    for n in [a1, a2, b1] {
        names.insert(n, &w.tf);
    }
    let f = w.sym.create_function(sort_a, 1);
    let x = w.tf.create_atom(w.sym.create_variable(sort_a));
    let fx = w.tf.create_term(f, vec![x]);
    let phi = Formula::exists(x, Formula::lit(Literal::eq(fx, a1, &w.tf)));
    let normal = ennf(phi, &names, &mut w.tf);
    // Two names of sort_a, so exactly one disjunction; b1 plays no part.
    match normal {
        Formula::Or(lhs, rhs) => {
            assert!(matches!(*lhs, Formula::Lit(_)));
            assert!(matches!(*rhs, Formula::Lit(_)));
        }
        other => panic!("expected a two-way disjunction, got {:?}", other),
    }
}

#[test]
fn flattening_preserves_meaning_of_nested_functions() {
    // f(g(n)) = m against a theory pinning g(n); flattening must not change
    // what is entailed.
    let mut solver = crate::solver::Solver::new();
    let sort = solver.ctx.create_sort();
    let n = solver.ctx.create_name(sort);
    let m = solver.ctx.create_name(sort);
    let f = solver.ctx.create_function(sort, 1);
    let g = solver.ctx.create_function(sort, 1);
    let gn = solver.ctx.create_fun_term(g, vec![n]);
    let fgn = solver.ctx.create_fun_term(f, vec![gn]);
    let fn_ = solver.ctx.create_fun_term(f, vec![n]);

    let facts = vec![
        vec![Literal::eq(gn, n, &solver.ctx.terms)],
        vec![Literal::eq(fn_, m, &solver.ctx.terms)],
    ];
    for lits in facts {
        let clause = crate::theory::UnivClause::fact(lits, &solver.ctx.terms);
        solver.add_static(clause);
    }
    let query = Formula::lit(Literal::eq(fgn, m, &solver.ctx.terms));
    assert!(solver.entails(0, query));

    let bad = Formula::lit(Literal::neq(fgn, m, &solver.ctx.terms));
    assert!(!solver.entails(1, bad));
}

#[test]
fn cnf_of_nested_formula_is_bounded_and_deduplicated() {
    let mut w = world(2);
    let phi = Formula::or(
        Formula::and(w.holds(0), w.holds(1)),
        Formula::and(w.holds(0), w.holds(1)),
    );
    let empty = SortedNames::new();
    let normal = ennf(phi, &empty, &mut w.tf);
    let residue = match simplify(normal) {
        Simplified::Residue(r) => r,
        other => panic!("unexpected simplification {:?}", other),
    };
    let clauses = cnf(&residue, &w.tf);
    // (p ∧ q) ∨ (p ∧ q) yields {p, p∨q, q} worth of unions, deduplicated.
    assert!(clauses.len() <= 4);
    assert!(clauses.iter().all(|c| c.len() <= 2));
}

#[test]
fn flatten_rewrites_to_well_formed_literals_only() {
    let mut w = world(0);
    let sort = w.t.sort(&w.tf);
    let f = w.sym.create_function(sort, 1);
    let g = w.sym.create_function(sort, 1);
    let h = w.sym.create_function(sort, 1);
    let n = w.tf.create_atom(w.sym.create_name(sort));
    let hn = w.tf.create_term(h, vec![n]);
    let ghn = w.tf.create_term(g, vec![hn]);
    let fghn = w.tf.create_term(f, vec![ghn]);
    let phi = Formula::lit(Literal::eq(fghn, n, &w.tf));
    let flat = flatten(phi, &mut w.sym, &mut w.tf);
    let mut names = SortedNames::new();
    names.insert(w.t, &w.tf);
    names.insert(n, &w.tf);
    let normal = ennf(flat, &names, &mut w.tf);
    let mut stack = vec![&normal];
    while let Some(node) = stack.pop() {
        match node {
            Formula::Lit(l) => assert!(l.is_well_formed(&w.tf)),
            Formula::Or(a, b) | Formula::And(a, b) => {
                stack.push(a);
                stack.push(b);
            }
            Formula::Eq(..) | Formula::Neq(..) => {}
            other => panic!("forbidden node {:?}", other),
        }
    }
}
