use proptest::prelude::*;

use indexmap::IndexSet;

use crate::normalize::{cnf, ennf, simplify, Simplified};
use crate::syntax::{
    Clause, Formula, Literal, SortedNames, SymbolFactory, Term, TermFactory,
};

// =============================================================================
// PROPERTY-BASED TESTS
// =============================================================================
//
// These use proptest to verify the quantified invariants for arbitrary
// inputs: interning idempotence, literal and clause normalisation, normal
// form equivalence, and monotonicity of entailment in the split budget.

/// A structural description of a propositional formula over `N_ATOMS`
/// atoms; materialised against a fresh context inside each test case.
#[derive(Debug, Clone)]
enum Shape {
    Atom(usize, bool),
    And(Box<Shape>, Box<Shape>),
    Or(Box<Shape>, Box<Shape>),
    Not(Box<Shape>),
}

const N_ATOMS: usize = 3;

fn arb_shape(depth: u32) -> impl Strategy<Value = Shape> {
    let leaf = (0..N_ATOMS, any::<bool>()).prop_map(|(i, pos)| Shape::Atom(i, pos));
    leaf.prop_recursive(depth, 16, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Shape::And(Box::new(a), Box::new(b))),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Shape::Or(Box::new(a), Box::new(b))),
            inner.prop_map(|a| Shape::Not(Box::new(a))),
        ]
    })
}

struct Bench {
    tf: TermFactory,
    t: Term,
    atoms: Vec<Term>,
}

fn bench() -> Bench {
    let mut sym = SymbolFactory::new();
    let mut tf = TermFactory::new();
    let sort = sym.create_sort();
    let t = tf.create_atom(sym.create_name(sort));
    let atoms = (0..N_ATOMS)
        .map(|_| {
            let f = sym.create_function(sort, 0);
            tf.create_atom(f)
        })
        .collect();
    Bench { tf, t, atoms }
}

impl Bench {
    fn build(&self, shape: &Shape) -> Formula {
        match shape {
            Shape::Atom(i, pos) => {
                let l = Literal::eq(self.atoms[*i], self.t, &self.tf);
                Formula::lit(if *pos { l } else { l.flip() })
            }
            Shape::And(a, b) => Formula::and(self.build(a), self.build(b)),
            Shape::Or(a, b) => Formula::or(self.build(a), self.build(b)),
            Shape::Not(a) => Formula::neg(self.build(a)),
        }
    }

    fn eval_shape(&self, shape: &Shape, model: &[bool]) -> bool {
        match shape {
            Shape::Atom(i, pos) => model[*i] == *pos,
            Shape::And(a, b) => self.eval_shape(a, model) && self.eval_shape(b, model),
            Shape::Or(a, b) => self.eval_shape(a, model) || self.eval_shape(b, model),
            Shape::Not(a) => !self.eval_shape(a, model),
        }
    }

    fn eval_clauses(&self, clauses: &IndexSet<Clause>, model: &[bool]) -> bool {
        clauses.iter().all(|c| {
            c.is_valid()
                || c.literals().iter().any(|l| {
                    let i = self
                        .atoms
                        .iter()
                        .position(|&a| a == l.lhs())
                        .expect("literal over known atoms");
                    model[i] == l.pos()
                })
        })
    }
}

fn models() -> impl Iterator<Item = Vec<bool>> {
    (0..1usize << N_ATOMS).map(|bits| (0..N_ATOMS).map(|i| bits & (1 << i) != 0).collect())
}

// -----------------------------------------------------------------------------
// Interning
// -----------------------------------------------------------------------------

proptest! {
    #[test]
    fn interning_is_idempotent(arity in 0usize..4, repeats in 1usize..4) {
        let mut sym = SymbolFactory::new();
        let mut tf = TermFactory::new();
        let sort = sym.create_sort();
        let args: Vec<Term> = (0..arity).map(|_| tf.create_atom(sym.create_name(sort))).collect();
        let f = sym.create_function(sort, arity as u8);
        let first = tf.create_term(f, args.clone());
        for _ in 0..repeats {
            prop_assert_eq!(tf.create_term(f, args.clone()), first);
        }
    }
}

// -----------------------------------------------------------------------------
// Literal normalisation
// -----------------------------------------------------------------------------

proptest! {
    #[test]
    fn literal_construction_is_order_insensitive(pos in any::<bool>(), swap in any::<bool>()) {
        let mut sym = SymbolFactory::new();
        let mut tf = TermFactory::new();
        let sort = sym.create_sort();
        let n1 = tf.create_atom(sym.create_name(sort));
        let n2 = tf.create_atom(sym.create_name(sort));
        let (a, b) = if swap { (n2, n1) } else { (n1, n2) };
        let l1 = Literal::with_z(Vec::new(), pos, a, b, &tf);
        let l2 = Literal::with_z(Vec::new(), pos, b, a, &tf);
        prop_assert_eq!(l1, l2);
    }

    #[test]
    fn function_side_ends_up_left(pos in any::<bool>(), swap in any::<bool>()) {
        let mut sym = SymbolFactory::new();
        let mut tf = TermFactory::new();
        let sort = sym.create_sort();
        let n = tf.create_atom(sym.create_name(sort));
        let f = sym.create_function(sort, 1);
        let fn_ = tf.create_term(f, vec![n]);
        let (a, b) = if swap { (n, fn_) } else { (fn_, n) };
        let l = Literal::with_z(Vec::new(), pos, a, b, &tf);
        prop_assert_eq!(l.lhs(), fn_);
        prop_assert_eq!(l.rhs(), n);
        prop_assert_eq!(l.pos(), pos);
    }

    #[test]
    fn flip_is_an_involution(pos in any::<bool>()) {
        let mut sym = SymbolFactory::new();
        let mut tf = TermFactory::new();
        let sort = sym.create_sort();
        let n = tf.create_atom(sym.create_name(sort));
        let f = sym.create_function(sort, 1);
        let fn_ = tf.create_term(f, vec![n]);
        let l = Literal::with_z(Vec::new(), pos, fn_, n, &tf);
        prop_assert_eq!(l.flip().flip(), l.clone());
        prop_assert_eq!(l.flip().pos(), !l.pos());
    }
}

// -----------------------------------------------------------------------------
// Clause normalisation
// -----------------------------------------------------------------------------

proptest! {
    #[test]
    fn normalized_clause_has_no_internal_subsumption(
        picks in prop::collection::vec((0usize..N_ATOMS, any::<bool>()), 0..6)
    ) {
        let w = bench();
        let lits: Vec<Literal> = picks
            .iter()
            .map(|&(i, pos)| {
                let l = Literal::eq(w.atoms[i], w.t, &w.tf);
                if pos { l } else { l.flip() }
            })
            .collect();
        let c = Clause::new(lits, &w.tf);
        if !c.is_valid() {
            for (i, a) in c.literals().iter().enumerate() {
                for (j, b) in c.literals().iter().enumerate() {
                    if i != j {
                        prop_assert!(!a.subsumes(b));
                    }
                }
            }
        }
    }

    #[test]
    fn complementary_pair_always_collapses(
        i in 0usize..N_ATOMS,
        extra in prop::collection::vec((0usize..N_ATOMS, any::<bool>()), 0..4)
    ) {
        let w = bench();
        let mut lits = vec![
            Literal::eq(w.atoms[i], w.t, &w.tf),
            Literal::neq(w.atoms[i], w.t, &w.tf),
        ];
        for &(j, pos) in &extra {
            let l = Literal::eq(w.atoms[j], w.t, &w.tf);
            lits.push(if pos { l } else { l.flip() });
        }
        let c = Clause::new(lits, &w.tf);
        prop_assert!(c.is_valid());
    }
}

// -----------------------------------------------------------------------------
// Normal form equivalence
// -----------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]
    #[test]
    fn normal_forms_preserve_models(shape in arb_shape(3)) {
        let mut w = bench();
        let phi = w.build(&shape);
        let empty = SortedNames::new();
        let normal = ennf(phi, &empty, &mut w.tf);
        match simplify(normal) {
            Simplified::Truth(v) => {
                for model in models() {
                    prop_assert_eq!(w.eval_shape(&shape, &model), v);
                }
            }
            Simplified::Residue(residue) => {
                let clauses = cnf(&residue, &w.tf);
                for model in models() {
                    prop_assert_eq!(
                        w.eval_shape(&shape, &model),
                        w.eval_clauses(&clauses, &model),
                        "normal form diverges under {:?}",
                        model
                    );
                }
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Monotonicity in the split budget
// -----------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]
    #[test]
    fn entailment_is_monotone_in_k(
        theory in prop::collection::vec(
            prop::collection::vec((0usize..N_ATOMS, any::<bool>()), 1..3),
            0..4
        ),
        query in prop::collection::vec((0usize..N_ATOMS, any::<bool>()), 1..3)
    ) {
        let mut solver = crate::solver::Solver::new();
        let bool_sort = solver.ctx.bool_sort();
        let t = solver.ctx.name_true();
        let atoms: Vec<Term> = (0..N_ATOMS)
            .map(|_| {
                let f = solver.ctx.create_function(bool_sort, 0);
                solver.ctx.create_fun_term(f, Vec::new())
            })
            .collect();
        let lit = |i: usize, pos: bool, tf: &TermFactory| {
            let l = Literal::eq(atoms[i], t, tf);
            if pos { l } else { l.flip() }
        };
        for clause in &theory {
            let lits: Vec<Literal> = clause
                .iter()
                .map(|&(i, pos)| lit(i, pos, &solver.ctx.terms))
                .collect();
            let uc = crate::theory::UnivClause::fact(lits, &solver.ctx.terms);
            solver.add_static(uc);
        }
        let phi = Formula::or_all(
            query
                .iter()
                .map(|&(i, pos)| Formula::lit(lit(i, pos, &solver.ctx.terms))),
        )
        .unwrap();
        let mut previous = false;
        for k in 0..3 {
            let now = solver.entails(k, phi.clone());
            prop_assert!(
                !previous || now,
                "entailment lost when raising the budget to {}",
                k
            );
            previous = now;
        }
    }
}
