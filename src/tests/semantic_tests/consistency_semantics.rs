use super::PropKit;
use crate::solver::Solver;
use crate::syntax::{Formula, Literal, Symbol, Term};

// =============================================================================
// COMPLETE (CONCEIVABILITY) REASONING
// =============================================================================
//
// Reference: [SL16]. The complete reasoner over-claims at small budgets and
// refines as k grows, dually to the sound one. The Aussie/Italian/Veggie
// theory is the paper's running example.

struct EcaiTheory {
    solver: Solver,
    aussie: Term,
    italian: Term,
}

/// Meat(roo); Meat(x) ^ Eats(x) -> ~Veggie; Aussie xor Italian;
/// Aussie -> Eats(roo); ~Italian -> Veggie.
fn ecai_theory() -> EcaiTheory {
    let mut solver = Solver::new();
    let bool_sort = solver.ctx.bool_sort();
    let t = solver.ctx.name_true();
    let food = solver.ctx.create_sort();
    let roo = solver.ctx.create_name(food);
    let aussie = make_prop(&mut solver, bool_sort);
    let italian = make_prop(&mut solver, bool_sort);
    let veggie = make_prop(&mut solver, bool_sort);
    let eats = solver.ctx.create_function(bool_sort, 1);
    let meat = solver.ctx.create_function(bool_sort, 1);
    let x = solver.ctx.create_variable(food);

    let meat_roo = solver.ctx.create_fun_term(meat, vec![roo]);
    let meat_x = solver.ctx.create_fun_term(meat, vec![x]);
    let eats_x = solver.ctx.create_fun_term(eats, vec![x]);
    let eats_roo = solver.ctx.create_fun_term(eats, vec![roo]);

    let clauses = {
        let tf = &solver.ctx.terms;
        vec![
            vec![Literal::eq(meat_roo, t, tf)],
            vec![
                Literal::neq(meat_x, t, tf),
                Literal::neq(eats_x, t, tf),
                Literal::neq(veggie, t, tf),
            ],
            vec![Literal::neq(aussie, t, tf), Literal::neq(italian, t, tf)],
            vec![Literal::eq(aussie, t, tf), Literal::eq(italian, t, tf)],
            vec![Literal::neq(aussie, t, tf), Literal::eq(eats_roo, t, tf)],
            vec![Literal::eq(italian, t, tf), Literal::eq(veggie, t, tf)],
        ]
    };
    for lits in clauses {
        let clause = crate::theory::UnivClause::new(
            crate::theory::Ewff::top(),
            lits,
            &solver.ctx.terms,
        );
        solver.add_static(clause);
    }
    EcaiTheory {
        solver,
        aussie,
        italian,
    }
}

fn make_prop(solver: &mut Solver, bool_sort: crate::syntax::Sort) -> Term {
    let f: Symbol = solver.ctx.create_function(bool_sort, 0);
    solver.ctx.create_fun_term(f, Vec::new())
}

fn fails(solver: &Solver, atom: Term) -> Formula {
    let t = solver.ctx.name_true();
    Formula::lit(Literal::neq(atom, t, &solver.ctx.terms))
}

fn holds(solver: &Solver, atom: Term) -> Formula {
    let t = solver.ctx.name_true();
    Formula::lit(Literal::eq(atom, t, &solver.ctx.terms))
}

#[test]
fn sound_reasoner_learns_not_aussie_at_effort_one() {
    let mut th = ecai_theory();
    let query = fails(&th.solver, th.aussie);
    assert!(!th.solver.entails(0, query.clone()));
    assert!(th.solver.entails(1, query));
}

#[test]
fn sound_reasoner_never_claims_not_italian() {
    let mut th = ecai_theory();
    let query = fails(&th.solver, th.italian);
    for k in 0..3 {
        assert!(!th.solver.entails(k, query.clone()));
    }
}

#[test]
fn complete_reasoner_overclaims_then_retracts() {
    let mut th = ecai_theory();
    let query = fails(&th.solver, th.italian);
    assert!(th.solver.entails_complete(0, query.clone()));
    assert!(!th.solver.entails_complete(1, query));
}

#[test]
fn consistency_witness_for_italian_needs_one_assignment() {
    let mut th = ecai_theory();
    let query = holds(&th.solver, th.italian);
    assert!(!th.solver.consistent(0, query.clone()));
    assert!(th.solver.consistent(1, query));
}

#[test]
fn complete_reasoner_agrees_on_actual_consequences() {
    // Where the sound reasoner already succeeds, the complete one does too.
    let mut kit = PropKit::new();
    let p = kit.atom();
    let q = kit.atom();
    kit.add_clause(vec![kit.lit(p, true)]);
    kit.add_clause(vec![kit.lit(p, false), kit.lit(q, true)]);
    assert!(kit.solver.entails(0, kit.holds(q)));
    assert!(kit.solver.entails_complete(0, kit.holds(q)));
    assert!(kit.solver.entails_complete(1, kit.holds(q)));
}

#[test]
fn contradictory_theory_has_no_witness_at_any_budget() {
    let mut kit = PropKit::new();
    let p = kit.atom();
    kit.add_clause(vec![kit.lit(p, true)]);
    kit.add_clause(vec![kit.lit(p, false)]);
    for k in 0..3 {
        assert!(!kit.solver.consistent(k, kit.holds(p)));
        assert!(kit.solver.entails_complete(k, kit.fails(p)));
    }
}
