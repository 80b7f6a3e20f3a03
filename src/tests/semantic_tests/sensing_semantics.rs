use crate::session::{ExecResult, Session};
use crate::solver::Solver;
use crate::syntax::{Formula, Literal, Term};
use crate::theory::{BoxUnivClause, UnivClause};

// =============================================================================
// ACTIONS AND SENSING
// =============================================================================
//
// Reference: [LL14]. Boxed clauses hold after every action sequence;
// sensing-fluent literals of the query's prefixes are split without
// consuming the budget; recorded sensing results strengthen the setup.

struct SenseKit {
    solver: Solver,
    sonar: Term,
    close: Term,
}

/// An action `sonar` and a fluent `close` with no static information.
fn sense_kit() -> SenseKit {
    let mut solver = Solver::new();
    let bool_sort = solver.ctx.bool_sort();
    let action = solver.ctx.create_sort();
    let sonar = solver.ctx.create_name(action);
    let close_fn = solver.ctx.create_function(bool_sort, 0);
    let close = solver.ctx.create_fun_term(close_fn, Vec::new());
    SenseKit {
        solver,
        sonar,
        close,
    }
}

impl SenseKit {
    fn close_after_sonar(&self) -> Formula {
        let t = self.solver.ctx.name_true();
        let lit = Literal::eq(self.close, t, &self.solver.ctx.terms);
        Formula::act(self.sonar, Formula::lit(lit))
    }

    /// box(SF(sonar) = r → [sonar] close = v).
    fn add_sensing_axiom(&mut self, sensed: bool, value: bool) {
        let t = self.solver.ctx.name_true();
        let sf = self.solver.ctx.sf_literal(&[], self.sonar, sensed);
        let close_lit = Literal::with_z(
            vec![self.sonar],
            value,
            self.close,
            t,
            &self.solver.ctx.terms,
        );
        let clause = UnivClause::fact(vec![sf.flip(), close_lit], &self.solver.ctx.terms);
        self.solver.add_boxed(BoxUnivClause(clause));
    }
}

#[test]
fn sensing_axiom_alone_leaves_fluent_open() {
    let mut kit = sense_kit();
    kit.add_sensing_axiom(true, true);
    // Without the sensing outcome the fluent after the action is unknown.
    for k in 0..2 {
        assert!(!kit.solver.entails(k, kit.close_after_sonar()));
    }
}

#[test]
fn sense_split_settles_outcome_independent_fluents_at_effort_zero() {
    let mut kit = sense_kit();
    // Whatever the sensor says, close holds afterwards; the sensing split
    // covers both polarities without touching k.
    kit.add_sensing_axiom(true, true);
    kit.add_sensing_axiom(false, true);
    assert!(kit.solver.entails(0, kit.close_after_sonar()));
}

#[test]
fn recorded_sensing_result_strengthens_the_setup() {
    let mut kit = sense_kit();
    kit.add_sensing_axiom(true, true);
    kit.solver.add_sensing_result(Vec::new(), kit.sonar, true);
    assert!(kit.solver.entails(0, kit.close_after_sonar()));
}

#[test]
fn opposite_sensing_result_does_not_help() {
    let mut kit = sense_kit();
    kit.add_sensing_axiom(true, true);
    kit.solver.add_sensing_result(Vec::new(), kit.sonar, false);
    assert!(!kit.solver.entails(1, kit.close_after_sonar()));
}

#[test]
fn sensing_is_monotone_for_consistent_outcomes() {
    // Adding a consistent sensing literal never removes entailed clauses.
    let mut kit = sense_kit();
    kit.add_sensing_axiom(true, true);
    kit.add_sensing_axiom(false, true);
    let phi = kit.close_after_sonar();
    assert!(kit.solver.entails(0, phi.clone()));
    kit.solver.add_sensing_result(Vec::new(), kit.sonar, true);
    assert!(kit.solver.entails(0, phi));
}

#[test]
fn boxed_clauses_hold_after_longer_prefixes() {
    let mut kit = sense_kit();
    let t = kit.solver.ctx.name_true();
    let lit = Literal::eq(kit.close, t, &kit.solver.ctx.terms);
    let clause = UnivClause::fact(vec![lit.clone()], &kit.solver.ctx.terms);
    kit.solver.add_boxed(BoxUnivClause(clause));
    let twice = Formula::act(
        kit.sonar,
        Formula::act(kit.sonar, Formula::lit(lit.clone())),
    );
    assert!(kit.solver.entails(0, twice));
    assert!(kit.solver.entails(0, Formula::lit(lit)));
}

// =============================================================================
// SURFACE-LEVEL SENSING AND GLOBAL QUERIES
// =============================================================================

#[test]
fn surface_global_queries_cover_all_bounded_prefixes() {
    let mut session = Session::new();
    for src in [
        "Sort act",
        "Name fwd -> act",
        "Fun alive/0 -> bool",
        "box(alive)",
    ] {
        session.execute_source(src).expect(src);
    }
    match session
        .execute_source("Assert G Know<0> fwd : fwd : alive")
        .unwrap()
        .pop()
    {
        Some(ExecResult::Query { entailed, .. }) => assert!(entailed),
        other => panic!("expected query result, got {:?}", other),
    }
}

#[test]
fn surface_sense_statement_reaches_the_solver() {
    let mut session = Session::new();
    for src in ["Sort act", "Name fwd -> act", "Name ping -> act"] {
        session.execute_source(src).expect(src);
    }
    session
        .execute_source("Sense fwd : ping -> true")
        .expect("sense");
    let log = session.solver().sensing_log();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].0.len(), 1);
    assert!(log[0].2);
}
