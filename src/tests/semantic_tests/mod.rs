//! Semantic tests for the limited-belief decision procedure.
//!
//! These tests verify essential semantic properties, not just surface
//! behavior: soundness of the splitting procedure, monotonicity in the
//! split budget, equivalence of the normal-form transformations, and the
//! behaviour of the complete (conceivability) reasoner.
//!
//! # References
//!
//! - [LLL04] Liu, Y., Lakemeyer, G., Levesque, H.J. "A Logic of Limited
//!   Belief for Reasoning with Disjunctive Information." KR 2004.
//!   (Source of the propositional suite.)
//! - [LL14] Lakemeyer, G., Levesque, H.J. "Decidable Reasoning in a
//!   Fragment of the Epistemic Situation Calculus." KR 2014.
//!   (Split budgets, sensing-fluent splitting.)
//! - [LL16] Lakemeyer, G., Levesque, H.J. "Decidable Reasoning in a Logic
//!   of Limited Belief with Function Symbols." KR 2016.
//!   (The bestFriend/father example.)
//! - [SL16] Schwering, C., Lakemeyer, G. "Decidable Reasoning in a
//!   First-Order Logic of Limited Conditional Belief." ECAI 2016.
//!   (The Aussie/Italian/Veggie example and the complete reasoner.)

use crate::solver::Solver;
use crate::syntax::{Formula, Literal, Term};

mod consistency_semantics;
mod normalization_semantics;
mod proptests;
mod sensing_semantics;

/// A propositional workbench: 0-ary boolean functions compared against the
/// built-in truth name.
pub(crate) struct PropKit {
    pub solver: Solver,
}

impl PropKit {
    pub fn new() -> PropKit {
        PropKit {
            solver: Solver::new(),
        }
    }

    /// A fresh propositional atom.
    pub fn atom(&mut self) -> Term {
        let bool_sort = self.solver.ctx.bool_sort();
        let f = self.solver.ctx.create_function(bool_sort, 0);
        self.solver.ctx.create_fun_term(f, Vec::new())
    }

    pub fn lit(&self, atom: Term, positive: bool) -> Literal {
        let t = self.solver.ctx.name_true();
        let l = Literal::eq(atom, t, &self.solver.ctx.terms);
        if positive {
            l
        } else {
            l.flip()
        }
    }

    pub fn holds(&self, atom: Term) -> Formula {
        Formula::lit(self.lit(atom, true))
    }

    pub fn fails(&self, atom: Term) -> Formula {
        Formula::lit(self.lit(atom, false))
    }

    /// Add a static clause over propositional literals.
    pub fn add_clause(&mut self, lits: Vec<Literal>) {
        let clause = crate::theory::UnivClause::fact(lits, &self.solver.ctx.terms);
        self.solver.add_static(clause);
    }
}
