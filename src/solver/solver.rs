//! The query driver: from formulas to per-clause kernel calls.

use indexmap::IndexSet;
use log::debug;

use crate::normalize::{action_prefixes, cnf, ennf, flatten, simplify, Simplified};
use crate::solver::{
    bat_hplus, consistent_at, entails_clause, full_pel, ground_clauses, pel, split_terms, Setup,
};
use crate::syntax::{
    Clause, Formula, Literal, Sort, SortedNames, Symbol, SymbolFactory, Term, TermFactory,
};
use crate::theory::{Bat, BoxUnivClause, UnivClause};

/// Owns the symbol and term factories along with the reserved vocabulary:
/// the boolean sort, the truth name `T`, and the sensing-fluent function
/// `SF`. Disjoint contexts are fully independent; there is no global state.
#[derive(Debug)]
pub struct Context {
    pub symbols: SymbolFactory,
    pub terms: TermFactory,
    bool_sort: Sort,
    name_true: Term,
    sf: Symbol,
}

impl Context {
    pub fn new() -> Context {
        let mut symbols = SymbolFactory::new();
        let mut terms = TermFactory::new();
        let bool_sort = symbols.create_sort();
        let name_true = terms.create_atom(symbols.create_name(bool_sort));
        let sf = symbols.create_function(bool_sort, 1);
        Context {
            symbols,
            terms,
            bool_sort,
            name_true,
            sf,
        }
    }

    pub fn bool_sort(&self) -> Sort {
        self.bool_sort
    }

    /// The distinguished truth name; predicates are functions into the
    /// boolean sort compared against it.
    pub fn name_true(&self) -> Term {
        self.name_true
    }

    pub fn sf_symbol(&self) -> Symbol {
        self.sf
    }

    pub fn create_sort(&mut self) -> Sort {
        self.symbols.create_sort()
    }

    pub fn create_rigid_sort(&mut self) -> Sort {
        self.symbols.create_rigid_sort()
    }

    pub fn create_name(&mut self, sort: Sort) -> Term {
        let symbol = self.symbols.create_name(sort);
        self.terms.create_atom(symbol)
    }

    pub fn create_variable(&mut self, sort: Sort) -> Term {
        let symbol = self.symbols.create_variable(sort);
        self.terms.create_atom(symbol)
    }

    pub fn create_function(&mut self, sort: Sort, arity: u8) -> Symbol {
        self.symbols.create_function(sort, arity)
    }

    pub fn create_fun_term(&mut self, symbol: Symbol, args: Vec<Term>) -> Term {
        self.terms.create_term(symbol, args)
    }

    /// The sensing literal `SF(a) = T` (or its negation) after `z`.
    pub fn sf_literal(&mut self, z: &[Term], action: Term, result: bool) -> Literal {
        let sfa = self.terms.create_term(self.sf, vec![action]);
        Literal::with_z(z.to_vec(), result, sfa, self.name_true, &self.terms)
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new()
    }
}

/// Tunables of the decision procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// Apply the split-relevance filter. Defaults to on; worth disabling
    /// only on setups so large that scanning clauses per candidate hurts.
    pub pel_filter: bool,
    /// Skip the initial full-PEL inconsistency check on entailment queries.
    pub assume_consistent: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            pel_filter: true,
            assume_consistent: true,
        }
    }
}

/// Outcome of preparing a query: either the formula evaluated outright, or
/// a ground setup and clause set remain to be decided.
enum Prepared {
    Decided(bool),
    Ground {
        setup: Setup,
        split_names: SortedNames,
        clauses: IndexSet<Clause>,
    },
}

/// A limited-belief reasoner over one basic action theory.
pub struct Solver {
    pub ctx: Context,
    pub config: SolverConfig,
    bat: Bat,
    sensing: Vec<(Vec<Term>, Term, bool)>,
}

impl Solver {
    pub fn new() -> Solver {
        Solver::with_config(SolverConfig::default())
    }

    pub fn with_config(config: SolverConfig) -> Solver {
        Solver {
            ctx: Context::new(),
            config,
            bat: Bat::new(),
            sensing: Vec::new(),
        }
    }

    pub fn bat(&self) -> &Bat {
        &self.bat
    }

    pub fn add_static(&mut self, clause: UnivClause) {
        self.bat.add_static(clause);
    }

    pub fn add_boxed(&mut self, clause: BoxUnivClause) {
        self.bat.add_boxed(clause);
    }

    /// Record that executing `action` after `z` sensed `result`.
    pub fn add_sensing_result(&mut self, z: Vec<Term>, action: Term, result: bool) {
        self.sensing.push((z, action, result));
    }

    pub fn sensing_log(&self) -> &[(Vec<Term>, Term, bool)] {
        &self.sensing
    }

    /// Does the theory entail `phi` at split depth `k`? Sound; a negative
    /// answer only denies derivability at this k.
    pub fn entails(&mut self, k: usize, phi: Formula) -> bool {
        match self.prepare(phi) {
            Prepared::Decided(v) => v,
            Prepared::Ground {
                mut setup,
                split_names,
                clauses,
            } => {
                let sf = self.ctx.sf_symbol();
                if !self.config.assume_consistent
                    && setup.inconsistent(k, sf, &split_names, &self.ctx.terms, &self.config)
                {
                    return true;
                }
                for c in &clauses {
                    if c.is_valid() {
                        continue;
                    }
                    let sense = self.sense_pairs(c);
                    let pel = pel(&setup, c, sf, &self.ctx.terms);
                    debug!(
                        "testing clause of {} literals with {} pel atoms at k = {}",
                        c.len(),
                        pel.len(),
                        k
                    );
                    if !entails_clause(
                        &setup,
                        &pel,
                        &split_names,
                        &sense,
                        c,
                        k,
                        &self.ctx.terms,
                        &self.config,
                    ) {
                        return false;
                    }
                }
                true
            }
        }
    }

    /// Can `k` assignments witness that `phi` is consistent with the
    /// theory? Complete; dual to [`Solver::entails`].
    pub fn consistent(&mut self, k: usize, phi: Formula) -> bool {
        match self.prepare(phi) {
            Prepared::Decided(false) => false,
            Prepared::Decided(true) => {
                // The formula contributed nothing; judge the setup itself.
                let (setup, split_names) = self.prepare_theory_only();
                self.consistency_witness(setup, &split_names, IndexSet::new(), k)
            }
            Prepared::Ground {
                setup,
                split_names,
                clauses,
            } => self.consistency_witness(setup, &split_names, clauses, k),
        }
    }

    /// Entailment by the complete reasoner: `phi` follows iff its negation
    /// has no consistency witness. Over-claims at small k.
    pub fn entails_complete(&mut self, k: usize, phi: Formula) -> bool {
        !self.consistent(k, Formula::neg(phi))
    }

    fn consistency_witness(
        &self,
        mut setup: Setup,
        split_names: &SortedNames,
        clauses: IndexSet<Clause>,
        k: usize,
    ) -> bool {
        for c in clauses {
            if c.is_valid() {
                continue;
            }
            setup.add(c);
        }
        setup.propagate_units(&self.ctx.terms);
        let sf = self.ctx.sf_symbol();
        let atoms = full_pel(&setup, sf, &self.ctx.terms);
        let terms = split_terms(&atoms);
        consistent_at(&setup, &terms, split_names, k, &self.ctx.terms)
    }

    /// Normalise, ground, and set up one query.
    fn prepare(&mut self, phi: Formula) -> Prepared {
        let phi = flatten(phi, &mut self.ctx.symbols, &mut self.ctx.terms);

        let mut query_names = SortedNames::new();
        collect_names(&phi, &self.ctx.terms, &mut query_names);
        let mut var_sorts = Vec::new();
        collect_var_sorts(&phi, &self.ctx.terms, &mut var_sorts);

        let hplus = bat_hplus(
            &self.bat,
            &query_names,
            &var_sorts,
            &mut self.ctx.symbols,
            &mut self.ctx.terms,
        );

        let phi = ennf(phi, &hplus, &mut self.ctx.terms);
        let phi = match simplify(phi) {
            Simplified::Truth(v) => return Prepared::Decided(v),
            Simplified::Residue(phi) => phi,
        };

        let zs = action_prefixes(&phi);
        let mut setup = ground_clauses(&self.bat, &hplus, &zs, &mut self.ctx.terms);

        let sensing = self.sensing.clone();
        let split_names = self.split_names(&hplus, &setup);
        for (z, action, result) in sensing {
            let lit = self.ctx.sf_literal(&z, action, result);
            let sense = self.sense_pairs_of_z(lit.z());
            setup.add_sensing_result(
                lit,
                &sense,
                self.ctx.sf_symbol(),
                &split_names,
                &self.ctx.terms,
                &self.config,
            );
        }
        setup.propagate_units(&self.ctx.terms);
        setup.minimize();

        let clauses = cnf(&phi, &self.ctx.terms);
        debug!(
            "query prepared: {} setup clauses, {} query clauses",
            setup.len(),
            clauses.len()
        );
        Prepared::Ground {
            setup,
            split_names,
            clauses,
        }
    }

    /// The candidate names for case analysis: the Herbrand universe plus
    /// one fresh representative per sort, standing for "any other value".
    fn split_names(&mut self, hplus: &SortedNames, setup: &Setup) -> SortedNames {
        let mut split_names = hplus.clone();
        let mut sorts: IndexSet<Sort> = hplus.sorts().collect();
        sorts.insert(self.ctx.bool_sort());
        for c in setup.clauses() {
            for l in c.literals() {
                if !l.is_null() {
                    sorts.insert(l.lhs().sort(&self.ctx.terms));
                    sorts.insert(l.rhs().sort(&self.ctx.terms));
                }
            }
        }
        for sort in sorts {
            let fresh = self.ctx.create_name(sort);
            split_names.insert(fresh, &self.ctx.terms);
        }
        split_names
    }

    /// The sensing split pairs for one clause: `SF(a)` after `z'` for every
    /// non-empty prefix `z'·a` of the clause's action sequences, ordered by
    /// prefix length (the kernel consumes them from the back).
    fn sense_pairs(&mut self, c: &Clause) -> Vec<(Literal, Literal)> {
        let mut prefixes: IndexSet<Vec<Term>> = IndexSet::new();
        for l in c.literals() {
            let z = l.z();
            for i in 1..=z.len() {
                prefixes.insert(z[..i].to_vec());
            }
        }
        let mut pairs: Vec<(Literal, Literal)> = prefixes
            .into_iter()
            .map(|w| {
                let (front, last) = w.split_at(w.len() - 1);
                let pos = self.ctx.sf_literal(front, last[0], true);
                let neg = pos.flip();
                (pos, neg)
            })
            .collect();
        pairs.sort_by_key(|(pos, _)| pos.z().len());
        pairs
    }

    fn sense_pairs_of_z(&mut self, z: &[Term]) -> Vec<(Literal, Literal)> {
        let mut pairs: Vec<(Literal, Literal)> = (1..=z.len())
            .map(|i| {
                let pos = self.ctx.sf_literal(&z[..i - 1], z[i - 1], true);
                let neg = pos.flip();
                (pos, neg)
            })
            .collect();
        pairs.sort_by_key(|(pos, _)| pos.z().len());
        pairs
    }

    /// Ground the theory without any query contribution; used when the
    /// query itself evaluated away.
    fn prepare_theory_only(&mut self) -> (Setup, SortedNames) {
        let hplus = bat_hplus(
            &self.bat,
            &SortedNames::new(),
            &[],
            &mut self.ctx.symbols,
            &mut self.ctx.terms,
        );
        let mut setup = ground_clauses(&self.bat, &hplus, &IndexSet::new(), &mut self.ctx.terms);
        let split_names = self.split_names(&hplus, &setup);
        let sensing = self.sensing.clone();
        for (z, action, result) in sensing {
            let lit = self.ctx.sf_literal(&z, action, result);
            setup.add(Clause::unit(lit, &self.ctx.terms));
        }
        setup.propagate_units(&self.ctx.terms);
        setup.minimize();
        (setup, split_names)
    }
}

impl Default for Solver {
    fn default() -> Self {
        Solver::new()
    }
}

fn collect_names(phi: &Formula, tf: &TermFactory, out: &mut SortedNames) {
    match phi {
        Formula::Eq(a, b) | Formula::Neq(a, b) => {
            a.collect_names(tf, out);
            b.collect_names(tf, out);
        }
        Formula::Lit(l) => l.collect_names(tf, out),
        Formula::Or(a, b) | Formula::And(a, b) => {
            collect_names(a, tf, out);
            collect_names(b, tf, out);
        }
        Formula::Neg(a) => collect_names(a, tf, out),
        Formula::Exists(_, a) => collect_names(a, tf, out),
        Formula::Act(n, a) => {
            if n.is_name() {
                out.insert(*n, tf);
            }
            collect_names(a, tf, out);
        }
    }
}

fn collect_var_sorts(phi: &Formula, tf: &TermFactory, out: &mut Vec<Sort>) {
    match phi {
        Formula::Eq(..) | Formula::Neq(..) | Formula::Lit(_) => {}
        Formula::Or(a, b) | Formula::And(a, b) => {
            collect_var_sorts(a, tf, out);
            collect_var_sorts(b, tf, out);
        }
        Formula::Neg(a) => collect_var_sorts(a, tf, out),
        Formula::Exists(v, a) => {
            out.push(v.sort(tf));
            collect_var_sorts(a, tf, out);
        }
        Formula::Act(_, a) => collect_var_sorts(a, tf, out),
    }
}
