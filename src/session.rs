//! Sessions: declarations, theory building, and query execution.
//!
//! A session owns a [`Solver`] plus the string-to-symbol tables built from
//! `Sort`/`Name`/`Fun` declarations. It compiles surface statements into
//! interned terms, universal clauses, and query formulas, inferring variable
//! sorts from equalities and annotations.

use std::collections::HashMap;

use indexmap::IndexSet;
use log::debug;

use crate::parser::{parse_file, FormulaAst, ParseError, QueryAst, Statement, TermAst};
use crate::solver::Solver;
use crate::syntax::{Formula, Literal, Sort, Symbol, Term};
use crate::theory::{BoxUnivClause, Ewff, EwffAtom, UnivClause};

/// Result of executing one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecResult {
    Declared,
    Defined,
    ClauseAdded,
    Sensed,
    /// Outcome of `Assert` or `Refute`: whether the entailment holds, and
    /// whether the command's expectation was met.
    Query { entailed: bool, satisfied: bool },
}

/// Session error.
#[derive(Debug, Clone)]
pub struct SessionError {
    pub message: String,
}

impl SessionError {
    fn new(message: impl Into<String>) -> SessionError {
        SessionError {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SessionError {}

impl From<ParseError> for SessionError {
    fn from(e: ParseError) -> Self {
        SessionError {
            message: e.to_string(),
        }
    }
}

const MAX_DEFINITION_DEPTH: usize = 64;

/// A session holds the declarations, the theory, and the solver.
pub struct Session {
    solver: Solver,
    sorts: HashMap<String, Sort>,
    names: HashMap<String, Term>,
    funs: HashMap<String, Symbol>,
    defs: HashMap<String, FormulaAst>,
}

impl Session {
    pub fn new() -> Session {
        let solver = Solver::new();
        let mut sorts = HashMap::new();
        // Predicates are functions into the built-in boolean sort.
        sorts.insert("bool".to_string(), solver.ctx.bool_sort());
        Session {
            solver,
            sorts,
            names: HashMap::new(),
            funs: HashMap::new(),
            defs: HashMap::new(),
        }
    }

    pub fn solver(&self) -> &Solver {
        &self.solver
    }

    pub fn solver_mut(&mut self) -> &mut Solver {
        &mut self.solver
    }

    /// Parse and execute a whole source text.
    pub fn execute_source(&mut self, source: &str) -> Result<Vec<ExecResult>, SessionError> {
        let stmts = parse_file(source)?;
        let mut results = Vec::with_capacity(stmts.len());
        for stmt in stmts {
            results.push(self.execute(stmt)?);
        }
        Ok(results)
    }

    /// Execute one parsed statement.
    pub fn execute(&mut self, stmt: Statement) -> Result<ExecResult, SessionError> {
        match stmt {
            Statement::SortDecl { name, rigid } => {
                if self.sorts.contains_key(&name) {
                    return Err(SessionError::new(format!("sort '{}' already declared", name)));
                }
                let sort = if rigid {
                    self.solver.ctx.create_rigid_sort()
                } else {
                    self.solver.ctx.create_sort()
                };
                self.sorts.insert(name, sort);
                Ok(ExecResult::Declared)
            }
            Statement::NameDecl { name, sort } => {
                self.check_fresh_symbol(&name)?;
                let sort = self.lookup_sort(&sort)?;
                let term = self.solver.ctx.create_name(sort);
                self.names.insert(name, term);
                Ok(ExecResult::Declared)
            }
            Statement::FunDecl { name, arity, sort } => {
                self.check_fresh_symbol(&name)?;
                let sort = self.lookup_sort(&sort)?;
                if sort.rigid() && arity == 0 {
                    return Err(SessionError::new(
                        "a 0-ary rigid function is just a name; declare it with Name",
                    ));
                }
                let symbol = self.solver.ctx.create_function(sort, arity);
                self.funs.insert(name, symbol);
                Ok(ExecResult::Declared)
            }
            Statement::Let { name, body } => {
                self.check_fresh_symbol(&name)?;
                self.defs.insert(name, body);
                Ok(ExecResult::Defined)
            }
            Statement::StaticDecl(phi) => {
                let clause = self.compile_univ_clause(phi)?;
                self.solver.add_static(clause);
                Ok(ExecResult::ClauseAdded)
            }
            Statement::BoxDecl(phi) => {
                let clause = self.compile_univ_clause(phi)?;
                self.solver.add_boxed(BoxUnivClause(clause));
                Ok(ExecResult::ClauseAdded)
            }
            Statement::Assert(query) => self.run_query(query, true),
            Statement::Refute(query) => self.run_query(query, false),
            Statement::Sense { actions, result } => {
                let mut terms = Vec::with_capacity(actions.len());
                for ast in &actions {
                    let t = self.compile_term(ast, &HashMap::new())?;
                    if !t.is_name() {
                        return Err(SessionError::new(
                            "sensing statements take declared names as actions",
                        ));
                    }
                    terms.push(t);
                }
                let action = terms.pop().expect("parser requires at least one action");
                self.solver.add_sensing_result(terms, action, result);
                Ok(ExecResult::Sensed)
            }
        }
    }

    /// Toggle a solver option by name.
    pub fn set_option(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        let on = match value {
            "on" | "true" => true,
            "off" | "false" => false,
            other => {
                return Err(SessionError::new(format!(
                    "expected 'on' or 'off', found '{}'",
                    other
                )));
            }
        };
        match key {
            "pel-filter" => self.solver.config.pel_filter = on,
            "assume-consistent" => self.solver.config.assume_consistent = on,
            other => {
                return Err(SessionError::new(format!("unknown option '{}'", other)));
            }
        }
        Ok(())
    }

    fn run_query(&mut self, query: QueryAst, expect: bool) -> Result<ExecResult, SessionError> {
        let body = self.expand_defs(query.body, 0)?;
        let inferred = self.infer_var_sorts(&body)?;
        let mut scope = HashMap::new();
        let phi = self.compile_formula(&body, &mut scope, &inferred)?;
        let entailed = if query.globally {
            let mut sequences: IndexSet<Vec<Term>> = IndexSet::new();
            sequences.insert(Vec::new());
            let mut current = Vec::new();
            collect_action_sequences(&phi, &mut current, &mut sequences);
            for (z, a, _) in self.solver.sensing_log().to_vec() {
                let mut w = z.clone();
                w.push(a);
                for i in 1..=w.len() {
                    sequences.insert(w[..i].to_vec());
                }
            }
            debug!("deciding query after {} action sequences", sequences.len());
            sequences
                .into_iter()
                .all(|z| self.solver.entails(query.k, Formula::after(&z, phi.clone())))
        } else {
            self.solver.entails(query.k, phi)
        };
        Ok(ExecResult::Query {
            entailed,
            satisfied: entailed == expect,
        })
    }

    // === Symbol resolution ===

    fn check_fresh_symbol(&self, name: &str) -> Result<(), SessionError> {
        if name == "SF" {
            return Err(SessionError::new("'SF' is reserved for the sensing fluent"));
        }
        if self.names.contains_key(name) || self.funs.contains_key(name) || self.defs.contains_key(name)
        {
            return Err(SessionError::new(format!("'{}' is already declared", name)));
        }
        Ok(())
    }

    fn lookup_sort(&self, name: &str) -> Result<Sort, SessionError> {
        self.sorts
            .get(name)
            .copied()
            .ok_or_else(|| SessionError::new(format!("undeclared sort '{}'", name)))
    }

    fn is_variable_ident(&self, name: &str) -> bool {
        !self.names.contains_key(name)
            && !self.funs.contains_key(name)
            && name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
    }

    /// The sort of a term as far as the declarations determine it; bare
    /// variables resolve to None.
    fn static_sort(&self, t: &TermAst) -> Result<Option<Sort>, SessionError> {
        match t {
            TermAst::Sym { name, sort } => {
                if let Some(&term) = self.names.get(name) {
                    return Ok(Some(term.sort(&self.solver.ctx.terms)));
                }
                if let Some(symbol) = self.funs.get(name) {
                    return Ok(Some(symbol.sort()));
                }
                if self.is_variable_ident(name) {
                    return match sort {
                        Some(s) => Ok(Some(self.lookup_sort(s)?)),
                        None => Ok(None),
                    };
                }
                Err(SessionError::new(format!("undeclared identifier '{}'", name)))
            }
            TermAst::App { name, .. } => match self.funs.get(name) {
                Some(symbol) => Ok(Some(symbol.sort())),
                None => Err(SessionError::new(format!(
                    "undeclared function '{}'",
                    name
                ))),
            },
        }
    }

    // === Sort inference ===

    /// Infer the sorts of the variables of a formula from annotations and
    /// equalities. Every variable must end up with exactly one sort.
    fn infer_var_sorts(&self, phi: &FormulaAst) -> Result<HashMap<String, Sort>, SessionError> {
        let mut assigned: HashMap<String, Sort> = HashMap::new();
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut vars: IndexSet<String> = IndexSet::new();
        self.collect_constraints(phi, &mut assigned, &mut pairs, &mut vars)?;
        loop {
            let mut changed = false;
            for (a, b) in &pairs {
                match (assigned.get(a).copied(), assigned.get(b).copied()) {
                    (Some(s1), Some(s2)) if s1 != s2 => {
                        return Err(SessionError::new(format!(
                            "variables '{}' and '{}' are used at different sorts",
                            a, b
                        )));
                    }
                    (Some(s), None) => {
                        assigned.insert(b.clone(), s);
                        changed = true;
                    }
                    (None, Some(s)) => {
                        assigned.insert(a.clone(), s);
                        changed = true;
                    }
                    _ => {}
                }
            }
            if !changed {
                break;
            }
        }
        for v in vars {
            if !assigned.contains_key(&v) {
                return Err(SessionError::new(format!(
                    "cannot infer the sort of variable '{}'; annotate it as {} : sort",
                    v, v
                )));
            }
        }
        Ok(assigned)
    }

    fn collect_constraints(
        &self,
        phi: &FormulaAst,
        assigned: &mut HashMap<String, Sort>,
        pairs: &mut Vec<(String, String)>,
        vars: &mut IndexSet<String>,
    ) -> Result<(), SessionError> {
        match phi {
            FormulaAst::Eq(t1, t2) | FormulaAst::Neq(t1, t2) => {
                self.collect_term_constraints(t1, assigned, vars)?;
                self.collect_term_constraints(t2, assigned, vars)?;
                let s1 = self.static_sort(t1)?;
                let s2 = self.static_sort(t2)?;
                let v1 = self.variable_of(t1);
                let v2 = self.variable_of(t2);
                match (s1, s2) {
                    (Some(s1), Some(s2)) if s1 != s2 => {
                        return Err(SessionError::new(
                            "equality of terms of different sorts".to_string(),
                        ));
                    }
                    (Some(s), None) => {
                        if let Some(v) = v2 {
                            assign_sort(assigned, v, s)?;
                        }
                    }
                    (None, Some(s)) => {
                        if let Some(v) = v1 {
                            assign_sort(assigned, v, s)?;
                        }
                    }
                    (None, None) => {
                        if let (Some(v1), Some(v2)) = (v1, v2) {
                            pairs.push((v1.to_string(), v2.to_string()));
                        }
                    }
                    _ => {}
                }
                Ok(())
            }
            FormulaAst::Pred(t) => self.collect_term_constraints(t, assigned, vars),
            FormulaAst::Not(a) => self.collect_constraints(a, assigned, pairs, vars),
            FormulaAst::And(a, b)
            | FormulaAst::Or(a, b)
            | FormulaAst::Implies(a, b)
            | FormulaAst::Iff(a, b) => {
                self.collect_constraints(a, assigned, pairs, vars)?;
                self.collect_constraints(b, assigned, pairs, vars)
            }
            FormulaAst::Exists(v, sort, a) | FormulaAst::Forall(v, sort, a) => {
                vars.insert(v.clone());
                if let Some(s) = sort {
                    let s = self.lookup_sort(s)?;
                    assign_sort(assigned, v, s)?;
                }
                self.collect_constraints(a, assigned, pairs, vars)
            }
            FormulaAst::Act(t, a) => {
                self.collect_term_constraints(t, assigned, vars)?;
                self.collect_constraints(a, assigned, pairs, vars)
            }
        }
    }

    fn collect_term_constraints(
        &self,
        t: &TermAst,
        assigned: &mut HashMap<String, Sort>,
        vars: &mut IndexSet<String>,
    ) -> Result<(), SessionError> {
        match t {
            TermAst::Sym { name, sort } => {
                if self.is_variable_ident(name) {
                    vars.insert(name.clone());
                    if let Some(s) = sort {
                        let s = self.lookup_sort(s)?;
                        assign_sort(assigned, name, s)?;
                    }
                } else if !self.names.contains_key(name) && !self.funs.contains_key(name) {
                    return Err(SessionError::new(format!(
                        "undeclared identifier '{}'",
                        name
                    )));
                }
                Ok(())
            }
            TermAst::App { args, .. } => {
                for a in args {
                    self.collect_term_constraints(a, assigned, vars)?;
                }
                Ok(())
            }
        }
    }

    fn variable_of<'t>(&self, t: &'t TermAst) -> Option<&'t str> {
        match t {
            TermAst::Sym { name, .. } if self.is_variable_ident(name) => Some(name),
            _ => None,
        }
    }

    // === Compilation ===

    fn expand_defs(&self, phi: FormulaAst, depth: usize) -> Result<FormulaAst, SessionError> {
        if depth > MAX_DEFINITION_DEPTH {
            return Err(SessionError::new("definitions nest too deeply (cycle?)"));
        }
        Ok(match phi {
            FormulaAst::Pred(TermAst::Sym { ref name, .. }) if self.defs.contains_key(name) => {
                let body = self.defs[name].clone();
                self.expand_defs(body, depth + 1)?
            }
            FormulaAst::Pred(_) | FormulaAst::Eq(..) | FormulaAst::Neq(..) => phi,
            FormulaAst::Not(a) => FormulaAst::not(self.expand_defs(*a, depth)?),
            FormulaAst::And(a, b) => FormulaAst::and(
                self.expand_defs(*a, depth)?,
                self.expand_defs(*b, depth)?,
            ),
            FormulaAst::Or(a, b) => FormulaAst::or(
                self.expand_defs(*a, depth)?,
                self.expand_defs(*b, depth)?,
            ),
            FormulaAst::Implies(a, b) => FormulaAst::implies(
                self.expand_defs(*a, depth)?,
                self.expand_defs(*b, depth)?,
            ),
            FormulaAst::Iff(a, b) => FormulaAst::iff(
                self.expand_defs(*a, depth)?,
                self.expand_defs(*b, depth)?,
            ),
            FormulaAst::Exists(v, s, a) => {
                FormulaAst::Exists(v, s, Box::new(self.expand_defs(*a, depth)?))
            }
            FormulaAst::Forall(v, s, a) => {
                FormulaAst::Forall(v, s, Box::new(self.expand_defs(*a, depth)?))
            }
            FormulaAst::Act(t, a) => FormulaAst::act(t, self.expand_defs(*a, depth)?),
        })
    }

    fn compile_term(
        &mut self,
        t: &TermAst,
        scope: &HashMap<String, Term>,
    ) -> Result<Term, SessionError> {
        match t {
            TermAst::Sym { name, .. } => {
                if let Some(&term) = self.names.get(name) {
                    return Ok(term);
                }
                if let Some(&term) = scope.get(name) {
                    return Ok(term);
                }
                if let Some(&symbol) = self.funs.get(name) {
                    if symbol.arity() != 0 {
                        return Err(SessionError::new(format!(
                            "function '{}' expects {} arguments",
                            name,
                            symbol.arity()
                        )));
                    }
                    return Ok(self.solver.ctx.create_fun_term(symbol, Vec::new()));
                }
                if self.is_variable_ident(name) {
                    return Err(SessionError::new(format!("unbound variable '{}'", name)));
                }
                Err(SessionError::new(format!("undeclared identifier '{}'", name)))
            }
            TermAst::App { name, args } => {
                let symbol = *self.funs.get(name).ok_or_else(|| {
                    SessionError::new(format!("undeclared function '{}'", name))
                })?;
                if symbol.arity() as usize != args.len() {
                    return Err(SessionError::new(format!(
                        "function '{}' expects {} arguments, got {}",
                        name,
                        symbol.arity(),
                        args.len()
                    )));
                }
                let mut compiled = Vec::with_capacity(args.len());
                for a in args {
                    compiled.push(self.compile_term(a, scope)?);
                }
                Ok(self.solver.ctx.create_fun_term(symbol, compiled))
            }
        }
    }

    fn compile_formula(
        &mut self,
        phi: &FormulaAst,
        scope: &mut HashMap<String, Term>,
        inferred: &HashMap<String, Sort>,
    ) -> Result<Formula, SessionError> {
        match phi {
            FormulaAst::Eq(t1, t2) | FormulaAst::Neq(t1, t2) => {
                let lhs = self.compile_term(t1, scope)?;
                let rhs = self.compile_term(t2, scope)?;
                let positive = matches!(phi, FormulaAst::Eq(..));
                if lhs.is_name() && rhs.is_name() {
                    Ok(if positive {
                        Formula::eq(lhs, rhs)
                    } else {
                        Formula::neq(lhs, rhs)
                    })
                } else {
                    let lit = Literal::with_z(Vec::new(), positive, lhs, rhs, &self.solver.ctx.terms);
                    Ok(Formula::lit(lit))
                }
            }
            FormulaAst::Pred(t) => {
                let lit = self.compile_pred(t, scope)?;
                Ok(Formula::lit(lit))
            }
            FormulaAst::Not(a) => Ok(Formula::neg(self.compile_formula(a, scope, inferred)?)),
            FormulaAst::And(a, b) => Ok(Formula::and(
                self.compile_formula(a, scope, inferred)?,
                self.compile_formula(b, scope, inferred)?,
            )),
            FormulaAst::Or(a, b) => Ok(Formula::or(
                self.compile_formula(a, scope, inferred)?,
                self.compile_formula(b, scope, inferred)?,
            )),
            FormulaAst::Implies(a, b) => Ok(Formula::implies(
                self.compile_formula(a, scope, inferred)?,
                self.compile_formula(b, scope, inferred)?,
            )),
            FormulaAst::Iff(a, b) => Ok(Formula::iff(
                self.compile_formula(a, scope, inferred)?,
                self.compile_formula(b, scope, inferred)?,
            )),
            FormulaAst::Exists(v, sort, a) | FormulaAst::Forall(v, sort, a) => {
                let sort = match sort {
                    Some(s) => self.lookup_sort(s)?,
                    None => *inferred.get(v).ok_or_else(|| {
                        SessionError::new(format!(
                            "cannot infer the sort of variable '{}'",
                            v
                        ))
                    })?,
                };
                let var = self.solver.ctx.create_variable(sort);
                let shadowed = scope.insert(v.clone(), var);
                let body = self.compile_formula(a, scope, inferred)?;
                match shadowed {
                    Some(old) => {
                        scope.insert(v.clone(), old);
                    }
                    None => {
                        scope.remove(v);
                    }
                }
                Ok(match phi {
                    FormulaAst::Exists(..) => Formula::exists(var, body),
                    _ => Formula::forall(var, body),
                })
            }
            FormulaAst::Act(t, a) => {
                let action = self.compile_term(t, scope)?;
                let body = self.compile_formula(a, scope, inferred)?;
                Ok(Formula::act(action, body))
            }
        }
    }

    fn compile_pred(
        &mut self,
        t: &TermAst,
        scope: &HashMap<String, Term>,
    ) -> Result<Literal, SessionError> {
        let term = self.compile_term(t, scope)?;
        if term.sort(&self.solver.ctx.terms) != self.solver.ctx.bool_sort() {
            return Err(SessionError::new(format!(
                "'{}' is not a predicate; declare it with Fun ... -> bool",
                t.name()
            )));
        }
        let truth = self.solver.ctx.name_true();
        Ok(Literal::eq(term, truth, &self.solver.ctx.terms))
    }

    /// Compile a `static(...)`/`box(...)` body into a guarded universal
    /// clause. The antecedent of a top-level implication becomes the ewff;
    /// the consequent must be a disjunction of (possibly action-prefixed,
    /// possibly negated) literals.
    fn compile_univ_clause(&mut self, phi: FormulaAst) -> Result<UnivClause, SessionError> {
        let phi = self.expand_defs(phi, 0)?;
        let inferred = self.infer_var_sorts(&phi)?;
        let mut scope: HashMap<String, Term> = HashMap::new();
        for (name, &sort) in &inferred {
            let var = self.solver.ctx.create_variable(sort);
            scope.insert(name.clone(), var);
        }
        let (guard, consequent) = match phi {
            FormulaAst::Implies(a, b) => (Some(*a), *b),
            other => (None, other),
        };
        let ewff = match guard {
            None => Ewff::top(),
            Some(g) => {
                let mut atoms = Vec::new();
                self.compile_ewff(&g, &scope, &mut atoms)?;
                Ewff::new(atoms)
            }
        };
        let mut lits = Vec::new();
        self.compile_clause_part(&consequent, &scope, &mut Vec::new(), true, &mut lits)?;
        for l in &lits {
            if !l.is_well_formed(&self.solver.ctx.terms) {
                return Err(SessionError::new(
                    "nested function terms are not allowed in theory clauses; introduce a variable",
                ));
            }
        }
        Ok(UnivClause::new(ewff, lits, &self.solver.ctx.terms))
    }

    fn compile_ewff(
        &mut self,
        phi: &FormulaAst,
        scope: &HashMap<String, Term>,
        out: &mut Vec<EwffAtom>,
    ) -> Result<(), SessionError> {
        match phi {
            FormulaAst::And(a, b) => {
                self.compile_ewff(a, scope, out)?;
                self.compile_ewff(b, scope, out)
            }
            FormulaAst::Eq(t1, t2) | FormulaAst::Neq(t1, t2) => {
                let lhs = self.compile_term(t1, scope)?;
                let rhs = self.compile_term(t2, scope)?;
                let tf = &self.solver.ctx.terms;
                if !(lhs.is_name() || lhs.is_variable(tf)) || !(rhs.is_name() || rhs.is_variable(tf))
                {
                    return Err(SessionError::new(
                        "clause guards may only mention equality of variables and names",
                    ));
                }
                out.push(if matches!(phi, FormulaAst::Eq(..)) {
                    EwffAtom::eq(lhs, rhs)
                } else {
                    EwffAtom::neq(lhs, rhs)
                });
                Ok(())
            }
            _ => Err(SessionError::new(
                "clause guards may only mention equality of variables and names",
            )),
        }
    }

    fn compile_clause_part(
        &mut self,
        phi: &FormulaAst,
        scope: &HashMap<String, Term>,
        z: &mut Vec<Term>,
        positive: bool,
        out: &mut Vec<Literal>,
    ) -> Result<(), SessionError> {
        match phi {
            FormulaAst::Or(a, b) if positive => {
                self.compile_clause_part(a, scope, z, positive, out)?;
                self.compile_clause_part(b, scope, z, positive, out)
            }
            FormulaAst::Not(a) => self.compile_clause_part(a, scope, z, !positive, out),
            FormulaAst::Act(t, a) => {
                let action = self.compile_term(t, scope)?;
                z.push(action);
                let r = self.compile_clause_part(a, scope, z, positive, out);
                z.pop();
                r
            }
            FormulaAst::Pred(t) => {
                let lit = self.compile_pred(t, scope)?;
                let lit = lit.prepend_z(z);
                out.push(if positive { lit } else { lit.flip() });
                Ok(())
            }
            FormulaAst::Eq(t1, t2) | FormulaAst::Neq(t1, t2) => {
                let lhs = self.compile_term(t1, scope)?;
                let rhs = self.compile_term(t2, scope)?;
                let pos = positive == matches!(phi, FormulaAst::Eq(..));
                out.push(Literal::with_z(
                    z.clone(),
                    pos,
                    lhs,
                    rhs,
                    &self.solver.ctx.terms,
                ));
                Ok(())
            }
            _ => Err(SessionError::new(
                "theory clauses must be disjunctions of (negated) literals",
            )),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

fn assign_sort(
    assigned: &mut HashMap<String, Sort>,
    var: &str,
    sort: Sort,
) -> Result<(), SessionError> {
    match assigned.get(var) {
        Some(&existing) if existing != sort => Err(SessionError::new(format!(
            "variable '{}' is used at two different sorts",
            var
        ))),
        _ => {
            assigned.insert(var.to_string(), sort);
            Ok(())
        }
    }
}

fn collect_action_sequences(
    phi: &Formula,
    current: &mut Vec<Term>,
    out: &mut IndexSet<Vec<Term>>,
) {
    match phi {
        Formula::Eq(..) | Formula::Neq(..) | Formula::Lit(_) => {}
        Formula::Or(a, b) | Formula::And(a, b) => {
            collect_action_sequences(a, current, out);
            collect_action_sequences(b, current, out);
        }
        Formula::Neg(a) | Formula::Exists(_, a) => collect_action_sequences(a, current, out),
        Formula::Act(n, a) => {
            current.push(*n);
            out.insert(current.clone());
            collect_action_sequences(a, current, out);
            current.pop();
        }
    }
}
