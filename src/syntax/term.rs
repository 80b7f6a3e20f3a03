//! Sorts, symbols, and interned first-order terms.
//!
//! Symbols are the non-logical vocabulary: variables, standard names, and
//! function symbols, each carrying a sort. Terms are built from symbols and
//! interned by a factory, so a term is just a 31-bit index into the factory's
//! heaps. Creating the same term twice yields the same index, which makes
//! copying and comparing terms trivially cheap.
//!
//! The lowest bit of a term id records whether the term is a standard name,
//! so name-ness can be tested without touching the heap. Ground function
//! terms of a rigid sort whose arguments are all names count as names too
//! (constructor terms).
//!
//! Factories are plain values owned by a [`crate::solver::Context`]; term ids
//! from different factories are incomparable.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};

/// A sort identifier. Odd ids are rigid sorts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sort(u8);

impl Sort {
    pub fn id(self) -> u8 {
        self.0
    }

    /// Rigid sorts turn ground constructor terms into names.
    pub fn rigid(self) -> bool {
        self.0 % 2 == 1
    }
}

/// A variable, standard name, or function symbol.
///
/// The two lowest bits of the id encode the kind (0 = name, 1 = variable,
/// 2 = function); symbols with equal ids are the same symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol {
    id: u32,
    sort: Sort,
    arity: u8,
}

const KIND_NAME: u32 = 0;
const KIND_VARIABLE: u32 = 1;
const KIND_FUNCTION: u32 = 2;

impl Symbol {
    pub fn id(self) -> u32 {
        self.id >> 2
    }

    pub fn sort(self) -> Sort {
        self.sort
    }

    pub fn arity(self) -> u8 {
        self.arity
    }

    pub fn is_name(self) -> bool {
        self.id & 3 == KIND_NAME
    }

    pub fn is_variable(self) -> bool {
        self.id & 3 == KIND_VARIABLE
    }

    pub fn is_function(self) -> bool {
        self.id & 3 == KIND_FUNCTION
    }
}

/// Creates sorts and symbols; each call mints a fresh identity.
#[derive(Debug, Default)]
pub struct SymbolFactory {
    last_sort: u8,
    last_name: u32,
    last_variable: u32,
    last_function: u32,
}

impl SymbolFactory {
    pub fn new() -> Self {
        SymbolFactory::default()
    }

    pub fn create_sort(&mut self) -> Sort {
        let id = self.last_sort;
        self.last_sort += 1;
        Sort(2 * id)
    }

    pub fn create_rigid_sort(&mut self) -> Sort {
        let id = self.last_sort;
        self.last_sort += 1;
        Sort(2 * id + 1)
    }

    pub fn create_name(&mut self, sort: Sort) -> Symbol {
        self.last_name += 1;
        Symbol {
            id: (self.last_name << 2) | KIND_NAME,
            sort,
            arity: 0,
        }
    }

    pub fn create_variable(&mut self, sort: Sort) -> Symbol {
        self.last_variable += 1;
        Symbol {
            id: (self.last_variable << 2) | KIND_VARIABLE,
            sort,
            arity: 0,
        }
    }

    pub fn create_function(&mut self, sort: Sort, arity: u8) -> Symbol {
        // A 0-ary rigid function would be indistinguishable from a name.
        debug_assert!(arity > 0 || !sort.rigid());
        self.last_function += 1;
        Symbol {
            id: (self.last_function << 2) | KIND_FUNCTION,
            sort,
            arity,
        }
    }
}

/// An interned term: an index into a [`TermFactory`].
///
/// Id 0 is the null term. The lowest bit of a non-null id is set iff the
/// term is (classified as) a standard name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Term(u32);

impl Term {
    pub fn null() -> Term {
        Term(0)
    }

    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    pub fn id(self) -> u32 {
        self.0
    }

    pub(crate) fn from_id(id: u32) -> Term {
        Term(id)
    }

    /// Name-ness is encoded in the id and needs no factory access.
    pub fn is_name(self) -> bool {
        self.0 & 1 == 1
    }

    /// A deterministic 64-bit hash of the id, for Bloom summaries.
    pub fn hash64(self) -> u64 {
        splitmix64(self.0 as u64)
    }

    pub fn symbol(self, tf: &TermFactory) -> Symbol {
        tf.data(self).symbol
    }

    pub fn args(self, tf: &TermFactory) -> &[Term] {
        &tf.data(self).args
    }

    pub fn arg(self, i: usize, tf: &TermFactory) -> Term {
        tf.data(self).args[i]
    }

    pub fn sort(self, tf: &TermFactory) -> Sort {
        self.symbol(tf).sort()
    }

    pub fn arity(self, tf: &TermFactory) -> u8 {
        self.symbol(tf).arity()
    }

    pub fn is_variable(self, tf: &TermFactory) -> bool {
        self.symbol(tf).is_variable()
    }

    pub fn is_function(self, tf: &TermFactory) -> bool {
        self.symbol(tf).is_function()
    }

    pub fn is_ground(self, tf: &TermFactory) -> bool {
        self.is_name()
            || (self.is_function(tf) && self.args(tf).iter().all(|a| a.is_ground(tf)))
    }

    /// A non-rigid function applied to names only.
    pub fn is_primitive(self, tf: &TermFactory) -> bool {
        !self.sort(tf).rigid() && self.is_function(tf) && self.args(tf).iter().all(|a| a.is_name())
    }

    /// A name, a variable, or a rigid constructor free of function arguments.
    pub fn is_quasi_name(self, tf: &TermFactory) -> bool {
        !self.is_function(tf)
            || (self.sort(tf).rigid() && self.args(tf).iter().all(|a| !a.is_function(tf)))
    }

    /// A non-rigid function whose arguments are names or variables.
    pub fn is_quasi_primitive(self, tf: &TermFactory) -> bool {
        !self.sort(tf).rigid()
            && self.is_function(tf)
            && self.args(tf).iter().all(|a| a.is_quasi_name(tf))
    }

    pub fn mentions(self, t: Term, tf: &TermFactory) -> bool {
        self == t || self.args(tf).iter().any(|a| a.mentions(t, tf))
    }

    /// Collect the variables occurring in this term.
    pub fn collect_variables(self, tf: &TermFactory, out: &mut IndexSet<Term>) {
        if self.is_variable(tf) {
            out.insert(self);
        } else {
            for i in 0..self.args(tf).len() {
                self.arg(i, tf).collect_variables(tf, out);
            }
        }
    }

    /// Collect the names occurring in this term.
    pub fn collect_names(self, tf: &TermFactory, out: &mut SortedNames) {
        if self.is_name() {
            out.insert(self, tf);
        }
        for i in 0..self.args(tf).len() {
            self.arg(i, tf).collect_names(tf, out);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TermData {
    symbol: Symbol,
    args: Vec<Term>,
}

/// Interns terms. Structurally equal terms share one id.
#[derive(Debug, Default)]
pub struct TermFactory {
    name_heap: Vec<TermData>,
    rest_heap: Vec<TermData>,
    ids: HashMap<TermData, Term>,
}

impl TermFactory {
    pub fn new() -> Self {
        TermFactory::default()
    }

    /// Intern a symbol applied to arguments. Returns the existing id for a
    /// structurally equal term, otherwise appends to the appropriate heap.
    pub fn create_term(&mut self, symbol: Symbol, args: Vec<Term>) -> Term {
        debug_assert_eq!(symbol.arity() as usize, args.len());
        debug_assert!(args.iter().all(|a| !a.is_null()));
        let data = TermData { symbol, args };
        if let Some(&t) = self.ids.get(&data) {
            return t;
        }
        let name = symbol.is_name()
            || (symbol.sort().rigid()
                && symbol.is_function()
                && data
                    .args
                    .iter()
                    .all(|&a| a.is_name() && !self.is_function_headed(a)));
        let heap = if name {
            &mut self.name_heap
        } else {
            &mut self.rest_heap
        };
        heap.push(data.clone());
        let id = ((heap.len() as u32) << 1) | (name as u32);
        let t = Term::from_id(id);
        self.ids.insert(data, t);
        t
    }

    pub fn create_atom(&mut self, symbol: Symbol) -> Term {
        self.create_term(symbol, Vec::new())
    }

    fn data(&self, t: Term) -> &TermData {
        assert!(!t.is_null(), "null term dereferenced");
        let index = (t.id() >> 1) as usize - 1;
        if t.is_name() {
            &self.name_heap[index]
        } else {
            &self.rest_heap[index]
        }
    }

    fn is_function_headed(&self, t: Term) -> bool {
        self.data(t).symbol.is_function()
    }

    /// Apply a mapping to a term, walking the tree. Subterms are rebuilt only
    /// when the mapping actually changed something, so sharing is preserved.
    pub fn substitute<F>(&mut self, t: Term, theta: &F) -> Term
    where
        F: Fn(Term) -> Option<Term>,
    {
        if let Some(u) = theta(t) {
            return u;
        }
        if self.data(t).args.is_empty() {
            return t;
        }
        let symbol = self.data(t).symbol;
        let args = self.data(t).args.clone();
        let mut changed = false;
        let new_args: Vec<Term> = args
            .iter()
            .map(|&a| {
                let b = self.substitute(a, theta);
                changed |= a != b;
                b
            })
            .collect();
        if changed {
            self.create_term(symbol, new_args)
        } else {
            t
        }
    }
}

/// A set of standard names keyed by their sort.
///
/// This is the shape of the bounded Herbrand universe: quantifiers and
/// grounding assignments range over the names of one sort at a time.
#[derive(Debug, Clone, Default)]
pub struct SortedNames {
    map: IndexMap<Sort, IndexSet<Term>>,
}

impl SortedNames {
    pub fn new() -> Self {
        SortedNames::default()
    }

    pub fn insert(&mut self, name: Term, tf: &TermFactory) -> bool {
        debug_assert!(name.is_name());
        self.map.entry(name.sort(tf)).or_default().insert(name)
    }

    pub fn contains(&self, name: Term, tf: &TermFactory) -> bool {
        self.map
            .get(&name.sort(tf))
            .is_some_and(|names| names.contains(&name))
    }

    pub fn of_sort(&self, sort: Sort) -> impl Iterator<Item = Term> + '_ {
        self.map.get(&sort).into_iter().flatten().copied()
    }

    pub fn count_of_sort(&self, sort: Sort) -> usize {
        self.map.get(&sort).map_or(0, |names| names.len())
    }

    pub fn sorts(&self) -> impl Iterator<Item = Sort> + '_ {
        self.map.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Term> + '_ {
        self.map.values().flatten().copied()
    }

    pub fn len(&self) -> usize {
        self.map.values().map(|names| names.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn merge(&mut self, other: &SortedNames) {
        for (&sort, names) in &other.map {
            self.map
                .entry(sort)
                .or_default()
                .extend(names.iter().copied());
        }
    }
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}
