//! First-order unification and variable/name isomorphism.

use super::Substitution;
use crate::syntax::{Term, TermFactory};

/// Controls which side of a unification problem may receive bindings and
/// whether the occurs check runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnifyConfig {
    pub bind_left: bool,
    pub bind_right: bool,
    pub occurs_check: bool,
}

impl UnifyConfig {
    /// One-way: only variables on the left are bound.
    pub const LEFT: UnifyConfig = UnifyConfig {
        bind_left: true,
        bind_right: false,
        occurs_check: false,
    };

    /// One-way: only variables on the right are bound.
    pub const RIGHT: UnifyConfig = UnifyConfig {
        bind_left: false,
        bind_right: true,
        occurs_check: false,
    };

    /// Ordinary two-way unification without occurs check.
    pub const TWO_WAY: UnifyConfig = UnifyConfig {
        bind_left: true,
        bind_right: true,
        occurs_check: false,
    };

    /// Two-way unification with occurs check.
    pub const TWO_WAY_OCCURS: UnifyConfig = UnifyConfig {
        bind_left: true,
        bind_right: true,
        occurs_check: true,
    };
}

impl Default for UnifyConfig {
    fn default() -> Self {
        UnifyConfig::TWO_WAY
    }
}

/// Unify two terms, accumulating bindings in `sub`.
///
/// On failure the substitution is left in an arbitrary intermediate state
/// and must be discarded by the caller.
pub fn unify(l: Term, r: Term, sub: &mut Substitution, config: UnifyConfig, tf: &TermFactory) -> bool {
    if l == r {
        return true;
    }
    let l = if config.bind_left {
        sub.get(l).unwrap_or(l)
    } else {
        l
    };
    let r = if config.bind_right {
        sub.get(r).unwrap_or(r)
    } else {
        r
    };
    if l == r {
        return true;
    }
    if l.sort(tf) != r.sort(tf) {
        return false;
    }
    if l.symbol(tf) == r.symbol(tf) {
        for i in 0..l.arity(tf) as usize {
            if !unify(l.arg(i, tf), r.arg(i, tf), sub, config, tf) {
                return false;
            }
        }
        true
    } else if l.is_variable(tf) && config.bind_left && sub.add(l, r) {
        !config.occurs_check || !r.mentions(l, tf)
    } else if r.is_variable(tf) && config.bind_right && sub.add(r, l) {
        !config.occurs_check || !l.mentions(r, tf)
    } else {
        false
    }
}

/// Unify two terms into a fresh substitution.
pub fn unify_terms(l: Term, r: Term, config: UnifyConfig, tf: &TermFactory) -> Option<Substitution> {
    let mut sub = Substitution::new();
    if unify(l, r, &mut sub, config, tf) {
        Some(sub)
    } else {
        None
    }
}

/// Check whether two terms are isomorphic: equal up to a bijective renaming
/// of variables and of names, recorded pairwise in `sub`.
pub fn isomorphic(l: Term, r: Term, sub: &mut Substitution, tf: &TermFactory) -> bool {
    if l.is_function(tf) && r.is_function(tf) && !l.is_name() && !r.is_name() && l.symbol(tf) == r.symbol(tf)
    {
        for i in 0..l.arity(tf) as usize {
            if !isomorphic(l.arg(i, tf), r.arg(i, tf), sub, tf) {
                return false;
            }
        }
        true
    } else if l.is_variable(tf)
        && r.is_variable(tf)
        && l.sort(tf) == r.sort(tf)
        && sub.add(l, r)
        && sub.add(r, l)
    {
        true
    } else {
        l.is_name()
            && r.is_name()
            && l.sort(tf) == r.sort(tf)
            && sub.add(l, r)
            && sub.add(r, l)
    }
}

/// Check isomorphism into a fresh substitution.
pub fn isomorphic_terms(l: Term, r: Term, tf: &TermFactory) -> Option<Substitution> {
    let mut sub = Substitution::new();
    if isomorphic(l, r, &mut sub, tf) {
        Some(sub)
    } else {
        None
    }
}
