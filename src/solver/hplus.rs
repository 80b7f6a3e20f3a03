//! The bounded Herbrand universe H⁺.

use indexmap::IndexMap;

use crate::syntax::{Sort, SortedNames, SymbolFactory, TermFactory};
use crate::theory::Bat;

/// Compute the name universe for one query: every name mentioned in the
/// theory or the query, plus fresh placeholder names.
///
/// The placeholders make quantifiers meaningful beyond the mentioned names:
/// per sort, one fresh name for each quantifier occurrence in the query and
/// as many as the largest same-sort variable group in any single clause of
/// the theory.
pub fn bat_hplus(
    bat: &Bat,
    query_names: &SortedNames,
    query_var_sorts: &[Sort],
    sym: &mut SymbolFactory,
    tf: &mut TermFactory,
) -> SortedNames {
    let mut hplus = SortedNames::new();
    bat.collect_names(tf, &mut hplus);
    hplus.merge(query_names);

    let mut budget: IndexMap<Sort, usize> = IndexMap::new();
    for sort in bat.quantified_sorts(tf) {
        budget.insert(sort, bat.max_vars_of_sort(sort, tf));
    }
    for &sort in query_var_sorts {
        *budget.entry(sort).or_insert(0) += 1;
    }
    for (sort, n) in budget {
        for _ in 0..n {
            let name = tf.create_atom(sym.create_name(sort));
            hplus.insert(name, tf);
        }
    }
    log::trace!("herbrand universe holds {} names", hplus.len());
    hplus
}
