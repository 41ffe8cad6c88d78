//! The solution-modifier stage: everything a [`crate::query::SparqlQuery`]
//! applies to its algebra's raw solution stream before producing result
//! tuples — `ORDER BY`, `OFFSET`/`LIMIT`, projection, and `DISTINCT`.
//!
//! [`SelectQuery`] is the lazily-iterable façade the crate docs call the
//! query's "fresh iteration re-drives the pipeline": it holds only a
//! reference to the store and the parsed query, so every call to
//! [`SelectQuery::rows`] (or every `for row in &select_query`) re-evaluates
//! the algebra from scratch against the store's current contents.

use fukurow_core::{Solution, Term};
use fukurow_store::TripleStore;

use crate::query::{OrderBy, OrderDirection, SparqlQuery};

/// A lazily-iterable, already-parsed `SELECT` query bound to a store.
///
/// Re-iterating (calling [`SelectQuery::rows`] again, or iterating `&self`
/// more than once) re-drives the whole pipeline, so it reflects whatever
/// mutations happened to the store between iterations — see the crate's
/// "Store mutation mid-iteration" note for what is and isn't guaranteed
/// about a mutation happening *during* one iteration.
pub struct SelectQuery<'a> {
    query: SparqlQuery,
    store: &'a TripleStore,
}

impl<'a> SelectQuery<'a> {
    pub fn new(query: SparqlQuery, store: &'a TripleStore) -> Self {
        SelectQuery { query, store }
    }

    /// The projected variables, in output order (after `SELECT *`
    /// expansion and de-duplication, done at parse time).
    pub fn variables(&self) -> &[fukurow_core::Variable] {
        self.query.projected_variables()
    }

    /// Run the full pipeline — algebra evaluation, `ORDER BY`,
    /// `OFFSET`/`LIMIT`, projection, `DISTINCT` — and return the result
    /// tuples. An unbound projected variable yields `None` in that slot.
    pub fn rows(&self) -> Vec<Vec<Option<Term>>> {
        let mut solutions = self.query.root.solutions(self.store, Solution::new());

        if let Some(order_by) = &self.query.order_by {
            solutions = sort_by_key(solutions, order_by);
        }

        let sliced: Vec<Solution> = match self.query.limit {
            Some(limit) => solutions.into_iter().skip(self.query.offset).take(limit).collect(),
            None => solutions.into_iter().skip(self.query.offset).collect(),
        };

        let projected: Vec<Vec<Option<Term>>> = sliced
            .iter()
            .map(|solution| {
                self.query
                    .projected_variables()
                    .iter()
                    .map(|var| solution.get(var).cloned())
                    .collect()
            })
            .collect();

        if self.query.distinct {
            dedup_preserving_order(projected)
        } else {
            projected
        }
    }
}

impl<'a, 'b> IntoIterator for &'b SelectQuery<'a> {
    type Item = Vec<Option<Term>>;
    type IntoIter = std::vec::IntoIter<Vec<Option<Term>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows().into_iter()
    }
}

/// Stable sort by the `ORDER BY` key expression. `DESC` is implemented by
/// reversing the comparator rather than reversing the sorted vector, so
/// solutions with equal keys keep their original relative order either
/// way (genuine descending-stable, not "ascending-stable then flipped").
fn sort_by_key(solutions: Vec<Solution>, order_by: &OrderBy) -> Vec<Solution> {
    let mut keyed: Vec<(Option<Term>, Solution)> = solutions
        .into_iter()
        .map(|s| (order_by.expression.resolve(&s), s))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| match order_by.direction {
        OrderDirection::Asc => a.cmp(b),
        OrderDirection::Desc => b.cmp(a),
    });
    keyed.into_iter().map(|(_, s)| s).collect()
}

fn dedup_preserving_order(rows: Vec<Vec<Option<Term>>>) -> Vec<Vec<Option<Term>>> {
    let mut seen: Vec<Vec<Option<Term>>> = Vec::new();
    let mut result = Vec::with_capacity(rows.len());
    for row in rows {
        if !seen.contains(&row) {
            seen.push(row.clone());
            result.push(row);
        }
    }
    result
}
