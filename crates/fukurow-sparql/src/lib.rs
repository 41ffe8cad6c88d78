//! # fukurow-sparql
//!
//! The SPARQL subset this crate understands is restricted to `SELECT`:
//! a triple-pattern `WHERE` clause with `OPTIONAL`/`UNION`/`FILTER`, the
//! `ORDER BY`/`LIMIT`/`OFFSET`/`DISTINCT` solution modifiers, and `PREFIX`
//! declarations applied at parse time. There is no `CONSTRUCT`, `ASK`,
//! `DESCRIBE`, `UPDATE`, named graphs, or cost-based query planning — the
//! evaluator always walks the algebra tree left to right against
//! [`fukurow_store::TripleStore::match_triples`].
//!
//! Pipeline: [`query::SparqlQuery::parse`] turns query text into an
//! [`algebra::Algebra`] tree plus modifiers; [`SparqlStore::query`] binds
//! that to a store and returns a lazily-iterable [`evaluator::SelectQuery`].

pub mod algebra;
pub mod evaluator;
pub mod expression;
pub mod lexer;
pub mod parser;
pub mod query;

pub use algebra::Algebra;
pub use evaluator::SelectQuery;
pub use expression::{ArithmeticOp, CompareOp, Comparison, Expression, ExpressionError};
pub use query::{OrderBy, OrderDirection, Projection, SparqlQuery};

use fukurow_core::{Solution, Triple, TriplePattern};
use fukurow_store::TripleStore;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SparqlError {
    #[error("parse error at byte offset {position}: {message}")]
    Parse { message: String, position: usize },
}

/// The query façade: a [`TripleStore`] plus the `parse_query`/`query`
/// operations the distilled spec's "triple source" contract names. Not a
/// process-wide singleton — an explicit, owned value, per the spec's
/// "Global triple store" design note.
#[derive(Debug, Clone, Default)]
pub struct SparqlStore {
    store: TripleStore,
}

impl SparqlStore {
    pub fn new() -> Self {
        SparqlStore { store: TripleStore::new() }
    }

    pub fn add_triples(&mut self, triples: impl IntoIterator<Item = Triple>) {
        self.store.add_triples(triples);
    }

    pub fn clear_triples(&mut self) {
        self.store.clear_triples();
    }

    pub fn match_triples<'a>(
        &'a self,
        pattern: &'a TriplePattern,
        solution: &'a Solution,
    ) -> impl Iterator<Item = Solution> + 'a {
        self.store.match_triples(pattern, solution)
    }

    /// Parse `text`, returning the algebra-tree-plus-modifiers parse tree
    /// without binding it to this store yet.
    pub fn parse_query(&self, text: &str) -> Result<SparqlQuery, SparqlError> {
        SparqlQuery::parse(text)
    }

    /// Parse `text` and bind the result to this store. The returned
    /// [`SelectQuery`] re-drives the whole pipeline on every iteration, so
    /// it always reflects the store's current contents.
    pub fn query(&self, text: &str) -> Result<SelectQuery<'_>, SparqlError> {
        let query = self.parse_query(text)?;
        Ok(SelectQuery::new(query, &self.store))
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fukurow_core::Term;

    #[test]
    fn store_roundtrips_add_query_clear() {
        let mut store = SparqlStore::new();
        store.add_triples([Triple::new(
            Term::identifier("a"),
            Term::identifier("name"),
            Term::identifier("name-a"),
        )]);

        let select = store.query("SELECT ?id ?name WHERE { ?id name ?name }").unwrap();
        assert_eq!(select.rows().len(), 1);

        store.clear_triples();
        let select = store.query("SELECT ?id ?name WHERE { ?id name ?name }").unwrap();
        assert_eq!(select.rows().len(), 0);
    }

    #[test]
    fn parse_query_surfaces_a_parse_error_with_position() {
        let store = SparqlStore::new();
        let err = store.parse_query("SELECT ?id ?id").unwrap_err();
        match err {
            SparqlError::Parse { .. } => {}
        }
    }
}
