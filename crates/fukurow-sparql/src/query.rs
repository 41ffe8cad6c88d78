//! The parsed query shape: projected variables, the algebra root, and the
//! solution modifiers (`ORDER BY` / `LIMIT` / `OFFSET` / `DISTINCT`).
//!
//! Parsing lives in [`crate::parser`]; this module only holds the data the
//! parser produces and the query-text entry point ([`SparqlQuery::parse`]).

use fukurow_core::Variable;

use crate::algebra::Algebra;
use crate::expression::Expression;
use crate::parser::Parser;
use crate::SparqlError;

/// The projected variable list of a `SELECT` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// `SELECT *` — expanded against the root algebra's `variables()` at
    /// construction time (see [`SparqlQuery::parse`]).
    Star,
    Variables(Vec<Variable>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub expression: Expression,
    pub direction: OrderDirection,
}

/// A fully parsed `SELECT` query: the projection (duplicate-free,
/// first-occurrence order), the algebra tree, and the modifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct SparqlQuery {
    pub projection: Projection,
    pub root: Algebra,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
    pub offset: usize,
    pub distinct: bool,
}

impl SparqlQuery {
    /// Parse `text` against the grammar subset in the crate docs.
    ///
    /// `SELECT *` is expanded here, against the root algebra's `variables()`,
    /// deduplicated by first appearance — this is a construction-time
    /// rewrite, not something later stages need to special-case.
    pub fn parse(text: &str) -> Result<Self, SparqlError> {
        let mut query = Parser::new(text)?.parse()?;
        query.projection = match query.projection {
            Projection::Star => Projection::Variables(dedup_first_occurrence(query.root.variables())),
            Projection::Variables(vars) => Projection::Variables(dedup_first_occurrence(vars)),
        };
        Ok(query)
    }

    /// The projected variables in output order, after `SELECT *` expansion.
    pub fn projected_variables(&self) -> &[Variable] {
        match &self.projection {
            Projection::Star => unreachable!("Projection::Star is expanded during parse()"),
            Projection::Variables(vars) => vars,
        }
    }
}

fn dedup_first_occurrence(vars: Vec<Variable>) -> Vec<Variable> {
    let mut seen = Vec::new();
    for v in vars {
        if !seen.contains(&v) {
            seen.push(v);
        }
    }
    seen
}
