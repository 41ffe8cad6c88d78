//! # fukurow-core
//!
//! Term/triple/solution data model shared by [`fukurow-store`](../fukurow_store/index.html)
//! and [`fukurow-sparql`](../fukurow_sparql/index.html). No parsing, no
//! storage, no I/O — just the value types the rest of the query pipeline is
//! built from.

pub mod model;

pub use model::{PatternTerm, Solution, Term, Triple, TriplePattern, Variable};
