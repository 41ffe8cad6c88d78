//! The evaluation algebra: a closed set of pattern nodes, each exposing a
//! `solutions` stream over a [`TripleStore`] given an incoming [`Solution`].
//!
//! Every node type materializes its own output into a `Vec<Solution>`
//! before handing an iterator back to its caller, rather than chaining
//! borrowed iterators node to node. Solutions are small (see
//! [`fukurow_core::Solution`]'s own doc comment) and this pipeline never
//! runs over more than a handful of joins, so the simplicity is worth more
//! than the laziness; the public shape (`impl Iterator`) still lets a
//! caller treat every node, uniformly, as a stream.

use fukurow_core::{Solution, TriplePattern, Variable};
use fukurow_store::TripleStore;

use crate::expression::Comparison;

/// One node of the evaluation tree. The node set is closed: every query's
/// `WHERE` clause compiles down to some composition of these five shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Algebra {
    Pattern(TriplePattern),
    PatternGroup(Vec<Algebra>),
    OptionalGroup(Box<Algebra>),
    UnionGroup(Box<Algebra>, Box<Algebra>),
    Filter(Comparison),
}

impl Algebra {
    /// Evaluate this node against `store`, starting from `solution`.
    ///
    /// Every yielded solution extends `solution` (every binding already in
    /// `solution` survives unchanged), except that `OptionalGroup` yields
    /// `solution` itself verbatim when its child matches nothing.
    pub fn solutions(&self, store: &TripleStore, solution: Solution) -> Vec<Solution> {
        match self {
            Algebra::Pattern(pattern) => store.match_triples(pattern, &solution).collect(),
            Algebra::PatternGroup(children) => {
                let mut frontier = vec![solution];
                for child in children {
                    let mut next = Vec::new();
                    for s in frontier {
                        next.extend(child.solutions(store, s));
                    }
                    frontier = next;
                }
                frontier
            }
            Algebra::OptionalGroup(child) => {
                let results = child.solutions(store, solution.clone());
                if results.is_empty() {
                    vec![solution]
                } else {
                    results
                }
            }
            Algebra::UnionGroup(left, right) => {
                let mut results = left.solutions(store, solution.clone());
                results.extend(right.solutions(store, solution));
                results
            }
            Algebra::Filter(comparison) => match comparison.matches(&solution) {
                Ok(true) => vec![solution],
                _ => Vec::new(),
            },
        }
    }

    /// Every variable this node (or one of its descendants) can bind, in
    /// first-occurrence order with duplicates, for `SELECT *` expansion.
    pub fn variables(&self) -> Vec<Variable> {
        match self {
            Algebra::Pattern(pattern) => pattern.variables().into_iter().cloned().collect(),
            Algebra::PatternGroup(children) => {
                children.iter().flat_map(Algebra::variables).collect()
            }
            Algebra::OptionalGroup(child) => child.variables(),
            Algebra::UnionGroup(left, right) => {
                left.variables().into_iter().chain(right.variables()).collect()
            }
            Algebra::Filter(_) => Vec::new(),
        }
    }
}
