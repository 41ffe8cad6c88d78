//! Permutation-keyed triple index.
//!
//! Stands alone from [`crate::TripleStore`]: the evaluator never consults
//! it, and it never consults a [`fukurow_core::Solution`] — it only accepts
//! patterns and answers from its own permutation of the three positions.

use std::collections::HashMap;

use fukurow_core::{PatternTerm, Term, Triple, TriplePattern};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    /// A pattern left position `position` unbound while a later position
    /// (in this index's permutation order) was bound. This index can only
    /// answer prefix-bound lookups.
    #[error("pattern position {position} is unbound but a later position in the index's permutation is bound")]
    UnusablePrefix { position: usize },
}

/// A three-level nested map over (subject, predicate, object), reordered by
/// a fixed permutation of positions 0, 1, 2.
///
/// Lookups must bind a *prefix* of the permutation: if position `π[i]` is
/// left unbound in a query pattern, every `π[j]` with `j > i` must also be
/// unbound, or the lookup is rejected with
/// [`IndexError::UnusablePrefix`].
#[derive(Debug, Clone)]
pub struct PermutationIndex {
    permutation: [usize; 3],
    root: HashMap<Term, HashMap<Term, HashMap<Term, Triple>>>,
}

impl PermutationIndex {
    /// Build an index keyed in the order given by `permutation`, a
    /// permutation of `[0, 1, 2]` (0 = subject, 1 = predicate, 2 = object).
    pub fn new(permutation: [usize; 3]) -> Self {
        debug_assert!(is_permutation(&permutation));
        PermutationIndex {
            permutation,
            root: HashMap::new(),
        }
    }

    fn keys_for(&self, triple: &Triple) -> [Term; 3] {
        let positions = triple.positions();
        [
            positions[self.permutation[0]].clone(),
            positions[self.permutation[1]].clone(),
            positions[self.permutation[2]].clone(),
        ]
    }

    pub fn insert(&mut self, triple: Triple) {
        let [k0, k1, k2] = self.keys_for(&triple);
        self.root
            .entry(k0)
            .or_default()
            .entry(k1)
            .or_default()
            .insert(k2, triple);
    }

    /// Resolve `pattern`'s positions in this index's permutation order into
    /// bound terms, or `None` where the pattern leaves that position a
    /// variable. Returns an error if a bound position follows an unbound
    /// one in permutation order.
    fn resolve_prefix(&self, pattern: &TriplePattern) -> Result<[Option<Term>; 3], IndexError> {
        let positions = pattern.positions();
        let ordered: [&PatternTerm; 3] = [
            positions[self.permutation[0]],
            positions[self.permutation[1]],
            positions[self.permutation[2]],
        ];

        let mut keys: [Option<Term>; 3] = [None, None, None];
        let mut seen_unbound = false;
        for (i, term) in ordered.into_iter().enumerate() {
            match term {
                PatternTerm::Term(t) => {
                    if seen_unbound {
                        return Err(IndexError::UnusablePrefix { position: i });
                    }
                    keys[i] = Some(t.clone());
                }
                PatternTerm::Variable(_) => {
                    seen_unbound = true;
                }
            }
        }
        Ok(keys)
    }

    /// Return every stored triple matching `pattern`'s bound positions.
    /// Unbound positions (trailing in permutation order) are enumerated.
    pub fn match_pattern(&self, pattern: &TriplePattern) -> Result<Vec<Triple>, IndexError> {
        let [k0, k1, k2] = self.resolve_prefix(pattern)?;
        let mut results = Vec::new();

        let level0: Vec<&HashMap<Term, HashMap<Term, Triple>>> = match &k0 {
            Some(key) => self.root.get(key).into_iter().collect(),
            None => self.root.values().collect(),
        };

        for level0_map in level0 {
            let level1: Vec<&HashMap<Term, Triple>> = match &k1 {
                Some(key) => level0_map.get(key).into_iter().collect(),
                None => level0_map.values().collect(),
            };

            for level1_map in level1 {
                match &k2 {
                    Some(key) => results.extend(level1_map.get(key).cloned()),
                    None => results.extend(level1_map.values().cloned()),
                }
            }
        }

        Ok(results)
    }

    pub fn len(&self) -> usize {
        self.root
            .values()
            .flat_map(|l1| l1.values())
            .map(|l2| l2.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn is_permutation(p: &[usize; 3]) -> bool {
    let mut sorted = *p;
    sorted.sort_unstable();
    sorted == [0, 1, 2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use fukurow_core::Variable;

    fn triple(s: &str, p: &str, o: &str) -> Triple {
        Triple::new(Term::identifier(s), Term::identifier(p), Term::identifier(o))
    }

    #[test]
    fn subject_prefix_lookup_finds_inserted_triple() {
        let mut index = PermutationIndex::new([0, 1, 2]);
        index.insert(triple("alice", "knows", "bob"));
        index.insert(triple("alice", "knows", "carol"));
        index.insert(triple("bob", "knows", "carol"));

        let pattern = TriplePattern::new(
            Term::identifier("alice").into(),
            Variable::new("p").into(),
            Variable::new("o").into(),
        );
        let results = index.match_pattern(&pattern).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn fully_unbound_pattern_enumerates_everything() {
        let mut index = PermutationIndex::new([0, 1, 2]);
        index.insert(triple("a", "p", "b"));
        index.insert(triple("c", "p", "d"));

        let pattern = TriplePattern::new(
            Variable::new("s").into(),
            Variable::new("p").into(),
            Variable::new("o").into(),
        );
        assert_eq!(index.match_pattern(&pattern).unwrap().len(), 2);
    }

    #[test]
    fn bound_after_unbound_in_permutation_order_is_unusable() {
        // permutation [0,1,2] = subject, predicate, object: binding object
        // while leaving subject unbound skips a prefix position.
        let index = PermutationIndex::new([0, 1, 2]);
        let pattern = TriplePattern::new(
            Variable::new("s").into(),
            Variable::new("p").into(),
            Term::identifier("bob").into(),
        );
        assert_eq!(
            index.match_pattern(&pattern),
            Err(IndexError::UnusablePrefix { position: 2 })
        );
    }

    #[test]
    fn prefix_bound_lookup_respects_permutation_not_triple_order() {
        // permutation [2,0,1] = object, subject, predicate: binding object
        // alone is a valid prefix even though object is the triple's last
        // position.
        let mut index = PermutationIndex::new([2, 0, 1]);
        index.insert(triple("alice", "knows", "bob"));
        index.insert(triple("carol", "knows", "bob"));
        index.insert(triple("dave", "knows", "erin"));

        let pattern = TriplePattern::new(
            Variable::new("s").into(),
            Variable::new("p").into(),
            Term::identifier("bob").into(),
        );
        let results = index.match_pattern(&pattern).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn binding_a_non_prefix_position_in_a_reordered_permutation_is_unusable() {
        // permutation [2,0,1] = object, subject, predicate: binding
        // predicate while leaving subject unbound skips a prefix position,
        // even though both are bound "before" object in triple order.
        let index = PermutationIndex::new([2, 0, 1]);
        let pattern = TriplePattern::new(
            Variable::new("s").into(),
            Term::identifier("knows").into(),
            Term::identifier("bob").into(),
        );
        assert_eq!(
            index.match_pattern(&pattern),
            Err(IndexError::UnusablePrefix { position: 2 })
        );
    }
}
