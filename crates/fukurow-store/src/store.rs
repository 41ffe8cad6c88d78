//! Flat, append-only triple store and its single matching primitive.

use fukurow_core::{PatternTerm, Solution, Triple, TriplePattern};

/// An insertion-ordered collection of triples with one query primitive:
/// [`TripleStore::match_triples`].
///
/// There is no deduplication and no integrity checking beyond arity three.
/// Mutating the store while a query is mid-iteration is unsupported — the
/// returned iterators borrow the store's current triples and make no
/// attempt to detect concurrent modification.
#[derive(Debug, Clone, Default)]
pub struct TripleStore {
    triples: Vec<Triple>,
}

impl TripleStore {
    pub fn new() -> Self {
        TripleStore { triples: Vec::new() }
    }

    /// Append triples to the store in order. No deduplication.
    pub fn add_triples(&mut self, triples: impl IntoIterator<Item = Triple>) {
        self.triples.extend(triples);
    }

    /// Drop every stored triple.
    pub fn clear_triples(&mut self) {
        self.triples.clear();
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Match `pattern` against every stored triple, given the bindings
    /// already established by `solution`.
    ///
    /// A pattern position resolves against `solution` before comparison: a
    /// literal term position must equal the stored triple's term at that
    /// position; a variable position matches any stored term unless the
    /// variable is already bound in `solution`, in which case the bound
    /// term must equal the stored term. Each matching triple yields
    /// `solution.extended(bindings)`, where `bindings` covers every
    /// variable position of the pattern (even ones already bound in
    /// `solution` — the extension contract means `solution`'s own bindings
    /// win on conflict, so rebinding an already-bound variable here is a
    /// no-op). A pattern with the same variable in more than one position
    /// is not checked for cross-position consistency; each position is
    /// resolved and compared independently.
    pub fn match_triples<'a>(
        &'a self,
        pattern: &'a TriplePattern,
        solution: &'a Solution,
    ) -> impl Iterator<Item = Solution> + 'a {
        self.triples.iter().filter_map(move |triple| {
            let mut bindings = Solution::new();
            for (pat_term, stored_term) in pattern.positions().into_iter().zip(triple.positions())
            {
                match pat_term {
                    PatternTerm::Term(term) => {
                        if term != stored_term {
                            return None;
                        }
                    }
                    PatternTerm::Variable(var) => {
                        if let Some(bound) = solution.get(var) {
                            if bound != stored_term {
                                return None;
                            }
                        }
                        bindings.insert(var.clone(), stored_term.clone());
                    }
                }
            }
            Some(solution.extended(bindings.iter().map(|(v, t)| (v.clone(), t.clone()))))
        })
    }
}
