//! RDF term, triple and solution data model shared by the triple store and
//! the SPARQL query pipeline.

use ordered_float::OrderedFloat;
use smallvec::SmallVec;
use std::fmt;

/// A `?`-prefixed query variable, stored without the leading `?`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(String);

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Variable(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

impl From<&str> for Variable {
    fn from(s: &str) -> Self {
        Variable::new(s)
    }
}

impl From<String> for Variable {
    fn from(s: String) -> Self {
        Variable::new(s)
    }
}

/// An RDF term: one of the value kinds this SPARQL subset understands.
///
/// There are no datatypes, language tags, or blank nodes — see the
/// Non-goals in the value-model spec section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Iri(String),
    String(String),
    Integer(i64),
    Float(OrderedFloat<f64>),
    Boolean(bool),
    /// A bare word that is neither a recognized IRI, string, number, nor
    /// boolean literal (also what an unresolved `prefix:local` falls back
    /// to when the prefix has no declared binding).
    Identifier(String),
}

impl Term {
    pub fn iri(s: impl Into<String>) -> Self {
        Term::Iri(s.into())
    }

    pub fn string(s: impl Into<String>) -> Self {
        Term::String(s.into())
    }

    pub fn integer(v: i64) -> Self {
        Term::Integer(v)
    }

    pub fn float(v: f64) -> Self {
        Term::Float(OrderedFloat(v))
    }

    pub fn boolean(v: bool) -> Self {
        Term::Boolean(v)
    }

    pub fn identifier(s: impl Into<String>) -> Self {
        Term::Identifier(s.into())
    }

    /// Numeric value for arithmetic/comparison, if this term is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Term::Integer(i) => Some(*i as f64),
            Term::Float(f) => Some(f.0),
            _ => None,
        }
    }

    /// String form for lexicographic comparison of non-numeric terms.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Term::Iri(s) | Term::String(s) | Term::Identifier(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::String(s) => write!(f, "\"{s}\""),
            Term::Integer(i) => write!(f, "{i}"),
            Term::Float(v) => write!(f, "{}", v.0),
            Term::Boolean(b) => write!(f, "{b}"),
            Term::Identifier(s) => write!(f, "{s}"),
        }
    }
}

/// An ordered (subject, predicate, object) of terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Triple {
            subject,
            predicate,
            object,
        }
    }

    /// The triple's three positions, in (subject, predicate, object) order.
    pub fn positions(&self) -> [&Term; 3] {
        [&self.subject, &self.predicate, &self.object]
    }
}

/// Either a variable or a literal term — one position of a triple pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternTerm {
    Variable(Variable),
    Term(Term),
}

impl PatternTerm {
    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            PatternTerm::Variable(v) => Some(v),
            PatternTerm::Term(_) => None,
        }
    }
}

impl From<Variable> for PatternTerm {
    fn from(v: Variable) -> Self {
        PatternTerm::Variable(v)
    }
}

impl From<Term> for PatternTerm {
    fn from(t: Term) -> Self {
        PatternTerm::Term(t)
    }
}

/// A triple pattern: each position is either bound to a literal term or
/// left open as a variable.
#[derive(Debug, Clone, PartialEq)]
pub struct TriplePattern {
    pub subject: PatternTerm,
    pub predicate: PatternTerm,
    pub object: PatternTerm,
}

impl TriplePattern {
    pub fn new(subject: PatternTerm, predicate: PatternTerm, object: PatternTerm) -> Self {
        TriplePattern {
            subject,
            predicate,
            object,
        }
    }

    pub fn positions(&self) -> [&PatternTerm; 3] {
        [&self.subject, &self.predicate, &self.object]
    }

    /// Variables appearing in this pattern, left-to-right, with duplicates
    /// if the same variable occupies more than one position.
    pub fn variables(&self) -> SmallVec<[&Variable; 3]> {
        self.positions()
            .into_iter()
            .filter_map(PatternTerm::as_variable)
            .collect()
    }
}

/// A mapping from variable name to bound term.
///
/// Backed by a small flat vector rather than a hash map: solutions in this
/// pipeline rarely exceed a handful of variables, so linear lookup beats
/// hashing overhead, and vector storage keeps first-bound order stable for
/// free (useful for deterministic test output).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Solution(SmallVec<[(Variable, Term); 8]>);

impl Solution {
    pub fn new() -> Self {
        Solution(SmallVec::new())
    }

    pub fn get(&self, var: &Variable) -> Option<&Term> {
        self.0.iter().find(|(v, _)| v == var).map(|(_, t)| t)
    }

    pub fn contains(&self, var: &Variable) -> bool {
        self.0.iter().any(|(v, _)| v == var)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Term)> {
        self.0.iter().map(|(v, t)| (v, t))
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.0.iter().map(|(v, _)| v)
    }

    /// Insert a single binding. Only meant for constructing fresh solutions
    /// (e.g. from a matched triple); does not enforce incoming-wins — use
    /// [`Solution::extended`] to combine with an existing solution.
    pub fn insert(&mut self, var: Variable, term: Term) {
        if let Some(slot) = self.0.iter_mut().find(|(v, _)| *v == var) {
            slot.1 = term;
        } else {
            self.0.push((var, term));
        }
    }

    /// Produce a new solution containing every binding of `self` plus every
    /// binding of `additional` whose variable is not already bound here.
    ///
    /// This is the "extends" relationship the evaluator's invariants rely
    /// on: the result always extends `self`, and `self`'s bindings always
    /// win on conflict.
    pub fn extended<I>(&self, additional: I) -> Solution
    where
        I: IntoIterator<Item = (Variable, Term)>,
    {
        let mut result = self.clone();
        for (var, term) in additional {
            if !result.contains(&var) {
                result.0.push((var, term));
            }
        }
        result
    }
}

impl FromIterator<(Variable, Term)> for Solution {
    fn from_iter<I: IntoIterator<Item = (Variable, Term)>>(iter: I) -> Self {
        let mut solution = Solution::new();
        for (var, term) in iter {
            solution.insert(var, term);
        }
        solution
    }
}
