//! # fukurow-store
//!
//! The in-memory triple store the SPARQL evaluator runs against
//! ([`TripleStore`]), plus a standalone permutation-keyed index structure
//! ([`index::PermutationIndex`]) that the evaluator does not use — there is
//! no query optimizer in this pipeline that would pick an index for a
//! given pattern.

pub mod index;
pub mod store;

pub use index::{IndexError, PermutationIndex};
pub use store::TripleStore;
