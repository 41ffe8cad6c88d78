use fukurow_core::{Term, Triple, TriplePattern, Variable};
use fukurow_store::{IndexError, PermutationIndex};
use proptest::prelude::*;

fn triple_strategy() -> impl Strategy<Value = Triple> {
    ("[a-e]", "[a-e]", "[a-e]").prop_map(|(s, p, o)| {
        Triple::new(Term::identifier(s), Term::identifier(p), Term::identifier(o))
    })
}

proptest! {
    #[test]
    fn every_inserted_triple_is_found_by_a_fully_bound_lookup(triples in proptest::collection::vec(triple_strategy(), 0..20)) {
        let mut index = PermutationIndex::new([0, 1, 2]);
        for t in &triples {
            index.insert(t.clone());
        }
        for t in &triples {
            let pattern = TriplePattern::new(
                t.subject.clone().into(),
                t.predicate.clone().into(),
                t.object.clone().into(),
            );
            let found = index.match_pattern(&pattern).unwrap();
            prop_assert!(found.contains(t));
        }
    }

    #[test]
    fn subject_bound_lookup_returns_only_triples_with_that_subject(
        triples in proptest::collection::vec(triple_strategy(), 0..20),
        subject in "[a-e]",
    ) {
        let mut index = PermutationIndex::new([0, 1, 2]);
        for t in &triples {
            index.insert(t.clone());
        }

        let pattern = TriplePattern::new(
            Term::identifier(subject.clone()).into(),
            Variable::new("p").into(),
            Variable::new("o").into(),
        );
        let found = index.match_pattern(&pattern).unwrap();

        let expected_count = triples.iter().filter(|t| t.subject == Term::identifier(subject.clone())).count();
        prop_assert_eq!(found.len(), expected_count);
        for t in &found {
            prop_assert_eq!(&t.subject, &Term::identifier(subject.clone()));
        }
    }
}

#[test]
fn binding_only_a_non_prefix_position_is_rejected() {
    let index = PermutationIndex::new([0, 1, 2]);
    let pattern = TriplePattern::new(
        Variable::new("s").into(),
        Term::identifier("p").into(),
        Variable::new("o").into(),
    );
    assert_eq!(
        index.match_pattern(&pattern),
        Err(IndexError::UnusablePrefix { position: 1 })
    );
}

#[test]
fn empty_index_yields_no_matches_for_any_pattern() {
    let index = PermutationIndex::new([0, 1, 2]);
    let pattern = TriplePattern::new(
        Variable::new("s").into(),
        Variable::new("p").into(),
        Variable::new("o").into(),
    );
    assert_eq!(index.match_pattern(&pattern).unwrap().len(), 0);
}
