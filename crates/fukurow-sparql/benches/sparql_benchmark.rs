use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fukurow_core::Term;
use fukurow_sparql::SparqlStore;

/// A social-graph-shaped dataset: `size` people, each with a name, an age,
/// and a `knows` edge to the previous person.
fn generate_test_store(size: usize) -> SparqlStore {
    let mut store = SparqlStore::new();
    for i in 0..size {
        let person = Term::iri(format!("http://example.org/person{i}"));
        store.add_triples([
            fukurow_core::Triple::new(person.clone(), Term::identifier("name"), Term::string(format!("Person {i}"))),
            fukurow_core::Triple::new(person.clone(), Term::identifier("age"), Term::integer((i % 80 + 18) as i64)),
        ]);
        if i > 0 {
            let prev = Term::iri(format!("http://example.org/person{}", i - 1));
            store.add_triples([fukurow_core::Triple::new(person, Term::identifier("knows"), prev)]);
        }
    }
    store
}

fn benchmark_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("sparql_parsing");
    let queries = [
        ("simple_pattern", "SELECT ?id ?name WHERE { ?id name ?name }"),
        (
            "join_with_filter",
            "SELECT ?id ?age WHERE { ?id name ?n . ?id age ?age FILTER (?age > 30) }",
        ),
        (
            "union_order_limit",
            "SELECT ?id ?age WHERE { {?id age ?age} UNION {?id name ?age} } ORDER BY DESC(?age) LIMIT 10",
        ),
    ];

    for (name, text) in queries {
        group.bench_with_input(BenchmarkId::from_parameter(name), &text, |b, text| {
            b.iter(|| fukurow_sparql::SparqlQuery::parse(black_box(text)).unwrap());
        });
    }
    group.finish();
}

fn benchmark_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("sparql_evaluation");

    for &size in &[100usize, 1_000, 5_000] {
        let store = generate_test_store(size);

        group.bench_with_input(BenchmarkId::new("single_pattern", size), &store, |b, store| {
            b.iter(|| {
                let select = store.query("SELECT ?id ?name WHERE { ?id name ?name }").unwrap();
                black_box(select.rows().len())
            });
        });

        group.bench_with_input(BenchmarkId::new("two_pattern_join", size), &store, |b, store| {
            b.iter(|| {
                let select = store
                    .query("SELECT ?id ?name ?age WHERE { ?id name ?name . ?id age ?age }")
                    .unwrap();
                black_box(select.rows().len())
            });
        });

        group.bench_with_input(BenchmarkId::new("filter_order_limit", size), &store, |b, store| {
            b.iter(|| {
                let select = store
                    .query(
                        "SELECT ?id ?age WHERE { ?id age ?age FILTER (?age > 40) } ORDER BY DESC(?age) LIMIT 20",
                    )
                    .unwrap();
                black_box(select.rows().len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_parsing, benchmark_evaluation);
criterion_main!(benches);
