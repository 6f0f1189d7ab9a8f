//! Document codec benchmark — encode vs. full create/get round trip over SQLite.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use docrel_core::codec::{DocumentStore, NestedResolver, encode};
use docrel_core::{
    Attribute, AttributeType, Collection, DocRelResult, Document, DocumentEngine, EngineConfig,
    SqlDialect, SqliteConnection,
};
use serde_json::json;

/// Store that never sees nested documents (the bench collection has none).
struct NoNesting;

impl DocumentStore for NoNesting {
    fn create_related(&self, _: &str, data: Document, _: usize) -> DocRelResult<Document> {
        Ok(data)
    }

    fn update_related(&self, _: &str, _: &str, data: Document, _: usize) -> DocRelResult<Document> {
        Ok(data)
    }

    fn get_related(&self, _: &str, _: &str, _: usize) -> DocRelResult<Option<Document>> {
        Ok(None)
    }
}

fn players() -> Collection {
    Collection::new(
        "players",
        vec![
            Attribute::new("name", AttributeType::Text),
            Attribute::new("email", AttributeType::Email),
            Attribute::new("level", AttributeType::Integer),
            Attribute::new("active", AttributeType::Boolean),
            Attribute::new("scores", AttributeType::Integer).with_array(true),
        ],
    )
    .unwrap()
}

fn player(scores: usize) -> Document {
    Document::new("players")
        .with("name", json!("player"))
        .with("email", json!("player@example.com"))
        .with("level", json!(42))
        .with("active", json!(true))
        .with("scores", json!((0..scores as i64).collect::<Vec<_>>()))
}

/// Benchmark: encode only
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    let collection = players();
    let store = NoNesting;
    let resolver = NestedResolver::new(&store, 0);

    for scores in [0usize, 10, 100] {
        let doc = player(scores);
        group.bench_with_input(BenchmarkId::from_parameter(scores), &doc, |b, doc| {
            b.iter(|| black_box(encode(&collection, "bench-id", doc, &resolver).unwrap()));
        });
    }
    group.finish();
}

/// Benchmark: create + get against in-memory SQLite
fn bench_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("round_trip");
    let config = EngineConfig::new("bench").with_dialect(SqlDialect::Sqlite);
    let engine = DocumentEngine::new(SqliteConnection::open_in_memory().unwrap(), config).unwrap();
    let collection = players();
    engine.create_collection(&collection).unwrap();

    for scores in [0usize, 10] {
        let doc = player(scores);
        group.bench_with_input(BenchmarkId::from_parameter(scores), &doc, |b, doc| {
            b.iter(|| {
                let created = engine.create_document(&collection, doc.clone()).unwrap();
                let id = created.id.unwrap();
                black_box(engine.get_document(&collection, &id).unwrap())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_round_trip);
criterion_main!(benches);
