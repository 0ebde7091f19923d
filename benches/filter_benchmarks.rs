/*!
# Filter Benchmarks

Parsing and condition building for the list query language, without a
database.

```bash
cargo bench --bench filter_benchmarks
cargo bench --bench filter_benchmarks -- --quick
```
*/

use std::hint::black_box;

use bookshelf::{
    core::Resource,
    entities::book,
    filtering::{ListQuery, build_condition, parse_filter},
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sea_orm::{DatabaseBackend, EntityTrait, QueryFilter, QueryTrait};

fn filters(count: usize) -> Vec<(String, String)> {
    let templates = [
        ("title", "ilike:%war%"),
        ("year_of_publication", "gte:1900"),
        ("isbn", "in:9780441172719,9780141439587,9781400079988"),
        ("created_at", "lt:2030-01-01T00:00:00Z"),
        ("series", "like:Dune%"),
    ];
    templates
        .iter()
        .cycle()
        .take(count)
        .map(|(field, raw)| ((*field).to_string(), (*raw).to_string()))
        .collect()
}

fn bench_parse_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_filter");
    for raw in ["Dune", "gte:1950", "lt:2023-01-01T00:00:00", "in:1,2,3,4,5"] {
        group.bench_with_input(BenchmarkId::from_parameter(raw), raw, |b, raw| {
            b.iter(|| parse_filter(black_box(raw)));
        });
    }
    group.finish();
}

fn bench_build_condition(c: &mut Criterion) {
    let allowed = book::Entity::filterable_columns();
    let mut group = c.benchmark_group("build_condition");
    for count in [1, 5, 20] {
        let filters = filters(count);
        for backend in [DatabaseBackend::Sqlite, DatabaseBackend::Postgres] {
            group.bench_with_input(
                BenchmarkId::new(format!("{backend:?}"), count),
                &filters,
                |b, filters| {
                    b.iter(|| build_condition(black_box(filters), &allowed, backend));
                },
            );
        }
    }
    group.finish();
}

fn bench_render_list_query(c: &mut Criterion) {
    let pairs: Vec<(String, String)> = [
        ("page", "3"),
        ("size", "25"),
        ("sort_by", "title"),
        ("sort_order", "desc"),
        ("title", "ilike:%war%"),
        ("year_of_publication", "gte:1900"),
    ]
    .iter()
    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
    .collect();

    c.bench_function("render_list_query", |b| {
        b.iter(|| {
            let query = ListQuery::<book::Entity>::from_pairs(black_box(pairs.clone())).unwrap();
            let condition = build_condition(
                &query.filters,
                &book::Entity::filterable_columns(),
                DatabaseBackend::Postgres,
            )
            .unwrap();
            book::Entity::find()
                .filter(condition)
                .build(DatabaseBackend::Postgres)
                .to_string()
        });
    });
}

criterion_group!(
    benches,
    bench_parse_filter,
    bench_build_condition,
    bench_render_list_query
);
criterion_main!(benches);
