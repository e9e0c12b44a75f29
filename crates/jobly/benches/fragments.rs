use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use jobly::models::{COMPANY_FILTERS, JOB_FILTERS, USER_COLUMNS};
use jobly::sql::{ColumnNames, Patch, compose_filters, filters_from_query, partial_update};

/// A patch with `n` fields: f0 = 0, f1 = 1, ...
fn build_patch(n: i64) -> Patch {
    (0..n).map(|i| (format!("f{i}"), i)).collect()
}

fn bench_partial_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("fragments/partial_update");

    for n in [1, 5, 10, 50, 100] {
        let patch = build_patch(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &patch, |b, patch| {
            b.iter(|| black_box(partial_update(patch, ColumnNames::IDENTITY)));
        });
    }

    group.finish();
}

fn bench_partial_update_translated(c: &mut Criterion) {
    let patch = Patch::new()
        .set("firstName", "New")
        .set("lastName", "Name")
        .set("email", "new@email.com")
        .set("isAdmin", true);

    c.bench_function("fragments/partial_update_translated", |b| {
        b.iter(|| black_box(partial_update(&patch, USER_COLUMNS)));
    });
}

fn bench_compose_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("fragments/compose_filters");

    let all = filters_from_query([("title", "Engineer"), ("minSalary", "50000"), ("hasEquity", "true")]);
    group.bench_function("jobs_all", |b| {
        b.iter(|| black_box(compose_filters(&all, &JOB_FILTERS)));
    });

    let none = filters_from_query([("title", ""), ("minSalary", "lots")]);
    group.bench_function("jobs_skipped", |b| {
        b.iter(|| black_box(compose_filters(&none, &JOB_FILTERS)));
    });

    let range = filters_from_query([("name", "net"), ("minEmployees", "10"), ("maxEmployees", "500")]);
    group.bench_function("companies_range", |b| {
        b.iter(|| black_box(compose_filters(&range, &COMPANY_FILTERS)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_partial_update,
    bench_partial_update_translated,
    bench_compose_filters
);
criterion_main!(benches);
