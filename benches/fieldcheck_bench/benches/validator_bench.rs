//! Validation engine benchmarks
//!
//! Measures rule compilation, evaluation and wildcard expansion.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fieldcheck_validate::{FieldPath, Password, RuleSet, Validator};
use serde_json::{json, Value};

fn login_rules() -> [(&'static str, RuleSet); 2] {
    [
        ("username", RuleSet::from("required|email|max:100")),
        (
            "password",
            RuleSet::new()
                .rule("required")
                .rule(Password::min(6).letters().numbers().symbols()),
        ),
    ]
}

fn addresses(count: usize) -> Value {
    let items: Vec<Value> = (0..count)
        .map(|i| {
            if i % 10 == 0 {
                json!({"street": "Jl. Mangga"})
            } else {
                json!({"street": "Jl. Mangga", "city": "Jakarta", "country": "Indonesia"})
            }
        })
        .collect();
    json!({ "address": items })
}

/// Benchmark compiling rule declarations
fn bench_make(c: &mut Criterion) {
    let mut group = c.benchmark_group("make");

    group.bench_function("login_rules", |b| {
        b.iter(|| Validator::make(black_box(json!({})), login_rules()))
    });

    group.bench_function("pipe_string_parse", |b| {
        b.iter(|| RuleSet::parse(black_box("bail|required|string|between:6,20|regex:^[a-z]+$")))
    });

    group.finish();
}

/// Benchmark a full validation run
fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");

    let valid = json!({"username": "admin@mail.com", "password": "admin123@mail.com"});
    let invalid = json!({"username": "admin", "password": "admin"});

    group.bench_function("valid_login", |b| {
        b.iter(|| {
            let validator = Validator::make(black_box(valid.clone()), login_rules()).unwrap();
            validator.passes()
        })
    });

    group.bench_function("invalid_login_id", |b| {
        b.iter(|| {
            let validator = Validator::make(black_box(invalid.clone()), login_rules())
                .unwrap()
                .locale("id");
            validator.errors().len()
        })
    });

    group.finish();
}

/// Benchmark wildcard paths over growing arrays
fn bench_wildcards(c: &mut Criterion) {
    let mut group = c.benchmark_group("wildcards");
    let path = FieldPath::parse("address.*.city").unwrap();

    for count in [10usize, 100, 1000] {
        let data = addresses(count);

        group.bench_with_input(BenchmarkId::new("resolve", count), &data, |b, data| {
            b.iter(|| path.resolve(black_box(data)).len())
        });

        group.bench_with_input(BenchmarkId::new("validate", count), &data, |b, data| {
            b.iter(|| {
                let validator = Validator::make(
                    data.clone(),
                    [("address.*.city", "required|max:100"), ("address.*.street", "max:100")],
                )
                .unwrap();
                validator.errors().len()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_make, bench_validate, bench_wildcards);
criterion_main!(benches);
