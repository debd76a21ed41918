use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use license_expression::{LicenseSymbol, Licensing, ParseOptions};

const EXPRESSIONS: &[(&str, &str)] = &[
    ("short", "mit or apache-2.0"),
    (
        "with_exception",
        "gpl-2.0+ with classpath-exception-2.0 or (bsd-3-clause and zlib)",
    ),
    (
        "multi_word",
        "gnu general public license 2.0 or later and apache license 2.0 or mit license",
    ),
];

fn registry() -> Licensing {
    let symbols = vec![
        LicenseSymbol::new("MIT").unwrap().with_aliases(["MIT License", "Expat"]),
        LicenseSymbol::new("Apache-2.0")
            .unwrap()
            .with_aliases(["Apache License 2.0", "ASL 2.0"]),
        LicenseSymbol::new("GPL-2.0+")
            .unwrap()
            .with_aliases(["GNU General Public License 2.0 or later"]),
        LicenseSymbol::new("BSD-3-Clause").unwrap(),
        LicenseSymbol::new("Zlib").unwrap(),
        LicenseSymbol::exception("Classpath-exception-2.0").unwrap(),
    ];
    Licensing::new(symbols).unwrap()
}

fn bench_tokenize(c: &mut Criterion) {
    let licensing = registry();
    let mut group = c.benchmark_group("tokenize");

    for (name, expression) in EXPRESSIONS {
        group.bench_with_input(BenchmarkId::new("advanced", name), expression, |b, e| {
            b.iter(|| licensing.tokenize(black_box(e), ParseOptions::default()))
        });
        group.bench_with_input(BenchmarkId::new("simple", name), expression, |b, e| {
            b.iter(|| licensing.tokenize(black_box(e), ParseOptions::new().with_simple(true)))
        });
    }
    group.finish();
}

fn bench_parse_and_simplify(c: &mut Criterion) {
    let licensing = registry();
    c.bench_function("parse_and_simplify", |b| {
        b.iter(|| {
            licensing
                .parse(
                    black_box("(mit or bsd-3-clause) and (zlib or mit) and mit or apache-2.0"),
                    ParseOptions::default(),
                )
                .map(|parsed| parsed.map(|e| e.simplify()))
        })
    });
}

criterion_group!(benches, bench_tokenize, bench_parse_and_simplify);
criterion_main!(benches);
