#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use teigraph::{build_literal, date_to_literal, Document, LiteralOptions};

fn bench_parse(c: &mut Criterion) {
    let input = include_str!("../tests/fixtures/sample.xml");

    c.bench_function("parse_sample", |b| {
        b.iter(|| Document::parse(black_box(input)).unwrap())
    });
}

fn bench_labels(c: &mut Criterion) {
    let doc = Document::parse(include_str!("../tests/fixtures/sample.xml")).unwrap();
    let options = LiteralOptions::new().with_default_lang("de");

    c.bench_function("select_and_label", |b| {
        b.iter(|| {
            doc.select_all(black_box("//tei:person/tei:persName"))
                .into_iter()
                .map(|name| build_literal(name, &options))
                .count()
        })
    });
}

fn bench_dates(c: &mut Criterion) {
    let dates = ["1873-05-26", "1902", "2000-01", "2000-01-01T00:00:00+01:00", "04.07.1905"];

    c.bench_function("date_to_literal", |b| {
        b.iter(|| {
            for date in dates {
                black_box(date_to_literal(Some(black_box(date))));
            }
        })
    });
}

criterion_group!(benches, bench_parse, bench_labels, bench_dates);
criterion_main!(benches);
