//! Benchmarks for entity mapping.
//!
//! Measures cold resolution (first lookup walks the target tables and fills
//! the caches) against warm resolution (every subsequent lookup is a cache
//! hit), over a pair of models large enough to make the scans visible.

extern crate dotcompat;

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use dotcompat::prelude::*;
use std::hint::black_box;

const TYPES: u32 = 500;
const FIELDS_PER_TYPE: u32 = 4;

fn populated_model() -> MetadataModel {
    let mut builder = MetadataModelBuilder::new();
    for t in 0..TYPES {
        let type_def = builder.type_def("Bench.Namespace", &format!("Type{t}"));
        for f in 0..FIELDS_PER_TYPE {
            builder.field(
                type_def,
                &format!("field{f}"),
                SignatureField::new(TypeSignature::I4),
            );
        }
    }
    builder.build()
}

/// Benchmark the first resolution of every field, caches starting empty.
fn bench_map_fields_cold(c: &mut Criterion) {
    c.bench_function("map_fields_cold", |b| {
        b.iter_batched(
            || MetadataMapping::new(Arc::new(populated_model()), Arc::new(populated_model())),
            |mapping| {
                for rid in 1..=(TYPES * FIELDS_PER_TYPE) {
                    let token = Token::from_parts(HandleKind::Field, rid);
                    black_box(mapping.map_field_definition(token).unwrap());
                }
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark repeated resolution of one field after the caches are filled.
fn bench_map_field_warm(c: &mut Criterion) {
    let mapping =
        MetadataMapping::new(Arc::new(populated_model()), Arc::new(populated_model()));
    let token = Token::from_parts(HandleKind::Field, 1);
    mapping.map_field_definition(token).unwrap();

    c.bench_function("map_field_warm", |b| {
        b.iter(|| black_box(mapping.map_field_definition(black_box(token)).unwrap()));
    });
}

/// Benchmark the untyped dispatcher against the typed accessor.
fn bench_dispatch_warm(c: &mut Criterion) {
    let mapping =
        MetadataMapping::new(Arc::new(populated_model()), Arc::new(populated_model()));
    let token = Token::from_parts(HandleKind::TypeDef, 1);
    mapping.map_type_definition(token).unwrap();

    c.bench_function("dispatch_warm", |b| {
        b.iter(|| black_box(mapping.map_handle(black_box(token)).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_map_fields_cold,
    bench_map_field_warm,
    bench_dispatch_warm
);
criterion_main!(benches);
