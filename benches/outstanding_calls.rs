//! Benchmarks the outstanding-call registry's hot path: insert, lookup, and
//! sweep under a linear scan over the fixed-capacity table. The
//! table is small by design (`OUTSTANDING_CALLS = 10`), so this exists to
//! confirm the linear scan stays negligible rather than to chase constants.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mms_client_core::outstanding_calls::{CallKind, OutstandingCallTable, OUTSTANDING_CALLS};

fn insert_remove_roundtrip(c: &mut Criterion) {
    c.bench_function("insert_remove_roundtrip", |b| {
        let table = OutstandingCallTable::new();
        let mut invoke_id = 0u32;
        b.iter(|| {
            invoke_id = invoke_id.wrapping_add(1).max(1);
            table.insert(invoke_id, CallKind::ReadVariable, None, 0, 5_000);
            black_box(table.kind_of(invoke_id));
            table.remove(invoke_id);
        });
    });
}

fn sweep_full_table(c: &mut Criterion) {
    c.bench_function("sweep_full_table", |b| {
        let table = OutstandingCallTable::new();
        b.iter(|| {
            for id in 1..=OUTSTANDING_CALLS as u32 {
                table.insert(id, CallKind::ReadVariable, None, 0, 0);
            }
            while table.sweep(1).is_some() {}
            black_box(table.is_empty());
        });
    });
}

criterion_group!(benches, insert_remove_roundtrip, sweep_full_table);
criterion_main!(benches);
