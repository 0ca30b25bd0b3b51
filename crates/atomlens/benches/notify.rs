//! Micro-benchmarks for set/notify fan-out and cursor round-trips.

use atomlens::{lens, Atom, Observable, ObservableExt};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

#[derive(Clone)]
struct State {
    count: u64,
    name: String,
}

fn bench_set_fanout(c: &mut Criterion) {
    for subscribers in [0usize, 4, 16, 64] {
        c.bench_function(&format!("atom_set_{subscribers}_subscribers"), |b| {
            let atom = Atom::new(0u64);
            let _guards: Vec<_> = (0..subscribers)
                .map(|_| atom.subscribe(|prev, value| {
                    black_box((*prev, *value));
                }))
                .collect();
            let mut i = 0u64;
            b.iter(|| {
                i = i.wrapping_add(1);
                atom.set(black_box(i));
            });
        });
    }
}

fn bench_cursor_roundtrip(c: &mut Criterion) {
    c.bench_function("cursor_set_through_parent", |b| {
        let atom = Atom::new(State {
            count: 0,
            name: "bench".to_string(),
        });
        black_box(atom.get().name.len());
        let count = atom.cursor(lens!(State => count));
        let mut i = 0u64;
        b.iter(|| {
            i = i.wrapping_add(1);
            count.set(black_box(i));
        });
    });
}

criterion_group!(benches, bench_set_fanout, bench_cursor_roundtrip);
criterion_main!(benches);
