//! # Pool & Arena Benchmark
//!
//! Measures the per-frame hot paths:
//! 1. Allocate / invalidate churn on a full-size pool
//! 2. `query_by_type` snapshots into a transient arena
//! 3. Transient arena fill + reset

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use swarm_core::{Arena, EntityKind, ObjectPool};

const POOL_CAPACITY: usize = 2046;

fn bench_allocate_invalidate(c: &mut Criterion) {
    let persistent = Arena::new("persistent");
    let mut pool = ObjectPool::new_in(&persistent, POOL_CAPACITY).unwrap();

    // Half-full pool: allocation has to scan past live slots.
    for _ in 0..POOL_CAPACITY / 2 {
        pool.allocate().unwrap().kind = EntityKind::Enemy;
    }

    c.bench_function("pool_allocate_invalidate_half_full", |b| {
        b.iter(|| {
            let entity = pool.allocate().unwrap();
            entity.kind = EntityKind::Projectile;
            let handle = entity.handle();
            pool.invalidate(black_box(handle)).unwrap();
        });
    });
}

fn bench_query_by_type(c: &mut Criterion) {
    let persistent = Arena::new("persistent");
    let mut transient = Arena::new("transient");
    let mut pool = ObjectPool::new_in(&persistent, POOL_CAPACITY).unwrap();

    for i in 0..POOL_CAPACITY {
        let kind = if i % 3 == 0 {
            EntityKind::Projectile
        } else {
            EntityKind::Enemy
        };
        pool.allocate().unwrap().kind = kind;
    }

    c.bench_function("pool_query_enemies_full", |b| {
        b.iter(|| {
            let n = transient.scope(|frame| {
                pool.query_by_type(EntityKind::Enemy, frame).unwrap().len()
            });
            black_box(n)
        });
    });
}

fn bench_arena_reset(c: &mut Criterion) {
    let mut arena = Arena::new("transient");

    c.bench_function("arena_fill_1k_then_reset", |b| {
        b.iter(|| {
            for i in 0..1000u64 {
                black_box(arena.alloc(i).unwrap());
            }
            arena.reset();
        });
    });
}

criterion_group!(
    benches,
    bench_allocate_invalidate,
    bench_query_by_type,
    bench_arena_reset
);
criterion_main!(benches);
