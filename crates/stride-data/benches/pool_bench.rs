use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use stride_data::{PoolConfig, PoolRegistry, Poolable, ResourcePool};

#[derive(Debug, Default)]
struct Particle {
    position: [f32; 2],
    velocity: [f32; 2],
    life: f32,
}

impl Poolable for Particle {
    fn reset(&mut self) {
        *self = Particle::default();
    }
}

fn bench_pools(c: &mut Criterion) {
    let mut group = c.benchmark_group("Resource Pools");

    group.bench_function("Acquire/Release (warm hit)", |b| {
        let mut pool: ResourcePool<Particle> =
            ResourcePool::poolable("particles", PoolConfig::sized(64, 256));
        b.iter(|| {
            let mut p = pool.acquire().unwrap();
            p.life = 1.0;
            black_box(&p.position);
            pool.release(p);
        });
    });

    group.bench_function("Burst of 200 (beyond prewarm)", |b| {
        let mut pool: ResourcePool<Particle> =
            ResourcePool::poolable("burst", PoolConfig::sized(8, 256));
        let mut held = Vec::with_capacity(200);
        b.iter(|| {
            for _ in 0..200 {
                held.push(pool.acquire().unwrap());
            }
            for p in held.drain(..) {
                black_box(p.velocity);
                pool.release(p);
            }
        });
    });

    group.bench_function("Baseline Box allocation", |b| {
        b.iter(|| {
            let p = Box::new(Particle::default());
            black_box(p.life);
        });
    });

    group.bench_function("Registry typed lookup", |b| {
        let mut registry = PoolRegistry::with_defaults(PoolConfig::sized(8, 64));
        registry.create("particles", Particle::default);
        registry.create("scratch", Vec::<u32>::new);
        b.iter(|| {
            let pool = registry.get_mut::<Particle>(black_box("particles")).unwrap();
            let p = pool.acquire().unwrap();
            pool.release(p);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_pools);
criterion_main!(benches);
