use criterion::{black_box, criterion_group, criterion_main, Criterion};

use meritscope_numerical::functions::objective;
use meritscope_numerical::{sample_domain, MeritFunction};
use meritscope_types::{Domain, DualState};

fn bench_sampling(c: &mut Criterion) {
    let domain = Domain::default();
    let merit = MeritFunction::default();
    let dual = DualState::new([1.5, 0.25], [10.0, 10.0]);

    c.bench_function("objective_grid_0.025", |b| {
        b.iter(|| sample_domain(objective, black_box(&domain), black_box(0.025)))
    });
    c.bench_function("merit_grid_0.025", |b| {
        b.iter(|| merit.sample(black_box(&domain), black_box(0.025), black_box(&dual)))
    });
}

criterion_group!(benches, bench_sampling);
criterion_main!(benches);
