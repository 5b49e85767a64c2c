//! Benchmarks for actor creation, port creation, and send throughput.

use criterion::{criterion_group, criterion_main, Criterion};
use portflow::actor::Actor;
use portflow::port::PortKind;

fn bench_actor_spawn(c: &mut Criterion) {
    c.bench_function("actor_spawn", |b| {
        b.iter(|| {
            let actor = Actor::new(None, None);
            actor.start().unwrap();
        })
    });
}

fn bench_create_port(c: &mut Criterion) {
    c.bench_function("create_port", |b| {
        b.iter(|| {
            let actor = Actor::new(None, None);
            actor
                .create_port::<u64>("in", PortKind::Input, 64)
                .unwrap();
        })
    });
}

fn bench_send_throughput(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let actor = Actor::new(None, None);
    actor
        .create_port::<u64>("in", PortKind::Input, 1024)
        .unwrap();
    actor.start().unwrap();

    c.bench_function("send_u64", |b| {
        b.iter(|| {
            rt.block_on(async {
                actor.send("in", 1u64).await.unwrap();
            })
        })
    });
}

criterion_group!(
    benches,
    bench_actor_spawn,
    bench_create_port,
    bench_send_throughput
);
criterion_main!(benches);
