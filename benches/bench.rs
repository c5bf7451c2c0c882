use criterion::{black_box, criterion_group, criterion_main, Criterion};
use promisery::prelude::*;
use promisery::{Promise, Task};

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("all 10", |b| b.iter(|| all_test(black_box(10))));
    c.bench_function("all 100", |b| b.iter(|| all_test(black_box(100))));
    c.bench_function("race 100", |b| b.iter(|| race_test(black_box(100))));
    c.bench_function("then x100", |b| b.iter(|| then_test(black_box(100))));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

/// Run every task on the calling thread, so only coordination is measured.
fn inline(task: Task) {
    task()
}

fn threaded(task: Task) {
    std::thread::spawn(task);
}

fn deferred_inputs(len: usize) -> (Vec<Promise<usize>>, Vec<promisery::Resolver<usize>>) {
    (0..len).map(|_| Promise::deferred()).unzip()
}

fn all_test(len: usize) {
    let (promises, resolvers) = deferred_inputs(len);
    let combined = promises.all_in(&threaded);
    for (i, resolver) in resolvers.iter().enumerate() {
        resolver.resolve(i);
    }
    assert_eq!(combined.wait().unwrap().len(), len);
}

fn race_test(len: usize) {
    let promises: Vec<_> = (0..len)
        .map(|i| Promise::new_in(&inline, move || Ok::<_, std::io::Error>(i)))
        .collect();
    let winner = promises.race().wait().unwrap();
    assert!(winner < len);
}

fn then_test(len: usize) {
    let (p, resolver) = Promise::deferred();
    let derived: Vec<_> = (0..len)
        .map(|_| {
            p.then(|v: &usize| {
                black_box(*v);
            })
        })
        .collect();
    resolver.resolve(1);
    for d in derived {
        d.wait().unwrap();
    }
}
