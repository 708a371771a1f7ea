use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ferrous_ioc::*;
use std::sync::Arc;

struct Config {
    retries: u32,
}

struct Repository {
    config: Arc<Config>,
}

impl Injectable for Repository {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(|args| Ok(Repository { config: args.dependency::<Config>(0)? }))
            .dependency::<Config>("config")]
    }
}

struct Service {
    repository: Arc<Repository>,
    timeout: u64,
}

impl Injectable for Service {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![
            Constructor::new(|args| {
                Ok(Service {
                    repository: args.dependency::<Repository>(0)?,
                    timeout: 30,
                })
            })
            .dependency::<Repository>("repository"),
            Constructor::new(|args| {
                Ok(Service {
                    repository: args.dependency::<Repository>(0)?,
                    timeout: args.value::<u64>(1)?,
                })
            })
            .dependency::<Repository>("repository")
            .value::<u64>("timeout"),
        ]
    }
}

fn graph(service_lifetime: Lifetime) -> Container {
    let mut builder = ContainerBuilder::new();
    builder.register_instance(Arc::new(Config { retries: 3 }));
    builder.register_type::<Repository>();
    builder.register_type::<Service>().lifetime(service_lifetime);
    builder.build()
}

// ===== Micro Benchmarks =====

fn bench_singleton_hit(c: &mut Criterion) {
    let container = graph(Lifetime::Singleton);
    let _ = container.resolve::<Service>().unwrap();

    c.bench_function("singleton_hit", |b| {
        b.iter(|| {
            let v = container.resolve::<Service>().unwrap();
            black_box(v.timeout);
        })
    });
}

fn bench_transient_constructor_graph(c: &mut Criterion) {
    let container = graph(Lifetime::Transient);

    c.bench_function("transient_two_level_graph", |b| {
        b.iter(|| {
            let v = container.resolve::<Service>().unwrap();
            black_box(v.repository.config.retries);
        })
    });
}

fn bench_runtime_arguments(c: &mut Criterion) {
    let container = graph(Lifetime::Transient);

    c.bench_function("transient_with_named_argument", |b| {
        b.iter(|| {
            let v = container
                .resolve_with::<Service>(named_args! { timeout: 5u64 })
                .unwrap();
            black_box(v.timeout);
        })
    });
}

fn bench_scoped(c: &mut Criterion) {
    let container = graph(Lifetime::Scoped);

    c.bench_function("scoped_hit", |b| {
        let _scope = AmbientScope::enter(Arc::new(ScopeItems::new()));
        b.iter(|| {
            let v = container.resolve::<Service>().unwrap();
            black_box(v.timeout);
        })
    });
}

trait Handler: Send + Sync {
    fn id(&self) -> usize;
}

struct Numbered(usize);
impl Handler for Numbered {
    fn id(&self) -> usize {
        self.0
    }
}

fn bench_sequence(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequence");
    for size in [1usize, 8, 64] {
        let mut builder = ContainerBuilder::new();
        for i in 0..size {
            builder
                .register_instance::<dyn Handler>(Arc::new(Numbered(i)))
                .named(format!("h{i}"));
        }
        let container = builder.build();
        let _ = container.resolve_sequence::<dyn Handler>().unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let all = container.resolve_sequence::<dyn Handler>().unwrap();
                black_box(all.iter().map(|h| h.id()).sum::<usize>());
            })
        });
    }
    group.finish();
}

fn bench_named_lookup(c: &mut Criterion) {
    let mut builder = ContainerBuilder::new();
    for i in 0..100 {
        builder
            .register_instance::<dyn Handler>(Arc::new(Numbered(i)))
            .named(format!("h{i}"));
    }
    let container = builder.build();

    c.bench_function("named_lookup_100", |b| {
        b.iter(|| {
            let v = container.resolve_named::<dyn Handler>("h57").unwrap();
            black_box(v.id());
        })
    });
}

fn bench_not_found(c: &mut Criterion) {
    let container = graph(Lifetime::Transient);

    c.bench_function("not_found", |b| {
        b.iter(|| {
            black_box(container.resolve::<dyn Handler>().is_err());
        })
    });
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("build_100_registrations", |b| {
        b.iter(|| {
            let mut builder = ContainerBuilder::new();
            for i in 0..100 {
                builder
                    .register_instance::<dyn Handler>(Arc::new(Numbered(i)))
                    .named(format!("h{i}"));
            }
            black_box(builder.build());
        })
    });
}

criterion_group!(
    benches,
    bench_singleton_hit,
    bench_transient_constructor_graph,
    bench_runtime_arguments,
    bench_scoped,
    bench_sequence,
    bench_named_lookup,
    bench_not_found,
    bench_build
);
criterion_main!(benches);
