/// Concurrent access tests
///
/// Singletons must be constructed once, synthesis must store one entry, and
/// scoped storage must stay per thread.

use ferrous_ioc::{
    AmbientScope, ContainerBuilder, ContractType, Enumerable, Lifetime, RegistrationItem, Resolver, ScopeItems,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

const THREADS: usize = 16;

struct Expensive {
    created_by: thread::ThreadId,
}

#[test]
fn test_singleton_constructed_once_under_contention() {
    let created = Arc::new(AtomicUsize::new(0));
    let counter = created.clone();
    let mut builder = ContainerBuilder::new();
    builder
        .register_factory::<Expensive, _>(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            // Widen the window for a racing second construction
            thread::sleep(Duration::from_millis(20));
            Ok(Arc::new(Expensive {
                created_by: thread::current().id(),
            }))
        })
        .lifetime(Lifetime::Singleton);
    let container = builder.build();
    let barrier = Barrier::new(THREADS);

    let instances: Vec<Arc<Expensive>> = crossbeam_utils::thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|_| {
                    barrier.wait();
                    container.resolve::<Expensive>().unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
    .unwrap();

    assert_eq!(created.load(Ordering::SeqCst), 1);
    let first = &instances[0];
    assert!(instances.iter().all(|i| Arc::ptr_eq(first, i)));
    assert!(instances.iter().all(|i| i.created_by == first.created_by));
}

trait Plugin: Send + Sync {
    fn id(&self) -> usize;
}

struct Numbered(usize);
impl Plugin for Numbered {
    fn id(&self) -> usize {
        self.0
    }
}

#[test]
fn test_sequence_synthesized_once_under_contention() {
    let mut builder = ContainerBuilder::new();
    for i in 0..3 {
        builder
            .register_instance::<dyn Plugin>(Arc::new(Numbered(i)))
            .named(format!("p{i}"));
    }
    let container = builder.build();
    let barrier = Barrier::new(THREADS);

    crossbeam_utils::thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|_| {
                barrier.wait();
                let plugins = container.resolve_sequence::<dyn Plugin>().unwrap();
                assert_eq!(plugins.iter().map(|p| p.id()).collect::<Vec<_>>(), [0, 1, 2]);
            });
        }
    })
    .unwrap();

    let sequence = ContractType::of::<Enumerable<dyn Plugin>>();
    let stored = container
        .descriptors()
        .iter()
        .filter(|d| d.key.contract() == sequence)
        .count();
    assert_eq!(stored, 1);
}

#[test]
fn test_transient_resolves_in_parallel() {
    let created = Arc::new(AtomicUsize::new(0));
    let counter = created.clone();
    let mut builder = ContainerBuilder::new();
    builder.register_factory::<dyn Plugin, _>(move |_| {
        Ok(Arc::new(Numbered(counter.fetch_add(1, Ordering::SeqCst))) as Arc<dyn Plugin>)
    });
    let container = builder.build();

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let container = container.clone();
            thread::spawn(move || {
                (0..50)
                    .map(|_| container.resolve::<dyn Plugin>().unwrap().id())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids: Vec<usize> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), THREADS * 50);
}

struct RequestState(thread::ThreadId);

#[test]
fn test_ambient_scope_is_per_thread() {
    let mut builder = ContainerBuilder::new();
    builder
        .register_factory::<RequestState, _>(|_| Ok(Arc::new(RequestState(thread::current().id()))))
        .lifetime(Lifetime::Scoped);
    let container = builder.build();

    crossbeam_utils::thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|_| {
                let _request = AmbientScope::enter(Arc::new(ScopeItems::new()));
                let a = container.resolve::<RequestState>().unwrap();
                let b = container.resolve::<RequestState>().unwrap();
                assert!(Arc::ptr_eq(&a, &b));
                assert_eq!(a.0, thread::current().id());
            });
        }
    })
    .unwrap();

    // The test thread never entered a scope
    assert!(container.resolve::<RequestState>().is_err());
}

#[test]
fn test_registration_while_resolving() {
    let container = ContainerBuilder::new().build();
    container.add_registration({
        let mut item = RegistrationItem::instance::<dyn Plugin>(Arc::new(Numbered(0)));
        item.named("p0");
        item
    });

    crossbeam_utils::thread::scope(|s| {
        s.spawn(|_| {
            for i in 1..50 {
                let mut item = RegistrationItem::instance::<dyn Plugin>(Arc::new(Numbered(i)));
                item.named(format!("p{i}"));
                container.add_registration(item);
            }
        });
        s.spawn(|_| {
            for _ in 0..50 {
                let seen = container.resolve_all::<dyn Plugin>().unwrap();
                assert!(!seen.is_empty());
                // Registration order is preserved whatever the interleaving
                assert!(seen.windows(2).all(|w| w[0].id() < w[1].id()));
            }
        });
    })
    .unwrap();

    assert_eq!(container.resolve_all::<dyn Plugin>().unwrap().len(), 50);
}
