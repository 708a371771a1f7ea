use ferrous_ioc::{
    Constructor, ContainerBuilder, DiError, DiObserver, Injectable, MetricsObserver, RegistrationKey, Resolver,
    TracingObserver,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct Engine;
impl Injectable for Engine {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(|_| Ok(Engine))]
    }
}

struct Car {
    _engine: Arc<Engine>,
}
impl Injectable for Car {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(|args| Ok(Car { _engine: args.dependency::<Engine>(0)? })).dependency::<Engine>("engine")]
    }
}

#[derive(Default)]
struct Journal {
    events: Mutex<Vec<String>>,
}

impl Journal {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl DiObserver for Journal {
    fn resolving(&self, key: &RegistrationKey) {
        self.events.lock().unwrap().push(format!("start {}", short(key)));
    }

    fn resolved(&self, key: &RegistrationKey, _: Duration) {
        self.events.lock().unwrap().push(format!("done {}", short(key)));
    }

    fn failed(&self, key: &RegistrationKey, _: &DiError) {
        self.events.lock().unwrap().push(format!("fail {}", short(key)));
    }
}

fn short(key: &RegistrationKey) -> &'static str {
    let name = key.contract().name();
    name.rsplit("::").next().unwrap_or(name)
}

#[test]
fn test_events_nest_with_resolution() {
    let journal = Arc::new(Journal::default());
    let mut builder = ContainerBuilder::new();
    builder.register_type::<Engine>();
    builder.register_type::<Car>();
    builder.add_observer(journal.clone());
    let container = builder.build();

    container.resolve::<Car>().unwrap();
    assert_eq!(journal.events(), ["start Car", "start Engine", "done Engine", "done Car"]);
}

#[test]
fn test_failure_is_reported() {
    let journal = Arc::new(Journal::default());
    let mut builder = ContainerBuilder::new();
    builder.register_factory::<Engine, _>(|_| Err("seized".into()));
    builder.register_type::<Car>();
    builder.add_observer(journal.clone());
    let container = builder.build();

    assert!(container.resolve::<Car>().is_err());
    assert_eq!(journal.events(), ["start Car", "start Engine", "fail Engine", "fail Car"]);
}

#[test]
fn test_lookup_failures_are_not_observed() {
    let journal = Arc::new(Journal::default());
    let mut builder = ContainerBuilder::new();
    builder.add_observer(journal.clone());
    let container = builder.build();

    assert!(container.resolve::<Car>().is_err());
    assert!(journal.events().is_empty());
}

#[test]
fn test_metrics_observer_counts() {
    let metrics = Arc::new(MetricsObserver::new());
    let mut builder = ContainerBuilder::new();
    builder.register_type::<Engine>();
    builder.register_type::<Car>();
    builder.register_factory::<String, _>(|_| Err("no text".into()));
    builder.add_observer(metrics.clone());
    builder.add_observer(Arc::new(TracingObserver::new()));
    let container = builder.build();

    container.resolve::<Car>().unwrap();
    container.resolve::<Engine>().unwrap();
    assert!(container.resolve::<String>().is_err());

    assert_eq!(metrics.resolution_count(), 3);
    assert_eq!(metrics.failure_count(), 1);
    assert!(metrics.average_resolution_time().is_some());

    metrics.reset();
    assert_eq!(metrics.resolution_count(), 0);
}
