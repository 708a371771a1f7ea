use ferrous_ioc::{
    Constructor, ContainerBuilder, ContainerOptions, DiError, Inject, Injectable, Property, Resolver,
};
use std::sync::Arc;

trait Logger: Send + Sync {
    fn prefix(&self) -> &str;
}

struct ConsoleLogger;
impl Logger for ConsoleLogger {
    fn prefix(&self) -> &str {
        "console"
    }
}

struct FileLogger;
impl Logger for FileLogger {
    fn prefix(&self) -> &str {
        "file"
    }
}

struct Clock;

#[derive(Default)]
struct Job {
    logger: Inject<dyn Logger>,
    clock: Inject<Clock>,
}

impl Injectable for Job {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(|_| Ok(Job::default()))]
    }

    fn properties() -> Vec<Property<Self>> {
        vec![
            Property::new::<dyn Logger>("logger", |job: &Job| &job.logger),
            Property::new::<Clock>("clock", |job: &Job| &job.clock),
        ]
    }
}

#[test]
fn test_injects_registered_properties() {
    let mut builder = ContainerBuilder::new();
    builder.register_instance::<dyn Logger>(Arc::new(ConsoleLogger));
    builder.register_instance(Arc::new(Clock));
    let container = builder.build();

    let job = Job::default();
    container.inject_properties(&job).unwrap();
    assert_eq!(job.logger.get().unwrap().prefix(), "console");
    assert!(job.clock.is_set());
}

#[test]
fn test_skips_unregistered_properties() {
    let mut builder = ContainerBuilder::new();
    builder.register_instance::<dyn Logger>(Arc::new(ConsoleLogger));
    let container = builder.build();

    let job = Job::default();
    container.inject_properties(&job).unwrap();
    assert!(job.logger.is_set());
    assert!(!job.clock.is_set());
}

#[test]
fn test_does_not_overwrite_set_property() {
    let mut builder = ContainerBuilder::new();
    builder.register_instance::<dyn Logger>(Arc::new(ConsoleLogger));
    let container = builder.build();

    let job = Job {
        logger: Inject::with(Arc::new(FileLogger) as Arc<dyn Logger>),
        clock: Inject::new(),
    };
    container.inject_properties(&job).unwrap();
    assert_eq!(job.logger.get().unwrap().prefix(), "file");
}

#[test]
fn test_injection_is_idempotent() {
    let mut builder = ContainerBuilder::new();
    builder.register_factory::<dyn Logger, _>(|_| Ok(Arc::new(ConsoleLogger) as Arc<dyn Logger>));
    let container = builder.build();

    let job = Job::default();
    container.inject_properties(&job).unwrap();
    let first = job.logger.get().unwrap().clone();
    container.inject_properties(&job).unwrap();
    assert!(Arc::ptr_eq(&first, job.logger.get().unwrap()));
}

#[test]
fn test_ambiguous_property_propagates() {
    let mut builder = ContainerBuilder::new();
    builder.register_instance::<dyn Logger>(Arc::new(ConsoleLogger));
    builder.register_instance::<dyn Logger>(Arc::new(FileLogger));
    let container = builder.build();

    let job = Job::default();
    assert!(matches!(
        container.inject_properties(&job),
        Err(DiError::RegistrationAmbiguous { .. })
    ));
    assert!(!job.logger.is_set());
}

#[test]
fn test_failing_property_activation_propagates() {
    let mut builder = ContainerBuilder::new();
    builder.register_factory::<dyn Logger, _>(|_| Err("no log sink".into()));
    let container = builder.build();

    let err = container.inject_properties(&Job::default()).err().unwrap();
    assert!(matches!(err, DiError::ActivationFailed { .. }));
}

#[test]
fn test_resolve_does_not_inject_by_default() {
    let mut builder = ContainerBuilder::new();
    builder.register_instance::<dyn Logger>(Arc::new(ConsoleLogger));
    builder.register_type::<Job>();
    let container = builder.build();

    let job = container.resolve::<Job>().unwrap();
    assert!(!job.logger.is_set());
}

#[test]
fn test_inject_on_activation_option() {
    let mut builder = ContainerBuilder::new();
    builder.options(ContainerOptions {
        inject_properties_on_activation: true,
        ..ContainerOptions::default()
    });
    builder.register_instance::<dyn Logger>(Arc::new(ConsoleLogger));
    builder.register_type::<Job>();
    let container = builder.build();

    let job = container.resolve::<Job>().unwrap();
    assert_eq!(job.logger.get().unwrap().prefix(), "console");
    assert!(!job.clock.is_set());
}

#[test]
fn test_property_declarations() {
    let names: Vec<_> = Job::properties().iter().map(|p| p.name()).collect();
    assert_eq!(names, ["logger", "clock"]);
    assert!(Job::properties()[1].contract().name().ends_with("Clock"));
}
