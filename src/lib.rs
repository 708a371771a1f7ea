//! # ferrous-ioc
//!
//! Inversion-of-control resolution engine: a registration store, constructor
//! selection with argument binding, pluggable lifecycles, and registration
//! sources that synthesize registrations on demand.
//!
//! ## Features
//!
//! - **Keyed registrations**: contract type plus optional name; a group tag
//!   is carried as metadata
//! - **Constructor selection**: the richest constructor that registered
//!   dependencies and supplied arguments can satisfy
//! - **Arguments**: persistent (registration time) and runtime (per resolve),
//!   positional or named
//! - **Lifecycles**: transient, singleton and ambient-scoped, or your own
//! - **Sequences**: `Enumerable<C>` of every registration of `C`, synthesized
//!   on first use
//! - **Property injection** into write-once [`Inject`] slots
//! - **Circular dependency detection** with the offending path
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_ioc::{Constructor, ContainerBuilder, Injectable, Lifetime, Resolver};
//! use std::sync::Arc;
//!
//! struct Database {
//!     connection_string: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! impl Injectable for UserService {
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![Constructor::new(|args| Ok(UserService { db: args.dependency::<Database>(0)? }))
//!             .dependency::<Database>("db")]
//!     }
//! }
//!
//! let mut builder = ContainerBuilder::new();
//! builder.register_instance(Arc::new(Database {
//!     connection_string: "postgres://localhost".to_string(),
//! }));
//! builder.register_type::<UserService>().lifetime(Lifetime::Transient);
//!
//! let container = builder.build();
//! let user_service = container.resolve::<UserService>().unwrap();
//! assert_eq!(user_service.db.connection_string, "postgres://localhost");
//! ```
//!
//! ## Lifecycles
//!
//! - **Transient**: a new instance on every resolve (the default)
//! - **Singleton**: one instance per registration, built once even under
//!   concurrent first resolves
//! - **Scoped**: one instance per ambient scope storage
//!
//! ```rust
//! use ferrous_ioc::{AmbientScope, ContainerBuilder, Lifetime, Resolver, ScopeItems};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! struct RequestId(usize);
//!
//! let counter = Arc::new(AtomicUsize::new(0));
//! let mut builder = ContainerBuilder::new();
//! let next = counter.clone();
//! builder
//!     .register_factory::<RequestId, _>(move |_| Ok(Arc::new(RequestId(next.fetch_add(1, Ordering::SeqCst)))))
//!     .lifetime(Lifetime::Scoped);
//! let container = builder.build();
//!
//! let first = {
//!     let _scope = AmbientScope::enter(Arc::new(ScopeItems::new()));
//!     let a = container.resolve::<RequestId>().unwrap();
//!     let b = container.resolve::<RequestId>().unwrap();
//!     assert!(Arc::ptr_eq(&a, &b));
//!     a
//! };
//! let _scope = AmbientScope::enter(Arc::new(ScopeItems::new()));
//! let second = container.resolve::<RequestId>().unwrap();
//! assert_ne!(first.0, second.0);
//! ```
//!
//! ## Sequences
//!
//! ```rust
//! use ferrous_ioc::{ContainerBuilder, Resolver};
//! use std::sync::Arc;
//!
//! trait Plugin: Send + Sync { fn name(&self) -> &'static str; }
//! struct Audit;
//! struct Cache;
//! impl Plugin for Audit { fn name(&self) -> &'static str { "audit" } }
//! impl Plugin for Cache { fn name(&self) -> &'static str { "cache" } }
//!
//! let mut builder = ContainerBuilder::new();
//! builder.register_instance::<dyn Plugin>(Arc::new(Audit)).named("audit");
//! builder.register_instance::<dyn Plugin>(Arc::new(Cache)).named("cache");
//! let container = builder.build();
//!
//! let plugins = container.resolve_sequence::<dyn Plugin>().unwrap();
//! let names: Vec<_> = plugins.iter().map(|p| p.name()).collect();
//! assert_eq!(names, ["audit", "cache"]);
//! ```

pub mod activation;
pub mod arguments;
pub mod collection;
pub mod config;
pub mod container;
pub mod descriptors;
pub mod error;
pub mod instance;
pub mod key;
pub mod lifecycle;
pub mod lifetime;
pub mod observer;
pub mod registration;
pub mod traits;

// Internal modules
mod internal;

// Re-export core types
pub use activation::{
    Activator, Constructor, ConstructorArgs, ConstructorSelector, DelegateActivator, Inject, Injectable,
    InstanceActivator, Parameter, Property, ReflectionActivator,
};
pub use arguments::{ArgumentBinding, ArgumentValue};
pub use collection::{ContainerBuilder, ContainerBuilderExt, RegistrationModule};
pub use config::ContainerOptions;
pub use container::{Container, ResolutionContext};
pub use descriptors::ServiceDescriptor;
pub use error::{BoxError, DiError, DiResult};
pub use instance::Instance;
pub use key::{ContractType, RegistrationKey};
pub use lifecycle::{
    AmbientScope, AmbientScopeGuard, Lifecycle, ScopeItems, ScopeStorage, ScopedLifecycle, SingletonLifecycle,
    StorageSupplier, TransientLifecycle,
};
pub use lifetime::Lifetime;
pub use observer::{DiObserver, MetricsObserver, TracingObserver};
pub use registration::{
    Enumerable, EnumerableSource, RegistrationEntry, RegistrationItem, RegistrationSource, RegistrationStore,
    SequenceShape,
};
pub use traits::{Resolver, ResolverCore};
