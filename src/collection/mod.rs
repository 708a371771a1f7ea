//! Registration intake: the builder that collects registrations and seals
//! them into a [`Container`].

use std::sync::Arc;

use crate::activation::Injectable;
use crate::config::ContainerOptions;
use crate::container::{Container, ResolutionContext};
use crate::descriptors::ServiceDescriptor;
use crate::error::BoxError;
use crate::lifecycle::{AmbientScope, StorageSupplier};
use crate::observer::{DiObserver, Observers};
use crate::registration::{EnumerableSource, RegistrationItem, RegistrationSource, RegistrationStore};

pub mod module_system;
pub use module_system::*;

/// Collects registrations, sources and options, then builds a [`Container`].
///
/// Registrations default to the transient lifecycle (instances: singleton).
/// Every registration method returns the new [`RegistrationItem`] so it can
/// be named, grouped, given a lifetime or persistent arguments.
///
/// Registering the same key twice (for example two unnamed registrations of
/// one contract) keeps the later one and makes a bare resolve of that
/// contract ambiguous.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{ContainerBuilder, DiError, Resolver};
/// use std::sync::Arc;
///
/// trait Store: Send + Sync { fn id(&self) -> &'static str; }
/// struct Primary;
/// struct Replica;
/// impl Store for Primary { fn id(&self) -> &'static str { "primary" } }
/// impl Store for Replica { fn id(&self) -> &'static str { "replica" } }
///
/// let mut builder = ContainerBuilder::new();
/// builder.register_instance::<dyn Store>(Arc::new(Primary)).named("primary");
/// builder.register_instance::<dyn Store>(Arc::new(Replica)).named("replica");
/// let container = builder.build();
///
/// assert!(matches!(
///     container.resolve::<dyn Store>(),
///     Err(DiError::RegistrationAmbiguous { .. })
/// ));
/// assert_eq!(container.resolve_named::<dyn Store>("replica").unwrap().id(), "replica");
/// assert_eq!(container.resolve_sequence::<dyn Store>().unwrap().len(), 2);
/// ```
pub struct ContainerBuilder {
    items: Vec<RegistrationItem>,
    sources: Vec<Arc<dyn RegistrationSource>>,
    observers: Observers,
    options: ContainerOptions,
    scope_supplier: StorageSupplier,
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerBuilder {
    /// Empty builder with default options and the ambient scope supplier.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            sources: Vec::new(),
            observers: Observers::default(),
            options: ContainerOptions::default(),
            scope_supplier: Arc::new(AmbientScope::current),
        }
    }

    /// Registers `I` as the implementation of contract `C`.
    ///
    /// `cast` upcasts `Arc<I>` to `Arc<C>`; for a trait object contract the
    /// identity closure `|i| i` is enough.
    pub fn register<C, I>(&mut self, cast: fn(Arc<I>) -> Arc<C>) -> &mut RegistrationItem
    where
        C: ?Sized + Send + Sync + 'static,
        I: Injectable,
    {
        self.add(RegistrationItem::implementation::<C, I>(cast))
    }

    /// Registers `I` as its own contract.
    pub fn register_type<I: Injectable>(&mut self) -> &mut RegistrationItem {
        self.add(RegistrationItem::of_type::<I>())
    }

    /// Registers a pre-built instance for contract `C`.
    pub fn register_instance<C: ?Sized + Send + Sync + 'static>(
        &mut self,
        instance: Arc<C>,
    ) -> &mut RegistrationItem {
        self.add(RegistrationItem::instance::<C>(instance))
    }

    /// Registers a factory closure for contract `C`.
    pub fn register_factory<C, F>(&mut self, factory: F) -> &mut RegistrationItem
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn(&ResolutionContext<'_>) -> Result<Arc<C>, BoxError> + Send + Sync + 'static,
    {
        self.add(RegistrationItem::factory::<C, F>(factory))
    }

    /// Adds a prepared registration.
    pub fn add(&mut self, item: RegistrationItem) -> &mut RegistrationItem {
        let index = self.items.len();
        self.items.push(item);
        &mut self.items[index]
    }

    /// Adds `item` only when nothing is registered for its contract yet.
    ///
    /// Returns whether it was added.
    pub fn try_add(&mut self, item: RegistrationItem) -> bool {
        let contract = item.key().contract();
        if self.items.iter().any(|existing| existing.key().contract() == contract) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Appends a registration source, consulted after the built-in ones.
    pub fn add_source(&mut self, source: Arc<dyn RegistrationSource>) -> &mut Self {
        self.sources.push(source);
        self
    }

    pub fn add_observer(&mut self, observer: Arc<dyn DiObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    /// Replaces where `Lifetime::Scoped` registrations find their storage.
    pub fn scope_storage(&mut self, supplier: StorageSupplier) -> &mut Self {
        self.scope_supplier = supplier;
        self
    }

    pub fn options(&mut self, options: ContainerOptions) -> &mut Self {
        self.options = options;
        self
    }

    /// Number of registrations collected so far.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Descriptors of the registrations collected so far.
    pub fn descriptors(&self) -> Vec<ServiceDescriptor> {
        self.items.iter().map(ServiceDescriptor::from_item).collect()
    }

    /// Seals every registration into a store and creates the container.
    pub fn build(self) -> Container {
        let mut store = RegistrationStore::new();
        store.add_source(Arc::new(EnumerableSource));
        for source in self.sources {
            store.add_source(source);
        }

        for item in self.items {
            let key = item.key().clone();
            if store.add_checked(item.seal(&self.scope_supplier)) {
                tracing::debug!(registration = %key, "duplicate registration, bare resolve will be ambiguous");
            }
        }

        tracing::debug!(
            registrations = store.len(),
            sources = store.sources().len(),
            "container built"
        );
        Container::new(store, self.options, self.observers, self.scope_supplier)
    }
}

impl std::fmt::Debug for ContainerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerBuilder")
            .field("registrations", &self.items.len())
            .field("sources", &self.sources.len())
            .field("options", &self.options)
            .finish()
    }
}
