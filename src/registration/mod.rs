//! Registration entries, the store that owns them, and the registration
//! sources that synthesize entries on first use.

mod source;
mod store;

pub use source::{Enumerable, EnumerableSource, RegistrationSource, SequenceShape};
pub use store::RegistrationStore;

use std::any::Any;
use std::sync::Arc;

use crate::activation::{Activator, DelegateActivator, Injectable, InstanceActivator, ReflectionActivator};
use crate::arguments::{ArgumentBinding, ArgumentValue};
use crate::container::ResolutionContext;
use crate::error::BoxError;
use crate::instance::Instance;
use crate::key::{ContractType, RegistrationKey};
use crate::lifecycle::{
    Lifecycle, ScopeStorage, ScopedLifecycle, SingletonLifecycle, StorageSupplier, TransientLifecycle,
};
use crate::lifetime::Lifetime;

/// One sealed registration, owned by the [`RegistrationStore`].
///
/// Holds the persistent argument binding only. Runtime arguments of a resolve
/// call travel in the [`ResolutionContext`] and never touch the entry.
pub struct RegistrationEntry {
    key: RegistrationKey,
    implementation: ContractType,
    activator: Arc<dyn Activator>,
    lifecycle: Arc<dyn Lifecycle>,
    arguments: ArgumentBinding,
    sequence: Option<SequenceShape>,
}

impl RegistrationEntry {
    pub fn new(
        key: RegistrationKey,
        implementation: ContractType,
        activator: Arc<dyn Activator>,
        lifecycle: Arc<dyn Lifecycle>,
    ) -> Self {
        Self {
            key,
            implementation,
            activator,
            lifecycle,
            arguments: ArgumentBinding::new(),
            sequence: None,
        }
    }

    pub fn with_arguments(mut self, arguments: ArgumentBinding) -> Self {
        self.arguments = arguments;
        self
    }

    /// Records the "sequence of contract" shape for the enumerable source.
    pub fn with_sequence_shape(mut self, shape: SequenceShape) -> Self {
        self.sequence = Some(shape);
        self
    }

    pub fn key(&self) -> &RegistrationKey {
        &self.key
    }

    pub fn contract(&self) -> ContractType {
        self.key.contract()
    }

    pub fn implementation(&self) -> ContractType {
        self.implementation
    }

    pub fn activator(&self) -> &dyn Activator {
        &*self.activator
    }

    pub fn lifecycle(&self) -> &dyn Lifecycle {
        &*self.lifecycle
    }

    /// Persistent arguments given at registration time.
    pub fn arguments(&self) -> &ArgumentBinding {
        &self.arguments
    }

    pub(crate) fn sequence_shape(&self) -> Option<&SequenceShape> {
        self.sequence.as_ref()
    }
}

impl std::fmt::Debug for RegistrationEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationEntry")
            .field("key", &self.key)
            .field("implementation", &self.implementation)
            .field("lifecycle", &self.lifecycle.name())
            .field("arguments", &self.arguments.count())
            .finish()
    }
}

enum LifecycleChoice {
    Standard(Lifetime),
    Custom(Arc<dyn Lifecycle>),
}

/// A registration still being configured, before it is sealed into the store.
///
/// The intake methods of [`ContainerBuilder`](crate::ContainerBuilder) return
/// `&mut RegistrationItem` so name, group, lifetime and persistent arguments
/// can be chained.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Lifetime, RegistrationItem};
/// use std::sync::Arc;
///
/// let mut item = RegistrationItem::instance::<String>(Arc::new("eu-west".to_string()));
/// item.named("region").in_group("settings").lifetime(Lifetime::Singleton);
/// assert_eq!(item.key().name(), Some("region"));
/// assert_eq!(item.key().group(), Some("settings"));
/// ```
pub struct RegistrationItem {
    key: RegistrationKey,
    implementation: ContractType,
    activator: Arc<dyn Activator>,
    lifecycle: LifecycleChoice,
    arguments: ArgumentBinding,
    sequence: SequenceShape,
}

impl RegistrationItem {
    fn with_activator<C: ?Sized + Send + Sync + 'static>(
        implementation: ContractType,
        activator: Arc<dyn Activator>,
        lifetime: Lifetime,
    ) -> Self {
        Self {
            key: RegistrationKey::new(ContractType::of::<C>()),
            implementation,
            activator,
            lifecycle: LifecycleChoice::Standard(lifetime),
            arguments: ArgumentBinding::new(),
            sequence: SequenceShape::of::<C>(),
        }
    }

    /// Contract `C` implemented by `I`, built through `I`'s constructors.
    ///
    /// `cast` upcasts the implementation to the contract, usually `|i| i`.
    pub fn implementation<C, I>(cast: fn(Arc<I>) -> Arc<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        I: Injectable,
    {
        Self::with_activator::<C>(
            ContractType::of::<I>(),
            Arc::new(ReflectionActivator::<C, I>::new(cast)),
            Lifetime::Transient,
        )
    }

    /// `I` registered as its own contract.
    pub fn of_type<I: Injectable>() -> Self {
        Self::implementation::<I, I>(|i| i)
    }

    /// A pre-built instance; every resolve returns it.
    pub fn instance<C: ?Sized + Send + Sync + 'static>(instance: Arc<C>) -> Self {
        Self::with_activator::<C>(
            ContractType::of::<C>(),
            Arc::new(InstanceActivator::new(Instance::new(instance))),
            Lifetime::Singleton,
        )
    }

    /// A factory closure receiving the resolution context.
    pub fn factory<C, F>(factory: F) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn(&ResolutionContext<'_>) -> Result<Arc<C>, BoxError> + Send + Sync + 'static,
    {
        Self::with_activator::<C>(
            ContractType::of::<C>(),
            Arc::new(DelegateActivator::new(factory)),
            Lifetime::Transient,
        )
    }

    pub fn named(&mut self, name: impl Into<String>) -> &mut Self {
        self.key.set_name(name.into());
        self
    }

    pub fn in_group(&mut self, group: impl Into<String>) -> &mut Self {
        self.key.set_group(group.into());
        self
    }

    pub fn lifetime(&mut self, lifetime: Lifetime) -> &mut Self {
        self.lifecycle = LifecycleChoice::Standard(lifetime);
        self
    }

    pub fn with_lifecycle(&mut self, lifecycle: Arc<dyn Lifecycle>) -> &mut Self {
        self.lifecycle = LifecycleChoice::Custom(lifecycle);
        self
    }

    /// Scoped lifecycle bound to one fixed storage instead of the ambient one.
    pub fn scoped_to(&mut self, storage: Arc<dyn ScopeStorage>) -> &mut Self {
        self.with_lifecycle(Arc::new(ScopedLifecycle::with_storage(storage)))
    }

    /// Appends a persistent positional argument.
    pub fn with_argument<T: Any + Send + Sync>(&mut self, value: T) -> &mut Self {
        self.arguments.push(ArgumentValue::new(value));
        self
    }

    /// Sets a persistent named argument.
    pub fn with_named_argument<T: Any + Send + Sync>(
        &mut self,
        name: impl Into<String>,
        value: T,
    ) -> &mut Self {
        self.arguments.insert_named(name, ArgumentValue::new(value));
        self
    }

    /// Adds every value of `arguments` to the persistent binding.
    pub fn with_arguments(&mut self, arguments: ArgumentBinding) -> &mut Self {
        self.arguments.merge(arguments);
        self
    }

    pub fn key(&self) -> &RegistrationKey {
        &self.key
    }

    pub fn implementation_type(&self) -> ContractType {
        self.implementation
    }

    /// Persistent arguments collected so far.
    pub fn arguments(&self) -> &ArgumentBinding {
        &self.arguments
    }

    pub(crate) fn lifecycle_name(&self) -> &'static str {
        match &self.lifecycle {
            LifecycleChoice::Standard(lifetime) => lifetime.as_str(),
            LifecycleChoice::Custom(lifecycle) => lifecycle.name(),
        }
    }

    /// Creates the lifecycle object and freezes the registration.
    pub(crate) fn seal(self, scope_supplier: &StorageSupplier) -> RegistrationEntry {
        let lifecycle: Arc<dyn Lifecycle> = match self.lifecycle {
            LifecycleChoice::Standard(Lifetime::Transient) => Arc::new(TransientLifecycle),
            LifecycleChoice::Standard(Lifetime::Singleton) => Arc::new(SingletonLifecycle::new()),
            LifecycleChoice::Standard(Lifetime::Scoped) => {
                Arc::new(ScopedLifecycle::new(scope_supplier.clone()))
            }
            LifecycleChoice::Custom(lifecycle) => lifecycle,
        };
        RegistrationEntry::new(self.key, self.implementation, self.activator, lifecycle)
            .with_arguments(self.arguments)
            .with_sequence_shape(self.sequence)
    }
}
