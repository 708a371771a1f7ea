//! The container: lookup, synthesis and activation of registrations.

mod context;

pub use context::ResolutionContext;

use std::sync::{Arc, Weak};
use std::time::Instant;

use parking_lot::{ReentrantMutex, RwLock};

use crate::activation::{Activator, Injectable};
use crate::arguments::ArgumentBinding;
use crate::config::ContainerOptions;
use crate::descriptors::ServiceDescriptor;
use crate::error::{DiError, DiResult};
use crate::instance::Instance;
use crate::internal::ResolutionGuard;
use crate::key::{ContractType, RegistrationKey};
use crate::lifecycle::{StorageSupplier, TransientLifecycle};
use crate::observer::Observers;
use crate::registration::{RegistrationEntry, RegistrationItem, RegistrationStore, SequenceShape};
use crate::traits::ResolverCore;

/// Resolves instances from a [`RegistrationStore`].
///
/// Built by [`ContainerBuilder`](crate::ContainerBuilder). Resolution goes
/// through the store first; a bare lookup that misses asks the registration
/// sources, stores whatever the first supporting source synthesizes, and
/// activates it. Activation runs the entry's lifecycle around its activator.
///
/// The container registers itself under its own contract, so constructors
/// and factories can depend on `Container`.
///
/// # Thread Safety
///
/// `Container` is a cheap handle (`Arc` inside) and may be shared across
/// threads. Store locks are never held while user code runs.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{Constructor, ContainerBuilder, Injectable, Lifetime, Resolver};
/// use std::sync::Arc;
///
/// trait Mailer: Send + Sync { fn send(&self, to: &str) -> String; }
///
/// struct SmtpMailer { host: String }
/// impl Mailer for SmtpMailer {
///     fn send(&self, to: &str) -> String { format!("{} via {}", to, self.host) }
/// }
/// impl Injectable for SmtpMailer {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::new(|args| Ok(SmtpMailer { host: args.value::<String>(0)? }))
///             .value::<String>("host")]
///     }
/// }
///
/// struct Signup { mailer: Arc<dyn Mailer> }
/// impl Injectable for Signup {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::new(|args| Ok(Signup { mailer: args.dependency::<dyn Mailer>(0)? }))
///             .dependency::<dyn Mailer>("mailer")]
///     }
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder
///     .register::<dyn Mailer, SmtpMailer>(|m| m)
///     .lifetime(Lifetime::Singleton)
///     .with_named_argument("host", "smtp.local".to_string());
/// builder.register_type::<Signup>();
/// let container = builder.build();
///
/// let signup = container.resolve::<Signup>().unwrap();
/// assert_eq!(signup.mailer.send("ada"), "ada via smtp.local");
/// ```
pub struct Container {
    inner: Arc<ContainerInner>,
}

pub(crate) struct ContainerInner {
    store: RwLock<RegistrationStore>,
    // Serializes synthesis so concurrent misses on one contract store one entry
    synthesis: ReentrantMutex<()>,
    options: ContainerOptions,
    observers: Observers,
    scope_supplier: StorageSupplier,
}

impl Container {
    pub(crate) fn new(
        store: RegistrationStore,
        options: ContainerOptions,
        observers: Observers,
        scope_supplier: StorageSupplier,
    ) -> Self {
        let container = Self {
            inner: Arc::new(ContainerInner {
                store: RwLock::new(store),
                synthesis: ReentrantMutex::new(()),
                options,
                observers,
                scope_supplier,
            }),
        };
        container.register_self();
        container
    }

    // Replaces any registration of `Container` with this instance.
    fn register_self(&self) {
        let contract = ContractType::of::<Container>();
        let entry = RegistrationEntry::new(
            RegistrationKey::new(contract),
            contract,
            Arc::new(SelfActivator {
                container: Arc::downgrade(&self.inner),
            }),
            Arc::new(TransientLifecycle),
        );

        let mut store = self.inner.store.write();
        if store.remove(&contract) > 0 {
            tracing::debug!("replaced external Container registration with self-registration");
        }
        store.add(entry);
    }

    pub fn options(&self) -> &ContainerOptions {
        &self.inner.options
    }

    /// Adds a registration after build.
    ///
    /// Colliding with an existing key marks the contract duplicate, exactly as
    /// at build time.
    pub fn add_registration(&self, item: RegistrationItem) {
        let entry = item.seal(&self.inner.scope_supplier);
        let key = entry.key().clone();
        if self.inner.store.write().add_checked(entry) {
            tracing::debug!(registration = %key, "duplicate registration, bare resolve is now ambiguous");
        } else {
            tracing::trace!(registration = %key, "registration added");
        }
    }

    /// Fills every unset property of `instance` whose contract is registered.
    ///
    /// Properties that already hold a value and properties of unregistered
    /// contracts are left alone. Only explicit entries count; registration
    /// sources are not consulted.
    pub fn inject_properties<T: Injectable>(&self, instance: &T) -> DiResult<()> {
        for property in T::properties() {
            if property.is_set(instance) {
                continue;
            }
            let contract = property.contract();
            if !self.inner.store.read().has(&contract) {
                continue;
            }
            let value = self.resolve_instance(&contract, None, ArgumentBinding::new())?;
            property.assign(instance, &value)?;
            tracing::trace!(property = property.name(), contract = contract.name(), "property injected");
        }
        Ok(())
    }

    /// Snapshot of every registration, in store order.
    pub fn descriptors(&self) -> Vec<ServiceDescriptor> {
        self.inner
            .store
            .read()
            .all()
            .map(|entry| ServiceDescriptor::from_entry(entry))
            .collect()
    }

    /// Runs `f` with read access to the store.
    ///
    /// `f` must not resolve through this container while it holds the store.
    pub fn with_store<R>(&self, f: impl FnOnce(&RegistrationStore) -> R) -> R {
        f(&self.inner.store.read())
    }

    pub(crate) fn is_registered_as_anything(&self, contract: &ContractType) -> bool {
        self.inner.store.read().is_registered_as_anything(contract)
    }

    pub(crate) fn sequence_shape(&self, sequence: &ContractType) -> Option<SequenceShape> {
        self.inner.store.read().sequence_shape(sequence)
    }

    fn lookup(&self, contract: &ContractType, name: Option<&str>) -> DiResult<Arc<RegistrationEntry>> {
        {
            let store = self.inner.store.read();
            if let Some(name) = name {
                return store
                    .get_named(contract, name)
                    .ok_or_else(|| DiError::RegistrationNotFound {
                        contract: contract.name(),
                        name: Some(name.to_string()),
                    });
            }
            if let Some(entry) = store.try_get(contract) {
                return Ok(entry);
            }
            if store.has_duplicate(contract) {
                return Err(DiError::RegistrationAmbiguous {
                    contract: contract.name(),
                });
            }
        }
        self.synthesize(contract)
    }

    fn synthesize(&self, contract: &ContractType) -> DiResult<Arc<RegistrationEntry>> {
        let _gate = self.inner.synthesis.lock();

        let source = {
            let store = self.inner.store.read();
            // Another thread may have synthesized it while we waited
            if let Some(entry) = store.try_get(contract) {
                return Ok(entry);
            }
            store
                .sources()
                .iter()
                .find(|source| source.supports(contract, &store))
                .cloned()
        };
        let source = source.ok_or_else(|| DiError::RegistrationNotFound {
            contract: contract.name(),
            name: None,
        })?;

        let entry = source
            .synthesize(contract, self)
            .map_err(|source| DiError::activation(contract.name(), source))?;
        tracing::debug!(contract = contract.name(), "registration synthesized");
        Ok(self.inner.store.write().add(entry))
    }

    fn activate(&self, entry: &Arc<RegistrationEntry>, runtime: &ArgumentBinding) -> DiResult<Instance> {
        let key = entry.key();
        let _guard = ResolutionGuard::enter(
            Arc::as_ptr(entry) as usize,
            key.contract().name(),
            self.inner.options.max_depth,
        )?;
        let context = ResolutionContext::new(self, entry, runtime);
        let activate = || entry.activator().activate(&context);

        let observers = &self.inner.observers;
        if !observers.has_observers() {
            return entry.lifecycle().get_instance(&context, &activate);
        }

        let start = Instant::now();
        observers.resolving(key);
        let result = entry.lifecycle().get_instance(&context, &activate);
        match &result {
            Ok(_) => observers.resolved(key, start.elapsed()),
            Err(error) => observers.failed(key, error),
        }
        result
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let store = self.inner.store.read();
        let mut s = String::new();
        s.push_str("=== Container Debug ===\n");
        s.push_str("Registrations:\n");
        for entry in store.all() {
            s.push_str(&format!(
                "  {} -> {} ({}, {} args)\n",
                entry.key(),
                entry.implementation(),
                entry.lifecycle().name(),
                entry.arguments().count()
            ));
        }
        s.push_str(&format!("Sources: {}\n", store.sources().len()));
        s
    }
}

impl Clone for Container {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("store", &*self.inner.store.read())
            .field("options", &self.inner.options)
            .finish()
    }
}

impl ResolverCore for Container {
    fn resolve_instance(
        &self,
        contract: &ContractType,
        name: Option<&str>,
        arguments: ArgumentBinding,
    ) -> DiResult<Instance> {
        tracing::trace!(contract = contract.name(), name, "resolve");
        let entry = self.lookup(contract, name)?;
        self.activate(&entry, &arguments)
    }

    fn resolve_all_instances(&self, contract: Option<&ContractType>) -> DiResult<Vec<Instance>> {
        let entries: Vec<Arc<RegistrationEntry>> = {
            let store = self.inner.store.read();
            match contract {
                Some(contract) => store.entries_for(*contract).cloned().collect(),
                None => store.all().cloned().collect(),
            }
        };

        let runtime = ArgumentBinding::new();
        entries
            .iter()
            .map(|entry| self.activate(entry, &runtime))
            .collect()
    }

    fn has_registration_for(&self, contract: &ContractType) -> bool {
        self.is_registered_as_anything(contract)
    }
}

/// Hands out the owning container.
struct SelfActivator {
    container: Weak<ContainerInner>,
}

impl Activator for SelfActivator {
    fn activate(&self, _: &ResolutionContext<'_>) -> DiResult<Instance> {
        let inner = self.container.upgrade().ok_or(DiError::ContainerDropped)?;
        Ok(Instance::new(Arc::new(Container { inner })))
    }
}
