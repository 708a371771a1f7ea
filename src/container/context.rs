//! Resolution context handed to lifecycles, activators and factories.

use crate::arguments::ArgumentBinding;
use crate::container::Container;
use crate::error::DiResult;
use crate::instance::Instance;
use crate::key::ContractType;
use crate::registration::{RegistrationEntry, RegistrationStore};
use crate::traits::ResolverCore;

/// Everything one activation may look at.
///
/// Lives for a single activation: it borrows the entry being activated and
/// the runtime arguments of the resolve call, so nothing supplied at runtime
/// can outlive the call.
///
/// Implements [`Resolver`](crate::Resolver), so factories resolve their own
/// dependencies through it.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{ArgumentBinding, ContainerBuilder, Resolver};
/// use std::sync::Arc;
///
/// struct Greeting(String);
///
/// let mut builder = ContainerBuilder::new();
/// builder.register_instance::<String>(Arc::new("hello".to_string()));
/// builder.register_factory::<Greeting, _>(|ctx| {
///     let word = ctx.resolve::<String>()?;
///     let suffix = ctx
///         .runtime_arguments()
///         .named("suffix")
///         .and_then(|v| v.get::<&str>().copied())
///         .unwrap_or("");
///     Ok(Arc::new(Greeting(format!("{}{}", word, suffix))))
/// });
/// let container = builder.build();
///
/// let plain = container.resolve::<Greeting>().unwrap();
/// let loud = container
///     .resolve_with::<Greeting>(ArgumentBinding::new().with_named("suffix", "!"))
///     .unwrap();
/// assert_eq!(plain.0, "hello");
/// assert_eq!(loud.0, "hello!");
/// ```
pub struct ResolutionContext<'a> {
    container: &'a Container,
    entry: &'a RegistrationEntry,
    runtime_arguments: &'a ArgumentBinding,
}

impl<'a> ResolutionContext<'a> {
    pub(crate) fn new(
        container: &'a Container,
        entry: &'a RegistrationEntry,
        runtime_arguments: &'a ArgumentBinding,
    ) -> Self {
        Self {
            container,
            entry,
            runtime_arguments,
        }
    }

    pub fn container(&self) -> &'a Container {
        self.container
    }

    /// The entry under activation.
    pub fn entry(&self) -> &'a RegistrationEntry {
        self.entry
    }

    pub fn contract(&self) -> ContractType {
        self.entry.contract()
    }

    pub fn implementation(&self) -> ContractType {
        self.entry.implementation()
    }

    /// Persistent arguments bound at registration.
    pub fn arguments(&self) -> &'a ArgumentBinding {
        self.entry.arguments()
    }

    /// Arguments of the current resolve call only.
    pub fn runtime_arguments(&self) -> &'a ArgumentBinding {
        self.runtime_arguments
    }

    /// Whether `contract` has an entry or a source can synthesize one.
    pub fn is_registered_as_anything(&self, contract: &ContractType) -> bool {
        self.container.is_registered_as_anything(contract)
    }

    /// Read-only access to the store.
    pub fn with_store<R>(&self, f: impl FnOnce(&RegistrationStore) -> R) -> R {
        self.container.with_store(f)
    }
}

impl ResolverCore for ResolutionContext<'_> {
    fn resolve_instance(
        &self,
        contract: &ContractType,
        name: Option<&str>,
        arguments: ArgumentBinding,
    ) -> DiResult<Instance> {
        self.container.resolve_instance(contract, name, arguments)
    }

    fn resolve_all_instances(&self, contract: Option<&ContractType>) -> DiResult<Vec<Instance>> {
        self.container.resolve_all_instances(contract)
    }

    fn has_registration_for(&self, contract: &ContractType) -> bool {
        self.container.has_registration_for(contract)
    }
}
