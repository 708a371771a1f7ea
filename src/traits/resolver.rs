//! Resolver traits for contract resolution.

use std::sync::Arc;

use crate::arguments::ArgumentBinding;
use crate::error::{DiError, DiResult};
use crate::instance::Instance;
use crate::key::ContractType;
use crate::registration::Enumerable;

/// Core resolver trait for object-safe resolution.
///
/// Works on type-erased [`ContractType`] and [`Instance`] values. Most users
/// should use the [`Resolver`] trait instead, which layers typed generic
/// methods on top of this one.
pub trait ResolverCore: Send + Sync {
    /// Resolves one instance of `contract`.
    ///
    /// With `name == None` the contract must have exactly one entry (or be
    /// synthesizable by a registration source). `arguments` are visible to
    /// this activation only.
    ///
    /// # Returns
    ///
    /// * `Ok(Instance)` - The resolved instance
    /// * `Err(DiError)` - Not found, ambiguous, or activation failure
    fn resolve_instance(
        &self,
        contract: &ContractType,
        name: Option<&str>,
        arguments: ArgumentBinding,
    ) -> DiResult<Instance>;

    /// Resolves every entry in store order, optionally only those of `contract`.
    fn resolve_all_instances(&self, contract: Option<&ContractType>) -> DiResult<Vec<Instance>>;

    /// Whether `contract` is registered or can be synthesized by a source.
    fn has_registration_for(&self, contract: &ContractType) -> bool;
}

fn typed<C: ?Sized + 'static>(instance: Instance) -> DiResult<Arc<C>> {
    instance
        .downcast::<C>()
        .ok_or(DiError::TypeMismatch(std::any::type_name::<C>()))
}

/// High-level resolver interface with generic methods for typed resolution.
///
/// Implemented for everything that implements [`ResolverCore`]: the
/// [`Container`](crate::Container) and the
/// [`ResolutionContext`](crate::ResolutionContext) handed to factories.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{ContainerBuilder, Resolver};
/// use std::sync::Arc;
///
/// trait Clock: Send + Sync { fn now(&self) -> u64; }
/// struct Fixed;
/// impl Clock for Fixed { fn now(&self) -> u64 { 7 } }
///
/// let mut builder = ContainerBuilder::new();
/// builder.register_instance::<dyn Clock>(Arc::new(Fixed));
/// let container = builder.build();
///
/// assert!(container.has_registration::<dyn Clock>());
/// assert_eq!(container.resolve::<dyn Clock>().unwrap().now(), 7);
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves the single entry registered for `C`.
    fn resolve<C: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<C>> {
        typed(self.resolve_instance(&ContractType::of::<C>(), None, ArgumentBinding::new())?)
    }

    /// Resolves the entry registered for `C` under `name`.
    fn resolve_named<C: ?Sized + Send + Sync + 'static>(&self, name: &str) -> DiResult<Arc<C>> {
        typed(self.resolve_instance(&ContractType::of::<C>(), Some(name), ArgumentBinding::new())?)
    }

    /// Resolves `C` with runtime arguments for this call only.
    fn resolve_with<C: ?Sized + Send + Sync + 'static>(
        &self,
        arguments: ArgumentBinding,
    ) -> DiResult<Arc<C>> {
        typed(self.resolve_instance(&ContractType::of::<C>(), None, arguments)?)
    }

    /// Resolves the entry named `name` with runtime arguments for this call only.
    fn resolve_named_with<C: ?Sized + Send + Sync + 'static>(
        &self,
        name: &str,
        arguments: ArgumentBinding,
    ) -> DiResult<Arc<C>> {
        typed(self.resolve_instance(&ContractType::of::<C>(), Some(name), arguments)?)
    }

    /// Resolves every entry registered for `C`, in registration order.
    fn resolve_all<C: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Vec<Arc<C>>> {
        self.resolve_all_instances(Some(&ContractType::of::<C>()))?
            .into_iter()
            .map(typed::<C>)
            .collect()
    }

    /// Resolves the synthesized "sequence of `C`" contract.
    fn resolve_sequence<C: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<Enumerable<C>>> {
        self.resolve::<Enumerable<C>>()
    }

    /// Whether `C` is registered or synthesizable.
    fn has_registration<C: ?Sized + 'static>(&self) -> bool {
        self.has_registration_for(&ContractType::of::<C>())
    }

    /// Resolves `C` or panics with the resolution error.
    ///
    /// Convenience for bootstrapping code where a missing registration is a
    /// programming error.
    fn resolve_required<C: ?Sized + Send + Sync + 'static>(&self) -> Arc<C> {
        match self.resolve::<C>() {
            Ok(value) => value,
            Err(err) => panic!("failed to resolve {}: {}", std::any::type_name::<C>(), err),
        }
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
