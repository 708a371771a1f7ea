//! Registration sources: entries synthesized on first resolve.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::activation::Activator;
use crate::container::{Container, ResolutionContext};
use crate::error::{BoxError, DiError, DiResult};
use crate::instance::Instance;
use crate::key::{ContractType, RegistrationKey};
use crate::lifecycle::TransientLifecycle;
use crate::registration::{RegistrationEntry, RegistrationStore};
use crate::traits::ResolverCore;

/// Produces an entry for a contract nobody registered explicitly.
///
/// The container asks its sources in order when a bare lookup misses; the
/// first source whose [`supports`](Self::supports) returns true synthesizes the
/// entry, which is then stored and reused by later resolves.
pub trait RegistrationSource: Send + Sync {
    /// Whether this source can produce an entry for `contract` given `store`.
    fn supports(&self, contract: &ContractType, store: &RegistrationStore) -> bool;

    /// Builds the entry. Only called after `supports` returned true.
    fn synthesize(
        &self,
        contract: &ContractType,
        container: &Container,
    ) -> Result<RegistrationEntry, BoxError>;
}

/// Read-only, ordered sequence of every instance registered for `C`.
///
/// Resolve it through [`Resolver::resolve_sequence`](crate::Resolver::resolve_sequence)
/// or as `Enumerable<C>` like any other contract; constructors can depend on
/// it with `Parameter::dependency::<Enumerable<C>>`.
pub struct Enumerable<C: ?Sized> {
    items: Vec<Arc<C>>,
}

impl<C: ?Sized> Enumerable<C> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<C>> {
        self.items.iter()
    }

    /// Copies the instances out.
    pub fn to_vec(&self) -> Vec<Arc<C>> {
        self.items.clone()
    }
}

impl<C: ?Sized> Deref for Enumerable<C> {
    type Target = [Arc<C>];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<'a, C: ?Sized> IntoIterator for &'a Enumerable<C> {
    type Item = &'a Arc<C>;
    type IntoIter = std::slice::Iter<'a, Arc<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<C: ?Sized> fmt::Debug for Enumerable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Enumerable")
            .field("element", &std::any::type_name::<C>())
            .field("len", &self.items.len())
            .finish()
    }
}

type Collect = fn(Vec<Instance>) -> DiResult<Instance>;

/// How to build `Enumerable<C>` from instances of `C`.
///
/// Recorded for every registration so the enumerable source can recognise the
/// sequence contract from its type identity alone.
#[derive(Clone, Copy)]
pub struct SequenceShape {
    sequence: ContractType,
    element: ContractType,
    collect: Collect,
}

impl SequenceShape {
    pub fn of<C: ?Sized + Send + Sync + 'static>() -> Self {
        Self {
            sequence: ContractType::of::<Enumerable<C>>(),
            element: ContractType::of::<C>(),
            collect: collect_sequence::<C>,
        }
    }

    /// The `Enumerable<C>` contract.
    pub fn sequence(&self) -> ContractType {
        self.sequence
    }

    /// The `C` contract.
    pub fn element(&self) -> ContractType {
        self.element
    }

    pub(crate) fn collect(&self, items: Vec<Instance>) -> DiResult<Instance> {
        (self.collect)(items)
    }
}

impl fmt::Debug for SequenceShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceShape")
            .field("sequence", &self.sequence)
            .field("element", &self.element)
            .finish()
    }
}

fn collect_sequence<C: ?Sized + Send + Sync + 'static>(items: Vec<Instance>) -> DiResult<Instance> {
    let items = items
        .into_iter()
        .map(|item| {
            item.downcast::<C>()
                .ok_or(DiError::TypeMismatch(std::any::type_name::<C>()))
        })
        .collect::<DiResult<Vec<_>>>()?;
    Ok(Instance::new(Arc::new(Enumerable { items })))
}

/// Synthesizes `Enumerable<C>` whenever at least one `C` is registered.
///
/// The synthesized entry is transient: each resolve re-collects, so entries
/// of `C` added after the first resolve show up in later sequences.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnumerableSource;

impl RegistrationSource for EnumerableSource {
    fn supports(&self, contract: &ContractType, store: &RegistrationStore) -> bool {
        store
            .sequence_shape(contract)
            .map_or(false, |shape| store.has(&shape.element()))
    }

    fn synthesize(
        &self,
        contract: &ContractType,
        container: &Container,
    ) -> Result<RegistrationEntry, BoxError> {
        let shape = container
            .sequence_shape(contract)
            .ok_or(DiError::RegistrationNotFound {
                contract: contract.name(),
                name: None,
            })?;
        Ok(RegistrationEntry::new(
            RegistrationKey::new(*contract),
            *contract,
            Arc::new(EnumerableActivator { shape }),
            Arc::new(TransientLifecycle),
        ))
    }
}

/// Resolves every element entry and collects them into the sequence.
struct EnumerableActivator {
    shape: SequenceShape,
}

impl Activator for EnumerableActivator {
    fn activate(&self, context: &ResolutionContext<'_>) -> DiResult<Instance> {
        let items = context.resolve_all_instances(Some(&self.shape.element()))?;
        self.shape.collect(items)
    }
}
