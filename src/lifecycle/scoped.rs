//! Ambient-scope lifecycle.
//!
//! The scoped lifecycle caches into storage owned by someone else, typically
//! one map per logical request. It only needs `get`/`set` by contract type;
//! where the storage comes from is up to the [`StorageSupplier`].

use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::container::ResolutionContext;
use crate::error::{DiError, DiResult};
use crate::instance::Instance;
use crate::internal::FastHashMap;
use crate::key::ContractType;
use crate::lifecycle::Lifecycle;

/// Mapping-like storage for scoped instances, keyed by contract type.
pub trait ScopeStorage: Send + Sync {
    fn get(&self, contract: &ContractType) -> Option<Instance>;
    fn set(&self, contract: ContractType, instance: Instance);
}

/// Default [`ScopeStorage`]: a mutex-guarded map.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{ContractType, Instance, ScopeItems, ScopeStorage};
/// use std::sync::Arc;
///
/// let items = ScopeItems::new();
/// let contract = ContractType::of::<String>();
/// assert!(items.get(&contract).is_none());
///
/// items.set(contract, Instance::new(Arc::new("req-1".to_string())));
/// assert_eq!(items.len(), 1);
/// assert!(items.get(&contract).is_some());
/// ```
#[derive(Default)]
pub struct ScopeItems {
    items: Mutex<FastHashMap<ContractType, Instance>>,
}

impl ScopeItems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    pub fn clear(&self) {
        self.items.lock().clear();
    }
}

impl ScopeStorage for ScopeItems {
    fn get(&self, contract: &ContractType) -> Option<Instance> {
        self.items.lock().get(contract).cloned()
    }

    fn set(&self, contract: ContractType, instance: Instance) {
        self.items.lock().insert(contract, instance);
    }
}

thread_local! {
    static AMBIENT: RefCell<Vec<Arc<dyn ScopeStorage>>> = const { RefCell::new(Vec::new()) };
}

/// Thread-local "current scope" for the scoped lifecycle.
///
/// A request pipeline enters a scope with its own storage for the duration of
/// the request; scopes nest and the innermost one wins.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{AmbientScope, ScopeItems};
/// use std::sync::Arc;
///
/// assert!(AmbientScope::current().is_none());
/// {
///     let _request = AmbientScope::enter(Arc::new(ScopeItems::new()));
///     assert!(AmbientScope::current().is_some());
/// }
/// assert!(AmbientScope::current().is_none());
/// ```
pub struct AmbientScope;

impl AmbientScope {
    /// Makes `storage` the current scope storage of this thread until the guard drops.
    pub fn enter(storage: Arc<dyn ScopeStorage>) -> AmbientScopeGuard {
        AMBIENT.with(|stack| stack.borrow_mut().push(storage));
        AmbientScopeGuard {
            _not_send: PhantomData,
        }
    }

    /// The innermost storage entered on this thread.
    pub fn current() -> Option<Arc<dyn ScopeStorage>> {
        AMBIENT.with(|stack| stack.borrow().last().cloned())
    }
}

/// Leaves the ambient scope on drop.
#[must_use = "the scope ends when the guard is dropped"]
pub struct AmbientScopeGuard {
    _not_send: PhantomData<*const ()>,
}

impl Drop for AmbientScopeGuard {
    fn drop(&mut self) {
        AMBIENT.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Yields the storage the scoped lifecycle should use right now.
pub type StorageSupplier = Arc<dyn Fn() -> Option<Arc<dyn ScopeStorage>> + Send + Sync>;

/// One instance per ambient storage.
///
/// Looks the entry's contract type up in the current storage, activates and
/// stores on a miss. Never creates or destroys the storage itself.
pub struct ScopedLifecycle {
    supplier: StorageSupplier,
}

impl ScopedLifecycle {
    pub fn new(supplier: StorageSupplier) -> Self {
        Self { supplier }
    }

    /// Uses the thread's [`AmbientScope`].
    pub fn ambient() -> Self {
        Self::new(Arc::new(AmbientScope::current))
    }

    /// Always uses `storage`.
    pub fn with_storage(storage: Arc<dyn ScopeStorage>) -> Self {
        Self::new(Arc::new(move || Some(storage.clone())))
    }
}

impl Lifecycle for ScopedLifecycle {
    fn get_instance(
        &self,
        context: &ResolutionContext<'_>,
        activate: &dyn Fn() -> DiResult<Instance>,
    ) -> DiResult<Instance> {
        let contract = context.contract();
        let storage = (self.supplier)().ok_or(DiError::ScopeUnavailable(contract.name()))?;

        if let Some(instance) = storage.get(&contract) {
            return Ok(instance);
        }
        let instance = activate()?;
        storage.set(contract, instance.clone());
        Ok(instance)
    }

    fn name(&self) -> &'static str {
        "scoped"
    }
}
