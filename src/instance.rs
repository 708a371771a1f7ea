//! Type-erased resolved values.

use std::any::{Any, TypeId};
use std::sync::Arc;

use crate::key::ContractType;

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

/// A resolved instance of some contract.
///
/// An instance for contract `C` always wraps an `Arc<C>`, so cloning an
/// `Instance` and downcasting it again yields a pointer-equal `Arc`.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::Instance;
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync { fn hi(&self) -> &str; }
/// struct En;
/// impl Greeter for En { fn hi(&self) -> &str { "hello" } }
///
/// let greeter: Arc<dyn Greeter> = Arc::new(En);
/// let instance = Instance::new(greeter.clone());
/// let back = instance.downcast::<dyn Greeter>().unwrap();
/// assert!(Arc::ptr_eq(&greeter, &back));
/// assert!(instance.downcast::<String>().is_none());
/// ```
#[derive(Clone)]
pub struct Instance {
    value: AnyArc,
    value_type: TypeId,
    contract: ContractType,
}

impl Instance {
    pub fn new<C: ?Sized + Send + Sync + 'static>(instance: Arc<C>) -> Self {
        Self {
            value: Arc::new(instance),
            value_type: TypeId::of::<Arc<C>>(),
            contract: ContractType::of::<C>(),
        }
    }

    /// Recovers the typed `Arc<C>`, or `None` if the instance is of another contract.
    pub fn downcast<C: ?Sized + 'static>(&self) -> Option<Arc<C>> {
        self.value.downcast_ref::<Arc<C>>().cloned()
    }

    /// Contract the instance was created for.
    pub fn contract(&self) -> ContractType {
        self.contract
    }

    pub(crate) fn value_type(&self) -> TypeId {
        self.value_type
    }

    pub(crate) fn into_erased(self) -> AnyArc {
        self.value
    }

    /// Returns true when both instances share the same underlying allocation.
    pub fn same_as(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance").field("contract", &self.contract).finish()
    }
}
