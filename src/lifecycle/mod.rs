//! Lifecycle strategies: instance-reuse policy around an activation.
//!
//! A lifecycle receives the activation as a callback and decides whether to
//! call it or hand back a cached instance. Each registration entry owns its
//! own lifecycle object, so caches never leak between entries.

mod scoped;
mod singleton;
mod transient;

pub use scoped::{AmbientScope, AmbientScopeGuard, ScopeItems, ScopeStorage, ScopedLifecycle, StorageSupplier};
pub use singleton::SingletonLifecycle;
pub use transient::TransientLifecycle;

use crate::container::ResolutionContext;
use crate::error::DiResult;
use crate::instance::Instance;

/// Instance-reuse policy.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Constructor, ContainerBuilder, DiResult, Injectable, Instance, Lifecycle, ResolutionContext, Resolver};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// // Re-creates the instance on every other resolve.
/// #[derive(Default)]
/// struct EveryOther {
///     calls: AtomicUsize,
///     last: std::sync::Mutex<Option<Instance>>,
/// }
///
/// impl Lifecycle for EveryOther {
///     fn get_instance(
///         &self,
///         _: &ResolutionContext<'_>,
///         activate: &dyn Fn() -> DiResult<Instance>,
///     ) -> DiResult<Instance> {
///         let mut last = self.last.lock().unwrap();
///         if self.calls.fetch_add(1, Ordering::SeqCst) % 2 == 0 || last.is_none() {
///             *last = Some(activate()?);
///         }
///         Ok(last.clone().unwrap())
///     }
///
///     fn name(&self) -> &'static str { "every-other" }
/// }
///
/// struct Token;
/// impl Injectable for Token {
///     fn constructors() -> Vec<Constructor<Self>> { vec![Constructor::new(|_| Ok(Token))] }
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder.register_type::<Token>().with_lifecycle(Arc::new(EveryOther::default()));
/// let container = builder.build();
///
/// let a = container.resolve::<Token>().unwrap();
/// let b = container.resolve::<Token>().unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
pub trait Lifecycle: Send + Sync {
    /// Returns a cached instance or the result of `activate`.
    fn get_instance(
        &self,
        context: &ResolutionContext<'_>,
        activate: &dyn Fn() -> DiResult<Instance>,
    ) -> DiResult<Instance>;

    /// Short name for diagnostics.
    fn name(&self) -> &'static str;
}
