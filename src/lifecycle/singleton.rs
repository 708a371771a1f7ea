use once_cell::sync::OnceCell;

use crate::container::ResolutionContext;
use crate::error::DiResult;
use crate::instance::Instance;
use crate::lifecycle::Lifecycle;

/// One instance for the life of the container.
///
/// The first activation runs under the cell's initialization lock, so
/// concurrent first resolves construct a single instance and every other
/// caller observes it. A failed activation leaves the cell empty and the next
/// resolve tries again.
#[derive(Default)]
pub struct SingletonLifecycle {
    instance: OnceCell<Instance>,
}

impl SingletonLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the instance has been created yet.
    pub fn is_created(&self) -> bool {
        self.instance.get().is_some()
    }
}

impl Lifecycle for SingletonLifecycle {
    fn get_instance(
        &self,
        _: &ResolutionContext<'_>,
        activate: &dyn Fn() -> DiResult<Instance>,
    ) -> DiResult<Instance> {
        // Fast path: no locking once initialized
        if let Some(instance) = self.instance.get() {
            return Ok(instance.clone());
        }
        self.instance.get_or_try_init(activate).cloned()
    }

    fn name(&self) -> &'static str {
        "singleton"
    }
}
