use crate::container::ResolutionContext;
use crate::error::DiResult;
use crate::instance::Instance;
use crate::lifecycle::Lifecycle;

/// Always activates; nothing is cached.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransientLifecycle;

impl Lifecycle for TransientLifecycle {
    fn get_instance(
        &self,
        _: &ResolutionContext<'_>,
        activate: &dyn Fn() -> DiResult<Instance>,
    ) -> DiResult<Instance> {
        activate()
    }

    fn name(&self) -> &'static str {
        "transient"
    }
}
