//! Registration modules: reusable groups of registrations.

use crate::collection::ContainerBuilder;
use crate::error::DiResult;

/// A module that registers a related set of contracts with a builder.
///
/// # Example
///
/// ```rust
/// use ferrous_ioc::{ContainerBuilder, DiResult, Lifetime, RegistrationModule, Resolver};
/// use std::sync::Arc;
///
/// struct Settings { url: String }
///
/// struct StorageModule { url: &'static str }
///
/// impl RegistrationModule for StorageModule {
///     fn register(self, builder: &mut ContainerBuilder) -> DiResult<()> {
///         let url = self.url.to_string();
///         builder
///             .register_factory::<Settings, _>(move |_| Ok(Arc::new(Settings { url: url.clone() })))
///             .lifetime(Lifetime::Singleton);
///         Ok(())
///     }
/// }
///
/// # fn main() -> DiResult<()> {
/// let mut builder = ContainerBuilder::new();
/// builder.add_module(StorageModule { url: "sqlite::memory:" })?;
/// let container = builder.build();
/// assert_eq!(container.resolve::<Settings>()?.url, "sqlite::memory:");
/// # Ok(())
/// # }
/// ```
pub trait RegistrationModule {
    /// Adds this module's registrations to `builder`.
    fn register(self, builder: &mut ContainerBuilder) -> DiResult<()>;
}

impl<F> RegistrationModule for F
where
    F: FnOnce(&mut ContainerBuilder) -> DiResult<()>,
{
    fn register(self, builder: &mut ContainerBuilder) -> DiResult<()> {
        self(builder)
    }
}

impl ContainerBuilder {
    /// Runs `module` against this builder.
    pub fn add_module<M: RegistrationModule>(&mut self, module: M) -> DiResult<&mut Self> {
        tracing::trace!(module = std::any::type_name::<M>(), "registering module");
        module.register(self)?;
        Ok(self)
    }
}

/// Consuming-builder form of [`ContainerBuilder::add_module`].
pub trait ContainerBuilderExt: Sized {
    /// Adds a module and hands the builder back, for chaining.
    ///
    /// ```rust
    /// use ferrous_ioc::{ContainerBuilder, ContainerBuilderExt, DiResult};
    ///
    /// # fn main() -> DiResult<()> {
    /// let container = ContainerBuilder::new()
    ///     .with_module(|_: &mut ContainerBuilder| -> DiResult<()> { Ok(()) })?
    ///     .build();
    /// # let _ = container;
    /// # Ok(())
    /// # }
    /// ```
    fn with_module<M: RegistrationModule>(self, module: M) -> DiResult<Self>;
}

impl ContainerBuilderExt for ContainerBuilder {
    fn with_module<M: RegistrationModule>(mut self, module: M) -> DiResult<Self> {
        module.register(&mut self)?;
        Ok(self)
    }
}
