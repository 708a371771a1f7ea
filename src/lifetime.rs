//! Standard lifecycle selection.

/// Instance-reuse policy chosen at registration time
///
/// Each variant maps to one of the strategies in [`crate::lifecycle`]. The
/// strategy instance is created when the registration is sealed into the
/// store, so every entry owns its own cache.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{ContainerBuilder, Injectable, Constructor, Lifetime, Resolver};
/// use std::sync::Arc;
///
/// struct Clock;
/// impl Injectable for Clock {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::new(|_| Ok(Clock))]
///     }
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder.register_type::<Clock>().lifetime(Lifetime::Singleton);
/// let container = builder.build();
///
/// let a = container.resolve::<Clock>().unwrap();
/// let b = container.resolve::<Clock>().unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifetime {
    /// Single instance per container, created on first resolve
    ///
    /// Concurrent first resolutions construct exactly one instance; the
    /// losers observe the winner's value.
    Singleton,
    /// Single instance per ambient scope storage
    ///
    /// The storage is supplied from outside (for example one map per
    /// request). The lifecycle never creates or destroys it.
    Scoped,
    /// New instance per resolution, never cached
    #[default]
    Transient,
}

impl Lifetime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lifetime::Singleton => "singleton",
            Lifetime::Scoped => "scoped",
            Lifetime::Transient => "transient",
        }
    }
}
