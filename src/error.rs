//! Error types for the resolution engine.

use thiserror::Error;

/// Boxed error produced by constructors, factories and registration sources.
///
/// Any error type can be returned from a constructor closure; `DiError`
/// itself converts into it through `?`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Resolution errors
///
/// Every failure of `resolve` is reported synchronously as one of these
/// variants. Nothing is retried automatically.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{ContainerBuilder, DiError, Resolver};
///
/// struct Unregistered;
///
/// let container = ContainerBuilder::new().build();
/// match container.resolve::<Unregistered>() {
///     Err(DiError::RegistrationNotFound { contract, name }) => {
///         assert!(contract.ends_with("Unregistered"));
///         assert!(name.is_none());
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Error)]
pub enum DiError {
    /// No entry exists and no registration source supports the contract
    #[error("Registration not found for contract {contract}{}", display_name(.name))]
    RegistrationNotFound {
        contract: &'static str,
        name: Option<String>,
    },
    /// Several entries share the contract and no name was supplied
    #[error("Registration for contract {contract} is ambiguous, resolve it by name")]
    RegistrationAmbiguous { contract: &'static str },
    /// Constructing the implementation (or one of its dependencies) failed
    #[error("Activation of {implementation} failed: {source}")]
    ActivationFailed {
        implementation: &'static str,
        #[source]
        source: BoxError,
    },
    /// Circular dependency detected (includes path)
    #[error("Circular dependency: {}", .0.join(" -> "))]
    Circular(Vec<&'static str>),
    /// Maximum recursion depth exceeded
    #[error("Max resolution depth {0} exceeded")]
    DepthExceeded(usize),
    /// A scoped lifecycle found no ambient storage to cache into
    #[error("No scope storage available for scoped contract {0}")]
    ScopeUnavailable(&'static str),
    /// Type downcast failed
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),
    /// Neither arguments nor registrations can supply a constructor parameter
    #[error("Parameter `{parameter}` of {implementation} cannot be supplied")]
    UnsatisfiedParameter {
        implementation: &'static str,
        parameter: &'static str,
    },
    /// The implementation declares no constructors
    #[error("{0} declares no constructors")]
    NoConstructor(&'static str),
    /// The container behind a self-registration was dropped
    #[error("Container was dropped")]
    ContainerDropped,
}

fn display_name(name: &Option<String>) -> String {
    match name {
        Some(name) => format!(" named `{}`", name),
        None => String::new(),
    }
}

impl DiError {
    /// Wraps a failure raised while constructing `implementation`.
    pub fn activation(implementation: &'static str, source: impl Into<BoxError>) -> Self {
        DiError::ActivationFailed {
            implementation,
            source: source.into(),
        }
    }

    /// Follows nested `ActivationFailed` layers down to the original cause.
    ///
    /// Returns `self` when the innermost cause is not a `DiError`.
    pub fn innermost(&self) -> &DiError {
        let mut current = self;
        while let DiError::ActivationFailed { source, .. } = current {
            match source.downcast_ref::<DiError>() {
                Some(inner) => current = inner,
                None => break,
            }
        }
        current
    }

    /// Returns true for the "registration not found" family.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DiError::RegistrationNotFound { .. })
    }
}

/// Result type for DI operations
pub type DiResult<T> = Result<T, DiError>;
