//! Registration descriptors for introspection and diagnostics.

use crate::key::{ContractType, RegistrationKey};
use crate::registration::{RegistrationEntry, RegistrationItem};

/// Snapshot of one registration entry.
///
/// Contains what was registered, never the instances themselves, so taking
/// descriptors never activates anything.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{ContainerBuilder, Lifetime};
/// use std::sync::Arc;
///
/// let mut builder = ContainerBuilder::new();
/// builder.register_instance::<u32>(Arc::new(5432)).named("db_port").in_group("ports");
/// let container = builder.build();
///
/// let port = container
///     .descriptors()
///     .into_iter()
///     .find(|d| d.name() == Some("db_port"))
///     .unwrap();
/// assert_eq!(port.contract_name(), "u32");
/// assert_eq!(port.group(), Some("ports"));
/// assert_eq!(port.lifecycle, Lifetime::Singleton.as_str());
/// ```
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    /// Contract, name and group
    pub key: RegistrationKey,
    /// Implementation type
    pub implementation: ContractType,
    /// Lifecycle name: "singleton", "scoped", "transient" or a custom name
    pub lifecycle: &'static str,
    /// Persistent arguments bound at registration
    pub argument_count: usize,
}

impl ServiceDescriptor {
    pub(crate) fn from_entry(entry: &RegistrationEntry) -> Self {
        Self {
            key: entry.key().clone(),
            implementation: entry.implementation(),
            lifecycle: entry.lifecycle().name(),
            argument_count: entry.arguments().count(),
        }
    }

    pub(crate) fn from_item(item: &RegistrationItem) -> Self {
        Self {
            key: item.key().clone(),
            implementation: item.implementation_type(),
            lifecycle: item.lifecycle_name(),
            argument_count: item.arguments().count(),
        }
    }

    pub fn contract_name(&self) -> &'static str {
        self.key.contract().name()
    }

    pub fn name(&self) -> Option<&str> {
        self.key.name()
    }

    pub fn group(&self) -> Option<&str> {
        self.key.group()
    }

    pub fn is_named(&self) -> bool {
        self.key.name().is_some()
    }

    /// Whether the contract is its own implementation.
    pub fn is_self_bound(&self) -> bool {
        self.key.contract() == self.implementation
    }
}
