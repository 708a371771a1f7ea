//! Contract identities and registration keys.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Run-time identity of a contract or implementation type.
///
/// Works for concrete types and trait objects alike. Equality and hashing use
/// the `TypeId` only; the name is carried for diagnostics.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::ContractType;
///
/// trait Logger: Send + Sync {}
///
/// let a = ContractType::of::<dyn Logger>();
/// let b = ContractType::of::<dyn Logger>();
/// assert_eq!(a, b);
/// assert!(a.name().contains("Logger"));
/// assert_ne!(a, ContractType::of::<String>());
/// ```
#[derive(Clone, Copy)]
pub struct ContractType {
    id: TypeId,
    name: &'static str,
}

impl ContractType {
    /// Identity of `T`.
    #[inline(always)]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    #[inline(always)]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Human-readable type name (`std::any::type_name`).
    #[inline(always)]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

// TypeId-only comparison, the name is diagnostics
impl PartialEq for ContractType {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ContractType {}

impl Hash for ContractType {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Identity of one registration: contract type, optional name, optional group.
///
/// Two keys are equal when contract and name match. The group is stored and
/// reported but never takes part in identity.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{ContractType, RegistrationKey};
///
/// let plain = RegistrationKey::new(ContractType::of::<u32>());
/// let grouped = RegistrationKey::new(ContractType::of::<u32>()).with_group("ports");
/// assert_eq!(plain, grouped);
///
/// let named = RegistrationKey::named(ContractType::of::<u32>(), "http");
/// assert_ne!(plain, named);
/// assert_eq!(named.name(), Some("http"));
/// ```
#[derive(Clone, Debug)]
pub struct RegistrationKey {
    contract: ContractType,
    name: Option<String>,
    group: Option<String>,
}

impl RegistrationKey {
    pub fn new(contract: ContractType) -> Self {
        Self {
            contract,
            name: None,
            group: None,
        }
    }

    pub fn named(contract: ContractType, name: impl Into<String>) -> Self {
        Self {
            contract,
            name: Some(name.into()),
            group: None,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn contract(&self) -> ContractType {
        self.contract
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    // Only used while a registration item is still being configured.
    pub(crate) fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }

    pub(crate) fn set_group(&mut self, group: String) {
        self.group = Some(group);
    }
}

impl PartialEq for RegistrationKey {
    fn eq(&self, other: &Self) -> bool {
        self.contract == other.contract && self.name == other.name
    }
}

impl Eq for RegistrationKey {}

impl Hash for RegistrationKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.contract.hash(state);
        self.name.hash(state);
    }
}

impl fmt::Display for RegistrationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}[{}]", self.contract, name),
            None => write!(f, "{}", self.contract),
        }
    }
}
