//! Argument bindings supplied at registration time or per resolve call.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::activation::Parameter;
use crate::instance::{AnyArc, Instance};

/// A single type-erased argument value.
///
/// The value type is recorded so positional arguments can be matched against
/// parameter types without a downcast.
#[derive(Clone)]
pub struct ArgumentValue {
    value: AnyArc,
    value_type: TypeId,
    type_name: &'static str,
}

impl ArgumentValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            value_type: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Argument carrying a resolved dependency (`Arc<C>` for contract `C`).
    pub(crate) fn from_instance(instance: Instance) -> Self {
        let type_name = instance.contract().name();
        let value_type = instance.value_type();
        Self {
            value: instance.into_erased(),
            value_type,
            type_name,
        }
    }

    pub fn value_type(&self) -> TypeId {
        self.value_type
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrows the value if it is a `T`.
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

impl fmt::Debug for ArgumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ArgumentValue").field(&self.type_name).finish()
    }
}

/// Positional and named argument values.
///
/// Used twice per entry: the persistent binding given at registration time,
/// and the runtime binding given to one resolve call.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{ArgumentBinding, named_args};
///
/// let positional = ArgumentBinding::new().with(8080u16).with("localhost".to_string());
/// assert_eq!(positional.count(), 2);
///
/// let named = named_args! { port: 8080u16, host: "localhost".to_string() };
/// assert_eq!(named.count(), 2);
/// assert!(named.named("port").is_some());
/// ```
#[derive(Clone, Default, Debug)]
pub struct ArgumentBinding {
    anonymous: Vec<ArgumentValue>,
    named: HashMap<String, ArgumentValue>,
}

impl ArgumentBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional value.
    pub fn with<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.anonymous.push(ArgumentValue::new(value));
        self
    }

    /// Sets a named value, replacing an earlier one with the same name.
    pub fn with_named<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
        self.named.insert(name.into(), ArgumentValue::new(value));
        self
    }

    pub fn push(&mut self, value: ArgumentValue) {
        self.anonymous.push(value);
    }

    pub fn insert_named(&mut self, name: impl Into<String>, value: ArgumentValue) {
        self.named.insert(name.into(), value);
    }

    /// Adds every value of `other`; named values of `other` win on conflict.
    pub fn merge(&mut self, other: ArgumentBinding) {
        self.anonymous.extend(other.anonymous);
        self.named.extend(other.named);
    }

    /// Total number of values across both slots.
    pub fn count(&self) -> usize {
        self.anonymous.len() + self.named.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn anonymous(&self) -> &[ArgumentValue] {
        &self.anonymous
    }

    pub fn named(&self, name: &str) -> Option<&ArgumentValue> {
        self.named.get(name)
    }

    /// Whether this binding can supply a value for `parameter`: by name, or
    /// by a positional value of the parameter's value type.
    pub fn can_supply(&self, parameter: &Parameter) -> bool {
        self.named.contains_key(parameter.name())
            || self
                .anonymous
                .iter()
                .any(|value| value.value_type == parameter.value_type())
    }
}

impl<K: Into<String>> FromIterator<(K, ArgumentValue)> for ArgumentBinding {
    fn from_iter<I: IntoIterator<Item = (K, ArgumentValue)>>(iter: I) -> Self {
        Self {
            anonymous: Vec::new(),
            named: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl From<HashMap<String, ArgumentValue>> for ArgumentBinding {
    fn from(named: HashMap<String, ArgumentValue>) -> Self {
        Self {
            anonymous: Vec::new(),
            named,
        }
    }
}

impl From<Vec<ArgumentValue>> for ArgumentBinding {
    fn from(anonymous: Vec<ArgumentValue>) -> Self {
        Self {
            anonymous,
            named: HashMap::new(),
        }
    }
}

/// Builds a named [`ArgumentBinding`] from `field: value` pairs.
///
/// Field names become parameter names, the structured-argument form of a
/// resolve call.
///
/// ```rust
/// use ferrous_ioc::named_args;
///
/// let args = named_args! { timeout_ms: 250u64 };
/// assert!(args.named("timeout_ms").is_some());
/// ```
#[macro_export]
macro_rules! named_args {
    ($($name:ident : $value:expr),* $(,)?) => {
        $crate::ArgumentBinding::new()$(.with_named(stringify!($name), $value))*
    };
}
