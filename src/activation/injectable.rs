//! Constructor and property metadata declared by implementation types.
//!
//! Rust has no run-time reflection, so an implementation type describes its
//! constructors and injectable properties explicitly through [`Injectable`].
//! The metadata is captured once, when the type is registered.

use std::any::{Any, TypeId};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::arguments::ArgumentValue;
use crate::error::{BoxError, DiError, DiResult};
use crate::instance::Instance;
use crate::key::ContractType;

/// Implementation types constructible by the container.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Constructor, ContainerBuilder, Injectable, Resolver};
/// use std::sync::Arc;
///
/// trait Repository: Send + Sync { fn table(&self) -> &str; }
///
/// struct UserRepository;
/// impl Repository for UserRepository { fn table(&self) -> &str { "users" } }
/// impl Injectable for UserRepository {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::new(|_| Ok(UserRepository))]
///     }
/// }
///
/// struct UserService { repo: Arc<dyn Repository> }
/// impl Injectable for UserService {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::new(|args| Ok(UserService { repo: args.dependency::<dyn Repository>(0)? }))
///             .dependency::<dyn Repository>("repo")]
///     }
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder.register::<dyn Repository, UserRepository>(|r| r);
/// builder.register_type::<UserService>();
/// let container = builder.build();
///
/// let service = container.resolve::<UserService>().unwrap();
/// assert_eq!(service.repo.table(), "users");
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Every constructor the container may choose from.
    fn constructors() -> Vec<Constructor<Self>>;

    /// Property slots eligible for injection. Empty by default.
    fn properties() -> Vec<Property<Self>> {
        Vec::new()
    }
}

type Invoke<T> = Arc<dyn Fn(&ConstructorArgs) -> Result<T, BoxError> + Send + Sync>;

/// Declared constructor parameter.
#[derive(Clone, Debug)]
pub struct Parameter {
    name: &'static str,
    contract: ContractType,
    value_type: TypeId,
}

impl Parameter {
    /// Parameter filled with `Arc<C>`, resolvable from the container.
    pub fn dependency<C: ?Sized + Send + Sync + 'static>(name: &'static str) -> Self {
        Self {
            name,
            contract: ContractType::of::<C>(),
            value_type: TypeId::of::<Arc<C>>(),
        }
    }

    /// Parameter filled with a plain value of type `V`.
    pub fn value<V: Any + Send + Sync>(name: &'static str) -> Self {
        Self {
            name,
            contract: ContractType::of::<V>(),
            value_type: TypeId::of::<V>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Contract looked up in the store when no argument supplies the value.
    pub fn contract(&self) -> ContractType {
        self.contract
    }

    /// Type a positional argument must have to fill this parameter.
    pub fn value_type(&self) -> TypeId {
        self.value_type
    }
}

/// One way of constructing `T`.
pub struct Constructor<T> {
    parameters: Vec<Parameter>,
    invoke: Invoke<T>,
}

impl<T> Constructor<T> {
    /// Constructor with no parameters yet; chain [`dependency`](Self::dependency)
    /// and [`value`](Self::value) in declaration order.
    pub fn new<F>(invoke: F) -> Self
    where
        F: Fn(&ConstructorArgs) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        Self {
            parameters: Vec::new(),
            invoke: Arc::new(invoke),
        }
    }

    pub fn dependency<C: ?Sized + Send + Sync + 'static>(mut self, name: &'static str) -> Self {
        self.parameters.push(Parameter::dependency::<C>(name));
        self
    }

    pub fn value<V: Any + Send + Sync>(mut self, name: &'static str) -> Self {
        self.parameters.push(Parameter::value::<V>(name));
        self
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub(crate) fn invoke(&self, args: &ConstructorArgs) -> Result<T, BoxError> {
        (self.invoke)(args)
    }
}

impl<T> Clone for Constructor<T> {
    fn clone(&self) -> Self {
        Self {
            parameters: self.parameters.clone(),
            invoke: self.invoke.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Constructor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Constructor")
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// Values bound to the parameters of the selected constructor, in order.
pub struct ConstructorArgs {
    parameters: Vec<Parameter>,
    values: Vec<ArgumentValue>,
}

impl ConstructorArgs {
    pub(crate) fn new(parameters: Vec<Parameter>, values: Vec<ArgumentValue>) -> Self {
        debug_assert_eq!(parameters.len(), values.len());
        Self { parameters, values }
    }

    fn slot(&self, index: usize) -> DiResult<(&Parameter, &ArgumentValue)> {
        match (self.parameters.get(index), self.values.get(index)) {
            (Some(p), Some(v)) => Ok((p, v)),
            _ => Err(DiError::TypeMismatch("constructor argument index out of range")),
        }
    }

    /// The dependency bound at `index` as `Arc<C>`.
    pub fn dependency<C: ?Sized + 'static>(&self, index: usize) -> DiResult<Arc<C>> {
        let (_, value) = self.slot(index)?;
        value
            .get::<Arc<C>>()
            .cloned()
            .ok_or(DiError::TypeMismatch(std::any::type_name::<C>()))
    }

    /// The plain value bound at `index`.
    ///
    /// A value resolved from the container (`Arc<V>`) is cloned out as well.
    pub fn value<V: Clone + 'static>(&self, index: usize) -> DiResult<V> {
        let (_, value) = self.slot(index)?;
        if let Some(v) = value.get::<V>() {
            return Ok(v.clone());
        }
        value
            .get::<Arc<V>>()
            .map(|v| V::clone(v))
            .ok_or(DiError::TypeMismatch(std::any::type_name::<V>()))
    }

    /// Index of the parameter called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p.name() == name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Write-once slot for property injection.
///
/// An unset slot is "empty"; injection fills it at most once and never
/// overwrites a value that is already there.
pub struct Inject<C: ?Sized> {
    cell: OnceCell<Arc<C>>,
}

impl<C: ?Sized> Inject<C> {
    pub fn new() -> Self {
        Self { cell: OnceCell::new() }
    }

    pub fn with(value: Arc<C>) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(value);
        Self { cell }
    }

    pub fn get(&self) -> Option<&Arc<C>> {
        self.cell.get()
    }

    pub fn is_set(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Stores `value` unless the slot is already filled. Returns whether it was stored.
    pub fn set(&self, value: Arc<C>) -> bool {
        self.cell.set(value).is_ok()
    }
}

impl<C: ?Sized> Default for Inject<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> std::fmt::Debug for Inject<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inject").field("set", &self.is_set()).finish()
    }
}

/// Declared injectable property of `T`.
pub struct Property<T> {
    name: &'static str,
    contract: ContractType,
    is_set: Arc<dyn Fn(&T) -> bool + Send + Sync>,
    assign: Arc<dyn Fn(&T, &Instance) -> DiResult<()> + Send + Sync>,
}

impl<T: 'static> Property<T> {
    /// Property backed by the [`Inject`] slot returned from `slot`.
    pub fn new<C: ?Sized + Send + Sync + 'static>(
        name: &'static str,
        slot: fn(&T) -> &Inject<C>,
    ) -> Self {
        Self {
            name,
            contract: ContractType::of::<C>(),
            is_set: Arc::new(move |target| slot(target).is_set()),
            assign: Arc::new(move |target, instance| {
                let value = instance
                    .downcast::<C>()
                    .ok_or(DiError::TypeMismatch(std::any::type_name::<C>()))?;
                slot(target).set(value);
                Ok(())
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn contract(&self) -> ContractType {
        self.contract
    }

    pub(crate) fn is_set(&self, target: &T) -> bool {
        (self.is_set)(target)
    }

    pub(crate) fn assign(&self, target: &T, instance: &Instance) -> DiResult<()> {
        (self.assign)(target, instance)
    }
}
