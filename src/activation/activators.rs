//! Activation strategies: how an entry produces a fresh instance.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::activation::injectable::{Constructor, ConstructorArgs, Injectable, Parameter};
use crate::activation::selector::ConstructorSelector;
use crate::arguments::{ArgumentBinding, ArgumentValue};
use crate::container::ResolutionContext;
use crate::error::{BoxError, DiError, DiResult};
use crate::instance::Instance;
use crate::traits::ResolverCore;

/// Produces a new instance for the entry under activation.
///
/// Reuse policy is not the activator's concern; the entry's lifecycle decides
/// whether to call it at all.
pub trait Activator: Send + Sync {
    fn activate(&self, context: &ResolutionContext<'_>) -> DiResult<Instance>;
}

/// Builds the implementation through its declared constructors.
pub struct ReflectionActivator<C: ?Sized, I> {
    constructors: Vec<Constructor<I>>,
    cast: fn(Arc<I>) -> Arc<C>,
}

impl<C, I> ReflectionActivator<C, I>
where
    C: ?Sized + Send + Sync + 'static,
    I: Injectable,
{
    pub fn new(cast: fn(Arc<I>) -> Arc<C>) -> Self {
        Self {
            constructors: I::constructors(),
            cast,
        }
    }

    fn construct(&self, context: &ResolutionContext<'_>) -> Result<Arc<I>, BoxError> {
        let implementation = std::any::type_name::<I>();
        let constructor = ConstructorSelector::select(&self.constructors, context)
            .ok_or(DiError::NoConstructor(implementation))?;

        let values = bind_arguments(implementation, constructor.parameters(), context)?;
        let args = ConstructorArgs::new(constructor.parameters().to_vec(), values);
        let value = Arc::new(constructor.invoke(&args)?);

        if context.container().options().inject_properties_on_activation {
            context.container().inject_properties(&*value)?;
        }
        Ok(value)
    }
}

impl<C, I> Activator for ReflectionActivator<C, I>
where
    C: ?Sized + Send + Sync + 'static,
    I: Injectable,
{
    fn activate(&self, context: &ResolutionContext<'_>) -> DiResult<Instance> {
        match self.construct(context) {
            Ok(value) => Ok(Instance::new((self.cast)(value))),
            Err(source) => Err(DiError::activation(std::any::type_name::<I>(), source)),
        }
    }
}

/// Binds one value per parameter.
///
/// Per parameter: runtime named, persistent named, runtime positional,
/// persistent positional, then the container. Positional values are consumed
/// in order and matched by value type.
fn bind_arguments(
    implementation: &'static str,
    parameters: &[Parameter],
    context: &ResolutionContext<'_>,
) -> DiResult<Vec<ArgumentValue>> {
    let runtime = context.runtime_arguments();
    let persistent = context.arguments();
    let mut runtime_used: SmallVec<[bool; 4]> = SmallVec::from_elem(false, runtime.anonymous().len());
    let mut persistent_used: SmallVec<[bool; 4]> =
        SmallVec::from_elem(false, persistent.anonymous().len());

    let mut values = Vec::with_capacity(parameters.len());
    for parameter in parameters {
        if let Some(value) = runtime
            .named(parameter.name())
            .or_else(|| persistent.named(parameter.name()))
        {
            values.push(value.clone());
            continue;
        }
        if let Some(value) = take_positional(runtime, &mut runtime_used, parameter) {
            values.push(value);
            continue;
        }
        if let Some(value) = take_positional(persistent, &mut persistent_used, parameter) {
            values.push(value);
            continue;
        }
        if context.is_registered_as_anything(&parameter.contract()) {
            let instance = context.resolve_instance(&parameter.contract(), None, ArgumentBinding::new())?;
            values.push(ArgumentValue::from_instance(instance));
            continue;
        }
        return Err(DiError::UnsatisfiedParameter {
            implementation,
            parameter: parameter.name(),
        });
    }
    Ok(values)
}

fn take_positional(
    binding: &ArgumentBinding,
    used: &mut [bool],
    parameter: &Parameter,
) -> Option<ArgumentValue> {
    let index = binding
        .anonymous()
        .iter()
        .enumerate()
        .position(|(i, v)| !used[i] && v.value_type() == parameter.value_type())?;
    used[index] = true;
    Some(binding.anonymous()[index].clone())
}

/// Returns a pre-built instance.
pub struct InstanceActivator {
    instance: Instance,
}

impl InstanceActivator {
    pub fn new(instance: Instance) -> Self {
        Self { instance }
    }
}

impl Activator for InstanceActivator {
    fn activate(&self, _: &ResolutionContext<'_>) -> DiResult<Instance> {
        Ok(self.instance.clone())
    }
}

type Factory<C> = Arc<dyn Fn(&ResolutionContext<'_>) -> Result<Arc<C>, BoxError> + Send + Sync>;

/// Delegates construction to a factory closure.
pub struct DelegateActivator<C: ?Sized> {
    factory: Factory<C>,
}

impl<C: ?Sized + Send + Sync + 'static> DelegateActivator<C> {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&ResolutionContext<'_>) -> Result<Arc<C>, BoxError> + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
        }
    }
}

impl<C: ?Sized + Send + Sync + 'static> Activator for DelegateActivator<C> {
    fn activate(&self, context: &ResolutionContext<'_>) -> DiResult<Instance> {
        (self.factory)(context)
            .map(Instance::new)
            .map_err(|source| DiError::activation(std::any::type_name::<C>(), source))
    }
}
