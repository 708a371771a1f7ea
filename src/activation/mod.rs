//! Activation: constructor metadata, constructor selection and the
//! strategies that turn an entry into a fresh instance.

mod activators;
mod injectable;
mod selector;

pub use activators::{Activator, DelegateActivator, InstanceActivator, ReflectionActivator};
pub use injectable::{Constructor, ConstructorArgs, Inject, Injectable, Parameter, Property};
pub use selector::ConstructorSelector;
