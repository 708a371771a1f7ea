//! Core traits for the resolution engine.

mod resolver;

pub use resolver::{Resolver, ResolverCore};
