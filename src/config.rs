//! Container options.
//!
//! Options are fixed at build time. They can be set in code, read from
//! `FERROUS_IOC_*` environment variables, or (with the `config` feature)
//! deserialized from JSON.

use std::env;
use std::str::FromStr;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

pub const ENV_MAX_DEPTH: &str = "FERROUS_IOC_MAX_DEPTH";
pub const ENV_INJECT_PROPERTIES: &str = "FERROUS_IOC_INJECT_PROPERTIES";

/// Behaviour switches for a [`Container`](crate::Container).
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{ContainerBuilder, ContainerOptions};
///
/// let options = ContainerOptions {
///     max_depth: 64,
///     ..ContainerOptions::default()
/// };
/// let mut builder = ContainerBuilder::new();
/// builder.options(options);
/// assert_eq!(builder.build().options().max_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerOptions {
    /// Nested activations allowed on one thread before `DepthExceeded`.
    pub max_depth: usize,
    /// Run property injection on every instance built from constructors.
    pub inject_properties_on_activation: bool,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            max_depth: 1024,
            inject_properties_on_activation: false,
        }
    }
}

impl ContainerOptions {
    /// Defaults overridden by any `FERROUS_IOC_*` variable that is set.
    ///
    /// Unparsable values are logged and ignored.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_depth: env_or(ENV_MAX_DEPTH, defaults.max_depth),
            inject_properties_on_activation: env_or(
                ENV_INJECT_PROPERTIES,
                defaults.inject_properties_on_activation,
            ),
        }
    }

    /// Parses options from JSON; missing fields keep their defaults.
    #[cfg(feature = "config")]
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(variable = key, value = %raw, "ignoring unparsable option");
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ContainerOptions::default();
        assert_eq!(options.max_depth, 1024);
        assert!(!options.inject_properties_on_activation);
    }

    #[test]
    fn test_env_or_falls_back_when_unset() {
        assert_eq!(env_or("FERROUS_IOC_TEST_NEVER_SET", 17usize), 17);
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_json_partial() {
        let options = ContainerOptions::from_json_str(r#"{ "max_depth": 8 }"#).unwrap();
        assert_eq!(options.max_depth, 8);
    }
}
