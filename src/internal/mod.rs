//! Internal implementation details.

pub(crate) mod circular;

pub(crate) use circular::ResolutionGuard;

#[cfg(feature = "ahash")]
pub(crate) type FastHasher = ahash::RandomState;
#[cfg(not(feature = "ahash"))]
pub(crate) type FastHasher = std::collections::hash_map::RandomState;

pub(crate) type FastHashMap<K, V> = std::collections::HashMap<K, V, FastHasher>;
