use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::internal::{FastHashMap, FastHasher};
use crate::key::{ContractType, RegistrationKey};
use crate::registration::{RegistrationEntry, RegistrationSource, SequenceShape};

/// Keyed collection of registration entries plus the registration sources.
///
/// Entries keep insertion order, which is the order `resolve_all` and the
/// sequence contracts report. Adding under an existing key replaces the entry
/// in place.
///
/// A contract is a *duplicate* when two registrations collided on the same
/// key during intake, or when it has several entries under different names.
/// A bare lookup of a duplicate contract yields nothing; named lookups still
/// work.
pub struct RegistrationStore {
    entries: IndexMap<RegistrationKey, Arc<RegistrationEntry>, FastHasher>,
    by_contract: FastHashMap<ContractType, SmallVec<[RegistrationKey; 2]>>,
    duplicates: HashSet<ContractType, FastHasher>,
    shapes: FastHashMap<ContractType, SequenceShape>,
    sources: Vec<Arc<dyn RegistrationSource>>,
}

impl Default for RegistrationStore {
    fn default() -> Self {
        Self {
            entries: IndexMap::with_hasher(FastHasher::default()),
            by_contract: FastHashMap::default(),
            duplicates: HashSet::with_hasher(FastHasher::default()),
            shapes: FastHashMap::default(),
            sources: Vec::new(),
        }
    }
}

impl RegistrationStore {
    /// An empty store without any sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the entry under its key.
    pub fn add(&mut self, entry: RegistrationEntry) -> Arc<RegistrationEntry> {
        let entry = Arc::new(entry);
        let key = entry.key().clone();
        let contract = key.contract();

        if let Some(shape) = entry.sequence_shape() {
            self.shapes.entry(shape.sequence()).or_insert(*shape);
        }
        if self.entries.insert(key.clone(), entry.clone()).is_none() {
            self.by_contract.entry(contract).or_default().push(key);
        }
        entry
    }

    /// Like [`add`](Self::add), but a key collision marks the contract as
    /// duplicate. Returns whether it collided.
    pub fn add_checked(&mut self, entry: RegistrationEntry) -> bool {
        let collided = self.entries.contains_key(entry.key());
        if collided {
            self.duplicates.insert(entry.contract());
        }
        self.add(entry);
        collided
    }

    /// Removes every entry of `contract`, whatever its name, and clears the
    /// duplicate mark. Returns the number of entries removed.
    pub fn remove(&mut self, contract: &ContractType) -> usize {
        self.duplicates.remove(contract);
        let Some(keys) = self.by_contract.remove(contract) else {
            return 0;
        };
        for key in &keys {
            self.entries.shift_remove(key);
        }
        keys.len()
    }

    /// The single entry of `contract`, or `None` when missing or duplicate.
    pub fn try_get(&self, contract: &ContractType) -> Option<Arc<RegistrationEntry>> {
        if self.duplicates.contains(contract) {
            return None;
        }
        match self.by_contract.get(contract).map(|keys| keys.as_slice()) {
            Some([key]) => self.entries.get(key).cloned(),
            _ => None,
        }
    }

    pub fn get_named(&self, contract: &ContractType, name: &str) -> Option<Arc<RegistrationEntry>> {
        self.entries
            .get(&RegistrationKey::named(*contract, name))
            .cloned()
    }

    pub fn get(&self, key: &RegistrationKey) -> Option<Arc<RegistrationEntry>> {
        self.entries.get(key).cloned()
    }

    /// Whether any entry exists for `contract`. Sources are not consulted.
    pub fn has(&self, contract: &ContractType) -> bool {
        self.by_contract.contains_key(contract)
    }

    pub fn has_duplicate(&self, contract: &ContractType) -> bool {
        self.duplicates.contains(contract)
            || self
                .by_contract
                .get(contract)
                .map_or(false, |keys| keys.len() > 1)
    }

    /// Every entry, in insertion order.
    pub fn all(&self) -> impl Iterator<Item = &Arc<RegistrationEntry>> + '_ {
        self.entries.values()
    }

    /// Entries of one contract, in insertion order.
    pub fn entries_for(&self, contract: ContractType) -> impl Iterator<Item = &Arc<RegistrationEntry>> + '_ {
        self.entries
            .values()
            .filter(move |entry| entry.contract() == contract)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends a source; sources are consulted in the order they were added.
    pub fn add_source(&mut self, source: Arc<dyn RegistrationSource>) {
        self.sources.push(source);
    }

    pub fn sources(&self) -> &[Arc<dyn RegistrationSource>] {
        &self.sources
    }

    /// Shape recorded for a "sequence of T" contract, if any `T` was ever registered.
    pub fn sequence_shape(&self, sequence: &ContractType) -> Option<SequenceShape> {
        self.shapes.get(sequence).copied()
    }

    /// Whether `contract` has an entry or some source can synthesize one.
    pub fn is_registered_as_anything(&self, contract: &ContractType) -> bool {
        self.has(contract)
            || self
                .sources
                .iter()
                .any(|source| source.supports(contract, self))
    }
}

impl std::fmt::Debug for RegistrationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationStore")
            .field("entries", &self.entries.len())
            .field("duplicates", &self.duplicates.len())
            .field("sources", &self.sources.len())
            .finish()
    }
}
