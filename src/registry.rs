use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Capability lookup table, filled while its owner is constructed.
///
/// There is no public way to add entries: once the owning instrument or mode
/// exists, the set of keys is fixed. Values stay reachable mutably so menus can
/// keep their write caches.
#[derive(Debug)]
pub struct Registry<K, V> {
    entries: HashMap<K, V>,
}

impl<K, V> Registry<K, V>
where
    K: Eq + Hash + Copy + Debug,
{
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Keeps the first value registered under a key.
    pub(crate) fn register(&mut self, key: K, value: V) {
        if self.entries.contains_key(&key) {
            log::warn!("Capability {:?} registered twice, keeping the first", key);
            return;
        }
        self.entries.insert(key, value);
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.entries.values_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
