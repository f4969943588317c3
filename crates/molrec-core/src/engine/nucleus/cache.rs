use crate::core::models::nucleus::Nucleus;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::RwLock;
use tracing::warn;

/// Every input to nucleus reconciliation. Two equal queries always reconcile to
/// the same [`Nucleus`] against the same table.
#[derive(Debug, Clone)]
pub struct NucleusQuery {
    pub mass_number: Option<i64>,
    pub atomic_number: Option<i64>,
    pub symbol: Option<String>,
    pub mass: Option<f64>,
    pub real: Option<bool>,
    pub label: Option<String>,
    pub speclabel: bool,
    pub nonphysical: bool,
    pub mtol: f64,
}

impl Default for NucleusQuery {
    fn default() -> Self {
        Self {
            mass_number: None,
            atomic_number: None,
            symbol: None,
            mass: None,
            real: None,
            label: None,
            speclabel: true,
            nonphysical: false,
            mtol: 1.0e-3,
        }
    }
}

type QueryKey<'a> = (
    Option<i64>,
    Option<i64>,
    Option<&'a str>,
    Option<u64>,
    Option<bool>,
    Option<&'a str>,
    bool,
    bool,
    u64,
);

impl NucleusQuery {
    fn key(&self) -> QueryKey<'_> {
        (
            self.mass_number,
            self.atomic_number,
            self.symbol.as_deref(),
            self.mass.map(f64::to_bits),
            self.real,
            self.label.as_deref(),
            self.speclabel,
            self.nonphysical,
            self.mtol.to_bits(),
        )
    }
}

impl PartialEq for NucleusQuery {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for NucleusQuery {}

impl Hash for NucleusQuery {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Memo of reconciled nuclei, safe to share across threads.
///
/// Entries are never replaced once stored; when the cache reaches capacity,
/// new results are returned to the caller without being remembered.
#[derive(Debug)]
pub struct NucleusCache {
    entries: RwLock<HashMap<NucleusQuery, Nucleus>>,
    capacity: usize,
}

impl Default for NucleusCache {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

static GLOBAL: Lazy<NucleusCache> = Lazy::new(NucleusCache::default);

impl NucleusCache {
    pub const DEFAULT_CAPACITY: usize = 512;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Process-wide cache paired with the builtin nuclide table.
    pub fn global() -> &'static NucleusCache {
        &GLOBAL
    }

    pub fn get(&self, query: &NucleusQuery) -> Option<Nucleus> {
        match self.entries.read() {
            Ok(map) => map.get(query).cloned(),
            Err(poisoned) => poisoned.into_inner().get(query).cloned(),
        }
    }

    pub fn insert(&self, query: NucleusQuery, nucleus: Nucleus) {
        let mut map = match self.entries.write() {
            Ok(map) => map,
            Err(poisoned) => poisoned.into_inner(),
        };
        if map.contains_key(&query) {
            return;
        }
        if map.len() >= self.capacity {
            warn!(
                capacity = self.capacity,
                "Nucleus cache is full; result not cached."
            );
            return;
        }
        map.insert(query, nucleus);
    }

    pub fn len(&self) -> usize {
        match self.entries.read() {
            Ok(map) => map.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        match self.entries.write() {
            Ok(mut map) => map.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hydrogen() -> Nucleus {
        Nucleus {
            mass_number: 1,
            atomic_number: 1,
            symbol: "H".to_string(),
            mass: 1.00782503223,
            real: true,
            label: String::new(),
        }
    }

    fn query(z: i64) -> NucleusQuery {
        NucleusQuery {
            atomic_number: Some(z),
            ..Default::default()
        }
    }

    #[test]
    fn equal_queries_share_an_entry() {
        let cache = NucleusCache::new();
        cache.insert(query(1), hydrogen());
        assert_eq!(cache.get(&query(1)), Some(hydrogen()));
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&query(2)).is_none());
    }

    #[test]
    fn insert_does_not_replace_existing_entry() {
        let cache = NucleusCache::new();
        cache.insert(query(1), hydrogen());
        let mut other = hydrogen();
        other.label = "_x".to_string();
        cache.insert(query(1), other);
        assert_eq!(cache.get(&query(1)).unwrap().label, "");
    }

    #[test]
    fn full_cache_skips_new_entries() {
        let cache = NucleusCache::with_capacity(1);
        cache.insert(query(1), hydrogen());
        cache.insert(query(2), hydrogen());
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&query(2)).is_none());
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn float_fields_compare_bitwise() {
        let a = NucleusQuery {
            mass: Some(1.0),
            ..query(1)
        };
        let b = NucleusQuery {
            mass: Some(1.0 + 1e-12),
            ..query(1)
        };
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
