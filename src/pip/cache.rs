//! Bounded memo of recent resolutions.

use std::collections::VecDeque;

use hashbrown::HashMap;

use crate::models::Resolution;

/// Coordinates rounded to six decimal places (about 0.11 m)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    lat_e6: i64,
    lng_e6: i64,
}

impl CacheKey {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat_e6: (lat * 1e6).round() as i64,
            lng_e6: (lng * 1e6).round() as i64,
        }
    }
}

/// First-in-first-out cache.
///
/// Eviction follows insertion order only; lookups do not refresh an entry, so
/// a hot key still ages out once `capacity` newer keys have been inserted.
#[derive(Debug)]
pub struct ResultCache {
    capacity: usize,
    entries: HashMap<CacheKey, Resolution>,
    order: VecDeque<CacheKey>,
}

impl ResultCache {
    /// A capacity of zero disables caching
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<&Resolution> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: CacheKey, value: Resolution) {
        if self.capacity == 0 {
            return;
        }

        // Replacing keeps the original insertion slot
        if let Some(existing) = self.entries.get_mut(&key) {
            *existing = value;
            return;
        }

        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }

        self.order.push_back(key);
        self.entries.insert(key, value);
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
